use serde::{Serialize, Serializer};
use std::fmt;

/// Category tag carried by every inventory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Memory,
}

/// String attributes of a device, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, String)>,
}

impl AttributeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite `key`. An overwritten key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for AttributeMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// One memory module discovered in the hardware tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRecord {
    pub device_class: DeviceClass,
    pub attributes: AttributeMap,
    pub vendor_name: String,
    pub product_name: String,
    pub sub_class_name: String,
}

impl DeviceRecord {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key)
    }
}

/// Raw `/proc/meminfo` values in kB. Every field starts at zero and keeps
/// that value when its line is missing or malformed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemInfo {
    pub mem_total: u64,
    pub mem_free: u64,
    pub mem_available: u64,
    pub buffers: u64,
    pub cached: u64,
    pub swap_cached: u64,
    pub active: u64,
    pub inactive: u64,
    pub swap_total: u64,
    pub swap_free: u64,
    pub dirty: u64,
    pub shmem: u64,
    pub slab: u64,
    pub mapped: u64,
}

/// Memory usage counters in kB, rendered as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemoryCounters {
    swap_size: String,
    available: String,
    buffers: String,
    cached: String,
    active: String,
    inactive: String,
    shared_size: String,
    swap_free: String,
    swap_cached: String,
    slab: String,
    dirty: String,
    mapped: String,
}

impl From<&MemInfo> for MemoryCounters {
    fn from(info: &MemInfo) -> Self {
        Self {
            swap_size: info.swap_total.to_string(),
            available: info.mem_available.to_string(),
            buffers: info.buffers.to_string(),
            cached: info.cached.to_string(),
            active: info.active.to_string(),
            inactive: info.inactive.to_string(),
            shared_size: info.shmem.to_string(),
            swap_free: info.swap_free.to_string(),
            swap_cached: info.swap_cached.to_string(),
            slab: info.slab.to_string(),
            dirty: info.dirty.to_string(),
            mapped: info.mapped.to_string(),
        }
    }
}

impl Default for MemoryCounters {
    fn default() -> Self {
        Self::from(&MemInfo::default())
    }
}

impl MemoryCounters {
    pub fn swap_size(&self) -> &str {
        &self.swap_size
    }

    /// Same value as [`Self::swap_size`].
    pub fn swap_total(&self) -> &str {
        &self.swap_size
    }

    pub fn available(&self) -> &str {
        &self.available
    }

    pub fn buffers(&self) -> &str {
        &self.buffers
    }

    pub fn cached(&self) -> &str {
        &self.cached
    }

    pub fn active(&self) -> &str {
        &self.active
    }

    pub fn inactive(&self) -> &str {
        &self.inactive
    }

    pub fn shared_size(&self) -> &str {
        &self.shared_size
    }

    pub fn swap_free(&self) -> &str {
        &self.swap_free
    }

    pub fn swap_cached(&self) -> &str {
        &self.swap_cached
    }

    pub fn slab(&self) -> &str {
        &self.slab
    }

    pub fn dirty(&self) -> &str {
        &self.dirty
    }

    pub fn mapped(&self) -> &str {
        &self.mapped
    }
}

#[derive(Debug, Serialize)]
pub struct ModuleSummary {
    pub index: usize,
    pub vendor: String,
    pub model: String,
    pub mem_type: String,
    pub speed: String,
    pub serial_number: String,
    pub size: String,
    pub total_width: String,
    pub data_width: String,
}

#[derive(Debug, Serialize)]
pub struct MemoryReport {
    pub collected_at: String,
    pub module_count: usize,
    pub modules: Vec<ModuleSummary>,
    pub usage: MemoryCounters,
}

fn or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

impl fmt::Display for ModuleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Module #{}", self.index)?;
        writeln!(f, "  Vendor:  {}", or_dash(&self.vendor))?;
        writeln!(f, "  Model:   {}", or_dash(&self.model))?;
        writeln!(f, "  Type:    {}", or_dash(&self.mem_type))?;
        writeln!(f, "  Speed:   {}", or_dash(&self.speed))?;
        writeln!(f, "  Serial:  {}", or_dash(&self.serial_number))?;
        write!(f, "  Size:    {}", or_dash(&self.size))
    }
}

impl fmt::Display for MemoryCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = [
            ("Available", self.available()),
            ("Buffers", self.buffers()),
            ("Cached", self.cached()),
            ("Active", self.active()),
            ("Inactive", self.inactive()),
            ("Shared", self.shared_size()),
            ("Slab", self.slab()),
            ("Dirty", self.dirty()),
            ("Mapped", self.mapped()),
            ("Swap total", self.swap_total()),
            ("Swap free", self.swap_free()),
            ("Swap cached", self.swap_cached()),
        ];
        for (i, (label, value)) in rows.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{:<12} {:>12} kB", label, value)?;
        }
        Ok(())
    }
}

impl fmt::Display for MemoryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Collected at: {}", self.collected_at)?;
        writeln!(f, "Memory modules: {}", self.module_count)?;
        for module in &self.modules {
            writeln!(f, "{}", module)?;
        }
        writeln!(f, "Usage:")?;
        write!(f, "{}", self.usage)
    }
}
