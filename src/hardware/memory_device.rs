//! Memory inventory: installed modules plus a snapshot of usage counters.
//!
//! A [`MemoryDevice`] is built once and is read-only afterwards. Index
//! accessors return an empty string for any index past [`MemoryDevice::count`].

use std::path::Path;
use tracing::{info, warn};

use crate::config::InventoryConfig;
use crate::hardware::flatten::flatten;
use crate::hardware::meminfo::parse_counters;
use crate::hardware::node::{DeviceNode, HwClass, HwNode};
use crate::hardware::scan::scan_system;
use crate::hardware::types::{DeviceRecord, MemoryCounters, MemoryReport, ModuleSummary};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryDevice {
    records: Vec<DeviceRecord>,
    counters: MemoryCounters,
}

impl MemoryDevice {
    /// Flatten `root` and read counters from `meminfo_path`.
    pub fn new<N: HwNode>(root: &N, meminfo_path: &Path) -> Self {
        Self {
            records: flatten(root),
            counters: parse_counters(meminfo_path),
        }
    }

    pub fn from_config<N: HwNode>(root: &N, config: &InventoryConfig) -> Self {
        Self::new(root, &config.meminfo_path)
    }

    /// Scan the SMBIOS tables named in `config` and build the inventory.
    /// A failed scan leaves the module list empty.
    pub fn scan(config: &InventoryConfig) -> Self {
        let root = scan_system(&config.dmi_table_path).unwrap_or_else(|e| {
            warn!(error = %e, "hardware scan failed, no memory modules listed");
            DeviceNode::new("computer", HwClass::System)
        });

        let device = Self::from_config(&root, config);
        info!(modules = device.count(), "memory inventory collected");
        device
    }

    pub fn count(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[DeviceRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&DeviceRecord> {
        self.records.get(index)
    }

    pub fn counters(&self) -> &MemoryCounters {
        &self.counters
    }

    fn attribute(&self, index: usize, key: &str) -> &str {
        self.record(index)
            .and_then(|r| r.attribute(key))
            .unwrap_or_default()
    }

    pub fn vendor(&self, index: usize) -> &str {
        self.record(index).map_or("", |r| r.vendor_name.as_str())
    }

    pub fn model(&self, index: usize) -> &str {
        self.record(index).map_or("", |r| r.product_name.as_str())
    }

    /// Not reported by the scanner; always empty.
    pub fn total_width(&self, _index: usize) -> &str {
        ""
    }

    /// Not reported by the scanner; always empty.
    pub fn data_width(&self, _index: usize) -> &str {
        ""
    }

    pub fn mem_type(&self, index: usize) -> &str {
        self.attribute(index, "type")
    }

    pub fn speed(&self, index: usize) -> &str {
        self.attribute(index, "speed")
    }

    pub fn serial_number(&self, index: usize) -> &str {
        self.attribute(index, "serial")
    }

    pub fn size(&self, index: usize) -> &str {
        self.attribute(index, "size")
    }

    pub fn swap_size(&self) -> &str {
        self.counters.swap_size()
    }

    pub fn swap_total(&self) -> &str {
        self.counters.swap_total()
    }

    pub fn available(&self) -> &str {
        self.counters.available()
    }

    pub fn buffers(&self) -> &str {
        self.counters.buffers()
    }

    pub fn cached(&self) -> &str {
        self.counters.cached()
    }

    pub fn active(&self) -> &str {
        self.counters.active()
    }

    pub fn inactive(&self) -> &str {
        self.counters.inactive()
    }

    pub fn shared_size(&self) -> &str {
        self.counters.shared_size()
    }

    pub fn swap_free(&self) -> &str {
        self.counters.swap_free()
    }

    pub fn swap_cached(&self) -> &str {
        self.counters.swap_cached()
    }

    pub fn slab(&self) -> &str {
        self.counters.slab()
    }

    pub fn dirty(&self) -> &str {
        self.counters.dirty()
    }

    pub fn mapped(&self) -> &str {
        self.counters.mapped()
    }

    pub fn module_summary(&self, index: usize) -> ModuleSummary {
        ModuleSummary {
            index,
            vendor: self.vendor(index).to_string(),
            model: self.model(index).to_string(),
            mem_type: self.mem_type(index).to_string(),
            speed: self.speed(index).to_string(),
            serial_number: self.serial_number(index).to_string(),
            size: self.size(index).to_string(),
            total_width: self.total_width(index).to_string(),
            data_width: self.data_width(index).to_string(),
        }
    }

    pub fn report(&self) -> MemoryReport {
        MemoryReport {
            collected_at: chrono::Utc::now().to_rfc3339(),
            module_count: self.count(),
            modules: (0..self.count()).map(|i| self.module_summary(i)).collect(),
            usage: self.counters.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const MEMINFO: &str = "MemTotal: 16384000 kB\nMemAvailable: 8000000 kB\nSwapTotal: 2000000 kB\nShmem: 1024 kB\n";

    fn meminfo_fixture() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(MEMINFO.as_bytes()).unwrap();
        file
    }

    fn tree() -> DeviceNode {
        DeviceNode::new("computer", HwClass::System).with_child(
            DeviceNode::new("memory", HwClass::Memory)
                .with_description("System Memory")
                .with_child(
                    DeviceNode::new("bank:0", HwClass::MemoryModule)
                        .with_description("DIMM DDR4 3200 MT/s")
                        .with_vendor("Samsung")
                        .with_product("M378A2K43CB1-CTD")
                        .with_serial("0xDEADBEEF")
                        .with_size(17_179_869_184)
                        .with_clock(3_200_000_000),
                )
                .with_child(
                    DeviceNode::new("bank:1", HwClass::MemoryModule).with_description("[empty]"),
                ),
        )
    }

    #[test]
    fn index_accessors() {
        let file = meminfo_fixture();
        let device = MemoryDevice::new(&tree(), file.path());

        assert_eq!(device.count(), 2);
        assert_eq!(device.vendor(0), "Samsung");
        assert_eq!(device.model(0), "M378A2K43CB1-CTD");
        assert_eq!(device.mem_type(0), "DIMM DDR4 3200 MT/s");
        assert_eq!(device.speed(0), "3200000000");
        assert_eq!(device.serial_number(0), "0xDEADBEEF");
        assert_eq!(device.size(0), "17179869184");

        assert_eq!(device.mem_type(1), "[empty]");
        assert_eq!(device.size(1), "");
        assert_eq!(device.speed(1), "");
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let file = meminfo_fixture();
        let device = MemoryDevice::new(&tree(), file.path());

        for index in [device.count(), device.count() + 1, usize::MAX] {
            assert_eq!(device.vendor(index), "");
            assert_eq!(device.model(index), "");
            assert_eq!(device.mem_type(index), "");
            assert_eq!(device.speed(index), "");
            assert_eq!(device.serial_number(index), "");
            assert_eq!(device.size(index), "");
            assert_eq!(device.total_width(index), "");
            assert_eq!(device.data_width(index), "");
            assert!(device.record(index).is_none());
        }
    }

    #[test]
    fn width_stubs_are_always_empty() {
        let file = meminfo_fixture();
        let device = MemoryDevice::new(&tree(), file.path());
        assert_eq!(device.total_width(0), "");
        assert_eq!(device.data_width(0), "");
    }

    #[test]
    fn counter_accessors() {
        let file = meminfo_fixture();
        let device = MemoryDevice::new(&tree(), file.path());

        assert_eq!(device.available(), "8000000");
        assert_eq!(device.swap_size(), "2000000");
        assert_eq!(device.swap_total(), "2000000");
        assert_eq!(device.shared_size(), "1024");
        assert_eq!(device.slab(), "0");
    }

    #[test]
    fn unreadable_counter_file_still_constructs() {
        let device = MemoryDevice::new(&tree(), Path::new("/nonexistent/meminfo"));

        assert_eq!(device.count(), 2);
        for value in [
            device.swap_size(),
            device.available(),
            device.buffers(),
            device.cached(),
            device.active(),
            device.inactive(),
            device.shared_size(),
            device.swap_free(),
            device.swap_cached(),
            device.slab(),
            device.dirty(),
            device.mapped(),
        ] {
            assert_eq!(value, "0");
        }
    }

    #[test]
    fn construction_is_deterministic() {
        let file = meminfo_fixture();
        let root = tree();
        let first = MemoryDevice::new(&root, file.path());
        let second = MemoryDevice::new(&root, file.path());
        assert_eq!(first, second);
    }

    #[test]
    fn from_config_uses_configured_meminfo() {
        let file = meminfo_fixture();
        let config = InventoryConfig {
            meminfo_path: file.path().to_path_buf(),
            ..InventoryConfig::default()
        };
        let device = MemoryDevice::from_config(&tree(), &config);
        assert_eq!(device.available(), "8000000");
    }

    #[test]
    fn scan_with_missing_tables_lists_no_modules() {
        let file = meminfo_fixture();
        let config = InventoryConfig {
            meminfo_path: file.path().to_path_buf(),
            dmi_table_path: "/nonexistent/DMI".into(),
            ..InventoryConfig::default()
        };
        let device = MemoryDevice::scan(&config);
        assert_eq!(device.count(), 0);
        assert_eq!(device.available(), "8000000");
    }

    #[test]
    fn report_goes_through_accessors() {
        let file = meminfo_fixture();
        let report = MemoryDevice::new(&tree(), file.path()).report();

        assert_eq!(report.module_count, 2);
        assert_eq!(report.modules[0].vendor, "Samsung");
        assert_eq!(report.modules[1].index, 1);
        assert_eq!(report.modules[1].size, "");
        assert_eq!(report.usage.available(), "8000000");
        assert!(chrono::DateTime::parse_from_rfc3339(&report.collected_at).is_ok());
    }
}
