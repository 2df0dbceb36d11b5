//! Hardware description tree.
//!
//! The inventory only ever reads the tree through [`HwNode`], so any
//! scanner able to answer these questions can feed it. [`DeviceNode`] is
//! the in-memory implementation produced by [`crate::hardware::scan`] and
//! used to build fixtures in tests.

use serde::Serialize;
use std::collections::BTreeMap;

/// Device category of a tree node.
///
/// The SMBIOS scanner only emits `System`, `Memory` and `MemoryModule`.
/// The other classes are for scanners that describe the whole machine;
/// flattening skips them but still descends into their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HwClass {
    /// The machine itself (tree root)
    System,
    Bridge,
    Processor,
    /// Memory containers such as a physical memory array
    Memory,
    /// A single installed or empty memory module slot (DIMM, SODIMM, ...)
    MemoryModule,
    Storage,
    Network,
    #[default]
    Generic,
}

/// Read-only view of one node in a hardware scan tree.
pub trait HwNode {
    fn class(&self) -> HwClass;
    fn bus_info(&self) -> &str;
    fn sub_class_name(&self) -> &str;
    fn description(&self) -> &str;
    fn id(&self) -> &str;
    fn vendor(&self) -> &str;
    fn product(&self) -> &str;
    fn serial(&self) -> &str;
    /// Size in bytes, 0 when unknown.
    fn size(&self) -> u64;

    /// Clock in Hz, 0 when unknown.
    fn clock(&self) -> u64 {
        0
    }

    fn config(&self, key: &str) -> Option<&str>;
    fn child_count(&self) -> usize;
    fn child(&self, index: usize) -> Option<&Self>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceNode {
    id: String,
    class: HwClass,
    sub_class_name: String,
    bus_info: String,
    description: String,
    vendor: String,
    product: String,
    serial: String,
    size: u64,
    clock: u64,
    config: BTreeMap<String, String>,
    children: Vec<DeviceNode>,
}

impl DeviceNode {
    pub fn new(id: impl Into<String>, class: HwClass) -> Self {
        Self {
            id: id.into(),
            class,
            ..Self::default()
        }
    }

    pub fn with_sub_class_name(mut self, name: impl Into<String>) -> Self {
        self.sub_class_name = name.into();
        self
    }

    pub fn with_bus_info(mut self, bus_info: impl Into<String>) -> Self {
        self.bus_info = bus_info.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_vendor(mut self, vendor: impl Into<String>) -> Self {
        self.vendor = vendor.into();
        self
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product = product.into();
        self
    }

    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        self.serial = serial.into();
        self
    }

    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    pub fn with_clock(mut self, clock: u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_config(key, value);
        self
    }

    pub fn with_child(mut self, child: DeviceNode) -> Self {
        self.add_child(child);
        self
    }

    pub fn set_config(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.config.insert(key.into(), value.into());
    }

    pub fn add_child(&mut self, child: DeviceNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[DeviceNode] {
        &self.children
    }
}

impl HwNode for DeviceNode {
    fn class(&self) -> HwClass {
        self.class
    }

    fn bus_info(&self) -> &str {
        &self.bus_info
    }

    fn sub_class_name(&self) -> &str {
        &self.sub_class_name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn vendor(&self) -> &str {
        &self.vendor
    }

    fn product(&self) -> &str {
        &self.product
    }

    fn serial(&self) -> &str {
        &self.serial
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn clock(&self) -> u64 {
        self.clock
    }

    fn config(&self, key: &str) -> Option<&str> {
        self.config.get(key).map(String::as_str)
    }

    fn child_count(&self) -> usize {
        self.children.len()
    }

    fn child(&self, index: usize) -> Option<&Self> {
        self.children.get(index)
    }
}
