//! Flatten a hardware tree into the list of memory module records.

use crate::hardware::node::{HwClass, HwNode};
use crate::hardware::types::{AttributeMap, DeviceClass, DeviceRecord};

/// Collect every memory module in the tree under `root`, in pre-order
/// (a node before its children, children by index).
pub fn flatten<N: HwNode>(root: &N) -> Vec<DeviceRecord> {
    let mut records = Vec::new();
    add_device_info(root, &mut records);
    records
}

fn add_device_info<N: HwNode>(node: &N, records: &mut Vec<DeviceRecord>) {
    if node.class() == HwClass::MemoryModule {
        records.push(device_record(node));
    }

    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            add_device_info(child, records);
        }
    }
}

/// Describe a single node. Missing node data shows up as empty strings.
pub fn device_record<N: HwNode>(node: &N) -> DeviceRecord {
    let mut attributes = AttributeMap::new();

    if !node.bus_info().is_empty() {
        attributes.insert("SysFs_PATH", node.bus_info());
    }

    attributes.insert("Description", node.description());
    attributes.insert("sysID", node.id());
    attributes.insert("Vendor", node.vendor());
    attributes.insert("Name", node.product());

    if node.size() > 0 {
        attributes.insert("size", node.size().to_string());
    }
    if node.clock() > 0 {
        attributes.insert("speed", node.clock().to_string());
    }

    attributes.insert("serial", node.serial());
    attributes.insert("type", node.description());
    attributes.insert("MemAvailable", node.config("MemAvailable").unwrap_or_default());

    DeviceRecord {
        device_class: DeviceClass::Memory,
        attributes,
        vendor_name: node.vendor().to_string(),
        product_name: node.product().to_string(),
        sub_class_name: node.sub_class_name().to_string(),
    }
}
