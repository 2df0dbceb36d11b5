use smbioslib::*;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::{InventoryError, Result};
use crate::hardware::node::{DeviceNode, HwClass, HwNode};

const MIB: u64 = 1024 * 1024;

/// Vendor filler strings that carry no information.
const PLACEHOLDERS: [&str; 7] = [
    "Not Specified",
    "Not Available",
    "Unknown",
    "To Be Filled By O.E.M.",
    "Default string",
    "NO DIMM",
    "None",
];

/// Build a hardware tree from the SMBIOS tables at `dmi_path`.
pub fn scan_system(dmi_path: &Path) -> Result<DeviceNode> {
    let smbios_data = load_smbios(dmi_path)?;
    Ok(build_tree(&smbios_data))
}

/// `computer` → one `memory:N` node per physical memory array → one
/// `bank:N` node per memory device slot, populated or not. Slots whose
/// array handle is unknown go under a separate `memory` node.
pub fn build_tree(smbios_data: &SMBiosData) -> DeviceNode {
    let mut root = DeviceNode::new("computer", HwClass::System);
    let mut arrays: Vec<(u16, DeviceNode)> = Vec::new();

    for structure in smbios_data.iter() {
        match structure.defined_struct() {
            DefinedStruct::SystemInformation(system) => {
                root = root
                    .with_description("Computer")
                    .with_vendor(dmi_string(system.manufacturer()).unwrap_or_default())
                    .with_product(dmi_string(system.product_name()).unwrap_or_default())
                    .with_serial(dmi_string(system.serial_number()).unwrap_or_default());
            }
            DefinedStruct::PhysicalMemoryArray(array) => {
                let description = match array.usage() {
                    Some(usage) if matches!(usage.value, MemoryArrayUse::SystemMemory) => "System Memory".to_string(),
                    Some(usage) => format!("{:?} Memory", usage.value),
                    None => "Memory".to_string(),
                };
                let node = DeviceNode::new(format!("memory:{}", arrays.len()), HwClass::Memory)
                    .with_description(description);
                arrays.push((structure.header.handle().0, node));
            }
            _ => continue,
        }
    }

    let mut unattached = DeviceNode::new("memory", HwClass::Memory).with_description("System Memory");

    for structure in smbios_data.iter() {
        if let DefinedStruct::MemoryDevice(memory_device) = structure.defined_struct() {
            let array_index = memory_device
                .physical_memory_array_handle()
                .and_then(|handle| arrays.iter().position(|(h, _)| *h == handle.0));
            let parent = match array_index {
                Some(i) => &mut arrays[i].1,
                None => &mut unattached,
            };

            let bank = memory_bank(&memory_device, parent.child_count());
            debug!(id = bank.id(), size = bank.size(), "found memory bank");
            parent.add_child(bank);
        }
    }

    for (_, array) in arrays {
        root.add_child(array);
    }
    if unattached.child_count() > 0 {
        root.add_child(unattached);
    }

    root
}

fn load_smbios(dmi_path: &Path) -> Result<SMBiosData> {
    let (smbios_data, load_error) = match SMBiosData::try_load_from_file(&dmi_path.to_string_lossy(), None) {
        Ok(data) => (data, None),
        Err(e) => {
            // If that fails, try reading the raw data and parsing it
            let table_data = fs::read(dmi_path).map_err(|io_err| InventoryError::io(dmi_path, io_err))?;
            (SMBiosData::from_vec_and_version(table_data, None), Some(e.to_string()))
        }
    };

    if smbios_data.iter().next().is_none() {
        return Err(InventoryError::Smbios {
            path: dmi_path.to_path_buf(),
            reason: load_error.unwrap_or_else(|| "no SMBIOS structures decoded".to_string()),
        });
    }

    Ok(smbios_data)
}

fn memory_bank(memory_device: &SMBiosMemoryDevice, index: usize) -> DeviceNode {
    let size = module_size_bytes(memory_device);

    let mem_type = memory_device
        .memory_type()
        .map(|t| format!("{:?}", t.value).to_uppercase())
        .filter(|t| t != "UNKNOWN" && t != "OTHER");

    let form_factor = memory_device
        .form_factor()
        .map(|f| format!("{:?}", f.value).to_uppercase())
        .filter(|f| f != "UNKNOWN" && f != "OTHER");

    // Configured speed first, rated speed as fallback
    let speed_mts = [memory_device.configured_memory_speed(), memory_device.speed()]
        .into_iter()
        .flatten()
        .find_map(|speed| match speed {
            MemorySpeed::MTs(mts) if mts > 0 => Some(mts as u32),
            _ => None,
        });

    let description = if size > 0 {
        bank_description(form_factor.as_deref(), mem_type.as_deref(), speed_mts)
    } else {
        "[empty]".to_string()
    };

    let mut bank = DeviceNode::new(format!("bank:{}", index), HwClass::MemoryModule)
        .with_description(description)
        .with_sub_class_name(mem_type.unwrap_or_default())
        .with_size(size)
        .with_clock(speed_mts.map_or(0, |mts| mts as u64 * 1_000_000));

    if size > 0 {
        bank = bank
            .with_vendor(dmi_string(memory_device.manufacturer()).unwrap_or_default())
            .with_product(dmi_string(memory_device.part_number()).unwrap_or_default())
            .with_serial(dmi_string(memory_device.serial_number()).unwrap_or_default());
    }

    if let Some(slot) = dmi_string(memory_device.device_locator()) {
        bank.set_config("slot", slot);
    }
    if let Some(bank_locator) = dmi_string(memory_device.bank_locator()) {
        bank.set_config("bank", bank_locator);
    }

    bank
}

fn module_size_bytes(memory_device: &SMBiosMemoryDevice) -> u64 {
    match memory_device.size() {
        Some(MemorySize::Kilobytes(kb)) => kb as u64 * 1024,
        Some(MemorySize::Megabytes(mb)) => mb as u64 * MIB,
        // Use extended size for large memory modules
        Some(MemorySize::SeeExtendedSize) => match memory_device.extended_size() {
            Some(MemorySizeExtended::Megabytes(mb)) => mb as u64 * MIB,
            _ => 0,
        },
        _ => 0,
    }
}

/// e.g. `DIMM DDR4 3200 MT/s`
fn bank_description(form_factor: Option<&str>, mem_type: Option<&str>, speed_mts: Option<u32>) -> String {
    let speed = speed_mts.map(|mts| format!("{} MT/s", mts));
    let parts: Vec<&str> = [form_factor, mem_type, speed.as_deref()]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        "Memory bank".to_string()
    } else {
        parts.join(" ")
    }
}

fn dmi_string(value: SMBiosString) -> Option<String> {
    value
        .to_utf8_lossy()
        .map(|s| s.trim().to_string())
        .filter(|s| is_meaningful(s))
}

fn is_meaningful(value: &str) -> bool {
    !value.is_empty() && !PLACEHOLDERS.iter().any(|p| value.eq_ignore_ascii_case(p))
}
