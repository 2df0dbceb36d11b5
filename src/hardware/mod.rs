// Memory inventory modules
pub mod types;
pub mod node;
pub mod flatten;
pub mod meminfo;
pub mod scan;
pub mod memory_device;

// Re-export main entry points
pub use flatten::flatten;
pub use meminfo::parse_counters;
pub use memory_device::MemoryDevice;
pub use node::{DeviceNode, HwClass, HwNode};
pub use scan::{build_tree, scan_system};
pub use types::{AttributeMap, DeviceClass, DeviceRecord, MemoryCounters, MemoryReport};
