//! Memory device inventory and live memory usage for the local host.
//!
//! [`hardware::MemoryDevice`] lists the memory modules found in a hardware
//! scan tree and snapshots the kernel memory counters from `/proc/meminfo`.

pub mod config;
pub mod error;
pub mod hardware;
pub mod logging;

pub use config::InventoryConfig;
pub use error::{InventoryError, Result};
pub use hardware::MemoryDevice;
