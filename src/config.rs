//! Runtime configuration: where to read memory counters and firmware
//! tables from, and how to log.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{InventoryError, Result};

/// Kernel memory counter file.
pub const PROC_MEMINFO_PATH: &str = "/proc/meminfo";
/// Raw SMBIOS entry table exported by the kernel.
pub const DMI_TABLE_PATH: &str = "/sys/firmware/dmi/tables/DMI";

const APP_DIR: &str = "memdev";
const CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub meminfo_path: PathBuf,
    pub dmi_table_path: PathBuf,
    pub log: LogConfig,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            meminfo_path: PathBuf::from(PROC_MEMINFO_PATH),
            dmi_table_path: PathBuf::from(DMI_TABLE_PATH),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// trace|debug|info|warn|error
    pub level: String,
    /// text|json
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "text".to_string(),
        }
    }
}

impl InventoryConfig {
    /// Load configuration from the standard config file location.
    ///
    /// Searches for config in:
    /// 1. ~/.config/memdev/config.yaml
    /// 2. ~/.memdev/config.yaml (fallback)
    ///
    /// Returns the default config if no file is found.
    pub fn load() -> Result<Self> {
        match Self::find_config_file() {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| InventoryError::io(path, e))?;

        // An empty file deserializes to unit, not to a mapping
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| InventoryError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Find the config file in standard locations.
    pub fn find_config_file() -> Option<PathBuf> {
        if let Some(config_dir) = dirs::config_dir() {
            let xdg_path = config_dir.join(APP_DIR).join(CONFIG_FILE);
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(format!(".{}", APP_DIR)).join(CONFIG_FILE);
            if home_path.exists() {
                return Some(home_path);
            }
        }

        None
    }
}
