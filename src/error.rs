//! Errors raised at the fallible edges of the inventory: loading
//! configuration and reading firmware tables.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, InventoryError>;

#[derive(Error, Debug)]
pub enum InventoryError {
    /// A file could not be opened or read
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file was readable but invalid
    #[error("Invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// SMBIOS/DMI tables could not be decoded
    #[error("Failed to load SMBIOS tables from {}: {reason}", path.display())]
    Smbios { path: PathBuf, reason: String },
}

impl InventoryError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
