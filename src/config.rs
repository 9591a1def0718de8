//! Configuration for ClientStore
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{Result, StoreError};

/// Main configuration for a ClientStore instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // File Configuration
    // -------------------------------------------------------------------------
    /// Directory holding both persisted representations
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── clientes.dat     (binary records, source of truth)
    ///     └── clientes.csv     (text mirror, regenerated on save)
    pub data_dir: PathBuf,

    /// File name of the binary record file
    pub binary_file: String,

    /// File name of the `;`-delimited text mirror
    pub mirror_file: String,

    // -------------------------------------------------------------------------
    // Save Configuration
    // -------------------------------------------------------------------------
    /// Extra free bytes the preflight demands on top of the estimated output
    pub space_margin: u64,

    /// Whether saved files are fsynced
    pub sync_strategy: SyncStrategy,
}

/// Durability of a save
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// Flush and fsync every file written (safest, slowest)
    EveryWrite,

    /// Flush to the OS and let it decide when to hit the disk
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            binary_file: "clientes.dat".to_string(),
            mirror_file: "clientes.csv".to_string(),
            space_margin: 64 * 1024, // 64 KB
            sync_strategy: SyncStrategy::EveryWrite,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Full path of the binary record file
    pub fn binary_path(&self) -> PathBuf {
        self.data_dir.join(&self.binary_file)
    }

    /// Full path of the text mirror
    pub fn mirror_path(&self) -> PathBuf {
        self.data_dir.join(&self.mirror_file)
    }

    /// Reject file layouts that would make the two representations collide
    pub fn validate(&self) -> Result<()> {
        if self.binary_file.trim().is_empty() || self.mirror_file.trim().is_empty() {
            return Err(StoreError::Config("file names must not be empty".to_string()));
        }
        if self.binary_file == self.mirror_file {
            return Err(StoreError::Config(format!(
                "binary file and mirror file are both '{}'",
                self.binary_file
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Set the binary file name (relative to the data directory)
    pub fn binary_file(mut self, name: impl Into<String>) -> Self {
        self.config.binary_file = name.into();
        self
    }

    /// Set the mirror file name (relative to the data directory)
    pub fn mirror_file(mut self, name: impl Into<String>) -> Self {
        self.config.mirror_file = name.into();
        self
    }

    /// Set the preflight safety margin (in bytes)
    pub fn space_margin(mut self, bytes: u64) -> Self {
        self.config.space_margin = bytes;
        self
    }

    /// Set the sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
