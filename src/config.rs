//! Configuration for FlatKV
//!
//! Centralized configuration with sensible defaults.

use std::path::{Component, Path, PathBuf};

use crate::error::{FlatKvError, Result};

/// Main configuration for a FlatKV store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the store file
    /// Internal structure:
    ///   {data_dir}/
    ///     ├── {store_name}.kv       (line-pair store file)
    ///     └── {store_name}.kv.tmp   (only present mid-save)
    pub data_dir: PathBuf,

    /// Logical store name, mapped to `{store_name}.kv`
    pub store_name: String,

    /// Create `data_dir` on open if it does not exist
    pub create_dir: bool,

    // -------------------------------------------------------------------------
    // Durability Configuration
    // -------------------------------------------------------------------------
    /// Sync strategy: whether to fsync on every save
    pub sync_strategy: SyncStrategy,
}

/// Save sync strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    /// fsync the new file before it replaces the old one (safest, slowest)
    EveryWrite,

    /// Leave flushing to the OS page cache
    OsBuffered,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./flatkv_data"),
            store_name: Self::DEFAULT_STORE_NAME.to_string(),
            create_dir: true,
            sync_strategy: SyncStrategy::EveryWrite,
        }
    }
}

impl Config {
    /// Store name used by the storage bridge when none is given
    pub const DEFAULT_STORE_NAME: &'static str = "AsyncLocalStorage";

    /// Extension of the store file
    pub const FILE_EXTENSION: &'static str = "kv";

    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the store name maps to a single file inside `data_dir`
    pub fn validate(&self) -> Result<()> {
        let name = self.store_name.as_str();
        if name.is_empty() {
            return Err(FlatKvError::Config("store name is empty".to_string()));
        }

        let mut components = Path::new(name).components();
        let single_normal = matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        );
        if !single_normal || name.contains(['/', '\\']) {
            return Err(FlatKvError::Config(format!(
                "store name {:?} must be a plain file name",
                name
            )));
        }

        Ok(())
    }

    /// Full path of the store file
    pub fn file_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.{}", self.store_name, Self::FILE_EXTENSION))
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

    /// Set the logical store name
    pub fn store_name(mut self, name: impl Into<String>) -> Self {
        self.config.store_name = name.into();
        self
    }

    /// Set whether a missing data directory is created on open
    pub fn create_dir(mut self, create: bool) -> Self {
        self.config.create_dir = create;
        self
    }

    /// Set the save sync strategy
    pub fn sync_strategy(mut self, strategy: SyncStrategy) -> Self {
        self.config.sync_strategy = strategy;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
