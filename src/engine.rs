//! Engine Module
//!
//! The key-value storage engine that coordinates the in-memory table and
//! the store file.
//!
//! ## Responsibilities
//! - Hydrate the table from the store file on open
//! - Serve reads from memory only
//! - Apply each batch to the table, then save the whole table once
//! - Report save failures without rolling back memory

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::format::{Entry, FORMAT_VERSION};
use crate::memtable::OrderedTable;
use crate::merge;
use crate::storage::FileStore;

/// Ordered, file-backed key-value storage
///
/// ## Execution Model
///
/// Single-threaded and synchronous. Mutating calls take `&mut self` and
/// return only after the store file has been rewritten (or the rewrite has
/// failed). There is no internal locking; wrap the storage in
/// [`SharedStorage`](crate::SharedStorage) to share it between threads.
///
/// ## Failure Model
///
/// Only loading and saving can fail. When a save fails the table keeps the
/// mutation, so memory is ahead of disk until the next successful save.
pub struct KeyValueStorage {
    /// Settings the storage was opened with
    config: Config,

    /// Whole-file persistence
    file_store: FileStore,

    /// The store, in insertion order
    table: OrderedTable,
}

impl KeyValueStorage {
    /// Open the store described by `config`
    ///
    /// On startup:
    /// 1. Validate the store name
    /// 2. Create the data directory if configured to
    /// 3. Load the store file (missing file = empty store)
    /// 4. Ready to serve requests
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Reject names that would escape data_dir
        config.validate()?;

        // Step 2: Create data directory if it doesn't exist
        if config.create_dir {
            fs::create_dir_all(&config.data_dir)?;
        }

        // Step 3: Load
        let file_store = FileStore::new(config.file_path(), config.sync_strategy);
        Self::load(config, file_store)
    }

    /// Open a store file at an already-resolved path
    ///
    /// Uses default config for everything but the file location. The parent
    /// directory must exist.
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        let config = Config::default();
        let file_store = FileStore::new(path, config.sync_strategy);
        Self::load(config, file_store)
    }

    fn load(config: Config, file_store: FileStore) -> Result<Self> {
        let entries = file_store.load()?;
        let table = OrderedTable::from_entries(entries);

        tracing::info!(
            "Opened store {} (format v{}) with {} entries",
            file_store.path().display(),
            FORMAT_VERSION,
            table.len()
        );

        Ok(Self {
            config,
            file_store,
            table,
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Get the entries for `keys`, in store order
    ///
    /// Keys that are not stored are left out, so the result may be shorter
    /// than the request. A key requested twice is returned once.
    pub fn multi_get<K: AsRef<str>>(&self, keys: &[K]) -> Vec<(String, String)> {
        let mut found: Vec<(usize, &str)> = keys
            .iter()
            .filter_map(|key| {
                let key = key.as_ref();
                self.table.position(key).map(|position| (position, key))
            })
            .collect();

        found.sort_unstable_by_key(|(position, _)| *position);
        found.dedup_by_key(|(position, _)| *position);

        found
            .into_iter()
            .filter_map(|(_, key)| {
                self.table
                    .get(key)
                    .map(|value| (key.to_string(), value.to_string()))
            })
            .collect()
    }

    /// Get a single value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.table.get(key)
    }

    /// All keys, in store order
    pub fn get_all_keys(&self) -> Vec<String> {
        self.table.keys().map(str::to_string).collect()
    }

    /// Iterate all entries in store order
    pub fn entries(&self) -> impl Iterator<Item = &Entry> + '_ {
        self.table.iter()
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert or overwrite each pair, then save once
    ///
    /// New keys are appended; existing keys keep their position. An empty
    /// batch does nothing and does not touch disk.
    pub fn multi_set<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut applied = 0usize;
        for (key, value) in entries {
            self.table.insert(key.into(), value.into());
            applied += 1;
        }

        if applied == 0 {
            return Ok(());
        }

        tracing::trace!("multi_set applied {} pairs", applied);
        self.persist()
    }

    /// Remove each key, then save once
    ///
    /// Unknown keys are ignored. An empty key list does nothing.
    pub fn multi_remove<K: AsRef<str>>(&mut self, keys: &[K]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }

        let mut removed = 0usize;
        for key in keys {
            if self.table.remove(key.as_ref()).is_some() {
                removed += 1;
            }
        }

        tracing::trace!("multi_remove removed {} of {} keys", removed, keys.len());
        self.persist()
    }

    /// Deep-merge JSON object values into the stored ones, then save once
    ///
    /// A key with no stored value takes the new value as-is. Otherwise both
    /// values must be JSON objects; the new one is merged into the stored
    /// one. Any merge failure rejects the whole batch before the table is
    /// touched.
    pub fn multi_merge<I, K, V>(&mut self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        // Stage the merged values so a failure leaves the table untouched
        let mut staged: Vec<(String, String)> = Vec::new();
        let mut staged_index: HashMap<String, usize> = HashMap::new();

        for (key, value) in entries {
            let key: String = key.into();
            let value: String = value.into();

            let base = match staged_index.get(&key) {
                Some(&i) => Some(staged[i].1.as_str()),
                None => self.table.get(&key),
            };

            let merged = match base {
                Some(stored) => merge::merge_json(&key, stored, &value)?,
                None => value,
            };

            match staged_index.get(&key) {
                Some(&i) => staged[i].1 = merged,
                None => {
                    staged_index.insert(key.clone(), staged.len());
                    staged.push((key, merged));
                }
            }
        }

        if staged.is_empty() {
            return Ok(());
        }

        for (key, value) in staged {
            self.table.insert(key, value);
        }

        self.persist()
    }

    /// Remove every entry and save an empty store file
    pub fn clear(&mut self) -> Result<()> {
        self.table.clear();
        self.persist()
    }

    /// Rewrite the store file from the table
    fn persist(&self) -> Result<()> {
        match self.file_store.save(self.table.iter()) {
            Ok(stats) => {
                tracing::debug!(
                    "Saved {} entries ({} bytes) to {}",
                    stats.entries,
                    stats.bytes,
                    self.file_store.path().display()
                );
                Ok(())
            }
            Err(e) => {
                tracing::warn!(
                    "Save to {} failed, memory is ahead of disk: {}",
                    self.file_store.path().display(),
                    e
                );
                Err(e)
            }
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Check whether a key is stored
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        self.file_store.path()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
