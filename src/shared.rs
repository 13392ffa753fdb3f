//! Shared storage handle
//!
//! `KeyValueStorage` has no internal locking. `SharedStorage` puts it
//! behind one mutex so a bridge layer can hand clones to several threads;
//! each call holds the lock for its whole batch, save included.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::engine::KeyValueStorage;
use crate::error::Result;

/// Cloneable, thread-safe handle to a `KeyValueStorage`
#[derive(Clone)]
pub struct SharedStorage {
    inner: Arc<Mutex<KeyValueStorage>>,
}

impl SharedStorage {
    /// Wrap an open storage
    pub fn new(storage: KeyValueStorage) -> Self {
        Self {
            inner: Arc::new(Mutex::new(storage)),
        }
    }

    /// Open the store described by `config` and wrap it
    pub fn open(config: Config) -> Result<Self> {
        KeyValueStorage::open(config).map(Self::new)
    }

    pub fn multi_get<K: AsRef<str>>(&self, keys: &[K]) -> Vec<(String, String)> {
        self.inner.lock().multi_get(keys)
    }

    pub fn multi_set<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.lock().multi_set(entries)
    }

    pub fn multi_remove<K: AsRef<str>>(&self, keys: &[K]) -> Result<()> {
        self.inner.lock().multi_remove(keys)
    }

    pub fn multi_merge<I, K, V>(&self, entries: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.inner.lock().multi_merge(entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.inner.lock().clear()
    }

    pub fn get_all_keys(&self) -> Vec<String> {
        self.inner.lock().get_all_keys()
    }

    /// Run `f` with exclusive access to the storage
    pub fn with<R>(&self, f: impl FnOnce(&mut KeyValueStorage) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
