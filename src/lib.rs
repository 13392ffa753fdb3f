//! # FlatKV
//!
//! A process-local, file-backed key-value cache with:
//! - Insertion-ordered, unique string keys
//! - Whole-file persistence after every mutation
//! - Exact round-trips for any text, including line feeds and backslashes
//! - Batched get/set/remove/merge/clear operations
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     KeyValueStorage                          │
//! │        multi_get / multi_set / multi_remove / clear          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │OrderedTable │          │  FileStore  │
//!   │  (memory)   │          │ (load/save) │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Format    │
//!                           │(record/esc) │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use flatkv::{Config, KeyValueStorage};
//!
//! # fn main() -> flatkv::Result<()> {
//! let config = Config::builder().data_dir("./data").store_name("prefs").build();
//! let mut storage = KeyValueStorage::open(config)?;
//!
//! storage.multi_set([("theme", "dark"), ("note", "line one\nline two")])?;
//! assert_eq!(storage.get_all_keys(), vec!["theme", "note"]);
//! # Ok(())
//! # }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod format;
pub mod memtable;
pub mod storage;
pub mod merge;
pub mod engine;
pub mod shared;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FlatKvError, Result};
pub use config::{Config, SyncStrategy};
pub use engine::KeyValueStorage;
pub use format::Entry;
pub use shared::SharedStorage;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of FlatKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
