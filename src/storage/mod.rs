//! Storage Module
//!
//! Whole-file persistence for the store.
//!
//! ## Responsibilities
//! - Load every record from the store file at startup
//! - Replace the whole file on every save
//! - Treat a missing file as an empty store
//! - Fail closed on a malformed file rather than drop records
//!
//! ## Save Sequence
//! ```text
//! entries ──► {name}.kv.tmp ──fsync──► rename ──► {name}.kv
//! ```
//! The rename either happens or it doesn't, so readers only ever see the
//! previous file or the complete new one.

mod file_store;

pub use file_store::{FileStore, SaveStats};
