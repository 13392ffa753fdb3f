//! MemTable Module
//!
//! In-memory, insertion-ordered map holding the whole store.
//!
//! ## Responsibilities
//! - O(1) lookups, inserts and removals by key
//! - Overwrites keep the key's original position
//! - Removals never reorder the surviving entries
//! - Ordered iteration for saving and key listing
//!
//! ## Data Structure Choice
//! A slot vector plus a key → slot index:
//! - Slots keep insertion order
//! - Removal leaves a tombstone; slots are compacted once tombstones
//!   outnumber live entries
//! - A sorted map (BTreeMap) would lose insertion order

mod table;

pub use table::{OrderedTable, OrderedTableIter};

use crate::format::Entry;

/// A slot in the table
#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    /// A live entry
    Live(Entry),

    /// A removed entry, skipped by iteration
    Tombstone,
}
