//! OrderedTable implementation
//!
//! Vec-of-slots with a HashMap index for insertion-ordered access.

use std::collections::HashMap;

use crate::format::Entry;

use super::Slot;

/// Tombstones tolerated before compaction is even considered
const MIN_COMPACT_TOMBSTONES: usize = 32;

/// Insertion-ordered map of unique string keys
#[derive(Debug, Clone, Default)]
pub struct OrderedTable {
    /// Entries in insertion order, with holes left by removals
    slots: Vec<Slot>,

    /// key → position in `slots`
    index: HashMap<String, usize>,

    /// Number of `Slot::Tombstone` in `slots`
    tombstones: usize,
}

impl OrderedTable {
    /// Create a new empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty table with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            tombstones: 0,
        }
    }

    /// Build a table from entries in order
    ///
    /// A repeated key overwrites the earlier value at the earlier position.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Entry>,
    {
        let entries = entries.into_iter();
        let mut table = Self::with_capacity(entries.size_hint().0);
        for entry in entries {
            table.insert(entry.key, entry.value);
        }
        table
    }

    /// Get the value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        let &slot = self.index.get(key)?;
        match &self.slots[slot] {
            Slot::Live(entry) => Some(entry.value.as_str()),
            Slot::Tombstone => None,
        }
    }

    /// Slot position of a key
    ///
    /// Positions are only meaningful relative to each other: they follow
    /// insertion order but shift when the table compacts.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or overwrite a key
    ///
    /// New keys go to the end; existing keys keep their position.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        if let Some(&slot) = self.index.get(&key) {
            if let Slot::Live(entry) = &mut self.slots[slot] {
                return Some(std::mem::replace(&mut entry.value, value));
            }
        }

        self.index.insert(key.clone(), self.slots.len());
        self.slots.push(Slot::Live(Entry { key, value }));
        None
    }

    /// Remove a key, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let slot = self.index.remove(key)?;
        let removed = std::mem::replace(&mut self.slots[slot], Slot::Tombstone);
        self.tombstones += 1;
        self.maybe_compact();

        match removed {
            Slot::Live(entry) => Some(entry.value),
            Slot::Tombstone => None,
        }
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.slots.clear();
        self.index.clear();
        self.tombstones = 0;
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table has no live entries
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of tombstoned slots awaiting compaction
    pub fn tombstone_count(&self) -> usize {
        self.tombstones
    }

    /// Iterate live entries in insertion order
    pub fn iter(&self) -> OrderedTableIter<'_> {
        OrderedTableIter {
            slots: self.slots.iter(),
            remaining: self.len(),
        }
    }

    /// Iterate keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|entry| entry.key.as_str())
    }

    /// Drop tombstones once they outnumber live entries
    fn maybe_compact(&mut self) {
        if self.tombstones < MIN_COMPACT_TOMBSTONES || self.tombstones <= self.len() {
            return;
        }
        self.compact();
    }

    /// Rewrite `slots` without tombstones and rebuild the index
    pub fn compact(&mut self) {
        if self.tombstones == 0 {
            return;
        }

        self.slots.retain(|slot| matches!(slot, Slot::Live(_)));
        for (position, slot) in self.slots.iter().enumerate() {
            if let Slot::Live(entry) = slot {
                if let Some(index) = self.index.get_mut(&entry.key) {
                    *index = position;
                }
            }
        }
        self.tombstones = 0;
    }
}

impl<'a> IntoIterator for &'a OrderedTable {
    type Item = &'a Entry;
    type IntoIter = OrderedTableIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<Entry> for OrderedTable {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self::from_entries(iter)
    }
}

/// Iterator over live OrderedTable entries
pub struct OrderedTableIter<'a> {
    slots: std::slice::Iter<'a, Slot>,
    remaining: usize,
}

impl<'a> Iterator for OrderedTableIter<'a> {
    type Item = &'a Entry;

    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.slots.by_ref() {
            if let Slot::Live(entry) = slot {
                self.remaining -= 1;
                return Some(entry);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for OrderedTableIter<'_> {}
