//! Tests for OrderedTable
//!
//! These tests verify:
//! - Basic insert/get/remove operations
//! - Overwrites keep their original position
//! - Removals preserve the order of survivors
//! - Compaction keeps order and lookups intact

use flatkv::format::Entry;
use flatkv::memtable::OrderedTable;

// =============================================================================
// Helper Functions
// =============================================================================

fn keys_of(table: &OrderedTable) -> Vec<&str> {
    table.keys().collect()
}

fn table_with(count: usize) -> OrderedTable {
    let mut table = OrderedTable::new();
    for i in 0..count {
        table.insert(format!("k{}", i), format!("v{}", i));
    }
    table
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_table_new_is_empty() {
    let table = OrderedTable::new();
    assert!(table.is_empty());
    assert_eq!(table.len(), 0);
    assert_eq!(table.iter().count(), 0);
}

#[test]
fn test_table_insert_get() {
    let mut table = OrderedTable::new();
    assert_eq!(table.insert("hello".into(), "world".into()), None);

    assert_eq!(table.get("hello"), Some("world"));
    assert!(table.contains_key("hello"));
    assert_eq!(table.len(), 1);
}

#[test]
fn test_table_get_missing() {
    let table = table_with(3);
    assert_eq!(table.get("nope"), None);
    assert_eq!(table.position("nope"), None);
}

#[test]
fn test_table_insertion_order_not_sorted() {
    let mut table = OrderedTable::new();
    for key in ["zeta", "alpha", "mike", "bravo"] {
        table.insert(key.into(), "x".into());
    }

    assert_eq!(keys_of(&table), vec!["zeta", "alpha", "mike", "bravo"]);
}

#[test]
fn test_table_overwrite_keeps_position() {
    let mut table = table_with(3);

    let old = table.insert("k0".into(), "new".into());

    assert_eq!(old, Some("v0".to_string()));
    assert_eq!(table.len(), 3);
    assert_eq!(keys_of(&table), vec!["k0", "k1", "k2"]);
    assert_eq!(table.get("k0"), Some("new"));
}

#[test]
fn test_table_empty_key() {
    let mut table = OrderedTable::new();
    table.insert(String::new(), "empty key".into());
    assert_eq!(table.get(""), Some("empty key"));
}

// =============================================================================
// Removal Tests
// =============================================================================

#[test]
fn test_table_remove() {
    let mut table = table_with(3);

    assert_eq!(table.remove("k1"), Some("v1".to_string()));
    assert_eq!(table.get("k1"), None);
    assert_eq!(table.len(), 2);
    assert_eq!(keys_of(&table), vec!["k0", "k2"]);
}

#[test]
fn test_table_remove_missing_is_none() {
    let mut table = table_with(2);
    assert_eq!(table.remove("missing"), None);
    assert_eq!(table.len(), 2);
    assert_eq!(table.tombstone_count(), 0);
}

#[test]
fn test_table_remove_twice() {
    let mut table = table_with(2);
    assert!(table.remove("k0").is_some());
    assert!(table.remove("k0").is_none());
}

#[test]
fn test_table_reinsert_after_remove_goes_to_end() {
    let mut table = table_with(3);
    table.remove("k0");
    table.insert("k0".into(), "back".into());

    assert_eq!(keys_of(&table), vec!["k1", "k2", "k0"]);
}

#[test]
fn test_table_remove_preserves_order() {
    let mut table = table_with(10);
    table.remove("k1");
    table.remove("k3");

    assert_eq!(
        keys_of(&table),
        vec!["k0", "k2", "k4", "k5", "k6", "k7", "k8", "k9"]
    );
}

#[test]
fn test_table_clear() {
    let mut table = table_with(5);
    table.remove("k2");
    table.clear();

    assert!(table.is_empty());
    assert_eq!(table.tombstone_count(), 0);
    assert_eq!(table.iter().count(), 0);

    table.insert("fresh".into(), "1".into());
    assert_eq!(keys_of(&table), vec!["fresh"]);
}

// =============================================================================
// Compaction Tests
// =============================================================================

#[test]
fn test_table_compacts_when_tombstones_dominate() {
    let mut table = table_with(100);

    for i in (0..100).filter(|i| i % 4 != 0) {
        table.remove(&format!("k{}", i));
    }

    // 75 removals against 25 survivors triggers compaction along the way
    assert!(table.tombstone_count() < 75);
    assert_eq!(table.len(), 25);

    let expected: Vec<String> = (0..100).step_by(4).map(|i| format!("k{}", i)).collect();
    assert_eq!(keys_of(&table), expected);

    for key in &expected {
        assert!(table.get(key).is_some());
    }
}

#[test]
fn test_table_explicit_compact() {
    let mut table = table_with(5);
    table.remove("k0");
    table.remove("k3");
    assert_eq!(table.tombstone_count(), 2);

    table.compact();

    assert_eq!(table.tombstone_count(), 0);
    assert_eq!(keys_of(&table), vec!["k1", "k2", "k4"]);
    assert_eq!(table.position("k1"), Some(0));
    assert_eq!(table.position("k4"), Some(2));
    assert_eq!(table.get("k4"), Some("v4"));
}

#[test]
fn test_table_positions_follow_order() {
    let mut table = table_with(5);
    table.insert("k2".into(), "changed".into());

    let positions: Vec<usize> = ["k0", "k1", "k2", "k3", "k4"]
        .iter()
        .map(|k| table.position(k).unwrap())
        .collect();

    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_table_from_entries_keeps_order() {
    let table = OrderedTable::from_entries(vec![
        Entry::new("b", "1"),
        Entry::new("a", "2"),
        Entry::new("c", "3"),
    ]);

    assert_eq!(keys_of(&table), vec!["b", "a", "c"]);
}

#[test]
fn test_table_from_entries_duplicate_key_last_wins_first_position() {
    let table: OrderedTable = vec![
        Entry::new("a", "1"),
        Entry::new("b", "2"),
        Entry::new("a", "3"),
    ]
    .into_iter()
    .collect();

    assert_eq!(keys_of(&table), vec!["a", "b"]);
    assert_eq!(table.get("a"), Some("3"));
}

#[test]
fn test_table_iter_exact_size() {
    let mut table = table_with(6);
    table.remove("k2");

    let iter = table.iter();
    assert_eq!(iter.len(), 5);

    let values: Vec<&str> = (&table).into_iter().map(|e| e.value.as_str()).collect();
    assert_eq!(values, vec!["v0", "v1", "v3", "v4", "v5"]);
}
