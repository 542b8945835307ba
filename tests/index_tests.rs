//! Tests for the index store
//!
//! These tests verify:
//! - Slot position arithmetic (n × slot size addressing)
//! - Out-of-range detection against the current extent
//! - Zero-filled gaps reading back as empty slots
//! - Backward tail scan skipping tombstones
//! - Slot count derived from file length

use std::path::PathBuf;

use blockdb::block::{BlockId, RawBlockId};
use blockdb::index::{IndexSlot, IndexStore};
use blockdb::BlockDbError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_index() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("index");
    (temp_dir, path)
}

fn slot_at(n: u64) -> IndexSlot<RawBlockId> {
    let id = RawBlockId::new(n as u32, format!("payload{}", n).as_bytes());
    IndexSlot::new(n * 100, 64, id)
}

// =============================================================================
// Read/Write Tests
// =============================================================================

#[test]
fn test_empty_store_has_no_slots() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    assert_eq!(store.slot_count().unwrap(), 0);
    assert!(store.last_nonempty_slot().unwrap().is_none());
}

#[test]
fn test_write_then_read_slot() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    let slot = slot_at(3);
    store.write_slot(3, &slot).unwrap();

    assert_eq!(store.read_slot(3).unwrap(), slot);
}

#[test]
fn test_read_beyond_extent_is_out_of_range() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    store.write_slot(1, &slot_at(1)).unwrap();

    let err = store.read_slot(2).unwrap_err();
    assert!(matches!(
        err,
        BlockDbError::OutOfRange { slot: 2, extent: 2 }
    ));
}

#[test]
fn test_write_past_end_zero_fills_gap() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    // Writing slot 4 directly leaves slots 0..=3 as zero-filled gap.
    store.write_slot(4, &slot_at(4)).unwrap();

    assert_eq!(store.slot_count().unwrap(), 5);
    for n in 0..4 {
        let slot = store.read_slot(n).unwrap();
        assert!(slot.is_empty(), "slot {} should read back empty", n);
        assert_eq!(slot.payload_offset, 0);
    }
}

#[test]
fn test_overwrite_slot_in_place() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    store.write_slot(2, &slot_at(2)).unwrap();
    let replacement = IndexSlot::new(999, 17, RawBlockId::new(2, b"other"));
    store.write_slot(2, &replacement).unwrap();

    assert_eq!(store.read_slot(2).unwrap(), replacement);
    assert_eq!(store.slot_count().unwrap(), 3);
}

// =============================================================================
// Tail Scan Tests
// =============================================================================

#[test]
fn test_last_nonempty_finds_tail_slot() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    for n in 1..=5 {
        store.write_slot(n, &slot_at(n)).unwrap();
    }

    let last = store.last_nonempty_slot().unwrap().unwrap();
    assert_eq!(last.id.number(), 5);
}

#[test]
fn test_last_nonempty_skips_trailing_tombstones() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    for n in 1..=5 {
        store.write_slot(n, &slot_at(n)).unwrap();
    }
    for n in 4..=5 {
        let dead = store.read_slot(n).unwrap().tombstoned();
        store.write_slot(n, &dead).unwrap();
    }

    let last = store.last_nonempty_slot().unwrap().unwrap();
    assert_eq!(last.id.number(), 3);
}

#[test]
fn test_last_nonempty_none_when_all_tombstoned() {
    let (_temp, path) = setup_temp_index();
    let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();

    for n in 0..3 {
        store.write_slot(n, &slot_at(n).tombstoned()).unwrap();
    }

    assert!(store.last_nonempty_slot().unwrap().is_none());
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_slots_survive_reopen() {
    let (_temp, path) = setup_temp_index();

    {
        let mut store: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();
        store.write_slot(7, &slot_at(7)).unwrap();
        store.flush().unwrap();
    }

    let mut reopened: IndexStore<RawBlockId> = IndexStore::open(&path).unwrap();
    assert_eq!(reopened.slot_count().unwrap(), 8);
    assert_eq!(reopened.read_slot(7).unwrap(), slot_at(7));
}
