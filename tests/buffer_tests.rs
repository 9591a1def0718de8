//! Tests for RecordBuffer
//!
//! These tests verify:
//! - Capacity doubling from the minimum baseline
//! - Capacity never shrinks and always covers the length
//! - Strong guarantee on failed growth
//! - Shift-left removal and positional insertion

use clientstore::store::{RecordBuffer, MIN_CAPACITY};
use clientstore::{ClientData, Record, StoreError};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(id: i32) -> Record {
    ClientData::new(&format!("Client {}", id), &format!("{:03}", id)).into_record(id)
}

fn buffer_with(ids: &[i32]) -> RecordBuffer {
    let mut buffer = RecordBuffer::new();
    for &id in ids {
        buffer.append(record(id)).unwrap();
    }
    buffer
}

fn ids(buffer: &RecordBuffer) -> Vec<i32> {
    buffer.iter().map(|r| r.id).collect()
}

// =============================================================================
// Capacity Tests
// =============================================================================

#[test]
fn test_new_buffer_is_empty() {
    let buffer = RecordBuffer::new();

    assert!(buffer.is_empty());
    assert_eq!(buffer.len(), 0);
    assert_eq!(buffer.capacity(), 0);
}

#[test]
fn test_first_growth_uses_baseline() {
    let mut buffer = RecordBuffer::new();

    buffer.ensure_capacity(1).unwrap();

    assert_eq!(buffer.capacity(), MIN_CAPACITY);
    assert!(buffer.is_empty());
}

#[test]
fn test_capacity_doubles() {
    let mut buffer = RecordBuffer::new();
    let mut seen = Vec::new();

    for id in 1..=17 {
        buffer.append(record(id)).unwrap();
        if seen.last() != Some(&buffer.capacity()) {
            seen.push(buffer.capacity());
        }
    }

    assert_eq!(seen, vec![4, 8, 16, 32]);
    assert_eq!(buffer.len(), 17);
}

#[test]
fn test_ensure_capacity_jumps_to_power_of_two() {
    let mut buffer = RecordBuffer::new();

    buffer.ensure_capacity(50).unwrap();

    assert_eq!(buffer.capacity(), 64);
}

#[test]
fn test_ensure_capacity_is_noop_when_sufficient() {
    let mut buffer = buffer_with(&[1, 2, 3]);

    buffer.ensure_capacity(2).unwrap();

    assert_eq!(buffer.capacity(), 4);
}

#[test]
fn test_capacity_never_shrinks_on_remove() {
    let mut buffer = buffer_with(&[1, 2, 3, 4, 5]);
    assert_eq!(buffer.capacity(), 8);

    while !buffer.is_empty() {
        buffer.remove_at(0);
        assert_eq!(buffer.capacity(), 8);
    }
}

#[test]
fn test_capacity_overflow_leaves_buffer_unchanged() {
    let mut buffer = buffer_with(&[1, 2]);

    let result = buffer.ensure_capacity(usize::MAX);

    assert!(matches!(result, Err(StoreError::OutOfMemory(_))));
    assert_eq!(buffer.capacity(), 4);
    assert_eq!(ids(&buffer), vec![1, 2]);
}

#[test]
fn test_refused_allocation_leaves_buffer_unchanged() {
    let mut buffer = buffer_with(&[1, 2]);

    // Doubling succeeds, but no allocator can hand out this many records
    let result = buffer.ensure_capacity(usize::MAX / 4);

    assert!(matches!(result, Err(StoreError::OutOfMemory(_))));
    assert_eq!(buffer.capacity(), 4);
    assert_eq!(ids(&buffer), vec![1, 2]);
}

#[test]
fn test_from_records_sizes_capacity() {
    let buffer = RecordBuffer::from_records((1..=5).map(record).collect()).unwrap();

    assert_eq!(buffer.len(), 5);
    assert_eq!(buffer.capacity(), 8);
}

// =============================================================================
// Structural Change Tests
// =============================================================================

#[test]
fn test_remove_at_shifts_left() {
    let mut buffer = buffer_with(&[1, 2, 3, 4]);

    let removed = buffer.remove_at(1);

    assert_eq!(removed.id, 2);
    assert_eq!(ids(&buffer), vec![1, 3, 4]);
}

#[test]
fn test_remove_last() {
    let mut buffer = buffer_with(&[1, 2, 3]);

    buffer.remove_at(2);

    assert_eq!(ids(&buffer), vec![1, 2]);
}

#[test]
#[should_panic(expected = "out of range")]
fn test_remove_out_of_range_panics() {
    let mut buffer = buffer_with(&[1]);
    buffer.remove_at(1);
}

#[test]
fn test_insert_at_restores_position() {
    let mut buffer = buffer_with(&[1, 2, 3]);
    let removed = buffer.remove_at(1);

    buffer.insert_at(1, removed).unwrap();

    assert_eq!(ids(&buffer), vec![1, 2, 3]);
}

#[test]
fn test_pop_undoes_append() {
    let mut buffer = buffer_with(&[1, 2]);
    buffer.append(record(3)).unwrap();

    let popped = buffer.pop().unwrap();

    assert_eq!(popped.id, 3);
    assert_eq!(ids(&buffer), vec![1, 2]);
}

#[test]
fn test_get_and_get_mut() {
    let mut buffer = buffer_with(&[7]);

    buffer.get_mut(0).unwrap().birth_year = 1980;

    assert_eq!(buffer.get(0).unwrap().birth_year, 1980);
    assert_eq!(buffer[0].id, 7);
    assert!(buffer.get(1).is_none());
}
