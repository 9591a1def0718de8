//! Growable record container
//!
//! A `Vec<Record>` with an explicit logical capacity that starts at
//! [`MIN_CAPACITY`], doubles on growth and never shrinks.

use std::ops::Index;

use crate::error::{Result, StoreError};
use crate::record::Record;

/// Capacity reserved by the first growth
pub const MIN_CAPACITY: usize = 4;

/// Owning, growable sequence of records
#[derive(Debug, Clone, Default)]
pub struct RecordBuffer {
    /// Live records, `records.len()` is the logical length
    records: Vec<Record>,

    /// Logical capacity, always >= `records.len()`
    capacity: usize,
}

impl RecordBuffer {
    /// Create an empty buffer with no storage
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from already loaded records, sizing capacity the usual way
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        let mut buffer = Self::new();
        buffer.ensure_capacity(records.len())?;
        buffer.records.extend(records);
        Ok(buffer)
    }

    /// Guarantee capacity >= `wanted`
    ///
    /// Grows by doubling from [`MIN_CAPACITY`]. On failure (doubling
    /// overflow or allocation refused) the buffer is left untouched.
    pub fn ensure_capacity(&mut self, wanted: usize) -> Result<()> {
        if wanted <= self.capacity {
            return Ok(());
        }

        let target = Self::grown_capacity(self.capacity, wanted)?;
        self.records
            .try_reserve_exact(target - self.records.len())
            .map_err(|e| {
                StoreError::OutOfMemory(format!(
                    "cannot grow record buffer to {} records: {}",
                    target, e
                ))
            })?;
        self.capacity = target;

        Ok(())
    }

    /// Append a record, growing first if needed
    pub fn append(&mut self, record: Record) -> Result<()> {
        self.ensure_capacity(self.records.len() + 1)?;
        self.records.push(record);
        Ok(())
    }

    /// Insert a record at `index`, shifting later records right
    ///
    /// Panics if `index > len`.
    pub fn insert_at(&mut self, index: usize, record: Record) -> Result<()> {
        assert!(
            index <= self.records.len(),
            "insert index {} out of range for length {}",
            index,
            self.records.len()
        );
        self.ensure_capacity(self.records.len() + 1)?;
        self.records.insert(index, record);
        Ok(())
    }

    /// Remove the record at `index`, shifting later records left
    ///
    /// Panics if `index >= len`: callers locate the index first.
    pub fn remove_at(&mut self, index: usize) -> Record {
        assert!(
            index < self.records.len(),
            "remove index {} out of range for length {}",
            index,
            self.records.len()
        );
        self.records.remove(index)
    }

    /// Drop the last record (undo of `append`)
    pub fn pop(&mut self) -> Option<Record> {
        self.records.pop()
    }

    pub fn get(&self, index: usize) -> Option<&Record> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Record> {
        self.records.get_mut(index)
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn as_mut_slice(&mut self) -> &mut [Record] {
        &mut self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Logical capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Doubling target for growing `current` until it holds `wanted`
    fn grown_capacity(current: usize, wanted: usize) -> Result<usize> {
        let mut target = current.max(MIN_CAPACITY);
        while target < wanted {
            target = target.checked_mul(2).ok_or_else(|| {
                StoreError::OutOfMemory(format!(
                    "capacity for {} records overflows the address space",
                    wanted
                ))
            })?;
        }
        Ok(target)
    }
}

impl Index<usize> for RecordBuffer {
    type Output = Record;

    fn index(&self, index: usize) -> &Record {
        &self.records[index]
    }
}

impl<'a> IntoIterator for &'a RecordBuffer {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
