//! Ordering and search
//!
//! Two total orders exist and are never mixed:
//! - by id, ascending: the canonical order of the store and of the data file
//! - by name, ASCII case-insensitive: only inside a [`NameIndex`]
//!
//! Sorting is selection sort (O(n²) comparisons, O(n) swaps, unstable).
//! Searching is binary search over a sequence already sorted by the key.

use std::cmp::Ordering;

use crate::record::{cmp_ignore_ascii_case, Record};

/// In-place selection sort
///
/// Repeatedly swaps the first minimum of the unsorted suffix into place.
pub fn selection_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let len = items.len();
    for i in 0..len.saturating_sub(1) {
        let mut min = i;
        for j in (i + 1)..len {
            if compare(&items[j], &items[min]) == Ordering::Less {
                min = j;
            }
        }
        if min != i {
            items.swap(i, min);
        }
    }
}

/// Sort records ascending by id
pub fn sort_by_id(records: &mut [Record]) {
    selection_sort_by(records, |a, b| a.id.cmp(&b.id));
}

/// Sort records by full name, ASCII case-insensitive
pub fn sort_by_name(records: &mut [Record]) {
    selection_sort_by(records, |a, b| {
        cmp_ignore_ascii_case(a.full_name.as_bytes(), b.full_name.as_bytes())
    });
}

/// Binary search with a probe returning how the element compares to the target
///
/// Returns the index of a match, `None` when absent (including empty input).
pub fn binary_search_by<T, F>(items: &[T], mut probe: F) -> Option<usize>
where
    F: FnMut(&T) -> Ordering,
{
    let mut low = 0;
    let mut high = items.len();
    while low < high {
        let mid = low + (high - low) / 2;
        match probe(&items[mid]) {
            Ordering::Equal => return Some(mid),
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }
    None
}

/// Index of the record with `id` in an id-sorted slice
pub fn search_by_id(records: &[Record], id: i32) -> Option<usize> {
    binary_search_by(records, |r| r.id.cmp(&id))
}

/// Index of a record named `name` (case-insensitive) in a name-sorted slice
pub fn search_by_name(records: &[Record], name: &str) -> Option<usize> {
    binary_search_by(records, |r| {
        cmp_ignore_ascii_case(r.full_name.as_bytes(), name.as_bytes())
    })
}

/// Secondary index ordering positions of an id-sorted slice by name
///
/// Built on demand for one name lookup and then dropped. The records
/// themselves are never reordered. Building costs O(n²) comparisons.
#[derive(Debug)]
pub struct NameIndex<'a> {
    records: &'a [Record],
    positions: Vec<usize>,
}

impl<'a> NameIndex<'a> {
    pub fn build(records: &'a [Record]) -> Self {
        let mut positions: Vec<usize> = (0..records.len()).collect();
        selection_sort_by(&mut positions, |&a, &b| {
            cmp_ignore_ascii_case(
                records[a].full_name.as_bytes(),
                records[b].full_name.as_bytes(),
            )
        });
        Self { records, positions }
    }

    /// Position (in the underlying slice) of a record named `name`
    pub fn find(&self, name: &str) -> Option<usize> {
        binary_search_by(&self.positions, |&pos| {
            cmp_ignore_ascii_case(self.records[pos].full_name.as_bytes(), name.as_bytes())
        })
        .map(|slot| self.positions[slot])
    }

    /// Records in name order
    pub fn iter(&self) -> impl Iterator<Item = &'a Record> + '_ {
        let records = self.records;
        self.positions.iter().map(move |&pos| &records[pos])
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// True if ids strictly increase along the slice
pub fn is_sorted_by_id(records: &[Record]) -> bool {
    records.windows(2).all(|pair| pair[0].id < pair[1].id)
}
