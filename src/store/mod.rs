//! Store Module
//!
//! In-memory side of the record store.
//!
//! ## Responsibilities
//! - Own the growable record sequence (capacity doubling, never shrinking)
//! - Sort by id or by name with selection sort
//! - Binary search by id, or by name through an on-demand index

mod buffer;
mod order;

pub use buffer::{RecordBuffer, MIN_CAPACITY};
pub use order::{
    binary_search_by, is_sorted_by_id, search_by_id, search_by_name, selection_sort_by,
    sort_by_id, sort_by_name, NameIndex,
};
