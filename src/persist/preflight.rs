//! Disk-space preflight
//!
//! Runs before any file is touched. The estimate is the binary size, plus the
//! mirror size, plus a flat margin; it is an approximation, not a bound.

use std::path::Path;

use crate::error::{Result, StoreError};
use crate::record::RECORD_SIZE;

use super::fs::FileSystem;

/// Bytes a save of `record_count` records and a `mirror_len`-byte mirror needs
pub fn estimate(record_count: usize, mirror_len: usize, margin: u64) -> u64 {
    let binary = (record_count as u64).saturating_mul(RECORD_SIZE as u64);
    binary
        .saturating_add(mirror_len as u64)
        .saturating_add(margin)
}

/// Fail with `InsufficientSpace` if `dir` has less than `required` bytes free
///
/// A failing space query is logged and ignored: the check is best effort.
pub fn check<F: FileSystem + ?Sized>(fs: &F, dir: &Path, required: u64) -> Result<()> {
    let available = match fs.available_space(dir) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(
                "Free space query for {} failed, saving without preflight: {}",
                dir.display(),
                e
            );
            return Ok(());
        }
    };

    if available < required {
        return Err(StoreError::InsufficientSpace {
            required,
            available,
        });
    }

    tracing::trace!(required, available, "Preflight passed");
    Ok(())
}
