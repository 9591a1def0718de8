//! Persistence Module
//!
//! Keeps the store on disk as two representations:
//! - a binary data file of fixed-size records, the source of truth
//! - a `;`-delimited text mirror, regenerated on every save
//!
//! ## Load Protocol
//! 1. Binary file present: read it, ignore the mirror
//! 2. Else mirror present: parse it (the engine then saves right away so the
//!    binary file becomes authoritative)
//! 3. Else start empty
//!
//! ## Save Protocol
//! 1. Preflight the free disk space (best effort)
//! 2. Rewrite the whole binary file and sync it
//! 3. Rewrite the whole mirror
//!
//! Any failure is returned to the engine, which reverts the mutation.

mod file;
mod fs;
pub mod mirror;
pub mod preflight;

pub use file::FileStore;
pub use fs::{FileSystem, MemFs, OsFs};

use crate::error::Result;
use crate::record::Record;

/// Where a load found its records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The binary data file
    Binary,

    /// The text mirror (binary file missing)
    Mirror,

    /// Neither file exists
    Empty,
}

/// Records read at startup
#[derive(Debug, Clone)]
pub struct Loaded {
    pub records: Vec<Record>,
    pub source: LoadSource,
}

/// Storage backend of a [`ClientStore`](crate::ClientStore)
pub trait Persistence {
    /// Read the persisted record set
    fn load(&mut self) -> Result<Loaded>;

    /// Persist `records` (already in id order) in full
    fn save(&mut self, records: &[Record]) -> Result<()>;
}
