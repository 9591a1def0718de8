//! File system capability
//!
//! The persistence layer never touches `std::fs` directly; it goes through
//! [`FileSystem`] so tests can swap in [`MemFs`] and inject failures.

use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SyncStrategy;

/// Whole-file operations needed by the persistence layer
pub trait FileSystem {
    fn exists(&self, path: &Path) -> bool;

    /// Read a whole file
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace a whole file with `contents`
    ///
    /// On error the previous contents of `path` must still be in place.
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()>;

    /// Free bytes available to this process on the volume holding `dir`
    fn available_space(&self, dir: &Path) -> io::Result<u64>;

    fn create_dir_all(&self, dir: &Path) -> io::Result<()>;
}

// =============================================================================
// OsFs
// =============================================================================

/// The real file system
#[derive(Debug, Clone, Copy)]
pub struct OsFs {
    sync_strategy: SyncStrategy,
}

impl OsFs {
    pub fn new(sync_strategy: SyncStrategy) -> Self {
        Self { sync_strategy }
    }

    /// Sibling path used while a file is being rewritten
    fn staging_path(path: &Path) -> PathBuf {
        let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        path.with_file_name(name)
    }

    /// Persist the directory entry created by a rename
    #[cfg(unix)]
    fn sync_parent(path: &Path) -> io::Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        File::open(dir)?.sync_all()
    }

    /// Directories cannot be opened for syncing here; the rename is final
    #[cfg(not(unix))]
    fn sync_parent(_path: &Path) -> io::Result<()> {
        Ok(())
    }

    fn write_staged(&self, staging: &Path, contents: &[u8]) -> io::Result<()> {
        let file = File::create(staging)?;
        let mut writer = BufWriter::new(file);
        writer.write_all(contents)?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        if self.sync_strategy == SyncStrategy::EveryWrite {
            file.sync_all()?;
        }
        Ok(())
    }
}

impl Default for OsFs {
    fn default() -> Self {
        Self::new(SyncStrategy::EveryWrite)
    }
}

impl FileSystem for OsFs {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    /// Writes a sibling `.tmp` file, syncs it, renames it over `path`, then
    /// syncs the directory when every write must be durable
    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let staging = Self::staging_path(path);

        if let Err(e) = self.write_staged(&staging, contents) {
            let _ = fs::remove_file(&staging);
            return Err(e);
        }

        fs::rename(&staging, path).map_err(|e| {
            let _ = fs::remove_file(&staging);
            e
        })?;

        if self.sync_strategy == SyncStrategy::EveryWrite {
            Self::sync_parent(path)?;
        }
        Ok(())
    }

    fn available_space(&self, dir: &Path) -> io::Result<u64> {
        fs2::available_space(dir)
    }

    fn create_dir_all(&self, dir: &Path) -> io::Result<()> {
        fs::create_dir_all(dir)
    }
}

// =============================================================================
// MemFs
// =============================================================================

/// In-memory file system for tests
///
/// Clones share the same state, so a test can keep a handle after giving one
/// to a store and inspect or sabotage the "disk" between operations.
#[derive(Debug, Clone, Default)]
pub struct MemFs {
    state: Arc<Mutex<MemFsState>>,
}

#[derive(Debug, Default)]
struct MemFsState {
    files: HashMap<PathBuf, Vec<u8>>,
    failing_writes: HashSet<PathBuf>,
    /// `None` means unlimited
    available: Option<u64>,
    space_query_fails: bool,
    writes: usize,
}

impl MemFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a file in place without counting it as a write
    pub fn insert_file(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.state.lock().files.insert(path.into(), contents.into());
    }

    /// Current contents of a file
    pub fn file(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().files.get(path).cloned()
    }

    pub fn remove_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.state.lock().files.remove(path)
    }

    /// Make every later write to `path` fail, leaving the file untouched
    pub fn fail_writes_to(&self, path: impl Into<PathBuf>) {
        self.state.lock().failing_writes.insert(path.into());
    }

    /// Stop injecting write failures
    pub fn clear_write_failures(&self) {
        self.state.lock().failing_writes.clear();
    }

    /// Report `bytes` of free space from now on
    pub fn set_available_space(&self, bytes: u64) {
        self.state.lock().available = Some(bytes);
    }

    /// Make the free space query itself fail
    pub fn fail_space_query(&self, fail: bool) {
        self.state.lock().space_query_fails = fail;
    }

    /// Number of successful `write_file` calls
    pub fn write_count(&self) -> usize {
        self.state.lock().writes
    }
}

impl FileSystem for MemFs {
    fn exists(&self, path: &Path) -> bool {
        self.state.lock().files.contains_key(path)
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.state.lock().files.get(path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }

    fn write_file(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state.lock();
        if state.failing_writes.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("injected write failure for {}", path.display()),
            ));
        }
        state.files.insert(path.to_path_buf(), contents.to_vec());
        state.writes += 1;
        Ok(())
    }

    fn available_space(&self, _dir: &Path) -> io::Result<u64> {
        let state = self.state.lock();
        if state.space_query_fails {
            return Err(io::Error::new(
                io::ErrorKind::Unsupported,
                "injected free space query failure",
            ));
        }
        Ok(state.available.unwrap_or(u64::MAX))
    }

    fn create_dir_all(&self, _dir: &Path) -> io::Result<()> {
        Ok(())
    }
}
