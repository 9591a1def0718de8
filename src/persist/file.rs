//! File-backed persistence
//!
//! Binary data file plus text mirror in one directory.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::error::Result;
use crate::record::{decode_all, encode_all, Record};

use super::fs::{FileSystem, OsFs};
use super::{mirror, preflight, LoadSource, Loaded, Persistence};

/// Persistence over a [`FileSystem`]
#[derive(Debug)]
pub struct FileStore<F: FileSystem = OsFs> {
    /// File system capability (real or fake)
    fs: F,

    /// Directory holding both files (queried for free space)
    dir: PathBuf,

    binary_path: PathBuf,
    mirror_path: PathBuf,

    /// Extra free bytes required by the preflight
    space_margin: u64,
}

impl FileStore<OsFs> {
    /// Open on the real file system, creating the data directory
    pub fn open(config: &Config) -> Result<Self> {
        Self::with_fs(config, OsFs::new(config.sync_strategy))
    }
}

impl<F: FileSystem> FileStore<F> {
    /// Open on an arbitrary file system
    pub fn with_fs(config: &Config, fs: F) -> Result<Self> {
        config.validate()?;
        fs.create_dir_all(&config.data_dir)?;

        Ok(Self {
            fs,
            dir: config.data_dir.clone(),
            binary_path: config.binary_path(),
            mirror_path: config.mirror_path(),
            space_margin: config.space_margin,
        })
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    pub fn mirror_path(&self) -> &Path {
        &self.mirror_path
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }
}

impl<F: FileSystem> Persistence for FileStore<F> {
    fn load(&mut self) -> Result<Loaded> {
        if self.fs.exists(&self.binary_path) {
            let data = self.fs.read(&self.binary_path)?;
            let records = decode_all(&data)?;
            tracing::info!(
                "Loaded {} records from {}",
                records.len(),
                self.binary_path.display()
            );
            return Ok(Loaded {
                records,
                source: LoadSource::Binary,
            });
        }

        if self.fs.exists(&self.mirror_path) {
            let data = self.fs.read(&self.mirror_path)?;
            let records = mirror::parse(&data)?;
            tracing::info!(
                "Binary file missing, imported {} records from mirror {}",
                records.len(),
                self.mirror_path.display()
            );
            return Ok(Loaded {
                records,
                source: LoadSource::Mirror,
            });
        }

        tracing::info!("No data files in {}, starting empty", self.dir.display());
        Ok(Loaded {
            records: Vec::new(),
            source: LoadSource::Empty,
        })
    }

    fn save(&mut self, records: &[Record]) -> Result<()> {
        let binary = encode_all(records);
        let mirror = mirror::render(records);

        let required = preflight::estimate(records.len(), mirror.len(), self.space_margin);
        preflight::check(&self.fs, &self.dir, required)?;

        self.fs.write_file(&self.binary_path, &binary)?;
        self.fs.write_file(&self.mirror_path, &mirror)?;

        tracing::debug!(
            records = records.len(),
            binary_bytes = binary.len(),
            mirror_bytes = mirror.len(),
            "Saved store"
        );
        Ok(())
    }
}
