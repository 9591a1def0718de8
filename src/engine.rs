//! Engine Module
//!
//! The record store that coordinates memory and persistence.
//!
//! ## Responsibilities
//! - Load the store on startup (rebuilding the binary file from the mirror)
//! - Assign ids and enforce document uniqueness
//! - Keep records sorted by id after every mutation
//! - Persist every mutation, reverting it in memory when the save fails

use std::collections::HashSet;

use crate::config::Config;
use crate::error::{ErrorKind, Result, StoreError};
use crate::persist::{FileStore, LoadSource, Loaded, Persistence};
use crate::record::{ClientData, Document, Record};
use crate::store::{search_by_id, sort_by_id, NameIndex, RecordBuffer};

/// The customer record store
///
/// ## Invariants (after every completed call)
/// - records are sorted by strictly increasing id
/// - no two records share a document
/// - memory matches the last successful save, or the call returned an error
///   and memory was put back as it was
pub struct ClientStore<P: Persistence = FileStore> {
    /// Live records, sorted by id
    records: RecordBuffer,

    /// Storage backend
    persistence: P,

    /// Memory may differ from what was last saved
    dirty: bool,
}

/// Inverse of an applied mutation
#[derive(Debug)]
enum Undo {
    /// Drop the appended last record
    Append,

    /// Put back the previous field values
    Restore { index: usize, previous: Record },

    /// Put a deleted record back where it was
    Reinsert { index: usize, record: Record },
}

impl ClientStore<FileStore> {
    /// Open the store described by `config` on the real file system
    pub fn open(config: Config) -> Result<Self> {
        tracing::info!("Opening client store in {}", config.data_dir.display());
        let persistence = FileStore::open(&config)?;
        Self::with_persistence(persistence)
    }
}

impl<P: Persistence> ClientStore<P> {
    /// Load the store through `persistence`
    ///
    /// On startup:
    /// 1. Load records (binary file, else mirror, else nothing)
    /// 2. Sort by id and reject duplicate ids or documents
    /// 3. If the records came from the mirror, save at once so the binary
    ///    file is rebuilt
    pub fn with_persistence(mut persistence: P) -> Result<Self> {
        let Loaded {
            mut records,
            source,
        } = persistence.load()?;

        sort_by_id(&mut records);
        Self::check_loaded(&records)?;

        let mut store = Self {
            records: RecordBuffer::from_records(records)?,
            persistence,
            dirty: false,
        };

        if source == LoadSource::Mirror && !store.records.is_empty() {
            tracing::info!(
                "Rebuilding binary file from {} mirror records",
                store.records.len()
            );
            store.save()?;
        }

        Ok(store)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Insert a new client, assigning the next id
    ///
    /// Fails with `DuplicateDocument` if the document is taken.
    pub fn insert(&mut self, data: ClientData) -> Result<Record> {
        let id = self.next_id()?;
        self.ensure_document_free(&data.document, None)?;

        let record = data.into_record(id);
        self.records.append(record.clone())?;
        self.commit(Undo::Append)?;

        tracing::debug!(id, document = %record.document, "Inserted client");
        Ok(record)
    }

    /// Replace every field but the id of client `id`
    ///
    /// Fails with `NotFound` or, if another client holds the new document,
    /// `DuplicateDocument`.
    pub fn update(&mut self, id: i32, data: ClientData) -> Result<Record> {
        let index = self.index_of(id)?;
        self.ensure_document_free(&data.document, Some(index))?;

        let Some(slot) = self.records.get_mut(index) else {
            return Err(StoreError::NotFound(id));
        };
        let previous = std::mem::replace(slot, data.into_record(id));
        self.commit(Undo::Restore { index, previous })?;

        tracing::debug!(id, "Updated client");
        Ok(self.records[index].clone())
    }

    /// Remove client `id`, returning the removed record
    pub fn delete(&mut self, id: i32) -> Result<Record> {
        let index = self.index_of(id)?;

        let removed = self.records.remove_at(index);
        self.commit(Undo::Reinsert {
            index,
            record: removed.clone(),
        })?;

        tracing::debug!(id, "Deleted client");
        Ok(removed)
    }

    /// Persist the current state in full
    pub fn save(&mut self) -> Result<()> {
        sort_by_id(self.records.as_mut_slice());
        self.persistence.save(self.records.as_slice())?;
        self.dirty = false;
        Ok(())
    }

    /// Save pending changes (if any) and release the store
    pub fn close(mut self) -> Result<()> {
        if self.dirty {
            self.save()?;
        }
        Ok(())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Client with this id
    pub fn find_by_id(&self, id: i32) -> Option<&Record> {
        search_by_id(self.records.as_slice(), id).map(|index| &self.records[index])
    }

    /// A client whose full name equals `name`, ignoring ASCII case
    ///
    /// Builds a throwaway name index, O(n²) in the store size. The id order
    /// of the store is untouched.
    pub fn find_by_name(&self, name: &str) -> Option<&Record> {
        let index = NameIndex::build(self.records.as_slice());
        index.find(name).map(|position| &self.records[position])
    }

    /// All clients in id order
    pub fn records(&self) -> &[Record] {
        self.records.as_slice()
    }

    /// Id the next insert will receive
    pub fn next_id(&self) -> Result<i32> {
        match self.records.as_slice().last() {
            Some(last) => last.id.checked_add(1).ok_or(StoreError::IdExhausted),
            None => Ok(1),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reserved record slots (never shrinks)
    pub fn capacity(&self) -> usize {
        self.records.capacity()
    }

    /// Memory may differ from the files on disk
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn index_of(&self, id: i32) -> Result<usize> {
        search_by_id(self.records.as_slice(), id).ok_or(StoreError::NotFound(id))
    }

    /// Fail if a record other than `skip` already holds `document`
    fn ensure_document_free(&self, document: &Document, skip: Option<usize>) -> Result<()> {
        let taken = self
            .records
            .iter()
            .enumerate()
            .any(|(i, r)| Some(i) != skip && r.document == *document);

        if taken {
            return Err(StoreError::DuplicateDocument(document.to_string()));
        }
        Ok(())
    }

    /// Re-sort, save, and undo the mutation if the save fails
    fn commit(&mut self, undo: Undo) -> Result<()> {
        let was_dirty = self.dirty;
        self.dirty = true;

        sort_by_id(self.records.as_mut_slice());
        let err = match self.persistence.save(self.records.as_slice()) {
            Ok(()) => {
                self.dirty = false;
                return Ok(());
            }
            Err(e) => e,
        };

        tracing::warn!("Save failed, reverting change: {}", err);
        self.revert(undo);
        self.dirty = was_dirty;

        // The binary file may already hold the reverted change.
        if err.kind() == ErrorKind::Io {
            if let Err(restore) = self.persistence.save(self.records.as_slice()) {
                tracing::warn!("Could not restore data files to last good state: {}", restore);
                self.dirty = true;
            }
        }

        Err(err)
    }

    fn revert(&mut self, undo: Undo) {
        match undo {
            Undo::Append => {
                self.records.pop();
            }
            Undo::Restore { index, previous } => {
                if let Some(slot) = self.records.get_mut(index) {
                    *slot = previous;
                }
            }
            Undo::Reinsert { index, record } => {
                // Capacity never shrinks, so the freed slot is still reserved.
                if let Err(e) = self.records.insert_at(index, record) {
                    tracing::error!("Could not reinsert deleted record: {}", e);
                }
            }
        }
    }

    /// Reject a loaded set (sorted by id) that breaks the uniqueness rules
    fn check_loaded(records: &[Record]) -> Result<()> {
        if let Some(pair) = records.windows(2).find(|pair| pair[0].id == pair[1].id) {
            return Err(StoreError::Corruption(format!(
                "id {} appears more than once",
                pair[0].id
            )));
        }

        let mut documents = HashSet::with_capacity(records.len());
        for record in records {
            if !documents.insert(record.document.as_bytes()) {
                return Err(StoreError::Corruption(format!(
                    "document {} appears more than once",
                    record.document
                )));
            }
        }
        Ok(())
    }
}
