//! Error types for ClientStore
//!
//! Provides a unified error type for all operations, plus the tri-state
//! [`Outcome`] handed to front-ends.

use thiserror::Error;

/// Result type alias using StoreError
pub type Result<T> = std::result::Result<T, StoreError>;

/// Unified error type for ClientStore operations
#[derive(Debug, Error)]
pub enum StoreError {
    // -------------------------------------------------------------------------
    // Validation Errors
    // -------------------------------------------------------------------------
    #[error("Document {0} is already registered")]
    DuplicateDocument(String),

    #[error("No client with id {0}")]
    NotFound(i32),

    // -------------------------------------------------------------------------
    // Resource Errors
    // -------------------------------------------------------------------------
    #[error("Insufficient disk space: {required} bytes required, {available} available")]
    InsufficientSpace { required: u64, available: u64 },

    #[error("Out of memory: {0}")]
    OutOfMemory(String),

    #[error("Client id space exhausted")]
    IdExhausted,

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Load Errors
    // -------------------------------------------------------------------------
    #[error("Data file corruption detected: {0}")]
    Corruption(String),

    #[error("Mirror parse error on line {line}, field {field}: {message}")]
    MirrorParse {
        line: usize,
        field: &'static str,
        message: String,
    },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Broad class of a [`StoreError`], deciding how a caller reacts to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad request (duplicate document, unknown id). Nothing changed.
    Validation,

    /// Not enough memory, disk space or ids. The mutation was reverted.
    Resource,

    /// Write or flush failed. The mutation was reverted.
    Io,

    /// Unusable data files or configuration. Fatal at startup.
    Corruption,
}

impl StoreError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::DuplicateDocument(_) | StoreError::NotFound(_) => ErrorKind::Validation,
            StoreError::InsufficientSpace { .. }
            | StoreError::OutOfMemory(_)
            | StoreError::IdExhausted => ErrorKind::Resource,
            StoreError::Io(_) => ErrorKind::Io,
            StoreError::Corruption(_) | StoreError::MirrorParse { .. } | StoreError::Config(_) => {
                ErrorKind::Corruption
            }
        }
    }

    /// True for errors the user can fix by changing the request
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}

/// Result of a mutation as seen by a front-end
#[derive(Debug)]
pub enum Outcome<T> {
    /// The change is applied in memory and persisted
    Committed(T),

    /// The request was refused by a validation rule
    Rejected(StoreError),

    /// A resource or I/O failure; the store kept its previous state
    Failed(StoreError),
}

impl<T> Outcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, Outcome::Committed(_))
    }

    /// The committed value, if any
    pub fn committed(self) -> Option<T> {
        match self {
            Outcome::Committed(value) => Some(value),
            _ => None,
        }
    }

    /// The error, if the outcome is not committed
    pub fn error(&self) -> Option<&StoreError> {
        match self {
            Outcome::Committed(_) => None,
            Outcome::Rejected(e) | Outcome::Failed(e) => Some(e),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Committed(value),
            Err(e) if e.is_validation() => Outcome::Rejected(e),
            Err(e) => Outcome::Failed(e),
        }
    }
}
