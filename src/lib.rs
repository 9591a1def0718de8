//! # ClientStore
//!
//! A small customer record store with:
//! - Fixed-layout binary data file as the source of truth
//! - `;`-delimited text mirror regenerated on every save
//! - Id ordering maintained across every mutation
//! - Unique ids and unique documents
//! - All-or-nothing mutations: a failed save reverts memory
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Front-end (CLI, menus)                      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ insert / update / delete / find
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    ClientStore                               │
//! │      (id assignment, document uniqueness, revert)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │RecordBuffer │          │ Persistence │
//!   │ sort/search │          │  preflight  │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                      ┌────────────┴────────────┐
//!                      ▼                         ▼
//!               ┌─────────────┐          ┌─────────────┐
//!               │ clientes.dat│          │ clientes.csv│
//!               │  (binary)   │          │  (mirror)   │
//!               └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod store;
pub mod persist;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ErrorKind, Outcome, Result, StoreError};
pub use config::Config;
pub use engine::ClientStore;
pub use record::{ClientData, Code, Record};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of ClientStore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
