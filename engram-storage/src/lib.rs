//! # engram-storage
//!
//! SQLite persistence for the Engram memory system: pragmas and connection
//! pool, forward-only migrations, typed query modules, the transaction +
//! busy-retry layering, and the dual-store manager.

pub mod engine;
pub mod manager;
pub mod migrations;
pub mod pool;
pub mod queries;
pub mod retry;

pub use engine::Store;
pub use manager::StoreManager;

use engram_core::errors::{EngramError, StorageError};

/// Wrap an underlying SQLite error message in the storage error kind.
pub(crate) fn to_storage_err(message: impl Into<String>) -> EngramError {
    EngramError::Storage(StorageError::Sqlite {
        message: message.into(),
    })
}
