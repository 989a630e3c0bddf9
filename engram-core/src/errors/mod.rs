//! Error taxonomy. One domain sub-enum per subsystem, folded into
//! [`EngramError`] via `#[from]`.

mod ingest_error;
mod storage_error;

pub use ingest_error::IngestError;
pub use storage_error::StorageError;

/// Result alias used by every fallible function in the workspace.
pub type EngramResult<T> = Result<T, EngramError>;

/// Top-level error for the Engram memory system.
#[derive(Debug, thiserror::Error)]
pub enum EngramError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// A caller omitted a field the operation cannot proceed without.
    #[error("missing required field: {field}")]
    Payload { field: &'static str },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngramError {
    /// Whether this error is SQLite lock contention, eligible for back-off
    /// and retry. Matches on the message because rusqlite surfaces busy and
    /// locked states as extended error strings.
    pub fn is_busy(&self) -> bool {
        match self {
            EngramError::Storage(StorageError::Sqlite { message }) => {
                let lower = message.to_lowercase();
                lower.contains("busy") || lower.contains("locked")
            }
            _ => false,
        }
    }
}
