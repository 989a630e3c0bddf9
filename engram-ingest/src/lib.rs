//! # engram-ingest
//!
//! The incremental ingestion pipeline: byte-offset delta reads from
//! transcript files, session metadata and tool-call lifting, sanitization,
//! and the single-transaction write with cursor advancement last.

mod ingester;
pub mod metadata;
pub mod transcript;

pub use ingester::{IngestOutcome, Ingester};
pub use metadata::SessionMetadata;
