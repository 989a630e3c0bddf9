/// Ingestion pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("ingestion failed for session {session_id}: {reason}")]
    Failed { session_id: String, reason: String },
}
