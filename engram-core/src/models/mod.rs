//! Persisted data model. One file per entity, field names mirroring the
//! SQLite columns they round-trip through.

mod conflict;
mod content_item;
mod delta_cursor;
mod entity;
mod extraction;
mod fact;
mod fact_link;
mod operation_progress;
mod provenance;
mod schema_health;
mod tool_call;

pub use conflict::{Conflict, ConflictStatus};
pub use content_item::{ContentItem, NewContentItem};
pub use delta_cursor::DeltaCursor;
pub use entity::{slug_for, Entity, EntityAlias};
pub use extraction::{ExtractedEntity, ExtractedFact, Extraction};
pub use fact::{Fact, FactStatus, NewFact, Polarity, Scope};
pub use fact_link::{FactLink, LINK_SUPERSEDES};
pub use operation_progress::{OperationProgress, OperationStatus};
pub use provenance::{NewProvenance, Provenance, ProvenanceStrength};
pub use schema_health::{SchemaHealth, Severity, ValidationIssue, ValidationStatus};
pub use tool_call::ToolCall;
