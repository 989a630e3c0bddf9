//! # engram-validation
//!
//! The schema validator: structural checks, referential orphan counts,
//! value-domain checks, and an append-only health log. Plus the operation
//! tracker that detects and resets crashed long-running operations.

mod tracker;
mod validator;

pub use tracker::OperationTracker;
pub use validator::{validate, ValidationReport};
