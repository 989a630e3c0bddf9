//! Validator output and its append-only health log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// One finding from a validator run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: Severity,
    pub message: String,
}

impl ValidationIssue {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    Healthy,
    Degraded,
    Corrupt,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Healthy => "healthy",
            ValidationStatus::Degraded => "degraded",
            ValidationStatus::Corrupt => "corrupt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "healthy" => Some(ValidationStatus::Healthy),
            "degraded" => Some(ValidationStatus::Degraded),
            "corrupt" => Some(ValidationStatus::Corrupt),
            _ => None,
        }
    }
}

/// One appended row of the validator run log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaHealth {
    pub id: i64,
    pub checked_at: DateTime<Utc>,
    pub schema_version: i64,
    pub validation_status: ValidationStatus,
    pub issues_json: String,
    pub table_counts_json: String,
}
