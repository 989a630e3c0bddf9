//! Subject–predicate–object tuples with truth-maintenance state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Whether a fact asserts or denies its predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Polarity::Positive => "positive",
            Polarity::Negative => "negative",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "positive" => Some(Polarity::Positive),
            "negative" => Some(Polarity::Negative),
            _ => None,
        }
    }
}

impl Default for Polarity {
    fn default() -> Self {
        Polarity::Positive
    }
}

/// Truth-maintenance lifecycle state of a fact.
///
/// `Active` on creation. The resolver moves facts to `Superseded` (setting
/// `valid_to`) or creates them directly as `Disputed`; the sweeper moves
/// stale `Proposed`/`Disputed` facts to `Expired`. The resolver never
/// deletes a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactStatus {
    Active,
    Superseded,
    Disputed,
    Proposed,
    Expired,
}

impl FactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FactStatus::Active => "active",
            FactStatus::Superseded => "superseded",
            FactStatus::Disputed => "disputed",
            FactStatus::Proposed => "proposed",
            FactStatus::Expired => "expired",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(FactStatus::Active),
            "superseded" => Some(FactStatus::Superseded),
            "disputed" => Some(FactStatus::Disputed),
            "proposed" => Some(FactStatus::Proposed),
            "expired" => Some(FactStatus::Expired),
            _ => None,
        }
    }
}

/// Which store a fact belongs to. Global facts carry no project path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Project,
    Global,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Project => "project",
            Scope::Global => "global",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "project" => Some(Scope::Project),
            "global" => Some(Scope::Global),
            _ => None,
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Scope::Project
    }
}

/// A stored fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fact {
    pub id: i64,
    pub subject_entity_id: i64,
    pub predicate: String,
    pub object_entity_id: Option<i64>,
    pub object_literal: Option<String>,
    pub datatype: Option<String>,
    pub polarity: Polarity,
    pub valid_from: DateTime<Utc>,
    pub valid_to: Option<DateTime<Utc>>,
    pub status: FactStatus,
    /// Confidence in [0, 1].
    pub confidence: f64,
    pub created_from: Option<String>,
    pub created_at: DateTime<Utc>,
    pub scope: Scope,
    pub project_path: Option<String>,
    /// JSON array of exactly `EMBEDDING_DIM` floats when present.
    pub embedding_json: Option<String>,
}

/// Insertion payload for a fact. The store mints `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewFact {
    pub subject_entity_id: i64,
    pub predicate: String,
    pub object_entity_id: Option<i64>,
    pub object_literal: Option<String>,
    pub datatype: Option<String>,
    pub polarity: Polarity,
    pub valid_from: DateTime<Utc>,
    pub status: FactStatus,
    pub confidence: f64,
    pub created_from: Option<String>,
    pub scope: Scope,
    pub project_path: Option<String>,
    pub embedding_json: Option<String>,
}

impl NewFact {
    /// A positive, active, project-scoped fact with full confidence.
    pub fn new(subject_entity_id: i64, predicate: impl Into<String>) -> Self {
        Self {
            subject_entity_id,
            predicate: predicate.into(),
            object_entity_id: None,
            object_literal: None,
            datatype: None,
            polarity: Polarity::Positive,
            valid_from: Utc::now(),
            status: FactStatus::Active,
            confidence: 1.0,
            created_from: None,
            scope: Scope::Project,
            project_path: None,
            embedding_json: None,
        }
    }
}
