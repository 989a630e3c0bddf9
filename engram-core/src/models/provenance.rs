//! Evidence linking facts to the content they came from.

use serde::{Deserialize, Serialize};

/// How directly the source supports the fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvenanceStrength {
    /// Explicit in the source.
    Stated,
    /// Derived from the source.
    Inferred,
}

impl ProvenanceStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvenanceStrength::Stated => "stated",
            ProvenanceStrength::Inferred => "inferred",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stated" => Some(ProvenanceStrength::Stated),
            "inferred" => Some(ProvenanceStrength::Inferred),
            _ => None,
        }
    }
}

impl Default for ProvenanceStrength {
    fn default() -> Self {
        ProvenanceStrength::Stated
    }
}

/// Evidence row tying a fact to a content item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provenance {
    pub id: i64,
    pub fact_id: i64,
    pub content_item_id: Option<i64>,
    pub quote: Option<String>,
    pub attribution_entity_id: Option<i64>,
    pub strength: ProvenanceStrength,
}

/// Insertion payload for a provenance row.
#[derive(Debug, Clone)]
pub struct NewProvenance {
    pub fact_id: i64,
    pub content_item_id: Option<i64>,
    pub quote: Option<String>,
    pub attribution_entity_id: Option<i64>,
    pub strength: ProvenanceStrength,
}

impl NewProvenance {
    pub fn stated(fact_id: i64, content_item_id: Option<i64>) -> Self {
        Self {
            fact_id,
            content_item_id,
            quote: None,
            attribution_entity_id: None,
            strength: ProvenanceStrength::Stated,
        }
    }
}
