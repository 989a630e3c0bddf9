//! The payload an external distiller hands to the resolver.

use serde::{Deserialize, Serialize};

use super::fact::{Polarity, Scope};
use super::provenance::ProvenanceStrength;

/// An entity mention in an extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedEntity {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub name: String,
}

/// A candidate fact in an extraction.
///
/// `strength` records source fidelity and `supersedes` records replacement
/// intent; the two are kept separate and neither is derived from the other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedFact {
    pub subject: String,
    pub predicate: String,
    pub object: String,
    #[serde(default)]
    pub polarity: Option<Polarity>,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub strength: Option<ProvenanceStrength>,
    #[serde(default)]
    pub quote: Option<String>,
    #[serde(default)]
    pub supersedes: bool,
    #[serde(default)]
    pub scope_hint: Option<Scope>,
}

/// The full extraction payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Extraction {
    #[serde(default)]
    pub entities: Vec<ExtractedEntity>,
    #[serde(default)]
    pub facts: Vec<ExtractedFact>,
    #[serde(default)]
    pub decisions: Vec<serde_json::Value>,
    #[serde(default)]
    pub signals: Vec<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_wire_payload() {
        let json = r#"{
            "entities": [{"type": "db", "name": "PostgreSQL"}],
            "facts": [{"subject": "repo", "predicate": "uses_database",
                       "object": "postgresql", "strength": "stated",
                       "supersedes": true, "scope_hint": "project"}],
            "decisions": [], "signals": []
        }"#;
        let extraction: Extraction = serde_json::from_str(json).unwrap();
        assert_eq!(extraction.entities[0].entity_type, "db");
        let fact = &extraction.facts[0];
        assert_eq!(fact.strength, Some(ProvenanceStrength::Stated));
        assert!(fact.supersedes);
        assert_eq!(fact.scope_hint, Some(Scope::Project));
    }

    #[test]
    fn missing_optional_sections_default_empty() {
        let extraction: Extraction = serde_json::from_str(r#"{"facts": []}"#).unwrap();
        assert!(extraction.entities.is_empty());
        assert!(extraction.decisions.is_empty());
    }
}
