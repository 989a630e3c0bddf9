//! Shared fixtures: realistic transcript deltas and extraction payloads.

use engram_core::models::{ExtractedEntity, ExtractedFact, Extraction, ProvenanceStrength};

/// A small JSONL transcript with session metadata and one tool round-trip.
pub const TRANSCRIPT_BASIC: &str = concat!(
    r#"{"type":"user","cwd":"/home/dev/project","gitBranch":"main","version":"2.1.0","message":{"content":[{"type":"text","text":"what database should we use?"}]},"timestamp":"2026-07-01T10:00:00Z"}"#,
    "\n",
    r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"toolu_1","name":"Grep","input":{"pattern":"database"}}]},"timestamp":"2026-07-01T10:00:03Z"}"#,
    "\n",
    r#"{"type":"user","message":{"content":[{"type":"tool_result","tool_use_id":"toolu_1","content":"config/database.yml","is_error":false}]},"timestamp":"2026-07-01T10:00:04Z"}"#,
    "\n",
    r#"{"type":"assistant","message":{"content":[{"type":"text","text":"We decided to use postgresql for persistence."}]},"timestamp":"2026-07-01T10:00:09Z"}"#,
    "\n",
);

/// A follow-up chunk appended to [`TRANSCRIPT_BASIC`].
pub const TRANSCRIPT_CONTINUATION: &str = concat!(
    r#"{"type":"user","message":{"content":[{"type":"text","text":"also set up oauth"}]},"timestamp":"2026-07-01T10:05:00Z"}"#,
    "\n",
);

/// A delta carrying a privacy-tagged span.
pub const TRANSCRIPT_WITH_SECRET: &str = concat!(
    r#"{"type":"user","message":{"content":[{"type":"text","text":"the api key is <secret>sk-12345</secret> ok"}]},"timestamp":"2026-07-01T11:00:00Z"}"#,
    "\n",
);

/// An extraction with one subject and one fact for the given slot.
pub fn single_fact_extraction(
    predicate: &str,
    object: &str,
    strength: ProvenanceStrength,
    supersedes: bool,
) -> Extraction {
    Extraction {
        entities: vec![ExtractedEntity {
            entity_type: "repo".to_string(),
            name: "engram".to_string(),
        }],
        facts: vec![ExtractedFact {
            subject: "engram".to_string(),
            predicate: predicate.to_string(),
            object: object.to_string(),
            polarity: None,
            confidence: Some(0.9),
            strength: Some(strength),
            quote: None,
            supersedes,
            scope_hint: None,
        }],
        decisions: Vec::new(),
        signals: Vec::new(),
    }
}
