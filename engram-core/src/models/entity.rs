//! Named things facts attach to.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named entity, unique by slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub entity_type: String,
    pub canonical_name: String,
    pub slug: String,
    pub created_at: DateTime<Utc>,
}

/// Build the unique slug for an entity: `type:canonical_name` lowercased,
/// runs of non-alphanumerics collapsed to a single `_`, trimmed.
pub fn slug_for(entity_type: &str, canonical_name: &str) -> String {
    let raw = format!("{entity_type}:{canonical_name}").to_lowercase();
    let mut slug = String::with_capacity(raw.len());
    let mut last_was_sep = false;
    for c in raw.chars() {
        if c.is_alphanumeric() {
            slug.push(c);
            last_was_sep = false;
        } else if !last_was_sep {
            slug.push('_');
            last_was_sep = true;
        }
    }
    slug.trim_matches('_').to_string()
}

/// An alternative surface form for an entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityAlias {
    pub id: i64,
    pub entity_id: i64,
    pub alias: String,
    pub source: Option<String>,
    /// Confidence in [0, 1].
    pub confidence: f64,
}
