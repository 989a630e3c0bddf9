//! Progressive disclosure: a cheap index pass, then batched detail pulls.

use std::collections::HashMap;

use engram_core::errors::EngramResult;
use engram_core::models::{Entity, Fact, Provenance};
use engram_storage::queries::{entity_ops, fact_ops, provenance_ops};
use engram_storage::{Store, StoreManager};

use crate::recall::{recall_recent, RecallScope, SourceStore};
use crate::tokens::truncate_to_tokens;

/// One row of the index projection: enough to decide whether to pull
/// details, sized by the token estimator.
#[derive(Debug, Clone)]
pub struct IndexEntry {
    pub fact_id: i64,
    pub source: SourceStore,
    pub subject_slug: String,
    pub predicate: String,
    pub preview: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Full projection for a fact: entity joins and provenance.
#[derive(Debug, Clone)]
pub struct FactDetails {
    pub fact: Fact,
    pub subject: Option<Entity>,
    pub object: Option<Entity>,
    pub provenance: Vec<Provenance>,
}

/// The index form of recall: truncated previews, newest first.
pub fn recall_index(
    manager: &StoreManager,
    scope: RecallScope,
    limit: usize,
    preview_tokens: usize,
) -> EngramResult<Vec<IndexEntry>> {
    let results = recall_recent(manager, scope, limit)?;
    Ok(results
        .into_iter()
        .map(|result| {
            let object = result
                .fact
                .object_literal
                .clone()
                .unwrap_or_else(|| format!("entity #{}", result.fact.object_entity_id.unwrap_or(0)));
            let preview = truncate_to_tokens(
                &format!("{} {} {object}", result.subject_name, result.fact.predicate),
                preview_tokens,
            );
            IndexEntry {
                fact_id: result.fact.id,
                source: result.source,
                subject_slug: result.subject_slug,
                predicate: result.fact.predicate.clone(),
                preview,
                created_at: result.fact.created_at,
            }
        })
        .collect())
}

/// The detail form: exactly three queries regardless of how many facts are
/// requested (facts, their provenance, every referenced entity).
pub fn recall_details(store: &Store, fact_ids: &[i64]) -> EngramResult<Vec<FactDetails>> {
    store.read(|conn| {
        let facts = fact_ops::facts_by_ids(conn, fact_ids)?;

        let provenance = provenance_ops::provenance_for_facts(conn, fact_ids)?;
        let mut provenance_by_fact: HashMap<i64, Vec<Provenance>> = HashMap::new();
        for p in provenance {
            provenance_by_fact.entry(p.fact_id).or_default().push(p);
        }

        let mut entity_ids: Vec<i64> = Vec::new();
        for fact in &facts {
            entity_ids.push(fact.subject_entity_id);
            if let Some(id) = fact.object_entity_id {
                entity_ids.push(id);
            }
        }
        entity_ids.sort_unstable();
        entity_ids.dedup();
        let entities: HashMap<i64, Entity> = entity_ops::entities_by_ids(conn, &entity_ids)?
            .into_iter()
            .map(|entity| (entity.id, entity))
            .collect();

        Ok(facts
            .into_iter()
            .map(|fact| {
                let subject = entities.get(&fact.subject_entity_id).cloned();
                let object = fact.object_entity_id.and_then(|id| entities.get(&id).cloned());
                let provenance = provenance_by_fact.remove(&fact.id).unwrap_or_default();
                FactDetails {
                    fact,
                    subject,
                    object,
                    provenance,
                }
            })
            .collect())
    })
}
