//! The resolver state machine.
//!
//! Per incoming fact, a single-cardinality slot settles in one of three
//! ways: an idempotent match (provenance only), a supersession (signal
//! present), or a dispute (contradiction without a signal). All writes for
//! one extraction happen inside the caller's transaction.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::models::{
    slug_for, Extraction, FactStatus, NewFact, NewProvenance, Scope, LINK_SUPERSEDES,
};
use engram_core::traits::IEmbeddingProvider;
use engram_embeddings::EmbeddingGenerator;
use engram_storage::queries::{conflict_ops, entity_ops, fact_ops, link_ops, provenance_ops};

use crate::policy::{Cardinality, PredicatePolicy};

/// Where and when the extraction happened.
#[derive(Debug, Clone, Default)]
pub struct ResolutionContext {
    pub content_item_id: Option<i64>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub project_path: Option<String>,
    pub scope: Scope,
}

/// What one application changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolutionCounters {
    pub entities_created: usize,
    pub facts_created: usize,
    pub facts_superseded: usize,
    pub conflicts_created: usize,
    pub provenance_created: usize,
}

pub struct Resolver {
    policy: PredicatePolicy,
    embeddings: EmbeddingGenerator,
}

impl Resolver {
    pub fn new() -> Self {
        Self::with_policy(PredicatePolicy::new())
    }

    pub fn with_policy(policy: PredicatePolicy) -> Self {
        Self {
            policy,
            embeddings: EmbeddingGenerator::new(),
        }
    }

    /// Apply one extraction to a store: one transaction, busy-retry outside.
    pub fn apply_to_store(
        &self,
        store: &engram_storage::Store,
        extraction: &Extraction,
        ctx: &ResolutionContext,
    ) -> EngramResult<ResolutionCounters> {
        store.transaction_with_retry(|conn| self.apply(conn, extraction, ctx))
    }

    /// Apply one extraction. Must run inside the caller's transaction so a
    /// failure in any provenance, link, or conflict write rolls back the
    /// fact inserts with it.
    pub fn apply(
        &self,
        conn: &Connection,
        extraction: &Extraction,
        ctx: &ResolutionContext,
    ) -> EngramResult<ResolutionCounters> {
        let mut counters = ResolutionCounters::default();
        let mut entity_ids: HashMap<&str, i64> = HashMap::new();

        // Upsert every declared entity once, keyed by name.
        for entity in &extraction.entities {
            let id = self.upsert_entity(conn, &entity.entity_type, &entity.name, &mut counters)?;
            entity_ids.insert(entity.name.as_str(), id);
        }

        for fact in &extraction.facts {
            let subject_id = match entity_ids.get(fact.subject.as_str()) {
                Some(id) => *id,
                None => {
                    let id = self.upsert_entity(conn, "repo", &fact.subject, &mut counters)?;
                    entity_ids.insert(fact.subject.as_str(), id);
                    id
                }
            };

            // The object is an entity reference when the extraction declared
            // it, a literal otherwise.
            let object_entity_id = entity_ids.get(fact.object.as_str()).copied();
            let object_literal = if object_entity_id.is_none() {
                Some(fact.object.clone())
            } else {
                None
            };

            let rule = self.policy.rule_for(&fact.predicate);
            let existing = if rule.cardinality == Cardinality::Single {
                fact_ops::facts_for_slot(conn, subject_id, &fact.predicate, FactStatus::Active)?
            } else {
                Vec::new()
            };

            if !existing.is_empty() {
                // Idempotent match: same object already active in the slot.
                let matched = existing.iter().find(|candidate| {
                    let literal_match = match (&candidate.object_literal, &object_literal) {
                        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                        _ => false,
                    };
                    let entity_match = object_entity_id.is_some()
                        && candidate.object_entity_id == object_entity_id;
                    literal_match || entity_match
                });
                if let Some(candidate) = matched {
                    provenance_ops::insert_provenance(
                        conn,
                        &NewProvenance {
                            fact_id: candidate.id,
                            content_item_id: ctx.content_item_id,
                            quote: fact.quote.clone(),
                            attribution_entity_id: None,
                            strength: fact.strength.unwrap_or_default(),
                        },
                    )?;
                    counters.provenance_created += 1;
                    continue;
                }

                let new_fact = self.build_fact(
                    fact,
                    subject_id,
                    object_entity_id,
                    object_literal.clone(),
                    ctx,
                )?;

                let signaled = fact.strength
                    == Some(engram_core::models::ProvenanceStrength::Stated)
                    || fact.supersedes;
                if signaled {
                    // Replace every matching active fact.
                    let valid_to = ctx.occurred_at.unwrap_or_else(Utc::now);
                    let new_id = fact_ops::insert_fact(conn, &new_fact)?;
                    for old in &existing {
                        fact_ops::update_fact_status(
                            conn,
                            old.id,
                            FactStatus::Superseded,
                            Some(valid_to),
                        )?;
                        link_ops::insert_fact_link(conn, new_id, old.id, LINK_SUPERSEDES)?;
                        counters.facts_superseded += 1;
                    }
                    counters.facts_created += 1;
                    self.attach_provenance(conn, new_id, fact, ctx, &mut counters)?;
                } else {
                    // Contradiction without a signal: record, don't replace.
                    let mut disputed = new_fact;
                    disputed.status = FactStatus::Disputed;
                    let new_id = fact_ops::insert_fact(conn, &disputed)?;
                    conflict_ops::insert_conflict(
                        conn,
                        new_id,
                        existing[0].id,
                        Some(&format!("Contradicting {} claims", fact.predicate)),
                    )?;
                    counters.facts_created += 1;
                    counters.conflicts_created += 1;
                    self.attach_provenance(conn, new_id, fact, ctx, &mut counters)?;
                }
                continue;
            }

            // Multi-cardinality, or an empty slot.
            let new_fact =
                self.build_fact(fact, subject_id, object_entity_id, object_literal, ctx)?;
            let new_id = fact_ops::insert_fact(conn, &new_fact)?;
            counters.facts_created += 1;
            self.attach_provenance(conn, new_id, fact, ctx, &mut counters)?;
        }

        tracing::debug!(
            entities = counters.entities_created,
            facts = counters.facts_created,
            superseded = counters.facts_superseded,
            conflicts = counters.conflicts_created,
            "extraction applied"
        );
        Ok(counters)
    }

    fn upsert_entity(
        &self,
        conn: &Connection,
        entity_type: &str,
        name: &str,
        counters: &mut ResolutionCounters,
    ) -> EngramResult<i64> {
        let slug = slug_for(entity_type, name);
        if let Some(entity) = entity_ops::entity_by_slug(conn, &slug)? {
            // A different surface form of a known entity becomes an alias.
            if entity.canonical_name != name {
                entity_ops::add_alias(conn, entity.id, name, Some("extraction"), 0.9)?;
            }
            return Ok(entity.id);
        }
        let entity = entity_ops::find_or_create_entity(conn, entity_type, name)?;
        counters.entities_created += 1;
        Ok(entity.id)
    }

    fn build_fact(
        &self,
        fact: &engram_core::models::ExtractedFact,
        subject_id: i64,
        object_entity_id: Option<i64>,
        object_literal: Option<String>,
        ctx: &ResolutionContext,
    ) -> EngramResult<NewFact> {
        let scope = fact.scope_hint.unwrap_or(ctx.scope);
        let vector = self.embeddings.embed(&format!(
            "{} {} {}",
            fact.subject, fact.predicate, fact.object
        ))?;

        Ok(NewFact {
            subject_entity_id: subject_id,
            predicate: fact.predicate.clone(),
            object_entity_id,
            object_literal,
            datatype: None,
            polarity: fact.polarity.unwrap_or_default(),
            valid_from: ctx.occurred_at.unwrap_or_else(Utc::now),
            status: FactStatus::Active,
            confidence: fact.confidence.unwrap_or(1.0).clamp(0.0, 1.0),
            created_from: ctx
                .content_item_id
                .map(|id| format!("content:{id}"))
                .or_else(|| Some("extraction".to_string())),
            scope,
            project_path: match scope {
                Scope::Project => ctx.project_path.clone(),
                Scope::Global => None,
            },
            embedding_json: Some(serde_json::to_string(&vector)?),
        })
    }

    fn attach_provenance(
        &self,
        conn: &Connection,
        fact_id: i64,
        fact: &engram_core::models::ExtractedFact,
        ctx: &ResolutionContext,
        counters: &mut ResolutionCounters,
    ) -> EngramResult<()> {
        provenance_ops::insert_provenance(
            conn,
            &NewProvenance {
                fact_id,
                content_item_id: ctx.content_item_id,
                quote: fact.quote.clone(),
                attribution_entity_id: None,
                strength: fact.strength.unwrap_or_default(),
            },
        )?;
        counters.provenance_created += 1;
        Ok(())
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
