//! The dual-store fan-out template and its entry points.

use std::collections::{HashMap, HashSet};

use engram_core::errors::EngramResult;
use engram_core::models::{ContentItem, Entity, Fact, Scope};
use engram_core::traits::IEmbeddingProvider;
use engram_embeddings::{top_k, EmbeddingGenerator};
use engram_storage::queries::entity_ops;
use engram_storage::{Store, StoreManager};

/// Which stores a recall query fans out to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecallScope {
    All,
    Project,
    Global,
}

impl RecallScope {
    fn includes_project(self) -> bool {
        matches!(self, RecallScope::All | RecallScope::Project)
    }

    fn includes_global(self) -> bool {
        matches!(self, RecallScope::All | RecallScope::Global)
    }
}

/// Which store a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStore {
    Project,
    Global,
}

impl SourceStore {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStore::Project => "project",
            SourceStore::Global => "global",
        }
    }
}

/// One recalled fact, annotated with its subject and source store.
#[derive(Debug, Clone)]
pub struct RecallResult {
    pub fact: Fact,
    pub subject_slug: String,
    pub subject_name: String,
    pub source: SourceStore,
}

/// Post-merge admission predicate.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    scope: RecallScope,
    project_path: Option<String>,
}

impl ScopeFilter {
    pub fn new(scope: RecallScope, project_path: Option<String>) -> Self {
        Self {
            scope,
            project_path,
        }
    }

    pub fn admits(&self, fact: &Fact) -> bool {
        match self.scope {
            RecallScope::All => true,
            RecallScope::Project => {
                fact.scope == Scope::Project && fact.project_path == self.project_path
            }
            RecallScope::Global => fact.scope == Scope::Global,
        }
    }
}

/// Fan a per-store query out to the stores `scope` names, annotate each
/// result with its source, filter, sort newest-first, deduplicate across
/// stores, and truncate to `limit`.
pub fn recall_with<F>(
    manager: &StoreManager,
    scope: RecallScope,
    limit: usize,
    query_fn: F,
) -> EngramResult<Vec<RecallResult>>
where
    F: Fn(&Store) -> EngramResult<Vec<Fact>>,
{
    let mut merged = Vec::new();

    if scope.includes_project() {
        if let Some(project) = manager.project_store()? {
            let facts = query_fn(project)?;
            merged.extend(annotate(project, facts, SourceStore::Project)?);
        }
    }
    if scope.includes_global() {
        let global = manager.global_store();
        let facts = query_fn(global)?;
        merged.extend(annotate(global, facts, SourceStore::Global)?);
    }

    let filter = ScopeFilter::new(
        scope,
        manager.project_path().map(|p| p.display().to_string()),
    );
    merged.retain(|result| filter.admits(&result.fact));

    merged.sort_by(|a, b| {
        b.fact
            .created_at
            .cmp(&a.fact.created_at)
            .then_with(|| b.fact.id.cmp(&a.fact.id))
    });
    dedupe(&mut merged);
    merged.truncate(limit);
    tracing::debug!(scope = ?scope, results = merged.len(), "recall fan-out merged");
    Ok(merged)
}

/// Most recently created facts across the selected stores.
pub fn recall_recent(
    manager: &StoreManager,
    scope: RecallScope,
    limit: usize,
) -> EngramResult<Vec<RecallResult>> {
    recall_with(manager, scope, limit, |store| store.recent_facts(limit))
}

/// Semantic recall: embed the query, rank stored vectors per store, merge
/// by similarity.
pub fn recall_semantic(
    manager: &StoreManager,
    scope: RecallScope,
    query: &str,
    limit: usize,
) -> EngramResult<Vec<(RecallResult, f32)>> {
    const CANDIDATE_POOL: usize = 512;

    let generator = EmbeddingGenerator::new();
    let query_vector = generator.embed(query)?;

    let mut merged: Vec<(RecallResult, f32)> = Vec::new();
    let mut gather = |store: &Store, source: SourceStore| -> EngramResult<()> {
        let facts = store.facts_with_embeddings(CANDIDATE_POOL)?;
        let candidates: Vec<(Fact, Vec<f32>)> = facts
            .into_iter()
            .filter_map(|fact| {
                let json = fact.embedding_json.as_deref()?;
                let vector: Vec<f32> = serde_json::from_str(json).ok()?;
                Some((fact, vector))
            })
            .collect();
        let ranked = top_k(&query_vector, candidates, limit);
        let annotated = annotate(
            store,
            ranked.iter().map(|(fact, _)| fact.clone()).collect(),
            source,
        )?;
        merged.extend(
            annotated
                .into_iter()
                .zip(ranked.into_iter().map(|(_, score)| score)),
        );
        Ok(())
    };

    if scope.includes_project() {
        if let Some(project) = manager.project_store()? {
            gather(project, SourceStore::Project)?;
        }
    }
    if scope.includes_global() {
        gather(manager.global_store(), SourceStore::Global)?;
    }

    let filter = ScopeFilter::new(
        scope,
        manager.project_path().map(|p| p.display().to_string()),
    );
    merged.retain(|(result, _)| filter.admits(&result.fact));

    merged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let mut seen = HashSet::new();
    merged.retain(|(result, _)| seen.insert(dedupe_key(result)));
    merged.truncate(limit);
    Ok(merged)
}

/// Lexical recall over indexed content, newest hits first per store rank.
pub fn recall_lexical(
    manager: &StoreManager,
    scope: RecallScope,
    query: &str,
    limit: usize,
) -> EngramResult<Vec<(ContentItem, SourceStore)>> {
    let mut merged = Vec::new();

    if scope.includes_project() {
        if let Some(project) = manager.project_store()? {
            for item in project.search_content(query, limit)? {
                merged.push((item, SourceStore::Project));
            }
        }
    }
    if scope.includes_global() {
        for item in manager.global_store().search_content(query, limit)? {
            merged.push((item, SourceStore::Global));
        }
    }

    merged.truncate(limit);
    Ok(merged)
}

/// Join subject entities in one batched query and attach the source tag.
fn annotate(
    store: &Store,
    facts: Vec<Fact>,
    source: SourceStore,
) -> EngramResult<Vec<RecallResult>> {
    let subject_ids: Vec<i64> = facts
        .iter()
        .map(|fact| fact.subject_entity_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let entities: HashMap<i64, Entity> = store
        .read(|conn| entity_ops::entities_by_ids(conn, &subject_ids))?
        .into_iter()
        .map(|entity| (entity.id, entity))
        .collect();

    Ok(facts
        .into_iter()
        .map(|fact| {
            let (slug, name) = entities
                .get(&fact.subject_entity_id)
                .map(|e| (e.slug.clone(), e.canonical_name.clone()))
                .unwrap_or_default();
            RecallResult {
                fact,
                subject_slug: slug,
                subject_name: name,
                source,
            }
        })
        .collect())
}

/// Cross-store identity: same slot and object means the same fact.
fn dedupe_key(result: &RecallResult) -> (String, String, String) {
    let object = result
        .fact
        .object_literal
        .as_deref()
        .map(str::to_lowercase)
        .or_else(|| result.fact.object_entity_id.map(|id| format!("#{id}")))
        .unwrap_or_default();
    (
        result.subject_slug.clone(),
        result.fact.predicate.clone(),
        object,
    )
}

fn dedupe(results: &mut Vec<RecallResult>) {
    let mut seen = HashSet::new();
    results.retain(|result| seen.insert(dedupe_key(result)));
}
