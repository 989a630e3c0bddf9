//! Embedding regeneration after a vectorizer change.

use engram_core::errors::EngramResult;
use engram_core::traits::IEmbeddingProvider;
use engram_storage::queries::{entity_ops, fact_ops, operation_ops};
use engram_storage::Store;

use crate::generator::EmbeddingGenerator;

/// Regenerate stored vectors for up to `limit` facts, tracking the pass as
/// a long-running operation. Returns the number of facts rewritten.
///
/// Call after bumping [`crate::EMBEDDING_SCHEMA_VERSION`]: stored vectors
/// produced by an older vectorizer are not comparable to fresh queries.
pub fn backfill_embeddings(
    store: &Store,
    generator: &EmbeddingGenerator,
    limit: usize,
) -> EngramResult<usize> {
    let facts = store.facts_with_embeddings(limit)?;
    if facts.is_empty() {
        return Ok(0);
    }

    let operation_id = store.transaction(|conn| {
        operation_ops::start_operation(conn, "embedding_backfill", "store", facts.len() as i64)
    })?;

    let result = store.transaction_with_retry(|conn| {
        let mut updated = 0usize;
        for fact in &facts {
            let subject = entity_ops::get_entity(conn, fact.subject_entity_id)?;
            let object = match fact.object_entity_id {
                Some(id) => entity_ops::get_entity(conn, id)?.map(|e| e.canonical_name),
                None => fact.object_literal.clone(),
            };
            let text = format!(
                "{} {} {}",
                subject.map(|e| e.canonical_name).unwrap_or_default(),
                fact.predicate,
                object.unwrap_or_default()
            );
            let vector = generator.embed(&text)?;
            let embedding_json = serde_json::to_string(&vector)?;
            fact_ops::update_fact_embedding(conn, fact.id, &embedding_json)?;
            updated += 1;
            operation_ops::update_progress(conn, operation_id, updated as i64, None)?;
        }
        Ok(updated)
    });

    let status = if result.is_ok() {
        engram_core::models::OperationStatus::Completed
    } else {
        engram_core::models::OperationStatus::Failed
    };
    store.transaction(|conn| operation_ops::finish_operation(conn, operation_id, status))?;

    let updated = result?;
    tracing::info!(updated, "embedding backfill finished");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_core::models::NewFact;

    #[test]
    fn backfill_rewrites_existing_vectors() {
        let store = Store::open_in_memory().unwrap();
        let generator = EmbeddingGenerator::new();

        let subject = store.find_or_create_entity("repo", "engram").unwrap();
        let mut fact = NewFact::new(subject.id, "uses_database");
        fact.object_literal = Some("postgresql".to_string());
        // A stale vector from an older vectorizer.
        fact.embedding_json = Some(serde_json::to_string(&vec![0.0f32; 384]).unwrap());
        let fact_id = store.insert_fact(&fact).unwrap();

        let updated = backfill_embeddings(&store, &generator, 100).unwrap();
        assert_eq!(updated, 1);

        let stored = store.get_fact(fact_id).unwrap().unwrap();
        let vector: Vec<f32> =
            serde_json::from_str(stored.embedding_json.as_deref().unwrap()).unwrap();
        assert_eq!(vector.len(), 384);
        assert!(vector.iter().any(|&x| x != 0.0));
    }

    #[test]
    fn backfill_with_no_embedded_facts_is_a_no_op() {
        let store = Store::open_in_memory().unwrap();
        let generator = EmbeddingGenerator::new();
        assert_eq!(backfill_embeddings(&store, &generator, 100).unwrap(), 0);
    }
}
