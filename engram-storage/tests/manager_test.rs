//! Dual-store routing and fact promotion.

use std::path::Path;

use engram_core::models::{NewFact, NewProvenance, ProvenanceStrength, Scope};
use engram_storage::StoreManager;

fn seeded_manager() -> (StoreManager, i64) {
    let manager = StoreManager::open_in_memory(Some(Path::new("/home/dev/project"))).unwrap();
    let project = manager.project_store().unwrap().unwrap();

    let subject = project.find_or_create_entity("repo", "engram").unwrap();
    let mut fact = NewFact::new(subject.id, "uses_database");
    fact.object_literal = Some("postgresql".to_string());
    fact.project_path = Some("/home/dev/project".to_string());
    let fact_id = project.insert_fact(&fact).unwrap();

    let content_id = project
        .upsert_content_item(&engram_core::models::NewContentItem {
            source: "transcript".to_string(),
            session_id: Some("s1".to_string()),
            text_hash: "deadbeef".to_string(),
            byte_len: 10,
            ..Default::default()
        })
        .unwrap();
    project
        .insert_provenance(&NewProvenance {
            fact_id,
            content_item_id: Some(content_id),
            quote: Some("we use postgres".to_string()),
            attribution_entity_id: None,
            strength: ProvenanceStrength::Stated,
        })
        .unwrap();

    (manager, fact_id)
}

#[test]
fn promotion_clones_fact_and_provenance_into_global() {
    let (manager, fact_id) = seeded_manager();

    let global_id = manager.promote_fact(fact_id).unwrap().unwrap();
    let global = manager.global_store();

    let promoted = global.get_fact(global_id).unwrap().unwrap();
    assert_eq!(promoted.scope, Scope::Global);
    assert_eq!(promoted.project_path, None);
    assert!(promoted
        .created_from
        .as_deref()
        .unwrap()
        .starts_with("promoted:"));
    assert_eq!(promoted.object_literal.as_deref(), Some("postgresql"));

    // Provenance travels, but content references stay behind.
    let provenance = global
        .read(|conn| {
            engram_storage::queries::provenance_ops::provenance_for_fact(conn, global_id)
        })
        .unwrap();
    assert_eq!(provenance.len(), 1);
    assert_eq!(provenance[0].content_item_id, None);
    assert_eq!(provenance[0].quote.as_deref(), Some("we use postgres"));

    // The project-side fact is untouched.
    let project = manager.project_store().unwrap().unwrap();
    let original = project.get_fact(fact_id).unwrap().unwrap();
    assert_eq!(original.status, engram_core::models::FactStatus::Active);
}

#[test]
fn promoting_a_missing_fact_returns_none() {
    let (manager, _) = seeded_manager();
    assert_eq!(manager.promote_fact(9999).unwrap(), None);
}

#[test]
fn scope_routing_picks_the_owning_store() {
    let (manager, _) = seeded_manager();
    let global = manager.store_for_scope(Scope::Global).unwrap();
    let project = manager.store_for_scope(Scope::Project).unwrap();
    assert!(!std::ptr::eq(global, project));
}

#[test]
fn managers_without_a_project_have_no_project_store() {
    let manager = StoreManager::open_in_memory(None).unwrap();
    assert!(manager.project_store().unwrap().is_none());
    assert!(manager.store_for_scope(Scope::Project).is_err());
}
