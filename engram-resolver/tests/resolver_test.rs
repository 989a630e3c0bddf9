//! Truth-maintenance scenarios: supersession, conflict, idempotent match.

use engram_core::models::{ConflictStatus, FactStatus, ProvenanceStrength, LINK_SUPERSEDES};
use engram_resolver::{ResolutionContext, Resolver};
use engram_storage::Store;
use test_fixtures::single_fact_extraction;

fn apply(
    store: &Store,
    resolver: &Resolver,
    extraction: &engram_core::models::Extraction,
) -> engram_resolver::ResolutionCounters {
    resolver
        .apply_to_store(store, extraction, &ResolutionContext::default())
        .unwrap()
}

fn slot_facts(store: &Store, predicate: &str, status: FactStatus) -> Vec<engram_core::models::Fact> {
    let subject = store.find_or_create_entity("repo", "engram").unwrap();
    store.facts_for_slot(subject.id, predicate, status).unwrap()
}

#[test]
fn stated_supersedes_replaces_the_active_fact() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    let first = apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "mysql", ProvenanceStrength::Stated, false),
    );
    assert_eq!(first.facts_created, 1);
    assert_eq!(first.entities_created, 1);

    let second = apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "postgresql", ProvenanceStrength::Stated, true),
    );
    assert_eq!(second.facts_created, 1);
    assert_eq!(second.facts_superseded, 1);
    assert_eq!(second.conflicts_created, 0);

    let active = slot_facts(&store, "uses_database", FactStatus::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].object_literal.as_deref(), Some("postgresql"));

    let superseded = slot_facts(&store, "uses_database", FactStatus::Superseded);
    assert_eq!(superseded.len(), 1);
    assert_eq!(superseded[0].object_literal.as_deref(), Some("mysql"));
    assert!(superseded[0].valid_to.is_some());

    // One supersedes link, new fact to old.
    let links = store
        .read(|conn| {
            engram_storage::queries::link_ops::links_from_fact(conn, active[0].id)
        })
        .unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].link_type, LINK_SUPERSEDES);
    assert_eq!(links[0].to_fact_id, superseded[0].id);
}

#[test]
fn inferred_contradiction_becomes_a_dispute() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "mysql", ProvenanceStrength::Stated, false),
    );
    let second = apply(
        &store,
        &resolver,
        &single_fact_extraction(
            "uses_database",
            "postgresql",
            ProvenanceStrength::Inferred,
            false,
        ),
    );
    assert_eq!(second.facts_superseded, 0);
    assert_eq!(second.conflicts_created, 1);

    // The incumbent stays active; the newcomer is disputed.
    let active = slot_facts(&store, "uses_database", FactStatus::Active);
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].object_literal.as_deref(), Some("mysql"));

    let disputed = slot_facts(&store, "uses_database", FactStatus::Disputed);
    assert_eq!(disputed.len(), 1);
    assert_eq!(disputed[0].object_literal.as_deref(), Some("postgresql"));

    let conflicts = store.open_conflicts().unwrap();
    assert_eq!(conflicts.len(), 1);
    assert_eq!(conflicts[0].status, ConflictStatus::Open);
    assert_eq!(
        conflicts[0].notes.as_deref(),
        Some("Contradicting uses_database claims")
    );
}

#[test]
fn matching_object_is_idempotent_across_case() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "postgresql", ProvenanceStrength::Stated, false),
    );
    let second = apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "PostgreSQL", ProvenanceStrength::Stated, false),
    );
    assert_eq!(second.facts_created, 0);
    assert_eq!(second.conflicts_created, 0);
    assert_eq!(second.provenance_created, 1);

    let active = slot_facts(&store, "uses_database", FactStatus::Active);
    assert_eq!(active.len(), 1);

    let provenance = store
        .read(|conn| {
            engram_storage::queries::provenance_ops::provenance_for_fact(conn, active[0].id)
        })
        .unwrap();
    assert_eq!(provenance.len(), 2);
}

#[test]
fn at_most_one_active_fact_per_single_slot() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    for object in ["mysql", "postgresql", "sqlite", "mongodb"] {
        apply(
            &store,
            &resolver,
            &single_fact_extraction("uses_database", object, ProvenanceStrength::Stated, true),
        );
    }
    assert_eq!(slot_facts(&store, "uses_database", FactStatus::Active).len(), 1);
}

#[test]
fn multi_cardinality_predicates_accumulate() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    for object in ["snake_case names", "no unwrap in prod", "tests beside code"] {
        let counters = apply(
            &store,
            &resolver,
            &single_fact_extraction("convention", object, ProvenanceStrength::Stated, false),
        );
        assert_eq!(counters.facts_created, 1);
        assert_eq!(counters.conflicts_created, 0);
    }
    assert_eq!(slot_facts(&store, "convention", FactStatus::Active).len(), 3);
}

#[test]
fn resolver_never_deletes_facts() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "mysql", ProvenanceStrength::Stated, false),
    );
    apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "postgresql", ProvenanceStrength::Stated, true),
    );
    apply(
        &store,
        &resolver,
        &single_fact_extraction("uses_database", "sqlite", ProvenanceStrength::Inferred, false),
    );

    // Every version is still present: one active, one superseded, one
    // disputed.
    let total: i64 = store
        .read(|conn| {
            conn.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get(0))
                .map_err(|_| engram_core::EngramError::Payload { field: "count" })
        })
        .unwrap();
    assert_eq!(total, 3);
}

#[test]
fn a_failure_after_apply_rolls_back_the_whole_extraction() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();
    let extraction =
        single_fact_extraction("uses_database", "mysql", ProvenanceStrength::Stated, false);

    let result: engram_core::EngramResult<()> = store.transaction(|conn| {
        resolver.apply(conn, &extraction, &ResolutionContext::default())?;
        Err(engram_core::EngramError::Payload { field: "forced" })
    });
    assert!(result.is_err());

    let total: i64 = store
        .read(|conn| {
            conn.query_row("SELECT COUNT(*) FROM facts", [], |row| row.get(0))
                .map_err(|_| engram_core::EngramError::Payload { field: "count" })
        })
        .unwrap();
    assert_eq!(total, 0);
}

#[test]
fn declared_entities_become_object_references() {
    let store = Store::open_in_memory().unwrap();
    let resolver = Resolver::new();

    let extraction = engram_core::models::Extraction {
        entities: vec![
            engram_core::models::ExtractedEntity {
                entity_type: "repo".to_string(),
                name: "engram".to_string(),
            },
            engram_core::models::ExtractedEntity {
                entity_type: "db".to_string(),
                name: "postgresql".to_string(),
            },
        ],
        facts: vec![engram_core::models::ExtractedFact {
            subject: "engram".to_string(),
            predicate: "uses_database".to_string(),
            object: "postgresql".to_string(),
            polarity: None,
            confidence: None,
            strength: Some(ProvenanceStrength::Stated),
            quote: None,
            supersedes: false,
            scope_hint: None,
        }],
        decisions: Vec::new(),
        signals: Vec::new(),
    };

    let counters = apply(&store, &resolver, &extraction);
    assert_eq!(counters.entities_created, 2);

    let active = slot_facts(&store, "uses_database", FactStatus::Active);
    assert_eq!(active.len(), 1);
    assert!(active[0].object_entity_id.is_some());
    assert_eq!(active[0].object_literal, None);
}
