//! Sweeper TTLs, orphan reaping, and the budget guard.

use chrono::{Duration, Utc};

use engram_core::models::{FactStatus, NewContentItem, NewFact, NewProvenance};
use engram_core::EngramError;
use engram_maintenance::Sweeper;
use engram_storage::Store;

fn backdate_facts(store: &Store, days: i64) {
    store
        .transaction(|conn| {
            let old = (Utc::now() - Duration::days(days)).to_rfc3339();
            conn.execute("UPDATE facts SET created_at = ?1", [old.as_str()])
                .map_err(|_| EngramError::Payload { field: "backdate" })?;
            Ok(())
        })
        .unwrap();
}

fn backdate_content(store: &Store, days: i64) {
    store
        .transaction(|conn| {
            let old = (Utc::now() - Duration::days(days)).to_rfc3339();
            conn.execute("UPDATE content_items SET ingested_at = ?1", [old.as_str()])
                .map_err(|_| EngramError::Payload { field: "backdate" })?;
            Ok(())
        })
        .unwrap();
}

#[test]
fn aged_proposed_facts_expire_but_active_facts_survive() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();

    let mut proposed = NewFact::new(subject.id, "convention");
    proposed.object_literal = Some("tabs".to_string());
    proposed.status = FactStatus::Proposed;
    let proposed_id = store.insert_fact(&proposed).unwrap();

    let mut active = NewFact::new(subject.id, "convention");
    active.object_literal = Some("spaces".to_string());
    let active_id = store.insert_fact(&active).unwrap();

    backdate_facts(&store, 20);

    let report = Sweeper::new().run(&store).unwrap();
    assert_eq!(report.proposed_expired, 1);
    assert_eq!(report.disputed_expired, 0);
    assert!(report.budget_honored);

    assert_eq!(
        store.get_fact(proposed_id).unwrap().unwrap().status,
        FactStatus::Expired
    );
    assert_eq!(
        store.get_fact(active_id).unwrap().unwrap().status,
        FactStatus::Active
    );
}

#[test]
fn young_proposed_facts_are_left_alone() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();

    let mut proposed = NewFact::new(subject.id, "convention");
    proposed.object_literal = Some("tabs".to_string());
    proposed.status = FactStatus::Proposed;
    store.insert_fact(&proposed).unwrap();

    backdate_facts(&store, 5);

    let report = Sweeper::new().run(&store).unwrap();
    assert_eq!(report.proposed_expired, 0);
}

#[test]
fn disputed_facts_expire_on_the_longer_ttl() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();

    let mut disputed = NewFact::new(subject.id, "uses_database");
    disputed.object_literal = Some("mongodb".to_string());
    disputed.status = FactStatus::Disputed;
    store.insert_fact(&disputed).unwrap();

    // Past the proposed TTL but inside the disputed TTL.
    backdate_facts(&store, 20);
    assert_eq!(Sweeper::new().run(&store).unwrap().disputed_expired, 0);

    backdate_facts(&store, 35);
    assert_eq!(Sweeper::new().run(&store).unwrap().disputed_expired, 1);
}

#[test]
fn orphaned_provenance_is_reaped() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();

    let mut fact = NewFact::new(subject.id, "convention");
    fact.object_literal = Some("x".to_string());
    let fact_id = store.insert_fact(&fact).unwrap();
    store
        .insert_provenance(&NewProvenance::stated(fact_id, None))
        .unwrap();

    // Orphan it by hard-deleting the fact out from under it (nothing in the
    // resolver does this; the validator counts it and the sweeper reaps it).
    store
        .transaction(|conn| {
            conn.execute("DELETE FROM facts WHERE id = ?1", [fact_id])
                .map_err(|_| EngramError::Payload { field: "delete" })?;
            Ok(())
        })
        .unwrap();

    let report = Sweeper::new().run(&store).unwrap();
    assert_eq!(report.provenance_pruned, 1);
}

#[test]
fn old_unreferenced_content_is_dropped_but_referenced_content_stays() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();

    let referenced = store
        .upsert_content_item(&NewContentItem {
            source: "transcript".to_string(),
            session_id: Some("s1".to_string()),
            text_hash: "aaaa".to_string(),
            byte_len: 4,
            ..Default::default()
        })
        .unwrap();
    let unreferenced = store
        .upsert_content_item(&NewContentItem {
            source: "transcript".to_string(),
            session_id: Some("s2".to_string()),
            text_hash: "bbbb".to_string(),
            byte_len: 4,
            ..Default::default()
        })
        .unwrap();

    let mut fact = NewFact::new(subject.id, "convention");
    fact.object_literal = Some("keep".to_string());
    let fact_id = store.insert_fact(&fact).unwrap();
    store
        .insert_provenance(&NewProvenance::stated(fact_id, Some(referenced)))
        .unwrap();

    backdate_content(&store, 45);

    let report = Sweeper::new().run(&store).unwrap();
    assert_eq!(report.content_pruned, 1);
    assert!(store.get_content_item(referenced).unwrap().is_some());
    assert!(store.get_content_item(unreferenced).unwrap().is_none());
}

#[test]
fn a_zero_budget_skips_every_phase() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();

    let mut proposed = NewFact::new(subject.id, "convention");
    proposed.object_literal = Some("tabs".to_string());
    proposed.status = FactStatus::Proposed;
    store.insert_fact(&proposed).unwrap();
    backdate_facts(&store, 20);

    let report = Sweeper::new().run_with_budget(&store, 0.0).unwrap();
    assert_eq!(report.proposed_expired, 0);
    assert_eq!(report.content_pruned, 0);
}
