//! Validator verdicts and stuck-operation recovery.

use chrono::{Duration, Utc};

use engram_core::models::{
    NewFact, NewProvenance, OperationStatus, ValidationStatus,
};
use engram_core::EngramError;
use engram_storage::queries::operation_ops;
use engram_storage::Store;
use engram_validation::{validate, OperationTracker};

#[test]
fn a_fresh_store_is_healthy() {
    let store = Store::open_in_memory().unwrap();
    let report = validate(&store).unwrap();
    assert!(report.valid, "unexpected issues: {:?}", report.issues);
    assert_eq!(report.status, ValidationStatus::Healthy);
    assert!(report.issues.is_empty());
}

#[test]
fn every_run_appends_a_health_row() {
    let store = Store::open_in_memory().unwrap();
    validate(&store).unwrap();
    validate(&store).unwrap();

    let latest = store
        .read(engram_storage::queries::health_ops::latest_schema_health)
        .unwrap()
        .unwrap();
    assert_eq!(latest.validation_status, ValidationStatus::Healthy);
    assert_eq!(
        latest.schema_version,
        engram_storage::migrations::SCHEMA_VERSION as i64
    );

    let rows: i64 = store
        .read(|conn| {
            conn.query_row("SELECT COUNT(*) FROM schema_health", [], |row| row.get(0))
                .map_err(|_| EngramError::Payload { field: "count" })
        })
        .unwrap();
    assert_eq!(rows, 2);

    let counts: serde_json::Value = serde_json::from_str(&latest.table_counts_json).unwrap();
    assert!(counts.get("facts").is_some());
}

#[test]
fn orphaned_provenance_degrades_the_store() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();
    let mut fact = NewFact::new(subject.id, "convention");
    fact.object_literal = Some("x".to_string());
    let fact_id = store.insert_fact(&fact).unwrap();
    store
        .insert_provenance(&NewProvenance::stated(fact_id, None))
        .unwrap();
    store
        .transaction(|conn| {
            conn.execute("DELETE FROM facts WHERE id = ?1", [fact_id])
                .map_err(|_| EngramError::Payload { field: "delete" })?;
            Ok(())
        })
        .unwrap();

    let report = validate(&store).unwrap();
    assert!(report.valid, "orphans are warnings, not errors");
    assert_eq!(report.status, ValidationStatus::Degraded);
    assert!(report
        .issues
        .iter()
        .any(|i| i.message.contains("orphaned rows in provenance")));
}

#[test]
fn unknown_fact_status_is_corrupt() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();
    let mut fact = NewFact::new(subject.id, "convention");
    fact.object_literal = Some("x".to_string());
    store.insert_fact(&fact).unwrap();

    store
        .transaction(|conn| {
            conn.execute("UPDATE facts SET status = 'deleted'", [])
                .map_err(|_| EngramError::Payload { field: "corrupt" })?;
            Ok(())
        })
        .unwrap();

    let report = validate(&store).unwrap();
    assert!(!report.valid);
    assert_eq!(report.status, ValidationStatus::Corrupt);
}

#[test]
fn short_embeddings_are_an_error() {
    let store = Store::open_in_memory().unwrap();
    let subject = store.find_or_create_entity("repo", "engram").unwrap();
    let mut fact = NewFact::new(subject.id, "convention");
    fact.object_literal = Some("x".to_string());
    fact.embedding_json = Some(serde_json::to_string(&vec![0.5f32; 8]).unwrap());
    store.insert_fact(&fact).unwrap();

    let report = validate(&store).unwrap();
    assert!(!report.valid);
    assert!(report
        .issues
        .iter()
        .any(|i| i.message.contains("8 dimensions")));
}

#[test]
fn stuck_operations_are_found_and_reset() {
    let store = Store::open_in_memory().unwrap();
    let operation_id = store
        .transaction(|conn| operation_ops::start_operation(conn, "reindex", "store", 100))
        .unwrap();

    // Fresh runs are not stuck.
    let tracker = OperationTracker::new();
    assert!(tracker.stuck_operations(&store).unwrap().is_empty());

    // Backdate the start far past the threshold.
    store
        .transaction(|conn| {
            let old = (Utc::now() - Duration::hours(3)).to_rfc3339();
            conn.execute(
                "UPDATE operation_progress SET started_at = ?1 WHERE id = ?2",
                rusqlite::params![old, operation_id],
            )
            .map_err(|_| EngramError::Payload { field: "backdate" })?;
            Ok(())
        })
        .unwrap();

    let stuck = tracker.stuck_operations(&store).unwrap();
    assert_eq!(stuck.len(), 1);
    assert_eq!(stuck[0].operation_type, "reindex");

    assert_eq!(tracker.reset_stuck(&store).unwrap(), 1);
    assert!(tracker.stuck_operations(&store).unwrap().is_empty());

    let status: String = store
        .read(|conn| {
            conn.query_row(
                "SELECT status FROM operation_progress WHERE id = ?1",
                [operation_id],
                |row| row.get(0),
            )
            .map_err(|_| EngramError::Payload { field: "status" })
        })
        .unwrap();
    assert_eq!(OperationStatus::parse(&status), Some(OperationStatus::Failed));
}
