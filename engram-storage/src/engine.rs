//! Store — owns the connection pool, runs schema bring-up, and surfaces the
//! typed accessors plus the transaction/busy-retry layering.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;

use engram_core::errors::EngramResult;
use engram_core::models::{
    Conflict, ContentItem, Entity, Fact, FactStatus, NewContentItem, NewFact, NewProvenance,
    Scope, ToolCall,
};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries;
use crate::retry;
use crate::to_storage_err;

/// One SQLite-backed memory store.
pub struct Store {
    pool: ConnectionPool,
}

impl Store {
    /// Open a store backed by a file on disk, creating parent directories
    /// and bringing the schema up to date.
    pub fn open(path: &Path) -> EngramResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let pool = ConnectionPool::open(path, crate::pool::ReadPool::default_size())?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    /// Open an in-memory store (for testing). Reads route through the
    /// writer, since in-memory read connections would be isolated databases.
    pub fn open_in_memory() -> EngramResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let store = Self { pool };
        store.initialize()?;
        Ok(store)
    }

    fn initialize(&self) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| migrations::run_migrations(conn))
    }

    /// The connection pool (for advanced operations).
    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Execute a read-only closure on the best available connection.
    pub fn read<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        match &self.pool.readers {
            Some(readers) => readers.with_conn(f),
            None => self.pool.writer.with_conn_sync(f),
        }
    }

    /// Run `f` inside one transaction on the write connection. Any error
    /// rolls back every write `f` performed.
    pub fn transaction<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        self.pool.writer.with_conn_sync(|conn| {
            let tx = conn
                .unchecked_transaction()
                .map_err(|e| to_storage_err(format!("transaction begin: {e}")))?;
            match f(&tx) {
                Ok(value) => {
                    tx.commit()
                        .map_err(|e| to_storage_err(format!("transaction commit: {e}")))?;
                    Ok(value)
                }
                Err(e) => {
                    let _ = tx.rollback();
                    Err(e)
                }
            }
        })
    }

    /// [`Store::transaction`] wrapped in the busy back-off policy. The retry
    /// sits outside the transaction, so a rolled-back attempt is replayed
    /// whole.
    pub fn transaction_with_retry<F, T>(&self, mut f: F) -> EngramResult<T>
    where
        F: FnMut(&Connection) -> EngramResult<T>,
    {
        retry::with_busy_retry(|| self.transaction(&mut f))
    }

    /// Current `meta.schema_version`.
    pub fn schema_version(&self) -> EngramResult<u32> {
        self.read(migrations::schema_version)
    }

    // --- content ---

    pub fn upsert_content_item(&self, item: &NewContentItem) -> EngramResult<i64> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::content_ops::upsert_content_item(conn, item))
    }

    pub fn get_content_item(&self, id: i64) -> EngramResult<Option<ContentItem>> {
        self.read(|conn| queries::content_ops::get_content_item(conn, id))
    }

    pub fn content_item_by_transcript_and_mtime(
        &self,
        transcript_path: &str,
        source_mtime: DateTime<Utc>,
    ) -> EngramResult<Option<ContentItem>> {
        self.read(|conn| {
            queries::content_ops::content_item_by_transcript_and_mtime(
                conn,
                transcript_path,
                source_mtime,
            )
        })
    }

    // --- cursors ---

    pub fn get_delta_cursor(&self, session_id: &str, transcript_path: &str) -> EngramResult<u64> {
        self.read(|conn| queries::cursor_ops::get_delta_cursor(conn, session_id, transcript_path))
    }

    pub fn update_delta_cursor(
        &self,
        session_id: &str,
        transcript_path: &str,
        offset: u64,
    ) -> EngramResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::cursor_ops::update_delta_cursor(conn, session_id, transcript_path, offset)
        })
    }

    // --- entities ---

    pub fn find_or_create_entity(
        &self,
        entity_type: &str,
        canonical_name: &str,
    ) -> EngramResult<Entity> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::entity_ops::find_or_create_entity(conn, entity_type, canonical_name)
        })
    }

    pub fn get_entity(&self, id: i64) -> EngramResult<Option<Entity>> {
        self.read(|conn| queries::entity_ops::get_entity(conn, id))
    }

    // --- facts ---

    pub fn insert_fact(&self, fact: &NewFact) -> EngramResult<i64> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::fact_ops::insert_fact(conn, fact))
    }

    pub fn get_fact(&self, id: i64) -> EngramResult<Option<Fact>> {
        self.read(|conn| queries::fact_ops::get_fact(conn, id))
    }

    pub fn facts_for_slot(
        &self,
        subject_entity_id: i64,
        predicate: &str,
        status: FactStatus,
    ) -> EngramResult<Vec<Fact>> {
        self.read(|conn| {
            queries::fact_ops::facts_for_slot(conn, subject_entity_id, predicate, status)
        })
    }

    pub fn update_fact_status(
        &self,
        id: i64,
        status: FactStatus,
        valid_to: Option<DateTime<Utc>>,
    ) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::fact_ops::update_fact_status(conn, id, status, valid_to))
    }

    pub fn update_fact_scope(
        &self,
        id: i64,
        scope: Scope,
        project_path: Option<&str>,
    ) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::fact_ops::update_fact_scope(conn, id, scope, project_path))
    }

    pub fn update_fact_embedding(&self, id: i64, embedding_json: &str) -> EngramResult<()> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::fact_ops::update_fact_embedding(conn, id, embedding_json))
    }

    pub fn facts_with_embeddings(&self, limit: usize) -> EngramResult<Vec<Fact>> {
        self.read(|conn| queries::fact_ops::facts_with_embeddings(conn, limit))
    }

    pub fn recent_facts(&self, limit: usize) -> EngramResult<Vec<Fact>> {
        self.read(|conn| queries::fact_ops::recent_facts(conn, limit))
    }

    // --- provenance, links, conflicts ---

    pub fn insert_provenance(&self, provenance: &NewProvenance) -> EngramResult<i64> {
        self.pool
            .writer
            .with_conn_sync(|conn| queries::provenance_ops::insert_provenance(conn, provenance))
    }

    pub fn insert_fact_link(
        &self,
        from_fact_id: i64,
        to_fact_id: i64,
        link_type: &str,
    ) -> EngramResult<()> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::link_ops::insert_fact_link(conn, from_fact_id, to_fact_id, link_type)
        })
    }

    pub fn insert_conflict(
        &self,
        fact_a_id: i64,
        fact_b_id: i64,
        notes: Option<&str>,
    ) -> EngramResult<i64> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::conflict_ops::insert_conflict(conn, fact_a_id, fact_b_id, notes)
        })
    }

    pub fn open_conflicts(&self) -> EngramResult<Vec<Conflict>> {
        self.read(queries::conflict_ops::open_conflicts)
    }

    // --- tool calls, lexical search ---

    pub fn insert_tool_calls(
        &self,
        content_item_id: i64,
        calls: &[ToolCall],
    ) -> EngramResult<usize> {
        self.pool.writer.with_conn_sync(|conn| {
            queries::tool_call_ops::insert_tool_calls(conn, content_item_id, calls)
        })
    }

    pub fn search_content(&self, query: &str, limit: usize) -> EngramResult<Vec<ContentItem>> {
        self.read(|conn| queries::fts::search_content(conn, query, limit))
    }
}
