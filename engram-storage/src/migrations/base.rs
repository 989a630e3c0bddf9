//! v1 base schema: meta, content, cursors, entities, facts, provenance,
//! links, conflicts, and the lexical index.

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use crate::to_storage_err;

pub fn create_base_schema(conn: &Connection) -> EngramResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS content_items (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            source          TEXT NOT NULL,
            session_id      TEXT,
            transcript_path TEXT,
            occurred_at     TEXT,
            ingested_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            text_hash       TEXT NOT NULL,
            byte_len        INTEGER NOT NULL DEFAULT 0,
            raw_text        TEXT,
            metadata_json   TEXT,
            UNIQUE (text_hash, session_id)
        );

        CREATE INDEX IF NOT EXISTS idx_content_session ON content_items(session_id);

        CREATE TABLE IF NOT EXISTS delta_cursors (
            session_id       TEXT NOT NULL,
            transcript_path  TEXT NOT NULL,
            last_byte_offset INTEGER NOT NULL DEFAULT 0,
            updated_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            PRIMARY KEY (session_id, transcript_path)
        );

        CREATE TABLE IF NOT EXISTS entities (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            type           TEXT NOT NULL,
            canonical_name TEXT NOT NULL,
            slug           TEXT NOT NULL UNIQUE,
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE TABLE IF NOT EXISTS entity_aliases (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            entity_id  INTEGER NOT NULL REFERENCES entities(id) ON DELETE CASCADE,
            alias      TEXT NOT NULL,
            source     TEXT,
            confidence REAL NOT NULL DEFAULT 1.0,
            UNIQUE (entity_id, alias)
        );

        CREATE TABLE IF NOT EXISTS facts (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            subject_entity_id INTEGER NOT NULL,
            predicate         TEXT NOT NULL,
            object_entity_id  INTEGER,
            object_literal    TEXT,
            datatype          TEXT,
            polarity          TEXT NOT NULL DEFAULT 'positive',
            valid_from        TEXT NOT NULL,
            valid_to          TEXT,
            status            TEXT NOT NULL DEFAULT 'active',
            confidence        REAL NOT NULL DEFAULT 1.0,
            created_from      TEXT,
            created_at        TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            CHECK (object_literal IS NOT NULL OR object_entity_id IS NOT NULL)
        );

        CREATE INDEX IF NOT EXISTS idx_facts_slot
            ON facts(subject_entity_id, predicate, status);
        CREATE INDEX IF NOT EXISTS idx_facts_status ON facts(status);

        CREATE TABLE IF NOT EXISTS provenance (
            id                    INTEGER PRIMARY KEY AUTOINCREMENT,
            fact_id               INTEGER NOT NULL,
            content_item_id       INTEGER,
            quote                 TEXT,
            attribution_entity_id INTEGER,
            strength              TEXT NOT NULL DEFAULT 'stated'
        );

        CREATE INDEX IF NOT EXISTS idx_provenance_fact ON provenance(fact_id);
        CREATE INDEX IF NOT EXISTS idx_provenance_content ON provenance(content_item_id);

        CREATE TABLE IF NOT EXISTS fact_links (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            from_fact_id INTEGER NOT NULL,
            to_fact_id   INTEGER NOT NULL,
            link_type    TEXT NOT NULL,
            UNIQUE (from_fact_id, to_fact_id, link_type)
        );

        CREATE TABLE IF NOT EXISTS conflicts (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            fact_a_id   INTEGER NOT NULL,
            fact_b_id   INTEGER NOT NULL,
            status      TEXT NOT NULL DEFAULT 'open',
            detected_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
            notes       TEXT
        );

        CREATE VIRTUAL TABLE IF NOT EXISTS content_fts
            USING fts5(text, content_id UNINDEXED);

        INSERT OR IGNORE INTO meta (key, value) VALUES ('schema_version', '1');
        INSERT OR IGNORE INTO meta (key, value)
            VALUES ('created_at', strftime('%Y-%m-%dT%H:%M:%fZ', 'now'));
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
