//! StoreManager — owns the global and (lazily opened) project stores,
//! routes writes by scope, and promotes project facts to the global store.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use engram_core::config::{StoreConfig, DB_RELATIVE_PATH};
use engram_core::errors::{EngramError, EngramResult};
use engram_core::models::{NewFact, NewProvenance, Scope};

use crate::engine::Store;
use crate::queries;

pub struct StoreManager {
    global: Store,
    project_path: Option<PathBuf>,
    project: OnceLock<Store>,
}

impl StoreManager {
    /// Open the global store now; the project store opens on first use.
    pub fn open(config: &StoreConfig, project_path: Option<&Path>) -> EngramResult<Self> {
        let global_path = match &config.global_db_path {
            Some(path) => path.clone(),
            None => dirs::home_dir()
                .map(|home| home.join(DB_RELATIVE_PATH))
                .ok_or(EngramError::Payload {
                    field: "global_db_path",
                })?,
        };
        let global = Store::open(&global_path)?;
        Ok(Self {
            global,
            project_path: project_path.map(Path::to_path_buf),
            project: OnceLock::new(),
        })
    }

    /// Both stores in memory (for testing). `project_path` is recorded for
    /// scope routing but nothing touches the filesystem.
    pub fn open_in_memory(project_path: Option<&Path>) -> EngramResult<Self> {
        let manager = Self {
            global: Store::open_in_memory()?,
            project_path: project_path.map(Path::to_path_buf),
            project: OnceLock::new(),
        };
        if manager.project_path.is_some() {
            let _ = manager.project.set(Store::open_in_memory()?);
        }
        Ok(manager)
    }

    pub fn global_store(&self) -> &Store {
        &self.global
    }

    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    /// The project store, opened on first access. `None` when this manager
    /// has no project.
    pub fn project_store(&self) -> EngramResult<Option<&Store>> {
        let Some(project_path) = &self.project_path else {
            return Ok(None);
        };
        if self.project.get().is_none() {
            let store = Store::open(&StoreConfig::project_db_path(project_path))?;
            // A concurrent initializer may have won; the losing store is
            // simply dropped.
            let _ = self.project.set(store);
        }
        Ok(self.project.get())
    }

    /// Route a write to the store owning the given scope.
    pub fn store_for_scope(&self, scope: Scope) -> EngramResult<&Store> {
        match scope {
            Scope::Global => Ok(&self.global),
            Scope::Project => self.project_store()?.ok_or(EngramError::Payload {
                field: "project_path",
            }),
        }
    }

    /// Copy a project fact into the global store.
    ///
    /// Subject and object entities are remapped by slug. The clone is
    /// `scope=global` with no project path, and its provenance is copied
    /// without content references (the content belongs to the project
    /// store). The project-side fact is left untouched. Returns the new
    /// global fact id, or `None` when the source fact or its subject cannot
    /// be found.
    pub fn promote_fact(&self, fact_id: i64) -> EngramResult<Option<i64>> {
        let Some(project) = self.project_store()? else {
            return Ok(None);
        };

        let Some(fact) = project.get_fact(fact_id)? else {
            return Ok(None);
        };
        let Some(subject) = project.get_entity(fact.subject_entity_id)? else {
            return Ok(None);
        };
        let object = match fact.object_entity_id {
            Some(id) => project.get_entity(id)?,
            None => None,
        };
        let provenance =
            project.read(|conn| queries::provenance_ops::provenance_for_fact(conn, fact_id))?;

        let project_label = self
            .project_path
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        let global_id = self.global.transaction_with_retry(|conn| {
            let global_subject = queries::entity_ops::find_or_create_entity(
                conn,
                &subject.entity_type,
                &subject.canonical_name,
            )?;
            let global_object_id = match &object {
                Some(entity) => Some(
                    queries::entity_ops::find_or_create_entity(
                        conn,
                        &entity.entity_type,
                        &entity.canonical_name,
                    )?
                    .id,
                ),
                None => None,
            };

            let clone = NewFact {
                subject_entity_id: global_subject.id,
                predicate: fact.predicate.clone(),
                object_entity_id: global_object_id,
                object_literal: fact.object_literal.clone(),
                datatype: fact.datatype.clone(),
                polarity: fact.polarity,
                valid_from: fact.valid_from,
                status: fact.status,
                confidence: fact.confidence,
                created_from: Some(format!("promoted:{project_label}:{fact_id}")),
                scope: Scope::Global,
                project_path: None,
                embedding_json: fact.embedding_json.clone(),
            };
            let global_fact_id = queries::fact_ops::insert_fact(conn, &clone)?;

            for p in &provenance {
                queries::provenance_ops::insert_provenance(
                    conn,
                    &NewProvenance {
                        fact_id: global_fact_id,
                        content_item_id: None,
                        quote: p.quote.clone(),
                        attribution_entity_id: None,
                        strength: p.strength,
                    },
                )?;
            }
            Ok(global_fact_id)
        })?;

        Ok(Some(global_id))
    }
}
