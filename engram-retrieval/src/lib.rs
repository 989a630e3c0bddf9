//! # engram-retrieval
//!
//! Query orchestration over the global and project stores: a fan-out
//! template that annotates each result with its source store, filters by
//! scope, deduplicates across stores, and serves both one-shot and
//! progressive-disclosure recall.

mod progressive;
mod recall;
mod tokens;

pub use progressive::{recall_details, recall_index, FactDetails, IndexEntry};
pub use recall::{
    recall_lexical, recall_recent, recall_semantic, recall_with, RecallResult, RecallScope,
    ScopeFilter, SourceStore,
};
pub use tokens::estimate_tokens;
