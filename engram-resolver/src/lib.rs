//! # engram-resolver
//!
//! Applies extraction payloads to a store: deduplicates entities, consults
//! the per-predicate cardinality policy, and settles each incoming fact as
//! a match, a supersession, or a dispute. Never deletes.

mod policy;
mod resolver;

pub use policy::{Cardinality, PredicatePolicy, PredicateRule};
pub use resolver::{ResolutionContext, ResolutionCounters, Resolver};
