//! Per-predicate cardinality policy.
//!
//! New predicates are added to the table, not to code paths.

use std::collections::HashMap;

/// How many active facts a `(subject, predicate)` slot may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    Single,
    Multi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredicateRule {
    pub cardinality: Cardinality,
    pub exclusive: bool,
}

const DEFAULT_RULE: PredicateRule = PredicateRule {
    cardinality: Cardinality::Multi,
    exclusive: false,
};

const SINGLE: PredicateRule = PredicateRule {
    cardinality: Cardinality::Single,
    exclusive: true,
};

/// The policy table. Unknown predicates fall back to multi-valued.
#[derive(Debug, Clone)]
pub struct PredicatePolicy {
    rules: HashMap<String, PredicateRule>,
}

impl PredicatePolicy {
    pub fn new() -> Self {
        let mut rules = HashMap::new();
        for predicate in [
            "auth_method",
            "uses_database",
            "uses_framework",
            "deployment_platform",
        ] {
            rules.insert(predicate.to_string(), SINGLE);
        }
        for predicate in ["convention", "decision"] {
            rules.insert(predicate.to_string(), DEFAULT_RULE);
        }
        Self { rules }
    }

    /// Add or replace one rule.
    pub fn with_rule(mut self, predicate: impl Into<String>, rule: PredicateRule) -> Self {
        self.rules.insert(predicate.into(), rule);
        self
    }

    pub fn rule_for(&self, predicate: &str) -> PredicateRule {
        self.rules.get(predicate).copied().unwrap_or(DEFAULT_RULE)
    }
}

impl Default for PredicatePolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_singles_are_single() {
        let policy = PredicatePolicy::new();
        for predicate in [
            "auth_method",
            "uses_database",
            "uses_framework",
            "deployment_platform",
        ] {
            assert_eq!(policy.rule_for(predicate).cardinality, Cardinality::Single);
        }
    }

    #[test]
    fn unknown_predicates_default_to_multi() {
        let policy = PredicatePolicy::new();
        let rule = policy.rule_for("mentions_library");
        assert_eq!(rule.cardinality, Cardinality::Multi);
        assert!(!rule.exclusive);
    }

    #[test]
    fn rules_are_table_driven() {
        let policy = PredicatePolicy::new().with_rule(
            "primary_language",
            PredicateRule {
                cardinality: Cardinality::Single,
                exclusive: true,
            },
        );
        assert_eq!(
            policy.rule_for("primary_language").cardinality,
            Cardinality::Single
        );
    }
}
