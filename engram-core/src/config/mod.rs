//! Configuration. One file per subsystem, serde + `Default`, loadable from
//! TOML.

mod ops;
mod store;
mod sweep;

pub use ops::OperationsConfig;
pub use store::{StoreConfig, DB_RELATIVE_PATH};
pub use sweep::SweepConfig;

use serde::{Deserialize, Serialize};

/// Umbrella configuration for the whole system.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngramConfig {
    pub store: StoreConfig,
    pub sweep: SweepConfig,
    pub operations: OperationsConfig,
}

impl EngramConfig {
    /// Parse a TOML document; missing sections fall back to defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = EngramConfig::from_toml_str("").unwrap();
        assert_eq!(config.sweep.budget_seconds, 5.0);
        assert_eq!(config.sweep.proposed_ttl_days, 14);
    }

    #[test]
    fn partial_toml_overrides_one_field() {
        let config = EngramConfig::from_toml_str("[sweep]\nbudget_seconds = 2.5\n").unwrap();
        assert_eq!(config.sweep.budget_seconds, 2.5);
        assert_eq!(config.sweep.disputed_ttl_days, 30);
    }
}
