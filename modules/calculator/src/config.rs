//! Configuration for the calculator module.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CalculatorConfig {
    /// Start with the five demonstration records instead of an empty store.
    pub seed: bool,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}
