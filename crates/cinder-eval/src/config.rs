//! Evaluator configuration.

use serde::{Deserialize, Serialize};

/// Default tolerance for `==` / `!=` between numbers.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// Tunable evaluator settings.
///
/// Deserializable so a host can load it from its own configuration; missing
/// fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvalConfig {
    /// Absolute tolerance used by equality comparisons.
    pub epsilon: f64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
        }
    }
}

impl EvalConfig {
    /// `|a - b| < epsilon`
    pub fn approx_eq(&self, a: f64, b: f64) -> bool {
        (a - b).abs() < self.epsilon
    }
}
