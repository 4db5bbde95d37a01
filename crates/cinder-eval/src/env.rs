//! Flat variable store for the Cinder evaluator.

use crate::value::{Value, ValueKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The single, unscoped name → value mapping of one evaluation run.
///
/// There are no nested scopes: a name assigned inside a loop or branch stays
/// visible afterwards, and re-declaring a name overwrites it.
#[derive(Debug, Clone, Default)]
pub(crate) struct VariableStore {
    bindings: BTreeMap<String, Value>,
}

/// Read-only view of one stored variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariableSnapshot {
    pub value: Value,
    pub kind: ValueKind,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing any previous value and kind.
    pub fn assign(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Copy out every binding together with its stored kind.
    pub fn snapshot(&self) -> BTreeMap<String, VariableSnapshot> {
        self.bindings
            .iter()
            .map(|(name, value)| {
                let snapshot = VariableSnapshot {
                    value: value.clone(),
                    kind: value.kind(),
                };
                (name.clone(), snapshot)
            })
            .collect()
    }
}
