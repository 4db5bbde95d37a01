//! Cinder tree-walking evaluator.
//!
//! Executes a program directly from its syntax tree against one flat,
//! unscoped variable store. Only the built-in math functions are callable.

mod builtins;
mod config;
mod env;
mod error;
mod evaluator;
mod value;

pub use builtins::Builtin;
pub use config::{EvalConfig, DEFAULT_EPSILON};
pub use env::VariableSnapshot;
pub use error::{EvalError, EvalResult};
pub use evaluator::Evaluator;
pub use value::{Value, ValueKind};

use cinder_types::ast::Program;
use std::collections::BTreeMap;

/// The outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Value of the last statement executed, if it produced one.
    pub value: Option<Value>,
    pub variables: BTreeMap<String, VariableSnapshot>,
}

/// Evaluate `program` with the default configuration.
pub fn evaluate(program: &Program) -> EvalResult<Evaluation> {
    let mut evaluator = Evaluator::new();
    let value = evaluator.evaluate(program)?;
    Ok(Evaluation {
        value,
        variables: evaluator.variables(),
    })
}
