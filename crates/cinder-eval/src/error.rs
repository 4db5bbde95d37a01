//! Runtime error types for the Cinder evaluator.

use cinder_types::Span;
use thiserror::Error;

/// Evaluation error. Every variant is fatal to the current run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A variable was read before anything was assigned to it.
    #[error("undefined variable '{name}' ({span})")]
    UndefinedVariable { name: String, span: Span },

    /// `/` or `/=` with a zero right-hand value.
    #[error("division by zero ({span})")]
    DivideByZero { span: Span },

    /// Call target is not one of the built-in functions.
    #[error("unknown built-in function '{name}' ({span})")]
    UnknownBuiltinFunction { name: String, span: Span },

    /// A built-in was called with the wrong number of arguments.
    #[error("built-in '{name}' expects {expected} argument(s), got {found} ({span})")]
    BuiltinArity {
        name: String,
        expected: usize,
        found: usize,
        span: Span,
    },

    /// The tree violates the contract the evaluator relies on.
    #[error("internal invariant violated: {0}")]
    InternalInvariant(String),
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;
