//! Cinder function analyzer.
//!
//! Produces a static report for every function in a program: signature,
//! parameters, local declarations, control structures, and whether the
//! function calls itself directly.
//!
//! ```text
//! Program → pass 1 (collect) → pass 2 (direct recursion) → Vec<FunctionInfo>
//! ```

mod analyzer;
mod recursion;
mod report;

pub use analyzer::FunctionAnalyzer;
pub use report::{
    ControlKind, ControlStructureInfo, FunctionInfo, LocalVariableInfo, ParameterInfo,
};

use cinder_types::ast::Program;

/// Analyze `program`, rendering initializer text from the tree.
pub fn analyze(program: &Program) -> Vec<FunctionInfo> {
    FunctionAnalyzer::new().analyze(program)
}
