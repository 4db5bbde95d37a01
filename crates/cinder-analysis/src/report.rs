//! Per-function report records.

use cinder_types::ast::TypeTag;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Static description of one declared function.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub return_type: TypeTag,
    /// `true` only for the program's entry function.
    pub is_entry: bool,
    /// The body calls the function by its own name (direct recursion only).
    pub is_recursive: bool,
    pub start_line: u32,
    pub end_line: u32,
    pub parameters: Vec<ParameterInfo>,
    /// Every declarator in the body, in source order, including nested blocks.
    pub locals: Vec<LocalVariableInfo>,
    /// Control structures in pre-order of first encounter.
    pub control_structures: Vec<ControlStructureInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterInfo {
    pub type_tag: TypeTag,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalVariableInfo {
    pub type_tag: TypeTag,
    pub name: String,
    /// Initializer source text; empty when the declarator has none.
    pub initializer: String,
    /// Line of the declaring identifier.
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlStructureInfo {
    pub kind: ControlKind,
    /// Line of the leading keyword.
    pub line: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlKind {
    If,
    IfElse,
    For,
    While,
}

impl ControlKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ControlKind::If => "if",
            ControlKind::IfElse => "if-else",
            ControlKind::For => "for",
            ControlKind::While => "while",
        }
    }
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
