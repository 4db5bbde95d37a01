//! Shared types for Cinder.
//!
//! This crate defines the syntax tree handed to the evaluator and the
//! function analyzer by an external front end, along with source spans and
//! source files.

mod span;
pub mod ast;
pub mod build;

pub use span::{SourceFile, Span};
