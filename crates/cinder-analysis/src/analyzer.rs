//! Function analyzer: walks a program and reports on every function.
//!
//! Entry point: [`FunctionAnalyzer::analyze`].
//!
//! Runs in two passes:
//! 1. collect signature, parameters, locals and control structures;
//! 2. once every function is collected, flag direct self-calls.

use cinder_types::ast::*;
use cinder_types::SourceFile;

use crate::recursion;
use crate::report::{
    ControlKind, ControlStructureInfo, FunctionInfo, LocalVariableInfo, ParameterInfo,
};

// ══════════════════════════════════════════════════════════════════════════════
// FunctionAnalyzer
// ══════════════════════════════════════════════════════════════════════════════

/// Read-only walker producing one [`FunctionInfo`] per function.
///
/// Holds no state between calls; the same analyzer can be reused.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionAnalyzer<'a> {
    /// When present, initializer text is sliced from the source verbatim.
    source: Option<&'a SourceFile>,
}

impl<'a> FunctionAnalyzer<'a> {
    /// Analyzer that renders initializer text from the tree.
    pub fn new() -> Self {
        Self { source: None }
    }

    /// Analyzer that recovers initializer text from `source`.
    pub fn with_source(source: &'a SourceFile) -> Self {
        Self {
            source: Some(source),
        }
    }

    /// Analyze every declared function, then the entry function.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn analyze(&self, program: &Program) -> Vec<FunctionInfo> {
        // Pass 1: collect.
        let mut infos = Vec::new();
        for item in &program.items {
            if let Item::Function(func) = item {
                infos.push(self.collect_function(func, false));
            }
        }
        infos.push(self.collect_function(&program.entry, true));

        // Pass 2: direct recursion.
        for (info, func) in infos.iter_mut().zip(program.functions()) {
            info.is_recursive = recursion::calls_itself(func);
            if info.is_recursive {
                tracing::debug!(function = %info.name, "direct self-call found");
            }
        }

        infos
    }

    // ══════════════════════════════════════════════════════════════════════
    // Pass 1
    // ══════════════════════════════════════════════════════════════════════

    fn collect_function(&self, func: &FunctionDecl, is_entry: bool) -> FunctionInfo {
        let mut info = FunctionInfo {
            name: func.name.name.clone(),
            return_type: func.return_type,
            is_entry,
            is_recursive: false,
            start_line: func.span.start_line,
            end_line: func.span.end_line,
            parameters: func
                .params
                .iter()
                .map(|p| ParameterInfo {
                    type_tag: p.type_tag,
                    name: p.name.name.clone(),
                })
                .collect(),
            locals: Vec::new(),
            control_structures: Vec::new(),
        };
        self.collect_block(&func.body, &mut info);

        tracing::debug!(
            function = %info.name,
            params = info.parameters.len(),
            locals = info.locals.len(),
            controls = info.control_structures.len(),
            "collected function"
        );
        info
    }

    fn collect_block(&self, block: &Block, info: &mut FunctionInfo) {
        for stmt in &block.stmts {
            self.collect_stmt(stmt, info);
        }
    }

    fn collect_stmt(&self, stmt: &Stmt, info: &mut FunctionInfo) {
        match stmt {
            Stmt::Declaration(decl) => self.collect_declaration(decl, info),
            Stmt::If(if_stmt) => {
                let kind = if if_stmt.else_block.is_some() {
                    ControlKind::IfElse
                } else {
                    ControlKind::If
                };
                push_control(info, kind, if_stmt.span.start_line);
                self.collect_block(&if_stmt.then_block, info);
                if let Some(else_block) = &if_stmt.else_block {
                    self.collect_block(else_block, info);
                }
            }
            Stmt::For(for_stmt) => {
                push_control(info, ControlKind::For, for_stmt.span.start_line);
                if let Some(init) = &for_stmt.init {
                    self.collect_declaration(init, info);
                }
                self.collect_block(&for_stmt.body, info);
            }
            Stmt::While(while_stmt) => {
                push_control(info, ControlKind::While, while_stmt.span.start_line);
                self.collect_block(&while_stmt.body, info);
            }
            Stmt::Assign(_) | Stmt::Expr(_) | Stmt::Return(_) | Stmt::Call(_) => {}
        }
    }

    fn collect_declaration(&self, decl: &Declaration, info: &mut FunctionInfo) {
        for declarator in &decl.declarators {
            info.locals.push(LocalVariableInfo {
                type_tag: decl.type_tag,
                name: declarator.name.name.clone(),
                initializer: self.initializer_text(declarator.init.as_ref()),
                line: declarator.name.span.start_line,
            });
        }
    }

    fn initializer_text(&self, init: Option<&Initializer>) -> String {
        let Some(init) = init else {
            return String::new();
        };
        self.source
            .and_then(|source| source.slice(init.span()))
            .map(str::to_string)
            .unwrap_or_else(|| init.to_string())
    }
}

fn push_control(info: &mut FunctionInfo, kind: ControlKind, line: u32) {
    info.control_structures.push(ControlStructureInfo { kind, line });
}
