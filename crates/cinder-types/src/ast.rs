//! Syntax tree node types for Cinder.
//!
//! The tree is produced by an external front end and consumed read-only by
//! the evaluator and the function analyzer. Every node carries a [`Span`].
//! Large recursive types are boxed to keep enum sizes reasonable.

use crate::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

// ══════════════════════════════════════════════════════════════════════════════
// Top Level
// ══════════════════════════════════════════════════════════════════════════════

/// A complete program: top-level items followed by the entry function.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub items: Vec<Item>,
    pub entry: FunctionDecl,
    pub span: Span,
}

impl Program {
    /// Declared functions in source order, entry function last.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.items
            .iter()
            .filter_map(|item| match item {
                Item::Function(f) => Some(f),
                Item::Global(_) => None,
            })
            .chain(std::iter::once(&self.entry))
    }
}

/// A top-level item preceding the entry function.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    /// `int square(int n) { ... }`
    Function(FunctionDecl),
    /// `int limit = 10;` at program level
    Global(Declaration),
}

/// `type name(params) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: Ident,
    pub return_type: TypeTag,
    pub params: Vec<Param>,
    pub body: Block,
    pub span: Span,
}

/// A parameter: `type name`
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub type_tag: TypeTag,
    pub name: Ident,
    pub span: Span,
}

/// `{ statements... }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Identifiers & Type Tags
// ══════════════════════════════════════════════════════════════════════════════

/// A spanned identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Declared type of a variable, parameter or function result.
///
/// All non-string tags unify to one numeric kind at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Int,
    Double,
    Float,
    String,
    /// Function return types only.
    Void,
}

impl TypeTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeTag::Int => "int",
            TypeTag::Double => "double",
            TypeTag::Float => "float",
            TypeTag::String => "string",
            TypeTag::Void => "void",
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

/// A statement in a block.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `int a = 1, b;`
    Declaration(Declaration),
    /// `x = e;`, `x++;`, `x += e;`
    Assign(AssignStmt),
    /// A bare arithmetic expression.
    Expr(ExprStmt),
    /// `if (cond) { ... } [else { ... }]`
    If(IfStmt),
    /// `for ([decl]; [cond]; [update]) { ... }`
    For(ForStmt),
    /// `while ([cond]) { ... }`
    While(WhileStmt),
    /// `return [value];`
    Return(ReturnStmt),
    /// `name(args);`
    Call(CallStmt),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Declaration(s) => s.span,
            Stmt::Assign(s) => s.span,
            Stmt::Expr(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::Call(s) => s.span,
        }
    }
}

/// `type a [= init], b [= init], ...`
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub type_tag: TypeTag,
    pub declarators: Vec<Declarator>,
    pub span: Span,
}

/// One `name [= init]` inside a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: Ident,
    pub init: Option<Initializer>,
    pub span: Span,
}

/// Right-hand side of a declarator, plain assignment or return.
#[derive(Debug, Clone, PartialEq)]
pub enum Initializer {
    Expr(Expr),
    Text(TextLit),
}

impl Initializer {
    pub fn span(&self) -> Span {
        match self {
            Initializer::Expr(e) => e.span,
            Initializer::Text(t) => t.span,
        }
    }
}

/// `"text"`; `value` holds the unquoted contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLit {
    pub value: String,
    pub span: Span,
}

/// `target <op>`
#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub target: Ident,
    pub op: AssignOp,
    pub span: Span,
}

/// The assignment form and its operand, if any.
#[derive(Debug, Clone, PartialEq)]
pub enum AssignOp {
    /// `= value`
    Set(Initializer),
    /// `++`
    Increment,
    /// `--`
    Decrement,
    /// `+= -= *= /= %=`
    Compound(CompoundOp, Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompoundOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl CompoundOp {
    /// The arithmetic operator this compound form applies.
    pub fn arith_op(&self) -> ArithOp {
        match self {
            CompoundOp::Add => ArithOp::Add,
            CompoundOp::Sub => ArithOp::Sub,
            CompoundOp::Mul => ArithOp::Mul,
            CompoundOp::Div => ArithOp::Div,
            CompoundOp::Mod => ArithOp::Mod,
        }
    }
}

/// A bare expression statement.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub span: Span,
}

/// `if (cond) { then } [else { else }]`
///
/// Both branches are owned separately; the span starts at the `if` keyword.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Condition,
    pub then_block: Block,
    pub else_block: Option<Block>,
    pub span: Span,
}

/// `for ([init]; [condition]; [update]) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Declaration>,
    pub condition: Option<Condition>,
    pub update: Option<AssignStmt>,
    pub body: Block,
    pub span: Span,
}

/// `while ([condition]) { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Option<Condition>,
    pub body: Block,
    pub span: Span,
}

/// `return [value];`
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Initializer>,
    pub span: Span,
}

/// `name(args);`
#[derive(Debug, Clone, PartialEq)]
pub struct CallStmt {
    pub call: CallExpr,
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// An arithmetic expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of arithmetic expression.
///
/// Precedence is already resolved by the front end: `2 + 3 * 4` arrives as
/// `Binary(2, Add, Binary(3, Mul, 4))`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// `42`, `3.14`
    NumberLit(f64),
    /// `count`
    Variable(String),
    /// `(expr)`
    Paren(Box<Expr>),
    /// `sqrt(x)`
    Call(CallExpr),
    /// `a + b`, `a % b`, ...
    Binary {
        left: Box<Expr>,
        op: ArithOp,
        right: Box<Expr>,
    },
}

/// `callee(args...)`
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Ident,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl ArithOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "/",
            ArithOp::Mod => "%",
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditions
// ══════════════════════════════════════════════════════════════════════════════

/// `term (op term)*`, folded strictly left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub head: Term,
    pub rest: Vec<(LogicOp, Term)>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// A single logical term.
#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub kind: TermKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TermKind {
    /// `a < b`, `a == b`, ...
    Compare {
        left: Expr,
        op: CmpOp,
        right: Expr,
    },
    /// `!term`
    Not(Box<Term>),
    /// `(cond)`
    Group(Box<Condition>),
    /// `true` / `false`
    Bool(bool),
    /// `null`
    Null,
    /// A bare arithmetic expression, true when non-zero.
    Arith(Expr),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
}

// ══════════════════════════════════════════════════════════════════════════════
// Canonical text
// ══════════════════════════════════════════════════════════════════════════════

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::NumberLit(n) => write!(f, "{n}"),
            ExprKind::Variable(name) => f.write_str(name),
            ExprKind::Paren(inner) => write!(f, "({inner})"),
            ExprKind::Call(call) => write!(f, "{call}"),
            ExprKind::Binary { left, op, right } => {
                write!(f, "{left} {} {right}", op.as_str())
            }
        }
    }
}

impl fmt::Display for CallExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.callee.name)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}

impl fmt::Display for TextLit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)
    }
}

impl fmt::Display for Initializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Initializer::Expr(e) => write!(f, "{e}"),
            Initializer::Text(t) => write!(f, "{t}"),
        }
    }
}
