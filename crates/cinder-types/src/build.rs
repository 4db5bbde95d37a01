//! Tree construction helpers.
//!
//! Front ends that already track offsets build nodes directly; these helpers
//! assemble trees with line-only spans (see [`Span::line`]) for hosts and
//! tests that have no source text. Use [`Stmt::on_line`] and
//! [`FunctionDecl::lines`] to attach line numbers.

use crate::ast::*;
use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

pub fn num(n: f64) -> Expr {
    Expr::new(ExprKind::NumberLit(n), Span::default())
}

pub fn var(name: &str) -> Expr {
    Expr::new(ExprKind::Variable(name.to_string()), Span::default())
}

pub fn paren(inner: Expr) -> Expr {
    Expr::new(ExprKind::Paren(Box::new(inner)), Span::default())
}

pub fn call(name: &str, args: Vec<Expr>) -> Expr {
    Expr::new(ExprKind::Call(call_expr(name, args)), Span::default())
}

pub fn binary(left: Expr, op: ArithOp, right: Expr) -> Expr {
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        Span::default(),
    )
}

pub fn add(left: Expr, right: Expr) -> Expr {
    binary(left, ArithOp::Add, right)
}

pub fn sub(left: Expr, right: Expr) -> Expr {
    binary(left, ArithOp::Sub, right)
}

pub fn mul(left: Expr, right: Expr) -> Expr {
    binary(left, ArithOp::Mul, right)
}

pub fn div(left: Expr, right: Expr) -> Expr {
    binary(left, ArithOp::Div, right)
}

pub fn rem(left: Expr, right: Expr) -> Expr {
    binary(left, ArithOp::Mod, right)
}

pub fn text(value: &str) -> Initializer {
    Initializer::Text(TextLit {
        value: value.to_string(),
        span: Span::default(),
    })
}

fn call_expr(name: &str, args: Vec<Expr>) -> CallExpr {
    CallExpr {
        callee: Ident::new(name, Span::default()),
        args,
    }
}

impl From<Expr> for Initializer {
    fn from(expr: Expr) -> Self {
        Initializer::Expr(expr)
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditions
// ══════════════════════════════════════════════════════════════════════════════

fn term(kind: TermKind) -> Term {
    Term {
        kind,
        span: Span::default(),
    }
}

pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Term {
    term(TermKind::Compare { left, op, right })
}

pub fn not(inner: Term) -> Term {
    term(TermKind::Not(Box::new(inner)))
}

pub fn group(inner: Condition) -> Term {
    term(TermKind::Group(Box::new(inner)))
}

pub fn truth(value: bool) -> Term {
    term(TermKind::Bool(value))
}

pub fn null() -> Term {
    term(TermKind::Null)
}

pub fn truthy(expr: Expr) -> Term {
    term(TermKind::Arith(expr))
}

impl From<Term> for Condition {
    fn from(head: Term) -> Self {
        Condition {
            head,
            rest: Vec::new(),
            span: Span::default(),
        }
    }
}

impl Condition {
    /// Chain `&& term` onto the end of the condition.
    pub fn and(mut self, next: Term) -> Self {
        self.rest.push((LogicOp::And, next));
        self
    }

    /// Chain `|| term` onto the end of the condition.
    pub fn or(mut self, next: Term) -> Self {
        self.rest.push((LogicOp::Or, next));
        self
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

pub fn declarator(name: &str, init: Option<Initializer>) -> Declarator {
    Declarator {
        name: Ident::new(name, Span::default()),
        init,
        span: Span::default(),
    }
}

pub fn declaration(type_tag: TypeTag, declarators: Vec<Declarator>) -> Declaration {
    Declaration {
        type_tag,
        declarators,
        span: Span::default(),
    }
}

/// `type name = init;` with a single declarator.
pub fn declare(type_tag: TypeTag, name: &str, init: Option<Initializer>) -> Stmt {
    Stmt::Declaration(declaration(type_tag, vec![declarator(name, init)]))
}

pub fn assignment(target: &str, op: AssignOp) -> AssignStmt {
    AssignStmt {
        target: Ident::new(target, Span::default()),
        op,
        span: Span::default(),
    }
}

pub fn assign(target: &str, value: impl Into<Initializer>) -> Stmt {
    Stmt::Assign(assignment(target, AssignOp::Set(value.into())))
}

pub fn increment(target: &str) -> Stmt {
    Stmt::Assign(assignment(target, AssignOp::Increment))
}

pub fn decrement(target: &str) -> Stmt {
    Stmt::Assign(assignment(target, AssignOp::Decrement))
}

pub fn compound(target: &str, op: CompoundOp, value: Expr) -> Stmt {
    Stmt::Assign(assignment(target, AssignOp::Compound(op, value)))
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(ExprStmt {
        expr,
        span: Span::default(),
    })
}

pub fn call_stmt(name: &str, args: Vec<Expr>) -> Stmt {
    Stmt::Call(CallStmt {
        call: call_expr(name, args),
        span: Span::default(),
    })
}

pub fn ret(value: Option<Initializer>) -> Stmt {
    Stmt::Return(ReturnStmt {
        value,
        span: Span::default(),
    })
}

pub fn block(stmts: Vec<Stmt>) -> Block {
    Block {
        stmts,
        span: Span::default(),
    }
}

pub fn if_then(condition: impl Into<Condition>, then: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        condition: condition.into(),
        then_block: block(then),
        else_block: None,
        span: Span::default(),
    })
}

pub fn if_else(condition: impl Into<Condition>, then: Vec<Stmt>, otherwise: Vec<Stmt>) -> Stmt {
    Stmt::If(IfStmt {
        condition: condition.into(),
        then_block: block(then),
        else_block: Some(block(otherwise)),
        span: Span::default(),
    })
}

pub fn for_loop(
    init: Option<Declaration>,
    condition: Option<Condition>,
    update: Option<AssignStmt>,
    body: Vec<Stmt>,
) -> Stmt {
    Stmt::For(ForStmt {
        init,
        condition,
        update,
        body: block(body),
        span: Span::default(),
    })
}

pub fn while_loop(condition: Option<Condition>, body: Vec<Stmt>) -> Stmt {
    Stmt::While(WhileStmt {
        condition,
        body: block(body),
        span: Span::default(),
    })
}

impl Stmt {
    /// Place the statement on `line`. For declarations every declarator
    /// identifier moves with it; nested blocks keep their own lines.
    pub fn on_line(mut self, line: u32) -> Self {
        let span = Span::line(line);
        match &mut self {
            Stmt::Declaration(d) => place_declaration(d, line),
            Stmt::Assign(s) => {
                s.span = span;
                s.target.span = span;
            }
            Stmt::Expr(s) => s.span = span,
            Stmt::If(s) => s.span = span,
            Stmt::For(s) => {
                s.span = span;
                if let Some(init) = &mut s.init {
                    place_declaration(init, line);
                }
            }
            Stmt::While(s) => s.span = span,
            Stmt::Return(s) => s.span = span,
            Stmt::Call(s) => s.span = span,
        }
        self
    }
}

fn place_declaration(decl: &mut Declaration, line: u32) {
    let span = Span::line(line);
    decl.span = span;
    for d in &mut decl.declarators {
        d.span = span;
        d.name.span = span;
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Functions & Programs
// ══════════════════════════════════════════════════════════════════════════════

pub fn function(
    return_type: TypeTag,
    name: &str,
    params: &[(TypeTag, &str)],
    body: Vec<Stmt>,
) -> FunctionDecl {
    FunctionDecl {
        name: Ident::new(name, Span::default()),
        return_type,
        params: params
            .iter()
            .map(|(type_tag, name)| Param {
                type_tag: *type_tag,
                name: Ident::new(*name, Span::default()),
                span: Span::default(),
            })
            .collect(),
        body: block(body),
        span: Span::default(),
    }
}

impl FunctionDecl {
    /// Set the function's first and last line.
    pub fn lines(mut self, start_line: u32, end_line: u32) -> Self {
        self.span = Span::new(0, 0, start_line, end_line);
        self.name.span = Span::line(start_line);
        self
    }
}

pub fn program(items: Vec<Item>, entry: FunctionDecl) -> Program {
    Program {
        items,
        entry,
        span: Span::default(),
    }
}

/// A program consisting only of an entry function `main` with `body`.
pub fn main_only(body: Vec<Stmt>) -> Program {
    program(Vec::new(), function(TypeTag::Void, "main", &[], body))
}
