//! Direct self-call detection.
//!
//! Purely syntactic: a function is recursive when its own body contains a
//! call naming it. Calls through other functions (mutual recursion) are not
//! followed. Only these positions are searched: assignment right-hand sides,
//! bare expressions, call statements, return values, and the bodies of
//! nested `if`/`for`/`while`. Conditions, declaration initializers, loop
//! updates and call arguments are not.

use cinder_types::ast::*;

/// Whether `func`'s body directly calls `func`. Stops at the first match.
pub(crate) fn calls_itself(func: &FunctionDecl) -> bool {
    block_calls(&func.body, &func.name.name)
}

fn block_calls(block: &Block, name: &str) -> bool {
    block.stmts.iter().any(|stmt| stmt_calls(stmt, name))
}

fn stmt_calls(stmt: &Stmt, name: &str) -> bool {
    match stmt {
        Stmt::Assign(assign) => match &assign.op {
            AssignOp::Set(init) => initializer_calls(init, name),
            AssignOp::Compound(_, rhs) => expr_calls(rhs, name),
            AssignOp::Increment | AssignOp::Decrement => false,
        },
        Stmt::Expr(expr_stmt) => expr_calls(&expr_stmt.expr, name),
        Stmt::Call(call_stmt) => call_stmt.call.callee.name == name,
        Stmt::Return(ret) => ret
            .value
            .as_ref()
            .is_some_and(|value| initializer_calls(value, name)),
        Stmt::If(if_stmt) => {
            block_calls(&if_stmt.then_block, name)
                || if_stmt
                    .else_block
                    .as_ref()
                    .is_some_and(|block| block_calls(block, name))
        }
        Stmt::For(for_stmt) => block_calls(&for_stmt.body, name),
        Stmt::While(while_stmt) => block_calls(&while_stmt.body, name),
        Stmt::Declaration(_) => false,
    }
}

fn initializer_calls(init: &Initializer, name: &str) -> bool {
    match init {
        Initializer::Expr(expr) => expr_calls(expr, name),
        Initializer::Text(_) => false,
    }
}

fn expr_calls(expr: &Expr, name: &str) -> bool {
    match &expr.kind {
        ExprKind::Call(call) => call.callee.name == name,
        ExprKind::Binary { left, right, .. } => {
            expr_calls(left, name) || expr_calls(right, name)
        }
        ExprKind::Paren(inner) => expr_calls(inner, name),
        ExprKind::NumberLit(_) | ExprKind::Variable(_) => false,
    }
}
