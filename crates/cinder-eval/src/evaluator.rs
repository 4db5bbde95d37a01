//! Core statement, expression and condition evaluator.

use crate::builtins::Builtin;
use crate::config::EvalConfig;
use crate::env::{VariableSnapshot, VariableStore};
use crate::error::{EvalError, EvalResult};
use crate::value::Value;
use cinder_types::ast::*;
use cinder_types::Span;
use std::collections::BTreeMap;

/// The tree-walking evaluator. Owns the variable store for one run at a time.
pub struct Evaluator {
    store: VariableStore,
    config: EvalConfig,
}

impl Evaluator {
    /// Create an evaluator with the default configuration.
    pub fn new() -> Self {
        Self::with_config(EvalConfig::default())
    }

    pub fn with_config(config: EvalConfig) -> Self {
        Self {
            store: VariableStore::new(),
            config,
        }
    }

    /// Snapshot of every variable and its stored kind, as left by the last
    /// run (including a run that failed part way through).
    pub fn variables(&self) -> BTreeMap<String, VariableSnapshot> {
        self.store.snapshot()
    }

    /// Run a program: global declarations first, then the entry block.
    ///
    /// Returns the value produced by the last statement executed. The store
    /// is reset at the start of every run.
    #[tracing::instrument(level = "debug", skip_all, fields(entry = %program.entry.name.name))]
    pub fn evaluate(&mut self, program: &Program) -> EvalResult<Option<Value>> {
        self.store.clear();
        let mut last = None;

        for item in &program.items {
            match item {
                Item::Global(decl) => last = self.exec_declaration(decl)?,
                Item::Function(func) => {
                    tracing::trace!(function = %func.name.name, "skipping function declaration");
                }
            }
        }

        for stmt in &program.entry.body.stmts {
            last = self.exec_stmt(stmt)?;
        }

        tracing::debug!(variables = self.store.len(), "evaluation finished");
        Ok(last)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Block & Statement execution
    // ══════════════════════════════════════════════════════════════════════

    fn exec_block(&mut self, block: &Block) -> EvalResult<Option<Value>> {
        let mut last = None;
        for stmt in &block.stmts {
            last = self.exec_stmt(stmt)?;
        }
        Ok(last)
    }

    /// Execute one statement, yielding the value it produced, if any.
    ///
    /// `return` only produces its value; it does not leave the enclosing
    /// block, loop or program.
    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Option<Value>> {
        tracing::trace!(line = stmt.span().start_line, "exec statement");
        match stmt {
            Stmt::Declaration(decl) => self.exec_declaration(decl),
            Stmt::Assign(assign) => Ok(Some(self.exec_assign(assign)?)),
            Stmt::Expr(expr_stmt) => Ok(Some(self.eval_expr(&expr_stmt.expr)?)),
            Stmt::If(if_stmt) => self.exec_if(if_stmt),
            Stmt::For(for_stmt) => self.exec_for(for_stmt),
            Stmt::While(while_stmt) => self.exec_while(while_stmt),
            Stmt::Return(ret) => ret
                .value
                .as_ref()
                .map(|init| self.eval_initializer(init))
                .transpose(),
            Stmt::Call(call_stmt) => {
                let n = self.eval_call(&call_stmt.call, call_stmt.span)?;
                Ok(Some(Value::Number(n)))
            }
        }
    }

    /// Assign every declarator left to right; an absent initializer stores 0.
    fn exec_declaration(&mut self, decl: &Declaration) -> EvalResult<Option<Value>> {
        if decl.type_tag == TypeTag::Void {
            return Err(EvalError::InternalInvariant(format!(
                "declaration of type 'void' ({})",
                decl.span
            )));
        }

        let mut last = None;
        for declarator in &decl.declarators {
            let value = match &declarator.init {
                Some(init) => self.eval_initializer(init)?,
                None => Value::Number(0.0),
            };
            tracing::trace!(name = %declarator.name.name, %value, "declare");
            self.store.assign(&declarator.name.name, value.clone());
            last = Some(value);
        }
        Ok(last)
    }

    fn exec_assign(&mut self, assign: &AssignStmt) -> EvalResult<Value> {
        let target = &assign.target;
        let value = match &assign.op {
            AssignOp::Set(init) => self.eval_initializer(init)?,
            AssignOp::Increment => Value::Number(self.lookup(target)?.as_number() + 1.0),
            AssignOp::Decrement => Value::Number(self.lookup(target)?.as_number() - 1.0),
            AssignOp::Compound(op, rhs) => {
                let current = self.lookup(target)?.as_number();
                let rhs = self.eval_number(rhs)?;
                Value::Number(apply_arith(current, op.arith_op(), rhs, assign.span)?)
            }
        };
        self.store.assign(&target.name, value.clone());
        Ok(value)
    }

    fn exec_if(&mut self, if_stmt: &IfStmt) -> EvalResult<Option<Value>> {
        if self.eval_condition(&if_stmt.condition)? {
            self.exec_block(&if_stmt.then_block)
        } else if let Some(else_block) = &if_stmt.else_block {
            self.exec_block(else_block)
        } else {
            Ok(None)
        }
    }

    fn exec_for(&mut self, for_stmt: &ForStmt) -> EvalResult<Option<Value>> {
        if let Some(init) = &for_stmt.init {
            self.exec_declaration(init)?;
        }

        let mut last = None;
        let mut iterations: u64 = 0;
        while self.eval_loop_condition(for_stmt.condition.as_ref())? {
            last = self.exec_block(&for_stmt.body)?;
            if let Some(update) = &for_stmt.update {
                self.exec_assign(update)?;
            }
            iterations += 1;
        }
        tracing::debug!(iterations, line = for_stmt.span.start_line, "for loop finished");
        Ok(last)
    }

    fn exec_while(&mut self, while_stmt: &WhileStmt) -> EvalResult<Option<Value>> {
        let mut last = None;
        let mut iterations: u64 = 0;
        while self.eval_loop_condition(while_stmt.condition.as_ref())? {
            last = self.exec_block(&while_stmt.body)?;
            iterations += 1;
        }
        tracing::debug!(iterations, line = while_stmt.span.start_line, "while loop finished");
        Ok(last)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate an arithmetic expression.
    ///
    /// A bare variable yields its stored value unchanged (text stays text);
    /// every operator and call coerces its operands to numbers.
    pub fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::NumberLit(n) => Ok(Value::Number(*n)),
            ExprKind::Variable(name) => self.store.get(name).cloned().ok_or_else(|| {
                EvalError::UndefinedVariable {
                    name: name.clone(),
                    span: expr.span,
                }
            }),
            ExprKind::Paren(inner) => self.eval_expr(inner),
            ExprKind::Call(call) => Ok(Value::Number(self.eval_call(call, expr.span)?)),
            ExprKind::Binary { left, op, right } => {
                let l = self.eval_number(left)?;
                let r = self.eval_number(right)?;
                Ok(Value::Number(apply_arith(l, *op, r, expr.span)?))
            }
        }
    }

    fn eval_number(&mut self, expr: &Expr) -> EvalResult<f64> {
        Ok(self.eval_expr(expr)?.as_number())
    }

    fn eval_initializer(&mut self, init: &Initializer) -> EvalResult<Value> {
        match init {
            Initializer::Expr(expr) => self.eval_expr(expr),
            Initializer::Text(text) => Ok(Value::Text(text.value.clone())),
        }
    }

    fn lookup(&self, ident: &Ident) -> EvalResult<&Value> {
        self.store
            .get(&ident.name)
            .ok_or_else(|| EvalError::UndefinedVariable {
                name: ident.name.clone(),
                span: ident.span,
            })
    }

    /// Dispatch a call to a built-in. The target is resolved before any
    /// argument is evaluated.
    fn eval_call(&mut self, call: &CallExpr, span: Span) -> EvalResult<f64> {
        let name = &call.callee.name;
        let builtin =
            Builtin::from_name(name).ok_or_else(|| EvalError::UnknownBuiltinFunction {
                name: name.clone(),
                span,
            })?;
        if call.args.len() != builtin.arity() {
            return Err(EvalError::BuiltinArity {
                name: name.clone(),
                expected: builtin.arity(),
                found: call.args.len(),
                span,
            });
        }

        let mut args = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            args.push(self.eval_number(arg)?);
        }
        let result = builtin.apply(args[0]);
        tracing::trace!(builtin = builtin.name(), arg = args[0], result, "call");
        Ok(result)
    }

    // ══════════════════════════════════════════════════════════════════════
    // Condition evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate a condition chain left to right.
    ///
    /// Every term is evaluated, even when the result is already decided, so
    /// side effects and errors in later terms are always observed.
    pub fn eval_condition(&mut self, cond: &Condition) -> EvalResult<bool> {
        let mut acc = self.eval_term(&cond.head)?;
        for (op, term) in &cond.rest {
            let rhs = self.eval_term(term)?;
            acc = match op {
                LogicOp::And => acc && rhs,
                LogicOp::Or => acc || rhs,
            };
        }
        Ok(acc)
    }

    fn eval_loop_condition(&mut self, cond: Option<&Condition>) -> EvalResult<bool> {
        match cond {
            Some(cond) => self.eval_condition(cond),
            None => Ok(true),
        }
    }

    fn eval_term(&mut self, term: &Term) -> EvalResult<bool> {
        match &term.kind {
            TermKind::Compare { left, op, right } => {
                let l = self.eval_number(left)?;
                let r = self.eval_number(right)?;
                Ok(match op {
                    CmpOp::Less => l < r,
                    CmpOp::LessEq => l <= r,
                    CmpOp::Greater => l > r,
                    CmpOp::GreaterEq => l >= r,
                    CmpOp::Eq => self.config.approx_eq(l, r),
                    CmpOp::NotEq => !self.config.approx_eq(l, r),
                })
            }
            TermKind::Not(inner) => Ok(!self.eval_term(inner)?),
            TermKind::Group(inner) => self.eval_condition(inner),
            TermKind::Bool(b) => Ok(*b),
            TermKind::Null => Ok(false),
            TermKind::Arith(expr) => Ok(self.eval_number(expr)? != 0.0),
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply a binary arithmetic operator.
///
/// `/` by zero is an error. `%` is the IEEE remainder of `f64` (sign of the
/// dividend) with no zero guard: `x % 0` is NaN.
fn apply_arith(l: f64, op: ArithOp, r: f64, span: Span) -> EvalResult<f64> {
    match op {
        ArithOp::Add => Ok(l + r),
        ArithOp::Sub => Ok(l - r),
        ArithOp::Mul => Ok(l * r),
        ArithOp::Div => {
            if r == 0.0 {
                Err(EvalError::DivideByZero { span })
            } else {
                Ok(l / r)
            }
        }
        ArithOp::Mod => Ok(l % r),
    }
}
