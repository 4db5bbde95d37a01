//! Integration tests for the Cinder tree-walking evaluator.
//!
//! Covers:
//! - arithmetic precedence and coercion
//! - declarations, assignments, increment/decrement, compound operators
//! - conditions (epsilon equality, no short-circuit, left-to-right folding)
//! - if/else, for, while, return
//! - built-in dispatch and runtime errors
//! - the flat variable store and configuration

use cinder_eval::{
    evaluate, EvalConfig, EvalError, EvalResult, Evaluator, Value, ValueKind, VariableSnapshot,
};
use cinder_types::ast::{AssignOp, CmpOp, CompoundOp, Condition, Item, Stmt, TypeTag};
use cinder_types::build::*;
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Run `stmts` as the body of `main`, returning the result and the store.
fn run(stmts: Vec<Stmt>) -> (EvalResult<Option<Value>>, BTreeMap<String, VariableSnapshot>) {
    let mut eval = Evaluator::new();
    let result = eval.evaluate(&main_only(stmts));
    (result, eval.variables())
}

/// Run `stmts` and expect success.
fn run_ok(stmts: Vec<Stmt>) -> (Option<Value>, BTreeMap<String, VariableSnapshot>) {
    let (result, vars) = run(stmts);
    match result {
        Ok(value) => (value, vars),
        Err(e) => panic!("unexpected evaluation error: {e}"),
    }
}

/// Run `stmts` and expect an error.
fn run_err(stmts: Vec<Stmt>) -> (EvalError, BTreeMap<String, VariableSnapshot>) {
    let (result, vars) = run(stmts);
    match result {
        Ok(value) => panic!("expected an error, got {value:?}"),
        Err(e) => (e, vars),
    }
}

fn number(vars: &BTreeMap<String, VariableSnapshot>, name: &str) -> f64 {
    match vars.get(name).map(|s| &s.value) {
        Some(Value::Number(n)) => *n,
        other => panic!("expected number in '{name}', got {other:?}"),
    }
}

fn int(name: &str, n: f64) -> Stmt {
    declare(TypeTag::Int, name, Some(num(n).into()))
}

// ══════════════════════════════════════════════════════════════════════════════
// Arithmetic
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn precedence_is_structural() {
    let (value, _) = run_ok(vec![expr_stmt(add(num(2.0), mul(num(3.0), num(4.0))))]);
    assert_eq!(value, Some(Value::Number(14.0)));

    let (value, _) = run_ok(vec![expr_stmt(mul(
        paren(add(num(2.0), num(3.0))),
        num(4.0),
    ))]);
    assert_eq!(value, Some(Value::Number(20.0)));
}

#[test]
fn left_operand_evaluated_first() {
    // The left operand fails first, so the error names `a`, not `b`.
    let (err, _) = run_err(vec![expr_stmt(sub(var("a"), var("b")))]);
    match err {
        EvalError::UndefinedVariable { name, .. } => assert_eq!(name, "a"),
        other => panic!("expected UndefinedVariable, got {other:?}"),
    }
}

#[test]
fn division_by_zero_errors() {
    let (err, _) = run_err(vec![expr_stmt(div(num(1.0), num(0.0)))]);
    assert!(matches!(err, EvalError::DivideByZero { .. }));
}

#[test]
fn modulo_is_float_remainder_without_zero_guard() {
    let (value, _) = run_ok(vec![expr_stmt(rem(num(7.5), num(2.0)))]);
    assert_eq!(value, Some(Value::Number(1.5)));

    let (value, _) = run_ok(vec![expr_stmt(rem(num(-7.0), num(3.0)))]);
    assert_eq!(value, Some(Value::Number(-1.0)));

    let (value, _) = run_ok(vec![expr_stmt(rem(num(5.0), num(0.0)))]);
    match value {
        Some(Value::Number(n)) => assert!(n.is_nan()),
        other => panic!("expected NaN, got {other:?}"),
    }
}

#[test]
fn text_coerces_inside_arithmetic() {
    let (value, vars) = run_ok(vec![
        declare(TypeTag::String, "digits", Some(text("12"))),
        declare(TypeTag::String, "word", Some(text("hi"))),
        assign("a", mul(var("digits"), num(2.0))),
        assign("b", add(var("word"), num(1.0))),
    ]);
    assert_eq!(number(&vars, "a"), 24.0);
    assert_eq!(value, Some(Value::Number(1.0)));
}

#[test]
fn bare_variable_keeps_text() {
    let (value, vars) = run_ok(vec![
        declare(TypeTag::String, "s", Some(text("hello"))),
        assign("t", var("s")),
    ]);
    assert_eq!(value, Some(Value::from("hello")));
    assert_eq!(vars["t"].kind, ValueKind::Text);
}

#[test]
fn undefined_variable_errors() {
    let (err, _) = run_err(vec![expr_stmt(var("y"))]);
    assert_eq!(
        err,
        EvalError::UndefinedVariable {
            name: "y".into(),
            span: Default::default(),
        }
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Declarations & Assignments
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn declaration_defaults_and_order() {
    let decl = Stmt::Declaration(declaration(
        TypeTag::Double,
        vec![
            declarator("a", Some(num(1.5).into())),
            declarator("b", None),
            declarator("c", Some(add(var("a"), num(1.0)).into())),
        ],
    ));
    let (value, vars) = run_ok(vec![decl]);
    assert_eq!(number(&vars, "a"), 1.5);
    assert_eq!(number(&vars, "b"), 0.0);
    assert_eq!(number(&vars, "c"), 2.5);
    assert_eq!(value, Some(Value::Number(2.5)));
}

#[test]
fn string_declaration_without_initializer_is_zero() {
    let (_, vars) = run_ok(vec![declare(TypeTag::String, "s", None)]);
    assert_eq!(
        vars["s"],
        VariableSnapshot {
            value: Value::Number(0.0),
            kind: ValueKind::Number,
        }
    );
}

#[test]
fn redeclaration_overwrites() {
    let (_, vars) = run_ok(vec![int("x", 1.0), int("x", 2.0)]);
    assert_eq!(number(&vars, "x"), 2.0);
    assert_eq!(vars.len(), 1);
}

#[test]
fn void_declaration_is_contract_violation() {
    let (err, _) = run_err(vec![declare(TypeTag::Void, "v", None)]);
    assert!(matches!(err, EvalError::InternalInvariant(_)));
}

#[test]
fn increment_and_decrement() {
    let (value, vars) = run_ok(vec![assign("x", num(5.0)), increment("x")]);
    assert_eq!(value, Some(Value::Number(6.0)));
    assert_eq!(number(&vars, "x"), 6.0);

    let (value, vars) = run_ok(vec![assign("x", num(5.0)), increment("x"), decrement("x")]);
    assert_eq!(value, Some(Value::Number(5.0)));
    assert_eq!(number(&vars, "x"), 5.0);
}

#[test]
fn increment_coerces_text() {
    let (value, vars) = run_ok(vec![assign("x", text("41")), increment("x")]);
    assert_eq!(value, Some(Value::Number(42.0)));
    assert_eq!(vars["x"].kind, ValueKind::Number);
}

#[test]
fn increment_of_undefined_errors() {
    let (err, vars) = run_err(vec![increment("missing")]);
    assert!(matches!(err, EvalError::UndefinedVariable { .. }));
    assert!(vars.is_empty());
}

#[test]
fn compound_operators() {
    let (_, vars) = run_ok(vec![
        assign("a", num(10.0)),
        compound("a", CompoundOp::Add, num(5.0)),
        assign("b", num(10.0)),
        compound("b", CompoundOp::Sub, num(4.0)),
        assign("c", num(3.0)),
        compound("c", CompoundOp::Mul, add(num(1.0), num(1.0))),
        assign("d", num(9.0)),
        compound("d", CompoundOp::Div, num(2.0)),
        assign("e", num(9.5)),
        compound("e", CompoundOp::Mod, num(4.0)),
    ]);
    assert_eq!(number(&vars, "a"), 15.0);
    assert_eq!(number(&vars, "b"), 6.0);
    assert_eq!(number(&vars, "c"), 6.0);
    assert_eq!(number(&vars, "d"), 4.5);
    assert_eq!(number(&vars, "e"), 1.5);
}

#[test]
fn compound_divide_by_zero_keeps_prior_value() {
    let (err, vars) = run_err(vec![
        assign("x", num(5.0)),
        compound("x", CompoundOp::Div, num(0.0)),
    ]);
    assert!(matches!(err, EvalError::DivideByZero { .. }));
    assert_eq!(number(&vars, "x"), 5.0);
}

#[test]
fn plain_assignment_replaces_kind() {
    let (_, vars) = run_ok(vec![assign("x", num(5.0)), assign("x", text("five"))]);
    assert_eq!(
        vars["x"],
        VariableSnapshot {
            value: Value::from("five"),
            kind: ValueKind::Text,
        }
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Conditions
// ══════════════════════════════════════════════════════════════════════════════

/// `if (cond) { hit = 1; } else { hit = 0; }` → the value of `hit`.
fn branch_taken(setup: Vec<Stmt>, cond: Condition) -> f64 {
    let mut stmts = setup;
    stmts.push(if_else(
        cond,
        vec![assign("hit", num(1.0))],
        vec![assign("hit", num(0.0))],
    ));
    let (_, vars) = run_ok(stmts);
    number(&vars, "hit")
}

#[test]
fn equality_uses_epsilon() {
    let sum = add(num(0.1), num(0.2));
    assert_eq!(
        branch_taken(vec![], compare(sum.clone(), CmpOp::Eq, num(0.3)).into()),
        1.0
    );
    assert_eq!(
        branch_taken(vec![], compare(sum, CmpOp::NotEq, num(0.3)).into()),
        0.0
    );
}

#[test]
fn epsilon_is_configurable() {
    let mut eval = Evaluator::with_config(EvalConfig { epsilon: 0.0 });
    let prog = main_only(vec![if_else(
        compare(add(num(0.1), num(0.2)), CmpOp::Eq, num(0.3)),
        vec![assign("hit", num(1.0))],
        vec![assign("hit", num(0.0))],
    )]);
    eval.evaluate(&prog).unwrap();
    assert_eq!(number(&eval.variables(), "hit"), 0.0);
}

#[test]
fn ordering_comparisons() {
    let cases = [
        (CmpOp::Less, 1.0, 2.0, 1.0),
        (CmpOp::Less, 2.0, 2.0, 0.0),
        (CmpOp::LessEq, 2.0, 2.0, 1.0),
        (CmpOp::Greater, 3.0, 2.0, 1.0),
        (CmpOp::GreaterEq, 1.0, 2.0, 0.0),
    ];
    for (op, l, r, expected) in cases {
        assert_eq!(
            branch_taken(vec![], compare(num(l), op, num(r)).into()),
            expected,
            "{l} {op:?} {r}"
        );
    }
}

#[test]
fn no_short_circuit_on_or() {
    let (err, _) = run_err(vec![
        assign("x", num(1.0)),
        if_then(
            Condition::from(truth(true)).or(group(
                compare(div(var("x"), num(0.0)), CmpOp::Greater, num(1.0)).into(),
            )),
            vec![],
        ),
    ]);
    assert!(matches!(err, EvalError::DivideByZero { .. }));
}

#[test]
fn no_short_circuit_on_and() {
    let (err, _) = run_err(vec![if_then(
        Condition::from(truth(false)).and(truthy(var("ghost"))),
        vec![],
    )]);
    assert!(matches!(err, EvalError::UndefinedVariable { .. }));
}

#[test]
fn chain_folds_left_to_right() {
    // (true || false) && false, not true || (false && false)
    let cond = Condition::from(truth(true)).or(truth(false)).and(truth(false));
    assert_eq!(branch_taken(vec![], cond), 0.0);
}

#[test]
fn literal_null_not_and_truthy_terms() {
    assert_eq!(branch_taken(vec![], null().into()), 0.0);
    assert_eq!(branch_taken(vec![], not(null()).into()), 1.0);
    assert_eq!(branch_taken(vec![], truthy(num(0.0)).into()), 0.0);
    assert_eq!(branch_taken(vec![], truthy(sub(num(1.0), num(3.0))).into()), 1.0);
    assert_eq!(
        branch_taken(vec![], not(group(Condition::from(truth(true)).and(truth(false)))).into()),
        1.0
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Control flow
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn if_else_takes_exactly_one_branch() {
    let program = |x: f64| {
        vec![
            assign("x", num(x)),
            if_else(
                compare(var("x"), CmpOp::Greater, num(0.0)),
                vec![assign("y", num(1.0))],
                vec![assign("y", num(2.0))],
            ),
        ]
    };
    let (value, vars) = run_ok(program(-1.0));
    assert_eq!(number(&vars, "y"), 2.0);
    assert_eq!(value, Some(Value::Number(2.0)));

    let (_, vars) = run_ok(program(1.0));
    assert_eq!(number(&vars, "y"), 1.0);
}

#[test]
fn nested_if_in_then_branch_does_not_leak_into_else() {
    let (_, vars) = run_ok(vec![
        assign("x", num(1.0)),
        assign("log", num(0.0)),
        if_else(
            compare(var("x"), CmpOp::Greater, num(0.0)),
            vec![
                if_then(truth(true), vec![compound("log", CompoundOp::Add, num(1.0))]),
                compound("log", CompoundOp::Add, num(10.0)),
            ],
            vec![compound("log", CompoundOp::Add, num(100.0))],
        ),
    ]);
    assert_eq!(number(&vars, "log"), 11.0);
}

#[test]
fn if_without_else_false_produces_no_value() {
    let (value, vars) = run_ok(vec![
        int("x", 3.0),
        if_then(truth(false), vec![assign("x", num(4.0))]),
    ]);
    assert_eq!(value, None);
    assert_eq!(number(&vars, "x"), 3.0);
}

#[test]
fn loop_variables_persist() {
    let (_, vars) = run_ok(vec![
        Stmt::Declaration(declaration(
            TypeTag::Int,
            vec![
                declarator("i", Some(num(0.0).into())),
                declarator("s", Some(num(0.0).into())),
            ],
        )),
        for_loop(
            None,
            Some(compare(var("i"), CmpOp::Less, num(3.0)).into()),
            Some(assignment("i", AssignOp::Increment)),
            vec![compound("s", CompoundOp::Add, var("i"))],
        ),
    ]);
    assert_eq!(number(&vars, "i"), 3.0);
    assert_eq!(number(&vars, "s"), 3.0);
}

#[test]
fn for_init_declaration_runs_once_and_persists() {
    let (value, vars) = run_ok(vec![
        int("total", 0.0),
        for_loop(
            Some(declaration(TypeTag::Int, vec![declarator("k", Some(num(1.0).into()))])),
            Some(compare(var("k"), CmpOp::LessEq, num(4.0)).into()),
            Some(assignment("k", AssignOp::Increment)),
            vec![
                compound("total", CompoundOp::Mul, var("k")),
                compound("total", CompoundOp::Add, num(1.0)),
            ],
        ),
    ]);
    // ((((0*1+1)*2+1)*3+1)*4+1)
    assert_eq!(number(&vars, "total"), 41.0);
    assert_eq!(number(&vars, "k"), 5.0);
    assert_eq!(value, Some(Value::Number(41.0)));
}

#[test]
fn for_with_false_condition_never_runs_body() {
    let (value, vars) = run_ok(vec![for_loop(
        Some(declaration(TypeTag::Int, vec![declarator("k", Some(num(9.0).into()))])),
        Some(compare(var("k"), CmpOp::Less, num(0.0)).into()),
        None,
        vec![assign("touched", num(1.0))],
    )]);
    assert_eq!(value, None);
    assert!(!vars.contains_key("touched"));
    assert_eq!(number(&vars, "k"), 9.0);
}

#[test]
fn while_loop_counts() {
    let (_, vars) = run_ok(vec![
        int("n", 0.0),
        while_loop(
            Some(compare(var("n"), CmpOp::Less, num(5.0)).into()),
            vec![increment("n")],
        ),
    ]);
    assert_eq!(number(&vars, "n"), 5.0);
}

#[test]
fn while_on_truthy_arithmetic() {
    let (_, vars) = run_ok(vec![
        int("n", 3.0),
        int("steps", 0.0),
        while_loop(
            Some(truthy(var("n")).into()),
            vec![decrement("n"), increment("steps")],
        ),
    ]);
    assert_eq!(number(&vars, "n"), 0.0);
    assert_eq!(number(&vars, "steps"), 3.0);
}

#[test]
fn return_does_not_leave_a_loop() {
    // int x = 0; for (; x < 3;) { return 7; x++; } x = 5;
    let (value, vars) = run_ok(vec![
        int("x", 0.0),
        for_loop(
            None,
            Some(compare(var("x"), CmpOp::Less, num(3.0)).into()),
            None,
            vec![ret(Some(num(7.0).into())), increment("x")],
        ),
        assign("x", num(5.0)),
    ]);
    assert_eq!(value, Some(Value::Number(5.0)));
    assert_eq!(number(&vars, "x"), 5.0);
}

#[test]
fn loop_result_is_last_body_value_after_return() {
    let (value, vars) = run_ok(vec![
        int("n", 0.0),
        while_loop(
            Some(compare(var("n"), CmpOp::Less, num(2.0)).into()),
            vec![increment("n"), ret(Some(mul(var("n"), num(10.0)).into()))],
        ),
    ]);
    assert_eq!(value, Some(Value::Number(20.0)));
    assert_eq!(number(&vars, "n"), 2.0);
}

#[test]
fn return_does_not_stop_the_entry_block() {
    let (value, vars) = run_ok(vec![
        int("x", 1.0),
        ret(Some(add(var("x"), num(1.0)).into())),
        assign("x", num(99.0)),
    ]);
    assert_eq!(value, Some(Value::Number(99.0)));
    assert_eq!(number(&vars, "x"), 99.0);
}

#[test]
fn return_value_is_the_result_when_last() {
    let (value, _) = run_ok(vec![
        int("x", 1.0),
        ret(Some(add(var("x"), num(1.0)).into())),
    ]);
    assert_eq!(value, Some(Value::Number(2.0)));
}

#[test]
fn bare_return_produces_no_value() {
    let (value, _) = run_ok(vec![int("x", 1.0), ret(None)]);
    assert_eq!(value, None);
}

#[test]
fn return_of_text() {
    let (value, _) = run_ok(vec![ret(Some(text("done")))]);
    assert_eq!(value, Some(Value::from("done")));
}

// ══════════════════════════════════════════════════════════════════════════════
// Built-ins
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn builtin_dispatch() {
    let (value, _) = run_ok(vec![expr_stmt(call("sqrt", vec![num(16.0)]))]);
    assert_eq!(value, Some(Value::Number(4.0)));

    let (value, _) = run_ok(vec![call_stmt("cos", vec![num(0.0)])]);
    assert_eq!(value, Some(Value::Number(1.0)));

    let (value, _) = run_ok(vec![expr_stmt(add(call("sin", vec![num(0.0)]), num(1.0)))]);
    assert_eq!(value, Some(Value::Number(1.0)));
}

#[test]
fn builtin_domain_errors_are_nan() {
    let (value, _) = run_ok(vec![expr_stmt(call("sqrt", vec![num(-1.0)]))]);
    match value {
        Some(Value::Number(n)) => assert!(n.is_nan()),
        other => panic!("expected NaN, got {other:?}"),
    }
}

#[test]
fn unknown_builtin_errors_before_arguments() {
    let (err, _) = run_err(vec![call_stmt("square", vec![var("undefined")])]);
    match err {
        EvalError::UnknownBuiltinFunction { name, .. } => assert_eq!(name, "square"),
        other => panic!("expected UnknownBuiltinFunction, got {other:?}"),
    }
}

#[test]
fn builtin_arity_is_checked() {
    let (err, _) = run_err(vec![expr_stmt(call("log", vec![num(1.0), num(2.0)]))]);
    assert!(matches!(
        err,
        EvalError::BuiltinArity {
            expected: 1,
            found: 2,
            ..
        }
    ));
}

// ══════════════════════════════════════════════════════════════════════════════
// Program structure & store lifecycle
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn globals_run_and_functions_are_skipped() {
    let prog = program(
        vec![
            Item::Global(declaration(
                TypeTag::Int,
                vec![declarator("limit", Some(num(10.0).into()))],
            )),
            Item::Function(function(
                TypeTag::Int,
                "broken",
                &[],
                vec![expr_stmt(var("never_defined"))],
            )),
        ],
        function(TypeTag::Void, "main", &[], vec![assign("twice", mul(var("limit"), num(2.0)))]),
    );
    let result = evaluate(&prog).unwrap();
    assert_eq!(result.value, Some(Value::Number(20.0)));
    assert_eq!(number(&result.variables, "limit"), 10.0);
}

#[test]
fn empty_entry_keeps_last_global_value() {
    let prog = program(
        vec![Item::Global(declaration(TypeTag::Int, vec![declarator("g", Some(num(3.0).into()))]))],
        function(TypeTag::Void, "main", &[], vec![]),
    );
    assert_eq!(evaluate(&prog).unwrap().value, Some(Value::Number(3.0)));
    assert_eq!(evaluate(&main_only(vec![])).unwrap().value, None);
}

#[test]
fn store_resets_between_runs() {
    let mut eval = Evaluator::new();
    eval.evaluate(&main_only(vec![int("a", 1.0)])).unwrap();
    eval.evaluate(&main_only(vec![int("b", 2.0)])).unwrap();
    let vars = eval.variables();
    assert!(!vars.contains_key("a"));
    assert_eq!(number(&vars, "b"), 2.0);
}

#[test]
fn error_messages_name_the_problem() {
    let (err, _) = run_err(vec![expr_stmt(var("y"))]);
    assert_eq!(err.to_string(), "undefined variable 'y' (line 0)");

    let (err, _) = run_err(vec![call_stmt("tan", vec![num(1.0)])]);
    assert!(err.to_string().contains("unknown built-in function 'tan'"));
}

#[test]
fn config_deserializes_with_defaults() {
    let config: EvalConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, EvalConfig::default());

    let config: EvalConfig = serde_json::from_str(r#"{"epsilon": 0.5}"#).unwrap();
    assert!(config.approx_eq(1.0, 1.4));

    assert!(serde_json::from_str::<EvalConfig>(r#"{"gas": 1}"#).is_err());
}

#[test]
fn snapshot_serializes_kinds() {
    let (_, vars) = run_ok(vec![int("n", 2.0), declare(TypeTag::String, "s", Some(text("x")))]);
    let json = serde_json::to_string(&vars).unwrap();
    assert!(json.contains(r#""kind":"number""#));
    assert!(json.contains(r#""kind":"text""#));
}
