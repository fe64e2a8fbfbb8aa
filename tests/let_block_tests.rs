use larch::{eval, Error, EvalErrorKind, Value};

fn eval_ok(source: &str) -> Value {
    eval(source).unwrap_or_else(|err| panic!("evaluation failed for {source:?}: {err}"))
}

#[test]
fn simple_binding() {
    assert_eq!(eval_ok("let x = 1 in x + 1"), Value::Int(2));
}

#[test]
fn bindings_see_later_declarations() {
    let source = "let b = a + 1\n       a = 1\n   in b";
    assert_eq!(eval_ok(source), Value::Int(2));
}

#[test]
fn mutually_recursive_functions() {
    let source = "let isEven n = if n == 0 then True else isOdd (n - 1)\n       isOdd n = if n == 0 then False else isEven (n - 1)\n   in isEven 10";
    assert_eq!(eval_ok(source), Value::Bool(true));
}

#[test]
fn destructuring_declaration() {
    assert_eq!(eval_ok("let (a, b) = (1, 2) in a + b"), Value::Int(3));
}

#[test]
fn nested_lets_shadow() {
    assert_eq!(eval_ok("let x = 1 in let x = 2 in x"), Value::Int(2));
}

#[test]
fn let_function_shadows_a_stdlib_name() {
    assert_eq!(
        eval_ok("let identity x = x + 1 in identity 1"),
        Value::Int(2)
    );
}

#[test]
fn cycle_through_nullary_bindings_is_rejected() {
    let source = "let x = y\n       y = x\n   in x";
    match eval(source) {
        Err(Error::EvalError(err)) => assert_eq!(
            err.kind,
            EvalErrorKind::TypeError("illegal cycle in let block".to_string())
        ),
        other => panic!("expected an illegal-cycle error, got {other:?}"),
    }
}

#[test]
fn cycle_through_a_destructuring_is_rejected() {
    let source = "let (a, b) = (c, 1)\n       c = a\n   in a";
    match eval(source) {
        Err(Error::EvalError(err)) => {
            assert!(matches!(err.kind, EvalErrorKind::TypeError(msg) if msg.contains("cycle")))
        }
        other => panic!("expected an illegal-cycle error, got {other:?}"),
    }
}

#[test]
fn self_recursion_in_a_let_function_is_fine() {
    assert_eq!(
        eval_ok("let count n = if n == 0 then 0 else 1 + count (n - 1) in count 5"),
        Value::Int(5)
    );
}

#[test]
fn let_body_is_in_tail_position() {
    // Deep chain of lets whose bodies delegate to a tail-recursive loop.
    assert_eq!(
        eval_ok("let go n = if n == 0 then () else go (n - 1) in go 50000"),
        Value::Unit
    );
}

#[test]
fn functions_may_use_sibling_values() {
    let source = "let base = 10\n       shift n = base + n\n   in shift 5";
    assert_eq!(eval_ok(source), Value::Int(15));
}

#[test]
fn multiline_let_with_in_on_its_own_line() {
    let source = "module Scratch exposing (main)\n\nmain =\n    let\n        x = 1\n        y = x + 1\n    in\n    x + y";
    assert_eq!(larch::eval_module(source, "main").unwrap(), Value::Int(3));
}
