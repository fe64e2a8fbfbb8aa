use pretty_assertions::assert_eq;

use larch::{eval, Error, EvalErrorKind, QualifiedName, Value};

fn eval_ok(source: &str) -> Value {
    eval(source).unwrap_or_else(|err| panic!("evaluation failed for {source:?}: {err}"))
}

fn eval_err(source: &str) -> larch::EvalError {
    match eval(source) {
        Ok(value) => panic!("expected an error for {source:?}, got {value}"),
        Err(Error::EvalError(err)) => err,
        Err(Error::ParsingError(msg)) => panic!("expected an eval error, got parse error: {msg}"),
    }
}

#[test]
fn string_literal() {
    assert_eq!(
        eval_ok(r#""Hello, World""#),
        Value::String("Hello, World".to_string())
    );
}

#[test]
fn integer_addition() {
    assert_eq!(eval_ok("2 + 3"), Value::Int(5));
}

#[test]
fn recursive_fibonacci() {
    assert_eq!(
        eval_ok("let fib n = if n <= 2 then 1 else fib (n - 1) + fib (n - 2) in fib 7"),
        Value::Int(13)
    );
}

#[test]
fn record_access() {
    assert_eq!(eval_ok("{ a = 13, b = 'c'}.b"), Value::Char('c'));
}

#[test]
fn case_branches_fall_through_on_list_length() {
    assert_eq!(
        eval_ok("let foo = Just [] in case foo of Nothing -> -1 \n Just [x] -> 1 \n Just [] -> 0"),
        Value::Int(0)
    );
}

#[test]
fn list_is_empty_on_singleton() {
    assert_eq!(eval_ok("List.isEmpty [()]"), Value::Bool(false));
}

#[test]
fn tail_recursion_does_not_overflow() {
    assert_eq!(
        eval_ok("let boom x = if x <= 0 then False else boom (x - 1) in boom 100000"),
        Value::Bool(false)
    );
}

#[test]
fn closures_capture_enclosing_bindings() {
    assert_eq!(
        eval_ok("let a = 3 in let closed x = a + x in closed 2"),
        Value::Int(5)
    );
}

#[test]
fn over_applied_lambda_extends_the_variant() {
    assert_eq!(
        eval_ok("(\\a -> Foo a) 0 1 2"),
        Value::Custom {
            name: QualifiedName::new("", "Foo"),
            args: vec![Value::Int(0), Value::Int(1), Value::Int(2)],
        }
    );
}

#[test]
fn evaluation_is_deterministic() {
    let source = "let fib n = if n <= 2 then 1 else fib (n - 1) + fib (n - 2) in fib 10";
    assert_eq!(eval(source).unwrap(), eval(source).unwrap());
}

#[test]
fn wrapping_a_function_changes_nothing_observable() {
    assert_eq!(
        eval_ok("let g x = x + 100 in let f x = g x in (f 1, g 1)"),
        Value::Tuple(Box::new(Value::Int(101)), Box::new(Value::Int(101)))
    );
}

#[test]
fn arguments_evaluate_left_to_right() {
    let err = eval_err(r#"(\a b -> 0) (Debug.todo "first") (Debug.todo "second")"#);
    assert_eq!(err.kind, EvalErrorKind::Unsupported("first".to_string()));
}

#[test]
fn partial_application_accumulates_arguments() {
    assert_eq!(
        eval_ok("let add a b = a + b in let inc = add 1 in inc 41"),
        Value::Int(42)
    );
}

#[test]
fn if_requires_a_boolean_condition() {
    let err = eval_err("if 1 then 2 else 3");
    assert!(matches!(err.kind, EvalErrorKind::TypeError(_)));
}

#[test]
fn applying_a_number_is_a_type_error() {
    let err = eval_err("1 2");
    assert_eq!(
        err.kind,
        EvalErrorKind::TypeError("Trying to apply a non-lambda non-variant".to_string())
    );
}

#[test]
fn four_element_tuples_are_unsupported() {
    let err = eval_err("(1, 2, 3, 4)");
    assert!(matches!(err.kind, EvalErrorKind::Unsupported(msg) if msg.contains("tuple")));
}

#[test]
fn unknown_name_reports_the_call_stack() {
    let err = eval_err("boom");
    assert_eq!(err.kind, EvalErrorKind::NameError("boom".to_string()));
    let rendered = err.to_string();
    assert_eq!(rendered, "NameError: boom\nCall stack:\n - Main.main");
}

#[test]
fn missing_case_branch_aborts() {
    let err = eval_err("case 1 of 2 -> 0");
    assert!(matches!(err.kind, EvalErrorKind::TypeError(msg) if msg.starts_with("Missing case branch")));
}

#[test]
fn parse_errors_are_reported_as_such() {
    assert!(matches!(eval("let in 3"), Err(Error::ParsingError(_))));
}

#[test]
fn singleton_tuple_is_its_content() {
    assert_eq!(eval_ok("(5)"), Value::Int(5));
}

#[test]
fn negation_of_parenthesized_expression() {
    assert_eq!(eval_ok("-(2 + 3)"), Value::Int(-5));
}

#[test]
fn nullary_variant_is_a_custom_value() {
    assert_eq!(
        eval_ok("Nothing"),
        Value::Custom {
            name: QualifiedName::new("", "Nothing"),
            args: vec![],
        }
    );
}

#[test]
fn hex_literals() {
    assert_eq!(eval_ok("0x10 + 0xF"), Value::Int(31));
}

#[test]
fn float_arithmetic() {
    assert_eq!(eval_ok("1.5 + 2.25"), Value::Float(3.75));
}

#[test]
fn short_circuit_and_skips_the_right_side() {
    assert_eq!(eval_ok(r#"False && Debug.todo "unreachable""#), Value::Bool(false));
}

#[test]
fn short_circuit_or_skips_the_right_side() {
    assert_eq!(eval_ok(r#"True || Debug.todo "unreachable""#), Value::Bool(true));
}

#[test]
fn boolean_literals_are_bools_not_variants() {
    assert_eq!(eval_ok("True"), Value::Bool(true));
    assert_eq!(eval_ok("False"), Value::Bool(false));
}
