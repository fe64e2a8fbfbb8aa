use larch::{eval, Value};

fn eval_ok(source: &str) -> Value {
    eval(source).unwrap_or_else(|err| panic!("evaluation failed for {source:?}: {err}"))
}

#[test]
fn bool_cases_are_total() {
    assert_eq!(eval_ok("case 1 == 1 of True -> 1\n False -> 0"), Value::Int(1));
    assert_eq!(eval_ok("case 1 == 2 of True -> 1\n False -> 0"), Value::Int(0));
}

#[test]
fn constructor_identity() {
    assert_eq!(eval_ok("case Just 5 of Just y -> y\n Nothing -> -1"), Value::Int(5));
}

#[test]
fn nothing_never_matches_just() {
    assert_eq!(eval_ok("case Nothing of Just _ -> 1\n Nothing -> 0"), Value::Int(0));
}

#[test]
fn wildcard_matches_anything() {
    assert_eq!(eval_ok("case [1, 2] of _ -> 9"), Value::Int(9));
}

#[test]
fn integer_literal_patterns_select_branches() {
    assert_eq!(
        eval_ok("case 3 of 1 -> 10\n 2 -> 20\n 3 -> 30\n _ -> 0"),
        Value::Int(30)
    );
}

#[test]
fn char_literal_patterns() {
    assert_eq!(eval_ok("case 'a' of 'b' -> 0\n 'a' -> 1"), Value::Int(1));
}

#[test]
fn string_literal_patterns() {
    assert_eq!(eval_ok("case \"hi\" of \"yo\" -> 0\n _ -> 1"), Value::Int(1));
}

#[test]
fn unit_pattern() {
    assert_eq!(eval_ok("case () of () -> 4"), Value::Int(4));
}

#[test]
fn tuple_patterns_destructure() {
    assert_eq!(eval_ok("case (1, 'x') of (n, c) -> n"), Value::Int(1));
    assert_eq!(
        eval_ok("case (1, 2, 3) of (a, b, c) -> a + b + c"),
        Value::Int(6)
    );
}

#[test]
fn cons_pattern_splits_head_and_tail() {
    assert_eq!(
        eval_ok("case [1, 2, 3] of x :: xs -> xs\n [] -> []"),
        Value::List(vec![Value::Int(2), Value::Int(3)])
    );
}

#[test]
fn cons_pattern_rejects_the_empty_list() {
    assert_eq!(eval_ok("case [] of x :: xs -> 1\n [] -> 0"), Value::Int(0));
}

#[test]
fn fixed_length_list_patterns() {
    assert_eq!(
        eval_ok("case [1, 2] of [a] -> a\n [a, b] -> a + b\n _ -> 0"),
        Value::Int(3)
    );
}

#[test]
fn record_patterns_bind_fields() {
    assert_eq!(
        eval_ok("case { a = 1, b = 2 } of { a, b } -> a + b"),
        Value::Int(3)
    );
}

#[test]
fn as_pattern_binds_the_whole_value() {
    assert_eq!(
        eval_ok("case [1, 2] of (x :: rest) as all -> all\n [] -> []"),
        Value::List(vec![Value::Int(1), Value::Int(2)])
    );
}

#[test]
fn nested_constructor_patterns() {
    assert_eq!(
        eval_ok("case Just (Just 7) of Just (Just n) -> n\n _ -> 0"),
        Value::Int(7)
    );
}

#[test]
fn qualified_and_bare_constructors_unify_by_name() {
    assert_eq!(
        eval_ok("case Maybe.Just 3 of Just n -> n\n Nothing -> 0"),
        Value::Int(3)
    );
}

#[test]
fn variable_patterns_shadow_outer_bindings() {
    assert_eq!(eval_ok("let x = 1 in case 2 of x -> x"), Value::Int(2));
}

#[test]
fn function_parameters_destructure_tuples() {
    assert_eq!(
        eval_ok("let swap (a, b) = (b, a) in swap (1, 2)"),
        Value::Tuple(Box::new(Value::Int(2)), Box::new(Value::Int(1)))
    );
}

#[test]
fn lambda_parameters_may_ignore_arguments() {
    assert_eq!(eval_ok("(\\_ -> 7) 100"), Value::Int(7));
}
