use larch::{eval_module, Error, EvalErrorKind, Value};

#[test]
fn evaluates_the_named_entry() {
    let source = "module Math exposing (main)\n\nmain = 40 + 2";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(42));
}

#[test]
fn qualified_entry_names_work() {
    let source = "module Math exposing (main)\n\nmain = 1";
    assert_eq!(eval_module(source, "Math.main").unwrap(), Value::Int(1));
}

#[test]
fn top_level_functions_are_mutually_recursive() {
    let source = "module Fib exposing (main)\n\nfib1 n = if n <= 2 then 1 else fib2 (n - 1) + fib2 (n - 2)\n\nfib2 n = fib1 n\n\nmain = fib1 7";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(13));
}

#[test]
fn type_annotations_and_declarations_are_skipped() {
    let source = "module Shapes exposing (main)\n\ntype Shape\n    = Circle Float\n    | Square Float\n\narea : Shape -> Float\narea shape =\n    case shape of\n        Circle r -> 3.0 * r * r\n        Square s -> s * s\n\nmain = area (Square 3.0)";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Float(9.0));
}

#[test]
fn imports_are_accepted() {
    let source = "module App exposing (main)\n\nimport List\nimport String as Str\nimport Maybe exposing (..)\n\nmain = List.length [1, 2]";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(2));
}

#[test]
fn missing_entry_is_a_name_error() {
    let source = "module M exposing (main)\n\nmain = 1";
    match eval_module(source, "other") {
        Err(Error::EvalError(err)) => {
            assert_eq!(err.kind, EvalErrorKind::NameError("M.other".to_string()))
        }
        other => panic!("expected a name error, got {other:?}"),
    }
}

#[test]
fn missing_module_header_is_a_parse_error() {
    assert!(matches!(
        eval_module("main = 1", "main"),
        Err(Error::ParsingError(_))
    ));
}

#[test]
fn declarations_must_start_at_column_one() {
    let source = "module M exposing (main)\n\n  main = 1";
    assert!(matches!(
        eval_module(source, "main"),
        Err(Error::ParsingError(_))
    ));
}

#[test]
fn multi_parameter_declarations() {
    let source = "module M exposing (main)\n\nadd3 a b c = a + b + c\n\nmain = add3 1 2 3";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(6));
}

#[test]
fn caf_declarations_are_evaluated_on_reference() {
    let source = "module M exposing (main)\n\nanswer = 6 * 7\n\nmain = answer + 0";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(42));
}

#[test]
fn entry_bodies_spanning_lines() {
    let source = "module M exposing (main)\n\nmain =\n    [ 1\n    , 2\n    , 3\n    ]\n        |> List.length";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(3));
}

#[test]
fn comments_are_ignored() {
    let source = "module M exposing (main)\n\n-- a line comment\n{- a block\n   comment -}\nmain = 1 -- trailing\n";
    assert_eq!(eval_module(source, "main").unwrap(), Value::Int(1));
}

#[test]
fn errors_carry_the_module_call_stack() {
    let source = "module M exposing (main)\n\nhelper x = Debug.todo \"not yet\"\n\nmain = helper 1";
    match eval_module(source, "main") {
        Err(Error::EvalError(err)) => {
            assert_eq!(err.kind, EvalErrorKind::Unsupported("not yet".to_string()));
            let frames: Vec<String> = err.call_stack.iter().map(|f| f.to_string()).collect();
            assert!(frames.contains(&"M.main".to_string()));
            assert!(frames.contains(&"M.helper".to_string()));
        }
        other => panic!("expected an eval error, got {other:?}"),
    }
}
