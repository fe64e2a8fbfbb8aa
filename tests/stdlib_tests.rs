use pretty_assertions::assert_eq;

use larch::{eval, QualifiedName, Value};

fn eval_ok(source: &str) -> Value {
    eval(source).unwrap_or_else(|err| panic!("evaluation failed for {source:?}: {err}"))
}

fn ints(items: &[i64]) -> Value {
    Value::List(items.iter().copied().map(Value::Int).collect())
}

fn nothing() -> Value {
    Value::custom(QualifiedName::new("Maybe", "Nothing"), vec![])
}

fn just(value: Value) -> Value {
    Value::custom(QualifiedName::new("Maybe", "Just"), vec![value])
}

#[test]
fn arithmetic_operators() {
    assert_eq!(eval_ok("7 - 2 * 3"), Value::Int(1));
    assert_eq!(eval_ok("2 ^ 10"), Value::Int(1024));
    assert_eq!(eval_ok("7 // 2"), Value::Int(3));
    assert_eq!(eval_ok("7 / 2"), Value::Float(3.5));
    assert_eq!(eval_ok("2 - 3 - 4"), Value::Int(-5));
}

#[test]
fn integer_division_by_zero_is_zero() {
    assert_eq!(eval_ok("7 // 0"), Value::Int(0));
}

#[test]
fn comparisons() {
    assert_eq!(eval_ok("1 < 2"), Value::Bool(true));
    assert_eq!(eval_ok("2 <= 2"), Value::Bool(true));
    assert_eq!(eval_ok("'a' < 'b'"), Value::Bool(true));
    assert_eq!(eval_ok("\"abc\" < \"abd\""), Value::Bool(true));
    assert_eq!(eval_ok("[1, 2] < [1, 3]"), Value::Bool(true));
}

#[test]
fn equality_is_structural() {
    assert_eq!(eval_ok("[1, 2] == [1, 2]"), Value::Bool(true));
    assert_eq!(eval_ok("{ a = 1 } == { a = 1 }"), Value::Bool(true));
    assert_eq!(eval_ok("Just 1 == Just 1"), Value::Bool(true));
    assert_eq!(eval_ok("Just 1 /= Nothing"), Value::Bool(true));
}

#[test]
fn basics_helpers() {
    assert_eq!(eval_ok("Basics.negate 5"), Value::Int(-5));
    assert_eq!(eval_ok("abs (-5)"), Value::Int(5));
    assert_eq!(eval_ok("min 3 4"), Value::Int(3));
    assert_eq!(eval_ok("max 3 4"), Value::Int(4));
    assert_eq!(eval_ok("not True"), Value::Bool(false));
    assert_eq!(eval_ok("identity 9"), Value::Int(9));
    assert_eq!(eval_ok("always 1 2"), Value::Int(1));
    assert_eq!(eval_ok("toFloat 3"), Value::Float(3.0));
    assert_eq!(eval_ok("floor 3.7"), Value::Int(3));
    assert_eq!(eval_ok("ceiling 3.2"), Value::Int(4));
    assert_eq!(eval_ok("round 3.5"), Value::Int(4));
    assert_eq!(
        eval_ok("compare 1 2"),
        Value::custom(QualifiedName::new("Basics", "LT"), vec![])
    );
}

#[test]
fn mod_by_follows_the_modulus_sign() {
    assert_eq!(eval_ok("modBy 4 (-1)"), Value::Int(3));
    assert_eq!(eval_ok("modBy 4 9"), Value::Int(1));
    assert_eq!(eval_ok("remainderBy 4 (-9)"), Value::Int(-1));
}

#[test]
fn append_operator_works_on_strings_and_lists() {
    assert_eq!(eval_ok(r#""foo" ++ "bar""#), Value::String("foobar".into()));
    assert_eq!(eval_ok("[1] ++ [2, 3]"), ints(&[1, 2, 3]));
}

#[test]
fn cons_operator() {
    assert_eq!(eval_ok("1 :: [2]"), ints(&[1, 2]));
    assert_eq!(eval_ok("1 :: 2 :: []"), ints(&[1, 2]));
}

#[test]
fn pipe_operators() {
    assert_eq!(eval_ok("1 |> (\\x -> x + 1)"), Value::Int(2));
    assert_eq!(eval_ok("(\\x -> x + 1) <| 1"), Value::Int(2));
    assert_eq!(eval_ok("[1, 2, 3] |> List.length"), Value::Int(3));
}

#[test]
fn composition_operators() {
    assert_eq!(eval_ok("(String.fromInt >> String.length) 123"), Value::Int(3));
    assert_eq!(eval_ok("(String.length << String.fromInt) 123"), Value::Int(3));
}

#[test]
fn operator_sections_are_functions() {
    assert_eq!(eval_ok("(+) 1 2"), Value::Int(3));
    assert_eq!(eval_ok("List.foldl (+) 0 [1, 2, 3, 4]"), Value::Int(10));
}

#[test]
fn list_basics() {
    assert_eq!(eval_ok("List.length [1, 2, 3]"), Value::Int(3));
    assert_eq!(eval_ok("List.reverse [1, 2]"), ints(&[2, 1]));
    assert_eq!(eval_ok("List.member 2 [1, 2]"), Value::Bool(true));
    assert_eq!(eval_ok("List.range 1 4"), ints(&[1, 2, 3, 4]));
    assert_eq!(eval_ok("List.take 2 [1, 2, 3]"), ints(&[1, 2]));
    assert_eq!(eval_ok("List.drop 2 [1, 2, 3]"), ints(&[3]));
    assert_eq!(eval_ok("List.concat [[1], [2, 3]]"), ints(&[1, 2, 3]));
    assert_eq!(eval_ok("List.repeat 3 0"), ints(&[0, 0, 0]));
    assert_eq!(eval_ok("List.sum [1, 2, 3]"), Value::Int(6));
    assert_eq!(eval_ok("List.product [2, 3, 4]"), Value::Int(24));
}

#[test]
fn list_head_and_tail_are_maybes() {
    assert_eq!(eval_ok("List.head []"), nothing());
    assert_eq!(eval_ok("List.head [9]"), just(Value::Int(9)));
    assert_eq!(eval_ok("List.tail [1, 2]"), just(ints(&[2])));
}

#[test]
fn list_higher_order_functions() {
    assert_eq!(eval_ok("List.map (\\x -> x * 2) [1, 2, 3]"), ints(&[2, 4, 6]));
    assert_eq!(
        eval_ok("List.filter (\\x -> x > 1) [1, 2, 3]"),
        ints(&[2, 3])
    );
    assert_eq!(
        eval_ok("List.foldl (\\x acc -> acc ++ String.fromInt x) \"\" [1, 2, 3]"),
        Value::String("123".into())
    );
    assert_eq!(
        eval_ok("List.foldr (\\x acc -> acc ++ String.fromInt x) \"\" [1, 2, 3]"),
        Value::String("321".into())
    );
    assert_eq!(eval_ok("List.any (\\x -> x > 2) [1, 2, 3]"), Value::Bool(true));
    assert_eq!(eval_ok("List.all (\\x -> x > 0) [1, 2, 3]"), Value::Bool(true));
    assert_eq!(
        eval_ok("List.indexedMap (\\i x -> i * x) [5, 5, 5]"),
        ints(&[0, 5, 10])
    );
}

#[test]
fn string_functions() {
    assert_eq!(eval_ok(r#"String.length "hello""#), Value::Int(5));
    assert_eq!(eval_ok(r#"String.isEmpty """#), Value::Bool(true));
    assert_eq!(eval_ok(r#"String.toUpper "abc""#), Value::String("ABC".into()));
    assert_eq!(eval_ok(r#"String.reverse "abc""#), Value::String("cba".into()));
    assert_eq!(
        eval_ok(r#"String.join ", " ["a", "b"]"#),
        Value::String("a, b".into())
    );
    assert_eq!(
        eval_ok(r#"String.split "," "a,b""#),
        Value::List(vec![Value::String("a".into()), Value::String("b".into())])
    );
    assert_eq!(eval_ok(r#"String.contains "ell" "hello""#), Value::Bool(true));
    assert_eq!(eval_ok(r#"String.left 2 "hello""#), Value::String("he".into()));
    assert_eq!(eval_ok(r#"String.slice 1 3 "hello""#), Value::String("el".into()));
    assert_eq!(
        eval_ok(r#"String.slice 0 (-1) "hello""#),
        Value::String("hell".into())
    );
    assert_eq!(eval_ok("String.fromInt 42"), Value::String("42".into()));
    assert_eq!(eval_ok(r#"String.toInt "42""#), just(Value::Int(42)));
    assert_eq!(eval_ok(r#"String.toInt "nope""#), nothing());
    assert_eq!(eval_ok("String.fromChar 'x'"), Value::String("x".into()));
    assert_eq!(
        eval_ok(r#"String.toList "ab""#),
        Value::List(vec![Value::Char('a'), Value::Char('b')])
    );
    assert_eq!(
        eval_ok(r#"String.uncons "ab""#),
        just(Value::Tuple(
            Box::new(Value::Char('a')),
            Box::new(Value::String("b".into()))
        ))
    );
}

#[test]
fn char_functions() {
    assert_eq!(eval_ok("Char.toCode 'A'"), Value::Int(65));
    assert_eq!(eval_ok("Char.fromCode 97"), Value::Char('a'));
    assert_eq!(eval_ok("Char.isUpper 'A'"), Value::Bool(true));
    assert_eq!(eval_ok("Char.isDigit '5'"), Value::Bool(true));
    assert_eq!(eval_ok("Char.toUpper 'a'"), Value::Char('A'));
}

#[test]
fn tuple_functions() {
    assert_eq!(
        eval_ok("Tuple.pair 1 2"),
        Value::Tuple(Box::new(Value::Int(1)), Box::new(Value::Int(2)))
    );
    assert_eq!(eval_ok("Tuple.first (1, 2)"), Value::Int(1));
    assert_eq!(eval_ok("Tuple.second (1, 2)"), Value::Int(2));
    assert_eq!(
        eval_ok("Tuple.mapFirst (\\x -> x + 1) (1, 2)"),
        Value::Tuple(Box::new(Value::Int(2)), Box::new(Value::Int(2)))
    );
}

#[test]
fn maybe_functions() {
    assert_eq!(eval_ok("Maybe.withDefault 0 (Just 5)"), Value::Int(5));
    assert_eq!(eval_ok("Maybe.withDefault 0 Nothing"), Value::Int(0));
    assert_eq!(
        eval_ok("Maybe.map (\\x -> x + 1) (Just 1)"),
        just(Value::Int(2))
    );
    assert_eq!(eval_ok("Maybe.map (\\x -> x + 1) Nothing"), nothing());
    assert_eq!(
        eval_ok("Maybe.andThen (\\x -> Just (x + 1)) (Just 1)"),
        just(Value::Int(2))
    );
}

#[test]
fn debug_to_string_renders_values() {
    assert_eq!(
        eval_ok("Debug.toString [1, 2]"),
        Value::String("[1,2]".into())
    );
    assert_eq!(
        eval_ok("Debug.toString (Just 1)"),
        Value::String("Just 1".into())
    );
}

#[test]
fn record_update_overrides_fields() {
    assert_eq!(
        eval_ok("let r = { a = 0, b = 0, c = 3 } in { r | a = 1, b = 2 }.c"),
        Value::Int(3)
    );
    assert_eq!(
        eval_ok("let r = { a = 0, b = 0 } in { r | a = 1, b = 2 }"),
        eval_ok("let r = { a = 0, b = 0 } in { r | b = 2, a = 1 }")
    );
    // The original record is untouched.
    assert_eq!(
        eval_ok("let r = { a = 0 } in let s = { r | a = 1 } in r.a"),
        Value::Int(0)
    );
}

#[test]
fn record_accessor_functions() {
    assert_eq!(eval_ok(".b { a = 1, b = 2 }"), Value::Int(2));
    assert_eq!(
        eval_ok("List.map .a [{ a = 1 }, { a = 2 }]"),
        ints(&[1, 2])
    );
}

#[test]
fn kernel_functions_are_addressable_through_the_alias() {
    assert_eq!(eval_ok("Kernel.Basics.add 1 2"), Value::Int(3));
    assert_eq!(eval_ok("Larch.Kernel.Basics.add 1 2"), Value::Int(3));
}
