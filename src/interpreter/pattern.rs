//! Pattern matching against runtime values.
//!
//! Three-way outcome: `Ok(Some(bindings))` on a match, `Ok(None)` when
//! the pattern simply does not fit (the caller tries the next case
//! branch), `Err` for structural breakage that a type-checked program
//! cannot produce - a record pattern naming an absent field, a
//! constructor applied at the wrong arity, a list pattern against a
//! non-list.

use crate::ast::pattern::Pattern;

use super::env::Env;
use super::error::EvalError;
use super::value::Value;

pub type Bindings = im::HashMap<String, Value>;

/// Merge `overriding` on top of `base`.
fn merge(base: Bindings, overriding: Bindings) -> Bindings {
    overriding.union(base)
}

pub fn match_pattern(
    env: &Env,
    pattern: &Pattern,
    value: &Value,
) -> Result<Option<Bindings>, EvalError> {
    match pattern {
        Pattern::Anything => Ok(Some(Bindings::new())),

        Pattern::Unit => Ok(match value {
            Value::Unit => Some(Bindings::new()),
            _ => None,
        }),

        Pattern::Integer(n) | Pattern::Hex(n) => Ok(match value {
            Value::Int(m) if m == n => Some(Bindings::new()),
            Value::Float(x) if *x == *n as f64 => Some(Bindings::new()),
            _ => None,
        }),

        Pattern::Float(x) => Ok(match value {
            Value::Float(y) if y == x => Some(Bindings::new()),
            _ => None,
        }),

        Pattern::Char(c) => Ok(match value {
            Value::Char(d) if d == c => Some(Bindings::new()),
            _ => None,
        }),

        Pattern::String(s) => Ok(match value {
            Value::String(t) if t == s => Some(Bindings::new()),
            _ => None,
        }),

        Pattern::Var(name) => Ok(Some(Bindings::unit(name.clone(), value.clone()))),

        Pattern::As(inner, name) => Ok(match_pattern(env, inner, value)?.map(|bindings| {
            let mut bindings = bindings;
            bindings.insert(name.clone(), value.clone());
            bindings
        })),

        Pattern::Parenthesized(inner) => match_pattern(env, inner, value),

        Pattern::Tuple(patterns) => {
            let values: Vec<&Value> = match (patterns.len(), value) {
                (2, Value::Tuple(a, b)) => vec![a, b],
                (3, Value::Triple(a, b, c)) => vec![a, b, c],
                _ => {
                    return Err(EvalError::type_error(
                        env,
                        format!(
                            "tuple pattern of {} elements cannot match {}",
                            patterns.len(),
                            value.kind_name()
                        ),
                    ))
                }
            };
            match_all(env, patterns, &values)
        }

        Pattern::List(patterns) => match value {
            Value::List(values) if values.len() == patterns.len() => {
                let refs: Vec<&Value> = values.iter().collect();
                match_all(env, patterns, &refs)
            }
            Value::List(_) => Ok(None),
            _ => Err(EvalError::type_error(
                env,
                format!("list pattern cannot match {}", value.kind_name()),
            )),
        },

        Pattern::Cons(head, tail) => match value {
            Value::List(values) => match values.split_first() {
                None => Ok(None),
                Some((first, rest)) => {
                    let Some(head_bindings) = match_pattern(env, head, first)? else {
                        return Ok(None);
                    };
                    let rest_value = Value::List(rest.to_vec());
                    let Some(tail_bindings) = match_pattern(env, tail, &rest_value)? else {
                        return Ok(None);
                    };
                    Ok(Some(merge(tail_bindings, head_bindings)))
                }
            },
            _ => Err(EvalError::type_error(
                env,
                format!("cons pattern cannot match {}", value.kind_name()),
            )),
        },

        Pattern::Record(fields) => match value {
            Value::Record(map) => {
                let mut bindings = Bindings::new();
                for field in fields {
                    match map.get(field) {
                        Some(v) => {
                            bindings.insert(field.clone(), v.clone());
                        }
                        None => {
                            return Err(EvalError::type_error(
                                env,
                                format!("record pattern field '{field}' is absent"),
                            ))
                        }
                    }
                }
                Ok(Some(bindings))
            }
            _ => Err(EvalError::type_error(
                env,
                format!("record pattern cannot match {}", value.kind_name()),
            )),
        },

        Pattern::Constructor { name, args, .. } => {
            // True/False are booleans at runtime, not variants.
            if args.is_empty() {
                match (name.as_str(), value) {
                    ("True", Value::Bool(b)) => return Ok(if *b { Some(Bindings::new()) } else { None }),
                    ("False", Value::Bool(b)) => {
                        return Ok(if *b { None } else { Some(Bindings::new()) })
                    }
                    _ => {}
                }
            }
            match value {
                Value::Custom {
                    name: value_name,
                    args: value_args,
                } => {
                    // Qualifiers are ignored: the type checker has already
                    // ruled out clashes between same-named constructors.
                    if value_name.name != *name {
                        return Ok(None);
                    }
                    if value_args.len() != args.len() {
                        return Err(EvalError::type_error(
                            env,
                            format!(
                                "constructor {} matched at arity {} but was built with {} arguments",
                                name,
                                args.len(),
                                value_args.len()
                            ),
                        ));
                    }
                    let refs: Vec<&Value> = value_args.iter().collect();
                    match_all(env, args, &refs)
                }
                _ => Ok(None),
            }
        }
    }
}

/// Match a pattern vector pointwise against a value vector of the same
/// length, unioning the bindings.
pub fn match_all(
    env: &Env,
    patterns: &[Pattern],
    values: &[&Value],
) -> Result<Option<Bindings>, EvalError> {
    let mut bindings = Bindings::new();
    for (pattern, value) in patterns.iter().zip(values) {
        match match_pattern(env, pattern, value)? {
            Some(more) => bindings = merge(bindings, more),
            None => return Ok(None),
        }
    }
    Ok(Some(bindings))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::value::QualifiedName;

    fn env() -> Env {
        Env::new("Test")
    }

    #[test]
    fn wildcard_matches_without_binding() {
        let result = match_pattern(&env(), &Pattern::Anything, &Value::Int(1)).unwrap();
        assert_eq!(result, Some(Bindings::new()));
    }

    #[test]
    fn var_binds() {
        let result = match_pattern(&env(), &Pattern::Var("x".into()), &Value::Int(7))
            .unwrap()
            .unwrap();
        assert_eq!(result.get("x"), Some(&Value::Int(7)));
    }

    #[test]
    fn list_pattern_wrong_length_is_a_clean_miss() {
        let pattern = Pattern::List(vec![Pattern::Var("x".into())]);
        let value = Value::List(vec![]);
        assert_eq!(match_pattern(&env(), &pattern, &value).unwrap(), None);
    }

    #[test]
    fn cons_prefers_head_bindings() {
        let pattern = Pattern::Cons(
            Box::new(Pattern::Var("x".into())),
            Box::new(Pattern::Var("xs".into())),
        );
        let value = Value::List(vec![Value::Int(1), Value::Int(2)]);
        let bindings = match_pattern(&env(), &pattern, &value).unwrap().unwrap();
        assert_eq!(bindings.get("x"), Some(&Value::Int(1)));
        assert_eq!(bindings.get("xs"), Some(&Value::List(vec![Value::Int(2)])));
    }

    #[test]
    fn constructor_ignores_qualifier() {
        let pattern = Pattern::Constructor {
            module: String::new(),
            name: "Just".into(),
            args: vec![Pattern::Var("y".into())],
        };
        let value = Value::custom(QualifiedName::new("Maybe", "Just"), vec![Value::Int(3)]);
        let bindings = match_pattern(&env(), &pattern, &value).unwrap().unwrap();
        assert_eq!(bindings.get("y"), Some(&Value::Int(3)));
    }

    #[test]
    fn bool_constructor_patterns_cover_bool_values() {
        let true_pattern = Pattern::Constructor {
            module: String::new(),
            name: "True".into(),
            args: vec![],
        };
        assert!(match_pattern(&env(), &true_pattern, &Value::Bool(true))
            .unwrap()
            .is_some());
        assert!(match_pattern(&env(), &true_pattern, &Value::Bool(false))
            .unwrap()
            .is_none());
    }

    #[test]
    fn record_pattern_missing_field_is_structural() {
        let pattern = Pattern::Record(vec!["a".into(), "b".into()]);
        let value = Value::Record(im::HashMap::unit("a".into(), Value::Int(1)));
        assert!(match_pattern(&env(), &pattern, &value).is_err());
    }
}
