//! `Larch.Kernel.String` and `Larch.Kernel.Char`: text primitives.

use crate::interpreter::env::Env;
use crate::interpreter::error::EvalError;
use crate::interpreter::trace::CallTree;
use crate::interpreter::value::{QualifiedName, Value};
use crate::interpreter::EvalConfig;

use super::Registry;

const MODULE: &str = "Larch.Kernel.String";
const CHAR_MODULE: &str = "Larch.Kernel.Char";

pub(crate) fn register(registry: &mut Registry) {
    registry.register(MODULE, "isEmpty", 1, is_empty);
    registry.register(MODULE, "length", 1, length);
    registry.register(MODULE, "append", 2, append);
    registry.register(MODULE, "concat", 1, concat);
    registry.register(MODULE, "join", 2, join);
    registry.register(MODULE, "split", 2, split);
    registry.register(MODULE, "reverse", 1, reverse);
    registry.register(MODULE, "fromChar", 1, from_char);
    registry.register(MODULE, "cons", 2, cons);
    registry.register(MODULE, "uncons", 1, uncons);
    registry.register(MODULE, "left", 2, left);
    registry.register(MODULE, "right", 2, right);
    registry.register(MODULE, "slice", 3, slice);
    registry.register(MODULE, "contains", 2, contains);
    registry.register(MODULE, "startsWith", 2, starts_with);
    registry.register(MODULE, "endsWith", 2, ends_with);
    registry.register(MODULE, "toUpper", 1, to_upper);
    registry.register(MODULE, "toLower", 1, to_lower);
    registry.register(MODULE, "trim", 1, trim);
    registry.register(MODULE, "fromInt", 1, from_int);
    registry.register(MODULE, "toInt", 1, to_int);
    registry.register(MODULE, "fromFloat", 1, from_float);
    registry.register(MODULE, "toList", 1, to_list);
    registry.register(MODULE, "fromList", 1, from_list);

    registry.register(CHAR_MODULE, "toCode", 1, char_to_code);
    registry.register(CHAR_MODULE, "fromCode", 1, char_from_code);
    registry.register(CHAR_MODULE, "isUpper", 1, char_is_upper);
    registry.register(CHAR_MODULE, "isLower", 1, char_is_lower);
    registry.register(CHAR_MODULE, "isDigit", 1, char_is_digit);
    registry.register(CHAR_MODULE, "isAlpha", 1, char_is_alpha);
    registry.register(CHAR_MODULE, "isAlphaNum", 1, char_is_alpha_num);
    registry.register(CHAR_MODULE, "toUpper", 1, char_to_upper);
    registry.register(CHAR_MODULE, "toLower", 1, char_to_lower);
}

fn string(env: &Env, value: &Value) -> Result<String, EvalError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a string, got {}", value.kind_name()),
        )),
    }
}

fn character(env: &Env, value: &Value) -> Result<char, EvalError> {
    match value {
        Value::Char(c) => Ok(*c),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a character, got {}", value.kind_name()),
        )),
    }
}

fn int(env: &Env, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        _ => Err(EvalError::type_error(
            env,
            format!("expected an integer, got {}", value.kind_name()),
        )),
    }
}

fn just(value: Value) -> Value {
    Value::custom(QualifiedName::new("Maybe", "Just"), vec![value])
}

fn nothing() -> Value {
    Value::custom(QualifiedName::new("Maybe", "Nothing"), Vec::new())
}

fn is_empty(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(string(env, &args[0])?.is_empty()))
}

fn length(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(string(env, &args[0])?.chars().count() as i64))
}

fn append(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(format!(
        "{}{}",
        string(env, &args[0])?,
        string(env, &args[1])?
    )))
}

fn concat(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::List(items) => {
            let mut out = String::new();
            for item in items {
                out.push_str(&string(env, item)?);
            }
            Ok(Value::String(out))
        }
        other => Err(EvalError::type_error(
            env,
            format!("expected a list of strings, got {}", other.kind_name()),
        )),
    }
}

fn join(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let separator = string(env, &args[0])?;
    match &args[1] {
        Value::List(items) => {
            let parts: Result<Vec<String>, EvalError> =
                items.iter().map(|item| string(env, item)).collect();
            Ok(Value::String(parts?.join(&separator)))
        }
        other => Err(EvalError::type_error(
            env,
            format!("expected a list of strings, got {}", other.kind_name()),
        )),
    }
}

fn split(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let separator = string(env, &args[0])?;
    let subject = string(env, &args[1])?;
    let parts: Vec<Value> = if separator.is_empty() {
        subject
            .chars()
            .map(|c| Value::String(c.to_string()))
            .collect()
    } else {
        subject
            .split(&separator)
            .map(|part| Value::String(part.to_string()))
            .collect()
    };
    Ok(Value::List(parts))
}

fn reverse(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(string(env, &args[0])?.chars().rev().collect()))
}

fn from_char(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(character(env, &args[0])?.to_string()))
}

fn cons(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let c = character(env, &args[0])?;
    let s = string(env, &args[1])?;
    Ok(Value::String(format!("{c}{s}")))
}

fn uncons(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let s = string(env, &args[0])?;
    let mut chars = s.chars();
    Ok(match chars.next() {
        Some(first) => just(Value::Tuple(
            Box::new(Value::Char(first)),
            Box::new(Value::String(chars.collect())),
        )),
        None => nothing(),
    })
}

fn left(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let n = int(env, &args[0])?.max(0) as usize;
    let s = string(env, &args[1])?;
    Ok(Value::String(s.chars().take(n).collect()))
}

fn right(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let n = int(env, &args[0])?.max(0) as usize;
    let s = string(env, &args[1])?;
    let count = s.chars().count();
    Ok(Value::String(s.chars().skip(count.saturating_sub(n)).collect()))
}

/// `slice start stop s`; negative indices count from the end.
fn slice(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let start = int(env, &args[0])?;
    let stop = int(env, &args[1])?;
    let s = string(env, &args[2])?;
    let len = s.chars().count() as i64;
    let clamp = |i: i64| -> usize {
        let i = if i < 0 { len + i } else { i };
        i.clamp(0, len) as usize
    };
    let (from, to) = (clamp(start), clamp(stop));
    let sliced: String = if from < to {
        s.chars().skip(from).take(to - from).collect()
    } else {
        String::new()
    };
    Ok(Value::String(sliced))
}

fn contains(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let needle = string(env, &args[0])?;
    let haystack = string(env, &args[1])?;
    Ok(Value::Bool(haystack.contains(&needle)))
}

fn starts_with(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let prefix = string(env, &args[0])?;
    let subject = string(env, &args[1])?;
    Ok(Value::Bool(subject.starts_with(&prefix)))
}

fn ends_with(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let suffix = string(env, &args[0])?;
    let subject = string(env, &args[1])?;
    Ok(Value::Bool(subject.ends_with(&suffix)))
}

fn to_upper(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(string(env, &args[0])?.to_uppercase()))
}

fn to_lower(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(string(env, &args[0])?.to_lowercase()))
}

fn trim(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(string(env, &args[0])?.trim().to_string()))
}

fn from_int(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(int(env, &args[0])?.to_string()))
}

fn to_int(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let s = string(env, &args[0])?;
    Ok(match s.trim().parse::<i64>() {
        Ok(i) => just(Value::Int(i)),
        Err(_) => nothing(),
    })
}

fn from_float(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Float(x) => Ok(Value::String(Value::Float(*x).to_string())),
        Value::Int(i) => Ok(Value::String(i.to_string())),
        other => Err(EvalError::type_error(
            env,
            format!("expected a float, got {}", other.kind_name()),
        )),
    }
}

fn to_list(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::List(
        string(env, &args[0])?.chars().map(Value::Char).collect(),
    ))
}

fn from_list(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::List(items) => {
            let mut out = String::new();
            for item in items {
                out.push(character(env, item)?);
            }
            Ok(Value::String(out))
        }
        other => Err(EvalError::type_error(
            env,
            format!("expected a list of characters, got {}", other.kind_name()),
        )),
    }
}

fn char_to_code(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(character(env, &args[0])? as i64))
}

fn char_from_code(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let code = int(env, &args[0])?;
    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .unwrap_or('\u{FFFD}');
    Ok(Value::Char(c))
}

fn char_is_upper(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(character(env, &args[0])?.is_uppercase()))
}

fn char_is_lower(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(character(env, &args[0])?.is_lowercase()))
}

fn char_is_digit(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(character(env, &args[0])?.is_ascii_digit()))
}

fn char_is_alpha(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(character(env, &args[0])?.is_alphabetic()))
}

fn char_is_alpha_num(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(character(env, &args[0])?.is_alphanumeric()))
}

fn char_to_upper(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let c = character(env, &args[0])?;
    Ok(Value::Char(c.to_uppercase().next().unwrap_or(c)))
}

fn char_to_lower(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let c = character(env, &args[0])?;
    Ok(Value::Char(c.to_lowercase().next().unwrap_or(c)))
}
