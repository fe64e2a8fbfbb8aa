//! `Larch.Kernel.Tuple`, `Larch.Kernel.Maybe`, and `Larch.Kernel.Debug`.
//!
//! The Maybe helpers operate on `Just`/`Nothing` variants by constructor
//! name, the same way pattern matching does.

use crate::interpreter::env::Env;
use crate::interpreter::error::EvalError;
use crate::interpreter::eval::apply;
use crate::interpreter::trace::CallTree;
use crate::interpreter::value::{QualifiedName, Value};
use crate::interpreter::EvalConfig;

use super::Registry;

const MODULE: &str = "Larch.Kernel.Tuple";
const MAYBE_MODULE: &str = "Larch.Kernel.Maybe";
const DEBUG_MODULE: &str = "Larch.Kernel.Debug";

pub(crate) fn register(registry: &mut Registry) {
    registry.register(MODULE, "pair", 2, pair);
    registry.register(MODULE, "first", 1, first);
    registry.register(MODULE, "second", 1, second);
    registry.register(MODULE, "mapFirst", 2, map_first);
    registry.register(MODULE, "mapSecond", 2, map_second);
    registry.register(MODULE, "mapBoth", 3, map_both);

    registry.register(MAYBE_MODULE, "withDefault", 2, maybe_with_default);
    registry.register(MAYBE_MODULE, "map", 2, maybe_map);
    registry.register(MAYBE_MODULE, "andThen", 2, maybe_and_then);

    registry.register(DEBUG_MODULE, "toString", 1, debug_to_string);
    registry.register(DEBUG_MODULE, "log", 2, debug_log);
    registry.register(DEBUG_MODULE, "todo", 1, debug_todo);
}

fn pair(
    args: &[Value],
    _cfg: &EvalConfig,
    _env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Tuple(
        Box::new(args[0].clone()),
        Box::new(args[1].clone()),
    ))
}

fn first(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Tuple(a, _) => Ok((**a).clone()),
        Value::Triple(a, _, _) => Ok((**a).clone()),
        other => Err(EvalError::type_error(
            env,
            format!("expected a tuple, got {}", other.kind_name()),
        )),
    }
}

fn second(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Tuple(_, b) => Ok((**b).clone()),
        Value::Triple(_, b, _) => Ok((**b).clone()),
        other => Err(EvalError::type_error(
            env,
            format!("expected a tuple, got {}", other.kind_name()),
        )),
    }
}

fn map_first(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[1] {
        Value::Tuple(a, b) => {
            let mapped = apply(cfg, env, &args[0], vec![(**a).clone()], trees)?;
            Ok(Value::Tuple(Box::new(mapped), b.clone()))
        }
        other => Err(EvalError::type_error(
            env,
            format!("expected a tuple, got {}", other.kind_name()),
        )),
    }
}

fn map_second(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[1] {
        Value::Tuple(a, b) => {
            let mapped = apply(cfg, env, &args[0], vec![(**b).clone()], trees)?;
            Ok(Value::Tuple(a.clone(), Box::new(mapped)))
        }
        other => Err(EvalError::type_error(
            env,
            format!("expected a tuple, got {}", other.kind_name()),
        )),
    }
}

fn map_both(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[2] {
        Value::Tuple(a, b) => {
            let first = apply(cfg, env, &args[0], vec![(**a).clone()], trees)?;
            let second = apply(cfg, env, &args[1], vec![(**b).clone()], trees)?;
            Ok(Value::Tuple(Box::new(first), Box::new(second)))
        }
        other => Err(EvalError::type_error(
            env,
            format!("expected a tuple, got {}", other.kind_name()),
        )),
    }
}

/// Split a `Maybe` value into `Some(payload)` for `Just` and `None` for
/// `Nothing`.
fn as_maybe<'a>(env: &Env, value: &'a Value) -> Result<Option<&'a Value>, EvalError> {
    match value {
        Value::Custom { name, args } if name.name == "Just" && args.len() == 1 => {
            Ok(Some(&args[0]))
        }
        Value::Custom { name, args } if name.name == "Nothing" && args.is_empty() => Ok(None),
        other => Err(EvalError::type_error(
            env,
            format!("expected a Maybe, got {}", other.kind_name()),
        )),
    }
}

fn nothing() -> Value {
    Value::custom(QualifiedName::new("Maybe", "Nothing"), Vec::new())
}

fn maybe_with_default(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(match as_maybe(env, &args[1])? {
        Some(value) => value.clone(),
        None => args[0].clone(),
    })
}

fn maybe_map(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match as_maybe(env, &args[1])? {
        Some(value) => {
            let mapped = apply(cfg, env, &args[0], vec![value.clone()], trees)?;
            Ok(Value::custom(
                QualifiedName::new("Maybe", "Just"),
                vec![mapped],
            ))
        }
        None => Ok(nothing()),
    }
}

fn maybe_and_then(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match as_maybe(env, &args[1])? {
        Some(value) => apply(cfg, env, &args[0], vec![value.clone()], trees),
        None => Ok(nothing()),
    }
}

fn debug_to_string(
    args: &[Value],
    _cfg: &EvalConfig,
    _env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::String(args[0].to_string()))
}

/// Emits the tagged value as a debug event and passes the value through.
fn debug_log(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let tag = match &args[0] {
        Value::String(s) => s.clone(),
        other => {
            return Err(EvalError::type_error(
                env,
                format!("expected a string tag, got {}", other.kind_name()),
            ))
        }
    };
    tracing::debug!(target: "larch::debug", "{tag}: {}", args[1]);
    Ok(args[1].clone())
}

fn debug_todo(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let message = match &args[0] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    Err(EvalError::unsupported(env, message))
}
