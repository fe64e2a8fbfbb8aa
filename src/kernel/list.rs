//! `Larch.Kernel.List`: list primitives. The higher-order ones re-enter
//! the evaluator through `apply`, so a traced program shows the calls
//! they make.

use crate::interpreter::env::Env;
use crate::interpreter::error::EvalError;
use crate::interpreter::eval::apply;
use crate::interpreter::trace::CallTree;
use crate::interpreter::value::{QualifiedName, Value};
use crate::interpreter::EvalConfig;

use super::basics::eq_values;
use super::Registry;

const MODULE: &str = "Larch.Kernel.List";

pub(crate) fn register(registry: &mut Registry) {
    registry.register(MODULE, "cons", 2, cons);
    registry.register(MODULE, "isEmpty", 1, is_empty);
    registry.register(MODULE, "head", 1, head);
    registry.register(MODULE, "tail", 1, tail);
    registry.register(MODULE, "length", 1, length);
    registry.register(MODULE, "reverse", 1, reverse);
    registry.register(MODULE, "member", 2, member);
    registry.register(MODULE, "map", 2, map);
    registry.register(MODULE, "indexedMap", 2, indexed_map);
    registry.register(MODULE, "foldl", 3, foldl);
    registry.register(MODULE, "foldr", 3, foldr);
    registry.register(MODULE, "filter", 2, filter);
    registry.register(MODULE, "append", 2, append);
    registry.register(MODULE, "concat", 1, concat);
    registry.register(MODULE, "range", 2, range);
    registry.register(MODULE, "take", 2, take);
    registry.register(MODULE, "drop", 2, drop_);
    registry.register(MODULE, "any", 2, any);
    registry.register(MODULE, "all", 2, all);
    registry.register(MODULE, "sum", 1, sum);
    registry.register(MODULE, "product", 1, product);
    registry.register(MODULE, "repeat", 2, repeat);
}

fn list(env: &Env, value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) => Ok(items.clone()),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a list, got {}", value.kind_name()),
        )),
    }
}

fn just(value: Value) -> Value {
    Value::custom(QualifiedName::new("Maybe", "Just"), vec![value])
}

fn nothing() -> Value {
    Value::custom(QualifiedName::new("Maybe", "Nothing"), Vec::new())
}

fn truthy(env: &Env, value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a boolean, got {}", value.kind_name()),
        )),
    }
}

fn cons(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut items = vec![args[0].clone()];
    items.extend(list(env, &args[1])?);
    Ok(Value::List(items))
}

fn is_empty(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(list(env, &args[0])?.is_empty()))
}

fn head(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(match list(env, &args[0])?.first() {
        Some(value) => just(value.clone()),
        None => nothing(),
    })
}

fn tail(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let items = list(env, &args[0])?;
    Ok(match items.split_first() {
        Some((_, rest)) => just(Value::List(rest.to_vec())),
        None => nothing(),
    })
}

fn length(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(list(env, &args[0])?.len() as i64))
}

fn reverse(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut items = list(env, &args[0])?;
    items.reverse();
    Ok(Value::List(items))
}

fn member(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    for item in &list(env, &args[1])? {
        if eq_values(env, &args[0], item)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn map(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let items = list(env, &args[1])?;
    let mut mapped = Vec::with_capacity(items.len());
    for item in items {
        mapped.push(apply(cfg, env, &args[0], vec![item], trees)?);
    }
    Ok(Value::List(mapped))
}

fn indexed_map(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let items = list(env, &args[1])?;
    let mut mapped = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        mapped.push(apply(
            cfg,
            env,
            &args[0],
            vec![Value::Int(index as i64), item],
            trees,
        )?);
    }
    Ok(Value::List(mapped))
}

fn foldl(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut acc = args[1].clone();
    for item in list(env, &args[2])? {
        acc = apply(cfg, env, &args[0], vec![item, acc], trees)?;
    }
    Ok(acc)
}

fn foldr(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut acc = args[1].clone();
    for item in list(env, &args[2])?.into_iter().rev() {
        acc = apply(cfg, env, &args[0], vec![item, acc], trees)?;
    }
    Ok(acc)
}

fn filter(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut kept = Vec::new();
    for item in list(env, &args[1])? {
        let keep = apply(cfg, env, &args[0], vec![item.clone()], trees)?;
        if truthy(env, &keep)? {
            kept.push(item);
        }
    }
    Ok(Value::List(kept))
}

fn append(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut items = list(env, &args[0])?;
    items.extend(list(env, &args[1])?);
    Ok(Value::List(items))
}

fn concat(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut items = Vec::new();
    for inner in list(env, &args[0])? {
        items.extend(list(env, &inner)?);
    }
    Ok(Value::List(items))
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

/// `range lo hi` is inclusive on both ends.
fn range(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let lo = int(env, &args[0])?;
    let hi = int(env, &args[1])?;
    Ok(Value::List((lo..=hi).map(Value::Int).collect()))
}

fn take(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let n = int(env, &args[0])?.max(0) as usize;
    let mut items = list(env, &args[1])?;
    items.truncate(n);
    Ok(Value::List(items))
}

fn drop_(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let n = int(env, &args[0])?.max(0) as usize;
    let items = list(env, &args[1])?;
    Ok(Value::List(items.into_iter().skip(n).collect()))
}

fn any(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    for item in list(env, &args[1])? {
        let result = apply(cfg, env, &args[0], vec![item], trees)?;
        if truthy(env, &result)? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn all(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    for item in list(env, &args[1])? {
        let result = apply(cfg, env, &args[0], vec![item], trees)?;
        if !truthy(env, &result)? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn sum(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    fold_numeric(env, &args[0], 0, 0.0, i64::wrapping_add, |x, y| x + y)
}

fn product(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    fold_numeric(env, &args[0], 1, 1.0, i64::wrapping_mul, |x, y| x * y)
}

/// Stays integral until a float appears, then the whole fold is float.
fn fold_numeric(
    env: &Env,
    value: &Value,
    int_unit: i64,
    float_unit: f64,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    let items = list(env, value)?;
    let mut int_acc = int_unit;
    let mut float_acc = float_unit;
    let mut is_float = false;
    for item in items {
        match item {
            Value::Int(i) if !is_float => int_acc = int_op(int_acc, i),
            Value::Int(i) => float_acc = float_op(float_acc, i as f64),
            Value::Float(x) => {
                if !is_float {
                    is_float = true;
                    float_acc = float_op(int_acc as f64, x);
                } else {
                    float_acc = float_op(float_acc, x);
                }
            }
            other => {
                return Err(EvalError::type_error(
                    env,
                    format!("expected a number, got {}", other.kind_name()),
                ))
            }
        }
    }
    Ok(if is_float {
        Value::Float(float_acc)
    } else {
        Value::Int(int_acc)
    })
}

fn repeat(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let n = int(env, &args[0])?.max(0) as usize;
    Ok(Value::List(vec![args[1].clone(); n]))
}
