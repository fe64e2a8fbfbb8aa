//! `Larch.Kernel.Basics`: arithmetic, comparison, logic, and the
//! function-plumbing operators.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::ast::expression::Expression;
use crate::ast::pattern::Pattern;
use crate::interpreter::env::Env;
use crate::interpreter::error::EvalError;
use crate::interpreter::eval::apply;
use crate::interpreter::trace::CallTree;
use crate::interpreter::value::{PartialApplication, QualifiedName, Value};
use crate::interpreter::EvalConfig;

use super::Registry;

const MODULE: &str = "Larch.Kernel.Basics";

pub(crate) fn register(registry: &mut Registry) {
    registry.register(MODULE, "add", 2, add);
    registry.register(MODULE, "sub", 2, sub);
    registry.register(MODULE, "mul", 2, mul);
    registry.register(MODULE, "fdiv", 2, fdiv);
    registry.register(MODULE, "idiv", 2, idiv);
    registry.register(MODULE, "pow", 2, pow);
    registry.register(MODULE, "modBy", 2, mod_by);
    registry.register(MODULE, "remainderBy", 2, remainder_by);
    registry.register(MODULE, "negate", 1, negate);
    registry.register(MODULE, "abs", 1, abs);
    registry.register(MODULE, "sqrt", 1, sqrt);
    registry.register(MODULE, "round", 1, round);
    registry.register(MODULE, "floor", 1, floor);
    registry.register(MODULE, "ceiling", 1, ceiling);
    registry.register(MODULE, "truncate", 1, truncate);
    registry.register(MODULE, "toFloat", 1, to_float);
    registry.register(MODULE, "isNaN", 1, is_nan);
    registry.register(MODULE, "min", 2, min);
    registry.register(MODULE, "max", 2, max);
    registry.register(MODULE, "compare", 2, compare);
    registry.register(MODULE, "lt", 2, lt);
    registry.register(MODULE, "gt", 2, gt);
    registry.register(MODULE, "le", 2, le);
    registry.register(MODULE, "ge", 2, ge);
    registry.register(MODULE, "eq", 2, eq);
    registry.register(MODULE, "neq", 2, neq);
    registry.register(MODULE, "not", 1, not);
    registry.register(MODULE, "and", 2, and);
    registry.register(MODULE, "or", 2, or);
    registry.register(MODULE, "xor", 2, xor);
    registry.register(MODULE, "append", 2, append);
    registry.register(MODULE, "identity", 1, identity);
    registry.register(MODULE, "always", 2, always);
    registry.register(MODULE, "apR", 2, ap_right);
    registry.register(MODULE, "apL", 2, ap_left);
    registry.register(MODULE, "composeL", 2, compose_left);
    registry.register(MODULE, "composeR", 2, compose_right);
}

/// Apply matching int/float operations, promoting to float when the
/// operands are mixed (a well-typed program never mixes them; leniency
/// keeps the kernel small).
fn numeric2(
    env: &Env,
    a: &Value,
    b: &Value,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(Value::Int(int_op(*x, *y))),
        (Value::Float(x), Value::Float(y)) => Ok(Value::Float(float_op(*x, *y))),
        (Value::Int(x), Value::Float(y)) => Ok(Value::Float(float_op(*x as f64, *y))),
        (Value::Float(x), Value::Int(y)) => Ok(Value::Float(float_op(*x, *y as f64))),
        _ => Err(EvalError::type_error(
            env,
            format!("arithmetic on {} and {}", a.kind_name(), b.kind_name()),
        )),
    }
}

fn number(env: &Env, value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i as f64),
        Value::Float(x) => Ok(*x),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a number, got {}", value.kind_name()),
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

fn float(env: &Env, value: &Value) -> Result<f64, EvalError> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Int(i) => Ok(*i as f64),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a float, got {}", value.kind_name()),
        )),
    }
}

fn bool_arg(env: &Env, value: &Value) -> Result<bool, EvalError> {
    match value {
        Value::Bool(b) => Ok(*b),
        _ => Err(EvalError::type_error(
            env,
            format!("expected a boolean, got {}", value.kind_name()),
        )),
    }
}

fn add(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    numeric2(env, &args[0], &args[1], i64::wrapping_add, |x, y| x + y)
}

fn sub(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    numeric2(env, &args[0], &args[1], i64::wrapping_sub, |x, y| x - y)
}

fn mul(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    numeric2(env, &args[0], &args[1], i64::wrapping_mul, |x, y| x * y)
}

fn fdiv(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let x = number(env, &args[0])?;
    let y = number(env, &args[1])?;
    Ok(Value::Float(x / y))
}

/// Integer division truncates toward zero; division by zero is total
/// and yields 0.
fn idiv(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let x = int(env, &args[0])?;
    let y = int(env, &args[1])?;
    Ok(Value::Int(if y == 0 { 0 } else { x.wrapping_div(y) }))
}

fn pow(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match (&args[0], &args[1]) {
        (Value::Int(x), Value::Int(y)) => {
            if *y < 0 {
                Err(EvalError::type_error(env, "negative integer exponent"))
            } else {
                Ok(Value::Int(x.wrapping_pow(*y as u32)))
            }
        }
        (a, b) => {
            let x = number(env, a)?;
            let y = number(env, b)?;
            Ok(Value::Float(x.powf(y)))
        }
    }
}

/// `modBy modulus x`; the result has the modulus's sign. A modulus of
/// zero is an error.
fn mod_by(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let modulus = int(env, &args[0])?;
    let x = int(env, &args[1])?;
    if modulus == 0 {
        return Err(EvalError::type_error(env, "modBy with a modulus of 0"));
    }
    Ok(Value::Int(x.rem_euclid(modulus.abs()) * modulus.signum()))
}

fn remainder_by(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let divisor = int(env, &args[0])?;
    let x = int(env, &args[1])?;
    if divisor == 0 {
        return Err(EvalError::type_error(env, "remainderBy with a divisor of 0"));
    }
    Ok(Value::Int(x.wrapping_rem(divisor)))
}

fn negate(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(i.wrapping_neg())),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(EvalError::type_error(
            env,
            format!("cannot negate {}", other.kind_name()),
        )),
    }
}

fn abs(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match &args[0] {
        Value::Int(i) => Ok(Value::Int(i.wrapping_abs())),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(EvalError::type_error(
            env,
            format!("no absolute value for {}", other.kind_name()),
        )),
    }
}

fn sqrt(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Float(float(env, &args[0])?.sqrt()))
}

fn round(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(float(env, &args[0])?.round() as i64))
}

fn floor(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(float(env, &args[0])?.floor() as i64))
}

fn ceiling(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(float(env, &args[0])?.ceil() as i64))
}

fn truncate(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Int(float(env, &args[0])?.trunc() as i64))
}

fn to_float(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Float(number(env, &args[0])?))
}

fn is_nan(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(float(env, &args[0])?.is_nan()))
}

fn min(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let ordering = compare_values(env, &args[0], &args[1])?;
    Ok(if ordering == Ordering::Greater {
        args[1].clone()
    } else {
        args[0].clone()
    })
}

fn max(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let ordering = compare_values(env, &args[0], &args[1])?;
    Ok(if ordering == Ordering::Less {
        args[1].clone()
    } else {
        args[0].clone()
    })
}

/// Structural ordering over the comparable values: numbers, characters,
/// strings, lists, and tuples of comparables.
pub(crate) fn compare_values(env: &Env, a: &Value, b: &Value) -> Result<Ordering, EvalError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => Ok(x.cmp(y)),
        (Value::Int(_), Value::Float(_))
        | (Value::Float(_), Value::Int(_))
        | (Value::Float(_), Value::Float(_)) => {
            let x = number(env, a)?;
            let y = number(env, b)?;
            Ok(x.partial_cmp(&y).unwrap_or(Ordering::Equal))
        }
        (Value::Char(x), Value::Char(y)) => Ok(x.cmp(y)),
        (Value::String(x), Value::String(y)) => Ok(x.cmp(y)),
        (Value::List(xs), Value::List(ys)) => {
            for (x, y) in xs.iter().zip(ys) {
                let ordering = compare_values(env, x, y)?;
                if ordering != Ordering::Equal {
                    return Ok(ordering);
                }
            }
            Ok(xs.len().cmp(&ys.len()))
        }
        (Value::Tuple(a1, a2), Value::Tuple(b1, b2)) => {
            let first = compare_values(env, a1, b1)?;
            if first != Ordering::Equal {
                return Ok(first);
            }
            compare_values(env, a2, b2)
        }
        (Value::Triple(a1, a2, a3), Value::Triple(b1, b2, b3)) => {
            let first = compare_values(env, a1, b1)?;
            if first != Ordering::Equal {
                return Ok(first);
            }
            let second = compare_values(env, a2, b2)?;
            if second != Ordering::Equal {
                return Ok(second);
            }
            compare_values(env, a3, b3)
        }
        _ => Err(EvalError::type_error(
            env,
            format!("cannot compare {} and {}", a.kind_name(), b.kind_name()),
        )),
    }
}

/// Structural equality. Comparing functions is an error, as is comparing
/// values of different shapes (modulo int/float promotion).
pub(crate) fn eq_values(env: &Env, a: &Value, b: &Value) -> Result<bool, EvalError> {
    match (a, b) {
        (Value::PartiallyApplied(_), _) | (_, Value::PartiallyApplied(_)) => Err(
            EvalError::type_error(env, "cannot check equality of functions"),
        ),
        (Value::Unit, Value::Unit) => Ok(true),
        (Value::Bool(x), Value::Bool(y)) => Ok(x == y),
        (Value::Int(x), Value::Int(y)) => Ok(x == y),
        (Value::Int(_), Value::Float(_))
        | (Value::Float(_), Value::Int(_))
        | (Value::Float(_), Value::Float(_)) => Ok(number(env, a)? == number(env, b)?),
        (Value::Char(x), Value::Char(y)) => Ok(x == y),
        (Value::String(x), Value::String(y)) => Ok(x == y),
        (Value::List(xs), Value::List(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys) {
                if !eq_values(env, x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        (Value::Tuple(a1, a2), Value::Tuple(b1, b2)) => {
            Ok(eq_values(env, a1, b1)? && eq_values(env, a2, b2)?)
        }
        (Value::Triple(a1, a2, a3), Value::Triple(b1, b2, b3)) => {
            Ok(eq_values(env, a1, b1)? && eq_values(env, a2, b2)? && eq_values(env, a3, b3)?)
        }
        (Value::Record(xs), Value::Record(ys)) => {
            if xs.len() != ys.len() {
                return Ok(false);
            }
            for (key, x) in xs {
                match ys.get(key) {
                    Some(y) if eq_values(env, x, y)? => {}
                    _ => return Ok(false),
                }
            }
            Ok(true)
        }
        (
            Value::Custom { name: xn, args: xs },
            Value::Custom { name: yn, args: ys },
        ) => {
            // Qualifiers may differ between construction sites; the name
            // identifies the constructor.
            if xn.name != yn.name || xs.len() != ys.len() {
                return Ok(false);
            }
            for (x, y) in xs.iter().zip(ys) {
                if !eq_values(env, x, y)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        _ => Ok(false),
    }
}

pub(crate) fn order_value(ordering: Ordering) -> Value {
    let name = match ordering {
        Ordering::Less => "LT",
        Ordering::Equal => "EQ",
        Ordering::Greater => "GT",
    };
    Value::custom(QualifiedName::new("Basics", name), Vec::new())
}

fn compare(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(order_value(compare_values(env, &args[0], &args[1])?))
}

fn lt(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        compare_values(env, &args[0], &args[1])? == Ordering::Less,
    ))
}

fn gt(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        compare_values(env, &args[0], &args[1])? == Ordering::Greater,
    ))
}

fn le(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        compare_values(env, &args[0], &args[1])? != Ordering::Greater,
    ))
}

fn ge(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        compare_values(env, &args[0], &args[1])? != Ordering::Less,
    ))
}

fn eq(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(eq_values(env, &args[0], &args[1])?))
}

fn neq(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(!eq_values(env, &args[0], &args[1])?))
}

fn not(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(!bool_arg(env, &args[0])?))
}

fn and(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        bool_arg(env, &args[0])? && bool_arg(env, &args[1])?,
    ))
}

fn or(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        bool_arg(env, &args[0])? || bool_arg(env, &args[1])?,
    ))
}

fn xor(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(Value::Bool(
        bool_arg(env, &args[0])? != bool_arg(env, &args[1])?,
    ))
}

/// `++` appends strings or lists.
fn append(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    match (&args[0], &args[1]) {
        (Value::String(x), Value::String(y)) => Ok(Value::String(format!("{x}{y}"))),
        (Value::List(xs), Value::List(ys)) => {
            let mut items = xs.clone();
            items.extend(ys.iter().cloned());
            Ok(Value::List(items))
        }
        (a, b) => Err(EvalError::type_error(
            env,
            format!("cannot append {} and {}", a.kind_name(), b.kind_name()),
        )),
    }
}

fn identity(
    args: &[Value],
    _cfg: &EvalConfig,
    _env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(args[0].clone())
}

fn always(
    args: &[Value],
    _cfg: &EvalConfig,
    _env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(args[0].clone())
}

/// `x |> f`
fn ap_right(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    apply(cfg, env, &args[1], vec![args[0].clone()], trees)
}

/// `f <| x`
fn ap_left(
    args: &[Value],
    cfg: &EvalConfig,
    env: &Env,
    trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    apply(cfg, env, &args[0], vec![args[1].clone()], trees)
}

/// Build the closure `\x -> outer (inner x)` with the two functions held
/// in hidden bindings of the captured environment.
fn compose(env: &Env, outer: &Value, inner: &Value) -> Value {
    let mut captured = env.clone();
    captured.define_value("#outer", outer.clone());
    captured.define_value("#inner", inner.clone());
    let body = Expression::Application(vec![
        Rc::new(Expression::bare("#outer")),
        Rc::new(Expression::Application(vec![
            Rc::new(Expression::bare("#inner")),
            Rc::new(Expression::bare("#x")),
        ])),
    ]);
    Value::PartiallyApplied(Rc::new(PartialApplication {
        env: captured,
        args: Vec::new(),
        patterns: Rc::new(vec![Pattern::Var("#x".to_string())]),
        name: None,
        body: Rc::new(body),
    }))
}

/// `g << f`
fn compose_left(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(compose(env, &args[0], &args[1]))
}

/// `f >> g`
fn compose_right(
    args: &[Value],
    _cfg: &EvalConfig,
    env: &Env,
    _trees: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    Ok(compose(env, &args[1], &args[0]))
}
