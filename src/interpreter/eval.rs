//! The expression evaluator.
//!
//! Reduction is trampolined: `eval_step` performs one reduction and
//! either finishes with a value or hands back a tail continuation
//! `(env, expr)` that the outer loop in `run_loop` resumes without
//! growing the host stack. Every position the language treats as a tail
//! position - the chosen `if`/`case` branch, a `let` body, a
//! parenthesized expression, the body of a saturated call - goes through
//! that channel, which is what makes unbounded self-recursion in tail
//! position safe. Subexpressions in non-tail positions are evaluated
//! with a nested `run_loop`, so host-stack depth tracks AST nesting and
//! non-tail program recursion, never tail recursion.
//!
//! When tracing is enabled the loop keeps a stack of open call frames;
//! a chain of tail calls nests innermost-last and every frame in the
//! chain shares the chain's final result.

use std::rc::Rc;

use crate::ast::expression::{Expression, LetDeclaration};
use crate::ast::pattern::Pattern;
use crate::kernel::{self, KERNELS};
use crate::stdlib;

use super::deps;
use super::env::{Env, FunctionImpl};
use super::error::EvalError;
use super::pattern::{match_all, match_pattern};
use super::trace::{CallKind, CallTree};
use super::value::{PartialApplication, QualifiedName, Value};
use super::EvalConfig;

/// One reduction outcome.
enum Step {
    Done(Value),
    Tail {
        env: Env,
        expr: Rc<Expression>,
        frame: Option<FrameInfo>,
    },
}

/// A call frame opened by a tail step, recorded only when tracing.
struct FrameInfo {
    kind: CallKind,
    name: QualifiedName,
    args: Vec<Value>,
}

struct TraceFrame {
    info: FrameInfo,
    children: Vec<CallTree>,
}

/// Evaluate an expression to a value, returning the call trees recorded
/// along the way (empty unless tracing is enabled).
pub fn eval_expression(
    cfg: &EvalConfig,
    env: &Env,
    expr: &Rc<Expression>,
) -> (Result<Value, EvalError>, Vec<CallTree>) {
    let mut trees = Vec::new();
    let result = run_loop(cfg, env.clone(), expr.clone(), &mut trees);
    (result, trees)
}

/// Fully apply `func` to `args`. This is the re-entry point used by
/// higher-order kernel functions.
pub(crate) fn apply(
    cfg: &EvalConfig,
    env: &Env,
    func: &Value,
    args: Vec<Value>,
    sink: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let step = apply_step(cfg, env, func.clone(), args, sink)?;
    finish(cfg, step, sink)
}

/// The trampoline.
fn run_loop(
    cfg: &EvalConfig,
    mut env: Env,
    mut expr: Rc<Expression>,
    sink: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let mut frames: Vec<TraceFrame> = Vec::new();
    loop {
        let step = match frames.last_mut() {
            Some(frame) => eval_step(cfg, &env, &expr, &mut frame.children),
            None => eval_step(cfg, &env, &expr, sink),
        };
        match step {
            Ok(Step::Done(value)) => {
                unwind(frames, &Ok(value.clone()), sink);
                return Ok(value);
            }
            Ok(Step::Tail {
                env: next_env,
                expr: next_expr,
                frame,
            }) => {
                if let Some(info) = frame {
                    if cfg.trace {
                        frames.push(TraceFrame {
                            info,
                            children: Vec::new(),
                        });
                    }
                }
                env = next_env;
                expr = next_expr;
            }
            Err(err) => {
                unwind(frames, &Err(err.clone()), sink);
                return Err(err);
            }
        }
    }
}

/// Close every open frame, innermost first, nesting each call node
/// inside its caller's.
fn unwind(
    mut frames: Vec<TraceFrame>,
    result: &Result<Value, EvalError>,
    sink: &mut Vec<CallTree>,
) {
    let mut nested: Option<CallTree> = None;
    while let Some(frame) = frames.pop() {
        let mut children = frame.children;
        if let Some(inner) = nested.take() {
            children.push(inner);
        }
        nested = Some(CallTree {
            kind: frame.info.kind,
            name: frame.info.name,
            args: frame.info.args,
            result: result.clone(),
            children,
        });
    }
    if let Some(tree) = nested {
        sink.push(tree);
    }
}

/// Evaluate a subexpression in non-tail position.
fn eval_value(
    cfg: &EvalConfig,
    env: &Env,
    expr: &Rc<Expression>,
    sink: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    run_loop(cfg, env.clone(), expr.clone(), sink)
}

/// Run a tail step to completion, wrapping it in a call node if it
/// opened a frame. Used where a call result is needed in the middle of
/// another reduction (over-application, kernel callbacks).
fn finish(cfg: &EvalConfig, step: Step, sink: &mut Vec<CallTree>) -> Result<Value, EvalError> {
    match step {
        Step::Done(value) => Ok(value),
        Step::Tail { env, expr, frame } => match frame {
            Some(info) if cfg.trace => {
                let mut children = Vec::new();
                let result = run_loop(cfg, env, expr, &mut children);
                sink.push(CallTree {
                    kind: info.kind,
                    name: info.name,
                    args: info.args,
                    result: result.clone(),
                    children,
                });
                result
            }
            _ => run_loop(cfg, env, expr, sink),
        },
    }
}

fn eval_step(
    cfg: &EvalConfig,
    env: &Env,
    expr: &Rc<Expression>,
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    match expr.as_ref() {
        Expression::Unit => Ok(Step::Done(Value::Unit)),
        Expression::Integer(i) | Expression::Hex(i) => Ok(Step::Done(Value::Int(*i))),
        Expression::Float(x) => Ok(Step::Done(Value::Float(*x))),
        Expression::CharLiteral(c) => Ok(Step::Done(Value::Char(*c))),
        Expression::StringLiteral(s) => Ok(Step::Done(Value::String(s.clone()))),

        Expression::Name { module, name } => resolve_name(cfg, env, module, name, sink),

        Expression::Operator(op) => Ok(Step::Done(operator_value(env, op)?)),

        Expression::Negation(inner) => match eval_value(cfg, env, inner, sink)? {
            Value::Int(i) => Ok(Step::Done(Value::Int(i.wrapping_neg()))),
            Value::Float(x) => Ok(Step::Done(Value::Float(-x))),
            other => Err(EvalError::type_error(
                env,
                format!("cannot negate {}", other.kind_name()),
            )),
        },

        Expression::BinaryOp { op, left, right } if op == "&&" => {
            match eval_value(cfg, env, left, sink)? {
                Value::Bool(false) => Ok(Step::Done(Value::Bool(false))),
                Value::Bool(true) => Ok(Step::Tail {
                    env: env.clone(),
                    expr: right.clone(),
                    frame: None,
                }),
                other => Err(EvalError::type_error(
                    env,
                    format!("&& needs boolean operands, got {}", other.kind_name()),
                )),
            }
        }

        Expression::BinaryOp { op, left, right } if op == "||" => {
            match eval_value(cfg, env, left, sink)? {
                Value::Bool(true) => Ok(Step::Done(Value::Bool(true))),
                Value::Bool(false) => Ok(Step::Tail {
                    env: env.clone(),
                    expr: right.clone(),
                    frame: None,
                }),
                other => Err(EvalError::type_error(
                    env,
                    format!("|| needs boolean operands, got {}", other.kind_name()),
                )),
            }
        }

        Expression::BinaryOp { op, left, right } => {
            let func = operator_value(env, op)?;
            let l = eval_value(cfg, env, left, sink)?;
            let r = eval_value(cfg, env, right, sink)?;
            apply_step(cfg, env, func, vec![l, r], sink)
        }

        Expression::If {
            condition,
            then_branch,
            else_branch,
        } => match eval_value(cfg, env, condition, sink)? {
            Value::Bool(true) => Ok(Step::Tail {
                env: env.clone(),
                expr: then_branch.clone(),
                frame: None,
            }),
            Value::Bool(false) => Ok(Step::Tail {
                env: env.clone(),
                expr: else_branch.clone(),
                frame: None,
            }),
            other => Err(EvalError::type_error(
                env,
                format!("if condition must be a boolean, got {}", other.kind_name()),
            )),
        },

        Expression::Tuple(items) => match items.len() {
            1 => Ok(Step::Tail {
                env: env.clone(),
                expr: items[0].clone(),
                frame: None,
            }),
            2 => {
                let a = eval_value(cfg, env, &items[0], sink)?;
                let b = eval_value(cfg, env, &items[1], sink)?;
                Ok(Step::Done(Value::Tuple(Box::new(a), Box::new(b))))
            }
            3 => {
                let a = eval_value(cfg, env, &items[0], sink)?;
                let b = eval_value(cfg, env, &items[1], sink)?;
                let c = eval_value(cfg, env, &items[2], sink)?;
                Ok(Step::Done(Value::Triple(
                    Box::new(a),
                    Box::new(b),
                    Box::new(c),
                )))
            }
            _ => Err(EvalError::unsupported(
                env,
                "tuples with more than three elements are not supported",
            )),
        },

        Expression::List(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_value(cfg, env, item, sink)?);
            }
            Ok(Step::Done(Value::List(values)))
        }

        Expression::Record(fields) => {
            let mut map = im::HashMap::new();
            for (name, value_expr) in fields {
                map.insert(name.clone(), eval_value(cfg, env, value_expr, sink)?);
            }
            Ok(Step::Done(Value::Record(map)))
        }

        Expression::RecordAccess(record_expr, field) => {
            match eval_value(cfg, env, record_expr, sink)? {
                Value::Record(map) => match map.get(field) {
                    Some(value) => Ok(Step::Done(value.clone())),
                    None => Err(EvalError::type_error(
                        env,
                        format!("record has no field '{field}'"),
                    )),
                },
                other => Err(EvalError::type_error(
                    env,
                    format!("cannot access field '{field}' of {}", other.kind_name()),
                )),
            }
        }

        Expression::RecordAccessor(field) => Ok(Step::Done(accessor_function(env, field))),

        Expression::RecordUpdate { name, fields } => {
            let base = eval_value(cfg, env, &Rc::new(Expression::bare(name.clone())), sink)?;
            match base {
                Value::Record(mut map) => {
                    for (field, value_expr) in fields {
                        map.insert(field.clone(), eval_value(cfg, env, value_expr, sink)?);
                    }
                    Ok(Step::Done(Value::Record(map)))
                }
                other => Err(EvalError::type_error(
                    env,
                    format!("record update on {}", other.kind_name()),
                )),
            }
        }

        Expression::Lambda { params, body } => {
            Ok(Step::Done(Value::PartiallyApplied(Rc::new(
                PartialApplication {
                    env: env.clone(),
                    args: Vec::new(),
                    patterns: params.clone(),
                    name: None,
                    body: body.clone(),
                },
            ))))
        }

        Expression::Let { declarations, body } => let_block(cfg, env, declarations, body, sink),

        Expression::Case {
            scrutinee,
            branches,
        } => case_of(cfg, env, scrutinee, branches, sink),

        Expression::Application(items) => {
            let func = eval_value(cfg, env, &items[0], sink)?;
            let mut args = Vec::with_capacity(items.len() - 1);
            for item in &items[1..] {
                args.push(eval_value(cfg, env, item, sink)?);
            }
            apply_step(cfg, env, func, args, sink)
        }

        Expression::Parenthesized(inner) => Ok(Step::Tail {
            env: env.clone(),
            expr: inner.clone(),
            frame: None,
        }),
    }
}

fn is_variant(name: &str) -> bool {
    name.chars().next().map_or(false, char::is_uppercase)
}

/// Resolve a `FunctionOrValue` reference per the scoping rules: variants
/// construct, kernel paths hit the registry, and bare names try local
/// bindings, then the current module's functions, then `Basics`.
fn resolve_name(
    cfg: &EvalConfig,
    env: &Env,
    module: &str,
    name: &str,
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    if is_variant(name) {
        if module.is_empty() && (name == "True" || name == "False") {
            return Ok(Step::Done(Value::Bool(name == "True")));
        }
        return Ok(Step::Done(Value::custom(
            QualifiedName::new(module, name),
            Vec::new(),
        )));
    }

    let module = stdlib::resolve_alias(module);

    if kernel::is_kernel_module(&module) {
        return kernel_reference(cfg, env, &module, name, sink);
    }

    if module.is_empty() {
        if let Some(value) = env.lookup_value(name) {
            return Ok(Step::Done(value.clone()));
        }
        let current = env.current_module.clone();
        if let Some(function) = env.lookup_function(&current, name) {
            return Ok(function_reference(env, &current, name, function.clone()));
        }
        if let Some(function) = env.lookup_function("Basics", name) {
            return Ok(function_reference(env, "Basics", name, function.clone()));
        }
        return Err(EvalError::name_error(env, name));
    }

    match env.lookup_function(&module, name) {
        Some(function) => Ok(function_reference(env, &module, name, function.clone())),
        None => Err(EvalError::name_error(env, format!("{module}.{name}"))),
    }
}

fn function_reference(env: &Env, module: &str, name: &str, function: FunctionImpl) -> Step {
    let qname = QualifiedName::new(module, name);
    if function.params.is_empty() {
        // A constant applicative form: not a function, a lazily evaluated
        // top-level value. Reduce to its body in tail position.
        let callee_env = env.enter_frame(&qname);
        Step::Tail {
            env: callee_env,
            expr: function.body.clone(),
            frame: Some(FrameInfo {
                kind: CallKind::EvalFunction,
                name: qname,
                args: Vec::new(),
            }),
        }
    } else {
        Step::Done(Value::PartiallyApplied(Rc::new(PartialApplication {
            env: env.clone(),
            args: Vec::new(),
            patterns: function.params.clone(),
            name: Some(qname),
            body: function.body.clone(),
        })))
    }
}

fn kernel_reference(
    cfg: &EvalConfig,
    env: &Env,
    module: &str,
    name: &str,
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    let Some(kernel) = KERNELS.get(module, name) else {
        return Err(EvalError::name_error(env, format!("{module}.{name}")));
    };
    let qname = QualifiedName::new(module, name);
    if kernel.arity == 0 {
        // Arity-0 kernels behave as constants.
        let value = invoke_kernel(cfg, env, &qname, &[], sink)?;
        return Ok(Step::Done(value));
    }
    Ok(Step::Done(Value::PartiallyApplied(Rc::new(
        PartialApplication {
            env: env.clone(),
            args: Vec::new(),
            patterns: Rc::new(vec![Pattern::Anything; kernel.arity]),
            name: Some(qname),
            body: Rc::new(Expression::qualified(module, name)),
        },
    ))))
}

/// An operator symbol resolves through the symbol table to a
/// two-parameter function whose body is the kernel reference, so
/// operator application shares the ordinary application path.
fn operator_value(env: &Env, op: &str) -> Result<Value, EvalError> {
    let Some((module, name)) = stdlib::operator_target(op) else {
        return Err(EvalError::unsupported(env, format!("operator {op}")));
    };
    Ok(Value::PartiallyApplied(Rc::new(PartialApplication {
        env: env.clone(),
        args: Vec::new(),
        patterns: Rc::new(vec![Pattern::Anything, Pattern::Anything]),
        name: Some(QualifiedName::new(module, name)),
        body: Rc::new(Expression::qualified(module, name)),
    })))
}

/// `.field` as a function value.
fn accessor_function(env: &Env, field: &str) -> Value {
    Value::PartiallyApplied(Rc::new(PartialApplication {
        env: env.clone(),
        args: Vec::new(),
        patterns: Rc::new(vec![Pattern::Var("#record".to_string())]),
        name: None,
        body: Rc::new(Expression::RecordAccess(
            Rc::new(Expression::bare("#record")),
            field.to_string(),
        )),
    }))
}

/// Apply a function value to already-evaluated arguments: variant
/// construction, under-saturation, exact saturation, or over-application
/// (call, then apply the result to what is left).
fn apply_step(
    cfg: &EvalConfig,
    env: &Env,
    func: Value,
    args: Vec<Value>,
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    if args.is_empty() {
        return Ok(Step::Done(func));
    }
    match func {
        Value::Custom {
            name,
            args: mut built,
        } => {
            built.extend(args);
            Ok(Step::Done(Value::Custom { name, args: built }))
        }
        Value::PartiallyApplied(partial) => {
            let have = partial.args.len();
            let want = partial.patterns.len();
            let give = args.len();

            if have + give < want {
                let mut extended = (*partial).clone();
                extended.args.extend(args);
                return Ok(Step::Done(Value::PartiallyApplied(Rc::new(extended))));
            }

            let mut args = args;
            let rest = args.split_off(want - have);
            let mut full = partial.args.clone();
            full.extend(args);

            if rest.is_empty() {
                saturated_step(cfg, env, &partial, full, sink)
            } else {
                let step = saturated_step(cfg, env, &partial, full, sink)?;
                let value = finish(cfg, step, sink)?;
                apply_step(cfg, env, value, rest, sink)
            }
        }
        _ => Err(EvalError::type_error(
            env,
            "Trying to apply a non-lambda non-variant",
        )),
    }
}

/// Invoke a function whose argument vector is now complete.
fn saturated_step(
    cfg: &EvalConfig,
    env: &Env,
    partial: &PartialApplication,
    args: Vec<Value>,
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    // Kernel fast path: a body that is directly a kernel reference is
    // dispatched on the raw argument vector, skipping pattern binding.
    if let Expression::Name { module, name } = partial.body.as_ref() {
        if kernel::is_kernel_module(module) {
            let qname = QualifiedName::new(module.clone(), name.clone());
            let value = invoke_kernel(cfg, env, &qname, &args, sink)?;
            return Ok(Step::Done(value));
        }
    }

    let arg_refs: Vec<&Value> = args.iter().collect();
    let Some(bindings) = match_all(env, &partial.patterns, &arg_refs)? else {
        return Err(EvalError::type_error(
            env,
            "function arguments do not match its parameter patterns",
        ));
    };

    let mut callee_env = partial.env.extend_values(bindings);
    if let Some(qname) = &partial.name {
        callee_env = callee_env.enter_frame(qname);
    }

    let frame = match &partial.name {
        Some(qname) if cfg.trace => Some(FrameInfo {
            kind: CallKind::Call,
            name: qname.clone(),
            args,
        }),
        _ => None,
    };

    Ok(Step::Tail {
        env: callee_env,
        expr: partial.body.clone(),
        frame,
    })
}

/// Dispatch a kernel function in the callee's call frame, recording an
/// `evalKernelFunction` node when tracing.
fn invoke_kernel(
    cfg: &EvalConfig,
    env: &Env,
    qname: &QualifiedName,
    args: &[Value],
    sink: &mut Vec<CallTree>,
) -> Result<Value, EvalError> {
    let Some(kernel) = KERNELS.get(&qname.module, &qname.name) else {
        return Err(EvalError::name_error(env, qname.to_string()));
    };
    debug_assert_eq!(kernel.arity, args.len());
    tracing::trace!(kernel = %qname, "dispatch");

    let kernel_env = env.enter_frame(qname);
    let mut children = Vec::new();
    let result = (kernel.run)(args, cfg, &kernel_env, &mut children);
    if cfg.trace {
        sink.push(CallTree {
            kind: CallKind::EvalKernelFunction,
            name: qname.clone(),
            args: args.to_vec(),
            result: result.clone(),
            children,
        });
    } else {
        sink.extend(children);
    }
    result
}

/// Evaluate a let block: install functions, evaluate destructurings and
/// nullary bindings in dependency order, then reduce to the body.
fn let_block(
    cfg: &EvalConfig,
    env: &Env,
    declarations: &[LetDeclaration],
    body: &Rc<Expression>,
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    let order = deps::sort_declarations(env, declarations)?;
    let mut scope = env.clone();
    for index in order {
        match &declarations[index] {
            LetDeclaration::Function { name, params, body } if !params.is_empty() => {
                scope.define_function(
                    scope.current_module.clone(),
                    name.clone(),
                    FunctionImpl {
                        params: Rc::new(params.clone()),
                        body: body.clone(),
                    },
                );
            }
            LetDeclaration::Function { name, body, .. } => {
                let value = eval_value(cfg, &scope, body, sink)?;
                scope.define_value(name.clone(), value);
            }
            LetDeclaration::Destructuring { pattern, body } => {
                let value = eval_value(cfg, &scope, body, sink)?;
                match match_pattern(&scope, pattern, &value)? {
                    Some(bindings) => scope = scope.extend_values(bindings),
                    None => {
                        return Err(EvalError::type_error(
                            &scope,
                            format!("let destructuring does not match {value}"),
                        ))
                    }
                }
            }
        }
    }
    Ok(Step::Tail {
        env: scope,
        expr: body.clone(),
        frame: None,
    })
}

/// Evaluate the scrutinee once, then try each branch top to bottom.
fn case_of(
    cfg: &EvalConfig,
    env: &Env,
    scrutinee: &Rc<Expression>,
    branches: &[(Pattern, Rc<Expression>)],
    sink: &mut Vec<CallTree>,
) -> Result<Step, EvalError> {
    let value = eval_value(cfg, env, scrutinee, sink)?;
    for (pattern, body) in branches {
        match match_pattern(env, pattern, &value)? {
            Some(bindings) => {
                return Ok(Step::Tail {
                    env: env.extend_values(bindings),
                    expr: body.clone(),
                    frame: None,
                })
            }
            None => continue,
        }
    }
    Err(EvalError::type_error(
        env,
        format!("Missing case branch for {value}"),
    ))
}
