//! Top-level driver.
//!
//! `eval` wraps a bare expression in a synthetic `Main` module and
//! evaluates its `main`; `eval_module` parses a full module and evaluates
//! a named entry declaration. The `trace` variants do the same with call
//! tree recording turned on.

mod deps;
pub mod env;
pub mod error;
pub mod eval;
pub mod pattern;
pub mod trace;
pub mod value;

use std::rc::Rc;

use crate::ast::expression::Expression;
use crate::lexer;
use crate::parser;
use crate::stdlib;

pub use env::Env;
pub use error::{Error, EvalError, EvalErrorKind};
pub use trace::{CallKind, CallTree};
pub use value::{QualifiedName, Value};

/// Evaluator configuration, threaded through every reduction.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvalConfig {
    pub trace: bool,
}

/// Evaluate a bare expression.
pub fn eval(source: &str) -> Result<Value, Error> {
    evaluate_expression(source, EvalConfig::default()).0
}

/// Evaluate a bare expression with call-tree recording.
pub fn trace(source: &str) -> (Result<Value, Error>, Vec<CallTree>) {
    evaluate_expression(source, EvalConfig { trace: true })
}

/// Parse `source` as a module and evaluate the entry declaration, given
/// either qualified (`Main.main`) or bare (`main`).
pub fn eval_module(source: &str, entry: &str) -> Result<Value, Error> {
    evaluate_module(source, entry, EvalConfig::default()).0
}

/// [`eval_module`] with call-tree recording.
pub fn trace_module(source: &str, entry: &str) -> (Result<Value, Error>, Vec<CallTree>) {
    evaluate_module(source, entry, EvalConfig { trace: true })
}

fn evaluate_expression(source: &str, cfg: EvalConfig) -> (Result<Value, Error>, Vec<CallTree>) {
    let wrapped = format!("module Main exposing (main)\n\nmain =\n   {source}");
    evaluate_module(&wrapped, "main", cfg)
}

fn evaluate_module(
    source: &str,
    entry: &str,
    cfg: EvalConfig,
) -> (Result<Value, Error>, Vec<CallTree>) {
    let tokens = match lexer::tokenize(source) {
        Ok(tokens) => tokens,
        Err(err) => return (Err(Error::ParsingError(err.to_string())), Vec::new()),
    };
    let module = match parser::parse_module(tokens) {
        Ok(module) => module,
        Err(err) => return (Err(Error::ParsingError(err.to_string())), Vec::new()),
    };

    let mut env = stdlib::prepare_environment(&module);

    let (entry_module, entry_name) = match entry.rsplit_once('.') {
        Some((module, name)) => (module.to_string(), name.to_string()),
        None => (module.name.clone(), entry.to_string()),
    };
    tracing::debug!(module = %entry_module, entry = %entry_name, "evaluating");

    if env.lookup_function(&entry_module, &entry_name).is_none() {
        let err = EvalError {
            kind: EvalErrorKind::NameError(format!("{entry_module}.{entry_name}")),
            call_stack: Vec::new(),
        };
        return (Err(Error::EvalError(err)), Vec::new());
    }
    env.current_module = entry_module.clone();

    let expr = Rc::new(Expression::bare(entry_name.clone()));
    let (result, mut trees) = eval::eval_expression(&cfg, &env, &expr);

    if cfg.trace {
        trees = vec![CallTree {
            kind: CallKind::Application,
            name: QualifiedName::new(entry_module, entry_name),
            args: Vec::new(),
            result: result.clone(),
            children: trees,
        }];
    }

    (result.map_err(Error::from), trees)
}
