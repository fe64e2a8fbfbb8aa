//! Larch - an interpreter for a small, pure, ML-family functional
//! language.
//!
//! This library lexes and parses Larch source text, resolves names
//! against a kernel-backed standard library, and reduces a chosen entry
//! expression to a value with a trampolined tree-walking evaluator
//! (tail calls run in constant host-stack space). Call trees can be
//! recorded for diagnostics via the `trace` entry points.

pub mod ast;
pub mod interpreter;
pub mod kernel;
pub mod lexer;
pub mod parser;
pub mod stdlib;

pub use interpreter::{
    eval, eval_module, trace, trace_module, CallKind, CallTree, Env, Error, EvalConfig, EvalError,
    EvalErrorKind, QualifiedName, Value,
};
