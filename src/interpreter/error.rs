//! Error types.
//!
//! The evaluator assumes a type-checked program; a `TypeError` therefore
//! means either an ill-typed input or an internal invariant violation,
//! and evaluation aborts immediately. Errors carry the call stack as it
//! stood when they were raised, rendered most-recent-last.

use std::fmt;

use thiserror::Error;

use super::env::Env;
use super::value::QualifiedName;

#[derive(Debug, Clone, PartialEq)]
pub enum EvalErrorKind {
    TypeError(String),
    NameError(String),
    Unsupported(String),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EvalErrorKind::TypeError(msg) => write!(f, "TypeError: {msg}"),
            EvalErrorKind::NameError(name) => write!(f, "NameError: {name}"),
            EvalErrorKind::Unsupported(msg) => write!(f, "Unsupported: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub call_stack: Vec<QualifiedName>,
}

impl EvalError {
    pub fn type_error(env: &Env, msg: impl Into<String>) -> Self {
        Self {
            kind: EvalErrorKind::TypeError(msg.into()),
            call_stack: env.stack(),
        }
    }

    pub fn name_error(env: &Env, name: impl Into<String>) -> Self {
        Self {
            kind: EvalErrorKind::NameError(name.into()),
            call_stack: env.stack(),
        }
    }

    pub fn unsupported(env: &Env, msg: impl Into<String>) -> Self {
        Self {
            kind: EvalErrorKind::Unsupported(msg.into()),
            call_stack: env.stack(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if !self.call_stack.is_empty() {
            write!(f, "\nCall stack:")?;
            for frame in &self.call_stack {
                write!(f, "\n - {frame}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for EvalError {}

/// Public error type: either the parser rejected the source, or
/// evaluation failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error("{0}")]
    ParsingError(String),
    #[error(transparent)]
    EvalError(#[from] EvalError),
}
