//! Call trees for diagnostics.
//!
//! When tracing is enabled the evaluator records one node per function
//! call. Along a tail-call chain every node shares the chain's final
//! result, because each call's answer *is* the next call's answer.

use std::fmt;

use super::error::EvalError;
use super::value::{QualifiedName, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// The driver's invocation of the entry point.
    Application,
    /// A saturated user-function call.
    Call,
    /// Reduction of a zero-parameter definition.
    EvalFunction,
    /// A primitive dispatch.
    EvalKernelFunction,
}

impl fmt::Display for CallKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            CallKind::Application => "application",
            CallKind::Call => "call",
            CallKind::EvalFunction => "evalFunction",
            CallKind::EvalKernelFunction => "evalKernelFunction",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallTree {
    pub kind: CallKind,
    pub name: QualifiedName,
    pub args: Vec<Value>,
    pub result: Result<Value, EvalError>,
    pub children: Vec<CallTree>,
}

impl CallTree {
    fn render(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        for _ in 0..depth {
            write!(f, "  ")?;
        }
        write!(f, "{} {}", self.kind, self.name)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        match &self.result {
            Ok(value) => writeln!(f, " => {value}")?,
            Err(err) => writeln!(f, " => {}", err.kind)?,
        }
        for child in &self.children {
            child.render(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for CallTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, 0)
    }
}
