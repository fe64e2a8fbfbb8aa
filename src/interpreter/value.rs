//! Runtime value representation.
//!
//! `Value` is the complete universe of runtime values. Two variants carry
//! the interesting structure: `Custom` holds any variant constructor
//! application (user types as well as `Maybe`, `Result`, `Order`; the
//! booleans are `Value::Bool`, never `Custom`), and `PartiallyApplied`
//! represents both lambdas and named functions that have not yet received
//! every argument. A saturated `PartiallyApplied` is never stored - the
//! evaluator calls it immediately.

use std::fmt;
use std::rc::Rc;

use crate::ast::expression::Expression;
use crate::ast::pattern::Pattern;

use super::env::Env;

/// A constructor or function name together with the module qualifier it
/// was referenced through; empty for unqualified references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedName {
    pub module: String,
    pub name: String,
}

impl QualifiedName {
    pub fn new(module: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.module.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}.{}", self.module, self.name)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Unit,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    List(Vec<Value>),
    Tuple(Box<Value>, Box<Value>),
    Triple(Box<Value>, Box<Value>, Box<Value>),
    Record(im::HashMap<String, Value>),
    /// A variant constructor, fully or partially applied; arity is the
    /// type checker's business, not ours.
    Custom {
        name: QualifiedName,
        args: Vec<Value>,
    },
    PartiallyApplied(Rc<PartialApplication>),
}

/// Closure state: the captured environment, the arguments received so
/// far, the parameter patterns still owed, the function's name when it
/// has one (for call stacks and traces), and the body to run once
/// saturated.
#[derive(Debug, Clone, PartialEq)]
pub struct PartialApplication {
    pub env: Env,
    pub args: Vec<Value>,
    pub patterns: Rc<Vec<Pattern>>,
    pub name: Option<QualifiedName>,
    pub body: Rc<Expression>,
}

impl Value {
    pub fn custom(name: QualifiedName, args: Vec<Value>) -> Self {
        Value::Custom { name, args }
    }

    /// Short description of the value's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::Bool(_) => "a boolean",
            Value::Int(_) => "an integer",
            Value::Float(_) => "a float",
            Value::Char(_) => "a character",
            Value::String(_) => "a string",
            Value::List(_) => "a list",
            Value::Tuple(..) => "a tuple",
            Value::Triple(..) => "a triple",
            Value::Record(_) => "a record",
            Value::Custom { .. } => "a variant",
            Value::PartiallyApplied(_) => "a function",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Unit => write!(f, "()"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => {
                if x.fract() == 0.0 && x.is_finite() {
                    write!(f, "{x:.1}")
                } else {
                    write!(f, "{x}")
                }
            }
            Value::Char(c) => write!(f, "'{c}'"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::Tuple(a, b) => write!(f, "({a},{b})"),
            Value::Triple(a, b, c) => write!(f, "({a},{b},{c})"),
            Value::Record(fields) => {
                if fields.is_empty() {
                    return write!(f, "{{}}");
                }
                let mut entries: Vec<_> = fields.iter().collect();
                entries.sort_by(|a, b| a.0.cmp(b.0));
                write!(f, "{{ ")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key} = {value}")?;
                }
                write!(f, " }}")
            }
            Value::Custom { name, args } => {
                write!(f, "{}", name.name)?;
                for arg in args {
                    match arg {
                        Value::Custom { args, .. } if !args.is_empty() => write!(f, " ({arg})")?,
                        Value::Int(i) if *i < 0 => write!(f, " ({arg})")?,
                        _ => write!(f, " {arg}")?,
                    }
                }
                Ok(())
            }
            Value::PartiallyApplied(_) => write!(f, "<function>"),
        }
    }
}
