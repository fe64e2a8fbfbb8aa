//! Expression AST nodes.
//!
//! The forms mirror the surface syntax closely; the parser does almost no
//! desugaring. Two things worth knowing:
//!
//! - An application `f a b` is one [`Expression::Application`] node whose
//!   first element is the function expression.
//! - `&&` and `||` stay as [`Expression::BinaryOp`] and are special-cased
//!   by the evaluator (short-circuit); every other operator is rewritten
//!   at evaluation time into an application of a kernel-backed function.

use std::rc::Rc;

use super::pattern::Pattern;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Unit,
    Integer(i64),
    /// Integer written in hex notation; evaluates like [`Expression::Integer`].
    Hex(i64),
    Float(f64),
    CharLiteral(char),
    StringLiteral(String),
    /// A reference to a value, function, or variant constructor.
    /// `module` is empty for unqualified references.
    Name {
        module: String,
        name: String,
    },
    /// An operator used as a value: `(+)`.
    Operator(String),
    /// Arithmetic negation: `-x`.
    Negation(Rc<Expression>),
    BinaryOp {
        op: String,
        left: Rc<Expression>,
        right: Rc<Expression>,
    },
    If {
        condition: Rc<Expression>,
        then_branch: Rc<Expression>,
        else_branch: Rc<Expression>,
    },
    /// `(a, b)` or `(a, b, c)`. The parser also produces longer tuples,
    /// which the evaluator rejects.
    Tuple(Vec<Rc<Expression>>),
    List(Vec<Rc<Expression>>),
    Record(Vec<(String, Rc<Expression>)>),
    RecordAccess(Rc<Expression>, String),
    /// `.field` as a function.
    RecordAccessor(String),
    /// `{ base | field = value, ... }`.
    RecordUpdate {
        name: String,
        fields: Vec<(String, Rc<Expression>)>,
    },
    Lambda {
        params: Rc<Vec<Pattern>>,
        body: Rc<Expression>,
    },
    Let {
        declarations: Vec<LetDeclaration>,
        body: Rc<Expression>,
    },
    Case {
        scrutinee: Rc<Expression>,
        branches: Vec<(Pattern, Rc<Expression>)>,
    },
    /// Function application; `items[0]` is the function, the rest are
    /// arguments, evaluated left to right.
    Application(Vec<Rc<Expression>>),
    Parenthesized(Rc<Expression>),
}

/// A declaration inside a `let ... in` block.
#[derive(Debug, Clone, PartialEq)]
pub enum LetDeclaration {
    /// `f x y = ...` or the nullary `x = ...`.
    Function {
        name: String,
        params: Vec<Pattern>,
        body: Rc<Expression>,
    },
    /// `(a, b) = ...` and other pattern left-hand sides.
    Destructuring {
        pattern: Pattern,
        body: Rc<Expression>,
    },
}

impl Expression {
    /// Variable / constructor reference with no qualifier.
    pub fn bare(name: impl Into<String>) -> Self {
        Expression::Name {
            module: String::new(),
            name: name.into(),
        }
    }

    /// Qualified reference.
    pub fn qualified(module: impl Into<String>, name: impl Into<String>) -> Self {
        Expression::Name {
            module: module.into(),
            name: name.into(),
        }
    }
}
