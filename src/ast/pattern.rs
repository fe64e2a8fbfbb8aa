//! Pattern AST nodes.
//!
//! Patterns appear in three places: case branches, function parameters
//! (where they must be irrefutable for a well-typed program), and the
//! left-hand side of a destructuring `let`. Matching semantics live in
//! `crate::interpreter::pattern`; this module is shape only.
//!
//! A constructor pattern (`Just x`, `Maybe.Just x`) records the qualifier
//! it was written with, but matching compares the constructor *name* only:
//! the type checker has already ruled out cross-type confusion.

#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// `_` - matches anything, binds nothing.
    Anything,
    Unit,
    Integer(i64),
    /// Hex-written integer literal; matches like [`Pattern::Integer`].
    Hex(i64),
    Float(f64),
    Char(char),
    String(String),
    /// Lowercase identifier - matches anything, binds the name.
    Var(String),
    /// `pattern as name`.
    As(Box<Pattern>, String),
    Parenthesized(Box<Pattern>),
    /// `(p, q)` or `(p, q, r)`.
    Tuple(Vec<Pattern>),
    /// `[p1, ..., pn]` - fixed length.
    List(Vec<Pattern>),
    /// `head :: tail`.
    Cons(Box<Pattern>, Box<Pattern>),
    /// `{ field1, field2 }` - binds each field name.
    Record(Vec<String>),
    /// `Ctor p1 ... pn`, possibly qualified.
    Constructor {
        module: String,
        name: String,
        args: Vec<Pattern>,
    },
}

impl Pattern {
    /// Names bound by this pattern, in source order.
    pub fn bound_names(&self, out: &mut Vec<String>) {
        match self {
            Pattern::Var(name) => out.push(name.clone()),
            Pattern::As(inner, name) => {
                inner.bound_names(out);
                out.push(name.clone());
            }
            Pattern::Parenthesized(inner) => inner.bound_names(out),
            Pattern::Tuple(items) | Pattern::List(items) => {
                for item in items {
                    item.bound_names(out);
                }
            }
            Pattern::Cons(head, tail) => {
                head.bound_names(out);
                tail.bound_names(out);
            }
            Pattern::Record(fields) => out.extend(fields.iter().cloned()),
            Pattern::Constructor { args, .. } => {
                for arg in args {
                    arg.bound_names(out);
                }
            }
            _ => {}
        }
    }
}
