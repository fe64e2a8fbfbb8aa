//! Parser for Larch modules.
//!
//! Recursive descent over the token stream with explicit backtracking:
//! grammar functions save the token index with [`ParseState::position`]
//! and roll back with [`ParseState::restore`] when an alternative fails.
//!
//! Layout is handled with an indentation threshold threaded through the
//! expression grammar: a token on a fresh line only continues the current
//! expression if its column is strictly greater than the enclosing
//! block's indent. Case branches and let declarations raise the threshold
//! to the column of their first token.

mod grammar;

pub use grammar::parse_module;

use std::fmt;

use crate::lexer::{Span, Token, TokenKind};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    pub span: Option<Span>,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            span: None,
        }
    }

    pub fn at(msg: impl Into<String>, span: Span) -> Self {
        Self {
            message: msg.into(),
            span: Some(span),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.span {
            Some(span) => write!(
                f,
                "parse error at {}:{}: {}",
                span.line(),
                span.column(),
                self.message
            ),
            None => write!(f, "parse error: {}", self.message),
        }
    }
}

impl std::error::Error for ParseError {}

pub type ParseResult<T> = Result<T, ParseError>;

pub struct ParseState {
    tokens: Vec<Token>,
    index: usize,
}

impl ParseState {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn next(&mut self) -> Option<Token> {
        if self.has_next() {
            let token = self.tokens[self.index].clone();
            self.index += 1;
            Some(token)
        } else {
            None
        }
    }

    pub fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    pub fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.index + offset)
    }

    pub fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    /// The most recently consumed token.
    pub fn previous(&self) -> Option<&Token> {
        self.index.checked_sub(1).and_then(|i| self.tokens.get(i))
    }

    pub fn has_next(&self) -> bool {
        self.index < self.tokens.len()
    }

    pub fn position(&self) -> usize {
        self.index
    }

    pub fn restore(&mut self, position: usize) {
        self.index = position;
    }

    /// Consume the next token if it has the given kind.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.index += 1;
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind, what: &str) -> ParseResult<Token> {
        match self.peek() {
            Some(token) if token.kind == kind => Ok(self.next().unwrap()),
            Some(token) => Err(ParseError::at(
                format!("expected {what}, found {}", token.describe()),
                token.span,
            )),
            None => Err(ParseError::new(format!(
                "expected {what}, found end of input"
            ))),
        }
    }

    pub fn error_here(&self, msg: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(token) => ParseError::at(msg, token.span),
            None => ParseError::new(msg),
        }
    }

    /// Whether the upcoming token may continue an expression whose
    /// enclosing block indent is `indent`: either it sits on the same
    /// line as the last consumed token, or it is indented past the block.
    pub fn continues(&self, indent: usize) -> bool {
        let Some(token) = self.peek() else {
            return false;
        };
        match self.previous() {
            Some(prev) if prev.span.end.0 == token.span.line() => true,
            _ => token.span.column() > indent,
        }
    }
}
