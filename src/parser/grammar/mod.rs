//! Grammar rules, organized by category:
//!
//! - this module: module headers, imports, top-level declarations
//! - [`expression`]: expression forms and operator precedence
//! - [`pattern`]: pattern forms
//!
//! Top-level declarations start at column 1; everything indented deeper
//! belongs to the declaration above it. Type annotations and type
//! declarations are recognized and skipped.

mod expression;
mod pattern;

use expression::expression;
use pattern::pattern_atom;

use crate::ast::{Declaration, Module};
use crate::lexer::{Token, TokenKind};

use super::{ParseResult, ParseState};

/// Parse a complete module from a token stream.
pub fn parse_module(tokens: Vec<Token>) -> ParseResult<Module> {
    let mut state = ParseState::new(tokens);
    let module = module(&mut state)?;
    if let Some(extra) = state.peek() {
        return Err(state.error_here(format!("unexpected {}", extra.describe())));
    }
    Ok(module)
}

fn module(state: &mut ParseState) -> ParseResult<Module> {
    state.expect(TokenKind::Module, "'module'")?;
    let name = module_name(state)?;
    state.expect(TokenKind::Exposing, "'exposing'")?;
    skip_balanced_parens(state)?;

    let mut imports = Vec::new();
    while state.eat(TokenKind::Import) {
        imports.push(module_name(state)?);
        if state.eat(TokenKind::As) {
            module_name(state)?;
        }
        if state.eat(TokenKind::Exposing) {
            skip_balanced_parens(state)?;
        }
    }

    let mut declarations = Vec::new();
    while let Some(token) = state.peek() {
        if token.span.column() != 1 {
            return Err(state.error_here(format!(
                "expected a top-level declaration at column 1, found {}",
                token.describe()
            )));
        }
        match token.kind {
            TokenKind::Type => {
                state.next();
                skip_declaration_body(state);
            }
            TokenKind::LowerName => {
                // A name directly followed by `:` is a type annotation.
                if state.peek_at(1).map(|t| t.kind) == Some(TokenKind::Colon) {
                    state.next();
                    state.next();
                    skip_declaration_body(state);
                } else {
                    declarations.push(declaration(state)?);
                }
            }
            _ => {
                return Err(state.error_here(format!(
                    "expected a declaration, found {}",
                    token.describe()
                )))
            }
        }
    }

    Ok(Module {
        name,
        imports,
        declarations,
    })
}

fn module_name(state: &mut ParseState) -> ParseResult<String> {
    match state.peek_kind() {
        Some(TokenKind::UpperName) | Some(TokenKind::QualifiedUpper) => {
            Ok(state.next().unwrap().text)
        }
        _ => Err(state.error_here("expected a module name")),
    }
}

/// Consume `( ... )` without interpreting the contents; exposing lists
/// nest parens only for `(..)` constructor listings.
fn skip_balanced_parens(state: &mut ParseState) -> ParseResult<()> {
    state.expect(TokenKind::LParen, "'('")?;
    let mut depth = 1usize;
    while depth > 0 {
        match state.next() {
            Some(token) => match token.kind {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => depth -= 1,
                _ => {}
            },
            None => return Err(state.error_here("unclosed '(' in exposing list")),
        }
    }
    Ok(())
}

/// Skip everything indented past column 1 (the remainder of a type
/// declaration or annotation).
fn skip_declaration_body(state: &mut ParseState) {
    while let Some(token) = state.peek() {
        if token.span.column() > 1 {
            state.next();
        } else {
            break;
        }
    }
}

fn declaration(state: &mut ParseState) -> ParseResult<Declaration> {
    let name = state.expect(TokenKind::LowerName, "a declaration name")?.text;
    let mut params = Vec::new();
    while state.peek_kind() != Some(TokenKind::Equals) && pattern::starts_pattern_atom(state) {
        params.push(pattern_atom(state)?);
    }
    state.expect(TokenKind::Equals, "'='")?;
    let body = expression(state, 1)?;
    Ok(Declaration { name, params, body })
}
