//! Pattern parsers.
//!
//! `pattern` handles the full grammar including `::` (right associative)
//! and `as`; `pattern_atom` is the restricted form used for function
//! parameters, where composite patterns must be parenthesized.

use crate::ast::pattern::Pattern;
use crate::lexer::TokenKind;
use crate::parser::{ParseError, ParseResult, ParseState};

pub(crate) fn pattern(state: &mut ParseState) -> ParseResult<Pattern> {
    let first = cons_pattern(state)?;
    if state.eat(TokenKind::As) {
        let name = state.expect(TokenKind::LowerName, "a name after 'as'")?.text;
        Ok(Pattern::As(Box::new(first), name))
    } else {
        Ok(first)
    }
}

fn cons_pattern(state: &mut ParseState) -> ParseResult<Pattern> {
    let head = constructor_pattern(state)?;
    if state.peek().map_or(false, |t| {
        t.kind == TokenKind::Operator && t.text == "::"
    }) {
        state.next();
        let tail = cons_pattern(state)?;
        Ok(Pattern::Cons(Box::new(head), Box::new(tail)))
    } else {
        Ok(head)
    }
}

fn constructor_pattern(state: &mut ParseState) -> ParseResult<Pattern> {
    match state.peek_kind() {
        Some(TokenKind::UpperName) | Some(TokenKind::QualifiedUpper) => {
            let token = state.next().unwrap();
            let (module, name) = split_qualifier(&token.text);
            let mut args = Vec::new();
            // Arguments stay on the constructor's line; a pattern at the
            // start of the next line belongs to the next case branch.
            while starts_pattern_atom(state) && same_line(state) {
                args.push(pattern_atom(state)?);
            }
            Ok(Pattern::Constructor { module, name, args })
        }
        _ => pattern_atom(state),
    }
}

fn same_line(state: &ParseState) -> bool {
    match (state.previous(), state.peek()) {
        (Some(prev), Some(next)) => prev.span.end.0 == next.span.line(),
        _ => false,
    }
}

fn split_qualifier(text: &str) -> (String, String) {
    match text.rsplit_once('.') {
        Some((module, name)) => (module.to_string(), name.to_string()),
        None => (String::new(), text.to_string()),
    }
}

pub(crate) fn starts_pattern_atom(state: &ParseState) -> bool {
    matches!(
        state.peek_kind(),
        Some(
            TokenKind::Underscore
                | TokenKind::LowerName
                | TokenKind::UpperName
                | TokenKind::QualifiedUpper
                | TokenKind::Int
                | TokenKind::Hex
                | TokenKind::Float
                | TokenKind::Char
                | TokenKind::Str
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
        )
    )
}

pub(crate) fn pattern_atom(state: &mut ParseState) -> ParseResult<Pattern> {
    if !state.has_next() {
        return Err(ParseError::new("expected a pattern, found end of input"));
    }
    let token = state.next().unwrap();

    match token.kind {
        TokenKind::Underscore => Ok(Pattern::Anything),
        TokenKind::LowerName => Ok(Pattern::Var(token.text)),
        TokenKind::UpperName | TokenKind::QualifiedUpper => {
            let (module, name) = split_qualifier(&token.text);
            Ok(Pattern::Constructor {
                module,
                name,
                args: Vec::new(),
            })
        }
        TokenKind::Int => token
            .text
            .parse()
            .map(Pattern::Integer)
            .map_err(|_| ParseError::at("integer literal out of range", token.span)),
        TokenKind::Hex => i64::from_str_radix(&token.text, 16)
            .map(Pattern::Hex)
            .map_err(|_| ParseError::at("hex literal out of range", token.span)),
        TokenKind::Float => token
            .text
            .parse()
            .map(Pattern::Float)
            .map_err(|_| ParseError::at("malformed float literal", token.span)),
        TokenKind::Char => Ok(Pattern::Char(token.text.chars().next().unwrap_or('\0'))),
        TokenKind::Str => Ok(Pattern::String(token.text)),
        TokenKind::LParen => paren_pattern(state),
        TokenKind::LBracket => list_pattern(state),
        TokenKind::LBrace => record_pattern(state),
        _ => Err(ParseError::at(
            format!("expected a pattern, found {}", token.describe()),
            token.span,
        )),
    }
}

fn paren_pattern(state: &mut ParseState) -> ParseResult<Pattern> {
    if state.eat(TokenKind::RParen) {
        return Ok(Pattern::Unit);
    }
    let mut items = vec![pattern(state)?];
    while state.eat(TokenKind::Comma) {
        items.push(pattern(state)?);
    }
    state.expect(TokenKind::RParen, "')'")?;
    if items.len() == 1 {
        Ok(Pattern::Parenthesized(Box::new(items.pop().unwrap())))
    } else {
        Ok(Pattern::Tuple(items))
    }
}

fn list_pattern(state: &mut ParseState) -> ParseResult<Pattern> {
    if state.eat(TokenKind::RBracket) {
        return Ok(Pattern::List(Vec::new()));
    }
    let mut items = vec![pattern(state)?];
    while state.eat(TokenKind::Comma) {
        items.push(pattern(state)?);
    }
    state.expect(TokenKind::RBracket, "']'")?;
    Ok(Pattern::List(items))
}

fn record_pattern(state: &mut ParseState) -> ParseResult<Pattern> {
    if state.eat(TokenKind::RBrace) {
        return Ok(Pattern::Record(Vec::new()));
    }
    let mut fields = vec![state.expect(TokenKind::LowerName, "a field name")?.text];
    while state.eat(TokenKind::Comma) {
        fields.push(state.expect(TokenKind::LowerName, "a field name")?.text);
    }
    state.expect(TokenKind::RBrace, "'}'")?;
    Ok(Pattern::Record(fields))
}
