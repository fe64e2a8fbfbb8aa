//! Expression parsers.
//!
//! `expression` is the entry point: a precedence-climbing loop over infix
//! operators whose operands are either one of the keyword forms (lambda,
//! let, if, case) or an application of atoms. The `indent` argument is the
//! layout threshold described in the parser module docs.

use std::rc::Rc;

use crate::ast::expression::{Expression, LetDeclaration};
use crate::lexer::TokenKind;
use crate::parser::{ParseError, ParseResult, ParseState};

use super::pattern::{self, pattern, pattern_atom};

#[derive(Clone, Copy, PartialEq)]
enum Assoc {
    Left,
    Right,
}

/// Binding strength and associativity of an infix operator symbol.
fn operator_precedence(op: &str) -> (u8, Assoc) {
    match op {
        "<|" => (0, Assoc::Right),
        "|>" => (0, Assoc::Left),
        "||" => (2, Assoc::Right),
        "&&" => (3, Assoc::Right),
        "==" | "/=" | "<" | ">" | "<=" | ">=" => (4, Assoc::Left),
        "++" | "::" => (5, Assoc::Right),
        "+" | "-" => (6, Assoc::Left),
        "*" | "/" | "//" => (7, Assoc::Left),
        "^" => (8, Assoc::Right),
        "<<" => (9, Assoc::Right),
        ">>" => (9, Assoc::Left),
        _ => (4, Assoc::Left),
    }
}

pub(crate) fn expression(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    binary(state, indent, 0)
}

fn binary(state: &mut ParseState, indent: usize, min_prec: u8) -> ParseResult<Expression> {
    let mut left = operand(state, indent)?;
    loop {
        let Some(token) = state.peek() else { break };
        if token.kind != TokenKind::Operator {
            break;
        }
        let op = token.text.clone();
        let (prec, assoc) = operator_precedence(&op);
        if prec < min_prec || !state.continues(indent) {
            break;
        }
        state.next();
        let next_min = if assoc == Assoc::Left { prec + 1 } else { prec };
        let right = binary(state, indent, next_min)?;
        left = Expression::BinaryOp {
            op,
            left: Rc::new(left),
            right: Rc::new(right),
        };
    }
    Ok(left)
}

fn operand(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    match state.peek_kind() {
        Some(TokenKind::Backslash) => lambda(state, indent),
        Some(TokenKind::Let) => let_expression(state, indent),
        Some(TokenKind::If) => if_expression(state, indent),
        Some(TokenKind::Case) => case_expression(state, indent),
        _ => application(state, indent),
    }
}

fn application(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    let first = atom(state, indent)?;
    let mut args = Vec::new();
    while starts_atom(state) && state.continues(indent) {
        args.push(Rc::new(atom(state, indent)?));
    }
    if args.is_empty() {
        Ok(first)
    } else {
        let mut items = vec![Rc::new(first)];
        items.extend(args);
        Ok(Expression::Application(items))
    }
}

fn starts_atom(state: &ParseState) -> bool {
    matches!(
        state.peek_kind(),
        Some(
            TokenKind::LowerName
                | TokenKind::UpperName
                | TokenKind::QualifiedLower
                | TokenKind::QualifiedUpper
                | TokenKind::Int
                | TokenKind::Hex
                | TokenKind::Float
                | TokenKind::Char
                | TokenKind::Str
                | TokenKind::LParen
                | TokenKind::LBracket
                | TokenKind::LBrace
                | TokenKind::Accessor
        )
    )
}

fn atom(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    // `-x` is negation only when the minus hugs its operand; otherwise
    // the operator is left for the infix loop.
    if let (Some(token), Some(next)) = (state.peek(), state.peek_at(1)) {
        if token.kind == TokenKind::Operator
            && token.text == "-"
            && token.span.end == next.span.start
        {
            state.next();
            let inner = atom(state, indent)?;
            return Ok(Expression::Negation(Rc::new(inner)));
        }
    }

    if !state.has_next() {
        return Err(ParseError::new(
            "expected an expression, found end of input",
        ));
    }
    let token = state.next().unwrap();

    let mut expr = match token.kind {
        TokenKind::Int => Expression::Integer(token.text.parse().map_err(|_| {
            ParseError::at("integer literal out of range", token.span)
        })?),
        TokenKind::Hex => {
            Expression::Hex(i64::from_str_radix(&token.text, 16).map_err(|_| {
                ParseError::at("hex literal out of range", token.span)
            })?)
        }
        TokenKind::Float => Expression::Float(token.text.parse().map_err(|_| {
            ParseError::at("malformed float literal", token.span)
        })?),
        TokenKind::Char => Expression::CharLiteral(token.text.chars().next().unwrap_or('\0')),
        TokenKind::Str => Expression::StringLiteral(token.text),
        TokenKind::LowerName | TokenKind::UpperName => Expression::bare(token.text),
        TokenKind::QualifiedLower | TokenKind::QualifiedUpper => {
            let (module, name) = token.text.rsplit_once('.').unwrap();
            Expression::qualified(module, name)
        }
        TokenKind::Accessor => Expression::RecordAccessor(token.text),
        TokenKind::LParen => paren_form(state)?,
        TokenKind::LBracket => list_literal(state)?,
        TokenKind::LBrace => record_form(state)?,
        _ => {
            return Err(ParseError::at(
                format!("expected an expression, found {}", token.describe()),
                token.span,
            ))
        }
    };

    while state.peek_kind() == Some(TokenKind::Field) {
        let field = state.next().unwrap();
        expr = Expression::RecordAccess(Rc::new(expr), field.text);
    }
    Ok(expr)
}

/// Everything that can follow a `(`: unit, an operator section, a
/// parenthesized expression, or a tuple.
fn paren_form(state: &mut ParseState) -> ParseResult<Expression> {
    if state.eat(TokenKind::RParen) {
        return Ok(Expression::Unit);
    }

    if state.peek_kind() == Some(TokenKind::Operator)
        && state.peek_at(1).map(|t| t.kind) == Some(TokenKind::RParen)
    {
        let op = state.next().unwrap().text;
        state.next();
        return Ok(Expression::Operator(op));
    }

    let mut items = vec![Rc::new(expression(state, 0)?)];
    while state.eat(TokenKind::Comma) {
        items.push(Rc::new(expression(state, 0)?));
    }
    state.expect(TokenKind::RParen, "')'")?;

    if items.len() == 1 {
        Ok(Expression::Parenthesized(items.pop().unwrap()))
    } else {
        Ok(Expression::Tuple(items))
    }
}

fn list_literal(state: &mut ParseState) -> ParseResult<Expression> {
    if state.eat(TokenKind::RBracket) {
        return Ok(Expression::List(Vec::new()));
    }
    let mut items = vec![Rc::new(expression(state, 0)?)];
    while state.eat(TokenKind::Comma) {
        items.push(Rc::new(expression(state, 0)?));
    }
    state.expect(TokenKind::RBracket, "']'")?;
    Ok(Expression::List(items))
}

/// `{}`, `{ f = e, ... }`, or `{ base | f = e, ... }`.
fn record_form(state: &mut ParseState) -> ParseResult<Expression> {
    if state.eat(TokenKind::RBrace) {
        return Ok(Expression::Record(Vec::new()));
    }

    if state.peek_kind() == Some(TokenKind::LowerName)
        && state.peek_at(1).map(|t| t.kind) == Some(TokenKind::Pipe)
    {
        let name = state.next().unwrap().text;
        state.next();
        let fields = record_fields(state)?;
        state.expect(TokenKind::RBrace, "'}'")?;
        return Ok(Expression::RecordUpdate { name, fields });
    }

    let fields = record_fields(state)?;
    state.expect(TokenKind::RBrace, "'}'")?;
    Ok(Expression::Record(fields))
}

fn record_fields(state: &mut ParseState) -> ParseResult<Vec<(String, Rc<Expression>)>> {
    let mut fields = Vec::new();
    loop {
        let name = state.expect(TokenKind::LowerName, "a field name")?.text;
        state.expect(TokenKind::Equals, "'='")?;
        fields.push((name, Rc::new(expression(state, 0)?)));
        if !state.eat(TokenKind::Comma) {
            break;
        }
    }
    Ok(fields)
}

fn lambda(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    state.expect(TokenKind::Backslash, "'\\'")?;
    let mut params = Vec::new();
    while state.peek_kind() != Some(TokenKind::Arrow) && pattern::starts_pattern_atom(state) {
        params.push(pattern_atom(state)?);
    }
    if params.is_empty() {
        return Err(state.error_here("a lambda needs at least one parameter"));
    }
    state.expect(TokenKind::Arrow, "'->'")?;
    let body = expression(state, indent)?;
    Ok(Expression::Lambda {
        params: Rc::new(params),
        body: Rc::new(body),
    })
}

fn if_expression(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    state.expect(TokenKind::If, "'if'")?;
    let condition = expression(state, indent)?;
    state.expect(TokenKind::Then, "'then'")?;
    let then_branch = expression(state, indent)?;
    state.expect(TokenKind::Else, "'else'")?;
    let else_branch = expression(state, indent)?;
    Ok(Expression::If {
        condition: Rc::new(condition),
        then_branch: Rc::new(then_branch),
        else_branch: Rc::new(else_branch),
    })
}

fn let_expression(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    state.expect(TokenKind::Let, "'let'")?;
    let mut declarations = Vec::new();
    loop {
        let Some(token) = state.peek() else {
            return Err(state.error_here("unterminated let block"));
        };
        if token.kind == TokenKind::In {
            state.next();
            break;
        }
        let decl_indent = token.span.column();

        // Local type annotations are skipped like top-level ones.
        if token.kind == TokenKind::LowerName
            && state.peek_at(1).map(|t| t.kind) == Some(TokenKind::Colon)
        {
            state.next();
            state.next();
            while let Some(t) = state.peek() {
                if t.kind != TokenKind::In && t.span.column() > decl_indent {
                    state.next();
                } else {
                    break;
                }
            }
            continue;
        }

        declarations.push(let_declaration(state, decl_indent)?);
    }
    if declarations.is_empty() {
        return Err(state.error_here("a let block needs at least one declaration"));
    }
    let body = expression(state, indent)?;
    Ok(Expression::Let {
        declarations,
        body: Rc::new(body),
    })
}

fn let_declaration(state: &mut ParseState, indent: usize) -> ParseResult<LetDeclaration> {
    if state.peek_kind() == Some(TokenKind::LowerName) {
        let name = state.next().unwrap().text;
        let mut params = Vec::new();
        while state.peek_kind() != Some(TokenKind::Equals) && pattern::starts_pattern_atom(state) {
            params.push(pattern_atom(state)?);
        }
        state.expect(TokenKind::Equals, "'='")?;
        let body = expression(state, indent)?;
        Ok(LetDeclaration::Function {
            name,
            params,
            body: Rc::new(body),
        })
    } else {
        let lhs = pattern(state)?;
        state.expect(TokenKind::Equals, "'='")?;
        let body = expression(state, indent)?;
        Ok(LetDeclaration::Destructuring {
            pattern: lhs,
            body: Rc::new(body),
        })
    }
}

fn case_expression(state: &mut ParseState, indent: usize) -> ParseResult<Expression> {
    state.expect(TokenKind::Case, "'case'")?;
    let scrutinee = expression(state, indent)?;
    state.expect(TokenKind::Of, "'of'")?;

    let mut branches = Vec::new();
    loop {
        let Some(token) = state.peek() else { break };
        if token.span.column() <= indent {
            break;
        }
        let branch_indent = token.span.column();
        let saved = state.position();
        match case_branch(state, branch_indent) {
            Ok(branch) => branches.push(branch),
            Err(err) => {
                if branches.is_empty() {
                    return Err(err);
                }
                state.restore(saved);
                break;
            }
        }
    }
    if branches.is_empty() {
        return Err(state.error_here("a case expression needs at least one branch"));
    }
    Ok(Expression::Case {
        scrutinee: Rc::new(scrutinee),
        branches,
    })
}

fn case_branch(
    state: &mut ParseState,
    branch_indent: usize,
) -> ParseResult<(crate::ast::pattern::Pattern, Rc<Expression>)> {
    let pat = pattern(state)?;
    state.expect(TokenKind::Arrow, "'->'")?;
    let body = expression(state, branch_indent)?;
    Ok((pat, Rc::new(body)))
}
