//! Lexer for Larch source text.
//!
//! The surface syntax is layout-sensitive, so every token carries a
//! `(line, column)` span (1-based) that the parser consults when deciding
//! whether a token continues the current expression or begins a new case
//! branch / declaration. A `.` between identifiers is resolved here, where
//! adjacency is still visible: `List.map` is one qualified name,
//! `point.x` is an identifier followed by a field access, and a bare
//! `.x` is an accessor function.

use std::fmt;

use thiserror::Error;

/// Source region of a token, `(line, column)` to `(line, column)`, 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: (usize, usize),
    pub end: (usize, usize),
}

impl Span {
    pub fn line(&self) -> usize {
        self.start.0
    }

    pub fn column(&self) -> usize {
        self.start.1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Unqualified lowercase identifier: `foo`
    LowerName,
    /// Unqualified uppercase identifier: `Foo`
    UpperName,
    /// Dotted path ending in a lowercase segment: `List.map`
    QualifiedLower,
    /// Dotted path ending in an uppercase segment: `Maybe.Just`, `Larch.Kernel.List`
    QualifiedUpper,
    /// `.field` directly attached to the preceding value expression
    Field,
    /// Free-standing `.field` accessor function
    Accessor,
    Int,
    Hex,
    Float,
    Char,
    Str,
    /// `_` or `_name`
    Underscore,
    // Keywords
    Module,
    Exposing,
    Import,
    Type,
    Alias,
    Let,
    In,
    Case,
    Of,
    If,
    Then,
    Else,
    As,
    /// Binary operator symbol; the text carries which one
    Operator,
    /// Declaration-level `=`
    Equals,
    Arrow,
    Backslash,
    Comma,
    Pipe,
    Colon,
    DotDot,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    /// Returns a human-readable description of the token
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::LowerName | TokenKind::QualifiedLower => {
                format!("identifier '{}'", self.text)
            }
            TokenKind::UpperName | TokenKind::QualifiedUpper => format!("name '{}'", self.text),
            TokenKind::Field => format!("field access '.{}'", self.text),
            TokenKind::Accessor => format!("accessor '.{}'", self.text),
            TokenKind::Int | TokenKind::Hex => format!("integer '{}'", self.text),
            TokenKind::Float => format!("float '{}'", self.text),
            TokenKind::Char => format!("character '{}'", self.text),
            TokenKind::Str => "string literal".to_string(),
            TokenKind::Operator => format!("operator '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lexing failed at {line}:{column}: {message}")]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

/// Lex a whole source text into a token stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    while let Some(token) = lexer.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.current()?;
        self.position += 1;
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn here(&self) -> (usize, usize) {
        (self.line, self.column)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            line: self.line,
            column: self.column,
        }
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.current() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('-') if self.peek() == Some('-') => {
                    while let Some(c) = self.current() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                Some('{') if self.peek() == Some('-') => {
                    self.skip_block_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        self.bump();
        self.bump();
        let mut depth = 1usize;
        while depth > 0 {
            match (self.current(), self.peek()) {
                (Some('{'), Some('-')) => {
                    self.bump();
                    self.bump();
                    depth += 1;
                }
                (Some('-'), Some('}')) => {
                    self.bump();
                    self.bump();
                    depth -= 1;
                }
                (Some(_), _) => {
                    self.bump();
                }
                (None, _) => return Err(self.error("unterminated block comment")),
            }
        }
        Ok(())
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_trivia()?;

        let Some(ch) = self.current() else {
            return Ok(None);
        };

        match ch {
            'a'..='z' | 'A'..='Z' => Ok(Some(self.read_name())),
            '0'..='9' => Ok(Some(self.read_number()?)),
            '_' => Ok(Some(self.read_underscore())),
            '"' => Ok(Some(self.read_string()?)),
            '\'' => Ok(Some(self.read_char()?)),
            '.' => self.read_dot().map(Some),
            _ => Ok(Some(self.read_symbol()?)),
        }
    }

    fn read_ident_segment(&mut self) -> String {
        let start = self.position;
        while let Some(c) = self.current() {
            if c.is_alphanumeric() || c == '_' {
                self.bump();
            } else {
                break;
            }
        }
        self.input[start..self.position].iter().collect()
    }

    fn read_name(&mut self) -> Token {
        let start = self.here();
        let first = self.read_ident_segment();
        let mut segments = vec![first];

        // An uppercase segment directly followed by `.letter` extends a
        // qualified path: `List.map`, `Larch.Kernel.Basics.add`.
        while segments.last().unwrap().starts_with(char::is_uppercase)
            && self.current() == Some('.')
            && self.peek().map_or(false, |c| c.is_alphabetic())
        {
            self.bump();
            segments.push(self.read_ident_segment());
        }

        let end = self.here();
        let span = Span { start, end };
        let text = segments.join(".");

        if segments.len() == 1 {
            let kind = match text.as_str() {
                "module" => TokenKind::Module,
                "exposing" => TokenKind::Exposing,
                "import" => TokenKind::Import,
                "type" => TokenKind::Type,
                "alias" => TokenKind::Alias,
                "let" => TokenKind::Let,
                "in" => TokenKind::In,
                "case" => TokenKind::Case,
                "of" => TokenKind::Of,
                "if" => TokenKind::If,
                "then" => TokenKind::Then,
                "else" => TokenKind::Else,
                "as" => TokenKind::As,
                _ if text.starts_with(char::is_uppercase) => TokenKind::UpperName,
                _ => TokenKind::LowerName,
            };
            Token { kind, text, span }
        } else if segments.last().unwrap().starts_with(char::is_uppercase) {
            Token {
                kind: TokenKind::QualifiedUpper,
                text,
                span,
            }
        } else {
            Token {
                kind: TokenKind::QualifiedLower,
                text,
                span,
            }
        }
    }

    fn read_underscore(&mut self) -> Token {
        let start = self.here();
        self.bump();
        let rest = self.read_ident_segment();
        let end = self.here();
        Token {
            kind: TokenKind::Underscore,
            text: format!("_{rest}"),
            span: Span { start, end },
        }
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.here();

        if self.current() == Some('0') && matches!(self.peek(), Some('x') | Some('X')) {
            self.bump();
            self.bump();
            let digits_start = self.position;
            while self.current().map_or(false, |c| c.is_ascii_hexdigit()) {
                self.bump();
            }
            if self.position == digits_start {
                return Err(self.error("expected hex digits after 0x"));
            }
            let text: String = self.input[digits_start..self.position].iter().collect();
            return Ok(Token {
                kind: TokenKind::Hex,
                text,
                span: Span {
                    start,
                    end: self.here(),
                },
            });
        }

        let int_start = self.position;
        while self.current().map_or(false, |c| c.is_ascii_digit()) {
            self.bump();
        }

        let mut is_float = false;
        if self.current() == Some('.') && self.peek().map_or(false, |c| c.is_ascii_digit()) {
            is_float = true;
            self.bump();
            while self.current().map_or(false, |c| c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.current(), Some('e') | Some('E')) {
            let mut offset = 1;
            if matches!(self.peek(), Some('+') | Some('-')) {
                offset = 2;
            }
            if self.peek_at(offset).map_or(false, |c| c.is_ascii_digit()) {
                is_float = true;
                for _ in 0..offset {
                    self.bump();
                }
                while self.current().map_or(false, |c| c.is_ascii_digit()) {
                    self.bump();
                }
            }
        }

        let text: String = self.input[int_start..self.position].iter().collect();
        Ok(Token {
            kind: if is_float {
                TokenKind::Float
            } else {
                TokenKind::Int
            },
            text,
            span: Span {
                start,
                end: self.here(),
            },
        })
    }

    fn read_escape(&mut self) -> Result<char, LexError> {
        self.bump();
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('t') => Ok('\t'),
            Some('r') => Ok('\r'),
            Some('\\') => Ok('\\'),
            Some('\'') => Ok('\''),
            Some('"') => Ok('"'),
            Some('0') => Ok('\0'),
            Some('u') => {
                if self.bump() != Some('{') {
                    return Err(self.error("expected '{' after \\u"));
                }
                let mut code = String::new();
                loop {
                    match self.bump() {
                        Some('}') => break,
                        Some(c) if c.is_ascii_hexdigit() => code.push(c),
                        _ => return Err(self.error("invalid unicode escape")),
                    }
                }
                u32::from_str_radix(&code, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error("invalid unicode scalar"))
            }
            _ => Err(self.error("unknown escape sequence")),
        }
    }

    fn read_string(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        self.bump();
        let mut text = String::new();
        loop {
            match self.current() {
                Some('"') => {
                    self.bump();
                    break;
                }
                Some('\\') => text.push(self.read_escape()?),
                Some(c) => {
                    text.push(c);
                    self.bump();
                }
                None => return Err(self.error("unterminated string literal")),
            }
        }
        Ok(Token {
            kind: TokenKind::Str,
            text,
            span: Span {
                start,
                end: self.here(),
            },
        })
    }

    fn read_char(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        self.bump();
        let ch = match self.current() {
            Some('\\') => self.read_escape()?,
            Some(c) => {
                self.bump();
                c
            }
            None => return Err(self.error("unterminated character literal")),
        };
        if self.bump() != Some('\'') {
            return Err(self.error("expected closing ' in character literal"));
        }
        Ok(Token {
            kind: TokenKind::Char,
            text: ch.to_string(),
            span: Span {
                start,
                end: self.here(),
            },
        })
    }

    fn read_dot(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        if self.peek() == Some('.') {
            self.bump();
            self.bump();
            return Ok(Token {
                kind: TokenKind::DotDot,
                text: "..".to_string(),
                span: Span {
                    start,
                    end: self.here(),
                },
            });
        }

        if self.peek().map_or(false, |c| c.is_lowercase()) {
            // `value.field` when the dot hugs the preceding expression,
            // otherwise a free-standing `.field` accessor function.
            let attached = self
                .position
                .checked_sub(1)
                .and_then(|i| self.input.get(i))
                .map_or(false, |c| {
                    c.is_alphanumeric() || matches!(c, ')' | ']' | '}' | '_')
                });
            self.bump();
            let field = self.read_ident_segment();
            return Ok(Token {
                kind: if attached {
                    TokenKind::Field
                } else {
                    TokenKind::Accessor
                },
                text: field,
                span: Span {
                    start,
                    end: self.here(),
                },
            });
        }

        Err(self.error("unexpected '.'"))
    }

    fn read_symbol(&mut self) -> Result<Token, LexError> {
        let start = self.here();
        let ch = self.current().unwrap();
        let next = self.peek();

        let make = |lexer: &mut Lexer, kind: TokenKind, len: usize| {
            let text: String = lexer.input[lexer.position..lexer.position + len]
                .iter()
                .collect();
            for _ in 0..len {
                lexer.bump();
            }
            Token {
                kind,
                text,
                span: Span {
                    start,
                    end: lexer.here(),
                },
            }
        };

        let token = match (ch, next) {
            ('-', Some('>')) => make(self, TokenKind::Arrow, 2),
            ('+', Some('+')) => make(self, TokenKind::Operator, 2),
            ('|', Some('|')) => make(self, TokenKind::Operator, 2),
            ('|', Some('>')) => make(self, TokenKind::Operator, 2),
            ('&', Some('&')) => make(self, TokenKind::Operator, 2),
            ('=', Some('=')) => make(self, TokenKind::Operator, 2),
            ('/', Some('=')) => make(self, TokenKind::Operator, 2),
            ('/', Some('/')) => make(self, TokenKind::Operator, 2),
            ('<', Some('=')) => make(self, TokenKind::Operator, 2),
            ('<', Some('|')) => make(self, TokenKind::Operator, 2),
            ('<', Some('<')) => make(self, TokenKind::Operator, 2),
            ('>', Some('=')) => make(self, TokenKind::Operator, 2),
            ('>', Some('>')) => make(self, TokenKind::Operator, 2),
            (':', Some(':')) => make(self, TokenKind::Operator, 2),
            ('+', _) | ('-', _) | ('*', _) | ('/', _) | ('^', _) | ('<', _) | ('>', _) => {
                make(self, TokenKind::Operator, 1)
            }
            ('=', _) => make(self, TokenKind::Equals, 1),
            ('\\', _) => make(self, TokenKind::Backslash, 1),
            (',', _) => make(self, TokenKind::Comma, 1),
            ('|', _) => make(self, TokenKind::Pipe, 1),
            (':', _) => make(self, TokenKind::Colon, 1),
            ('(', _) => make(self, TokenKind::LParen, 1),
            (')', _) => make(self, TokenKind::RParen, 1),
            ('[', _) => make(self, TokenKind::LBracket, 1),
            (']', _) => make(self, TokenKind::RBracket, 1),
            ('{', _) => make(self, TokenKind::LBrace, 1),
            ('}', _) => make(self, TokenKind::RBrace, 1),
            _ => return Err(self.error(format!("unexpected character '{ch}'"))),
        };
        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn qualified_name_is_one_token() {
        let tokens = tokenize("List.map").unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::QualifiedLower);
        assert_eq!(tokens[0].text, "List.map");
    }

    #[test]
    fn record_access_splits_into_field() {
        let tokens = tokenize("point.x").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::LowerName);
        assert_eq!(tokens[1].kind, TokenKind::Field);
        assert_eq!(tokens[1].text, "x");
    }

    #[test]
    fn bare_accessor_function() {
        let tokens = tokenize(".x").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Accessor);
    }

    #[test]
    fn access_after_closing_brace() {
        let tokens = tokenize("{ a = 1 }.a").unwrap();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Field);
    }

    #[test]
    fn comments_are_trivia() {
        let tokens = tokenize("1 -- line\n{- block {- nested -} -} 2").unwrap();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "1");
        assert_eq!(tokens[1].text, "2");
    }

    #[test]
    fn operator_longest_match() {
        assert_eq!(
            kinds("a // b"),
            vec![TokenKind::LowerName, TokenKind::Operator, TokenKind::LowerName]
        );
        let tokens = tokenize("x :: xs").unwrap();
        assert_eq!(tokens[1].text, "::");
    }

    #[test]
    fn spans_are_one_based() {
        let tokens = tokenize("a\n  b").unwrap();
        assert_eq!(tokens[0].span.start, (1, 1));
        assert_eq!(tokens[1].span.start, (2, 3));
    }

    #[test]
    fn literals() {
        let tokens = tokenize(r#"42 0x2A 3.14 'c' "hi\n""#).unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int,
                TokenKind::Hex,
                TokenKind::Float,
                TokenKind::Char,
                TokenKind::Str
            ]
        );
        assert_eq!(tokens[4].text, "hi\n");
    }
}
