//! Token types produced by the tokenizer adapter

use crate::position::{Position, Range};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Numeric literal
    Number,
    /// String literal
    String,
    /// `true` / `false`
    Boolean,
    /// A name that is looked up: functions, variables, operators
    Reference,
    /// Variable assignment, `name!`
    Assignment,
    /// Type symbol, `:Name`
    Symbol,
    /// Return separator inside a parameter list, `->`
    Arrow,
    /// Reserved word (`fn`, `datadef`, `debugger`)
    Keyword,
    /// `(` opens a parameter list
    OpenParen,
    /// `)` closes a parameter list
    CloseParen,
    /// `[` opens an array
    OpenBracket,
    /// `]` closes an array
    CloseBracket,
    /// `{` opens an executable array
    OpenBrace,
    /// `}` closes an executable array
    CloseBrace,
    /// Text the lexer could not classify (e.g. an unterminated string)
    Invalid,
}

impl TokenKind {
    /// Returns true for `(`, `[` and `{`
    pub fn is_opening_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::OpenParen | TokenKind::OpenBracket | TokenKind::OpenBrace
        )
    }

    /// Returns true for `)`, `]` and `}`
    pub fn is_closing_bracket(self) -> bool {
        matches!(
            self,
            TokenKind::CloseParen | TokenKind::CloseBracket | TokenKind::CloseBrace
        )
    }

    /// Returns the closing kind paired with an opening kind
    pub fn closing_pair(self) -> Option<TokenKind> {
        match self {
            TokenKind::OpenParen => Some(TokenKind::CloseParen),
            TokenKind::OpenBracket => Some(TokenKind::CloseBracket),
            TokenKind::OpenBrace => Some(TokenKind::CloseBrace),
            _ => None,
        }
    }

    /// Returns the opening kind paired with a closing kind
    pub fn opening_pair(self) -> Option<TokenKind> {
        match self {
            TokenKind::CloseParen => Some(TokenKind::OpenParen),
            TokenKind::CloseBracket => Some(TokenKind::OpenBracket),
            TokenKind::CloseBrace => Some(TokenKind::OpenBrace),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::String => "string",
            TokenKind::Boolean => "boolean",
            TokenKind::Reference => "reference",
            TokenKind::Assignment => "assignment",
            TokenKind::Symbol => "symbol",
            TokenKind::Arrow => "arrow",
            TokenKind::Keyword => "keyword",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::Invalid => "invalid",
        };
        write!(f, "{}", name)
    }
}

/// A lexical unit with its source position
///
/// Tokens never span lines: `col` is the start column and `end_col` the
/// exclusive end column on `line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
    pub end_col: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        text: impl Into<String>,
        line: usize,
        col: usize,
        end_col: usize,
    ) -> Self {
        Self {
            kind,
            text: text.into(),
            line,
            col,
            end_col,
        }
    }

    /// Position of the first character
    pub fn start(&self) -> Position {
        Position::new(self.line, self.col)
    }

    /// Position one past the last character
    pub fn end(&self) -> Position {
        Position::new(self.line, self.end_col)
    }

    pub fn range(&self) -> Range {
        Range::new(self.start(), self.end())
    }

    /// Returns true if `position` falls inside `[col, end_col)` on this line
    pub fn covers(&self, position: Position) -> bool {
        position.line == self.line && position.col >= self.col && position.col < self.end_col
    }

    /// Name introduced by an assignment token (`i!` => `i`)
    pub fn assigned_name(&self) -> Option<&str> {
        if self.kind == TokenKind::Assignment {
            self.text.strip_suffix('!')
        } else {
            None
        }
    }
}
