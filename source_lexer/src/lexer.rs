//! `logos`-based reference lexer

use crate::Tokenizer;
use logos::Logos;
use source_types::{Token, TokenKind};

/// Reserved words
pub const KEYWORDS: &[&str] = &["fn", "datadef", "debugger"];

/// Raw lexemes before classification
///
/// Words are split further (keyword, number, assignment, reference) by
/// [`classify_word`] rather than by competing regexes.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
enum RawToken {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("->")]
    Arrow,
    #[regex(r#""([^"\\\n]|\\[^\n])*""#, priority = 4)]
    String,
    #[regex(r#""([^"\\\n]|\\[^\n])*"#, priority = 2)]
    UnterminatedString,
    #[regex(r#":[^\s()\[\]{}"]*"#)]
    Symbol,
    #[regex(r#"[^\s()\[\]{}":#][^\s()\[\]{}"]*"#)]
    Word,
}

fn classify_word(text: &str) -> TokenKind {
    if text == "true" || text == "false" {
        TokenKind::Boolean
    } else if KEYWORDS.contains(&text) {
        TokenKind::Keyword
    } else if looks_numeric(text) {
        TokenKind::Number
    } else if text.len() > 1 && text.ends_with('!') {
        TokenKind::Assignment
    } else {
        TokenKind::Reference
    }
}

fn looks_numeric(text: &str) -> bool {
    let digits = text.strip_prefix(['-', '+']).unwrap_or(text);
    digits.starts_with(|c: char| c.is_ascii_digit()) && text.parse::<f64>().is_ok()
}

/// Reference lexer for the stack language
#[derive(Debug, Clone, Copy, Default)]
pub struct StackLexer;

impl StackLexer {
    pub fn new() -> Self {
        Self
    }

    /// Returns a lazy token iterator over `source`
    pub fn tokens<'s>(&self, source: &'s str) -> TokenIter<'s> {
        TokenIter::new(source)
    }
}

impl Tokenizer for StackLexer {
    fn tokenize(&self, source: &str) -> Vec<Token> {
        self.tokens(source).collect()
    }
}

/// Lazy, restartable token sequence
#[derive(Clone)]
pub struct TokenIter<'s> {
    source: &'s str,
    lexer: logos::Lexer<'s, RawToken>,
    cursor: Cursor,
}

/// Byte offset already located, with its zero-based line and char column
#[derive(Debug, Clone, Copy, Default)]
struct Cursor {
    offset: usize,
    line: usize,
    col: usize,
}

impl<'s> TokenIter<'s> {
    fn new(source: &'s str) -> Self {
        Self {
            source,
            lexer: RawToken::lexer(source),
            cursor: Cursor::default(),
        }
    }

    /// Returns a fresh iterator positioned at the start of the same source
    pub fn restart(&self) -> TokenIter<'s> {
        Self::new(self.source)
    }

    /// Converts a byte offset into a zero-based `(line, char column)`
    ///
    /// Offsets must not decrease between calls; only the text since the
    /// previous offset is scanned.
    fn locate(&mut self, offset: usize) -> (usize, usize) {
        for ch in self.source[self.cursor.offset..offset].chars() {
            if ch == '\n' {
                self.cursor.line += 1;
                self.cursor.col = 0;
            } else {
                self.cursor.col += 1;
            }
        }
        self.cursor.offset = offset;
        (self.cursor.line, self.cursor.col)
    }
}

impl Iterator for TokenIter<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let raw = self.lexer.next()?;
        let span = self.lexer.span();
        let text = self.lexer.slice();
        let kind = match raw {
            Ok(RawToken::OpenParen) => TokenKind::OpenParen,
            Ok(RawToken::CloseParen) => TokenKind::CloseParen,
            Ok(RawToken::OpenBracket) => TokenKind::OpenBracket,
            Ok(RawToken::CloseBracket) => TokenKind::CloseBracket,
            Ok(RawToken::OpenBrace) => TokenKind::OpenBrace,
            Ok(RawToken::CloseBrace) => TokenKind::CloseBrace,
            Ok(RawToken::Arrow) => TokenKind::Arrow,
            Ok(RawToken::String) => TokenKind::String,
            Ok(RawToken::Symbol) => TokenKind::Symbol,
            Ok(RawToken::Word) => classify_word(text),
            Ok(RawToken::UnterminatedString) | Err(()) => TokenKind::Invalid,
        };
        let (line, col) = self.locate(span.start);
        let end_col = col + text.chars().count();
        Some(Token::new(kind, text, line, col, end_col))
    }
}
