//! Position mapping between source and editor-surface coordinates
//!
//! Source positions are zero-based. The host editor surface counts lines and
//! columns from one. Conversions happen only at the publishing boundary.

use crate::token::Token;
use serde::{Deserialize, Serialize};

/// Zero-based source position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }

    /// Largest representable position; used as an open end for truncated spans
    pub const fn max() -> Self {
        Self {
            line: usize::MAX,
            col: usize::MAX,
        }
    }

    /// Converts to one-based surface coordinates
    pub fn to_surface(self) -> SurfacePosition {
        SurfacePosition {
            line_number: self.line + 1,
            column: self.col + 1,
        }
    }
}

/// Half-open source range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Zero-width range at `position`
    pub const fn point(position: Position) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Range covered by a single token
    pub fn of_token(token: &Token) -> Self {
        token.range()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Half-open containment test: `end` is outside
    pub fn contains(&self, position: Position) -> bool {
        self.start <= position && position < self.end
    }

    pub fn to_surface(self) -> SurfaceRange {
        SurfaceRange {
            start: self.start.to_surface(),
            end: self.end.to_surface(),
        }
    }
}

/// One-based position as understood by the host editor surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SurfacePosition {
    pub line_number: usize,
    pub column: usize,
}

impl SurfacePosition {
    pub const fn new(line_number: usize, column: usize) -> Self {
        Self {
            line_number,
            column,
        }
    }

    /// Converts to a zero-based source position
    ///
    /// Returns `None` for a zero line number or column, which the surface
    /// never produces for a real location.
    pub fn to_source(self) -> Option<Position> {
        if self.line_number == 0 || self.column == 0 {
            return None;
        }
        Some(Position::new(self.line_number - 1, self.column - 1))
    }
}

/// One-based range as understood by the host editor surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceRange {
    pub start: SurfacePosition,
    pub end: SurfacePosition,
}

impl SurfaceRange {
    pub fn to_source(self) -> Option<Range> {
        Some(Range::new(self.start.to_source()?, self.end.to_source()?))
    }
}

/// Finds the token whose `[col, end_col)` covers `position`
pub fn token_at(tokens: &[Token], position: Position) -> Option<&Token> {
    tokens.iter().find(|token| token.covers(position))
}
