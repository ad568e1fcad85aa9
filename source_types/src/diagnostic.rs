//! Diagnostics produced by static source analysis

use crate::position::Range;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Advisory; likely but not certainly a problem
    Warning,
    /// Definitely malformed source
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Machine-readable category of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    /// A closing bracket with no (or the wrong) opener
    UnmatchedClosing,
    /// An opening bracket that is never closed
    UnmatchedOpening,
    /// A parameter segment token that is neither a name nor a type
    InvalidParameter,
    /// A type symbol not directly following a parameter name
    MisplacedType,
    /// A malformed type symbol
    InvalidSymbol,
    /// A well-formed type symbol naming no known type
    UnknownType,
    /// A parameter named like a built-in function
    ShadowedBuiltin,
    /// A returns segment token that is not a type symbol
    InvalidReturn,
    /// A reference that no definition accounts for
    UnresolvedReference,
}

/// A transient annotation attached to a source range
///
/// Fully recomputed on every analysis pass; never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: DiagnosticCode,
    pub message: String,
    pub range: Range,
}

impl Diagnostic {
    pub fn error(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            range,
        }
    }

    pub fn warning(code: DiagnosticCode, message: impl Into<String>, range: Range) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            range,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}:{}: {}",
            self.severity,
            self.range.start.line + 1,
            self.range.start.col + 1,
            self.message
        )
    }
}
