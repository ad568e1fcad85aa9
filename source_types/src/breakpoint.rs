//! Breakpoint records

use crate::ids::AnchorId;
use crate::position::Position;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a breakpoint does when execution reaches it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakpointKind {
    /// Always pause
    Unconditional,
    /// Pause when the expression evaluates truthy
    Expression,
    /// Pause once the hit count reaches the expression value
    HitCount,
    /// Log the expression instead of pausing
    Log,
}

impl BreakpointKind {
    /// Returns true if this kind carries an expression
    pub fn needs_expression(self) -> bool {
        !matches!(self, BreakpointKind::Unconditional)
    }
}

impl fmt::Display for BreakpointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakpointKind::Unconditional => write!(f, "unconditional"),
            BreakpointKind::Expression => write!(f, "expression"),
            BreakpointKind::HitCount => write!(f, "hit count"),
            BreakpointKind::Log => write!(f, "log"),
        }
    }
}

/// A debugging breakpoint
///
/// `position` is derived from the anchor: after edits the host's anchor is
/// the ground truth and `position` is refreshed from it during reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub anchor_id: AnchorId,
    pub position: Position,
    pub kind: BreakpointKind,
    pub expression: Option<String>,
}

impl Breakpoint {
    pub fn unconditional(anchor_id: AnchorId, position: Position) -> Self {
        Self {
            anchor_id,
            position,
            kind: BreakpointKind::Unconditional,
            expression: None,
        }
    }
}
