//! Execution cursor and controller state

use crate::position::Position;
use crate::token::Token;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The token about to execute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPosition {
    pub line: usize,
    pub col: usize,
    pub token: Token,
}

impl ExecutionPosition {
    pub fn at_token(token: Token) -> Self {
        Self {
            line: token.line,
            col: token.col,
            token,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.line, self.col)
    }
}

/// Execution controller state
///
/// `Stopped` is transient: it is reported once and collapses back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutionState {
    Idle,
    Running,
    Paused,
    Stopped,
}

impl ExecutionState {
    /// Returns true while a run exists (running or paused)
    pub fn is_active(self) -> bool {
        matches!(self, ExecutionState::Running | ExecutionState::Paused)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionState::Idle => write!(f, "Idle"),
            ExecutionState::Running => write!(f, "Running"),
            ExecutionState::Paused => write!(f, "Paused"),
            ExecutionState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn test_execution_position_from_token() {
        let token = Token::new(TokenKind::Reference, "println", 0, 9, 16);
        let pos = ExecutionPosition::at_token(token.clone());
        assert_eq!(pos.position(), Position::new(0, 9));
        assert_eq!(pos.token, token);
    }

    #[test]
    fn test_state_is_active() {
        assert!(!ExecutionState::Idle.is_active());
        assert!(ExecutionState::Running.is_active());
        assert!(ExecutionState::Paused.is_active());
        assert!(!ExecutionState::Stopped.is_active());
    }
}
