//! # Breakpoint Tracker Service
//!
//! Owns the breakpoint list and keeps it consistent with edited source.
//!
//! ## Philosophy
//!
//! - **Anchors are ground truth**: A breakpoint's position is derived from a
//!   host-maintained anchor, which follows the text through edits.
//! - **One breakpoint per token start**: Positions always snap to the start
//!   of a token and are never duplicated.
//! - **Decay is silent**: A breakpoint whose text was deleted is dropped,
//!   never reported as an error.
//! - **Batched notification**: Every structural change republishes the full
//!   list exactly once.
//!
//! ## Design
//!
//! The [`AnchorStore`] trait abstracts the host's anchored-range mechanism so
//! the tracker works over any text-buffer technology.

pub mod anchor;
pub mod tracker;

pub use anchor::AnchorStore;
pub use tracker::{BreakpointEvent, BreakpointTracker, ToggleOutcome};

use source_types::{BreakpointKind, Position};
use thiserror::Error;

/// Breakpoint tracker error
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BreakpointError {
    #[error("No token at line {}, column {}", .0.line + 1, .0.col + 1)]
    NoTokenAtPosition(Position),

    #[error("Host rejected anchor at line {}, column {}", .0.line + 1, .0.col + 1)]
    AnchorRejected(Position),

    #[error("A {0} breakpoint requires an expression")]
    MissingExpression(BreakpointKind),

    #[error("Invalid hit count: {0}")]
    InvalidHitCount(String),
}

/// Breakpoint tracker result
pub type BreakpointResult<T> = Result<T, BreakpointError>;
