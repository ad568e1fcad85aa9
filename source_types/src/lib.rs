//! # Source Types
//!
//! This crate defines the fundamental types shared by the editor intelligence
//! and execution-control services.
//!
//! ## Philosophy
//!
//! - **Positions are data**: Every token, diagnostic, breakpoint and execution
//!   cursor is addressed by a zero-based `(line, col)` position.
//! - **Derived, never authoritative**: Tokens and diagnostics are regenerated
//!   wholesale on every content revision and never mutated in place.
//! - **Opaque host handles**: Anchors and scheduled tasks are identified by
//!   typed IDs that only the host can interpret.
//!
//! ## Key Types
//!
//! - [`Token`]: A lexical unit with kind, text and position
//! - [`Position`] / [`Range`]: Zero-based source addressing
//! - [`SurfacePosition`] / [`SurfaceRange`]: One-based editor-surface addressing
//! - [`Diagnostic`]: A transient error or warning attached to a range
//! - [`Breakpoint`]: A debugging breakpoint anchored to a token start
//! - [`ExecutionPosition`] / [`ExecutionState`]: Evaluator progress

pub mod breakpoint;
pub mod diagnostic;
pub mod execution;
pub mod ids;
pub mod position;
pub mod token;

pub use breakpoint::{Breakpoint, BreakpointKind};
pub use diagnostic::{Diagnostic, DiagnosticCode, Severity};
pub use execution::{ExecutionPosition, ExecutionState};
pub use ids::{AnchorId, TaskId};
pub use position::{token_at, Position, Range, SurfacePosition, SurfaceRange};
pub use token::{Token, TokenKind};
