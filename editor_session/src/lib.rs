//! # Editor Session
//!
//! Composes analysis, breakpoint tracking, execution control and publishing
//! into one editing session.
//!
//! ## Philosophy
//!
//! - **Edits drive everything**: Every content revision is re-tokenized once,
//!   then analysed and reconciled against that same token sequence.
//! - **Explicit events**: The view layer drains [`SessionEvent`]s; there is no
//!   global store to subscribe to.
//! - **Host seams stay generic**: Anchors, scheduling, evaluation and the
//!   editor surface are all supplied by the host.
//!
//! ## Data flow
//!
//! ```text
//! edit ──> tokenize ──> analyze ──> markers
//!                   └─> reconcile ──> breakpoint glyphs
//! command ──> controller ──> evaluator step ──> execution highlight
//! ```

pub mod session;

pub use session::{EditorSession, SessionEvent};

use editor_config::ConfigError;
use services_breakpoints::BreakpointError;
use source_types::SurfacePosition;
use thiserror::Error;

/// Editor session error
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Breakpoint error: {0}")]
    Breakpoint(#[from] BreakpointError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid surface position {}:{}", .0.line_number, .0.column)]
    InvalidSurfacePosition(SurfacePosition),
}

pub type SessionResult<T> = Result<T, SessionError>;
