//! Stepping evaluator seam
//!
//! The evaluator is a step-at-a-time machine: between `step` calls it holds
//! all of its own state, so pausing never needs to touch it.

use source_types::{Breakpoint, ExecutionPosition, Token};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;

/// Opaque evaluator failure, forwarded verbatim to the view layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct EvalError {
    pub message: String,
}

impl EvalError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of one evaluator step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    /// The program has finished
    pub done: bool,
    /// Token about to execute (or last executed when `done`)
    pub value: Option<ExecutionPosition>,
    /// The evaluator reached a breakpoint and asks for a pause
    pub breakpoint_hit: bool,
}

impl StepResult {
    pub fn at(position: ExecutionPosition) -> Self {
        Self {
            done: false,
            value: Some(position),
            breakpoint_hit: false,
        }
    }

    pub fn finished(value: Option<ExecutionPosition>) -> Self {
        Self {
            done: true,
            value,
            breakpoint_hit: false,
        }
    }

    pub fn hit(position: ExecutionPosition) -> Self {
        Self {
            done: false,
            value: Some(position),
            breakpoint_hit: true,
        }
    }
}

/// Cancellation signal shared with the evaluator for one run
///
/// Tripped by `stop()`; asynchronous work inside a step is expected to
/// observe it.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// External stepping evaluator
pub trait Evaluator {
    fn tokenize(&self, source: &str) -> Vec<Token>;

    /// Drops all state from a previous run
    fn reset(&mut self);

    /// Breakpoints the evaluator should pause at during the next run
    fn set_breakpoints(&mut self, breakpoints: &[Breakpoint]);

    fn start_run(&mut self, tokens: Vec<Token>, cancel: CancellationToken);

    fn step(&mut self) -> Result<StepResult, EvalError>;
}
