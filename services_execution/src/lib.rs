//! # Execution Controller Service
//!
//! Drives an external stepping evaluator through run, pause, step and stop.
//!
//! ## Philosophy
//!
//! - **One step in flight**: At most one step is ever scheduled; a disabled
//!   command is a no-op, never a race.
//! - **Explicit scheduling**: Steps are dispatched through a host-provided
//!   [`StepScheduler`]; nothing runs on a hidden thread or busy loop.
//! - **Evaluator owns semantics**: Breakpoint hits and completion are reported
//!   by the [`Evaluator`]; the controller only reacts.
//! - **Cancellation is not failure**: Stopping a run is reported as
//!   [`RunOutcome::Cancelled`], distinct from an evaluator error.
//!
//! ## Example
//!
//! ```ignore
//! let mut controller = ExecutionController::new(evaluator, scheduler, ControllerOptions::default());
//! controller.run(source, &breakpoints);
//! // host fires the scheduled task
//! controller.on_task_due(task_id);
//! for event in controller.take_events() { /* update view */ }
//! ```

pub mod controller;
pub mod evaluator;
pub mod scheduler;

pub use controller::{ControllerEvent, ControllerOptions, ExecutionController, RunOutcome};
pub use evaluator::{CancellationToken, EvalError, Evaluator, StepResult};
pub use scheduler::StepScheduler;
