//! # Simulated Editor Host
//!
//! Deterministic in-memory implementations of every host seam.
//!
//! ## Philosophy
//!
//! **Determinism enables thorough testing.**
//!
//! Nothing here runs on its own: time advances only when told to, anchors
//! move only when text is replaced, and the evaluator steps only when asked.
//!
//! ## Components
//!
//! - [`MemoryAnchorStore`]: anchored ranges over a plain string
//! - [`ManualScheduler`]: a task queue driven by explicit time advances
//! - [`RecordingSurface`]: keeps the last published markers and decorations
//! - [`TokenWalker`]: an evaluator that visits tokens in source order

pub mod anchors;
pub mod evaluator;
pub mod scheduler;
pub mod surface;

pub use anchors::MemoryAnchorStore;
pub use evaluator::TokenWalker;
pub use scheduler::ManualScheduler;
pub use surface::RecordingSurface;
