//! Host task scheduling seam

use source_types::TaskId;
use std::time::Duration;

/// Minimal-delay task scheduling provided by the host
///
/// The host calls back into the controller with the returned [`TaskId`] when
/// the task fires. Cancellation is synchronous: a cancelled task never fires.
pub trait StepScheduler {
    fn schedule(&mut self, delay: Duration) -> TaskId;

    /// Revokes a pending task; returns whether it was still pending
    fn cancel(&mut self, task: TaskId) -> bool;
}

impl<T: StepScheduler + ?Sized> StepScheduler for Box<T> {
    fn schedule(&mut self, delay: Duration) -> TaskId {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        (**self).cancel(task)
    }
}
