//! Manually advanced task queue

use services_execution::StepScheduler;
use source_types::TaskId;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Scheduled {
    task: TaskId,
    due_ms: u64,
    seq: u64,
}

/// [`StepScheduler`] whose clock only moves when told to
///
/// Tasks become due once the clock reaches their deadline. Equal deadlines
/// fire in scheduling order.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_seq: u64,
    queue: Vec<Scheduled>,
    scheduled_total: usize,
    cancelled_total: usize,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of tasks still waiting
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn scheduled_total(&self) -> usize {
        self.scheduled_total
    }

    pub fn cancelled_total(&self) -> usize {
        self.cancelled_total
    }

    /// Advances the clock by `ms` and drains every task that became due
    pub fn advance(&mut self, ms: u64) -> Vec<TaskId> {
        self.now_ms += ms;
        let now = self.now_ms;
        let mut due: Vec<Scheduled> = self.queue.iter().copied().filter(|s| s.due_ms <= now).collect();
        self.queue.retain(|s| s.due_ms > now);
        due.sort_by_key(|s| (s.due_ms, s.seq));
        due.into_iter().map(|s| s.task).collect()
    }

    /// Jumps the clock to the earliest deadline and pops that task
    pub fn next_task(&mut self) -> Option<TaskId> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(_, s)| (s.due_ms, s.seq))
            .map(|(i, _)| i)?;
        let scheduled = self.queue.remove(index);
        self.now_ms = self.now_ms.max(scheduled.due_ms);
        Some(scheduled.task)
    }
}

impl StepScheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TaskId {
        let task = TaskId::new();
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.queue.push(Scheduled {
            task,
            due_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
        });
        self.next_seq += 1;
        self.scheduled_total += 1;
        task
    }

    fn cancel(&mut self, task: TaskId) -> bool {
        let before = self.queue.len();
        self.queue.retain(|s| s.task != task);
        let removed = self.queue.len() != before;
        if removed {
            self.cancelled_total += 1;
        }
        removed
    }
}
