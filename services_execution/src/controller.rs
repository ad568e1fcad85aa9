//! Run/pause/step/stop state machine

use crate::evaluator::{CancellationToken, EvalError, Evaluator};
use crate::scheduler::StepScheduler;
use serde::{Deserialize, Serialize};
use source_types::{Breakpoint, ExecutionPosition, ExecutionState, TaskId};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Failed(EvalError),
    /// Stopped by the user; not an evaluator failure
    Cancelled,
}

/// Notification for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    StateChanged(ExecutionState),
    /// `None` clears the execution highlight
    PositionChanged(Option<ExecutionPosition>),
    RunFinished(RunOutcome),
}

/// Controller tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerOptions {
    /// Delay before each scheduled step; zero asks for the minimal delay
    pub step_delay_ms: u64,
    /// Publish a position on every step while running, not only on pause
    pub highlight_while_running: bool,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            step_delay_ms: 0,
            highlight_while_running: true,
        }
    }
}

enum Advance {
    Continue,
    BreakpointHit,
    Finished,
}

/// Drives one evaluator through successive runs
pub struct ExecutionController<E: Evaluator, S: StepScheduler> {
    evaluator: E,
    scheduler: S,
    options: ControllerOptions,
    state: ExecutionState,
    pending: Option<TaskId>,
    cancel: Option<CancellationToken>,
    position: Option<ExecutionPosition>,
    events: Vec<ControllerEvent>,
}

impl<E: Evaluator, S: StepScheduler> ExecutionController<E, S> {
    pub fn new(evaluator: E, scheduler: S, options: ControllerOptions) -> Self {
        Self {
            evaluator,
            scheduler,
            options,
            state: ExecutionState::Idle,
            pending: None,
            cancel: None,
            position: None,
            events: Vec::new(),
        }
    }

    pub fn state(&self) -> ExecutionState {
        self.state
    }

    /// Last position reported by the evaluator in the current run
    pub fn position(&self) -> Option<&ExecutionPosition> {
        self.position.as_ref()
    }

    /// Scheduled step awaiting the host, if any
    pub fn pending_task(&self) -> Option<TaskId> {
        self.pending
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.options
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn take_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Starts a run from `Idle` or continues from `Paused`
    pub fn run(&mut self, source: &str, breakpoints: &[Breakpoint]) -> bool {
        match self.state {
            ExecutionState::Idle => {
                self.start(source, breakpoints);
                self.set_state(ExecutionState::Running);
                self.schedule_next();
                true
            }
            ExecutionState::Paused => {
                self.evaluator.set_breakpoints(breakpoints);
                self.emit(ControllerEvent::PositionChanged(None));
                self.set_state(ExecutionState::Running);
                self.schedule_next();
                true
            }
            ExecutionState::Running | ExecutionState::Stopped => false,
        }
    }

    /// Cancels the scheduled step and highlights the last position
    pub fn pause(&mut self) -> bool {
        if self.state != ExecutionState::Running {
            return false;
        }
        self.cancel_pending();
        self.set_state(ExecutionState::Paused);
        self.emit(ControllerEvent::PositionChanged(self.position.clone()));
        true
    }

    /// Takes exactly one step, starting a run first when `Idle`
    pub fn step(&mut self, source: &str, breakpoints: &[Breakpoint]) -> bool {
        match self.state {
            ExecutionState::Idle => self.start(source, breakpoints),
            ExecutionState::Paused => self.evaluator.set_breakpoints(breakpoints),
            ExecutionState::Running | ExecutionState::Stopped => return false,
        }

        if let Advance::Finished = self.advance() {
            return true;
        }
        self.set_state(ExecutionState::Paused);
        self.emit(ControllerEvent::PositionChanged(self.position.clone()));
        true
    }

    /// Abandons the current run
    ///
    /// A step already handed to the host still fires, but is discarded.
    pub fn stop(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.cancel_pending();
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }
        self.position = None;
        self.emit(ControllerEvent::PositionChanged(None));
        self.set_state(ExecutionState::Stopped);
        self.set_state(ExecutionState::Idle);
        info!("run stopped");
        self.emit(ControllerEvent::RunFinished(RunOutcome::Cancelled));
        true
    }

    /// Host callback for a fired step
    ///
    /// Returns whether a step was taken. Tasks that are no longer pending are
    /// ignored.
    pub fn on_task_due(&mut self, task: TaskId) -> bool {
        if self.pending != Some(task) || self.state != ExecutionState::Running {
            trace!(%task, "ignoring stale step");
            return false;
        }
        self.pending = None;

        match self.advance() {
            Advance::Continue => {
                if self.options.highlight_while_running {
                    self.emit(ControllerEvent::PositionChanged(self.position.clone()));
                }
                self.schedule_next();
            }
            Advance::BreakpointHit => {
                if let Some(pos) = &self.position {
                    debug!(line = pos.line, col = pos.col, "breakpoint hit");
                }
                self.set_state(ExecutionState::Paused);
                self.emit(ControllerEvent::PositionChanged(self.position.clone()));
            }
            Advance::Finished => {}
        }
        true
    }

    fn start(&mut self, source: &str, breakpoints: &[Breakpoint]) {
        self.evaluator.reset();
        self.evaluator.set_breakpoints(breakpoints);
        let tokens = self.evaluator.tokenize(source);
        let cancel = CancellationToken::new();
        debug!(tokens = tokens.len(), breakpoints = breakpoints.len(), "starting run");
        self.evaluator.start_run(tokens, cancel.clone());
        self.cancel = Some(cancel);
        self.position = None;
    }

    fn advance(&mut self) -> Advance {
        match self.evaluator.step() {
            Ok(result) => {
                if let Some(value) = result.value {
                    self.position = Some(value);
                }
                if result.done {
                    self.finish(RunOutcome::Completed);
                    Advance::Finished
                } else if result.breakpoint_hit {
                    Advance::BreakpointHit
                } else {
                    Advance::Continue
                }
            }
            Err(err) => {
                warn!(error = %err, "evaluator step failed");
                self.finish(RunOutcome::Failed(err));
                Advance::Finished
            }
        }
    }

    fn finish(&mut self, outcome: RunOutcome) {
        self.cancel_pending();
        self.cancel = None;
        self.position = None;
        self.emit(ControllerEvent::PositionChanged(None));
        self.set_state(ExecutionState::Idle);
        if outcome == RunOutcome::Completed {
            info!("run completed");
        }
        self.emit(ControllerEvent::RunFinished(outcome));
    }

    fn schedule_next(&mut self) {
        let delay = Duration::from_millis(self.options.step_delay_ms);
        self.pending = Some(self.scheduler.schedule(delay));
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            self.scheduler.cancel(task);
        }
    }

    fn set_state(&mut self, state: ExecutionState) {
        if self.state == state {
            return;
        }
        debug!(from = %self.state, to = %state, "execution state changed");
        self.state = state;
        self.emit(ControllerEvent::StateChanged(state));
    }

    fn emit(&mut self, event: ControllerEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::StepResult;
    use source_types::{AnchorId, Position, Token, TokenKind};

    /// Walks whitespace-separated words on a single line
    #[derive(Default)]
    struct WordWalker {
        tokens: Vec<Token>,
        next: usize,
        breakpoints: Vec<Position>,
        resets: usize,
        steps: usize,
        cancel: Option<CancellationToken>,
    }

    impl Evaluator for WordWalker {
        fn tokenize(&self, source: &str) -> Vec<Token> {
            let mut tokens = Vec::new();
            let mut col = 0;
            for part in source.split(' ') {
                if !part.is_empty() {
                    tokens.push(Token::new(
                        TokenKind::Reference,
                        part,
                        0,
                        col,
                        col + part.len(),
                    ));
                }
                col += part.len() + 1;
            }
            tokens
        }

        fn reset(&mut self) {
            self.resets += 1;
            self.tokens.clear();
            self.next = 0;
        }

        fn set_breakpoints(&mut self, breakpoints: &[Breakpoint]) {
            self.breakpoints = breakpoints.iter().map(|bp| bp.position).collect();
        }

        fn start_run(&mut self, tokens: Vec<Token>, cancel: CancellationToken) {
            self.tokens = tokens;
            self.cancel = Some(cancel);
        }

        fn step(&mut self) -> Result<StepResult, EvalError> {
            self.steps += 1;
            let Some(token) = self.tokens.get(self.next).cloned() else {
                return Ok(StepResult::finished(None));
            };
            self.next += 1;
            if token.text == "boom" {
                return Err(EvalError::new("boom"));
            }
            let pos = ExecutionPosition::at_token(token);
            if self.breakpoints.contains(&pos.position()) {
                Ok(StepResult::hit(pos))
            } else {
                Ok(StepResult::at(pos))
            }
        }
    }

    #[derive(Default)]
    struct QueueScheduler {
        queue: Vec<TaskId>,
        delays: Vec<Duration>,
    }

    impl StepScheduler for QueueScheduler {
        fn schedule(&mut self, delay: Duration) -> TaskId {
            let id = TaskId::new();
            self.queue.push(id);
            self.delays.push(delay);
            id
        }

        fn cancel(&mut self, task: TaskId) -> bool {
            let before = self.queue.len();
            self.queue.retain(|t| *t != task);
            self.queue.len() != before
        }
    }

    type Controller = ExecutionController<WordWalker, QueueScheduler>;

    fn controller() -> Controller {
        ExecutionController::new(
            WordWalker::default(),
            QueueScheduler::default(),
            ControllerOptions::default(),
        )
    }

    /// Fires the oldest queued task, as the host would
    fn fire(controller: &mut Controller) -> bool {
        if controller.scheduler().queue.is_empty() {
            return false;
        }
        let task = controller.scheduler_mut().queue.remove(0);
        controller.on_task_due(task)
    }

    fn breakpoint_at(col: usize) -> Breakpoint {
        Breakpoint::unconditional(AnchorId::new(), Position::new(0, col))
    }

    fn positions(events: &[ControllerEvent]) -> Vec<Option<usize>> {
        events
            .iter()
            .filter_map(|e| match e {
                ControllerEvent::PositionChanged(p) => Some(p.as_ref().map(|p| p.col)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_run_to_completion() {
        let mut c = controller();
        assert!(c.run("a b c", &[]));
        assert_eq!(c.state(), ExecutionState::Running);
        assert_eq!(c.scheduler().queue.len(), 1);

        while fire(&mut c) {}
        assert_eq!(c.state(), ExecutionState::Idle);
        assert!(c.pending_task().is_none());
        assert!(c.position().is_none());

        let events = c.take_events();
        assert_eq!(events.first(), Some(&ControllerEvent::StateChanged(ExecutionState::Running)));
        assert_eq!(positions(&events), vec![Some(0), Some(2), Some(4), None]);
        assert_eq!(events.last(), Some(&ControllerEvent::RunFinished(RunOutcome::Completed)));
    }

    #[test]
    fn test_only_one_step_in_flight() {
        let mut c = controller();
        c.run("a b c d", &[]);
        for _ in 0..3 {
            assert_eq!(c.scheduler().queue.len(), 1);
            fire(&mut c);
        }
        assert!(!c.run("a", &[]));
        assert_eq!(c.scheduler().queue.len(), 1);
    }

    #[test]
    fn test_pause_cancels_scheduled_step() {
        let mut c = controller();
        c.run("a b c", &[]);
        fire(&mut c);
        let task = c.pending_task().unwrap();
        c.take_events();

        assert!(c.pause());
        assert_eq!(c.state(), ExecutionState::Paused);
        assert!(c.scheduler().queue.is_empty());
        assert_eq!(positions(&c.take_events()), vec![Some(0)]);

        // The revoked task firing anyway changes nothing
        assert!(!c.on_task_due(task));
        assert!(c.take_events().is_empty());
        assert_eq!(c.evaluator().steps, 1);
        assert!(!c.pause());
    }

    #[test]
    fn test_resume_keeps_evaluator_state() {
        let mut c = controller();
        c.run("a b c", &[]);
        fire(&mut c);
        c.pause();
        c.take_events();

        assert!(c.run("a b c", &[]));
        let events = c.take_events();
        assert_eq!(events[0], ControllerEvent::PositionChanged(None));
        assert_eq!(events[1], ControllerEvent::StateChanged(ExecutionState::Running));
        fire(&mut c);
        assert_eq!(c.position().map(|p| p.col), Some(2));
        assert_eq!(c.evaluator().resets, 1);
    }

    #[test]
    fn test_step_from_idle_pauses_after_one_step() {
        let mut c = controller();
        assert!(c.step("a b", &[]));
        assert_eq!(c.state(), ExecutionState::Paused);
        assert_eq!(c.evaluator().steps, 1);
        assert_eq!(c.position().map(|p| p.col), Some(0));
        assert!(c.scheduler().queue.is_empty());

        let events = c.take_events();
        assert_eq!(
            events,
            vec![
                ControllerEvent::StateChanged(ExecutionState::Paused),
                ControllerEvent::PositionChanged(c.position().cloned()),
            ]
        );
    }

    #[test]
    fn test_step_to_completion_returns_to_idle() {
        let mut c = controller();
        c.step("a", &[]);
        c.take_events();
        assert!(c.step("a", &[]));
        assert_eq!(c.state(), ExecutionState::Idle);
        let events = c.take_events();
        assert!(events.contains(&ControllerEvent::StateChanged(ExecutionState::Idle)));
        assert_eq!(events.last(), Some(&ControllerEvent::RunFinished(RunOutcome::Completed)));
    }

    #[test]
    fn test_step_while_running_is_noop() {
        let mut c = controller();
        c.run("a b", &[]);
        assert!(!c.step("a b", &[]));
        assert_eq!(c.evaluator().steps, 0);
    }

    #[test]
    fn test_stop_from_paused() {
        let mut c = controller();
        c.step("a b", &[]);
        c.take_events();

        assert!(c.stop());
        assert_eq!(c.state(), ExecutionState::Idle);
        assert!(c.position().is_none());
        assert!(c.evaluator().cancel.as_ref().unwrap().is_cancelled());
        assert_eq!(
            c.take_events(),
            vec![
                ControllerEvent::PositionChanged(None),
                ControllerEvent::StateChanged(ExecutionState::Stopped),
                ControllerEvent::StateChanged(ExecutionState::Idle),
                ControllerEvent::RunFinished(RunOutcome::Cancelled),
            ]
        );
        assert!(!c.stop());
    }

    #[test]
    fn test_stop_discards_in_flight_step() {
        let mut c = controller();
        c.run("a b", &[]);
        let task = c.pending_task().unwrap();
        c.stop();
        c.take_events();
        assert!(!c.on_task_due(task));
        assert_eq!(c.evaluator().steps, 0);
        assert!(c.take_events().is_empty());
    }

    #[test]
    fn test_breakpoint_hit_pauses() {
        let mut c = controller();
        c.run("a b c", &[breakpoint_at(2)]);
        fire(&mut c);
        fire(&mut c);
        assert_eq!(c.state(), ExecutionState::Paused);
        assert_eq!(c.position().map(|p| p.col), Some(2));
        assert!(c.scheduler().queue.is_empty());
    }

    #[test]
    fn test_evaluator_failure_is_reported() {
        let mut c = controller();
        c.run("a boom c", &[]);
        fire(&mut c);
        fire(&mut c);
        assert_eq!(c.state(), ExecutionState::Idle);
        let events = c.take_events();
        assert_eq!(
            events.last(),
            Some(&ControllerEvent::RunFinished(RunOutcome::Failed(EvalError::new("boom"))))
        );
        assert!(c.scheduler().queue.is_empty());
    }

    #[test]
    fn test_quiet_running_only_highlights_on_pause() {
        let mut c = ExecutionController::new(
            WordWalker::default(),
            QueueScheduler::default(),
            ControllerOptions {
                step_delay_ms: 25,
                highlight_while_running: false,
            },
        );
        c.run("a b c", &[]);
        fire(&mut c);
        fire(&mut c);
        assert!(positions(&c.take_events()).is_empty());
        c.pause();
        assert_eq!(positions(&c.take_events()), vec![Some(2)]);
        assert!(c.scheduler().delays.iter().all(|d| *d == Duration::from_millis(25)));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: ControllerOptions = serde_json::from_str(r#"{"step_delay_ms": 5}"#).unwrap();
        assert_eq!(options.step_delay_ms, 5);
        assert!(options.highlight_while_running);
    }
}
