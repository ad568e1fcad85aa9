//! Session state and command surface

use crate::{SessionError, SessionResult};
use editor_config::SessionConfig;
use services_analysis::SourceAnalyzer;
use services_breakpoints::{AnchorStore, BreakpointEvent, BreakpointTracker, ToggleOutcome};
use services_execution::{ControllerEvent, Evaluator, ExecutionController, RunOutcome, StepScheduler};
use services_publisher::{HostSurface, Publisher};
use source_lexer::{StackLexer, Tokenizer};
use source_types::{
    Breakpoint, BreakpointKind, Diagnostic, ExecutionPosition, ExecutionState, Position,
    SurfacePosition, TaskId, Token,
};
use tracing::debug;

/// Notification for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    DiagnosticsChanged(Vec<Diagnostic>),
    BreakpointsChanged(Vec<Breakpoint>),
    ExecutionPositionChanged(Option<ExecutionPosition>),
    StateChanged(ExecutionState),
    RunFinished(RunOutcome),
}

/// One open document with its analysis, breakpoints and run state
pub struct EditorSession<A, E, S, H>
where
    A: AnchorStore,
    E: Evaluator,
    S: StepScheduler,
    H: HostSurface,
{
    tokenizer: Box<dyn Tokenizer>,
    analyzer: SourceAnalyzer,
    tracker: BreakpointTracker<A>,
    controller: ExecutionController<E, S>,
    publisher: Publisher<H>,
    source: String,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    events: Vec<SessionEvent>,
}

impl<A, E, S, H> EditorSession<A, E, S, H>
where
    A: AnchorStore,
    E: Evaluator,
    S: StepScheduler,
    H: HostSurface,
{
    pub fn new(config: &SessionConfig, anchors: A, evaluator: E, scheduler: S, surface: H) -> Self {
        Self {
            tokenizer: Box::new(StackLexer::new()),
            analyzer: SourceAnalyzer::new(config.builtins(), config.analysis),
            tracker: BreakpointTracker::new(anchors),
            controller: ExecutionController::new(evaluator, scheduler, config.execution.clone()),
            publisher: Publisher::new(surface),
            source: String::new(),
            tokens: Vec::new(),
            diagnostics: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Builds a session from a JSON configuration
    pub fn from_config_json(
        json: &str,
        anchors: A,
        evaluator: E,
        scheduler: S,
        surface: H,
    ) -> SessionResult<Self> {
        let config = SessionConfig::from_json(json)?;
        Ok(Self::new(&config, anchors, evaluator, scheduler, surface))
    }

    /// Replaces the tokenizer used for analysis and reconciliation
    pub fn with_tokenizer(mut self, tokenizer: impl Tokenizer + 'static) -> Self {
        self.tokenizer = Box::new(tokenizer);
        self
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        self.tracker.breakpoints()
    }

    pub fn state(&self) -> ExecutionState {
        self.controller.state()
    }

    pub fn execution_position(&self) -> Option<&ExecutionPosition> {
        self.controller.position()
    }

    pub fn controller(&self) -> &ExecutionController<E, S> {
        &self.controller
    }

    pub fn anchors(&self) -> &A {
        self.tracker.anchors()
    }

    /// Host access to the anchor store, for applying text edits
    pub fn anchors_mut(&mut self) -> &mut A {
        self.tracker.anchors_mut()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.controller.scheduler_mut()
    }

    pub fn surface(&self) -> &H {
        self.publisher.surface()
    }

    pub fn take_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Handles a content revision
    ///
    /// The host must have moved its anchors through the edit already.
    pub fn on_content_changed(&mut self, text: &str) {
        self.source = text.to_string();
        self.tokens = self.tokenizer.tokenize(text);
        debug!(tokens = self.tokens.len(), "content changed");

        self.diagnostics = self.analyzer.analyze_tokens(&self.tokens);
        self.publisher.publish_diagnostics(&self.diagnostics);
        self.events
            .push(SessionEvent::DiagnosticsChanged(self.diagnostics.clone()));

        self.tracker.reconcile(self.tokens.clone());
        self.drain_breakpoint_events();
    }

    pub fn set_breakpoint(
        &mut self,
        position: Position,
        kind: BreakpointKind,
        expression: Option<String>,
    ) -> SessionResult<Position> {
        let result = self.tracker.set_breakpoint(position, kind, expression);
        self.drain_breakpoint_events();
        Ok(result?)
    }

    pub fn unset_breakpoint(&mut self, position: Position) -> bool {
        let removed = self.tracker.unset_breakpoint(position);
        self.drain_breakpoint_events();
        removed
    }

    pub fn toggle_breakpoint(&mut self, position: Position) -> SessionResult<ToggleOutcome> {
        let result = self.tracker.toggle_breakpoint(position);
        self.drain_breakpoint_events();
        Ok(result?)
    }

    /// Toggles at a one-based surface position (editor clicks)
    pub fn toggle_breakpoint_at_surface(
        &mut self,
        position: SurfacePosition,
    ) -> SessionResult<ToggleOutcome> {
        let source = position
            .to_source()
            .ok_or(SessionError::InvalidSurfacePosition(position))?;
        self.toggle_breakpoint(source)
    }

    /// Toggles at the first token of a zero-based line (gutter clicks)
    pub fn toggle_breakpoint_on_line(&mut self, line: usize) -> SessionResult<ToggleOutcome> {
        let position = self
            .tracker
            .breakpoint_position_for_line(line)
            .unwrap_or(Position::new(line, 0));
        self.toggle_breakpoint(position)
    }

    pub fn clear_breakpoints(&mut self) {
        self.tracker.clear();
        self.drain_breakpoint_events();
    }

    pub fn run(&mut self) -> bool {
        let enabled = self
            .controller
            .run(&self.source, self.tracker.breakpoints());
        self.drain_controller_events();
        enabled
    }

    pub fn pause(&mut self) -> bool {
        let enabled = self.controller.pause();
        self.drain_controller_events();
        enabled
    }

    pub fn step(&mut self) -> bool {
        let enabled = self
            .controller
            .step(&self.source, self.tracker.breakpoints());
        self.drain_controller_events();
        enabled
    }

    pub fn stop(&mut self) -> bool {
        let enabled = self.controller.stop();
        self.drain_controller_events();
        enabled
    }

    /// Host callback for a fired step task
    pub fn on_task_due(&mut self, task: TaskId) -> bool {
        let stepped = self.controller.on_task_due(task);
        self.drain_controller_events();
        stepped
    }

    fn drain_breakpoint_events(&mut self) {
        for event in self.tracker.take_events() {
            let BreakpointEvent::Changed(breakpoints) = event;
            self.publisher.publish_breakpoints(&breakpoints);
            self.events.push(SessionEvent::BreakpointsChanged(breakpoints));
        }
    }

    fn drain_controller_events(&mut self) {
        for event in self.controller.take_events() {
            let event = match event {
                ControllerEvent::StateChanged(state) => SessionEvent::StateChanged(state),
                ControllerEvent::PositionChanged(position) => {
                    self.publisher.publish_position(position.as_ref());
                    SessionEvent::ExecutionPositionChanged(position)
                }
                ControllerEvent::RunFinished(outcome) => SessionEvent::RunFinished(outcome),
            };
            self.events.push(event);
        }
    }
}
