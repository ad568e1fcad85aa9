use editor_config::SessionConfig;
use editor_session::{EditorSession, SessionError, SessionEvent};
use host_sim::{ManualScheduler, MemoryAnchorStore, RecordingSurface, TokenWalker};
use services_breakpoints::{AnchorStore, BreakpointError, ToggleOutcome};
use services_execution::{EvalError, RunOutcome};
use services_publisher::DecorationLayer;
use source_types::{
    BreakpointKind, DiagnosticCode, ExecutionState, Position, Severity, SurfacePosition,
};

type Session = EditorSession<MemoryAnchorStore, TokenWalker, ManualScheduler, RecordingSurface>;

const LOOP: &str = "1 i! { i println i 1 + i! } loop";

fn open_with(config: &SessionConfig, walker: TokenWalker, text: &str) -> Session {
    let mut session = Session::new(
        config,
        MemoryAnchorStore::new(text),
        walker,
        ManualScheduler::new(),
        RecordingSurface::new(),
    );
    session.on_content_changed(text);
    session.take_events();
    session
}

fn open(text: &str) -> Session {
    open_with(&SessionConfig::default(), TokenWalker::new(), text)
}

/// Applies an edit the way the host does: anchors first, then the revision
fn edit(session: &mut Session, text: &str) {
    session.anchors_mut().replace_text(text);
    session.on_content_changed(text);
}

/// Fires scheduled steps until none remain; returns how many fired
fn pump(session: &mut Session) -> usize {
    let mut fired = 0;
    while let Some(task) = session.scheduler_mut().next_task() {
        session.on_task_due(task);
        fired += 1;
        assert!(fired < 10_000, "run did not settle");
    }
    fired
}

fn breakpoint_events(events: &[SessionEvent]) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, SessionEvent::BreakpointsChanged(_)))
        .count()
}

#[test]
fn test_loop_program_has_no_diagnostics() {
    let session = open(LOOP);
    assert!(session.diagnostics().is_empty());
    assert!(session.surface().markers().is_empty());
}

#[test]
fn test_breakpoint_follows_leading_spaces() {
    let mut session = open(LOOP);
    let println = session
        .tokens()
        .iter()
        .find(|t| t.text == "println")
        .map(|t| t.start())
        .unwrap();
    assert_eq!(println, Position::new(0, 9));
    session
        .set_breakpoint(println, BreakpointKind::Unconditional, None)
        .unwrap();
    session.take_events();

    edit(&mut session, &format!("  {}", LOOP));

    let breakpoints = session.breakpoints();
    assert_eq!(breakpoints.len(), 1);
    assert_eq!(breakpoints[0].position, Position::new(0, 11));
    assert_eq!(
        session.anchors().resolve(breakpoints[0].anchor_id).map(|r| r.start),
        Some(Position::new(0, 11))
    );
    assert_eq!(session.anchors().len(), 1);

    let glyphs = session.surface().decorations(DecorationLayer::Breakpoints);
    assert_eq!(glyphs.len(), 1);
    assert_eq!(glyphs[0].range.start, SurfacePosition::new(1, 12));
    assert_eq!(breakpoint_events(&session.take_events()), 1);
}

#[test]
fn test_shadowed_parameter_warning() {
    let config = SessionConfig::from_json(r#"{"builtins": {"functions": ["a"]}}"#).unwrap();
    let session = open_with(
        &config,
        TokenWalker::new(),
        "fn check (a :Int b -> :Bool) { a b }",
    );

    let diagnostics = session.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(diagnostics[0].code, DiagnosticCode::ShadowedBuiltin);
    assert!(diagnostics[0].message.contains("`a`"));

    let markers = session.surface().markers();
    assert_eq!(markers.len(), 1);
    assert_eq!(markers[0].range.start, SurfacePosition::new(1, 11));
}

#[test]
fn test_unclosed_bracket_reported_at_opener() {
    let mut session = open("1 2");
    edit(&mut session, "1 [ 2");
    let diagnostics = session.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, DiagnosticCode::UnmatchedOpening);
    assert_eq!(diagnostics[0].range.start, Position::new(0, 2));

    let events = session.take_events();
    assert!(matches!(&events[0], SessionEvent::DiagnosticsChanged(d) if d.len() == 1));
}

#[test]
fn test_step_from_idle_then_stop() {
    let mut session = open("1 2 +");
    assert!(session.step());
    assert_eq!(session.state(), ExecutionState::Paused);
    assert_eq!(
        session.execution_position().map(|p| p.position()),
        Some(Position::new(0, 0))
    );
    assert_eq!(session.controller().evaluator().steps(), 1);
    assert_eq!(session.surface().current_line(), Some(1));

    assert!(session.stop());
    assert_eq!(session.state(), ExecutionState::Idle);
    assert!(session.execution_position().is_none());
    assert_eq!(session.surface().current_line(), None);

    let events = session.take_events();
    assert!(events.contains(&SessionEvent::StateChanged(ExecutionState::Stopped)));
    assert_eq!(
        events.last(),
        Some(&SessionEvent::RunFinished(RunOutcome::Cancelled))
    );
}

#[test]
fn test_toggle_twice_restores_breakpoints() {
    let mut session = open(LOOP);
    session
        .set_breakpoint(Position::new(0, 0), BreakpointKind::Unconditional, None)
        .unwrap();
    let before = session.breakpoints().to_vec();

    assert_eq!(
        session.toggle_breakpoint(Position::new(0, 7)).unwrap(),
        ToggleOutcome::Added
    );
    assert_eq!(
        session.toggle_breakpoint(Position::new(0, 7)).unwrap(),
        ToggleOutcome::Removed
    );
    assert_eq!(session.breakpoints(), before.as_slice());
    assert_eq!(session.anchors().len(), 1);
    assert_eq!(
        session
            .surface()
            .breakpoint_lines(BreakpointKind::Unconditional),
        vec![1]
    );
}

#[test]
fn test_reconcile_against_unchanged_source() {
    let mut session = open(LOOP);
    session
        .set_breakpoint(Position::new(0, 9), BreakpointKind::Unconditional, None)
        .unwrap();
    let before = session.breakpoints().to_vec();
    session.take_events();

    edit(&mut session, LOOP);
    assert_eq!(session.breakpoints(), before.as_slice());
    assert_eq!(breakpoint_events(&session.take_events()), 0);
}

#[test]
fn test_retyping_first_character_keeps_breakpoint() {
    let mut session = open(LOOP);
    session
        .set_breakpoint(Position::new(0, 9), BreakpointKind::Unconditional, None)
        .unwrap();
    session.take_events();

    edit(&mut session, &LOOP.replace("println", "Println"));
    assert_eq!(session.breakpoints().len(), 1);
    assert_eq!(session.breakpoints()[0].position, Position::new(0, 9));
    assert_eq!(breakpoint_events(&session.take_events()), 0);
}

#[test]
fn test_deleting_line_drops_breakpoint() {
    let mut session = open("1 println\n2 println");
    session
        .set_breakpoint(Position::new(0, 2), BreakpointKind::Unconditional, None)
        .unwrap();
    session
        .set_breakpoint(Position::new(1, 2), BreakpointKind::Unconditional, None)
        .unwrap();
    session.take_events();

    edit(&mut session, "2 println");
    assert_eq!(session.breakpoints().len(), 1);
    assert_eq!(session.breakpoints()[0].position, Position::new(0, 2));
    assert_eq!(breakpoint_events(&session.take_events()), 1);
}

#[test]
fn test_no_position_updates_after_pause() {
    let mut session = open("1 2 3 4 5");
    assert!(session.run());
    let task = session.scheduler_mut().next_task().unwrap();
    session.on_task_due(task);
    assert!(session.pause());
    session.take_events();

    assert!(session.scheduler_mut().advance(1_000).is_empty());
    assert_eq!(pump(&mut session), 0);
    assert!(session.take_events().is_empty());
    assert_eq!(session.state(), ExecutionState::Paused);

    assert!(session.step());
    let events = session.take_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, SessionEvent::ExecutionPositionChanged(Some(p)) if p.col == 2)));
}

#[test]
fn test_run_pauses_at_breakpoint_and_resumes() {
    let mut session = open(LOOP);
    session
        .set_breakpoint(Position::new(0, 9), BreakpointKind::Unconditional, None)
        .unwrap();
    session.take_events();

    assert!(session.run());
    pump(&mut session);
    assert_eq!(session.state(), ExecutionState::Paused);
    assert_eq!(
        session.execution_position().map(|p| p.token.text.as_str()),
        Some("println")
    );
    assert_eq!(session.surface().current_line(), Some(1));

    assert!(session.run());
    pump(&mut session);
    assert_eq!(session.state(), ExecutionState::Idle);
    let events = session.take_events();
    assert_eq!(
        events.last(),
        Some(&SessionEvent::RunFinished(RunOutcome::Completed))
    );
    assert_eq!(session.controller().evaluator().resets(), 1);
}

#[test]
fn test_evaluator_failure_is_not_cancellation() {
    let mut session = open_with(
        &SessionConfig::default(),
        TokenWalker::new().failing_on("boom"),
        "1 boom 2",
    );
    session.run();
    pump(&mut session);
    assert_eq!(session.state(), ExecutionState::Idle);
    let events = session.take_events();
    assert_eq!(
        events.last(),
        Some(&SessionEvent::RunFinished(RunOutcome::Failed(EvalError::new(
            "cannot execute `boom` at 1:3"
        ))))
    );
}

#[test]
fn test_stop_while_running_cancels_evaluator() {
    let mut session = open("1 2 3");
    session.run();
    assert!(session.stop());
    assert_eq!(pump(&mut session), 0);
    assert!(session.controller().evaluator().is_cancelled());
    assert_eq!(session.controller().evaluator().steps(), 0);
}

#[test]
fn test_step_delay_from_config() {
    let config = SessionConfig::from_json(r#"{"execution": {"step_delay_ms": 40}}"#).unwrap();
    let mut session = open_with(&config, TokenWalker::new(), "1 2");
    session.run();
    assert!(session.scheduler_mut().advance(39).is_empty());
    let due = session.scheduler_mut().advance(1);
    assert_eq!(due.len(), 1);
    assert!(session.on_task_due(due[0]));
}

#[test]
fn test_gutter_and_surface_toggles() {
    let mut session = open("1 2\n    dup println");
    assert_eq!(
        session.toggle_breakpoint_on_line(1).unwrap(),
        ToggleOutcome::Added
    );
    assert_eq!(session.breakpoints()[0].position, Position::new(1, 4));

    assert_eq!(
        session
            .toggle_breakpoint_at_surface(SurfacePosition::new(2, 5))
            .unwrap(),
        ToggleOutcome::Removed
    );
    assert!(matches!(
        session.toggle_breakpoint_at_surface(SurfacePosition::new(0, 1)),
        Err(SessionError::InvalidSurfacePosition(_))
    ));
    assert!(matches!(
        session.toggle_breakpoint_on_line(7),
        Err(SessionError::Breakpoint(BreakpointError::NoTokenAtPosition(_)))
    ));
}

#[test]
fn test_conditional_breakpoint_glyph() {
    let mut session = open(LOOP);
    session
        .set_breakpoint(
            Position::new(0, 9),
            BreakpointKind::Log,
            Some("i".to_string()),
        )
        .unwrap();
    let glyphs = session.surface().decorations(DecorationLayer::Breakpoints);
    assert_eq!(glyphs[0].hover.as_deref(), Some("log: i"));
    assert!(session
        .set_breakpoint(Position::new(0, 9), BreakpointKind::Expression, None)
        .is_err());
}

#[test]
fn test_invalid_config_json() {
    let result = Session::from_config_json(
        r#"{"execution": {"step_delay_ms": 60000}}"#,
        MemoryAnchorStore::new(""),
        TokenWalker::new(),
        ManualScheduler::new(),
        RecordingSurface::new(),
    );
    assert!(matches!(result, Err(SessionError::Config(_))));
}
