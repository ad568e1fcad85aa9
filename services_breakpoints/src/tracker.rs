//! Breakpoint list, anchoring and reconciliation

use crate::anchor::AnchorStore;
use crate::{BreakpointError, BreakpointResult};
use source_types::{token_at, Breakpoint, BreakpointKind, Position, Range, Token};
use tracing::debug;

/// Structural change notification for the view layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BreakpointEvent {
    /// The full breakpoint list after a change
    Changed(Vec<Breakpoint>),
}

/// Result of a toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Tracks breakpoints against host anchors
///
/// Breakpoints are kept in anchor insertion order, not position order. The
/// tracker keeps its own view of the current token sequence, refreshed by
/// [`reconcile`](Self::reconcile).
pub struct BreakpointTracker<A: AnchorStore> {
    anchors: A,
    breakpoints: Vec<Breakpoint>,
    tokens: Vec<Token>,
    events: Vec<BreakpointEvent>,
}

impl<A: AnchorStore> BreakpointTracker<A> {
    pub fn new(anchors: A) -> Self {
        Self {
            anchors,
            breakpoints: Vec::new(),
            tokens: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breakpoints
    }

    pub fn get(&self, position: Position) -> Option<&Breakpoint> {
        self.breakpoints.iter().find(|bp| bp.position == position)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn anchors(&self) -> &A {
        &self.anchors
    }

    pub fn anchors_mut(&mut self) -> &mut A {
        &mut self.anchors
    }

    /// Drains pending change notifications
    pub fn take_events(&mut self) -> Vec<BreakpointEvent> {
        std::mem::take(&mut self.events)
    }

    /// Start of the first token on `line` (gutter clicks address lines)
    pub fn breakpoint_position_for_line(&self, line: usize) -> Option<Position> {
        self.tokens
            .iter()
            .find(|token| token.line == line)
            .map(Token::start)
    }

    /// Sets a breakpoint at the token covering `position`
    ///
    /// The position snaps to the token start. Setting where a breakpoint
    /// already exists replaces its kind and expression in place.
    pub fn set_breakpoint(
        &mut self,
        position: Position,
        kind: BreakpointKind,
        expression: Option<String>,
    ) -> BreakpointResult<Position> {
        let expression = validate_expression(kind, expression)?;
        let start = token_at(&self.tokens, position)
            .map(Token::start)
            .ok_or(BreakpointError::NoTokenAtPosition(position))?;

        if let Some(existing) = self.breakpoints.iter_mut().find(|bp| bp.position == start) {
            existing.kind = kind;
            existing.expression = expression;
            debug!(line = start.line, col = start.col, %kind, "breakpoint updated");
            self.publish();
            return Ok(start);
        }

        let anchor_id = self
            .anchors
            .create(Range::point(start))
            .ok_or(BreakpointError::AnchorRejected(start))?;
        self.breakpoints.push(Breakpoint {
            anchor_id,
            position: start,
            kind,
            expression,
        });
        debug!(line = start.line, col = start.col, %kind, "breakpoint set");
        self.publish();
        Ok(start)
    }

    /// Removes the breakpoint recorded at exactly `position`
    ///
    /// Returns whether one was found; not finding one is not an error.
    pub fn unset_breakpoint(&mut self, position: Position) -> bool {
        let Some(index) = self.breakpoints.iter().position(|bp| bp.position == position) else {
            return false;
        };
        let removed = self.breakpoints.remove(index);
        self.anchors.remove(removed.anchor_id);
        debug!(line = position.line, col = position.col, "breakpoint unset");
        self.publish();
        true
    }

    /// Removes the breakpoint at `position` or adds an unconditional one
    pub fn toggle_breakpoint(&mut self, position: Position) -> BreakpointResult<ToggleOutcome> {
        let position = token_at(&self.tokens, position)
            .map(Token::start)
            .unwrap_or(position);
        if self.unset_breakpoint(position) {
            return Ok(ToggleOutcome::Removed);
        }
        self.set_breakpoint(position, BreakpointKind::Unconditional, None)?;
        Ok(ToggleOutcome::Added)
    }

    /// Removes every breakpoint
    pub fn clear(&mut self) {
        if self.breakpoints.is_empty() {
            return;
        }
        for bp in self.breakpoints.drain(..) {
            self.anchors.remove(bp.anchor_id);
        }
        self.publish();
    }

    /// Re-derives breakpoint positions from anchors after a content revision
    ///
    /// `tokens` must come from the text the anchors were last updated for.
    /// Decayed anchors drop their breakpoint; anchors that drifted off a token
    /// start are re-created at the covering token's start. Returns whether
    /// the list changed; a change is published once.
    pub fn reconcile(&mut self, tokens: Vec<Token>) -> bool {
        self.tokens = tokens;
        let mut changed = false;
        let mut kept: Vec<Breakpoint> = Vec::with_capacity(self.breakpoints.len());

        for mut bp in std::mem::take(&mut self.breakpoints) {
            let resolved = self.anchors.resolve(bp.anchor_id);
            let token_start = resolved
                .and_then(|range| token_at(&self.tokens, range.start))
                .map(Token::start);

            let Some(start) = token_start else {
                debug!(line = bp.position.line, col = bp.position.col, "breakpoint anchor decayed");
                self.anchors.remove(bp.anchor_id);
                changed = true;
                continue;
            };

            if kept.iter().any(|other| other.position == start) {
                debug!(line = start.line, col = start.col, "breakpoint merged into duplicate");
                self.anchors.remove(bp.anchor_id);
                changed = true;
                continue;
            }

            if resolved.map(|range| range.start) != Some(start) {
                self.anchors.remove(bp.anchor_id);
                match self.anchors.create(Range::point(start)) {
                    Some(anchor_id) => bp.anchor_id = anchor_id,
                    None => {
                        changed = true;
                        continue;
                    }
                }
            }

            if bp.position != start {
                debug!(
                    from_line = bp.position.line,
                    from_col = bp.position.col,
                    line = start.line,
                    col = start.col,
                    "breakpoint moved"
                );
                bp.position = start;
                changed = true;
            }
            kept.push(bp);
        }

        self.breakpoints = kept;
        if changed {
            self.publish();
        }
        changed
    }

    fn publish(&mut self) {
        self.events
            .push(BreakpointEvent::Changed(self.breakpoints.clone()));
    }
}

fn validate_expression(
    kind: BreakpointKind,
    expression: Option<String>,
) -> BreakpointResult<Option<String>> {
    if !kind.needs_expression() {
        return Ok(None);
    }
    let expression = expression
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
        .ok_or(BreakpointError::MissingExpression(kind))?;
    if kind == BreakpointKind::HitCount && !matches!(expression.parse::<u64>(), Ok(n) if n > 0) {
        return Err(BreakpointError::InvalidHitCount(expression));
    }
    Ok(Some(expression))
}
