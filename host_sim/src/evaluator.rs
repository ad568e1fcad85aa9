//! Evaluator that walks tokens in source order
//!
//! Every step "executes" the next token without interpreting it. This is
//! enough to drive the controller through realistic runs in tests.

use services_execution::{CancellationToken, EvalError, Evaluator, StepResult};
use source_lexer::{StackLexer, Tokenizer};
use source_types::{Breakpoint, BreakpointKind, ExecutionPosition, Position, Token, TokenKind};
use std::collections::HashMap;
use tracing::debug;

/// Keyword that pauses like an unconditional breakpoint
const DEBUGGER_KEYWORD: &str = "debugger";

#[derive(Debug, Default)]
pub struct TokenWalker {
    lexer: StackLexer,
    tokens: Vec<Token>,
    next: usize,
    breakpoints: HashMap<Position, Breakpoint>,
    hits: HashMap<Position, u64>,
    cancel: Option<CancellationToken>,
    fail_on: Option<String>,
    logged: Vec<String>,
    resets: usize,
    steps: usize,
}

impl TokenWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the step that reaches a token with this text
    pub fn failing_on(mut self, text: impl Into<String>) -> Self {
        self.fail_on = Some(text.into());
        self
    }

    /// Messages produced by log breakpoints
    pub fn logged(&self) -> &[String] {
        &self.logged
    }

    pub fn resets(&self) -> usize {
        self.resets
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    fn should_pause(&mut self, token: &Token) -> bool {
        if token.kind == TokenKind::Keyword && token.text == DEBUGGER_KEYWORD {
            return true;
        }
        let position = token.start();
        let Some(bp) = self.breakpoints.get(&position) else {
            return false;
        };
        let hits = self.hits.entry(position).or_insert(0);
        *hits += 1;
        let expression = bp.expression.as_deref().unwrap_or_default();
        match bp.kind {
            BreakpointKind::Unconditional => true,
            BreakpointKind::Expression => expression == "true",
            BreakpointKind::HitCount => expression.parse::<u64>().is_ok_and(|n| *hits == n),
            BreakpointKind::Log => {
                self.logged.push(format!("{}: {}", token.text, expression));
                false
            }
        }
    }
}

impl Evaluator for TokenWalker {
    fn tokenize(&self, source: &str) -> Vec<Token> {
        self.lexer.tokenize(source)
    }

    fn reset(&mut self) {
        self.resets += 1;
        self.tokens.clear();
        self.next = 0;
        self.hits.clear();
        self.cancel = None;
    }

    fn set_breakpoints(&mut self, breakpoints: &[Breakpoint]) {
        self.breakpoints = breakpoints
            .iter()
            .map(|bp| (bp.position, bp.clone()))
            .collect();
    }

    fn start_run(&mut self, tokens: Vec<Token>, cancel: CancellationToken) {
        debug!(tokens = tokens.len(), "walker run started");
        self.tokens = tokens;
        self.next = 0;
        self.cancel = Some(cancel);
    }

    fn step(&mut self) -> Result<StepResult, EvalError> {
        self.steps += 1;
        if self.is_cancelled() {
            return Ok(StepResult::finished(None));
        }
        let Some(token) = self.tokens.get(self.next).cloned() else {
            let last = self.tokens.last().cloned().map(ExecutionPosition::at_token);
            return Ok(StepResult::finished(last));
        };
        self.next += 1;

        if self.fail_on.as_deref() == Some(token.text.as_str()) {
            return Err(EvalError::new(format!(
                "cannot execute `{}` at {}:{}",
                token.text,
                token.line + 1,
                token.col + 1
            )));
        }
        let pause = self.should_pause(&token);
        let position = ExecutionPosition::at_token(token);
        Ok(if pause {
            StepResult::hit(position)
        } else {
            StepResult::at(position)
        })
    }
}
