//! # Source Analysis Service
//!
//! Re-derives editor diagnostics from the token sequence on every edit.
//!
//! ## Philosophy
//!
//! - **Diagnostics are data**: Nothing here fails; malformed input yields an
//!   empty or partial diagnostic list, never an error.
//! - **Stateless passes**: Each revision is analysed from scratch and the
//!   caller replaces its whole marker set with the result.
//! - **Advisory**: Diagnostics never block execution.
//!
//! ## Passes
//!
//! 1. Bracket matching ([`check_brackets`])
//! 2. Parameter-list validation ([`check_parameter_lists`])
//! 3. Reference resolution ([`check_references`])
//!
//! The three passes are independent; their results are concatenated in that
//! order.

pub mod brackets;
pub mod builtins;
pub mod definitions;
pub mod params;
pub mod references;

pub use brackets::check_brackets;
pub use builtins::{Builtins, BuiltinsData, BuiltinsError};
pub use definitions::{Callable, CallableKind, DataDef, Definitions, ParamListSpan};
pub use params::check_parameter_lists;
pub use references::check_references;

use serde::{Deserialize, Serialize};
use source_lexer::Tokenizer;
use source_types::{Diagnostic, Severity, Token};
use tracing::debug;

/// Which optional diagnostics an analysis pass reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub report_unresolved_references: bool,
    pub report_shadowed_builtins: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            report_unresolved_references: true,
            report_shadowed_builtins: true,
        }
    }
}

/// Static source-analysis engine
#[derive(Debug, Clone)]
pub struct SourceAnalyzer {
    builtins: Builtins,
    options: AnalysisOptions,
}

impl SourceAnalyzer {
    pub fn new(builtins: Builtins, options: AnalysisOptions) -> Self {
        Self { builtins, options }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    /// Tokenizes `source` and analyses the result
    pub fn analyze(&self, source: &str, tokenizer: &dyn Tokenizer) -> Vec<Diagnostic> {
        self.analyze_tokens(&tokenizer.tokenize(source))
    }

    /// Runs all passes over one revision's token sequence
    pub fn analyze_tokens(&self, tokens: &[Token]) -> Vec<Diagnostic> {
        let definitions = Definitions::collect(tokens);

        let mut diagnostics = check_brackets(tokens);
        diagnostics.extend(check_parameter_lists(
            tokens,
            &definitions,
            &self.builtins,
            self.options.report_shadowed_builtins,
        ));
        if self.options.report_unresolved_references {
            diagnostics.extend(check_references(tokens, &definitions, &self.builtins));
        }

        let errors = diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .count();
        debug!(
            tokens = tokens.len(),
            errors,
            warnings = diagnostics.len() - errors,
            "analysis pass complete"
        );
        diagnostics
    }
}

impl Default for SourceAnalyzer {
    fn default() -> Self {
        Self::new(Builtins::standard(), AnalysisOptions::default())
    }
}
