//! Bracket matching

use source_types::{Diagnostic, DiagnosticCode, Range, Token};

/// Single-pass stack walk over all bracket kinds
///
/// A closing token pops the innermost opener; a missing or mismatched opener
/// is reported at the closer. Openers still on the stack at the end are
/// reported in source order.
pub fn check_brackets(tokens: &[Token]) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    let mut open: Vec<&Token> = Vec::new();

    for token in tokens {
        if token.kind.is_opening_bracket() {
            open.push(token);
        } else if token.kind.is_closing_bracket() {
            let matched = open
                .pop()
                .is_some_and(|opener| opener.kind.closing_pair() == Some(token.kind));
            if !matched {
                diagnostics.push(Diagnostic::error(
                    DiagnosticCode::UnmatchedClosing,
                    format!("expected matching opening bracket for `{}`", token.text),
                    Range::of_token(token),
                ));
            }
        }
    }

    diagnostics.extend(open.into_iter().map(|opener| {
        Diagnostic::error(
            DiagnosticCode::UnmatchedOpening,
            format!("expected matching closing bracket for `{}`", opener.text),
            Range::of_token(opener),
        )
    }));

    diagnostics
}
