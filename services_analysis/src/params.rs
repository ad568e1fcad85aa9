//! Parameter-list validation

use crate::builtins::Builtins;
use crate::definitions::{Definitions, ParamListSpan};
use source_types::{Diagnostic, DiagnosticCode, Range, Token, TokenKind};

/// Validates every top-level parameter list
///
/// The list is split at its first arrow. Before the arrow each token must be
/// a parameter name or a type symbol directly following a name; after it
/// every token must be a type symbol.
pub fn check_parameter_lists(
    tokens: &[Token],
    definitions: &Definitions,
    builtins: &Builtins,
    report_shadowed: bool,
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for span in &definitions.spans {
        check_span(
            tokens,
            span,
            definitions,
            builtins,
            report_shadowed,
            &mut diagnostics,
        );
    }
    diagnostics
}

fn check_span(
    tokens: &[Token],
    span: &ParamListSpan,
    definitions: &Definitions,
    builtins: &Builtins,
    report_shadowed: bool,
    out: &mut Vec<Diagnostic>,
) {
    let arrow = span.arrow(tokens);
    let params_end = arrow.unwrap_or(span.end);
    let mut after_name = false;

    for token in &tokens[span.open + 1..params_end] {
        match token.kind {
            TokenKind::Reference => {
                if report_shadowed && builtins.is_function(&token.text) {
                    out.push(Diagnostic::warning(
                        DiagnosticCode::ShadowedBuiltin,
                        format!("parameter `{}` shadows a built-in function", token.text),
                        Range::of_token(token),
                    ));
                }
                after_name = true;
            }
            TokenKind::Symbol if after_name => {
                check_type_symbol(token, definitions, builtins, out);
                after_name = false;
            }
            TokenKind::Symbol => {
                out.push(Diagnostic::error(
                    DiagnosticCode::MisplacedType,
                    format!("type `{}` must directly follow a parameter name", token.text),
                    Range::of_token(token),
                ));
            }
            _ => {
                out.push(Diagnostic::error(
                    DiagnosticCode::InvalidParameter,
                    format!("expected a parameter name or type, found `{}`", token.text),
                    Range::of_token(token),
                ));
                after_name = false;
            }
        }
    }

    if let Some(arrow) = arrow {
        for token in &tokens[arrow + 1..span.end] {
            if token.kind == TokenKind::Symbol {
                check_type_symbol(token, definitions, builtins, out);
            } else {
                out.push(Diagnostic::error(
                    DiagnosticCode::InvalidReturn,
                    format!("expected a return type, found `{}`", token.text),
                    Range::of_token(token),
                ));
            }
        }
    }
}

fn check_type_symbol(
    token: &Token,
    definitions: &Definitions,
    builtins: &Builtins,
    out: &mut Vec<Diagnostic>,
) {
    let name = token.text.strip_prefix(':').unwrap_or_default();
    if !is_valid_type_name(name) {
        out.push(Diagnostic::error(
            DiagnosticCode::InvalidSymbol,
            format!("`{}` is not a valid type symbol", token.text),
            Range::of_token(token),
        ));
    } else if !builtins.is_type(name) && !definitions.datadef_declared_before(name, token.start()) {
        out.push(Diagnostic::warning(
            DiagnosticCode::UnknownType,
            format!("unknown type `{}`", name),
            Range::of_token(token),
        ));
    }
}

/// A type name starts with a letter and continues with letters, digits, `_` or `-`
fn is_valid_type_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(char::is_alphabetic)
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}
