//! Reference resolution
//!
//! Heuristic and order-insensitive: a reference resolves if any definition
//! anywhere in the file could account for it. Unresolved references are
//! warnings because the heuristic can produce false positives.

use crate::builtins::Builtins;
use crate::definitions::{CallableKind, Definitions, RECURSION_NAME};
use source_types::{Diagnostic, DiagnosticCode, Range, Token, TokenKind};

pub fn check_references(
    tokens: &[Token],
    definitions: &Definitions,
    builtins: &Builtins,
) -> Vec<Diagnostic> {
    tokens
        .iter()
        .enumerate()
        .filter(|(_, token)| token.kind == TokenKind::Reference)
        .filter(|(i, _)| !definitions.in_parameter_list(*i) && !definitions.is_declaration_name(*i))
        .filter(|(_, token)| !resolves(token, definitions, builtins))
        .map(|(_, token)| {
            Diagnostic::warning(
                DiagnosticCode::UnresolvedReference,
                format!("unresolved reference `{}`", token.text),
                Range::of_token(token),
            )
        })
        .collect()
}

fn resolves(token: &Token, definitions: &Definitions, builtins: &Builtins) -> bool {
    let name = token.text.as_str();
    if builtins.resolves(name)
        || definitions.functions.contains(name)
        || definitions.variables.contains(name)
        || definitions.is_generated(name)
    {
        return true;
    }

    let position = token.start();
    definitions.enclosing(position).any(|callable| {
        (name == RECURSION_NAME && callable.kind == CallableKind::Function)
            || callable.params.iter().any(|p| p == name)
    })
}
