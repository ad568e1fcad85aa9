//! Definition and scope scanning
//!
//! Collects everything reference resolution needs from one walk over the
//! token sequence: parameter-list spans, function and lambda bodies with their
//! parameter names, data definitions and assigned variables. Every scanner
//! tolerates truncated or unbalanced input.

use source_types::{Position, Range, Token, TokenKind};
use std::collections::{BTreeSet, HashMap};

/// Name available inside any function body for loop recursion
pub const RECURSION_NAME: &str = "recur";

/// A top-level parameter list
///
/// `open` is the index of `(`. `close` is the index of the matching `)`, or
/// `None` when the list is truncated. `end` is the exclusive end of the inner
/// tokens: the closer, the first brace that interrupts an unclosed list, or
/// the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamListSpan {
    pub open: usize,
    pub close: Option<usize>,
    pub end: usize,
}

impl ParamListSpan {
    /// Token indices strictly inside the list
    pub fn inner(&self) -> std::ops::Range<usize> {
        self.open + 1..self.end
    }

    /// Returns true if the token at `index` belongs to this list (brackets included)
    pub fn contains_index(&self, index: usize) -> bool {
        index >= self.open && index <= self.close.unwrap_or(self.end.saturating_sub(1))
    }

    /// Index of the first arrow inside the list, if any
    pub fn arrow(&self, tokens: &[Token]) -> Option<usize> {
        self.inner().find(|&i| tokens[i].kind == TokenKind::Arrow)
    }

    /// Parameter names (references before the first arrow)
    pub fn parameter_names(&self, tokens: &[Token]) -> Vec<String> {
        let end = self.arrow(tokens).unwrap_or(self.end);
        (self.open + 1..end)
            .map(|i| &tokens[i])
            .filter(|t| t.kind == TokenKind::Reference)
            .map(|t| t.text.clone())
            .collect()
    }
}

/// Finds every top-level parameter list
pub fn scan_parameter_lists(tokens: &[Token]) -> Vec<ParamListSpan> {
    let mut spans = Vec::new();
    let mut open: Option<usize> = None;
    let mut depth = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::OpenParen => {
                if depth == 0 {
                    open = Some(i);
                }
                depth += 1;
            }
            TokenKind::CloseParen if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(start) = open.take() {
                        spans.push(ParamListSpan {
                            open: start,
                            close: Some(i),
                            end: i,
                        });
                    }
                }
            }
            TokenKind::OpenBrace | TokenKind::CloseBrace => {
                // Bodies never live inside a parameter list; treat it as unclosed
                if let Some(start) = open.take() {
                    spans.push(ParamListSpan {
                        open: start,
                        close: None,
                        end: i,
                    });
                    depth = 0;
                }
            }
            _ => {}
        }
    }

    if let Some(start) = open {
        spans.push(ParamListSpan {
            open: start,
            close: None,
            end: tokens.len(),
        });
    }

    spans
}

/// Whether a body belongs to a named function or an anonymous lambda
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallableKind {
    Function,
    Lambda,
}

/// A function or lambda body together with its parameter names
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callable {
    pub kind: CallableKind,
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Range,
}

/// A data definition and the fields it declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDef {
    pub name: String,
    pub declared_at: Position,
    pub fields: Vec<String>,
}

impl DataDef {
    /// Lower-cased prefix every generated name starts with
    pub fn prefix(&self) -> String {
        self.name.to_lowercase()
    }

    /// Constructor, predicate and per-field getter/setter/updater names
    pub fn generated_names(&self) -> Vec<String> {
        let prefix = self.prefix();
        let mut names = vec![format!("{}-new", prefix), format!("{}?", prefix)];
        for field in &self.fields {
            names.push(format!("{}-{}", prefix, field));
            names.push(format!("{}-{}-set", prefix, field));
            names.push(format!("{}-{}-do", prefix, field));
        }
        names
    }
}

/// Definitions found in one token sequence
#[derive(Debug, Clone, Default)]
pub struct Definitions {
    pub spans: Vec<ParamListSpan>,
    pub functions: BTreeSet<String>,
    pub variables: BTreeSet<String>,
    pub datadefs: Vec<DataDef>,
    pub callables: Vec<Callable>,
    generated: BTreeSet<String>,
    declaration_names: BTreeSet<usize>,
}

impl Definitions {
    pub fn collect(tokens: &[Token]) -> Self {
        let spans = scan_parameter_lists(tokens);
        let span_at: HashMap<usize, ParamListSpan> = spans.iter().map(|s| (s.open, *s)).collect();
        let mut defs = Definitions {
            spans: spans.clone(),
            ..Default::default()
        };
        let mut owned_spans = BTreeSet::new();

        for (k, token) in tokens.iter().enumerate() {
            if let Some(name) = token.assigned_name() {
                defs.variables.insert(name.to_string());
                continue;
            }
            if token.kind != TokenKind::Keyword {
                continue;
            }
            let Some(name_token) = tokens.get(k + 1).filter(|t| t.kind == TokenKind::Reference)
            else {
                continue;
            };
            let span = span_at.get(&(k + 2)).copied();

            match token.text.as_str() {
                "fn" => {
                    owned_spans.extend(span.map(|s| s.open));
                    defs.declaration_names.insert(k + 1);
                    defs.functions.insert(name_token.text.clone());
                    let body_open = match span {
                        Some(span) => span.close.map(|c| c + 1),
                        None => Some(k + 2),
                    };
                    if let Some(body) = body_open.and_then(|b| body_range(tokens, b)) {
                        defs.callables.push(Callable {
                            kind: CallableKind::Function,
                            name: Some(name_token.text.clone()),
                            params: span.map(|s| s.parameter_names(tokens)).unwrap_or_default(),
                            body,
                        });
                    }
                }
                "datadef" => {
                    owned_spans.extend(span.map(|s| s.open));
                    defs.declaration_names.insert(k + 1);
                    defs.datadefs.push(DataDef {
                        name: name_token.text.clone(),
                        declared_at: token.start(),
                        fields: span.map(|s| s.parameter_names(tokens)).unwrap_or_default(),
                    });
                }
                _ => {}
            }
        }

        for span in &spans {
            if owned_spans.contains(&span.open) {
                continue;
            }
            if let Some(body) = span.close.and_then(|c| body_range(tokens, c + 1)) {
                defs.callables.push(Callable {
                    kind: CallableKind::Lambda,
                    name: None,
                    params: span.parameter_names(tokens),
                    body,
                });
            }
        }

        defs.generated = defs
            .datadefs
            .iter()
            .flat_map(DataDef::generated_names)
            .collect();
        defs
    }

    /// Returns true if the token at `index` names a `fn` or `datadef`
    pub fn is_declaration_name(&self, index: usize) -> bool {
        self.declaration_names.contains(&index)
    }

    /// Returns true if the token at `index` sits inside any parameter list
    pub fn in_parameter_list(&self, index: usize) -> bool {
        self.spans.iter().any(|s| s.contains_index(index))
    }

    /// Returns true if a datadef named `name` is declared before `at`
    pub fn datadef_declared_before(&self, name: &str, at: Position) -> bool {
        self.datadefs
            .iter()
            .any(|d| d.name == name && d.declared_at < at)
    }

    pub fn is_generated(&self, name: &str) -> bool {
        self.generated.contains(name)
    }

    /// Callables whose body contains `position`
    pub fn enclosing(&self, position: Position) -> impl Iterator<Item = &Callable> {
        self.callables
            .iter()
            .filter(move |c| c.body.contains(position))
    }
}

/// Range of the executable array opening at `open`, to its matching `}`
///
/// An unclosed body extends to the end of the source.
fn body_range(tokens: &[Token], open: usize) -> Option<Range> {
    let first = tokens.get(open).filter(|t| t.kind == TokenKind::OpenBrace)?;
    let mut depth = 0usize;
    for token in &tokens[open..] {
        match token.kind {
            TokenKind::OpenBrace => depth += 1,
            TokenKind::CloseBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(Range::new(first.start(), token.end()));
                }
            }
            _ => {}
        }
    }
    Some(Range::new(first.start(), Position::max()))
}
