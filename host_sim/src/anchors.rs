//! Anchored ranges over an in-memory string
//!
//! Anchors are stored as character offsets. Replacing the text computes a
//! single edit from the common prefix and suffix of the old and new text and
//! moves every anchor through it.

use services_breakpoints::AnchorStore;
use source_types::{AnchorId, Position, Range};
use std::collections::HashMap;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Edit {
    start: usize,
    deleted: usize,
    inserted: usize,
}

impl Edit {
    /// New location of `offset`, or `None` if the edit deleted it
    ///
    /// An insertion exactly at `offset` pushes it right. A replacement that
    /// starts exactly at `offset` keeps it in place; a pure deletion there
    /// removes it.
    fn map(&self, offset: usize) -> Option<usize> {
        if offset < self.start {
            Some(offset)
        } else if offset >= self.start + self.deleted {
            Some(offset - self.deleted + self.inserted)
        } else if offset == self.start && self.inserted > 0 {
            Some(offset)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Span {
    start: usize,
    end: usize,
}

/// [`AnchorStore`] over a string that is replaced wholesale on each edit
#[derive(Debug, Default)]
pub struct MemoryAnchorStore {
    text: Vec<char>,
    line_starts: Vec<usize>,
    anchors: HashMap<AnchorId, Span>,
}

impl MemoryAnchorStore {
    pub fn new(text: &str) -> Self {
        let mut store = Self::default();
        store.set_chars(text.chars().collect());
        store
    }

    pub fn text(&self) -> String {
        self.text.iter().collect()
    }

    /// Number of live anchors
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Replaces the whole text, moving anchors through the difference
    pub fn replace_text(&mut self, text: &str) {
        let new: Vec<char> = text.chars().collect();
        let prefix = self
            .text
            .iter()
            .zip(&new)
            .take_while(|(a, b)| a == b)
            .count();
        let room = self.text.len().min(new.len()) - prefix;
        let suffix = self
            .text
            .iter()
            .rev()
            .zip(new.iter().rev())
            .take(room)
            .take_while(|(a, b)| a == b)
            .count();

        let edit = Edit {
            start: prefix,
            deleted: self.text.len() - prefix - suffix,
            inserted: new.len() - prefix - suffix,
        };
        self.apply(edit);
        self.set_chars(new);
    }

    /// Replaces `range` with `replacement`
    ///
    /// Returns false if the range lies outside the text.
    pub fn replace_range(&mut self, range: Range, replacement: &str) -> bool {
        let (Some(start), Some(end)) = (self.offset_of(range.start), self.offset_of(range.end))
        else {
            return false;
        };
        if end < start {
            return false;
        }
        let inserted: Vec<char> = replacement.chars().collect();
        self.apply(Edit {
            start,
            deleted: end - start,
            inserted: inserted.len(),
        });
        let mut text = self.text[..start].to_vec();
        text.extend(inserted);
        text.extend_from_slice(&self.text[end..]);
        self.set_chars(text);
        true
    }

    fn apply(&mut self, edit: Edit) {
        if edit.deleted == 0 && edit.inserted == 0 {
            return;
        }
        self.anchors.retain(|id, span| match edit.map(span.start) {
            Some(start) => {
                let end = edit.map(span.end).unwrap_or(edit.start + edit.inserted);
                *span = Span {
                    start,
                    end: end.max(start),
                };
                true
            }
            None => {
                trace!(anchor = %id, "anchor decayed");
                false
            }
        });
    }

    fn set_chars(&mut self, text: Vec<char>) {
        self.line_starts = std::iter::once(0)
            .chain(
                text.iter()
                    .enumerate()
                    .filter(|(_, c)| **c == '\n')
                    .map(|(i, _)| i + 1),
            )
            .collect();
        self.text = text;
    }

    fn line_len(&self, line: usize) -> Option<usize> {
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.text.len());
        Some(end - start)
    }

    fn offset_of(&self, position: Position) -> Option<usize> {
        let len = self.line_len(position.line)?;
        if position.col > len {
            return None;
        }
        Some(self.line_starts[position.line] + position.col)
    }

    fn position_of(&self, offset: usize) -> Position {
        let line = self
            .line_starts
            .partition_point(|start| *start <= offset)
            .saturating_sub(1);
        Position::new(line, offset - self.line_starts[line])
    }
}

impl AnchorStore for MemoryAnchorStore {
    fn create(&mut self, range: Range) -> Option<AnchorId> {
        let start = self.offset_of(range.start)?;
        let end = self.offset_of(range.end)?;
        if end < start {
            return None;
        }
        let id = AnchorId::new();
        self.anchors.insert(id, Span { start, end });
        Some(id)
    }

    fn resolve(&self, anchor: AnchorId) -> Option<Range> {
        let span = self.anchors.get(&anchor)?;
        Some(Range::new(
            self.position_of(span.start),
            self.position_of(span.end),
        ))
    }

    fn remove(&mut self, anchor: AnchorId) {
        self.anchors.remove(&anchor);
    }
}
