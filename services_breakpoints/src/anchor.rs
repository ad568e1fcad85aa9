//! Anchored-range seam to the host editor surface

use source_types::{AnchorId, Range};

/// Host-maintained ranges that move with text edits
///
/// Implementations decide how anchors follow edits (rope, piece table, or
/// plain string diffing). An anchor whose text was deleted resolves to `None`.
pub trait AnchorStore {
    /// Creates an anchor over `range`; `None` if the host refuses it
    fn create(&mut self, range: Range) -> Option<AnchorId>;

    /// Current range of an anchor, or `None` if it has decayed or is unknown
    fn resolve(&self, anchor: AnchorId) -> Option<Range>;

    /// Forgets an anchor; unknown IDs are ignored
    fn remove(&mut self, anchor: AnchorId);
}

impl<T: AnchorStore + ?Sized> AnchorStore for Box<T> {
    fn create(&mut self, range: Range) -> Option<AnchorId> {
        (**self).create(range)
    }

    fn resolve(&self, anchor: AnchorId) -> Option<Range> {
        (**self).resolve(anchor)
    }

    fn remove(&mut self, anchor: AnchorId) {
        (**self).remove(anchor)
    }
}
