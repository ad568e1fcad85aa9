//! Host editor surface seam

use serde::{Deserialize, Serialize};
use source_types::{BreakpointKind, Severity, SurfaceRange};

/// Diagnostic marker in one-based surface coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Marker {
    pub severity: Severity,
    pub message: String,
    pub range: SurfaceRange,
}

/// Independent decoration sets owned by this layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DecorationLayer {
    /// Gutter glyphs, one per breakpoint
    Breakpoints,
    /// Current execution line highlight
    Execution,
}

/// What a decoration depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Glyph {
    Breakpoint(BreakpointKind),
    CurrentLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoration {
    pub range: SurfaceRange,
    pub glyph: Glyph,
    /// Decorate the whole line rather than just the range
    pub whole_line: bool,
    pub hover: Option<String>,
}

/// Marker and decoration publication provided by the host
pub trait HostSurface {
    /// Replaces the full marker set
    fn set_markers(&mut self, markers: Vec<Marker>);

    /// Replaces every decoration in `layer`
    fn set_decorations(&mut self, layer: DecorationLayer, decorations: Vec<Decoration>);
}

impl<T: HostSurface + ?Sized> HostSurface for Box<T> {
    fn set_markers(&mut self, markers: Vec<Marker>) {
        (**self).set_markers(markers)
    }

    fn set_decorations(&mut self, layer: DecorationLayer, decorations: Vec<Decoration>) {
        (**self).set_decorations(layer, decorations)
    }
}
