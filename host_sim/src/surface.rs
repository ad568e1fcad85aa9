//! Surface that remembers what was published

use services_publisher::{Decoration, DecorationLayer, Glyph, HostSurface, Marker};
use source_types::BreakpointKind;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    markers: Vec<Marker>,
    layers: BTreeMap<DecorationLayer, Vec<Decoration>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn decorations(&self, layer: DecorationLayer) -> &[Decoration] {
        self.layers.get(&layer).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Line numbers (one-based) carrying a breakpoint glyph of `kind`
    pub fn breakpoint_lines(&self, kind: BreakpointKind) -> Vec<usize> {
        self.decorations(DecorationLayer::Breakpoints)
            .iter()
            .filter(|d| d.glyph == Glyph::Breakpoint(kind))
            .map(|d| d.range.start.line_number)
            .collect()
    }

    /// One-based line of the execution highlight
    pub fn current_line(&self) -> Option<usize> {
        self.decorations(DecorationLayer::Execution)
            .first()
            .map(|d| d.range.start.line_number)
    }
}

impl HostSurface for RecordingSurface {
    fn set_markers(&mut self, markers: Vec<Marker>) {
        self.markers = markers;
    }

    fn set_decorations(&mut self, layer: DecorationLayer, decorations: Vec<Decoration>) {
        self.layers.insert(layer, decorations);
    }
}
