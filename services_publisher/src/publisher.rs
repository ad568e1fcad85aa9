//! Conversion into surface primitives

use crate::surface::{Decoration, DecorationLayer, Glyph, HostSurface, Marker};
use source_types::{Breakpoint, BreakpointKind, Diagnostic, ExecutionPosition, Range};
use tracing::trace;

pub fn markers_for(diagnostics: &[Diagnostic]) -> Vec<Marker> {
    diagnostics
        .iter()
        .map(|d| Marker {
            severity: d.severity,
            message: d.message.clone(),
            range: d.range.to_surface(),
        })
        .collect()
}

/// One gutter glyph per breakpoint, hovering the condition if any
pub fn breakpoint_decorations(breakpoints: &[Breakpoint]) -> Vec<Decoration> {
    breakpoints
        .iter()
        .map(|bp| Decoration {
            range: Range::point(bp.position).to_surface(),
            glyph: Glyph::Breakpoint(bp.kind),
            whole_line: false,
            hover: bp.expression.as_ref().map(|expr| match bp.kind {
                BreakpointKind::HitCount => format!("hit count: {}", expr),
                BreakpointKind::Log => format!("log: {}", expr),
                _ => format!("condition: {}", expr),
            }),
        })
        .collect()
}

/// Current-line highlight; empty when there is no position
pub fn execution_decorations(position: Option<&ExecutionPosition>) -> Vec<Decoration> {
    position
        .map(|pos| Decoration {
            range: Range::of_token(&pos.token).to_surface(),
            glyph: Glyph::CurrentLine,
            whole_line: true,
            hover: None,
        })
        .into_iter()
        .collect()
}

/// Pushes converted state to a [`HostSurface`]
pub struct Publisher<H: HostSurface> {
    surface: H,
}

impl<H: HostSurface> Publisher<H> {
    pub fn new(surface: H) -> Self {
        Self { surface }
    }

    pub fn surface(&self) -> &H {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut H {
        &mut self.surface
    }

    pub fn publish_diagnostics(&mut self, diagnostics: &[Diagnostic]) {
        trace!(count = diagnostics.len(), "publishing markers");
        self.surface.set_markers(markers_for(diagnostics));
    }

    pub fn publish_breakpoints(&mut self, breakpoints: &[Breakpoint]) {
        trace!(count = breakpoints.len(), "publishing breakpoint glyphs");
        self.surface
            .set_decorations(DecorationLayer::Breakpoints, breakpoint_decorations(breakpoints));
    }

    pub fn publish_position(&mut self, position: Option<&ExecutionPosition>) {
        self.surface
            .set_decorations(DecorationLayer::Execution, execution_decorations(position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use source_types::{
        AnchorId, DiagnosticCode, Position, Severity, SurfacePosition, Token, TokenKind,
    };
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct Surface {
        markers: Vec<Marker>,
        layers: BTreeMap<DecorationLayer, Vec<Decoration>>,
    }

    impl HostSurface for Surface {
        fn set_markers(&mut self, markers: Vec<Marker>) {
            self.markers = markers;
        }

        fn set_decorations(&mut self, layer: DecorationLayer, decorations: Vec<Decoration>) {
            self.layers.insert(layer, decorations);
        }
    }

    #[test]
    fn test_markers_are_one_based() {
        let diagnostic = Diagnostic::warning(
            DiagnosticCode::ShadowedBuiltin,
            "parameter `a` shadows a built-in function",
            Range::new(Position::new(0, 1), Position::new(0, 2)),
        );
        let markers = markers_for(&[diagnostic]);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].severity, Severity::Warning);
        assert_eq!(markers[0].range.start, SurfacePosition::new(1, 2));
        assert_eq!(markers[0].range.end, SurfacePosition::new(1, 3));
    }

    #[test]
    fn test_breakpoint_glyphs() {
        let mut hit = Breakpoint::unconditional(AnchorId::new(), Position::new(2, 4));
        hit.kind = BreakpointKind::HitCount;
        hit.expression = Some("3".to_string());
        let plain = Breakpoint::unconditional(AnchorId::new(), Position::new(0, 0));

        let decorations = breakpoint_decorations(&[plain, hit]);
        assert_eq!(decorations[0].glyph, Glyph::Breakpoint(BreakpointKind::Unconditional));
        assert!(decorations[0].hover.is_none());
        assert_eq!(decorations[1].range.start, SurfacePosition::new(3, 5));
        assert_eq!(decorations[1].hover.as_deref(), Some("hit count: 3"));
    }

    #[test]
    fn test_publish_replaces_layers() {
        let mut publisher = Publisher::new(Surface::default());
        let token = Token::new(TokenKind::Reference, "println", 0, 9, 16);
        let position = ExecutionPosition::at_token(token);

        publisher.publish_position(Some(&position));
        let layer = &publisher.surface().layers[&DecorationLayer::Execution];
        assert_eq!(layer.len(), 1);
        assert!(layer[0].whole_line);
        assert_eq!(layer[0].range.start, SurfacePosition::new(1, 10));

        publisher.publish_position(None);
        assert!(publisher.surface().layers[&DecorationLayer::Execution].is_empty());

        publisher.publish_diagnostics(&[]);
        assert!(publisher.surface().markers.is_empty());
        assert!(!publisher.surface().layers.contains_key(&DecorationLayer::Breakpoints));
    }
}
