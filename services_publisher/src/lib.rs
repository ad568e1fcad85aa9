//! # Publisher Service
//!
//! Adapts diagnostics, breakpoints and the execution cursor into the marker
//! and decoration primitives of the host editor surface.
//!
//! ## Philosophy
//!
//! - **Replace, never patch**: Every publish replaces the whole marker set or
//!   decoration layer; the surface never sees partial updates.
//! - **One-based at the boundary**: Source positions stay zero-based until
//!   they cross into the [`HostSurface`].
//! - **Host-managed presentation**: Only glyph kinds are chosen here; the
//!   host decides how they look.

pub mod publisher;
pub mod surface;

pub use publisher::{breakpoint_decorations, execution_decorations, markers_for, Publisher};
pub use surface::{Decoration, DecorationLayer, Glyph, HostSurface, Marker};
