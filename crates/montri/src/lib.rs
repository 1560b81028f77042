//! Monotone-polygon triangulation with a replayable state trace.
//!
//! Purpose
//! - Triangulate a simple, x-monotone polygon with a single queue/stack sweep
//!   over the vertices in x-sorted order.
//! - Record every state mutation of the sweep as a reversible step (forward
//!   and backward patches plus an opaque description), so a caller can replay
//!   the whole computation in either direction for inspection.
//!
//! Layout
//! - `polygon`: vertex identity, neighbor arithmetic, chain classification.
//! - `trace`: the generic replay engine (`StateTrace`), independent of any
//!   particular state type.
//! - `sweep`: the triangulation state, its patch operations, and the sweep
//!   itself.
//! - `rand`: deterministic samplers for monotone and convex polygons used by
//!   tests, benches, and the CLI.

pub mod polygon;
pub mod rand;
pub mod sweep;
pub mod trace;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use nalgebra::Vector2 as Vec2;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::polygon::{Chain, Polygon, PolygonId, Vertex};
    pub use crate::rand::{
        draw_convex_polygon, draw_monotone_polygon, MonotoneCfg, ReplayToken, VertexCount,
    };
    pub use crate::sweep::{
        Diagonal, StatePatch, Triangulation, TriangulationError, TriangulationOutcome,
        TriangulationState, Turn,
    };
    pub use crate::trace::{Patch, StateTrace, Step};
    pub use nalgebra::Vector2 as Vec2;
}

/// Z-component of the cross product of 2D vectors `a` and `b` (the signed
/// area of the parallelogram they span). Positive when `b` lies
/// counterclockwise of `a`, negative otherwise.
#[inline]
pub fn cross_z(a: Vec2<f64>, b: Vec2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}
