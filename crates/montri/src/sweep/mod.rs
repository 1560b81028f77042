//! Monotone-polygon triangulation sweep.
//!
//! Purpose
//! - Run the single-pass, queue/stack triangulation of a simple x-monotone
//!   polygon: sort by x, pre-check monotonicity, classify each vertex by
//!   chain, test turn orientation by cross-product sign, and emit diagonals.
//! - Record every state mutation into a `StateTrace` as a reversible step,
//!   so the whole run can be replayed in either direction.
//!
//! Invariants
//! - The queue is always a subsequence of the sorted vertices in enqueue
//!   order.
//! - No recorded diagonal ever connects two polygon-adjacent vertices; the
//!   adjacency guard turns such attempts into recorded skips.

pub mod types;

mod run;

pub use run::{Trace, Triangulation};
pub use types::{
    Diagonal, StatePatch, TriangulationError, TriangulationOutcome, TriangulationState, Turn,
};

#[cfg(test)]
mod tests;
