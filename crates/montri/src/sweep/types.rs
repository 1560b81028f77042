//! Data types for the triangulation sweep and its recorded state.
//!
//! Kept small and explicit to make `run` easy to read. The patch operations
//! form a closed set with hand-written inverses; a recorded step stores one
//! patch list per direction, both built at record time.

use std::fmt;

use thiserror::Error;

use crate::polygon::Vertex;
use crate::trace::Patch;

/// A line segment between two non-adjacent polygon vertices. Unordered:
/// `(a, b)` equals `(b, a)`.
#[derive(Clone, Copy, Debug)]
pub struct Diagonal(pub Vertex, pub Vertex);

impl PartialEq for Diagonal {
    fn eq(&self, other: &Self) -> bool {
        (self.0 == other.0 && self.1 == other.1) || (self.0 == other.1 && self.1 == other.0)
    }
}

impl Eq for Diagonal {}

impl fmt::Display for Diagonal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.0, self.1)
    }
}

/// The value threaded through the state trace. Immutable between steps:
/// every transition builds a new value via patches, never an in-place
/// mutation visible to consumers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TriangulationState {
    /// Work queue; used as a queue at the front and a stack at the back.
    pub queue: Vec<Vertex>,
    /// Accumulated diagonals; permanent once added.
    pub diagonals: Vec<Diagonal>,
    /// All vertices in sweep order; fixed after the initial sort.
    pub sorted_vertices: Vec<Vertex>,
    /// The vertex the sweep is currently looking at, if any.
    pub active_vertex: Option<Vertex>,
}

/// Closed set of state mutations. Each recorded step carries the forward
/// operations and their exact inverses, so no structural diffing is needed
/// at traversal time.
#[derive(Clone, Debug)]
pub enum StatePatch {
    /// Marker step with no state change.
    Noop,
    SetSortedVertices(Vec<Vertex>),
    SetActive(Option<Vertex>),
    /// Append to the back of the queue.
    PushBack(Vec<Vertex>),
    /// Drop `n` vertices from the back of the queue.
    PopBack(usize),
    /// Remove the front of the queue.
    PopFront,
    /// Re-insert at the front of the queue.
    PushFront(Vertex),
    /// Remove the queue element at an index.
    RemoveAt(usize),
    /// Re-insert a queue element at an index.
    InsertAt(usize, Vertex),
    PushDiagonal(Diagonal),
    PopDiagonal,
}

impl Patch<TriangulationState> for StatePatch {
    fn apply(&self, state: &TriangulationState) -> TriangulationState {
        let mut next = state.clone();
        match self {
            StatePatch::Noop => {}
            StatePatch::SetSortedVertices(vs) => next.sorted_vertices = vs.clone(),
            StatePatch::SetActive(v) => next.active_vertex = *v,
            StatePatch::PushBack(vs) => next.queue.extend(vs.iter().copied()),
            StatePatch::PopBack(n) => {
                let keep = next.queue.len().saturating_sub(*n);
                next.queue.truncate(keep);
            }
            StatePatch::PopFront => {
                if !next.queue.is_empty() {
                    next.queue.remove(0);
                }
            }
            StatePatch::PushFront(v) => next.queue.insert(0, *v),
            StatePatch::RemoveAt(i) => {
                if *i < next.queue.len() {
                    next.queue.remove(*i);
                }
            }
            StatePatch::InsertAt(i, v) => {
                let i = (*i).min(next.queue.len());
                next.queue.insert(i, *v);
            }
            StatePatch::PushDiagonal(d) => next.diagonals.push(*d),
            StatePatch::PopDiagonal => {
                next.diagonals.pop();
            }
        }
        next
    }
}

/// Orientation of the turn over three consecutively queued vertices.
///
/// The third variant is not an error: it marks the point where chain
/// classification stops applying, which legitimately happens at the
/// rightmost vertex where both chains meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Turn {
    Inward,
    Outward,
    Indeterminate,
}

/// Result of a completed run. Non-monotone input is a normal outcome, not an
/// error, but it is its own variant so call sites cannot miss it.
#[derive(Clone, Debug)]
pub enum TriangulationOutcome {
    /// The sweep consumed every sorted vertex.
    Triangulated(TriangulationState),
    /// x-monotonicity failed at `violation`. The state is exactly as it was
    /// at detection: `active_vertex` names the offender and no diagonals
    /// were added past that point.
    NotMonotone {
        state: TriangulationState,
        violation: Vertex,
    },
}

impl TriangulationOutcome {
    pub fn state(&self) -> &TriangulationState {
        match self {
            TriangulationOutcome::Triangulated(state) => state,
            TriangulationOutcome::NotMonotone { state, .. } => state,
        }
    }

    #[inline]
    pub fn is_monotone(&self) -> bool {
        matches!(self, TriangulationOutcome::Triangulated(_))
    }
}

/// Hard failures: malformed input or a broken internal invariant. Expected
/// conditions (non-monotone input, degenerate-diagonal skips, navigation
/// past the trace bounds) never surface here.
#[derive(Debug, Error)]
pub enum TriangulationError {
    #[error("polygon needs at least 3 vertices, got {got}")]
    TooFewVertices { got: usize },
    #[error("sweep invariant broken: {detail}")]
    BrokenSweepInvariant { detail: String },
}
