//! The sweep itself: sort, monotonicity pre-check, queue/stack reduction.
//!
//! Purpose
//! - Drive the triangulation as a linear pass over the x-sorted vertices
//!   with a bounded inner reduction loop, recording every transition.
//!
//! Model
//! - `SweepRunner` owns the evolving state value and the trace builder.
//!   Every mutation goes through `record`, which applies the forward patches
//!   and replaces the state wholesale, so the trace and the state cannot
//!   diverge.
//! - The recorded trace is returned with its cursor at step 0; callers play
//!   it forward to watch the run.

use std::cmp::Ordering;

use nalgebra::Vector2;
use tracing::debug;

use crate::cross_z;
use crate::polygon::{Chain, Polygon, Vertex};
use crate::trace::{Patch, StateTrace};

use super::types::{
    Diagonal, StatePatch, TriangulationError, TriangulationOutcome, TriangulationState, Turn,
};

/// Trace type produced by a triangulation run.
pub type Trace = StateTrace<TriangulationState, StatePatch>;

/// A single triangulation of a specific polygon that records the steps of
/// the algorithm.
#[derive(Debug)]
pub struct Triangulation {
    polygon: Polygon,
    trace: Option<Trace>,
}

impl Triangulation {
    /// The input points are copied at construction, so later mutation of the
    /// caller's buffer cannot affect a run.
    pub fn new(points: &[Vector2<f64>]) -> Self {
        Self {
            polygon: Polygon::new(points),
            trace: None,
        }
    }

    #[inline]
    pub fn polygon(&self) -> &Polygon {
        &self.polygon
    }

    /// Trace of the most recent `triangulate` call, positioned at step 0.
    #[inline]
    pub fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Mutable access for playback (`forward`/`backward`/`go_to_step`).
    #[inline]
    pub fn trace_mut(&mut self) -> Option<&mut Trace> {
        self.trace.as_mut()
    }

    /// Run the sweep. Replaces any previously recorded trace with a fresh
    /// one. Non-monotone input is reported through the outcome, not as an
    /// error.
    pub fn triangulate(&mut self) -> Result<TriangulationOutcome, TriangulationError> {
        if self.polygon.len() < 3 {
            return Err(TriangulationError::TooFewVertices {
                got: self.polygon.len(),
            });
        }
        let mut runner = SweepRunner::new(&self.polygon);
        let outcome = runner.run()?;
        self.trace = Some(runner.into_trace());
        Ok(outcome)
    }
}

/// Sweep context: the current state value plus the trace builder, with the
/// queue/diagonal operations as methods.
struct SweepRunner<'a> {
    polygon: &'a Polygon,
    state: TriangulationState,
    trace: Trace,
}

impl<'a> SweepRunner<'a> {
    fn new(polygon: &'a Polygon) -> Self {
        let state = TriangulationState::default();
        let trace = StateTrace::new(state.clone());
        Self {
            polygon,
            state,
            trace,
        }
    }

    fn into_trace(self) -> Trace {
        self.trace
    }

    fn run(&mut self) -> Result<TriangulationOutcome, TriangulationError> {
        let sorted = self.sort_vertices();
        if let Some(violation) = self.check_monotonicity(&sorted) {
            return Ok(TriangulationOutcome::NotMonotone {
                state: self.state.clone(),
                violation,
            });
        }
        self.mark(
            "vertices are visited in sort order from here on; \
             chain classification is now meaningful",
        );
        self.enqueue(sorted[..2].to_vec());

        for (pos, &v) in sorted.iter().enumerate().skip(2) {
            let last = match self.state.queue.last() {
                Some(&last) => last,
                None => {
                    return Err(TriangulationError::BrokenSweepInvariant {
                        detail: format!("queue drained before visiting {v}"),
                    })
                }
            };
            debug!(vertex = %v, queue = self.state.queue.len(), "sweep step");
            if v.is_adjacent_to(self.polygon, &last) {
                self.set_active(v, format!("next vertex {v} is on the same chain as {last}"));
                self.enqueue(vec![v]);
                self.reduce_same_chain(v, pos == sorted.len() - 1)?;
            } else {
                self.set_active(
                    v,
                    format!("next vertex {v} is on the opposite chain from {last}"),
                );
                while self.state.queue.len() > 1 {
                    let front = self.state.queue[0];
                    self.dequeue_with_diagonal(front, v);
                }
                // The last queued vertex gets a diagonal but stays queued.
                let remaining = self.state.queue[0];
                self.add_diagonal(remaining, v);
                self.enqueue(vec![v]);
            }
        }
        Ok(TriangulationOutcome::Triangulated(self.state.clone()))
    }

    /// Sort ascending by `(x, y, original index)`. The secondary keys are a
    /// deliberate, fixed tie-break: equal-x pairs keep a deterministic order
    /// that preserves chain alternation (lower vertex first).
    fn sort_vertices(&mut self) -> Vec<Vertex> {
        let mut vs: Vec<Vertex> = self.polygon.vertices().collect();
        vs.sort_by(|a, b| {
            (a.position.x, a.position.y, a.index)
                .partial_cmp(&(b.position.x, b.position.y, b.index))
                .unwrap_or(Ordering::Equal)
        });
        self.record(
            "sort vertices by x coordinate",
            vec![StatePatch::SetSortedVertices(vs.clone())],
            vec![StatePatch::SetSortedVertices(Vec::new())],
        );
        vs
    }

    /// A vertex other than the two sweep extremes whose neighbors both lie
    /// strictly left or strictly right of it breaks x-monotonicity. Returns
    /// the first offender in sweep order, with the violation recorded.
    fn check_monotonicity(&mut self, sorted: &[Vertex]) -> Option<Vertex> {
        for &v in &sorted[1..sorted.len() - 1] {
            let next_x = v.next(self.polygon).position.x;
            let prev_x = v.prev(self.polygon).position.x;
            let x = v.position.x;
            let both_left = next_x < x && prev_x < x;
            let both_right = next_x > x && prev_x > x;
            if both_left || both_right {
                let side = if both_left { "left" } else { "right" };
                let previous = self.state.active_vertex;
                self.record(
                    format!(
                        "{v} has both neighbours to its {side}: \
                         the polygon is not x-monotone, stopping"
                    ),
                    vec![StatePatch::SetActive(Some(v))],
                    vec![StatePatch::SetActive(previous)],
                );
                return Some(v);
            }
        }
        None
    }

    /// Inner loop after a same-chain arrival: inspect the last three queued
    /// vertices and cut ears while the turn points inward.
    fn reduce_same_chain(
        &mut self,
        v: Vertex,
        is_rightmost: bool,
    ) -> Result<(), TriangulationError> {
        while self.state.queue.len() >= 3 {
            let n = self.state.queue.len();
            let (a, b, c) = (
                self.state.queue[n - 3],
                self.state.queue[n - 2],
                self.state.queue[n - 1],
            );
            match turn(self.polygon, a, b, c) {
                Turn::Indeterminate => {
                    // Legitimate only where both chains meet.
                    if !is_rightmost {
                        return Err(TriangulationError::BrokenSweepInvariant {
                            detail: format!(
                                "chain classification ambiguous at {c}, \
                                 which is not the rightmost vertex"
                            ),
                        });
                    }
                    self.mark(format!("{c} is the rightmost vertex; both chains end here"));
                    break;
                }
                Turn::Inward => self.cut_ear(a, b, c),
                Turn::Outward => {
                    self.mark(format!(
                        "the turn at {b} points outward; \
                         no diagonal can be added from {v}"
                    ));
                    break;
                }
            }
        }
        Ok(())
    }

    /// Inward turn at `b`: the diagonal `(a, c)` closes the triangle and `b`
    /// leaves the queue. When `a` and `c` are polygon neighbours the
    /// diagonal would be an existing edge, so only the removal happens.
    fn cut_ear(&mut self, a: Vertex, b: Vertex, c: Vertex) {
        let i = self.state.queue.len() - 2;
        let mut forward = Vec::new();
        let mut backward = vec![StatePatch::InsertAt(i, b)];
        let description = if a.is_adjacent_to(self.polygon, &c) {
            format!("{a} and {c} are polygon neighbours; skip the degenerate diagonal, drop {b}")
        } else {
            forward.push(StatePatch::PushDiagonal(Diagonal(a, c)));
            backward.push(StatePatch::PopDiagonal);
            format!("inward turn at {b}: add diagonal {a}-{c}, drop {b} from the queue")
        };
        forward.push(StatePatch::RemoveAt(i));
        self.record(description, forward, backward);
    }

    /// Opposite-chain flush: the front vertex leaves the queue and, unless
    /// it is a polygon neighbour of `v`, donates a diagonal to `v`.
    fn dequeue_with_diagonal(&mut self, front: Vertex, v: Vertex) {
        let mut forward = vec![StatePatch::PopFront];
        let mut backward = vec![StatePatch::PushFront(front)];
        let description = if front.is_adjacent_to(self.polygon, &v) {
            format!("{front} leaves the queue; {front} and {v} are polygon neighbours, no diagonal")
        } else {
            forward.push(StatePatch::PushDiagonal(Diagonal(front, v)));
            backward.push(StatePatch::PopDiagonal);
            format!("{front} leaves the queue; add diagonal {front}-{v}")
        };
        self.record(description, forward, backward);
    }

    /// Diagonal without a dequeue, for the final queued vertex of an
    /// opposite-chain flush. Adjacent pairs are recorded as skips.
    fn add_diagonal(&mut self, from: Vertex, v: Vertex) {
        if from.is_adjacent_to(self.polygon, &v) {
            self.mark(format!(
                "{from} and {v} are polygon neighbours; skip the degenerate diagonal"
            ));
        } else {
            self.record(
                format!("add diagonal {from}-{v}"),
                vec![StatePatch::PushDiagonal(Diagonal(from, v))],
                vec![StatePatch::PopDiagonal],
            );
        }
    }

    fn enqueue(&mut self, vertices: Vec<Vertex>) {
        let label = vertices
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let count = vertices.len();
        self.record(
            format!("add [{label}] to the queue"),
            vec![StatePatch::PushBack(vertices)],
            vec![StatePatch::PopBack(count)],
        );
    }

    fn set_active(&mut self, v: Vertex, description: String) {
        let previous = self.state.active_vertex;
        self.record(
            description,
            vec![StatePatch::SetActive(Some(v))],
            vec![StatePatch::SetActive(previous)],
        );
    }

    /// Marker step: descriptive only, no state change.
    fn mark(&mut self, description: impl Into<String>) {
        self.record(description, vec![StatePatch::Noop], vec![StatePatch::Noop]);
    }

    /// Apply `forward` to the current state, replace it wholesale, and
    /// append the step. `backward` must be the exact inverse, listed in the
    /// order it should be applied.
    fn record(
        &mut self,
        description: impl Into<String>,
        forward: Vec<StatePatch>,
        backward: Vec<StatePatch>,
    ) {
        let mut next = self.state.clone();
        for patch in &forward {
            next = patch.apply(&next);
        }
        self.state = next;
        self.trace.record_change(description, forward, backward);
    }
}

/// Turn orientation over consecutively queued `(a, b, c)`, classified by the
/// chains of `b` and `c`.
///
/// The cross-product sign convention flips per chain because the two chains
/// traverse the boundary in opposite directions: on the bottom chain a
/// negative cross-z is inward, on the top chain a positive one.
fn turn(polygon: &Polygon, a: Vertex, b: Vertex, c: Vertex) -> Turn {
    let cross = || cross_z(b.position - a.position, c.position - b.position);
    let inward = match (b.chain(polygon), c.chain(polygon)) {
        (Some(Chain::Bottom), Some(Chain::Bottom)) => cross() < 0.0,
        (Some(Chain::Top), Some(Chain::Top)) => cross() > 0.0,
        _ => return Turn::Indeterminate,
    };
    if inward {
        Turn::Inward
    } else {
        Turn::Outward
    }
}
