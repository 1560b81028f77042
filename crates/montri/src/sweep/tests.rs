//! Scenario and property tests for the sweep.
//!
//! The fixed scenarios were worked out by hand: the expected diagonal sets
//! are what the queue/stack reduction produces for these exact inputs and
//! the (x, y, index) sort tie-break.

use nalgebra::Vector2;
use proptest::prelude::*;

use crate::polygon::Polygon;
use crate::rand::{
    draw_convex_polygon, draw_monotone_polygon, MonotoneCfg, ReplayToken, VertexCount,
};

use super::types::{Diagonal, TriangulationError, TriangulationOutcome, TriangulationState};
use super::Triangulation;

fn points(coords: &[(f64, f64)]) -> Vec<Vector2<f64>> {
    coords.iter().map(|&(x, y)| Vector2::new(x, y)).collect()
}

fn run(coords: &[(f64, f64)]) -> (Triangulation, TriangulationOutcome) {
    let mut tri = Triangulation::new(&points(coords));
    let outcome = tri.triangulate().expect("valid input");
    (tri, outcome)
}

fn diagonal(polygon: &Polygon, i: usize, j: usize) -> Diagonal {
    Diagonal(polygon.vertex(i), polygon.vertex(j))
}

fn assert_no_adjacent_diagonals(polygon: &Polygon, state: &TriangulationState) {
    for d in &state.diagonals {
        assert!(
            !d.0.is_adjacent_to(polygon, &d.1),
            "diagonal {d} connects polygon neighbours"
        );
    }
}

#[test]
fn square_with_x_ties_yields_one_diagonal() {
    let (tri, outcome) = run(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let state = match outcome {
        TriangulationOutcome::Triangulated(state) => state,
        TriangulationOutcome::NotMonotone { violation, .. } => {
            panic!("square flagged non-monotone at {violation}")
        }
    };
    // Tie-break (x, y, index): lower vertex first within each equal-x pair.
    let sorted: Vec<usize> = state.sorted_vertices.iter().map(|v| v.index).collect();
    assert_eq!(sorted, vec![0, 3, 1, 2]);
    assert_eq!(state.diagonals, vec![diagonal(tri.polygon(), 3, 1)]);
    assert_no_adjacent_diagonals(tri.polygon(), &state);
}

#[test]
fn triangle_needs_no_diagonals() {
    let (tri, outcome) = run(&[(0.0, 0.0), (2.0, 1.0), (1.0, 3.0)]);
    assert!(outcome.is_monotone());
    assert!(outcome.state().diagonals.is_empty());
    assert_no_adjacent_diagonals(tri.polygon(), outcome.state());
}

#[test]
fn monotone_hexagon_matches_hand_computed_diagonals() {
    // Bottom chain runs 0 to 3, top chain 3 back to 0; fan diagonals from the alternating
    // chain switches.
    let (tri, outcome) = run(&[
        (0.0, 0.0),
        (2.0, -1.0),
        (4.0, -1.0),
        (6.0, 0.0),
        (4.0, 2.0),
        (2.0, 2.0),
    ]);
    assert!(outcome.is_monotone());
    let p = tri.polygon();
    assert_eq!(
        outcome.state().diagonals,
        vec![diagonal(p, 1, 5), diagonal(p, 5, 2), diagonal(p, 2, 4)]
    );
    assert_no_adjacent_diagonals(p, outcome.state());
}

#[test]
fn clockwise_hexagon_cuts_an_ear_and_matches_diagonals() {
    // Same hexagon listed clockwise: the first reduction is an inward turn
    // that cuts #5 and emits the #0-#4 diagonal.
    let (tri, outcome) = run(&[
        (0.0, 0.0),
        (3.0, 2.0),
        (6.0, 0.0),
        (5.0, -2.0),
        (3.0, -3.0),
        (1.0, -2.0),
    ]);
    assert!(outcome.is_monotone());
    let p = tri.polygon();
    assert_eq!(
        outcome.state().diagonals,
        vec![diagonal(p, 0, 4), diagonal(p, 4, 1), diagonal(p, 1, 3)]
    );
    assert_no_adjacent_diagonals(p, outcome.state());
}

#[test]
fn convex_pentagon_yields_two_diagonals() {
    let (tri, outcome) = run(&[(0.0, 0.0), (1.0, -2.0), (3.0, -2.0), (4.0, 0.0), (2.0, 2.0)]);
    assert!(outcome.is_monotone());
    let p = tri.polygon();
    assert_eq!(
        outcome.state().diagonals,
        vec![diagonal(p, 1, 4), diagonal(p, 4, 2)]
    );
}

#[test]
fn notch_polygon_stops_at_the_violating_vertex() {
    // #2 has both neighbours strictly to its right: not x-monotone.
    let (_, outcome) = run(&[(0.0, 0.0), (3.0, 0.0), (1.0, 1.0), (3.0, 2.0), (0.0, 2.0)]);
    match outcome {
        TriangulationOutcome::NotMonotone { state, violation } => {
            assert_eq!(violation.index, 2);
            assert_eq!(state.active_vertex, Some(violation));
            assert!(state.diagonals.is_empty());
            assert!(state.queue.is_empty());
        }
        TriangulationOutcome::Triangulated(_) => panic!("notch polygon accepted as monotone"),
    }
}

#[test]
fn sideways_w_reports_first_violation_in_sweep_order() {
    // Two interior vertices have both neighbours on one side; the sweep
    // reports the first one it meets in sorted order (#3).
    let (_, outcome) = run(&[
        (3.0, 0.0),
        (0.0, 1.0),
        (2.0, 2.0),
        (0.0, 3.0),
        (3.0, 4.0),
        (1.0, 2.0),
    ]);
    match outcome {
        TriangulationOutcome::NotMonotone { state, violation } => {
            assert_eq!(violation.index, 3);
            assert_eq!(state.active_vertex, Some(violation));
            assert!(state.diagonals.is_empty());
        }
        TriangulationOutcome::Triangulated(_) => panic!("w-polygon accepted as monotone"),
    }
}

#[test]
fn fewer_than_three_vertices_is_a_hard_error() {
    let mut tri = Triangulation::new(&points(&[(0.0, 0.0), (1.0, 1.0)]));
    match tri.triangulate() {
        Err(TriangulationError::TooFewVertices { got }) => assert_eq!(got, 2),
        other => panic!("expected TooFewVertices, got {other:?}"),
    }
    assert!(tri.trace().is_none());
}

#[test]
fn trace_replays_the_square_run_step_by_step() {
    let (mut tri, outcome) = run(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
    let final_state = outcome.state().clone();
    let trace = tri.trace_mut().expect("trace recorded");

    // sort, chain marker, initial enqueue, opposite-chain visit (active,
    // dequeue-skip, diagonal, enqueue), same-chain visit (active, enqueue,
    // rightmost marker).
    assert_eq!(trace.len(), 10);
    assert_eq!(trace.cursor(), 0);
    assert_eq!(*trace.state(), TriangulationState::default());

    // Full forward replay reproduces the final state exactly.
    trace.go_to_step(trace.len());
    assert_eq!(*trace.state(), final_state);

    // forward() past the end is a no-op.
    assert!(trace.forward().is_none());
    assert_eq!(trace.cursor(), 10);
    assert_eq!(*trace.state(), final_state);

    // Back to the start, then backward() is a no-op.
    trace.go_to_step(0);
    assert_eq!(*trace.state(), TriangulationState::default());
    assert!(trace.backward().is_none());
    assert_eq!(trace.cursor(), 0);
}

#[test]
fn navigation_is_deterministic_for_every_cursor_position() {
    let (mut tri, _) = run(&[
        (0.0, 0.0),
        (2.0, -1.0),
        (4.0, -1.0),
        (6.0, 0.0),
        (4.0, 2.0),
        (2.0, 2.0),
    ]);
    let trace = tri.trace_mut().expect("trace recorded");
    let len = trace.len();
    for k in 0..=len {
        trace.go_to_step(k);
        let first = trace.state().clone();
        trace.go_to_step(0);
        trace.go_to_step(k);
        assert_eq!(*trace.state(), first, "cursor {k} replays differently");
    }
}

#[test]
fn rerunning_replaces_the_previous_trace() {
    let mut tri = Triangulation::new(&points(&[
        (0.0, 0.0),
        (2.0, 0.0),
        (2.0, 2.0),
        (0.0, 2.0),
    ]));
    tri.triangulate().expect("first run");
    let first_len = tri.trace().expect("trace").len();
    tri.trace_mut().expect("trace").go_to_step(3);
    tri.triangulate().expect("second run");
    let trace = tri.trace().expect("trace");
    assert_eq!(trace.len(), first_len);
    assert_eq!(trace.cursor(), 0);
}

proptest! {
    #[test]
    fn convex_polygons_yield_exactly_n_minus_3_diagonals(
        n in 4usize..40,
        seed in 0u64..1_000_000,
    ) {
        let cfg = MonotoneCfg {
            vertex_count: VertexCount::Fixed(n),
            ..MonotoneCfg::default()
        };
        let pts = draw_convex_polygon(cfg, ReplayToken { seed, index: 0 });
        let mut tri = Triangulation::new(&pts);
        let outcome = tri.triangulate().expect("convex input");
        match outcome {
            TriangulationOutcome::Triangulated(state) => {
                prop_assert_eq!(state.diagonals.len(), n - 3);
                for d in &state.diagonals {
                    prop_assert!(!d.0.is_adjacent_to(tri.polygon(), &d.1));
                }
            }
            TriangulationOutcome::NotMonotone { violation, .. } => {
                prop_assert!(false, "convex polygon flagged non-monotone at {}", violation);
            }
        }
    }

    #[test]
    fn monotone_polygons_keep_the_sweep_invariants(
        n in 4usize..40,
        seed in 0u64..1_000_000,
    ) {
        let cfg = MonotoneCfg {
            vertex_count: VertexCount::Fixed(n),
            ..MonotoneCfg::default()
        };
        let pts = draw_monotone_polygon(cfg, ReplayToken { seed, index: 1 });
        let mut tri = Triangulation::new(&pts);
        let outcome = tri.triangulate().expect("monotone input");
        prop_assert!(outcome.is_monotone());
        let state = outcome.state();
        prop_assert!(state.diagonals.len() <= n - 3);
        for d in &state.diagonals {
            prop_assert!(!d.0.is_adjacent_to(tri.polygon(), &d.1));
        }
        // The queue stays a subsequence of the sorted vertices.
        let mut sorted_iter = state.sorted_vertices.iter();
        for q in &state.queue {
            prop_assert!(sorted_iter.any(|s| s == q));
        }
    }

    #[test]
    fn replay_round_trips_through_the_patches(
        n in 4usize..24,
        seed in 0u64..1_000_000,
    ) {
        let cfg = MonotoneCfg {
            vertex_count: VertexCount::Fixed(n),
            ..MonotoneCfg::default()
        };
        let pts = draw_monotone_polygon(cfg, ReplayToken { seed, index: 2 });
        let mut tri = Triangulation::new(&pts);
        let final_state = tri.triangulate().expect("monotone input").state().clone();
        let trace = tri.trace_mut().expect("trace recorded");
        trace.go_to_step(trace.len());
        prop_assert_eq!(trace.state(), &final_state);
        trace.go_to_step(0);
        prop_assert_eq!(trace.state(), &TriangulationState::default());
        trace.go_to_step(trace.len());
        prop_assert_eq!(trace.state(), &final_state);
    }
}
