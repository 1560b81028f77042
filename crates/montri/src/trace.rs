//! Replayable state trace: a generic, bidirectional replay engine.
//!
//! Purpose
//! - Store an initial state plus an append-only list of steps, each carrying
//!   a forward and a backward patch list and an opaque description, and move
//!   the exposed state to any step index by replaying patches.
//!
//! Why diffs, not snapshots
//! - Memory stays proportional to the number and size of the individual
//!   mutations instead of `steps × full-state-size`. Both patch directions
//!   are computed once, at record time, so traversal never has to diff.
//!
//! Model
//! - `cursor ∈ [0, steps.len()]`; the exposed state always equals the fold
//!   of `steps[..cursor]` forward patches over the initial state.
//! - Recording never moves the cursor; the producer records linearly and
//!   never rewinds mid-construction.

use tracing::debug;

/// A minimal structural diff over a state value. Application returns a fresh
/// value; the previous one is never mutated in place.
pub trait Patch<S> {
    fn apply(&self, state: &S) -> S;
}

/// One recorded transition: both patch directions plus an opaque display
/// payload the engine never parses.
#[derive(Clone, Debug)]
pub struct Step<P> {
    /// Applied in order when stepping forward over this step.
    pub forward: Vec<P>,
    /// Applied in order when stepping backward over this step; must be the
    /// exact inverse of `forward`.
    pub backward: Vec<P>,
    pub description: String,
}

/// Records the changes (as steps) to a state value so that they can later be
/// played back, forward and backward.
#[derive(Clone, Debug)]
pub struct StateTrace<S, P> {
    initial: S,
    state: S,
    cursor: usize,
    steps: Vec<Step<P>>,
}

impl<S: Clone, P: Patch<S>> StateTrace<S, P> {
    pub fn new(initial: S) -> Self {
        Self {
            state: initial.clone(),
            initial,
            cursor: 0,
            steps: Vec::new(),
        }
    }

    /// Append a step at the end of recorded history. Unconditional: the
    /// cursor is not consulted and not moved.
    pub fn record_change(
        &mut self,
        description: impl Into<String>,
        forward: Vec<P>,
        backward: Vec<P>,
    ) {
        self.steps.push(Step {
            forward,
            backward,
            description: description.into(),
        });
    }

    /// Apply the next step's forward patches and advance the cursor.
    /// `None` at the end of the trace: no state change, no error.
    pub fn forward(&mut self) -> Option<&S> {
        let step = self.steps.get(self.cursor)?;
        debug!(
            from = self.cursor,
            to = self.cursor + 1,
            "applying forward patch set"
        );
        let next = apply_all(&self.state, &step.forward);
        self.state = next;
        self.cursor += 1;
        Some(&self.state)
    }

    /// Apply the previous step's backward patches and retreat the cursor.
    /// `None` at the start of the trace.
    pub fn backward(&mut self) -> Option<&S> {
        if self.cursor == 0 {
            return None;
        }
        let step = &self.steps[self.cursor - 1];
        debug!(
            from = self.cursor,
            to = self.cursor - 1,
            "applying backward patch set"
        );
        let next = apply_all(&self.state, &step.backward);
        self.state = next;
        self.cursor -= 1;
        Some(&self.state)
    }

    /// Replay until the cursor sits at `target` (clamped to the recorded
    /// history). Bounded by the step count and idempotent.
    pub fn go_to_step(&mut self, target: usize) {
        while self.cursor < target && self.forward().is_some() {}
        while self.cursor > target && self.backward().is_some() {}
    }

    /// Jump back to the initial state. Recorded steps are retained.
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.cursor = 0;
    }

    #[inline]
    pub fn state(&self) -> &S {
        &self.state
    }

    #[inline]
    pub fn initial(&self) -> &S {
        &self.initial
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn steps(&self) -> &[Step<P>] {
        &self.steps
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    #[inline]
    pub fn can_go_forward(&self) -> bool {
        self.cursor < self.steps.len()
    }

    #[inline]
    pub fn can_go_backward(&self) -> bool {
        self.cursor > 0
    }
}

fn apply_all<S: Clone, P: Patch<S>>(state: &S, patches: &[P]) -> S {
    let mut current = state.clone();
    for patch in patches {
        current = patch.apply(&current);
    }
    current
}
