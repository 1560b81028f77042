//! Random x-monotone polygons (deterministic, replayable).
//!
//! Model
//! - Draw `n` distinct x-coordinates as a jittered grid over `[0, width]`,
//!   pin the leftmost and rightmost vertices to `y = 0`, and assign every
//!   interior vertex to the top (`y > 0`) or bottom (`y < 0`) chain.
//! - Emit the boundary clockwise: leftmost, top chain left to right,
//!   rightmost, bottom chain right to left. Chains on opposite sides of
//!   `y = 0` cannot intersect, so the polygon is simple and x-monotone by
//!   construction.
//! - Determinism uses a replay token `(seed, index)` mixed into a single
//!   RNG, so individual draws are reproducible and indexable.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

/// Monotone-polygon sampler configuration.
#[derive(Clone, Copy, Debug)]
pub struct MonotoneCfg {
    pub vertex_count: VertexCount,
    /// Horizontal extent of the polygon.
    pub width: f64,
    /// Maximum |y| of interior chain vertices.
    pub height: f64,
    /// Fraction of the mean x-gap reserved as a minimum gap between
    /// consecutive sorted vertices. Clamped to [0, 0.9]; larger values mean
    /// less x-jitter.
    pub min_gap_frac: f64,
}

impl Default for MonotoneCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            width: 4.0,
            height: 1.0,
            min_gap_frac: 0.2,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    fn rng(self) -> StdRng {
        // SplitMix64-style mixing keeps (seed, index) pairs well separated.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58_476d_1ce4_e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d0_49bb_1331_11eb);
            x ^ (x >> 31)
        }
        let key = mix(self.seed ^ mix(self.index.wrapping_add(0x9e37_79b9_7f4a_7c15)));
        StdRng::seed_from_u64(key)
    }
}

/// Distinct, ascending x-coordinates: a grid over `[0, width]` with bounded
/// per-vertex jitter. The extremes stay pinned at `0` and `width`.
fn jittered_xs<R: Rng>(rng: &mut R, n: usize, width: f64, min_gap_frac: f64) -> Vec<f64> {
    let gap = width.max(1e-9) / (n as f64 - 1.0);
    let jitter = (1.0 - min_gap_frac.clamp(0.0, 0.9)) * 0.5 * gap;
    (0..n)
        .map(|k| {
            let base = k as f64 * gap;
            if k == 0 || k == n - 1 {
                base
            } else {
                base + (rng.gen::<f64>() * 2.0 - 1.0) * jitter
            }
        })
        .collect()
}

/// Assemble the clockwise boundary from the chain assignment.
fn assemble(
    xs: &[f64],
    top: Vec<Vector2<f64>>,
    bottom: Vec<Vector2<f64>>,
) -> Vec<Vector2<f64>> {
    let n = xs.len();
    let mut points = Vec::with_capacity(n);
    points.push(Vector2::new(xs[0], 0.0));
    points.extend(top);
    points.push(Vector2::new(xs[n - 1], 0.0));
    points.extend(bottom.into_iter().rev());
    points
}

/// Draw a random simple x-monotone polygon. Interior vertices take a random
/// chain and a random |y| bounded away from the axis, so the two chains
/// stay strictly separated.
pub fn draw_monotone_polygon(cfg: MonotoneCfg, tok: ReplayToken) -> Vec<Vector2<f64>> {
    let mut rng = tok.rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let xs = jittered_xs(&mut rng, n, cfg.width, cfg.min_gap_frac);
    let mut top = Vec::new();
    let mut bottom = Vec::new();
    for &x in &xs[1..n - 1] {
        let y = (0.15 + 0.85 * rng.gen::<f64>()) * cfg.height.max(1e-9);
        if rng.gen::<bool>() {
            top.push(Vector2::new(x, y));
        } else {
            bottom.push(Vector2::new(x, -y));
        }
    }
    assemble(&xs, top, bottom)
}

/// Draw a random convex polygon from the same family: chain vertices sit on
/// a pair of strictly concave/convex arches over `[0, width]`, which keeps
/// every vertex in convex position.
pub fn draw_convex_polygon(cfg: MonotoneCfg, tok: ReplayToken) -> Vec<Vector2<f64>> {
    let mut rng = tok.rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let w = cfg.width.max(1e-9);
    let xs = jittered_xs(&mut rng, n, w, cfg.min_gap_frac);
    let amp_top = (0.4 + 0.6 * rng.gen::<f64>()) * cfg.height.max(1e-9);
    let amp_bottom = (0.4 + 0.6 * rng.gen::<f64>()) * cfg.height.max(1e-9);
    // Unit arch: 0 at the extremes, 1 at the midpoint.
    let arch = |x: f64| 4.0 * x * (w - x) / (w * w);
    let mut top = Vec::new();
    let mut bottom = Vec::new();
    for &x in &xs[1..n - 1] {
        if rng.gen::<bool>() {
            top.push(Vector2::new(x, amp_top * arch(x)));
        } else {
            bottom.push(Vector2::new(x, -amp_bottom * arch(x)));
        }
    }
    assemble(&xs, top, bottom)
}
