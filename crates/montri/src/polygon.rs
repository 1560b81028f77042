//! Polygon container, vertex identity, and chain classification.
//!
//! Purpose
//! - Provide `Vertex` as a cheap, immutable value: an index into a polygon
//!   plus the polygon's handle and the cached position. Equality is
//!   `(handle, index)` only; equal positions on different polygons never
//!   compare equal.
//! - Neighbors are recomputed from the index on every query (Euclidean mod),
//!   so adjacency can never go stale.
//! - Chain membership is a single comparison against `prev` and is only
//!   meaningful while vertices are consumed in x-sorted order.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use nalgebra::Vector2;

/// Stable identity of one polygon instance, assigned at construction.
///
/// Two `Vertex` values compare equal only when they carry the same handle
/// and the same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PolygonId(u64);

static NEXT_POLYGON_ID: AtomicU64 = AtomicU64::new(0);

impl PolygonId {
    fn fresh() -> Self {
        Self(NEXT_POLYGON_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A simple polygon as an ordered point sequence, implicitly closed (the
/// last point connects back to the first).
#[derive(Clone, Debug)]
pub struct Polygon {
    id: PolygonId,
    points: Vec<Vector2<f64>>,
}

impl Polygon {
    /// The input points are copied; the caller's buffer is never aliased.
    pub fn new(points: &[Vector2<f64>]) -> Self {
        Self {
            id: PolygonId::fresh(),
            points: points.to_vec(),
        }
    }

    #[inline]
    pub fn id(&self) -> PolygonId {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn points(&self) -> &[Vector2<f64>] {
        &self.points
    }

    /// Vertex at `index`. Panics if `index >= len()`.
    pub fn vertex(&self, index: usize) -> Vertex {
        Vertex {
            poly: self.id,
            index,
            position: self.points[index],
        }
    }

    /// All vertices in boundary order.
    pub fn vertices(&self) -> impl Iterator<Item = Vertex> + '_ {
        (0..self.points.len()).map(|i| self.vertex(i))
    }
}

/// Top or bottom boundary chain of an x-monotone polygon, relative to the
/// x-sorted traversal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Chain {
    Bottom,
    Top,
}

/// One polygon vertex by index. Cheap value type, never mutated.
#[derive(Clone, Copy, Debug)]
pub struct Vertex {
    pub poly: PolygonId,
    pub index: usize,
    pub position: Vector2<f64>,
}

impl PartialEq for Vertex {
    /// Identity is (polygon handle, index); positions are never compared.
    fn eq(&self, other: &Self) -> bool {
        self.poly == other.poly && self.index == other.index
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.poly.hash(state);
        self.index.hash(state);
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.index)
    }
}

impl Vertex {
    /// Neighbor at `index + delta`, wrapped into `[0, n)` for any integer
    /// delta (Euclidean mod: `((i % n) + n) % n`).
    pub fn neighbor(&self, polygon: &Polygon, delta: isize) -> Vertex {
        debug_assert_eq!(self.poly, polygon.id());
        let n = polygon.len() as isize;
        let i = ((self.index as isize + delta) % n + n) % n;
        polygon.vertex(i as usize)
    }

    #[inline]
    pub fn next(&self, polygon: &Polygon) -> Vertex {
        self.neighbor(polygon, 1)
    }

    #[inline]
    pub fn prev(&self, polygon: &Polygon) -> Vertex {
        self.neighbor(polygon, -1)
    }

    /// True iff `other` is this vertex's direct polygon neighbor, by
    /// identity rather than by coincidentally equal position.
    pub fn is_adjacent_to(&self, polygon: &Polygon, other: &Vertex) -> bool {
        *other == self.next(polygon) || *other == self.prev(polygon)
    }

    /// Chain membership: `Bottom` iff `prev` lies strictly left, `Top` iff
    /// strictly right, `None` on an x-tie. Only meaningful once vertices are
    /// consumed in x-sorted order.
    pub fn chain(&self, polygon: &Polygon) -> Option<Chain> {
        let prev_x = self.prev(polygon).position.x;
        if prev_x < self.position.x {
            Some(Chain::Bottom)
        } else if prev_x > self.position.x {
            Some(Chain::Top)
        } else {
            None
        }
    }

    #[inline]
    pub fn is_on_bottom_chain(&self, polygon: &Polygon) -> bool {
        self.chain(polygon) == Some(Chain::Bottom)
    }

    #[inline]
    pub fn is_on_top_chain(&self, polygon: &Polygon) -> bool {
        self.chain(polygon) == Some(Chain::Top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector2;

    fn square() -> Polygon {
        Polygon::new(&[
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 2.0),
            Vector2::new(0.0, 2.0),
        ])
    }

    #[test]
    fn neighbor_wraps_for_any_delta() {
        let p = square();
        let v0 = p.vertex(0);
        assert_eq!(v0.next(&p).index, 1);
        assert_eq!(v0.prev(&p).index, 3);
        assert_eq!(v0.neighbor(&p, -5).index, 3);
        assert_eq!(v0.neighbor(&p, 9).index, 1);
        assert_eq!(v0.neighbor(&p, -8).index, 0);
    }

    #[test]
    fn equality_is_handle_plus_index() {
        let p = square();
        let q = square();
        assert_eq!(p.vertex(1), p.vertex(1));
        // Same coordinates, different polygon instance: not equal.
        assert_ne!(p.vertex(1), q.vertex(1));
        assert_ne!(p.vertex(1), p.vertex(2));
    }

    #[test]
    fn adjacency_is_by_identity() {
        let p = square();
        let q = square();
        let v1 = p.vertex(1);
        assert!(v1.is_adjacent_to(&p, &p.vertex(0)));
        assert!(v1.is_adjacent_to(&p, &p.vertex(2)));
        assert!(!v1.is_adjacent_to(&p, &p.vertex(3)));
        // A positionally identical vertex from another polygon is a stranger.
        assert!(!v1.is_adjacent_to(&p, &q.vertex(0)));
    }

    #[test]
    fn chain_classification_and_ties() {
        let p = square();
        // #1 (2,0): prev is #0 (0,0), strictly left.
        assert_eq!(p.vertex(1).chain(&p), Some(Chain::Bottom));
        // #0 (0,0): prev is #3 (0,2), x-tie.
        assert_eq!(p.vertex(0).chain(&p), None);
        // #3 (0,2): prev is #2 (2,2), strictly right.
        assert_eq!(p.vertex(3).chain(&p), Some(Chain::Top));
        assert!(p.vertex(3).is_on_top_chain(&p));
        assert!(!p.vertex(3).is_on_bottom_chain(&p));
    }
}
