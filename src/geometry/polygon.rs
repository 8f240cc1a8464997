use smallvec::SmallVec;

use crate::foundation::core::{BezPath, Point};

/// Convex polygon produced by clipping a rectangle against a half-plane.
///
/// A rectangle intersected with a half-plane has at most 5 vertices, so the list stays inline.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClipPolygon {
    vertices: SmallVec<[Point; 6]>,
}

impl ClipPolygon {
    /// Polygon with no vertices (nothing on the composite side).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Polygon from vertices already in boundary order.
    pub fn from_vertices(vertices: impl IntoIterator<Item = Point>) -> Self {
        Self {
            vertices: vertices.into_iter().collect(),
        }
    }

    /// Vertices in boundary order.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// `true` when there are no vertices at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Enclosed area (shoelace). Fewer than 3 vertices enclose nothing.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let n = self.vertices.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() * 0.5
    }

    /// Closed path through the vertices, suitable as a clip region.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let mut iter = self.vertices.iter();
        if let Some(first) = iter.next() {
            path.move_to(*first);
            for p in iter {
                path.line_to(*p);
            }
            path.close_path();
        }
        path
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/polygon.rs"]
mod tests;
