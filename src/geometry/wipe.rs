//! Wipe line placement and the rectangle / half-plane clip that bounds the composite region.

use kurbo::Line;

use crate::foundation::core::{Dims, Point, Rect, Vec2, Which};
use crate::geometry::polygon::ClipPolygon;
use crate::view::state::ViewState;
use crate::view::transform::{image_rect_in_view, image_to_view};

/// Determinant magnitude below which the wipe line counts as parallel to an edge.
const PARALLEL_EPS: f64 = 1e-10;
/// Slack on an edge's parametric range when accepting an intersection.
const EDGE_PARAM_EPS: f64 = 1e-6;
/// Intersections closer than this are the same point.
const DEDUP_EPS: f64 = 1e-6;

/// Wipe line in view space: pivot, unit direction along the line, and unit normal pointing
/// into the composite side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WipeLine {
    /// Pivot in view space.
    pub center: Point,
    /// Unit vector along the line, `(-sin θ, cos θ)`.
    pub direction: Vec2,
    /// Unit normal, `(cos θ, sin θ)`; positive side is the composite side.
    pub normal: Vec2,
}

impl WipeLine {
    /// Line through `center` rotated by `angle_deg` (0 is vertical, composite side to the right).
    pub fn new(center: Point, angle_deg: f64) -> Self {
        let (sin, cos) = angle_deg.to_radians().sin_cos();
        Self {
            center,
            direction: Vec2::new(-sin, cos),
            normal: Vec2::new(cos, sin),
        }
    }

    /// Line for the current view, with the pivot mapped from image-A space.
    pub fn from_view(view: &ViewState) -> Self {
        Self::new(
            image_to_view(view.wipe_center(), Which::A, view),
            view.wipe_angle_deg(),
        )
    }

    /// Signed distance of `p` from the line; positive on the composite side.
    pub fn side(&self, p: Point) -> f64 {
        (p - self.center).dot(self.normal)
    }

    /// `true` when `p` lies strictly on the composite side.
    pub fn is_composite_side(&self, p: Point) -> bool {
        self.side(p) > 0.0
    }

    /// Same line with the sides swapped.
    pub fn flipped(&self) -> Self {
        Self {
            center: self.center,
            direction: -self.direction,
            normal: -self.normal,
        }
    }

    /// The on-screen segment of the line for a viewport.
    ///
    /// The segment is centered on the projection of the viewport's center onto the line (not on
    /// the pivot) and extends the larger viewport edge in both directions, so it always spans
    /// the visible area.
    pub fn visible_segment(&self, viewport: Rect) -> Line {
        let half = viewport.width().max(viewport.height()).max(1.0);
        let along = (viewport.center() - self.center).dot(self.direction);
        let foot = self.center + self.direction * along;
        Line::new(foot - self.direction * half, foot + self.direction * half)
    }

    /// Intersection of the infinite wipe line with the segment `a..b`.
    fn intersect_segment(&self, a: Point, b: Point) -> Option<Point> {
        let edge = b - a;
        let det = self.direction.cross(edge);
        if det.abs() < PARALLEL_EPS {
            return None;
        }
        let u = (a - self.center).cross(self.direction) / det;
        if !(-EDGE_PARAM_EPS..=1.0 + EDGE_PARAM_EPS).contains(&u) {
            return None;
        }
        Some(a + edge * u.clamp(0.0, 1.0))
    }
}

/// Clip `rect` to the composite side of `line`.
///
/// - No corner on the composite side: empty polygon.
/// - All four: the rectangle, corners in `(x0,y0) (x1,y0) (x1,y1) (x0,y1)` order.
/// - Otherwise: composite-side corners plus the line's edge intersections, ordered by angle
///   around their centroid. The result is the intersection of a rectangle with a half-plane,
///   which is convex, so the angular order is the boundary order. This ordering is not valid
///   for non-convex shapes.
///
/// Intersections that coincide with a composite-side corner or with each other are kept once.
/// A line through a single corner leaves one intersection, which is kept as a vertex. If none
/// survive, the composite-side corners alone are returned.
pub fn clip_rect_to_half_plane(rect: Rect, line: &WipeLine) -> ClipPolygon {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    let inside: Vec<Point> = corners
        .iter()
        .copied()
        .filter(|c| line.is_composite_side(*c))
        .collect();

    match inside.len() {
        0 => return ClipPolygon::empty(),
        4 => return ClipPolygon::from_vertices(corners),
        _ => {}
    }

    let mut hits: Vec<Point> = Vec::with_capacity(4);
    for i in 0..4 {
        let Some(p) = line.intersect_segment(corners[i], corners[(i + 1) % 4]) else {
            continue;
        };
        if inside.iter().chain(&hits).all(|q| (*q - p).hypot() >= DEDUP_EPS) {
            hits.push(p);
        }
    }

    if hits.is_empty() {
        tracing::debug!(
            corners = inside.len(),
            intersections = hits.len(),
            "degenerate wipe clip, using corners only"
        );
        return ClipPolygon::from_vertices(inside);
    }

    let mut points = inside;
    points.extend(hits);
    sort_by_centroid_angle(&mut points);
    ClipPolygon::from_vertices(points)
}

fn sort_by_centroid_angle(points: &mut [Point]) {
    let n = points.len() as f64;
    let sum = points
        .iter()
        .fold(Vec2::ZERO, |acc, p| acc + p.to_vec2());
    let centroid = (sum / n).to_point();
    points.sort_by(|a, b| {
        let aa = (a.y - centroid.y).atan2(a.x - centroid.x);
        let ab = (b.y - centroid.y).atan2(b.x - centroid.x);
        aa.total_cmp(&ab)
    });
}

/// Composite-side clip polygon of image B's view rectangle.
pub fn composite_clip(dims_b: Dims, view: &ViewState) -> ClipPolygon {
    clip_rect_to_half_plane(
        image_rect_in_view(dims_b, Which::B, view),
        &WipeLine::from_view(view),
    )
}

/// Blend weight inside the clipped region: a hard replace in simple-wipe mode, otherwise the
/// configured wipe alpha.
pub fn effective_alpha(view: &ViewState) -> f64 {
    if view.simple_wipe() {
        1.0
    } else {
        view.wipe_alpha()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/wipe.rs"]
mod tests;
