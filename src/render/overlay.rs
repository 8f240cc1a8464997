//! Wipe line, interaction handles and their hit testing.
//!
//! Handle positions are computed in one place, [`handle_layout`], so drawing and pointer hit
//! tests always agree.

use kurbo::{Arc, Circle, Shape};

use crate::foundation::core::{Point, Rect, Vec2, Which};
use crate::foundation::math::normalize_degrees;
use crate::geometry::wipe::WipeLine;
use crate::surface::Surface;
use crate::view::config::OverlayStyle;
use crate::view::state::ViewState;
use crate::view::transform::image_to_view;

const SHAPE_TOLERANCE: f64 = 0.1;

/// Interactive part of the overlay under a pointer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HandleKind {
    /// Drag moves the wipe center.
    Translate,
    /// Drag rotates the wipe line.
    Rotate,
    /// Drag moves along the alpha arc.
    Alpha,
}

/// Alpha arc placement. Angles are in degrees, measured the same way as the wipe angle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlphaArc {
    /// Arc center (the wipe center).
    pub center: Point,
    /// Arc radius.
    pub radius: f64,
    /// Angle of alpha 0.
    pub start_deg: f64,
    /// Sweep from alpha 0 to alpha 1.
    pub span_deg: f64,
    /// Slider position for the current alpha.
    pub slider: Point,
}

impl AlphaArc {
    fn point_at(&self, deg: f64) -> Point {
        let (sin, cos) = deg.to_radians().sin_cos();
        self.center + Vec2::new(cos, sin) * self.radius
    }

    /// Alpha for a pointer at `p`.
    ///
    /// Inside the arc's sweep, alpha is linear in angle. Outside it, the pointer snaps to the
    /// nearer end: the boundary between the two ends sits opposite the arc's midpoint.
    pub fn alpha_at(&self, p: Point) -> f64 {
        let d = p - self.center;
        if d.hypot2() == 0.0 {
            return 0.0;
        }
        let angle = d.y.atan2(d.x).to_degrees();
        let rel = normalize_degrees(angle - self.start_deg);
        if rel <= self.span_deg {
            (rel / self.span_deg).clamp(0.0, 1.0)
        } else if rel > self.span_deg / 2.0 + 180.0 {
            0.0
        } else {
            1.0
        }
    }
}

/// View-space positions of every overlay element.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandleLayout {
    /// Wipe line.
    pub line: WipeLine,
    /// Translation handle (the wipe center).
    pub center: Point,
    /// Rotation handle; `None` in simple-wipe mode.
    pub rotate: Option<Point>,
    /// Alpha arc; `None` in simple-wipe mode.
    pub alpha_arc: Option<AlphaArc>,
}

/// Lay out the overlay for `view`.
///
/// The rotation handle sits on the composite side along the line normal; the alpha arc is
/// centered on the opposite direction.
pub fn handle_layout(view: &ViewState, style: &OverlayStyle) -> HandleLayout {
    let line = WipeLine::from_view(view);
    let center = image_to_view(view.wipe_center(), Which::A, view);
    if view.simple_wipe() {
        return HandleLayout {
            line,
            center,
            rotate: None,
            alpha_arc: None,
        };
    }

    HandleLayout {
        line,
        center,
        rotate: Some(center + line.normal * style.rotate_handle_distance),
        alpha_arc: Some(alpha_arc(center, view, style)),
    }
}

fn alpha_arc(center: Point, view: &ViewState, style: &OverlayStyle) -> AlphaArc {
    let span = style.alpha_arc_span_deg;
    let start_deg = view.wipe_angle_deg() + 180.0 - span / 2.0;
    let mut arc = AlphaArc {
        center,
        radius: style.alpha_arc_radius,
        start_deg,
        span_deg: span,
        slider: center,
    };
    arc.slider = arc.point_at(start_deg + view.wipe_alpha() * span);
    arc
}

/// Handle under `p`, if any. Translation wins over rotation, rotation over alpha.
pub fn hit_test_handles(p: Point, view: &ViewState, style: &OverlayStyle) -> Option<HandleKind> {
    if !view.wipe_enabled() {
        return None;
    }
    let layout = handle_layout(view, style);
    let hit = |q: Point| (p - q).hypot() <= style.hit_radius;
    if hit(layout.center) {
        return Some(HandleKind::Translate);
    }
    if layout.rotate.is_some_and(hit) {
        return Some(HandleKind::Rotate);
    }
    if layout.alpha_arc.is_some_and(|arc| hit(arc.slider)) {
        return Some(HandleKind::Alpha);
    }
    None
}

/// Wipe angle that points the rotation handle at `p`. `None` when `p` is the center.
pub fn angle_towards(p: Point, view: &ViewState) -> Option<f64> {
    let center = image_to_view(view.wipe_center(), Which::A, view);
    let d = p - center;
    if d.hypot2() == 0.0 {
        return None;
    }
    Some(normalize_degrees(d.y.atan2(d.x).to_degrees()))
}

/// Alpha selected by a pointer at `p` on the alpha arc.
pub fn alpha_from_arc_point(p: Point, view: &ViewState, style: &OverlayStyle) -> f64 {
    let center = image_to_view(view.wipe_center(), Which::A, view);
    alpha_arc(center, view, style).alpha_at(p)
}

/// Draw the wipe line and handles for a surface-sized viewport.
pub fn draw_overlay<S: Surface>(surface: &mut S, view: &ViewState, style: &OverlayStyle) {
    let viewport = Rect::new(0.0, 0.0, f64::from(surface.width()), f64::from(surface.height()));
    let layout = handle_layout(view, style);

    let segment = layout.line.visible_segment(viewport);
    surface.stroke_path(&segment.to_path(SHAPE_TOLERANCE), style.line_width, style.line_color);

    if let Some(rotate) = layout.rotate {
        let spoke = kurbo::Line::new(layout.center, rotate);
        surface.stroke_path(&spoke.to_path(SHAPE_TOLERANCE), style.line_width, style.line_color);
        draw_handle(surface, rotate, style);
    }

    if let Some(arc) = layout.alpha_arc {
        let path = Arc {
            center: arc.center,
            radii: Vec2::new(arc.radius, arc.radius),
            start_angle: arc.start_deg.to_radians(),
            sweep_angle: arc.span_deg.to_radians(),
            x_rotation: 0.0,
        }
        .to_path(SHAPE_TOLERANCE);
        surface.stroke_path(&path, style.line_width, style.line_color);
        draw_handle(surface, arc.slider, style);
    }

    draw_handle(surface, layout.center, style);
}

fn draw_handle<S: Surface>(surface: &mut S, at: Point, style: &OverlayStyle) {
    let disc = Circle::new(at, style.handle_radius).to_path(SHAPE_TOLERANCE);
    surface.fill_path(&disc, style.handle_color);
    surface.stroke_path(&disc, style.line_width * 0.5, style.line_color);
}

#[cfg(test)]
#[path = "../../tests/unit/render/overlay.rs"]
mod tests;
