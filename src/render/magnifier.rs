//! Circular magnifier loupe rendered into its own surface.

use kurbo::{Circle, Line, Shape};

use crate::foundation::core::{Dims, Point, Vec2};
use crate::foundation::error::WipeviewResult;
use crate::render::frame::{RenderOutcome, ViewRenderer};
use crate::surface::Surface;
use crate::view::state::{FrameState, ViewState};
use crate::view::transform::zoom_about;

const CROSSHAIR_ARM: f64 = 8.0;

/// View state for a loupe of `loupe` pixels centered on `pointer`, or `None` when `zoom <= 0`.
///
/// The main view is zoomed by `zoom` about `pointer` and then shifted so `pointer` lands on the
/// loupe center. Wipe geometry lives in image space and follows along.
pub fn magnifier_view(
    view: &ViewState,
    pointer: Point,
    loupe: Dims,
    zoom: f64,
) -> WipeviewResult<Option<ViewState>> {
    if !(zoom > 0.0) {
        return Ok(None);
    }
    let mut out = zoom_about(view, pointer, zoom)?;
    out.set_offset(out.offset() + (loupe_center(loupe) - pointer));
    Ok(Some(out))
}

fn loupe_center(loupe: Dims) -> Point {
    Point::new(f64::from(loupe.width) / 2.0, f64::from(loupe.height) / 2.0)
}

impl ViewRenderer {
    /// Paint the magnifier for `pointer` (main-view coordinates) into `surface`.
    ///
    /// The loupe is a square of `magnifier.size` pixels at the surface origin, shrunk to fit a
    /// smaller surface. It is clipped to the inscribed circle, runs the full frame pipeline at
    /// the magnified view and keeps the checkerboard aligned with the main view under the
    /// pointer. A crosshair marks the pointer.
    pub fn render_magnifier<S: Surface>(
        &self,
        surface: &mut S,
        frame: &FrameState,
        pointer: Point,
        with_overlay: bool,
    ) -> WipeviewResult<RenderOutcome> {
        let opts = &self.config().magnifier;
        let edge = opts.size.min(surface.width()).min(surface.height());
        let loupe = Dims::new(edge, edge);
        let Some(view) = magnifier_view(&frame.view, pointer, loupe, opts.zoom)? else {
            return Ok(RenderOutcome::Disabled);
        };
        if !surface.is_available() {
            return Ok(RenderOutcome::SurfaceUnavailable);
        }

        let center = loupe_center(loupe);
        let radius = center.x.min(center.y);
        let phase = self.pattern_phase(pointer - center);
        let zoomed = FrameState {
            view,
            image_a: frame.image_a.clone(),
            image_b: frame.image_b.clone(),
        };

        surface.save();
        surface.clip_path(&Circle::new(center, radius).to_path(0.1));
        self.paint_background(surface, phase);
        let outcome = self.render_content(surface, &zoomed, with_overlay);
        surface.restore();
        let outcome = outcome?;

        let arm = CROSSHAIR_ARM.min(radius);
        let width = self.config().overlay.line_width;
        for (dx, dy) in [(arm, 0.0), (0.0, arm)] {
            let d = Vec2::new(dx, dy);
            let path = Line::new(center - d, center + d).to_path(0.1);
            surface.stroke_path(&path, width, opts.crosshair_color);
        }
        Ok(outcome)
    }

    /// Pattern phase reduced to one period, so it stays small for far-away pointers.
    fn pattern_phase(&self, shift: Vec2) -> Vec2 {
        match self.pattern() {
            Some(p) => {
                let period = f64::from(p.period());
                Vec2::new(shift.x.rem_euclid(period), shift.y.rem_euclid(period))
            }
            None => Vec2::ZERO,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/magnifier.rs"]
mod tests;
