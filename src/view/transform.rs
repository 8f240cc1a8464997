//! Image-space / view-space mapping.
//!
//! `view = image * scale + offset + image_offset(which)`. Callers guarantee `scale > 0`.

use crate::foundation::core::{Dims, Point, Rect, Vec2, Which};
use crate::foundation::error::WipeviewResult;
use crate::view::state::ViewState;

/// Total translation applied to `which` in view space.
pub fn view_translation(which: Which, view: &ViewState) -> Vec2 {
    view.offset() + view.image_offset(which)
}

/// Map an image-space point of `which` into view space.
pub fn image_to_view(p: Point, which: Which, view: &ViewState) -> Point {
    (p.to_vec2() * view.scale() + view_translation(which, view)).to_point()
}

/// Map a view-space point into the image space of `which`.
pub fn view_to_image(p: Point, which: Which, view: &ViewState) -> Point {
    ((p.to_vec2() - view_translation(which, view)) / view.scale()).to_point()
}

/// View-space rectangle covered by an image of `dims` in slot `which`.
pub fn image_rect_in_view(dims: Dims, which: Which, view: &ViewState) -> Rect {
    let origin = image_to_view(Point::ZERO, which, view);
    Rect::from_origin_size(
        origin,
        (
            f64::from(dims.width) * view.scale(),
            f64::from(dims.height) * view.scale(),
        ),
    )
}

/// Copy of `view` zoomed by `factor` around the view-space `anchor`.
///
/// The image content under `anchor` stays under it for both slots, so per-image offsets are
/// scaled along with the shared one.
pub fn zoom_about(view: &ViewState, anchor: Point, factor: f64) -> WipeviewResult<ViewState> {
    let mut out = view.clone();
    out.set_scale(view.scale() * factor)?;
    let anchor = anchor.to_vec2();
    out.set_offset(anchor - (anchor - view.offset()) * factor);
    for which in Which::ALL {
        out.set_image_offset(which, view.image_offset(which) * factor);
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/view/transform.rs"]
mod tests;
