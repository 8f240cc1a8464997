//! Two-image blending for every [`CompareMode`].

use crate::foundation::core::{Rect, Rgba8, Which};
use crate::foundation::error::WipeviewResult;
use crate::raster::mip::smoothing_for_scale;
use crate::surface::{BlendOp, Paint, Surface};
use crate::view::state::{CompareMode, FrameState};
use crate::view::transform::image_rect_in_view;

/// Draw one image at its view position, using the mip level that fits the current scale.
///
/// Does nothing when the slot is empty. Uses the surface's current opacity and blend operator.
pub fn draw_image_layer<S: Surface>(surface: &mut S, frame: &FrameState, which: Which) {
    let Some(pyramid) = frame.image(which) else {
        return;
    };
    let view = &frame.view;
    let level = pyramid.select_level(view.scale());
    let dst = image_rect_in_view(pyramid.base().dims(), which, view);
    let src = Rect::new(0.0, 0.0, f64::from(level.width()), f64::from(level.height()));
    surface.draw_image(level, src, dst, smoothing_for_scale(view.scale()));
}

/// Paint the composite of A and B for the frame's mode, with B weighted by `alpha`.
///
/// Only the surface contents change: opacity and blend operator are back to what the caller
/// had when this returns, on every branch.
pub fn render_composite<S: Surface>(
    surface: &mut S,
    frame: &FrameState,
    alpha: f64,
) -> WipeviewResult<()> {
    surface.save();
    surface.set_global_alpha(1.0);
    surface.set_blend_op(BlendOp::Over);
    let out = composite_mode(surface, frame, alpha as f32);
    surface.restore();
    out
}

fn composite_mode<S: Surface>(surface: &mut S, frame: &FrameState, alpha: f32) -> WipeviewResult<()> {
    let mode = frame.view.mode();
    match mode {
        CompareMode::A => draw_image_layer(surface, frame, Which::A),
        CompareMode::B => draw_image_layer(surface, frame, Which::B),
        _ if !frame.has_both_images() => {
            // A lone image is shown as-is whatever the blend mode.
            draw_image_layer(surface, frame, Which::A);
            draw_image_layer(surface, frame, Which::B);
        }
        CompareMode::Under => {
            draw_image_layer(surface, frame, Which::A);
            surface.set_global_alpha(alpha);
            draw_image_layer(surface, frame, Which::B);
        }
        CompareMode::OnionSkin => {
            draw_image_layer(surface, frame, Which::A);
            surface.set_global_alpha(alpha);
            surface.set_blend_op(BlendOp::Lighter);
            draw_image_layer(surface, frame, Which::B);
        }
        CompareMode::Diff | CompareMode::InvDiff => {
            let scratch = difference_layer(surface, frame, mode == CompareMode::InvDiff)?;
            surface.set_global_alpha(alpha);
            surface.draw_surface(&scratch);
        }
    }
    Ok(())
}

/// `|a - b|` (or `255 - |a - b|` when `invert`) on a fresh surface the size of `like`.
fn difference_layer<S: Surface>(like: &S, frame: &FrameState, invert: bool) -> WipeviewResult<S> {
    let mut scratch = like.create_offscreen(like.width(), like.height())?;
    let full = Rect::new(0.0, 0.0, f64::from(like.width()), f64::from(like.height()));
    if invert {
        scratch.fill_rect(full, Paint::Solid(Rgba8::WHITE));
    }
    draw_image_layer(&mut scratch, frame, Which::B);
    scratch.set_blend_op(BlendOp::Difference);
    draw_image_layer(&mut scratch, frame, Which::A);
    if invert {
        scratch.fill_rect(full, Paint::Solid(Rgba8::WHITE));
    }
    scratch.set_blend_op(BlendOp::Over);
    Ok(scratch)
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
