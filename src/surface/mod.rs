//! 2D drawing surface abstraction and its CPU implementation.
//!
//! The renderers only talk to [`Surface`]; hosts with their own canvas can implement it and
//! reuse the whole pipeline. [`CpuSurface`] is the built-in premultiplied RGBA8 backend.

pub(crate) mod blend;
pub(crate) mod cpu;
pub(crate) mod pattern;

use crate::foundation::core::{BezPath, Rect, Rgba8, Vec2};
use crate::foundation::error::WipeviewResult;
use crate::raster::image::RasterImage;

pub use blend::BlendOp;
pub use pattern::CheckerPattern;

/// What to fill a rectangle with.
#[derive(Clone, Copy, Debug)]
pub enum Paint<'a> {
    /// Single straight-alpha color.
    Solid(Rgba8),
    /// Repeating pattern. `phase` is added to surface pixel coordinates before sampling, so
    /// shifting it moves the pattern without moving the filled area.
    Pattern {
        /// Pattern tile.
        pattern: &'a CheckerPattern,
        /// Pattern phase in pixels.
        phase: Vec2,
    },
}

/// Immediate-mode drawing target the renderers paint into.
///
/// State set through `set_global_alpha`, `set_blend_op` and `clip_path` is scoped by
/// `save`/`restore`, the way a 2D canvas context behaves.
pub trait Surface {
    /// Width in pixels.
    fn width(&self) -> u32;

    /// Height in pixels.
    fn height(&self) -> u32;

    /// `false` when the surface has no backing store to draw into.
    fn is_available(&self) -> bool {
        self.width() > 0 && self.height() > 0
    }

    /// Push the current alpha, blend operator and clip.
    fn save(&mut self);

    /// Pop the state pushed by the matching `save`. Unbalanced calls are ignored.
    fn restore(&mut self);

    /// Opacity applied to every subsequent draw, clamped to `[0, 1]`.
    fn set_global_alpha(&mut self, alpha: f32);

    /// Current global opacity.
    fn global_alpha(&self) -> f32;

    /// Blend operator applied to every subsequent draw.
    fn set_blend_op(&mut self, op: BlendOp);

    /// Current blend operator.
    fn blend_op(&self) -> BlendOp;

    /// Intersect the current clip with the interior of `path`.
    fn clip_path(&mut self, path: &BezPath);

    /// Fill an axis-aligned rectangle.
    fn fill_rect(&mut self, rect: Rect, paint: Paint<'_>);

    /// Fill a closed path with a solid color.
    fn fill_path(&mut self, path: &BezPath, color: Rgba8);

    /// Stroke a path with a solid color.
    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8);

    /// Draw the `src` region of `image` scaled into the `dst` region of the surface.
    fn draw_image(&mut self, image: &RasterImage, src: Rect, dst: Rect, smoothing: bool);

    /// Draw another surface of the same kind at the origin.
    fn draw_surface(&mut self, src: &Self)
    where
        Self: Sized;

    /// Create a transparent offscreen surface of the same kind.
    fn create_offscreen(&self, width: u32, height: u32) -> WipeviewResult<Self>
    where
        Self: Sized;
}

pub use cpu::CpuSurface;
