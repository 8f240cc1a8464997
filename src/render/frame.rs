//! Per-frame orchestration: background, base image, clipped composite, overlay.

use crate::foundation::core::{Rect, Vec2, Which};
use crate::foundation::error::WipeviewResult;
use crate::geometry::wipe::{composite_clip, effective_alpha};
use crate::render::composite::{draw_image_layer, render_composite};
use crate::render::overlay::draw_overlay;
use crate::surface::{BlendOp, CheckerPattern, Paint, Surface};
use crate::view::config::{Background, ViewerConfig};
use crate::view::state::FrameState;

/// What a render call did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The frame was painted.
    Rendered,
    /// Only the background was painted; no image is loaded.
    NoImage,
    /// The surface has no backing store; nothing was painted.
    SurfaceUnavailable,
    /// The magnifier is switched off (zoom `<= 0`); nothing was painted.
    Disabled,
}

/// Renders frames for one configuration.
///
/// The checkerboard tile is built once per configuration and reused for every frame.
#[derive(Clone, Debug)]
pub struct ViewRenderer {
    config: ViewerConfig,
    pattern: Option<CheckerPattern>,
}

impl ViewRenderer {
    /// Validate `config` and prepare its background pattern.
    pub fn new(config: ViewerConfig) -> WipeviewResult<Self> {
        config.validate()?;
        let pattern = config.background.pattern();
        Ok(Self { config, pattern })
    }

    /// Active configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub(crate) fn pattern(&self) -> Option<&CheckerPattern> {
        self.pattern.as_ref()
    }

    /// Paint one full frame.
    ///
    /// With the wipe enabled and both images loaded, A fills the view and the mode composite
    /// is painted only inside B's rectangle on the composite side of the wipe line. Otherwise
    /// the mode composite is painted unclipped.
    #[tracing::instrument(skip_all, fields(mode = ?frame.view.mode(), width = surface.width(), height = surface.height()))]
    pub fn render_frame<S: Surface>(
        &self,
        surface: &mut S,
        frame: &FrameState,
        with_overlay: bool,
    ) -> WipeviewResult<RenderOutcome> {
        if !surface.is_available() {
            tracing::warn!("surface unavailable, skipping frame");
            return Ok(RenderOutcome::SurfaceUnavailable);
        }
        self.paint_background(surface, Vec2::ZERO);
        self.render_content(surface, frame, with_overlay)
    }

    /// Fill the whole surface with the background, the pattern shifted by `phase`.
    pub(crate) fn paint_background<S: Surface>(&self, surface: &mut S, phase: Vec2) {
        let full = Rect::new(0.0, 0.0, f64::from(surface.width()), f64::from(surface.height()));
        surface.save();
        surface.set_global_alpha(1.0);
        surface.set_blend_op(BlendOp::Over);
        match &self.pattern {
            Some(pattern) => surface.fill_rect(full, Paint::Pattern { pattern, phase }),
            None => {
                if let Background::Solid { color } = self.config.background {
                    surface.fill_rect(full, Paint::Solid(color));
                }
            }
        }
        surface.restore();
    }

    /// Everything after the background.
    pub(crate) fn render_content<S: Surface>(
        &self,
        surface: &mut S,
        frame: &FrameState,
        with_overlay: bool,
    ) -> WipeviewResult<RenderOutcome> {
        if !frame.has_any_image() {
            return Ok(RenderOutcome::NoImage);
        }
        let view = &frame.view;

        if !frame.shows_wipe() {
            render_composite(surface, frame, effective_alpha(view))?;
            return Ok(RenderOutcome::Rendered);
        }

        surface.save();
        surface.set_global_alpha(1.0);
        surface.set_blend_op(BlendOp::Over);
        draw_image_layer(surface, frame, Which::A);
        surface.restore();

        if let Some(b) = frame.image(Which::B) {
            let clip = composite_clip(b.base().dims(), view);
            if clip.is_empty() {
                tracing::trace!("composite region empty");
            } else {
                let mut layer = surface.create_offscreen(surface.width(), surface.height())?;
                render_composite(&mut layer, frame, effective_alpha(view))?;
                surface.save();
                surface.clip_path(&clip.to_path());
                surface.draw_surface(&layer);
                surface.restore();
            }
        }

        if with_overlay {
            surface.save();
            draw_overlay(surface, view, &self.config.overlay);
            surface.restore();
        }
        Ok(RenderOutcome::Rendered)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
