//! Host-side owner of the mutable view state.
//!
//! [`Viewer`] is the only place the view changes. Between frames the host feeds it pointer
//! interactions; for each frame it hands the renderers an immutable [`FrameState`].

use crate::foundation::core::{Dims, Point, Vec2, Which};
use crate::foundation::error::WipeviewResult;
use crate::metric::overlap::{PsnrReport, compute_overlap_and_psnr};
use crate::metric::probe::{ProbeReport, probe_pixels};
use crate::raster::image::RasterImage;
use crate::raster::mip::{MipBuild, MipCache};
use crate::render::frame::{RenderOutcome, ViewRenderer};
use crate::render::overlay::{HandleKind, alpha_from_arc_point, angle_towards, hit_test_handles};
use crate::surface::Surface;
use crate::view::config::ViewerConfig;
use crate::view::state::{CompareMode, FrameState, ViewState};
use crate::view::transform::{view_to_image, zoom_about};

/// Viewer session: view state, renderer configuration and the two image slots.
pub struct Viewer {
    view: ViewState,
    renderer: ViewRenderer,
    mips: MipCache,
}

impl Viewer {
    /// Session building mip pyramids on rayon's global pool.
    pub fn new(config: ViewerConfig) -> WipeviewResult<Self> {
        Self::with_mip_cache(config, MipCache::new())
    }

    /// Session with a caller-provided mip cache (dedicated pool, or inline builds).
    pub fn with_mip_cache(config: ViewerConfig, mips: MipCache) -> WipeviewResult<Self> {
        Ok(Self {
            view: ViewState::new(),
            renderer: ViewRenderer::new(config)?,
            mips,
        })
    }

    /// Current view state.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Replace the whole view, e.g. one restored from JSON.
    pub fn set_view(&mut self, view: ViewState) -> WipeviewResult<()> {
        view.validate()?;
        self.view = view;
        Ok(())
    }

    /// Active renderer configuration.
    pub fn config(&self) -> &ViewerConfig {
        self.renderer.config()
    }

    /// Swap the configuration. The old one stays active if the new one is invalid.
    pub fn set_config(&mut self, config: ViewerConfig) -> WipeviewResult<()> {
        self.renderer = ViewRenderer::new(config)?;
        Ok(())
    }

    /// Install an image and start building its pyramid.
    ///
    /// Loading image A for the first time also parks the wipe pivot at its center.
    pub fn load_image(&mut self, which: Which, image: RasterImage) -> MipBuild {
        let first_a = which == Which::A && self.mips.pyramid(Which::A).is_none();
        let dims = image.dims();
        let build = self.mips.load(which, image);
        if first_a {
            self.view.set_wipe_center(dims_center(dims));
        }
        tracing::debug!(?which, width = dims.width, height = dims.height, generation = build.generation(), "image loaded");
        build
    }

    /// Empty a slot; any pyramid build in flight for it is discarded.
    pub fn clear_image(&mut self, which: Which) {
        self.mips.clear(which);
    }

    /// Dimensions of a loaded image.
    pub fn image_dims(&self, which: Which) -> Option<Dims> {
        self.mips.pyramid(which).map(|p| p.base().dims())
    }

    /// Immutable snapshot for the renderers.
    pub fn frame(&self) -> FrameState {
        FrameState {
            view: self.view.clone(),
            image_a: self.mips.pyramid(Which::A),
            image_b: self.mips.pyramid(Which::B),
        }
    }

    /// Set the zoom; rejects non-positive and non-finite values.
    pub fn set_scale(&mut self, scale: f64) -> WipeviewResult<()> {
        self.view.set_scale(scale)
    }

    /// Select the compare mode.
    pub fn set_mode(&mut self, mode: CompareMode) {
        self.view.set_mode(mode);
    }

    /// Advance to the next compare mode.
    pub fn cycle_mode(&mut self) -> CompareMode {
        let next = self.view.mode().next();
        self.view.set_mode(next);
        next
    }

    /// Clamped to `[0, 1]`.
    pub fn set_wipe_alpha(&mut self, alpha: f64) {
        self.view.set_wipe_alpha(alpha);
    }

    /// Switch the wipe split on or off.
    pub fn set_wipe_enabled(&mut self, enabled: bool) {
        self.view.set_wipe_enabled(enabled);
    }

    /// Turning simple wipe on snaps the line back to vertical.
    pub fn set_simple_wipe(&mut self, simple: bool) {
        self.view.set_simple_wipe(simple);
    }

    /// Multiply the scale by `factor`, keeping the content under `view_point` in place.
    pub fn zoom_at(&mut self, view_point: Point, factor: f64) -> WipeviewResult<()> {
        self.view = zoom_about(&self.view, view_point, factor)?;
        Ok(())
    }

    /// Pan both images.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.view.set_offset(self.view.offset() + delta);
    }

    /// Pan one image while the other stays put.
    pub fn pan_image(&mut self, which: Which, delta: Vec2) {
        self.view
            .set_image_offset(which, self.view.image_offset(which) + delta);
    }

    /// Move the wipe pivot under `view_point`.
    pub fn move_wipe_to(&mut self, view_point: Point) {
        self.view
            .set_wipe_center(view_to_image(view_point, Which::A, &self.view));
    }

    /// Rotate the wipe so its rotation handle points at `view_point`.
    pub fn rotate_wipe_towards(&mut self, view_point: Point) {
        if let Some(angle) = angle_towards(view_point, &self.view) {
            self.view.set_wipe_angle_deg(angle);
        }
    }

    /// Set the wipe alpha from a pointer dragging the alpha slider.
    pub fn set_alpha_from_arc(&mut self, view_point: Point) {
        let alpha = alpha_from_arc_point(view_point, &self.view, &self.config().overlay);
        self.view.set_wipe_alpha(alpha);
    }

    /// Route a drag on `handle` to the matching interaction.
    pub fn drag_handle(&mut self, handle: HandleKind, view_point: Point) {
        match handle {
            HandleKind::Translate => self.move_wipe_to(view_point),
            HandleKind::Rotate => self.rotate_wipe_towards(view_point),
            HandleKind::Alpha => self.set_alpha_from_arc(view_point),
        }
    }

    /// Unit scale, no panning, vertical opaque wipe through the center of image A.
    ///
    /// Compare mode and the wipe switches are kept.
    pub fn reset_view(&mut self) {
        let mut view = ViewState::new();
        view.set_mode(self.view.mode());
        view.set_wipe_enabled(self.view.wipe_enabled());
        view.set_simple_wipe(self.view.simple_wipe());
        if let Some(dims) = self.image_dims(Which::A) {
            view.set_wipe_center(dims_center(dims));
        }
        self.view = view;
    }

    /// Overlay handle under `view_point`. Handles only exist while the wipe is drawn.
    pub fn hit_test(&self, view_point: Point) -> Option<HandleKind> {
        if !self.frame().shows_wipe() {
            return None;
        }
        hit_test_handles(view_point, &self.view, &self.config().overlay)
    }

    /// Render the current frame into `surface`.
    pub fn render_frame<S: Surface>(
        &self,
        surface: &mut S,
        with_overlay: bool,
    ) -> WipeviewResult<RenderOutcome> {
        self.renderer
            .render_frame(surface, &self.frame(), with_overlay)
    }

    /// Render the magnifier for `pointer` into `surface`.
    #[tracing::instrument(skip(self, surface))]
    pub fn render_magnifier<S: Surface>(
        &self,
        surface: &mut S,
        pointer: Point,
    ) -> WipeviewResult<RenderOutcome> {
        self.renderer
            .render_magnifier(surface, &self.frame(), pointer, false)
    }

    /// PSNR over the region where the two full-resolution images overlap.
    pub fn overlap_psnr(&self) -> PsnrReport {
        compute_overlap_and_psnr(&self.frame())
    }

    /// Pixel of each image under `view_point`.
    pub fn probe(&self, view_point: Point) -> ProbeReport {
        probe_pixels(&self.frame(), view_point)
    }
}

fn dims_center(dims: Dims) -> Point {
    Point::new(f64::from(dims.width) / 2.0, f64::from(dims.height) / 2.0)
}

#[cfg(test)]
#[path = "../../tests/unit/session/viewer.rs"]
mod tests;
