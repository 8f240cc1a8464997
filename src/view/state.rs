use crate::foundation::core::{Point, Vec2, Which};
use crate::foundation::error::{WipeviewError, WipeviewResult};
use crate::raster::mip::MipPyramid;
use crate::view::from_json_object;

/// How the two images are combined on the composite side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareMode {
    /// A opaque, B on top with the wipe alpha (source-over).
    #[default]
    Under,
    /// A opaque, B added on top with the wipe alpha.
    OnionSkin,
    /// Per-channel `|a - b|`.
    Diff,
    /// `255 - |a - b|`.
    InvDiff,
    /// Only image A.
    A,
    /// Only image B.
    B,
}

impl CompareMode {
    /// Every mode, in the order hosts usually cycle through them.
    pub const ALL: [CompareMode; 6] = [
        CompareMode::Under,
        CompareMode::OnionSkin,
        CompareMode::Diff,
        CompareMode::InvDiff,
        CompareMode::A,
        CompareMode::B,
    ];

    /// Short human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CompareMode::Under => "under",
            CompareMode::OnionSkin => "onion skin",
            CompareMode::Diff => "diff",
            CompareMode::InvDiff => "inverted diff",
            CompareMode::A => "A",
            CompareMode::B => "B",
        }
    }

    /// Next mode in [`CompareMode::ALL`], wrapping around.
    pub fn next(self) -> CompareMode {
        let i = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(i + 1) % Self::ALL.len()]
    }
}

/// Pan, zoom and wipe parameters of the comparison view.
///
/// The host owns one mutable instance and edits it between frames through the setters, which
/// keep the invariants: `scale > 0`, `wipe_alpha` in `[0, 1]`, and a zero wipe angle whenever
/// `simple_wipe` is on.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewState {
    scale: f64,
    offset: Vec2,
    image_offset_a: Vec2,
    image_offset_b: Vec2,
    wipe_center: Point,
    wipe_angle_deg: f64,
    wipe_alpha: f64,
    wipe_enabled: bool,
    simple_wipe: bool,
    mode: CompareMode,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            scale: 1.0,
            offset: Vec2::ZERO,
            image_offset_a: Vec2::ZERO,
            image_offset_b: Vec2::ZERO,
            wipe_center: Point::ZERO,
            wipe_angle_deg: 0.0,
            wipe_alpha: 1.0,
            wipe_enabled: true,
            simple_wipe: false,
            mode: CompareMode::Under,
        }
    }
}

impl ViewState {
    /// Default view: unit scale, no pan, wipe enabled at the image origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uniform zoom applied to both images.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Shared pan offset in view pixels.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Additional per-image pan offset in view pixels.
    pub fn image_offset(&self, which: Which) -> Vec2 {
        match which {
            Which::A => self.image_offset_a,
            Which::B => self.image_offset_b,
        }
    }

    /// Wipe pivot in image-A coordinates.
    pub fn wipe_center(&self) -> Point {
        self.wipe_center
    }

    /// Wipe rotation; 0 is a vertical line.
    pub fn wipe_angle_deg(&self) -> f64 {
        self.wipe_angle_deg
    }

    /// Blend weight on the composite side.
    pub fn wipe_alpha(&self) -> f64 {
        self.wipe_alpha
    }

    /// Whether the wipe splits the view.
    pub fn wipe_enabled(&self) -> bool {
        self.wipe_enabled
    }

    /// Whether the wipe is a hard, unrotatable split.
    pub fn simple_wipe(&self) -> bool {
        self.simple_wipe
    }

    /// Active blend mode.
    pub fn mode(&self) -> CompareMode {
        self.mode
    }

    /// Set the zoom. Rejects non-finite or non-positive values.
    pub fn set_scale(&mut self, scale: f64) -> WipeviewResult<()> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(WipeviewError::validation(format!(
                "scale must be finite and > 0, got {scale}"
            )));
        }
        self.scale = scale;
        Ok(())
    }

    /// Set the shared pan offset.
    pub fn set_offset(&mut self, offset: Vec2) {
        self.offset = offset;
    }

    /// Set one image's extra pan offset.
    pub fn set_image_offset(&mut self, which: Which, offset: Vec2) {
        match which {
            Which::A => self.image_offset_a = offset,
            Which::B => self.image_offset_b = offset,
        }
    }

    /// Set the wipe pivot in image-A coordinates.
    pub fn set_wipe_center(&mut self, center: Point) {
        self.wipe_center = center;
    }

    /// Set the wipe rotation. Ignored while `simple_wipe` is on.
    pub fn set_wipe_angle_deg(&mut self, deg: f64) {
        if self.simple_wipe || !deg.is_finite() {
            return;
        }
        self.wipe_angle_deg = deg;
    }

    /// Set the composite-side blend weight, clamped to `[0, 1]`.
    pub fn set_wipe_alpha(&mut self, alpha: f64) {
        self.wipe_alpha = if alpha.is_nan() {
            self.wipe_alpha
        } else {
            alpha.clamp(0.0, 1.0)
        };
    }

    /// Enable or disable the wipe split.
    pub fn set_wipe_enabled(&mut self, enabled: bool) {
        self.wipe_enabled = enabled;
    }

    /// Switch simple wipe mode; turning it on resets the angle to 0.
    pub fn set_simple_wipe(&mut self, simple: bool) {
        self.simple_wipe = simple;
        if simple {
            self.wipe_angle_deg = 0.0;
        }
    }

    /// Select the blend mode.
    pub fn set_mode(&mut self, mode: CompareMode) {
        self.mode = mode;
    }

    /// Check invariants, e.g. after deserializing a persisted view.
    pub fn validate(&self) -> WipeviewResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(WipeviewError::validation("view scale must be finite and > 0"));
        }
        if !(0.0..=1.0).contains(&self.wipe_alpha) {
            return Err(WipeviewError::validation("wipe alpha must be in [0, 1]"));
        }
        if self.simple_wipe && self.wipe_angle_deg != 0.0 {
            return Err(WipeviewError::validation(
                "simple wipe requires a zero wipe angle",
            ));
        }
        Ok(())
    }

    /// Parse and validate a persisted view.
    pub fn from_json_str(s: &str) -> WipeviewResult<Self> {
        let state: ViewState = from_json_object(s, "view state")?;
        state.validate()?;
        Ok(state)
    }

    /// Serialize for persistence.
    pub fn to_json_string(&self) -> WipeviewResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WipeviewError::serde(e.to_string()))
    }
}

/// Immutable snapshot handed to the renderers for one frame.
#[derive(Clone, Debug, Default)]
pub struct FrameState {
    /// View parameters.
    pub view: ViewState,
    /// Image A pyramid, if loaded.
    pub image_a: Option<MipPyramid>,
    /// Image B pyramid, if loaded.
    pub image_b: Option<MipPyramid>,
}

impl FrameState {
    /// Snapshot with the given view and no images.
    pub fn new(view: ViewState) -> Self {
        Self {
            view,
            image_a: None,
            image_b: None,
        }
    }

    /// Attach a pyramid to a slot.
    pub fn with_image(mut self, which: Which, pyramid: MipPyramid) -> Self {
        match which {
            Which::A => self.image_a = Some(pyramid),
            Which::B => self.image_b = Some(pyramid),
        }
        self
    }

    /// Pyramid in a slot.
    pub fn image(&self, which: Which) -> Option<&MipPyramid> {
        match which {
            Which::A => self.image_a.as_ref(),
            Which::B => self.image_b.as_ref(),
        }
    }

    /// `true` when at least one image is loaded.
    pub fn has_any_image(&self) -> bool {
        self.image_a.is_some() || self.image_b.is_some()
    }

    /// `true` when both images are loaded.
    pub fn has_both_images(&self) -> bool {
        self.image_a.is_some() && self.image_b.is_some()
    }

    /// `true` when the frame is split by the wipe line, which needs both images.
    pub fn shows_wipe(&self) -> bool {
        self.view.wipe_enabled() && self.has_both_images()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/state.rs"]
mod tests;
