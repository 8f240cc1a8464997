use crate::foundation::core::Rgba8;
use crate::foundation::error::{WipeviewError, WipeviewResult};
use crate::surface::CheckerPattern;
use crate::view::from_json_object;

/// Frame background painted before any image.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    /// Single color.
    Solid {
        /// Fill color.
        color: Rgba8,
    },
    /// Checkerboard fixed to the surface origin.
    Checkerboard {
        /// Square edge length in pixels.
        cell: u32,
        /// Color of the origin square.
        light: Rgba8,
        /// Alternate square color.
        dark: Rgba8,
    },
}

impl Default for Background {
    fn default() -> Self {
        Background::Checkerboard {
            cell: 8,
            light: Rgba8::new(204, 204, 204, 255),
            dark: Rgba8::new(153, 153, 153, 255),
        }
    }
}

impl Background {
    /// Pattern tile for checkerboard backgrounds.
    pub fn pattern(&self) -> Option<CheckerPattern> {
        match self {
            Background::Solid { .. } => None,
            Background::Checkerboard { cell, light, dark } => {
                Some(CheckerPattern::new(*cell, *light, *dark))
            }
        }
    }
}

/// Wipe line and handle appearance, plus the hit-test radius shared with pointer handling.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Stroke width of the wipe line and handle outlines.
    pub line_width: f64,
    /// Wipe line color.
    pub line_color: Rgba8,
    /// Handle color.
    pub handle_color: Rgba8,
    /// Drawn radius of the round handles.
    pub handle_radius: f64,
    /// Pointer distance within which a handle is hit.
    pub hit_radius: f64,
    /// Distance from the wipe center to the rotation handle.
    pub rotate_handle_distance: f64,
    /// Radius of the alpha arc around the wipe center.
    pub alpha_arc_radius: f64,
    /// Angular span of the alpha arc in degrees.
    pub alpha_arc_span_deg: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            line_width: 2.0,
            line_color: Rgba8::new(255, 255, 255, 230),
            handle_color: Rgba8::new(255, 200, 0, 255),
            handle_radius: 6.0,
            hit_radius: 10.0,
            rotate_handle_distance: 80.0,
            alpha_arc_radius: 50.0,
            alpha_arc_span_deg: 90.0,
        }
    }
}

/// Magnifier loupe settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MagnifierOpts {
    /// Edge length of the square loupe in pixels.
    pub size: u32,
    /// Zoom relative to the main view; `<= 0` disables the loupe.
    pub zoom: f64,
    /// Crosshair color.
    pub crosshair_color: Rgba8,
}

impl Default for MagnifierOpts {
    fn default() -> Self {
        Self {
            size: 160,
            zoom: 4.0,
            crosshair_color: Rgba8::new(255, 0, 0, 200),
        }
    }
}

/// Every renderer tunable, loadable from JSON.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Frame background.
    pub background: Background,
    /// Wipe overlay appearance.
    pub overlay: OverlayStyle,
    /// Magnifier loupe.
    pub magnifier: MagnifierOpts,
}

impl ViewerConfig {
    /// Reject values the renderers cannot work with.
    pub fn validate(&self) -> WipeviewResult<()> {
        if let Background::Checkerboard { cell: 0, .. } = self.background {
            return Err(WipeviewError::validation("checkerboard cell must be > 0"));
        }
        let o = &self.overlay;
        let positive = [
            ("overlay.line_width", o.line_width),
            ("overlay.handle_radius", o.handle_radius),
            ("overlay.hit_radius", o.hit_radius),
            ("overlay.rotate_handle_distance", o.rotate_handle_distance),
            ("overlay.alpha_arc_radius", o.alpha_arc_radius),
        ];
        for (name, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(WipeviewError::validation(format!("{name} must be > 0")));
            }
        }
        if !(o.alpha_arc_span_deg > 0.0 && o.alpha_arc_span_deg < 360.0) {
            return Err(WipeviewError::validation(
                "overlay.alpha_arc_span_deg must be in (0, 360)",
            ));
        }
        if self.magnifier.size == 0 {
            return Err(WipeviewError::validation("magnifier.size must be > 0"));
        }
        if !self.magnifier.zoom.is_finite() {
            return Err(WipeviewError::validation("magnifier.zoom must be finite"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(s: &str) -> WipeviewResult<Self> {
        let cfg: ViewerConfig = from_json_object(s, "viewer config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize as pretty JSON.
    pub fn to_json_string(&self) -> WipeviewResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WipeviewError::serde(e.to_string()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/view/config.rs"]
mod tests;
