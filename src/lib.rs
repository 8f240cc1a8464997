//! Wipeview renders a comparison of two raster images in a pannable, zoomable viewport.
//!
//! A movable, rotatable wipe line splits the view: image A is shown unmodified on one side,
//! and on the other a blend of A and B (under, onion skin, difference, inverted difference,
//! or either image alone). The crate also provides the mip pyramids used for minified
//! drawing, a magnifier loupe and an overlap/PSNR metric.
//!
//! The typical flow is:
//!
//! - Create a [`Viewer`] with a [`ViewerConfig`]
//! - Load two [`RasterImage`]s (see [`decode_image`])
//! - Feed pointer interactions, then render each frame into a [`Surface`] such as [`CpuSurface`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod geometry;
mod metric;
mod raster;
mod render;
mod session;
mod surface;
mod view;

pub use crate::foundation::core::{Affine, BezPath, Dims, Point, Rect, Rgba8, Vec2, Which};
pub use crate::foundation::error::{WipeviewError, WipeviewResult};

pub use crate::geometry::polygon::ClipPolygon;
pub use crate::geometry::wipe::{WipeLine, clip_rect_to_half_plane, composite_clip, effective_alpha};
pub use crate::metric::overlap::{OverlapRect, Psnr, PsnrReport, compute_overlap_and_psnr, overlap, psnr};
pub use crate::metric::probe::{PixelProbe, ProbeReport, probe_pixels};
pub use crate::raster::decode::decode_image;
pub use crate::raster::image::RasterImage;
pub use crate::raster::mip::{
    MIN_PYRAMID_EDGE, MipBuild, MipBuildOutcome, MipCache, MipLevels, MipPyramid, mip_levels,
    select_level_index, smoothing_for_scale,
};
pub use crate::render::composite::{draw_image_layer, render_composite};
pub use crate::render::frame::{RenderOutcome, ViewRenderer};
pub use crate::render::magnifier::magnifier_view;
pub use crate::render::overlay::{
    AlphaArc, HandleKind, HandleLayout, alpha_from_arc_point, angle_towards, draw_overlay,
    handle_layout, hit_test_handles,
};
pub use crate::session::viewer::Viewer;
pub use crate::surface::{BlendOp, CheckerPattern, CpuSurface, Paint, Surface};
pub use crate::view::config::{Background, MagnifierOpts, OverlayStyle, ViewerConfig};
pub use crate::view::state::{CompareMode, FrameState, ViewState};
pub use crate::view::transform::{
    image_rect_in_view, image_to_view, view_to_image, view_translation, zoom_about,
};
