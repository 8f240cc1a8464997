//! Overlap of the two images and PSNR over it.

use std::fmt;

use rayon::prelude::*;

use crate::foundation::core::{Dims, Vec2, Which};
use crate::raster::image::RasterImage;
use crate::view::state::FrameState;

/// Overlapping pixel block of A and B, in each image's own pixel grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OverlapRect {
    /// Block width in pixels.
    pub width: u32,
    /// Block height in pixels.
    pub height: u32,
    /// Top-left of the block in image A.
    pub origin_a: (u32, u32),
    /// Top-left of the block in image B.
    pub origin_b: (u32, u32),
}

/// Overlap of two images placed by per-image view offsets.
///
/// Offsets are in view pixels; dividing by `scale` and rounding to the nearest pixel gives the
/// image-pixel displacement. `None` when the images do not share a pixel.
pub fn overlap(
    dims_a: Dims,
    offset_a: Vec2,
    dims_b: Dims,
    offset_b: Vec2,
    scale: f64,
) -> Option<OverlapRect> {
    if !(scale > 0.0) || dims_a.is_empty() || dims_b.is_empty() {
        return None;
    }
    let to_px = |v: f64| (v / scale).round() as i64;
    let (ax, ay) = (to_px(offset_a.x), to_px(offset_a.y));
    let (bx, by) = (to_px(offset_b.x), to_px(offset_b.y));

    let x0 = ax.max(bx);
    let y0 = ay.max(by);
    let x1 = (ax + i64::from(dims_a.width)).min(bx + i64::from(dims_b.width));
    let y1 = (ay + i64::from(dims_a.height)).min(by + i64::from(dims_b.height));
    if x1 <= x0 || y1 <= y0 {
        return None;
    }
    Some(OverlapRect {
        width: (x1 - x0) as u32,
        height: (y1 - y0) as u32,
        origin_a: ((x0 - ax) as u32, (y0 - ay) as u32),
        origin_b: ((x0 - bx) as u32, (y0 - by) as u32),
    })
}

/// PSNR of a pixel block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Psnr {
    /// No pixel could be compared.
    NoValidPixels,
    /// Mean squared error is zero.
    Identical,
    /// Finite PSNR in decibels.
    Db(f64),
}

/// PSNR over the RGB channels of `rect`, with A and B read in straight alpha.
///
/// `PSNR = 20·log10(255) − 10·log10(MSE)`, where MSE averages over every compared channel.
/// Alpha is ignored. Rows are summed in parallel with integer accumulators, so the value is
/// independent of thread scheduling and of argument order.
pub fn psnr(a: &RasterImage, b: &RasterImage, rect: &OverlapRect) -> Psnr {
    let (sum, count) = (0..rect.height)
        .into_par_iter()
        .map(|row| {
            let mut sum = 0u64;
            let mut count = 0u64;
            for col in 0..rect.width {
                let pa = a.pixel_rgba(rect.origin_a.0 + col, rect.origin_a.1 + row);
                let pb = b.pixel_rgba(rect.origin_b.0 + col, rect.origin_b.1 + row);
                let (Some(pa), Some(pb)) = (pa, pb) else {
                    continue;
                };
                for c in 0..3 {
                    let d = i64::from(pa[c]) - i64::from(pb[c]);
                    sum += (d * d) as u64;
                }
                count += 1;
            }
            (sum, count)
        })
        .reduce(|| (0, 0), |l, r| (l.0 + r.0, l.1 + r.1));

    if count == 0 {
        return Psnr::NoValidPixels;
    }
    if sum == 0 {
        return Psnr::Identical;
    }
    let mse = sum as f64 / (count * 3) as f64;
    Psnr::Db(20.0 * 255f64.log10() - 10.0 * mse.log10())
}

/// Outcome of an overlap + PSNR query, with the display strings hosts show.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PsnrReport {
    /// At least one image is missing.
    MissingImage,
    /// The images do not overlap.
    NoOverlap,
    /// The overlap had no comparable pixels.
    NoValidPixels,
    /// The overlapping pixels match exactly.
    Identical,
    /// PSNR in decibels with the overlap it was measured on.
    Db {
        /// PSNR value.
        db: f64,
        /// Region compared.
        overlap: OverlapRect,
    },
}

impl fmt::Display for PsnrReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PsnrReport::MissingImage => f.write_str("N/A"),
            PsnrReport::NoOverlap => f.write_str("no overlap"),
            PsnrReport::NoValidPixels => f.write_str("no valid pixels"),
            PsnrReport::Identical => f.write_str("identical"),
            PsnrReport::Db { db, .. } => write!(f, "{db:.2} dB"),
        }
    }
}

/// Overlap and PSNR of the frame's full-resolution images.
#[tracing::instrument(skip_all)]
pub fn compute_overlap_and_psnr(frame: &FrameState) -> PsnrReport {
    let (Some(a), Some(b)) = (frame.image(Which::A), frame.image(Which::B)) else {
        return PsnrReport::MissingImage;
    };
    let (a, b) = (a.base(), b.base());
    let view = &frame.view;
    let Some(rect) = overlap(
        a.dims(),
        view.image_offset(Which::A),
        b.dims(),
        view.image_offset(Which::B),
        view.scale(),
    ) else {
        return PsnrReport::NoOverlap;
    };
    let report = match psnr(a, b, &rect) {
        Psnr::NoValidPixels => PsnrReport::NoValidPixels,
        Psnr::Identical => PsnrReport::Identical,
        Psnr::Db(db) => PsnrReport::Db { db, overlap: rect },
    };
    tracing::debug!(width = rect.width, height = rect.height, %report, "psnr computed");
    report
}

#[cfg(test)]
#[path = "../../tests/unit/metric/overlap.rs"]
mod tests;
