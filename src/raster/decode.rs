use anyhow::Context;

use crate::foundation::error::WipeviewResult;
use crate::raster::image::RasterImage;

/// Decode encoded image bytes (PNG, JPEG, ...) into a premultiplied [`RasterImage`].
///
/// Decoding normally belongs to the host; this adapter exists for hosts and tools that only
/// have file bytes at hand.
pub fn decode_image(bytes: &[u8]) -> WipeviewResult<RasterImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    RasterImage::from_rgba_image(dyn_img.to_rgba8())
}

#[cfg(test)]
#[path = "../../tests/unit/raster/decode.rs"]
mod tests;
