use std::sync::Arc;

use crate::foundation::core::Dims;
use crate::foundation::error::{WipeviewError, WipeviewResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8};

/// Decoded raster image held as premultiplied RGBA8.
///
/// Pixels are shared behind an `Arc` so mip levels, frame snapshots and the viewer can hold
/// the same buffer without copying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
}

impl RasterImage {
    /// Wrap an already premultiplied RGBA8 buffer.
    pub fn from_premul_rgba8(width: u32, height: u32, data: Vec<u8>) -> WipeviewResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|v| v.checked_mul(4))
            .ok_or_else(|| WipeviewError::validation("image buffer size overflow"))?;
        if data.len() != expected {
            return Err(WipeviewError::validation(format!(
                "image buffer has {} bytes, expected {expected} for {width}x{height}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
        })
    }

    /// Build from straight-alpha RGBA8 bytes (the usual decoder output).
    pub fn from_straight_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> WipeviewResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul_rgba8(width, height, data)
    }

    /// Build from an `image` crate RGBA buffer.
    pub fn from_rgba_image(img: image::RgbaImage) -> WipeviewResult<Self> {
        let (width, height) = img.dimensions();
        Self::from_straight_rgba8(width, height, img.into_raw())
    }

    /// Solid-colored image, mostly useful for tests and placeholders.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> WipeviewResult<Self> {
        Self::from_straight_rgba8(width, height, rgba.repeat(Dims::new(width, height).pixel_count()))
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height together.
    pub fn dims(&self) -> Dims {
        Dims::new(self.width, self.height)
    }

    /// Premultiplied RGBA8 bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    /// Premultiplied pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel_premul(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let d = &self.rgba8_premul[idx..idx + 4];
        Some([d[0], d[1], d[2], d[3]])
    }

    /// Straight-alpha pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.pixel_premul(x, y).map(unpremultiply_rgba8)
    }

    /// Export as a straight-alpha `image::RgbaImage`.
    pub fn to_rgba_image(&self) -> WipeviewResult<image::RgbaImage> {
        let mut out = Vec::with_capacity(self.rgba8_premul.len());
        for px in self.rgba8_premul.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply_rgba8([px[0], px[1], px[2], px[3]]));
        }
        image::RgbaImage::from_raw(self.width, self.height, out)
            .ok_or_else(|| WipeviewError::image("rgba buffer does not match image dimensions"))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/image.rs"]
mod tests;
