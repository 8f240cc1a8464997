use crate::foundation::core::{Point, Which};
use crate::view::state::FrameState;
use crate::view::transform::view_to_image;

/// What one image shows under a view-space point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelProbe {
    /// The point in the image's own coordinates.
    pub image_point: Point,
    /// Pixel under the point and its straight RGBA value, or `None` outside the image.
    pub pixel: Option<((u32, u32), [u8; 4])>,
}

/// Probe of both slots; a slot without an image yields `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProbeReport {
    /// Image A.
    pub a: Option<PixelProbe>,
    /// Image B.
    pub b: Option<PixelProbe>,
}

impl ProbeReport {
    /// Probe for one slot.
    pub fn get(&self, which: Which) -> Option<&PixelProbe> {
        match which {
            Which::A => self.a.as_ref(),
            Which::B => self.b.as_ref(),
        }
    }
}

/// Full-resolution pixel of each image under `view_point`.
pub fn probe_pixels(frame: &FrameState, view_point: Point) -> ProbeReport {
    let probe = |which: Which| {
        let pyramid = frame.image(which)?;
        let image = pyramid.base();
        let p = view_to_image(view_point, which, &frame.view);
        let pixel = (p.x >= 0.0 && p.y >= 0.0)
            .then(|| (p.x.floor() as u32, p.y.floor() as u32))
            .and_then(|(x, y)| image.pixel_rgba(x, y).map(|rgba| ((x, y), rgba)));
        Some(PixelProbe {
            image_point: p,
            pixel,
        })
    };
    ProbeReport {
        a: probe(Which::A),
        b: probe(Which::B),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metric/probe.rs"]
mod tests;
