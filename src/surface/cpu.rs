use std::sync::Arc;

use kurbo::Shape;

use crate::foundation::core::{BezPath, Point, Rect, Rgba8};
use crate::foundation::error::{WipeviewError, WipeviewResult};
use crate::foundation::math::unpremultiply_rgba8;
use crate::raster::image::RasterImage;
use crate::surface::blend::{BlendOp, blend_px};
use crate::surface::{Paint, Surface};

const STROKE_TOLERANCE: f64 = 0.1;

/// Pixel-center coverage mask for the current clip, one byte per surface pixel.
#[derive(Debug)]
struct ClipMask {
    inside: Vec<bool>,
    bounds: PixelBounds,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelBounds {
    fn is_empty(self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    fn intersect(self, o: PixelBounds) -> PixelBounds {
        PixelBounds {
            x0: self.x0.max(o.x0),
            y0: self.y0.max(o.y0),
            x1: self.x1.min(o.x1),
            y1: self.y1.min(o.y1),
        }
    }
}

#[derive(Clone, Debug)]
struct DrawState {
    alpha: f32,
    blend: BlendOp,
    clip: Option<Arc<ClipMask>>,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            blend: BlendOp::Over,
            clip: None,
        }
    }
}

/// CPU drawing surface backed by a premultiplied RGBA8 `vello_cpu` pixmap.
///
/// Images, rectangles and offscreen blits are composited with integer premultiplied math.
/// Vector paths are rasterized by `vello_cpu` into a scratch pixmap first and then composited
/// through the same clip, opacity and blend state.
pub struct CpuSurface {
    width: u32,
    height: u32,
    pixmap: Option<vello_cpu::Pixmap>,
    state: DrawState,
    stack: Vec<DrawState>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuSurface {
    /// Create a transparent surface. Surface edges are limited to `u16::MAX` pixels.
    ///
    /// A zero-sized surface is allowed but unavailable: every draw call is a no-op.
    pub fn new(width: u32, height: u32) -> WipeviewResult<Self> {
        let pixmap = if width == 0 || height == 0 {
            None
        } else {
            let w: u16 = width
                .try_into()
                .map_err(|_| WipeviewError::surface(format!("surface width {width} exceeds u16")))?;
            let h: u16 = height.try_into().map_err(|_| {
                WipeviewError::surface(format!("surface height {height} exceeds u16"))
            })?;
            Some(vello_cpu::Pixmap::new(w, h))
        };
        Ok(Self {
            width,
            height,
            pixmap,
            state: DrawState::default(),
            stack: Vec::new(),
            ctx: None,
        })
    }

    /// Overwrite every pixel with `color`, ignoring clip and blend state.
    pub fn clear(&mut self, color: Rgba8) {
        let px = color.premul();
        if let Some(pixmap) = self.pixmap.as_mut() {
            for d in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
                d.copy_from_slice(&px);
            }
        }
    }

    /// Premultiplied RGBA8 bytes, row-major. Empty for an unavailable surface.
    pub fn data(&self) -> &[u8] {
        match &self.pixmap {
            Some(p) => p.data_as_u8_slice(),
            None => &[],
        }
    }

    /// Straight-alpha pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.index(x, y);
        let d = &self.data()[idx..idx + 4];
        Some(unpremultiply_rgba8([d[0], d[1], d[2], d[3]]))
    }

    /// Copy the current contents into a [`RasterImage`].
    pub fn snapshot(&self) -> WipeviewResult<RasterImage> {
        if self.pixmap.is_none() {
            return Err(WipeviewError::surface("cannot read back an unavailable surface"));
        }
        RasterImage::from_premul_rgba8(self.width, self.height, self.data().to_vec())
    }

    fn index(&self, x: u32, y: u32) -> usize {
        ((y as usize) * (self.width as usize) + (x as usize)) * 4
    }

    fn full_bounds(&self) -> PixelBounds {
        PixelBounds {
            x0: 0,
            y0: 0,
            x1: self.width,
            y1: self.height,
        }
    }

    /// Pixels whose centers lie inside `rect`, limited to the surface and current clip.
    fn rect_bounds(&self, rect: Rect) -> PixelBounds {
        let to_px = |v: f64, max: u32| -> u32 { (v - 0.5).ceil().clamp(0.0, f64::from(max)) as u32 };
        let r = PixelBounds {
            x0: to_px(rect.x0, self.width),
            y0: to_px(rect.y0, self.height),
            x1: to_px(rect.x1, self.width),
            y1: to_px(rect.y1, self.height),
        };
        let r = r.intersect(self.full_bounds());
        match &self.state.clip {
            Some(clip) => r.intersect(clip.bounds),
            None => r,
        }
    }

    /// Composite `src_at(x, y)` onto every pixel in `bounds` that passes the clip.
    fn composite_with(
        &mut self,
        bounds: PixelBounds,
        mut src_at: impl FnMut(u32, u32) -> Option<[u8; 4]>,
    ) {
        if bounds.is_empty() {
            return;
        }
        let width = self.width as usize;
        let alpha = self.state.alpha;
        let blend = self.state.blend;
        let clip = self.state.clip.clone();
        let Some(pixmap) = self.pixmap.as_mut() else {
            return;
        };
        let data = pixmap.data_as_u8_slice_mut();
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let pi = (y as usize) * width + (x as usize);
                if let Some(clip) = &clip
                    && !clip.inside[pi]
                {
                    continue;
                }
                let Some(src) = src_at(x, y) else {
                    continue;
                };
                let idx = pi * 4;
                let dst = [data[idx], data[idx + 1], data[idx + 2], data[idx + 3]];
                data[idx..idx + 4].copy_from_slice(&blend_px(blend, dst, src, alpha));
            }
        }
    }

    /// Rasterize a filled path with `vello_cpu` into a scratch pixmap of surface size.
    fn rasterize_fill(&mut self, path: &BezPath, color: Rgba8) -> Option<vello_cpu::Pixmap> {
        let pixmap = self.pixmap.as_ref()?;
        let (w, h) = (pixmap.width(), pixmap.height());
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        ctx.fill_path(&bezpath_to_cpu(path));
        ctx.flush();
        let mut out = vello_cpu::Pixmap::new(w, h);
        ctx.render_to_pixmap(&mut out);
        self.ctx = Some(ctx);
        Some(out)
    }

    fn composite_coverage(&mut self, path: &BezPath, color: Rgba8) {
        let Some(layer) = self.rasterize_fill(path, color) else {
            return;
        };
        let bounds = self.rect_bounds(path.bounding_box().inflate(1.0, 1.0));
        let width = self.width as usize;
        let src = layer.data_as_u8_slice();
        self.composite_with(bounds, |x, y| {
            let idx = ((y as usize) * width + (x as usize)) * 4;
            let px = [src[idx], src[idx + 1], src[idx + 2], src[idx + 3]];
            (px[3] != 0).then_some(px)
        });
    }
}

impl Surface for CpuSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn is_available(&self) -> bool {
        self.pixmap.is_some()
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.state.alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    fn global_alpha(&self) -> f32 {
        self.state.alpha
    }

    fn set_blend_op(&mut self, op: BlendOp) {
        self.state.blend = op;
    }

    fn blend_op(&self) -> BlendOp {
        self.state.blend
    }

    fn clip_path(&mut self, path: &BezPath) {
        if self.pixmap.is_none() {
            return;
        }
        let width = self.width as usize;
        let mut inside = vec![false; width * self.height as usize];
        let mut bounds = self.rect_bounds(path.bounding_box());
        let mut any = false;
        let (mut bx0, mut by0, mut bx1, mut by1) = (u32::MAX, u32::MAX, 0u32, 0u32);
        for y in bounds.y0..bounds.y1 {
            for x in bounds.x0..bounds.x1 {
                let pi = (y as usize) * width + (x as usize);
                if let Some(prev) = &self.state.clip
                    && !prev.inside[pi]
                {
                    continue;
                }
                if path.contains(Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5)) {
                    inside[pi] = true;
                    any = true;
                    bx0 = bx0.min(x);
                    by0 = by0.min(y);
                    bx1 = bx1.max(x + 1);
                    by1 = by1.max(y + 1);
                }
            }
        }
        bounds = if any {
            PixelBounds {
                x0: bx0,
                y0: by0,
                x1: bx1,
                y1: by1,
            }
        } else {
            PixelBounds {
                x0: 0,
                y0: 0,
                x1: 0,
                y1: 0,
            }
        };
        self.state.clip = Some(Arc::new(ClipMask { inside, bounds }));
    }

    fn fill_rect(&mut self, rect: Rect, paint: Paint<'_>) {
        let bounds = self.rect_bounds(rect);
        match paint {
            Paint::Solid(color) => {
                let px = color.premul();
                self.composite_with(bounds, |_, _| Some(px));
            }
            Paint::Pattern { pattern, phase } => {
                self.composite_with(bounds, |x, y| {
                    Some(pattern.sample(f64::from(x) + phase.x, f64::from(y) + phase.y))
                });
            }
        }
    }

    fn fill_path(&mut self, path: &BezPath, color: Rgba8) {
        self.composite_coverage(path, color);
    }

    fn stroke_path(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        let outline = kurbo::stroke(
            path.iter(),
            &kurbo::Stroke::new(width),
            &kurbo::StrokeOpts::default(),
            STROKE_TOLERANCE,
        );
        self.composite_coverage(&outline, color);
    }

    fn draw_image(&mut self, image: &RasterImage, src: Rect, dst: Rect, smoothing: bool) {
        if dst.width() <= 0.0 || dst.height() <= 0.0 || src.width() <= 0.0 || src.height() <= 0.0
        {
            return;
        }
        if image.width() == 0 || image.height() == 0 {
            return;
        }
        let bounds = self.rect_bounds(dst);
        let sx = src.width() / dst.width();
        let sy = src.height() / dst.height();
        self.composite_with(bounds, |x, y| {
            let u = src.x0 + (f64::from(x) + 0.5 - dst.x0) * sx;
            let v = src.y0 + (f64::from(y) + 0.5 - dst.y0) * sy;
            Some(if smoothing {
                sample_bilinear(image, u, v)
            } else {
                sample_nearest(image, u, v)
            })
        });
    }

    fn draw_surface(&mut self, src: &Self) {
        let bounds = self.full_bounds().intersect(src.full_bounds());
        let src_width = src.width as usize;
        let data = src.data();
        if data.is_empty() {
            return;
        }
        self.composite_with(bounds, |x, y| {
            let idx = ((y as usize) * src_width + (x as usize)) * 4;
            Some([data[idx], data[idx + 1], data[idx + 2], data[idx + 3]])
        });
    }

    fn create_offscreen(&self, width: u32, height: u32) -> WipeviewResult<Self> {
        CpuSurface::new(width, height)
    }
}

fn sample_nearest(image: &RasterImage, u: f64, v: f64) -> [u8; 4] {
    let x = (u.floor().max(0.0) as u32).min(image.width() - 1);
    let y = (v.floor().max(0.0) as u32).min(image.height() - 1);
    image.pixel_premul(x, y).unwrap_or([0; 4])
}

fn sample_bilinear(image: &RasterImage, u: f64, v: f64) -> [u8; 4] {
    let fx = u - 0.5;
    let fy = v - 0.5;
    let x0f = fx.floor();
    let y0f = fy.floor();
    let tx = (fx - x0f) as f32;
    let ty = (fy - y0f) as f32;

    let max_x = i64::from(image.width()) - 1;
    let max_y = i64::from(image.height()) - 1;
    let cx = |v: i64| v.clamp(0, max_x) as u32;
    let cy = |v: i64| v.clamp(0, max_y) as u32;
    let (x0, y0) = (x0f as i64, y0f as i64);

    let p00 = image.pixel_premul(cx(x0), cy(y0)).unwrap_or([0; 4]);
    let p10 = image.pixel_premul(cx(x0 + 1), cy(y0)).unwrap_or([0; 4]);
    let p01 = image.pixel_premul(cx(x0), cy(y0 + 1)).unwrap_or([0; 4]);
    let p11 = image.pixel_premul(cx(x0 + 1), cy(y0 + 1)).unwrap_or([0; 4]);

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f32::from(p00[i]) * (1.0 - tx) + f32::from(p10[i]) * tx;
        let bottom = f32::from(p01[i]) * (1.0 - tx) + f32::from(p11[i]) * tx;
        out[i] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/cpu.rs"]
mod tests;
