use super::*;
use crate::foundation::core::Which;
use crate::raster::image::RasterImage;
use crate::raster::mip::MipPyramid;
use crate::surface::CpuSurface;
use crate::view::config::ViewerConfig;
use crate::view::transform::view_to_image;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn halves(w: u32, h: u32) -> RasterImage {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for _y in 0..h {
        for x in 0..w {
            data.extend_from_slice(if x < w / 2 { &RED } else { &BLUE });
        }
    }
    RasterImage::from_straight_rgba8(w, h, data).unwrap()
}

fn renderer(zoom: f64) -> ViewRenderer {
    sized_renderer(zoom, ViewerConfig::default().magnifier.size)
}

fn sized_renderer(zoom: f64, size: u32) -> ViewRenderer {
    let mut config = ViewerConfig::default();
    config.magnifier.zoom = zoom;
    config.magnifier.size = size;
    ViewRenderer::new(config).unwrap()
}

#[test]
fn loupe_view_centers_pointer_content() {
    let mut v = ViewState::new();
    v.set_offset(Vec2::new(5.0, -2.0));
    let pointer = Point::new(30.0, 40.0);
    let loupe = magnifier_view(&v, pointer, Dims::new(20, 20), 4.0)
        .unwrap()
        .unwrap();
    assert!((loupe.scale() - 4.0).abs() < 1e-12);
    let under_pointer = view_to_image(pointer, Which::A, &v);
    let under_center = view_to_image(Point::new(10.0, 10.0), Which::A, &loupe);
    assert!((under_pointer - under_center).hypot() < 1e-9);
}

#[test]
fn non_positive_zoom_disables_loupe() {
    assert!(
        magnifier_view(&ViewState::new(), Point::ZERO, Dims::new(8, 8), 0.0)
            .unwrap()
            .is_none()
    );
    let mut s = CpuSurface::new(20, 20).unwrap();
    let out = renderer(-1.0)
        .render_magnifier(&mut s, &FrameState::default(), Point::ZERO, false)
        .unwrap();
    assert_eq!(out, RenderOutcome::Disabled);
    assert_eq!(s.pixel(10, 10), Some([0, 0, 0, 0]));
}

#[test]
fn loupe_magnifies_and_clips_to_circle() {
    let frame = FrameState::new(ViewState::new())
        .with_image(Which::A, MipPyramid::single(halves(100, 100)));
    let mut s = CpuSurface::new(20, 20).unwrap();
    let out = renderer(4.0)
        .render_magnifier(&mut s, &frame, Point::new(50.0, 50.0), false)
        .unwrap();
    assert_eq!(out, RenderOutcome::Rendered);
    assert_eq!(s.pixel(5, 5), Some(RED));
    assert_eq!(s.pixel(14, 5), Some(BLUE));
    assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(s.pixel(19, 19), Some([0, 0, 0, 0]));
    let cross = s.pixel(10, 10).unwrap();
    assert!(cross[0] > 150, "{cross:?}");
}

#[test]
fn checkerboard_lines_up_with_main_view_under_pointer() {
    let r = renderer(4.0);
    let mut main = CpuSurface::new(40, 40).unwrap();
    r.render_frame(&mut main, &FrameState::default(), false)
        .unwrap();
    let mut loupe = CpuSurface::new(20, 20).unwrap();
    let out = r
        .render_magnifier(&mut loupe, &FrameState::default(), Point::new(20.0, 20.0), false)
        .unwrap();
    assert_eq!(out, RenderOutcome::NoImage);
    for (x, y) in [(3, 4), (15, 15), (5, 14), (14, 6)] {
        assert_eq!(loupe.pixel(x, y), main.pixel(x + 10, y + 10), "({x}, {y})");
    }
}

#[test]
fn loupe_size_comes_from_config() {
    let frame = FrameState::new(ViewState::new())
        .with_image(Which::A, MipPyramid::single(halves(100, 100)));
    let mut s = CpuSurface::new(40, 40).unwrap();
    let out = sized_renderer(4.0, 20)
        .render_magnifier(&mut s, &frame, Point::new(50.0, 50.0), false)
        .unwrap();
    assert_eq!(out, RenderOutcome::Rendered);
    // Same picture as a 20x20 surface; the rest of the surface is untouched.
    assert_eq!(s.pixel(5, 5), Some(RED));
    assert_eq!(s.pixel(14, 5), Some(BLUE));
    let cross = s.pixel(10, 10).unwrap();
    assert!(cross[0] > 150, "{cross:?}");
    for (x, y) in [(25, 25), (30, 10), (10, 30), (39, 39)] {
        assert_eq!(s.pixel(x, y), Some([0, 0, 0, 0]), "({x}, {y})");
    }
}
