use super::*;
use crate::foundation::core::{Point, Rgba8};
use crate::raster::image::RasterImage;
use crate::raster::mip::MipPyramid;
use crate::surface::CpuSurface;
use crate::view::state::ViewState;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn pyramid(w: u32, h: u32, rgba: [u8; 4]) -> MipPyramid {
    MipPyramid::single(RasterImage::filled(w, h, rgba).unwrap())
}

fn split_frame(center: Point, alpha: f64) -> FrameState {
    let mut view = ViewState::new();
    view.set_wipe_center(center);
    view.set_wipe_alpha(alpha);
    FrameState::new(view)
        .with_image(Which::A, pyramid(100, 100, RED))
        .with_image(Which::B, pyramid(100, 100, BLUE))
}

fn close(px: [u8; 4], want: [u8; 4]) -> bool {
    px.iter()
        .zip(want.iter())
        .all(|(a, b)| (i16::from(*a) - i16::from(*b)).abs() <= 2)
}

fn render(frame: &FrameState) -> CpuSurface {
    let renderer = ViewRenderer::new(ViewerConfig::default()).unwrap();
    let mut s = CpuSurface::new(100, 100).unwrap();
    let out = renderer.render_frame(&mut s, frame, false).unwrap();
    assert_eq!(out, RenderOutcome::Rendered);
    s
}

#[test]
fn unavailable_surface_is_reported_not_an_error() {
    let renderer = ViewRenderer::new(ViewerConfig::default()).unwrap();
    let mut s = CpuSurface::new(0, 0).unwrap();
    let out = renderer
        .render_frame(&mut s, &split_frame(Point::new(50.0, 50.0), 0.5), true)
        .unwrap();
    assert_eq!(out, RenderOutcome::SurfaceUnavailable);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = ViewerConfig::default();
    config.magnifier.size = 0;
    assert!(ViewRenderer::new(config).is_err());
}

#[test]
fn empty_frame_paints_checkerboard_locked_to_origin() {
    let renderer = ViewRenderer::new(ViewerConfig::default()).unwrap();
    let mut s = CpuSurface::new(32, 32).unwrap();
    let out = renderer
        .render_frame(&mut s, &FrameState::default(), true)
        .unwrap();
    assert_eq!(out, RenderOutcome::NoImage);
    assert_eq!(s.pixel(0, 0), Some([204, 204, 204, 255]));
    assert_eq!(s.pixel(8, 0), Some([153, 153, 153, 255]));
    assert_eq!(s.pixel(8, 8), Some([204, 204, 204, 255]));
}

#[test]
fn solid_background_fills_surface() {
    let config = ViewerConfig {
        background: Background::Solid {
            color: Rgba8::new(10, 20, 30, 255),
        },
        ..ViewerConfig::default()
    };
    let renderer = ViewRenderer::new(config).unwrap();
    let mut s = CpuSurface::new(4, 4).unwrap();
    renderer
        .render_frame(&mut s, &FrameState::default(), false)
        .unwrap();
    assert_eq!(s.pixel(3, 3), Some([10, 20, 30, 255]));
}

#[test]
fn wipe_shows_a_left_and_blend_right() {
    let s = render(&split_frame(Point::new(50.0, 50.0), 0.5));
    assert_eq!(s.pixel(20, 50), Some(RED));
    assert_eq!(s.pixel(49, 10), Some(RED));
    assert!(close(s.pixel(50, 10).unwrap(), [128, 0, 127, 255]));
    assert!(close(s.pixel(80, 90).unwrap(), [128, 0, 127, 255]));
}

#[test]
fn wipe_center_past_b_shows_only_a() {
    let s = render(&split_frame(Point::new(150.0, 50.0), 0.5));
    for (x, y) in [(0, 0), (50, 50), (99, 99)] {
        assert_eq!(s.pixel(x, y), Some(RED));
    }
}

#[test]
fn simple_wipe_replaces_with_b() {
    let mut frame = split_frame(Point::new(50.0, 50.0), 0.2);
    frame.view.set_simple_wipe(true);
    let s = render(&frame);
    assert_eq!(s.pixel(20, 20), Some(RED));
    assert_eq!(s.pixel(80, 20), Some(BLUE));
}

#[test]
fn disabled_wipe_composites_everywhere() {
    let mut frame = split_frame(Point::new(50.0, 50.0), 0.5);
    frame.view.set_wipe_enabled(false);
    let s = render(&frame);
    assert!(close(s.pixel(10, 10).unwrap(), [128, 0, 127, 255]));
    assert!(close(s.pixel(90, 90).unwrap(), [128, 0, 127, 255]));
}

#[test]
fn composite_is_limited_to_b_rectangle() {
    let mut view = ViewState::new();
    view.set_wipe_center(Point::new(-1.0, 0.0));
    view.set_wipe_alpha(1.0);
    let frame = FrameState::new(view)
        .with_image(Which::A, pyramid(100, 100, RED))
        .with_image(Which::B, pyramid(50, 50, BLUE));
    let s = render(&frame);
    assert_eq!(s.pixel(25, 25), Some(BLUE));
    assert_eq!(s.pixel(75, 75), Some(RED));
    assert_eq!(s.pixel(75, 10), Some(RED));
}

#[test]
fn overlay_is_drawn_on_request() {
    let renderer = ViewRenderer::new(ViewerConfig::default()).unwrap();
    let frame = split_frame(Point::new(50.0, 50.0), 1.0);
    let mut plain = CpuSurface::new(100, 100).unwrap();
    renderer.render_frame(&mut plain, &frame, false).unwrap();
    let mut with = CpuSurface::new(100, 100).unwrap();
    renderer.render_frame(&mut with, &frame, true).unwrap();
    assert_ne!(plain.pixel(50, 50), with.pixel(50, 50));
    assert_eq!(plain.pixel(5, 95), with.pixel(5, 95));
}
