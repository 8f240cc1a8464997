use super::*;
use crate::raster::mip::MipBuildOutcome;
use crate::surface::CpuSurface;

fn viewer() -> Viewer {
    Viewer::with_mip_cache(ViewerConfig::default(), MipCache::inline()).unwrap()
}

fn loaded() -> Viewer {
    let mut v = viewer();
    let img = RasterImage::filled(100, 80, [255, 0, 0, 255]).unwrap();
    assert!(matches!(
        v.load_image(Which::A, img.clone()).wait(),
        MipBuildOutcome::Complete { .. }
    ));
    v.load_image(Which::B, img).wait();
    v
}

#[test]
fn first_image_a_centers_the_wipe() {
    let v = loaded();
    assert_eq!(v.view().wipe_center(), Point::new(50.0, 40.0));
    assert_eq!(v.image_dims(Which::B), Some(Dims::new(100, 80)));
    let frame = v.frame();
    assert!(frame.has_both_images());
    assert!(frame.image(Which::A).unwrap().is_complete());
}

#[test]
fn clear_image_empties_the_slot() {
    let mut v = loaded();
    v.clear_image(Which::B);
    assert!(v.frame().image(Which::B).is_none());
    assert_eq!(v.overlap_psnr().to_string(), "N/A");
}

#[test]
fn zoom_at_keeps_cursor_content_fixed() {
    let mut v = loaded();
    v.pan_image(Which::B, Vec2::new(7.0, -3.0));
    let cursor = Point::new(33.0, 21.0);
    let before = [
        view_to_image(cursor, Which::A, v.view()),
        view_to_image(cursor, Which::B, v.view()),
    ];
    v.zoom_at(cursor, 1.5).unwrap();
    v.zoom_at(cursor, 0.25).unwrap();
    assert!((v.view().scale() - 0.375).abs() < 1e-12);
    for (which, b) in Which::ALL.into_iter().zip(before) {
        assert!((view_to_image(cursor, which, v.view()) - b).hypot() < 1e-9);
    }
    assert!(v.zoom_at(cursor, 0.0).is_err());
    assert!((v.view().scale() - 0.375).abs() < 1e-12);
}

#[test]
fn pans_are_shared_or_per_image() {
    let mut v = viewer();
    v.pan_by(Vec2::new(3.0, 4.0));
    v.pan_image(Which::A, Vec2::new(1.0, 0.0));
    assert_eq!(v.view().offset(), Vec2::new(3.0, 4.0));
    assert_eq!(v.view().image_offset(Which::A), Vec2::new(1.0, 0.0));
    assert_eq!(v.view().image_offset(Which::B), Vec2::ZERO);
}

#[test]
fn wipe_pivot_is_stored_in_image_a_space() {
    let mut v = viewer();
    v.set_scale(2.0).unwrap();
    v.pan_by(Vec2::new(10.0, 0.0));
    v.move_wipe_to(Point::new(30.0, 20.0));
    assert_eq!(v.view().wipe_center(), Point::new(10.0, 10.0));
    v.pan_by(Vec2::new(5.0, 5.0));
    assert_eq!(v.view().wipe_center(), Point::new(10.0, 10.0));
}

#[test]
fn rotation_follows_pointer_unless_simple() {
    let mut v = loaded();
    v.rotate_wipe_towards(Point::new(50.0, 0.0));
    assert!((v.view().wipe_angle_deg() - 270.0).abs() < 1e-9);
    v.set_simple_wipe(true);
    assert_eq!(v.view().wipe_angle_deg(), 0.0);
    v.rotate_wipe_towards(Point::new(50.0, 90.0));
    assert_eq!(v.view().wipe_angle_deg(), 0.0);
}

#[test]
fn drag_handles_route_to_interactions() {
    let mut v = loaded();
    v.drag_handle(HandleKind::Alpha, Point::new(0.0, 40.0));
    assert!((v.view().wipe_alpha() - 0.5).abs() < 1e-9);
    v.drag_handle(HandleKind::Translate, Point::new(20.0, 20.0));
    assert_eq!(v.view().wipe_center(), Point::new(20.0, 20.0));
    v.drag_handle(HandleKind::Rotate, Point::new(20.0, 60.0));
    assert!((v.view().wipe_angle_deg() - 90.0).abs() < 1e-9);
}

#[test]
fn hit_test_uses_configured_style() {
    let v = loaded();
    assert_eq!(v.hit_test(Point::new(50.0, 40.0)), Some(HandleKind::Translate));
    assert_eq!(v.hit_test(Point::new(130.0, 40.0)), Some(HandleKind::Rotate));
}

#[test]
fn hit_test_finds_nothing_while_the_wipe_is_not_drawn() {
    let mut v = loaded();
    let center = Point::new(50.0, 40.0);
    v.clear_image(Which::B);
    assert_eq!(v.hit_test(center), None);
    let mut s = CpuSurface::new(100, 80).unwrap();
    v.render_frame(&mut s, true).unwrap();
    assert_eq!(s.pixel(50, 40), Some([255, 0, 0, 255]));

    v.load_image(Which::B, RasterImage::filled(100, 80, [255, 0, 0, 255]).unwrap())
        .wait();
    assert_eq!(v.hit_test(center), Some(HandleKind::Translate));
    v.set_wipe_enabled(false);
    assert_eq!(v.hit_test(center), None);
}

#[test]
fn reset_view_keeps_mode_and_switches() {
    let mut v = loaded();
    v.set_mode(CompareMode::Diff);
    v.set_wipe_enabled(false);
    v.zoom_at(Point::new(5.0, 5.0), 3.0).unwrap();
    v.pan_image(Which::B, Vec2::new(9.0, 9.0));
    v.set_wipe_alpha(0.1);
    v.reset_view();
    let view = v.view();
    assert_eq!(view.scale(), 1.0);
    assert_eq!(view.offset(), Vec2::ZERO);
    assert_eq!(view.image_offset(Which::B), Vec2::ZERO);
    assert_eq!(view.wipe_alpha(), 1.0);
    assert_eq!(view.wipe_center(), Point::new(50.0, 40.0));
    assert_eq!(view.mode(), CompareMode::Diff);
    assert!(!view.wipe_enabled());
}

#[test]
fn cycle_mode_wraps() {
    let mut v = viewer();
    for _ in 0..CompareMode::ALL.len() {
        v.cycle_mode();
    }
    assert_eq!(v.view().mode(), CompareMode::Under);
}

#[test]
fn invalid_config_keeps_the_old_one() {
    let mut v = viewer();
    let mut bad = ViewerConfig::default();
    bad.overlay.hit_radius = -1.0;
    assert!(v.set_config(bad).is_err());
    assert_eq!(v.config(), &ViewerConfig::default());
}

#[test]
fn render_paths_report_outcomes() {
    let v = loaded();
    let mut none = CpuSurface::new(0, 0).unwrap();
    assert_eq!(
        v.render_frame(&mut none, true).unwrap(),
        RenderOutcome::SurfaceUnavailable
    );
    let mut s = CpuSurface::new(100, 80).unwrap();
    assert_eq!(v.render_frame(&mut s, false).unwrap(), RenderOutcome::Rendered);
    assert_eq!(s.pixel(10, 10), Some([255, 0, 0, 255]));
    let mut loupe = CpuSurface::new(32, 32).unwrap();
    assert_eq!(
        v.render_magnifier(&mut loupe, Point::new(50.0, 40.0)).unwrap(),
        RenderOutcome::Rendered
    );
    assert_eq!(v.overlap_psnr().to_string(), "identical");
    assert_eq!(
        v.probe(Point::new(3.0, 3.0)).a.unwrap().pixel,
        Some(((3, 3), [255, 0, 0, 255]))
    );
}
