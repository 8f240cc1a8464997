use super::*;
use crate::surface::CpuSurface;

fn view_at(center: Point, angle: f64) -> ViewState {
    let mut v = ViewState::new();
    v.set_wipe_center(center);
    v.set_wipe_angle_deg(angle);
    v
}

fn near(a: Point, b: Point) -> bool {
    (a - b).hypot() < 1e-6
}

#[test]
fn layout_places_rotate_handle_on_composite_side() {
    let style = OverlayStyle::default();
    let layout = handle_layout(&view_at(Point::new(50.0, 50.0), 0.0), &style);
    assert!(near(layout.center, Point::new(50.0, 50.0)));
    assert!(near(layout.rotate.unwrap(), Point::new(130.0, 50.0)));
    let arc = layout.alpha_arc.unwrap();
    assert!((arc.start_deg - 135.0).abs() < 1e-9);
    let r = style.alpha_arc_radius / 2f64.sqrt();
    assert!(near(arc.slider, Point::new(50.0 - r, 50.0 - r)));
}

#[test]
fn simple_wipe_hides_extra_handles() {
    let mut v = view_at(Point::new(50.0, 50.0), 0.0);
    v.set_simple_wipe(true);
    let layout = handle_layout(&v, &OverlayStyle::default());
    assert!(layout.rotate.is_none());
    assert!(layout.alpha_arc.is_none());
    assert_eq!(
        hit_test_handles(Point::new(130.0, 50.0), &v, &OverlayStyle::default()),
        None
    );
}

#[test]
fn hit_test_matches_drawn_positions() {
    let style = OverlayStyle::default();
    let v = view_at(Point::new(50.0, 50.0), 0.0);
    assert_eq!(
        hit_test_handles(Point::new(52.0, 51.0), &v, &style),
        Some(HandleKind::Translate)
    );
    assert_eq!(
        hit_test_handles(Point::new(127.0, 53.0), &v, &style),
        Some(HandleKind::Rotate)
    );
    let slider = handle_layout(&v, &style).alpha_arc.unwrap().slider;
    assert_eq!(
        hit_test_handles(slider + Vec2::new(1.0, 0.0), &v, &style),
        Some(HandleKind::Alpha)
    );
    assert_eq!(hit_test_handles(Point::new(90.0, 90.0), &v, &style), None);
}

#[test]
fn hit_test_is_off_when_wipe_disabled() {
    let mut v = view_at(Point::new(50.0, 50.0), 0.0);
    v.set_wipe_enabled(false);
    assert_eq!(
        hit_test_handles(Point::new(50.0, 50.0), &v, &OverlayStyle::default()),
        None
    );
}

#[test]
fn arc_maps_angle_to_alpha_and_snaps_outside() {
    let style = OverlayStyle::default();
    let v = view_at(Point::new(50.0, 50.0), 0.0);
    let at = |deg: f64| {
        let (s, c) = f64::to_radians(deg).sin_cos();
        alpha_from_arc_point(Point::new(50.0 + 40.0 * c, 50.0 + 40.0 * s), &v, &style)
    };
    assert!(at(135.0).abs() < 1e-9);
    assert!((at(180.0) - 0.5).abs() < 1e-9);
    assert!((at(225.0) - 1.0).abs() < 1e-9);
    assert_eq!(at(10.0), 0.0);
    assert_eq!(at(350.0), 1.0);
}

#[test]
fn angle_towards_points_normal_at_pointer() {
    let v = view_at(Point::new(50.0, 50.0), 0.0);
    assert!((angle_towards(Point::new(50.0, 100.0), &v).unwrap() - 90.0).abs() < 1e-9);
    assert!((angle_towards(Point::new(0.0, 50.0), &v).unwrap() - 180.0).abs() < 1e-9);
    assert_eq!(angle_towards(Point::new(50.0, 50.0), &v), None);
}

#[test]
fn overlay_draws_line_and_center_handle() {
    let style = OverlayStyle::default();
    let mut s = CpuSurface::new(100, 100).unwrap();
    draw_overlay(&mut s, &view_at(Point::new(50.0, 50.0), 0.0), &style);
    let handle = s.pixel(50, 50).unwrap();
    assert!(handle[0] >= 250 && handle[3] >= 250, "{handle:?}");
    assert!(handle[2] <= 5, "{handle:?}");
    let line = s.pixel(50, 5).unwrap();
    assert!(line[3] >= 200, "{line:?}");
    assert_eq!(s.pixel(10, 90), Some([0, 0, 0, 0]));
}
