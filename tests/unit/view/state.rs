use super::*;
use crate::raster::image::RasterImage;

#[test]
fn scale_must_be_positive_and_finite() {
    let mut v = ViewState::new();
    assert!(v.set_scale(0.0).is_err());
    assert!(v.set_scale(-2.0).is_err());
    assert!(v.set_scale(f64::NAN).is_err());
    assert_eq!(v.scale(), 1.0);
    v.set_scale(2.5).unwrap();
    assert_eq!(v.scale(), 2.5);
}

#[test]
fn wipe_alpha_is_clamped_on_write() {
    let mut v = ViewState::new();
    v.set_wipe_alpha(1.7);
    assert_eq!(v.wipe_alpha(), 1.0);
    v.set_wipe_alpha(-0.2);
    assert_eq!(v.wipe_alpha(), 0.0);
    v.set_wipe_alpha(f64::NAN);
    assert_eq!(v.wipe_alpha(), 0.0);
}

#[test]
fn simple_wipe_forces_and_holds_zero_angle() {
    let mut v = ViewState::new();
    v.set_wipe_angle_deg(30.0);
    v.set_simple_wipe(true);
    assert_eq!(v.wipe_angle_deg(), 0.0);
    v.set_wipe_angle_deg(45.0);
    assert_eq!(v.wipe_angle_deg(), 0.0);
    v.set_simple_wipe(false);
    v.set_wipe_angle_deg(45.0);
    assert_eq!(v.wipe_angle_deg(), 45.0);
}

#[test]
fn image_offsets_are_per_slot() {
    let mut v = ViewState::new();
    v.set_image_offset(Which::B, Vec2::new(3.0, -4.0));
    assert_eq!(v.image_offset(Which::A), Vec2::ZERO);
    assert_eq!(v.image_offset(Which::B), Vec2::new(3.0, -4.0));
}

#[test]
fn json_round_trip_and_validation() {
    let mut v = ViewState::new();
    v.set_scale(0.5).unwrap();
    v.set_mode(CompareMode::InvDiff);
    v.set_wipe_center(Point::new(12.0, 7.5));
    let json = v.to_json_string().unwrap();
    assert!(json.contains("inv_diff"));
    assert_eq!(ViewState::from_json_str(&json).unwrap(), v);

    let err = ViewState::from_json_str(r#"{"scale": 0.0}"#).unwrap_err();
    assert!(err.to_string().contains("validation error"));
    let err = ViewState::from_json_str("{").unwrap_err();
    assert!(err.to_string().contains("serialization error"));
    let err = ViewState::from_json_str("[]").unwrap_err();
    assert!(err.to_string().contains("view state must be a JSON object"));
}

#[test]
fn missing_fields_take_defaults() {
    let v = ViewState::from_json_str(r#"{"mode": "diff"}"#).unwrap();
    assert_eq!(v.mode(), CompareMode::Diff);
    assert_eq!(v.scale(), 1.0);
    assert!(v.wipe_enabled());
}

#[test]
fn mode_cycle_wraps() {
    assert_eq!(CompareMode::Under.next(), CompareMode::OnionSkin);
    assert_eq!(CompareMode::B.next(), CompareMode::Under);
    assert_eq!(CompareMode::InvDiff.label(), "inverted diff");
}

#[test]
fn frame_state_tracks_loaded_slots() {
    let img = RasterImage::filled(2, 2, [0, 0, 0, 255]).unwrap();
    let f = FrameState::new(ViewState::new());
    assert!(!f.has_any_image());
    let f = f.with_image(Which::B, MipPyramid::single(img.clone()));
    assert!(f.has_any_image());
    assert!(!f.has_both_images());
    assert!(f.image(Which::A).is_none());
    assert_eq!(f.image(Which::B).unwrap().base().width(), 2);
    assert!(!f.shows_wipe());
    let mut f = f.with_image(Which::A, MipPyramid::single(img));
    assert!(f.shows_wipe());
    f.view.set_wipe_enabled(false);
    assert!(!f.shows_wipe());
}
