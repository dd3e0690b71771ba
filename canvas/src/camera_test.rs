#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::CAMERA_ANGLE;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn rect_approx_eq(a: Rect, b: Rect) -> bool {
    approx_eq(a.left, b.left) && approx_eq(a.top, b.top) && approx_eq(a.width, b.width) && approx_eq(a.height, b.height)
}

// =============================================================
// Point / Rect
// =============================================================

#[test]
fn point_new() {
    let p = Point::new(3.0, 4.0);
    assert_eq!(p.x, 3.0);
    assert_eq!(p.y, 4.0);
}

#[test]
fn rect_edges() {
    let r = Rect::new(10.0, 20.0, 30.0, 40.0);
    assert_eq!(r.right(), 40.0);
    assert_eq!(r.bottom(), 60.0);
}

#[test]
fn rect_contains_is_strict() {
    let r = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(r.contains(Point::new(5.0, 5.0)));
    assert!(!r.contains(Point::new(0.0, 5.0)));
    assert!(!r.contains(Point::new(10.0, 5.0)));
    assert!(!r.contains(Point::new(5.0, 10.0)));
}

#[test]
fn rect_intersects_overlap_and_touch() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
    assert!(!a.intersects(&Rect::new(20.0, 20.0, 1.0, 1.0)));
}

#[test]
fn rect_union_covers_both() {
    let a = Rect::new(0.0, 0.0, 10.0, 10.0);
    let b = Rect::new(20.0, -5.0, 5.0, 5.0);
    assert_eq!(a.union(&b), Rect::new(0.0, -5.0, 25.0, 15.0));
}

// =============================================================
// Camera
// =============================================================

#[test]
fn camera_validity() {
    assert!(Camera::new(0.0, 0.0, 1.0).is_valid());
    assert!(!Camera::new(0.0, 0.0, 0.0).is_valid());
    assert!(!Camera::new(0.0, 0.0, -3.0).is_valid());
    assert!(!Camera::new(f64::NAN, 0.0, 1.0).is_valid());
}

// =============================================================
// camera_to_screen / screen_to_camera
// =============================================================

#[test]
fn camera_to_screen_width_follows_height() {
    let z = 500.0 / CAMERA_ANGLE.tan();
    let screen = camera_to_screen(0.0, 0.0, z, CAMERA_ANGLE, 1.0);
    assert!(approx_eq(screen.width, 1000.0));
    assert!(approx_eq(screen.height, 1000.0));
    assert!(approx_eq(screen.left, -500.0));
    assert!(approx_eq(screen.top, -500.0));
}

#[test]
fn camera_to_screen_respects_aspect() {
    let screen = camera_to_screen(100.0, 50.0, 1000.0, CAMERA_ANGLE, 2.0);
    assert!(approx_eq(screen.height, screen.width / 2.0));
    assert!(approx_eq(screen.left + screen.width / 2.0, 100.0));
    assert!(approx_eq(screen.top + screen.height / 2.0, 50.0));
}

#[test]
fn screen_and_camera_are_interoperable() {
    let position = Rect::new(50.0, 50.0, 1000.0, 1000.0);
    let camera = screen_to_camera(&position, CAMERA_ANGLE);
    let back = camera_to_screen(camera.x, camera.y, camera.z, CAMERA_ANGLE, 1.0);
    assert!(rect_approx_eq(back, position));
}

#[test]
fn screen_to_camera_height_formula() {
    let camera = screen_to_camera(&Rect::new(0.0, 0.0, 1000.0, 500.0), CAMERA_ANGLE);
    assert!(approx_eq(camera.z, 1000.0 / (2.0 * CAMERA_ANGLE.tan())));
    assert!(approx_eq(camera.x, 500.0));
    assert!(approx_eq(camera.y, 250.0));
}

// =============================================================
// Scale
// =============================================================

#[test]
fn scale_fit_is_pixels_per_unit() {
    let scale = Scale::fit(1000.0, 500.0, &Rect::new(0.0, 0.0, 500.0, 250.0));
    assert_eq!(scale, Scale { x: 2.0, y: 2.0 });
}

#[test]
fn scale_converts_both_ways() {
    let scale = Scale { x: 2.0, y: 4.0 };
    let plane = scale.to_plane(Point::new(10.0, 20.0));
    assert_eq!(plane, Point::new(5.0, 5.0));
    assert_eq!(scale.to_pixels(plane), Point::new(10.0, 20.0));
}

// =============================================================
// scale_with_anchor
// =============================================================

#[test]
fn scale_with_anchor_keeps_anchor_fixed() {
    let resolution = 1000.0;
    let old_screen = Rect::new(50.0, 50.0, 1000.0, 1000.0);
    let old_camera = screen_to_camera(&old_screen, CAMERA_ANGLE);
    let new_z = old_camera.z - 100.0;
    let probe = camera_to_screen(old_camera.x, old_camera.y, new_z, CAMERA_ANGLE, 1.0);
    let old_scale = Scale::fit(resolution, resolution, &old_screen);
    let new_scale = Scale::fit(resolution, resolution, &probe);

    let anchor = Point::new(100.0, 100.0);
    let center = scale_with_anchor(
        anchor.x,
        anchor.y,
        old_camera.x,
        old_camera.y,
        old_scale.x,
        old_scale.y,
        new_scale.x,
        new_scale.y,
    );
    let new_screen = camera_to_screen(center.x, center.y, new_z, CAMERA_ANGLE, 1.0);

    assert!(approx_eq(
        (anchor.x - new_screen.left) * new_scale.x,
        (anchor.x - old_screen.left) * old_scale.x
    ));
    assert!(approx_eq(
        (anchor.y - new_screen.top) * new_scale.y,
        (anchor.y - old_screen.top) * old_scale.y
    ));
}

#[test]
fn scale_with_anchor_identity_when_scale_unchanged() {
    let p = scale_with_anchor(10.0, 20.0, 300.0, 400.0, 1.5, 1.5, 1.5, 1.5);
    assert!(approx_eq(p.x, 300.0));
    assert!(approx_eq(p.y, 400.0));
}

#[test]
fn scale_with_anchor_at_center_keeps_center() {
    let p = scale_with_anchor(300.0, 400.0, 300.0, 400.0, 1.0, 1.0, 3.0, 3.0);
    assert!(approx_eq(p.x, 300.0));
    assert!(approx_eq(p.y, 400.0));
}
