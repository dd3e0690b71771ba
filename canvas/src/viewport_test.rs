#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::doc::{Node, VideoEditorNode};

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn ready(width: f64, height: f64) -> Viewport {
    let mut vp = Viewport::default();
    vp.initialize(width, height);
    vp
}

fn editor(rect: Rect) -> Node {
    Node::VideoEditor(VideoEditorNode {
        id: Uuid::new_v4(),
        cache_key: 0,
        author: String::new(),
        parent: None,
        title: None,
        position: rect,
        tracks: vec![],
    })
}

// =============================================================
// initialize
// =============================================================

#[test]
fn initialize_square_container_shows_home_at_unit_scale() {
    let vp = ready(1000.0, 1000.0);
    assert!(approx_eq(vp.camera().z, 1000.0 / (2.0 * CAMERA_ANGLE.tan())));
    let screen = vp.screen();
    assert!(approx_eq(screen.left, 1500.0 - 500.0));
    assert!(approx_eq(screen.top, 1500.0 - 500.0));
    assert!(approx_eq(screen.width, 1000.0));
    assert!(approx_eq(screen.height, 1000.0));
    let scale = vp.scale();
    assert!(approx_eq(scale.x, 1.0));
    assert!(approx_eq(scale.y, 1.0));
}

#[test]
fn initialize_wide_container_keeps_aspect() {
    let vp = ready(1280.0, 720.0);
    let screen = vp.screen();
    assert!(approx_eq(screen.width, 1280.0));
    assert!(approx_eq(screen.height, 720.0));
}

#[test]
fn initialize_zero_size_is_ignored() {
    let mut vp = Viewport::default();
    vp.initialize(0.0, 500.0);
    assert!(!vp.is_ready());
    assert_eq!(vp.screen(), Rect::default());
    assert_eq!(vp.scale(), Scale::default());
}

#[test]
fn operations_before_initialize_are_noops() {
    let mut vp = Viewport::default();
    vp.take_render();
    vp.move_camera(10.0, 10.0);
    vp.zoom_camera(0.0, 5.0);
    vp.move_pointer(3.0, 3.0);
    assert_eq!(vp.camera(), Camera::default());
    assert_eq!(vp.pointer(), Point::default());
    assert!(!vp.should_render());
}

// =============================================================
// Pan / pointer
// =============================================================

#[test]
fn move_camera_applies_pan_speed() {
    let mut vp = ready(1000.0, 1000.0);
    vp.take_render();
    vp.move_camera(10.0, -4.0);
    assert!(approx_eq(vp.camera().x, 1515.0));
    assert!(approx_eq(vp.camera().y, 1494.0));
    assert!(vp.should_render());
}

#[test]
fn move_pointer_stores_plane_position() {
    let mut vp = ready(1000.0, 1000.0);
    vp.move_pointer(250.0, 100.0);
    assert!(approx_eq(vp.pointer().x, 1250.0));
    assert!(approx_eq(vp.pointer().y, 1100.0));
}

#[test]
fn pan_keeps_pointer_under_same_pixel() {
    let mut vp = ready(1000.0, 1000.0);
    vp.move_pointer(250.0, 250.0);
    vp.move_camera(10.0, 0.0);
    let screen = vp.screen();
    let scale = vp.scale();
    assert!(approx_eq((vp.pointer().x - screen.left) * scale.x, 250.0));
    assert!(approx_eq((vp.pointer().y - screen.top) * scale.y, 250.0));
}

// =============================================================
// Zoom
// =============================================================

#[test]
fn zoom_keeps_pointer_fixed() {
    let mut vp = ready(1000.0, 800.0);
    vp.move_pointer(250.0, 300.0);
    let anchor = vp.pointer();
    vp.zoom_camera(0.0, 12.0);
    let after = vp.pixel_to_plane(Point::new(250.0, 300.0));
    assert!((after.x - anchor.x).abs() < 1e-6);
    assert!((after.y - anchor.y).abs() < 1e-6);
}

#[test]
fn zoom_before_pointer_move_anchors_on_home() {
    let mut vp = ready(1000.0, 1000.0);
    assert_eq!(vp.pointer(), Point::new(1500.0, 1500.0));
    vp.zoom_camera(0.0, 12.0);
    assert!(approx_eq(vp.camera().x, 1500.0));
    assert!(approx_eq(vp.camera().y, 1500.0));
}

#[test]
fn zoom_in_and_out_changes_height() {
    let mut vp = ready(1000.0, 1000.0);
    let z0 = vp.camera().z;
    vp.zoom_camera(0.0, 5.0);
    assert!(approx_eq(vp.camera().z, z0 + 50.0));
    vp.zoom_camera(0.0, -10.0);
    assert!(approx_eq(vp.camera().z, z0 - 50.0));
}

#[test]
fn zoom_ignores_horizontal_delta() {
    let mut vp = ready(1000.0, 1000.0);
    let before = vp.camera();
    vp.zoom_camera(40.0, 0.0);
    assert_eq!(vp.camera(), before);
}

#[test]
fn zoom_never_reaches_non_positive_height() {
    let mut vp = ready(1000.0, 1000.0);
    vp.zoom_camera(0.0, -1.0e9);
    assert!(vp.camera().z > 0.0);
    assert!(vp.is_ready());
}

// =============================================================
// Centering
// =============================================================

#[test]
fn center_on_node_centers_at_current_zoom() {
    let mut vp = ready(1000.0, 1000.0);
    let mut doc = Document::new();
    let node = editor(Rect::new(1200.0, 800.0, 400.0, 600.0));
    doc.add_node(node.clone());
    let z = vp.camera().z;
    vp.center_on_node(&doc, &node.id());
    assert!(approx_eq(vp.camera().x, 1400.0));
    assert!(approx_eq(vp.camera().y, 1100.0));
    assert!(approx_eq(vp.camera().z, z));
}

#[test]
fn center_on_unknown_node_is_noop() {
    let mut vp = ready(1000.0, 1000.0);
    let before = vp.camera();
    vp.center_on_node(&Document::new(), &Uuid::new_v4());
    assert_eq!(vp.camera(), before);
}

#[test]
fn center_on_nodes_fits_wide_group() {
    let mut vp = ready(1000.0, 1000.0);
    let mut doc = Document::new();
    let a = editor(Rect::new(0.0, 0.0, 100.0, 100.0));
    let b = editor(Rect::new(300.0, 0.0, 100.0, 100.0));
    doc.add_node(a.clone());
    doc.add_node(b.clone());
    vp.center_on_nodes(&doc, &[a.id(), b.id()]);
    let screen = vp.screen();
    assert!(approx_eq(screen.left, -50.0));
    assert!(approx_eq(screen.width, 500.0));
    assert!(approx_eq(screen.height, 500.0));
    assert!(approx_eq(screen.top, -200.0));
}

#[test]
fn center_on_nodes_fits_tall_group() {
    let mut vp = ready(2000.0, 1000.0);
    let mut doc = Document::new();
    let a = editor(Rect::new(0.0, 0.0, 100.0, 300.0));
    doc.add_node(a.clone());
    vp.center_on_nodes(&doc, &[a.id()]);
    let screen = vp.screen();
    assert!(approx_eq(screen.top, -50.0));
    assert!(approx_eq(screen.height, 400.0));
    assert!(approx_eq(screen.width, 800.0));
    assert!(approx_eq(screen.left, 50.0 - 400.0));
}

#[test]
fn center_on_empty_list_is_noop() {
    let mut vp = ready(1000.0, 1000.0);
    let before = vp.camera();
    vp.center_on_nodes(&Document::new(), &[]);
    vp.center_on_nodes(&Document::new(), &[Uuid::new_v4()]);
    assert_eq!(vp.camera(), before);
}

// =============================================================
// Placement / render flag
// =============================================================

#[test]
fn place_visible_rect_in_pixels() {
    let vp = ready(1000.0, 1000.0);
    let placed = vp.place(&Rect::new(1200.0, 800.0, 400.0, 600.0)).unwrap();
    assert!(approx_eq(placed.left, 200.0));
    assert!(approx_eq(placed.top, -200.0));
    assert!(approx_eq(placed.width, 400.0));
    assert!(approx_eq(placed.height, 600.0));
}

#[test]
fn place_offscreen_rect_is_none() {
    let vp = ready(1000.0, 1000.0);
    assert!(vp.place(&Rect::new(0.0, 0.0, 10.0, 10.0)).is_none());
}

#[test]
fn take_render_clears_flag() {
    let mut vp = ready(1000.0, 1000.0);
    assert!(vp.take_render());
    assert!(!vp.take_render());
    vp.request_render();
    assert!(vp.should_render());
}

#[test]
fn pixel_ratio_rejects_non_positive() {
    let mut vp = Viewport::default();
    vp.set_pixel_ratio(2.0);
    vp.set_pixel_ratio(0.0);
    assert_eq!(vp.pixel_ratio(), 2.0);
}
