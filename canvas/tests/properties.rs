//! Property tests for the canvas core.
//!
//! 1. Projection round-trips through `camera_to_screen` / `screen_to_camera`
//! 2. Zooming keeps the plane point under the pointer on the same pixel
//! 3. `reset_with_fork` restores the forked state and is idempotent
//! 4. Reconciliation mounts exactly the distinct desired keys

use canvas::camera::{Point, Rect, camera_to_screen, screen_to_camera};
use canvas::consts::CAMERA_ANGLE;
use canvas::doc::{Align, Node, TextboxNode, VerticalAlign};
use canvas::registry::Document;
use canvas::scene::{RootElement, leaf};
use canvas::surface::HeadlessSurface;
use canvas::viewport::Viewport;
use canvas::widgets::TextWidget;
use proptest::prelude::*;
use uuid::Uuid;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
}

fn textbox(left: f64, top: f64) -> Node {
    Node::Textbox(TextboxNode {
        id: Uuid::new_v4(),
        cache_key: 0,
        author: String::new(),
        parent: None,
        title: None,
        position: Rect::new(left, top, 50.0, 20.0),
        align: Align::Center,
        vertical: VerticalAlign::Center,
        text: String::new(),
    })
}

// ── 1. Projection ───────────────────────────────────────────────────────

proptest! {
    #[test]
    fn projection_round_trips(
        x in -1e5f64..1e5,
        y in -1e5f64..1e5,
        z in 1.0f64..1e5,
        aspect in 0.2f64..5.0,
    ) {
        let screen = camera_to_screen(x, y, z, CAMERA_ANGLE, aspect);
        let camera = screen_to_camera(&screen, CAMERA_ANGLE);
        prop_assert!(close(camera.x, x));
        prop_assert!(close(camera.y, y));
        prop_assert!(close(camera.z, z));
        prop_assert!(close(screen.width / screen.height, aspect));
    }
}

// ── 2. Anchor-preserving zoom ───────────────────────────────────────────

proptest! {
    #[test]
    fn zoom_keeps_pointer_pixel(
        width in 100.0f64..2000.0,
        height in 100.0f64..2000.0,
        px in 0.0f64..1.0,
        py in 0.0f64..1.0,
        dy in -50.0f64..50.0,
    ) {
        let mut viewport = Viewport::default();
        viewport.initialize(width, height);
        viewport.move_pointer(px * width, py * height);
        let anchor = viewport.pointer();

        viewport.zoom_camera(0.0, dy);

        let screen = viewport.screen();
        let scale = viewport.scale();
        let pixel = Point::new((anchor.x - screen.left) * scale.x, (anchor.y - screen.top) * scale.y);
        prop_assert!((pixel.x - px * width).abs() < 1e-6);
        prop_assert!((pixel.y - py * height).abs() < 1e-6);
        prop_assert!(viewport.camera().z > 0.0);
    }
}

// ── 3. Fork / reset ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn reset_restores_fork_and_is_idempotent(
        before in prop::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 0..8),
        after in prop::collection::vec((-1e4f64..1e4, -1e4f64..1e4), 1..8),
    ) {
        let mut doc = Document::new();
        for (left, top) in before {
            doc.add_node(textbox(left, top));
        }
        doc.fork();
        let forked = doc.fetch_state();
        for (left, top) in after {
            doc.add_node(textbox(left, top));
        }

        doc.reset_with_fork();
        let once = doc.fetch_state();
        doc.reset_with_fork();

        prop_assert_eq!(&once, &forked);
        prop_assert_eq!(doc.fetch_state(), forked);
    }
}

// ── 4. Reconciliation ───────────────────────────────────────────────────

proptest! {
    #[test]
    fn reconcile_mounts_distinct_keys(
        frames in prop::collection::vec(prop::collection::vec(0u8..12, 0..10), 1..6),
    ) {
        let mut surface = HeadlessSurface::new();
        let mut root: RootElement<()> = RootElement::new("prop");
        for keys in frames {
            root.render_widgets(&mut surface, &(), |_| {
                keys.iter()
                    .map(|k| {
                        leaf(TextWidget { key: k.to_string(), text: k.to_string(), origin: Point::default() })
                    })
                    .collect()
            });
            let mut distinct: Vec<String> = keys.iter().map(ToString::to_string).collect();
            distinct.sort();
            distinct.dedup();
            let mut mounted: Vec<String> = root.child_keys().into_iter().map(str::to_owned).collect();
            mounted.sort();
            prop_assert_eq!(&mounted, &distinct);
            prop_assert_eq!(surface.drawable_count(), distinct.len());
        }
    }
}
