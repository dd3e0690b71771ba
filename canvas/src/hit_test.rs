use uuid::Uuid;

use super::*;
use crate::doc::{Align, TextboxNode, VerticalAlign};
use crate::editor::{DropAction, drop_targets, node_size, video_editor_from_clip};

fn textbox(rect: Rect) -> Node {
    Node::Textbox(TextboxNode {
        id: Uuid::new_v4(),
        cache_key: 0,
        author: String::new(),
        parent: None,
        title: None,
        position: rect,
        align: Align::Center,
        vertical: VerticalAlign::Center,
        text: String::new(),
    })
}

fn doc_with(nodes: Vec<Node>) -> Document {
    let mut doc = Document::new();
    for node in nodes {
        doc.add_node(node);
    }
    doc
}

// =============================================================
// node_at
// =============================================================

#[test]
fn inside_point_hits_node() {
    let node = textbox(Rect::new(1200.0, 800.0, 300.0, 300.0));
    let id = node.id();
    let doc = doc_with(vec![node]);
    assert_eq!(node_at(&doc, Point::new(1201.0, 1001.0)).map(|n| n.id()), Some(id));
}

#[test]
fn border_point_misses_node() {
    let doc = doc_with(vec![textbox(Rect::new(0.0, 0.0, 10.0, 10.0))]);
    assert!(node_at(&doc, Point::new(0.0, 5.0)).is_none());
    assert!(node_at(&doc, Point::new(10.0, 5.0)).is_none());
}

#[test]
fn empty_document_hits_nothing() {
    assert!(node_at(&Document::new(), Point::new(0.0, 0.0)).is_none());
}

// =============================================================
// overlaps_any
// =============================================================

#[test]
fn overlapping_preview_is_detected() {
    let doc = doc_with(vec![textbox(Rect::new(1200.0, 800.0, 300.0, 300.0))]);
    assert!(overlaps_any(&doc, &Rect::new(1101.0, 701.0, 100.0, 100.0)));
}

#[test]
fn touching_preview_does_not_overlap() {
    let doc = doc_with(vec![textbox(Rect::new(100.0, 100.0, 50.0, 50.0))]);
    assert!(!overlaps_any(&doc, &Rect::new(0.0, 0.0, 100.0, 100.0)));
}

// =============================================================
// drop_target_at
// =============================================================

#[test]
fn pointer_over_track_body_finds_add_clip() {
    let mut node = video_editor_from_clip(Uuid::new_v4(), Rect::default(), "a.mp4", 10.0);
    let (w, h) = node_size(&node);
    node.position = Rect::new(0.0, 0.0, w, h);
    let targets = drop_targets(&node);
    let body = targets.iter().find(|t| t.action == DropAction::AddClip).unwrap();
    let center = Point::new(body.rect.left + body.rect.width / 2.0, body.rect.top + body.rect.height / 2.0);

    let hit = drop_target_at(&targets, center).unwrap();

    assert_eq!(hit.id, node.tracks[0].id.to_string());
    assert_eq!(hit.index, 0);
}

#[test]
fn pointer_outside_tracks_finds_nothing() {
    let mut node = video_editor_from_clip(Uuid::new_v4(), Rect::default(), "a.mp4", 10.0);
    let (w, h) = node_size(&node);
    node.position = Rect::new(0.0, 0.0, w, h);
    assert!(drop_target_at(&drop_targets(&node), Point::new(50.0, 50.0)).is_none());
}
