#![allow(clippy::float_cmp)]

use uuid::Uuid;

use super::*;
use crate::camera::Rect;
use crate::doc::{Node, TextClip, Track, VideoClip};

fn video(start: f64, end: f64) -> Clip {
    Clip::VideoClip(VideoClip {
        id: Uuid::new_v4(),
        url: "a.mp4".to_owned(),
        start,
        end,
        clip_start: 0.0,
        clip_end: end - start,
    })
}

fn text(start: f64, end: f64) -> Clip {
    Clip::TextClip(TextClip {
        id: Uuid::new_v4(),
        text: "t".to_owned(),
        size: 12.0,
        color: "#fff".to_owned(),
        start,
        end,
    })
}

fn editor(tracks: Vec<Track>) -> VideoEditorNode {
    VideoEditorNode {
        id: Uuid::new_v4(),
        cache_key: 0,
        author: String::new(),
        parent: None,
        title: None,
        position: Rect::new(0.0, 0.0, 100.0, 100.0),
        tracks,
    }
}

fn doc_with(node: &VideoEditorNode) -> Document {
    let mut doc = Document::new();
    doc.add_node(Node::VideoEditor(node.clone()));
    doc
}

// =============================================================
// Lifecycle
// =============================================================

#[test]
fn new_monitor_is_paused_at_default_fps() {
    let mut reg = MonitorRegistry::new(30.0);
    let id = Uuid::new_v4();
    reg.add_monitor(id, 0.0);
    let m = reg.get(&id).unwrap();
    assert_eq!(m.state, PlaybackState::Paused);
    assert_eq!(m.fps, 30.0);
    assert_eq!(m.time, 0.0);
}

#[test]
fn add_existing_monitor_keeps_state() {
    let mut reg = MonitorRegistry::new(30.0);
    let id = Uuid::new_v4();
    reg.add_monitor(id, 0.0);
    reg.seek(&id, 4.0);
    reg.add_monitor(id, 0.0);
    assert_eq!(reg.get(&id).unwrap().time, 4.0);
}

#[test]
fn remove_cancels_pending_step() {
    let mut reg = MonitorRegistry::new(30.0);
    let node = editor(vec![Track::new(0, vec![video(0.0, 20.0)])]);
    let doc = doc_with(&node);
    reg.add_monitor(node.id, 0.0);
    reg.play(&node.id, 0.0);
    reg.remove_monitor(&node.id);
    assert!(reg.get(&node.id).is_none());
    assert_eq!(reg.next_due(), None);
    assert!(reg.tick(1.0, &doc).is_empty());
}

#[test]
fn sync_adds_and_drops() {
    let mut reg = MonitorRegistry::new(30.0);
    let keep = Uuid::new_v4();
    let drop = Uuid::new_v4();
    let fresh = Uuid::new_v4();
    reg.add_monitor(keep, 3.0);
    reg.add_monitor(drop, 0.0);
    reg.sync(&[keep, fresh]);
    assert_eq!(reg.len(), 2);
    assert!(reg.get(&drop).is_none());
    assert_eq!(reg.get(&keep).unwrap().time, 3.0);
    assert_eq!(reg.get(&fresh).unwrap().time, 0.0);
}

// =============================================================
// Playback
// =============================================================

#[test]
fn playing_advances_by_wall_clock_delta() {
    let node = editor(vec![Track::new(0, vec![video(0.0, 20.0)])]);
    let doc = doc_with(&node);
    let mut reg = MonitorRegistry::new(30.0);
    reg.add_monitor(node.id, 0.0);
    reg.play(&node.id, 10.0);
    assert_eq!(reg.tick(10.5, &doc), vec![node.id]);
    let m = reg.get(&node.id).unwrap();
    assert!((m.time - 0.5).abs() < 1e-9);
    assert!(m.is_playing());
}

#[test]
fn tick_before_due_does_nothing() {
    let node = editor(vec![Track::new(0, vec![video(0.0, 20.0)])]);
    let doc = doc_with(&node);
    let mut reg = MonitorRegistry::new(30.0);
    reg.add_monitor(node.id, 0.0);
    reg.play(&node.id, 0.0);
    assert!(reg.tick(0.01, &doc).is_empty());
    assert_eq!(reg.get(&node.id).unwrap().time, 0.0);
}

#[test]
fn overshoot_clamps_to_end_and_pauses() {
    let node = editor(vec![
        Track::new(0, vec![video(0.0, 12.0)]),
        Track::new(1, vec![text(5.0, 20.0)]),
    ]);
    let doc = doc_with(&node);
    let mut reg = MonitorRegistry::new(30.0);
    reg.add_monitor(node.id, 0.0);
    reg.play(&node.id, 0.0);
    reg.tick(25.0, &doc);
    let m = reg.get(&node.id).unwrap();
    assert_eq!(m.state, PlaybackState::Paused);
    assert_eq!(m.time, 20.0);
    assert_eq!(reg.next_due(), None);
    assert!(!reg.any_playing());
}

#[test]
fn pause_stops_only_that_monitor() {
    let a = editor(vec![Track::new(0, vec![video(0.0, 20.0)])]);
    let b = editor(vec![Track::new(0, vec![video(0.0, 20.0)])]);
    let mut doc = doc_with(&a);
    doc.add_node(Node::VideoEditor(b.clone()));
    let mut reg = MonitorRegistry::new(30.0);
    reg.add_monitor(a.id, 0.0);
    reg.add_monitor(b.id, 0.0);
    reg.play(&a.id, 0.0);
    reg.play(&b.id, 0.0);
    reg.pause(&a.id);
    assert_eq!(reg.tick(1.0, &doc), vec![b.id]);
    assert_eq!(reg.get(&a.id).unwrap().time, 0.0);
    assert_eq!(reg.get(&b.id).unwrap().time, 1.0);
}

#[test]
fn seek_keeps_state() {
    let mut reg = MonitorRegistry::new(30.0);
    let id = Uuid::new_v4();
    reg.add_monitor(id, 0.0);
    reg.play(&id, 0.0);
    reg.seek(&id, 7.5);
    reg.seek(&id, 7.5);
    let m = reg.get(&id).unwrap();
    assert_eq!(m.time, 7.5);
    assert!(m.is_playing());
}

#[test]
fn missing_node_pauses_monitor() {
    let mut reg = MonitorRegistry::new(30.0);
    let id = Uuid::new_v4();
    reg.add_monitor(id, 0.0);
    reg.play(&id, 0.0);
    reg.tick(1.0, &Document::new());
    assert!(!reg.get(&id).unwrap().is_playing());
}

// =============================================================
// visible_clips
// =============================================================

#[test]
fn visible_clips_filters_by_time() {
    let node = editor(vec![Track::new(0, vec![video(0.0, 5.0), video(6.0, 9.0)])]);
    let at = |t: f64| visible_clips(&node, t).len();
    assert_eq!(at(5.0), 1);
    assert_eq!(at(5.5), 0);
    assert_eq!(at(6.0), 1);
}

#[test]
fn overlapping_clips_paint_higher_index_first() {
    let low = video(0.0, 10.0);
    let high = text(0.0, 10.0);
    let node = editor(vec![Track::new(0, vec![low.clone()]), Track::new(3, vec![high.clone()])]);
    let ids: Vec<_> = visible_clips(&node, 1.0).iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![high.id(), low.id()]);
}

#[test]
fn overlapping_clips_in_one_track_keep_array_order() {
    let first = video(0.0, 10.0);
    let second = video(2.0, 8.0);
    let node = editor(vec![Track::new(0, vec![first.clone(), second.clone()])]);
    let ids: Vec<_> = visible_clips(&node, 3.0).iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![first.id(), second.id()]);
}
