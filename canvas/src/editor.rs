//! Video-editor layout, drop targets, and track editing helpers.
//!
//! A video editor stacks four rows inside a 2-unit border: the monitor
//! (previewer), transport controls, a time scale, and the track area. All
//! geometry here is in plane units relative to the node's position, so drop
//! targets can be hit-tested against the pointer's plane position without a
//! presentation layer.
//!
//! TRACK AREA
//! ==========
//! ```text
//! leading area      add-track 0     (flex, shares leftover height)
//! ┌ pre strip 5     add-track i
//! └ body 30         add-clip  i     (repeated per track)
//! tail strip 5      add-track n     (after the last track only)
//! trailing area     add-track n     (flex)
//! ```

#[cfg(test)]
#[path = "editor_test.rs"]
mod editor_test;

use tracing::debug;
use uuid::Uuid;

use crate::camera::Rect;
use crate::consts::{
    CONTROLS_H, EDITOR_PADDING, EDITOR_PADDING_X, MIN_TRACKS_H, PIXELS_PER_SECOND, PREVIEWER_H, TIMELINE_OVERSCAN,
    TIMESCALE_H, TRACK_GAP_H, TRACK_H, TRACK_TAIL_H,
};
use crate::doc::{
    Align, Clip, Node, NodeId, NodePatch, TextboxNode, Track, VerticalAlign, VideoClip, VideoEditorNode,
};
use crate::registry::Document;

/// What dropping onto a target does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAction {
    /// Insert a new track at `index`.
    AddTrack,
    /// Add a clip to the track at `index`.
    AddClip,
}

/// A hit-testable insertion region of a video editor.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub id: String,
    pub node: NodeId,
    /// Plane-space rectangle.
    pub rect: Rect,
    pub action: DropAction,
    pub index: usize,
}

// --- Dimensions ---

/// Height of the track area for `track_count` tracks.
#[must_use]
pub fn tracks_height(track_count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let fixed = track_count as f64 * (TRACK_GAP_H + TRACK_H) + TRACK_TAIL_H;
    fixed.max(MIN_TRACKS_H)
}

/// Width of the timeline rows for a timeline ending at `max_end` seconds.
#[must_use]
pub fn timeline_width(max_end: f64) -> f64 {
    max_end * TIMELINE_OVERSCAN * PIXELS_PER_SECOND + EDITOR_PADDING_X
}

/// Outer `(width, height)` of an editor whose clips end by `max_end` seconds.
#[must_use]
pub fn editor_size(max_end: f64, track_count: usize) -> (f64, f64) {
    let width = timeline_width(max_end) + EDITOR_PADDING;
    let height = EDITOR_PADDING + PREVIEWER_H + CONTROLS_H + TIMESCALE_H + tracks_height(track_count);
    (width, height)
}

/// Outer size for the tracks of an existing editor.
#[must_use]
pub fn node_size(node: &VideoEditorNode) -> (f64, f64) {
    editor_size(node.duration(), node.tracks.len())
}

fn content_origin(position: &Rect) -> (f64, f64) {
    (position.left + EDITOR_PADDING / 2.0, position.top + EDITOR_PADDING / 2.0)
}

/// Plane rectangle of the monitor row.
#[must_use]
pub fn previewer_rect(position: &Rect) -> Rect {
    let (left, top) = content_origin(position);
    Rect::new(left, top, (position.width - EDITOR_PADDING).max(0.0), PREVIEWER_H)
}

/// Plane rectangle of the track area, horizontal padding excluded.
#[must_use]
pub fn tracks_rect(node: &VideoEditorNode) -> Rect {
    let (left, top) = content_origin(&node.position);
    Rect::new(
        left + EDITOR_PADDING_X / 2.0,
        top + PREVIEWER_H + CONTROLS_H + TIMESCALE_H,
        (node.position.width - EDITOR_PADDING - EDITOR_PADDING_X).max(0.0),
        tracks_height(node.tracks.len()),
    )
}

// --- Drop targets ---

/// Every drop target of `node`, top to bottom.
#[must_use]
pub fn drop_targets(node: &VideoEditorNode) -> Vec<DropTarget> {
    let area = tracks_rect(node);
    let n = node.tracks.len();
    #[allow(clippy::cast_precision_loss)]
    let fixed = if n == 0 { 0.0 } else { n as f64 * (TRACK_GAP_H + TRACK_H) + TRACK_TAIL_H };
    let flex = ((area.height - fixed) / 2.0).max(0.0);
    let strip = |top: f64, height: f64| Rect::new(area.left, top, area.width, height);

    let mut targets = Vec::with_capacity(3 * n + 2);
    targets.push(DropTarget {
        id: format!("{}-pre", node.id),
        node: node.id,
        rect: strip(area.top, flex),
        action: DropAction::AddTrack,
        index: 0,
    });
    let mut y = area.top + flex;
    for (index, track) in node.tracks.iter().enumerate() {
        targets.push(DropTarget {
            id: format!("{}-pre", track.id),
            node: node.id,
            rect: strip(y, TRACK_GAP_H),
            action: DropAction::AddTrack,
            index,
        });
        y += TRACK_GAP_H;
        targets.push(DropTarget {
            id: track.id.to_string(),
            node: node.id,
            rect: strip(y, TRACK_H),
            action: DropAction::AddClip,
            index,
        });
        y += TRACK_H;
        if index + 1 == n {
            targets.push(DropTarget {
                id: format!("{}-post", track.id),
                node: node.id,
                rect: strip(y, TRACK_TAIL_H),
                action: DropAction::AddTrack,
                index: n,
            });
            y += TRACK_TAIL_H;
        }
    }
    targets.push(DropTarget {
        id: format!("{}-post", node.id),
        node: node.id,
        rect: strip(y, flex),
        action: DropAction::AddTrack,
        index: n,
    });
    targets
}

// --- Factories ---

/// A one-track editor holding a single video clip that plays the whole source.
#[must_use]
pub fn video_editor_from_clip(id: NodeId, position: Rect, url: &str, duration: f64) -> VideoEditorNode {
    let clip = Clip::VideoClip(VideoClip {
        id: Uuid::new_v4(),
        url: url.to_owned(),
        start: 0.0,
        end: duration,
        clip_start: 0.0,
        clip_end: duration,
    });
    VideoEditorNode {
        id,
        cache_key: 0,
        author: String::new(),
        parent: None,
        title: None,
        position,
        tracks: vec![Track::new(1, vec![clip])],
    }
}

/// A centered text box with a generated title.
#[must_use]
pub fn textbox_node(id: NodeId, position: Rect, text: &str, author: &str) -> TextboxNode {
    TextboxNode {
        id,
        cache_key: 0,
        author: author.to_owned(),
        parent: None,
        title: Some(Uuid::new_v4().to_string()),
        position,
        align: Align::Center,
        vertical: VerticalAlign::Center,
        text: text.to_owned(),
    }
}

/// Add a text box, or only move it when the id already exists.
pub fn upsert_textbox(doc: &mut Document, id: NodeId, position: Rect, text: &str, author: &str) {
    if doc.get_node(&id).is_some() {
        doc.patch_position(&id, position);
    } else {
        doc.add_node(Node::Textbox(textbox_node(id, position, text, author)));
    }
}

// --- Track edits ---

/// Mark where a new track would land, based on the editor as it was at the
/// last fork. `index == tracks.len()` marks below the last track; any other
/// index marks above track `index`. Only `AddTrack` highlights.
pub fn add_highlight_to_track(doc: &mut Document, node: &NodeId, index: usize, action: DropAction) {
    if action != DropAction::AddTrack {
        return;
    }
    let Some(origin) = doc.origin_video_editor(node) else {
        debug!(%node, "highlight ignored: no origin node");
        return;
    };
    let mut tracks = origin.tracks.clone();
    let n = tracks.len();
    if index == n {
        let Some(last) = tracks.last_mut() else {
            return;
        };
        last.highlight_below = true;
    } else if let Some(track) = tracks.get_mut(index) {
        track.highlight_above = true;
    } else {
        return;
    }
    doc.patch_node(node, &NodePatch::tracks(tracks));
}

/// Insert `track` into the editor as it was at the last fork, clamping
/// `index` to the track count.
pub fn add_track_to_node(doc: &mut Document, node: &NodeId, index: usize, track: Track) {
    let Some(origin) = doc.origin_video_editor(node) else {
        debug!(%node, "track insert ignored: no origin node");
        return;
    };
    let mut tracks = origin.tracks.clone();
    let at = index.min(tracks.len());
    tracks.insert(at, track);
    doc.patch_node(node, &NodePatch::tracks(tracks));
}

/// Append `clip` to track `index` of the forked editor, shifted to start
/// after the track's last clip.
pub fn add_clip_to_track(doc: &mut Document, node: &NodeId, index: usize, clip: Clip) {
    let Some(origin) = doc.origin_video_editor(node) else {
        debug!(%node, "clip insert ignored: no origin node");
        return;
    };
    let mut tracks = origin.tracks.clone();
    let Some(track) = tracks.get_mut(index) else {
        return;
    };
    let offset = track.clips.iter().map(Clip::end).fold(0.0, f64::max);
    track.clips.push(clip.shifted(offset));
    doc.patch_node(node, &NodePatch::tracks(tracks));
}
