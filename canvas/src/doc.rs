//! Document model: authored nodes, their tracks and clips, and sparse patches.
//!
//! Nodes come in two kinds sharing one id space: free-standing text boxes and
//! video editors that own an ordered list of tracks, each holding timed clips.
//! `NodePatch` is the shallow-merge update applied by the registry, and
//! `Snapshot` is the only persisted shape the core defines.
//!
//! Kinds are closed sum types; the JSON form keeps a `type` discriminant so
//! snapshots stay readable by other tools.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::Rect;

/// Unique identifier for a node. Text boxes and video editors share this space.
pub type NodeId = Uuid;

/// Unique identifier for a track inside a video editor.
pub type TrackId = Uuid;

/// Unique identifier for a clip inside a track.
pub type ClipId = Uuid;

/// Error returned when a snapshot cannot be encoded or decoded.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid snapshot json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Horizontal text alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    #[default]
    Center,
    Right,
}

/// Vertical text alignment inside a text box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    Top,
    #[default]
    Center,
}

/// Which map a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Textbox,
    VideoEditor,
}

/// A free-standing text box on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextboxNode {
    pub id: NodeId,
    /// Version stamp bumped on every mutation of this node or its descendants.
    #[serde(default)]
    pub cache_key: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub position: Rect,
    #[serde(default)]
    pub align: Align,
    #[serde(default)]
    pub vertical: VerticalAlign,
    #[serde(default)]
    pub text: String,
}

/// A multi-track video editor block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoEditorNode {
    pub id: NodeId,
    #[serde(default)]
    pub cache_key: u64,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub position: Rect,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl VideoEditorNode {
    /// Largest clip end across every track; `0.0` for an empty editor.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.tracks
            .iter()
            .flat_map(|t| t.clips.iter())
            .fold(0.0, |acc, clip| clip.end().max(acc))
    }
}

/// One lane of clips inside a video editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    pub id: TrackId,
    pub index: i32,
    #[serde(default)]
    pub clips: Vec<Clip>,
    /// Insertion marker drawn above this track during a drag.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub highlight_above: bool,
    /// Insertion marker drawn below this track during a drag.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub highlight_below: bool,
}

impl Track {
    #[must_use]
    pub fn new(index: i32, clips: Vec<Clip>) -> Self {
        Self { id: Uuid::new_v4(), index, clips, highlight_above: false, highlight_below: false }
    }
}

/// A video clip: plays `[clip_start, clip_end]` of the source at `[start, end]` on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoClip {
    pub id: ClipId,
    pub url: String,
    pub start: f64,
    pub end: f64,
    pub clip_start: f64,
    pub clip_end: f64,
}

/// A text overlay clip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextClip {
    pub id: ClipId,
    pub text: String,
    pub size: f64,
    pub color: String,
    pub start: f64,
    pub end: f64,
}

/// A timed clip on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Clip {
    VideoClip(VideoClip),
    TextClip(TextClip),
}

impl Clip {
    #[must_use]
    pub fn id(&self) -> ClipId {
        match self {
            Self::VideoClip(c) => c.id,
            Self::TextClip(c) => c.id,
        }
    }

    #[must_use]
    pub fn start(&self) -> f64 {
        match self {
            Self::VideoClip(c) => c.start,
            Self::TextClip(c) => c.start,
        }
    }

    #[must_use]
    pub fn end(&self) -> f64 {
        match self {
            Self::VideoClip(c) => c.end,
            Self::TextClip(c) => c.end,
        }
    }

    /// The same clip moved `offset` seconds later on the timeline.
    #[must_use]
    pub fn shifted(&self, offset: f64) -> Self {
        let mut out = self.clone();
        match &mut out {
            Self::VideoClip(c) => {
                c.start += offset;
                c.end += offset;
            }
            Self::TextClip(c) => {
                c.start += offset;
                c.end += offset;
            }
        }
        out
    }

    /// Whether the clip covers `time` (both bounds inclusive).
    #[must_use]
    pub fn is_active_at(&self, time: f64) -> bool {
        self.start() <= time && self.end() >= time
    }
}

/// A node of either kind, as seen through the unified query API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Textbox(TextboxNode),
    VideoEditor(VideoEditorNode),
}

impl Node {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Textbox(n) => n.id,
            Self::VideoEditor(n) => n.id,
        }
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Textbox(_) => NodeKind::Textbox,
            Self::VideoEditor(_) => NodeKind::VideoEditor,
        }
    }

    #[must_use]
    pub fn position(&self) -> Rect {
        match self {
            Self::Textbox(n) => n.position,
            Self::VideoEditor(n) => n.position,
        }
    }

    #[must_use]
    pub fn cache_key(&self) -> u64 {
        match self {
            Self::Textbox(n) => n.cache_key,
            Self::VideoEditor(n) => n.cache_key,
        }
    }

    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        match self {
            Self::Textbox(n) => n.parent,
            Self::VideoEditor(n) => n.parent,
        }
    }

    pub(crate) fn set_cache_key(&mut self, key: u64) {
        match self {
            Self::Textbox(n) => n.cache_key = key,
            Self::VideoEditor(n) => n.cache_key = key,
        }
    }
}

/// Shallow update for a node. Only present fields are applied; fields that do
/// not exist on the target kind are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Rect>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical: Option<VerticalAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracks: Option<Vec<Track>>,
}

impl NodePatch {
    /// Patch touching only the position.
    #[must_use]
    pub fn position(rect: Rect) -> Self {
        Self { position: Some(rect), ..Default::default() }
    }

    /// Patch replacing the whole track list.
    #[must_use]
    pub fn tracks(tracks: Vec<Track>) -> Self {
        Self { tracks: Some(tracks), ..Default::default() }
    }

    /// Merge this patch into `node`, producing the new whole value.
    #[must_use]
    pub fn merged_into(&self, node: &Node) -> Node {
        let mut out = node.clone();
        match &mut out {
            Node::Textbox(n) => {
                self.apply_common(&mut n.position, &mut n.title, &mut n.author, &mut n.parent);
                if let Some(text) = &self.text {
                    n.text.clone_from(text);
                }
                if let Some(align) = self.align {
                    n.align = align;
                }
                if let Some(vertical) = self.vertical {
                    n.vertical = vertical;
                }
            }
            Node::VideoEditor(n) => {
                self.apply_common(&mut n.position, &mut n.title, &mut n.author, &mut n.parent);
                if let Some(tracks) = &self.tracks {
                    n.tracks.clone_from(tracks);
                }
            }
        }
        out
    }

    fn apply_common(
        &self,
        position: &mut Rect,
        title: &mut Option<String>,
        author: &mut String,
        parent: &mut Option<NodeId>,
    ) {
        if let Some(p) = self.position {
            *position = p;
        }
        if let Some(t) = &self.title {
            *title = Some(t.clone());
        }
        if let Some(a) = &self.author {
            author.clone_from(a);
        }
        if let Some(p) = self.parent {
            *parent = Some(p);
        }
    }
}

/// Persisted document shape: nodes keyed by id, split by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub textboxes: HashMap<NodeId, TextboxNode>,
    #[serde(default)]
    pub video_editors: HashMap<NodeId, VideoEditorNode>,
}

impl Snapshot {
    /// Decode a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if the input is not a valid snapshot.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode this snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Total number of nodes across both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.textboxes.len() + self.video_editors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
