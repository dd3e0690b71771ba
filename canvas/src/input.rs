//! Input model: wheel deltas, modifier keys, and the drag-and-drop gesture state.
//!
//! A drag starts when the host picks up a source (a video or a text snippet)
//! and ends on release or abort. `InputState::Dragging` carries the preview
//! rectangle that follows the pointer, plus everything needed to build the
//! final document mutation on release.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::camera::{Point, Rect};
use crate::consts::TEXT_CLIP_DURATION;
use crate::doc::{Clip, TextClip, VideoClip};
use crate::editor::editor_size;

/// Keyboard modifier keys held during an event.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    /// Wheel events zoom instead of pan while Ctrl or Meta is held.
    #[must_use]
    pub fn zooms(self) -> bool {
        self.ctrl || self.meta
    }
}

/// Wheel / trackpad scroll delta.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WheelDelta {
    /// Horizontal scroll amount in pixels.
    pub dx: f64,
    /// Vertical scroll amount in pixels (positive = down).
    pub dy: f64,
}

/// What is being dragged onto the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DragPayload {
    Video { url: String, duration: f64 },
    Text { text: String, size: f64, width: f64, height: f64 },
}

/// Preview node following the pointer during a drag. `origin` and the size
/// are in plane units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DragPreview {
    pub payload: DragPayload,
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    /// Seconds a clip made from this payload lasts.
    pub duration: f64,
    /// Whether the free-floating preview node should be drawn.
    pub show_preview_node: bool,
}

impl DragPreview {
    /// A hidden preview sized for `payload`. Videos take the size of a
    /// one-track editor for their duration.
    #[must_use]
    pub fn new(payload: DragPayload) -> Self {
        let (width, height, duration) = match &payload {
            DragPayload::Video { duration, .. } => {
                let (w, h) = editor_size(*duration, 1);
                (w, h, *duration)
            }
            DragPayload::Text { width, height, .. } => (*width, *height, TEXT_CLIP_DURATION),
        };
        Self { payload, origin: Point::default(), width, height, duration, show_preview_node: false }
    }

    /// Preview rectangle with its top-left corner at `origin`.
    #[must_use]
    pub fn rect_at(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect_at(self.origin)
    }

    /// A fresh clip spanning `[0, duration]` built from the payload.
    #[must_use]
    pub fn clip(&self) -> Clip {
        match &self.payload {
            DragPayload::Video { url, duration } => Clip::VideoClip(VideoClip {
                id: Uuid::new_v4(),
                url: url.clone(),
                start: 0.0,
                end: *duration,
                clip_start: 0.0,
                clip_end: *duration,
            }),
            DragPayload::Text { text, size, .. } => Clip::TextClip(TextClip {
                id: Uuid::new_v4(),
                text: text.clone(),
                size: *size,
                color: "#000000".to_owned(),
                start: 0.0,
                end: self.duration,
            }),
        }
    }
}

/// Active gesture.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A source is being dragged over the board.
    Dragging(DragPreview),
}

impl InputState {
    #[must_use]
    pub fn preview(&self) -> Option<&DragPreview> {
        match self {
            Self::Idle => None,
            Self::Dragging(preview) => Some(preview),
        }
    }

    fn preview_mut(&mut self) -> Option<&mut DragPreview> {
        match self {
            Self::Idle => None,
            Self::Dragging(preview) => Some(preview),
        }
    }

    /// Hide the preview node, keeping the gesture alive.
    pub fn hide_preview(&mut self) {
        if let Some(preview) = self.preview_mut() {
            preview.show_preview_node = false;
        }
    }

    /// Show the preview node at `origin`.
    pub fn show_preview_at(&mut self, origin: Point) {
        if let Some(preview) = self.preview_mut() {
            preview.origin = origin;
            preview.show_preview_node = true;
        }
    }

    /// End the gesture, returning the preview it carried.
    pub fn take_preview(&mut self) -> Option<DragPreview> {
        match std::mem::take(self) {
            Self::Idle => None,
            Self::Dragging(preview) => Some(preview),
        }
    }
}

/// Errors from misordered gesture calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GestureError {
    #[error("no drag in progress")]
    NoActivePreview,
    #[error("a drag is already in progress")]
    GestureInProgress,
}
