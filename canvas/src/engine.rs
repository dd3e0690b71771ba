//! Top-level engine: owns the viewport, the project, the active gesture, and
//! the retained scene, and exposes the operations a host wires its events to.
//!
//! FRAME DRIVER
//! ============
//! The host calls [`Engine::tick`] at its own pace with a monotonic clock in
//! seconds. A tick first steps the playing monitors, then reconciles the
//! scene only if something changed since the last frame. Idle frames make no
//! surface calls.
//!
//! GESTURES
//! ========
//! `begin_drag` forks the document. Every `drag_move` resets to that fork and
//! applies at most one speculative edit (a track highlight), so no edit ever
//! accumulates across moves. `drag_release` resets once more, applies the
//! real insertion, and commits.

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

use tracing::{debug, info};
use uuid::Uuid;

use crate::camera::{Point, Rect};
use crate::consts::DEFAULT_MONITOR_FPS;
use crate::doc::{Node, NodeId, NodeKind, NodePatch, Snapshot, Track, VideoEditorNode};
use crate::editor::{
    DropAction, DropTarget, add_clip_to_track, add_highlight_to_track, add_track_to_node, drop_targets,
    previewer_rect, upsert_textbox, video_editor_from_clip,
};
use crate::hit::{drop_target_at, node_at, overlaps_any};
use crate::input::{DragPayload, DragPreview, GestureError, InputState, Modifiers, WheelDelta};
use crate::monitor::MonitorState;
use crate::scene::{ReconcileStats, RootElement, Widget, leaf};
use crate::surface::Surface;
use crate::viewport::{Viewport, ViewportConfig};
use crate::widgets::{FrameWidget, Project, TextWidget, monitor};

/// Construction parameters for [`Engine`].
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub viewport: ViewportConfig,
    /// Playback rate given to new monitors.
    pub monitor_fps: f64,
    /// Author stamped on text boxes created by drops.
    pub author: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { viewport: ViewportConfig::default(), monitor_fps: DEFAULT_MONITOR_FPS, author: String::new() }
    }
}

/// What a drop did to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome {
    /// A new track was inserted into a video editor.
    TrackAdded { node: NodeId, index: usize },
    /// A clip was appended to an existing track.
    ClipAdded { node: NodeId, index: usize },
    VideoEditorCreated(NodeId),
    TextboxCreated(NodeId),
    /// Released outside the board, or over a node but not over a drop target.
    Ignored,
}

/// Where the pointer is during a drag.
enum DropSite {
    /// Over empty board (or nothing the preview overlaps).
    Board,
    /// Over a node the preview overlaps, possibly on one of its drop targets.
    Node(Option<DropTarget>),
}

/// The canvas engine. Holds no host resources; the drawing surface is passed
/// to the calls that need it.
pub struct Engine {
    pub viewport: Viewport,
    pub project: Project,
    pub input: InputState,
    root: RootElement<Project>,
    config: EngineConfig,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self {
            viewport: Viewport::new(config.viewport),
            project: Project::new(config.monitor_fps),
            input: InputState::Idle,
            root: RootElement::new("board"),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- Viewport ---

    /// Size the container and reset the camera to the home region.
    pub fn initialize(&mut self, width: f64, height: f64) {
        self.viewport.initialize(width, height);
    }

    /// Pan, or zoom when the zoom modifier is held.
    pub fn on_wheel(&mut self, delta: WheelDelta, modifiers: Modifiers) {
        if modifiers.zooms() {
            self.viewport.zoom_camera(delta.dx, delta.dy);
        } else {
            self.viewport.move_camera(delta.dx, delta.dy);
        }
    }

    /// Track the pointer from a container-relative pixel position.
    pub fn on_pointer_move(&mut self, pixel: Point) {
        self.viewport.move_pointer(pixel.x, pixel.y);
    }

    pub fn center_on_node(&mut self, id: &NodeId) {
        self.viewport.center_on_node(&self.project.doc, id);
    }

    pub fn center_on_nodes(&mut self, ids: &[NodeId]) {
        self.viewport.center_on_nodes(&self.project.doc, ids);
    }

    // --- Document ---

    /// Add or replace a video editor and give it a paused monitor.
    pub fn add_video_editor(&mut self, node: VideoEditorNode) {
        let id = node.id;
        self.project.doc.add_node(Node::VideoEditor(node));
        self.project.monitors.add_monitor(id, 0.0);
        self.viewport.request_render();
    }

    /// Add a text box, or only move it when `id` already exists.
    pub fn add_textbox(&mut self, id: NodeId, position: Rect, text: &str) {
        upsert_textbox(&mut self.project.doc, id, position, text, &self.config.author);
        self.viewport.request_render();
    }

    pub fn patch_node(&mut self, id: &NodeId, patch: &NodePatch) {
        self.project.doc.patch_node(id, patch);
        self.viewport.request_render();
    }

    /// Remove a node of either kind along with its monitor.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.project.doc.remove_node(id)?;
        self.project.monitors.remove_monitor(id);
        self.viewport.request_render();
        Some(removed)
    }

    /// Replace the document. Abandons any drag in progress and rebuilds the
    /// monitor set, keeping playheads of editors that survive.
    pub fn load_state(&mut self, board_id: Uuid, snapshot: Snapshot) {
        if self.input.take_preview().is_some() {
            debug!("drag abandoned by state load");
        }
        self.project.doc.load_state(board_id, snapshot);
        self.sync_monitors();
        self.viewport.request_render();
        info!(%board_id, nodes = self.project.doc.len(), "board loaded");
    }

    #[must_use]
    pub fn fetch_state(&self) -> Snapshot {
        self.project.doc.fetch_state()
    }

    // --- Monitors ---

    pub fn play(&mut self, id: &NodeId, now: f64) {
        self.project.monitors.play(id, now);
        self.viewport.request_render();
    }

    pub fn pause(&mut self, id: &NodeId) {
        self.project.monitors.pause(id);
        self.viewport.request_render();
    }

    pub fn seek(&mut self, id: &NodeId, time: f64) {
        self.project.monitors.seek(id, time);
        self.viewport.request_render();
    }

    #[must_use]
    pub fn monitor(&self, id: &NodeId) -> Option<&MonitorState> {
        self.project.monitors.get(id)
    }

    /// When the next monitor step is due, for hosts that sleep between frames.
    #[must_use]
    pub fn next_wakeup(&self) -> Option<f64> {
        self.project.monitors.next_due()
    }

    // --- Drag and drop ---

    /// Pick up `payload` and fork the document.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::GestureInProgress`] if a drag is already active.
    pub fn begin_drag(&mut self, payload: DragPayload) -> Result<(), GestureError> {
        if self.input.preview().is_some() {
            return Err(GestureError::GestureInProgress);
        }
        self.input = InputState::Dragging(DragPreview::new(payload));
        self.project.doc.fork();
        debug!("drag started");
        Ok(())
    }

    /// Follow the pointer: reset to the fork, then either highlight the
    /// insertion point under the pointer or show the preview node there.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NoActivePreview`] when no drag is active.
    pub fn drag_move(&mut self, pixel: Point) -> Result<(), GestureError> {
        let Some(preview) = self.input.preview() else {
            return Err(GestureError::NoActivePreview);
        };
        let preview = preview.clone();
        self.input.hide_preview();
        self.project.doc.reset_with_fork();
        self.sync_monitors();
        self.viewport.request_render();
        self.viewport.move_pointer(pixel.x, pixel.y);
        if !self.is_inside(pixel) {
            return Ok(());
        }
        let point = self.viewport.pixel_to_plane(pixel);
        match self.drop_site(&preview, point) {
            DropSite::Node(Some(target)) => {
                add_highlight_to_track(&mut self.project.doc, &target.node, target.index, target.action);
            }
            DropSite::Node(None) => {}
            DropSite::Board => self.input.show_preview_at(point),
        }
        Ok(())
    }

    /// Drop at `pixel`: insert into the editor under the pointer, or create a
    /// new node on empty board, then commit.
    ///
    /// # Errors
    ///
    /// Returns [`GestureError::NoActivePreview`] when no drag is active. The
    /// document is left untouched in that case.
    pub fn drag_release(&mut self, pixel: Point) -> Result<DropOutcome, GestureError> {
        let Some(preview) = self.input.take_preview() else {
            return Err(GestureError::NoActivePreview);
        };
        self.project.doc.reset_with_fork();
        self.viewport.request_render();
        let outcome = if self.is_inside(pixel) {
            let point = self.viewport.pixel_to_plane(pixel);
            match self.drop_site(&preview, point) {
                DropSite::Node(Some(target)) => self.insert_at(&target, &preview),
                DropSite::Node(None) => DropOutcome::Ignored,
                DropSite::Board => self.create_at(point, &preview),
            }
        } else {
            DropOutcome::Ignored
        };
        self.project.doc.commit();
        self.sync_monitors();
        debug!(?outcome, "drag released");
        Ok(outcome)
    }

    /// Cancel the drag and discard any speculative edit.
    pub fn abort_drag(&mut self) {
        if self.input.take_preview().is_some() {
            self.project.doc.reset_with_fork();
            self.sync_monitors();
            self.viewport.request_render();
            debug!("drag aborted");
        }
    }

    /// One monitor per video editor in the live document. A reset can bring
    /// back an editor removed mid-drag or drop one added mid-drag.
    fn sync_monitors(&mut self) {
        self.project.monitors.sync(&self.project.doc.video_editor_ids());
    }

    fn is_inside(&self, pixel: Point) -> bool {
        let (width, height) = self.viewport.container();
        self.viewport.is_ready() && Rect::new(0.0, 0.0, width, height).contains(pixel)
    }

    fn drop_site(&self, preview: &DragPreview, point: Point) -> DropSite {
        let doc = &self.project.doc;
        if !overlaps_any(doc, &preview.rect_at(point)) {
            return DropSite::Board;
        }
        let Some(node) = node_at(doc, point) else {
            return DropSite::Board;
        };
        let target = match &node {
            Node::VideoEditor(editor) => drop_target_at(&drop_targets(editor), point).cloned(),
            Node::Textbox(_) => None,
        };
        DropSite::Node(target)
    }

    fn insert_at(&mut self, target: &DropTarget, preview: &DragPreview) -> DropOutcome {
        let doc = &mut self.project.doc;
        match target.action {
            DropAction::AddTrack => {
                add_track_to_node(doc, &target.node, target.index, Track::new(1, vec![preview.clip()]));
                DropOutcome::TrackAdded { node: target.node, index: target.index }
            }
            DropAction::AddClip => {
                add_clip_to_track(doc, &target.node, target.index, preview.clip());
                DropOutcome::ClipAdded { node: target.node, index: target.index }
            }
        }
    }

    fn create_at(&mut self, point: Point, preview: &DragPreview) -> DropOutcome {
        let id = Uuid::new_v4();
        let position = preview.rect_at(point);
        match &preview.payload {
            DragPayload::Video { url, duration } => {
                let mut node = video_editor_from_clip(id, position, url, *duration);
                node.author.clone_from(&self.config.author);
                self.add_video_editor(node);
                DropOutcome::VideoEditorCreated(id)
            }
            DragPayload::Text { text, .. } => {
                self.add_textbox(id, position, text);
                DropOutcome::TextboxCreated(id)
            }
        }
    }

    // --- Frame ---

    /// Advance monitors to `now` and reconcile the scene if anything changed.
    pub fn tick(&mut self, now: f64, surface: &mut dyn Surface) -> ReconcileStats {
        if !self.project.monitors.tick(now, &self.project.doc).is_empty() {
            self.viewport.request_render();
        }
        if !self.viewport.take_render() {
            return ReconcileStats::default();
        }
        let viewport = &self.viewport;
        let input = &self.input;
        self.root.render_widgets(surface, &self.project, |project| build_scene(viewport, input, project))
    }

    /// Tear down the scene. The next tick mounts it again.
    pub fn shutdown(&mut self, surface: &mut dyn Surface) -> ReconcileStats {
        self.viewport.request_render();
        self.root.unmount(surface)
    }
}

/// Root children for the current frame: text boxes, then monitors, then the
/// drag preview on top. Offscreen nodes are left out.
fn build_scene(viewport: &Viewport, input: &InputState, project: &Project) -> Vec<Box<dyn Widget<Project>>> {
    let mut widgets: Vec<Box<dyn Widget<Project>>> = Vec::new();
    for node in project.doc.all_nodes_of_kind(NodeKind::Textbox) {
        let Node::Textbox(textbox) = node else {
            continue;
        };
        if let Some(frame) = viewport.place(&textbox.position) {
            widgets.push(leaf(TextWidget {
                key: format!("textbox:{}", textbox.id),
                text: textbox.text,
                origin: Point::new(frame.left + frame.width / 2.0, frame.top + frame.height / 2.0),
            }));
        }
    }
    for id in project.doc.video_editor_ids() {
        let Some(node) = project.doc.video_editor(&id) else {
            continue;
        };
        if let Some(frame) = viewport.place(&previewer_rect(&node.position)) {
            widgets.push(monitor(id, frame));
        }
    }
    if let Some(preview) = input.preview().filter(|p| p.show_preview_node) {
        if let Some(frame) = viewport.place(&preview.rect()) {
            widgets.push(leaf(FrameWidget { key: "drag-preview".to_owned(), frame }));
        }
    }
    widgets
}
