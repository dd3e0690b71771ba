//! Per-node playheads for video editors.
//!
//! Each video editor owns one monitor: a time cursor that is either paused or
//! playing. Playing monitors are entries in a [`Scheduler`]; every time an
//! entry comes due the monitor advances by the wall-clock delta since its last
//! step and reschedules itself one frame later. Monitors share no clock.
//!
//! END OF TIMELINE
//! ===============
//! When a step would reach or pass the largest clip end of the node, `time`
//! is clamped to exactly that end and the monitor pauses.

#[cfg(test)]
#[path = "monitor_test.rs"]
mod monitor_test;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::doc::{Clip, NodeId, VideoEditorNode};
use crate::registry::Document;
use crate::scheduler::Scheduler;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackState {
    Playing,
    #[default]
    Paused,
}

/// Playhead of one video editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonitorState {
    /// Seconds on the node's timeline.
    pub time: f64,
    pub state: PlaybackState,
    pub fps: f64,
    /// Clock reading of the previous step while playing.
    last_step: Option<f64>,
}

impl MonitorState {
    fn new(time: f64, fps: f64) -> Self {
        Self { time, state: PlaybackState::Paused, fps, last_step: None }
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    fn frame_interval(&self) -> f64 {
        1.0 / self.fps
    }
}

/// All monitors plus the scheduler that drives the playing ones.
#[derive(Debug, Clone)]
pub struct MonitorRegistry {
    monitors: HashMap<NodeId, MonitorState>,
    scheduler: Scheduler<NodeId>,
    default_fps: f64,
}

impl MonitorRegistry {
    #[must_use]
    pub fn new(default_fps: f64) -> Self {
        Self { monitors: HashMap::new(), scheduler: Scheduler::new(), default_fps }
    }

    /// Create a paused monitor at `time`. An existing monitor is left as is.
    pub fn add_monitor(&mut self, id: NodeId, time: f64) {
        if self.monitors.contains_key(&id) {
            return;
        }
        debug!(%id, time, "monitor added");
        self.monitors.insert(id, MonitorState::new(time.max(0.0), self.default_fps));
    }

    /// Destroy a monitor and cancel its pending step.
    pub fn remove_monitor(&mut self, id: &NodeId) {
        if self.monitors.remove(id).is_some() {
            self.scheduler.cancel(id);
            debug!(%id, "monitor removed");
        }
    }

    /// Make the set of monitors match `ids`: add missing ones, drop the rest.
    pub fn sync(&mut self, ids: &[NodeId]) {
        let stale: Vec<NodeId> = self.monitors.keys().filter(|id| !ids.contains(id)).copied().collect();
        for id in &stale {
            self.remove_monitor(id);
        }
        for id in ids {
            self.add_monitor(*id, 0.0);
        }
    }

    /// Start advancing from `now`. Unknown ids are ignored.
    pub fn play(&mut self, id: &NodeId, now: f64) {
        let Some(monitor) = self.monitors.get_mut(id) else {
            return;
        };
        monitor.state = PlaybackState::Playing;
        monitor.last_step = Some(now);
        let due = now + monitor.frame_interval();
        self.scheduler.schedule(*id, due);
        debug!(%id, time = monitor.time, "monitor playing");
    }

    /// Stop advancing. Other monitors are unaffected.
    pub fn pause(&mut self, id: &NodeId) {
        let Some(monitor) = self.monitors.get_mut(id) else {
            return;
        };
        monitor.state = PlaybackState::Paused;
        monitor.last_step = None;
        self.scheduler.cancel(id);
        debug!(%id, time = monitor.time, "monitor paused");
    }

    /// Move the playhead without changing the playback state.
    pub fn seek(&mut self, id: &NodeId, time: f64) {
        if let Some(monitor) = self.monitors.get_mut(id) {
            monitor.time = time.max(0.0);
        }
    }

    /// Step every monitor that is due at `now`. Returns the ids whose time
    /// changed.
    pub fn tick(&mut self, now: f64, doc: &Document) -> Vec<NodeId> {
        let due = self.scheduler.drain_due(now);
        let mut advanced = Vec::with_capacity(due.len());
        for id in due {
            let Some(monitor) = self.monitors.get_mut(&id) else {
                continue;
            };
            let Some(node) = doc.video_editor(&id) else {
                monitor.state = PlaybackState::Paused;
                monitor.last_step = None;
                debug!(%id, "monitor paused: node missing");
                continue;
            };
            let delta = (now - monitor.last_step.unwrap_or(now)).max(0.0);
            let end = node.duration();
            if monitor.time + delta >= end {
                monitor.time = end;
                monitor.state = PlaybackState::Paused;
                monitor.last_step = None;
                debug!(%id, time = end, "monitor reached end");
            } else {
                monitor.time += delta;
                monitor.last_step = Some(now);
                self.scheduler.schedule(id, now + monitor.frame_interval());
                trace!(%id, time = monitor.time, "monitor advanced");
            }
            advanced.push(id);
        }
        advanced
    }

    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&MonitorState> {
        self.monitors.get(id)
    }

    /// Whether any monitor is playing.
    #[must_use]
    pub fn any_playing(&self) -> bool {
        self.monitors.values().any(MonitorState::is_playing)
    }

    /// Earliest pending monitor step.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.scheduler.next_due()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}

/// Clips of `node` active at `time`, in paint order.
///
/// Tracks are walked by descending `index`, clips in array order; a clip later
/// in the result paints over earlier ones.
#[must_use]
pub fn visible_clips(node: &VideoEditorNode, time: f64) -> Vec<&Clip> {
    let mut tracks: Vec<_> = node.tracks.iter().collect();
    tracks.sort_by(|a, b| b.index.cmp(&a.index));
    tracks.into_iter().flat_map(|t| t.clips.iter()).filter(|c| c.is_active_at(time)).collect()
}
