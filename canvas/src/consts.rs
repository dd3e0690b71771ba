//! Shared numeric constants for the canvas crate.

// ── Camera ──────────────────────────────────────────────────────

/// Half-angle of the projection frustum (30°), in radians.
pub const CAMERA_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Width of the home region shown by a freshly initialized viewport.
pub const RECT_W: f64 = 1000.0;

/// Height of the home region shown by a freshly initialized viewport.
pub const RECT_H: f64 = 1000.0;

/// Multiplier applied to wheel deltas when panning.
pub const PAN_SPEED: f64 = 1.5;

/// Multiplier applied to wheel `dy` when zooming. Raw wheel zoom is slow.
pub const ZOOM_SPEED: f64 = 10.0;

/// Padding in plane units around a group of nodes being centered.
pub const CENTER_PADDING: f64 = 50.0;

/// Smallest camera height a zoom may reach.
pub const MIN_CAMERA_Z: f64 = 1.0;

// ── Timeline ────────────────────────────────────────────────────

/// Horizontal timeline density inside a video editor node.
pub const PIXELS_PER_SECOND: f64 = 60.0;

/// Default monitor playback rate.
pub const DEFAULT_MONITOR_FPS: f64 = 30.0;

// ── Video editor layout ─────────────────────────────────────────

/// Border + padding around the stacked editor rows.
pub const EDITOR_PADDING: f64 = 4.0;

/// Horizontal padding of the timeline rows (both sides combined).
pub const EDITOR_PADDING_X: f64 = 30.0;

/// Height of the monitor (previewer) row.
pub const PREVIEWER_H: f64 = 300.0;

/// Height of the transport controls row.
pub const CONTROLS_H: f64 = 50.0;

/// Height of the time scale row.
pub const TIMESCALE_H: f64 = 30.0;

/// Height of a single track body.
pub const TRACK_H: f64 = 30.0;

/// Height of the insertion strip above each track.
pub const TRACK_GAP_H: f64 = 5.0;

/// Height of the insertion strip below the last track, margins included.
pub const TRACK_TAIL_H: f64 = 5.0;

/// Minimum height of the tracks row.
pub const MIN_TRACKS_H: f64 = 200.0;

/// Extra timeline room past the last clip end.
pub const TIMELINE_OVERSCAN: f64 = 1.2;

/// Duration given to text clips dropped onto a track.
pub const TEXT_CLIP_DURATION: f64 = 5.0;
