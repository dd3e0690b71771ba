//! Infinite-canvas core for a video board: a projective camera over an
//! unbounded plane, a speculative document of text boxes and multi-track
//! video editors, per-editor playheads, and a retained scene graph that
//! drives an abstract drawing surface.
//!
//! The crate is host-agnostic. A host feeds container-relative pointer and
//! wheel events into [`engine::Engine`], calls [`engine::Engine::tick`] once
//! per frame with a [`surface::Surface`] implementation, and persists
//! [`doc::Snapshot`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine, gestures, and the frame driver |
//! | [`camera`] | Projection math and anchor-preserving zoom |
//! | [`viewport`] | Camera controller, pointer tracking, placement |
//! | [`doc`] | Node, track and clip types; patches; snapshots |
//! | [`registry`] | Document with fork / reset / commit |
//! | [`monitor`] | Per-editor playheads |
//! | [`scheduler`] | Due-time queue driving the playheads |
//! | [`scene`] | Keyed reconciler over widgets and render objects |
//! | [`widgets`] | Text, media, frame and monitor widgets |
//! | [`surface`] | Drawing-surface trait and the headless surface |
//! | [`editor`] | Video-editor layout, drop targets, track edits |
//! | [`hit`] | Plane-space hit tests |
//! | [`input`] | Wheel, modifiers, and drag state |
//! | [`consts`] | Shared numeric constants |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod editor;
pub mod engine;
pub mod hit;
pub mod input;
pub mod monitor;
pub mod registry;
pub mod scene;
pub mod scheduler;
pub mod surface;
pub mod viewport;
pub mod widgets;
