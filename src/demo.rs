//! Demo board seeded when no snapshot is configured.

#[cfg(test)]
#[path = "demo_test.rs"]
mod demo_test;

use canvas::camera::Rect;
use canvas::doc::{Clip, NodeId, TextClip, Track};
use canvas::editor::{node_size, video_editor_from_clip};
use canvas::engine::Engine;
use tracing::debug;
use uuid::Uuid;

const INTRO_URL: &str = "media/intro.mp4";
const INTRO_SECONDS: f64 = 8.0;

/// Add a title text box and a two-track editor. Returns the new node ids.
pub fn seed(engine: &mut Engine) -> Vec<NodeId> {
    let title = Uuid::new_v4();
    engine.add_textbox(title, Rect::new(1100.0, 980.0, 400.0, 80.0), "Reelboard");

    let mut editor = video_editor_from_clip(Uuid::new_v4(), Rect::default(), INTRO_URL, INTRO_SECONDS);
    editor.author.clone_from(&engine.config().author);
    editor.title = Some("Intro".to_owned());
    editor.tracks.push(Track::new(
        2,
        vec![Clip::TextClip(TextClip {
            id: Uuid::new_v4(),
            text: "Welcome".to_owned(),
            size: 60.0,
            color: "#000000".to_owned(),
            start: 0.0,
            end: 3.0,
        })],
    ));
    let (width, height) = node_size(&editor);
    editor.position = Rect::new(1100.0, 1100.0, width, height);
    let editor_id = editor.id;
    engine.add_video_editor(editor);

    debug!(%title, editor = %editor_id, "demo board seeded");
    vec![title, editor_id]
}
