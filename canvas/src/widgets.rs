//! Concrete widgets for the board: text boxes, media sprites, and monitors.
//!
//! All props are in pixels; the engine places nodes through the viewport
//! before building widgets, so nothing here knows about the camera.

#[cfg(test)]
#[path = "widgets_test.rs"]
mod widgets_test;

use tracing::trace;

use crate::camera::{Point, Rect};
use crate::doc::{Clip, NodeId};
use crate::monitor::{MonitorRegistry, visible_clips};
use crate::registry::Document;
use crate::scene::{CompositeWidget, LeafWidget, RenderLeaf, Widget, composite, leaf};
use crate::surface::{ContainerId, Drawable, MediaHandle, ResourceId, Surface, TextStyle};

/// Application state the scene reads while building.
#[derive(Debug)]
pub struct Project {
    pub doc: Document,
    pub monitors: MonitorRegistry,
}

impl Project {
    #[must_use]
    pub fn new(monitor_fps: f64) -> Self {
        Self { doc: Document::new(), monitors: MonitorRegistry::new(monitor_fps) }
    }
}

// --- Media ---

/// A sprite showing `source` seeked to `time` seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaWidget {
    pub key: String,
    pub source: String,
    pub frame: Rect,
    pub time: f64,
}

pub struct MediaRender {
    resource: ResourceId,
    media: MediaHandle,
    source: String,
    frame: Rect,
    time: f64,
    /// Set when `source` changed since the media was acquired.
    reacquire: bool,
}

impl MediaRender {
    fn drawable(&self) -> Drawable {
        Drawable::Sprite {
            origin: Point::new(self.frame.left, self.frame.top),
            width: self.frame.width,
            height: self.frame.height,
        }
    }
}

impl RenderLeaf for MediaRender {
    fn paint(&mut self, surface: &mut dyn Surface) {
        if self.reacquire {
            surface.release_media(self.media);
            self.media = surface.acquire_media(&self.source);
            surface.bind_media(self.resource, self.media);
            self.reacquire = false;
        }
        surface.update_drawable(self.resource, self.drawable());
        surface.seek_media(self.media, self.time);
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        surface.release_media(self.media);
        surface.remove_drawable(self.resource);
    }
}

impl<C> LeafWidget<C> for MediaWidget {
    type Render = MediaRender;

    fn key(&self) -> &str {
        &self.key
    }

    fn create_render_object(&self, _ctx: &C, surface: &mut dyn Surface, container: ContainerId) -> MediaRender {
        let mut render = MediaRender {
            resource: ResourceId(0),
            media: MediaHandle(0),
            source: self.source.clone(),
            frame: self.frame,
            time: self.time,
            reacquire: false,
        };
        render.resource = surface.add_drawable(container, render.drawable());
        render.media = surface.acquire_media(&self.source);
        surface.seek_media(render.media, self.time);
        surface.bind_media(render.resource, render.media);
        trace!(key = %self.key, source = %self.source, "media mounted");
        render
    }

    #[allow(clippy::float_cmp)]
    fn update_render_object(&self, render: &mut MediaRender) -> bool {
        let mut changed = false;
        if render.source != self.source {
            render.source.clone_from(&self.source);
            render.reacquire = true;
            changed = true;
        }
        if render.frame != self.frame {
            render.frame = self.frame;
            changed = true;
        }
        if render.time != self.time {
            render.time = self.time;
            changed = true;
        }
        changed
    }
}

// --- Text ---

/// Overlay text centered on `origin`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextWidget {
    pub key: String,
    pub text: String,
    pub origin: Point,
}

pub struct TextRender {
    resource: ResourceId,
    text: String,
    origin: Point,
}

impl TextRender {
    fn drawable(&self) -> Drawable {
        Drawable::Text { text: self.text.clone(), origin: self.origin, style: TextStyle::default() }
    }
}

impl RenderLeaf for TextRender {
    fn paint(&mut self, surface: &mut dyn Surface) {
        surface.update_drawable(self.resource, self.drawable());
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        surface.remove_drawable(self.resource);
    }
}

impl<C> LeafWidget<C> for TextWidget {
    type Render = TextRender;

    fn key(&self) -> &str {
        &self.key
    }

    fn create_render_object(&self, _ctx: &C, surface: &mut dyn Surface, container: ContainerId) -> TextRender {
        let mut render = TextRender { resource: ResourceId(0), text: self.text.clone(), origin: self.origin };
        render.resource = surface.add_drawable(container, render.drawable());
        render
    }

    fn update_render_object(&self, render: &mut TextRender) -> bool {
        if render.text == self.text && render.origin == self.origin {
            return false;
        }
        render.text.clone_from(&self.text);
        render.origin = self.origin;
        true
    }
}

// --- Frame ---

/// An empty sprite outlining a rectangle, used for the drag preview.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameWidget {
    pub key: String,
    pub frame: Rect,
}

pub struct FrameRender {
    resource: ResourceId,
    frame: Rect,
}

impl FrameRender {
    fn drawable(&self) -> Drawable {
        Drawable::Sprite {
            origin: Point::new(self.frame.left, self.frame.top),
            width: self.frame.width,
            height: self.frame.height,
        }
    }
}

impl RenderLeaf for FrameRender {
    fn paint(&mut self, surface: &mut dyn Surface) {
        surface.update_drawable(self.resource, self.drawable());
    }

    fn destroy(&mut self, surface: &mut dyn Surface) {
        surface.remove_drawable(self.resource);
    }
}

impl<C> LeafWidget<C> for FrameWidget {
    type Render = FrameRender;

    fn key(&self) -> &str {
        &self.key
    }

    fn create_render_object(&self, _ctx: &C, surface: &mut dyn Surface, container: ContainerId) -> FrameRender {
        let mut render = FrameRender { resource: ResourceId(0), frame: self.frame };
        render.resource = surface.add_drawable(container, render.drawable());
        render
    }

    fn update_render_object(&self, render: &mut FrameRender) -> bool {
        if render.frame == self.frame {
            return false;
        }
        render.frame = self.frame;
        true
    }
}

// --- Monitor ---

/// Everything a video editor's monitor shows at its current time: one media
/// sprite per active video clip and one text per active text clip, painted
/// bottom track first.
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorWidget {
    pub node: NodeId,
    /// Pixel rectangle of the previewer.
    pub frame: Rect,
    key: String,
}

impl MonitorWidget {
    #[must_use]
    pub fn new(node: NodeId, frame: Rect) -> Self {
        Self { node, frame, key: format!("monitor:{node}") }
    }
}

impl CompositeWidget<Project> for MonitorWidget {
    fn key(&self) -> &str {
        &self.key
    }

    fn build(&self, ctx: &Project) -> Vec<Box<dyn Widget<Project>>> {
        let Some(node) = ctx.doc.video_editor(&self.node) else {
            return vec![];
        };
        let time = ctx.monitors.get(&self.node).map_or(0.0, |m| m.time);
        let center = Point::new(self.frame.left + self.frame.width / 2.0, self.frame.top + self.frame.height / 2.0);
        visible_clips(node, time)
            .into_iter()
            .map(|clip| match clip {
                Clip::VideoClip(c) => leaf(MediaWidget {
                    key: c.id.to_string(),
                    source: c.url.clone(),
                    frame: self.frame,
                    time: c.clip_start + (time - c.start),
                }),
                Clip::TextClip(c) => leaf(TextWidget { key: c.id.to_string(), text: c.text.clone(), origin: center }),
            })
            .collect()
    }
}

/// Box a monitor for the root child list.
#[must_use]
pub fn monitor(node: NodeId, frame: Rect) -> Box<dyn Widget<Project>> {
    composite(MonitorWidget::new(node, frame))
}
