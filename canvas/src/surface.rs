//! Drawing-surface contract.
//!
//! The reconciler never touches pixels. It asks a [`Surface`] to allocate
//! opaque drawables inside containers, to mutate or remove them, and to bind
//! decoded media handles to sprites. Hosts implement the trait over their
//! real renderer; [`HeadlessSurface`] keeps everything in memory and counts
//! calls, which is what the tests and the headless binary run against.
//!
//! Paint order inside a container is insertion order. Updating a drawable
//! never moves it.

#[cfg(test)]
#[path = "surface_test.rs"]
mod surface_test;

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::trace;

use crate::camera::Point;

/// Group of drawables painted together, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ContainerId(pub u64);

/// One drawable resource on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ResourceId(pub u64);

/// A decoded media source held by the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MediaHandle(pub u64);

/// Fixed look for overlay text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f64,
    pub fill: String,
    pub stroke: String,
    pub stroke_thickness: f64,
    pub drop_shadow: bool,
    /// Fraction of the glyph box placed on `origin`; 0.5 centers it.
    pub anchor: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Arial".to_owned(),
            font_size: 60.0,
            fill: "#ffffff".to_owned(),
            stroke: "#004620".to_owned(),
            stroke_thickness: 12.0,
            drop_shadow: true,
            anchor: 0.5,
        }
    }
}

/// What a resource looks like. Positions are pixels inside the container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Drawable {
    /// A rectangle that shows whatever media is bound to it.
    Sprite { origin: Point, width: f64, height: f64 },
    Text { text: String, origin: Point, style: TextStyle },
}

/// Primitives the host drawing surface provides.
pub trait Surface {
    /// Create a container, nested in `parent` or at the top level.
    fn create_container(&mut self, parent: Option<ContainerId>) -> ContainerId;

    /// Destroy a container and anything still inside it.
    fn destroy_container(&mut self, id: ContainerId);

    /// Append a drawable to a container; it paints above earlier ones.
    fn add_drawable(&mut self, container: ContainerId, drawable: Drawable) -> ResourceId;

    /// Replace a drawable's parameters in place.
    fn update_drawable(&mut self, id: ResourceId, drawable: Drawable);

    fn remove_drawable(&mut self, id: ResourceId);

    /// Decode `source` into a paused handle with autoplay off.
    fn acquire_media(&mut self, source: &str) -> MediaHandle;

    /// Show `media` through a sprite resource.
    fn bind_media(&mut self, resource: ResourceId, media: MediaHandle);

    /// Seek a handle to `time` seconds of its source.
    fn seek_media(&mut self, media: MediaHandle, time: f64);

    fn release_media(&mut self, media: MediaHandle);
}

/// Call counters kept by [`HeadlessSurface`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SurfaceStats {
    pub containers_created: u64,
    pub containers_destroyed: u64,
    pub drawables_added: u64,
    pub drawables_updated: u64,
    pub drawables_removed: u64,
    pub media_acquired: u64,
    pub media_bound: u64,
    pub media_seeks: u64,
    pub media_released: u64,
}

impl SurfaceStats {
    /// Every primitive call made so far.
    #[must_use]
    pub fn total_calls(&self) -> u64 {
        self.containers_created
            + self.containers_destroyed
            + self.drawables_added
            + self.drawables_updated
            + self.drawables_removed
            + self.media_acquired
            + self.media_bound
            + self.media_seeks
            + self.media_released
    }
}

/// State of one acquired media handle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MediaRecord {
    pub source: String,
    pub time: f64,
    pub autoplay: bool,
    pub bound_to: Option<ResourceId>,
}

#[derive(Debug, Clone)]
struct ContainerRecord {
    parent: Option<ContainerId>,
    drawables: IndexMap<ResourceId, Drawable>,
}

/// In-memory surface. Unknown ids are ignored.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    next_id: u64,
    containers: IndexMap<ContainerId, ContainerRecord>,
    /// Which container holds each live drawable.
    owners: HashMap<ResourceId, ContainerId>,
    media: HashMap<MediaHandle, MediaRecord>,
    stats: SurfaceStats,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    #[must_use]
    pub fn stats(&self) -> SurfaceStats {
        self.stats
    }

    #[must_use]
    pub fn drawable(&self, id: ResourceId) -> Option<&Drawable> {
        let container = self.owners.get(&id)?;
        self.containers.get(container)?.drawables.get(&id)
    }

    /// Drawables of a container in paint order.
    #[must_use]
    pub fn drawables_in(&self, container: ContainerId) -> Vec<(ResourceId, &Drawable)> {
        self.containers
            .get(&container)
            .map(|c| c.drawables.iter().map(|(id, d)| (*id, d)).collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn drawable_count(&self) -> usize {
        self.owners.len()
    }

    #[must_use]
    pub fn container_count(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn has_container(&self, id: ContainerId) -> bool {
        self.containers.contains_key(&id)
    }

    #[must_use]
    pub fn media(&self, handle: MediaHandle) -> Option<&MediaRecord> {
        self.media.get(&handle)
    }

    #[must_use]
    pub fn media_count(&self) -> usize {
        self.media.len()
    }

    /// Media handle bound to a resource, if any.
    #[must_use]
    pub fn media_bound_to(&self, resource: ResourceId) -> Option<(MediaHandle, &MediaRecord)> {
        self.media.iter().find(|(_, m)| m.bound_to == Some(resource)).map(|(h, m)| (*h, m))
    }

    fn child_containers(&self, parent: ContainerId) -> Vec<ContainerId> {
        self.containers.iter().filter(|(_, c)| c.parent == Some(parent)).map(|(id, _)| *id).collect()
    }
}

impl Surface for HeadlessSurface {
    fn create_container(&mut self, parent: Option<ContainerId>) -> ContainerId {
        let id = ContainerId(self.fresh_id());
        self.containers.insert(id, ContainerRecord { parent, drawables: IndexMap::new() });
        self.stats.containers_created += 1;
        trace!(container = id.0, "container created");
        id
    }

    fn destroy_container(&mut self, id: ContainerId) {
        for child in self.child_containers(id) {
            self.destroy_container(child);
        }
        let Some(record) = self.containers.shift_remove(&id) else {
            return;
        };
        for resource in record.drawables.keys() {
            self.owners.remove(resource);
        }
        self.stats.containers_destroyed += 1;
        trace!(container = id.0, "container destroyed");
    }

    fn add_drawable(&mut self, container: ContainerId, drawable: Drawable) -> ResourceId {
        let id = ResourceId(self.fresh_id());
        self.stats.drawables_added += 1;
        if let Some(record) = self.containers.get_mut(&container) {
            record.drawables.insert(id, drawable);
            self.owners.insert(id, container);
        }
        id
    }

    fn update_drawable(&mut self, id: ResourceId, drawable: Drawable) {
        self.stats.drawables_updated += 1;
        let Some(container) = self.owners.get(&id) else {
            return;
        };
        if let Some(slot) = self.containers.get_mut(container).and_then(|c| c.drawables.get_mut(&id)) {
            *slot = drawable;
        }
    }

    fn remove_drawable(&mut self, id: ResourceId) {
        self.stats.drawables_removed += 1;
        let Some(container) = self.owners.remove(&id) else {
            return;
        };
        if let Some(record) = self.containers.get_mut(&container) {
            record.drawables.shift_remove(&id);
        }
    }

    fn acquire_media(&mut self, source: &str) -> MediaHandle {
        let handle = MediaHandle(self.fresh_id());
        self.media.insert(
            handle,
            MediaRecord { source: source.to_owned(), time: 0.0, autoplay: false, bound_to: None },
        );
        self.stats.media_acquired += 1;
        handle
    }

    fn bind_media(&mut self, resource: ResourceId, media: MediaHandle) {
        self.stats.media_bound += 1;
        if let Some(record) = self.media.get_mut(&media) {
            record.bound_to = Some(resource);
        }
    }

    fn seek_media(&mut self, media: MediaHandle, time: f64) {
        self.stats.media_seeks += 1;
        if let Some(record) = self.media.get_mut(&media) {
            record.time = time;
        }
    }

    fn release_media(&mut self, media: MediaHandle) {
        self.stats.media_released += 1;
        self.media.remove(&media);
    }
}
