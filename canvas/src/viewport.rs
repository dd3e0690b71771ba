//! Viewport controller: camera state, container size, pointer tracking.
//!
//! Owns the mutable half of the projection. Every interaction that changes
//! what is visible sets `should_render`; the frame driver consumes it with
//! [`Viewport::take_render`] so idle frames skip reconciliation.
//!
//! GEOMETRY GUARD
//! ==============
//! Until `initialize` sees a positive container size the viewport is inert:
//! pan, zoom, pointer and centering calls are no-ops and `screen()` is the
//! empty rectangle.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use tracing::{debug, trace};

use crate::camera::{Camera, Point, Rect, Scale, ScreenRect, camera_to_screen, scale_with_anchor, screen_to_camera};
use crate::consts::{CAMERA_ANGLE, CENTER_PADDING, MIN_CAMERA_Z, PAN_SPEED, RECT_H, RECT_W, ZOOM_SPEED};
use crate::doc::NodeId;
use crate::registry::Document;

/// Tunables for the camera controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportConfig {
    /// Half-angle of the projection frustum, radians.
    pub angle: f64,
    /// Plane point centered by `initialize`.
    pub home: Point,
    pub pan_speed: f64,
    pub zoom_speed: f64,
    /// Padding around a centered group of nodes.
    pub center_padding: f64,
    pub min_z: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            angle: CAMERA_ANGLE,
            home: Point::new(1.5 * RECT_W, 1.5 * RECT_H),
            pan_speed: PAN_SPEED,
            zoom_speed: ZOOM_SPEED,
            center_padding: CENTER_PADDING,
            min_z: MIN_CAMERA_Z,
        }
    }
}

/// Camera + container + pointer, with a render dirty flag.
#[derive(Debug, Clone)]
pub struct Viewport {
    config: ViewportConfig,
    container_width: f64,
    container_height: f64,
    pixel_ratio: f64,
    /// Pointer position in plane space.
    pointer: Point,
    camera: Camera,
    should_render: bool,
}

impl Viewport {
    #[must_use]
    pub fn new(config: ViewportConfig) -> Self {
        Self {
            config,
            container_width: 0.0,
            container_height: 0.0,
            pixel_ratio: 1.0,
            pointer: Point::default(),
            camera: Camera::default(),
            should_render: true,
        }
    }

    /// Whether a positive container size has been observed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.container_width > 0.0 && self.container_height > 0.0 && self.camera.is_valid()
    }

    // --- Transitions ---

    /// Reset the camera onto the home point at 1:1 container-to-plane scale.
    /// Non-positive sizes are ignored.
    pub fn initialize(&mut self, width: f64, height: f64) {
        if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
            debug!(width, height, "viewport initialize ignored: degenerate container");
            return;
        }
        self.container_width = width;
        self.container_height = height;
        self.pointer = self.config.home;
        self.camera = Camera::new(self.config.home.x, self.config.home.y, width / (2.0 * self.config.angle.tan()));
        self.should_render = true;
        debug!(width, height, z = self.camera.z, "viewport initialized");
    }

    /// Device pixel ratio reported by the host. Non-positive values are ignored.
    pub fn set_pixel_ratio(&mut self, ratio: f64) {
        if ratio > 0.0 && ratio.is_finite() {
            self.pixel_ratio = ratio;
        }
    }

    /// Pan by a pixel delta scaled by the pan speed. The tracked pointer moves
    /// with the camera so it stays under the same pixel.
    pub fn move_camera(&mut self, dx: f64, dy: f64) {
        if !self.is_ready() {
            return;
        }
        let delta_x = dx * self.config.pan_speed;
        let delta_y = dy * self.config.pan_speed;
        self.camera.x += delta_x;
        self.camera.y += delta_y;
        self.pointer.x += delta_x;
        self.pointer.y += delta_y;
        self.should_render = true;
        trace!(x = self.camera.x, y = self.camera.y, "camera panned");
    }

    /// Zoom by the wheel's vertical delta, keeping the plane point under the
    /// pointer fixed on screen. `dx` is accepted for symmetry and ignored.
    pub fn zoom_camera(&mut self, _dx: f64, dy: f64) {
        if !self.is_ready() {
            return;
        }
        let old = self.camera;
        let new_z = (old.z + self.config.zoom_speed * dy).max(self.config.min_z);
        let old_scale = self.scale();
        let probe = camera_to_screen(old.x, old.y, new_z, self.config.angle, self.aspect());
        let new_scale = Scale::fit(self.container_width, self.container_height, &probe);
        let center = scale_with_anchor(
            self.pointer.x,
            self.pointer.y,
            old.x,
            old.y,
            old_scale.x,
            old_scale.y,
            new_scale.x,
            new_scale.y,
        );
        self.camera = Camera::new(center.x, center.y, new_z);
        self.should_render = true;
        trace!(z = new_z, "camera zoomed");
    }

    /// Track the pointer from a container-relative pixel position.
    pub fn move_pointer(&mut self, pixel_x: f64, pixel_y: f64) {
        if !self.is_ready() {
            return;
        }
        self.pointer = self.pixel_to_plane(Point::new(pixel_x, pixel_y));
    }

    /// Center one node on screen at the current zoom. Unknown ids are ignored.
    pub fn center_on_node(&mut self, doc: &Document, id: &NodeId) {
        if !self.is_ready() {
            return;
        }
        let Some(node) = doc.get_node(id) else {
            debug!(%id, "center ignored: node not found");
            return;
        };
        let position = node.position();
        let screen = self.screen();
        let target = Rect::new(
            position.left - (screen.width - position.width) / 2.0,
            position.top - (screen.height - position.height) / 2.0,
            screen.width,
            screen.height,
        );
        self.camera = screen_to_camera(&target, self.config.angle);
        self.should_render = true;
    }

    /// Fit the bounding box of several nodes plus padding, growing the shorter
    /// side to keep the container aspect. Unknown ids are skipped; an empty or
    /// fully unknown list is a no-op.
    pub fn center_on_nodes(&mut self, doc: &Document, ids: &[NodeId]) {
        if !self.is_ready() {
            return;
        }
        let Some(bounds) = ids
            .iter()
            .filter_map(|id| doc.get_node(id))
            .map(|node| node.position())
            .reduce(|acc, rect| acc.union(&rect))
        else {
            return;
        };
        let padding = self.config.center_padding;
        let aspect = self.aspect();
        let target = if bounds.width > bounds.height {
            let width = bounds.width + 2.0 * padding;
            let height = width / aspect;
            Rect::new(bounds.left - padding, bounds.top - (height - bounds.height) / 2.0, width, height)
        } else {
            let height = bounds.height + 2.0 * padding;
            let width = aspect * height;
            Rect::new(bounds.left - (width - bounds.width) / 2.0, bounds.top - padding, width, height)
        };
        self.camera = screen_to_camera(&target, self.config.angle);
        self.should_render = true;
        debug!(nodes = ids.len(), z = self.camera.z, "viewport centered on nodes");
    }

    // --- Render flag ---

    /// Force the next frame to render.
    pub fn request_render(&mut self) {
        self.should_render = true;
    }

    #[must_use]
    pub fn should_render(&self) -> bool {
        self.should_render
    }

    /// Read and clear the render flag.
    pub fn take_render(&mut self) -> bool {
        std::mem::take(&mut self.should_render)
    }

    // --- Derived state ---

    #[must_use]
    pub fn camera(&self) -> Camera {
        self.camera
    }

    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Pointer position in plane space.
    #[must_use]
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    #[must_use]
    pub fn container(&self) -> (f64, f64) {
        (self.container_width, self.container_height)
    }

    #[must_use]
    pub fn pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn aspect(&self) -> f64 {
        self.container_width / self.container_height
    }

    /// Plane rectangle currently visible; empty before initialization.
    #[must_use]
    pub fn screen(&self) -> ScreenRect {
        if !self.is_ready() {
            return Rect::default();
        }
        self.camera.screen(self.config.angle, self.aspect())
    }

    /// Pixels per plane unit; identity before initialization.
    #[must_use]
    pub fn scale(&self) -> Scale {
        if !self.is_ready() {
            return Scale::default();
        }
        Scale::fit(self.container_width, self.container_height, &self.screen())
    }

    /// Convert a container pixel position to plane space.
    #[must_use]
    pub fn pixel_to_plane(&self, pixel: Point) -> Point {
        let screen = self.screen();
        let offset = self.scale().to_plane(pixel);
        Point::new(screen.left + offset.x, screen.top + offset.y)
    }

    /// Whether a plane rectangle overlaps the visible area.
    #[must_use]
    pub fn is_visible(&self, rect: &Rect) -> bool {
        self.is_ready() && rect.intersects(&self.screen())
    }

    /// On-screen pixel placement of a plane rectangle, or `None` when it is
    /// outside the visible area.
    #[must_use]
    pub fn place(&self, rect: &Rect) -> Option<Rect> {
        if !self.is_visible(rect) {
            return None;
        }
        let screen = self.screen();
        let scale = self.scale();
        Some(Rect::new(
            (rect.left - screen.left) * scale.x,
            (rect.top - screen.top) * scale.y,
            rect.width * scale.x,
            rect.height * scale.y,
        ))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}
