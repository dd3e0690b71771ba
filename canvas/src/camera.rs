//! Projection math: camera state, screen rectangles, and anchor-preserving zoom.
//!
//! The camera looks down at the authoring plane from height `z` through a
//! frustum with a fixed half-angle. The visible plane rectangle (the "screen")
//! is therefore a one-parameter family: `z` controls the extent and `(x, y)`
//! its center. Everything here is pure and stateless; the stateful controller
//! lives in [`crate::viewport`].

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A point in either pixel or plane space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in plane space.
///
/// Used both for node positions and for the visible screen rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// The plane-space rectangle currently visible through the viewport.
pub type ScreenRect = Rect;

impl Rect {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Strict containment: points on the border are outside.
    #[must_use]
    pub fn contains(&self, pt: Point) -> bool {
        pt.x > self.left && pt.x < self.right() && pt.y > self.top && pt.y < self.bottom()
    }

    /// Open-interval overlap test; touching edges do not intersect.
    #[must_use]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right()
            && self.right() > other.left
            && self.top < other.bottom()
            && self.bottom() > other.top
    }

    /// Smallest rectangle containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect { left, top, width: right - left, height: bottom - top }
    }
}

/// Camera state. `(x, y)` is the plane point at the viewport center and `z` is
/// the camera height; larger `z` shows more of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Camera {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Camera {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// A camera is usable for projection only when its height is positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.z > 0.0 && self.z.is_finite() && self.x.is_finite() && self.y.is_finite()
    }

    /// Visible plane rectangle for this camera.
    #[must_use]
    pub fn screen(&self, angle: f64, aspect: f64) -> ScreenRect {
        camera_to_screen(self.x, self.y, self.z, angle, aspect)
    }
}

/// Pixels per plane unit along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self { x: 1.0, y: 1.0 }
    }
}

impl Scale {
    /// Scale that maps `screen` onto a container of `width` × `height` pixels.
    #[must_use]
    pub fn fit(width: f64, height: f64, screen: &ScreenRect) -> Self {
        Self { x: width / screen.width, y: height / screen.height }
    }

    /// Convert a pixel-space distance to plane space.
    #[must_use]
    pub fn to_plane(&self, pixels: Point) -> Point {
        Point { x: pixels.x / self.x, y: pixels.y / self.y }
    }

    /// Convert a plane-space distance to pixel space.
    #[must_use]
    pub fn to_pixels(&self, plane: Point) -> Point {
        Point { x: plane.x * self.x, y: plane.y * self.y }
    }
}

/// Project a camera onto the plane.
///
/// `width = 2·z·tan(angle)`, `height = width / aspect`, centered on `(x, y)`.
#[must_use]
pub fn camera_to_screen(x: f64, y: f64, z: f64, angle: f64, aspect: f64) -> ScreenRect {
    let width = 2.0 * z * angle.tan();
    let height = width / aspect;
    Rect { left: x - width / 2.0, top: y - height / 2.0, width, height }
}

/// Inverse of [`camera_to_screen`] for the same `angle`.
#[must_use]
pub fn screen_to_camera(rect: &ScreenRect, angle: f64) -> Camera {
    Camera {
        x: rect.left + rect.width / 2.0,
        y: rect.top + rect.height / 2.0,
        z: rect.width / (2.0 * angle.tan()),
    }
}

/// New camera center after a rescale such that `anchor` keeps its on-screen
/// pixel position.
///
/// Holds `(anchor - new_left) * new_scale == (anchor - old_left) * old_scale`
/// on both axes. The container size cancels out of the solution, so only the
/// two scales are needed.
#[must_use]
#[allow(clippy::too_many_arguments)]
pub fn scale_with_anchor(
    anchor_x: f64,
    anchor_y: f64,
    old_x: f64,
    old_y: f64,
    old_scale_x: f64,
    old_scale_y: f64,
    new_scale_x: f64,
    new_scale_y: f64,
) -> Point {
    Point {
        x: anchor_x - (anchor_x - old_x) * old_scale_x / new_scale_x,
        y: anchor_y - (anchor_y - old_y) * old_scale_y / new_scale_y,
    }
}
