//! Plane-space hit tests used by drag-and-drop.
//!
//! Pointer tests use strict containment, so a point on a node's border is
//! outside it. Rectangle tests use open-interval overlap, so rectangles that
//! only touch do not overlap.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::camera::{Point, Rect};
use crate::doc::Node;
use crate::editor::DropTarget;
use crate::registry::Document;

/// First node, in root order, whose rectangle strictly contains `point`.
#[must_use]
pub fn node_at(doc: &Document, point: Point) -> Option<Node> {
    doc.root_nodes().into_iter().find(|n| n.position().contains(point))
}

/// Whether any node overlaps `rect`.
#[must_use]
pub fn overlaps_any(doc: &Document, rect: &Rect) -> bool {
    doc.root_nodes().iter().any(|n| n.position().intersects(rect))
}

/// Drop target under `point`, if any.
#[must_use]
pub fn drop_target_at(targets: &[DropTarget], point: Point) -> Option<&DropTarget> {
    targets.iter().find(|t| t.rect.contains(point))
}
