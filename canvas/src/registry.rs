//! Node registry: the shared document with fork / reset-with-fork / commit.
//!
//! DESIGN
//! ======
//! Live state is two persistent hash maps (`im::HashMap`), one per node kind.
//! Cloning a map is O(1) and shares structure, so `fork` and `reset_with_fork`
//! are cheap enough to run on every pointer-move event. A gesture calls
//! `fork()` once, then `reset_with_fork()` followed by a speculative mutation
//! per move, and finally `commit()` to accept what is in flight.
//!
//! Every mutation replaces a whole node value; readers never observe a
//! half-applied patch.
//!
//! CACHE KEYS
//! ==========
//! Each mutation stamps the node with a fresh value from a document-wide
//! counter and walks the `parent` chain stamping every ancestor, so
//! ancestor-keyed caches see descendant edits. Cycles in the chain are cut.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::HashSet;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::camera::Rect;
use crate::doc::{Node, NodeId, NodeKind, NodePatch, Snapshot, TextboxNode, VideoEditorNode};

/// One complete version of the document.
#[derive(Debug, Clone, Default, PartialEq)]
struct Tree {
    textboxes: im::HashMap<NodeId, TextboxNode>,
    video_editors: im::HashMap<NodeId, VideoEditorNode>,
}

impl Tree {
    fn get(&self, id: &NodeId) -> Option<Node> {
        if let Some(n) = self.textboxes.get(id) {
            return Some(Node::Textbox(n.clone()));
        }
        self.video_editors.get(id).map(|n| Node::VideoEditor(n.clone()))
    }

    fn insert(&mut self, node: Node) {
        match node {
            Node::Textbox(n) => {
                self.video_editors.remove(&n.id);
                self.textboxes.insert(n.id, n);
            }
            Node::VideoEditor(n) => {
                self.textboxes.remove(&n.id);
                self.video_editors.insert(n.id, n);
            }
        }
    }

    fn remove(&mut self, id: &NodeId) -> Option<Node> {
        if let Some(n) = self.textboxes.remove(id) {
            return Some(Node::Textbox(n));
        }
        self.video_editors.remove(id).map(Node::VideoEditor)
    }

    fn nodes_of_kind(&self, kind: NodeKind) -> Vec<Node> {
        let mut nodes: Vec<Node> = match kind {
            NodeKind::Textbox => self.textboxes.values().cloned().map(Node::Textbox).collect(),
            NodeKind::VideoEditor => self.video_editors.values().cloned().map(Node::VideoEditor).collect(),
        };
        nodes.sort_by_key(Node::id);
        nodes
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tree = Self::default();
        for (id, mut node) in snapshot.textboxes {
            node.id = id;
            tree.textboxes.insert(id, node);
        }
        for (id, mut node) in snapshot.video_editors {
            if tree.textboxes.contains_key(&id) {
                debug!(%id, "snapshot editor skipped: id already used by a text box");
                continue;
            }
            node.id = id;
            tree.video_editors.insert(id, node);
        }
        tree
    }

    fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            textboxes: self.textboxes.iter().map(|(k, v)| (*k, v.clone())).collect(),
            video_editors: self.video_editors.iter().map(|(k, v)| (*k, v.clone())).collect(),
        }
    }
}

/// The authored document, split by node kind but unified at the query API.
#[derive(Debug, Default)]
pub struct Document {
    board_id: Option<Uuid>,
    live: Tree,
    origin: Option<Tree>,
    /// Source of cache-key stamps.
    stamp: u64,
    /// Bumped whenever live state changes; lets observers detect edits cheaply.
    revision: u64,
}

impl Document {
    /// Create an empty document with no fork.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // --- Mutation ---

    /// Insert or overwrite a node by id.
    pub fn add_node(&mut self, node: Node) {
        let id = node.id();
        trace!(%id, kind = ?node.kind(), "node added");
        self.live.insert(node);
        self.touch(id);
    }

    /// Shallow-merge `patch` into an existing node. No-op for unknown ids.
    pub fn patch_node(&mut self, id: &NodeId, patch: &NodePatch) {
        let Some(node) = self.live.get(id) else {
            debug!(%id, "patch ignored: node not found");
            return;
        };
        self.live.insert(patch.merged_into(&node));
        self.touch(*id);
    }

    /// Replace only the position of a node.
    pub fn patch_position(&mut self, id: &NodeId, rect: Rect) {
        self.patch_node(id, &NodePatch::position(rect));
    }

    /// Remove a node from whichever kind holds it, returning it if present.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let removed = self.live.remove(id)?;
        debug!(%id, "node removed");
        self.revision += 1;
        if let Some(parent) = removed.parent() {
            self.touch(parent);
        }
        Some(removed)
    }

    /// Stamp `id` and each ancestor with a new cache key.
    fn touch(&mut self, id: NodeId) {
        self.revision += 1;
        let mut seen = HashSet::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if !seen.insert(current) {
                debug!(%current, "parent cycle detected; stopping cache-key propagation");
                break;
            }
            let Some(mut node) = self.live.get(&current) else {
                break;
            };
            self.stamp += 1;
            node.set_cache_key(self.stamp);
            cursor = node.parent();
            self.live.insert(node);
        }
    }

    // --- Speculative edits ---

    /// Capture the live state as the origin for later resets.
    pub fn fork(&mut self) {
        debug!(revision = self.revision, "document forked");
        self.origin = Some(self.live.clone());
    }

    /// Restore live state from the origin, keeping the origin for further resets.
    /// No-op when the document has never been forked.
    pub fn reset_with_fork(&mut self) {
        if let Some(origin) = &self.origin {
            trace!("document reset to fork");
            self.live = origin.clone();
            self.revision += 1;
        }
    }

    /// Accept the live state, including speculative edits, as the new origin.
    pub fn commit(&mut self) {
        debug!(revision = self.revision, "document committed");
        self.origin = Some(self.live.clone());
    }

    /// Whether a fork is currently held.
    #[must_use]
    pub fn has_origin(&self) -> bool {
        self.origin.is_some()
    }

    // --- Queries ---

    /// Live lookup across both kinds.
    #[must_use]
    pub fn get_node(&self, id: &NodeId) -> Option<Node> {
        self.live.get(id)
    }

    /// Lookup in the last fork; `None` when not forked or the node did not exist then.
    #[must_use]
    pub fn get_origin_node(&self, id: &NodeId) -> Option<Node> {
        self.origin.as_ref().and_then(|o| o.get(id))
    }

    #[must_use]
    pub fn textbox(&self, id: &NodeId) -> Option<&TextboxNode> {
        self.live.textboxes.get(id)
    }

    #[must_use]
    pub fn video_editor(&self, id: &NodeId) -> Option<&VideoEditorNode> {
        self.live.video_editors.get(id)
    }

    /// Video editor as it was at the last fork.
    #[must_use]
    pub fn origin_video_editor(&self, id: &NodeId) -> Option<&VideoEditorNode> {
        self.origin.as_ref().and_then(|o| o.video_editors.get(id))
    }

    /// Nodes of one kind, sorted by id. The result is a snapshot: later
    /// mutations do not affect it.
    #[must_use]
    pub fn all_nodes_of_kind(&self, kind: NodeKind) -> Vec<Node> {
        self.live.nodes_of_kind(kind)
    }

    /// All nodes: text boxes first, then video editors.
    #[must_use]
    pub fn root_nodes(&self) -> Vec<Node> {
        let mut nodes = self.live.nodes_of_kind(NodeKind::Textbox);
        nodes.extend(self.live.nodes_of_kind(NodeKind::VideoEditor));
        nodes
    }

    /// Ids of every video editor, sorted.
    #[must_use]
    pub fn video_editor_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.live.video_editors.keys().copied().collect();
        ids.sort();
        ids
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.live.textboxes.len() + self.live.video_editors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Monotonic counter of live-state changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // --- Persistence boundary ---

    /// Replace the document with a persisted snapshot. Drops any fork.
    pub fn load_state(&mut self, board_id: Uuid, snapshot: Snapshot) {
        debug!(%board_id, nodes = snapshot.len(), "document loaded");
        self.board_id = Some(board_id);
        self.live = Tree::from_snapshot(snapshot);
        self.origin = None;
        self.revision += 1;
    }

    /// Export the live state.
    #[must_use]
    pub fn fetch_state(&self) -> Snapshot {
        self.live.to_snapshot()
    }

    /// Board id recorded by the last [`load_state`](Self::load_state).
    #[must_use]
    pub fn board_id(&self) -> Option<Uuid> {
        self.board_id
    }
}
