use std::collections::HashMap;
use glam::{Affine2, Vec2};
use crate::api::error::{HexiError, Result};
use crate::api::types::NodeId;
use crate::components::node::{DisplayNode, NodeKind};

/// The display tree: an id-keyed arena of nodes under a single stage root.
///
/// The stage is created with the scene and can never be re-parented or
/// despawned. It remembers the canvas pixel size so that placement relative
/// to the stage can use the visible surface instead of its content bounds.
pub struct Scene {
    nodes: HashMap<NodeId, DisplayNode>,
    root: NodeId,
    canvas_size: Vec2,
    next_id: u32,
    /// Nodes registered with the pointer's button tracking, in registration order.
    interactive: Vec<NodeId>,
    /// Nodes registered for drag-and-drop, in registration order.
    draggable: Vec<NodeId>,
}

impl Scene {
    pub fn new(canvas_size: Vec2) -> Self {
        let root = NodeId(0);
        let mut stage = DisplayNode::new(root, NodeKind::Container).with_tag("stage");
        stage.is_stage = true;
        stage.augmented = true;

        let mut nodes = HashMap::with_capacity(256);
        nodes.insert(root, stage);

        Self {
            nodes,
            root,
            canvas_size,
            next_id: 1,
            interactive: Vec::new(),
            draggable: Vec::new(),
        }
    }

    /// The stage node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Canvas size in pixels, used when the stage is a placement reference.
    pub fn canvas_size(&self) -> Vec2 {
        self.canvas_size
    }

    pub fn set_canvas_size(&mut self, size: Vec2) {
        self.canvas_size = size;
    }

    /// Generate the next unique node ID.
    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Insert a detached node. It joins the tree (and gets augmented) on `add_child`.
    pub fn spawn(&mut self, node: DisplayNode) -> NodeId {
        let id = node.id;
        self.next_id = self.next_id.max(id.0 + 1);
        self.nodes.insert(id, node);
        id
    }

    /// Create a detached node of the given kind.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = self.next_id();
        self.spawn(DisplayNode::new(id, kind))
    }

    /// Apply the augmentation defaults once. Re-applying is a no-op.
    pub fn augment(&mut self, id: NodeId) -> Result<()> {
        let node = self.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
        if node.augmented {
            return Ok(());
        }
        node.vel = Vec2::ZERO;
        node.layer = 0;
        node.circular = false;
        node.interact = false;
        node.draggable = false;
        node.prev_pivot = Vec2::ZERO;
        node.augmented = true;
        Ok(())
    }

    /// Append `child` to `parent`'s children, detaching it from any previous
    /// parent and augmenting it on the way in.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.contains(parent) {
            return Err(HexiError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(HexiError::UnknownNode(child));
        }
        if child == self.root || self.is_ancestor(child, parent) {
            return Err(HexiError::Cycle { parent, child });
        }

        self.detach(child);
        self.augment(child)?;
        if let Some(node) = self.nodes.get_mut(&child) {
            node.parent = Some(parent);
        }
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.push(child);
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The node stays in the arena.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let is_child = self
            .get(parent)
            .ok_or(HexiError::UnknownNode(parent))?
            .children
            .contains(&child);
        if !is_child {
            return Err(HexiError::NotAChild { parent, child });
        }
        self.detach(child);
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        let Some(old_parent) = self.nodes.get_mut(&child).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(&old_parent) {
            parent.children.retain(|&c| c != child);
        }
    }

    /// Remove a node and all of its descendants. Returns the removed node.
    pub fn despawn(&mut self, id: NodeId) -> Option<DisplayNode> {
        if id == self.root {
            return None;
        }
        self.detach(id);

        let mut doomed = vec![id];
        let mut i = 0;
        while i < doomed.len() {
            if let Some(node) = self.nodes.get(&doomed[i]) {
                doomed.extend(node.children.iter().copied());
            }
            i += 1;
        }

        self.interactive.retain(|n| !doomed.contains(n));
        self.draggable.retain(|n| !doomed.contains(n));

        let removed = self.nodes.remove(&id);
        for other in &doomed[1..] {
            self.nodes.remove(other);
        }
        removed
    }

    /// Whether `ancestor` is `id` or lies on `id`'s parent chain.
    pub fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if node_id == ancestor {
                return true;
            }
            current = self.get(node_id).and_then(|n| n.parent);
        }
        false
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Get a reference to a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&DisplayNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node by ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut DisplayNode> {
        self.nodes.get_mut(&id)
    }

    /// Iterate over all nodes, attached or not, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &DisplayNode> {
        self.nodes.values()
    }

    /// Iterate over all nodes mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut DisplayNode> {
        self.nodes.values_mut()
    }

    /// Find the first node with the given tag.
    pub fn find_by_tag(&self, tag: &str) -> Option<&DisplayNode> {
        self.nodes.values().find(|n| n.tag == tag)
    }

    /// Find all nodes with the given tag.
    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&DisplayNode> {
        self.nodes.values().filter(|n| n.tag == tag).collect()
    }

    /// Number of nodes, including the stage.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the stage is the only node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    // -- Geometry --

    /// Local-to-world transform of a node.
    pub fn world_transform(&self, id: NodeId) -> Affine2 {
        let Some(node) = self.get(id) else {
            return Affine2::IDENTITY;
        };
        let local = Affine2::from_scale_angle_translation(node.scale, node.rotation, node.pos);
        match node.parent {
            Some(parent) => self.world_transform(parent) * local,
            None => local,
        }
    }

    /// Position of a node's origin in stage space.
    pub fn global_position(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::ZERO;
        };
        match node.parent {
            Some(parent) => self.world_transform(parent).transform_point2(node.pos),
            None => node.pos,
        }
    }

    /// Rendered size: base size times scale, or content size for groups.
    pub fn size(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::ZERO;
        };
        self.unscaled_size(id) * node.scale.abs()
    }

    pub(crate) fn unscaled_size(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::ZERO;
        };
        if node.kind.is_container() {
            self.content_bounds(id).map_or(Vec2::ZERO, |(min, max)| max - min)
        } else {
            node.base_size
        }
    }

    /// How far the anchor shifts the visual top-left away from `pos`.
    pub fn anchor_offset(&self, id: NodeId) -> Vec2 {
        let Some(node) = self.get(id) else {
            return Vec2::ZERO;
        };
        node.anchor.map_or(Vec2::ZERO, |anchor| self.size(id) * anchor)
    }

    /// Bounding box of a group's children in its own unscaled space.
    pub fn content_bounds(&self, id: NodeId) -> Option<(Vec2, Vec2)> {
        let node = self.get(id)?;
        node.children
            .iter()
            .map(|&child| {
                let pos = self.get(child).map_or(Vec2::ZERO, |c| c.pos);
                let min = pos - self.anchor_offset(child);
                (min, min + self.size(child))
            })
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }

    // -- Ordering --

    /// Stable ascending sort of a parent's children by layer.
    pub(crate) fn sort_children_by_layer(&mut self, parent: NodeId) {
        let Some(mut children) = self.nodes.get_mut(&parent).map(|n| std::mem::take(&mut n.children))
        else {
            return;
        };
        children.sort_by_key(|c| self.nodes.get(c).map_or(0, |n| n.layer));
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children = children;
        }
    }

    /// Move a node to the end of its parent's children so it draws on top.
    pub fn raise_to_top(&mut self, id: NodeId) {
        let Some(parent) = self.get(id).and_then(|n| n.parent) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children.retain(|&c| c != id);
            node.children.push(id);
        }
    }

    // -- Capability registration --

    pub fn interactive_targets(&self) -> &[NodeId] {
        &self.interactive
    }

    pub fn draggable_targets(&self) -> &[NodeId] {
        &self.draggable
    }

    pub(crate) fn register_interactive(&mut self, id: NodeId, on: bool) {
        Self::register(&mut self.interactive, id, on);
    }

    pub(crate) fn register_draggable(&mut self, id: NodeId, on: bool) {
        Self::register(&mut self.draggable, id, on);
    }

    fn register(list: &mut Vec<NodeId>, id: NodeId, on: bool) {
        if on {
            if !list.contains(&id) {
                list.push(id);
            }
        } else {
            list.retain(|&n| n != id);
        }
    }

    /// Snapshot every node's animatable values for render interpolation.
    pub fn capture_previous(&mut self) {
        for node in self.nodes.values_mut() {
            node.capture();
        }
    }
}
