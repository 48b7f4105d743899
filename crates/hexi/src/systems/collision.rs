//! Collision helpers: pure tests over anchor-compensated global boxes.
//!
//! Rectangles are the node's visible box; circles are inscribed in it and
//! only used for nodes marked circular.

use glam::Vec2;
use crate::api::error::{HexiError, Result};
use crate::api::types::NodeId;
use crate::core::augment::Bounds;
use crate::core::scene::Scene;

/// Which edges of a containing rectangle a node touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edges {
    pub left: bool,
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
}

impl Edges {
    pub fn any(&self) -> bool {
        self.left || self.top || self.right || self.bottom
    }
}

/// Visible box of a node in stage coordinates: `(top_left, size)`.
pub fn global_box(scene: &Scene, id: NodeId) -> Result<(Vec2, Vec2)> {
    if !scene.contains(id) {
        return Err(HexiError::UnknownNode(id));
    }
    let top_left = scene.global_position(id) - scene.anchor_offset(id);
    Ok((top_left, scene.size(id)))
}

fn circle(scene: &Scene, id: NodeId) -> Result<(Vec2, f32)> {
    let (top_left, size) = global_box(scene, id)?;
    Ok((top_left + size / 2.0, size.x / 2.0))
}

fn is_circular(scene: &Scene, id: NodeId) -> bool {
    scene.node(id).is_some_and(|n| n.circular())
}

/// Whether a stage-space point lies inside the node's circle or box.
pub fn hit_test_point(scene: &Scene, point: Vec2, id: NodeId) -> Result<bool> {
    if is_circular(scene, id) {
        let (center, radius) = circle(scene, id)?;
        return Ok(point.distance(center) < radius);
    }
    let (top_left, size) = global_box(scene, id)?;
    let bottom_right = top_left + size;
    Ok(point.x > top_left.x && point.x < bottom_right.x && point.y > top_left.y && point.y < bottom_right.y)
}

/// Whether two node boxes overlap.
pub fn hit_test_rectangle(scene: &Scene, a: NodeId, b: NodeId) -> Result<bool> {
    let (a_pos, a_size) = global_box(scene, a)?;
    let (b_pos, b_size) = global_box(scene, b)?;
    let delta = (a_pos + a_size / 2.0) - (b_pos + b_size / 2.0);
    let combined = (a_size + b_size) / 2.0;
    Ok(delta.x.abs() < combined.x && delta.y.abs() < combined.y)
}

/// Whether two nodes' inscribed circles overlap.
pub fn hit_test_circle(scene: &Scene, a: NodeId, b: NodeId) -> Result<bool> {
    let (a_center, a_radius) = circle(scene, a)?;
    let (b_center, b_radius) = circle(scene, b)?;
    Ok(a_center.distance(b_center) < a_radius + b_radius)
}

/// Keep a node's box inside `area` (in the node's parent space).
/// With `bounce`, the velocity component into the hit edge is reversed.
pub fn contain(scene: &mut Scene, id: NodeId, area: Bounds, bounce: bool) -> Result<Edges> {
    let size = scene.size(id);
    let offset = scene.anchor_offset(id);
    let node = scene.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
    let mut edges = Edges::default();

    let left = node.pos.x - offset.x;
    let top = node.pos.y - offset.y;
    if left < area.x {
        node.pos.x = area.x + offset.x;
        edges.left = true;
    } else if left + size.x > area.x + area.width {
        node.pos.x = area.x + area.width - size.x + offset.x;
        edges.right = true;
    }
    if top < area.y {
        node.pos.y = area.y + offset.y;
        edges.top = true;
    } else if top + size.y > area.y + area.height {
        node.pos.y = area.y + area.height - size.y + offset.y;
        edges.bottom = true;
    }

    if bounce {
        if edges.left || edges.right {
            node.vel.x = -node.vel.x;
        }
        if edges.top || edges.bottom {
            node.vel.y = -node.vel.y;
        }
    }
    Ok(edges)
}

/// Apply each node's velocity to its position once.
pub fn move_nodes(scene: &mut Scene, ids: &[NodeId]) {
    for &id in ids {
        if let Some(node) = scene.get_mut(id) {
            node.pos += node.vel;
        }
    }
}
