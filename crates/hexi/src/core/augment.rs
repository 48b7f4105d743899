//! The property contract every display node gains when it joins the tree.
//!
//! `NodeRef` and `NodeMut` are borrowed views over one node of a `Scene`.
//! They expose the derived properties (global position, centre, half
//! sizes, anchor offsets, bounds) and the setters with side effects
//! (pivot, layer, interact, draggable, circular) as plain methods.

use glam::Vec2;
use crate::api::error::{HexiError, Result};
use crate::api::types::NodeId;
use crate::components::node::{DisplayNode, NodeKind};
use crate::components::texture::ScaleMode;
use crate::core::scene::Scene;

/// A rectangle record as returned by `local_bounds`/`global_bounds`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Where `put` places the other node relative to this one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Left,
    Right,
    Top,
    Bottom,
    Center,
}

/// Amount the anchor moves an edge away from the raw position.
pub fn edge_compensation(extent: f32, anchor: f32) -> f32 {
    extent * anchor
}

/// Amount the anchor moves the centre away from `pos + half`.
pub fn center_compensation(half: f32, anchor: f32) -> f32 {
    half * (1.0 - 2.0 * anchor)
}

/// Geometry of the reference object in a placement.
#[derive(Debug, Clone, Copy)]
struct Reference {
    origin: Vec2,
    size: Vec2,
    anchor: Vec2,
}

impl Scene {
    /// Read-only view of a node.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        let node = self.get(id)?;
        Some(NodeRef { scene: self, node })
    }

    /// Mutable view of a node.
    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        if self.contains(id) {
            Some(NodeMut { scene: self, id })
        } else {
            None
        }
    }

    /// Reference geometry for placements. The stage stands in as a
    /// canvas-sized rectangle at the origin.
    fn reference(&self, id: NodeId) -> Reference {
        match self.get(id) {
            Some(node) if node.is_stage() => Reference {
                origin: Vec2::ZERO,
                size: self.canvas_size(),
                anchor: Vec2::ZERO,
            },
            Some(node) => Reference {
                origin: self.global_position(id),
                size: self.size(id),
                anchor: node.anchor.unwrap_or(Vec2::ZERO),
            },
            None => Reference {
                origin: Vec2::ZERO,
                size: Vec2::ZERO,
                anchor: Vec2::ZERO,
            },
        }
    }
}

/// Borrowed read-only view of one node.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    scene: &'a Scene,
    node: &'a DisplayNode,
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    /// The underlying node.
    pub fn raw(&self) -> &'a DisplayNode {
        self.node
    }

    pub fn x(&self) -> f32 {
        self.raw().pos.x
    }

    pub fn y(&self) -> f32 {
        self.raw().pos.y
    }

    pub fn vx(&self) -> f32 {
        self.raw().vel.x
    }

    pub fn vy(&self) -> f32 {
        self.raw().vel.y
    }

    pub fn width(&self) -> f32 {
        self.scene.size(self.node.id).x
    }

    pub fn height(&self) -> f32 {
        self.scene.size(self.node.id).y
    }

    pub fn half_width(&self) -> f32 {
        self.width() / 2.0
    }

    pub fn half_height(&self) -> f32 {
        self.height() / 2.0
    }

    /// Global x of the origin.
    pub fn gx(&self) -> f32 {
        self.scene.global_position(self.node.id).x
    }

    /// Global y of the origin.
    pub fn gy(&self) -> f32 {
        self.scene.global_position(self.node.id).y
    }

    pub fn x_anchor_offset(&self) -> f32 {
        self.scene.anchor_offset(self.node.id).x
    }

    pub fn y_anchor_offset(&self) -> f32 {
        self.scene.anchor_offset(self.node.id).y
    }

    pub fn center_x(&self) -> f32 {
        self.x() + self.half_width() - self.x_anchor_offset()
    }

    pub fn center_y(&self) -> f32 {
        self.y() + self.half_height() - self.y_anchor_offset()
    }

    pub fn scale_x(&self) -> f32 {
        self.raw().scale.x
    }

    pub fn scale_y(&self) -> f32 {
        self.raw().scale.y
    }

    /// Anchor fraction on x; `None` for nodes without an anchor.
    pub fn pivot_x(&self) -> Option<f32> {
        self.raw().anchor.map(|a| a.x)
    }

    /// Anchor fraction on y; `None` for nodes without an anchor.
    pub fn pivot_y(&self) -> Option<f32> {
        self.raw().anchor.map(|a| a.y)
    }

    pub fn layer(&self) -> i32 {
        self.raw().layer
    }

    pub fn interact(&self) -> bool {
        self.raw().interact
    }

    pub fn draggable(&self) -> bool {
        self.raw().draggable
    }

    pub fn circular(&self) -> bool {
        self.raw().circular
    }

    /// Width, while the node is circular.
    pub fn diameter(&self) -> Option<f32> {
        self.circular().then(|| self.width())
    }

    /// Half width, while the node is circular.
    pub fn radius(&self) -> Option<f32> {
        self.circular().then(|| self.half_width())
    }

    /// `(0, 0, width, height)`.
    pub fn local_bounds(&self) -> Bounds {
        Bounds {
            x: 0.0,
            y: 0.0,
            width: self.width(),
            height: self.height(),
        }
    }

    /// `(gx, gy, gx + width, gy + height)`: `width`/`height` hold the far
    /// edge coordinates, not extents.
    pub fn global_bounds(&self) -> Bounds {
        let (gx, gy) = (self.gx(), self.gy());
        Bounds {
            x: gx,
            y: gy,
            width: gx + self.width(),
            height: gy + self.height(),
        }
    }

    /// Whether the node has no children.
    pub fn is_empty(&self) -> bool {
        self.raw().children.is_empty()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.raw().parent
    }

    pub fn children(&self) -> &'a [NodeId] {
        &self.raw().children
    }
}

/// Borrowed mutable view of one node.
pub struct NodeMut<'a> {
    scene: &'a mut Scene,
    id: NodeId,
}

impl<'a> NodeMut<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Read-only view for getters.
    pub fn view(&self) -> Option<NodeRef<'_>> {
        self.scene.node(self.id)
    }

    fn edit(&mut self, f: impl FnOnce(&mut DisplayNode)) -> &mut Self {
        if let Some(node) = self.scene.get_mut(self.id) {
            f(node);
        }
        self
    }

    fn try_edit<T>(&mut self, f: impl FnOnce(NodeId, &mut DisplayNode) -> Result<T>) -> Result<T> {
        let id = self.id;
        let node = self.scene.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
        f(id, node)
    }

    pub fn set_x(&mut self, x: f32) -> &mut Self {
        self.edit(|n| n.pos.x = x)
    }

    pub fn set_y(&mut self, y: f32) -> &mut Self {
        self.edit(|n| n.pos.y = y)
    }

    pub fn set_position(&mut self, x: f32, y: f32) -> &mut Self {
        self.edit(|n| n.pos = Vec2::new(x, y))
    }

    pub fn set_velocity(&mut self, vx: f32, vy: f32) -> &mut Self {
        self.edit(|n| n.vel = Vec2::new(vx, vy))
    }

    pub fn set_rotation(&mut self, rotation: f32) -> &mut Self {
        self.edit(|n| n.rotation = rotation)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.edit(|n| n.visible = visible)
    }

    pub fn set_alpha(&mut self, alpha: f32) -> &mut Self {
        self.edit(|n| n.alpha = alpha)
    }

    pub fn set_scale_x(&mut self, scale: f32) -> &mut Self {
        self.edit(|n| n.scale.x = scale)
    }

    pub fn set_scale_y(&mut self, scale: f32) -> &mut Self {
        self.edit(|n| n.scale.y = scale)
    }

    pub fn set_scale(&mut self, x_scale: f32, y_scale: f32) -> &mut Self {
        self.edit(|n| n.scale = Vec2::new(x_scale, y_scale))
    }

    /// Resize by rewriting the x scale. Zero-size content resets it to 1.
    pub fn set_width(&mut self, width: f32) -> &mut Self {
        let base = self.scene.unscaled_size(self.id).x;
        self.edit(|n| n.scale.x = if base != 0.0 { width / base } else { 1.0 })
    }

    /// Resize by rewriting the y scale. Zero-size content resets it to 1.
    pub fn set_height(&mut self, height: f32) -> &mut Self {
        let base = self.scene.unscaled_size(self.id).y;
        self.edit(|n| n.scale.y = if base != 0.0 { height / base } else { 1.0 })
    }

    /// Move the anchor on x while keeping the node where it appears.
    pub fn set_pivot_x(&mut self, fraction: f32) -> Result<&mut Self> {
        let width = self.scene.size(self.id).x;
        self.try_edit(|id, node| {
            let anchor = node.anchor.as_mut().ok_or(HexiError::NoAnchor(id))?;
            anchor.x = fraction;
            node.pos.x += (fraction - node.prev_pivot.x) * width;
            node.prev_pivot.x = fraction;
            Ok(())
        })?;
        Ok(self)
    }

    /// Move the anchor on y while keeping the node where it appears.
    pub fn set_pivot_y(&mut self, fraction: f32) -> Result<&mut Self> {
        let height = self.scene.size(self.id).y;
        self.try_edit(|id, node| {
            let anchor = node.anchor.as_mut().ok_or(HexiError::NoAnchor(id))?;
            anchor.y = fraction;
            node.pos.y += (fraction - node.prev_pivot.y) * height;
            node.prev_pivot.y = fraction;
            Ok(())
        })?;
        Ok(self)
    }

    pub fn set_pivot(&mut self, x_fraction: f32, y_fraction: f32) -> Result<&mut Self> {
        self.set_pivot_x(x_fraction)?;
        self.set_pivot_y(y_fraction)
    }

    /// Set the depth key and re-sort the parent's children by it.
    pub fn set_layer(&mut self, layer: i32) -> &mut Self {
        let mut parent = None;
        self.edit(|n| {
            n.layer = layer;
            parent = n.parent;
        });
        if let Some(parent) = parent {
            self.scene.sort_children_by_layer(parent);
        }
        self
    }

    /// Join or leave the pointer's button tracking.
    pub fn set_interact(&mut self, on: bool) -> &mut Self {
        self.edit(|n| n.interact = on);
        self.scene.register_interactive(self.id, on);
        self
    }

    /// Join or leave drag-and-drop.
    pub fn set_draggable(&mut self, on: bool) -> &mut Self {
        self.edit(|n| n.draggable = on);
        self.scene.register_draggable(self.id, on);
        self
    }

    /// Gain or lose the diameter/radius accessors.
    pub fn set_circular(&mut self, on: bool) -> &mut Self {
        self.edit(|n| n.circular = on)
    }

    pub fn set_diameter(&mut self, diameter: f32) -> Result<&mut Self> {
        self.try_edit(|id, node| {
            if node.circular {
                Ok(())
            } else {
                Err(HexiError::NotCircular(id))
            }
        })?;
        Ok(self.set_width(diameter).set_height(diameter))
    }

    pub fn set_radius(&mut self, radius: f32) -> Result<&mut Self> {
        self.set_diameter(radius * 2.0)
    }

    /// Switch every texture frame between nearest and linear sampling.
    pub fn set_scale_mode_nearest(&mut self, nearest: bool) -> Result<&mut Self> {
        let mode = if nearest { ScaleMode::Nearest } else { ScaleMode::Linear };
        self.try_edit(|id, node| {
            if node.textures.is_empty() {
                return Err(HexiError::NoTexture(id));
            }
            for texture in &mut node.textures {
                texture.scale_mode = mode;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// Move a tiling sprite's texture offset.
    pub fn set_tile_offset(&mut self, x: f32, y: f32) -> &mut Self {
        self.edit(|n| {
            if let NodeKind::TilingSprite { tile_offset } = &mut n.kind {
                *tile_offset = Vec2::new(x, y);
            }
        })
    }

    /// Add each node as a child, in order.
    pub fn add(&mut self, children: &[NodeId]) -> Result<&mut Self> {
        for &child in children {
            self.scene.add_child(self.id, child)?;
        }
        Ok(self)
    }

    /// Detach each node from this one.
    pub fn remove(&mut self, children: &[NodeId]) -> Result<&mut Self> {
        for &child in children {
            self.scene.remove_child(self.id, child)?;
        }
        Ok(self)
    }

    /// Exchange the positions of two children in the child list.
    pub fn swap_children(&mut self, a: NodeId, b: NodeId) -> Result<&mut Self> {
        self.try_edit(|parent, node| {
            let ia = node
                .children
                .iter()
                .position(|&c| c == a)
                .ok_or(HexiError::NotAChild { parent, child: a })?;
            let ib = node
                .children
                .iter()
                .position(|&c| c == b)
                .ok_or(HexiError::NotAChild { parent, child: b })?;
            node.children.swap(ia, ib);
            Ok(())
        })?;
        Ok(self)
    }

    /// Place `other` relative to this node, then offset it.
    ///
    /// Reference coordinates are global; the result is converted into
    /// `other`'s parent space.
    pub fn put(&mut self, placement: Placement, other: NodeId, offset: Vec2) -> Result<&mut Self> {
        let b_node = self.scene.get(other).ok_or(HexiError::UnknownNode(other))?;
        let b_parent = b_node.parent();
        let b_anchor = b_node.anchor.unwrap_or(Vec2::ZERO);
        let b_size = self.scene.size(other);
        let a = self.scene.reference(self.id);

        let a_left = a.origin.x - edge_compensation(a.size.x, a.anchor.x);
        let a_top = a.origin.y - edge_compensation(a.size.y, a.anchor.y);
        let a_center = Vec2::new(
            a.origin.x + center_compensation(a.size.x / 2.0, a.anchor.x),
            a.origin.y + center_compensation(a.size.y / 2.0, a.anchor.y),
        );

        // Visual top-left for `other`.
        let top_left = match placement {
            Placement::Left => Vec2::new(a_left - b_size.x, a_center.y - b_size.y / 2.0),
            Placement::Right => Vec2::new(a_left + a.size.x, a_center.y - b_size.y / 2.0),
            Placement::Top => Vec2::new(a_center.x - b_size.x / 2.0, a_top - b_size.y),
            Placement::Bottom => Vec2::new(a_center.x - b_size.x / 2.0, a_top + a.size.y),
            Placement::Center => a_center - b_size / 2.0,
        };
        let anchored = top_left
            + Vec2::new(
                edge_compensation(b_size.x, b_anchor.x),
                edge_compensation(b_size.y, b_anchor.y),
            );

        let parent_origin = b_parent.map_or(Vec2::ZERO, |p| self.scene.global_position(p));
        let target = anchored + offset - parent_origin;
        if let Some(node) = self.scene.get_mut(other) {
            node.pos = target;
        }
        Ok(self)
    }

    pub fn put_left(&mut self, other: NodeId) -> Result<&mut Self> {
        self.put(Placement::Left, other, Vec2::ZERO)
    }

    pub fn put_right(&mut self, other: NodeId) -> Result<&mut Self> {
        self.put(Placement::Right, other, Vec2::ZERO)
    }

    pub fn put_top(&mut self, other: NodeId) -> Result<&mut Self> {
        self.put(Placement::Top, other, Vec2::ZERO)
    }

    pub fn put_bottom(&mut self, other: NodeId) -> Result<&mut Self> {
        self.put(Placement::Bottom, other, Vec2::ZERO)
    }

    pub fn put_center(&mut self, other: NodeId) -> Result<&mut Self> {
        self.put(Placement::Center, other, Vec2::ZERO)
    }
}
