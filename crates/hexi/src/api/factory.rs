//! Creation methods. Each one builds a node, augments it, adds it to the
//! stage and returns its id.

use glam::Vec2;
use crate::api::error::{HexiError, Result};
use crate::api::hexi::Hexi;
use crate::api::types::NodeId;
use crate::components::animation::FramePlayer;
use crate::components::node::{DisplayNode, NodeKind, ShapeStyle, TextStyle};
use crate::components::texture::Texture;
use crate::core::augment::{NodeMut, NodeRef};

impl<G> Hexi<G> {
    /// The root stage node.
    pub fn stage(&self) -> NodeId {
        self.scene.root()
    }

    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.scene.node(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<NodeMut<'_>> {
        self.scene.node_mut(id)
    }

    fn adopt(&mut self, node: DisplayNode) -> NodeId {
        let id = self.scene.spawn(node);
        let root = self.scene.root();
        if let Err(err) = self.scene.add_child(root, id) {
            log::warn!("Could not add {:?} to the stage: {}", id, err);
        }
        id
    }

    fn textures(&self, names: &[&str]) -> Result<Vec<Texture>> {
        names
            .iter()
            .map(|name| self.resources().texture(name).cloned())
            .collect()
    }

    /// A sprite showing one loaded image or atlas frame.
    pub fn sprite(&mut self, source: &str) -> Result<NodeId> {
        let textures = self.textures(&[source])?;
        let id = self.scene.next_id();
        Ok(self.adopt(DisplayNode::new(id, NodeKind::Sprite).with_textures(textures)))
    }

    /// A sprite with several frames and a stopped frame player.
    pub fn sprite_frames(&mut self, sources: &[&str]) -> Result<NodeId> {
        let textures = self.textures(sources)?;
        let Some(last) = textures.len().checked_sub(1) else {
            return Err(HexiError::Config("a sprite needs at least one frame".into()));
        };
        let id = self.scene.next_id();
        let mut node = DisplayNode::new(id, NodeKind::Sprite).with_textures(textures);
        if last > 0 {
            node.player = Some(FramePlayer::new(0, last));
        }
        Ok(self.adopt(node))
    }

    /// A sprite whose texture repeats across `width` x `height`.
    pub fn tiling_sprite(&mut self, source: &str, width: f32, height: f32) -> Result<NodeId> {
        let textures = self.textures(&[source])?;
        let id = self.scene.next_id();
        let node = DisplayNode::new(id, NodeKind::TilingSprite { tile_offset: Vec2::ZERO })
            .with_textures(textures)
            .with_base_size(Vec2::new(width, height));
        Ok(self.adopt(node))
    }

    /// An interactive sprite whose frames are up, over and down.
    pub fn button(&mut self, sources: &[&str]) -> Result<NodeId> {
        let textures = self.textures(sources)?;
        if textures.is_empty() {
            return Err(HexiError::Config("a button needs at least one frame".into()));
        }
        let id = self.scene.next_id();
        let id = self.adopt(DisplayNode::new(id, NodeKind::Button).with_textures(textures));
        if let Some(mut node) = self.scene.node_mut(id) {
            node.set_interact(true);
        }
        Ok(id)
    }

    pub fn rectangle(&mut self, width: f32, height: f32, style: ShapeStyle) -> NodeId {
        let id = self.scene.next_id();
        self.adopt(DisplayNode::new(id, NodeKind::Rectangle(style)).with_base_size(Vec2::new(width, height)))
    }

    /// A circle; circular from the start so `diameter`/`radius` apply.
    pub fn circle(&mut self, diameter: f32, style: ShapeStyle) -> NodeId {
        let id = self.scene.next_id();
        let id = self.adopt(DisplayNode::new(id, NodeKind::Circle(style)).with_base_size(Vec2::splat(diameter)));
        if let Some(mut node) = self.scene.node_mut(id) {
            node.set_circular(true);
        }
        id
    }

    /// A line from `a` to `b` in stage space.
    pub fn line(&mut self, stroke: u32, width: f32, a: Vec2, b: Vec2) -> NodeId {
        let id = self.scene.next_id();
        self.adopt(DisplayNode::new(id, NodeKind::Line { a, b, stroke, width }))
    }

    pub fn text(&mut self, content: &str, font: &str, fill: u32) -> NodeId {
        let style = TextStyle {
            content: content.to_string(),
            font: font.to_string(),
            fill,
        };
        let id = self.scene.next_id();
        self.adopt(DisplayNode::new(id, NodeKind::Text(style)))
    }

    /// Replace a text node's content.
    pub fn set_text(&mut self, id: NodeId, content: &str) -> Result<()> {
        let node = self.scene.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
        match &mut node.kind {
            NodeKind::Text(style) => {
                if style.content != content {
                    style.content = content.to_string();
                    node.base_size = style.estimated_size();
                }
                Ok(())
            }
            _ => Err(HexiError::Config(format!("node {id:?} is not text"))),
        }
    }

    /// A group holding `children`, which leave their current parents.
    pub fn group(&mut self, children: &[NodeId]) -> Result<NodeId> {
        let id = self.scene.next_id();
        let id = self.adopt(DisplayNode::new(id, NodeKind::Container));
        for &child in children {
            self.scene.add_child(id, child)?;
        }
        Ok(id)
    }

    /// Remove a node and everything under it.
    pub fn remove(&mut self, id: NodeId) -> Result<()> {
        if id == self.scene.root() {
            return Err(HexiError::Config("the stage cannot be removed".into()));
        }
        self.modules.tweens.remove_node(id);
        self.scene.despawn(id).ok_or(HexiError::UnknownNode(id))?;
        self.handlers.forget_missing(&self.scene);
        Ok(())
    }
}
