//! Animation system: steps multi-frame sprites through their texture frames.

use crate::api::error::{HexiError, Result};
use crate::api::types::NodeId;
use crate::components::animation::FramePlayer;
use crate::core::lifecycle::FrameModule;
use crate::core::scene::Scene;

/// Tick every node's frame player and update the shown frame.
///
/// Call this once per logic update.
pub fn tick_animations(scene: &mut Scene, dt: f32) {
    for node in scene.iter_mut() {
        if let Some(ref mut player) = node.player {
            node.frame = player.tick(node.frame, dt);
        }
    }
}

/// Start looping through all of a node's frames, or `range` if given.
pub fn play(scene: &mut Scene, id: NodeId, range: Option<(usize, usize)>) -> Result<()> {
    let node = scene.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
    if node.textures.is_empty() {
        return Err(HexiError::NoTexture(id));
    }
    let last = node.textures.len() - 1;
    let (start, end) = range.unwrap_or((0, last));
    let player = node
        .player
        .get_or_insert_with(|| FramePlayer::new(0, last));
    node.frame = player.play_range(start.min(last), end.min(last));
    Ok(())
}

/// Stop on the current frame.
pub fn stop(scene: &mut Scene, id: NodeId) -> Result<()> {
    let node = scene.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
    if let Some(player) = node.player.as_mut() {
        player.stop();
    }
    Ok(())
}

/// Stop and show `frame`.
pub fn goto_and_stop(scene: &mut Scene, id: NodeId, frame: usize) -> Result<()> {
    let node = scene.get_mut(id).ok_or(HexiError::UnknownNode(id))?;
    if frame >= node.textures.len() {
        return Err(HexiError::NoTexture(id));
    }
    if let Some(player) = node.player.as_mut() {
        player.stop();
    }
    node.frame = frame;
    Ok(())
}

/// The sprite frame player as a frame module.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpritePlayer;

impl FrameModule for SpritePlayer {
    fn name(&self) -> &str {
        "sprite_player"
    }

    fn update(&mut self, scene: &mut Scene, dt: f32) {
        tick_animations(scene, dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::{DisplayNode, NodeKind};
    use crate::components::texture::{FrameRect, ScaleMode, Texture, TextureId};
    use glam::Vec2;

    fn walker(scene: &mut Scene, frames: u32) -> NodeId {
        let textures = (0..frames)
            .map(|i| Texture {
                id: TextureId(i),
                name: format!("walk{i}.png"),
                source: "walk.png".into(),
                frame: FrameRect::new(i as f32 * 16.0, 0.0, 16.0, 16.0),
                scale_mode: ScaleMode::Linear,
            })
            .collect();
        let id = scene.next_id();
        scene.spawn(DisplayNode::new(id, NodeKind::Sprite).with_textures(textures))
    }

    #[test]
    fn tick_updates_sprite_frame() {
        let mut scene = Scene::new(Vec2::new(64.0, 64.0));
        let id = walker(&mut scene, 4);
        play(&mut scene, id, None).unwrap();
        scene.get_mut(id).unwrap().player.as_mut().unwrap().fps = 10.0;

        // 0.1s per frame, tick 0.15s
        tick_animations(&mut scene, 0.15);
        assert_eq!(scene.get(id).unwrap().frame, 1);
    }

    #[test]
    fn sequence_plays_sub_range() {
        let mut scene = Scene::new(Vec2::new(64.0, 64.0));
        let id = walker(&mut scene, 6);
        play(&mut scene, id, Some((2, 3))).unwrap();
        assert_eq!(scene.get(id).unwrap().frame, 2);

        let mut player = SpritePlayer;
        for _ in 0..3 {
            player.update(&mut scene, 1.0 / 12.0 + 0.001);
        }
        // 2 -> 3 -> 2 -> 3
        assert_eq!(scene.get(id).unwrap().frame, 3);
    }

    #[test]
    fn goto_and_stop_freezes_frame() {
        let mut scene = Scene::new(Vec2::new(64.0, 64.0));
        let id = walker(&mut scene, 4);
        play(&mut scene, id, None).unwrap();
        goto_and_stop(&mut scene, id, 3).unwrap();
        tick_animations(&mut scene, 1.0);
        assert_eq!(scene.get(id).unwrap().frame, 3);
        assert!(goto_and_stop(&mut scene, id, 9).is_err());
    }

    #[test]
    fn play_needs_textures() {
        let mut scene = Scene::new(Vec2::new(64.0, 64.0));
        let id = scene.create(NodeKind::Sprite);
        assert!(matches!(play(&mut scene, id, None), Err(HexiError::NoTexture(_))));
    }
}
