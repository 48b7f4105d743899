// extensions/tween.rs
//
// Tween system: animates node properties over a number of logic frames.
// Tweens refer to nodes by NodeId and are applied to the Scene each update.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(node, Tween::slide(from, to, 60, Easing::Smoothstep));
//   tweens.update(&mut scene, dt);  // Advances all tweens by one frame

use std::collections::BTreeMap;
use glam::Vec2;
use crate::api::types::NodeId;
use crate::core::lifecycle::FrameModule;
use crate::core::scene::Scene;
use super::easing::{Easing, ease, ease_vec2};

/// Frames a facade tween lasts unless told otherwise.
pub const DEFAULT_TWEEN_FRAMES: u32 = 60;

/// What property a tween animates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenTarget {
    /// Animate the local position.
    Position { from: Vec2, to: Vec2 },
    PositionX { from: f32, to: f32 },
    PositionY { from: f32, to: f32 },
    Rotation { from: f32, to: f32 },
    /// Animate both scale axes.
    Scale { from: Vec2, to: Vec2 },
    Alpha { from: f32, to: f32 },
}

/// What happens when a tween reaches its last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TweenLoop {
    /// Stop and remove the tween.
    #[default]
    Once,
    /// Restart from the beginning.
    Loop,
    /// Reverse direction.
    Yoyo,
}

/// A single tween animation.
#[derive(Debug, Clone)]
pub struct Tween {
    pub target: TweenTarget,
    /// Duration in frames.
    pub frames: u32,
    /// Frames played in the current direction.
    pub frame: u32,
    pub easing: Easing,
    pub loop_mode: TweenLoop,
    /// Frames to wait before the first frame plays.
    pub delay: u32,
    /// Frames to wait between repeats in Loop/Yoyo mode.
    pub repeat_delay: u32,
    /// Whether currently playing (can be paused).
    pub playing: bool,
    /// For yoyo: current direction (true = forward).
    forward: bool,
    /// Optional id reported through `drain_completed` when a Once tween finishes.
    pub on_complete: Option<u32>,
}

impl Tween {
    pub fn new(target: TweenTarget, frames: u32, easing: Easing) -> Self {
        Self {
            target,
            frames,
            frame: 0,
            easing,
            loop_mode: TweenLoop::Once,
            delay: 0,
            repeat_delay: 0,
            playing: true,
            forward: true,
            on_complete: None,
        }
    }

    /// Move between two positions.
    pub fn slide(from: Vec2, to: Vec2, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Position { from, to }, frames, easing)
    }

    pub fn rotation(from: f32, to: f32, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Rotation { from, to }, frames, easing)
    }

    pub fn scale(from: Vec2, to: Vec2, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Scale { from, to }, frames, easing)
    }

    pub fn alpha(from: f32, to: f32, frames: u32, easing: Easing) -> Self {
        Self::new(TweenTarget::Alpha { from, to }, frames, easing)
    }

    /// Fade in from transparent.
    pub fn fade_in(frames: u32) -> Self {
        Self::alpha(0.0, 1.0, frames, Easing::Sine)
    }

    /// Fade out to transparent.
    pub fn fade_out(frames: u32) -> Self {
        Self::alpha(1.0, 0.0, frames, Easing::Sine)
    }

    /// Fade back and forth between opaque and `min_alpha` forever.
    pub fn pulse(frames: u32, min_alpha: f32) -> Self {
        Self::alpha(1.0, min_alpha, frames, Easing::Smoothstep).with_loop(TweenLoop::Yoyo)
    }

    /// Scale back and forth between 1 and `end_scale` forever.
    pub fn breathe(end_scale: Vec2, frames: u32) -> Self {
        Self::scale(Vec2::ONE, end_scale, frames, Easing::SmoothstepSquared)
            .with_loop(TweenLoop::Yoyo)
    }

    // -- Builder methods --

    pub fn with_loop(mut self, mode: TweenLoop) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_delay(mut self, frames: u32) -> Self {
        self.delay = frames;
        self
    }

    pub fn with_repeat_delay(mut self, frames: u32) -> Self {
        self.repeat_delay = frames;
        self
    }

    pub fn with_on_complete(mut self, event_id: u32) -> Self {
        self.on_complete = Some(event_id);
        self
    }

    pub fn paused(mut self) -> Self {
        self.playing = false;
        self
    }

    /// Normalized progress [0, 1] in the current direction.
    pub fn progress(&self) -> f32 {
        if self.frames == 0 {
            1.0
        } else {
            (self.frame as f32 / self.frames as f32).clamp(0.0, 1.0)
        }
    }

    /// Whether the tween has completed (for Once mode).
    pub fn is_complete(&self) -> bool {
        self.loop_mode == TweenLoop::Once && self.frame >= self.frames
    }

    fn apply(&self, scene: &mut Scene, node: NodeId) {
        let t = if self.forward {
            self.progress()
        } else {
            1.0 - self.progress()
        };
        let Some(node) = scene.get_mut(node) else {
            return;
        };
        match self.target {
            TweenTarget::Position { from, to } => node.pos = ease_vec2(from, to, t, self.easing),
            TweenTarget::PositionX { from, to } => node.pos.x = ease(from, to, t, self.easing),
            TweenTarget::PositionY { from, to } => node.pos.y = ease(from, to, t, self.easing),
            TweenTarget::Rotation { from, to } => node.rotation = ease(from, to, t, self.easing),
            TweenTarget::Scale { from, to } => node.scale = ease_vec2(from, to, t, self.easing),
            TweenTarget::Alpha { from, to } => node.alpha = ease(from, to, t, self.easing),
        }
    }
}

/// Handle to a tween for later reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u32);

/// Manages all active tweens. Tweens advance in creation order.
#[derive(Debug, Default)]
pub struct TweenState {
    tweens: BTreeMap<TweenId, (NodeId, Tween)>,
    next_id: u32,
    /// Completed tween events to be polled.
    completed_events: Vec<u32>,
}

impl TweenState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tween for a node. Returns a handle for later control.
    pub fn add(&mut self, node: NodeId, tween: Tween) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, (node, tween));
        id
    }

    /// Remove a tween by handle.
    pub fn remove(&mut self, id: TweenId) -> bool {
        self.tweens.remove(&id).is_some()
    }

    /// Remove all tweens for a node.
    pub fn remove_node(&mut self, node: NodeId) {
        self.tweens.retain(|_, (n, _)| *n != node);
    }

    pub fn pause(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.get_mut(&id) {
            tween.playing = false;
        }
    }

    pub fn resume(&mut self, id: TweenId) {
        if let Some((_, tween)) = self.tweens.get_mut(&id) {
            tween.playing = true;
        }
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id).map(|(_, t)| t)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.get_mut(&id).map(|(_, t)| t)
    }

    /// Advance every tween by one frame and apply it to the scene.
    /// Returns the number of tweens that completed this frame.
    pub fn tick(&mut self, scene: &mut Scene) -> usize {
        let mut completed = Vec::new();

        for (&id, (node, tween)) in self.tweens.iter_mut() {
            // Tweens on despawned nodes are dropped silently
            if !scene.contains(*node) {
                completed.push(id);
                continue;
            }
            if !tween.playing {
                continue;
            }
            if tween.delay > 0 {
                tween.delay -= 1;
                continue;
            }

            tween.frame = (tween.frame + 1).min(tween.frames);
            tween.apply(scene, *node);

            if tween.frame < tween.frames {
                continue;
            }
            match tween.loop_mode {
                TweenLoop::Once => {
                    if let Some(event_id) = tween.on_complete {
                        self.completed_events.push(event_id);
                    }
                    completed.push(id);
                }
                TweenLoop::Loop => {
                    tween.frame = 0;
                    tween.delay = tween.repeat_delay;
                }
                TweenLoop::Yoyo => {
                    tween.frame = 0;
                    tween.delay = tween.repeat_delay;
                    tween.forward = !tween.forward;
                }
            }
        }

        let count = completed.len();
        for id in completed {
            self.tweens.remove(&id);
        }
        count
    }

    /// Drain completed tween events.
    pub fn drain_completed(&mut self) -> impl Iterator<Item = u32> + '_ {
        self.completed_events.drain(..)
    }

    /// Number of active tweens.
    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    /// Whether there are no active tweens.
    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Clear all tweens.
    pub fn clear(&mut self) {
        self.tweens.clear();
        self.completed_events.clear();
    }
}

impl FrameModule for TweenState {
    fn name(&self) -> &str {
        "tweens"
    }

    fn update(&mut self, scene: &mut Scene, _dt: f32) {
        self.tick(scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::NodeKind;
    use approx::assert_relative_eq;

    fn scene_with_node() -> (Scene, NodeId) {
        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        let id = scene.create(NodeKind::Sprite);
        scene.add_child(scene.root(), id).unwrap();
        (scene, id)
    }

    #[test]
    fn slide_reaches_target_in_frames() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::slide(Vec2::ZERO, Vec2::new(100.0, 0.0), 4, Easing::Linear));

        tweens.tick(&mut scene);
        tweens.tick(&mut scene);
        assert_relative_eq!(scene.get(id).unwrap().pos.x, 50.0);

        tweens.tick(&mut scene);
        tweens.tick(&mut scene);
        assert_relative_eq!(scene.get(id).unwrap().pos.x, 100.0);
        assert!(tweens.is_empty());
    }

    #[test]
    fn delay_holds_the_first_frame() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::fade_out(2).with_delay(3));

        for _ in 0..3 {
            tweens.tick(&mut scene);
            assert_relative_eq!(scene.get(id).unwrap().alpha, 1.0);
        }
        tweens.tick(&mut scene);
        tweens.tick(&mut scene);
        assert_relative_eq!(scene.get(id).unwrap().alpha, 0.0);
    }

    #[test]
    fn yoyo_returns_to_start() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenState::new();
        tweens.add(
            id,
            Tween::slide(Vec2::ZERO, Vec2::new(100.0, 0.0), 2, Easing::Linear)
                .with_loop(TweenLoop::Yoyo),
        );

        tweens.tick(&mut scene);
        tweens.tick(&mut scene);
        assert_relative_eq!(scene.get(id).unwrap().pos.x, 100.0);

        tweens.tick(&mut scene);
        tweens.tick(&mut scene);
        assert_relative_eq!(scene.get(id).unwrap().pos.x, 0.0);
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn completion_events_drain_once() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::fade_in(1).with_on_complete(42));

        assert_eq!(tweens.tick(&mut scene), 1);
        assert_eq!(tweens.drain_completed().collect::<Vec<_>>(), vec![42]);
        assert_eq!(tweens.drain_completed().count(), 0);
    }

    #[test]
    fn tweens_on_despawned_nodes_are_dropped() {
        let (mut scene, id) = scene_with_node();
        let mut tweens = TweenState::new();
        tweens.add(id, Tween::pulse(10, 0.3));
        scene.despawn(id);
        tweens.tick(&mut scene);
        assert!(tweens.is_empty());
    }

    #[test]
    fn remove_node_tweens() {
        let mut tweens = TweenState::new();
        let id = NodeId(1);

        tweens.add(id, Tween::slide(Vec2::ZERO, Vec2::ONE, 10, Easing::Linear));
        tweens.add(id, Tween::rotation(0.0, 1.0, 10, Easing::Linear));

        assert_eq!(tweens.len(), 2);
        tweens.remove_node(id);
        assert!(tweens.is_empty());
    }
}
