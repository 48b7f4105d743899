//! Flat facade over the frame modules, collision helpers and random numbers.
//!
//! Every forwarded capability is listed once in `DELEGATES` together with
//! the defaults the facade fills in; the methods below implement the table.

use std::collections::HashMap;
use glam::Vec2;
use crate::api::error::{HexiError, Result};
use crate::api::hexi::Hexi;
use crate::api::types::NodeId;
use crate::core::augment::Bounds;
use crate::core::lifecycle::{NodeFn, StateFn};
use crate::core::scene::Scene;
use crate::extensions::easing::Easing;
use crate::extensions::tween::{Tween, TweenId, TweenLoop, DEFAULT_TWEEN_FRAMES};
use crate::input::pointer::{ButtonAction, Pointer};
use crate::input::queue::InputEvent;
use crate::systems::animation;
use crate::systems::collision::{self, Edges};
use crate::systems::particles::{EmitterId, ParticleBurst};

/// Frames between emitter bursts unless told otherwise.
pub const DEFAULT_EMITTER_INTERVAL: u32 = 60;
/// End scale for `scale_tween` and `breathe` unless told otherwise.
pub const DEFAULT_END_SCALE: f32 = 0.5;
pub const DEFAULT_BREATHE_SCALE: f32 = 0.8;

/// One forwarded capability: facade method, owning component, defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delegate {
    pub method: &'static str,
    pub component: &'static str,
    pub defaults: &'static str,
}

const fn delegate(method: &'static str, component: &'static str, defaults: &'static str) -> Delegate {
    Delegate { method, component, defaults }
}

pub const DELEGATES: &[Delegate] = &[
    delegate("slide", "tweens", "frames=60 easing=smoothstep yoyo=false"),
    delegate("fade_in", "tweens", "frames=60"),
    delegate("fade_out", "tweens", "frames=60"),
    delegate("pulse", "tweens", "frames=60 min_alpha=0"),
    delegate("scale_tween", "tweens", "end=0.5,0.5 frames=60"),
    delegate("breathe", "tweens", "end=0.8,0.8 frames=60 yoyo"),
    delegate("create_particles", "particles", "parent=stage"),
    delegate("particle_emitter", "particles", "interval=60 parent=stage"),
    delegate("play_animation", "sprite_player", "all frames, looping"),
    delegate("play_sequence", "sprite_player", ""),
    delegate("stop_animation", "sprite_player", ""),
    delegate("goto_and_stop", "sprite_player", ""),
    delegate("hit_test_point", "collision", ""),
    delegate("hit_test_rectangle", "collision", ""),
    delegate("hit_test_circle", "collision", ""),
    delegate("contain", "collision", "area=canvas bounce=false"),
    delegate("move_node", "collision", ""),
    delegate("random_int", "rng", ""),
    delegate("random_float", "rng", ""),
    delegate("on_press", "interactive", ""),
    delegate("on_release", "interactive", ""),
    delegate("on_over", "interactive", ""),
    delegate("on_out", "interactive", ""),
    delegate("on_tap", "interactive", ""),
    delegate("on_key", "interactive", ""),
    delegate("is_key_down", "interactive", ""),
    delegate("pointer", "interactive", ""),
];

/// User callbacks for pointer and keyboard events.
pub struct Handlers<G> {
    buttons: HashMap<(NodeId, ButtonAction), NodeFn<G>>,
    keys: HashMap<(u32, bool), StateFn<G>>,
}

impl<G> Default for Handlers<G> {
    fn default() -> Self {
        Self {
            buttons: HashMap::new(),
            keys: HashMap::new(),
        }
    }
}

impl<G> Handlers<G> {
    fn button(&self, node: NodeId, action: ButtonAction) -> Option<NodeFn<G>> {
        self.buttons.get(&(node, action)).copied()
    }

    fn key(&self, key_code: u32, pressed: bool) -> Option<StateFn<G>> {
        self.keys.get(&(key_code, pressed)).copied()
    }

    /// Drop button callbacks whose node has been despawned.
    pub(crate) fn forget_missing(&mut self, scene: &Scene) {
        self.buttons.retain(|(node, _), _| scene.contains(*node));
    }

    #[cfg(test)]
    fn button_handler_count(&self) -> usize {
        self.buttons.len()
    }
}

impl<G> Hexi<G> {
    /// Every capability the facade forwards.
    pub fn delegates() -> &'static [Delegate] {
        DELEGATES
    }

    /// Run callbacks for the button and key events of the last module update.
    pub(crate) fn dispatch_input(&mut self, game: &mut G) {
        self.handlers.forget_missing(&self.scene);
        for event in self.modules.interactive.drain_button_events() {
            if let Some(handler) = self.handlers.button(event.node, event.action) {
                handler(game, self, event.node);
            }
        }
        for event in self.modules.interactive.drain_key_events() {
            if let Some(handler) = self.handlers.key(event.key_code, event.pressed) {
                handler(game, self);
            }
        }
    }

    // -- Tweens --

    /// Slide a node to `to` from where it is now.
    pub fn slide(
        &mut self,
        id: NodeId,
        to: Vec2,
        frames: Option<u32>,
        easing: Option<Easing>,
        yoyo: bool,
    ) -> Result<TweenId> {
        let from = self.scene.get(id).ok_or(HexiError::UnknownNode(id))?.pos;
        let mut tween = Tween::slide(from, to, frames.unwrap_or(DEFAULT_TWEEN_FRAMES), easing.unwrap_or_default());
        if yoyo {
            tween = tween.with_loop(TweenLoop::Yoyo);
        }
        Ok(self.modules.tweens.add(id, tween))
    }

    pub fn fade_in(&mut self, id: NodeId, frames: Option<u32>) -> Result<TweenId> {
        self.add_tween(id, Tween::fade_in(frames.unwrap_or(DEFAULT_TWEEN_FRAMES)))
    }

    pub fn fade_out(&mut self, id: NodeId, frames: Option<u32>) -> Result<TweenId> {
        self.add_tween(id, Tween::fade_out(frames.unwrap_or(DEFAULT_TWEEN_FRAMES)))
    }

    pub fn pulse(&mut self, id: NodeId, frames: Option<u32>, min_alpha: Option<f32>) -> Result<TweenId> {
        let tween = Tween::pulse(frames.unwrap_or(DEFAULT_TWEEN_FRAMES), min_alpha.unwrap_or(0.0));
        self.add_tween(id, tween)
    }

    /// Tween a node's scale from its current value.
    pub fn scale_tween(&mut self, id: NodeId, end: Option<Vec2>, frames: Option<u32>) -> Result<TweenId> {
        let from = self.scene.get(id).ok_or(HexiError::UnknownNode(id))?.scale;
        let end = end.unwrap_or(Vec2::splat(DEFAULT_END_SCALE));
        let tween = Tween::scale(from, end, frames.unwrap_or(DEFAULT_TWEEN_FRAMES), Easing::default());
        Ok(self.modules.tweens.add(id, tween))
    }

    pub fn breathe(&mut self, id: NodeId, end: Option<Vec2>, frames: Option<u32>) -> Result<TweenId> {
        let end = end.unwrap_or(Vec2::splat(DEFAULT_BREATHE_SCALE));
        self.add_tween(id, Tween::breathe(end, frames.unwrap_or(DEFAULT_TWEEN_FRAMES)))
    }

    fn add_tween(&mut self, id: NodeId, tween: Tween) -> Result<TweenId> {
        if !self.scene.contains(id) {
            return Err(HexiError::UnknownNode(id));
        }
        Ok(self.modules.tweens.add(id, tween))
    }

    // -- Particles --

    /// Burst particles on the stage at `origin`.
    pub fn create_particles(&mut self, origin: Vec2, burst: &ParticleBurst) -> Result<Vec<NodeId>> {
        let root = self.scene.root();
        self.modules.particles.burst(&mut self.scene, root, origin, burst)
    }

    /// A stopped emitter firing `burst` every `interval` frames once played.
    pub fn particle_emitter(&mut self, origin: Vec2, interval: Option<u32>, burst: ParticleBurst) -> EmitterId {
        let root = self.scene.root();
        let interval = interval.unwrap_or(DEFAULT_EMITTER_INTERVAL);
        self.modules.particles.add_emitter(root, origin, interval, burst)
    }

    // -- Sprite animation --

    pub fn play_animation(&mut self, id: NodeId) -> Result<()> {
        animation::play(&mut self.scene, id, None)
    }

    /// Loop frames `start..=end`.
    pub fn play_sequence(&mut self, id: NodeId, start: usize, end: usize) -> Result<()> {
        animation::play(&mut self.scene, id, Some((start, end)))
    }

    pub fn stop_animation(&mut self, id: NodeId) -> Result<()> {
        animation::stop(&mut self.scene, id)
    }

    pub fn goto_and_stop(&mut self, id: NodeId, frame: usize) -> Result<()> {
        animation::goto_and_stop(&mut self.scene, id, frame)
    }

    // -- Collision --

    pub fn hit_test_point(&self, point: Vec2, id: NodeId) -> Result<bool> {
        collision::hit_test_point(&self.scene, point, id)
    }

    pub fn hit_test_rectangle(&self, a: NodeId, b: NodeId) -> Result<bool> {
        collision::hit_test_rectangle(&self.scene, a, b)
    }

    pub fn hit_test_circle(&self, a: NodeId, b: NodeId) -> Result<bool> {
        collision::hit_test_circle(&self.scene, a, b)
    }

    /// Keep a node inside `area`, or the canvas when `None`.
    pub fn contain(&mut self, id: NodeId, area: Option<Bounds>, bounce: bool) -> Result<Edges> {
        let canvas = self.canvas_size();
        let area = area.unwrap_or(Bounds {
            x: 0.0,
            y: 0.0,
            width: canvas.x,
            height: canvas.y,
        });
        collision::contain(&mut self.scene, id, area, bounce)
    }

    /// Add each node's velocity to its position.
    pub fn move_node(&mut self, ids: &[NodeId]) {
        collision::move_nodes(&mut self.scene, ids);
    }

    // -- Random numbers --

    /// Integer in `[min, max]`.
    pub fn random_int(&mut self, min: i32, max: i32) -> i32 {
        self.rng.range_int(min, max)
    }

    /// Float in `[min, max)`.
    pub fn random_float(&mut self, min: f32, max: f32) -> f32 {
        self.rng.range_f32(min, max)
    }

    // -- Input --

    pub fn push_input(&mut self, event: InputEvent) {
        self.modules.interactive.push(event);
    }

    pub fn pointer(&self) -> &Pointer {
        self.modules.interactive.pointer()
    }

    pub fn is_key_down(&self, key_code: u32) -> bool {
        self.modules.interactive.is_key_down(key_code)
    }

    pub fn on_press(&mut self, id: NodeId, handler: NodeFn<G>) {
        self.on_button(id, ButtonAction::Press, handler);
    }

    pub fn on_release(&mut self, id: NodeId, handler: NodeFn<G>) {
        self.on_button(id, ButtonAction::Release, handler);
    }

    pub fn on_over(&mut self, id: NodeId, handler: NodeFn<G>) {
        self.on_button(id, ButtonAction::Over, handler);
    }

    pub fn on_out(&mut self, id: NodeId, handler: NodeFn<G>) {
        self.on_button(id, ButtonAction::Out, handler);
    }

    pub fn on_tap(&mut self, id: NodeId, handler: NodeFn<G>) {
        self.on_button(id, ButtonAction::Tap, handler);
    }

    /// Bind a key's press (`pressed = true`) or release.
    pub fn on_key(&mut self, key_code: u32, pressed: bool, handler: StateFn<G>) {
        self.handlers.keys.insert((key_code, pressed), handler);
    }

    /// Registering a pointer callback makes the node interactive.
    fn on_button(&mut self, id: NodeId, action: ButtonAction, handler: NodeFn<G>) {
        if let Some(mut node) = self.scene.node_mut(id) {
            node.set_interact(true);
        }
        self.handlers.buttons.insert((id, action), handler);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::HexiConfig;
    use crate::core::lifecycle::UPDATE_ORDER;
    use crate::extensions::tween::TweenTarget;
    use crate::input::pointer::keys;
    use approx::assert_relative_eq;

    #[derive(Default)]
    struct Clicks {
        presses: Vec<NodeId>,
        taps: u32,
        jumps: u32,
        states: u32,
    }

    fn setup(_: &mut Clicks, _: &mut Hexi<Clicks>) {}

    fn pressed(clicks: &mut Clicks, _: &mut Hexi<Clicks>, id: NodeId) {
        clicks.presses.push(id);
    }

    fn tapped(clicks: &mut Clicks, _: &mut Hexi<Clicks>, _: NodeId) {
        clicks.taps += 1;
    }

    fn jump(clicks: &mut Clicks, _: &mut Hexi<Clicks>) {
        clicks.jumps += 1;
    }

    fn play(clicks: &mut Clicks, _: &mut Hexi<Clicks>) {
        clicks.states += 1;
    }

    fn started() -> (Clicks, Hexi<Clicks>) {
        let mut clicks = Clicks::default();
        let mut hexi = Hexi::new(HexiConfig::new(200.0, 200.0).with_setup(setup)).unwrap();
        hexi.start(&mut clicks);
        (clicks, hexi)
    }

    #[test]
    fn table_names_real_components() {
        let known = ["collision", "rng"];
        for delegate in Hexi::<Clicks>::delegates() {
            assert!(
                UPDATE_ORDER.contains(&delegate.component) || known.contains(&delegate.component),
                "{} forwards to unknown {}",
                delegate.method,
                delegate.component
            );
        }
    }

    #[test]
    fn button_callbacks_fire_even_while_paused() {
        let (mut clicks, mut hexi) = started();
        let id = hexi.rectangle(20.0, 20.0, Default::default());
        hexi.on_press(id, pressed);
        hexi.on_tap(id, tapped);
        hexi.set_state(play);
        hexi.pause();

        hexi.push_input(InputEvent::PointerDown { x: 5.0, y: 5.0 });
        hexi.push_input(InputEvent::PointerUp { x: 5.0, y: 5.0 });
        hexi.update(&mut clicks);

        assert_eq!(clicks.presses, vec![id]);
        assert_eq!(clicks.taps, 1);
        assert_eq!(clicks.states, 0);
    }

    #[test]
    fn key_callbacks_fire_on_edges() {
        let (mut clicks, mut hexi) = started();
        hexi.on_key(keys::SPACE, true, jump);
        hexi.push_input(InputEvent::KeyDown { key_code: keys::SPACE });
        hexi.update(&mut clicks);
        hexi.update(&mut clicks);
        assert_eq!(clicks.jumps, 1);
        assert!(hexi.is_key_down(keys::SPACE));
    }

    #[test]
    fn tween_defaults_are_filled_in() {
        let (_, mut hexi) = started();
        let id = hexi.rectangle(10.0, 10.0, Default::default());
        let slide = hexi.slide(id, Vec2::new(50.0, 0.0), None, None, false).unwrap();
        let tween = hexi.modules.tweens.get(slide).unwrap();
        assert_eq!(tween.frames, DEFAULT_TWEEN_FRAMES);
        assert_eq!(tween.easing, Easing::Smoothstep);

        let pulse = hexi.pulse(id, Some(30), None).unwrap();
        assert_eq!(hexi.modules.tweens.get(pulse).unwrap().loop_mode, TweenLoop::Yoyo);
        assert!(matches!(hexi.fade_in(NodeId(999), None), Err(HexiError::UnknownNode(_))));
    }

    #[test]
    fn contain_defaults_to_the_canvas() {
        let (_, mut hexi) = started();
        let id = hexi.rectangle(10.0, 10.0, Default::default());
        hexi.scene.node_mut(id).unwrap().set_position(-5.0, 195.0);
        let edges = hexi.contain(id, None, false).unwrap();
        assert!(edges.left && edges.bottom);
        let node = hexi.scene.get(id).unwrap();
        assert_relative_eq!(node.pos.x, 0.0);
        assert_relative_eq!(node.pos.y, 190.0);
    }

    #[test]
    fn random_helpers_stay_in_range() {
        let (_, mut hexi) = started();
        for _ in 0..100 {
            let n = hexi.random_int(1, 6);
            assert!((1..=6).contains(&n));
            let f = hexi.random_float(-1.0, 1.0);
            assert!((-1.0..1.0).contains(&f));
        }
    }

    #[test]
    fn particles_land_on_the_stage() {
        let (_, mut hexi) = started();
        let ids = hexi.create_particles(Vec2::new(100.0, 100.0), &ParticleBurst::new().with_count(5)).unwrap();
        assert_eq!(ids.len(), 5);
        let root = hexi.scene.root();
        assert!(ids.iter().all(|id| hexi.scene.get(*id).and_then(|n| n.parent()) == Some(root)));

        let emitter = hexi.particle_emitter(Vec2::ZERO, None, ParticleBurst::new());
        assert_eq!(hexi.modules.particles.emitter(emitter).map(|e| e.interval), Some(DEFAULT_EMITTER_INTERVAL));
    }

    #[test]
    fn scale_tween_leaves_the_canvas_scale_alone() {
        let (_, mut hexi) = started();
        let id = hexi.rectangle(10.0, 10.0, Default::default());
        hexi.scene.node_mut(id).unwrap().set_scale(2.0, 2.0);
        let tween = hexi.scale_tween(id, None, None).unwrap();
        match hexi.modules.tweens.get(tween).unwrap().target {
            TweenTarget::Scale { from, to } => {
                assert_eq!(from, Vec2::splat(2.0));
                assert_eq!(to, Vec2::splat(DEFAULT_END_SCALE));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_relative_eq!(hexi.scale(), 1.0);
        assert!(hexi.scale_tween(NodeId(999), None, None).is_err());
    }

    #[test]
    fn table_defaults_match_the_constants() {
        for delegate in DELEGATES {
            for pair in delegate.defaults.split_whitespace() {
                let Some((key, value)) = pair.split_once('=') else {
                    continue;
                };
                match key {
                    "frames" => assert_eq!(value.parse::<u32>().unwrap(), DEFAULT_TWEEN_FRAMES, "{}", delegate.method),
                    "interval" => assert_eq!(value.parse::<u32>().unwrap(), DEFAULT_EMITTER_INTERVAL),
                    "end" => {
                        let expected = match delegate.method {
                            "breathe" => DEFAULT_BREATHE_SCALE,
                            _ => DEFAULT_END_SCALE,
                        };
                        for part in value.split(',') {
                            assert_relative_eq!(part.parse::<f32>().unwrap(), expected);
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn removed_nodes_lose_their_callbacks() {
        let (mut clicks, mut hexi) = started();
        let id = hexi.rectangle(20.0, 20.0, Default::default());
        let group = hexi.group(&[id]).unwrap();
        hexi.on_press(id, pressed);
        hexi.on_tap(id, tapped);
        assert_eq!(hexi.handlers.button_handler_count(), 2);

        hexi.remove(group).unwrap();
        assert_eq!(hexi.handlers.button_handler_count(), 0);

        let other = hexi.rectangle(20.0, 20.0, Default::default());
        hexi.on_press(other, pressed);
        hexi.scene.despawn(other);
        hexi.update(&mut clicks);
        assert_eq!(hexi.handlers.button_handler_count(), 0);
        assert!(clicks.presses.is_empty());
    }
}
