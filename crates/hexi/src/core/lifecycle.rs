use crate::api::hexi::Hexi;
use crate::api::types::NodeId;
use crate::core::scene::Scene;
use crate::extensions::tween::TweenState;
use crate::input::pointer::Interactive;
use crate::systems::animation::SpritePlayer;
use crate::systems::particles::ParticleSystem;

/// A per-frame behaviour or one-shot callback.
pub type StateFn<G> = fn(&mut G, &mut Hexi<G>);

/// A callback bound to one node (button presses, taps).
pub type NodeFn<G> = fn(&mut G, &mut Hexi<G>, NodeId);

/// Names of the built-in modules, in the order they update each frame.
pub const UPDATE_ORDER: [&str; 4] = ["interactive", "tweens", "particles", "sprite_player"];

/// Anything that advances once per logic update.
pub trait FrameModule {
    fn name(&self) -> &str;

    fn update(&mut self, scene: &mut Scene, dt: f32);
}

/// The active per-frame behaviour.
pub enum Behavior<G> {
    /// Nothing runs.
    Idle,
    /// The user's load callback, while assets are arriving.
    Load(StateFn<G>),
    /// A game state function.
    Play(StateFn<G>),
}

impl<G> Clone for Behavior<G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<G> Copy for Behavior<G> {}

impl<G> Behavior<G> {
    /// The function this behaviour runs, if any.
    pub fn state(&self) -> Option<StateFn<G>> {
        match *self {
            Behavior::Idle => None,
            Behavior::Load(f) | Behavior::Play(f) => Some(f),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Behavior::Idle)
    }
}

/// Owns the `state` slot, the `paused` flag and the running flag.
pub struct FrameLoop<G> {
    behavior: Behavior<G>,
    paused: bool,
    running: bool,
    updates: u64,
}

impl<G> Default for FrameLoop<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G> FrameLoop<G> {
    pub fn new() -> Self {
        Self {
            behavior: Behavior::Idle,
            paused: false,
            running: false,
            updates: 0,
        }
    }

    pub fn behavior(&self) -> Behavior<G> {
        self.behavior
    }

    pub fn state(&self) -> Option<StateFn<G>> {
        self.behavior.state()
    }

    pub fn set_state(&mut self, state: StateFn<G>) {
        self.behavior = Behavior::Play(state);
    }

    pub(crate) fn set_load_state(&mut self, load: StateFn<G>) {
        self.behavior = Behavior::Load(load);
    }

    pub fn clear_state(&mut self) {
        self.behavior = Behavior::Idle;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            log::info!("Game paused");
        }
        self.paused = true;
    }

    pub fn resume(&mut self) {
        if self.paused {
            log::info!("Game resumed");
        }
        self.paused = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Start the run-loop. Host ticks are ignored until this is called.
    pub fn run(&mut self) {
        self.running = true;
    }

    /// Logic updates performed so far.
    pub fn update_count(&self) -> u64 {
        self.updates
    }

    /// Count one update and return the function to invoke for it.
    pub(crate) fn begin_update(&mut self) -> Option<StateFn<G>> {
        self.updates += 1;
        if self.paused {
            None
        } else {
            self.state()
        }
    }
}

/// The modules updated every logic tick: the built-ins in fixed order,
/// then user modules in registration order. Assembled once at construction.
pub struct Modules {
    pub interactive: Interactive,
    pub tweens: TweenState,
    pub particles: ParticleSystem,
    pub player: SpritePlayer,
    custom: Vec<Box<dyn FrameModule>>,
}

impl Modules {
    pub fn new(canvas_scale: f32, seed: u64, custom: Vec<Box<dyn FrameModule>>) -> Self {
        Self {
            interactive: Interactive::new(canvas_scale),
            tweens: TweenState::new(),
            particles: ParticleSystem::new(seed),
            player: SpritePlayer,
            custom,
        }
    }

    /// Module names in update order.
    pub fn names(&self) -> Vec<&str> {
        let builtin: [&dyn FrameModule; 4] = [&self.interactive, &self.tweens, &self.particles, &self.player];
        builtin
            .into_iter()
            .map(|m| m.name())
            .chain(self.custom.iter().map(|m| m.name()))
            .collect()
    }

    pub fn update(&mut self, scene: &mut Scene, dt: f32) {
        self.interactive.update(scene, dt);
        self.tweens.update(scene, dt);
        self.particles.update(scene, dt);
        self.player.update(scene, dt);
        for module in &mut self.custom {
            module.update(scene, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: &'static str,
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl FrameModule for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn update(&mut self, _scene: &mut Scene, _dt: f32) {
            self.log.borrow_mut().push(self.name);
        }
    }

    fn play(count: &mut u32, _hexi: &mut Hexi<u32>) {
        *count += 1;
    }

    #[test]
    fn builtins_run_before_user_modules() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let custom: Vec<Box<dyn FrameModule>> = vec![
            Box::new(Recorder { name: "first", log: log.clone() }),
            Box::new(Recorder { name: "second", log: log.clone() }),
        ];
        let mut modules = Modules::new(1.0, 7, custom);
        assert_eq!(
            modules.names(),
            vec!["interactive", "tweens", "particles", "sprite_player", "first", "second"]
        );

        let mut scene = Scene::new(Vec2::new(100.0, 100.0));
        modules.update(&mut scene, 1.0 / 60.0);
        modules.update(&mut scene, 1.0 / 60.0);
        assert_eq!(*log.borrow(), vec!["first", "second", "first", "second"]);
    }

    #[test]
    fn builtin_names_match_update_order() {
        let modules = Modules::new(1.0, 1, Vec::new());
        assert_eq!(modules.names(), UPDATE_ORDER.to_vec());
    }

    #[test]
    fn paused_loop_withholds_state() {
        let mut frame_loop: FrameLoop<u32> = FrameLoop::new();
        frame_loop.set_state(play);
        assert!(frame_loop.begin_update().is_some());

        frame_loop.pause();
        assert!(frame_loop.begin_update().is_none());
        assert!(frame_loop.state().is_some());
        assert_eq!(frame_loop.update_count(), 2);

        frame_loop.resume();
        assert!(frame_loop.begin_update().is_some());
        assert!(!frame_loop.is_paused());
    }

    #[test]
    fn behavior_tracks_phase() {
        let mut frame_loop: FrameLoop<u32> = FrameLoop::new();
        assert!(frame_loop.behavior().is_idle());
        frame_loop.set_load_state(play);
        assert!(matches!(frame_loop.behavior(), Behavior::Load(_)));
        frame_loop.set_state(play);
        assert!(matches!(frame_loop.behavior(), Behavior::Play(_)));
        frame_loop.clear_state();
        assert!(frame_loop.state().is_none());
        assert!(!frame_loop.is_running());
        frame_loop.run();
        assert!(frame_loop.is_running());
    }
}
