//! The facade: one object owning the display tree, the frame lifecycle,
//! the loading state machine, the resource table and the frame modules.
//!
//! The host drives it with `start` once and `tick` every display frame,
//! fetching whatever `drain_fetch_requests` lists and handing payloads back
//! through `resource_fetched`/`audio_decoded`.

use glam::Vec2;
use crate::api::canvas::Canvas;
use crate::api::config::{HexiConfig, InterpolationProperties};
use crate::api::delegate::Handlers;
use crate::api::error::Result;
use crate::api::types::{NodeId, SoundEvent, SoundHandle};
use crate::assets::progress_bar::ProgressBar;
use crate::assets::resources::{AssetKind, Payload, ResourceTable};
use crate::assets::tracker::LoadTracker;
use crate::components::node::{DisplayNode, NodeKind, TextStyle};
use crate::components::texture::Texture;
use crate::core::lifecycle::{Behavior, FrameLoop, Modules, StateFn};
use crate::core::loading::{Begin, LoadPhase, LoadingStateMachine, PendingBatch};
use crate::core::scene::Scene;
use crate::core::time::FrameClock;
use crate::renderer::instance::RenderBuffer;
use crate::systems::render::{build_render_buffer, Interpolation};
use crate::systems::rng::Rng;

pub struct Hexi<G> {
    pub scene: Scene,
    pub modules: Modules,
    frame_loop: FrameLoop<G>,
    machine: LoadingStateMachine<G>,
    clock: FrameClock,
    canvas: Canvas,
    interpolate: bool,
    interpolation: InterpolationProperties,
    resources: ResourceTable,
    tracker: LoadTracker,
    /// On-demand batch started with `load`.
    batch: Option<PendingBatch<G>>,
    /// Assets from the configuration, fetched on `start`.
    initial_assets: Vec<String>,
    font_samples: Vec<NodeId>,
    progress_bar: Option<ProgressBar>,
    sounds: Vec<SoundEvent>,
    pub(crate) handlers: Handlers<G>,
    pub(crate) rng: Rng,
    render_buffer: RenderBuffer,
}

impl<G> Hexi<G> {
    /// Build a facade. Fails without a setup callback or with a bad surface.
    pub fn new(config: HexiConfig<G>) -> Result<Self> {
        let setup = config.validate()?;
        let HexiConfig { surface, load, modules, seed, .. } = config;

        let canvas = Canvas::from_surface(&surface);
        log::info!(
            "Hexi {}x{} ({:?} renderer, {} fps)",
            surface.width,
            surface.height,
            surface.renderer,
            surface.fps
        );

        Ok(Self {
            scene: Scene::new(canvas.size()),
            modules: Modules::new(canvas.scale(), seed, modules),
            frame_loop: FrameLoop::new(),
            machine: LoadingStateMachine::new(setup, load),
            clock: FrameClock::new(surface.fps, surface.render_fps),
            canvas,
            interpolate: surface.interpolate,
            interpolation: surface.interpolation_properties,
            resources: ResourceTable::new(),
            tracker: LoadTracker::new(),
            batch: None,
            initial_assets: surface.assets,
            font_samples: Vec::new(),
            progress_bar: None,
            sounds: Vec::new(),
            handlers: Handlers::default(),
            rng: Rng::new(seed),
            render_buffer: RenderBuffer::new(),
        })
    }

    /// Begin loading the configured assets, or run setup right away when
    /// there are none, then start the run-loop.
    pub fn start(&mut self, game: &mut G) {
        if self.frame_loop.is_running() {
            log::warn!("Hexi already started");
            return;
        }
        let assets = std::mem::take(&mut self.initial_assets);
        match self.machine.begin(!assets.is_empty()) {
            Begin::Loading(load) => {
                log::info!("Starting with {} asset(s) to load", assets.len());
                self.tracker.begin(&assets);
                if let Some(load) = load {
                    self.frame_loop.set_load_state(load);
                }
            }
            Begin::Ready(setup) => {
                log::info!("Starting without assets");
                self.run_setup(game, setup);
            }
        }
        self.frame_loop.run();
    }

    /// Load more resources on demand; `on_loaded` runs once they have all
    /// arrived and decoded. Progress fields restart from zero.
    pub fn load<S: AsRef<str>>(&mut self, game: &mut G, paths: &[S], on_loaded: StateFn<G>) {
        let paths: Vec<String> = paths.iter().map(|p| p.as_ref().to_string()).collect();
        if self.tracker.begin(&paths) == 0 && !self.tracker.is_loading() {
            on_loaded(game, self);
            return;
        }
        self.batch = Some(PendingBatch::new(on_loaded));
    }

    /// Hand over a fetched payload.
    pub fn resource_fetched(&mut self, game: &mut G, path: &str, payload: Payload) -> Result<()> {
        self.tracker.expects(path)?;
        let (kind, atlas_image) = self.resources.store(path, payload)?;
        if let Some(image) = atlas_image {
            if !self.resources.contains(&image) && self.tracker.request(&image) {
                log::debug!("Queued atlas image {}", image);
            }
        }
        if kind == AssetKind::Font {
            self.add_font_sample(path)?;
        }

        let complete = self.tracker.arrive(path, kind)?;
        if let Some(bar) = self.progress_bar {
            bar.update(&mut self.scene, self.tracker.progress());
        }
        if complete {
            self.batch_fetched(game);
        }
        Ok(())
    }

    /// The host finished decoding a sound.
    pub fn audio_decoded(&mut self, game: &mut G, path: &str, handle: SoundHandle) -> Result<()> {
        self.tracker.decoded(path)?;
        self.resources.set_sound(path, handle)?;
        log::debug!("Decoded {}", path);
        let setup = self.machine.sound_decoded();
        let on_loaded = self.batch.as_mut().and_then(|b| b.decoded());
        self.complete(game, setup, on_loaded);
        Ok(())
    }

    fn batch_fetched(&mut self, game: &mut G) {
        self.tracker.request_decodes();
        let audio = self.tracker.awaiting_decode();
        log::info!("Batch fetched; {} sound(s) to decode", audio);
        let setup = self.machine.batch_fetched(audio);
        let on_loaded = self.batch.as_mut().and_then(|b| b.fetched(audio));
        self.complete(game, setup, on_loaded);
    }

    /// Retire the finished batch, then run its callbacks. Batches started
    /// from inside a callback survive.
    fn complete(&mut self, game: &mut G, setup: Option<StateFn<G>>, on_loaded: Option<StateFn<G>>) {
        if on_loaded.is_some() {
            self.batch = None;
            self.tracker.finish();
            self.remove_font_samples();
        }
        if let Some(setup) = setup {
            self.run_setup(game, setup);
        }
        if let Some(on_loaded) = on_loaded {
            on_loaded(game, self);
        }
    }

    /// Tear down loading artefacts and run setup exactly once.
    fn run_setup(&mut self, game: &mut G, setup: StateFn<G>) {
        self.tracker.finish();
        self.frame_loop.clear_state();
        self.remove_font_samples();
        if let Some(bar) = self.progress_bar.take() {
            log::debug!("Removing loading bar");
            bar.remove(&mut self.scene);
        }
        log::info!("Running setup");
        setup(game, self);
    }

    fn add_font_sample(&mut self, path: &str) -> Result<()> {
        let family = self.resources.font(path)?.to_string();
        let style = TextStyle {
            content: ".".to_string(),
            font: format!("10px {family}"),
            fill: 0x000000,
        };
        let id = self.scene.next_id();
        let mut sample = DisplayNode::new(id, NodeKind::Text(style)).with_tag("font_sample");
        sample.alpha = 0.0;
        self.scene.spawn(sample);
        let root = self.scene.root();
        self.scene.add_child(root, id)?;
        self.font_samples.push(id);
        Ok(())
    }

    fn remove_font_samples(&mut self) {
        if self.font_samples.is_empty() {
            return;
        }
        log::debug!("Removing {} font sample(s)", self.font_samples.len());
        for id in self.font_samples.drain(..) {
            self.scene.despawn(id);
        }
    }

    /// One logic update: modules, then input callbacks, then the state
    /// function unless paused.
    pub fn update(&mut self, game: &mut G) {
        let dt = self.clock.dt();
        self.modules.update(&mut self.scene, dt);
        self.dispatch_input(game);
        if let Some(state) = self.frame_loop.begin_update() {
            state(game, self);
        }
    }

    /// Advance by one host frame. Returns true when the render buffer was rebuilt.
    pub fn tick(&mut self, game: &mut G, frame_dt: f32) -> bool {
        if !self.frame_loop.is_running() {
            return false;
        }
        let steps = self.clock.advance(frame_dt);
        for _ in 0..steps.updates {
            if self.interpolate {
                self.scene.capture_previous();
            }
            self.update(game);
        }
        if steps.render {
            let interpolation = self.interpolate.then_some(Interpolation {
                alpha: steps.alpha,
                properties: self.interpolation,
            });
            build_render_buffer(&self.scene, &mut self.render_buffer, interpolation);
        }
        steps.render
    }

    // -- Lifecycle --

    pub fn state(&self) -> Option<StateFn<G>> {
        self.frame_loop.state()
    }

    pub fn set_state(&mut self, state: StateFn<G>) {
        self.frame_loop.set_state(state);
    }

    pub fn clear_state(&mut self) {
        self.frame_loop.clear_state();
    }

    pub fn behavior(&self) -> Behavior<G> {
        self.frame_loop.behavior()
    }

    pub fn pause(&mut self) {
        self.frame_loop.pause();
    }

    pub fn resume(&mut self) {
        self.frame_loop.resume();
    }

    pub fn is_paused(&self) -> bool {
        self.frame_loop.is_paused()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn phase(&self) -> LoadPhase {
        self.machine.phase()
    }

    pub fn update_count(&self) -> u64 {
        self.frame_loop.update_count()
    }

    // -- Surface settings --

    pub fn fps(&self) -> f32 {
        self.clock.fps()
    }

    pub fn set_fps(&mut self, fps: f32) {
        if fps > 0.0 {
            self.clock.set_fps(fps);
        } else {
            log::warn!("Ignoring non-positive fps {}", fps);
        }
    }

    pub fn render_fps(&self) -> Option<f32> {
        self.clock.render_fps()
    }

    /// Cap renders per second; `None` renders every host frame.
    pub fn set_render_fps(&mut self, render_fps: Option<f32>) {
        match render_fps {
            Some(fps) if fps <= 0.0 => log::warn!("Ignoring non-positive renderFps {}", fps),
            _ => self.clock.set_render_fps(render_fps),
        }
    }

    pub fn interpolate(&self) -> bool {
        self.interpolate
    }

    pub fn set_interpolate(&mut self, on: bool) {
        self.interpolate = on;
    }

    pub fn interpolation_properties(&self) -> InterpolationProperties {
        self.interpolation
    }

    pub fn set_interpolation_properties(&mut self, properties: InterpolationProperties) {
        self.interpolation = properties;
    }

    pub fn border(&self) -> Option<&str> {
        self.canvas.border.as_deref()
    }

    pub fn set_border(&mut self, border: Option<String>) {
        self.canvas.border = border;
    }

    pub fn background_color(&self) -> u32 {
        self.canvas.background_color
    }

    pub fn set_background_color(&mut self, color: u32) {
        self.canvas.background_color = color;
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scale(&self) -> f32 {
        self.canvas.scale()
    }

    /// React to a window resize; pointer coordinates follow the new scale.
    pub fn resize(&mut self, window_width: f32, window_height: f32) -> f32 {
        let scale = self.canvas.resize(window_width, window_height);
        self.modules.interactive.set_scale(scale);
        scale
    }

    // -- Resources --

    pub fn image(&self, name: &str) -> Result<&Texture> {
        self.resources.texture(name)
    }

    pub fn sound(&self, name: &str) -> Result<SoundHandle> {
        self.resources.sound(name)
    }

    pub fn json(&self, name: &str) -> Result<&serde_json::Value> {
        self.resources.json(name)
    }

    pub fn xml(&self, name: &str) -> Result<&str> {
        self.resources.xml(name)
    }

    pub fn resources(&self) -> &ResourceTable {
        &self.resources
    }

    /// Decoded sounds keyed by path.
    pub fn sound_objects(&self) -> impl Iterator<Item = (&str, SoundHandle)> {
        self.resources.sound_objects()
    }

    /// Percentage of the current batch that has arrived.
    pub fn loading_progress(&self) -> f32 {
        self.tracker.progress()
    }

    /// Last path that arrived.
    pub fn loading_file(&self) -> &str {
        self.tracker.file()
    }

    /// Paths still part of a batch; empty once loading has finished.
    pub fn assets_to_load(&self) -> &[String] {
        if self.frame_loop.is_running() {
            self.tracker.assets()
        } else {
            &self.initial_assets
        }
    }

    pub fn drain_fetch_requests(&mut self) -> Vec<String> {
        self.tracker.drain_fetch_requests()
    }

    pub fn drain_decode_requests(&mut self) -> Vec<String> {
        self.tracker.drain_decode_requests()
    }

    /// Show a centred progress bar while loading. Call it from the load
    /// callback; it is created on first use and removed when loading ends.
    pub fn loading_bar(&mut self) -> Result<()> {
        if self.machine.is_ready() {
            return Ok(());
        }
        let bar = match self.progress_bar {
            Some(bar) => bar,
            None => {
                let bar = ProgressBar::create(&mut self.scene)?;
                self.progress_bar = Some(bar);
                bar
            }
        };
        bar.update(&mut self.scene, self.tracker.progress());
        Ok(())
    }

    // -- Sound --

    pub fn play_sound(&mut self, name: &str) -> Result<()> {
        self.play_sound_at(name, 1.0)
    }

    pub fn play_sound_at(&mut self, name: &str, volume: f32) -> Result<()> {
        let handle = self.resources.sound(name)?;
        self.sounds.push(SoundEvent {
            handle: handle.0,
            volume: volume.clamp(0.0, 1.0),
        });
        Ok(())
    }

    pub fn drain_sounds(&mut self) -> Vec<SoundEvent> {
        std::mem::take(&mut self.sounds)
    }

    // -- Rendering --

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.render_buffer
    }

    pub fn canvas_size(&self) -> Vec2 {
        self.canvas.size()
    }
}
