pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod renderer;
pub mod input;
pub mod assets;
pub mod extensions;

// Re-export key types at crate root for convenience
pub use api::canvas::Canvas;
pub use api::config::{HexiConfig, InterpolationProperties, RendererKind, SurfaceConfig};
pub use api::delegate::{Delegate, DELEGATES};
pub use api::error::{HexiError, Result};
pub use api::game::Game;
pub use api::hexi::Hexi;
pub use api::types::{NodeId, SoundEvent, SoundHandle};
pub use assets::{AssetKind, Atlas, LoadTracker, Payload, ProgressBar, Resource, ResourceTable};
pub use components::animation::FramePlayer;
pub use components::node::{DisplayNode, NodeKind, ShapeStyle, TextStyle};
pub use components::texture::{FrameRect, ScaleMode, Texture, TextureId};
pub use core::augment::{Bounds, NodeMut, NodeRef, Placement};
pub use core::lifecycle::{Behavior, FrameLoop, FrameModule, Modules, NodeFn, StateFn, UPDATE_ORDER};
pub use core::loading::{Countdown, LoadPhase, LoadingStateMachine};
pub use core::scene::Scene;
pub use core::time::{FrameClock, FrameSteps};
pub use input::{keys, ButtonAction, ButtonEvent, ButtonState, InputEvent, InputQueue, Interactive, KeyEvent, Pointer};
pub use renderer::instance::{RenderBuffer, RenderInstance, RenderKind, RenderLabel};
pub use systems::collision::Edges;
pub use systems::particles::{EmitterId, ParticleBurst, ParticleSystem};
pub use systems::render::{build_render_buffer, Interpolation};
pub use systems::rng::Rng;

// Extensions: frame-based tweening
pub use extensions::{
    Easing, lerp, lerp_vec2, ease, ease_vec2,
    TweenState, Tween, TweenId, TweenTarget, TweenLoop, DEFAULT_TWEEN_FRAMES,
};
