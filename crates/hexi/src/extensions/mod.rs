// extensions/mod.rs
//
// Frame-based tweening. Decoupled from the display tree internals:
// tweens address nodes by NodeId and write through the Scene.

pub mod easing;
pub mod tween;

pub use easing::{Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use tween::{TweenState, Tween, TweenId, TweenTarget, TweenLoop, DEFAULT_TWEEN_FRAMES};
