pub mod animation;
pub mod collision;
pub mod particles;
pub mod render;
pub mod rng;
