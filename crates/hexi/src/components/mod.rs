pub mod animation;
pub mod node;
pub mod texture;
