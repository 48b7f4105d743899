pub mod instance;

pub use instance::{RenderBuffer, RenderInstance, RenderKind, RenderLabel};
