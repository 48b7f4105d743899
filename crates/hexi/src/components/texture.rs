use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Index of a texture in the resource table.
/// Render instances carry this so the host can look up the source image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct TextureId(pub u32);

/// Texture sampling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ScaleMode {
    /// Smooth (bilinear) sampling.
    #[default]
    Linear,
    /// Blocky nearest-neighbour sampling, for pixel art.
    Nearest,
}

/// Pixel rectangle of a frame inside its source image.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameRect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl FrameRect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }
}

/// A named region of a loaded image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Texture {
    pub id: TextureId,
    /// Lookup name: the image path, or the frame name inside an atlas.
    pub name: String,
    /// Path of the image the pixels come from.
    pub source: String,
    pub frame: FrameRect,
    pub scale_mode: ScaleMode,
}

impl Texture {
    /// Unscaled size of the frame in pixels.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.frame.w, self.frame.h)
    }
}
