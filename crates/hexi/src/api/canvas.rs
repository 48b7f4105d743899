use glam::Vec2;
use crate::api::config::{RendererKind, SurfaceConfig};

/// The output surface as the host should present it.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
    pub renderer: RendererKind,
    pub background_color: u32,
    pub border: Option<String>,
    pub scale_to_window: bool,
    pub scale_border_color: String,
    scale: f32,
    /// Letterbox offset of the scaled canvas inside the window.
    offset: Vec2,
}

impl Canvas {
    pub fn from_surface(surface: &SurfaceConfig) -> Self {
        Self {
            width: surface.width,
            height: surface.height,
            renderer: surface.renderer,
            background_color: surface.background_color,
            border: surface.border.clone(),
            scale_to_window: surface.scale_to_window,
            scale_border_color: surface.scale_border_color.clone(),
            scale: 1.0,
            offset: Vec2::ZERO,
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Uniform scale that fits the canvas inside the window, and the
    /// offset that centres it on the longer axis.
    pub fn fit_to_window(&self, window_width: f32, window_height: f32) -> (f32, Vec2) {
        if !(window_width > 0.0 && window_height > 0.0) {
            return (1.0, Vec2::ZERO);
        }
        let scale = (window_width / self.width).min(window_height / self.height);
        let scaled = self.size() * scale;
        let offset = (Vec2::new(window_width, window_height) - scaled) / 2.0;
        (scale, offset)
    }

    /// Rescale for a new window size. Returns the scale now in effect.
    pub fn resize(&mut self, window_width: f32, window_height: f32) -> f32 {
        if self.scale_to_window {
            let (scale, offset) = self.fit_to_window(window_width, window_height);
            self.scale = scale;
            self.offset = offset;
            log::debug!("Canvas scaled to {:.3} (offset {:.1}, {:.1})", scale, offset.x, offset.y);
        }
        self.scale
    }
}
