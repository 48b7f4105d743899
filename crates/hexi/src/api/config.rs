use serde::{Deserialize, Serialize};
use crate::api::error::{HexiError, Result};
use crate::core::lifecycle::{FrameModule, StateFn};

/// Rendering backend the host should create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Auto,
    Canvas,
    Webgl,
}

/// Which node properties are blended between logic updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpolationProperties {
    pub position: bool,
    pub rotation: bool,
    pub size: bool,
    pub alpha: bool,
}

impl Default for InterpolationProperties {
    fn default() -> Self {
        Self {
            position: true,
            rotation: true,
            size: true,
            alpha: true,
        }
    }
}

/// Output surface options. Everything a game can configure except the
/// callbacks; loadable from JSON with camelCase keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    /// Canvas width in pixels.
    pub width: f32,
    /// Canvas height in pixels.
    pub height: f32,
    /// Resource paths fetched before setup runs.
    #[serde(default)]
    pub assets: Vec<String>,
    #[serde(default)]
    pub renderer: RendererKind,
    /// 0xRRGGBB clear colour.
    #[serde(default)]
    pub background_color: u32,
    /// CSS border applied to the canvas element, e.g. `"1px dashed black"`.
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub scale_to_window: bool,
    #[serde(default = "default_scale_border_color")]
    pub scale_border_color: String,
    #[serde(default = "default_true")]
    pub interpolate: bool,
    #[serde(default)]
    pub interpolation_properties: InterpolationProperties,
    /// Logic updates per second.
    #[serde(default = "default_fps")]
    pub fps: f32,
    /// Optional cap on renders per second.
    #[serde(default)]
    pub render_fps: Option<f32>,
}

fn default_scale_border_color() -> String {
    "#2C3539".to_string()
}

fn default_true() -> bool {
    true
}

fn default_fps() -> f32 {
    60.0
}

impl SurfaceConfig {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            assets: Vec::new(),
            renderer: RendererKind::Auto,
            background_color: 0x000000,
            border: None,
            scale_to_window: false,
            scale_border_color: default_scale_border_color(),
            interpolate: true,
            interpolation_properties: InterpolationProperties::default(),
            fps: default_fps(),
            render_fps: None,
        }
    }

    /// Parse surface options from JSON.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reject sizes and rates the clock and canvas cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(HexiError::Config(format!(
                "canvas size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fps > 0.0) {
            return Err(HexiError::Config(format!("fps must be positive, got {}", self.fps)));
        }
        if let Some(render_fps) = self.render_fps {
            if !(render_fps > 0.0) {
                return Err(HexiError::Config(format!("renderFps must be positive, got {render_fps}")));
            }
        }
        Ok(())
    }
}

/// Everything needed to construct a facade: surface options, the
/// lifecycle callbacks and any extra frame modules.
pub struct HexiConfig<G> {
    pub surface: SurfaceConfig,
    /// Runs exactly once when loading completes. Required.
    pub setup: Option<StateFn<G>>,
    /// Runs every update while assets are loading.
    pub load: Option<StateFn<G>>,
    /// Updated after the built-in modules, in this order.
    pub modules: Vec<Box<dyn FrameModule>>,
    /// Seed for the facade's random number generator.
    pub seed: u64,
}

impl<G> HexiConfig<G> {
    pub fn new(width: f32, height: f32) -> Self {
        Self::from_surface(SurfaceConfig::new(width, height))
    }

    pub fn from_surface(surface: SurfaceConfig) -> Self {
        Self {
            surface,
            setup: None,
            load: None,
            modules: Vec::new(),
            seed: 0x9E37_79B9_7F4A_7C15,
        }
    }

    // -- Builder pattern --

    pub fn with_setup(mut self, setup: StateFn<G>) -> Self {
        self.setup = Some(setup);
        self
    }

    pub fn with_load(mut self, load: StateFn<G>) -> Self {
        self.load = Some(load);
        self
    }

    pub fn with_assets<I, S>(mut self, assets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.surface.assets = assets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_renderer(mut self, renderer: RendererKind) -> Self {
        self.surface.renderer = renderer;
        self
    }

    pub fn with_background_color(mut self, color: u32) -> Self {
        self.surface.background_color = color;
        self
    }

    pub fn with_border(mut self, border: impl Into<String>) -> Self {
        self.surface.border = Some(border.into());
        self
    }

    pub fn with_scale_to_window(mut self, on: bool) -> Self {
        self.surface.scale_to_window = on;
        self
    }

    pub fn with_scale_border_color(mut self, color: impl Into<String>) -> Self {
        self.surface.scale_border_color = color.into();
        self
    }

    pub fn with_interpolation(mut self, on: bool, properties: InterpolationProperties) -> Self {
        self.surface.interpolate = on;
        self.surface.interpolation_properties = properties;
        self
    }

    pub fn with_fps(mut self, fps: f32) -> Self {
        self.surface.fps = fps;
        self
    }

    pub fn with_render_fps(mut self, render_fps: f32) -> Self {
        self.surface.render_fps = Some(render_fps);
        self
    }

    pub fn with_module(mut self, module: impl FrameModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration and hand back the required setup callback.
    pub(crate) fn validate(&self) -> Result<StateFn<G>> {
        let setup = self.setup.ok_or(HexiError::MissingSetup)?;
        self.surface.validate()?;
        Ok(setup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::hexi::Hexi;

    fn setup(_: &mut (), _: &mut Hexi<()>) {}

    #[test]
    fn json_defaults() {
        let surface = SurfaceConfig::from_json(r#"{ "width": 512, "height": 512 }"#).unwrap();
        assert_eq!(surface.fps, 60.0);
        assert!(surface.interpolate);
        assert_eq!(surface.renderer, RendererKind::Auto);
        assert_eq!(surface.scale_border_color, "#2C3539");
        assert!(surface.assets.is_empty());
        assert_eq!(surface.interpolation_properties, InterpolationProperties::default());
    }

    #[test]
    fn json_camel_case_keys() {
        let json = r#"{
            "width": 320,
            "height": 240,
            "assets": ["images/cat.png", "sounds/bounce.wav"],
            "renderer": "webgl",
            "backgroundColor": 16777215,
            "scaleToWindow": true,
            "renderFps": 30,
            "interpolationProperties": { "rotation": false }
        }"#;
        let surface = SurfaceConfig::from_json(json).unwrap();
        assert_eq!(surface.assets.len(), 2);
        assert_eq!(surface.renderer, RendererKind::Webgl);
        assert_eq!(surface.background_color, 0xFFFFFF);
        assert!(surface.scale_to_window);
        assert_eq!(surface.render_fps, Some(30.0));
        assert!(!surface.interpolation_properties.rotation);
        assert!(surface.interpolation_properties.position);
    }

    #[test]
    fn width_and_height_are_required() {
        assert!(SurfaceConfig::from_json(r#"{ "width": 100 }"#).is_err());
    }

    #[test]
    fn missing_setup_is_rejected() {
        let config = HexiConfig::<()>::new(100.0, 100.0);
        assert!(matches!(config.validate(), Err(HexiError::MissingSetup)));
    }

    #[test]
    fn bad_sizes_are_rejected() {
        let config = HexiConfig::<()>::new(0.0, 100.0).with_setup(setup);
        assert!(matches!(config.validate(), Err(HexiError::Config(_))));
        let config = HexiConfig::<()>::new(10.0, 10.0).with_setup(setup).with_fps(0.0);
        assert!(matches!(config.validate(), Err(HexiError::Config(_))));
        let config = HexiConfig::<()>::new(10.0, 10.0).with_setup(setup).with_render_fps(-1.0);
        assert!(matches!(config.validate(), Err(HexiError::Config(_))));
    }

    #[test]
    fn builder_sets_surface() {
        let config = HexiConfig::<()>::new(10.0, 20.0)
            .with_setup(setup)
            .with_assets(["a.png", "b.wav"])
            .with_border("1px dashed black")
            .with_fps(30.0);
        assert!(config.validate().is_ok());
        assert_eq!(config.surface.assets, vec!["a.png".to_string(), "b.wav".to_string()]);
        assert_eq!(config.surface.border.as_deref(), Some("1px dashed black"));
        assert_eq!(config.surface.fps, 30.0);
    }
}
