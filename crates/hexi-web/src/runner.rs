use hexi::{Game, Hexi, HexiError, InputEvent, Payload, RendererKind, SoundEvent, SoundHandle};

/// Generic runner that owns a game value and its facade.
///
/// Each concrete game creates a `thread_local!` HexiRunner and exports free
/// functions via `#[wasm_bindgen]`, because wasm-bindgen cannot export
/// generic structs directly.
pub struct HexiRunner<G: Game> {
    game: G,
    hexi: Hexi<G>,
    /// Sound events of the last tick as `[handle, volume]` float pairs.
    sound_buffer: Vec<f32>,
    /// Text labels of the last render, as JSON.
    labels_json: String,
}

impl<G: Game> HexiRunner<G> {
    /// Build the facade from the game's configuration.
    pub fn new(game: G) -> Result<Self, HexiError> {
        let hexi = Hexi::new(game.config())?;
        Ok(Self {
            game,
            hexi,
            sound_buffer: Vec::with_capacity(32),
            labels_json: String::from("[]"),
        })
    }

    /// Start loading, or run setup straight away when there are no assets.
    pub fn start(&mut self) {
        self.hexi.start(&mut self.game);
        self.collect_sounds();
    }

    /// Advance one display frame. Returns true when a new render list is ready.
    pub fn tick(&mut self, dt: f32) -> bool {
        let rendered = self.hexi.tick(&mut self.game, dt);
        if rendered {
            self.labels_json = serde_json::to_string(&self.hexi.render_buffer().labels)
                .unwrap_or_else(|_| String::from("[]"));
        }
        self.collect_sounds();
        rendered
    }

    fn collect_sounds(&mut self) {
        self.sound_buffer.clear();
        for SoundEvent { handle, volume } in self.hexi.drain_sounds() {
            self.sound_buffer.push(handle as f32);
            self.sound_buffer.push(volume);
        }
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.hexi.push_input(event);
    }

    pub fn resize(&mut self, window_width: f32, window_height: f32) -> f32 {
        self.hexi.resize(window_width, window_height)
    }

    // ---- Loading ----

    /// Paths the host should fetch, as a JSON array.
    pub fn fetch_requests_json(&mut self) -> String {
        serde_json::to_string(&self.hexi.drain_fetch_requests()).unwrap_or_else(|_| String::from("[]"))
    }

    /// Fetched sounds the host should decode, as a JSON array.
    pub fn decode_requests_json(&mut self) -> String {
        serde_json::to_string(&self.hexi.drain_decode_requests()).unwrap_or_else(|_| String::from("[]"))
    }

    pub fn image_loaded(&mut self, path: &str, width: f32, height: f32) -> Result<(), HexiError> {
        self.deliver(path, Payload::Image { width, height })
    }

    pub fn text_loaded(&mut self, path: &str, text: String) -> Result<(), HexiError> {
        self.deliver(path, Payload::Text(text))
    }

    pub fn bytes_loaded(&mut self, path: &str, bytes: Vec<u8>) -> Result<(), HexiError> {
        self.deliver(path, Payload::Bytes(bytes))
    }

    fn deliver(&mut self, path: &str, payload: Payload) -> Result<(), HexiError> {
        let result = self.hexi.resource_fetched(&mut self.game, path, payload);
        self.collect_sounds();
        result
    }

    pub fn audio_decoded(&mut self, path: &str, handle: u32) -> Result<(), HexiError> {
        let result = self.hexi.audio_decoded(&mut self.game, path, SoundHandle(handle));
        self.collect_sounds();
        result
    }

    pub fn loading_progress(&self) -> f32 {
        self.hexi.loading_progress()
    }

    pub fn loading_file(&self) -> String {
        self.hexi.loading_file().to_string()
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn instances_ptr(&self) -> *const f32 {
        self.hexi.render_buffer().instances_ptr()
    }

    pub fn instance_count(&self) -> u32 {
        self.hexi.render_buffer().instance_count()
    }

    pub fn labels_json(&self) -> String {
        self.labels_json.clone()
    }

    /// Texture table (id, name, source, frame, scale mode) as JSON.
    pub fn textures_json(&self) -> String {
        serde_json::to_string(self.hexi.resources().textures()).unwrap_or_else(|_| String::from("[]"))
    }

    pub fn sound_events_ptr(&self) -> *const f32 {
        self.sound_buffer.as_ptr()
    }

    /// Number of sound events (each is `SoundEvent::FLOATS` floats).
    pub fn sound_events_len(&self) -> u32 {
        (self.sound_buffer.len() / SoundEvent::FLOATS) as u32
    }

    // ---- Canvas accessors ----

    pub fn canvas_width(&self) -> f32 {
        self.hexi.canvas().width
    }

    pub fn canvas_height(&self) -> f32 {
        self.hexi.canvas().height
    }

    pub fn scale(&self) -> f32 {
        self.hexi.scale()
    }

    pub fn renderer(&self) -> String {
        match self.hexi.canvas().renderer {
            RendererKind::Auto => "auto",
            RendererKind::Canvas => "canvas",
            RendererKind::Webgl => "webgl",
        }
        .to_string()
    }

    pub fn background_color(&self) -> u32 {
        self.hexi.background_color()
    }

    pub fn border(&self) -> String {
        self.hexi.border().unwrap_or_default().to_string()
    }

    pub fn scale_to_window(&self) -> bool {
        self.hexi.canvas().scale_to_window
    }

    pub fn scale_border_color(&self) -> String {
        self.hexi.canvas().scale_border_color.clone()
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn hexi(&self) -> &Hexi<G> {
        &self.hexi
    }
}
