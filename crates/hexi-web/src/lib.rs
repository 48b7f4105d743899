pub mod runner;

pub use runner::HexiRunner;

/// Generate all `#[wasm_bindgen]` exports for a game.
///
/// Generates:
/// - `thread_local!` storage for the HexiRunner
/// - `with_runner()` helper function
/// - All wasm-bindgen exports (game_init, game_tick, input handlers,
///   asset delivery, data accessors)
///
/// # Usage
///
/// ```ignore
/// use wasm_bindgen::prelude::*;
/// use hexi::*;
///
/// mod game;
/// use game::MyGame;
///
/// hexi_web::export_game!(MyGame, "my-game");
/// ```
///
/// # Arguments
///
/// - `$game_type`: The game struct type that implements `hexi::Game` and has a `new()` constructor
/// - `$game_name`: A string literal used in log messages
///
/// Calls made before `game_init()` succeeds are logged and return a zero value.
#[macro_export]
macro_rules! export_game {
    ($game_type:ty, $game_name:literal) => {
        use std::cell::RefCell;

        thread_local! {
            static RUNNER: RefCell<Option<$crate::HexiRunner<$game_type>>> = RefCell::new(None);
        }

        fn with_runner<R: Default>(f: impl FnOnce(&mut $crate::HexiRunner<$game_type>) -> R) -> R {
            RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
                Some(runner) => f(runner),
                None => {
                    log::error!("{}: not initialized, call game_init() first", $game_name);
                    R::default()
                }
            })
        }

        fn report(result: std::result::Result<(), hexi::HexiError>) {
            if let Err(err) = result {
                log::error!("{}: {}", $game_name, err);
            }
        }

        #[wasm_bindgen]
        pub fn game_init() {
            console_error_panic_hook::set_once();
            let _ = console_log::init_with_level(log::Level::Info);

            let game = <$game_type>::new();
            match $crate::HexiRunner::new(game) {
                Ok(runner) => {
                    RUNNER.with(|cell| {
                        *cell.borrow_mut() = Some(runner);
                    });
                    with_runner(|r| r.start());
                    log::info!("{}: initialized", $game_name);
                }
                Err(err) => log::error!("{}: {}", $game_name, err),
            }
        }

        #[wasm_bindgen]
        pub fn game_tick(dt: f32) -> bool {
            with_runner(|r| r.tick(dt))
        }

        #[wasm_bindgen]
        pub fn game_pointer_down(x: f32, y: f32) {
            with_runner(|r| r.push_input(hexi::InputEvent::PointerDown { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_up(x: f32, y: f32) {
            with_runner(|r| r.push_input(hexi::InputEvent::PointerUp { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_pointer_move(x: f32, y: f32) {
            with_runner(|r| r.push_input(hexi::InputEvent::PointerMove { x, y }));
        }

        #[wasm_bindgen]
        pub fn game_key_down(key_code: u32) {
            with_runner(|r| r.push_input(hexi::InputEvent::KeyDown { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_key_up(key_code: u32) {
            with_runner(|r| r.push_input(hexi::InputEvent::KeyUp { key_code }));
        }

        #[wasm_bindgen]
        pub fn game_resize(window_width: f32, window_height: f32) -> f32 {
            with_runner(|r| r.resize(window_width, window_height))
        }

        // ---- Asset loading ----

        #[wasm_bindgen]
        pub fn game_fetch_requests() -> String {
            with_runner(|r| r.fetch_requests_json())
        }

        #[wasm_bindgen]
        pub fn game_decode_requests() -> String {
            with_runner(|r| r.decode_requests_json())
        }

        #[wasm_bindgen]
        pub fn game_image_loaded(path: &str, width: f32, height: f32) {
            report(with_runner(|r| Some(r.image_loaded(path, width, height))).unwrap_or(Ok(())));
        }

        #[wasm_bindgen]
        pub fn game_text_loaded(path: &str, text: String) {
            report(with_runner(|r| Some(r.text_loaded(path, text))).unwrap_or(Ok(())));
        }

        #[wasm_bindgen]
        pub fn game_bytes_loaded(path: &str, bytes: Vec<u8>) {
            report(with_runner(|r| Some(r.bytes_loaded(path, bytes))).unwrap_or(Ok(())));
        }

        #[wasm_bindgen]
        pub fn game_audio_decoded(path: &str, handle: u32) {
            report(with_runner(|r| Some(r.audio_decoded(path, handle))).unwrap_or(Ok(())));
        }

        #[wasm_bindgen]
        pub fn get_loading_progress() -> f32 {
            with_runner(|r| r.loading_progress())
        }

        #[wasm_bindgen]
        pub fn get_loading_file() -> String {
            with_runner(|r| r.loading_file())
        }

        // ---- Data accessors ----

        #[wasm_bindgen]
        pub fn get_instances_ptr() -> *const f32 {
            with_runner(|r| Some(r.instances_ptr())).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_instance_count() -> u32 {
            with_runner(|r| r.instance_count())
        }

        #[wasm_bindgen]
        pub fn get_labels() -> String {
            with_runner(|r| r.labels_json())
        }

        #[wasm_bindgen]
        pub fn get_textures() -> String {
            with_runner(|r| r.textures_json())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_ptr() -> *const f32 {
            with_runner(|r| Some(r.sound_events_ptr())).unwrap_or(std::ptr::null())
        }

        #[wasm_bindgen]
        pub fn get_sound_events_len() -> u32 {
            with_runner(|r| r.sound_events_len())
        }

        // ---- Canvas accessors ----

        #[wasm_bindgen]
        pub fn get_canvas_width() -> f32 {
            with_runner(|r| r.canvas_width())
        }

        #[wasm_bindgen]
        pub fn get_canvas_height() -> f32 {
            with_runner(|r| r.canvas_height())
        }

        #[wasm_bindgen]
        pub fn get_scale() -> f32 {
            with_runner(|r| r.scale())
        }

        #[wasm_bindgen]
        pub fn get_renderer() -> String {
            with_runner(|r| r.renderer())
        }

        #[wasm_bindgen]
        pub fn get_background_color() -> u32 {
            with_runner(|r| r.background_color())
        }

        #[wasm_bindgen]
        pub fn get_border() -> String {
            with_runner(|r| r.border())
        }

        #[wasm_bindgen]
        pub fn get_scale_to_window() -> bool {
            with_runner(|r| r.scale_to_window())
        }

        #[wasm_bindgen]
        pub fn get_scale_border_color() -> String {
            with_runner(|r| r.scale_border_color())
        }
    };
}
