//! Browser bindings
//!
//! The page owns the canvas and the animation frame loop; it forwards DOM
//! events to [`WebGame`] and draws the JSON snapshot each tick returns.

use wasm_bindgen::prelude::*;

use super::Game;
use crate::config::Tuning;
use crate::levels::LevelSet;
use crate::persistence::LocalStorageStore;

#[wasm_bindgen]
pub struct WebGame {
    game: Game<LocalStorageStore>,
}

#[wasm_bindgen]
impl WebGame {
    /// Build a session for a square game area of `width` CSS pixels.
    /// `levels_json` may be empty to use the built-in levels.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, levels_json: &str) -> Result<WebGame, JsValue> {
        console_error_panic_hook::set_once();
        // A second instance finds the logger already set
        let _ = console_log::init_with_level(log::Level::Info);

        let mut tuning = Tuning::load();
        tuning.seed = js_sys::Date::now() as u64;

        let levels = if levels_json.trim().is_empty() {
            LevelSet::default()
        } else {
            LevelSet::from_json(levels_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };

        let game = Game::new(tuning, levels, width, LocalStorageStore)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Brick Breaker starting ({} levels)", game.state().levels.len());
        Ok(WebGame { game })
    }

    /// Advance one tick and return the frame as JSON
    pub fn on_tick(&mut self, elapsed_ms: f64) -> Result<String, JsValue> {
        self.game
            .on_tick(elapsed_ms)
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn on_key_pressed(&mut self, code: u32) {
        self.game.on_key_pressed(code);
    }

    pub fn on_key_released(&mut self, code: u32) {
        self.game.on_key_released(code);
    }

    pub fn on_touch_started(&mut self, x: f32, y: f32) {
        self.game.on_touch_started(x, y);
    }

    pub fn on_touch_released(&mut self) {
        self.game.on_touch_released();
    }

    pub fn on_resize(&mut self, x: f32, y: f32, width: f32) {
        self.game.on_resize(x, y, width);
    }

    pub fn on_blur(&mut self) {
        self.game.on_blur();
    }

    /// Pixels per logical unit, for scaling the drawing
    pub fn resize_factor(&self) -> f32 {
        self.game.layout().resize_factor()
    }

    pub fn restart(&mut self) -> Result<(), JsValue> {
        self.game
            .restart()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
