//! Platform abstraction layer
//!
//! [`Game`] is the host-facing session: it turns browser-style callbacks
//! (ticks, key codes, pointer coordinates, resizes) into simulation input and
//! hands back a [`FrameSnapshot`] per tick. The wasm wrapper lives in `web`.

pub mod input;
pub mod layout;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{KeyTracker, keys};
pub use layout::Layout;

use crate::config::Tuning;
use crate::error::GameError;
use crate::levels::LevelSet;
use crate::persistence::HighScoreStore;
use crate::score::ScoreBoard;
use crate::sim::{Direction, FrameSnapshot, GamePhase, GameState, tick};

/// One game session bound to a high score store
pub struct Game<S: HighScoreStore> {
    state: GameState,
    keys: KeyTracker,
    layout: Layout,
    store: S,
    /// Arrow key held through an on-screen button
    touch_key: Option<u32>,
}

impl<S: HighScoreStore> Game<S> {
    /// Session over a square game area of `width` logical units
    pub fn new(tuning: Tuning, levels: LevelSet, width: f32, store: S) -> Result<Self, GameError> {
        let high_score = ScoreBoard::from_store(&store).high_score;
        let state = GameState::new(tuning, levels, width, high_score)?;
        Ok(Self {
            layout: Layout::new(state.area_width),
            state,
            keys: KeyTracker::new(),
            store,
            touch_key: None,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Advance one tick; `elapsed_ms` is the time since the previous tick
    pub fn on_tick(&mut self, elapsed_ms: f64) -> FrameSnapshot {
        let input = self.keys.snapshot();
        tick(&mut self.state, &input, elapsed_ms, &mut self.store);
        FrameSnapshot::capture(&self.state)
    }

    pub fn on_key_pressed(&mut self, code: u32) {
        self.keys.on_key_pressed(code);
    }

    pub fn on_key_released(&mut self, code: u32) {
        self.keys.on_key_released(code);
    }

    /// A tap inside the game area launches the ball; a tap on a button strip
    /// below it holds that arrow until release.
    pub fn on_touch_started(&mut self, x: f32, y: f32) {
        if self.layout.to_local(x, y).is_some() {
            if self.state.phase == GamePhase::Serve {
                self.keys.request_launch();
            }
            return;
        }
        let code = match self.layout.button_at(x, y) {
            Some(Direction::Left) => keys::LEFT,
            Some(Direction::Right) => keys::RIGHT,
            _ => return,
        };
        if let Some(previous) = self.touch_key.replace(code) {
            self.keys.on_key_released(previous);
        }
        self.keys.on_key_pressed(code);
    }

    pub fn on_touch_released(&mut self) {
        if let Some(code) = self.touch_key.take() {
            self.keys.on_key_released(code);
        }
    }

    pub fn on_resize(&mut self, x: f32, y: f32, width: f32) {
        self.layout.resize(x, y, width);
        log::debug!("Game area at ({x}, {y}), width {width}");
    }

    /// Window lost focus: no key stays stuck down
    pub fn on_blur(&mut self) {
        self.keys.release_all();
        self.touch_key = None;
    }

    /// Start over after the game was cleared (or at any time)
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.state.restart()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn game() -> Game<MemoryStore> {
        Game::new(
            Tuning::default(),
            LevelSet::default(),
            400.0,
            MemoryStore::with_score(1234),
        )
        .unwrap()
    }

    #[test]
    fn test_reads_stored_high_score() {
        let mut g = game();
        let snap = g.on_tick(16.0);
        assert_eq!(snap.high_score, 1234);
        assert_eq!(snap.phase, GamePhase::Serve);
    }

    #[test]
    fn test_space_launches() {
        let mut g = game();
        g.on_key_pressed(keys::SPACE);
        assert_eq!(g.on_tick(16.0).phase, GamePhase::Playing);
    }

    #[test]
    fn test_tap_inside_area_launches() {
        let mut g = game();
        g.on_resize(50.0, 0.0, 800.0);
        g.on_touch_started(10.0, 10.0);
        assert_eq!(g.on_tick(16.0).phase, GamePhase::Serve);
        g.on_touch_started(400.0, 400.0);
        assert_eq!(g.on_tick(16.0).phase, GamePhase::Playing);
    }

    #[test]
    fn test_arrow_keys_move_paddle() {
        let mut g = game();
        let start = g.state().paddle.pos.x;
        g.on_key_pressed(keys::LEFT);
        g.on_tick(16.0);
        g.on_tick(16.0);
        assert_eq!(g.state().paddle.pos.x, start - 8.0);
        g.on_key_released(keys::LEFT);
        g.on_tick(16.0);
        assert_eq!(g.state().paddle.pos.x, start - 8.0);
    }

    #[test]
    fn test_button_strip_holds_arrow() {
        let mut g = game();
        let start = g.state().paddle.pos.x;
        g.on_touch_started(300.0, 450.0);
        g.on_tick(16.0);
        assert_eq!(g.state().paddle.pos.x, start + 4.0);
        g.on_touch_released();
        g.on_tick(16.0);
        assert_eq!(g.state().paddle.pos.x, start + 4.0);
    }
}
