//! Gameplay tuning
//!
//! Every balance constant lives here so a host can override them from JSON.
//! Persisted separately from the high score in LocalStorage.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Data-driven game balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Paddle ===
    /// Paddle displacement per tick while an arrow is held
    pub paddle_speed: f32,
    /// Added to paddle speed on every level advance
    pub paddle_speed_increase: f32,
    /// Paddle width as a fraction of play-area width (rounded up)
    pub paddle_width_ratio: f32,
    pub paddle_height: f32,

    // === Ball ===
    /// Baseline per-axis ball speed; decay never goes below this
    pub ball_speed: f32,
    /// Added to ball speed on every level advance
    pub ball_speed_increase: f32,
    pub ball_diameter: f32,
    /// Multiplier applied on border and paddle bounces
    pub acceleration_factor: f32,
    /// Ticks over which excess speed decays back to baseline
    pub deceleration_ticks: f32,

    // === Blocks ===
    /// Row height as a fraction of play-area width
    pub block_height_ratio: f32,
    /// Time a hit block stays collision-disabled (ms)
    pub block_flash_ms: f64,

    // === Session ===
    pub initial_lives: u8,
    pub initial_level: usize,
    /// Delay before the next level is built (ms)
    pub level_load_delay_ms: f64,
    /// Score bar height as a fraction of play-area width
    pub score_bar_ratio: f32,
    /// Seed for power-up effect selection
    pub seed: u64,

    // === Power-ups ===
    pub power_up_width: f32,
    pub power_up_height: f32,
    pub power_up_fall_speed: f32,
    /// Extra balls spawned by the multi-ball effect
    pub multi_ball_count: usize,
    /// How long the pistol paddle stays armed (ms)
    pub pistol_duration_ms: f64,
    /// Interval between pistol volleys (ms)
    pub pistol_fire_interval_ms: f64,

    // === Bullets ===
    pub bullet_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            paddle_speed: 4.0,
            paddle_speed_increase: 0.25,
            paddle_width_ratio: 0.2,
            paddle_height: 20.0,

            ball_speed: 4.0,
            ball_speed_increase: 0.2,
            ball_diameter: 20.0,
            acceleration_factor: 1.5,
            deceleration_ticks: 90.0, // 1.5 s at 60 fps

            block_height_ratio: 0.05,
            block_flash_ms: 150.0,

            initial_lives: 3,
            initial_level: 0,
            level_load_delay_ms: 3500.0,
            score_bar_ratio: 0.07,
            seed: 0x5EED,

            power_up_width: 50.0,
            power_up_height: 35.0,
            power_up_fall_speed: 2.0,
            multi_ball_count: 2,
            pistol_duration_ms: 8000.0,
            pistol_fire_interval_ms: 800.0,

            bullet_speed: 9.0,
            bullet_width: 6.0,
            bullet_height: 12.0,
        }
    }
}

impl Tuning {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brick_breaker_tuning";

    /// Parse tuning overrides; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, GameError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return tuning;
                    }
                    Err(err) => log::warn!("Ignoring stored tuning: {err}"),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
