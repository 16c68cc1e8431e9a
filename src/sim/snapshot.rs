//! Read-only view of a frame for the drawing layer

use serde::{Deserialize, Serialize};

use super::collidable::{Bounds, Collidable};
use super::state::{GamePhase, GameState};

/// A block as the drawing layer needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockView {
    pub bounds: Bounds,
    pub color: String,
    /// Hit recently; drawn flashing
    pub flashing: bool,
    pub indestructible: bool,
}

/// Everything visible this frame, in game-area coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub phase: GamePhase,
    /// 1-based level number
    pub level: usize,
    pub lives: u8,
    pub score: u64,
    pub high_score: u64,
    pub banner: Option<String>,
    pub score_bar: f32,
    pub paddle: Bounds,
    pub pistol_armed: bool,
    pub balls: Vec<Bounds>,
    pub blocks: Vec<BlockView>,
    pub power_ups: Vec<Bounds>,
    pub bullets: Vec<Bounds>,
}

impl FrameSnapshot {
    /// Capture the live entities of `state`; destroyed ones are skipped
    pub fn capture(state: &GameState) -> Self {
        let blocks = state
            .blocks
            .iter()
            .filter(|b| b.is_active())
            .map(|b| BlockView {
                bounds: b.bounds,
                color: state
                    .levels
                    .block_type(b.glyph)
                    .map(|t| t.color.clone())
                    .unwrap_or_default(),
                flashing: b.transitioning,
                indestructible: b.is_indestructible(),
            })
            .collect();

        Self {
            phase: state.phase,
            level: state.level + 1,
            lives: state.lives,
            score: state.score(),
            high_score: state.high_score(),
            banner: state.banner.map(|b| b.to_string()),
            score_bar: state.score_bar,
            paddle: state.paddle.bounds(),
            pistol_armed: state.paddle.is_armed(),
            balls: state
                .balls
                .iter()
                .filter(|b| b.is_active())
                .map(|b| b.bounds())
                .collect(),
            blocks,
            power_ups: state
                .power_ups
                .iter()
                .filter(|p| p.is_active())
                .map(|p| p.bounds())
                .collect(),
            bullets: state
                .bullets
                .iter()
                .filter(|b| b.is_active())
                .map(|b| b.bounds())
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
