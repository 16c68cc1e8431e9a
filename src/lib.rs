//! Brick Breaker - an Arkanoid-style arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, level controller)
//! - `platform`: Browser/native host surface (input, layout, wasm bindings)
//! - `persistence`: High score storage
//! - `config`: Data-driven game balance
//! - `levels`: Level layouts and block types

pub mod config;
pub mod error;
pub mod levels;
pub mod persistence;
pub mod platform;
pub mod score;
pub mod sim;

pub use config::Tuning;
pub use error::GameError;
pub use levels::LevelSet;
pub use persistence::{HighScoreStore, MemoryStore};
pub use platform::Game;
pub use score::ScoreBoard;
