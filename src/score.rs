//! Score accumulator

use serde::{Deserialize, Serialize};

use crate::persistence::HighScoreStore;
use crate::sim::events::{GameEvent, GameObserver};

/// Running score plus the best score seen so far
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    pub score: u64,
    pub high_score: u64,
}

impl ScoreBoard {
    pub fn new(high_score: u64) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    /// Read the stored high score
    pub fn from_store(store: &dyn HighScoreStore) -> Self {
        Self::new(store.load())
    }

    /// Write the current score if it beats the stored best.
    /// Returns true if a new high score was saved.
    pub fn persist_if_improved(&mut self, store: &mut dyn HighScoreStore) -> bool {
        if self.score <= self.high_score {
            return false;
        }
        self.high_score = self.score;
        store.save(self.high_score);
        log::info!("New high score: {}", self.high_score);
        true
    }

    pub fn reset(&mut self) {
        self.score = 0;
    }
}

impl GameObserver for ScoreBoard {
    fn on_event(&mut self, event: &GameEvent) {
        if let GameEvent::BlockHit { score, .. } = event {
            self.score += u64::from(*score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use crate::sim::collidable::Bounds;
    use glam::Vec2;

    fn hit(score: u32) -> GameEvent {
        GameEvent::BlockHit {
            block: 0,
            bounds: Bounds::new(0.0, 0.0, 10.0, 10.0),
            score,
            glyph: '_',
            destroyed: false,
        }
    }

    #[test]
    fn test_sums_block_hits_only() {
        let mut board = ScoreBoard::new(0);
        board.on_event(&hit(100));
        board.on_event(&hit(80));
        board.on_event(&GameEvent::BulletFired { pos: Vec2::ZERO });
        assert_eq!(board.score, 180);
    }

    #[test]
    fn test_persists_only_when_improved() {
        let mut store = MemoryStore::with_score(500);
        let mut board = ScoreBoard::from_store(&store);
        board.score = 400;
        assert!(!board.persist_if_improved(&mut store));
        assert_eq!(store.load(), 500);

        board.score = 900;
        assert!(board.persist_if_improved(&mut store));
        assert_eq!(store.load(), 900);
        assert_eq!(board.high_score, 900);
    }
}
