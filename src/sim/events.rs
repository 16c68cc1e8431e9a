//! Observer channel between entities and their listeners
//!
//! Entities never call listeners directly. They post [`Notification`]s to an
//! outbox during the tick; the game area routes them afterwards to the fixed
//! set of [`Subscriber`]s.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collidable::Bounds;
use super::power_up::PowerUpEffect;

/// Who can listen to entity notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subscriber {
    /// Score accumulator
    ScoreBoard,
    /// Level controller (power-up spawning and pruning)
    Controller,
}

/// Something that happened to an entity this tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A block was hit (sent on every hit, not only the destroying one)
    BlockHit {
        block: usize,
        bounds: Bounds,
        score: u32,
        glyph: char,
        /// Durability reached zero with this hit
        destroyed: bool,
    },
    /// A power-up touched the paddle
    PowerUpConsumed { id: u32, effect: PowerUpEffect },
    /// The pistol paddle emitted a bullet from `pos`
    BulletFired { pos: Vec2 },
}

/// An event addressed to one subscriber
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub to: Subscriber,
    pub event: GameEvent,
}

/// Collected notifications for the current tick
#[derive(Debug, Default)]
pub struct Outbox {
    pending: Vec<Notification>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `event` to every observer in `observers`
    pub fn notify_all(&mut self, observers: &[Subscriber], event: GameEvent) {
        for &to in observers {
            self.pending.push(Notification {
                to,
                event: event.clone(),
            });
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }
}

/// Listener interface for subscribers that live outside the game area
pub trait GameObserver {
    fn on_event(&mut self, event: &GameEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_all_fans_out_in_order() {
        let mut outbox = Outbox::new();
        let event = GameEvent::BulletFired {
            pos: Vec2::new(1.0, 2.0),
        };
        outbox.notify_all(&[Subscriber::ScoreBoard, Subscriber::Controller], event.clone());
        let sent = outbox.drain();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].to, Subscriber::ScoreBoard);
        assert_eq!(sent[1].to, Subscriber::Controller);
        assert_eq!(sent[1].event, event);
        assert!(outbox.is_empty());
    }

    #[test]
    fn test_no_observers_no_notifications() {
        let mut outbox = Outbox::new();
        outbox.notify_all(
            &[],
            GameEvent::BulletFired { pos: Vec2::ZERO },
        );
        assert!(outbox.is_empty());
    }
}
