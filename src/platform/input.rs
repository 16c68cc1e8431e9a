//! Keyboard mediator
//!
//! Browsers report key presses and releases as separate events; the tracker
//! keeps the set of held keys in press order so the newest arrow wins when
//! both are held.

use crate::sim::{Direction, TickInput};

/// Browser `keyCode` values the game reacts to
pub mod keys {
    pub const LEFT: u32 = 37;
    pub const RIGHT: u32 = 39;
    pub const SPACE: u32 = 32;
}

/// Held keys, oldest press first
#[derive(Debug, Clone, Default)]
pub struct KeyTracker {
    pressed: Vec<u32>,
    /// Launch requested since the last snapshot
    launch_requested: bool,
}

impl KeyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auto-repeat presses of an already held key are ignored
    pub fn on_key_pressed(&mut self, code: u32) {
        if code == keys::SPACE {
            self.launch_requested = true;
        }
        if !self.pressed.contains(&code) {
            self.pressed.push(code);
        }
    }

    pub fn on_key_released(&mut self, code: u32) {
        self.pressed.retain(|&k| k != code);
    }

    /// Forget every held key (window lost focus)
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }

    pub fn request_launch(&mut self) {
        self.launch_requested = true;
    }

    pub fn last_pressed(&self) -> Option<u32> {
        self.pressed.last().copied()
    }

    pub fn is_any_pressed(&self) -> bool {
        !self.pressed.is_empty()
    }

    pub fn is_pressed(&self, code: u32) -> bool {
        self.pressed.contains(&code)
    }

    /// `key` is held and was pressed after `previous` (or `previous` is not
    /// held at all)
    pub fn is_pressed_after(&self, key: u32, previous: u32) -> bool {
        let position = |code| self.pressed.iter().position(|&k| k == code);
        match (position(key), position(previous)) {
            (Some(k), Some(p)) => k > p,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    /// Whichever of the two keys was pressed last, if either is held
    pub fn last_pressed_between(&self, first: u32, second: u32) -> Option<u32> {
        if self.is_pressed_after(first, second) {
            Some(first)
        } else if self.is_pressed_after(second, first) {
            Some(second)
        } else {
            None
        }
    }

    /// Held arrow resolved to a paddle direction
    pub fn direction(&self) -> Direction {
        match self.last_pressed_between(keys::LEFT, keys::RIGHT) {
            Some(keys::LEFT) => Direction::Left,
            Some(keys::RIGHT) => Direction::Right,
            _ => Direction::Idle,
        }
    }

    /// Input for the next tick; consumes a pending launch request
    pub fn snapshot(&mut self) -> TickInput {
        TickInput {
            direction: self.direction(),
            launch: std::mem::take(&mut self.launch_requested),
        }
    }
}
