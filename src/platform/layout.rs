//! Where the game area sits on the host's screen
//!
//! The simulation runs in a fixed square of `original_width` logical units.
//! The host reports the on-screen square (origin and width) on every resize;
//! pointer coordinates are mapped back into logical units here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Screen origin of the game area
    pub x: f32,
    pub y: f32,
    /// On-screen side of the game area
    pub width: f32,
    /// Logical side the simulation runs at
    pub original_width: f32,
}

impl Layout {
    pub fn new(original_width: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: original_width,
            original_width,
        }
    }

    pub fn resize(&mut self, x: f32, y: f32, width: f32) {
        if width <= 0.0 || !width.is_finite() {
            log::warn!("Ignoring resize to width {width}");
            return;
        }
        self.x = x;
        self.y = y;
        self.width = width;
    }

    /// Screen pixels per logical unit
    pub fn resize_factor(&self) -> f32 {
        self.width / self.original_width
    }

    /// Screen point to logical game-area coordinates; `None` outside the area
    pub fn to_local(&self, px: f32, py: f32) -> Option<Vec2> {
        let inside = px >= self.x
            && px <= self.x + self.width
            && py >= self.y
            && py <= self.y + self.width;
        inside.then(|| Vec2::new(px - self.x, py - self.y) / self.resize_factor())
    }

    /// On portrait screens the strip below the game area holds a left and a
    /// right button, each half the area wide
    pub fn button_at(&self, px: f32, py: f32) -> Option<Direction> {
        if py <= self.y + self.width || px < self.x || px > self.x + self.width {
            return None;
        }
        if px < self.x + self.width / 2.0 {
            Some(Direction::Left)
        } else {
            Some(Direction::Right)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_local_scales_back() {
        let mut layout = Layout::new(400.0);
        layout.resize(100.0, 50.0, 800.0);
        assert_eq!(layout.resize_factor(), 2.0);
        assert_eq!(layout.to_local(300.0, 250.0), Some(Vec2::new(100.0, 100.0)));
        assert_eq!(layout.to_local(50.0, 250.0), None);
    }

    #[test]
    fn test_bad_resize_ignored() {
        let mut layout = Layout::new(400.0);
        layout.resize(10.0, 10.0, 0.0);
        assert_eq!(layout, Layout::new(400.0));
    }

    #[test]
    fn test_buttons_below_area() {
        let layout = Layout::new(400.0);
        assert_eq!(layout.button_at(100.0, 450.0), Some(Direction::Left));
        assert_eq!(layout.button_at(300.0, 450.0), Some(Direction::Right));
        assert_eq!(layout.button_at(300.0, 200.0), None);
    }
}
