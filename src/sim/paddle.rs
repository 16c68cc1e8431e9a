//! The player's paddle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collidable::{Bounds, Collidable, CollisionResponder, Contact, EntityKind};
use super::events::Outbox;
use super::timer::TimerHandle;

/// Held horizontal direction: -1 left, 0 idle, 1 right
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    Left,
    #[default]
    Idle,
    Right,
}

impl Direction {
    pub fn sign(&self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Idle => 0.0,
            Direction::Right => 1.0,
        }
    }
}

/// Timed firing mode granted by the pistol power-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pistol {
    /// Distinguishes this arming from earlier ones whose timers may still fire
    pub generation: u32,
    pub fire_timer: TimerHandle,
    pub expire_timer: TimerHandle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    /// Displacement per tick
    pub speed: f32,
    pub movement_direction: Direction,
    /// Right-hand limit for `pos.x` is `area_width - width`
    area_width: f32,
    pub pistol: Option<Pistol>,
}

impl Paddle {
    /// Paddle centred horizontally, resting one pixel above the bottom edge
    pub fn new(area_width: f32, area_height: f32, width: f32, height: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::new((area_width - width) / 2.0, area_height - height - 1.0),
            width,
            height,
            speed,
            movement_direction: Direction::Idle,
            area_width,
            pistol: None,
        }
    }

    /// Move one step in the held direction; a step that would leave the
    /// play area is skipped entirely.
    pub fn apply_input(&mut self, direction: Direction) {
        self.movement_direction = direction;
        match direction {
            Direction::Left if self.pos.x - self.speed >= 0.0 => self.pos.x -= self.speed,
            Direction::Right if self.pos.x + self.speed <= self.area_width - self.width => {
                self.pos.x += self.speed
            }
            _ => {}
        }
    }

    pub fn center_x(&self) -> f32 {
        self.pos.x + self.width / 2.0
    }

    /// Muzzle positions of the two pistol barrels (quarter points, one
    /// paddle-height above the paddle)
    pub fn muzzles(&self) -> [Vec2; 2] {
        let y = self.pos.y - self.height;
        [
            Vec2::new(self.center_x() - self.width / 4.0, y),
            Vec2::new(self.center_x() + self.width / 4.0, y),
        ]
    }

    pub fn is_armed(&self) -> bool {
        self.pistol.is_some()
    }
}

impl Collidable for Paddle {
    fn kind(&self) -> EntityKind {
        EntityKind::Paddle
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.pos.x, self.pos.y, self.width, self.height)
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_collision_enabled(&self) -> bool {
        true
    }
}

impl CollisionResponder for Paddle {
    fn on_collision(&mut self, other: &Contact, _outbox: &mut Outbox) {
        log::trace!("paddle touched by {:?}", other.kind);
    }
}
