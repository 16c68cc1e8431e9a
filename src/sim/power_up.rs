//! Falling power-ups and their effects

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collidable::{
    Bounds, Collidable, Collider, ColliderRef, ColliderShape, CollisionResponder, Contact,
    EntityKind,
};
use super::events::{GameEvent, Outbox, Subscriber};

/// What catching a power-up does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpEffect {
    /// Split the lead ball into this many extra balls
    MultiBall(usize),
    /// Arm the paddle with a timed pistol
    Pistol,
}

impl PowerUpEffect {
    /// Draw an effect with equal odds
    pub fn roll(rng: &mut Pcg32, multi_ball_count: usize) -> Self {
        if rng.random_bool(0.5) {
            PowerUpEffect::MultiBall(multi_ball_count)
        } else {
            PowerUpEffect::Pistol
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub fall_speed: f32,
    pub effect: PowerUpEffect,
    pub destroyed: bool,
    pub observers: Vec<Subscriber>,
    pub collider: Collider,
    floor_y: f32,
}

impl PowerUp {
    /// Power-up centred horizontally on `origin` (a destroyed block's box),
    /// with the paddle as its only target.
    pub fn spawn(
        id: u32,
        origin: &Bounds,
        size: Vec2,
        fall_speed: f32,
        effect: PowerUpEffect,
        floor_y: f32,
    ) -> Self {
        let mut collider = Collider::new(ColliderShape::Rect);
        collider.add_collision_target(ColliderRef::Paddle);
        Self {
            id,
            pos: Vec2::new(origin.center().x - size.x / 2.0, origin.y()),
            size,
            fall_speed,
            effect,
            destroyed: false,
            observers: Vec::new(),
            collider,
            floor_y,
        }
    }

    pub fn add_observer(&mut self, subscriber: Subscriber) {
        if !self.observers.contains(&subscriber) {
            self.observers.push(subscriber);
        }
    }

    /// Fall one step; leaving the bottom of the field destroys it
    pub fn integrate(&mut self) {
        self.pos.y += self.fall_speed;
        if self.pos.y >= self.floor_y {
            self.destroy();
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }
}

impl Collidable for PowerUp {
    fn kind(&self) -> EntityKind {
        EntityKind::PowerUp
    }

    fn bounds(&self) -> Bounds {
        Bounds::new(self.pos.x, self.pos.y, self.size.x, self.size.y)
    }

    fn is_active(&self) -> bool {
        !self.destroyed
    }

    fn is_collision_enabled(&self) -> bool {
        !self.destroyed
    }
}

impl CollisionResponder for PowerUp {
    fn on_collision(&mut self, other: &Contact, outbox: &mut Outbox) {
        if other.kind != EntityKind::Paddle || self.destroyed {
            return;
        }
        self.destroy();
        outbox.notify_all(
            &self.observers,
            GameEvent::PowerUpConsumed {
                id: self.id,
                effect: self.effect,
            },
        );
    }
}
