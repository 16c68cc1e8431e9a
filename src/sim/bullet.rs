//! Pistol bullets

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collidable::{
    Bounds, Collidable, Collider, ColliderShape, CollisionResponder, Contact, EntityKind,
};
use super::events::Outbox;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel: Vec2,
    pub destroyed: bool,
    pub collider: Collider,
}

impl Bullet {
    /// Bullet centred on `muzzle`, flying straight up
    pub fn fire(id: u32, muzzle: Vec2, size: Vec2, speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(muzzle.x - size.x / 2.0, muzzle.y),
            size,
            vel: Vec2::new(0.0, -speed),
            destroyed: false,
            collider: Collider::new(ColliderShape::Rect),
        }
    }

    /// Move one step; gone once fully above the field
    pub fn integrate(&mut self) {
        self.pos += self.vel;
        if self.pos.y + self.size.y < 0.0 {
            self.destroy();
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }
}

impl Collidable for Bullet {
    fn kind(&self) -> EntityKind {
        EntityKind::Bullet
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

impl CollisionResponder for Bullet {
    fn on_collision(&mut self, other: &Contact, _outbox: &mut Outbox) {
        log::trace!("bullet {} spent on {:?}", self.id, other.kind);
        self.destroy();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flies_up_and_leaves() {
        let mut b = Bullet::fire(1, Vec2::new(100.0, 20.0), Vec2::new(6.0, 12.0), 9.0);
        assert_eq!(b.pos, Vec2::new(97.0, 20.0));
        b.integrate();
        assert_eq!(b.pos.y, 11.0);
        assert!(!b.destroyed);
        b.integrate();
        b.integrate();
        // y = -7, bottom edge at 5
        assert!(!b.destroyed);
        b.integrate();
        assert!(b.destroyed);
    }

    #[test]
    fn test_spent_on_first_hit() {
        let mut b = Bullet::fire(1, Vec2::new(100.0, 200.0), Vec2::new(6.0, 12.0), 9.0);
        let mut outbox = Outbox::new();
        b.on_collision(
            &Contact {
                kind: EntityKind::Block,
                bounds: Bounds::new(80.0, 180.0, 80.0, 20.0),
            },
            &mut outbox,
        );
        assert!(!b.is_active());
        assert!(outbox.is_empty());
    }
}
