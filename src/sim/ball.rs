//! Ball entity and its bounce rules

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collidable::{
    Bounds, Collidable, Collider, ColliderShape, CollisionResponder, Contact, EntityKind,
};
use super::collision::{block_bounce, paddle_deflection, side_hits};
use super::events::Outbox;
use super::paddle::{Direction, Paddle};

/// Ball lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BallState {
    /// Slaved to the paddle until launch
    FollowingPaddle,
    /// Moving under its own velocity
    Launched,
}

/// Speed parameters shared by every ball of a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallPhysics {
    /// Per-axis floor the decay settles on; also the border bounce magnitude
    pub base_speed: f32,
    /// Current launch/paddle speed (ramps up with levels)
    pub speed: f32,
    pub acceleration_factor: f32,
    pub deceleration_ticks: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    /// Centre of the ball
    pub pos: Vec2,
    pub vel: Vec2,
    pub diameter: f32,
    pub physics: BallPhysics,
    pub state: BallState,
    pub destroyed: bool,
    pub collider: Collider,
    /// Bottom of the game area
    floor_y: f32,
    /// Latched once the ball has dropped out
    out_of_field: bool,
}

impl Ball {
    pub fn new(id: u32, diameter: f32, physics: BallPhysics, floor_y: f32) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::new(physics.speed, -physics.speed),
            diameter,
            physics,
            state: BallState::FollowingPaddle,
            destroyed: false,
            collider: Collider::new(ColliderShape::Circle),
            floor_y,
            out_of_field: false,
        }
    }

    /// Copy of `self` under a new id, sharing its collision targets
    pub fn split(&self, id: u32, vel: Vec2) -> Self {
        Self {
            id,
            vel,
            out_of_field: false,
            ..self.clone()
        }
    }

    pub fn is_following(&self) -> bool {
        self.state == BallState::FollowingPaddle
    }

    /// Sit just above the paddle's horizontal centre
    pub fn follow(&mut self, paddle: &Paddle) {
        self.pos = Vec2::new(
            paddle.center_x(),
            paddle.pos.y - self.diameter / 2.0 - paddle.height / 4.0,
        );
    }

    /// Leave the paddle, heading the way the paddle last moved (straight up
    /// if it was idle)
    pub fn launch(&mut self, paddle_direction: Direction) {
        if !self.is_following() {
            return;
        }
        let speed = self.physics.speed;
        self.vel = Vec2::new(paddle_direction.sign() * speed, -speed);
        self.state = BallState::Launched;
    }

    /// Top edge has passed the bottom of the game area. Once true, stays true.
    pub fn is_below_screen(&mut self) -> bool {
        if !self.out_of_field {
            self.out_of_field = self.pos.y - self.diameter / 2.0 >= self.floor_y;
        }
        self.out_of_field
    }

    /// Whether the tick loop should still move this ball
    pub fn is_live(&mut self) -> bool {
        !self.destroyed && !self.is_below_screen()
    }

    pub fn integrate(&mut self) {
        self.pos += self.vel;
    }

    /// Pull each velocity axis back toward `base_speed`, never past it
    pub fn decelerate(&mut self) {
        let base = self.physics.base_speed;
        let ticks = self.physics.deceleration_ticks.max(1.0);
        for v in [&mut self.vel.x, &mut self.vel.y] {
            let magnitude = v.abs();
            if magnitude > base {
                let step = (magnitude - base) / ticks;
                *v = v.signum() * (magnitude - step).max(base);
            }
        }
    }

    pub fn increase_speed(&mut self, increase: f32) {
        self.physics.speed += increase;
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
    }
}

impl Collidable for Ball {
    fn kind(&self) -> EntityKind {
        EntityKind::Ball
    }

    fn bounds(&self) -> Bounds {
        Bounds::centered(self.pos, self.diameter, self.diameter)
    }

    fn is_active(&self) -> bool {
        !self.destroyed
    }

    fn is_collision_enabled(&self) -> bool {
        true
    }
}

impl CollisionResponder for Ball {
    fn on_collision(&mut self, other: &Contact, _outbox: &mut Outbox) {
        let prev_vel = self.vel;
        let acc = self.physics.acceleration_factor;
        let base = self.physics.base_speed;

        match other.kind {
            EntityKind::Block => {
                let own = self.bounds();
                let hits = side_hits(self.collider.shape, &own, &other.bounds);
                self.vel = block_bounce(hits, &own, &other.bounds, self.vel).apply(self.vel);
            }
            EntityKind::TopBorder => self.vel.y = base * acc,
            EntityKind::LeftBorder => self.vel.x = base * acc,
            EntityKind::RightBorder => self.vel.x = -base * acc,
            EntityKind::Paddle => {
                let speed = self.physics.speed;
                let (x_dir, up_scale) = paddle_deflection(self.pos.x, &other.bounds);
                self.vel = Vec2::new(x_dir * speed * acc, -up_scale * speed * acc);
            }
            _ => {}
        }

        // Back out of whatever was hit
        self.pos -= prev_vel;
        log::trace!("ball {} bounced off {:?}: {:?} -> {:?}", self.id, other.kind, prev_vel, self.vel);
    }
}
