//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed displacement per tick
//! - Seeded RNG only
//! - Timers fire only at the start of a tick
//! - No rendering or platform dependencies

pub mod ball;
pub mod block;
pub mod bullet;
pub mod collidable;
pub mod collision;
pub mod events;
pub mod paddle;
pub mod power_up;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod timer;

pub use ball::{Ball, BallPhysics, BallState};
pub use block::{Block, build_level, is_level_cleared};
pub use bullet::Bullet;
pub use collidable::{
    Border, BorderSide, Bounds, Collidable, Collider, ColliderRef, ColliderShape,
    CollisionResponder, Contact, EntityKind,
};
pub use events::{GameEvent, GameObserver, Notification, Outbox, Subscriber};
pub use paddle::{Direction, Paddle};
pub use power_up::{PowerUp, PowerUpEffect};
pub use snapshot::{BlockView, FrameSnapshot};
pub use state::{Banner, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use timer::{Scheduler, TimerEvent, TimerHandle};
