//! Collision capabilities shared by every entity
//!
//! Entities expose a bounding box and a kind through [`Collidable`], and react
//! to hits through [`CollisionResponder`]. Collider objects additionally carry
//! a [`Collider`]: their shape and the ordered list of targets they test.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::events::Outbox;

/// Smallest extent a bounding box may have on either axis
pub const MIN_EXTENT: f32 = 1.0;

/// What an entity is, as seen by whatever it collides with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Paddle,
    Ball,
    Block,
    Bullet,
    PowerUp,
    LeftBorder,
    RightBorder,
    TopBorder,
    Generic,
}

/// Axis-aligned bounding box, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Bounds {
    /// Sizes below [`MIN_EXTENT`] are raised to it so overlap tests never
    /// degenerate.
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width.max(MIN_EXTENT), height.max(MIN_EXTENT)),
        }
    }

    /// Box of the given size centred on `center`
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    pub fn x(&self) -> f32 {
        self.pos.x
    }

    pub fn y(&self) -> f32 {
        self.pos.y
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Descriptor handed to the other side of a collision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub kind: EntityKind,
    pub bounds: Bounds,
}

/// Anything that can be hit
pub trait Collidable {
    fn kind(&self) -> EntityKind;

    fn bounds(&self) -> Bounds;

    /// True unless destroyed
    fn is_active(&self) -> bool;

    /// True unless collisions were switched off (independent of destroyed)
    fn is_collision_enabled(&self) -> bool;

    fn contact(&self) -> Contact {
        Contact {
            kind: self.kind(),
            bounds: self.bounds(),
        }
    }

    /// Whether collider objects should test against this entity at all
    fn is_hittable(&self) -> bool {
        self.is_active() && self.is_collision_enabled()
    }
}

/// Entity-specific reaction to a hit; observers are told through `outbox`
pub trait CollisionResponder {
    fn on_collision(&mut self, other: &Contact, outbox: &mut Outbox);
}

/// Overlap test used by a collider object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColliderShape {
    #[default]
    Rect,
    Circle,
}

/// Reference to something in the game area a collider can test against
///
/// Block references index into the level's block list, which only changes on
/// level load, when every collider is rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderRef {
    Block(usize),
    Paddle,
    Border(BorderSide),
}

/// Collision shape plus the ordered targets tested every tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub shape: ColliderShape,
    targets: Vec<ColliderRef>,
}

impl Collider {
    pub fn new(shape: ColliderShape) -> Self {
        Self {
            shape,
            targets: Vec::new(),
        }
    }

    pub fn add_collision_target(&mut self, target: ColliderRef) {
        self.targets.push(target);
    }

    pub fn extend_targets(&mut self, targets: impl IntoIterator<Item = ColliderRef>) {
        self.targets.extend(targets);
    }

    pub fn targets(&self) -> &[ColliderRef] {
        &self.targets
    }
}

/// Which edge of the play area a border sentinel guards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BorderSide {
    Left,
    Right,
    Top,
}

/// Static sentinel just outside the play area
#[derive(Debug, Clone, PartialEq)]
pub struct Border {
    pub side: BorderSide,
    pub bounds: Bounds,
}

/// Thickness of the border sentinels
pub const BORDER_THICKNESS: f32 = 10.0;

impl Border {
    /// The three sentinels for a square play area of `width` whose playfield
    /// starts at `top` (below the score bar).
    pub fn screen_borders(width: f32, top: f32) -> [Border; 3] {
        [
            Border {
                side: BorderSide::Left,
                bounds: Bounds::new(-BORDER_THICKNESS, 0.0, BORDER_THICKNESS, width),
            },
            Border {
                side: BorderSide::Right,
                bounds: Bounds::new(width, 0.0, BORDER_THICKNESS, width),
            },
            Border {
                side: BorderSide::Top,
                bounds: Bounds::new(0.0, top - BORDER_THICKNESS, width, BORDER_THICKNESS),
            },
        ]
    }
}

impl Collidable for Border {
    fn kind(&self) -> EntityKind {
        match self.side {
            BorderSide::Left => EntityKind::LeftBorder,
            BorderSide::Right => EntityKind::RightBorder,
            BorderSide::Top => EntityKind::TopBorder,
        }
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn is_active(&self) -> bool {
        true
    }

    fn is_collision_enabled(&self) -> bool {
        true
    }
}
