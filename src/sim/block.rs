//! Blocks and the level grid translator

use serde::{Deserialize, Serialize};

use super::collidable::{Bounds, Collidable, CollisionResponder, Contact, EntityKind};
use super::events::{GameEvent, Outbox, Subscriber};
use crate::error::GameError;
use crate::levels::{LevelSet, POWER_UP_GLYPH};

/// A breakable (or not) block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Index in the level's block list
    pub id: usize,
    pub bounds: Bounds,
    /// Remaining hits; negative = indestructible
    pub durability: i32,
    pub score_value: u32,
    pub glyph: char,
    pub destroyed: bool,
    pub collision_enabled: bool,
    /// Flashing after a hit; collisions are off until the flash ends
    pub transitioning: bool,
    pub observers: Vec<Subscriber>,
}

impl Block {
    pub fn new(id: usize, bounds: Bounds, durability: i32, score_value: u32, glyph: char) -> Self {
        Self {
            id,
            bounds,
            durability,
            score_value,
            glyph,
            destroyed: false,
            collision_enabled: true,
            transitioning: false,
            observers: Vec::new(),
        }
    }

    pub fn is_indestructible(&self) -> bool {
        self.durability < 0
    }

    /// Destroyed, indestructible, or waiting out its final flash
    pub fn is_cleared(&self) -> bool {
        self.destroyed || self.is_indestructible() || self.durability == 0
    }

    pub fn is_power_up_carrier(&self) -> bool {
        self.glyph == POWER_UP_GLYPH
    }

    pub fn add_observer(&mut self, subscriber: Subscriber) {
        if !self.observers.contains(&subscriber) {
            self.observers.push(subscriber);
        }
    }

    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.collision_enabled = false;
    }

    /// Register a hit: lose one durability point, start flashing, and tell
    /// every observer. Returns true if this hit used up the last point.
    pub fn hit(&mut self, outbox: &mut Outbox) -> bool {
        let destroyed = if self.is_indestructible() {
            false
        } else {
            self.durability = (self.durability - 1).max(0);
            self.durability == 0
        };
        if !self.is_indestructible() {
            self.transitioning = true;
            self.collision_enabled = false;
        }

        outbox.notify_all(
            &self.observers,
            GameEvent::BlockHit {
                block: self.id,
                bounds: self.bounds,
                score: self.score_value,
                glyph: self.glyph,
                destroyed,
            },
        );
        destroyed
    }

    /// Flash is over: a spent block goes away, any other one is hittable again
    pub fn end_flash(&mut self) {
        if self.destroyed {
            return;
        }
        self.transitioning = false;
        if self.durability == 0 {
            self.destroy();
        } else {
            self.collision_enabled = true;
        }
    }
}

impl Collidable for Block {
    fn kind(&self) -> EntityKind {
        EntityKind::Block
    }

    fn bounds(&self) -> Bounds {
        self.bounds
    }

    fn is_active(&self) -> bool {
        !self.destroyed
    }

    fn is_collision_enabled(&self) -> bool {
        self.collision_enabled
    }
}

impl CollisionResponder for Block {
    fn on_collision(&mut self, other: &Contact, outbox: &mut Outbox) {
        log::trace!("block {} hit by {:?}", self.id, other.kind);
        self.hit(outbox);
    }
}

/// Translate one level grid into blocks.
///
/// Rows are stacked from `top`; each row's blocks split the full `width`
/// evenly, so rows may have different column counts. Gap glyphs still take a
/// cell but start destroyed.
pub fn build_level(
    levels: &LevelSet,
    level: usize,
    width: f32,
    top: f32,
    row_height: f32,
) -> Result<Vec<Block>, GameError> {
    let grid = levels.grid(level).ok_or(GameError::NoLevels)?;
    let mut blocks = Vec::new();
    let mut y = top;

    for (row, glyphs) in grid.iter().enumerate() {
        if glyphs.is_empty() {
            return Err(GameError::EmptyRow { level, row });
        }
        let column_width = width / glyphs.len() as f32;
        for (column, &glyph) in glyphs.iter().enumerate() {
            let block_type = levels.block_type(glyph).ok_or(GameError::UnknownGlyph {
                level,
                row,
                column,
                glyph,
            })?;
            let bounds = Bounds::new(column as f32 * column_width, y, column_width, row_height);
            let mut block = Block::new(
                blocks.len(),
                bounds,
                block_type.durability,
                block_type.score,
                glyph,
            );
            if block_type.durability == 0 {
                block.destroy();
            }
            blocks.push(block);
        }
        y += row_height;
    }

    Ok(blocks)
}

/// Every block is destroyed or indestructible
pub fn is_level_cleared(blocks: &[Block]) -> bool {
    blocks.iter().all(Block::is_cleared)
}
