//! Overlap tests and bounce decisions
//!
//! Both tests compare floored centre distances against half-extent sums,
//! matching the integer-pixel feel the physics was tuned with. The circle
//! test is approximate: a vertical distance check plus a
//! horizontal range check, not a true circle-to-box distance.

use glam::Vec2;

use super::collidable::{Bounds, ColliderShape};

/// Box-vs-box overlap
pub fn rect_overlaps_rect(own: &Bounds, target: &Bounds) -> bool {
    let vertical_distance = ((target.y() + target.height() / 2.0)
        - (own.y() + own.height() / 2.0))
        .floor()
        .abs();
    let vertical_hit = vertical_distance < own.height() / 2.0 + target.height() / 2.0;

    let horizontal_distance = ((target.x() + target.width() / 2.0)
        - (own.x() + own.width() / 2.0))
        .floor()
        .abs();
    let horizontal_hit = horizontal_distance < own.width() / 2.0 + target.width() / 2.0;

    vertical_hit && horizontal_hit
}

/// Approximate circle-vs-box overlap for a circle centred at `center` with
/// diameter `size`
pub fn circle_overlaps_rect(center: Vec2, size: Vec2, target: &Bounds) -> bool {
    let vertical_distance = ((target.y() + target.height() / 2.0) - center.y).floor().abs();
    let vertical_hit = vertical_distance < size.y / 2.0 + target.height() / 2.0;

    let horizontal_hit =
        center.x + size.x / 2.0 >= target.x() && center.x - size.x / 2.0 <= target.right();

    vertical_hit && horizontal_hit
}

/// Dispatch on the owner's shape
pub fn overlaps(shape: ColliderShape, own: &Bounds, target: &Bounds) -> bool {
    match shape {
        ColliderShape::Rect => rect_overlaps_rect(own, target),
        ColliderShape::Circle => circle_overlaps_rect(own.center(), own.size, target),
    }
}

/// Which 1px edge slices of a target the owner overlaps
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideHits {
    pub left: bool,
    pub right: bool,
    pub top: bool,
    pub bottom: bool,
}

impl SideHits {
    pub fn horizontal(&self) -> bool {
        self.left || self.right
    }

    pub fn vertical(&self) -> bool {
        self.top || self.bottom
    }
}

/// Re-run the owner's overlap test against the four edges of `target`
pub fn side_hits(shape: ColliderShape, own: &Bounds, target: &Bounds) -> SideHits {
    let left = Bounds::new(target.x(), target.y(), 1.0, target.height());
    let right = Bounds::new(target.right(), target.y(), 1.0, target.height());
    let top = Bounds::new(target.x(), target.y(), target.width(), 1.0);
    let bottom = Bounds::new(target.x(), target.bottom(), target.width(), 1.0);

    SideHits {
        left: overlaps(shape, own, &left),
        right: overlaps(shape, own, &right),
        top: overlaps(shape, own, &top),
        bottom: overlaps(shape, own, &bottom),
    }
}

/// Velocity axes to invert after hitting a block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BounceAxes {
    pub flip_x: bool,
    pub flip_y: bool,
}

impl BounceAxes {
    const X: Self = Self {
        flip_x: true,
        flip_y: false,
    };
    const Y: Self = Self {
        flip_x: false,
        flip_y: true,
    };
    const BOTH: Self = Self {
        flip_x: true,
        flip_y: true,
    };

    pub fn apply(&self, vel: Vec2) -> Vec2 {
        Vec2::new(
            if self.flip_x { -vel.x } else { vel.x },
            if self.flip_y { -vel.y } else { vel.y },
        )
    }
}

/// Decide how a ball at `own` (already advanced by `vel` this tick) bounces
/// off `target`.
///
/// A side-edge hit only inverts the horizontal axis if this tick's horizontal
/// speed actually carried the ball across that edge; otherwise the overlap
/// came from vertical travel and only the vertical axis is inverted. When a
/// side and a top/bottom edge both register and neither axis crossed, both
/// axes are inverted.
pub fn block_bounce(hits: SideHits, own: &Bounds, target: &Bounds, vel: Vec2) -> BounceAxes {
    let speed_x = vel.x.abs();
    let speed_y = vel.y.abs();

    let crossed_x = (hits.left && own.right() - speed_x <= target.x())
        || (hits.right && own.x() + speed_x >= target.right());
    let crossed_y = (hits.top && own.bottom() - speed_y <= target.y())
        || (hits.bottom && own.y() + speed_y >= target.bottom());

    match (hits.horizontal(), hits.vertical()) {
        (true, true) if crossed_x => BounceAxes::X,
        (true, true) if crossed_y => BounceAxes::Y,
        (true, true) => BounceAxes::BOTH,
        (true, false) if crossed_x => BounceAxes::X,
        _ => BounceAxes::Y,
    }
}

/// Exit direction off the paddle: the strike point along the paddle is
/// mapped to 0..40 and bucketed into four aim zones.
///
/// Returns `(x_direction, upward_scale)`; the caller multiplies both by the
/// ball speed and acceleration factor.
pub fn paddle_deflection(ball_x: f32, paddle: &Bounds) -> (f32, f32) {
    let relative_x = (ball_x - paddle.x()) / paddle.width() * 40.0;
    if relative_x < 10.0 {
        (-1.0, 1.0)
    } else if relative_x < 20.0 {
        (-0.5, 1.3)
    } else if relative_x < 30.0 {
        (0.5, 1.3)
    } else {
        (1.0, 1.0)
    }
}
