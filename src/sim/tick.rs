//! Per-frame simulation tick
//!
//! One call advances the session by exactly one step. Displacements are fixed
//! per tick; the elapsed milliseconds only drive the timer clock.

use serde::{Deserialize, Serialize};

use super::collidable::{Bounds, Collidable, Collider, ColliderRef, CollisionResponder, Contact};
use super::collision::overlaps;
use super::events::Outbox;
use super::paddle::Direction;
use super::state::{GamePhase, GameState};
use crate::persistence::HighScoreStore;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Held arrow direction
    pub direction: Direction,
    /// Launch the ball (space/tap) if it is resting on the paddle
    pub launch: bool,
}

/// Advance the game state by one tick.
///
/// Order: due timers, paddle input and launch, balls, power-ups, bullets,
/// notification dispatch, pruning, then win/loss evaluation.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    elapsed_ms: f64,
    store: &mut dyn HighScoreStore,
) {
    state.time_ticks += 1;
    let mut outbox = Outbox::new();

    state.scheduler.advance(elapsed_ms);
    for event in state.scheduler.poll() {
        state.apply_timer(event, &mut outbox);
    }

    if state.phase == GamePhase::GameCleared {
        return;
    }

    state.paddle.apply_input(input.direction);
    if input.launch {
        state.launch();
    }

    for i in 0..state.balls.len() {
        if !state.balls[i].is_live() {
            continue;
        }
        if state.balls[i].is_following() {
            state.balls[i].follow(&state.paddle);
            continue;
        }

        state.balls[i].integrate();
        let own = state.balls[i].contact();
        if let Some(contact) = resolve_hit(state, |s| &s.balls[i].collider, own, &mut outbox) {
            state.balls[i].on_collision(&contact, &mut outbox);
        }
        state.balls[i].decelerate();
    }

    for i in 0..state.power_ups.len() {
        if state.power_ups[i].destroyed {
            continue;
        }
        state.power_ups[i].integrate();
        if state.power_ups[i].destroyed {
            continue;
        }
        let own = state.power_ups[i].contact();
        if let Some(contact) = resolve_hit(state, |s| &s.power_ups[i].collider, own, &mut outbox)
        {
            state.power_ups[i].on_collision(&contact, &mut outbox);
        }
    }

    for i in 0..state.bullets.len() {
        if state.bullets[i].destroyed {
            continue;
        }
        state.bullets[i].integrate();
        if state.bullets[i].destroyed {
            continue;
        }
        let own = state.bullets[i].contact();
        if let Some(contact) = resolve_hit(state, |s| &s.bullets[i].collider, own, &mut outbox) {
            state.bullets[i].on_collision(&contact, &mut outbox);
        }
    }

    state.dispatch(outbox.drain());
    state.prune();
    state.evaluate_end_game(store);
}

/// Descriptor of a target, if it can currently be hit
fn target_contact(state: &GameState, target: ColliderRef) -> Option<Contact> {
    match target {
        ColliderRef::Block(i) => state
            .blocks
            .get(i)
            .filter(|b| b.is_hittable())
            .map(|b| b.contact()),
        ColliderRef::Paddle => state.paddle.is_hittable().then(|| state.paddle.contact()),
        ColliderRef::Border(side) => state
            .borders
            .iter()
            .find(|b| b.side == side)
            .map(|b| b.contact()),
    }
}

/// First hittable target overlapping `own`, in registration order
fn first_hit(state: &GameState, collider: &Collider, own: &Bounds) -> Option<(ColliderRef, Contact)> {
    collider.targets().iter().find_map(|&target| {
        let contact = target_contact(state, target)?;
        overlaps(collider.shape, own, &contact.bounds).then_some((target, contact))
    })
}

/// Run collision detection for one collider object.
///
/// On the first hit the target responds to `own` here; the target's
/// descriptor is returned so the owner can respond next. At most one hit per
/// owner per tick.
fn resolve_hit(
    state: &mut GameState,
    collider: impl Fn(&GameState) -> &Collider,
    own: Contact,
    outbox: &mut Outbox,
) -> Option<Contact> {
    let (target, contact) = first_hit(state, collider(state), &own.bounds)?;
    match target {
        ColliderRef::Block(i) => {
            let block = &mut state.blocks[i];
            block.on_collision(&own, outbox);
            if !block.is_indestructible() {
                state.schedule_block_flash(i);
            }
        }
        ColliderRef::Paddle => state.paddle.on_collision(&own, outbox),
        ColliderRef::Border(_) => {}
    }
    Some(contact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Tuning;
    use crate::levels::LevelSet;
    use crate::persistence::MemoryStore;
    use crate::sim::ball::BallState;
    use crate::sim::events::{GameEvent, GameObserver};
    use crate::sim::power_up::PowerUpEffect;
    use crate::sim::state::Banner;
    use glam::Vec2;

    const FRAME_MS: f64 = 16.0;

    fn new_state(levels: LevelSet) -> GameState {
        GameState::new(Tuning::default(), levels, 400.0, 0).unwrap()
    }

    fn levels(levels: &[&[&str]]) -> LevelSet {
        LevelSet {
            levels: levels
                .iter()
                .map(|rows| rows.iter().map(|r| r.to_string()).collect())
                .collect(),
            ..LevelSet::default()
        }
    }

    /// Put the lead ball in flight at `pos` with `vel`
    fn aim(state: &mut GameState, pos: Vec2, vel: Vec2) {
        let ball = &mut state.balls[0];
        ball.state = BallState::Launched;
        ball.pos = pos;
        ball.vel = vel;
        state.phase = GamePhase::Playing;
    }

    fn idle() -> TickInput {
        TickInput::default()
    }

    #[test]
    fn test_tick_serve_to_playing() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        assert_eq!(state.phase, GamePhase::Serve);

        // Ball rides along with the paddle
        let right = TickInput {
            direction: Direction::Right,
            launch: false,
        };
        tick(&mut state, &right, FRAME_MS, &mut store);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.balls[0].pos.x, state.paddle.center_x());

        let launch = TickInput {
            direction: Direction::Idle,
            launch: true,
        };
        let before = state.balls[0].pos;
        tick(&mut state, &launch, FRAME_MS, &mut store);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.banner, None);
        assert_eq!(state.balls[0].vel, Vec2::new(0.0, -4.0));
        assert_eq!(state.balls[0].pos, before + Vec2::new(0.0, -4.0));
    }

    #[test]
    fn test_row_cleared_on_third_hit() {
        let mut state = new_state(levels(&[&["___"], &["_"]]));
        let mut store = MemoryStore::new();

        for i in 0..3 {
            let x = state.blocks[i].bounds.center().x;
            aim(&mut state, Vec2::new(x, 60.0), Vec2::new(0.0, -4.0));
            tick(&mut state, &idle(), FRAME_MS, &mut store);
            assert_eq!(state.blocks[i].durability, 0);
            if i < 2 {
                assert_eq!(state.phase, GamePhase::Playing);
                assert_eq!(state.balls[0].vel.y, 4.0);
            }
        }

        assert_eq!(state.phase, GamePhase::LevelClearPending);
        assert_eq!(state.banner, Some(Banner::LevelCleared(1)));
        assert!(state.balls.is_empty());
        assert_eq!(state.score(), 300);

        // Flashes end, only the level load stays queued
        for _ in 0..20 {
            tick(&mut state, &idle(), FRAME_MS, &mut store);
        }
        assert!(state.blocks.iter().all(|b| b.destroyed));
        assert_eq!(state.scheduler.pending_count(), 1);
        assert_eq!(state.phase, GamePhase::LevelClearPending);

        tick(&mut state, &idle(), 3500.0, &mut store);
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.blocks.len(), 1);
        assert_eq!(state.score(), 300);
        assert_eq!(state.scheduler.pending_count(), 0);
    }

    #[test]
    fn test_flash_from_previous_load_is_ignored() {
        // Flash outlives the reload delay so the old timer fires on the new level
        let tuning = Tuning {
            block_flash_ms: 5000.0,
            ..Tuning::default()
        };
        let mut state = GameState::new(tuning, levels(&[&["___"]]), 400.0, 0).unwrap();
        let mut store = MemoryStore::new();
        let x = state.blocks[0].bounds.center().x;

        aim(&mut state, Vec2::new(x, 60.0), Vec2::new(0.0, -4.0));
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert!(state.blocks[0].transitioning);

        state.balls.clear();
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert_eq!(state.phase, GamePhase::LifeLostPending);
        tick(&mut state, &idle(), 3600.0, &mut store);
        assert_eq!(state.phase, GamePhase::Serve);
        assert!(!state.blocks[0].transitioning);
        assert_eq!(state.blocks[0].durability, 1);

        // Hit the reloaded block; its own flash ends much later
        aim(&mut state, Vec2::new(x, 60.0), Vec2::new(0.0, -4.0));
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert_eq!(state.blocks[0].durability, 0);

        // The first load's flash comes due here and must not end this one
        tick(&mut state, &idle(), 1500.0, &mut store);
        assert!(state.blocks[0].transitioning);
        assert!(!state.blocks[0].destroyed);
        assert!(!state.blocks[0].collision_enabled);

        tick(&mut state, &idle(), 3600.0, &mut store);
        assert!(state.blocks[0].destroyed);
    }

    #[test]
    fn test_lives_run_out() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::with_score(200);
        state.scoreboard.high_score = 200;

        for expected in [2u8, 1] {
            state.balls.clear();
            tick(&mut state, &idle(), FRAME_MS, &mut store);
            assert_eq!(state.lives, expected);
            assert_eq!(state.phase, GamePhase::LifeLostPending);
            assert_eq!(state.banner, Some(Banner::LivesLeft(expected)));

            // Still pending; no second decrement
            tick(&mut state, &idle(), FRAME_MS, &mut store);
            assert_eq!(state.lives, expected);

            tick(&mut state, &idle(), 3500.0, &mut store);
            assert_eq!(state.phase, GamePhase::Serve);
            assert_eq!(state.balls.len(), 1);
            assert_eq!(state.level, 0);
        }

        state.scoreboard.score = 700;
        state.balls.clear();
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.banner, Some(Banner::GameOver));
        assert_eq!(store.load(), 700);
        assert_eq!(state.high_score(), 700);
        assert_eq!(state.score(), 0);

        tick(&mut state, &idle(), 3500.0, &mut store);
        assert_eq!(state.phase, GamePhase::Serve);
        assert_eq!(state.lives, 3);
        assert_eq!(state.level, 0);
    }

    #[test]
    fn test_game_over_keeps_better_high_score() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::with_score(5000);
        state.scoreboard.high_score = 5000;
        state.lives = 1;
        state.scoreboard.score = 300;
        state.balls.clear();
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(store.load(), 5000);
    }

    #[test]
    fn test_ball_below_screen_is_purged() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        aim(&mut state, Vec2::new(20.0, 395.0), Vec2::new(0.0, 4.0));
        let mut ticks = 0;
        while state.phase == GamePhase::Playing && ticks < 10 {
            tick(&mut state, &idle(), FRAME_MS, &mut store);
            ticks += 1;
        }
        assert_eq!(ticks, 4);
        assert!(state.balls.is_empty());
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_power_up_block_drops_power_up() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        // Level 0, row 1, middle column is the carrier
        aim(&mut state, Vec2::new(200.0, 80.0), Vec2::new(0.0, -4.0));
        tick(&mut state, &idle(), FRAME_MS, &mut store);

        assert!(state.blocks[7].is_cleared());
        assert_eq!(state.score(), 150);
        assert_eq!(state.power_ups.len(), 1);
        let power_up = &state.power_ups[0];
        assert_eq!(power_up.pos.y, state.blocks[7].bounds.y());
        assert!(power_up.observers.contains(&crate::sim::events::Subscriber::Controller));
    }

    #[test]
    fn test_caught_power_up_applies_effect() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        aim(&mut state, Vec2::new(20.0, 200.0), Vec2::new(4.0, -4.0));
        let carrier = state.blocks[7].bounds;
        state.on_event(&GameEvent::BlockHit {
            block: 7,
            bounds: carrier,
            score: 0,
            glyph: '+',
            destroyed: true,
        });
        // Drop it right above the paddle
        let paddle = state.paddle.bounds();
        state.power_ups[0].pos = Vec2::new(paddle.center().x - 25.0, paddle.y() - 36.0);
        let effect = state.power_ups[0].effect;

        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert!(state.power_ups.is_empty());
        match effect {
            PowerUpEffect::MultiBall(n) => assert_eq!(state.balls.len(), 1 + n),
            PowerUpEffect::Pistol => assert!(state.paddle.is_armed()),
        }
    }

    #[test]
    fn test_pistol_fires_then_expires() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        aim(&mut state, Vec2::new(20.0, 200.0), Vec2::new(0.0, -4.0));
        state.on_event(&GameEvent::PowerUpConsumed {
            id: 0,
            effect: PowerUpEffect::Pistol,
        });
        let pistol = state.paddle.pistol.unwrap();

        tick(&mut state, &idle(), 800.0, &mut store);
        assert_eq!(state.bullets.len(), 2);
        assert_eq!(state.bullets[0].pos.y, state.paddle.muzzles()[0].y);

        for _ in 0..10 {
            // Keep the ball in the field meanwhile
            state.balls[0].pos = Vec2::new(20.0, 200.0);
            tick(&mut state, &idle(), 800.0, &mut store);
        }
        assert!(!state.paddle.is_armed());
        assert!(!state.scheduler.is_pending(pistol.fire_timer));
        assert!(!state.scheduler.is_pending(pistol.expire_timer));

        let in_flight = state.bullets.len();
        state.balls[0].pos = Vec2::new(20.0, 200.0);
        tick(&mut state, &idle(), 800.0, &mut store);
        assert!(state.bullets.len() <= in_flight);
    }

    #[test]
    fn test_pistol_cancelled_on_reload() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        state.on_event(&GameEvent::PowerUpConsumed {
            id: 0,
            effect: PowerUpEffect::Pistol,
        });
        let pistol = state.paddle.pistol.unwrap();

        state.balls.clear();
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert_eq!(state.phase, GamePhase::LifeLostPending);
        assert!(!state.paddle.is_armed());
        assert!(!state.scheduler.is_pending(pistol.fire_timer));
        assert!(!state.scheduler.is_pending(pistol.expire_timer));

        tick(&mut state, &idle(), 3500.0, &mut store);
        tick(&mut state, &idle(), 1000.0, &mut store);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_bullet_hits_block() {
        let mut state = new_state(LevelSet::default());
        let mut store = MemoryStore::new();
        // Under level 0, row 1, first column
        state.on_event(&GameEvent::BulletFired {
            pos: Vec2::new(40.0, 72.0),
        });
        tick(&mut state, &idle(), FRAME_MS, &mut store);
        assert!(state.bullets.is_empty());
        assert_eq!(state.blocks[5].durability, 0);
        assert_eq!(state.score(), 100);
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(LevelSet::default());
        let mut b = new_state(LevelSet::default());
        let mut store_a = MemoryStore::new();
        let mut store_b = MemoryStore::new();

        let inputs = [
            TickInput {
                direction: Direction::Left,
                launch: false,
            },
            TickInput {
                direction: Direction::Left,
                launch: true,
            },
            TickInput {
                direction: Direction::Right,
                launch: false,
            },
            TickInput::default(),
        ];

        for _ in 0..300 {
            for input in &inputs {
                tick(&mut a, input, FRAME_MS, &mut store_a);
                tick(&mut b, input, FRAME_MS, &mut store_b);
            }
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score(), b.score());
        assert_eq!(a.lives, b.lives);
        assert_eq!(a.balls.len(), b.balls.len());
        for (x, y) in a.balls.iter().zip(&b.balls) {
            assert_eq!(x.pos, y.pos);
        }
    }
}
