//! Game state and the level controller
//!
//! `GameState` owns every entity of the current level plus the session
//! counters (level, lives, score, speed ramp). It reacts to notifications
//! routed to the controller and to timers, and decides when a level is won or
//! lost. The per-tick driver lives in `tick`.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ball::{Ball, BallPhysics};
use super::block::{Block, build_level, is_level_cleared};
use super::bullet::Bullet;
use super::collidable::{Border, BorderSide, Bounds, ColliderRef};
use super::events::{GameEvent, GameObserver, Notification, Outbox, Subscriber};
use super::paddle::{Paddle, Pistol};
use super::power_up::{PowerUp, PowerUpEffect};
use super::timer::{Scheduler, TimerEvent};
use crate::config::Tuning;
use crate::error::GameError;
use crate::levels::{LevelSet, POWER_UP_GLYPH};
use crate::persistence::HighScoreStore;
use crate::score::ScoreBoard;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Ball resting on the paddle, waiting for launch input
    Serve,
    /// Active gameplay
    Playing,
    /// Level won, next level loading
    LevelClearPending,
    /// Last ball lost, same level reloading
    LifeLostPending,
    /// Out of lives, session restarting
    GameOver,
    /// Every level won; stays here until the host restarts
    GameCleared,
}

impl GamePhase {
    /// Phases in which win/loss is evaluated
    pub fn is_in_play(&self) -> bool {
        matches!(self, GamePhase::Serve | GamePhase::Playing)
    }
}

/// Centered message shown over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    /// Start-of-level help
    Launch,
    /// 1-based number of the level just won
    LevelCleared(usize),
    LivesLeft(u8),
    GameOver,
    GameCleared,
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Launch => write!(f, "PRESS SPACE OR TAP TO START"),
            Banner::LevelCleared(level) => write!(f, "LEVEL {level} CLEARED!"),
            Banner::LivesLeft(lives) => write!(f, "LIVES LEFT: {lives}"),
            Banner::GameOver => write!(f, "GAME OVER"),
            Banner::GameCleared => write!(f, "GAME CLEARED!"),
        }
    }
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    pub tuning: Tuning,
    pub levels: LevelSet,
    /// Side of the square game area (logical units)
    pub area_width: f32,
    /// Height of the score bar; the playfield starts below it
    pub score_bar: f32,
    /// Current level index (0-based)
    pub level: usize,
    pub lives: u8,
    pub phase: GamePhase,
    pub banner: Option<Banner>,
    pub scoreboard: ScoreBoard,
    /// Paddle speed for the next paddle built (ramps with levels)
    pub paddle_speed: f32,
    /// Ball launch speed for the next balls built (ramps with levels)
    pub ball_speed: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub paddle: Paddle,
    pub balls: Vec<Ball>,
    pub blocks: Vec<Block>,
    pub power_ups: Vec<PowerUp>,
    pub bullets: Vec<Bullet>,
    pub borders: [Border; 3],
    pub(crate) scheduler: Scheduler,
    rng: Pcg32,
    /// Bumped on every level load; stale flash timers carry an old epoch
    level_epoch: u32,
    /// Bumped on every pistol arming
    pistol_generation: u32,
    next_id: u32,
}

impl GameState {
    /// Start a session on the tuning's initial level.
    ///
    /// `area_width` is the logical size of the square game area; every
    /// entity size derives from it. Fails on an empty or malformed level set.
    pub fn new(
        tuning: Tuning,
        levels: LevelSet,
        area_width: f32,
        high_score: u64,
    ) -> Result<Self, GameError> {
        if !(area_width.is_finite() && area_width >= 1.0) {
            return Err(GameError::DegeneratePlayArea { width: area_width });
        }
        levels.validate()?;

        let score_bar = (area_width * tuning.score_bar_ratio).floor();
        let paddle = Paddle::new(
            area_width,
            area_width,
            (area_width * tuning.paddle_width_ratio).ceil(),
            tuning.paddle_height,
            tuning.paddle_speed,
        );

        let mut state = Self {
            level: tuning.initial_level.min(levels.len() - 1),
            lives: tuning.initial_lives,
            phase: GamePhase::Serve,
            banner: None,
            scoreboard: ScoreBoard::new(high_score),
            paddle_speed: tuning.paddle_speed,
            ball_speed: tuning.ball_speed,
            time_ticks: 0,
            paddle,
            balls: Vec::new(),
            blocks: Vec::new(),
            power_ups: Vec::new(),
            bullets: Vec::new(),
            borders: Border::screen_borders(area_width, score_bar),
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(tuning.seed),
            level_epoch: 0,
            pistol_generation: 0,
            next_id: 1,
            area_width,
            score_bar,
            levels,
            tuning,
        };
        state.load_level()?;
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Bottom edge of the game area
    pub fn floor_y(&self) -> f32 {
        self.area_width
    }

    pub fn score(&self) -> u64 {
        self.scoreboard.score
    }

    pub fn high_score(&self) -> u64 {
        self.scoreboard.high_score
    }

    /// Rebuild blocks, paddle and ball for `self.level`
    pub fn load_level(&mut self) -> Result<(), GameError> {
        let row_height = self.area_width * self.tuning.block_height_ratio;
        let mut blocks = build_level(
            &self.levels,
            self.level,
            self.area_width,
            self.score_bar,
            row_height,
        )?;
        for block in &mut blocks {
            block.add_observer(Subscriber::ScoreBoard);
            if block.is_power_up_carrier() {
                block.add_observer(Subscriber::Controller);
            }
        }

        self.disarm_pistol();
        self.level_epoch = self.level_epoch.wrapping_add(1);
        self.blocks = blocks;
        self.power_ups.clear();
        self.bullets.clear();

        self.paddle = Paddle::new(
            self.area_width,
            self.area_width,
            (self.area_width * self.tuning.paddle_width_ratio).ceil(),
            self.tuning.paddle_height,
            self.paddle_speed,
        );

        let id = self.next_entity_id();
        let physics = BallPhysics {
            base_speed: self.tuning.ball_speed,
            speed: self.ball_speed,
            acceleration_factor: self.tuning.acceleration_factor,
            deceleration_ticks: self.tuning.deceleration_ticks,
        };
        let mut ball = Ball::new(id, self.tuning.ball_diameter, physics, self.floor_y());
        ball.collider.extend_targets((0..self.blocks.len()).map(ColliderRef::Block));
        ball.collider.add_collision_target(ColliderRef::Paddle);
        ball.collider.extend_targets([
            ColliderRef::Border(BorderSide::Left),
            ColliderRef::Border(BorderSide::Right),
            ColliderRef::Border(BorderSide::Top),
        ]);
        ball.follow(&self.paddle);
        self.balls = vec![ball];

        self.phase = GamePhase::Serve;
        self.banner = Some(Banner::Launch);
        log::info!(
            "Level {} loaded: {} blocks, lives={}, ball speed={}, paddle speed={}",
            self.level + 1,
            self.blocks.len(),
            self.lives,
            self.ball_speed,
            self.paddle_speed
        );
        Ok(())
    }

    /// Back to the initial level with full lives, zero score and the
    /// starting speeds
    pub fn restart(&mut self) -> Result<(), GameError> {
        self.scheduler.clear();
        self.reset_session();
        self.load_level()
    }

    fn reset_session(&mut self) {
        self.level = self.tuning.initial_level.min(self.levels.len().saturating_sub(1));
        self.lives = self.tuning.initial_lives;
        self.paddle_speed = self.tuning.paddle_speed;
        self.ball_speed = self.tuning.ball_speed;
        self.scoreboard.reset();
    }

    /// Serve -> Playing: release every ball resting on the paddle
    pub fn launch(&mut self) {
        if self.phase != GamePhase::Serve {
            return;
        }
        let direction = self.paddle.movement_direction;
        for ball in self.balls.iter_mut().filter(|b| b.is_following()) {
            ball.launch(direction);
        }
        self.phase = GamePhase::Playing;
        self.banner = None;
        log::info!("Ball launched ({:?})", direction);
    }

    /// Route this tick's notifications to their subscribers
    pub fn dispatch(&mut self, notifications: Vec<Notification>) {
        for Notification { to, event } in notifications {
            match to {
                Subscriber::ScoreBoard => self.scoreboard.on_event(&event),
                Subscriber::Controller => self.on_event(&event),
            }
        }
    }

    /// Apply a due timer. Volleys go out through `outbox`.
    pub fn apply_timer(&mut self, event: TimerEvent, outbox: &mut Outbox) {
        match event {
            TimerEvent::LoadLevel {
                level,
                reset,
                game_over,
            } => {
                if game_over {
                    self.reset_session();
                } else if !reset {
                    self.paddle_speed += self.tuning.paddle_speed_increase;
                    self.ball_speed += self.tuning.ball_speed_increase;
                    self.level = level;
                }
                if let Err(err) = self.load_level() {
                    log::error!("Failed to load level {}: {err}", self.level + 1);
                }
            }
            TimerEvent::BlockFlashEnd { block, epoch } => {
                if epoch != self.level_epoch {
                    return;
                }
                if let Some(block) = self.blocks.get_mut(block) {
                    block.end_flash();
                }
            }
            TimerEvent::PistolFire { generation } => {
                if self.pistol_generation_is(generation) {
                    for pos in self.paddle.muzzles() {
                        outbox.notify_all(&[Subscriber::Controller], GameEvent::BulletFired { pos });
                    }
                }
            }
            TimerEvent::PistolExpire { generation } => {
                if self.pistol_generation_is(generation) {
                    log::debug!("Pistol expired");
                    self.disarm_pistol();
                }
            }
        }
    }

    fn pistol_generation_is(&self, generation: u32) -> bool {
        self.paddle
            .pistol
            .is_some_and(|p| p.generation == generation)
    }

    /// Start the flash timer of a block that was just hit
    pub(crate) fn schedule_block_flash(&mut self, block: usize) {
        self.scheduler.schedule(
            self.tuning.block_flash_ms,
            TimerEvent::BlockFlashEnd {
                block,
                epoch: self.level_epoch,
            },
        );
    }

    fn arm_pistol(&mut self) {
        self.disarm_pistol();
        self.pistol_generation = self.pistol_generation.wrapping_add(1);
        let generation = self.pistol_generation;
        let fire_timer = self.scheduler.schedule_repeating(
            self.tuning.pistol_fire_interval_ms,
            TimerEvent::PistolFire { generation },
        );
        let expire_timer = self
            .scheduler
            .schedule(self.tuning.pistol_duration_ms, TimerEvent::PistolExpire { generation });
        self.paddle.pistol = Some(Pistol {
            generation,
            fire_timer,
            expire_timer,
        });
    }

    fn disarm_pistol(&mut self) {
        if let Some(pistol) = self.paddle.pistol.take() {
            self.scheduler.cancel(pistol.fire_timer);
            self.scheduler.cancel(pistol.expire_timer);
            log::debug!("Pistol timers cancelled (generation {})", pistol.generation);
        }
    }

    fn spawn_power_up(&mut self, origin: &Bounds) {
        let id = self.next_entity_id();
        let effect = PowerUpEffect::roll(&mut self.rng, self.tuning.multi_ball_count);
        let mut power_up = PowerUp::spawn(
            id,
            origin,
            Vec2::new(self.tuning.power_up_width, self.tuning.power_up_height),
            self.tuning.power_up_fall_speed,
            effect,
            self.floor_y(),
        );
        power_up.add_observer(Subscriber::Controller);
        log::debug!("Power-up {id} spawned at {:?}: {:?}", power_up.pos, effect);
        self.power_ups.push(power_up);
    }

    fn fire_bullet(&mut self, muzzle: Vec2) {
        let id = self.next_entity_id();
        let mut bullet = Bullet::fire(
            id,
            muzzle,
            Vec2::new(self.tuning.bullet_width, self.tuning.bullet_height),
            self.tuning.bullet_speed,
        );
        bullet
            .collider
            .extend_targets((0..self.blocks.len()).map(ColliderRef::Block));
        bullet
            .collider
            .add_collision_target(ColliderRef::Border(BorderSide::Top));
        self.bullets.push(bullet);
    }

    /// Clone the lead ball `count` times with mirrored, alternating velocities.
    /// Balls that already dropped out this tick are not eligible.
    fn split_balls(&mut self, count: usize) {
        let Some(lead) = self
            .balls
            .iter_mut()
            .find_map(|b| (b.is_live() && !b.is_following()).then(|| b.clone()))
        else {
            log::debug!("Multi-ball with no ball in play, ignored");
            return;
        };
        for i in 0..count {
            let id = self.next_entity_id();
            let vy = if i % 2 == 0 { -lead.vel.y } else { lead.vel.y };
            self.balls.push(lead.split(id, Vec2::new(-lead.vel.x, vy)));
        }
        log::debug!("Multi-ball: {} balls in play", self.balls.len());
    }

    fn apply_effect(&mut self, effect: PowerUpEffect) {
        log::debug!("Applying power-up {:?}", effect);
        match effect {
            PowerUpEffect::MultiBall(count) => self.split_balls(count),
            PowerUpEffect::Pistol => self.arm_pistol(),
        }
    }

    /// Drop balls that left the field and spent power-ups and bullets
    pub fn prune(&mut self) {
        self.balls.retain_mut(|b| b.is_live());
        self.power_ups.retain(|p| !p.destroyed);
        self.bullets.retain(|b| !b.destroyed);
    }

    /// Decide whether the level was won or lost this tick
    pub fn evaluate_end_game(&mut self, store: &mut dyn HighScoreStore) {
        if !self.phase.is_in_play() {
            return;
        }

        if self.balls.is_empty() {
            self.lose_life(store);
        } else if is_level_cleared(&self.blocks) {
            self.clear_level(store);
        }
    }

    fn end_of_level_teardown(&mut self) {
        self.disarm_pistol();
        self.power_ups.clear();
        self.bullets.clear();
    }

    fn lose_life(&mut self, store: &mut dyn HighScoreStore) {
        self.end_of_level_teardown();
        self.lives = self.lives.saturating_sub(1);

        if self.lives > 0 {
            log::info!("Life lost, {} left", self.lives);
            self.phase = GamePhase::LifeLostPending;
            self.banner = Some(Banner::LivesLeft(self.lives));
            self.scheduler.schedule(
                self.tuning.level_load_delay_ms,
                TimerEvent::LoadLevel {
                    level: self.level,
                    reset: true,
                    game_over: false,
                },
            );
        } else {
            log::info!("Game over with score {}", self.scoreboard.score);
            self.phase = GamePhase::GameOver;
            self.banner = Some(Banner::GameOver);
            self.scoreboard.persist_if_improved(store);
            self.scoreboard.reset();
            self.scheduler.schedule(
                self.tuning.level_load_delay_ms,
                TimerEvent::LoadLevel {
                    level: self.tuning.initial_level,
                    reset: true,
                    game_over: true,
                },
            );
        }
    }

    fn clear_level(&mut self, store: &mut dyn HighScoreStore) {
        self.end_of_level_teardown();
        for ball in &mut self.balls {
            ball.destroy();
        }
        self.balls.clear();

        let next = self.level + 1;
        if next < self.levels.len() {
            log::info!("Level {} cleared", next);
            self.phase = GamePhase::LevelClearPending;
            self.banner = Some(Banner::LevelCleared(next));
            self.scheduler.schedule(
                self.tuning.level_load_delay_ms,
                TimerEvent::LoadLevel {
                    level: next,
                    reset: false,
                    game_over: false,
                },
            );
        } else {
            log::info!("Game cleared with score {}", self.scoreboard.score);
            self.phase = GamePhase::GameCleared;
            self.banner = Some(Banner::GameCleared);
            self.scoreboard.persist_if_improved(store);
        }
    }
}

/// The level controller listens for power-up blocks, caught power-ups and
/// pistol volleys
impl GameObserver for GameState {
    fn on_event(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::BlockHit {
                bounds,
                glyph,
                destroyed,
                ..
            } => {
                if destroyed && glyph == POWER_UP_GLYPH {
                    self.spawn_power_up(&bounds);
                }
            }
            GameEvent::PowerUpConsumed { effect, .. } => self.apply_effect(effect),
            GameEvent::BulletFired { pos } => self.fire_bullet(pos),
        }
    }
}
