//! Brick Breaker entry point
//!
//! The browser build is driven through `platform::web::WebGame`. Natively
//! there is no window; the binary plays a headless demo with a simple
//! autopilot and logs how it went.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use brick_breaker::platform::keys;
    use brick_breaker::sim::GamePhase;
    use brick_breaker::{Game, LevelSet, MemoryStore, Tuning};

    env_logger::init();
    log::info!("Brick Breaker (native) starting headless demo...");

    let ticks: u64 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(20_000);

    let mut game = match Game::new(Tuning::load(), LevelSet::default(), 400.0, MemoryStore::new()) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Could not start: {err}");
            std::process::exit(1);
        }
    };

    let mut held: Option<u32> = None;
    for _ in 0..ticks {
        let state = game.state();
        let phase = state.phase;
        if phase == GamePhase::GameCleared {
            break;
        }

        // Chase the lowest ball
        let target = state
            .balls
            .iter()
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|b| b.pos.x);
        let paddle_center = state.paddle.center_x();
        let wanted = match target {
            Some(x) if x < paddle_center - 8.0 => Some(keys::LEFT),
            Some(x) if x > paddle_center + 8.0 => Some(keys::RIGHT),
            _ => None,
        };
        if wanted != held {
            if let Some(code) = held.take() {
                game.on_key_released(code);
            }
            if let Some(code) = wanted {
                game.on_key_pressed(code);
            }
            held = wanted;
        }
        if phase == GamePhase::Serve {
            game.on_key_pressed(keys::SPACE);
            game.on_key_released(keys::SPACE);
        }

        game.on_tick(1000.0 / 60.0);
    }

    let state = game.state();
    log::info!(
        "Demo finished after {} ticks: level {}, lives {}, score {}, high score {}, phase {:?}",
        state.time_ticks,
        state.level + 1,
        state.lives,
        state.score(),
        state.high_score(),
        state.phase
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::WebGame, this is just to satisfy the compiler
}
