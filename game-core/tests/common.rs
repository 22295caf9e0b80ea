#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use game_core::{Clock, EngineConfig, GameEngine, ManualClock, StatsAggregator, WordPool};
use game_persistence::{FileStore, PersistenceGateway};
use game_types::{Step, Transition};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;
use std::sync::Arc;

pub fn test_start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 10, 9, 30, 0).unwrap()
}

/// Engine over an in-memory gateway with a seeded pool and a manual clock.
pub fn create_test_engine(config: EngineConfig) -> (GameEngine, Arc<PersistenceGateway>, ManualClock) {
    let gateway = Arc::new(PersistenceGateway::in_memory());
    let clock = ManualClock::new(test_start_time());
    let engine = create_engine_on(gateway.clone(), clock.clone(), config, 1234);
    (engine, gateway, clock)
}

/// Engine over a file store rooted at `dir`, as a fresh process would open it.
pub fn create_file_engine(dir: &Path, clock: ManualClock, seed: u64) -> (GameEngine, Arc<PersistenceGateway>) {
    let store = FileStore::open(dir).unwrap();
    let gateway = Arc::new(PersistenceGateway::new(Arc::new(store)));
    let engine = create_engine_on(gateway.clone(), clock, EngineConfig::default(), seed);
    (engine, gateway)
}

pub fn create_engine_on(
    gateway: Arc<PersistenceGateway>,
    clock: ManualClock,
    config: EngineConfig,
    seed: u64,
) -> GameEngine {
    let pool = WordPool::with_rng(gateway.clone(), StdRng::seed_from_u64(seed));
    let stats = StatsAggregator::new(gateway.clone());
    GameEngine::from_parts(config, gateway, pool, stats, Arc::new(clock))
}

pub fn small_game(words_per_game: usize) -> EngineConfig {
    EngineConfig {
        words_per_game,
        ..EngineConfig::default()
    }
}

/// Answer the current word right or wrong, wait out the feedback window on
/// `clock`, and return the step the window produced.
pub fn play_word(engine: &mut GameEngine, clock: &ManualClock, correct: bool) -> Step {
    let is_real = engine.current_word().expect("a word should be presented").is_real;
    clock.advance(chrono::Duration::seconds(1));
    engine.answer(if correct { is_real } else { !is_real }).unwrap();

    clock.advance(chrono::Duration::seconds(2));
    engine.poll(clock.now()).expect("feedback window should be due")
}

/// Play until the engine reports game over, answering per `pattern` in turn.
pub fn play_to_end(engine: &mut GameEngine, clock: &ManualClock, pattern: &[bool]) -> Step {
    let mut i = 0;
    loop {
        let step = play_word(engine, clock, pattern[i % pattern.len()]);
        if matches!(step.transition, Transition::GameOver { .. }) {
            return step;
        }
        i += 1;
    }
}
