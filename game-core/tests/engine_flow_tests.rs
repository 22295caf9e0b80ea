mod common;

use common::*;
use game_core::{Clock, EngineConfig};
use game_types::{EnginePhase, GameOverReason, StatsTimeframe, Transition};
use std::collections::HashSet;

#[test]
fn test_perfect_game_folds_into_stats() {
    let (mut engine, gateway, clock) = create_test_engine(small_game(4));
    engine.start(None);

    let step = play_to_end(&mut engine, &clock, &[true]);

    match step.transition {
        Transition::GameOver { reason, score, accuracy } => {
            assert_eq!(reason, GameOverReason::WordsExhausted);
            assert_eq!(accuracy, 1.0);
            assert_eq!(score, engine.session().unwrap().score);
        }
        other => panic!("expected game over, got {:?}", other),
    }

    let stats = gateway.load_stats();
    assert_eq!(stats.total_games_played, 1);
    assert_eq!(stats.total_words_guessed, 4);
    assert_eq!(stats.streak_count, 1);
    assert_eq!(stats.total_play_time, 12.0);
    assert_eq!(stats.last_play_date, engine.session().unwrap().end_time);
}

#[test]
fn test_failed_game_resets_session_streak() {
    let (mut engine, gateway, clock) = create_test_engine(small_game(6));

    engine.start(None);
    play_to_end(&mut engine, &clock, &[true]);
    let best_score = gateway.load_stats().best_score;

    engine.start(None);
    let step = play_to_end(&mut engine, &clock, &[false]);
    assert!(matches!(
        step.transition,
        Transition::GameOver {
            reason: GameOverReason::OutOfLives,
            ..
        }
    ));
    assert_eq!(engine.session().unwrap().total_words, 3);

    let stats = gateway.load_stats();
    assert_eq!(stats.total_games_played, 2);
    assert_eq!(stats.streak_count, 0);
    assert_eq!(stats.best_streak, 1);
    assert_eq!(stats.best_score, best_score);
    assert_eq!(stats.best_accuracy, 1.0);
}

#[test]
fn test_words_never_repeat_across_games() {
    let (mut engine, _, clock) = create_test_engine(small_game(6));
    let mut served = HashSet::new();

    for _ in 0..4 {
        engine.start(None);
        for word in engine.words() {
            assert!(served.insert(word.text.clone()), "'{}' was served twice", word.text);
        }
        play_to_end(&mut engine, &clock, &[true, true, false]);
    }

    assert_eq!(served.len(), 24);
    assert_eq!(engine.pool().seen_words().len(), 24);
}

#[test]
fn test_windowed_views_agree_with_aggregate() {
    let (mut engine, _, clock) = create_test_engine(small_game(5));

    engine.start(None);
    play_to_end(&mut engine, &clock, &[true, false]);
    let session_accuracy = engine.session().unwrap().accuracy();

    let now = clock.now();
    let week = engine.stats().windowed_at(StatsTimeframe::Week, now);
    assert_eq!(week.overall_accuracy(), session_accuracy);

    let all_time = engine.stats().windowed_at(StatsTimeframe::AllTime, now);
    assert_eq!(&all_time, engine.stats().stats());

    clock.advance(chrono::Duration::days(8));
    let later = clock.now();
    assert_eq!(engine.stats().windowed_at(StatsTimeframe::Week, later).total_games_played, 0);
    assert_eq!(engine.stats().windowed_at(StatsTimeframe::Month, later).total_games_played, 1);
}

#[test]
fn test_abandoned_game_is_not_counted() {
    let (mut engine, gateway, clock) = create_test_engine(EngineConfig::default());
    engine.start(None);
    play_word(&mut engine, &clock, true);

    engine.return_to_idle();
    engine.start(None);

    assert_eq!(gateway.load_stats().total_games_played, 0);
    assert_eq!(engine.session().unwrap().total_words, 0);
}

#[test]
fn test_game_resumes_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let clock = game_core::ManualClock::new(test_start_time());

    let (mut first, _) = create_file_engine(dir.path(), clock.clone(), 1);
    first.start(None);
    for _ in 0..3 {
        play_word(&mut first, &clock, true);
    }
    let words = first.words().to_vec();
    let score = first.snapshot().score;
    drop(first);

    let (mut second, gateway) = create_file_engine(dir.path(), clock.clone(), 2);
    let step = second.resume().unwrap();

    assert_eq!(step.snapshot.phase, EnginePhase::Active);
    assert_eq!(step.snapshot.word_index, 3);
    assert_eq!(step.snapshot.score, score);
    assert_eq!(second.words(), words.as_slice());
    assert_eq!(second.pool().seen_words().len(), words.len());
    assert_eq!(gateway.load_seen_words().len(), words.len());

    let step = play_word(&mut second, &clock, true);
    assert_eq!(step.snapshot.word_index, 4);
}

#[test]
fn test_export_import_between_installs() {
    let (mut source, _, clock) = create_test_engine(small_game(3));
    source.start(None);
    play_to_end(&mut source, &clock, &[true]);
    let bundle = source.export_data().unwrap();

    let (mut target, target_gateway, _) = create_test_engine(small_game(3));
    assert!(target.import_data(&bundle));
    assert_eq!(target.stats().stats(), source.stats().stats());
    assert_eq!(target_gateway.load_stats().total_games_played, 1);

    assert!(!target.import_data(b"not json"));
    assert_eq!(target.stats().stats().total_games_played, 1);
}

#[test]
fn test_exhausted_catalog_ends_game_immediately() {
    let (mut engine, gateway, clock) = create_test_engine(small_game(1));

    // one hard word per game, 10 hard words in the fallback catalog
    for _ in 0..10 {
        engine.start(None);
        play_to_end(&mut engine, &clock, &[true]);
    }
    engine.start(None);
    assert_eq!(engine.phase(), EnginePhase::Over);

    assert_eq!(engine.snapshot().word_count, 0);
    assert_eq!(gateway.load_stats().total_games_played, 10);
}
