use chrono::{DateTime, Duration, Months, Utc};
use game_persistence::PersistenceGateway;
use game_types::{Difficulty, DifficultyStats, GameSession, GameStats, StatsTimeframe, TrendPoint};
use std::sync::Arc;
use tracing::{debug, info};

use crate::ScoringEngine;

pub const HISTORY_LIMIT: usize = 100;
/// Accuracy at or above this makes a session count toward the long-term streak.
pub const SUCCESS_ACCURACY: f64 = 0.70;
pub const DEFAULT_RECENT_GAMES: usize = 10;

pub trait StatsFold {
    /// Fold one completed session into the aggregate. Incomplete sessions
    /// are ignored and `false` is returned.
    fn fold_session(&mut self, session: &GameSession) -> bool;
}

impl StatsFold for GameStats {
    fn fold_session(&mut self, session: &GameSession) -> bool {
        if !session.is_completed {
            return false;
        }

        self.games_history.push(session.clone());
        if self.games_history.len() > HISTORY_LIMIT {
            let overflow = self.games_history.len() - HISTORY_LIMIT;
            self.games_history.drain(..overflow);
        }

        self.total_games_played += 1;
        self.total_words_guessed += session.total_words;
        self.total_correct_guesses += session.correct_answers;
        self.total_play_time += session.duration_secs();

        let accuracy = session.accuracy();
        self.best_score = self.best_score.max(session.score);
        self.best_accuracy = self.best_accuracy.max(accuracy);

        if accuracy >= SUCCESS_ACCURACY {
            self.streak_count += 1;
            self.best_streak = self.best_streak.max(self.streak_count);
        } else {
            self.streak_count = 0;
        }

        self.last_play_date = session.end_time;
        true
    }
}

/// Earliest end time that still belongs to `timeframe`. `None` for all time.
pub fn window_cutoff(timeframe: StatsTimeframe, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let cutoff = match timeframe {
        StatsTimeframe::Week => now - Duration::days(7),
        StatsTimeframe::Month => now.checked_sub_months(Months::new(1))?,
        StatsTimeframe::Year => now.checked_sub_months(Months::new(12))?,
        StatsTimeframe::AllTime => return None,
    };
    Some(cutoff)
}

/// Stats restricted to `timeframe`, rebuilt by folding the matching history
/// entries into an empty aggregate. All time is the lifetime aggregate itself.
pub fn windowed_stats(stats: &GameStats, timeframe: StatsTimeframe, now: DateTime<Utc>) -> GameStats {
    let Some(cutoff) = window_cutoff(timeframe, now) else {
        return stats.clone();
    };

    let mut windowed = GameStats::default();
    for session in &stats.games_history {
        if session.end_time.is_some_and(|end| end >= cutoff) {
            windowed.fold_session(session);
        }
    }
    windowed
}

/// Per-difficulty totals over the retained history, one entry per difficulty.
pub fn difficulty_breakdown(stats: &GameStats) -> Vec<DifficultyStats> {
    let mut breakdown: Vec<DifficultyStats> =
        Difficulty::ALL.iter().map(|d| DifficultyStats::empty(*d)).collect();

    for result in stats.games_history.iter().flat_map(|s| s.words.iter()) {
        if let Some(bucket) = breakdown.iter_mut().find(|b| b.difficulty == result.word.difficulty) {
            bucket.total_words += 1;
            if result.is_correct() {
                bucket.correct_words += 1;
                bucket.total_score += ScoringEngine::points(result);
            }
        }
    }

    breakdown
}

fn trend(stats: &GameStats, count: usize, value: impl Fn(&GameSession) -> f64) -> Vec<TrendPoint> {
    let offset = stats.games_history.len().saturating_sub(count);
    stats
        .recent_games(count)
        .iter()
        .enumerate()
        .map(|(i, session)| TrendPoint {
            game_number: (offset + i + 1) as u32,
            value: value(session),
        })
        .collect()
}

pub fn accuracy_trend(stats: &GameStats, count: usize) -> Vec<TrendPoint> {
    trend(stats, count, GameSession::accuracy)
}

pub fn score_trend(stats: &GameStats, count: usize) -> Vec<TrendPoint> {
    trend(stats, count, |session| session.score as f64)
}

/// Owns the lifetime stats and writes them back after every fold.
pub struct StatsAggregator {
    gateway: Arc<PersistenceGateway>,
    stats: GameStats,
}

impl StatsAggregator {
    pub fn new(gateway: Arc<PersistenceGateway>) -> Self {
        let stats = gateway.load_stats();
        Self { gateway, stats }
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn fold(&mut self, session: &GameSession) -> bool {
        if !self.stats.fold_session(session) {
            debug!("Ignoring incomplete session started at {}", session.start_time);
            return false;
        }

        self.gateway.save_stats(&self.stats);
        info!(
            "Folded session: score {}, accuracy {:.2}, streak {}",
            session.score,
            session.accuracy(),
            self.stats.streak_count
        );
        true
    }

    pub fn windowed_at(&self, timeframe: StatsTimeframe, now: DateTime<Utc>) -> GameStats {
        windowed_stats(&self.stats, timeframe, now)
    }

    pub fn difficulty_breakdown(&self) -> Vec<DifficultyStats> {
        difficulty_breakdown(&self.stats)
    }

    pub fn recent_games(&self, count: usize) -> &[GameSession] {
        self.stats.recent_games(count)
    }

    pub fn accuracy_trend(&self, count: usize) -> Vec<TrendPoint> {
        accuracy_trend(&self.stats, count)
    }

    pub fn score_trend(&self, count: usize) -> Vec<TrendPoint> {
        score_trend(&self.stats, count)
    }

    pub fn reset(&mut self) {
        self.stats = GameStats::default();
        self.gateway.save_stats(&self.stats);
        info!("Stats reset");
    }

    pub fn reload(&mut self) {
        self.stats = self.gateway.load_stats();
    }
}
