use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Difficulty, GameSession, Word};

/// Lifetime statistics, written to `gameStats.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameStats {
    pub total_games_played: u32,
    pub total_words_guessed: u32,
    pub total_correct_guesses: u32,
    pub best_score: u32,
    pub best_accuracy: f64,
    pub total_play_time: f64, // seconds
    pub games_history: Vec<GameSession>, // oldest first
    pub streak_count: u32,
    pub best_streak: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub last_play_date: Option<DateTime<Utc>>,
}

impl GameStats {
    pub fn overall_accuracy(&self) -> f64 {
        if self.total_words_guessed == 0 {
            0.0
        } else {
            self.total_correct_guesses as f64 / self.total_words_guessed as f64
        }
    }

    /// Mean score over the retained history.
    pub fn average_score(&self) -> f64 {
        if self.games_history.is_empty() {
            return 0.0;
        }
        let total: u64 = self.games_history.iter().map(|g| g.score as u64).sum();
        total as f64 / self.games_history.len() as f64
    }

    pub fn average_play_time(&self) -> f64 {
        if self.total_games_played == 0 {
            0.0
        } else {
            self.total_play_time / self.total_games_played as f64
        }
    }

    /// The last `count` sessions of the history, oldest first.
    pub fn recent_games(&self, count: usize) -> &[GameSession] {
        let start = self.games_history.len().saturating_sub(count);
        &self.games_history[start..]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub enum StatsTimeframe {
    Week,
    Month,
    Year,
    AllTime,
}

impl StatsTimeframe {
    pub const ALL: [StatsTimeframe; 4] = [
        StatsTimeframe::Week,
        StatsTimeframe::Month,
        StatsTimeframe::Year,
        StatsTimeframe::AllTime,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            StatsTimeframe::Week => "This Week",
            StatsTimeframe::Month => "This Month",
            StatsTimeframe::Year => "This Year",
            StatsTimeframe::AllTime => "All Time",
        }
    }
}

/// Totals for one difficulty bucket across the retained history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DifficultyStats {
    pub difficulty: Difficulty,
    pub total_words: u32,
    pub correct_words: u32,
    pub total_score: u32,
}

impl DifficultyStats {
    pub fn empty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            total_words: 0,
            correct_words: 0,
            total_score: 0,
        }
    }

    pub fn accuracy(&self) -> f64 {
        if self.total_words == 0 {
            0.0
        } else {
            self.correct_words as f64 / self.total_words as f64
        }
    }

    /// Average points per correct answer.
    pub fn average_score(&self) -> f64 {
        if self.correct_words == 0 {
            0.0
        } else {
            self.total_score as f64 / self.correct_words as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TrendPoint {
    pub game_number: u32,
    pub value: f64,
}

/// Export/import bundle: `{stats, words}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ExportBundle {
    pub stats: GameStats,
    pub words: Vec<Word>,
}
