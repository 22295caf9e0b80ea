use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use ts_rs::TS;

use crate::{Word, WordResult};

pub const DEFAULT_STARTING_LIVES: u32 = 3;

/// One play-through. Mutated only by the session ledger in `game-core`:
/// results are appended during play and the terminal transition stamps
/// `end_time` and `is_completed` together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct GameSession {
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub end_time: Option<DateTime<Utc>>,
    pub words: Vec<WordResult>,
    pub score: u32,
    pub total_words: u32,
    pub correct_answers: u32,
    pub is_completed: bool,
    pub lives: u32,
    pub current_streak: u32,
    pub max_streak: u32,
}

impl GameSession {
    pub fn new(start_time: DateTime<Utc>, lives: u32) -> Self {
        Self {
            start_time,
            end_time: None,
            words: Vec::new(),
            score: 0,
            total_words: 0,
            correct_answers: 0,
            is_completed: false,
            lives,
            current_streak: 0,
            max_streak: 0,
        }
    }

    /// `correct_answers / total_words`, 0.0 for an empty session.
    pub fn accuracy(&self) -> f64 {
        if self.total_words == 0 {
            0.0
        } else {
            self.correct_answers as f64 / self.total_words as f64
        }
    }

    /// Seconds between start and end, 0.0 while the session is still open.
    pub fn duration_secs(&self) -> f64 {
        match self.end_time {
            Some(end_time) => {
                let elapsed = end_time - self.start_time;
                elapsed
                    .num_microseconds()
                    .map(|micros| micros as f64 / 1_000_000.0)
                    .unwrap_or(0.0)
                    .max(0.0)
            }
            None => 0.0,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.lives == 0 || self.is_completed
    }
}

/// Resume snapshot written to `savedGame.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SavedGameState {
    pub game_session: GameSession,
    pub game_words: Vec<Word>,
    pub current_word_index: usize,
}

/// Every word text ever served, written to `seenWords.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SeenWords {
    pub seen: BTreeSet<String>,
}

impl SeenWords {
    pub fn new<I, S>(seen: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            seen: seen.into_iter().map(Into::into).collect(),
        }
    }
}
