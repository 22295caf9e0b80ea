use chrono::{DateTime, Utc};
use game_types::{Difficulty, Word, WordResult};

pub const BASE_POINTS: u32 = 10;
pub const SPEED_BONUS: u32 = 5;
/// Answers strictly faster than this earn the speed bonus.
pub const SPEED_BONUS_THRESHOLD_SECS: f64 = 3.0;

pub struct ScoringEngine;

impl ScoringEngine {
    pub fn difficulty_multiplier(difficulty: Difficulty) -> u32 {
        match difficulty {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Points for one answered word: nothing for a wrong guess, otherwise
    /// `10 x multiplier` plus the speed bonus.
    pub fn points(result: &WordResult) -> u32 {
        if !result.is_correct() {
            return 0;
        }

        let speed_bonus = if result.response_time < SPEED_BONUS_THRESHOLD_SECS {
            SPEED_BONUS
        } else {
            0
        };

        BASE_POINTS * Self::difficulty_multiplier(result.word.difficulty) + speed_bonus
    }

    /// Build the result record for a guess on `word`.
    pub fn evaluate_guess(
        word: &Word,
        guess: bool,
        response_time: f64,
        timestamp: DateTime<Utc>,
    ) -> WordResult {
        WordResult {
            word: word.clone(),
            user_guess: guess,
            response_time: response_time.max(0.0),
            timestamp,
        }
    }
}
