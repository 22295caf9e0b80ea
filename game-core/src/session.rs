use chrono::{DateTime, Utc};
use game_types::{GameSession, WordResult};

use crate::ScoringEngine;

/// The only mutations a `GameSession` goes through.
///
/// Invariants kept here: `total_words == words.len()`, `correct_answers`
/// counts the correct results, `lives` only ever drops by one per wrong
/// answer, and `end_time`/`is_completed` are set together exactly once.
pub trait SessionLedger {
    /// Appends a result and applies its score, streak and lives effects.
    /// Returns the points earned.
    fn record_result(&mut self, result: WordResult) -> u32;

    /// Pops the last result and takes back its score and correctness.
    /// Lives and streak counters are left as they are.
    fn revert_last_result(&mut self) -> Option<WordResult>;

    /// Terminal transition. Returns `false` if the session was already completed.
    fn complete(&mut self, at: DateTime<Utc>) -> bool;
}

impl SessionLedger for GameSession {
    fn record_result(&mut self, result: WordResult) -> u32 {
        let points = ScoringEngine::points(&result);

        if result.is_correct() {
            self.correct_answers += 1;
            self.score += points;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
        } else {
            self.current_streak = 0;
            self.lives = self.lives.saturating_sub(1);
        }

        self.words.push(result);
        self.total_words += 1;
        points
    }

    fn revert_last_result(&mut self) -> Option<WordResult> {
        let removed = self.words.pop()?;
        self.total_words = self.total_words.saturating_sub(1);

        if removed.is_correct() {
            self.correct_answers = self.correct_answers.saturating_sub(1);
            self.score = self.score.saturating_sub(ScoringEngine::points(&removed));
        }

        Some(removed)
    }

    fn complete(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_completed {
            return false;
        }
        self.end_time = Some(at);
        self.is_completed = true;
        true
    }
}
