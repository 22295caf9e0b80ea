use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::{Difficulty, Word, WordResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EnginePhase {
    Idle,     // No session, or an abandoned one
    Active,   // A word is presented and input is accepted
    Feedback, // A guess was scored, waiting for the pacing window
    Over,     // Terminal, session completed
}

impl EnginePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnginePhase::Idle => "idle",
            EnginePhase::Active => "active",
            EnginePhase::Feedback => "showing feedback",
            EnginePhase::Over => "game over",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AdvanceOutcome {
    NextWord,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameOverReason {
    OutOfLives,
    WordsExhausted,
}

/// The feedback-window transition the engine is waiting to apply.
/// Only the holder of the current `ticket` can fire it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ScheduledAdvance {
    pub ticket: Uuid,
    pub due_at: DateTime<Utc>,
    pub delay_ms: u32,
    pub outcome: AdvanceOutcome,
}

/// What changed in one engine step, for the UI to diff against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Transition {
    Started {
        word_count: usize,
        difficulty: Option<Difficulty>,
    },
    Restored {
        phase: EnginePhase,
    },
    Answered {
        result: WordResult,
        correct: bool,
        points: u32,
        pending: ScheduledAdvance,
    },
    Advanced {
        index: usize,
    },
    Resumed {
        index: usize,
    },
    GameOver {
        reason: GameOverReason,
        score: u32,
        accuracy: f64,
    },
    Undone {
        removed: WordResult,
        index: usize,
    },
    ReturnedToIdle,
}

/// Immutable view of the engine after a step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct EngineSnapshot {
    pub phase: EnginePhase,
    pub current_word: Option<Word>,
    pub word_index: usize,
    pub word_count: usize,
    pub progress: f64,
    pub score: u32,
    pub lives: u32,
    pub current_streak: u32,
    pub max_streak: u32,
    pub accuracy: f64,
    pub last_answer_correct: Option<bool>,
    pub can_undo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Step {
    pub snapshot: EngineSnapshot,
    pub transition: Transition,
}
