use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A catalog entry. Identity for pool bookkeeping is `text`, never a surrogate key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Word {
    pub text: String,
    pub is_real: bool,
    pub difficulty: Difficulty,
    pub category: WordCategory,
}

impl Word {
    pub fn new(
        text: impl Into<String>,
        is_real: bool,
        difficulty: Difficulty,
        category: WordCategory,
    ) -> Self {
        Self {
            text: text.into(),
            is_real,
            difficulty,
            category,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum WordCategory {
    Common,
    Technical,
    Archaic,
    Scientific,
    Invented,
}

impl WordCategory {
    pub const ALL: [WordCategory; 5] = [
        WordCategory::Common,
        WordCategory::Technical,
        WordCategory::Archaic,
        WordCategory::Scientific,
        WordCategory::Invented,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            WordCategory::Common => "Common",
            WordCategory::Technical => "Technical",
            WordCategory::Archaic => "Archaic",
            WordCategory::Scientific => "Scientific",
            WordCategory::Invented => "Invented",
        }
    }
}

/// One answered word. Points are derived by the scoring engine, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WordResult {
    pub word: Word,
    pub user_guess: bool, // true for "real", false for "fake"
    pub response_time: f64, // seconds
    pub timestamp: DateTime<Utc>,
}

impl WordResult {
    pub fn is_correct(&self) -> bool {
        self.user_guess == self.word.is_real
    }
}
