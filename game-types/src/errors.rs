use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Rejected engine intents. An error never changes engine state.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("cannot {action} while {current_state}")]
    InvalidGameState {
        action: String,
        current_state: String,
    },
    #[error("game already completed")]
    GameAlreadyCompleted,
    #[error("no answer to undo")]
    NothingToUndo,
    #[error("scheduled transition {ticket} is no longer pending")]
    StaleTransition { ticket: String },
    #[error("no transition is pending")]
    NoPendingTransition,
}
