use chrono::{DateTime, Utc};
use game_persistence::PersistenceGateway;
use game_types::{
    AdvanceOutcome, DEFAULT_STARTING_LIVES, Difficulty, EnginePhase, EngineSnapshot, GameError,
    GameOverReason, GameSession, GameStats, SavedGameState, ScheduledAdvance, StatsTimeframe, Step,
    Transition, Word,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{Clock, ScoringEngine, SessionLedger, StatsAggregator, SystemClock, WordPool};

pub const DEFAULT_WORDS_PER_GAME: usize = 20;
pub const DEFAULT_FEEDBACK_DELAY: Duration = Duration::from_secs(2);
pub const MAX_WORDS_PER_GAME: usize = 500;
pub const MAX_FEEDBACK_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub words_per_game: usize,
    pub starting_lives: u32,
    pub feedback_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            words_per_game: DEFAULT_WORDS_PER_GAME,
            starting_lives: DEFAULT_STARTING_LIVES,
            feedback_delay: DEFAULT_FEEDBACK_DELAY,
        }
    }
}

/// Session state machine: `Idle -> Active -> (Feedback <-> Active) -> Over`.
///
/// Every intent returns a [`Step`] describing the new state, or a
/// [`GameError`] that leaves the engine untouched. The feedback window is
/// not a timer owned by the engine: `answer` hands out a [`ScheduledAdvance`]
/// and the caller fires it by ticket once the delay has elapsed, or earlier
/// via `skip_feedback`. Any new session, restore or return to idle drops
/// the pending ticket, so a late fire is rejected as stale.
pub struct GameEngine {
    config: EngineConfig,
    gateway: Arc<PersistenceGateway>,
    pool: WordPool,
    stats: StatsAggregator,
    clock: Arc<dyn Clock>,
    phase: EnginePhase,
    session: Option<GameSession>,
    words: Vec<Word>,
    index: usize,
    presented_at: DateTime<Utc>,
    last_answer_correct: Option<bool>,
    pending: Option<ScheduledAdvance>,
}

impl GameEngine {
    pub fn new(gateway: Arc<PersistenceGateway>, config: EngineConfig) -> Self {
        let pool = WordPool::new(gateway.clone());
        let stats = StatsAggregator::new(gateway.clone());
        Self::from_parts(config, gateway, pool, stats, Arc::new(SystemClock))
    }

    pub fn from_parts(
        config: EngineConfig,
        gateway: Arc<PersistenceGateway>,
        pool: WordPool,
        stats: StatsAggregator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let presented_at = clock.now();
        Self {
            config,
            gateway,
            pool,
            stats,
            clock,
            phase: EnginePhase::Idle,
            session: None,
            words: Vec::new(),
            index: 0,
            presented_at,
            last_answer_correct: None,
            pending: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn word_index(&self) -> usize {
        self.index
    }

    /// The word on screen, while one is presented or being shown feedback for.
    pub fn current_word(&self) -> Option<&Word> {
        match self.phase {
            EnginePhase::Active | EnginePhase::Feedback => self.words.get(self.index),
            EnginePhase::Idle | EnginePhase::Over => None,
        }
    }

    pub fn remaining_words(&self) -> usize {
        self.words.len().saturating_sub(self.index)
    }

    pub fn progress(&self) -> f64 {
        if self.words.is_empty() {
            0.0
        } else {
            (self.index as f64 / self.words.len() as f64).min(1.0)
        }
    }

    pub fn can_undo(&self) -> bool {
        self.phase == EnginePhase::Active && self.session.as_ref().is_some_and(|s| !s.words.is_empty())
    }

    pub fn pending(&self) -> Option<&ScheduledAdvance> {
        self.pending.as_ref()
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut WordPool {
        &mut self.pool
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    /// Stats restricted to `timeframe`, measured from the engine's clock.
    pub fn windowed_stats(&self, timeframe: StatsTimeframe) -> GameStats {
        self.stats.windowed_at(timeframe, self.clock.now())
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        let session = self.session.as_ref();
        EngineSnapshot {
            phase: self.phase,
            current_word: self.current_word().cloned(),
            word_index: self.index,
            word_count: self.words.len(),
            progress: self.progress(),
            score: session.map_or(0, |s| s.score),
            lives: session.map_or(self.config.starting_lives, |s| s.lives),
            current_streak: session.map_or(0, |s| s.current_streak),
            max_streak: session.map_or(0, |s| s.max_streak),
            accuracy: session.map_or(0.0, GameSession::accuracy),
            last_answer_correct: self.last_answer_correct,
            can_undo: self.can_undo(),
        }
    }

    fn step(&self, transition: Transition) -> Step {
        Step {
            snapshot: self.snapshot(),
            transition,
        }
    }

    fn invalid_state(&self, action: &str) -> GameError {
        GameError::InvalidGameState {
            action: action.to_string(),
            current_state: self.phase.as_str().to_string(),
        }
    }

    /// Pick up a game saved by a previous process, if there is one.
    pub fn resume(&mut self) -> Option<Step> {
        if self.phase != EnginePhase::Idle {
            return None;
        }
        let saved = self.gateway.load_saved_game()?;
        Some(self.restore(saved))
    }

    /// Begin a fresh session, replacing whatever was in progress. A session
    /// in progress is abandoned and never folded into stats.
    pub fn start(&mut self, difficulty: Option<Difficulty>) -> Step {
        self.pending = None;
        self.last_answer_correct = None;
        self.pool.reset_used_words();

        let count = self.config.words_per_game;
        self.words = match difficulty {
            Some(difficulty) => self.pool.select_difficulty_set(count, difficulty),
            None => self.pool.select_progressive_set(count),
        };
        self.index = 0;

        let now = self.clock.now();
        self.session = Some(GameSession::new(now, self.config.starting_lives));

        if self.words.is_empty() {
            warn!("No unseen words left for {:?}, ending session immediately", difficulty);
            return self.finish(GameOverReason::WordsExhausted);
        }

        info!(
            "Started session with {} words ({})",
            self.words.len(),
            difficulty.map_or("progressive", |d| d.display_name())
        );

        self.phase = EnginePhase::Active;
        self.presented_at = now;
        self.persist();
        self.step(Transition::Started {
            word_count: self.words.len(),
            difficulty,
        })
    }

    pub fn answer(&mut self, is_real: bool) -> Result<Step, GameError> {
        match self.phase {
            EnginePhase::Active => {}
            EnginePhase::Over => return Err(GameError::GameAlreadyCompleted),
            EnginePhase::Idle | EnginePhase::Feedback => return Err(self.invalid_state("answer")),
        }

        let now = self.clock.now();
        let latency = (now - self.presented_at)
            .num_microseconds()
            .map_or(0.0, |micros| micros as f64 / 1_000_000.0);

        let Some(word) = self.words.get(self.index) else {
            return Err(self.invalid_state("answer"));
        };
        let result = ScoringEngine::evaluate_guess(word, is_real, latency, now);

        let Some(session) = self.session.as_mut() else {
            return Err(self.invalid_state("answer"));
        };
        let correct = result.is_correct();
        let points = session.record_result(result.clone());

        let outcome = if session.lives == 0 || self.index + 1 >= self.words.len() {
            AdvanceOutcome::GameOver
        } else {
            AdvanceOutcome::NextWord
        };

        debug!(
            "Answered '{}' as {}: {} (+{} points, {} lives left)",
            result.word.text,
            if is_real { "real" } else { "fake" },
            if correct { "correct" } else { "wrong" },
            points,
            session.lives
        );

        let pending = self.schedule(outcome, now);
        self.phase = EnginePhase::Feedback;
        self.last_answer_correct = Some(correct);
        self.persist();

        Ok(self.step(Transition::Answered {
            result,
            correct,
            points,
            pending,
        }))
    }

    /// The window never exceeds [`MAX_FEEDBACK_DELAY`], so `due_at` and
    /// `delay_ms` always describe the same instant.
    fn schedule(&mut self, outcome: AdvanceOutcome, now: DateTime<Utc>) -> ScheduledAdvance {
        let delay = self.config.feedback_delay.min(MAX_FEEDBACK_DELAY);
        let delay_ms = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let due_at = now
            .checked_add_signed(chrono::Duration::milliseconds(i64::from(delay_ms)))
            .unwrap_or(now);
        let scheduled = ScheduledAdvance {
            ticket: Uuid::new_v4(),
            due_at,
            delay_ms,
            outcome,
        };
        self.pending = Some(scheduled.clone());
        scheduled
    }

    /// Apply the pending advance if `ticket` is still the one handed out.
    pub fn fire_scheduled(&mut self, ticket: Uuid) -> Result<Step, GameError> {
        match self.pending.take() {
            Some(pending) if pending.ticket == ticket => Ok(self.apply_advance(pending.outcome)),
            Some(pending) => {
                self.pending = Some(pending);
                Err(GameError::StaleTransition {
                    ticket: ticket.to_string(),
                })
            }
            None => Err(GameError::NoPendingTransition),
        }
    }

    /// End the feedback window now.
    pub fn skip_feedback(&mut self) -> Result<Step, GameError> {
        let pending = self.pending.take().ok_or(GameError::NoPendingTransition)?;
        Ok(self.apply_advance(pending.outcome))
    }

    /// Fire the pending advance if it is due at `now`.
    pub fn poll(&mut self, now: DateTime<Utc>) -> Option<Step> {
        let due = self.pending.as_ref()?.due_at <= now;
        if !due {
            return None;
        }
        let pending = self.pending.take()?;
        Some(self.apply_advance(pending.outcome))
    }

    fn apply_advance(&mut self, outcome: AdvanceOutcome) -> Step {
        match outcome {
            AdvanceOutcome::NextWord => {
                self.index += 1;
                self.phase = EnginePhase::Active;
                self.presented_at = self.clock.now();
                self.last_answer_correct = None;
                self.persist();
                self.step(Transition::Advanced { index: self.index })
            }
            AdvanceOutcome::GameOver => {
                let out_of_lives = self.session.as_ref().is_some_and(|s| s.lives == 0);
                let reason = if out_of_lives {
                    GameOverReason::OutOfLives
                } else {
                    GameOverReason::WordsExhausted
                };
                self.finish(reason)
            }
        }
    }

    fn finish(&mut self, reason: GameOverReason) -> Step {
        self.pending = None;
        let now = self.clock.now();

        let (score, accuracy) = match self.session.as_mut() {
            Some(session) => {
                session.complete(now);
                if session.total_words > 0 {
                    self.stats.fold(session);
                }
                (session.score, session.accuracy())
            }
            None => (0, 0.0),
        };

        self.pool.reset_used_words();
        self.phase = EnginePhase::Over;
        self.persist();

        info!(
            "Game over ({:?}): score {}, accuracy {:.2}",
            reason, score, accuracy
        );
        self.step(Transition::GameOver {
            reason,
            score,
            accuracy,
        })
    }

    /// Restart the answer clock for the word on screen, e.g. after the
    /// front end was backgrounded. Only valid while a word is presented.
    pub fn resume_presentation(&mut self) -> Result<Step, GameError> {
        match self.phase {
            EnginePhase::Active => {}
            EnginePhase::Over => return Err(GameError::GameAlreadyCompleted),
            EnginePhase::Idle | EnginePhase::Feedback => {
                return Err(self.invalid_state("resume_presentation"));
            }
        }

        self.presented_at = self.clock.now();
        debug!("Resumed presentation of word {}", self.index);
        Ok(self.step(Transition::Resumed { index: self.index }))
    }

    /// Take back the last answer and present its word again. Lives and
    /// streak counters stay where they are.
    pub fn undo(&mut self) -> Result<Step, GameError> {
        match self.phase {
            EnginePhase::Active => {}
            EnginePhase::Over => return Err(GameError::GameAlreadyCompleted),
            EnginePhase::Idle | EnginePhase::Feedback => return Err(self.invalid_state("undo")),
        }

        let removed = self
            .session
            .as_mut()
            .and_then(|session| session.revert_last_result())
            .ok_or(GameError::NothingToUndo)?;

        self.index = self.index.saturating_sub(1);
        self.presented_at = self.clock.now();
        self.last_answer_correct = None;
        self.persist();

        debug!("Undid answer for '{}'", removed.word.text);
        Ok(self.step(Transition::Undone {
            removed,
            index: self.index,
        }))
    }

    /// Rehydrate a persisted session. A snapshot taken inside the feedback
    /// window resumes with its pending advance already applied.
    pub fn restore(&mut self, saved: SavedGameState) -> Step {
        self.pending = None;
        self.last_answer_correct = None;
        self.words = saved.game_words;
        self.index = saved.current_word_index.min(self.words.len());
        self.session = Some(saved.game_session);

        let (completed, answered, lives) = match self.session.as_ref() {
            Some(session) => (session.is_completed, session.words.len(), session.lives),
            None => (true, 0, 0),
        };

        let step = if completed {
            self.phase = EnginePhase::Over;
            self.snapshot()
        } else if answered > self.index {
            let outcome = if lives == 0 || self.index + 1 >= self.words.len() {
                AdvanceOutcome::GameOver
            } else {
                AdvanceOutcome::NextWord
            };
            self.apply_advance(outcome).snapshot
        } else if lives == 0 {
            self.finish(GameOverReason::OutOfLives).snapshot
        } else if self.index >= self.words.len() {
            self.finish(GameOverReason::WordsExhausted).snapshot
        } else {
            self.phase = EnginePhase::Active;
            self.presented_at = self.clock.now();
            self.persist();
            self.snapshot()
        };

        info!(
            "Restored session at word {}/{} ({})",
            self.index,
            self.words.len(),
            self.phase.as_str()
        );
        Step {
            snapshot: step,
            transition: Transition::Restored { phase: self.phase },
        }
    }

    /// Drop the current session without folding it and forget the saved game.
    pub fn return_to_idle(&mut self) -> Step {
        self.pending = None;
        self.session = None;
        self.words.clear();
        self.index = 0;
        self.last_answer_correct = None;
        self.phase = EnginePhase::Idle;
        self.pool.reset_used_words();
        self.gateway.clear_saved_game();
        self.step(Transition::ReturnedToIdle)
    }

    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Wipe stats, custom words and seen words, then return to idle.
    pub fn reset_all_data(&mut self) -> Step {
        let step = self.return_to_idle();
        self.gateway.clear_all_data();
        self.pool.reset_seen_words();
        self.pool.reload_catalog();
        self.stats.reload();
        info!("All game data reset");
        step
    }

    pub fn export_data(&self) -> Option<Vec<u8>> {
        self.gateway.export_data()
    }

    /// Replace stats and catalog from an export bundle.
    pub fn import_data(&mut self, data: &[u8]) -> bool {
        if !self.gateway.import_data(data) {
            return false;
        }
        self.pool.reload_catalog();
        self.stats.reload();
        true
    }

    fn persist(&self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        self.gateway.save_saved_game(&SavedGameState {
            game_session: session.clone(),
            game_words: self.words.clone(),
            current_word_index: self.index,
        });
    }
}
