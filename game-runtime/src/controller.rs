use game_core::GameEngine;
use game_types::{
    Difficulty, DifficultyStats, GameError, GameStats, StatsTimeframe, Step, Transition, Word,
};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::FeedbackTimer;

/// Requests from the player, delivered one at a time.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    Start(Option<Difficulty>),
    Answer(bool),
    Undo,
    SkipFeedback,
    ResumePresentation,
    ReturnToIdle,
    ShowStats(StatsTimeframe),
    AddWord(Word),
    RemoveWord(String),
    Export(PathBuf),
    Import(PathBuf),
    ResetStats,
    ResetAllData,
    Shutdown,
}

/// Everything the controller publishes back to the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    Step(Step),
    Rejected(GameError),
    Stats {
        timeframe: StatsTimeframe,
        stats: GameStats,
        breakdown: Vec<DifficultyStats>,
    },
    WordAdded(Word),
    WordRemoved(Word),
    Exported(PathBuf),
    Imported(PathBuf),
    StatsReset,
    Failed(String),
}

/// Serializes intents and fired feedback windows into the engine and owns
/// the one timer the engine's scheduled advances need.
pub struct GameController {
    engine: GameEngine,
    timer: FeedbackTimer,
    fired: mpsc::UnboundedReceiver<Uuid>,
    updates: mpsc::UnboundedSender<Update>,
}

impl GameController {
    pub fn new(engine: GameEngine, updates: mpsc::UnboundedSender<Update>) -> Self {
        let (timer, fired) = FeedbackTimer::new();
        Self {
            engine,
            timer,
            fired,
            updates,
        }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    /// Drive the engine until `Shutdown` arrives or the intent channel closes.
    /// Returns the engine so the caller can inspect the final state.
    pub async fn run(mut self, mut intents: mpsc::UnboundedReceiver<Intent>) -> GameEngine {
        if let Some(step) = self.engine.resume() {
            self.publish_step(step);
        }

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(Intent::Shutdown) | None => break,
                    Some(intent) => self.handle_intent(intent),
                },
                Some(ticket) = self.fired.recv() => self.handle_fired(ticket),
            }
        }

        if self.timer.cancel() {
            debug!("Dropped running feedback window on shutdown");
        }
        info!("Game controller stopped");
        self.engine
    }

    pub fn handle_intent(&mut self, intent: Intent) {
        debug!("Handling intent {:?}", intent);

        match intent {
            Intent::Start(difficulty) => {
                let step = self.engine.start(difficulty);
                self.publish_step(step);
            }
            Intent::Answer(is_real) => {
                let result = self.engine.answer(is_real);
                self.publish_result(result);
            }
            Intent::Undo => {
                let result = self.engine.undo();
                self.publish_result(result);
            }
            Intent::SkipFeedback => {
                let result = self.engine.skip_feedback();
                self.publish_result(result);
            }
            Intent::ResumePresentation => {
                let result = self.engine.resume_presentation();
                self.publish_result(result);
            }
            Intent::ReturnToIdle => {
                let step = self.engine.return_to_idle();
                self.publish_step(step);
            }
            Intent::ShowStats(timeframe) => {
                self.publish(Update::Stats {
                    timeframe,
                    stats: self.engine.windowed_stats(timeframe),
                    breakdown: self.engine.stats().difficulty_breakdown(),
                });
            }
            Intent::AddWord(word) => match self.engine.pool_mut().add_custom_word(word.clone()) {
                Ok(()) => self.publish(Update::WordAdded(word)),
                Err(e) => self.publish(Update::Failed(e.to_string())),
            },
            Intent::RemoveWord(text) => match self.engine.pool_mut().remove_word(&text) {
                Ok(word) => self.publish(Update::WordRemoved(word)),
                Err(e) => self.publish(Update::Failed(e.to_string())),
            },
            Intent::Export(path) => self.export_to(path),
            Intent::Import(path) => self.import_from(path),
            Intent::ResetStats => {
                self.engine.reset_stats();
                self.publish(Update::StatsReset);
            }
            Intent::ResetAllData => {
                let step = self.engine.reset_all_data();
                self.publish_step(step);
            }
            Intent::Shutdown => {}
        }
    }

    pub fn handle_fired(&mut self, ticket: Uuid) {
        match self.engine.fire_scheduled(ticket) {
            Ok(step) => self.publish_step(step),
            Err(e) => warn!("Ignoring feedback ticket {}: {}", ticket, e),
        }
    }

    fn export_to(&mut self, path: PathBuf) {
        let Some(bytes) = self.engine.export_data() else {
            self.publish(Update::Failed("Failed to encode export".to_string()));
            return;
        };

        match std::fs::write(&path, bytes) {
            Ok(()) => {
                info!("Exported game data to {}", path.display());
                self.publish(Update::Exported(path));
            }
            Err(e) => {
                error!("Failed to write export to {}: {}", path.display(), e);
                self.publish(Update::Failed(format!("Failed to write {}: {}", path.display(), e)));
            }
        }
    }

    fn import_from(&mut self, path: PathBuf) {
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.publish(Update::Failed(format!("Failed to read {}: {}", path.display(), e)));
                return;
            }
        };

        if self.engine.import_data(&bytes) {
            info!("Imported game data from {}", path.display());
            self.publish(Update::Imported(path));
        } else {
            self.publish(Update::Failed(format!("{} is not a valid export", path.display())));
        }
    }

    fn publish_result(&mut self, result: Result<Step, GameError>) {
        match result {
            Ok(step) => self.publish_step(step),
            Err(e) => {
                warn!("Rejected intent: {}", e);
                self.publish(Update::Rejected(e));
            }
        }
    }

    /// Keeps the timer in line with the engine's pending advance, then
    /// forwards the step.
    fn publish_step(&mut self, step: Step) {
        if let Transition::Answered { pending, .. } = &step.transition {
            self.timer.arm(pending);
        } else if self.engine.pending().is_none() {
            self.timer.cancel();
        }
        self.publish(Update::Step(step));
    }

    fn publish(&self, update: Update) {
        if self.updates.send(update).is_err() {
            warn!("Update receiver dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use game_core::{EngineConfig, ManualClock, StatsAggregator, WordPool};
    use game_persistence::PersistenceGateway;
    use game_types::EnginePhase;
    use std::sync::Arc;

    fn create_controller() -> (GameController, mpsc::UnboundedReceiver<Update>) {
        let gateway = Arc::new(PersistenceGateway::in_memory());
        let engine = GameEngine::new(gateway, EngineConfig::default());
        let (updates, receiver) = mpsc::unbounded_channel();
        (GameController::new(engine, updates), receiver)
    }

    fn create_clocked_controller(
        config: EngineConfig,
    ) -> (GameController, mpsc::UnboundedReceiver<Update>, ManualClock) {
        let gateway = Arc::new(PersistenceGateway::in_memory());
        let clock = ManualClock::new(Utc.with_ymd_and_hms(2025, 8, 10, 12, 0, 0).unwrap());
        let pool = WordPool::new(gateway.clone());
        let stats = StatsAggregator::new(gateway.clone());
        let engine = GameEngine::from_parts(config, gateway, pool, stats, Arc::new(clock.clone()));
        let (updates, receiver) = mpsc::unbounded_channel();
        (GameController::new(engine, updates), receiver, clock)
    }

    fn expect_step(update: Option<Update>) -> Step {
        match update {
            Some(Update::Step(step)) => step,
            other => panic!("expected a step, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_answer_arms_timer_and_skip_cancels_it() {
        let (mut controller, mut updates) = create_controller();

        controller.handle_intent(Intent::Start(None));
        expect_step(updates.recv().await);

        let is_real = controller.engine().current_word().unwrap().is_real;
        controller.handle_intent(Intent::Answer(is_real));
        expect_step(updates.recv().await);
        assert!(controller.timer.is_armed());

        controller.handle_intent(Intent::SkipFeedback);
        let step = expect_step(updates.recv().await);
        assert_eq!(step.transition, Transition::Advanced { index: 1 });
        assert!(!controller.timer.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_intents_are_published() {
        let (mut controller, mut updates) = create_controller();

        controller.handle_intent(Intent::Undo);
        match updates.recv().await {
            Some(Update::Rejected(GameError::InvalidGameState { action, .. })) => {
                assert_eq!(action, "undo")
            }
            other => panic!("expected a rejection, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_ticket_is_ignored() {
        let (mut controller, mut updates) = create_controller();
        controller.handle_intent(Intent::Start(None));
        updates.recv().await;

        controller.handle_fired(Uuid::new_v4());
        assert!(updates.try_recv().is_err());
        assert_eq!(controller.engine().phase(), EnginePhase::Active);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_and_word_management() {
        let (mut controller, mut updates) = create_controller();

        controller.handle_intent(Intent::ShowStats(StatsTimeframe::AllTime));
        match updates.recv().await {
            Some(Update::Stats { stats, breakdown, .. }) => {
                assert_eq!(stats, GameStats::default());
                assert_eq!(breakdown.len(), 3);
            }
            other => panic!("expected stats, got {:?}", other),
        }

        let word = Word::new(
            "snorkwise",
            false,
            Difficulty::Hard,
            game_types::WordCategory::Invented,
        );
        controller.handle_intent(Intent::AddWord(word.clone()));
        assert_eq!(updates.recv().await, Some(Update::WordAdded(word.clone())));

        controller.handle_intent(Intent::AddWord(word.clone()));
        assert!(matches!(updates.recv().await, Some(Update::Failed(_))));

        controller.handle_intent(Intent::RemoveWord("snorkwise".to_string()));
        assert_eq!(updates.recv().await, Some(Update::WordRemoved(word)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_week_stats_use_engine_clock() {
        let config = EngineConfig {
            words_per_game: 1,
            ..EngineConfig::default()
        };
        let (mut controller, mut updates, clock) = create_clocked_controller(config);

        controller.handle_intent(Intent::Start(None));
        expect_step(updates.recv().await);
        let is_real = controller.engine().current_word().unwrap().is_real;
        controller.handle_intent(Intent::Answer(is_real));
        expect_step(updates.recv().await);
        controller.handle_intent(Intent::SkipFeedback);
        expect_step(updates.recv().await);

        clock.advance(chrono::Duration::days(8));
        controller.handle_intent(Intent::ShowStats(StatsTimeframe::Week));
        match updates.recv().await {
            Some(Update::Stats { stats, .. }) => assert_eq!(stats.total_games_played, 0),
            other => panic!("expected stats, got {:?}", other),
        }

        controller.handle_intent(Intent::ShowStats(StatsTimeframe::Month));
        match updates.recv().await {
            Some(Update::Stats { stats, .. }) => assert_eq!(stats.total_games_played, 1),
            other => panic!("expected stats, got {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_presentation_keeps_speed_bonus() {
        let (mut controller, mut updates, clock) = create_clocked_controller(EngineConfig::default());

        controller.handle_intent(Intent::Start(None));
        expect_step(updates.recv().await);
        clock.advance(chrono::Duration::seconds(30));

        controller.handle_intent(Intent::ResumePresentation);
        let resumed = expect_step(updates.recv().await);
        assert_eq!(resumed.transition, Transition::Resumed { index: 0 });

        let is_real = controller.engine().current_word().unwrap().is_real;
        controller.handle_intent(Intent::Answer(is_real));
        let answered = expect_step(updates.recv().await);
        let Transition::Answered { result, .. } = answered.transition else {
            panic!("expected an answer transition");
        };
        assert!(result.response_time < game_core::SPEED_BONUS_THRESHOLD_SECS);
    }
}
