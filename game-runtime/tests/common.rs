#![allow(dead_code)]

use game_core::{EngineConfig, GameEngine};
use game_persistence::PersistenceGateway;
use game_runtime::{GameController, Intent, Update};
use game_types::Step;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A controller running on its own task, driven through its channels.
pub struct ControllerHarness {
    pub gateway: Arc<PersistenceGateway>,
    pub intents: mpsc::UnboundedSender<Intent>,
    pub updates: mpsc::UnboundedReceiver<Update>,
    pub task: JoinHandle<GameEngine>,
}

impl ControllerHarness {
    pub fn spawn(config: EngineConfig) -> Self {
        Self::spawn_on(Arc::new(PersistenceGateway::in_memory()), config)
    }

    pub fn spawn_on(gateway: Arc<PersistenceGateway>, config: EngineConfig) -> Self {
        let engine = GameEngine::new(gateway.clone(), config);
        let (intents, intent_receiver) = mpsc::unbounded_channel();
        let (update_sender, updates) = mpsc::unbounded_channel();
        let task = tokio::spawn(GameController::new(engine, update_sender).run(intent_receiver));

        Self {
            gateway,
            intents,
            updates,
            task,
        }
    }

    pub fn send(&self, intent: Intent) {
        self.intents.send(intent).unwrap();
    }

    pub async fn next_update(&mut self) -> Update {
        self.updates.recv().await.expect("controller closed the update channel")
    }

    pub async fn next_step(&mut self) -> Step {
        match self.next_update().await {
            Update::Step(step) => step,
            other => panic!("expected a step, got {:?}", other),
        }
    }

    /// Shut the controller down and hand back its engine.
    pub async fn shutdown(self) -> GameEngine {
        self.send(Intent::Shutdown);
        self.task.await.unwrap()
    }
}

pub fn short_game(words_per_game: usize) -> EngineConfig {
    EngineConfig {
        words_per_game,
        ..EngineConfig::default()
    }
}
