pub mod command;
pub mod config;
pub mod controller;
pub mod feedback_timer;

pub use command::{CommandError, HELP, parse_command};
pub use config::RuntimeConfig;
pub use controller::{GameController, Intent, Update};
pub use feedback_timer::FeedbackTimer;

use game_persistence::{FileStore, PersistenceGateway};
use std::sync::Arc;

/// Open the on-disk document store described by `config`.
pub fn open_gateway(config: &RuntimeConfig) -> anyhow::Result<Arc<PersistenceGateway>> {
    let store = FileStore::open(&config.data_dir)?;
    let mut gateway = PersistenceGateway::new(Arc::new(store));
    if let Some(path) = &config.bundled_words {
        gateway = gateway.with_bundled_catalog(path.clone());
    }
    Ok(Arc::new(gateway))
}
