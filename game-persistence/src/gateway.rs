use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::fallback::fallback_words;
use crate::store::{DocumentStore, MemoryStore};
use game_types::{ExportBundle, GameStats, SavedGameState, SeenWords, Word};

pub const STATS_DOCUMENT: &str = "gameStats.json";
pub const WORDS_DOCUMENT: &str = "words.json";
pub const SAVED_GAME_DOCUMENT: &str = "savedGame.json";
pub const SEEN_WORDS_DOCUMENT: &str = "seenWords.json";

/// Typed access to the four persisted documents.
///
/// Loads never fail: a missing document yields the default, a malformed one is
/// logged and treated as missing. Saves log failures and carry on.
#[derive(Debug, Clone)]
pub struct PersistenceGateway {
    store: Arc<dyn DocumentStore>,
    bundled_catalog: Option<PathBuf>,
}

impl PersistenceGateway {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            bundled_catalog: None,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Read-only `words.json` shipped with the application, consulted when the
    /// user catalog is absent or corrupt.
    pub fn with_bundled_catalog(mut self, path: impl Into<PathBuf>) -> Self {
        self.bundled_catalog = Some(path.into());
        self
    }

    fn load_document<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        let bytes = match self.store.read(name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to load {}: {}", name, e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Malformed {}, using default: {}", name, e);
                None
            }
        }
    }

    fn save_document<T: Serialize>(&self, name: &str, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!("Failed to encode {}: {}", name, e);
                return;
            }
        };

        if let Err(e) = self.store.write(name, &bytes) {
            warn!("Failed to save {}: {}", name, e);
        }
    }

    fn remove_document(&self, name: &str) {
        if let Err(e) = self.store.remove(name) {
            warn!("Failed to remove {}: {}", name, e);
        }
    }

    // Game stats

    pub fn load_stats(&self) -> GameStats {
        self.load_document(STATS_DOCUMENT).unwrap_or_default()
    }

    pub fn save_stats(&self, stats: &GameStats) {
        self.save_document(STATS_DOCUMENT, stats);
    }

    // Word catalog

    /// User catalog, then the bundled catalog, then the built-in fallback.
    pub fn load_words(&self) -> Vec<Word> {
        if let Some(words) = self.load_document::<Vec<Word>>(WORDS_DOCUMENT) {
            debug!("Loaded {} words from user catalog", words.len());
            return words;
        }

        if let Some(words) = self.load_bundled_words() {
            info!("Loaded {} words from bundled catalog", words.len());
            return words;
        }

        info!("Using built-in fallback catalog");
        fallback_words()
    }

    fn load_bundled_words(&self) -> Option<Vec<Word>> {
        let path = self.bundled_catalog.as_ref()?;
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                debug!("Bundled catalog {} unavailable: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(words) => Some(words),
            Err(e) => {
                warn!("Malformed bundled catalog {}: {}", path.display(), e);
                None
            }
        }
    }

    pub fn save_words(&self, words: &[Word]) {
        self.save_document(WORDS_DOCUMENT, &words);
    }

    // Saved game

    pub fn load_saved_game(&self) -> Option<SavedGameState> {
        self.load_document(SAVED_GAME_DOCUMENT)
    }

    pub fn save_saved_game(&self, state: &SavedGameState) {
        self.save_document(SAVED_GAME_DOCUMENT, state);
    }

    pub fn clear_saved_game(&self) {
        self.remove_document(SAVED_GAME_DOCUMENT);
    }

    // Seen words

    pub fn load_seen_words(&self) -> HashSet<String> {
        self.load_document::<SeenWords>(SEEN_WORDS_DOCUMENT)
            .map(|doc| doc.seen.into_iter().collect())
            .unwrap_or_default()
    }

    pub fn save_seen_words(&self, seen: &HashSet<String>) {
        let doc = SeenWords::new(seen.iter().cloned());
        self.save_document(SEEN_WORDS_DOCUMENT, &doc);
    }

    // Bulk operations

    /// Removes stats, the user catalog and the seen-words set.
    pub fn clear_all_data(&self) {
        self.remove_document(STATS_DOCUMENT);
        self.remove_document(WORDS_DOCUMENT);
        self.remove_document(SEEN_WORDS_DOCUMENT);
        info!("Cleared all persisted game data");
    }

    /// Pretty-printed `{stats, words}` bundle.
    pub fn export_data(&self) -> Option<Vec<u8>> {
        let bundle = ExportBundle {
            stats: self.load_stats(),
            words: self.load_words(),
        };

        match serde_json::to_vec_pretty(&bundle) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!("Failed to export data: {}", e);
                None
            }
        }
    }

    /// Replaces stats and catalog from an exported bundle. A bundle that does
    /// not decode is rejected before anything is written. The two writes are
    /// sequential, not a transaction.
    pub fn import_data(&self, data: &[u8]) -> bool {
        let bundle: ExportBundle = match serde_json::from_slice(data) {
            Ok(bundle) => bundle,
            Err(e) => {
                warn!("Rejected import: {}", e);
                return false;
            }
        };

        self.save_stats(&bundle.stats);
        self.save_words(&bundle.words);
        info!(
            "Imported {} games and {} words",
            bundle.stats.total_games_played,
            bundle.words.len()
        );
        true
    }
}
