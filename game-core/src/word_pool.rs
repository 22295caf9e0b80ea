use anyhow::Result;
use game_persistence::PersistenceGateway;
use game_types::{Difficulty, Word};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::WordCatalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordFilter {
    Any,
    Difficulty(Difficulty),
    Reality(bool),
}

impl WordFilter {
    pub fn matches(&self, word: &Word) -> bool {
        match self {
            WordFilter::Any => true,
            WordFilter::Difficulty(difficulty) => word.difficulty == *difficulty,
            WordFilter::Reality(is_real) => word.is_real == *is_real,
        }
    }
}

/// Picks words for sessions.
///
/// `used_words` covers the current pool pass and is cleared on exhaustion or
/// between games. `seen_words` covers every word ever served and is written
/// back through the gateway on every change, so a word once shown never comes
/// back until an explicit data reset.
pub struct WordPool {
    gateway: Arc<PersistenceGateway>,
    catalog: WordCatalog,
    used_words: HashSet<String>,
    seen_words: HashSet<String>,
    rng: StdRng,
}

impl WordPool {
    pub fn new(gateway: Arc<PersistenceGateway>) -> Self {
        Self::with_rng(gateway, StdRng::from_entropy())
    }

    pub fn with_rng(gateway: Arc<PersistenceGateway>, rng: StdRng) -> Self {
        let catalog = WordCatalog::new(gateway.load_words());
        let seen_words = gateway.load_seen_words();
        info!(
            "Word pool ready: {} words in catalog, {} already seen",
            catalog.len(),
            seen_words.len()
        );

        Self {
            gateway,
            catalog,
            used_words: HashSet::new(),
            seen_words,
            rng,
        }
    }

    pub fn catalog(&self) -> &WordCatalog {
        &self.catalog
    }

    pub fn used_words(&self) -> &HashSet<String> {
        &self.used_words
    }

    pub fn seen_words(&self) -> &HashSet<String> {
        &self.seen_words
    }

    /// Words matching `filter` that have never been served.
    pub fn unseen_count(&self, filter: WordFilter) -> usize {
        self.catalog
            .words()
            .iter()
            .filter(|w| filter.matches(w) && !self.seen_words.contains(&w.text))
            .count()
    }

    /// Uniform pick among words in neither exclusion set. When that is empty
    /// the pass is over: `used_words` is reset and the pick retried against
    /// everything not yet seen. `None` means the filter is exhausted for good.
    pub fn select_word(&mut self, filter: WordFilter) -> Option<Word> {
        let picked = {
            let candidates: Vec<&Word> = self
                .catalog
                .words()
                .iter()
                .filter(|w| {
                    filter.matches(w)
                        && !self.used_words.contains(&w.text)
                        && !self.seen_words.contains(&w.text)
                })
                .collect();
            candidates.choose(&mut self.rng).map(|w| (*w).clone())
        };
        if picked.is_some() {
            return picked;
        }

        debug!("Pool pass exhausted for {:?}, resetting used words", filter);
        self.reset_used_words();

        let candidates: Vec<&Word> = self
            .catalog
            .words()
            .iter()
            .filter(|w| filter.matches(w) && !self.seen_words.contains(&w.text))
            .collect();
        candidates.choose(&mut self.rng).map(|w| (*w).clone())
    }

    /// Records `word` as served in this pass and forever, flushing the seen set.
    pub fn mark_served(&mut self, word: &Word) {
        self.used_words.insert(word.text.clone());
        if self.seen_words.insert(word.text.clone()) {
            self.gateway.save_seen_words(&self.seen_words);
        }
    }

    fn draw(&mut self, filter: WordFilter) -> Option<Word> {
        let word = self.select_word(filter)?;
        self.mark_served(&word);
        debug!("Drew '{}' for {:?}", word.text, filter);
        Some(word)
    }

    fn draw_many(&mut self, filter: WordFilter, count: usize, into: &mut Vec<Word>) {
        for _ in 0..count {
            match self.draw(filter) {
                Some(word) => into.push(word),
                None => break,
            }
        }
    }

    /// `count` words, half real and half fake when `balance_real_fake` is set
    /// (the odd one out is fake). May come back short if the catalog runs dry.
    pub fn select_balanced_set(&mut self, count: usize, balance_real_fake: bool) -> Vec<Word> {
        let mut selected = Vec::with_capacity(count.min(self.catalog.len()));

        if balance_real_fake {
            let real_count = count / 2;
            let fake_count = count - real_count;
            self.draw_many(WordFilter::Reality(true), real_count, &mut selected);
            self.draw_many(WordFilter::Reality(false), fake_count, &mut selected);
        } else {
            self.draw_many(WordFilter::Any, count, &mut selected);
        }

        derange(&mut selected, &mut self.rng);
        selected
    }

    /// Default game mix: a third easy, a third medium, the rest hard.
    pub fn select_progressive_set(&mut self, count: usize) -> Vec<Word> {
        let per_difficulty = count / 3;
        let hard_count = count - per_difficulty * 2;
        let mut selected = Vec::with_capacity(count.min(self.catalog.len()));

        self.draw_many(WordFilter::Difficulty(Difficulty::Easy), per_difficulty, &mut selected);
        self.draw_many(WordFilter::Difficulty(Difficulty::Medium), per_difficulty, &mut selected);
        self.draw_many(WordFilter::Difficulty(Difficulty::Hard), hard_count, &mut selected);

        derange(&mut selected, &mut self.rng);
        selected
    }

    pub fn select_difficulty_set(&mut self, count: usize, difficulty: Difficulty) -> Vec<Word> {
        let mut selected = Vec::with_capacity(count.min(self.catalog.len()));
        self.draw_many(WordFilter::Difficulty(difficulty), count, &mut selected);
        derange(&mut selected, &mut self.rng);
        selected
    }

    pub fn reset_used_words(&mut self) {
        self.used_words.clear();
    }

    /// Forget every served word. Only an explicit data reset does this.
    pub fn reset_seen_words(&mut self) {
        self.used_words.clear();
        self.seen_words.clear();
        self.gateway.save_seen_words(&self.seen_words);
        info!("Cleared seen words");
    }

    pub fn reload_catalog(&mut self) {
        self.catalog = WordCatalog::new(self.gateway.load_words());
    }

    pub fn add_custom_word(&mut self, word: Word) -> Result<()> {
        let catalog = self.catalog.with_word(word)?;
        self.gateway.save_words(catalog.words());
        self.catalog = catalog;
        Ok(())
    }

    pub fn remove_word(&mut self, text: &str) -> Result<Word> {
        let (catalog, removed) = self.catalog.without_word(text)?;
        self.gateway.save_words(catalog.words());
        self.catalog = catalog;
        Ok(removed)
    }
}

/// Random cyclic permutation (Sattolo): with two or more items, no item keeps
/// its original position.
pub fn derange<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    let mut i = items.len();
    while i > 1 {
        i -= 1;
        let j = rng.gen_range(0..i);
        items.swap(i, j);
    }
}
