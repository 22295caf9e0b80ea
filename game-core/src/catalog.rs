use anyhow::{Result, anyhow};
use game_types::{Difficulty, Word, WordCategory};
use std::collections::{BTreeMap, HashSet};
use tracing::warn;

/// Immutable list of candidate words, unique by text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordCatalog {
    words: Vec<Word>,
}

impl WordCatalog {
    /// Build a catalog, keeping the first entry for any repeated text.
    pub fn new(words: Vec<Word>) -> Self {
        let mut texts = HashSet::new();
        let mut unique = Vec::with_capacity(words.len());

        for word in words {
            if texts.insert(word.text.clone()) {
                unique.push(word);
            } else {
                warn!("Dropping duplicate catalog entry '{}'", word.text);
            }
        }

        Self { words: unique }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, text: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.text == text)
    }

    pub fn contains(&self, text: &str) -> bool {
        self.get(text).is_some()
    }

    pub fn count_by_difficulty(&self, difficulty: Difficulty) -> usize {
        self.words.iter().filter(|w| w.difficulty == difficulty).count()
    }

    pub fn count_by_category(&self, category: WordCategory) -> usize {
        self.words.iter().filter(|w| w.category == category).count()
    }

    pub fn count_by_reality(&self, is_real: bool) -> usize {
        self.words.iter().filter(|w| w.is_real == is_real).count()
    }

    pub fn group_by_difficulty(&self) -> BTreeMap<Difficulty, Vec<&Word>> {
        let mut groups: BTreeMap<Difficulty, Vec<&Word>> = BTreeMap::new();
        for word in &self.words {
            groups.entry(word.difficulty).or_default().push(word);
        }
        groups
    }

    pub fn group_by_category(&self) -> BTreeMap<WordCategory, Vec<&Word>> {
        let mut groups: BTreeMap<WordCategory, Vec<&Word>> = BTreeMap::new();
        for word in &self.words {
            groups.entry(word.category).or_default().push(word);
        }
        groups
    }

    /// Case-insensitive substring search. An empty query matches everything.
    pub fn search(&self, query: &str) -> Vec<&Word> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.words.iter().collect();
        }

        self.words
            .iter()
            .filter(|w| w.text.to_lowercase().contains(&query))
            .collect()
    }

    /// A new catalog with `word` appended.
    pub fn with_word(&self, word: Word) -> Result<Self> {
        let text = word.text.trim();
        if text.is_empty() {
            return Err(anyhow!("Word text cannot be empty"));
        }
        if self.contains(&word.text) {
            return Err(anyhow!("Word already in catalog: {}", word.text));
        }

        let mut words = self.words.clone();
        words.push(word);
        Ok(Self { words })
    }

    /// A new catalog without the entry for `text`.
    pub fn without_word(&self, text: &str) -> Result<(Self, Word)> {
        let index = self
            .words
            .iter()
            .position(|w| w.text == text)
            .ok_or_else(|| anyhow!("Word not in catalog: {}", text))?;

        let mut words = self.words.clone();
        let removed = words.remove(index);
        Ok((Self { words }, removed))
    }
}
