use game_types::{Difficulty, Word, WordCategory};

const FALLBACK_WORDS: &[(&str, bool, Difficulty, WordCategory)] = &[
    // Real words - Easy
    ("happy", true, Difficulty::Easy, WordCategory::Common),
    ("water", true, Difficulty::Easy, WordCategory::Common),
    ("house", true, Difficulty::Easy, WordCategory::Common),
    ("phone", true, Difficulty::Easy, WordCategory::Common),
    ("music", true, Difficulty::Easy, WordCategory::Common),
    // Real words - Medium
    ("abundant", true, Difficulty::Medium, WordCategory::Common),
    ("eloquent", true, Difficulty::Medium, WordCategory::Common),
    ("precise", true, Difficulty::Medium, WordCategory::Common),
    ("vibrant", true, Difficulty::Medium, WordCategory::Common),
    ("dynamic", true, Difficulty::Medium, WordCategory::Common),
    // Real words - Hard
    ("perspicacious", true, Difficulty::Hard, WordCategory::Archaic),
    ("sesquipedalian", true, Difficulty::Hard, WordCategory::Technical),
    ("antediluvian", true, Difficulty::Hard, WordCategory::Archaic),
    ("grandiloquent", true, Difficulty::Hard, WordCategory::Archaic),
    ("pusillanimous", true, Difficulty::Hard, WordCategory::Archaic),
    // Fake words - Easy
    ("flurble", false, Difficulty::Easy, WordCategory::Invented),
    ("wobbit", false, Difficulty::Easy, WordCategory::Invented),
    ("snurgle", false, Difficulty::Easy, WordCategory::Invented),
    ("blimple", false, Difficulty::Easy, WordCategory::Invented),
    ("krangle", false, Difficulty::Easy, WordCategory::Invented),
    // Fake words - Medium
    ("flimbulent", false, Difficulty::Medium, WordCategory::Invented),
    ("grompulent", false, Difficulty::Medium, WordCategory::Invented),
    ("snurdlicious", false, Difficulty::Medium, WordCategory::Invented),
    ("blimperous", false, Difficulty::Medium, WordCategory::Invented),
    ("kringletons", false, Difficulty::Medium, WordCategory::Invented),
    // Fake words - Hard
    ("flimbulentious", false, Difficulty::Hard, WordCategory::Invented),
    ("grompulentific", false, Difficulty::Hard, WordCategory::Invented),
    ("snurdliciously", false, Difficulty::Hard, WordCategory::Invented),
    ("blimperousness", false, Difficulty::Hard, WordCategory::Invented),
    ("kringletonian", false, Difficulty::Hard, WordCategory::Invented),
];

/// Built-in catalog used when neither the user nor the bundled `words.json`
/// can be read.
pub fn fallback_words() -> Vec<Word> {
    FALLBACK_WORDS
        .iter()
        .map(|&(text, is_real, difficulty, category)| {
            Word::new(text, is_real, difficulty, category)
        })
        .collect()
}
