use game_core::{EngineConfig, MAX_FEEDBACK_DELAY, MAX_WORDS_PER_GAME};
use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_DATA_DIR: &str = "./wordornot-data";

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub data_dir: PathBuf,
    pub bundled_words: Option<PathBuf>,
    pub engine: EngineConfig,
}

impl RuntimeConfig {
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Unparseable or out-of-range values are
    /// logged and replaced by their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = EngineConfig::default();

        let feedback_delay_ms = parse_in_range(
            &lookup,
            "WORDORNOT_FEEDBACK_DELAY_MS",
            defaults.feedback_delay.as_millis() as u64,
            0..=MAX_FEEDBACK_DELAY.as_millis() as u64,
        );

        Self {
            data_dir: lookup("WORDORNOT_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
            bundled_words: lookup("WORDORNOT_BUNDLED_WORDS").map(PathBuf::from),
            engine: EngineConfig {
                words_per_game: parse_in_range(
                    &lookup,
                    "WORDORNOT_WORDS_PER_GAME",
                    defaults.words_per_game,
                    1..=MAX_WORDS_PER_GAME,
                ),
                starting_lives: parse_or(&lookup, "WORDORNOT_STARTING_LIVES", defaults.starting_lives),
                feedback_delay: Duration::from_millis(feedback_delay_ms),
            },
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_or<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', using default", key, raw);
            default
        }),
        None => default,
    }
}

fn parse_in_range<T: FromStr + PartialOrd + Display + Clone>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    range: RangeInclusive<T>,
) -> T {
    let value = parse_or(lookup, key, default.clone());
    if range.contains(&value) {
        return value;
    }
    warn!(
        "{} value {} outside {}..={}, using default",
        key,
        value,
        range.start(),
        range.end()
    );
    default
}
