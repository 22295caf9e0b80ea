use game_types::{Difficulty, StatsTimeframe, Word, WordCategory};
use std::path::PathBuf;
use thiserror::Error;

use crate::Intent;

pub const HELP: &str = "\
commands:
  start [easy|medium|hard]       new game (progressive mix by default)
  real | r                       the word is real
  fake | f                       the word is invented
  undo                           take back the last answer
  skip                           end the feedback pause now
  resume                         restart the answer clock after a break
  quit-game                      abandon the current game
  stats [week|month|year|all]    show statistics
  add <word> <real|fake> <easy|medium|hard> <category>
  remove <word>
  export <path> | import <path>
  reset-stats | reset-all
  exit";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,
    #[error("unknown command '{0}'")]
    Unknown(String),
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("invalid {kind} '{value}'")]
    InvalidArgument { kind: &'static str, value: String },
}

pub fn parse_command(line: &str) -> Result<Intent, CommandError> {
    let mut parts = line.split_whitespace();
    let command = parts.next().ok_or(CommandError::Empty)?.to_lowercase();

    let intent = match command.as_str() {
        "start" | "new" => Intent::Start(parts.next().map(parse_difficulty).transpose()?),
        "real" | "r" => Intent::Answer(true),
        "fake" | "f" => Intent::Answer(false),
        "undo" | "u" => Intent::Undo,
        "skip" | "s" => Intent::SkipFeedback,
        "resume" => Intent::ResumePresentation,
        "quit-game" | "idle" => Intent::ReturnToIdle,
        "stats" => Intent::ShowStats(
            parts
                .next()
                .map(parse_timeframe)
                .transpose()?
                .unwrap_or(StatsTimeframe::AllTime),
        ),
        "add" => {
            let text = parts.next().ok_or(CommandError::MissingArgument("word"))?;
            let is_real = match parts.next().ok_or(CommandError::MissingArgument("real|fake"))? {
                "real" => true,
                "fake" => false,
                other => {
                    return Err(CommandError::InvalidArgument {
                        kind: "reality",
                        value: other.to_string(),
                    });
                }
            };
            let difficulty = parse_difficulty(parts.next().ok_or(CommandError::MissingArgument("difficulty"))?)?;
            let category = parts
                .next()
                .map(parse_category)
                .transpose()?
                .unwrap_or(if is_real { WordCategory::Common } else { WordCategory::Invented });
            Intent::AddWord(Word::new(text.to_lowercase(), is_real, difficulty, category))
        }
        "remove" => Intent::RemoveWord(
            parts
                .next()
                .ok_or(CommandError::MissingArgument("word"))?
                .to_lowercase(),
        ),
        "export" => Intent::Export(PathBuf::from(parts.next().ok_or(CommandError::MissingArgument("path"))?)),
        "import" => Intent::Import(PathBuf::from(parts.next().ok_or(CommandError::MissingArgument("path"))?)),
        "reset-stats" => Intent::ResetStats,
        "reset-all" => Intent::ResetAllData,
        "exit" | "quit" | "q" => Intent::Shutdown,
        _ => return Err(CommandError::Unknown(command)),
    };

    Ok(intent)
}

fn parse_difficulty(value: &str) -> Result<Difficulty, CommandError> {
    Difficulty::ALL
        .into_iter()
        .find(|d| d.display_name().eq_ignore_ascii_case(value))
        .ok_or_else(|| CommandError::InvalidArgument {
            kind: "difficulty",
            value: value.to_string(),
        })
}

fn parse_category(value: &str) -> Result<WordCategory, CommandError> {
    WordCategory::ALL
        .into_iter()
        .find(|c| c.display_name().eq_ignore_ascii_case(value))
        .ok_or_else(|| CommandError::InvalidArgument {
            kind: "category",
            value: value.to_string(),
        })
}

fn parse_timeframe(value: &str) -> Result<StatsTimeframe, CommandError> {
    match value.to_lowercase().as_str() {
        "week" => Ok(StatsTimeframe::Week),
        "month" => Ok(StatsTimeframe::Month),
        "year" => Ok(StatsTimeframe::Year),
        "all" | "alltime" => Ok(StatsTimeframe::AllTime),
        _ => Err(CommandError::InvalidArgument {
            kind: "timeframe",
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_commands() {
        assert_eq!(parse_command("start"), Ok(Intent::Start(None)));
        assert_eq!(parse_command("START hard"), Ok(Intent::Start(Some(Difficulty::Hard))));
        assert_eq!(parse_command(" r "), Ok(Intent::Answer(true)));
        assert_eq!(parse_command("fake"), Ok(Intent::Answer(false)));
        assert_eq!(parse_command("skip"), Ok(Intent::SkipFeedback));
        assert_eq!(parse_command("resume"), Ok(Intent::ResumePresentation));
        assert_eq!(parse_command("exit"), Ok(Intent::Shutdown));
    }

    #[test]
    fn test_stats_defaults_to_all_time() {
        assert_eq!(parse_command("stats"), Ok(Intent::ShowStats(StatsTimeframe::AllTime)));
        assert_eq!(parse_command("stats week"), Ok(Intent::ShowStats(StatsTimeframe::Week)));
    }

    #[test]
    fn test_add_word() {
        assert_eq!(
            parse_command("add Blorp fake easy"),
            Ok(Intent::AddWord(Word::new("blorp", false, Difficulty::Easy, WordCategory::Invented)))
        );
        assert_eq!(
            parse_command("add quark real hard scientific"),
            Ok(Intent::AddWord(Word::new("quark", true, Difficulty::Hard, WordCategory::Scientific)))
        );
    }

    #[test]
    fn test_errors() {
        assert_eq!(parse_command("   "), Err(CommandError::Empty));
        assert_eq!(parse_command("dance"), Err(CommandError::Unknown("dance".to_string())));
        assert_eq!(parse_command("export"), Err(CommandError::MissingArgument("path")));
        assert!(matches!(
            parse_command("start extreme"),
            Err(CommandError::InvalidArgument { kind: "difficulty", .. })
        ));
        assert!(matches!(
            parse_command("add blorp maybe easy"),
            Err(CommandError::InvalidArgument { kind: "reality", .. })
        ));
    }
}
