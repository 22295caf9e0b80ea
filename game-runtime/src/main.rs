use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use game_core::GameEngine;
use game_runtime::{GameController, HELP, Intent, RuntimeConfig, Update, open_gateway, parse_command};
use game_types::{EnginePhase, Transition};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = RuntimeConfig::new();
    info!("Starting Word or Not with data in {}", config.data_dir.display());

    let gateway = open_gateway(&config)?;
    let engine = GameEngine::new(gateway, config.engine.clone());

    let (intent_sender, intent_receiver) = mpsc::unbounded_channel();
    let (update_sender, mut update_receiver) = mpsc::unbounded_channel();

    let controller = GameController::new(engine, update_sender);
    let controller_task = tokio::spawn(controller.run(intent_receiver));

    let printer_task = tokio::spawn(async move {
        while let Some(update) = update_receiver.recv().await {
            render(&update);
        }
    });

    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if line.trim().is_empty() => continue,
                Some(line) => match parse_command(&line) {
                    Ok(intent) => {
                        let shutdown = intent == Intent::Shutdown;
                        if intent_sender.send(intent).is_err() || shutdown {
                            break;
                        }
                    }
                    Err(e) => println!("{}", e),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down gracefully...");
                break;
            }
        }
    }

    drop(intent_sender);
    let engine = controller_task.await?;
    if engine.phase() == EnginePhase::Active || engine.phase() == EnginePhase::Feedback {
        info!("Game in progress saved, it will resume on next launch");
    }
    if let Err(e) = printer_task.await {
        warn!("Printer task failed: {}", e);
    }

    info!("Shutdown complete.");
    Ok(())
}

fn render(update: &Update) {
    match update {
        Update::Step(step) => {
            let snapshot = &step.snapshot;
            match &step.transition {
                Transition::Answered { correct, points, result, .. } => {
                    let verdict = if *correct { "Correct!" } else { "Wrong." };
                    let truth = if result.word.is_real { "real" } else { "invented" };
                    println!(
                        "{} '{}' is {} (+{}). Score {} | Lives {} | Streak {}",
                        verdict, result.word.text, truth, points, snapshot.score, snapshot.lives, snapshot.current_streak
                    );
                }
                Transition::GameOver { reason, score, accuracy } => {
                    println!("Game over ({:?}). Score {}, accuracy {:.0}%", reason, score, accuracy * 100.0);
                }
                Transition::ReturnedToIdle => println!("Back to the menu."),
                Transition::Undone { removed, .. } => println!("Took back '{}'.", removed.word.text),
                Transition::Resumed { .. } => println!("Welcome back."),
                _ => {}
            }

            if let Some(word) = &snapshot.current_word {
                if snapshot.phase == EnginePhase::Active {
                    println!(
                        "[{}/{}] {}  (real or fake?)",
                        snapshot.word_index + 1,
                        snapshot.word_count,
                        word.text.to_uppercase()
                    );
                }
            }
        }
        Update::Rejected(e) => println!("Can't do that: {}", e),
        Update::Stats { timeframe, stats, breakdown } => {
            println!("{}", timeframe.display_name());
            println!(
                "  games {} | words {} | accuracy {:.0}% | best score {} | avg score {:.1} | best streak {}",
                stats.total_games_played,
                stats.total_words_guessed,
                stats.overall_accuracy() * 100.0,
                stats.best_score,
                stats.average_score(),
                stats.best_streak
            );
            for bucket in breakdown {
                println!(
                    "  {:<6} {}/{} correct, {} points",
                    bucket.difficulty.display_name(),
                    bucket.correct_words,
                    bucket.total_words,
                    bucket.total_score
                );
            }
        }
        Update::WordAdded(word) => println!("Added '{}'.", word.text),
        Update::WordRemoved(word) => println!("Removed '{}'.", word.text),
        Update::Exported(path) => println!("Exported to {}.", path.display()),
        Update::Imported(path) => println!("Imported {}.", path.display()),
        Update::StatsReset => println!("Statistics cleared."),
        Update::Failed(message) => println!("{}", message),
    }
}
