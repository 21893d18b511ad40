//! Command-line entry point: replays a scenario file and prints the final status of each mower.
//!
//! ## Usage
//!
//! ```bash
//! mowers lawn.data                        # Print final statuses
//! mowers lawn.data --history              # Print every step
//! mowers lawn.data --animate              # Step through the replay in the terminal
//! mowers lawn.data --replay replay.json   # Save a JSON replay
//! ```

use clap::Parser;
use crossterm::{cursor::Show, execute};
use mowers_engine::{MowerResult, Scenario, ScenarioPlayer};
use std::io::stdout;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mowers", version, about = "Replays mower programs on a grid lawn")]
struct Cli {
    /// Scenario file: lawn bounds, then a status line and a program line per mower
    scenario: PathBuf,

    /// Save a JSON replay of every step to this file
    #[arg(long, value_name = "FILE")]
    replay: Option<String>,

    /// Print every step of every mower instead of the final statuses only
    #[arg(long)]
    history: bool,

    /// Step through the replay on the terminal
    #[arg(long, conflicts_with = "history")]
    animate: bool,

    /// Delay between two animation frames, in milliseconds
    #[arg(long, default_value_t = 500)]
    delay_ms: u64,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> MowerResult<()> {
    let scenario = Scenario::from_file(&cli.scenario)?;
    let mut player = ScenarioPlayer::new(scenario, cli.replay)?;

    if !cli.history && !cli.animate {
        for status in player.replay()? {
            println!("{status}");
        }
        return Ok(());
    }

    let history = player.replay_with_history()?;

    if cli.animate {
        let title = format!("Scenario file: {}", cli.scenario.display());
        for frame in 0..history.frame_count() {
            player.draw_frame(&history, frame, &title)?;
            thread::sleep(Duration::from_millis(cli.delay_ms));
        }
        execute!(stdout(), Show)?;
        println!();
        return Ok(());
    }

    for (mower, steps) in history.steps.iter().enumerate() {
        println!("Mower {}: {}", mower + 1, history.initial[mower]);
        for step in steps {
            println!("  {} -> {}", step.command, step.status);
        }
    }
    Ok(())
}
