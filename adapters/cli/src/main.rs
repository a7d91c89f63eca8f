#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Slide Grid levels headlessly.

mod level_transfer;
mod session;

use std::{
    fs,
    path::{Path, PathBuf},
    process::ExitCode,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use slide_grid_board::LevelDefinition;
use slide_grid_core::Event;
use slide_grid_system_pacing::DEFAULT_STEP_INTERVAL;
use slide_grid_system_run_control::RunPhase;

use crate::session::RunOptions;

/// Plays Slide Grid levels from the terminal.
#[derive(Debug, Parser)]
#[command(name = "slide-grid", version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Plays a level until the agent wins or fails.
    Run {
        /// Path to a TOML level file.
        level: Option<PathBuf>,
        /// Level transfer string produced by `export`.
        #[arg(long, conflicts_with = "level")]
        encoded: Option<String>,
        /// Simulated milliseconds advanced per tick.
        #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u64).range(1..))]
        tick_ms: u64,
        /// Simulated milliseconds between steps.
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        step_ms: Option<u64>,
        /// Fails the run after this many steps.
        #[arg(long)]
        max_steps: Option<u32>,
    },
    /// Prints the single-line transfer string for a TOML level file.
    Export {
        /// Path to a TOML level file.
        level: PathBuf,
    },
}

/// Entry point for the Slide Grid command-line interface.
fn main() -> Result<ExitCode> {
    env_logger::init();

    match Cli::parse().command {
        CliCommand::Run {
            level,
            encoded,
            tick_ms,
            step_ms,
            max_steps,
        } => {
            let definition = match (level, encoded) {
                (Some(path), None) => read_level(&path)?,
                (None, Some(encoded)) => {
                    level_transfer::decode(&encoded).context("failed to decode level string")?
                }
                _ => bail!("provide either a level file or --encoded"),
            };
            let options = RunOptions {
                tick: Duration::from_millis(tick_ms),
                step_interval: step_ms.map_or(DEFAULT_STEP_INTERVAL, Duration::from_millis),
                max_steps,
            };
            play(&definition, options)
        }
        CliCommand::Export { level } => {
            let definition = read_level(&level)?;
            let _ = definition.build().context("level failed validation")?;
            println!("{}", level_transfer::encode(&definition)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn read_level(path: &Path) -> Result<LevelDefinition> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read level file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse level file {}", path.display()))
}

fn play(definition: &LevelDefinition, options: RunOptions) -> Result<ExitCode> {
    let level = definition.build().context("level failed validation")?;
    info!("[Cli] Level loaded with {} tiles", level.grid().len());

    let report = session::run(level, options);
    for event in &report.events {
        println!("{}", describe(event));
    }

    match report.phase {
        RunPhase::Won => {
            println!("Goal reached after {} ticks.", report.ticks);
            Ok(ExitCode::SUCCESS)
        }
        phase => {
            println!("Run ended in {phase:?} after {} ticks.", report.ticks);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn describe(event: &Event) -> String {
    match event {
        Event::TimeAdvanced { dt } => format!("time +{}ms", dt.as_millis()),
        Event::TraversalStarted {
            position,
            direction,
        } => format!(
            "start at ({}, {}) heading {direction:?}",
            position.column(),
            position.row()
        ),
        Event::AgentAdvanced { to, .. } => format!("move to ({}, {})", to.column(), to.row()),
        Event::DirectionChanged { to, .. } => format!("turn {to:?}"),
        Event::AgentTeleported {
            exit, direction, ..
        } => format!(
            "teleport to ({}, {}) heading {direction:?}",
            exit.column(),
            exit.row()
        ),
        Event::AgentJumped { to, .. } => format!("jump to ({}, {})", to.column(), to.row()),
        Event::TraversalSucceeded { position } => {
            format!("goal at ({}, {})", position.column(), position.row())
        }
        Event::TraversalFailed { position, reason } => format!(
            "failed at ({}, {}): {}",
            position.column(),
            position.row(),
            reason.description()
        ),
        Event::TraversalStopped => "stopped".to_owned(),
    }
}
