#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Maze Hunt session.

use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::Parser;
use maze_hunt_cli::{
    ascii,
    config::{self, Overrides},
    Autopilot, Session,
};
use maze_hunt_core::{RoundPhase, RoundReport};
use maze_hunt_world::query;

/// Frames between two autopilot shots.
const FIRE_INTERVAL: u32 = 30;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless Maze Hunt simulation")]
struct Cli {
    /// TOML file with gameplay tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for maze generation, steering and spawning.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Side length of the playable area.
    #[arg(long)]
    area_size: Option<f32>,
    /// Enemies per round.
    #[arg(long)]
    enemies: Option<u32>,
    /// Frames to simulate before stopping.
    #[arg(long, default_value_t = 3600)]
    ticks: u32,
    /// Simulated milliseconds per frame.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,
    /// Rounds to clear before stopping.
    #[arg(long, default_value_t = 1)]
    rounds: usize,
    /// Print the generated maze before and after the run.
    #[arg(long)]
    print_maze: bool,
}

/// Entry point for the Maze Hunt command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let overrides = Overrides {
        area_size: cli.area_size,
        enemy_count: cli.enemies,
    };
    let tuning = config::load_tuning(cli.config.as_deref(), overrides)?;
    let mut session = Session::new(tuning, cli.seed);
    println!("{}", query::welcome_banner(session.world()));

    let layout = session.layout();
    log::info!(
        "generated {}x{} maze with {} areas, {} platforms{}",
        layout.grid.columns(),
        layout.grid.rows(),
        layout.areas.len(),
        layout.platforms.len(),
        if layout.repair.is_some() {
            " (connectivity repaired)"
        } else {
            ""
        }
    );

    session.start_round();
    if cli.print_maze {
        print!("{}", ascii::render_world(session.world()));
    }

    let dt = Duration::from_millis(cli.dt_ms);
    let mut autopilot = Autopilot::new(FIRE_INTERVAL);
    for _ in 0..cli.ticks {
        let input = autopilot.input(session.world());
        let _ = session.step(dt, input);

        if query::round_phase(session.world()) != RoundPhase::Cleared {
            continue;
        }
        if session.reports().len() >= cli.rounds {
            break;
        }
        session.respawn_player();
        session.start_round();
    }

    if cli.print_maze {
        print!("{}", ascii::render_world(session.world()));
    }

    log::info!(
        "stopped after {} ticks with {} agents alive",
        query::tick_index(session.world()),
        query::agents(session.world()).len()
    );
    for (index, report) in session.reports().iter().enumerate() {
        println!("round {}: {}", index + 1, describe(report));
    }
    if session.reports().is_empty() {
        println!("no round cleared");
    }
    Ok(())
}

fn describe(report: &RoundReport) -> String {
    let accuracy = report
        .accuracy()
        .map_or_else(|| "n/a".to_owned(), |value| format!("{:.0}%", value * 100.0));
    format!(
        "{}/{} enemies in {:.1}s, {} shots, accuracy {}",
        report.eliminated,
        report.enemy_count,
        report.elapsed.as_secs_f32(),
        report.shots_fired,
        accuracy
    )
}
