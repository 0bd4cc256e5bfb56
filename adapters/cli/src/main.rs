#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs Lane Defence headlessly.
//!
//! Loads the tuning from a TOML file (or the stock defaults), places the
//! requested towers, runs the clock for a number of ticks and prints a
//! summary of the final state.

mod placement;

use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use lane_defence_core::{CellCoord, Config, Event, GameView, TowerKind};
use lane_defence_simulation::Simulation;
use lane_defence_world::query;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use self::placement::PlacementArg;

/// Greeting logged once the session is ready.
const WELCOME_BANNER: &str = "Welcome to Lane Defence.";

/// Runs a headless Lane Defence session.
#[derive(Debug, Parser)]
#[command(name = "lane-defence", version, about)]
struct Cli {
    /// TOML file overriding the stock tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for the spawner's random generator.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Tower to place before the first tick, as `row,column[,kind]`. Repeatable.
    #[arg(long = "place", value_name = "ROW,COLUMN[,KIND]")]
    placements: Vec<PlacementArg>,
    /// Spend money on new towers whenever the selected kind is affordable.
    #[arg(long)]
    auto_build: bool,
    /// Print the final snapshot as JSON instead of a text summary.
    #[arg(long)]
    json: bool,
    /// Log every simulation event.
    #[arg(short, long)]
    verbose: bool,
}

/// Entry point for the Lane Defence command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };
    let mut simulation =
        Simulation::new(&config, cli.seed).context("configuration cannot drive a simulation")?;
    info!("{}", WELCOME_BANNER);

    for placement in &cli.placements {
        let kind = placement
            .kind
            .unwrap_or_else(|| query::selected_tower(simulation.world()));
        let _ = simulation
            .place_tower(placement.cell, kind)
            .with_context(|| {
                format!(
                    "failed to place {kind:?} tower at row {} column {}",
                    placement.cell.row(),
                    placement.cell.column()
                )
            })?;
    }

    let ticks_run = run(&mut simulation, cli.ticks, cli.auto_build);
    let view = simulation.snapshot();

    if cli.json {
        let rendered =
            serde_json::to_string_pretty(&view).context("failed to serialise final snapshot")?;
        println!("{rendered}");
    } else {
        print_summary(&view, ticks_run, simulation.ticks_per_second());
    }
    Ok(())
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn load_config(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("failed to load configuration from {}", path.display()))
}

fn parse_config(contents: &str) -> Result<Config> {
    toml::from_str(contents).context("failed to parse configuration toml contents")
}

fn run(simulation: &mut Simulation, ticks: u64, auto_build: bool) -> u64 {
    let mut ticks_run = 0;
    while ticks_run < ticks && !simulation.is_game_over() {
        for event in simulation.tick() {
            log_event(event);
        }
        ticks_run += 1;

        if auto_build {
            auto_place(simulation);
        }
    }
    ticks_run
}

fn auto_place(simulation: &mut Simulation) {
    let kind = query::selected_tower(simulation.world());
    let cost = simulation.world().rules().tower(kind).cost;
    if query::money(simulation.world()) < cost {
        return;
    }
    let Some(cell) = first_free_cell(simulation) else {
        return;
    };
    match simulation.place_tower(cell, kind) {
        Ok(tower) => {
            debug!(?tower, ?kind, row = cell.row(), column = cell.column(), "auto-built tower");
            let _ = simulation.cycle_tower_type();
        }
        Err(reason) => warn!(%reason, "auto-build placement rejected"),
    }
}

/// Scans column by column from the left so each lane gets a front tower first.
fn first_free_cell(simulation: &Simulation) -> Option<CellCoord> {
    let grid = simulation.world().rules().grid;
    (0..grid.columns)
        .flat_map(|column| (0..grid.rows).map(move |row| CellCoord::new(row, column)))
        .find(|cell| query::tower_at(simulation.world(), *cell).is_none())
}

fn log_event(event: &Event) {
    match event {
        Event::GameOver { final_score } => info!(final_score, "game over"),
        Event::TowerDestroyed { tower, cell } => {
            info!(?tower, row = cell.row(), column = cell.column(), "tower destroyed");
        }
        Event::EnemyEscaped { enemy, lives } => info!(?enemy, lives, "enemy escaped"),
        other => debug!(event = ?other, "simulation event"),
    }
}

fn print_summary(view: &GameView, ticks_run: u64, ticks_per_second: u32) {
    let seconds = ticks_run as f64 / f64::from(ticks_per_second.max(1));
    println!("ticks simulated : {ticks_run} ({seconds:.1}s)");
    println!("score           : {}", view.score);
    println!("money           : {}", view.money);
    println!("lives           : {}", view.lives);
    println!("towers standing : {}", view.towers.len());
    println!("enemies on field: {}", view.enemies.len());
    println!("game over       : {}", view.game_over);
    for kind in TowerKind::ALL {
        let count = view.towers.iter().filter(|tower| tower.kind == kind).count();
        println!("  {kind:?} towers: {count}");
    }
}
