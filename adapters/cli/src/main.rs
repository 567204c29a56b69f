#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Fantasy TD game.

mod layout;

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use fantasy_td_core::{Command, Event, GameConfig, TowerKind};
use fantasy_td_simulation::Simulation;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use crate::layout::TowerPlan;

const FRAMES_PER_SECOND: f32 = 60.0;
const BANNER: &str = "Welcome to Fantasy TD.";

/// Headless Fantasy TD runner.
#[derive(Debug, Parser)]
#[command(name = "fantasy-td")]
#[command(about = "Run a headless Fantasy TD game and report the outcome")]
struct Args {
    /// TOML file overriding the default game configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for wave composition, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Viewport width used to derive the tile size.
    #[arg(long, default_value_t = 1024.0)]
    width: f32,
    /// Viewport height used to derive the tile size.
    #[arg(long, default_value_t = 576.0)]
    height: f32,
    /// Simulated seconds to run before stopping.
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Game speed multiplier.
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Tower to build before the first tick, as kind@col,row[:col,row].
    #[arg(long = "tower")]
    towers: Vec<TowerPlan>,
    /// Start waves manually instead of chaining them automatically.
    #[arg(long)]
    no_auto_wave: bool,
    /// Save file to restore before building towers.
    #[arg(long)]
    load: Option<PathBuf>,
    /// Save file written when the run ends.
    #[arg(long)]
    save: Option<PathBuf>,
}

/// Entry point for the Fantasy TD command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    run(&args)
}

fn run(args: &Args) -> Result<()> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut simulation = Simulation::new(config).context("failed to start the simulation")?;
    println!("{BANNER}");
    simulation.set_viewport(args.width, args.height);

    if let Some(path) = &args.load {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read save at {}", path.display()))?;
        if !simulation.restore(&text) {
            warn!(path = %path.display(), "save was unreadable, starting a new game");
        }
    }

    build_towers(&mut simulation, &args.towers);
    if (args.speed - 1.0).abs() > f32::EPSILON {
        report(&simulation.execute(Command::SetSpeed {
            multiplier: args.speed,
        }));
    }
    if simulation.world().economy.auto_wave_enabled == args.no_auto_wave {
        report(&simulation.execute(Command::ToggleAutoWave));
    }
    if args.no_auto_wave {
        report(&simulation.execute(Command::StartWave));
    }

    let tally = play(&mut simulation, args.seconds);

    if let Some(path) = &args.save {
        let json = simulation.save().context("failed to serialize save")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write save to {}", path.display()))?;
        info!(path = %path.display(), "game saved");
    }

    let economy = simulation.snapshot().economy;
    println!(
        "wave {} | gold {} | lives {}/{} | kills {} | leaks {} | waves cleared {} | hits {}{}",
        economy.next_wave.saturating_sub(1),
        economy.gold,
        economy.lives,
        economy.max_lives,
        tally.kills,
        tally.leaks,
        tally.waves_cleared,
        tally.hits,
        if economy.defeated { " | defeated" } else { "" },
    );
    Ok(())
}

fn load_config(path: Option<&PathBuf>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read configuration at {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("failed to parse configuration at {}", path.display()))
}

fn build_towers(simulation: &mut Simulation, plans: &[TowerPlan]) {
    for plan in plans {
        let events = simulation.execute(Command::PlaceTower {
            cell: plan.cell,
            kind: plan.kind,
        });
        report(&events);

        let placed = events.iter().find_map(|event| match event {
            Event::TowerPlaced { tower, .. } => Some(*tower),
            _ => None,
        });
        if let (Some(tower), Some(cell)) = (placed, plan.target) {
            report(&simulation.execute(Command::SetAreaTarget { tower, cell }));
        }
    }
}

#[derive(Debug, Default)]
struct Tally {
    kills: u32,
    leaks: u32,
    waves_cleared: u32,
    hits: u32,
}

fn play(simulation: &mut Simulation, seconds: f32) -> Tally {
    let frames = (seconds.max(0.0) * FRAMES_PER_SECOND).round() as u64;
    let frame_dt = 1.0 / FRAMES_PER_SECOND;
    let mut tally = Tally::default();

    for _ in 0..frames {
        let mut hits = 0;
        let events = simulation.tick(frame_dt, &mut |_: TowerKind, _: bool| hits += 1);
        tally.hits += hits;

        for event in &events {
            match event {
                Event::EnemyKilled { .. } => tally.kills += 1,
                Event::EnemyLeaked { .. } => tally.leaks += 1,
                Event::WaveCompleted { .. } => tally.waves_cleared += 1,
                _ => {}
            }
        }
        report(&events);

        if simulation.world().economy.defeated {
            break;
        }
    }
    tally
}

fn report(events: &[Event]) {
    for event in events {
        match event {
            Event::TimeAdvanced { .. } => {}
            Event::WaveStarted {
                number,
                total_spawns,
                boss,
                ..
            } => info!(wave = number, total_spawns, boss, "wave started"),
            Event::WaveCompleted {
                number,
                reward,
                lives_restored,
                ..
            } => info!(wave = number, reward, lives_restored, "wave cleared"),
            Event::Defeated { next_wave } => warn!(wave = next_wave, "defeated"),
            Event::TowerPlacementRejected { kind, cell, reason } => {
                warn!(?kind, ?cell, ?reason, "tower placement rejected");
            }
            Event::AreaTargetRejected { tower, reason } => {
                warn!(?tower, ?reason, "area target rejected");
            }
            Event::SpeedRejected { multiplier, reason } => {
                warn!(multiplier, ?reason, "speed rejected");
            }
            Event::WaveStartRejected { reason } => warn!(?reason, "wave start rejected"),
            other => debug!(event = ?other),
        }
    }
}
