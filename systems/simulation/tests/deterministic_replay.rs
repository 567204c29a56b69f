use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use fantasy_td_core::{CellCoord, Command, Event, FrameSnapshot, GameConfig, TowerId, TowerKind};
use fantasy_td_simulation::Simulation;

const FRAME: f32 = 1.0 / 60.0;

#[test]
fn deterministic_replay_produces_identical_games() {
    let first = replay(0x5EED_F00D);
    let second = replay(0x5EED_F00D);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(first.kills > 0, "towers should kill enemies during the replay");
    assert!(first.waves_started >= 2, "auto-wave should chain waves");
}

#[test]
fn reset_reseeds_wave_composition() {
    let mut simulation = Simulation::new(config(7)).expect("valid config");
    let first = spawned_kinds(&mut simulation);
    let _ = simulation.execute(Command::Reset);
    let second = spawned_kinds(&mut simulation);

    assert!(!first.is_empty());
    assert_eq!(first, second);
}

fn config(seed: u64) -> GameConfig {
    let mut config = GameConfig::default();
    config.seed = seed;
    config.economy.starting_gold = 400;
    config
}

fn spawned_kinds(simulation: &mut Simulation) -> Vec<String> {
    let _ = simulation.execute(Command::StartWave);
    let mut kinds = Vec::new();
    for _ in 0..600 {
        for event in simulation.tick(FRAME, &mut |_: TowerKind, _: bool| {}) {
            if let Event::EnemySpawned { kind, .. } = event {
                kinds.push(format!("{kind:?}"));
            }
        }
    }
    kinds
}

fn scripted_commands() -> Vec<Command> {
    vec![
        Command::PlaceTower {
            cell: CellCoord::new(3, 3),
            kind: TowerKind::Mage,
        },
        Command::PlaceTower {
            cell: CellCoord::new(5, 3),
            kind: TowerKind::Archer,
        },
        Command::PlaceTower {
            cell: CellCoord::new(8, 3),
            kind: TowerKind::Blade,
        },
        Command::PlaceTower {
            cell: CellCoord::new(6, 1),
            kind: TowerKind::Catapult,
        },
        Command::SetAreaTarget {
            tower: TowerId::new(3),
            cell: CellCoord::new(6, 2),
        },
        Command::ToggleAutoWave,
    ]
}

fn replay(seed: u64) -> ReplayOutcome {
    let mut simulation = Simulation::new(config(seed)).expect("valid config");
    let mut outcome = ReplayOutcome::default();
    let mut cues = 0_u32;

    for command in scripted_commands() {
        outcome.record(&simulation.execute(command));
    }
    for frame in 0..5_400 {
        if frame == 1_200 {
            outcome.record(&simulation.execute(Command::UpgradeTower {
                tower: TowerId::new(0),
            }));
        }
        let events = simulation.tick(FRAME, &mut |_: TowerKind, _: bool| cues += 1);
        outcome.record(&events);
        if frame % 120 == 0 {
            outcome.snapshots.push(fingerprint(&simulation.snapshot()));
        }
    }

    outcome.cues = cues;
    outcome
}

#[derive(Debug, Default, PartialEq)]
struct ReplayOutcome {
    events: Vec<String>,
    snapshots: Vec<u64>,
    kills: usize,
    waves_started: usize,
    cues: u32,
}

impl ReplayOutcome {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => continue,
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::WaveStarted { .. } => self.waves_started += 1,
                _ => {}
            }
            self.events.push(format!("{event:?}"));
        }
    }
}

fn fingerprint(snapshot: &FrameSnapshot) -> u64 {
    let mut hasher = DefaultHasher::new();
    snapshot.economy.gold.hash(&mut hasher);
    snapshot.economy.lives.hash(&mut hasher);
    snapshot.economy.next_wave.hash(&mut hasher);
    for enemy in &snapshot.enemies {
        enemy.id.hash(&mut hasher);
        enemy.hp.to_bits().hash(&mut hasher);
        if let Some(position) = enemy.position {
            position.x.to_bits().hash(&mut hasher);
            position.y.to_bits().hash(&mut hasher);
        }
    }
    for tower in &snapshot.towers {
        tower.id.hash(&mut hasher);
        tower.cooldown.to_bits().hash(&mut hasher);
    }
    snapshot.projectiles.len().hash(&mut hasher);
    hasher.finish()
}
