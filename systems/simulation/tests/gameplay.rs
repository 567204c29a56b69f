use fantasy_td_core::{
    CellCoord, Command, Event, GameConfig, SilentCue, TowerId, TowerKind, WaveStartError,
};
use fantasy_td_simulation::Simulation;

const FRAME: f32 = 1.0 / 60.0;

fn run(simulation: &mut Simulation, seconds: f32) -> Vec<Event> {
    let frames = (seconds / FRAME).round() as usize;
    let mut events = Vec::new();
    for _ in 0..frames {
        events.extend(
            simulation
                .tick(FRAME, &mut SilentCue)
                .into_iter()
                .filter(|event| !matches!(event, Event::TimeAdvanced { .. })),
        );
    }
    events
}

fn count(events: &[Event], predicate: impl Fn(&Event) -> bool) -> usize {
    events.iter().filter(|event| predicate(event)).count()
}

#[test]
fn lone_enemy_is_killed_for_a_bounty() {
    let mut config = GameConfig::default();
    config.wave.base_spawns = 0;
    config.wave.spawns_per_wave = 1;
    let mut simulation = Simulation::new(config).expect("valid config");

    for cell in [CellCoord::new(1, 3), CellCoord::new(3, 3)] {
        let events = simulation.execute(Command::PlaceTower {
            cell,
            kind: TowerKind::Mage,
        });
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { cost: 60, .. }]));
    }
    let _ = simulation.execute(Command::StartWave);

    let events = run(&mut simulation, 30.0);

    assert_eq!(count(&events, |event| matches!(event, Event::EnemySpawned { .. })), 1);
    assert_eq!(
        count(&events, |event| matches!(event, Event::EnemyKilled { bounty: 8, .. })),
        1
    );
    assert_eq!(count(&events, |event| matches!(event, Event::EnemyLeaked { .. })), 0);
    assert_eq!(
        count(&events, |event| matches!(
            event,
            Event::WaveCompleted {
                number: 1,
                reward: 40,
                lives_restored: 0,
                ..
            }
        )),
        1
    );

    let economy = simulation.snapshot().economy;
    assert_eq!(economy.gold, 140 - 120 + 8 + 40);
    assert_eq!(economy.lives, 15);
    assert_eq!(economy.next_wave, 2);
}

#[test]
fn undefended_game_is_lost_once_and_frozen_until_reset() {
    let mut config = GameConfig::default();
    config.economy.starting_lives = 1;
    let mut simulation = Simulation::new(config).expect("valid config");
    let _ = simulation.execute(Command::StartWave);

    let events = run(&mut simulation, 60.0);
    assert_eq!(
        count(&events, |event| matches!(event, Event::Defeated { next_wave: 2 })),
        1
    );
    let snapshot = simulation.snapshot();
    assert!(snapshot.economy.defeated);
    assert_eq!(snapshot.economy.lives, 0);

    let frozen = snapshot.enemies.clone();
    assert!(run(&mut simulation, 1.0).is_empty());
    assert_eq!(simulation.snapshot().enemies, frozen);
    assert_eq!(
        simulation.execute(Command::StartWave),
        vec![Event::WaveStartRejected {
            reason: WaveStartError::Defeated,
        }]
    );

    assert_eq!(simulation.execute(Command::Reset), vec![Event::GameReset]);
    let economy = simulation.snapshot().economy;
    assert!(!economy.defeated);
    assert_eq!(economy.lives, 1);
    assert_eq!(economy.next_wave, 1);
    assert!(simulation.snapshot().enemies.is_empty());
}

#[test]
fn save_restores_into_a_fresh_simulation() {
    let mut simulation = Simulation::new(GameConfig::default()).expect("valid config");
    let _ = simulation.execute(Command::PlaceTower {
        cell: CellCoord::new(6, 1),
        kind: TowerKind::Catapult,
    });
    let _ = simulation.execute(Command::SetAreaTarget {
        tower: TowerId::new(0),
        cell: CellCoord::new(6, 2),
    });
    let _ = simulation.execute(Command::ToggleSound);
    let save = simulation.save().expect("save serializes");

    let mut restored = Simulation::new(GameConfig::default()).expect("valid config");
    assert!(restored.restore(&save));

    let original = simulation.snapshot();
    let copy = restored.snapshot();
    assert_eq!(copy.economy, original.economy);
    assert_eq!(copy.towers, original.towers);
    assert!(!copy.economy.sound_enabled);
}

#[test]
fn viewport_changes_rescale_the_board() {
    let mut simulation = Simulation::new(GameConfig::default()).expect("valid config");
    let _ = simulation.execute(Command::StartWave);
    let _ = run(&mut simulation, 1.0);
    let before = simulation.snapshot();
    let position = before.enemies[0].position.expect("placed");

    simulation.set_viewport(1600.0, 900.0);
    let after = simulation.snapshot();
    assert_eq!(after.tile_size, 100.0);
    let scaled = after.enemies[0].position.expect("placed");
    assert!((scaled - position * (100.0 / 64.0)).length() < 1e-3);

    simulation.set_viewport(0.0, 900.0);
    assert_eq!(simulation.snapshot().tile_size, 100.0);
}

#[test]
fn default_board_exposes_path_tiles_at_default_scale() {
    let simulation = Simulation::new(GameConfig::default()).expect("valid config");
    let snapshot = simulation.snapshot();
    assert_eq!(snapshot.path_tiles.len(), 22);
    assert_eq!(snapshot.tile_size, 64.0);
}
