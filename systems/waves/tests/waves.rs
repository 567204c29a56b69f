use fantasy_td_core::{Command, EnemyKind, Event, Faction, GameConfig, WaveId};
use fantasy_td_system_waves::WaveDirector;
use fantasy_td_world::{self as world, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn started_world(next_wave: u32) -> World {
    let mut world = World::new(GameConfig::default());
    world.economy.next_wave = next_wave;
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut events);
    world
}

fn tick(
    director: &mut WaveDirector,
    world: &mut World,
    rng: &mut ChaCha8Rng,
    dt: f32,
) -> Vec<Event> {
    let mut events = Vec::new();
    director.handle(world, dt, rng, &mut events);
    events
}

fn spawn_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| matches!(event, Event::EnemySpawned { .. }))
        .count()
}

fn resolve_all(world: &mut World) {
    for enemy in std::mem::take(&mut world.enemies) {
        if let Some(wave) = world.waves.iter_mut().find(|wave| wave.id == enemy.wave) {
            wave.resolve_enemy(false);
        }
    }
}

#[test]
fn first_wave_spawns_fourteen_enemies_on_schedule() {
    let mut world = started_world(1);
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    assert_eq!(spawn_count(&tick(&mut director, &mut world, &mut rng, 0.1)), 0);
    assert_eq!(spawn_count(&tick(&mut director, &mut world, &mut rng, 0.1)), 1);

    let mut world = started_world(1);
    let mut spawns = spawn_count(&tick(&mut director, &mut world, &mut rng, 0.2));
    assert_eq!(spawns, 1, "first spawn after the initial delay");
    for _ in 0..13 {
        assert_eq!(spawn_count(&tick(&mut director, &mut world, &mut rng, 0.35)), 0);
        spawns += spawn_count(&tick(&mut director, &mut world, &mut rng, 0.35));
    }
    assert_eq!(spawns, 14);
    assert_eq!(world.enemies.len(), 14);
    assert_eq!(world.waves[0].remaining_enemies, 14);

    for _ in 0..4 {
        assert_eq!(spawn_count(&tick(&mut director, &mut world, &mut rng, 0.7)), 0);
    }
}

#[test]
fn spawned_enemies_follow_wave_scaling() {
    let mut world = started_world(1);
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let _ = tick(&mut director, &mut world, &mut rng, 0.2);

    let enemy = &world.enemies[0];
    let modifiers = world
        .config
        .enemy
        .kinds
        .get(enemy.kind)
        .copied()
        .expect("regular kind");
    assert!((enemy.hp - 38.0 * modifiers.hp_multiplier).abs() < 1e-3);
    assert!((enemy.speed - 0.63 * modifiers.speed_multiplier).abs() < 1e-4);
    assert_eq!(enemy.hp, enemy.max_hp);
    assert_eq!(enemy.target_waypoint, 1);
    assert_eq!(enemy.faction, Faction::Humans);
    assert_eq!(enemy.position(), None);
    assert!(matches!(enemy.kind, EnemyKind::Skirmisher | EnemyKind::Raider));
}

#[test]
fn boss_is_released_with_final_regular_spawn() {
    let mut world = started_world(10);
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let mut events = tick(&mut director, &mut world, &mut rng, 0.2);
    for _ in 0..31 {
        events.extend(tick(&mut director, &mut world, &mut rng, 0.7));
    }

    assert_eq!(world.waves[0].spawn_index, 32);
    assert!(world.waves[0].boss_spawned);
    let bosses: Vec<_> = world.enemies.iter().filter(|enemy| enemy.is_boss).collect();
    assert_eq!(bosses.len(), 1);
    assert_eq!(bosses[0].kind, EnemyKind::Boss);
    assert!((bosses[0].hp - (32.0 + 60.0) * 8.0).abs() < 1e-2);
    assert!((bosses[0].speed - (0.6 + 0.3) * 0.6).abs() < 1e-4);
    assert_eq!(bosses[0].size_scale, 1.6);
    assert_eq!(world.waves[0].remaining_enemies, 33);

    let last_tick = tick(&mut director, &mut world, &mut rng, 0.7);
    assert_eq!(spawn_count(&last_tick), 0);
    assert_eq!(spawn_count(&events), 33);
}

#[test]
fn completion_rewards_once_and_regenerates_lives() {
    let mut world = started_world(1);
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(9);
    world.economy.lives = 10;

    let _ = tick(&mut director, &mut world, &mut rng, 0.2);
    for _ in 0..13 {
        let _ = tick(&mut director, &mut world, &mut rng, 0.7);
    }
    resolve_all(&mut world);
    assert_eq!(world.waves[0].remaining_enemies, 0);

    let gold = world.economy.gold;
    let events = tick(&mut director, &mut world, &mut rng, 0.05);
    let completed: Vec<_> = events
        .iter()
        .filter(|event| matches!(event, Event::WaveCompleted { .. }))
        .collect();
    assert_eq!(
        completed,
        vec![&Event::WaveCompleted {
            wave: WaveId::new(0),
            number: 1,
            reward: 40,
            lives_restored: 1,
        }]
    );
    assert_eq!(world.economy.gold, gold + 40);
    assert_eq!(world.economy.lives, 11);
    assert!(world.waves.is_empty());

    let _ = tick(&mut director, &mut world, &mut rng, 0.05);
    assert_eq!(world.economy.gold, gold + 40);
}

#[test]
fn leaked_wave_does_not_regenerate_and_regen_is_capped() {
    let mut world = started_world(1);
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    world.economy.lives = 14;
    world.waves[0].total_spawns = 1;

    let _ = tick(&mut director, &mut world, &mut rng, 0.2);
    world.enemies.clear();
    world.waves[0].resolve_enemy(true);
    let events = tick(&mut director, &mut world, &mut rng, 0.05);
    assert!(events.contains(&Event::WaveCompleted {
        wave: WaveId::new(0),
        number: 1,
        reward: 40,
        lives_restored: 0,
    }));
    assert_eq!(world.economy.lives, 14);

    world.economy.countdown_remaining = 0.0;
    let mut start = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut start);
    world.waves[0].total_spawns = 1;
    let _ = tick(&mut director, &mut world, &mut rng, 0.2);
    world.enemies.clear();
    world.waves[0].resolve_enemy(false);
    world.economy.lives = 15;
    let events = tick(&mut director, &mut world, &mut rng, 0.05);
    assert!(events.contains(&Event::WaveCompleted {
        wave: WaveId::new(1),
        number: 2,
        reward: 40,
        lives_restored: 0,
    }));
    assert_eq!(world.economy.lives, 15);
}

#[test]
fn auto_wave_starts_only_when_idle() {
    let mut world = World::new(GameConfig::default());
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    assert!(tick(&mut director, &mut world, &mut rng, 0.05).is_empty());

    world.economy.auto_wave_enabled = true;
    let events = tick(&mut director, &mut world, &mut rng, 0.05);
    assert!(matches!(
        events.first(),
        Some(Event::WaveStarted { number: 1, .. })
    ));
    let events = tick(&mut director, &mut world, &mut rng, 0.05);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::WaveStarted { .. })));
    assert_eq!(world.waves.len(), 1);
}

#[test]
fn countdown_runs_down_after_wave_start() {
    let mut world = started_world(1);
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    let mut finished = 0;
    for _ in 0..120 {
        finished += tick(&mut director, &mut world, &mut rng, 0.05)
            .iter()
            .filter(|event| matches!(event, Event::CountdownFinished))
            .count();
    }
    assert_eq!(finished, 1);
    assert!(!world.economy.counting_down());
}

#[test]
fn defeated_world_is_frozen() {
    let mut world = started_world(1);
    world.economy.defeated = true;
    world.economy.auto_wave_enabled = true;
    let mut director = WaveDirector::new();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    assert!(tick(&mut director, &mut world, &mut rng, 0.5).is_empty());
    assert!(world.enemies.is_empty());
}

#[test]
fn same_seed_composes_identical_waves() {
    let compose = |seed| {
        let mut world = started_world(8);
        let mut director = WaveDirector::new();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let _ = tick(&mut director, &mut world, &mut rng, 0.2);
        for _ in 0..27 {
            let _ = tick(&mut director, &mut world, &mut rng, 0.7);
        }
        world
            .enemies
            .iter()
            .map(|enemy| enemy.kind)
            .collect::<Vec<_>>()
    };
    let first = compose(21);
    assert_eq!(first.len(), 28);
    assert_eq!(first, compose(21));
}
