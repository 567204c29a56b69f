#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave director responsible for wave starts, spawning and completion.
//!
//! Each wave moves through `Pending → Spawning → Draining → Complete`: it waits
//! for its initial delay, releases one enemy per spawn interval (plus a boss on
//! boss waves), drains while its enemies are alive and is removed with a
//! reward once every enemy was resolved.

use fantasy_td_core::{EnemyKind, Event, Faction, GameConfig, SpawnWeights};
use fantasy_td_world::{
    enemies::{Enemy, Placement},
    waves::Wave,
    Economy, IdAllocator, World,
};
use rand::Rng;
use tracing::debug;

/// Director that advances every live wave once per tick.
#[derive(Debug, Default)]
pub struct WaveDirector {
    completed: Vec<usize>,
}

impl WaveDirector {
    /// Creates a new wave director with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs the auto-wave check, the countdown and wave spawning for one tick.
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        dt: f32,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) {
        if world.economy.defeated {
            return;
        }

        if world.economy.auto_wave_enabled
            && world.waves.is_empty()
            && !world.economy.counting_down()
        {
            world.start_wave(out);
        }

        advance_countdown(&mut world.economy, dt, out);
        self.advance_waves(world, dt, rng, out);
    }

    fn advance_waves<R: Rng + ?Sized>(
        &mut self,
        world: &mut World,
        dt: f32,
        rng: &mut R,
        out: &mut Vec<Event>,
    ) {
        let World {
            config,
            economy,
            enemies,
            waves,
            ids,
            ..
        } = world;

        self.completed.clear();
        for (index, wave) in waves.iter_mut().enumerate() {
            wave.spawn_timer -= dt;

            let mut release_boss = false;
            if wave.spawn_timer <= 0.0 {
                if wave.spawn_index < wave.total_spawns {
                    let kind = config
                        .spawn_weights_for_wave(wave.number)
                        .map_or(EnemyKind::Skirmisher, |weights| pick_enemy_kind(weights, rng));
                    spawn(config, ids, enemies, wave, kind, out);
                    wave.spawn_index += 1;
                    wave.spawn_timer = config.wave.spawn_interval;
                    release_boss = wave.spawn_index >= wave.total_spawns;
                } else {
                    release_boss = true;
                }
            }

            if release_boss && wave.boss_due && !wave.boss_spawned {
                spawn(config, ids, enemies, wave, EnemyKind::Boss, out);
                wave.boss_spawned = true;
            }

            if wave.is_complete() {
                self.completed.push(index);
            }
        }

        for index in self.completed.drain(..).rev() {
            let wave = waves.remove(index);
            complete_wave(config, economy, &wave, out);
        }
    }
}

fn advance_countdown(economy: &mut Economy, dt: f32, out: &mut Vec<Event>) {
    if !economy.counting_down() {
        return;
    }
    economy.countdown_remaining -= dt;
    if economy.countdown_remaining <= 0.0 {
        economy.countdown_remaining = 0.0;
        out.push(Event::CountdownFinished);
    }
}

fn complete_wave(config: &GameConfig, economy: &mut Economy, wave: &Wave, out: &mut Vec<Event>) {
    let reward = config.wave.wave_reward;
    economy.gold = economy.gold.saturating_add(reward);

    let lives_restored = if wave.lives_lost {
        0
    } else {
        let regen = if wave.boss_due {
            config.economy.boss_life_regen
        } else {
            config.economy.life_regen
        };
        let restored = economy.lives.saturating_add(regen).min(economy.max_lives);
        let gained = restored.saturating_sub(economy.lives);
        economy.lives = restored;
        gained
    };

    debug!(wave = wave.number, reward, lives_restored, "wave completed");
    out.push(Event::WaveCompleted {
        wave: wave.id,
        number: wave.number,
        reward,
        lives_restored,
    });
}

fn spawn(
    config: &GameConfig,
    ids: &mut IdAllocator,
    enemies: &mut Vec<Enemy>,
    wave: &mut Wave,
    kind: EnemyKind,
    out: &mut Vec<Event>,
) {
    let faction = config
        .faction_for_wave(wave.number)
        .map_or(Faction::Humans, |entry| entry.faction);
    let number = wave.number as f32;
    let enemy_config = &config.enemy;
    let base_hp = enemy_config.base_hp + number * enemy_config.hp_per_wave;
    let base_speed = enemy_config.base_speed + number * enemy_config.speed_per_wave;

    let (hp, speed, size_scale) = match enemy_config.kinds.get(kind) {
        Some(modifiers) => (
            base_hp * modifiers.hp_multiplier,
            base_speed * modifiers.speed_multiplier,
            modifiers.size_scale,
        ),
        None => (
            base_hp * enemy_config.boss.hp_multiplier,
            base_speed * enemy_config.boss.speed_multiplier,
            enemy_config.boss.scale,
        ),
    };

    let id = ids.enemy();
    enemies.push(Enemy {
        id,
        wave: wave.id,
        kind,
        faction,
        hp,
        max_hp: hp,
        speed,
        size_scale,
        is_boss: kind == EnemyKind::Boss,
        target_waypoint: 1,
        placement: Placement::Unplaced,
        knockback_remaining: 0.0,
        knockback_resist_remaining: 0.0,
        reached_end: false,
    });
    wave.remaining_enemies += 1;
    out.push(Event::EnemySpawned {
        enemy: id,
        wave: wave.id,
        kind,
        faction,
    });
}

/// Draws a regular enemy kind from the weighted table.
///
/// A uniform sample in `0..total` is reduced by each weight in table order
/// until it drops to zero or below. Zero weights are never picked.
pub fn pick_enemy_kind<R: Rng + ?Sized>(weights: &SpawnWeights, rng: &mut R) -> EnemyKind {
    let entries = weights.entries();
    let mut remainder = rng.gen::<f32>() * weights.total();
    let mut fallback = EnemyKind::Skirmisher;
    for (kind, weight) in entries {
        if weight <= 0.0 {
            continue;
        }
        fallback = kind;
        remainder -= weight;
        if remainder <= 0.0 {
            return kind;
        }
    }
    fallback
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::mock::StepRng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn weights(values: [f32; 5]) -> SpawnWeights {
        let [skirmisher, raider, bruiser, bulwark, elite] = values;
        SpawnWeights {
            skirmisher,
            raider,
            bruiser,
            bulwark,
            elite,
        }
    }

    #[test]
    fn lowest_sample_picks_first_weighted_kind() {
        let mut rng = StepRng::new(0, 0);
        assert_eq!(
            pick_enemy_kind(&weights([0.0, 2.0, 1.0, 0.0, 0.0]), &mut rng),
            EnemyKind::Raider
        );
    }

    #[test]
    fn highest_sample_picks_last_weighted_kind() {
        let mut rng = StepRng::new(u64::MAX, 0);
        assert_eq!(
            pick_enemy_kind(&weights([3.0, 0.0, 1.0, 0.0, 0.0]), &mut rng),
            EnemyKind::Bruiser
        );
    }

    #[test]
    fn zero_weight_kinds_are_never_drawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let table = weights([0.0, 1.0, 0.0, 0.0, 1.0]);
        for _ in 0..500 {
            let kind = pick_enemy_kind(&table, &mut rng);
            assert!(matches!(kind, EnemyKind::Raider | EnemyKind::Elite), "{kind:?}");
        }
    }

    #[test]
    fn seeded_draws_are_reproducible() {
        let table = weights([3.0, 3.0, 3.0, 1.0, 1.0]);
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..32)
                .map(|_| pick_enemy_kind(&table, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(11), draw(11));
    }

    #[test]
    fn countdown_finishes_once() {
        let mut economy = Economy::new(&GameConfig::default());
        economy.countdown_remaining = 0.5;
        let mut out = Vec::new();

        advance_countdown(&mut economy, 0.25, &mut out);
        assert!(out.is_empty());
        advance_countdown(&mut economy, 0.25, &mut out);
        assert_eq!(out, vec![Event::CountdownFinished]);
        advance_countdown(&mut economy, 0.25, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(economy.countdown_remaining, 0.0);
    }
}
