#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy motion model: steering along the waypoint path, path-clamped
//! knockback and the reap pass that settles kills and leaks.

use fantasy_td_core::{Event, MotionConfig};
use fantasy_td_world::{
    enemies::{Enemy, Placement},
    path::PathGeometry,
    World,
};
use glam::Vec2;
use tracing::info;

/// Steers every living enemy and reaps the ones that died or leaked.
#[derive(Debug, Default)]
pub struct Movement;

impl Movement {
    /// Creates a new movement system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances enemies by `dt` seconds, then reaps them.
    pub fn handle(&mut self, world: &mut World, dt: f32, out: &mut Vec<Event>) {
        if world.economy.defeated {
            return;
        }

        let tile_size = world.tile_size;
        let motion = &world.config.motion;
        for enemy in world.enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
            step_enemy(enemy, &world.path, motion, tile_size, dt);
        }

        reap(world, out);
    }
}

fn step_enemy(enemy: &mut Enemy, path: &PathGeometry, motion: &MotionConfig, tile_size: f32, dt: f32) {
    if enemy.reached_end {
        return;
    }

    let (mut position, mut velocity) = match enemy.placement {
        Placement::Positioned { position, velocity } => (position, velocity),
        Placement::Unplaced => match path.waypoint(0, tile_size) {
            Some(start) => (start, Vec2::X),
            None => {
                enemy.reached_end = true;
                return;
            }
        },
    };

    let Some(mut target) = path.waypoint(enemy.target_waypoint, tile_size) else {
        enemy.placement = Placement::Positioned { position, velocity };
        enemy.reached_end = true;
        return;
    };
    if position.distance(target) < motion.waypoint_reach * tile_size {
        enemy.target_waypoint += 1;
        match path.waypoint(enemy.target_waypoint, tile_size) {
            Some(next) => target = next,
            None => {
                enemy.placement = Placement::Positioned { position, velocity };
                enemy.reached_end = true;
                return;
            }
        }
    }

    let desired = (target - position).normalize_or_zero();
    velocity += (desired - velocity) * (motion.turn_strength * dt).min(1.0);
    position += velocity * enemy.speed * tile_size * dt;

    if enemy.knockback_remaining > 0.0 {
        position = knock_back(enemy, path, motion, position, tile_size, dt);
    }
    enemy.knockback_resist_remaining = (enemy.knockback_resist_remaining - dt).max(0.0);
    enemy.placement = Placement::Positioned { position, velocity };
}

// Pushes the enemy backward along the path and returns the new position.
// Distance left over after passing a corner carries onto the previous segment.
fn knock_back(
    enemy: &mut Enemy,
    path: &PathGeometry,
    motion: &MotionConfig,
    mut position: Vec2,
    tile_size: f32,
    dt: f32,
) -> Vec2 {
    let mut step = enemy
        .knockback_remaining
        .min(motion.knockback_speed * tile_size * dt);
    enemy.knockback_remaining -= step;

    loop {
        let previous = enemy.target_waypoint.saturating_sub(1);
        let (Some(start), Some(end)) = (
            path.waypoint(previous, tile_size),
            path.waypoint(enemy.target_waypoint, tile_size),
        ) else {
            enemy.knockback_remaining = 0.0;
            return position;
        };

        let segment = end - start;
        let length = segment.length();
        if length <= f32::EPSILON {
            enemy.knockback_remaining = 0.0;
            return position;
        }
        let along = ((position - start).dot(segment) / (length * length)).clamp(0.0, 1.0);
        let pushed = along - step / length;

        if enemy.target_waypoint <= 1 {
            if pushed <= 0.0 {
                enemy.knockback_remaining = 0.0;
                return start;
            }
            return start + segment * pushed;
        }
        if pushed > motion.knockback_epsilon {
            return start + segment * pushed;
        }

        enemy.target_waypoint -= 1;
        if pushed >= 0.0 {
            return start + segment * pushed;
        }
        step = -pushed * length;
        position = start;
    }
}

fn reap(world: &mut World, out: &mut Vec<Event>) {
    let World {
        config,
        economy,
        enemies,
        waves,
        ..
    } = world;

    for index in (0..enemies.len()).rev() {
        let enemy = &enemies[index];
        let leaked = enemy.reached_end;
        if !leaked && enemy.is_alive() {
            continue;
        }

        let enemy = enemies.remove(index);
        if let Some(wave) = waves.iter_mut().find(|wave| wave.id == enemy.wave) {
            wave.resolve_enemy(leaked);
        }

        if leaked {
            let lives_lost = if enemy.is_boss {
                config.economy.boss_leak_penalty
            } else {
                config.economy.leak_penalty
            };
            economy.lives = economy.lives.saturating_sub(lives_lost);
            out.push(Event::EnemyLeaked {
                enemy: enemy.id,
                wave: enemy.wave,
                lives_lost,
            });
        } else {
            let bounty = config.economy.kill_bounty;
            economy.gold = economy.gold.saturating_add(bounty);
            out.push(Event::EnemyKilled {
                enemy: enemy.id,
                wave: enemy.wave,
                bounty,
            });
        }
    }

    if economy.lives == 0 && !economy.defeated {
        economy.defeated = true;
        economy.countdown_remaining = 0.0;
        info!(next_wave = economy.next_wave, "all lives lost");
        out.push(Event::Defeated {
            next_wave: economy.next_wave,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantasy_td_core::{CellCoord, EnemyId, EnemyKind, Faction, GameConfig, WaveId};

    fn straight_path() -> PathGeometry {
        PathGeometry::new(vec![
            CellCoord::new(0, 0),
            CellCoord::new(4, 0),
            CellCoord::new(4, 4),
        ])
    }

    fn enemy_at(position: Vec2, target_waypoint: usize) -> Enemy {
        Enemy {
            id: EnemyId::new(0),
            wave: WaveId::new(0),
            kind: EnemyKind::Skirmisher,
            faction: Faction::Humans,
            hp: 10.0,
            max_hp: 10.0,
            speed: 1.0,
            size_scale: 1.0,
            is_boss: false,
            target_waypoint,
            placement: Placement::Positioned {
                position,
                velocity: Vec2::X,
            },
            knockback_remaining: 0.0,
            knockback_resist_remaining: 0.0,
            reached_end: false,
        }
    }

    #[test]
    fn knockback_on_first_segment_clamps_at_spawn() {
        let path = straight_path();
        let motion = GameConfig::default().motion;
        let mut enemy = enemy_at(Vec2::new(1.5, 0.5), 1);
        enemy.knockback_remaining = 5.0;

        let position = knock_back(&mut enemy, &path, &motion, Vec2::new(1.5, 0.5), 1.0, 1.0);
        assert_eq!(position, Vec2::new(0.5, 0.5));
        assert_eq!(enemy.knockback_remaining, 0.0);
        assert_eq!(enemy.target_waypoint, 1);
    }

    #[test]
    fn knockback_past_corner_carries_onto_previous_segment() {
        let path = straight_path();
        let motion = GameConfig::default().motion;
        let mut enemy = enemy_at(Vec2::new(4.5, 1.0), 2);
        enemy.knockback_remaining = 1.0;

        let position = knock_back(&mut enemy, &path, &motion, Vec2::new(4.5, 1.0), 1.0, 1.0);
        assert_eq!(enemy.target_waypoint, 1);
        assert_eq!(enemy.knockback_remaining, 0.0);
        assert!((position - Vec2::new(4.0, 0.5)).length() < 1e-5);
    }

    #[test]
    fn rate_limited_push_across_a_corner_stays_on_the_track() {
        let path = straight_path();
        let motion = GameConfig::default().motion;
        let mut enemy = enemy_at(Vec2::new(4.5, 0.7), 2);
        enemy.knockback_remaining = 0.9;

        let position = knock_back(&mut enemy, &path, &motion, Vec2::new(4.5, 0.7), 1.0, 0.15);
        assert_eq!(enemy.target_waypoint, 1);
        assert!(enemy.knockback_remaining.abs() < 1e-6);
        assert!((position - Vec2::new(3.8, 0.5)).length() < 1e-5);
    }

    #[test]
    fn knockback_crossing_two_corners_clamps_at_spawn() {
        let path = straight_path();
        let motion = GameConfig::default().motion;
        let mut enemy = enemy_at(Vec2::new(4.5, 2.5), 2);
        enemy.knockback_remaining = 10.0;

        let position = knock_back(&mut enemy, &path, &motion, Vec2::new(4.5, 2.5), 1.0, 2.0);
        assert_eq!(enemy.target_waypoint, 1);
        assert_eq!(enemy.knockback_remaining, 0.0);
        assert_eq!(position, Vec2::new(0.5, 0.5));
    }

    #[test]
    fn knockback_is_rate_limited() {
        let path = straight_path();
        let motion = GameConfig::default().motion;
        let mut enemy = enemy_at(Vec2::new(3.5, 0.5), 1);
        enemy.knockback_remaining = 2.0;

        let position = knock_back(&mut enemy, &path, &motion, Vec2::new(3.5, 0.5), 1.0, 0.1);
        assert!((position - Vec2::new(2.9, 0.5)).length() < 1e-5);
        assert!((enemy.knockback_remaining - 1.4).abs() < 1e-5);
    }
}
