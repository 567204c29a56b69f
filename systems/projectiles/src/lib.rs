#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile flight and hit resolution.
//!
//! Projectiles fly in a straight line toward their destination. Homing shots
//! whose enemy disappeared, and shots whose destination drifted beyond the
//! firing tower's range, are discarded without effect.

use fantasy_td_core::{DamageCue, Event, GameConfig};
use fantasy_td_world::{
    enemies::Enemy,
    projectiles::{Effect, Projectile, ProjectileTarget},
    Economy, World,
};
use glam::Vec2;

/// Moves projectiles and applies their hits.
#[derive(Debug, Default)]
pub struct ProjectileResolution;

impl ProjectileResolution {
    /// Creates a new projectile resolution system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Advances every projectile by `dt` seconds.
    ///
    /// `cue` is invoked once per resolved hit with the firing tower kind and
    /// the current sound preference.
    pub fn handle(
        &mut self,
        world: &mut World,
        dt: f32,
        cue: &mut dyn DamageCue,
        out: &mut Vec<Event>,
    ) {
        let World {
            config,
            economy,
            enemies,
            projectiles,
            effects,
            ..
        } = world;

        for index in (0..projectiles.len()).rev() {
            let projectile = &mut projectiles[index];
            let Some(destination) = projectile.destination(enemies) else {
                let _ = projectiles.remove(index);
                continue;
            };
            if projectile.origin.distance(destination) > projectile.max_range {
                let _ = projectiles.remove(index);
                continue;
            }

            let offset = destination - projectile.position;
            let distance = offset.length();
            let step = projectile.speed * dt;
            if distance > step {
                projectile.position += offset / distance * step;
                continue;
            }

            let projectile = projectiles.remove(index);
            match projectile.splash_radius {
                Some(radius) => {
                    splash(economy, enemies, &projectile, destination, radius, out);
                    effects.push(Effect {
                        position: destination,
                        radius,
                        time: 0.0,
                        duration: config.projectile.splash_effect_seconds,
                    });
                }
                None => direct_hit(config, economy, enemies, &projectile, destination, out),
            }
            cue.damage_dealt(projectile.tower_kind, economy.sound_enabled);
        }
    }
}

fn direct_hit(
    config: &GameConfig,
    economy: &Economy,
    enemies: &mut [Enemy],
    projectile: &Projectile,
    destination: Vec2,
    out: &mut Vec<Event>,
) {
    let ProjectileTarget::Homing(id) = projectile.target else {
        return;
    };
    let Some(enemy) = enemies.iter_mut().find(|enemy| enemy.id == id) else {
        return;
    };

    enemy.hp -= projectile.damage;
    if economy.show_damage_popups {
        out.push(Event::DamageDealt {
            enemy: id,
            amount: projectile.damage,
            position: destination,
        });
    }

    if projectile.knockback_distance > 0.0 && enemy.is_alive() && !enemy.knockback_immune() {
        knock_back(config, enemy, projectile, destination, out);
    }
}

fn knock_back(
    config: &GameConfig,
    enemy: &mut Enemy,
    projectile: &Projectile,
    destination: Vec2,
    out: &mut Vec<Event>,
) {
    let heading = enemy
        .velocity()
        .filter(|velocity| velocity.length_squared() > f32::EPSILON)
        .unwrap_or(destination - projectile.origin);
    if heading.length_squared() <= f32::EPSILON {
        return;
    }

    let faction_factor = config
        .factions
        .iter()
        .find(|entry| entry.faction == enemy.faction)
        .map_or(1.0, |entry| entry.knockback_factor);
    let (multiplier, resist_seconds) = match config.enemy.kinds.get(enemy.kind) {
        Some(kind) => (kind.knockback_multiplier, kind.knockback_resist_seconds),
        None => (
            config.enemy.boss.knockback_multiplier,
            config.enemy.boss.knockback_resist_seconds,
        ),
    };

    let distance = projectile.knockback_distance * faction_factor * multiplier;
    enemy.knockback_remaining = enemy.knockback_remaining.max(distance);
    enemy.knockback_resist_remaining = resist_seconds;
    out.push(Event::KnockbackApplied {
        enemy: enemy.id,
        distance,
    });
}

fn splash(
    economy: &Economy,
    enemies: &mut [Enemy],
    projectile: &Projectile,
    epicentre: Vec2,
    radius: f32,
    out: &mut Vec<Event>,
) {
    let mut hits = 0;
    for enemy in enemies.iter_mut().filter(|enemy| enemy.is_alive()) {
        let Some(position) = enemy.position() else {
            continue;
        };
        let falloff = (1.0 - position.distance(epicentre) / radius).max(0.0);
        let amount = projectile.damage * falloff;
        if amount <= 0.0 {
            continue;
        }

        enemy.hp -= amount;
        hits += 1;
        if economy.show_damage_popups {
            out.push(Event::DamageDealt {
                enemy: enemy.id,
                amount,
                position,
            });
        }
    }

    out.push(Event::SplashDetonated {
        position: epicentre,
        radius,
        hits,
    });
}
