#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! System that runs tower cooldowns and launches projectiles from targeting data.

use fantasy_td_core::{AttackMode, Event, TowerId};
use fantasy_td_system_tower_targeting::TowerTarget;
use fantasy_td_world::{
    path::tile_center,
    projectiles::{Projectile, ProjectileTarget},
    towers, World,
};

/// Tower combat system that fires ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    scratch: Vec<Projectile>,
}

impl TowerCombat {
    /// Creates a new tower combat system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks every tower cooldown by `dt` and fires the towers that are ready.
    ///
    /// Direct-fire towers shoot homing projectiles at their entry in
    /// `tower_targets`. Area-attack towers lob a ballistic projectile at their
    /// assigned cell while a wave is live and no countdown runs.
    pub fn handle(
        &mut self,
        world: &mut World,
        dt: f32,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Event>,
    ) {
        let World {
            config,
            tile_size,
            economy,
            towers: tower_list,
            waves,
            projectiles,
            ..
        } = world;
        let tile_size = *tile_size;
        let bombarding = !waves.is_empty() && !economy.counting_down();

        self.scratch.clear();
        for tower in tower_list.iter_mut() {
            tower.cooldown = (tower.cooldown - dt).max(0.0);
            if tower.cooldown > 0.0 {
                continue;
            }

            let stats = towers::effective_stats(config, tower);
            let origin = tile_center(tower.cell, tile_size);
            let max_range = stats.range * tile_size;

            let (target, splash_radius) = match config.towers.get(tower.kind).attack {
                AttackMode::Direct => {
                    let Some(target) = find_target(tower_targets, tower.id) else {
                        continue;
                    };
                    (ProjectileTarget::Homing(target.enemy), None)
                }
                AttackMode::Area { splash_radius } => {
                    if !bombarding {
                        continue;
                    }
                    let Some(cell) = tower.area_target else {
                        continue;
                    };
                    let point = tile_center(cell, tile_size);
                    if origin.distance(point) > max_range {
                        continue;
                    }
                    (
                        ProjectileTarget::Ballistic(point),
                        Some(splash_radius * tile_size),
                    )
                }
            };

            tower.cooldown = stats.rate;
            self.scratch.push(Projectile {
                position: origin,
                origin,
                max_range,
                speed: config.projectile.speed * tile_size,
                damage: stats.damage,
                knockback_distance: stats.knockback * tile_size,
                splash_radius,
                target,
                tower: tower.id,
                tower_kind: tower.kind,
            });
            out.push(Event::ProjectileFired {
                tower: tower.id,
                kind: tower.kind,
            });
        }

        projectiles.append(&mut self.scratch);
    }
}

fn find_target(tower_targets: &[TowerTarget], tower: TowerId) -> Option<&TowerTarget> {
    tower_targets
        .binary_search_by_key(&tower, |target| target.tower)
        .ok()
        .map(|index| &tower_targets[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantasy_td_core::{CellCoord, EnemyId, GameConfig, TowerKind, WaveId};
    use fantasy_td_world::{towers::Tower, waves::Wave};
    use glam::Vec2;

    fn world_with_tower(kind: TowerKind) -> World {
        let mut world = World::new(GameConfig::default());
        let id = world.ids.tower();
        let tower = Tower::new(&world.config, &world.path, id, kind, CellCoord::new(3, 1));
        world.towers.push(tower);
        world
    }

    fn target(tower: u32, enemy: u32) -> TowerTarget {
        TowerTarget {
            tower: TowerId::new(tower),
            enemy: EnemyId::new(enemy),
            tower_center: Vec2::new(224.0, 96.0),
            enemy_position: Vec2::new(260.0, 96.0),
        }
    }

    #[test]
    fn ready_direct_tower_fires_homing_projectile() {
        let mut world = world_with_tower(TowerKind::Mage);
        let mut system = TowerCombat::new();
        let mut out = Vec::new();

        system.handle(&mut world, 0.05, &[target(0, 4)], &mut out);

        assert_eq!(
            out,
            vec![Event::ProjectileFired {
                tower: TowerId::new(0),
                kind: TowerKind::Mage,
            }]
        );
        let projectile = &world.projectiles[0];
        assert_eq!(projectile.target, ProjectileTarget::Homing(EnemyId::new(4)));
        assert_eq!(projectile.origin, Vec2::new(224.0, 96.0));
        assert_eq!(projectile.position, projectile.origin);
        assert_eq!(projectile.damage, 14.0);
        assert_eq!(projectile.speed, 4.5 * 64.0);
        assert!((projectile.max_range - 2.3 * 64.0).abs() < 1e-3);
        assert_eq!(projectile.splash_radius, None);
        assert_eq!(world.towers[0].cooldown, 0.9);
    }

    #[test]
    fn cooling_tower_holds_fire() {
        let mut world = world_with_tower(TowerKind::Mage);
        let mut system = TowerCombat::new();
        let mut out = Vec::new();
        system.handle(&mut world, 0.05, &[target(0, 4)], &mut out);
        out.clear();

        system.handle(&mut world, 0.05, &[target(0, 4)], &mut out);
        assert!(out.is_empty());
        assert_eq!(world.projectiles.len(), 1);
        assert!((world.towers[0].cooldown - 0.85).abs() < 1e-6);
    }

    #[test]
    fn direct_tower_without_target_stays_ready() {
        let mut world = world_with_tower(TowerKind::Archer);
        let mut system = TowerCombat::new();
        let mut out = Vec::new();

        system.handle(&mut world, 0.05, &[target(7, 1)], &mut out);
        assert!(out.is_empty());
        assert_eq!(world.towers[0].cooldown, 0.0);
    }

    #[test]
    fn blade_projectile_carries_knockback_in_world_units() {
        let mut world = world_with_tower(TowerKind::Blade);
        let mut out = Vec::new();
        TowerCombat::new().handle(&mut world, 0.05, &[target(0, 2)], &mut out);
        assert!((world.projectiles[0].knockback_distance - 0.35 * 64.0).abs() < 1e-4);
    }

    #[test]
    fn area_tower_needs_live_wave_without_countdown() {
        let mut world = world_with_tower(TowerKind::Catapult);
        world.towers[0].area_target = Some(CellCoord::new(2, 2));
        let mut system = TowerCombat::new();
        let mut out = Vec::new();

        system.handle(&mut world, 0.05, &[], &mut out);
        assert!(out.is_empty(), "no wave is live");

        world.waves.push(Wave::new(WaveId::new(0), 1, 14, 0.2, false));
        world.economy.countdown_remaining = 2.0;
        system.handle(&mut world, 0.05, &[], &mut out);
        assert!(out.is_empty(), "countdown holds fire");

        world.economy.countdown_remaining = 0.0;
        system.handle(&mut world, 0.05, &[], &mut out);
        assert_eq!(out.len(), 1);
        let projectile = &world.projectiles[0];
        assert_eq!(
            projectile.target,
            ProjectileTarget::Ballistic(Vec2::new(160.0, 160.0))
        );
        assert_eq!(projectile.splash_radius, Some(0.9 * 64.0));
        assert_eq!(world.towers[0].cooldown, 2.2);
    }

    #[test]
    fn area_target_out_of_range_is_ignored() {
        let mut world = world_with_tower(TowerKind::Catapult);
        world.towers[0].area_target = Some(CellCoord::new(12, 8));
        world.waves.push(Wave::new(WaveId::new(0), 1, 14, 0.2, false));
        let mut out = Vec::new();

        TowerCombat::new().handle(&mut world, 0.05, &[], &mut out);
        assert!(out.is_empty());
        assert!(world.projectiles.is_empty());
    }
}
