#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that selects the nearest enemy for every direct-fire tower.

use fantasy_td_core::{AttackMode, EnemyId, TowerId};
use fantasy_td_world::{path::tile_center, towers, World};
use glam::Vec2;

/// Enemy chosen by a direct-fire tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that acquired the target.
    pub tower: TowerId,
    /// Enemy the tower should shoot at.
    pub enemy: EnemyId,
    /// World-space centre of the tower's tile.
    pub tower_center: Vec2,
    /// World-space position of the enemy when it was selected.
    pub enemy_position: Vec2,
}

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    candidates: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world.
    ///
    /// The output buffer is cleared before populating it. Area-attack towers
    /// never receive a target; they fire at their assigned ground cell.
    pub fn handle(&mut self, world: &World, out: &mut Vec<TowerTarget>) {
        out.clear();

        if world.towers.is_empty() || world.enemies.is_empty() {
            return;
        }

        self.prepare_candidates(world);
        if self.candidates.is_empty() {
            return;
        }

        for tower in &world.towers {
            let kind = world.config.towers.get(tower.kind);
            if !matches!(kind.attack, AttackMode::Direct) {
                continue;
            }

            let stats = towers::effective_stats(&world.config, tower);
            let radius = stats.range * world.tile_size;
            let max_distance = radius * radius;
            let center = tile_center(tower.cell, world.tile_size);

            let mut best: Option<BestCandidate> = None;
            for candidate in &self.candidates {
                if kind.skips_knockback_immune && candidate.knockback_immune {
                    continue;
                }

                let distance_sq = candidate.position.distance_squared(center);
                if distance_sq > max_distance {
                    continue;
                }

                let current = BestCandidate {
                    distance_sq,
                    enemy: candidate.id,
                    position: candidate.position,
                };
                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best.enemy,
                    tower_center: center,
                    enemy_position: best.position,
                });
            }
        }
    }

    fn prepare_candidates(&mut self, world: &World) {
        self.candidates.clear();
        self.candidates.reserve(world.enemies.len());

        for enemy in world.enemies.iter().filter(|enemy| enemy.is_alive()) {
            let Some(position) = enemy.position() else {
                continue;
            };
            self.candidates.push(EnemyCandidate {
                id: enemy.id,
                position,
                knockback_immune: enemy.knockback_immune(),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
    knockback_immune: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    distance_sq: f32,
    enemy: EnemyId,
    position: Vec2,
}

impl BestCandidate {
    // Strictly closer only, so the earliest enemy keeps exact ties.
    fn precedes(&self, other: &Self) -> bool {
        self.distance_sq < other.distance_sq
    }
}
