//! Projectiles in flight and the splash rings they leave behind.

use fantasy_td_core::{EnemyId, TowerId, TowerKind};
use glam::Vec2;

use crate::enemies::Enemy;

/// What a projectile flies toward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ProjectileTarget {
    /// Follows an enemy until it hits or the enemy disappears.
    Homing(EnemyId),
    /// Flies to a fixed world-space point.
    Ballistic(Vec2),
}

/// Projectile in flight.
#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    /// Current world-space position.
    pub position: Vec2,
    /// Centre of the firing tower.
    pub origin: Vec2,
    /// Largest origin-to-destination distance before the shot is dropped.
    pub max_range: f32,
    /// Flight speed in world units per second.
    pub speed: f32,
    /// Damage dealt on impact.
    pub damage: f32,
    /// Knockback distance in world units.
    pub knockback_distance: f32,
    /// Splash radius in world units for area attacks.
    pub splash_radius: Option<f32>,
    /// Flight target.
    pub target: ProjectileTarget,
    /// Tower that fired the projectile.
    pub tower: TowerId,
    /// Kind of the firing tower.
    pub tower_kind: TowerKind,
}

impl Projectile {
    /// Current destination of the projectile.
    ///
    /// Homing shots resolve to `None` once their target died, was reaped or
    /// is not on the field yet.
    #[must_use]
    pub fn destination(&self, enemies: &[Enemy]) -> Option<Vec2> {
        match self.target {
            ProjectileTarget::Ballistic(point) => Some(point),
            ProjectileTarget::Homing(id) => enemies
                .iter()
                .find(|enemy| enemy.id == id)
                .filter(|enemy| enemy.is_alive())
                .and_then(Enemy::position),
        }
    }
}

/// Splash ring that fades over its duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Effect {
    /// World-space centre.
    pub position: Vec2,
    /// Radius in world units.
    pub radius: f32,
    /// Seconds since the effect appeared.
    pub time: f32,
    /// Seconds the effect lasts.
    pub duration: f32,
}

impl Effect {
    /// Normalised age in the range 0.0..=1.0.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration > 0.0 {
            (self.time / self.duration).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Whether the effect outlived its duration.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.time >= self.duration
    }
}
