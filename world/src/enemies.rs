//! Enemy state stored inside the world.

use fantasy_td_core::{EnemyId, EnemyKind, Faction, WaveId};
use glam::Vec2;

/// Where an enemy stands on the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Spawned this tick and not yet moved onto the path.
    Unplaced,
    /// Walking the path.
    Positioned {
        /// World-space position.
        position: Vec2,
        /// Unit-ish steering heading.
        velocity: Vec2,
    },
}

/// Enemy walking the path.
#[derive(Clone, Debug, PartialEq)]
pub struct Enemy {
    /// Identifier allocated by the world.
    pub id: EnemyId,
    /// Wave the enemy belongs to.
    pub wave: WaveId,
    /// Kind rolled for the enemy.
    pub kind: EnemyKind,
    /// Faction leading the wave.
    pub faction: Faction,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// Walking speed in tiles per second.
    pub speed: f32,
    /// Render scale.
    pub size_scale: f32,
    /// Whether the enemy is a boss.
    pub is_boss: bool,
    /// Index of the waypoint the enemy walks toward.
    pub target_waypoint: usize,
    /// Position and heading, once placed.
    pub placement: Placement,
    /// Distance still to be pushed back along the path, in world units.
    pub knockback_remaining: f32,
    /// Seconds of knockback immunity left.
    pub knockback_resist_remaining: f32,
    /// Set once the enemy walked past the last waypoint.
    pub reached_end: bool,
}

impl Enemy {
    /// World-space position, if placed.
    #[must_use]
    pub fn position(&self) -> Option<Vec2> {
        match self.placement {
            Placement::Unplaced => None,
            Placement::Positioned { position, .. } => Some(position),
        }
    }

    /// Current heading, if placed.
    #[must_use]
    pub fn velocity(&self) -> Option<Vec2> {
        match self.placement {
            Placement::Unplaced => None,
            Placement::Positioned { velocity, .. } => Some(velocity),
        }
    }

    /// Whether the enemy still has hit points.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Whether a new knockback impulse would be ignored.
    #[must_use]
    pub fn knockback_immune(&self) -> bool {
        self.knockback_resist_remaining > 0.0
    }
}
