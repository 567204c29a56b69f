//! Wave bookkeeping stored inside the world.

use fantasy_td_core::WaveId;

/// Timed batch of spawns tied to one wave number.
#[derive(Clone, Debug, PartialEq)]
pub struct Wave {
    /// Identifier allocated by the world.
    pub id: WaveId,
    /// One-based wave number.
    pub number: u32,
    /// Seconds until the next spawn.
    pub spawn_timer: f32,
    /// Regular spawns issued so far.
    pub spawn_index: u32,
    /// Regular spawns the wave issues in total.
    pub total_spawns: u32,
    /// Spawned enemies that were neither killed nor leaked yet.
    pub remaining_enemies: u32,
    /// Whether the wave releases a boss.
    pub boss_due: bool,
    /// Whether the boss was released.
    pub boss_spawned: bool,
    /// Whether any enemy of the wave leaked.
    pub lives_lost: bool,
}

impl Wave {
    /// Creates a wave that has not spawned anything yet.
    #[must_use]
    pub fn new(id: WaveId, number: u32, total_spawns: u32, initial_delay: f32, boss_due: bool) -> Self {
        Self {
            id,
            number,
            spawn_timer: initial_delay,
            spawn_index: 0,
            total_spawns,
            remaining_enemies: 0,
            boss_due,
            boss_spawned: false,
            lives_lost: false,
        }
    }

    /// Whether every regular spawn and the boss, if due, were issued.
    #[must_use]
    pub fn spawning_finished(&self) -> bool {
        self.spawn_index >= self.total_spawns && (!self.boss_due || self.boss_spawned)
    }

    /// Whether the wave can be removed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.spawning_finished() && self.remaining_enemies == 0
    }

    /// Records the removal of one of the wave's enemies.
    pub fn resolve_enemy(&mut self, leaked: bool) {
        self.remaining_enemies = self.remaining_enemies.saturating_sub(1);
        if leaked {
            self.lives_lost = true;
        }
    }
}
