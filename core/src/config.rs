//! Tunable game configuration with validated defaults.
//!
//! Every structure deserializes with `#[serde(default)]`, so a configuration
//! file only needs to mention the values it overrides.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CellCoord, EnemyKind, Faction, TileGrid, TowerKind};

/// Complete set of tunables consumed by the world and the systems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid dimensions.
    pub grid: TileGrid,
    /// Waypoints enemies walk through, in order.
    pub path: Vec<CellCoord>,
    /// Starting resources and bookkeeping rewards.
    pub economy: EconomyConfig,
    /// Level scaling shared by every tower kind.
    pub tower: TowerConfig,
    /// Base statistics per tower kind.
    pub towers: TowerKindTable,
    /// Wave pacing.
    pub wave: WaveConfig,
    /// Enemy statistics and spawn composition.
    pub enemy: EnemyConfig,
    /// Faction progression, ordered by wave range.
    pub factions: Vec<FactionConfig>,
    /// Steering, knockback and frame pacing constants.
    pub motion: MotionConfig,
    /// Projectile flight constants.
    pub projectile: ProjectileConfig,
    /// Seed for the wave composition random source.
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        let path = [(0, 4), (4, 4), (4, 2), (9, 2), (9, 6), (14, 6), (15, 7)]
            .into_iter()
            .map(|(column, row)| CellCoord::new(column, row))
            .collect();
        Self {
            grid: TileGrid::new(16, 9),
            path,
            economy: EconomyConfig::default(),
            tower: TowerConfig::default(),
            towers: TowerKindTable::default(),
            wave: WaveConfig::default(),
            enemy: EnemyConfig::default(),
            factions: default_factions(),
            motion: MotionConfig::default(),
            projectile: ProjectileConfig::default(),
            seed: 0x5EED_F00D,
        }
    }
}

impl GameConfig {
    /// Checks the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.columns() == 0 || self.grid.rows() == 0 {
            return Err(ConfigError::EmptyGrid);
        }
        if self.path.len() < 2 {
            return Err(ConfigError::PathTooShort {
                len: self.path.len(),
            });
        }
        for (index, waypoint) in self.path.iter().enumerate() {
            if !self.grid.contains(*waypoint) {
                return Err(ConfigError::WaypointOffGrid {
                    index,
                    cell: *waypoint,
                });
            }
        }
        for (index, pair) in self.path.windows(2).enumerate() {
            let dx = pair[1].column().abs_diff(pair[0].column());
            let dy = pair[1].row().abs_diff(pair[0].row());
            if dx != 0 && dy != 0 && dx != dy {
                return Err(ConfigError::CrookedSegment { index });
            }
        }

        for kind in TowerKind::ALL {
            let stats = self.towers.get(kind);
            if stats.range < self.tower.min_range {
                return Err(ConfigError::RangeBelowMinimum {
                    kind,
                    range: stats.range,
                    min: self.tower.min_range,
                });
            }
            ensure_positive("tower rate", stats.rate)?;
            if let AttackMode::Area { splash_radius } = stats.attack {
                ensure_positive("splash radius", splash_radius)?;
            }
        }

        let expected = self.tower.max_level as usize + 1;
        if self.tower.level_multipliers.len() != expected {
            return Err(ConfigError::LevelTableLength {
                table: "level_multipliers",
                expected,
                actual: self.tower.level_multipliers.len(),
            });
        }
        if self.tower.cost_multipliers.len() != expected {
            return Err(ConfigError::LevelTableLength {
                table: "cost_multipliers",
                expected,
                actual: self.tower.cost_multipliers.len(),
            });
        }
        for (index, pair) in self.tower.cost_multipliers.windows(2).enumerate() {
            if pair[1] < pair[0] {
                return Err(ConfigError::DecreasingCost { level: index + 1 });
            }
        }

        ensure_non_negative("initial spawn delay", self.wave.initial_spawn_delay)?;
        ensure_positive("spawn interval", self.wave.spawn_interval)?;
        ensure_non_negative("countdown", self.wave.countdown_seconds)?;
        ensure_positive("projectile speed", self.projectile.speed)?;
        ensure_positive("splash effect duration", self.projectile.splash_effect_seconds)?;
        ensure_positive("knockback speed", self.motion.knockback_speed)?;
        ensure_positive("max frame delta", self.motion.max_frame_dt)?;
        ensure_positive("highlight duration", self.motion.highlight_seconds)?;
        if self.enemy.boss.interval == 0 {
            return Err(ConfigError::ZeroBossInterval);
        }
        if self.motion.speed_options.is_empty() {
            return Err(ConfigError::NoSpeedOptions);
        }
        for option in &self.motion.speed_options {
            ensure_positive("speed option", *option)?;
        }

        validate_spawn_table("default", &self.enemy.spawn_weights, false)?;
        if self.factions.is_empty() {
            return Err(ConfigError::NoFactions);
        }
        for faction in &self.factions {
            validate_spawn_table(&format!("{:?}", faction.faction), &faction.spawn_weights, true)?;
        }
        Ok(())
    }

    /// Faction leading the wave with the provided one-based number.
    ///
    /// Waves past the final range stay with the last faction.
    #[must_use]
    pub fn faction_for_wave(&self, wave_number: u32) -> Option<&FactionConfig> {
        self.factions
            .iter()
            .find(|faction| wave_number >= faction.first_wave && wave_number <= faction.last_wave)
            .or_else(|| self.factions.last())
    }

    /// Reports whether the wave with the provided number releases a boss.
    #[must_use]
    pub fn is_boss_wave(&self, wave_number: u32) -> bool {
        let interval = self.enemy.boss.interval;
        interval > 0 && wave_number > 0 && wave_number % interval == 0
    }

    /// Spawn weights used for regular enemies of the provided wave.
    ///
    /// The faction table is consulted first and the default table serves as a
    /// fallback. Within a table the first tier whose `max_wave` covers the
    /// position of the wave inside its boss cycle wins, else the last tier.
    #[must_use]
    pub fn spawn_weights_for_wave(&self, wave_number: u32) -> Option<&SpawnWeights> {
        let interval = self.enemy.boss.interval.max(1);
        let cycle_index = (wave_number.saturating_sub(1) % interval) + 1;
        let table = self
            .faction_for_wave(wave_number)
            .map(|faction| faction.spawn_weights.as_slice())
            .filter(|tiers| !tiers.is_empty())
            .unwrap_or(self.enemy.spawn_weights.as_slice());
        table
            .iter()
            .find(|tier| tier.max_wave >= cycle_index)
            .or_else(|| table.last())
            .map(|tier| &tier.weights)
    }
}

fn ensure_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTiming { name, value })
    }
}

fn ensure_non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidTiming { name, value })
    }
}

fn validate_spawn_table(
    table: &str,
    tiers: &[SpawnWeightTier],
    allow_empty: bool,
) -> Result<(), ConfigError> {
    if tiers.is_empty() && !allow_empty {
        return Err(ConfigError::EmptySpawnTable {
            table: table.to_owned(),
        });
    }
    for tier in tiers {
        let valid = tier
            .weights
            .entries()
            .iter()
            .all(|(_, weight)| weight.is_finite() && *weight >= 0.0);
        if !valid || tier.weights.total() <= 0.0 {
            return Err(ConfigError::ZeroSpawnWeight {
                table: table.to_owned(),
                max_wave: tier.max_wave,
            });
        }
    }
    Ok(())
}

/// Reasons a [`GameConfig`] is refused at startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The grid has no columns or no rows.
    #[error("grid must contain at least one column and one row")]
    EmptyGrid,
    /// The path cannot form a single segment.
    #[error("path needs at least two waypoints, found {len}")]
    PathTooShort {
        /// Number of configured waypoints.
        len: usize,
    },
    /// A waypoint lies outside of the grid.
    #[error("waypoint {index} at {cell:?} lies outside of the grid")]
    WaypointOffGrid {
        /// Position of the waypoint in the path.
        index: usize,
        /// Offending coordinate.
        cell: CellCoord,
    },
    /// Two consecutive waypoints are neither aligned nor exactly diagonal.
    #[error("path segment {index} is neither straight nor diagonal")]
    CrookedSegment {
        /// Index of the first waypoint of the segment.
        index: usize,
    },
    /// A tower kind reaches less far than the minimum range.
    #[error("{kind:?} range {range} is below the minimum of {min}")]
    RangeBelowMinimum {
        /// Offending tower kind.
        kind: TowerKind,
        /// Configured base range.
        range: f32,
        /// Configured minimum range.
        min: f32,
    },
    /// A per-level table does not cover exactly `max_level + 1` levels.
    #[error("{table} must list {expected} levels, found {actual}")]
    LevelTableLength {
        /// Name of the table.
        table: &'static str,
        /// Required number of entries.
        expected: usize,
        /// Provided number of entries.
        actual: usize,
    },
    /// An upgrade would cost less than the previous one.
    #[error("cost multiplier for level {level} is lower than the previous level")]
    DecreasingCost {
        /// Level whose multiplier decreased.
        level: usize,
    },
    /// A timing value is zero, negative or not finite.
    #[error("{name} is out of range: {value}")]
    InvalidTiming {
        /// Name of the timing value.
        name: &'static str,
        /// Provided value.
        value: f32,
    },
    /// Boss waves would never end.
    #[error("boss interval must be at least one wave")]
    ZeroBossInterval,
    /// No speed multiplier can be selected.
    #[error("at least one speed option is required")]
    NoSpeedOptions,
    /// No faction can lead the waves.
    #[error("faction progression is empty")]
    NoFactions,
    /// A spawn table has no tiers.
    #[error("spawn table `{table}` is empty")]
    EmptySpawnTable {
        /// Name of the table.
        table: String,
    },
    /// A spawn tier has no positive weight.
    #[error("spawn table `{table}` tier up to wave {max_wave} has no positive weight")]
    ZeroSpawnWeight {
        /// Name of the table.
        table: String,
        /// Upper wave bound of the tier.
        max_wave: u32,
    },
}

/// Starting resources and the gold/lives bookkeeping constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Gold available at the start of a game.
    pub starting_gold: u32,
    /// Lives available at the start of a game.
    pub starting_lives: u32,
    /// Cap applied by life regeneration.
    pub max_lives: u32,
    /// Gold granted per killed enemy.
    pub kill_bounty: u32,
    /// Lives lost when a regular enemy leaks.
    pub leak_penalty: u32,
    /// Lives lost when a boss leaks.
    pub boss_leak_penalty: u32,
    /// Lives restored after a flawless regular wave.
    pub life_regen: u32,
    /// Lives restored after a flawless boss wave.
    pub boss_life_regen: u32,
    /// Share of the invested gold refunded when a tower is sold.
    pub sell_refund_ratio: f32,
    /// Whether direct hits emit damage popup events.
    pub show_damage_popups: bool,
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            starting_gold: 140,
            starting_lives: 15,
            max_lives: 15,
            kill_bounty: 8,
            leak_penalty: 1,
            boss_leak_penalty: 3,
            life_regen: 1,
            boss_life_regen: 3,
            sell_refund_ratio: 0.5,
            show_damage_popups: true,
        }
    }
}

/// Multipliers applied to base tower statistics at a given level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelMultipliers {
    /// Damage multiplier.
    pub damage: f32,
    /// Range multiplier.
    pub range: f32,
    /// Fire interval multiplier.
    pub rate: f32,
    /// Knockback multiplier.
    pub knockback: f32,
}

impl LevelMultipliers {
    /// Creates a multiplier set.
    #[must_use]
    pub const fn new(damage: f32, range: f32, rate: f32, knockback: f32) -> Self {
        Self {
            damage,
            range,
            rate,
            knockback,
        }
    }
}

/// Level scaling shared by every tower kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Smallest base range a tower kind may be configured with, in tiles.
    pub min_range: f32,
    /// Highest level a tower can reach.
    pub max_level: u32,
    /// Stat multipliers indexed by level.
    pub level_multipliers: Vec<LevelMultipliers>,
    /// Upgrade cost multipliers indexed by the level being reached.
    pub cost_multipliers: Vec<f32>,
    /// Range bonus in tiles for ranged towers standing on a tree.
    pub tree_range_bonus: f32,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self {
            min_range: 1.0,
            max_level: 3,
            level_multipliers: vec![
                LevelMultipliers::new(1.0, 1.0, 1.0, 1.0),
                LevelMultipliers::new(1.25, 1.1, 0.92, 1.1),
                LevelMultipliers::new(1.55, 1.2, 0.85, 1.2),
                LevelMultipliers::new(1.9, 1.3, 0.78, 1.3),
            ],
            cost_multipliers: vec![0.0, 0.75, 1.1, 1.6],
            tree_range_bonus: 0.4,
        }
    }
}

/// How a tower kind delivers its damage.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AttackMode {
    /// Homing projectile aimed at the nearest enemy.
    Direct,
    /// Ballistic projectile aimed at a player-assigned tile.
    Area {
        /// Splash radius in tiles.
        splash_radius: f32,
    },
}

/// Base statistics of a tower kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerTypeConfig {
    /// Gold required to build the tower.
    pub cost: u32,
    /// Targeting range in tiles.
    pub range: f32,
    /// Seconds between shots.
    pub rate: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Knockback distance in tiles.
    #[serde(default)]
    pub knockback: f32,
    /// Damage delivery mode.
    pub attack: AttackMode,
    /// Whether the tower profits from tree tiles.
    #[serde(default)]
    pub ranged: bool,
    /// Whether targeting ignores enemies that are immune to knockback.
    #[serde(default)]
    pub skips_knockback_immune: bool,
}

/// Base statistics for every tower kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerKindTable {
    /// Arcane tower.
    pub mage: TowerTypeConfig,
    /// Elven archer.
    pub archer: TowerTypeConfig,
    /// Sword guard.
    pub blade: TowerTypeConfig,
    /// Siege engine.
    pub catapult: TowerTypeConfig,
}

impl TowerKindTable {
    /// Base statistics of the provided kind.
    #[must_use]
    pub const fn get(&self, kind: TowerKind) -> &TowerTypeConfig {
        match kind {
            TowerKind::Mage => &self.mage,
            TowerKind::Archer => &self.archer,
            TowerKind::Blade => &self.blade,
            TowerKind::Catapult => &self.catapult,
        }
    }
}

impl Default for TowerKindTable {
    fn default() -> Self {
        Self {
            mage: TowerTypeConfig {
                cost: 60,
                range: 2.3,
                rate: 0.9,
                damage: 14.0,
                knockback: 0.0,
                attack: AttackMode::Direct,
                ranged: true,
                skips_knockback_immune: false,
            },
            archer: TowerTypeConfig {
                cost: 45,
                range: 1.9,
                rate: 0.6,
                damage: 8.0,
                knockback: 0.0,
                attack: AttackMode::Direct,
                ranged: true,
                skips_knockback_immune: false,
            },
            blade: TowerTypeConfig {
                cost: 35,
                range: 1.4,
                rate: 0.5,
                damage: 11.0,
                knockback: 0.35,
                attack: AttackMode::Direct,
                ranged: false,
                skips_knockback_immune: true,
            },
            catapult: TowerTypeConfig {
                cost: 80,
                range: 3.2,
                rate: 2.2,
                damage: 22.0,
                knockback: 0.0,
                attack: AttackMode::Area { splash_radius: 0.9 },
                ranged: false,
                skips_knockback_immune: false,
            },
        }
    }
}

/// Wave pacing constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Seconds before the first spawn of a wave.
    pub initial_spawn_delay: f32,
    /// Seconds between two spawns.
    pub spawn_interval: f32,
    /// Regular spawns of every wave.
    pub base_spawns: u32,
    /// Additional regular spawns per wave number.
    pub spawns_per_wave: u32,
    /// Gold granted on wave completion.
    pub wave_reward: u32,
    /// Seconds of countdown started with each wave.
    pub countdown_seconds: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            initial_spawn_delay: 0.2,
            spawn_interval: 0.7,
            base_spawns: 12,
            spawns_per_wave: 2,
            wave_reward: 40,
            countdown_seconds: 5.0,
        }
    }
}

/// Modifiers applied to regular enemies of a given kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyKindConfig {
    /// Hit point multiplier.
    pub hp_multiplier: f32,
    /// Speed multiplier.
    pub speed_multiplier: f32,
    /// Render scale.
    pub size_scale: f32,
    /// Seconds of knockback immunity after being shoved.
    pub knockback_resist_seconds: f32,
    /// Multiplier applied to incoming knockback distances.
    pub knockback_multiplier: f32,
}

impl EnemyKindConfig {
    const fn new(
        hp_multiplier: f32,
        speed_multiplier: f32,
        size_scale: f32,
        knockback_resist_seconds: f32,
        knockback_multiplier: f32,
    ) -> Self {
        Self {
            hp_multiplier,
            speed_multiplier,
            size_scale,
            knockback_resist_seconds,
            knockback_multiplier,
        }
    }
}

/// Modifiers for every regular enemy kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyKindTable {
    /// Baseline foot soldier.
    pub skirmisher: EnemyKindConfig,
    /// Fast runner.
    pub raider: EnemyKindConfig,
    /// Sturdy brawler.
    pub bruiser: EnemyKindConfig,
    /// Shield bearer.
    pub bulwark: EnemyKindConfig,
    /// Veteran.
    pub elite: EnemyKindConfig,
}

impl EnemyKindTable {
    /// Modifiers of a regular kind; bosses are configured separately.
    #[must_use]
    pub const fn get(&self, kind: EnemyKind) -> Option<&EnemyKindConfig> {
        match kind {
            EnemyKind::Skirmisher => Some(&self.skirmisher),
            EnemyKind::Raider => Some(&self.raider),
            EnemyKind::Bruiser => Some(&self.bruiser),
            EnemyKind::Bulwark => Some(&self.bulwark),
            EnemyKind::Elite => Some(&self.elite),
            EnemyKind::Boss => None,
        }
    }
}

impl Default for EnemyKindTable {
    fn default() -> Self {
        Self {
            skirmisher: EnemyKindConfig::new(1.0, 1.0, 1.0, 0.35, 1.0),
            raider: EnemyKindConfig::new(0.75, 1.35, 0.85, 0.3, 1.2),
            bruiser: EnemyKindConfig::new(1.6, 0.8, 1.2, 0.6, 0.6),
            bulwark: EnemyKindConfig::new(2.4, 0.65, 1.35, 0.9, 0.4),
            elite: EnemyKindConfig::new(1.9, 1.1, 1.15, 0.7, 0.7),
        }
    }
}

/// Boss wave constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossConfig {
    /// Every `interval`-th wave releases a boss.
    pub interval: u32,
    /// Hit point multiplier applied to the wave's base hit points.
    pub hp_multiplier: f32,
    /// Speed multiplier applied to the wave's base speed.
    pub speed_multiplier: f32,
    /// Render scale.
    pub scale: f32,
    /// Seconds of knockback immunity after being shoved.
    pub knockback_resist_seconds: f32,
    /// Multiplier applied to incoming knockback distances.
    pub knockback_multiplier: f32,
}

impl Default for BossConfig {
    fn default() -> Self {
        Self {
            interval: 10,
            hp_multiplier: 8.0,
            speed_multiplier: 0.6,
            scale: 1.6,
            knockback_resist_seconds: 1.2,
            knockback_multiplier: 0.3,
        }
    }
}

/// Relative draw weights of the regular enemy kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnWeights {
    /// Weight of skirmishers.
    pub skirmisher: f32,
    /// Weight of raiders.
    pub raider: f32,
    /// Weight of bruisers.
    pub bruiser: f32,
    /// Weight of bulwarks.
    pub bulwark: f32,
    /// Weight of elites.
    pub elite: f32,
}

impl SpawnWeights {
    /// Weights paired with their kinds, in draw order.
    #[must_use]
    pub const fn entries(&self) -> [(EnemyKind, f32); 5] {
        [
            (EnemyKind::Skirmisher, self.skirmisher),
            (EnemyKind::Raider, self.raider),
            (EnemyKind::Bruiser, self.bruiser),
            (EnemyKind::Bulwark, self.bulwark),
            (EnemyKind::Elite, self.elite),
        ]
    }

    /// Sum of every weight.
    #[must_use]
    pub fn total(&self) -> f32 {
        self.entries().iter().map(|(_, weight)| weight).sum()
    }
}

/// Spawn weights used up to a given position inside the boss cycle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnWeightTier {
    /// Last cycle position the tier applies to.
    pub max_wave: u32,
    /// Draw weights of the tier.
    pub weights: SpawnWeights,
}

impl SpawnWeightTier {
    fn new(max_wave: u32, [skirmisher, raider, bruiser, bulwark, elite]: [f32; 5]) -> Self {
        Self {
            max_wave,
            weights: SpawnWeights {
                skirmisher,
                raider,
                bruiser,
                bulwark,
                elite,
            },
        }
    }
}

/// Enemy statistics and spawn composition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Hit points at wave zero.
    pub base_hp: f32,
    /// Hit points gained per wave number.
    pub hp_per_wave: f32,
    /// Speed in tiles per second at wave zero.
    pub base_speed: f32,
    /// Speed gained per wave number.
    pub speed_per_wave: f32,
    /// Boss constants.
    pub boss: BossConfig,
    /// Regular kind modifiers.
    pub kinds: EnemyKindTable,
    /// Default spawn tiers, used when a faction lists none.
    pub spawn_weights: Vec<SpawnWeightTier>,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_hp: 32.0,
            hp_per_wave: 6.0,
            base_speed: 0.6,
            speed_per_wave: 0.03,
            boss: BossConfig::default(),
            kinds: EnemyKindTable::default(),
            spawn_weights: vec![
                SpawnWeightTier::new(3, [6.0, 2.0, 0.0, 0.0, 0.0]),
                SpawnWeightTier::new(6, [4.0, 3.0, 2.0, 0.0, 0.0]),
                SpawnWeightTier::new(9, [3.0, 3.0, 3.0, 1.0, 1.0]),
                SpawnWeightTier::new(10, [2.0, 2.0, 3.0, 2.0, 2.0]),
            ],
        }
    }
}

/// A faction together with the waves it leads.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FactionConfig {
    /// Faction identifier.
    pub faction: Faction,
    /// First wave led by the faction.
    pub first_wave: u32,
    /// Last wave led by the faction.
    pub last_wave: u32,
    /// Multiplier applied to knockback received by the faction's enemies.
    #[serde(default = "full_knockback")]
    pub knockback_factor: f32,
    /// Spawn tiers overriding the defaults; empty keeps the defaults.
    #[serde(default)]
    pub spawn_weights: Vec<SpawnWeightTier>,
}

fn full_knockback() -> f32 {
    1.0
}

fn default_factions() -> Vec<FactionConfig> {
    let faction = |faction, first_wave, knockback_factor, spawn_weights| FactionConfig {
        faction,
        first_wave,
        last_wave: first_wave + 9,
        knockback_factor,
        spawn_weights,
    };
    let mut factions = vec![
        faction(Faction::Humans, 1, 1.0, Vec::new()),
        faction(
            Faction::Orcs,
            11,
            0.85,
            vec![
                SpawnWeightTier::new(4, [4.0, 1.0, 3.0, 0.0, 0.0]),
                SpawnWeightTier::new(10, [2.0, 1.0, 4.0, 1.0, 1.0]),
            ],
        ),
        faction(
            Faction::Elves,
            21,
            1.1,
            vec![
                SpawnWeightTier::new(4, [2.0, 5.0, 0.0, 0.0, 1.0]),
                SpawnWeightTier::new(10, [1.0, 5.0, 1.0, 0.0, 2.0]),
            ],
        ),
        faction(
            Faction::Undead,
            31,
            0.9,
            vec![
                SpawnWeightTier::new(4, [5.0, 1.0, 1.0, 2.0, 0.0]),
                SpawnWeightTier::new(10, [3.0, 1.0, 2.0, 3.0, 1.0]),
            ],
        ),
        faction(
            Faction::Dwarves,
            41,
            0.7,
            vec![
                SpawnWeightTier::new(4, [2.0, 0.0, 3.0, 3.0, 0.0]),
                SpawnWeightTier::new(10, [1.0, 0.0, 3.0, 4.0, 2.0]),
            ],
        ),
        faction(
            Faction::Spirits,
            51,
            1.2,
            vec![SpawnWeightTier::new(10, [2.0, 4.0, 0.0, 0.0, 3.0])],
        ),
        faction(
            Faction::Demons,
            61,
            0.8,
            vec![SpawnWeightTier::new(10, [1.0, 2.0, 3.0, 1.0, 4.0])],
        ),
        faction(
            Faction::Dragons,
            71,
            0.6,
            vec![SpawnWeightTier::new(10, [0.0, 1.0, 2.0, 4.0, 4.0])],
        ),
    ];
    if let Some(last) = factions.last_mut() {
        last.last_wave = u32::MAX;
    }
    factions
}

/// Steering, knockback and frame pacing constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// How quickly enemies steer toward their next waypoint.
    pub turn_strength: f32,
    /// Distance in tiles at which a waypoint counts as reached.
    pub waypoint_reach: f32,
    /// Speed in tiles per second at which knockback is consumed.
    pub knockback_speed: f32,
    /// Segment parameter below which a shoved enemy falls back a waypoint.
    pub knockback_epsilon: f32,
    /// Largest frame delta accepted by a tick, in seconds.
    pub max_frame_dt: f32,
    /// Selectable simulation speed multipliers.
    pub speed_options: Vec<f32>,
    /// Seconds a tower highlight takes to fade once deselected.
    pub highlight_seconds: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            turn_strength: 10.0,
            waypoint_reach: 0.2,
            knockback_speed: 6.0,
            knockback_epsilon: 1e-3,
            max_frame_dt: 0.05,
            speed_options: vec![1.0, 2.0, 3.0],
            highlight_seconds: 0.25,
        }
    }
}

/// Projectile flight constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Flight speed in tiles per second.
    pub speed: f32,
    /// Lifetime of a splash ring in seconds.
    pub splash_effect_seconds: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 4.5,
            splash_effect_seconds: 0.35,
        }
    }
}
