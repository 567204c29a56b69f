#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fantasy TD simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and the simulation systems. Adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and every state transition of
//! interest is reported back as an [`Event`]. Systems mutate the world during a
//! tick and describe what they did through the same event stream. Rendering and
//! audio collaborators only ever see a [`FrameSnapshot`] and the
//! [`DamageCue`] callback.

use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod config;

pub use config::{
    AttackMode, BossConfig, ConfigError, EconomyConfig, EnemyConfig, EnemyKindConfig,
    EnemyKindTable, FactionConfig, GameConfig, LevelMultipliers, MotionConfig, ProjectileConfig,
    SpawnWeightTier, SpawnWeights, TowerConfig, TowerKindTable, TowerTypeConfig, WaveConfig,
};

/// Commands that express all permissible player-driven world mutations.
///
/// Invalid commands are never errors: the world ignores them and reports the
/// reason through a rejection [`Event`].
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts the next wave and the pre-wave countdown.
    StartWave,
    /// Builds a tower of the provided kind on the provided tile.
    PlaceTower {
        /// Tile that should host the tower.
        cell: CellCoord,
        /// Kind of tower to construct.
        kind: TowerKind,
    },
    /// Raises the level of an existing tower by one.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Sells an existing tower, refunding part of the gold invested in it.
    DeleteTower {
        /// Identifier of the tower to remove.
        tower: TowerId,
    },
    /// Assigns the ground tile an area-attack tower should bombard.
    SetAreaTarget {
        /// Identifier of the area-attack tower.
        tower: TowerId,
        /// Tile the tower should aim at.
        cell: CellCoord,
    },
    /// Flips the sound preference.
    ToggleSound,
    /// Flips the automatic wave start preference.
    ToggleAutoWave,
    /// Selects the simulation speed multiplier.
    SetSpeed {
        /// Requested multiplier applied to every frame delta.
        multiplier: f32,
    },
    /// Restores the initial game state, keeping user preferences.
    Reset,
    /// Highlights a tower in the frame snapshot, or clears the highlight.
    SelectTower {
        /// Tower to highlight, if any.
        tower: Option<TowerId>,
    },
    /// Describes the tower placement currently being dragged by the player.
    PreviewPlacement {
        /// Hovered tile, or `None` when the drag ended.
        cell: Option<CellCoord>,
        /// Kind of tower being dragged.
        kind: TowerKind,
    },
}

/// Events broadcast by the world and the systems while processing a tick.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by a scaled delta.
    TimeAdvanced {
        /// Simulated seconds that elapsed in the tick.
        dt: f32,
    },
    /// Confirms that a new wave was created.
    WaveStarted {
        /// Identifier allocated to the wave.
        wave: WaveId,
        /// One-based wave number.
        number: u32,
        /// Number of regular spawns the wave will issue.
        total_spawns: u32,
        /// Whether the wave releases a boss.
        boss: bool,
    },
    /// Reports that a wave start request was ignored.
    WaveStartRejected {
        /// Specific reason the request was ignored.
        reason: WaveStartError,
    },
    /// Announces that the pre-wave countdown elapsed.
    CountdownFinished,
    /// Confirms that an enemy joined the field.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Wave that spawned the enemy.
        wave: WaveId,
        /// Kind rolled for the enemy.
        kind: EnemyKind,
        /// Faction the enemy belongs to.
        faction: Faction,
    },
    /// Reports that an enemy was killed and its bounty paid.
    EnemyKilled {
        /// Identifier of the slain enemy.
        enemy: EnemyId,
        /// Wave the enemy belonged to.
        wave: WaveId,
        /// Gold granted for the kill.
        bounty: u32,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the leaking enemy.
        enemy: EnemyId,
        /// Wave the enemy belonged to.
        wave: WaveId,
        /// Lives removed from the pool.
        lives_lost: u32,
    },
    /// Confirms that every enemy of a wave was resolved.
    WaveCompleted {
        /// Identifier of the completed wave.
        wave: WaveId,
        /// One-based wave number.
        number: u32,
        /// Gold granted for completing the wave.
        reward: u32,
        /// Lives regenerated for a flawless wave.
        lives_restored: u32,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Kind of tower that was placed.
        kind: TowerKind,
        /// Tile hosting the tower.
        cell: CellCoord,
        /// Gold deducted for the construction.
        cost: u32,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Kind of tower requested for placement.
        kind: TowerKind,
        /// Tile provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the tower.
        level: u32,
        /// Gold deducted for the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was sold.
    TowerRemoved {
        /// Identifier of the removed tower.
        tower: TowerId,
        /// Tile previously hosting the tower.
        cell: CellCoord,
        /// Gold refunded to the player.
        refund: u32,
    },
    /// Reports that a removal request was rejected.
    TowerRemovalRejected {
        /// Identifier of the tower targeted for removal.
        tower: TowerId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Confirms that an area-attack tower received a ground target.
    AreaTargetAssigned {
        /// Identifier of the area-attack tower.
        tower: TowerId,
        /// Tile the tower will bombard.
        cell: CellCoord,
    },
    /// Reports that an area target request was rejected.
    AreaTargetRejected {
        /// Identifier of the tower named in the request.
        tower: TowerId,
        /// Specific reason the request failed.
        reason: AreaTargetError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier of the firing tower.
        tower: TowerId,
        /// Kind of the firing tower.
        kind: TowerKind,
    },
    /// Damage popup hint emitted for every hit while popups are enabled.
    DamageDealt {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Hit points removed by the hit.
        amount: f32,
        /// World-space position of the enemy when it was hit.
        position: Vec2,
    },
    /// Reports that a splash projectile detonated.
    SplashDetonated {
        /// World-space impact point.
        position: Vec2,
        /// Splash radius in world units.
        radius: f32,
        /// Number of enemies caught by the blast.
        hits: u32,
    },
    /// Reports that an enemy received a knockback impulse.
    KnockbackApplied {
        /// Identifier of the shoved enemy.
        enemy: EnemyId,
        /// Knockback budget assigned to the enemy, in world units.
        distance: f32,
    },
    /// Confirms the new sound preference.
    SoundToggled {
        /// Whether damage cues should be audible.
        enabled: bool,
    },
    /// Confirms the new auto-wave preference.
    AutoWaveToggled {
        /// Whether waves start automatically.
        enabled: bool,
    },
    /// Confirms the new speed multiplier.
    SpeedChanged {
        /// Multiplier now applied to every frame delta.
        multiplier: f32,
    },
    /// Reports that a speed request was rejected.
    SpeedRejected {
        /// Multiplier provided in the request.
        multiplier: f32,
        /// Specific reason the request failed.
        reason: SpeedError,
    },
    /// Announces that the last life was lost.
    Defeated {
        /// Number of the wave that would have been started next.
        next_wave: u32,
    },
    /// Confirms that the game state was reset.
    GameReset,
}

/// Reasons a wave start request may be ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WaveStartError {
    /// The countdown of the previous wave start is still running.
    CountdownActive,
    /// The player already lost every life.
    Defeated,
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested tile lies outside of the grid.
    OutOfBounds,
    /// The requested tile belongs to the enemy path.
    OnPath,
    /// Another tower already occupies the tile.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientGold,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower already reached the maximum level.
    MaxLevel,
    /// The player cannot afford the upgrade.
    InsufficientGold,
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Reasons an area target request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AreaTargetError {
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The tower does not attack areas.
    NotAreaAttack,
    /// The requested tile lies outside of the grid.
    OutOfBounds,
}

/// Reasons a speed change request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SpeedError {
    /// The multiplier is not one of the configured speed options.
    UnsupportedMultiplier,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WaveId(u32);

impl WaveId {
    /// Creates a new wave identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the wave identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid tile expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Describes the discrete tile layout of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
}

impl TileGrid {
    /// Creates a new tile grid description.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Largest square tile size that fits the grid into the provided viewport.
    ///
    /// Degenerate grids and viewports collapse to zero.
    #[must_use]
    pub fn tile_size_for(&self, width: f32, height: f32) -> f32 {
        if self.columns == 0 || self.rows == 0 {
            return 0.0;
        }
        let size = (width / self.columns as f32).min(height / self.rows as f32);
        if size.is_finite() && size > 0.0 {
            size
        } else {
            0.0
        }
    }
}

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Arcane tower firing long-range magic bolts.
    Mage,
    /// Elven archer firing fast arrows.
    Archer,
    /// Sword guard with short reach and a shoving strike.
    Blade,
    /// Siege engine lobbing boulders at a ground target.
    Catapult,
}

impl TowerKind {
    /// Every tower kind in catalogue order.
    pub const ALL: [TowerKind; 4] = [Self::Mage, Self::Archer, Self::Blade, Self::Catapult];

    /// Stable identifier used by the persisted-state contract.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Mage => "mage",
            Self::Archer => "archer",
            Self::Blade => "blade",
            Self::Catapult => "catapult",
        }
    }

    /// Resolves a persisted identifier, returning `None` for unknown kinds.
    #[must_use]
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// Enemy archetypes rolled by the wave director.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Baseline foot soldier.
    Skirmisher,
    /// Fast, fragile runner.
    Raider,
    /// Slow, sturdy brawler.
    Bruiser,
    /// Heavily armoured shield bearer.
    Bulwark,
    /// Veteran with balanced stats.
    Elite,
    /// Boss released once per boss wave.
    Boss,
}

/// Enemy factions that take turns leading the waves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Faction {
    /// Human Vanguard.
    Humans,
    /// Orc Marauders.
    Orcs,
    /// Elven Raiders.
    Elves,
    /// Undead Legion.
    Undead,
    /// Dwarven Reavers.
    Dwarves,
    /// Spirit Host.
    Spirits,
    /// Demonic Horde.
    Demons,
    /// Dragonkin.
    Dragons,
}

/// Effective combat statistics of a tower at a given level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Level the statistics were computed for, after clamping.
    pub level: u32,
    /// Targeting range measured in tiles.
    pub range: f32,
    /// Seconds between two shots.
    pub rate: f32,
    /// Damage carried by each projectile.
    pub damage: f32,
    /// Knockback distance measured in tiles.
    pub knockback: f32,
}

/// Audio collaborator notified once per resolved projectile hit.
///
/// The simulation never performs I/O itself; implementations decide whether
/// and how to play a cue for the tower kind that landed the hit.
pub trait DamageCue {
    /// Called after a projectile fired by `tower` resolved its hit.
    fn damage_dealt(&mut self, tower: TowerKind, sound_enabled: bool);
}

impl<F> DamageCue for F
where
    F: FnMut(TowerKind, bool),
{
    fn damage_dealt(&mut self, tower: TowerKind, sound_enabled: bool) {
        self(tower, sound_enabled);
    }
}

/// Damage cue that ignores every hit.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentCue;

impl DamageCue for SilentCue {
    fn damage_dealt(&mut self, _tower: TowerKind, _sound_enabled: bool) {}
}

/// Immutable representation of a single tower used by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile hosting the tower.
    pub cell: CellCoord,
    /// Current upgrade level.
    pub level: u32,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
    /// Effective statistics at the current level, terrain bonus included.
    pub stats: TowerStats,
    /// Gold required for the next upgrade, or `None` at maximum level.
    pub upgrade_cost: Option<u32>,
    /// Ground tile assigned to area-attack towers.
    pub area_target: Option<CellCoord>,
}

/// Immutable representation of a single enemy used by presentation layers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind rolled for the enemy.
    pub kind: EnemyKind,
    /// Faction the enemy belongs to.
    pub faction: Faction,
    /// Remaining hit points.
    pub hp: f32,
    /// Hit points at spawn.
    pub max_hp: f32,
    /// World-space position, once the enemy was placed on the path.
    pub position: Option<Vec2>,
    /// Current heading, once the enemy was placed on the path.
    pub velocity: Option<Vec2>,
    /// Render scale relative to a regular enemy.
    pub size_scale: f32,
    /// Whether the enemy is a boss.
    pub is_boss: bool,
    /// Whether the enemy is currently immune to knockback.
    pub knockback_immune: bool,
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Current world-space position.
    pub position: Vec2,
    /// Current destination, if it can still be resolved.
    pub destination: Option<Vec2>,
    /// Kind of tower that fired the projectile.
    pub tower_kind: TowerKind,
    /// Splash radius in world units for area attacks.
    pub splash_radius: Option<f32>,
}

/// Immutable representation of a splash ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// World-space centre of the ring.
    pub position: Vec2,
    /// Radius of the ring in world units.
    pub radius: f32,
    /// Normalised age of the effect in the range 0.0..=1.0.
    pub progress: f32,
}

/// Declarative placement preview describing a potential tower construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacementPreview {
    /// Kind of tower proposed for placement.
    pub kind: TowerKind,
    /// Tile the tower would occupy.
    pub cell: CellCoord,
    /// Indicates whether the preview represents a valid placement location.
    pub placeable: bool,
    /// Range the tower would have on this tile, measured in world units.
    pub range: f32,
}

/// Highlighted tower together with its fading opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerHighlight {
    /// Tower being highlighted.
    pub tower: TowerId,
    /// Opacity of the highlight in the range 0.0..=1.0.
    pub alpha: f32,
}

/// Area-attack target indicator for the highlighted tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaTargetIndicator {
    /// Tower owning the target.
    pub tower: TowerId,
    /// World-space centre of the targeted tile.
    pub position: Vec2,
    /// Splash radius in world units.
    pub radius: f32,
    /// Whether the target currently lies inside the tower's range.
    pub in_range: bool,
}

/// Transient presentation hints carried alongside each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiHints {
    /// Tower highlighted by the player, if any.
    pub highlight: Option<TowerHighlight>,
    /// Placement currently being dragged, if any.
    pub preview: Option<PlacementPreview>,
    /// Ground target of the highlighted area-attack tower, if any.
    pub area_target: Option<AreaTargetIndicator>,
}

/// Player-facing counters captured in each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EconomySnapshot {
    /// Gold available for construction and upgrades.
    pub gold: u32,
    /// Remaining lives.
    pub lives: u32,
    /// Life cap applied by regeneration.
    pub max_lives: u32,
    /// Number of the wave that starts next.
    pub next_wave: u32,
    /// Seconds left on the pre-wave countdown.
    pub countdown_remaining: f32,
    /// Whether the player lost every life.
    pub defeated: bool,
    /// Whether damage cues are audible.
    pub sound_enabled: bool,
    /// Whether waves start automatically.
    pub auto_wave_enabled: bool,
    /// Active speed multiplier.
    pub speed_multiplier: f32,
    /// Faction leading the next wave.
    pub faction: Faction,
}

/// Read-only view of the complete simulation handed to rendering each frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Side length of a tile in world units.
    pub tile_size: f32,
    /// Grid dimensions.
    pub grid: TileGrid,
    /// Tiles covered by the enemy path, sorted by column, then row.
    pub path_tiles: Vec<CellCoord>,
    /// Player-facing counters.
    pub economy: EconomySnapshot,
    /// Towers in identifier order.
    pub towers: Vec<TowerSnapshot>,
    /// Enemies in spawn order.
    pub enemies: Vec<EnemySnapshot>,
    /// In-flight projectiles.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Active splash rings.
    pub effects: Vec<EffectSnapshot>,
    /// Transient presentation hints.
    pub hints: UiHints,
}
