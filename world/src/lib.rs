#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Fantasy TD.
//!
//! The world owns every entity of a running game. Commands are executed via
//! [`apply`], systems receive the world as `&mut World` during a tick, and
//! presentation layers read it through the [`query`] module.

pub mod enemies;
pub mod path;
pub mod persistence;
pub mod projectiles;
pub mod terrain;
pub mod towers;
pub mod waves;

use fantasy_td_core::{
    AreaTargetError, CellCoord, Command, EnemyId, Event, GameConfig, PlacementError,
    RemovalError, SpeedError, TowerId, TowerKind, UpgradeError, WaveId, WaveStartError,
};
use tracing::{debug, info};

use crate::{
    enemies::{Enemy, Placement},
    path::PathGeometry,
    projectiles::{Effect, Projectile, ProjectileTarget},
    towers::Tower,
    waves::Wave,
};

/// Tile size used until a viewport is configured.
pub const DEFAULT_TILE_SIZE: f32 = 64.0;

/// Player-facing counters and preferences.
#[derive(Clone, Debug, PartialEq)]
pub struct Economy {
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
    /// Whether every life was lost.
    pub defeated: bool,
    /// Whether damage cues are audible.
    pub sound_enabled: bool,
    /// Whether waves start automatically.
    pub auto_wave_enabled: bool,
    /// Whether direct hits emit damage popup events.
    pub show_damage_popups: bool,
    /// Multiplier applied to every frame delta.
    pub speed_multiplier: f32,
}

impl Economy {
    /// Counters at the start of a game.
    #[must_use]
    pub fn new(config: &GameConfig) -> Self {
        Self {
            gold: config.economy.starting_gold,
            lives: config.economy.starting_lives.min(config.economy.max_lives),
            max_lives: config.economy.max_lives,
            next_wave: 1,
            countdown_remaining: 0.0,
            defeated: false,
            sound_enabled: true,
            auto_wave_enabled: false,
            show_damage_popups: config.economy.show_damage_popups,
            speed_multiplier: 1.0,
        }
    }

    /// Whether the pre-wave countdown is running.
    #[must_use]
    pub fn counting_down(&self) -> bool {
        self.countdown_remaining > 0.0
    }
}

/// Transient presentation state fed by selection and drag commands.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hints {
    /// Tower currently selected by the player.
    pub selected: Option<TowerId>,
    /// Highlighted tower and its opacity; fades out after deselection.
    pub highlight: Option<(TowerId, f32)>,
    /// Placement being dragged.
    pub preview: Option<(CellCoord, TowerKind)>,
}

/// Monotonic identifier counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next_enemy: u32,
    next_tower: u32,
    next_wave: u32,
}

impl IdAllocator {
    /// Allocates a fresh enemy identifier.
    pub fn enemy(&mut self) -> EnemyId {
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy = self.next_enemy.wrapping_add(1);
        id
    }

    /// Allocates a fresh tower identifier.
    pub fn tower(&mut self) -> TowerId {
        let id = TowerId::new(self.next_tower);
        self.next_tower = self.next_tower.wrapping_add(1);
        id
    }

    /// Allocates a fresh wave identifier.
    pub fn wave(&mut self) -> WaveId {
        let id = WaveId::new(self.next_wave);
        self.next_wave = self.next_wave.wrapping_add(1);
        id
    }
}

/// Represents the authoritative Fantasy TD world state.
///
/// Fields are public so systems can borrow disjoint parts of the state while
/// mutating it.
#[derive(Clone, Debug)]
pub struct World {
    /// Validated configuration the world was created with.
    pub config: GameConfig,
    /// Enemy path.
    pub path: PathGeometry,
    /// Side length of a tile in world units.
    pub tile_size: f32,
    /// Counters and preferences.
    pub economy: Economy,
    /// Towers in identifier order.
    pub towers: Vec<Tower>,
    /// Enemies in spawn order.
    pub enemies: Vec<Enemy>,
    /// Live waves in start order.
    pub waves: Vec<Wave>,
    /// Projectiles in flight.
    pub projectiles: Vec<Projectile>,
    /// Splash rings.
    pub effects: Vec<Effect>,
    /// Selection and drag hints.
    pub hints: Hints,
    /// Identifier counters.
    pub ids: IdAllocator,
}

impl World {
    /// Creates a new world ready for simulation.
    ///
    /// The configuration is expected to have passed
    /// [`GameConfig::validate`].
    #[must_use]
    pub fn new(config: GameConfig) -> Self {
        let path = PathGeometry::new(config.path.clone());
        let economy = Economy::new(&config);
        Self {
            config,
            path,
            tile_size: DEFAULT_TILE_SIZE,
            economy,
            towers: Vec::new(),
            enemies: Vec::new(),
            waves: Vec::new(),
            projectiles: Vec::new(),
            effects: Vec::new(),
            hints: Hints::default(),
            ids: IdAllocator::default(),
        }
    }

    /// Restores the initial game state while keeping player preferences.
    pub fn reset(&mut self) {
        let previous = self.economy.clone();
        self.economy = Economy::new(&self.config);
        self.economy.sound_enabled = previous.sound_enabled;
        self.economy.auto_wave_enabled = previous.auto_wave_enabled;
        self.economy.show_damage_popups = previous.show_damage_popups;
        self.economy.speed_multiplier = previous.speed_multiplier;
        self.towers.clear();
        self.enemies.clear();
        self.waves.clear();
        self.projectiles.clear();
        self.effects.clear();
        self.hints = Hints::default();
        self.ids = IdAllocator::default();
    }

    /// Derives the tile size from the viewport and rescales live coordinates.
    ///
    /// Viewports that leave no room for a tile are ignored.
    pub fn set_viewport(&mut self, width: f32, height: f32) {
        let tile_size = self.config.grid.tile_size_for(width, height);
        if tile_size <= 0.0 || tile_size == self.tile_size {
            return;
        }
        let scale = tile_size / self.tile_size;
        self.tile_size = tile_size;

        for enemy in &mut self.enemies {
            if let Placement::Positioned { position, .. } = &mut enemy.placement {
                *position *= scale;
            }
            enemy.knockback_remaining *= scale;
        }
        for projectile in &mut self.projectiles {
            projectile.position *= scale;
            projectile.origin *= scale;
            projectile.max_range *= scale;
            projectile.speed *= scale;
            projectile.knockback_distance *= scale;
            projectile.splash_radius = projectile.splash_radius.map(|radius| radius * scale);
            if let ProjectileTarget::Ballistic(point) = &mut projectile.target {
                *point *= scale;
            }
        }
        for effect in &mut self.effects {
            effect.position *= scale;
            effect.radius *= scale;
        }
    }

    /// Creates the next wave and starts the countdown.
    pub fn start_wave(&mut self, out_events: &mut Vec<Event>) {
        let number = self.economy.next_wave;
        let wave_config = &self.config.wave;
        let total_spawns = wave_config
            .base_spawns
            .saturating_add(number.saturating_mul(wave_config.spawns_per_wave));
        let boss = self.config.is_boss_wave(number);
        let id = self.ids.wave();

        self.waves.push(Wave::new(
            id,
            number,
            total_spawns,
            wave_config.initial_spawn_delay,
            boss,
        ));
        self.economy.next_wave = number.saturating_add(1);
        self.economy.countdown_remaining = wave_config.countdown_seconds;
        debug!(wave = number, total_spawns, boss, "wave started");
        out_events.push(Event::WaveStarted {
            wave: id,
            number,
            total_spawns,
            boss,
        });
    }

    /// Advances effect lifetimes and fades the tower highlight.
    pub fn decay_transients(&mut self, dt: f32) {
        for effect in &mut self.effects {
            effect.time += dt;
        }
        self.effects.retain(|effect| !effect.expired());

        self.hints.highlight = match (self.hints.selected, self.hints.highlight) {
            (Some(selected), _) => Some((selected, 1.0)),
            (None, Some((tower, alpha))) => {
                let fade = dt / self.config.motion.highlight_seconds;
                let alpha = alpha - fade;
                (alpha > 0.0).then_some((tower, alpha))
            }
            (None, None) => None,
        };
    }

    fn tower_index(&self, tower: TowerId) -> Option<usize> {
        self.towers
            .binary_search_by_key(&tower, |entry| entry.id)
            .ok()
    }

    /// Reason a tower of `kind` cannot be placed on `cell`, if any.
    #[must_use]
    pub fn placement_error(&self, cell: CellCoord, kind: TowerKind) -> Option<PlacementError> {
        if !self.config.grid.contains(cell) {
            Some(PlacementError::OutOfBounds)
        } else if self.path.contains(cell) {
            Some(PlacementError::OnPath)
        } else if self.towers.iter().any(|tower| tower.cell == cell) {
            Some(PlacementError::Occupied)
        } else if self.economy.gold < self.config.towers.get(kind).cost {
            Some(PlacementError::InsufficientGold)
        } else {
            None
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartWave => {
            if world.economy.defeated {
                out_events.push(Event::WaveStartRejected {
                    reason: WaveStartError::Defeated,
                });
            } else if world.economy.counting_down() {
                out_events.push(Event::WaveStartRejected {
                    reason: WaveStartError::CountdownActive,
                });
            } else {
                world.start_wave(out_events);
            }
        }
        Command::PlaceTower { cell, kind } => {
            if let Some(reason) = world.placement_error(cell, kind) {
                out_events.push(Event::TowerPlacementRejected { kind, cell, reason });
                return;
            }
            let id = world.ids.tower();
            let tower = Tower::new(&world.config, &world.path, id, kind, cell);
            let cost = tower.invested;
            world.economy.gold -= cost;
            world.towers.push(tower);
            out_events.push(Event::TowerPlaced {
                tower: id,
                kind,
                cell,
                cost,
            });
        }
        Command::UpgradeTower { tower } => {
            let Some(index) = world.tower_index(tower) else {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::MissingTower,
                });
                return;
            };
            let entry = &world.towers[index];
            if entry.level >= world.config.tower.max_level {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::MaxLevel,
                });
                return;
            }
            let level = entry.level + 1;
            let cost = towers::upgrade_cost(&world.config, entry.kind, level);
            if world.economy.gold < cost {
                out_events.push(Event::TowerUpgradeRejected {
                    tower,
                    reason: UpgradeError::InsufficientGold,
                });
                return;
            }
            world.economy.gold -= cost;
            let entry = &mut world.towers[index];
            entry.level = level;
            entry.invested = entry.invested.saturating_add(cost);
            out_events.push(Event::TowerUpgraded { tower, level, cost });
        }
        Command::DeleteTower { tower } => {
            let Some(index) = world.tower_index(tower) else {
                out_events.push(Event::TowerRemovalRejected {
                    tower,
                    reason: RemovalError::MissingTower,
                });
                return;
            };
            let removed = world.towers.remove(index);
            let refund = towers::sell_refund(&world.config, removed.invested);
            world.economy.gold = world.economy.gold.saturating_add(refund);
            if world.hints.selected == Some(tower) {
                world.hints.selected = None;
            }
            if matches!(world.hints.highlight, Some((highlighted, _)) if highlighted == tower) {
                world.hints.highlight = None;
            }
            out_events.push(Event::TowerRemoved {
                tower,
                cell: removed.cell,
                refund,
            });
        }
        Command::SetAreaTarget { tower, cell } => {
            let reason = match world.tower_index(tower) {
                None => Some(AreaTargetError::MissingTower),
                Some(index) if !world.towers[index].is_area_attack(&world.config) => {
                    Some(AreaTargetError::NotAreaAttack)
                }
                Some(_) if !world.config.grid.contains(cell) => Some(AreaTargetError::OutOfBounds),
                Some(index) => {
                    world.towers[index].area_target = Some(cell);
                    None
                }
            };
            out_events.push(match reason {
                Some(reason) => Event::AreaTargetRejected { tower, reason },
                None => Event::AreaTargetAssigned { tower, cell },
            });
        }
        Command::ToggleSound => {
            world.economy.sound_enabled = !world.economy.sound_enabled;
            out_events.push(Event::SoundToggled {
                enabled: world.economy.sound_enabled,
            });
        }
        Command::ToggleAutoWave => {
            world.economy.auto_wave_enabled = !world.economy.auto_wave_enabled;
            out_events.push(Event::AutoWaveToggled {
                enabled: world.economy.auto_wave_enabled,
            });
        }
        Command::SetSpeed { multiplier } => {
            let supported = world
                .config
                .motion
                .speed_options
                .iter()
                .any(|option| (option - multiplier).abs() <= f32::EPSILON);
            if supported {
                world.economy.speed_multiplier = multiplier;
                out_events.push(Event::SpeedChanged { multiplier });
            } else {
                out_events.push(Event::SpeedRejected {
                    multiplier,
                    reason: SpeedError::UnsupportedMultiplier,
                });
            }
        }
        Command::Reset => {
            world.reset();
            info!("game reset");
            out_events.push(Event::GameReset);
        }
        Command::SelectTower { tower } => {
            let selected = tower.filter(|id| world.tower_index(*id).is_some());
            world.hints.selected = selected;
            if let Some(id) = selected {
                world.hints.highlight = Some((id, 1.0));
            }
        }
        Command::PreviewPlacement { cell, kind } => {
            world.hints.preview = cell.map(|cell| (cell, kind));
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use fantasy_td_core::{
        AreaTargetIndicator, AttackMode, EconomySnapshot, EffectSnapshot, EnemySnapshot,
        FrameSnapshot, PlacementPreview, ProjectileSnapshot, TowerHighlight, TowerId,
        TowerSnapshot, UiHints,
    };

    use super::{path::tile_center, towers, World};

    /// Captures the player-facing counters.
    #[must_use]
    pub fn economy(world: &World) -> EconomySnapshot {
        let economy = &world.economy;
        let faction = world
            .config
            .faction_for_wave(economy.next_wave)
            .map_or(fantasy_td_core::Faction::Humans, |entry| entry.faction);
        EconomySnapshot {
            gold: economy.gold,
            lives: economy.lives,
            max_lives: economy.max_lives,
            next_wave: economy.next_wave,
            countdown_remaining: economy.countdown_remaining.max(0.0),
            defeated: economy.defeated,
            sound_enabled: economy.sound_enabled,
            auto_wave_enabled: economy.auto_wave_enabled,
            speed_multiplier: economy.speed_multiplier,
            faction,
        }
    }

    /// Captures a single tower, if it exists.
    #[must_use]
    pub fn tower(world: &World, id: TowerId) -> Option<TowerSnapshot> {
        world
            .tower_index(id)
            .map(|index| tower_snapshot(world, &world.towers[index]))
    }

    fn tower_snapshot(world: &World, tower: &towers::Tower) -> TowerSnapshot {
        let next = tower.level + 1;
        TowerSnapshot {
            id: tower.id,
            kind: tower.kind,
            cell: tower.cell,
            level: tower.level,
            cooldown: tower.cooldown.max(0.0),
            stats: towers::effective_stats(&world.config, tower),
            upgrade_cost: (next <= world.config.tower.max_level)
                .then(|| towers::upgrade_cost(&world.config, tower.kind, next)),
            area_target: tower.area_target,
        }
    }

    /// Captures the transient presentation hints.
    #[must_use]
    pub fn hints(world: &World) -> UiHints {
        let highlight = world
            .hints
            .highlight
            .map(|(tower, alpha)| TowerHighlight { tower, alpha });

        let preview = world.hints.preview.map(|(cell, kind)| {
            let bonus = towers::range_bonus(&world.config, &world.path, kind, cell);
            let stats = towers::stats_at_level(&world.config, kind, bonus, 0);
            PlacementPreview {
                kind,
                cell,
                placeable: world.placement_error(cell, kind).is_none(),
                range: stats.range * world.tile_size,
            }
        });

        let area_target = world
            .hints
            .selected
            .and_then(|id| world.tower_index(id))
            .and_then(|index| {
                let tower = &world.towers[index];
                let target = tower.area_target?;
                let AttackMode::Area { splash_radius } = world.config.towers.get(tower.kind).attack
                else {
                    return None;
                };
                let stats = towers::effective_stats(&world.config, tower);
                let position = tile_center(target, world.tile_size);
                let origin = tile_center(tower.cell, world.tile_size);
                Some(AreaTargetIndicator {
                    tower: tower.id,
                    position,
                    radius: splash_radius * world.tile_size,
                    in_range: origin.distance(position) <= stats.range * world.tile_size,
                })
            });

        UiHints {
            highlight,
            preview,
            area_target,
        }
    }

    /// Captures the read-only view handed to rendering each frame.
    #[must_use]
    pub fn frame_snapshot(world: &World) -> FrameSnapshot {
        let enemies = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                faction: enemy.faction,
                hp: enemy.hp,
                max_hp: enemy.max_hp,
                position: enemy.position(),
                velocity: enemy.velocity(),
                size_scale: enemy.size_scale,
                is_boss: enemy.is_boss,
                knockback_immune: enemy.knockback_immune(),
            })
            .collect();

        let projectiles = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                position: projectile.position,
                destination: projectile.destination(&world.enemies),
                tower_kind: projectile.tower_kind,
                splash_radius: projectile.splash_radius,
            })
            .collect();

        let effects = world
            .effects
            .iter()
            .map(|effect| EffectSnapshot {
                position: effect.position,
                radius: effect.radius,
                progress: effect.progress(),
            })
            .collect();

        FrameSnapshot {
            tile_size: world.tile_size,
            grid: world.config.grid,
            path_tiles: world.path.tiles().collect(),
            economy: economy(world),
            towers: world
                .towers
                .iter()
                .map(|tower| tower_snapshot(world, tower))
                .collect(),
            enemies,
            projectiles,
            effects,
            hints: hints(world),
        }
    }
}
