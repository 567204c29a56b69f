//! Tower state together with level scaling and pricing rules.

use fantasy_td_core::{
    AttackMode, CellCoord, GameConfig, LevelMultipliers, TowerId, TowerKind, TowerStats,
};

use crate::{path::PathGeometry, terrain};

const IDENTITY: LevelMultipliers = LevelMultipliers::new(1.0, 1.0, 1.0, 1.0);

/// Tower stored inside the world.
#[derive(Clone, Debug, PartialEq)]
pub struct Tower {
    /// Identifier allocated by the world for the tower.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Tile hosting the tower.
    pub cell: CellCoord,
    /// Current level, between zero and the configured maximum.
    pub level: u32,
    /// Seconds until the tower may fire again; negative once idle.
    pub cooldown: f32,
    /// Terrain range bonus in tiles.
    pub range_bonus: f32,
    /// Ground tile assigned to area-attack towers.
    pub area_target: Option<CellCoord>,
    /// Gold spent on construction and upgrades.
    pub invested: u32,
}

impl Tower {
    /// Creates a freshly built level-zero tower.
    #[must_use]
    pub fn new(
        config: &GameConfig,
        path: &PathGeometry,
        id: TowerId,
        kind: TowerKind,
        cell: CellCoord,
    ) -> Self {
        Self {
            id,
            kind,
            cell,
            level: 0,
            cooldown: 0.0,
            range_bonus: range_bonus(config, path, kind, cell),
            area_target: None,
            invested: config.towers.get(kind).cost,
        }
    }

    /// Whether the tower bombards a ground target.
    #[must_use]
    pub fn is_area_attack(&self, config: &GameConfig) -> bool {
        matches!(config.towers.get(self.kind).attack, AttackMode::Area { .. })
    }
}

/// Effective statistics of the tower at its current level.
#[must_use]
pub fn effective_stats(config: &GameConfig, tower: &Tower) -> TowerStats {
    stats_at_level(config, tower.kind, tower.range_bonus, tower.level)
}

/// Statistics of a tower kind at `level`, clamped to the configured range.
///
/// The terrain bonus is added to the base range before scaling.
#[must_use]
pub fn stats_at_level(
    config: &GameConfig,
    kind: TowerKind,
    range_bonus: f32,
    level: u32,
) -> TowerStats {
    let level = clamp_level(config, level);
    let base = config.towers.get(kind);
    let scale = config
        .tower
        .level_multipliers
        .get(level as usize)
        .or_else(|| config.tower.level_multipliers.first())
        .copied()
        .unwrap_or(IDENTITY);
    TowerStats {
        level,
        range: (base.range + range_bonus) * scale.range,
        rate: base.rate * scale.rate,
        damage: base.damage * scale.damage,
        knockback: base.knockback * scale.knockback,
    }
}

/// Clamps a level to `0..=max_level`.
#[must_use]
pub fn clamp_level(config: &GameConfig, level: u32) -> u32 {
    level.min(config.tower.max_level)
}

/// Gold required to raise a tower of `kind` to `next_level`.
///
/// Level zero and levels past the maximum cost nothing.
#[must_use]
pub fn upgrade_cost(config: &GameConfig, kind: TowerKind, next_level: u32) -> u32 {
    if next_level == 0 || next_level > config.tower.max_level {
        return 0;
    }
    let multiplier = config
        .tower
        .cost_multipliers
        .get(next_level as usize)
        .copied()
        .unwrap_or(0.0);
    (config.towers.get(kind).cost as f32 * multiplier).ceil() as u32
}

/// Total gold spent on a tower of `kind` that reached `level`.
#[must_use]
pub fn invested_through(config: &GameConfig, kind: TowerKind, level: u32) -> u32 {
    let build = config.towers.get(kind).cost;
    (1..=clamp_level(config, level))
        .map(|next| upgrade_cost(config, kind, next))
        .fold(build, u32::saturating_add)
}

/// Gold refunded when a tower with the provided investment is sold.
#[must_use]
pub fn sell_refund(config: &GameConfig, invested: u32) -> u32 {
    let ratio = config.economy.sell_refund_ratio.clamp(0.0, 1.0);
    (invested as f32 * ratio).floor() as u32
}

/// Terrain range bonus granted to a tower of `kind` standing on `cell`.
#[must_use]
pub fn range_bonus(config: &GameConfig, path: &PathGeometry, kind: TowerKind, cell: CellCoord) -> f32 {
    if config.towers.get(kind).ranged && terrain::is_tree(cell, path) {
        config.tower.tree_range_bonus
    } else {
        0.0
    }
}
