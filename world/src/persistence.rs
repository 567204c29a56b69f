//! Versionless JSON save contract.
//!
//! Only the economy counters, preferences and towers survive a save. Loading
//! is forgiving: unknown tower kinds, towers on invalid tiles and duplicate
//! tiles are dropped, levels are clamped and missing fields fall back to the
//! configured defaults.

use std::collections::BTreeSet;

use fantasy_td_core::{CellCoord, TowerKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    towers::{self, Tower},
    World,
};

/// Persisted game state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    /// Gold available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<u32>,
    /// Remaining lives.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lives: Option<u32>,
    /// Number of the wave that starts next.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wave: Option<u32>,
    /// Sound preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound_enabled: Option<bool>,
    /// Auto-wave preference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_wave_enabled: Option<bool>,
    /// Built towers.
    pub towers: Vec<SavedTower>,
}

/// Persisted tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedTower {
    /// Column of the hosting tile.
    pub col: i64,
    /// Row of the hosting tile.
    pub row: i64,
    /// Stable tower kind identifier.
    pub type_id: String,
    /// Upgrade level.
    #[serde(default)]
    pub level: i64,
    /// Column of the area target, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_col: Option<i64>,
    /// Row of the area target, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_row: Option<i64>,
}

/// Captures the persistable part of the world.
#[must_use]
pub fn capture(world: &World) -> SaveData {
    let economy = &world.economy;
    SaveData {
        gold: Some(economy.gold),
        lives: Some(economy.lives),
        wave: Some(economy.next_wave),
        sound_enabled: Some(economy.sound_enabled),
        auto_wave_enabled: Some(economy.auto_wave_enabled),
        towers: world
            .towers
            .iter()
            .map(|tower| SavedTower {
                col: i64::from(tower.cell.column()),
                row: i64::from(tower.cell.row()),
                type_id: tower.kind.id().to_owned(),
                level: i64::from(tower.level),
                target_col: tower.area_target.map(|cell| i64::from(cell.column())),
                target_row: tower.area_target.map(|cell| i64::from(cell.row())),
            })
            .collect(),
    }
}

/// Serializes the persistable part of the world to JSON.
pub fn to_json(world: &World) -> Result<String, serde_json::Error> {
    serde_json::to_string(&capture(world))
}

/// Parses a save, treating corrupt input as "no save".
#[must_use]
pub fn parse(text: &str) -> Option<SaveData> {
    match serde_json::from_str(text) {
        Ok(data) => Some(data),
        Err(error) => {
            warn!(%error, "discarding unreadable save");
            None
        }
    }
}

/// Replaces the world state with the provided save.
///
/// Transient state is reset first, so the restored game resumes between
/// waves with full tower cooldowns available.
pub fn restore(world: &mut World, data: &SaveData) {
    world.reset();
    let config = &world.config;
    let economy = &mut world.economy;

    if let Some(gold) = data.gold {
        economy.gold = gold;
    }
    if let Some(lives) = data.lives {
        economy.lives = lives.min(economy.max_lives);
        economy.defeated = economy.lives == 0;
    }
    if let Some(wave) = data.wave {
        economy.next_wave = wave.max(1);
    }
    if let Some(enabled) = data.sound_enabled {
        economy.sound_enabled = enabled;
    }
    if let Some(enabled) = data.auto_wave_enabled {
        economy.auto_wave_enabled = enabled;
    }

    let mut occupied = BTreeSet::new();
    let mut dropped = 0_usize;
    for saved in &data.towers {
        let Some(kind) = TowerKind::from_id(&saved.type_id) else {
            dropped += 1;
            continue;
        };
        let Some(cell) = cell_from(saved.col, saved.row) else {
            dropped += 1;
            continue;
        };
        if !config.grid.contains(cell) || world.path.contains(cell) || !occupied.insert(cell) {
            dropped += 1;
            continue;
        }

        let id = world.ids.tower();
        let mut tower = Tower::new(config, &world.path, id, kind, cell);
        let level = u32::try_from(saved.level.max(0)).unwrap_or(u32::MAX);
        tower.level = towers::clamp_level(config, level);
        tower.invested = towers::invested_through(config, kind, tower.level);
        if tower.is_area_attack(config) {
            tower.area_target = saved
                .target_col
                .zip(saved.target_row)
                .and_then(|(column, row)| cell_from(column, row))
                .filter(|target| config.grid.contains(*target));
        }
        world.towers.push(tower);
    }

    debug!(
        towers = world.towers.len(),
        dropped, "restored saved game"
    );
}

fn cell_from(column: i64, row: i64) -> Option<CellCoord> {
    Some(CellCoord::new(
        u32::try_from(column).ok()?,
        u32::try_from(row).ok()?,
    ))
}
