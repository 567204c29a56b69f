//! Deterministic decorative terrain and the range bonus it grants.

use fantasy_td_core::CellCoord;

use crate::path::PathGeometry;

/// Decoration rolled for a non-path tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainFeature {
    /// Bare ground.
    None,
    /// A tree, granting ranged towers extra reach.
    Tree {
        /// Sprite variant in the range 0..4.
        variant: u8,
    },
    /// A tree stump.
    Stump,
    /// A rock.
    Rock {
        /// Sprite variant in the range 0..4.
        variant: u8,
    },
    /// A patch of flowers.
    Flower,
}

/// Feature rolled for the provided tile; path tiles are always bare.
#[must_use]
pub fn feature_at(cell: CellCoord, path: &PathGeometry) -> TerrainFeature {
    if path.contains(cell) {
        return TerrainFeature::None;
    }
    let roll = hash(cell, 2) % 100;
    match roll {
        0..=7 => TerrainFeature::Tree {
            variant: (hash(cell, 8) % 4) as u8,
        },
        8..=13 => TerrainFeature::Stump,
        14..=21 => TerrainFeature::Rock {
            variant: (hash(cell, 9) % 4) as u8,
        },
        22..=31 => TerrainFeature::Flower,
        _ => TerrainFeature::None,
    }
}

/// Reports whether the tile hosts a tree.
#[must_use]
pub fn is_tree(cell: CellCoord, path: &PathGeometry) -> bool {
    matches!(feature_at(cell, path), TerrainFeature::Tree { .. })
}

// xorshift over 32-bit wrapping integers
fn hash(cell: CellCoord, salt: i64) -> u32 {
    let seed = (i64::from(cell.column()) + 37) * 928_371
        + (i64::from(cell.row()) + 17) * 523_987
        + salt * 9_349;
    let mut value = seed as i32;
    value ^= value.wrapping_shl(13);
    value ^= value >> 17;
    value ^= value.wrapping_shl(5);
    value.unsigned_abs()
}
