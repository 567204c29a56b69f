//! Tower layouts passed on the command line.
//!
//! A layout entry reads `kind@col,row`, optionally followed by `:col,row` to
//! aim an area-attack tower, e.g. `catapult@6,1:6,2`.

use std::str::FromStr;

use fantasy_td_core::{CellCoord, TowerKind};
use thiserror::Error;

const KIND_DELIMITER: char = '@';
const TARGET_DELIMITER: char = ':';

/// Tower the player wants built before the first tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TowerPlan {
    /// Kind of tower to build.
    pub(crate) kind: TowerKind,
    /// Tile that hosts the tower.
    pub(crate) cell: CellCoord,
    /// Ground cell bombarded by area-attack towers.
    pub(crate) target: Option<CellCoord>,
}

/// Errors that can occur while parsing a layout entry.
#[derive(Debug, Error, PartialEq)]
pub(crate) enum LayoutError {
    /// The entry did not contain the `@` separator.
    #[error("layout entry '{0}' must look like kind@col,row")]
    MissingCell(String),
    /// The kind identifier is not a known tower.
    #[error("unknown tower kind '{0}'")]
    UnknownKind(String),
    /// A coordinate pair could not be parsed.
    #[error("could not parse cell '{0}'")]
    InvalidCell(String),
}

impl FromStr for TowerPlan {
    type Err = LayoutError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        let (kind, rest) = trimmed
            .split_once(KIND_DELIMITER)
            .ok_or_else(|| LayoutError::MissingCell(trimmed.to_owned()))?;
        let kind = TowerKind::from_id(&kind.trim().to_ascii_lowercase())
            .ok_or_else(|| LayoutError::UnknownKind(kind.trim().to_owned()))?;

        let (cell, target) = match rest.split_once(TARGET_DELIMITER) {
            Some((cell, target)) => (parse_cell(cell)?, Some(parse_cell(target)?)),
            None => (parse_cell(rest)?, None),
        };

        Ok(Self { kind, cell, target })
    }
}

fn parse_cell(value: &str) -> Result<CellCoord, LayoutError> {
    let invalid = || LayoutError::InvalidCell(value.to_owned());
    let (column, row) = value.split_once(',').ok_or_else(invalid)?;
    let column = column.trim().parse::<u32>().map_err(|_| invalid())?;
    let row = row.trim().parse::<u32>().map_err(|_| invalid())?;
    Ok(CellCoord::new(column, row))
}
