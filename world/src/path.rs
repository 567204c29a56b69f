//! Waypoint path geometry and grid/world coordinate transforms.

use std::collections::BTreeSet;

use fantasy_td_core::CellCoord;
use glam::Vec2;

/// Enumerates every tile crossed by the polyline through `waypoints`.
///
/// Consecutive waypoints are joined by unit steps along each axis that still
/// differs, so straight and diagonal segments visit exactly the tiles between
/// their endpoints.
#[must_use]
pub fn build_path_tiles(waypoints: &[CellCoord]) -> BTreeSet<CellCoord> {
    let mut tiles = BTreeSet::new();
    if let [single] = waypoints {
        let _ = tiles.insert(*single);
    }

    for pair in waypoints.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        let mut column = i64::from(start.column());
        let mut row = i64::from(start.row());
        let end_column = i64::from(end.column());
        let end_row = i64::from(end.row());
        let _ = tiles.insert(start);

        while column != end_column || row != end_row {
            column += (end_column - column).signum();
            row += (end_row - row).signum();
            if let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) {
                let _ = tiles.insert(CellCoord::new(column, row));
            }
        }
    }

    tiles
}

/// World-space centre of the provided tile.
#[must_use]
pub fn tile_center(cell: CellCoord, tile_size: f32) -> Vec2 {
    Vec2::new(
        cell.column() as f32 * tile_size + tile_size * 0.5,
        cell.row() as f32 * tile_size + tile_size * 0.5,
    )
}

/// Tile containing the provided world-space point.
///
/// Returns `None` for negative or non-finite coordinates and for a
/// non-positive tile size. Grid bounds are not checked.
#[must_use]
pub fn screen_to_grid(point: Vec2, tile_size: f32) -> Option<CellCoord> {
    if !(tile_size.is_finite() && tile_size > 0.0) || !point.is_finite() {
        return None;
    }
    if point.x < 0.0 || point.y < 0.0 {
        return None;
    }
    let column = (point.x / tile_size).floor();
    let row = (point.y / tile_size).floor();
    if column > u32::MAX as f32 || row > u32::MAX as f32 {
        return None;
    }
    Some(CellCoord::new(column as u32, row as u32))
}

/// Immutable path description shared by every enemy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathGeometry {
    waypoints: Vec<CellCoord>,
    tiles: BTreeSet<CellCoord>,
}

impl PathGeometry {
    /// Builds the geometry for the provided waypoints.
    #[must_use]
    pub fn new(waypoints: Vec<CellCoord>) -> Self {
        let tiles = build_path_tiles(&waypoints);
        Self { waypoints, tiles }
    }

    /// Number of waypoints along the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Waypoints in walking order.
    #[must_use]
    pub fn waypoints(&self) -> &[CellCoord] {
        &self.waypoints
    }

    /// World-space centre of the waypoint at `index`.
    #[must_use]
    pub fn waypoint(&self, index: usize, tile_size: f32) -> Option<Vec2> {
        self.waypoints
            .get(index)
            .map(|cell| tile_center(*cell, tile_size))
    }

    /// Reports whether the tile belongs to the path.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.tiles.contains(&cell)
    }

    /// Tiles crossed by the path, sorted by column then row.
    pub fn tiles(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.tiles.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(points: &[(u32, u32)]) -> Vec<CellCoord> {
        points
            .iter()
            .map(|(column, row)| CellCoord::new(*column, *row))
            .collect()
    }

    #[test]
    fn default_path_covers_every_crossed_tile() {
        let waypoints = cells(&[(0, 4), (4, 4), (4, 2), (9, 2), (9, 6), (14, 6), (15, 7)]);
        let tiles = build_path_tiles(&waypoints);

        assert_eq!(tiles.len(), 22);
        for cell in cells(&[(2, 4), (4, 3), (7, 2), (9, 5), (12, 6), (15, 7)]) {
            assert!(tiles.contains(&cell), "missing {cell:?}");
        }
        assert!(!tiles.contains(&CellCoord::new(14, 7)));
        assert!(!tiles.contains(&CellCoord::new(5, 4)));
    }

    #[test]
    fn diagonal_segments_step_both_axes() {
        let tiles = build_path_tiles(&cells(&[(1, 1), (4, 4)]));
        assert_eq!(tiles.into_iter().collect::<Vec<_>>(), cells(&[(1, 1), (2, 2), (3, 3), (4, 4)]));
    }

    #[test]
    fn building_is_deterministic() {
        let waypoints = cells(&[(3, 0), (3, 5), (0, 5)]);
        assert_eq!(build_path_tiles(&waypoints), build_path_tiles(&waypoints));
    }

    #[test]
    fn tile_center_and_screen_to_grid_round_trip() {
        let cell = CellCoord::new(7, 3);
        let center = tile_center(cell, 40.0);
        assert_eq!(center, Vec2::new(300.0, 140.0));
        assert_eq!(screen_to_grid(center, 40.0), Some(cell));
        assert_eq!(screen_to_grid(Vec2::new(319.9, 120.0), 40.0), Some(cell));
    }

    #[test]
    fn screen_to_grid_rejects_invalid_input() {
        assert_eq!(screen_to_grid(Vec2::new(-1.0, 5.0), 40.0), None);
        assert_eq!(screen_to_grid(Vec2::new(5.0, 5.0), 0.0), None);
        assert_eq!(screen_to_grid(Vec2::new(f32::NAN, 5.0), 40.0), None);
    }

    #[test]
    fn geometry_exposes_waypoint_centres() {
        let geometry = PathGeometry::new(cells(&[(0, 1), (3, 1)]));
        assert_eq!(geometry.len(), 2);
        assert_eq!(geometry.waypoint(1, 10.0), Some(Vec2::new(35.0, 15.0)));
        assert_eq!(geometry.waypoint(2, 10.0), None);
        assert!(geometry.contains(CellCoord::new(2, 1)));
        assert!(!geometry.contains(CellCoord::new(2, 2)));
    }
}
