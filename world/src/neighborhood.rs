//! Stateless Moore-neighborhood helpers and the B3/S23 rule.

use life_canvas_core::{CellCoord, GridSize};

use crate::grid::Grid;

/// Offsets of the eight cells surrounding a center cell.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Coordinates of the up to eight cells adjacent to `cell`, clipped to the
/// grid. The grid does not wrap, so edge cells have five neighbors and
/// corner cells three.
pub fn neighbor_coordinates(cell: CellCoord, size: GridSize) -> impl Iterator<Item = CellCoord> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter_map(move |(column_delta, row_delta)| cell.offset(column_delta, row_delta))
        .filter(move |neighbor| size.contains(*neighbor))
}

/// Number of live cells among the eight offsets around `cell`, treating
/// coordinates outside the grid as dead.
#[must_use]
pub fn live_neighbor_count(grid: &Grid, cell: CellCoord) -> u8 {
    let column = i64::from(cell.column());
    let row = i64::from(cell.row());
    let mut count = 0;
    for (column_delta, row_delta) in NEIGHBOR_OFFSETS {
        if grid.probe(column + i64::from(column_delta), row + i64::from(row_delta)) {
            count += 1;
        }
    }
    count
}

/// Applies Conway's B3/S23 rule: live cells survive with two or three live
/// neighbors, dead cells are born with exactly three.
#[must_use]
pub const fn next_state(alive: bool, live_neighbors: u8) -> bool {
    matches!((alive, live_neighbors), (true, 2) | (_, 3))
}
