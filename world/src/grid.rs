//! Dense binary cell storage.

use life_canvas_core::{CellCoord, GridError, GridSize};

/// Fixed-size matrix of alive/dead cells stored in row-major order.
///
/// The grid is pure data: it never renders and never tracks which cells need
/// evaluation. Reads and writes outside `[0, columns) × [0, rows)` fail with
/// [`GridError::OutOfRange`]; only [`Grid::probe`] treats out-of-range
/// coordinates as dead, which is what neighbor counting relies on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: GridSize,
    cells: Vec<bool>,
}

impl Grid {
    /// Creates a grid of the provided size with every cell dead.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            cells: vec![false; size.cell_count()],
        }
    }

    /// Creates a grid covering a viewport of the provided pixel dimensions.
    pub fn from_viewport(width: u32, height: u32, cell_size: u32) -> Result<Self, GridError> {
        GridSize::from_viewport(width, height, cell_size).map(Self::new)
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.columns()
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.rows()
    }

    /// Reports whether the cell is alive.
    pub fn is_alive(&self, cell: CellCoord) -> Result<bool, GridError> {
        let index = self.checked_index(cell)?;
        Ok(self.cells[index])
    }

    /// Sets the cell to the provided state, returning its previous state.
    pub fn set_alive(&mut self, cell: CellCoord, alive: bool) -> Result<bool, GridError> {
        let index = self.checked_index(cell)?;
        Ok(std::mem::replace(&mut self.cells[index], alive))
    }

    /// Reads the cell at signed coordinates, reporting dead for anything
    /// outside the grid.
    #[must_use]
    pub fn probe(&self, column: i64, row: i64) -> bool {
        let (Ok(column), Ok(row)) = (u32::try_from(column), u32::try_from(row)) else {
            return false;
        };
        self.size
            .index(CellCoord::new(column, row))
            .is_some_and(|index| self.cells[index])
    }

    /// Number of live cells adjacent to `cell`; see
    /// [`crate::neighborhood::live_neighbor_count`].
    pub fn live_neighbor_count(&self, cell: CellCoord) -> Result<u8, GridError> {
        self.size.check(cell)?;
        Ok(crate::neighborhood::live_neighbor_count(self, cell))
    }

    /// Kills every cell.
    pub fn clear_all(&mut self) {
        self.cells.fill(false);
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|alive| **alive).count()
    }

    /// Iterates over the coordinates of every live cell in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.size
            .cells()
            .zip(self.cells.iter())
            .filter_map(|(cell, alive)| alive.then_some(cell))
    }

    fn checked_index(&self, cell: CellCoord) -> Result<usize, GridError> {
        self.size
            .index(cell)
            .ok_or(GridError::OutOfRange {
                cell,
                size: self.size,
            })
    }
}
