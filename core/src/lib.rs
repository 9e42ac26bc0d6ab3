#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Life Canvas engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values describing what
//! changed. Renderers fold [`Event::CellChanged`] notifications into their own
//! pixels and never mutate the simulation directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Life Canvas.";

/// Describes whether the simulation clock advances generations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum PlayState {
    /// Ticks accumulate time but never trigger a generation step.
    #[default]
    Paused,
    /// Ticks accumulate time and trigger one step per interval.
    Running,
}

impl PlayState {
    /// Returns the opposite play state.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Paused => Self::Running,
            Self::Running => Self::Paused,
        }
    }

    /// Reports whether the state is [`PlayState::Running`].
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Replaces the grid with an all-dead grid of the provided size.
    ConfigureGrid {
        /// Dimensions of the new grid measured in cells.
        size: GridSize,
    },
    /// Updates the fixed interval between automatic generation steps.
    ConfigureStepInterval {
        /// Simulated time that must accumulate before a step is taken.
        step_interval: Duration,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Advances exactly one generation using the incremental stepper,
    /// regardless of the current play state.
    StepGeneration,
    /// Advances exactly one generation by evaluating every cell.
    StepGenerationFull,
    /// Brings the cell at the provided coordinate to life.
    CreateLife {
        /// Cell that should become alive.
        cell: CellCoord,
    },
    /// Kills the cell at the provided coordinate.
    DestroyLife {
        /// Cell that should become dead.
        cell: CellCoord,
    },
    /// Schedules the provided cells and their neighbors for evaluation.
    MarkDirty {
        /// Cells touched by an edit gesture.
        cells: Vec<CellCoord>,
    },
    /// Flips between paused and running.
    TogglePlayState,
    /// Kills every cell and forces the simulation into the paused state.
    ClearAll,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Confirms that the grid was rebuilt with new dimensions.
    GridConfigured {
        /// Dimensions of the rebuilt grid.
        size: GridSize,
    },
    /// Indicates that the simulation clock observed a tick.
    TimeAdvanced {
        /// Duration of time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that a single cell flipped between alive and dead.
    CellChanged {
        /// Cell whose state flipped, along with its new state.
        change: CellChange,
    },
    /// Confirms that a generation step completed.
    GenerationAdvanced {
        /// Generation index reached after the step.
        generation: u64,
        /// Number of cells that flipped during the step.
        changed: usize,
    },
    /// Announces that the simulation entered a new play state.
    PlayStateChanged {
        /// State that became active after processing commands.
        state: PlayState,
    },
    /// Confirms that every cell was killed.
    GridCleared,
    /// Reports that an edit referenced a coordinate outside the grid.
    EditRejected {
        /// Coordinate provided by the edit.
        cell: CellCoord,
        /// Specific reason the edit failed.
        reason: GridError,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
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

    /// Returns the coordinate shifted by the provided offsets, or `None` when
    /// the result would be negative or overflow.
    #[must_use]
    pub fn offset(self, column_delta: i32, row_delta: i32) -> Option<Self> {
        let column = self.column.checked_add_signed(column_delta)?;
        let row = self.row.checked_add_signed(row_delta)?;
        Some(Self::new(column, row))
    }
}

/// Dimensions of the cell grid, fixed for the lifetime of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    columns: u32,
    rows: u32,
}

impl GridSize {
    /// Creates a new size descriptor with explicit dimensions.
    #[must_use]
    pub const fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Derives the grid size that covers a viewport of the provided pixel
    /// dimensions, rounding partial cells up.
    pub fn from_viewport(width: u32, height: u32, cell_size: u32) -> Result<Self, GridError> {
        if cell_size == 0 {
            return Err(GridError::ZeroCellSize);
        }

        Ok(Self {
            columns: width.div_ceil(cell_size),
            rows: height.div_ceil(cell_size),
        })
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of cells in the grid.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        usize::try_from(u64::from(self.columns) * u64::from(self.rows)).unwrap_or(usize::MAX)
    }

    /// Reports whether the coordinate lies inside the grid.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Row-major index of the coordinate, or `None` when it lies outside.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Checks that the coordinate lies inside the grid.
    pub fn check(&self, cell: CellCoord) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfRange { cell, size: *self })
        }
    }

    /// Iterates over every coordinate of the grid in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows)
            .flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Record of one cell flipping state during an edit or generation step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellChange {
    /// Cell whose state flipped.
    pub cell: CellCoord,
    /// State of the cell after the flip.
    pub alive: bool,
}

impl CellChange {
    /// Creates a new change record.
    #[must_use]
    pub const fn new(cell: CellCoord, alive: bool) -> Self {
        Self { cell, alive }
    }
}

/// Reasons a grid operation may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum GridError {
    /// The coordinate lies outside `[0, columns) × [0, rows)`.
    #[error(
        "cell ({}, {}) lies outside the {}x{} grid",
        .cell.column(),
        .cell.row(),
        .size.columns(),
        .size.rows()
    )]
    OutOfRange {
        /// Coordinate that failed validation.
        cell: CellCoord,
        /// Dimensions of the grid it was checked against.
        size: GridSize,
    },
    /// Cell size must be positive to derive grid dimensions from a viewport.
    #[error("cell size must be positive")]
    ZeroCellSize,
}

#[cfg(test)]
mod tests {
    use super::{CellCoord, GridError, GridSize, PlayState};

    #[test]
    fn grid_size_rounds_partial_cells_up() {
        let size = GridSize::from_viewport(1000, 601, 16).expect("positive cell size");
        assert_eq!(size.columns(), 63);
        assert_eq!(size.rows(), 38);
    }

    #[test]
    fn grid_size_exact_multiple_does_not_round() {
        let size = GridSize::from_viewport(320, 160, 16).expect("positive cell size");
        assert_eq!(size, GridSize::new(20, 10));
    }

    #[test]
    fn grid_size_rejects_zero_cell_size() {
        assert_eq!(
            GridSize::from_viewport(320, 160, 0),
            Err(GridError::ZeroCellSize)
        );
    }

    #[test]
    fn index_is_row_major_and_bounded() {
        let size = GridSize::new(4, 3);
        assert_eq!(size.index(CellCoord::new(0, 0)), Some(0));
        assert_eq!(size.index(CellCoord::new(3, 0)), Some(3));
        assert_eq!(size.index(CellCoord::new(1, 2)), Some(9));
        assert_eq!(size.index(CellCoord::new(4, 0)), None);
        assert_eq!(size.index(CellCoord::new(0, 3)), None);
    }

    #[test]
    fn out_of_range_error_names_cell_and_grid() {
        let size = GridSize::new(5, 5);
        let error = size.check(CellCoord::new(7, 1)).expect_err("outside grid");
        assert_eq!(error.to_string(), "cell (7, 1) lies outside the 5x5 grid");
    }

    #[test]
    fn offset_refuses_negative_coordinates() {
        let origin = CellCoord::new(0, 2);
        assert_eq!(origin.offset(-1, 0), None);
        assert_eq!(origin.offset(1, -1), Some(CellCoord::new(1, 1)));
    }

    #[test]
    fn cells_iterates_every_coordinate_once() {
        let size = GridSize::new(3, 2);
        let cells: Vec<_> = size.cells().collect();
        assert_eq!(cells.len(), size.cell_count());
        assert_eq!(cells.first(), Some(&CellCoord::new(0, 0)));
        assert_eq!(cells.last(), Some(&CellCoord::new(2, 1)));
    }

    #[test]
    fn play_state_toggles_between_variants() {
        assert_eq!(PlayState::default(), PlayState::Paused);
        assert_eq!(PlayState::Paused.toggled(), PlayState::Running);
        assert!(PlayState::Paused.toggled().is_running());
        assert_eq!(PlayState::Running.toggled(), PlayState::Paused);
    }
}
