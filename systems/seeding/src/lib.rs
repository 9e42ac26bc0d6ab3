#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure seeding system that prepares the initial Life Canvas board.
//!
//! Seeding never touches the world directly. It emits one
//! [`Command::CreateLife`] per distinct cell, and the world schedules each
//! edited neighborhood for evaluation as it applies them.

use std::collections::HashSet;

use life_canvas_core::{CellCoord, Command, GridSize};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Well-known starting patterns that can be stamped onto the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    /// 2x2 still life.
    Block,
    /// Period-2 oscillator, horizontal phase.
    Blinker,
    /// Smallest spaceship, travelling towards increasing column and row.
    Glider,
    /// Period-2 oscillator.
    Toad,
    /// Period-2 oscillator built from two diagonal blocks.
    Beacon,
    /// Methuselah that stabilises after 1103 generations on an open board.
    RPentomino,
}

impl Pattern {
    /// Every pattern in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Block,
        Self::Blinker,
        Self::Glider,
        Self::Toad,
        Self::Beacon,
        Self::RPentomino,
    ];

    /// Live cells of the pattern as `(column, row)` offsets from its origin.
    #[must_use]
    pub const fn offsets(self) -> &'static [(u32, u32)] {
        match self {
            Self::Block => &[(0, 0), (1, 0), (0, 1), (1, 1)],
            Self::Blinker => &[(0, 0), (1, 0), (2, 0)],
            Self::Glider => &[(1, 0), (2, 1), (0, 2), (1, 2), (2, 2)],
            Self::Toad => &[(1, 0), (2, 0), (3, 0), (0, 1), (1, 1), (2, 1)],
            Self::Beacon => &[(0, 0), (1, 0), (0, 1), (3, 2), (2, 3), (3, 3)],
            Self::RPentomino => &[(1, 0), (2, 0), (0, 1), (1, 1), (1, 2)],
        }
    }

    /// Absolute coordinates of the pattern placed at `origin`. Cells whose
    /// coordinates would overflow are dropped; grid clipping is left to the
    /// caller.
    pub fn cells_at(self, origin: CellCoord) -> impl Iterator<Item = CellCoord> {
        self.offsets().iter().filter_map(move |&(column, row)| {
            Some(CellCoord::new(
                origin.column().checked_add(column)?,
                origin.row().checked_add(row)?,
            ))
        })
    }
}

/// A pattern stamped at a specific origin cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct PatternPlacement {
    /// Pattern to stamp.
    pub pattern: Pattern,
    /// Column of the pattern's top-left corner.
    pub column: u32,
    /// Row of the pattern's top-left corner.
    pub row: u32,
}

impl PatternPlacement {
    /// Creates a new placement descriptor.
    #[must_use]
    pub const fn new(pattern: Pattern, column: u32, row: u32) -> Self {
        Self {
            pattern,
            column,
            row,
        }
    }

    /// Origin cell of the placement.
    #[must_use]
    pub const fn origin(&self) -> CellCoord {
        CellCoord::new(self.column, self.row)
    }
}

/// Description of the initial board contents.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct SeedPlan {
    /// Probability in `[0, 1]` that any given cell starts alive.
    pub soup_density: f64,
    /// Seed of the random number generator used for the soup.
    pub rng_seed: u64,
    /// Individual cells that start alive.
    pub cells: Vec<CellCoord>,
    /// Patterns stamped onto the board.
    pub patterns: Vec<PatternPlacement>,
}

/// Reasons a seed plan may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum SeedError {
    /// Soup density outside `[0, 1]`, or not a number.
    #[error("soup density {0} must lie within [0, 1]")]
    InvalidDensity(f64),
}

/// Seeding system that translates a [`SeedPlan`] into edit commands.
#[derive(Debug, Clone, Default)]
pub struct Seeding {
    plan: SeedPlan,
}

impl Seeding {
    /// Creates a seeding system for the provided plan.
    pub fn new(plan: SeedPlan) -> Result<Self, SeedError> {
        if !(0.0..=1.0).contains(&plan.soup_density) {
            return Err(SeedError::InvalidDensity(plan.soup_density));
        }
        Ok(Self { plan })
    }

    /// Plan the system was created with.
    #[must_use]
    pub fn plan(&self) -> &SeedPlan {
        &self.plan
    }

    /// Emits one `CreateLife` command per distinct live cell of the plan for
    /// a grid of the provided size, returning how many were emitted.
    ///
    /// The soup is drawn first in row-major order, followed by explicit
    /// cells and then patterns. The same plan and size always produce the
    /// same commands.
    pub fn seed(&self, size: GridSize, out: &mut Vec<Command>) -> usize {
        let mut seen = HashSet::new();
        let start = out.len();

        if self.plan.soup_density > 0.0 {
            let mut rng = ChaCha8Rng::seed_from_u64(self.plan.rng_seed);
            for cell in size.cells() {
                if rng.gen_bool(self.plan.soup_density) && seen.insert(cell) {
                    out.push(Command::CreateLife { cell });
                }
            }
        }

        for &cell in &self.plan.cells {
            if !size.contains(cell) {
                warn!(
                    column = cell.column(),
                    row = cell.row(),
                    "seed cell lies outside the grid; skipped"
                );
                continue;
            }
            if seen.insert(cell) {
                out.push(Command::CreateLife { cell });
            }
        }

        for placement in &self.plan.patterns {
            for cell in placement.pattern.cells_at(placement.origin()) {
                if size.contains(cell) && seen.insert(cell) {
                    out.push(Command::CreateLife { cell });
                }
            }
        }

        let emitted = out.len() - start;
        debug!(
            emitted,
            density = self.plan.soup_density,
            patterns = self.plan.patterns.len(),
            "board seeded"
        );
        emitted
    }
}
