//! Incremental stepping driven by the set of cells that might change.
//!
//! A naive generation evaluates all `columns × rows` cells. The tracker
//! instead keeps a [`DirtySet`] of coordinates whose state could differ in
//! the next generation and evaluates only those. The set for generation N+1
//! is built while stepping generation N: every cell that flipped contributes
//! itself and its neighbors (their live counts changed), and every cell that
//! is alive contributes itself and its neighbors (a live cell can still die
//! from a later change around it). Dead cells that stay dead with no
//! flipping neighbor are the only ones dropped. Edits feed the same
//! "cell plus neighbors" expansion through [`DirtyTracker::mark_dirty`].

use life_canvas_core::{CellChange, CellCoord, GridError, GridSize};

use crate::{
    grid::Grid,
    neighborhood::{live_neighbor_count, neighbor_coordinates, next_state},
};

/// Deduplicated set of grid coordinates awaiting evaluation.
///
/// Membership is a dense bitmap sized to the grid, so insertion and lookup
/// are constant time, and the coordinates are also kept in insertion order
/// so iteration and clearing cost O(len) instead of O(grid).
#[derive(Clone, Debug)]
pub struct DirtySet {
    size: GridSize,
    members: Vec<bool>,
    cells: Vec<CellCoord>,
}

impl DirtySet {
    /// Creates an empty set for a grid of the provided size.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            size,
            members: vec![false; size.cell_count()],
            cells: Vec::new(),
        }
    }

    /// Dimensions of the grid the set belongs to.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Inserts the coordinate, returning `false` when it was already present.
    pub fn insert(&mut self, cell: CellCoord) -> Result<bool, GridError> {
        let index = self.size.index(cell).ok_or(GridError::OutOfRange {
            cell,
            size: self.size,
        })?;
        if std::mem::replace(&mut self.members[index], true) {
            return Ok(false);
        }
        self.cells.push(cell);
        Ok(true)
    }

    /// Inserts the coordinate together with its clipped neighbors.
    pub fn insert_neighborhood(&mut self, cell: CellCoord) -> Result<(), GridError> {
        let _ = self.insert(cell)?;
        for neighbor in neighbor_coordinates(cell, self.size) {
            let _ = self.insert(neighbor)?;
        }
        Ok(())
    }

    /// Reports whether the coordinate is a member.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.size
            .index(cell)
            .is_some_and(|index| self.members[index])
    }

    /// Number of coordinates in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether the set has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterates over the members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells.iter().copied()
    }

    /// Removes every member while keeping the allocated storage.
    pub fn clear(&mut self) {
        for cell in self.cells.drain(..) {
            if let Some(index) = self.size.index(cell) {
                self.members[index] = false;
            }
        }
    }
}

/// Decision taken for a single dirty coordinate during the read phase.
#[derive(Clone, Copy, Debug)]
struct Decision {
    cell: CellCoord,
    alive_now: bool,
    alive_next: bool,
}

/// Owner of the pending dirty set and the incremental step algorithm.
#[derive(Clone, Debug)]
pub struct DirtyTracker {
    pending: DirtySet,
    spare: DirtySet,
    decisions: Vec<Decision>,
}

impl DirtyTracker {
    /// Creates a tracker with nothing pending for a grid of the provided size.
    #[must_use]
    pub fn new(size: GridSize) -> Self {
        Self {
            pending: DirtySet::new(size),
            spare: DirtySet::new(size),
            decisions: Vec::new(),
        }
    }

    /// Read-only view of the coordinates scheduled for the next generation.
    #[must_use]
    pub fn pending(&self) -> &DirtySet {
        &self.pending
    }

    /// Drops every pending coordinate and resizes the tracker for a new grid.
    pub fn reset(&mut self, size: GridSize) {
        if self.pending.size() == size {
            self.pending.clear();
            self.spare.clear();
        } else {
            self.pending = DirtySet::new(size);
            self.spare = DirtySet::new(size);
        }
        self.decisions.clear();
    }

    /// Schedules the cell and its neighbors for evaluation next generation.
    pub fn mark_dirty(&mut self, cell: CellCoord) -> Result<(), GridError> {
        self.pending.insert_neighborhood(cell)
    }

    /// Schedules every provided cell and its neighbors. Stops at the first
    /// coordinate outside the grid.
    pub fn mark_dirty_batch<I>(&mut self, cells: I) -> Result<(), GridError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        for cell in cells {
            self.mark_dirty(cell)?;
        }
        Ok(())
    }

    /// Rebuilds the pending set from every live cell of the grid and its
    /// neighbors, discarding anything previously scheduled.
    pub fn reseed(&mut self, grid: &Grid) {
        self.reset(grid.size());
        for cell in grid.live_cells() {
            self.insert_pending(cell);
        }
    }

    /// Advances the grid by one generation, evaluating only the pending
    /// coordinates, and returns the cells that flipped.
    ///
    /// Every decision is computed against the grid as it was at the start of
    /// the call; the grid is only written once all decisions exist.
    pub fn advance_generation(&mut self, grid: &mut Grid) -> Vec<CellChange> {
        self.align_with(grid.size());
        self.spare.clear();
        self.decisions.clear();

        let snapshot: &Grid = grid;
        for cell in self.pending.iter() {
            let alive_now = snapshot.probe(i64::from(cell.column()), i64::from(cell.row()));
            let alive_next = next_state(alive_now, live_neighbor_count(snapshot, cell));
            if alive_now || alive_next {
                self.decisions.push(Decision {
                    cell,
                    alive_now,
                    alive_next,
                });
            }
        }

        for decision in &self.decisions {
            expand(&mut self.spare, decision.cell);
        }
        std::mem::swap(&mut self.pending, &mut self.spare);

        apply_decisions(grid, &self.decisions)
    }

    /// Advances the grid by one generation by evaluating every cell, and
    /// rebuilds the pending set so incremental stepping can resume.
    pub fn advance_generation_full(&mut self, grid: &mut Grid) -> Vec<CellChange> {
        self.align_with(grid.size());
        self.pending.clear();
        self.decisions.clear();

        let snapshot: &Grid = grid;
        for cell in snapshot.size().cells() {
            let alive_now = snapshot.probe(i64::from(cell.column()), i64::from(cell.row()));
            let alive_next = next_state(alive_now, live_neighbor_count(snapshot, cell));
            if alive_now || alive_next {
                self.decisions.push(Decision {
                    cell,
                    alive_now,
                    alive_next,
                });
            }
        }

        for decision in &self.decisions {
            expand(&mut self.pending, decision.cell);
        }

        apply_decisions(grid, &self.decisions)
    }

    fn insert_pending(&mut self, cell: CellCoord) {
        expand(&mut self.pending, cell);
    }

    fn align_with(&mut self, size: GridSize) {
        if self.pending.size() != size {
            tracing::warn!(
                columns = size.columns(),
                rows = size.rows(),
                "dirty tracker resized to match grid; pending cells discarded"
            );
            self.reset(size);
        }
    }
}

fn expand(set: &mut DirtySet, cell: CellCoord) {
    let inserted = set.insert_neighborhood(cell);
    debug_assert!(inserted.is_ok(), "{cell:?} lies outside the tracked grid");
}

fn apply_decisions(grid: &mut Grid, decisions: &[Decision]) -> Vec<CellChange> {
    let mut changes = Vec::new();
    for decision in decisions {
        if decision.alive_now == decision.alive_next {
            continue;
        }
        if grid.set_alive(decision.cell, decision.alive_next).is_ok() {
            changes.push(CellChange::new(decision.cell, decision.alive_next));
        }
    }
    changes
}
