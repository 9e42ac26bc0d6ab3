#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure editor system that turns pointer gestures into cell edit commands.
//!
//! A gesture starts when a pointer button is pressed over the grid and ends
//! when it is released. The primary button draws life, the secondary button
//! erases it. While the button is held every newly entered cell is edited
//! once and remembered; on release the remembered cells are committed as a
//! single [`Command::MarkDirty`] batch.

use std::collections::HashSet;

use life_canvas_core::{CellCoord, Command, Event};
use tracing::debug;

/// Kind of edit performed by an in-progress gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gesture {
    /// Primary button: brings dead cells to life.
    Draw,
    /// Secondary button: kills live cells.
    Erase,
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditorInput {
    /// Primary button went down on this frame.
    pub primary_pressed: bool,
    /// Primary button is currently down.
    pub primary_held: bool,
    /// Secondary button went down on this frame.
    pub secondary_pressed: bool,
    /// Secondary button is currently down.
    pub secondary_held: bool,
    /// Cell currently under the cursor, if the cursor is over the grid.
    pub cursor_cell: Option<CellCoord>,
}

impl EditorInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(
        primary_pressed: bool,
        primary_held: bool,
        secondary_pressed: bool,
        secondary_held: bool,
        cursor_cell: Option<CellCoord>,
    ) -> Self {
        Self {
            primary_pressed,
            primary_held,
            secondary_pressed,
            secondary_held,
            cursor_cell,
        }
    }

    const fn holds(&self, gesture: Gesture) -> bool {
        match gesture {
            Gesture::Draw => self.primary_held,
            Gesture::Erase => self.secondary_held,
        }
    }
}

/// Editor system that translates pointer input into edit commands.
#[derive(Debug, Clone, Default)]
pub struct Editor {
    gesture: Option<Gesture>,
    last_cell: Option<CellCoord>,
    pressed: Vec<CellCoord>,
    seen: HashSet<CellCoord>,
}

impl Editor {
    /// Creates a new idle editor.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gesture currently held, if any.
    #[must_use]
    pub const fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    /// Cells edited by the in-progress gesture, in the order they were touched.
    #[must_use]
    pub fn pressed_cells(&self) -> &[CellCoord] {
        &self.pressed
    }

    /// Consumes world events and adapter-derived input to emit edit commands.
    ///
    /// The `is_alive` closure should mirror the world's `query::is_alive`
    /// helper, reporting `false` for cells it cannot resolve.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        input: EditorInput,
        mut is_alive: F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        for event in events {
            if matches!(event, Event::GridConfigured { .. } | Event::GridCleared) {
                self.abandon();
            }
        }

        if input.primary_pressed {
            self.begin(Gesture::Draw, input.cursor_cell, out);
        } else if input.secondary_pressed {
            self.begin(Gesture::Erase, input.cursor_cell, out);
        } else if let Some(gesture) = self.gesture {
            self.drag(gesture, input.cursor_cell, &mut is_alive, out);
        }

        if let Some(gesture) = self.gesture {
            if !input.holds(gesture) {
                self.commit(out);
            }
        }
    }

    fn begin(&mut self, gesture: Gesture, cell: Option<CellCoord>, out: &mut Vec<Command>) {
        self.commit(out);
        self.gesture = Some(gesture);
        self.last_cell = cell;

        if let Some(cell) = cell {
            out.push(edit_command(gesture, cell));
            self.remember(cell);
        }
    }

    fn drag<F>(
        &mut self,
        gesture: Gesture,
        cell: Option<CellCoord>,
        is_alive: &mut F,
        out: &mut Vec<Command>,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        if cell == self.last_cell {
            return;
        }
        self.last_cell = cell;

        let Some(cell) = cell else {
            return;
        };
        if self.seen.contains(&cell) {
            return;
        }

        let alive = is_alive(cell);
        let applies = match gesture {
            Gesture::Draw => !alive,
            Gesture::Erase => alive,
        };
        if applies {
            out.push(edit_command(gesture, cell));
            self.remember(cell);
        }
    }

    fn remember(&mut self, cell: CellCoord) {
        if self.seen.insert(cell) {
            self.pressed.push(cell);
        }
    }

    fn commit(&mut self, out: &mut Vec<Command>) {
        let Some(gesture) = self.gesture.take() else {
            return;
        };
        self.last_cell = None;
        self.seen.clear();
        if self.pressed.is_empty() {
            return;
        }

        let cells = std::mem::take(&mut self.pressed);
        debug!(?gesture, cells = cells.len(), "edit gesture committed");
        out.push(Command::MarkDirty { cells });
    }

    fn abandon(&mut self) {
        self.gesture = None;
        self.last_cell = None;
        self.pressed.clear();
        self.seen.clear();
    }
}

fn edit_command(gesture: Gesture, cell: CellCoord) -> Command {
    match gesture {
        Gesture::Draw => Command::CreateLife { cell },
        Gesture::Erase => Command::DestroyLife { cell },
    }
}
