#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state management for Life Canvas.
//!
//! The world owns the [`grid::Grid`], the [`dirty::DirtyTracker`] that limits
//! each generation to cells that might change, and the
//! [`clock::SimulationClock`] that paces automatic steps. Adapters never touch
//! these directly: they submit commands through [`apply`] and read state
//! through [`query`].

pub mod clock;
pub mod dirty;
pub mod grid;
pub mod neighborhood;

use std::time::Duration;

use life_canvas_core::{
    CellChange, CellCoord, Command, Event, GridSize, PlayState, WELCOME_BANNER,
};
use tracing::{debug, info, warn};

use self::{clock::SimulationClock, dirty::DirtyTracker, grid::Grid};

const DEFAULT_GRID_COLUMNS: u32 = 64;
const DEFAULT_GRID_ROWS: u32 = 48;

/// Represents the authoritative Life Canvas world state.
#[derive(Clone, Debug)]
pub struct World {
    banner: &'static str,
    grid: Grid,
    tracker: DirtyTracker,
    clock: SimulationClock,
    generation: u64,
}

impl World {
    /// Creates a new world with a default-sized, all-dead, paused grid.
    #[must_use]
    pub fn new() -> Self {
        Self::with_size(GridSize::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS))
    }

    /// Creates a new all-dead, paused world with the provided dimensions.
    #[must_use]
    pub fn with_size(size: GridSize) -> Self {
        Self {
            banner: WELCOME_BANNER,
            grid: Grid::new(size),
            tracker: DirtyTracker::new(size),
            clock: SimulationClock::default(),
            generation: 0,
        }
    }

    fn step(&mut self, full: bool, out_events: &mut Vec<Event>) {
        let changes = if full {
            self.tracker.advance_generation_full(&mut self.grid)
        } else {
            self.tracker.advance_generation(&mut self.grid)
        };
        self.generation = self.generation.saturating_add(1);

        debug!(
            generation = self.generation,
            changed = changes.len(),
            dirty = self.tracker.pending().len(),
            full,
            "generation advanced"
        );

        let changed = changes.len();
        out_events.extend(changes.into_iter().map(|change| Event::CellChanged { change }));
        out_events.push(Event::GenerationAdvanced {
            generation: self.generation,
            changed,
        });
    }

    fn edit(&mut self, cell: CellCoord, alive: bool, out_events: &mut Vec<Event>) {
        match self.grid.set_alive(cell, alive) {
            Ok(previous) => {
                if let Err(reason) = self.tracker.mark_dirty(cell) {
                    warn!(%reason, "failed to schedule edited cell");
                }
                if previous != alive {
                    out_events.push(Event::CellChanged {
                        change: CellChange::new(cell, alive),
                    });
                }
            }
            Err(reason) => {
                warn!(%reason, "edit rejected");
                out_events.push(Event::EditRejected { cell, reason });
            }
        }
    }

    fn pause(&mut self, out_events: &mut Vec<Event>) {
        let was_running = self.clock.is_running();
        self.clock.pause();
        if was_running {
            out_events.push(Event::PlayStateChanged {
                state: PlayState::Paused,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureGrid { size } => {
            world.grid = Grid::new(size);
            world.tracker.reset(size);
            world.generation = 0;
            world.pause(out_events);
            info!(columns = size.columns(), rows = size.rows(), "grid configured");
            out_events.push(Event::GridConfigured { size });
        }
        Command::ConfigureStepInterval { step_interval } => {
            world.clock.set_step_interval(step_interval);
        }
        Command::Tick { dt } => {
            out_events.push(Event::TimeAdvanced { dt });
            if world.clock.tick(dt) {
                world.step(false, out_events);
            }
        }
        Command::StepGeneration => world.step(false, out_events),
        Command::StepGenerationFull => world.step(true, out_events),
        Command::CreateLife { cell } => world.edit(cell, true, out_events),
        Command::DestroyLife { cell } => world.edit(cell, false, out_events),
        Command::MarkDirty { cells } => {
            for cell in cells {
                if let Err(reason) = world.tracker.mark_dirty(cell) {
                    warn!(%reason, "dirty mark rejected");
                    out_events.push(Event::EditRejected { cell, reason });
                }
            }
        }
        Command::TogglePlayState => {
            let state = world.clock.toggle();
            info!(?state, "play state toggled");
            out_events.push(Event::PlayStateChanged { state });
        }
        Command::ClearAll => {
            world.grid.clear_all();
            world.tracker.reset(world.grid.size());
            world.generation = 0;
            world.pause(out_events);
            info!("grid cleared");
            out_events.push(Event::GridCleared);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use life_canvas_core::{CellCoord, GridError, GridSize, PlayState};

    use super::{dirty::DirtySet, grid::Grid, World};

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the cell grid.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Dimensions of the cell grid.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.grid.size()
    }

    /// Reports whether the cell is alive.
    pub fn is_alive(world: &World, cell: CellCoord) -> Result<bool, GridError> {
        world.grid.is_alive(cell)
    }

    /// Current play state of the simulation clock.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.clock.state()
    }

    /// Number of generations advanced since the grid was configured or cleared.
    #[must_use]
    pub fn generation(world: &World) -> u64 {
        world.generation
    }

    /// Number of live cells.
    #[must_use]
    pub fn population(world: &World) -> usize {
        world.grid.population()
    }

    /// Coordinates scheduled for evaluation in the next generation.
    #[must_use]
    pub fn dirty_set(world: &World) -> &DirtySet {
        world.tracker.pending()
    }

    /// Interval between automatic generation steps.
    #[must_use]
    pub fn step_interval(world: &World) -> Duration {
        world.clock.step_interval()
    }
}

/// Interval used by freshly created worlds; see [`clock::DEFAULT_STEP_INTERVAL`].
#[must_use]
pub const fn default_step_interval() -> Duration {
    clock::DEFAULT_STEP_INTERVAL
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(world: &mut World, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, command, &mut events);
        events
    }

    fn cell_changes(events: &[Event]) -> Vec<CellChange> {
        events
            .iter()
            .filter_map(|event| match event {
                Event::CellChanged { change } => Some(*change),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn new_world_is_paused_and_empty() {
        let world = World::new();
        assert_eq!(query::play_state(&world), PlayState::Paused);
        assert_eq!(query::population(&world), 0);
        assert_eq!(query::generation(&world), 0);
        assert_eq!(
            query::grid_size(&world),
            GridSize::new(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS)
        );
        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
    }

    #[test]
    fn configure_grid_replaces_state_and_pauses() {
        let mut world = World::new();
        let _ = run(&mut world, Command::CreateLife { cell: CellCoord::new(1, 1) });
        let _ = run(&mut world, Command::TogglePlayState);

        let events = run(
            &mut world,
            Command::ConfigureGrid {
                size: GridSize::new(12, 8),
            },
        );

        assert_eq!(
            events,
            vec![
                Event::PlayStateChanged {
                    state: PlayState::Paused
                },
                Event::GridConfigured {
                    size: GridSize::new(12, 8)
                },
            ]
        );
        assert_eq!(query::grid_size(&world), GridSize::new(12, 8));
        assert_eq!(query::population(&world), 0);
        assert!(query::dirty_set(&world).is_empty());
    }

    #[test]
    fn create_life_emits_change_once() {
        let mut world = World::with_size(GridSize::new(5, 5));
        let cell = CellCoord::new(2, 2);

        let first = run(&mut world, Command::CreateLife { cell });
        let second = run(&mut world, Command::CreateLife { cell });

        assert_eq!(cell_changes(&first), vec![CellChange::new(cell, true)]);
        assert!(second.is_empty());
        assert_eq!(query::is_alive(&world, cell), Ok(true));
        assert!(query::dirty_set(&world).contains(CellCoord::new(1, 1)));
    }

    #[test]
    fn out_of_range_edit_is_rejected() {
        let mut world = World::with_size(GridSize::new(5, 5));
        let cell = CellCoord::new(5, 0);

        let events = run(&mut world, Command::DestroyLife { cell });

        assert!(matches!(
            events.as_slice(),
            [Event::EditRejected { cell: rejected, .. }] if *rejected == cell
        ));
    }

    #[test]
    fn paused_ticks_only_report_time() {
        let mut world = World::with_size(GridSize::new(5, 5));
        let _ = run(&mut world, Command::CreateLife { cell: CellCoord::new(2, 2) });

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_secs(5),
            },
        );

        assert_eq!(
            events,
            vec![Event::TimeAdvanced {
                dt: Duration::from_secs(5)
            }]
        );
        assert_eq!(query::population(&world), 1);
    }

    #[test]
    fn resuming_after_long_pause_steps_on_first_tick() {
        let mut world = World::with_size(GridSize::new(5, 5));
        let _ = run(&mut world, Command::CreateLife { cell: CellCoord::new(2, 2) });
        let _ = run(
            &mut world,
            Command::Tick {
                dt: default_step_interval() * 5,
            },
        );
        let _ = run(&mut world, Command::TogglePlayState);

        let events = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(1),
            },
        );

        assert!(events
            .iter()
            .any(|event| matches!(event, Event::GenerationAdvanced { generation: 1, .. })));
        assert_eq!(query::population(&world), 0);
    }

    #[test]
    fn running_tick_advances_one_generation() {
        let mut world = World::with_size(GridSize::new(5, 5));
        let _ = run(&mut world, Command::CreateLife { cell: CellCoord::new(2, 2) });
        let _ = run(&mut world, Command::TogglePlayState);

        let events = run(
            &mut world,
            Command::Tick {
                dt: default_step_interval() * 3,
            },
        );

        assert_eq!(
            events,
            vec![
                Event::TimeAdvanced {
                    dt: default_step_interval() * 3
                },
                Event::CellChanged {
                    change: CellChange::new(CellCoord::new(2, 2), false)
                },
                Event::GenerationAdvanced {
                    generation: 1,
                    changed: 1
                },
            ]
        );
    }

    #[test]
    fn clear_all_pauses_and_kills_everything() {
        let mut world = World::with_size(GridSize::new(6, 6));
        for cell in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            let _ = run(
                &mut world,
                Command::CreateLife {
                    cell: CellCoord::new(cell.0, cell.1),
                },
            );
        }
        let _ = run(&mut world, Command::TogglePlayState);
        let _ = run(&mut world, Command::StepGeneration);

        let events = run(&mut world, Command::ClearAll);

        assert_eq!(
            events,
            vec![
                Event::PlayStateChanged {
                    state: PlayState::Paused
                },
                Event::GridCleared,
            ]
        );
        assert_eq!(query::population(&world), 0);
        assert_eq!(query::generation(&world), 0);
        assert_eq!(query::play_state(&world), PlayState::Paused);
    }

    #[test]
    fn configure_step_interval_changes_cadence() {
        let mut world = World::with_size(GridSize::new(3, 3));
        let _ = run(
            &mut world,
            Command::ConfigureStepInterval {
                step_interval: Duration::from_millis(500),
            },
        );
        let _ = run(&mut world, Command::TogglePlayState);

        let early = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(300),
            },
        );
        let due = run(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(200),
            },
        );

        assert_eq!(query::step_interval(&world), Duration::from_millis(500));
        assert_eq!(early.len(), 1);
        assert!(due
            .iter()
            .any(|event| matches!(event, Event::GenerationAdvanced { generation: 1, .. })));
    }
}
