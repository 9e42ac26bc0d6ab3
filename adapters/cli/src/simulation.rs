//! Frame driver that routes adapter input through the pure systems into the
//! world and folds the resulting events into the scene.

use std::time::Duration;

use anyhow::{bail, Result};
use life_canvas_core::{Command, Event, GridSize};
use life_canvas_rendering::{FrameInput, Scene};
use life_canvas_system_editor::{Editor, EditorInput};
use life_canvas_system_seeding::Seeding;
use life_canvas_world::{self as world, dirty::DirtyTracker, query, World};
use tracing::{debug, info, warn};

/// Owns the world and the systems that feed it commands.
#[derive(Debug)]
pub(crate) struct Simulation {
    world: World,
    editor: Editor,
    pending_events: Vec<Event>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Builds a world of the given size and paces it with `step_interval`.
    pub(crate) fn new(size: GridSize, step_interval: Duration) -> Self {
        let mut simulation = Self {
            world: World::with_size(size),
            editor: Editor::new(),
            pending_events: Vec::new(),
            commands: Vec::new(),
        };
        let _ = simulation.execute(vec![Command::ConfigureStepInterval { step_interval }]);
        simulation
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    /// Applies the seeding plan and returns the events it produced.
    pub(crate) fn seed(&mut self, seeding: &Seeding) -> Vec<Event> {
        let mut commands = Vec::new();
        let emitted = seeding.seed(query::grid_size(&self.world), &mut commands);
        let events = self.execute(commands);
        info!(
            cells = emitted,
            population = query::population(&self.world),
            "board seeded"
        );
        events
    }

    /// Advances one rendered frame.
    pub(crate) fn advance(&mut self, dt: Duration, input: FrameInput, scene: &mut Scene) {
        if input.zoom_in {
            scene.zoom_in();
        }
        if input.zoom_out {
            scene.zoom_out();
        }

        let mut commands = std::mem::take(&mut self.commands);
        if input.clear {
            commands.push(Command::ClearAll);
        }
        if input.toggle_play {
            commands.push(Command::TogglePlayState);
        }
        if input.step_once {
            commands.push(Command::StepGeneration);
        }

        let editor_input = EditorInput::new(
            input.primary_pressed,
            input.primary_held,
            input.secondary_pressed,
            input.secondary_held,
            input.cursor_cell,
        );
        let world = &self.world;
        self.editor.handle(
            &self.pending_events,
            editor_input,
            |cell| query::is_alive(world, cell).unwrap_or(false),
            &mut commands,
        );
        commands.push(Command::Tick { dt });

        let events = self.execute_buffer(&mut commands);
        self.commands = commands;
        scene.apply_events(&events);
        self.pending_events = events;
    }

    fn execute(&mut self, mut commands: Vec<Command>) -> Vec<Event> {
        self.execute_buffer(&mut commands)
    }

    fn execute_buffer(&mut self, commands: &mut Vec<Command>) -> Vec<Event> {
        let mut events = Vec::new();
        for command in commands.drain(..) {
            world::apply(&mut self.world, command, &mut events);
        }
        events
    }

    /// Steps `generations` times without a window, optionally checking each
    /// incremental generation against a full-grid replica.
    pub(crate) fn run_headless(&mut self, generations: u64, verify: bool) -> Result<()> {
        let mut replica = verify.then(|| {
            let grid = query::grid(&self.world).clone();
            (DirtyTracker::new(grid.size()), grid)
        });

        info!(
            generations,
            verify,
            population = query::population(&self.world),
            "headless run started"
        );

        for _ in 0..generations {
            let events = self.execute(vec![Command::StepGeneration]);
            let changed = events
                .iter()
                .filter(|event| matches!(event, Event::CellChanged { .. }))
                .count();
            let generation = query::generation(&self.world);
            debug!(
                generation,
                changed,
                population = query::population(&self.world),
                dirty = query::dirty_set(&self.world).len(),
                "generation"
            );

            if let Some((tracker, grid)) = replica.as_mut() {
                let _ = tracker.advance_generation_full(grid);
                if query::grid(&self.world) != &*grid {
                    warn!(
                        generation,
                        incremental = query::population(&self.world),
                        full = grid.population(),
                        "incremental step diverged from full evaluation"
                    );
                    bail!(
                        "incremental stepping diverged from full evaluation at generation \
                         {generation}"
                    );
                }
            }
        }

        info!(
            generation = query::generation(&self.world),
            population = query::population(&self.world),
            "headless run finished"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_canvas_core::{CellCoord, PlayState};
    use life_canvas_rendering::{CellGridPresentation, Color};
    use life_canvas_system_seeding::{Pattern, PatternPlacement, SeedPlan};

    fn scene_for(size: GridSize) -> Scene {
        let grid = CellGridPresentation::new(
            size,
            10.0,
            Color::from_rgb_u8(255, 255, 255),
            Color::from_rgb_u8(255, 255, 255),
        )
        .expect("valid grid");
        Scene::new(grid, None)
    }

    fn click(cell: CellCoord) -> FrameInput {
        FrameInput {
            cursor_cell: Some(cell),
            primary_pressed: true,
            ..FrameInput::default()
        }
    }

    #[test]
    fn clicks_draw_cells_into_world_and_scene() {
        let size = GridSize::new(8, 8);
        let mut simulation = Simulation::new(size, Duration::from_millis(100));
        let mut scene = scene_for(size);

        simulation.advance(Duration::from_millis(16), click(CellCoord::new(3, 3)), &mut scene);

        assert_eq!(query::is_alive(simulation.world(), CellCoord::new(3, 3)), Ok(true));
        assert!(scene.is_alive(CellCoord::new(3, 3)));
        assert_eq!(scene.population, 1);
    }

    #[test]
    fn toggle_and_ticks_step_the_mirrored_scene() {
        let size = GridSize::new(8, 8);
        let mut simulation = Simulation::new(size, Duration::from_millis(100));
        let mut scene = scene_for(size);
        let plan = SeedPlan {
            patterns: vec![PatternPlacement::new(Pattern::Blinker, 2, 3)],
            ..SeedPlan::default()
        };
        let events = simulation.seed(&Seeding::new(plan).expect("valid plan"));
        scene.apply_events(&events);

        simulation.advance(
            Duration::ZERO,
            FrameInput {
                toggle_play: true,
                ..FrameInput::default()
            },
            &mut scene,
        );
        simulation.advance(Duration::from_millis(100), FrameInput::default(), &mut scene);

        assert_eq!(scene.play_state, PlayState::Running);
        assert_eq!(scene.generation, 1);
        assert_eq!(
            scene.live_cells().collect::<Vec<_>>(),
            vec![CellCoord::new(3, 2), CellCoord::new(3, 3), CellCoord::new(3, 4)]
        );
    }

    #[test]
    fn clear_request_empties_scene_and_pauses() {
        let size = GridSize::new(6, 6);
        let mut simulation = Simulation::new(size, Duration::from_millis(100));
        let mut scene = scene_for(size);
        simulation.advance(Duration::ZERO, click(CellCoord::new(1, 1)), &mut scene);
        simulation.advance(
            Duration::ZERO,
            FrameInput {
                toggle_play: true,
                ..FrameInput::default()
            },
            &mut scene,
        );

        simulation.advance(
            Duration::ZERO,
            FrameInput {
                clear: true,
                ..FrameInput::default()
            },
            &mut scene,
        );

        assert_eq!(scene.population, 0);
        assert_eq!(scene.play_state, PlayState::Paused);
        assert_eq!(query::population(simulation.world()), 0);
    }

    #[test]
    fn zoom_requests_adjust_scene_only() {
        let size = GridSize::new(4, 4);
        let mut simulation = Simulation::new(size, Duration::from_millis(100));
        let mut scene = scene_for(size);

        simulation.advance(
            Duration::ZERO,
            FrameInput {
                zoom_in: true,
                ..FrameInput::default()
            },
            &mut scene,
        );

        assert!(scene.zoom > Scene::MIN_ZOOM);
        assert_eq!(query::generation(simulation.world()), 0);
    }

    #[test]
    fn headless_verification_passes_for_random_soup() {
        let size = GridSize::new(40, 30);
        let mut simulation = Simulation::new(size, Duration::from_millis(100));
        let plan = SeedPlan {
            soup_density: 0.3,
            rng_seed: 11,
            ..SeedPlan::default()
        };
        let _ = simulation.seed(&Seeding::new(plan).expect("valid plan"));

        simulation
            .run_headless(60, true)
            .expect("incremental and full stepping agree");
        assert_eq!(query::generation(simulation.world()), 60);
    }
}
