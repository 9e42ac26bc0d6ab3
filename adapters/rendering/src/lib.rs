#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Life Canvas adapters.
//!
//! Backends never read the world. The adapter folds world [`Event`]s into a
//! [`Scene`] via [`Scene::apply_event`], and the backend draws whatever the
//! scene currently mirrors.

use anyhow::Result as AnyResult;
use glam::Vec2;
use life_canvas_core::{CellCoord, Event, GridSize, PlayState};
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with a replaced alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Play/pause toggle requested on this frame.
    pub toggle_play: bool,
    /// Clear requested on this frame.
    pub clear: bool,
    /// Single manual generation step requested on this frame.
    pub step_once: bool,
    /// Zoom in requested on this frame.
    pub zoom_in: bool,
    /// Zoom out requested on this frame.
    pub zoom_out: bool,
    /// Cell under the cursor, if the cursor lies over the grid.
    pub cursor_cell: Option<CellCoord>,
    /// Primary pointer button went down on this frame.
    pub primary_pressed: bool,
    /// Primary pointer button is down.
    pub primary_held: bool,
    /// Secondary pointer button went down on this frame.
    pub secondary_pressed: bool,
    /// Secondary pointer button is down.
    pub secondary_held: bool,
}

/// Describes the square-celled grid rendered by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single cell expressed in world units.
    pub cell_length: f32,
    /// Color used when drawing grid lines.
    pub line_color: Color,
    /// Fill color of live cells.
    pub cell_color: Color,
}

impl CellGridPresentation {
    /// Opacity applied to grid lines so they stay in the background.
    pub const LINE_ALPHA: f32 = 0.15;

    /// Creates a new grid descriptor.
    ///
    /// Returns an error when `cell_length` is not a positive finite number.
    pub fn new(
        size: GridSize,
        cell_length: f32,
        line_color: Color,
        cell_color: Color,
    ) -> Result<Self, RenderingError> {
        if !cell_length.is_finite() || cell_length <= 0.0 {
            return Err(RenderingError::InvalidCellLength { cell_length });
        }

        Ok(Self {
            columns: size.columns(),
            rows: size.rows(),
            cell_length,
            line_color,
            cell_color,
        })
    }

    /// Dimensions of the grid in cells.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        GridSize::new(self.columns, self.rows)
    }

    /// Calculates the total width of the grid.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.cell_length
    }

    /// Calculates the total height of the grid.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.cell_length
    }

    /// Top-left corner of the cell in world units.
    #[must_use]
    pub fn cell_origin(&self, cell: CellCoord) -> Vec2 {
        Vec2::new(
            cell.column() as f32 * self.cell_length,
            cell.row() as f32 * self.cell_length,
        )
    }

    /// Resolves the cell containing a world-space position.
    ///
    /// Returns `None` when the position lies outside the grid.
    #[must_use]
    pub fn cell_at(&self, position: Vec2) -> Option<CellCoord> {
        if position.x < 0.0 || position.y < 0.0 || self.cell_length <= f32::EPSILON {
            return None;
        }

        let column = (position.x / self.cell_length).floor();
        let row = (position.y / self.cell_length).floor();
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(CellCoord::new(column as u32, row as u32))
    }
}

/// Side panel hosting instructions and buttons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlPanelView {
    /// Width of the panel in screen pixels.
    pub width: f32,
    /// Panel background color.
    pub background: Color,
}

impl ControlPanelView {
    /// Creates a new control panel descriptor.
    #[must_use]
    pub const fn new(width: f32, background: Color) -> Self {
        Self { width, background }
    }
}

/// Scene description mirroring the world's cells and status.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid geometry and colors.
    pub cell_grid: CellGridPresentation,
    /// Whether the simulation is currently advancing on its own.
    pub play_state: PlayState,
    /// Generation counter reported by the world.
    pub generation: u64,
    /// Number of live cells in the mirror.
    pub population: usize,
    /// Magnification applied around the grid origin.
    pub zoom: f32,
    /// Optional side panel.
    pub control_panel: Option<ControlPanelView>,
    live: Vec<bool>,
}

impl Scene {
    /// Smallest permitted zoom factor.
    pub const MIN_ZOOM: f32 = 1.0;
    /// Largest permitted zoom factor.
    pub const MAX_ZOOM: f32 = 1.7;
    /// Zoom change per request.
    pub const ZOOM_STEP: f32 = 0.1;

    /// Creates an all-dead, paused scene for the provided grid.
    #[must_use]
    pub fn new(cell_grid: CellGridPresentation, control_panel: Option<ControlPanelView>) -> Self {
        Self {
            live: vec![false; cell_grid.size().cell_count()],
            cell_grid,
            play_state: PlayState::Paused,
            generation: 0,
            population: 0,
            zoom: Self::MIN_ZOOM,
            control_panel,
        }
    }

    /// Reports whether the mirror holds the cell as alive.
    #[must_use]
    pub fn is_alive(&self, cell: CellCoord) -> bool {
        self.cell_grid
            .size()
            .index(cell)
            .and_then(|index| self.live.get(index).copied())
            .unwrap_or(false)
    }

    /// Iterates over the live cells of the mirror in row-major order.
    pub fn live_cells(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cell_grid
            .size()
            .cells()
            .zip(self.live.iter())
            .filter_map(|(cell, alive)| alive.then_some(cell))
    }

    /// Folds a world event into the scene.
    pub fn apply_event(&mut self, event: &Event) {
        match event {
            Event::GridConfigured { size } => {
                self.cell_grid.columns = size.columns();
                self.cell_grid.rows = size.rows();
                self.live = vec![false; size.cell_count()];
                self.population = 0;
                self.generation = 0;
            }
            Event::CellChanged { change } => {
                let Some(index) = self.cell_grid.size().index(change.cell) else {
                    return;
                };
                let Some(slot) = self.live.get_mut(index) else {
                    return;
                };
                if *slot != change.alive {
                    *slot = change.alive;
                    if change.alive {
                        self.population += 1;
                    } else {
                        self.population = self.population.saturating_sub(1);
                    }
                }
            }
            Event::GenerationAdvanced { generation, .. } => self.generation = *generation,
            Event::PlayStateChanged { state } => self.play_state = *state,
            Event::GridCleared => {
                self.live.fill(false);
                self.population = 0;
                self.generation = 0;
            }
            Event::TimeAdvanced { .. } | Event::EditRejected { .. } => {}
        }
    }

    /// Folds every event in order.
    pub fn apply_events(&mut self, events: &[Event]) {
        for event in events {
            self.apply_event(event);
        }
    }

    /// Increases the zoom factor by one step, up to [`Self::MAX_ZOOM`].
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + Self::ZOOM_STEP).min(Self::MAX_ZOOM);
    }

    /// Decreases the zoom factor by one step, down to [`Self::MIN_ZOOM`].
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - Self::ZOOM_STEP).max(Self::MIN_ZOOM);
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Initial window size in pixels.
    pub window_size: (u32, u32),
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(
        window_title: T,
        window_size: (u32, u32),
        clear_color: Color,
        scene: Scene,
    ) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            window_size,
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Life Canvas scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may mutate the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Cell length must be positive so every cell has area.
    #[error("cell_length must be a positive finite number (received {cell_length})")]
    InvalidCellLength {
        /// Provided length that failed validation.
        cell_length: f32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use life_canvas_core::CellChange;

    fn grid(columns: u32, rows: u32) -> CellGridPresentation {
        CellGridPresentation::new(
            GridSize::new(columns, rows),
            16.0,
            Color::from_rgb_u8(0, 0, 0),
            Color::from_rgb_u8(255, 255, 255),
        )
        .expect("valid grid")
    }

    fn changed(column: u32, row: u32, alive: bool) -> Event {
        Event::CellChanged {
            change: CellChange::new(CellCoord::new(column, row), alive),
        }
    }

    #[test]
    fn grid_creation_rejects_non_positive_cell_length_without_panicking() {
        for cell_length in [0.0, -4.0, f32::NAN] {
            let result = CellGridPresentation::new(
                GridSize::new(4, 4),
                cell_length,
                Color::from_rgb_u8(0, 0, 0),
                Color::from_rgb_u8(0, 0, 0),
            );
            assert!(
                matches!(result, Err(RenderingError::InvalidCellLength { .. })),
                "cell length {cell_length} accepted"
            );
        }
    }

    #[test]
    fn cell_at_maps_world_positions_to_cells() {
        let grid = grid(6, 3);

        assert_eq!(grid.cell_at(Vec2::new(0.0, 0.0)), Some(CellCoord::new(0, 0)));
        assert_eq!(grid.cell_at(Vec2::new(15.9, 16.0)), Some(CellCoord::new(0, 1)));
        assert_eq!(grid.cell_at(Vec2::new(95.0, 47.0)), Some(CellCoord::new(5, 2)));
        assert_eq!(grid.cell_at(Vec2::new(96.0, 10.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(10.0, 48.0)), None);
        assert_eq!(grid.cell_at(Vec2::new(-0.1, 10.0)), None);
    }

    #[test]
    fn cell_origin_inverts_cell_at() {
        let grid = grid(5, 5);
        let cell = CellCoord::new(3, 4);
        assert_eq!(grid.cell_origin(cell), Vec2::new(48.0, 64.0));
        assert_eq!(grid.cell_at(grid.cell_origin(cell)), Some(cell));
    }

    #[test]
    fn scene_folds_cell_changes_and_tracks_population() {
        let mut scene = Scene::new(grid(4, 4), None);

        scene.apply_events(&[
            changed(1, 1, true),
            changed(2, 1, true),
            changed(2, 1, true),
            changed(1, 1, false),
            Event::GenerationAdvanced {
                generation: 3,
                changed: 2,
            },
        ]);

        assert!(scene.is_alive(CellCoord::new(2, 1)));
        assert!(!scene.is_alive(CellCoord::new(1, 1)));
        assert_eq!(scene.population, 1);
        assert_eq!(scene.generation, 3);
        assert_eq!(scene.live_cells().collect::<Vec<_>>(), vec![CellCoord::new(2, 1)]);
    }

    #[test]
    fn scene_ignores_changes_outside_the_mirror() {
        let mut scene = Scene::new(grid(2, 2), None);
        scene.apply_event(&changed(5, 5, true));
        assert_eq!(scene.population, 0);
        assert!(!scene.is_alive(CellCoord::new(5, 5)));
    }

    #[test]
    fn clear_and_reconfigure_reset_the_mirror() {
        let mut scene = Scene::new(grid(3, 3), None);
        scene.apply_events(&[
            changed(0, 0, true),
            Event::PlayStateChanged {
                state: PlayState::Running,
            },
            Event::GridCleared,
        ]);
        assert_eq!(scene.population, 0);
        assert_eq!(scene.play_state, PlayState::Running);
        assert_eq!(scene.live_cells().count(), 0);

        scene.apply_event(&Event::GridConfigured {
            size: GridSize::new(8, 2),
        });
        assert_eq!(scene.cell_grid.size(), GridSize::new(8, 2));
        scene.apply_event(&changed(7, 1, true));
        assert!(scene.is_alive(CellCoord::new(7, 1)));
    }

    #[test]
    fn zoom_is_clamped_to_supported_range() {
        let mut scene = Scene::new(grid(2, 2), None);
        scene.zoom_out();
        assert_eq!(scene.zoom, Scene::MIN_ZOOM);

        for _ in 0..20 {
            scene.zoom_in();
        }
        assert_eq!(scene.zoom, Scene::MAX_ZOOM);
    }

    #[test]
    fn grid_line_color_is_translucent() {
        assert_eq!(
            Color::from_rgb_u8(255, 0, 0).with_alpha(CellGridPresentation::LINE_ALPHA).alpha,
            0.15
        );
    }
}
