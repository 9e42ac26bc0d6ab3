#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Life Canvas.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.
//!
//! The adapter uses Macroquad's immediate-mode UI module for the control
//! panel. All UI-specific calls live inside the local `ui` module to avoid
//! leaking Macroquad UI types throughout the renderer.

mod ui;

use self::ui::{draw_control_panel_ui, ControlPanelUiContext, ControlPanelUiResult};
use anyhow::Result;
use glam::Vec2;
use life_canvas_core::PlayState;
use life_canvas_rendering::{
    CellGridPresentation, Color, ControlPanelView, FrameInput, Presentation, RenderingBackend,
    Scene,
};
use macroquad::math::Vec2 as MacroquadVec2;
use macroquad::input::{
    is_key_pressed, is_mouse_button_down, is_mouse_button_pressed, mouse_position, KeyCode,
    MouseButton,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::info;

/// Tracks UI-sourced interactions so they can be merged with physical input on the next frame.
#[doc(hidden)]
#[derive(Clone, Copy, Debug, Default)]
pub struct ControlPanelInputState {
    toggle_play_latched: bool,
    step_latched: bool,
    clear_latched: bool,
}

impl ControlPanelInputState {
    /// Returns whether the UI requested a play toggle and clears the latch so
    /// the action fires only once.
    pub fn take_toggle_play(&mut self) -> bool {
        std::mem::take(&mut self.toggle_play_latched)
    }

    /// Records that the control-panel button requested a play toggle this frame.
    pub fn register_toggle_play(&mut self) {
        self.toggle_play_latched = true;
    }

    /// Returns the latched single-step request, clearing it.
    pub fn take_step(&mut self) -> bool {
        std::mem::take(&mut self.step_latched)
    }

    /// Records that the control-panel button requested a single step.
    pub fn register_step(&mut self) {
        self.step_latched = true;
    }

    /// Returns the latched clear request, clearing it.
    pub fn take_clear(&mut self) -> bool {
        std::mem::take(&mut self.clear_latched)
    }

    /// Records that the control-panel button requested a clear.
    pub fn register_clear(&mut self) {
        self.clear_latched = true;
    }
}

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the loop.
    quit_requested: bool,
    /// `Space` toggles between paused and running.
    toggle_play: bool,
    /// `N` advances one generation.
    step_once: bool,
    /// `Right` zooms in.
    zoom_in: bool,
    /// `Left` zooms out.
    zoom_out: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            toggle_play: is_key_pressed(KeyCode::Space),
            step_once: is_key_pressed(KeyCode::N),
            zoom_in: is_key_pressed(KeyCode::Right),
            zoom_out: is_key_pressed(KeyCode::Left),
        }
    }
}

/// Pointer button state observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct PointerButtons {
    primary_pressed: bool,
    primary_held: bool,
    secondary_pressed: bool,
    secondary_held: bool,
}

impl PointerButtons {
    fn poll() -> Self {
        Self {
            primary_pressed: is_mouse_button_pressed(MouseButton::Left),
            primary_held: is_mouse_button_down(MouseButton::Left),
            secondary_pressed: is_mouse_button_pressed(MouseButton::Right),
            secondary_held: is_mouse_button_down(MouseButton::Right),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    simulation: Duration,
    render: Duration,
}

#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    simulation_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_simulation: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.simulation_accum += breakdown.simulation;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            let Some(removed) = self.frame_times.pop_front() else {
                break;
            };
            self.window_duration = self.window_duration.saturating_sub(removed);
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        let per_second = frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_simulation: self.simulation_accum / frames.max(1),
            avg_render: self.render_accum / frames.max(1),
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.simulation_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            window_size,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: i32::try_from(window_size.0).unwrap_or(i32::MAX),
            window_height: i32::try_from(window_size.1).unwrap_or(i32::MAX),
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();
            let mut control_panel_input = ControlPanelInputState::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let (cursor_x, cursor_y) = mouse_position();
                let panel = PanelRequests {
                    toggle_play: control_panel_input.take_toggle_play(),
                    step_once: control_panel_input.take_step(),
                    clear: control_panel_input.take_clear(),
                };
                let frame_input = gather_frame_input(
                    &scene,
                    &metrics_before,
                    Vec2::new(cursor_x, cursor_y),
                    keyboard,
                    PointerButtons::poll(),
                    panel,
                );

                let simulation_start = Instant::now();
                update_scene(frame_dt, frame_input, &mut scene);
                let simulation_duration = simulation_start.elapsed();

                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);

                let render_start = Instant::now();
                draw_cells(&scene, &metrics);
                draw_grid_lines(&scene.cell_grid, &metrics);
                if scene.play_state == PlayState::Paused {
                    draw_paused_indicator(&metrics);
                }

                if let Some(panel_context) = draw_control_panel(&scene, screen_width, screen_height)
                {
                    let mut control_panel_ui = macroquad::ui::root_ui();
                    let ControlPanelUiResult {
                        toggle_play_pressed,
                        step_pressed,
                        clear_pressed,
                    } = draw_control_panel_ui(&mut control_panel_ui, panel_context);
                    if toggle_play_pressed {
                        control_panel_input.register_toggle_play();
                    }
                    if step_pressed {
                        control_panel_input.register_step();
                    }
                    if clear_pressed {
                        control_panel_input.register_clear();
                    }
                }
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    simulation: simulation_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_simulation,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            fps = format_args!("{per_second:.2}"),
                            fps_10s = format_args!("{trailing_ten_seconds:.2}"),
                            sim_ms = avg_simulation.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            population = scene.population,
                            generation = scene.generation,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Actions requested through the control panel on the previous frame.
#[derive(Clone, Copy, Debug, Default)]
struct PanelRequests {
    toggle_play: bool,
    step_once: bool,
    clear: bool,
}

#[derive(Clone, Copy, Debug)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    available_width: f32,
    grid_width_scaled: f32,
    grid_height_scaled: f32,
    cell_step: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let cell_grid = scene.cell_grid;
        let world_width = cell_grid.width();
        let world_height = cell_grid.height();
        let panel_width = scene
            .control_panel
            .map(|panel| panel.width.max(0.0))
            .unwrap_or(0.0)
            .min(screen_width);
        let available_width = (screen_width - panel_width).max(0.0);
        let fit = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            let width_ratio = if available_width <= f32::EPSILON {
                f32::INFINITY
            } else {
                available_width / world_width
            };
            width_ratio.min(screen_height / world_height)
        };
        let scale = fit * scene.zoom;

        let offset_x = ((available_width - world_width * fit) * 0.5).max(0.0);
        let offset_y = ((screen_height - world_height * fit) * 0.5).max(0.0);

        Self {
            scale,
            offset_x,
            offset_y,
            available_width,
            grid_width_scaled: world_width * scale,
            grid_height_scaled: world_height * scale,
            cell_step: cell_grid.cell_length * scale,
        }
    }

    fn screen_to_world(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            (position.x - self.offset_x) / self.scale,
            (position.y - self.offset_y) / self.scale,
        )
    }

    fn world_to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }
}

fn gather_frame_input(
    scene: &Scene,
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    keyboard: KeyboardShortcuts,
    buttons: PointerButtons,
    panel: PanelRequests,
) -> FrameInput {
    let mut input = FrameInput {
        toggle_play: keyboard.toggle_play || panel.toggle_play,
        step_once: keyboard.step_once || panel.step_once,
        clear: panel.clear,
        zoom_in: keyboard.zoom_in,
        zoom_out: keyboard.zoom_out,
        primary_held: buttons.primary_held,
        secondary_held: buttons.secondary_held,
        ..FrameInput::default()
    };

    if metrics.scale <= f32::EPSILON || cursor_position.x >= metrics.available_width {
        return input;
    }

    let world_position = metrics.screen_to_world(cursor_position);
    input.cursor_cell = scene.cell_grid.cell_at(world_position);

    if input.cursor_cell.is_some() {
        input.primary_pressed = buttons.primary_pressed;
        input.secondary_pressed = buttons.secondary_pressed;
    }

    input
}

fn draw_control_panel(
    scene: &Scene,
    screen_width: f32,
    screen_height: f32,
) -> Option<ControlPanelUiContext> {
    let Some(ControlPanelView { width, background }) = scene.control_panel else {
        return None;
    };
    if width <= f32::EPSILON {
        return None;
    }

    let left = (screen_width - width).max(0.0);
    let background_color = to_macroquad_color(background);
    macroquad::shapes::draw_rectangle(left, 0.0, width, screen_height, background_color);

    Some(ControlPanelUiContext {
        origin: MacroquadVec2::new(left, 0.0),
        size: MacroquadVec2::new(width, screen_height),
        background: background_color,
        play_state: scene.play_state,
        generation: scene.generation,
        population: scene.population,
        zoom: scene.zoom,
    })
}

fn draw_cells(scene: &Scene, metrics: &SceneMetrics) {
    let color = to_macroquad_color(scene.cell_grid.cell_color);
    for cell in scene.live_cells() {
        let origin = metrics.world_to_screen(scene.cell_grid.cell_origin(cell));
        if origin.x >= metrics.available_width {
            continue;
        }
        macroquad::shapes::draw_rectangle(
            origin.x,
            origin.y,
            metrics.cell_step,
            metrics.cell_step,
            color,
        );
    }
}

fn draw_grid_lines(cell_grid: &CellGridPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(
        cell_grid
            .line_color
            .with_alpha(CellGridPresentation::LINE_ALPHA),
    );
    let right = (metrics.offset_x + metrics.grid_width_scaled).min(metrics.available_width);
    let bottom = metrics.offset_y + metrics.grid_height_scaled;

    for column in 0..=cell_grid.columns {
        let x = metrics.offset_x + column as f32 * metrics.cell_step;
        if x > right {
            break;
        }
        macroquad::shapes::draw_line(x, metrics.offset_y, x, bottom, 1.0, color);
    }

    for row in 0..=cell_grid.rows {
        let y = metrics.offset_y + row as f32 * metrics.cell_step;
        macroquad::shapes::draw_line(metrics.offset_x, y, right, y, 1.0, color);
    }
}

fn draw_paused_indicator(metrics: &SceneMetrics) {
    let color = macroquad::color::Color::new(1.0, 1.0, 1.0, 0.6);
    let bar_width = 8.0;
    let bar_height = 28.0;
    let x = metrics.offset_x + 16.0;
    let y = metrics.offset_y + 16.0;
    macroquad::shapes::draw_rectangle(x, y, bar_width, bar_height, color);
    macroquad::shapes::draw_rectangle(x + bar_width * 2.0, y, bar_width, bar_height, color);
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
