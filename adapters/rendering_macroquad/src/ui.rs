//! Immediate-mode UI helpers for the Macroquad rendering backend.
//!
//! This module hosts all uses of `macroquad::ui` so the rest of the adapter can
//! remain agnostic of Macroquad's UI types.

use life_canvas_core::PlayState;
use macroquad::{
    color::{Color, WHITE},
    math::{RectOffset, Vec2},
    ui::{hash, Ui},
};

const INSTRUCTIONS: [&str; 5] = [
    "Left drag: draw",
    "Right drag: erase",
    "Space: play / pause",
    "N: step once",
    "Left / Right: zoom",
];

/// Buttons pressed in the control panel during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ControlPanelUiResult {
    /// Whether the play/pause button was pressed.
    pub toggle_play_pressed: bool,
    /// Whether the step button was pressed.
    pub step_pressed: bool,
    /// Whether the clear button was pressed.
    pub clear_pressed: bool,
}

/// Snapshot of the control panel's UI layout and data for the current frame.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ControlPanelUiContext {
    /// Top-left corner of the panel in screen coordinates.
    pub origin: Vec2,
    /// Panel dimensions in screen space.
    pub size: Vec2,
    /// Background colour applied to the window skin so the UI matches the
    /// adapter's solid rectangle.
    pub background: Color,
    /// Current play state, displayed as a status label.
    pub play_state: PlayState,
    /// Generation counter mirrored by the scene.
    pub generation: u64,
    /// Live cell count mirrored by the scene.
    pub population: usize,
    /// Current zoom factor.
    pub zoom: f32,
}

/// Renders the control panel's interactive elements for the current frame.
pub(crate) fn draw_control_panel_ui(
    ui: &mut Ui,
    context: ControlPanelUiContext,
) -> ControlPanelUiResult {
    let mut skin = ui.default_skin();
    skin.margin = 0.0;

    let window_style = ui
        .style_builder()
        .color(context.background)
        .color_hovered(context.background)
        .color_clicked(context.background)
        .color_selected(context.background)
        .color_selected_hovered(context.background)
        .color_inactive(context.background)
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(16.0, 16.0, 16.0, 16.0))
        .build();
    skin.window_style = window_style;

    let label_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .margin(RectOffset::new(0.0, 0.0, 4.0, 4.0))
        .build();
    skin.label_style = label_style;

    let button_style = ui
        .style_builder()
        .text_color(WHITE)
        .text_color_hovered(WHITE)
        .text_color_clicked(WHITE)
        .color(Color::from_rgba(70, 70, 70, 255))
        .color_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_clicked(Color::from_rgba(56, 56, 56, 255))
        .color_selected(Color::from_rgba(70, 70, 70, 255))
        .color_selected_hovered(Color::from_rgba(96, 96, 96, 255))
        .color_inactive(Color::from_rgba(56, 56, 56, 200))
        .margin(RectOffset::new(0.0, 0.0, 8.0, 8.0))
        .build();
    skin.button_style = button_style;

    ui.push_skin(&skin);

    let mut result = ControlPanelUiResult::default();
    let _ = ui.window(hash!("control_panel"), context.origin, context.size, |ui| {
        let state_label = match context.play_state {
            PlayState::Paused => "State: Paused",
            PlayState::Running => "State: Running",
        };
        ui.label(None, state_label);
        ui.label(None, &format!("Generation: {}", context.generation));
        ui.label(None, &format!("Population: {}", context.population));
        ui.label(None, &format!("Zoom: {:.1}x", context.zoom));

        let toggle_text = match context.play_state {
            PlayState::Paused => "Play",
            PlayState::Running => "Pause",
        };
        result.toggle_play_pressed = ui.button(None, toggle_text);
        result.step_pressed = ui.button(None, "Step");
        result.clear_pressed = ui.button(None, "Clear");

        ui.separator();
        for line in INSTRUCTIONS {
            ui.label(None, line);
        }
    });

    ui.pop_skin();

    result
}
