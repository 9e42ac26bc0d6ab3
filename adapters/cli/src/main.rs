#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Life Canvas experience.

mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use life_canvas_rendering::{
    CellGridPresentation, Color, ControlPanelView, Presentation, RenderingBackend, Scene,
};
use life_canvas_rendering_macroquad::MacroquadBackend;
use life_canvas_system_seeding::Seeding;
use life_canvas_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{
    config::{ConfigFile, Overrides, Settings},
    simulation::Simulation,
};

const CONTROL_PANEL_WIDTH: u32 = 220;
const BACKGROUND_COLOR: Color = Color::from_rgb_u8(22, 22, 30);
const CELL_COLOR: Color = Color::from_rgb_u8(236, 236, 240);
const LINE_COLOR: Color = Color::from_rgb_u8(255, 255, 255);
const PANEL_COLOR: Color = Color::from_rgb_u8(34, 34, 44);

/// Interactive Conway's Game of Life canvas.
#[derive(Debug, Parser)]
#[command(name = "life-canvas", version, about)]
struct Cli {
    /// TOML configuration file; flags override its values.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Side length of a cell in pixels.
    #[arg(long, value_name = "PIXELS")]
    cell_size: Option<u32>,
    /// Time between automatic generation steps while running.
    #[arg(long, value_name = "MILLISECONDS")]
    step_interval_ms: Option<u64>,
    /// Viewport width in pixels.
    #[arg(long)]
    width: Option<u32>,
    /// Viewport height in pixels.
    #[arg(long)]
    height: Option<u32>,
    /// Probability in [0, 1] that a cell starts alive.
    #[arg(long, value_name = "DENSITY")]
    soup_density: Option<f64>,
    /// Seed for the random soup.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,
    /// Log frame timing once per second.
    #[arg(long)]
    show_fps: bool,
    /// Step the given number of generations without opening a window.
    #[arg(long, value_name = "GENERATIONS")]
    headless: Option<u64>,
    /// In headless mode, check every generation against full-grid evaluation.
    #[arg(long, requires = "headless")]
    verify: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            cell_size: self.cell_size,
            step_interval_ms: self.step_interval_ms,
            width: self.width,
            height: self.height,
            soup_density: self.soup_density,
            rng_seed: self.seed,
        }
    }
}

/// Entry point for the Life Canvas command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };
    let settings = Settings::resolve(file, cli.overrides())?;
    let size = settings.grid_size()?;
    let seeding = Seeding::new(settings.seed_plan.clone()).context("invalid seed plan")?;

    let mut simulation = Simulation::new(size, settings.step_interval);
    info!(
        banner = query::welcome_banner(simulation.world()),
        columns = size.columns(),
        rows = size.rows(),
        step_interval_ms = settings.step_interval.as_millis() as u64,
        "starting"
    );
    let seed_events = simulation.seed(&seeding);

    if let Some(generations) = cli.headless {
        return simulation.run_headless(generations, cli.verify);
    }

    let cell_grid =
        CellGridPresentation::new(size, settings.cell_size as f32, LINE_COLOR, CELL_COLOR)
            .context("failed to describe cell grid")?;
    let mut scene = Scene::new(
        cell_grid,
        Some(ControlPanelView::new(CONTROL_PANEL_WIDTH as f32, PANEL_COLOR)),
    );
    scene.apply_events(&seed_events);

    let (width, height) = settings.viewport;
    let presentation = Presentation::new(
        "Life Canvas",
        (width.saturating_add(CONTROL_PANEL_WIDTH), height),
        BACKGROUND_COLOR,
        scene,
    );

    MacroquadBackend::new()
        .with_vsync(cli.vsync)
        .with_show_fps(cli.show_fps)
        .run(presentation, move |dt, input, scene| {
            simulation.advance(dt, input, scene);
        })
        .context("rendering backend failed")
}
