//! Startup configuration: an optional TOML file overlaid by command-line flags.

use std::{fs, path::Path, time::Duration};

use anyhow::{bail, Context, Result};
use life_canvas_core::{CellCoord, GridSize};
use life_canvas_system_seeding::{PatternPlacement, SeedPlan};
use serde::Deserialize;

const DEFAULT_CELL_SIZE: u32 = 16;
const DEFAULT_STEP_INTERVAL_MS: u64 = 100;
const DEFAULT_VIEWPORT: (u32, u32) = (1280, 720);
const MAX_VIEWPORT_SIDE: u32 = 8_192;

/// Raw contents of a configuration file. Every field is optional so flags
/// can fill the gaps.
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ConfigFile {
    cell_size: Option<u32>,
    step_interval_ms: Option<u64>,
    #[serde(default)]
    viewport: ViewportSection,
    #[serde(default)]
    seed: SeedSection,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct ViewportSection {
    width: Option<u32>,
    height: Option<u32>,
}

#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedSection {
    soup_density: Option<f64>,
    rng_seed: Option<u64>,
    #[serde(default)]
    cells: Vec<CellCoord>,
    #[serde(default)]
    patterns: Vec<PatternPlacement>,
}

impl ConfigFile {
    /// Reads and parses the configuration file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid config file at {}", path.display()))
    }

    /// Parses configuration from TOML text.
    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse config toml contents")
    }
}

/// Values supplied on the command line; each one wins over the file.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Overrides {
    pub(crate) cell_size: Option<u32>,
    pub(crate) step_interval_ms: Option<u64>,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) soup_density: Option<f64>,
    pub(crate) rng_seed: Option<u64>,
}

/// Fully resolved and validated startup settings.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) cell_size: u32,
    pub(crate) step_interval: Duration,
    pub(crate) viewport: (u32, u32),
    pub(crate) seed_plan: SeedPlan,
}

impl Settings {
    /// Merges defaults, the file and flag overrides, in increasing priority.
    pub(crate) fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let cell_size = overrides
            .cell_size
            .or(file.cell_size)
            .unwrap_or(DEFAULT_CELL_SIZE);
        if cell_size == 0 {
            bail!("cell size must be positive");
        }

        let step_interval_ms = overrides
            .step_interval_ms
            .or(file.step_interval_ms)
            .unwrap_or(DEFAULT_STEP_INTERVAL_MS);
        if step_interval_ms == 0 {
            bail!("step interval must be at least one millisecond");
        }

        let width = overrides
            .width
            .or(file.viewport.width)
            .unwrap_or(DEFAULT_VIEWPORT.0);
        let height = overrides
            .height
            .or(file.viewport.height)
            .unwrap_or(DEFAULT_VIEWPORT.1);
        if width == 0 || height == 0 {
            bail!("viewport must have a positive area (received {width}x{height})");
        }
        if width > MAX_VIEWPORT_SIDE || height > MAX_VIEWPORT_SIDE {
            bail!(
                "viewport {width}x{height} exceeds the {MAX_VIEWPORT_SIDE} pixel limit per side"
            );
        }

        let soup_density = overrides
            .soup_density
            .or(file.seed.soup_density)
            .unwrap_or(0.0);
        if !(0.0..=1.0).contains(&soup_density) {
            bail!("soup density {soup_density} must lie within [0, 1]");
        }

        Ok(Self {
            cell_size,
            step_interval: Duration::from_millis(step_interval_ms),
            viewport: (width, height),
            seed_plan: SeedPlan {
                soup_density,
                rng_seed: overrides.rng_seed.or(file.seed.rng_seed).unwrap_or(0),
                cells: file.seed.cells,
                patterns: file.seed.patterns,
            },
        })
    }

    /// Grid dimensions covering the viewport.
    pub(crate) fn grid_size(&self) -> Result<GridSize> {
        GridSize::from_viewport(self.viewport.0, self.viewport.1, self.cell_size)
            .context("failed to derive grid size from viewport")
    }
}
