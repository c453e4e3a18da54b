//! TOML configuration.
//!
//! ```toml
//! [filter]
//! num_particles = 500
//! seed = 42
//!
//! [filter.motion]
//! noise_stddev = 0.015
//!
//! [filter.sensor]
//! beam_angles = [0.0, 60.0, -60.0, 180.0]
//! aperture = 60.0
//! cone = "exact"
//!
//! [map]
//! rows = 7
//! cols = 14
//!
//! [simulation]
//! start_x = 1.0
//! start_y = 1.0
//! ```
//!
//! Every field is optional and falls back to its default. A top-level
//! `trace_file = "localization.out"` enables the particle trace.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::algorithms::localization::ParticleFilterConfig;
use crate::algorithms::mapping::{CELL_COLS, CELL_ROWS, GridMap};
use crate::error::{Error, Result};
use crate::io::simulated::SimulationConfig;

/// Sample 7x14 maze, top marker row first.
pub const SAMPLE_LAYOUT: [&str; 13] = [
    "         |           |     ",
    "          -                ",
    "   |                 |     ",
    "              -         - -",
    "   |                       ",
    "      - -                  ",
    "             |           | ",
    "                - - -      ",
    "             |           | ",
    "- -                   -    ",
    "       |       |           ",
    "          - -              ",
    "       |           |       ",
];

/// Maze description.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Cell rows
    pub rows: usize,
    /// Cell columns
    pub cols: usize,
    /// Treat the arena perimeter as wall
    pub boundary_walls: bool,
    /// Marker rows as drawn, top row first. Empty means no interior walls.
    pub layout: Vec<String>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            rows: CELL_ROWS,
            cols: CELL_COLS,
            boundary_walls: true,
            layout: Vec::new(),
        }
    }
}

impl MapConfig {
    /// The sample 7x14 maze.
    pub fn sample() -> Self {
        Self {
            layout: SAMPLE_LAYOUT.iter().map(|line| line.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Build the maze.
    pub fn build(&self) -> Result<GridMap> {
        let map = if self.layout.is_empty() {
            GridMap::empty(self.rows, self.cols)?
        } else {
            // GridMap wants the bottom marker row first
            let bottom_first: Vec<&str> = self.layout.iter().rev().map(String::as_str).collect();
            GridMap::from_rows(self.rows, self.cols, &bottom_first)?
        };
        Ok(map.with_boundary(self.boundary_walls))
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MclConfig {
    /// Particle filter, motion and sensor models
    pub filter: ParticleFilterConfig,
    /// Maze layout
    pub map: MapConfig,
    /// Simulated robot
    pub simulation: SimulationConfig,
    /// Append particle populations to this file after every step
    pub trace_file: Option<PathBuf>,
}

impl MclConfig {
    /// Parse and validate a TOML string.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = basic_toml::from_str(contents).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        let map = self.map.build()?;
        self.simulation.validate(&map)
    }
}
