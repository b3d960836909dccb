//! Configuration loading for marga-nav.
//!
//! Every section and key is optional; missing values fall back to the
//! defaults below. Geometry is only accepted after [`NavConfig::validate`]
//! and [`NavConfig::resolve_geometry`] succeed.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::core::Cell;
use crate::error::{ConfigError, NavError, Result};
use crate::grid::OccupancyGrid;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Grid geometry
#[derive(Clone, Debug, Deserialize)]
pub struct GridConfig {
    /// Number of rows (ignored when `layout` is set)
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Number of columns (ignored when `layout` is set)
    #[serde(default = "default_cols")]
    pub cols: usize,

    /// Cell edge length in grid-pixel units
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,

    /// Add the built-in demo walls (ignored when `layout` is set)
    #[serde(default = "default_demo_walls")]
    pub demo_walls: bool,

    /// ASCII layout, one string per row: `#` wall, `.` free
    #[serde(default)]
    pub layout: Option<Vec<String>>,

    /// Extra wall cells as `[row, col]`
    #[serde(default)]
    pub walls: Vec<[i32; 2]>,

    /// Start cell `[row, col]` (default: `[rows - 2, 2]`)
    #[serde(default)]
    pub start: Option<[i32; 2]>,

    /// Goal cell `[row, col]` (default: `[2, cols - 3]`)
    #[serde(default)]
    pub goal: Option<[i32; 2]>,
}

/// Simulated range sensor
#[derive(Clone, Debug, Deserialize)]
pub struct SensorConfig {
    /// Maximum ray length in cells
    #[serde(default = "default_range_cells")]
    pub range_cells: u32,

    /// Angle between neighbouring rays (degrees)
    #[serde(default = "default_angle_step")]
    pub angle_step_deg: u32,

    /// Sweep phase advance per scan (degrees)
    #[serde(default = "default_rotation_step")]
    pub rotation_step_deg: f32,
}

/// Dynamic obstacles
#[derive(Clone, Debug, Deserialize)]
pub struct ObstacleConfig {
    /// Spawn obstacles at construction and on reset
    #[serde(default = "default_obstacles_enabled")]
    pub enabled: bool,

    /// Number of obstacles to spawn
    #[serde(default = "default_obstacle_count")]
    pub count: usize,

    /// Seconds of simulation time between random-walk steps
    #[serde(default = "default_move_interval")]
    pub move_interval_secs: f32,

    /// Probability that an obstacle skips its move on a step
    #[serde(default = "default_stay_probability")]
    pub stay_probability: f32,
}

/// Agent motion
#[derive(Clone, Debug, Deserialize)]
pub struct AgentConfig {
    /// Travel speed (grid-pixel units per second)
    #[serde(default = "default_speed")]
    pub speed: f32,

    /// Distance at which a cell centre counts as reached
    #[serde(default = "default_arrival_tolerance")]
    pub arrival_tolerance: f32,

    /// Pause at the goal before planning the return leg (seconds)
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: f32,
}

/// Run-level settings
#[derive(Clone, Debug, Deserialize)]
pub struct SimulationConfig {
    /// RNG seed (0 = fresh entropy each run)
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,

    /// Fixed tick rate used by the runners (Hz)
    #[serde(default = "default_tick_hz")]
    pub tick_hz: f32,

    /// Event log capacity (oldest entries are evicted)
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Number of recent events included in a frame snapshot
    #[serde(default = "default_frame_events")]
    pub frame_events: usize,

    /// Simulation time limit for the headless runner (seconds)
    #[serde(default = "default_max_duration")]
    pub max_duration_secs: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            rows: default_rows(),
            cols: default_cols(),
            cell_size: default_cell_size(),
            demo_walls: default_demo_walls(),
            layout: None,
            walls: Vec::new(),
            start: None,
            goal: None,
        }
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            range_cells: default_range_cells(),
            angle_step_deg: default_angle_step(),
            rotation_step_deg: default_rotation_step(),
        }
    }
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            enabled: default_obstacles_enabled(),
            count: default_obstacle_count(),
            move_interval_secs: default_move_interval(),
            stay_probability: default_stay_probability(),
        }
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            arrival_tolerance: default_arrival_tolerance(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            random_seed: default_random_seed(),
            tick_hz: default_tick_hz(),
            event_capacity: default_event_capacity(),
            frame_events: default_frame_events(),
            max_duration_secs: default_max_duration(),
        }
    }
}

// Default value functions
fn default_rows() -> usize {
    14
}
fn default_cols() -> usize {
    20
}
fn default_cell_size() -> f32 {
    36.0
}
fn default_demo_walls() -> bool {
    true
}
fn default_range_cells() -> u32 {
    5
}
fn default_angle_step() -> u32 {
    6
}
fn default_rotation_step() -> f32 {
    6.0
}
fn default_obstacles_enabled() -> bool {
    true
}
fn default_obstacle_count() -> usize {
    10
}
fn default_move_interval() -> f32 {
    0.8
}
fn default_stay_probability() -> f32 {
    0.4
}
fn default_speed() -> f32 {
    140.0
}
fn default_arrival_tolerance() -> f32 {
    4.0
}
fn default_settle_delay() -> f32 {
    0.6
}
fn default_random_seed() -> u64 {
    42
}
fn default_tick_hz() -> f32 {
    60.0
}
fn default_event_capacity() -> usize {
    64
}
fn default_frame_events() -> usize {
    6
}
fn default_max_duration() -> f32 {
    120.0
}

/// Validated grid plus endpoints.
#[derive(Clone, Debug)]
pub struct Geometry {
    pub grid: OccupancyGrid,
    pub start: Cell,
    pub goal: Cell,
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: NavConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Check scalar parameters. Geometry is checked by [`Self::resolve_geometry`].
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        positive("grid.cell_size", self.grid.cell_size)?;
        positive("agent.speed", self.agent.speed)?;
        positive("agent.arrival_tolerance", self.agent.arrival_tolerance)?;
        positive("obstacles.move_interval_secs", self.obstacles.move_interval_secs)?;
        positive("simulation.tick_hz", self.simulation.tick_hz)?;
        positive("simulation.max_duration_secs", self.simulation.max_duration_secs)?;
        self.run_limit()?;
        if self.agent.settle_delay_secs < 0.0 || !self.agent.settle_delay_secs.is_finite() {
            return Err(ConfigError::NotPositive {
                field: "agent.settle_delay_secs",
                value: self.agent.settle_delay_secs as f64,
            });
        }
        if self.simulation.event_capacity == 0 {
            return Err(ConfigError::NotPositive {
                field: "simulation.event_capacity",
                value: 0.0,
            });
        }
        let p = self.obstacles.stay_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::NotProbability {
                field: "obstacles.stay_probability",
                value: p as f64,
            });
        }
        let step = self.sensor.angle_step_deg;
        if step == 0 || step > 360 {
            return Err(ConfigError::BadAngleStep(step));
        }
        if self.sensor.range_cells == 0 {
            return Err(ConfigError::ZeroRange);
        }
        // Zero and negative rotation are fine; the phase wraps either way.
        let rotation = self.sensor.rotation_step_deg;
        if !rotation.is_finite() {
            return Err(ConfigError::NotFinite {
                field: "sensor.rotation_step_deg",
                value: rotation as f64,
            });
        }
        Ok(())
    }

    /// Wall-clock limit for a run, as a [`Duration`].
    pub fn run_limit(&self) -> std::result::Result<Duration, ConfigError> {
        let secs = self.simulation.max_duration_secs;
        Duration::try_from_secs_f32(secs).map_err(|_| ConfigError::TooLarge {
            field: "simulation.max_duration_secs",
            value: secs as f64,
        })
    }

    /// Build the static grid and check start/goal against it.
    pub fn resolve_geometry(&self) -> std::result::Result<Geometry, ConfigError> {
        let g = &self.grid;
        let base = match &g.layout {
            Some(rows) => OccupancyGrid::from_ascii(rows)?,
            None if g.demo_walls => OccupancyGrid::demo(g.rows, g.cols)?,
            None => OccupancyGrid::new(g.rows, g.cols)?,
        };

        let (rows, cols) = (base.rows(), base.cols());
        for &wall in &g.walls {
            check_bounds("wall", Cell::from(wall), &base)?;
        }
        let grid = base.with_walls(g.walls.iter().copied().map(Cell::from));

        let start = g
            .start
            .map(Cell::from)
            .unwrap_or_else(|| Cell::new(rows as i32 - 2, 2));
        let goal = g
            .goal
            .map(Cell::from)
            .unwrap_or_else(|| Cell::new(2, cols as i32 - 3));

        for (which, cell) in [("start", start), ("goal", goal)] {
            check_bounds(which, cell, &grid)?;
            if grid.is_wall(cell) {
                return Err(ConfigError::OnWall { which, cell });
            }
        }

        Ok(Geometry { grid, start, goal })
    }

    /// Validate everything and return the geometry, as a crate error.
    pub fn build(&self) -> Result<Geometry> {
        self.validate()?;
        self.resolve_geometry().map_err(NavError::from)
    }
}

fn positive(field: &'static str, value: f32) -> std::result::Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NotPositive {
            field,
            value: value as f64,
        })
    }
}

fn check_bounds(
    which: &'static str,
    cell: Cell,
    grid: &OccupancyGrid,
) -> std::result::Result<(), ConfigError> {
    if grid.contains(cell) {
        Ok(())
    } else {
        Err(ConfigError::OutOfBounds {
            which,
            cell,
            rows: grid.rows(),
            cols: grid.cols(),
        })
    }
}
