//! # Marga-Nav: Grid Navigation Simulator
//!
//! An agent drives from a start cell to a goal cell and back on a 2D
//! occupancy grid. Static walls, randomly-walking obstacles and a rotating
//! range sensor shape the occupancy it plans against; when the next cell on
//! its route becomes occupied it replans with A* from where it stands.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use marga_nav::{HeadlessRunner, NavConfig, Simulation};
//!
//! let sim = Simulation::new(NavConfig::default()).unwrap();
//! let mut runner = HeadlessRunner::new(sim);
//! let summary = runner.run();
//! println!("{:?} after {:.1}s, {} replans",
//!     summary.final_phase, summary.sim_time, summary.stats.replans);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: `Cell`, `WorldPoint`
//! - [`grid`]: static grid and the composite occupancy view
//! - [`planning`]: 4-connected A*
//! - [`sensor`]: rotating ray sweep
//! - [`obstacles`]: seeded random walk of dynamic obstacles
//! - [`navigation`]: phase machine, motion and replanning
//! - [`events`]: bounded event log with subscribers
//! - [`simulation`]: the owned aggregate and its tick
//! - [`runner`]: headless and threaded drivers
//! - [`announce`]: event phrases on a background thread
//!
//! ## Tick
//!
//! ```text
//!   clock += dt
//!       │
//!       ▼
//!   obstacles.advance ──► sensor.scan ──► controller.advance
//!   (every 0.8 s)         (detected set     │
//!                          replaced)        ├─ next cell occupied? ──► replan
//!                                           └─ move toward next centre
//! ```
//!
//! ## Coordinates
//!
//! Cells are `(row, col)` with rows growing downward. Continuous positions
//! are in grid-pixel units: `x` along columns, `y` along rows.

pub mod announce;
pub mod config;
pub mod core;
pub mod error;
pub mod events;
pub mod grid;
pub mod navigation;
pub mod obstacles;
pub mod planning;
pub mod runner;
pub mod sensor;
pub mod simulation;

pub use config::NavConfig;
pub use core::{Cell, WorldPoint};
pub use error::{ConfigError, NavError, NavFault, Result};
pub use events::{Event, EventKind, EventSink};
pub use grid::{CompositeOccupancy, OccupancyGrid, OccupancyView};
pub use navigation::{CommandOutcome, NavigationController, Phase, PlanningMode};
pub use planning::{AStarPlanner, PlanResult};
pub use runner::{HeadlessRunner, RunSummary, spawn_threads};
pub use simulation::{Frame, Simulation};
