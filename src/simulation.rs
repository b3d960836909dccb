//! Simulation aggregate.
//!
//! Owns every piece of mutable state and sequences one tick:
//! clock → obstacle cadence → sensor sweep → controller. Renderers and
//! loggers read owned [`Frame`] snapshots; UI input goes through the control
//! methods.

use crossbeam_channel::Receiver;
use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::config::NavConfig;
use crate::core::Cell;
use crate::error::Result;
use crate::events::{Event, EventKind, EventSink};
use crate::grid::{CompositeOccupancy, OccupancyGrid, OccupancySnapshot};
use crate::navigation::{
    AgentState, CommandOutcome, ControllerStats, NavContext, NavigationController, Phase,
    PlanTicket, PlanningMode,
};
use crate::obstacles::{DynamicObstacles, NoiseGenerator};
use crate::planning::{AStarPlanner, Path};
use crate::sensor::{Ray, SensorSweep, SweepResult};

/// Everything the controller observes.
struct Environment {
    grid: Arc<OccupancyGrid>,
    obstacles: DynamicObstacles,
    noise: NoiseGenerator,
    sensor: SensorSweep,
    /// Last sweep; its detected set is replaced every tick
    sweep: SweepResult,
    events: EventSink,
    /// Simulation seconds
    clock: f64,
}

impl Environment {
    fn nav_context(&mut self) -> NavContext<'_> {
        NavContext {
            view: CompositeOccupancy::new(&self.grid, self.obstacles.cells(), &self.sweep.detected),
            events: &mut self.events,
            time: self.clock,
        }
    }

    fn notice(&mut self, message: String) {
        self.events.push(self.clock, EventKind::Notice, Some(message));
    }
}

/// A planning request taken out of the simulation for off-lock planning.
#[derive(Clone, Debug)]
pub struct PlanJob {
    pub ticket: PlanTicket,
    /// Composite occupancy at the time the job was taken
    pub snapshot: OccupancySnapshot,
    planner: AStarPlanner,
}

impl PlanJob {
    /// Plan the ticket against the snapshot.
    pub fn run(&self) -> Path {
        self.planner
            .find_path(self.ticket.from, self.ticket.to, &self.snapshot)
            .path
    }
}

/// Owned per-frame snapshot for renderers.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub time: f64,
    pub tick: u64,
    pub grid: Arc<OccupancyGrid>,
    pub cell_size: f32,
    pub start: Cell,
    pub goal: Cell,
    pub obstacles: Vec<Cell>,
    pub agent: AgentState,
    pub detected: Vec<Cell>,
    pub rays: Vec<Ray>,
    pub sensor_phase_deg: f32,
    /// Most recent events, oldest first
    pub events: Vec<Event>,
    pub stats: ControllerStats,
}

/// The navigation simulator.
pub struct Simulation {
    config: NavConfig,
    start: Cell,
    goal: Cell,
    env: Environment,
    controller: NavigationController,
    ticks: u64,
}

impl Simulation {
    /// Validate `config`, build the grid and seed the obstacles.
    pub fn new(config: NavConfig) -> Result<Self> {
        let geometry = config.build()?;
        let (start, goal) = (geometry.start, geometry.goal);
        let cell_size = config.grid.cell_size;

        let mut env = Environment {
            grid: Arc::new(geometry.grid),
            obstacles: DynamicObstacles::new(config.obstacles.clone(), start, goal),
            noise: NoiseGenerator::new(config.simulation.random_seed),
            sensor: SensorSweep::new(config.sensor.clone()),
            sweep: SweepResult::default(),
            events: EventSink::new(config.simulation.event_capacity),
            clock: 0.0,
        };
        if config.obstacles.enabled {
            env.obstacles
                .spawn(config.obstacles.count, &env.grid, &[start, goal], &mut env.noise);
        }

        let controller = NavigationController::new(config.agent.clone(), cell_size, start, goal);

        info!(
            "Simulation ready: {}x{} grid, start {}, goal {}, {} dynamic obstacles",
            env.grid.rows(),
            env.grid.cols(),
            start,
            goal,
            env.obstacles.len()
        );

        Ok(Self {
            config,
            start,
            goal,
            env,
            controller,
            ticks: 0,
        })
    }

    /// Full tick: environment then motion.
    pub fn tick(&mut self, dt: f32) {
        self.environment_tick(dt);
        self.motion_tick(dt);
    }

    /// Advance the clock, the obstacle cadence and the sensor sweep.
    pub fn environment_tick(&mut self, dt: f32) {
        let env = &mut self.env;
        env.clock += dt as f64;
        self.ticks += 1;
        env.obstacles.advance(dt, &env.grid, &mut env.noise);
        env.sweep = env.sensor.scan(
            self.controller.state().position,
            self.config.grid.cell_size,
            &env.grid,
            env.obstacles.cells(),
        );
    }

    /// Advance the controller against the current occupancy.
    pub fn motion_tick(&mut self, dt: f32) {
        self.controller.advance(dt, &mut self.env.nav_context());
    }

    // ---- control surface ----

    pub fn start(&mut self) -> CommandOutcome {
        self.controller.start(&mut self.env.nav_context())
    }

    pub fn pause(&mut self) -> CommandOutcome {
        self.controller.pause(&mut self.env.nav_context())
    }

    pub fn resume(&mut self) -> CommandOutcome {
        self.controller.resume(&mut self.env.nav_context())
    }

    pub fn toggle_pause(&mut self) -> CommandOutcome {
        self.controller.toggle_pause(&mut self.env.nav_context())
    }

    pub fn stop(&mut self) -> CommandOutcome {
        self.controller.stop(&mut self.env.nav_context())
    }

    /// Reseed obstacles, put the agent back on the start cell, go Idle.
    pub fn reset(&mut self) {
        self.controller.reset();
        let env = &mut self.env;
        env.obstacles.clear();
        if self.config.obstacles.enabled {
            env.obstacles.spawn(
                self.config.obstacles.count,
                &env.grid,
                &[self.start, self.goal],
                &mut env.noise,
            );
        }
        env.sensor.reset();
        env.sweep = SweepResult::default();
        let count = env.obstacles.len();
        env.notice(format!("Simulation reset ({} dynamic obstacles)", count));
    }

    /// Clear the obstacles if there are any, otherwise spawn a fresh set.
    pub fn toggle_dynamic_obstacles(&mut self) -> usize {
        let agent = self.controller.state().cell;
        let env = &mut self.env;
        let was_empty = env.obstacles.is_empty();
        let count = env.obstacles.toggle(&env.grid, &[self.start, self.goal, agent], &mut env.noise);
        if was_empty {
            env.notice(format!("Dynamic obstacles on ({})", count));
        } else {
            env.notice("Dynamic obstacles off".to_string());
        }
        count
    }

    /// Put an obstacle on a specific cell (walls, start, goal refused).
    pub fn place_obstacle(&mut self, cell: Cell) -> bool {
        self.env.obstacles.place(cell, &self.env.grid)
    }

    // ---- deferred planning ----

    pub fn set_planning_mode(&mut self, mode: PlanningMode) {
        self.controller.set_mode(mode);
    }

    /// Take the pending plan request with a snapshot of current occupancy.
    pub fn take_plan_job(&mut self) -> Option<PlanJob> {
        let ticket = self.controller.take_plan_request()?;
        let ctx = self.env.nav_context();
        Some(PlanJob {
            ticket,
            snapshot: ctx.view.snapshot(),
            planner: self.controller.planner().clone(),
        })
    }

    /// Hand back a path computed for `ticket`. Stale tickets are ignored.
    pub fn resolve_plan(&mut self, ticket: PlanTicket, path: Path) -> bool {
        self.controller
            .resolve_plan(ticket, path, &mut self.env.nav_context())
    }

    // ---- read surface ----

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    pub fn grid(&self) -> &Arc<OccupancyGrid> {
        &self.env.grid
    }

    pub fn start_cell(&self) -> Cell {
        self.start
    }

    pub fn goal_cell(&self) -> Cell {
        self.goal
    }

    pub fn controller(&self) -> &NavigationController {
        &self.controller
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn agent(&self) -> &AgentState {
        self.controller.state()
    }

    pub fn obstacles(&self) -> &BTreeSet<Cell> {
        self.env.obstacles.cells()
    }

    pub fn detected(&self) -> &BTreeSet<Cell> {
        &self.env.sweep.detected
    }

    pub fn last_sweep(&self) -> &SweepResult {
        &self.env.sweep
    }

    pub fn events(&self) -> &EventSink {
        &self.env.events
    }

    /// Subscribe to future events through a bounded queue.
    pub fn subscribe(&mut self, capacity: usize) -> Receiver<Event> {
        self.env.events.subscribe(capacity)
    }

    /// Simulation time in seconds
    pub fn clock(&self) -> f64 {
        self.env.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Owned snapshot for rendering.
    pub fn frame(&self) -> Frame {
        let env = &self.env;
        Frame {
            time: env.clock,
            tick: self.ticks,
            grid: Arc::clone(&env.grid),
            cell_size: self.config.grid.cell_size,
            start: self.start,
            goal: self.goal,
            obstacles: env.obstacles.cells().iter().copied().collect(),
            agent: self.controller.state().clone(),
            detected: env.sweep.detected.iter().copied().collect(),
            rays: env.sweep.rays.clone(),
            sensor_phase_deg: env.sensor.phase_deg(),
            events: env.events.recent(self.config.simulation.frame_events),
            stats: self.controller.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_config(rows: usize, cols: usize) -> NavConfig {
        let mut config = NavConfig::default();
        config.grid.rows = rows;
        config.grid.cols = cols;
        config.grid.demo_walls = false;
        config.grid.start = Some([0, 0]);
        config.grid.goal = Some([rows as i32 - 1, cols as i32 - 1]);
        config.obstacles.enabled = false;
        config
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = open_config(5, 5);
        config.grid.goal = Some([9, 9]);
        assert!(Simulation::new(config).is_err());
    }

    #[test]
    fn test_default_config_seeds_obstacles() {
        let sim = Simulation::new(NavConfig::default()).unwrap();
        assert_eq!(sim.obstacles().len(), 10);
        assert!(!sim.obstacles().contains(&sim.start_cell()));
        assert!(!sim.obstacles().contains(&sim.goal_cell()));
        assert_eq!(sim.phase(), Phase::Idle);
    }

    #[test]
    fn test_tick_sweeps_and_advances_clock() {
        let mut sim = Simulation::new(open_config(5, 5)).unwrap();
        sim.tick(0.5);
        sim.tick(0.5);
        approx::assert_relative_eq!(sim.clock(), 1.0);
        assert_eq!(sim.ticks(), 2);
        assert_eq!(sim.last_sweep().rays.len(), 60);
    }

    #[test]
    fn test_detected_cells_are_replaced() {
        let mut config = open_config(5, 5);
        config.grid.goal = Some([4, 0]);
        let mut sim = Simulation::new(config).unwrap();
        assert!(sim.place_obstacle(Cell::new(0, 2)));
        sim.tick(0.01);
        assert!(sim.detected().contains(&Cell::new(0, 2)));

        sim.toggle_dynamic_obstacles();
        assert!(sim.obstacles().is_empty());
        sim.tick(0.01);
        assert!(sim.detected().is_empty());
    }

    #[test]
    fn test_toggle_respawns_configured_count() {
        let mut config = open_config(6, 6);
        config.obstacles.count = 4;
        let mut sim = Simulation::new(config).unwrap();
        assert!(sim.obstacles().is_empty());
        assert_eq!(sim.toggle_dynamic_obstacles(), 4);
        assert!(!sim.obstacles().contains(&sim.agent().cell));
        assert_eq!(sim.toggle_dynamic_obstacles(), 0);
    }

    #[test]
    fn test_reset_clears_run_state() {
        let mut config = open_config(5, 5);
        config.obstacles.enabled = true;
        config.obstacles.count = 3;
        let mut sim = Simulation::new(config).unwrap();
        assert!(sim.start().is_applied() || sim.phase() == Phase::Idle);
        for _ in 0..40 {
            sim.tick(1.0 / 60.0);
        }
        let _ = sim.pause();
        sim.reset();

        assert_eq!(sim.phase(), Phase::Idle);
        assert!(!sim.agent().paused);
        assert!(sim.agent().path.is_empty());
        assert_eq!(sim.agent().cell, Cell::new(0, 0));
        assert!(sim.detected().is_empty());
        assert_eq!(sim.obstacles().len(), 3);
        assert_eq!(sim.events().last().map(|e| e.kind), Some(EventKind::Notice));
    }

    #[test]
    fn test_frame_serializes() {
        let mut sim = Simulation::new(NavConfig::default()).unwrap();
        let _ = sim.start();
        sim.tick(1.0 / 60.0);
        let frame = sim.frame();
        assert!(frame.events.len() <= 6);
        assert_eq!(frame.obstacles.len(), sim.obstacles().len());
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains("\"agent\""));
        assert!(json.contains("\"rays\""));
    }
}
