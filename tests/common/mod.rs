//! Shared harness for the integration scenarios.

#![allow(dead_code)]

use marga_nav::navigation::Phase;
use marga_nav::{Cell, EventKind, NavConfig, Simulation};

/// Fixed tick used by every scenario (60 Hz)
pub const DT: f32 = 1.0 / 60.0;

/// Upper bound on ticks for any single scenario
pub const MAX_TICKS: usize = 20_000;

/// Config for an ASCII layout with obstacles disabled.
pub fn layout_config(layout: &[&str], start: (i32, i32), goal: (i32, i32)) -> NavConfig {
    let mut config = NavConfig::default();
    config.grid.layout = Some(layout.iter().map(|row| row.to_string()).collect());
    config.grid.start = Some([start.0, start.1]);
    config.grid.goal = Some([goal.0, goal.1]);
    config.obstacles.enabled = false;
    config.simulation.event_capacity = 1024;
    config
}

/// Open `rows x cols` grid with obstacles disabled.
pub fn open_config(rows: usize, cols: usize, start: (i32, i32), goal: (i32, i32)) -> NavConfig {
    let row = ".".repeat(cols);
    let layout: Vec<&str> = (0..rows).map(|_| row.as_str()).collect();
    layout_config(&layout, start, goal)
}

/// Simulation wrapper recording phase changes.
pub struct Harness {
    pub sim: Simulation,
    pub phases: Vec<Phase>,
}

impl Harness {
    pub fn new(config: NavConfig) -> Self {
        let sim = Simulation::new(config).expect("valid scenario config");
        let phases = vec![sim.phase()];
        Self { sim, phases }
    }

    pub fn start(&mut self) {
        let outcome = self.sim.start();
        assert!(outcome.is_applied(), "start rejected: {:?}", outcome);
        self.record();
    }

    pub fn tick(&mut self) {
        self.sim.tick(DT);
        self.record();
    }

    /// Tick until `pred` holds; panics after [`MAX_TICKS`].
    pub fn tick_until<F: Fn(&Simulation) -> bool>(&mut self, pred: F) {
        for _ in 0..MAX_TICKS {
            if pred(&self.sim) {
                return;
            }
            self.tick();
        }
        panic!("condition not reached; phase {:?}", self.sim.phase());
    }

    /// Tick until the controller has nothing left to do.
    pub fn run_to_end(&mut self) {
        self.tick_until(|sim| sim.controller().is_settled());
    }

    /// Event kinds in order
    pub fn kinds(&self) -> Vec<EventKind> {
        self.sim.events().iter().map(|e| e.kind).collect()
    }

    /// Event kinds in order, control notices left out
    pub fn nav_kinds(&self) -> Vec<EventKind> {
        self.kinds()
            .into_iter()
            .filter(|k| *k != EventKind::Notice)
            .collect()
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.sim.events().count(kind)
    }

    pub fn path(&self) -> &[Cell] {
        &self.sim.agent().path
    }

    fn record(&mut self) {
        let phase = self.sim.phase();
        if self.phases.last() != Some(&phase) {
            self.phases.push(phase);
        }
    }
}
