//! Fixed-step driver without wall-clock pacing.

use serde::Serialize;
use tracing::{info, warn};

use crate::navigation::{CommandOutcome, ControllerStats, Phase};
use crate::simulation::Simulation;

/// Outcome of a headless run.
#[derive(Clone, Debug, Serialize)]
pub struct RunSummary {
    pub final_phase: Phase,
    /// Simulation seconds elapsed during the run
    pub sim_time: f64,
    pub ticks: u64,
    pub stats: ControllerStats,
    pub events_total: u64,
    /// The time limit was hit before the controller settled
    pub timed_out: bool,
}

/// Runs a simulation at a fixed `dt` as fast as possible.
pub struct HeadlessRunner {
    sim: Simulation,
    dt: f32,
    max_duration: f64,
}

impl HeadlessRunner {
    /// Tick rate and time limit come from the simulation config.
    pub fn new(sim: Simulation) -> Self {
        let cfg = &sim.config().simulation;
        let dt = 1.0 / cfg.tick_hz;
        let max_duration = cfg.max_duration_secs as f64;
        Self {
            sim,
            dt,
            max_duration,
        }
    }

    /// Override the time limit (simulation seconds)
    pub fn with_max_duration(mut self, secs: f64) -> Self {
        self.max_duration = secs;
        self
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Simulation {
        &mut self.sim
    }

    pub fn into_inner(self) -> Simulation {
        self.sim
    }

    /// Start navigation and tick until the controller settles.
    pub fn run(&mut self) -> RunSummary {
        self.run_with(|_| {})
    }

    /// Like [`run`](Self::run), calling `on_tick` after every tick.
    pub fn run_with<F: FnMut(&Simulation)>(&mut self, on_tick: F) -> RunSummary {
        if let CommandOutcome::Rejected(fault) = self.sim.start() {
            warn!("start rejected: {}", fault);
        }
        self.run_until_settled(on_tick)
    }

    /// Tick until the controller settles or the time limit is reached.
    pub fn run_until_settled<F: FnMut(&Simulation)>(&mut self, mut on_tick: F) -> RunSummary {
        let begin_time = self.sim.clock();
        let begin_ticks = self.sim.ticks();
        let mut timed_out = false;

        while !self.sim.controller().is_settled() {
            if self.sim.clock() - begin_time >= self.max_duration {
                timed_out = true;
                break;
            }
            self.sim.tick(self.dt);
            on_tick(&self.sim);
        }

        let summary = RunSummary {
            final_phase: self.sim.phase(),
            sim_time: self.sim.clock() - begin_time,
            ticks: self.sim.ticks() - begin_ticks,
            stats: self.sim.controller().stats(),
            events_total: self.sim.events().total(),
            timed_out,
        };
        if timed_out {
            warn!(
                "run timed out after {:.1}s in {:?}",
                summary.sim_time, summary.final_phase
            );
        } else {
            info!(
                "run finished in {:?} after {:.2}s ({} ticks, {} replans)",
                summary.final_phase, summary.sim_time, summary.ticks, summary.stats.replans
            );
        }
        summary
    }

    /// Tick a fixed number of times without issuing commands.
    pub fn step(&mut self, ticks: usize) {
        for _ in 0..ticks {
            self.sim.tick(self.dt);
        }
    }
}
