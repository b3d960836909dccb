//! Real-time two-thread driver.
//!
//! - Environment thread: clock, obstacle cadence, sensor sweep
//! - Motion thread: controller ticks; plans off the lock
//!
//! Both share one `parking_lot::Mutex` held for a single tick at a time.
//! Planning runs on an owned occupancy snapshot while the lock is released,
//! and a result that arrives after `stop`/`reset` is discarded by the
//! controller's epoch check.

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::error::{ConfigError, Result};
use crate::navigation::PlanningMode;
use crate::simulation::Simulation;

/// Simulation shared between threads
pub type SharedSimulation = Arc<Mutex<Simulation>>;

/// Handles of the running threads.
pub struct SimThreads {
    pub environment: JoinHandle<()>,
    pub motion: JoinHandle<()>,
    shutdown: Arc<AtomicBool>,
}

impl SimThreads {
    /// Ask both threads to exit after their current tick.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Shut down and wait for both threads.
    pub fn join(self) {
        self.shutdown();
        if self.environment.join().is_err() {
            tracing::error!("environment thread panicked");
        }
        if self.motion.join().is_err() {
            tracing::error!("motion thread panicked");
        }
    }
}

/// Spawn the environment and motion threads at `tick_hz`.
///
/// Switches the controller to deferred planning.
pub fn spawn_threads(sim: SharedSimulation, tick_hz: f32) -> Result<SimThreads> {
    let period = Duration::try_from_secs_f32(1.0 / tick_hz).map_err(|_| ConfigError::TooLarge {
        field: "simulation.tick_hz period",
        value: 1.0 / tick_hz as f64,
    })?;
    let dt = period.as_secs_f32();
    let shutdown = Arc::new(AtomicBool::new(false));

    sim.lock().set_planning_mode(PlanningMode::Deferred);

    let env_sim = Arc::clone(&sim);
    let env_shutdown = Arc::clone(&shutdown);
    let environment = thread::Builder::new()
        .name("environment".into())
        .spawn(move || {
            info!("environment thread started ({:.0} Hz)", 1.0 / dt);
            while !env_shutdown.load(Ordering::SeqCst) {
                let tick_start = Instant::now();
                env_sim.lock().environment_tick(dt);
                pace(tick_start, period);
            }
            debug!("environment thread exiting");
        })?;

    let motion_sim = Arc::clone(&sim);
    let motion_shutdown = Arc::clone(&shutdown);
    let motion = thread::Builder::new()
        .name("motion".into())
        .spawn(move || {
            info!("motion thread started");
            while !motion_shutdown.load(Ordering::SeqCst) {
                let tick_start = Instant::now();
                let job = {
                    let mut sim = motion_sim.lock();
                    sim.motion_tick(dt);
                    sim.take_plan_job()
                };
                if let Some(job) = job {
                    let path = job.run();
                    let applied = motion_sim.lock().resolve_plan(job.ticket, path);
                    debug!("{:?} plan applied: {}", job.ticket.purpose, applied);
                }
                pace(tick_start, period);
            }
            debug!("motion thread exiting");
        });

    let motion = match motion {
        Ok(handle) => handle,
        Err(e) => {
            shutdown.store(true, Ordering::SeqCst);
            let _ = environment.join();
            return Err(e.into());
        }
    };

    Ok(SimThreads {
        environment,
        motion,
        shutdown,
    })
}

fn pace(tick_start: Instant, period: Duration) {
    if let Some(remaining) = period.checked_sub(tick_start.elapsed()) {
        thread::sleep(remaining);
    }
}
