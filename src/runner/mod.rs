//! Simulation drivers.
//!
//! - [`HeadlessRunner`]: single thread, fixed `dt`, no sleeping
//! - [`spawn_threads`]: environment + motion threads in real time

mod headless;
mod threads;

pub use headless::{HeadlessRunner, RunSummary};
pub use threads::{SharedSimulation, SimThreads, spawn_threads};
