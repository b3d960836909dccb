//! Dynamic obstacles.
//!
//! - [`DynamicObstacles`]: the obstacle set, its spawn and random walk
//! - [`NoiseGenerator`]: seeded RNG (seed 0 = entropy)
//!
//! The walk runs on its own cadence (`move_interval_secs` of simulation
//! time), independent of the tick rate. All obstacles in one step are
//! checked against the set as it was when the step began.

mod mover;
mod noise;

pub use mover::DynamicObstacles;
pub use noise::NoiseGenerator;
