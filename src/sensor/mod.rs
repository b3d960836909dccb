//! Simulated range sensor.
//!
//! A lidar-like sweep: rays every `angle_step_deg` degrees, each walking
//! outward one cell length at a time up to `range_cells`. The phase offset
//! advances after every sweep and wraps at 360°.
//!
//! ```text
//!         ·  ·  ·
//!       ·  \ | /  ·      rays stop on the first occupied cell (detected)
//!       · ── ● ── ■      or at the border / max range (not detected)
//!       ·  / | \  ·
//!         ·  ·  ·
//! ```

mod sweep;

pub use sweep::{Ray, SensorSweep, SweepResult};
