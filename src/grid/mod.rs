//! Grid model.
//!
//! - [`OccupancyGrid`]: static walls, fixed for the whole run
//! - [`CompositeOccupancy`]: walls ∪ dynamic obstacles ∪ sensor detections,
//!   the blocking predicate handed to the planner
//! - [`OccupancySnapshot`]: owned copy of a composite view
//!
//! Out-of-bounds cells are never valid planning inputs; callers reject them
//! before they reach the grid (the planner reports `OutOfBounds`).

mod composite;
mod occupancy;

pub use composite::{CompositeOccupancy, OccupancySnapshot, OccupancyView};
pub use occupancy::OccupancyGrid;
