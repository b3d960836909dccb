//! Path planning on the occupancy grid.
//!
//! ```rust,ignore
//! use marga_nav::planning::AStarPlanner;
//!
//! let planner = AStarPlanner::default();
//! let result = planner.find_path(start, goal, &composite);
//! if result.success() {
//!     println!("Path found with {} steps", result.steps());
//! }
//! ```

mod astar;
mod types;

pub use astar::AStarPlanner;
pub use types::{AStarConfig, Path, PathFailure, PlanResult};
