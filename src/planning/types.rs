//! A* pathfinding types.

use serde::Serialize;
use std::cmp::Ordering;

use crate::core::Cell;

/// A node in the A* open set
#[derive(Clone, Debug)]
pub(super) struct AStarNode {
    pub cell: Cell,
    pub g_cost: u32,
    pub f_cost: u32,
    /// Push order; breaks f-cost ties first-in-first-out
    pub seq: u64,
}

impl Eq for AStarNode {}

impl PartialEq for AStarNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Ord for AStarNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour: lowest f first, then oldest push
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for AStarNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* configuration
#[derive(Clone, Debug, Default)]
pub struct AStarConfig {
    /// Expansion cap; `None` means `rows * cols * 4`.
    ///
    /// A finite grid is always exhausted before this, so it only guards
    /// against misuse.
    pub max_expansions: Option<usize>,
}

/// Ordered 4-connected cell sequence; empty means "no path".
pub type Path = Vec<Cell>;

/// Result of a planning call
#[derive(Clone, Debug, Serialize)]
pub struct PlanResult {
    /// Cells from start to goal inclusive (empty on failure)
    pub path: Path,
    /// Number of nodes expanded
    pub nodes_expanded: usize,
    /// Reason for failure (if any)
    pub failure: Option<PathFailure>,
}

impl PlanResult {
    pub(super) fn failed(reason: PathFailure, nodes_expanded: usize) -> Self {
        Self {
            path: Vec::new(),
            nodes_expanded,
            failure: Some(reason),
        }
    }

    /// Whether a path was found
    pub fn success(&self) -> bool {
        self.failure.is_none()
    }

    /// Number of moves (cells - 1), zero when empty
    pub fn steps(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Reason for path failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum PathFailure {
    /// Start or goal outside the grid
    OutOfBounds,
    /// Open set exhausted without reaching the goal
    NoPath,
    /// Expansion cap reached
    MaxExpansionsExceeded,
}
