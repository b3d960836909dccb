//! A* planner over a 4-connected grid.
//!
//! Unit edge cost with the Manhattan heuristic, which is admissible and
//! consistent here, so the first time the goal is popped its path is
//! optimal. Among equal f-costs the earliest-pushed node wins, so the same
//! occupancy always yields the same path.

use std::collections::{BinaryHeap, HashMap, HashSet};
use tracing::{debug, trace};

use crate::core::Cell;
use crate::grid::OccupancyView;

use super::types::{AStarConfig, AStarNode, PathFailure, PlanResult};

/// A* pathfinder
#[derive(Clone, Debug, Default)]
pub struct AStarPlanner {
    config: AStarConfig,
}

impl AStarPlanner {
    /// Create a new A* planner
    pub fn new(config: AStarConfig) -> Self {
        Self { config }
    }

    /// Find a path from `start` to `goal` through cells not blocked in `view`.
    ///
    /// The start cell is never treated as blocked: the agent may stand on a
    /// cell that was just detected as occupied.
    pub fn find_path<V: OccupancyView + ?Sized>(
        &self,
        start: Cell,
        goal: Cell,
        view: &V,
    ) -> PlanResult {
        trace!("[AStar] find_path: start={} goal={}", start, goal);

        if !view.contains(start) || !view.contains(goal) {
            debug!("[AStar] FAILED: OutOfBounds - start {} or goal {}", start, goal);
            return PlanResult::failed(PathFailure::OutOfBounds, 0);
        }

        if start == goal {
            return PlanResult {
                path: vec![start],
                nodes_expanded: 0,
                failure: None,
            };
        }

        let max_expansions = self
            .config
            .max_expansions
            .unwrap_or(view.rows() * view.cols() * 4);

        let mut open_set = BinaryHeap::new();
        let mut closed_set = HashSet::new();
        let mut came_from: HashMap<Cell, Cell> = HashMap::new();
        let mut g_scores: HashMap<Cell, u32> = HashMap::new();
        let mut seq = 0u64;

        g_scores.insert(start, 0);
        open_set.push(AStarNode {
            cell: start,
            g_cost: 0,
            f_cost: heuristic(start, goal),
            seq,
        });

        let mut nodes_expanded = 0;

        while let Some(current) = open_set.pop() {
            if closed_set.contains(&current.cell) {
                continue;
            }

            if current.cell == goal {
                return reconstruct_path(&came_from, goal, nodes_expanded);
            }

            nodes_expanded += 1;
            if nodes_expanded > max_expansions {
                debug!(
                    "[AStar] FAILED: MaxExpansionsExceeded ({} nodes)",
                    nodes_expanded
                );
                return PlanResult::failed(PathFailure::MaxExpansionsExceeded, nodes_expanded);
            }
            closed_set.insert(current.cell);

            for neighbor in current.cell.neighbors_4() {
                if closed_set.contains(&neighbor) || view.is_blocked(neighbor) {
                    continue;
                }

                let tentative_g = current.g_cost + 1;
                let known_g = g_scores.get(&neighbor).copied().unwrap_or(u32::MAX);
                if tentative_g < known_g {
                    came_from.insert(neighbor, current.cell);
                    g_scores.insert(neighbor, tentative_g);
                    seq += 1;
                    open_set.push(AStarNode {
                        cell: neighbor,
                        g_cost: tentative_g,
                        f_cost: tentative_g + heuristic(neighbor, goal),
                        seq,
                    });
                }
            }
        }

        debug!(
            "[AStar] FAILED: NoPath {} -> {} after expanding {} nodes",
            start, goal, nodes_expanded
        );
        PlanResult::failed(PathFailure::NoPath, nodes_expanded)
    }
}

/// Manhattan distance
#[inline]
fn heuristic(from: Cell, to: Cell) -> u32 {
    from.manhattan_distance(&to) as u32
}

fn reconstruct_path(
    came_from: &HashMap<Cell, Cell>,
    goal: Cell,
    nodes_expanded: usize,
) -> PlanResult {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();

    trace!(
        "[AStar] SUCCESS: path length={} cells, nodes_expanded={}",
        path.len(),
        nodes_expanded
    );

    PlanResult {
        path,
        nodes_expanded,
        failure: None,
    }
}
