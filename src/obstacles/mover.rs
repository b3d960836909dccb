//! Dynamic obstacle set and its bounded random walk.

use std::collections::BTreeSet;
use tracing::debug;

use crate::config::ObstacleConfig;
use crate::core::Cell;
use crate::grid::OccupancyGrid;

use super::noise::NoiseGenerator;

/// Candidate moves: stay, down, up, right, left.
const MOVES: [Cell; 5] = [
    Cell::new(0, 0),
    Cell::new(1, 0),
    Cell::new(-1, 0),
    Cell::new(0, 1),
    Cell::new(0, -1),
];

/// Randomly-walking obstacles.
///
/// The set never contains a wall, the start cell, the goal cell, or two
/// obstacles on one cell. It changes only through [`spawn`](Self::spawn),
/// [`clear`](Self::clear) and the cadence-driven [`step`](Self::step).
#[derive(Clone, Debug)]
pub struct DynamicObstacles {
    config: ObstacleConfig,
    cells: BTreeSet<Cell>,
    start: Cell,
    goal: Cell,
    /// Simulation time accumulated since the last walk step
    since_last_move: f32,
}

impl DynamicObstacles {
    /// Create an empty set guarding `start` and `goal`.
    pub fn new(config: ObstacleConfig, start: Cell, goal: Cell) -> Self {
        Self {
            config,
            cells: BTreeSet::new(),
            start,
            goal,
            since_last_move: 0.0,
        }
    }

    /// Current obstacle cells
    pub fn cells(&self) -> &BTreeSet<Cell> {
        &self.cells
    }

    /// Number of obstacles
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True when no obstacles are active
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Obstacle parameters
    pub fn config(&self) -> &ObstacleConfig {
        &self.config
    }

    /// Remove every obstacle.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Place up to `count` new obstacles on random free cells.
    ///
    /// Walls, start, goal, existing obstacles and `exclude` are skipped.
    /// Returns the number actually placed.
    pub fn spawn(
        &mut self,
        count: usize,
        grid: &OccupancyGrid,
        exclude: &[Cell],
        noise: &mut NoiseGenerator,
    ) -> usize {
        let mut free: Vec<Cell> = grid
            .free_cells()
            .filter(|c| *c != self.start && *c != self.goal)
            .filter(|c| !self.cells.contains(c) && !exclude.contains(c))
            .collect();
        noise.shuffle(&mut free);

        let placed = count.min(free.len());
        self.cells.extend(free.into_iter().take(placed));
        self.since_last_move = 0.0;
        debug!("spawned {} dynamic obstacles ({} requested)", placed, count);
        placed
    }

    /// Clear the set if it has obstacles, otherwise spawn the configured count.
    ///
    /// Returns the number of obstacles afterwards.
    pub fn toggle(
        &mut self,
        grid: &OccupancyGrid,
        exclude: &[Cell],
        noise: &mut NoiseGenerator,
    ) -> usize {
        if self.cells.is_empty() {
            self.spawn(self.config.count, grid, exclude, noise)
        } else {
            self.clear();
            0
        }
    }

    /// Insert an obstacle at a specific cell.
    ///
    /// Rejects walls, out-of-bounds cells, start, goal and occupied cells.
    pub fn place(&mut self, cell: Cell, grid: &OccupancyGrid) -> bool {
        if !self.is_candidate(cell, grid) || self.cells.contains(&cell) {
            return false;
        }
        self.cells.insert(cell)
    }

    /// Accumulate `dt` seconds; run one walk step when the interval elapses.
    ///
    /// Returns true if a step ran. Long frames trigger a single step, never
    /// a burst.
    pub fn advance(&mut self, dt: f32, grid: &OccupancyGrid, noise: &mut NoiseGenerator) -> bool {
        self.since_last_move += dt;
        if self.since_last_move < self.config.move_interval_secs {
            return false;
        }
        self.since_last_move = 0.0;
        if self.cells.is_empty() {
            return false;
        }
        self.step(grid, noise);
        true
    }

    /// One walk step for every obstacle.
    ///
    /// Each obstacle stays with probability `stay_probability`; otherwise it
    /// tries the shuffled candidate moves and takes the first one that is in
    /// bounds, not a wall, not start/goal, not occupied by another obstacle at
    /// the start of this step, and not already claimed during this step.
    pub fn step(&mut self, grid: &OccupancyGrid, noise: &mut NoiseGenerator) {
        let before = std::mem::take(&mut self.cells);
        let mut moved = 0usize;

        for &cell in &before {
            let mut next = cell;
            if !noise.chance(self.config.stay_probability) {
                let mut candidates = MOVES;
                noise.shuffle(&mut candidates);
                for delta in candidates {
                    let target = cell + delta;
                    let taken_by_other = target != cell && before.contains(&target);
                    if self.is_candidate(target, grid)
                        && !taken_by_other
                        && !self.cells.contains(&target)
                    {
                        next = target;
                        break;
                    }
                }
            }
            if next != cell {
                moved += 1;
            }
            self.cells.insert(next);
        }

        debug!("obstacle step: {}/{} moved", moved, before.len());
    }

    fn is_candidate(&self, cell: Cell, grid: &OccupancyGrid) -> bool {
        grid.contains(cell) && !grid.is_wall(cell) && cell != self.start && cell != self.goal
    }
}
