//! Rotating ray sweep from the agent's continuous position.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::trace;

use crate::config::SensorConfig;
use crate::core::{Cell, WorldPoint};
use crate::grid::OccupancyGrid;

/// One ray of a sweep, for rendering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Ray {
    /// World angle in degrees (base angle + sweep phase)
    pub angle_deg: f32,
    /// Ray origin (the agent position)
    pub origin: WorldPoint,
    /// Centre of the last in-bounds cell the ray covered, or the origin
    pub end: WorldPoint,
    /// Occupied cell that stopped the ray
    pub hit: Option<Cell>,
}

/// Output of one full 0–360° sweep.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SweepResult {
    /// One entry per base angle
    pub rays: Vec<Ray>,
    /// Cells on which a ray terminated because they were occupied
    pub detected: BTreeSet<Cell>,
}

/// Simulated spinning range sensor.
///
/// Each call to [`SensorSweep::scan`] casts one ray per angular step and
/// then advances the phase offset, so successive sweeps appear to rotate.
#[derive(Clone, Debug)]
pub struct SensorSweep {
    config: SensorConfig,
    /// Current phase offset in degrees, always in `[0, 360)`
    phase_deg: f32,
}

impl SensorSweep {
    /// Create a sensor with zero phase.
    pub fn new(config: SensorConfig) -> Self {
        Self {
            config,
            phase_deg: 0.0,
        }
    }

    /// Current phase offset (degrees)
    pub fn phase_deg(&self) -> f32 {
        self.phase_deg
    }

    /// Sensor parameters
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Cast a full sweep from `position`.
    ///
    /// Rays step outward one cell length at a time up to `range_cells`. A ray
    /// ends at the first out-of-bounds cell (exclusive), at the first wall
    /// or dynamic obstacle (inclusive, recorded as detected), or at range.
    pub fn scan(
        &mut self,
        position: WorldPoint,
        cell_size: f32,
        grid: &OccupancyGrid,
        dynamic: &BTreeSet<Cell>,
    ) -> SweepResult {
        let step = self.config.angle_step_deg.max(1) as usize;
        let offset = self.phase_deg.floor();
        let mut result = SweepResult {
            rays: Vec::with_capacity(360 / step + 1),
            detected: BTreeSet::new(),
        };

        for base in (0..360).step_by(step) {
            let angle_deg = base as f32 + offset;
            let angle = angle_deg.to_radians();
            let mut end = position;
            let mut hit = None;

            for d in 1..=self.config.range_cells {
                let point = position.point_at(angle, d as f32 * cell_size);
                let cell = point.containing_cell(cell_size);
                if !grid.contains(cell) {
                    break;
                }
                end = WorldPoint::cell_center(cell, cell_size);
                if grid.is_wall(cell) || dynamic.contains(&cell) {
                    hit = Some(cell);
                    result.detected.insert(cell);
                    break;
                }
            }

            result.rays.push(Ray {
                angle_deg,
                origin: position,
                end,
                hit,
            });
        }

        self.phase_deg = (self.phase_deg + self.config.rotation_step_deg).rem_euclid(360.0);
        trace!(
            "sweep: {} rays, {} detected, next phase {:.1}°",
            result.rays.len(),
            result.detected.len(),
            self.phase_deg
        );
        result
    }

    /// Reset the phase offset to zero.
    pub fn reset(&mut self) {
        self.phase_deg = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CELL: f32 = 36.0;

    fn sensor(range: u32, step: u32) -> SensorSweep {
        SensorSweep::new(SensorConfig {
            range_cells: range,
            angle_step_deg: step,
            rotation_step_deg: 6.0,
        })
    }

    #[test]
    fn test_ray_count_and_phase_wrap() {
        let grid = OccupancyGrid::new(5, 5).unwrap();
        let mut sweep = sensor(2, 6);
        let pos = WorldPoint::cell_center(Cell::new(2, 2), CELL);

        let result = sweep.scan(pos, CELL, &grid, &BTreeSet::new());
        assert_eq!(result.rays.len(), 60);
        assert!(result.detected.is_empty());
        assert_relative_eq!(sweep.phase_deg(), 6.0);

        for _ in 0..59 {
            sweep.scan(pos, CELL, &grid, &BTreeSet::new());
        }
        assert_relative_eq!(sweep.phase_deg(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_phase_offsets_ray_angles() {
        let grid = OccupancyGrid::new(5, 5).unwrap();
        let mut sweep = SensorSweep::new(SensorConfig {
            range_cells: 1,
            angle_step_deg: 90,
            rotation_step_deg: 7.5,
        });
        let pos = WorldPoint::cell_center(Cell::new(2, 2), CELL);
        sweep.scan(pos, CELL, &grid, &BTreeSet::new());
        let second = sweep.scan(pos, CELL, &grid, &BTreeSet::new());
        let angles: Vec<f32> = second.rays.iter().map(|r| r.angle_deg).collect();
        assert_eq!(angles, vec![7.0, 97.0, 187.0, 277.0]);
    }

    #[test]
    fn test_detects_first_obstacle_only() {
        // Two walls in a row east of the agent; only the nearer one is seen.
        let grid = OccupancyGrid::from_ascii(&[".......", ".....##", "......."]).unwrap();
        let mut sweep = sensor(5, 90);
        let pos = WorldPoint::cell_center(Cell::new(1, 2), CELL);

        let result = sweep.scan(pos, CELL, &grid, &BTreeSet::new());
        assert!(result.detected.contains(&Cell::new(1, 5)));
        assert!(!result.detected.contains(&Cell::new(1, 6)));
        let east = &result.rays[0];
        assert_eq!(east.hit, Some(Cell::new(1, 5)));
        assert_eq!(east.end, WorldPoint::cell_center(Cell::new(1, 5), CELL));
    }

    #[test]
    fn test_detects_dynamic_obstacles() {
        let grid = OccupancyGrid::new(5, 5).unwrap();
        let dynamic = BTreeSet::from([Cell::new(0, 2)]);
        let mut sweep = sensor(3, 90);
        let pos = WorldPoint::cell_center(Cell::new(2, 2), CELL);

        let result = sweep.scan(pos, CELL, &grid, &dynamic);
        assert_eq!(result.detected, BTreeSet::from([Cell::new(0, 2)]));
    }

    #[test]
    fn test_obstacles_beyond_range_not_detected() {
        let grid = OccupancyGrid::new(9, 9).unwrap();
        let mut sweep = sensor(2, 6);
        let dynamic = BTreeSet::from([Cell::new(4, 8)]);
        let pos = WorldPoint::cell_center(Cell::new(4, 4), CELL);
        // Obstacle is beyond range: nothing detected.
        let result = sweep.scan(pos, CELL, &grid, &dynamic);
        assert!(result.detected.is_empty());
    }

    #[test]
    fn test_rays_stop_at_border() {
        let grid = OccupancyGrid::new(3, 3).unwrap();
        let mut sweep = sensor(5, 90);
        let pos = WorldPoint::cell_center(Cell::new(0, 0), CELL);
        let result = sweep.scan(pos, CELL, &grid, &BTreeSet::new());

        // West ray (180°) leaves the grid immediately.
        let west = &result.rays[2];
        assert_eq!(west.end, pos);
        assert_eq!(west.hit, None);
        // East ray reaches the last column.
        let east = &result.rays[0];
        assert_eq!(east.end, WorldPoint::cell_center(Cell::new(0, 2), CELL));
    }

    #[test]
    fn test_detections_within_range() {
        let grid = OccupancyGrid::demo(14, 20).unwrap();
        let dynamic: BTreeSet<Cell> = [(1, 1), (5, 12), (12, 18), (7, 3), (0, 9)]
            .into_iter()
            .map(|(r, c)| Cell::new(r, c))
            .collect();
        let range = 4;
        let mut sweep = sensor(range, 6);

        for cell in grid.free_cells().step_by(3) {
            for (dx, dy) in [(0.0, 0.0), (10.0, -7.0), (-17.0, 17.0)] {
                let pos = WorldPoint::cell_center(cell, CELL) + WorldPoint::new(dx, dy);
                let origin = pos.containing_cell(CELL);
                let result = sweep.scan(pos, CELL, &grid, &dynamic);
                for hit in &result.detected {
                    assert!(
                        hit.chebyshev_distance(&origin) <= range as i32,
                        "{hit} detected from {origin}"
                    );
                }
            }
        }
    }
}
