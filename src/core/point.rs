//! Cell and continuous coordinate types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Grid cell (integer row/column indices).
///
/// Out-of-bounds cells are representable; bounds are checked against an
/// [`OccupancyGrid`](crate::grid::OccupancyGrid) at the call site.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Cell {
    /// Row index (grows downward)
    pub row: i32,
    /// Column index (grows rightward)
    pub col: i32,
}

impl Cell {
    /// Create a new cell
    #[inline]
    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Manhattan distance to another cell
    #[inline]
    pub fn manhattan_distance(&self, other: &Cell) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }

    /// Chebyshev distance (max of row and column distance)
    #[inline]
    pub fn chebyshev_distance(&self, other: &Cell) -> i32 {
        (self.row - other.row).abs().max((self.col - other.col).abs())
    }

    /// The 4 cardinal neighbors (down, up, right, left), unchecked.
    ///
    /// The order is fixed; planner tie-breaking and obstacle candidate
    /// lists depend on it.
    #[inline]
    pub fn neighbors_4(&self) -> [Cell; 4] {
        [
            Cell::new(self.row + 1, self.col),
            Cell::new(self.row - 1, self.col),
            Cell::new(self.row, self.col + 1),
            Cell::new(self.row, self.col - 1),
        ]
    }

    /// True if `other` is one 4-connected step away.
    #[inline]
    pub fn is_adjacent(&self, other: &Cell) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl Add for Cell {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Cell::new(self.row + other.row, self.col + other.col)
    }
}

impl Sub for Cell {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Cell::new(self.row - other.row, self.col - other.col)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl From<[i32; 2]> for Cell {
    fn from([row, col]: [i32; 2]) -> Self {
        Cell::new(row, col)
    }
}

/// Continuous position in grid-pixel units (x = column axis, y = row axis).
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPoint {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate (grows downward, like rows)
    pub y: f32,
}

impl WorldPoint {
    /// Create a new point
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Origin
    pub const ZERO: WorldPoint = WorldPoint { x: 0.0, y: 0.0 };

    /// Centre of a cell for a given cell size.
    #[inline]
    pub fn cell_center(cell: Cell, cell_size: f32) -> Self {
        WorldPoint::new(
            cell.col as f32 * cell_size + cell_size / 2.0,
            cell.row as f32 * cell_size + cell_size / 2.0,
        )
    }

    /// Cell containing this point (floor division, may be out of bounds).
    #[inline]
    pub fn containing_cell(&self, cell_size: f32) -> Cell {
        Cell::new(
            (self.y / cell_size).floor() as i32,
            (self.x / cell_size).floor() as i32,
        )
    }

    /// Euclidean distance to another point
    #[inline]
    pub fn distance(&self, other: &WorldPoint) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Point at a given angle (radians) and distance from this point
    #[inline]
    pub fn point_at(&self, angle: f32, distance: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    /// Move toward `target` by at most `max_step`, never overshooting.
    #[inline]
    pub fn step_toward(&self, target: &WorldPoint, max_step: f32) -> WorldPoint {
        let dist = self.distance(target);
        if dist <= max_step || dist == 0.0 {
            return *target;
        }
        *self + (*target - *self) * (max_step / dist)
    }
}

impl Add for WorldPoint {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        WorldPoint::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for WorldPoint {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        WorldPoint::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f32> for WorldPoint {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: f32) -> Self {
        WorldPoint::new(self.x * scalar, self.y * scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cell_distances() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, 4);
        assert_eq!(a.manhattan_distance(&b), 7);
        assert_eq!(a.chebyshev_distance(&b), 4);
        assert!(a.is_adjacent(&Cell::new(0, 1)));
        assert!(!a.is_adjacent(&Cell::new(1, 1)));
    }

    #[test]
    fn test_neighbors_order() {
        let n = Cell::new(2, 2).neighbors_4();
        assert_eq!(n[0], Cell::new(3, 2));
        assert_eq!(n[1], Cell::new(1, 2));
        assert_eq!(n[2], Cell::new(2, 3));
        assert_eq!(n[3], Cell::new(2, 1));
    }

    #[test]
    fn test_cell_center_roundtrip() {
        let cell = Cell::new(3, 5);
        let p = WorldPoint::cell_center(cell, 36.0);
        assert_relative_eq!(p.x, 198.0);
        assert_relative_eq!(p.y, 126.0);
        assert_eq!(p.containing_cell(36.0), cell);
    }

    #[test]
    fn test_step_toward_clamps() {
        let a = WorldPoint::new(0.0, 0.0);
        let b = WorldPoint::new(10.0, 0.0);
        let mid = a.step_toward(&b, 4.0);
        assert_relative_eq!(mid.x, 4.0);
        assert_relative_eq!(mid.y, 0.0);
        assert_eq!(a.step_toward(&b, 25.0), b);
    }
}
