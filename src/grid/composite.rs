//! Composite occupancy: static walls ∪ dynamic obstacles ∪ detected cells.

use std::collections::BTreeSet;

use crate::core::Cell;

use super::OccupancyGrid;

/// Blocking predicate consumed by the planner.
pub trait OccupancyView {
    /// Number of rows
    fn rows(&self) -> usize;

    /// Number of columns
    fn cols(&self) -> usize;

    /// Whether `cell` must not be entered. Out-of-bounds cells are blocked.
    fn is_blocked(&self, cell: Cell) -> bool;

    /// Whether `cell` lies inside the grid
    fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows()
            && (cell.col as usize) < self.cols()
    }
}

/// Borrowed, read-only union of the three occupancy sources.
///
/// Cheap to build; construct a fresh one for every planning call since the
/// dynamic and detected sets change every tick.
#[derive(Clone, Copy, Debug)]
pub struct CompositeOccupancy<'a> {
    grid: &'a OccupancyGrid,
    dynamic: &'a BTreeSet<Cell>,
    detected: &'a BTreeSet<Cell>,
}

impl<'a> CompositeOccupancy<'a> {
    /// Combine the static grid with the current dynamic and detected sets.
    pub fn new(
        grid: &'a OccupancyGrid,
        dynamic: &'a BTreeSet<Cell>,
        detected: &'a BTreeSet<Cell>,
    ) -> Self {
        Self {
            grid,
            dynamic,
            detected,
        }
    }

    /// Static grid behind this view
    pub fn grid(&self) -> &'a OccupancyGrid {
        self.grid
    }

    /// Wall, dynamic obstacle or sensor detection at `cell`.
    #[inline]
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.grid.is_wall(cell) || self.dynamic.contains(&cell) || self.detected.contains(&cell)
    }

    /// Copy the union into an owned snapshot.
    pub fn snapshot(&self) -> OccupancySnapshot {
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let mut blocked = vec![false; rows * cols];
        for r in 0..rows {
            for c in 0..cols {
                blocked[r * cols + c] = self.is_occupied(Cell::new(r as i32, c as i32));
            }
        }
        OccupancySnapshot {
            rows,
            cols,
            blocked,
        }
    }
}

impl OccupancyView for CompositeOccupancy<'_> {
    fn rows(&self) -> usize {
        self.grid.rows()
    }

    fn cols(&self) -> usize {
        self.grid.cols()
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        !self.grid.contains(cell) || self.is_occupied(cell)
    }
}

/// Owned copy of a composite view, for planning outside the state lock.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancySnapshot {
    rows: usize,
    cols: usize,
    blocked: Vec<bool>,
}

impl OccupancyView for OccupancySnapshot {
    fn rows(&self) -> usize {
        self.rows
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        if !self.contains(cell) {
            return true;
        }
        self.blocked[cell.row as usize * self.cols + cell.col as usize]
    }
}

impl OccupancyView for OccupancyGrid {
    fn rows(&self) -> usize {
        OccupancyGrid::rows(self)
    }

    fn cols(&self) -> usize {
        OccupancyGrid::cols(self)
    }

    fn is_blocked(&self, cell: Cell) -> bool {
        !OccupancyGrid::contains(self, cell) || self.is_wall(cell)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_of_sources() {
        let grid = OccupancyGrid::new(3, 3)
            .unwrap()
            .with_walls([Cell::new(0, 0)]);
        let dynamic = BTreeSet::from([Cell::new(1, 1)]);
        let detected = BTreeSet::from([Cell::new(2, 2)]);
        let view = CompositeOccupancy::new(&grid, &dynamic, &detected);

        assert!(view.is_occupied(Cell::new(0, 0)));
        assert!(view.is_occupied(Cell::new(1, 1)));
        assert!(view.is_occupied(Cell::new(2, 2)));
        assert!(!view.is_occupied(Cell::new(0, 1)));
        assert!(view.is_blocked(Cell::new(-1, 0)));
        assert!(!view.is_occupied(Cell::new(-1, 0)));
    }

    #[test]
    fn test_snapshot_matches_view() {
        let grid = OccupancyGrid::from_ascii(&["..#", "...", "#.."]).unwrap();
        let dynamic = BTreeSet::from([Cell::new(1, 0)]);
        let detected = BTreeSet::new();
        let view = CompositeOccupancy::new(&grid, &dynamic, &detected);
        let snapshot = view.snapshot();

        for r in -1..4 {
            for c in -1..4 {
                let cell = Cell::new(r, c);
                assert_eq!(view.is_blocked(cell), snapshot.is_blocked(cell), "{cell}");
            }
        }
    }

    #[test]
    fn test_grid_as_view() {
        let grid = OccupancyGrid::from_ascii(&[".#"]).unwrap();
        assert!(OccupancyView::is_blocked(&grid, Cell::new(0, 1)));
        assert!(!OccupancyView::is_blocked(&grid, Cell::new(0, 0)));
        assert!(OccupancyView::is_blocked(&grid, Cell::new(1, 0)));
    }
}
