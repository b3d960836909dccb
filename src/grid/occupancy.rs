//! Static occupancy grid.

use serde::Serialize;

use crate::core::Cell;
use crate::error::ConfigError;

/// Immutable `rows × cols` matrix of free/wall cells.
///
/// Built once per run; shared read-only with planners, the sensor and
/// renderers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OccupancyGrid {
    rows: usize,
    cols: usize,
    /// Row-major wall flags
    walls: Vec<bool>,
}

impl OccupancyGrid {
    /// Create an all-free grid.
    pub fn new(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        if rows == 0 || cols == 0 {
            return Err(ConfigError::EmptyGrid { rows, cols });
        }
        Ok(Self {
            rows,
            cols,
            walls: vec![false; rows * cols],
        })
    }

    /// Parse an ASCII layout: `#` is a wall, `.` is free.
    ///
    /// `S` and `G` are accepted as free cells so layouts can mark endpoints.
    pub fn from_ascii<S: AsRef<str>>(lines: &[S]) -> Result<Self, ConfigError> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.as_ref().chars().count()).unwrap_or(0);
        let mut grid = Self::new(rows, cols)?;

        for (r, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != cols {
                return Err(ConfigError::RaggedLayout {
                    row: r,
                    found,
                    expected: cols,
                });
            }
            for (c, ch) in line.chars().enumerate() {
                match ch {
                    '#' => grid.walls[r * cols + c] = true,
                    '.' | 'S' | 'G' => {}
                    _ => return Err(ConfigError::BadLayoutChar { ch, row: r, col: c }),
                }
            }
        }

        Ok(grid)
    }

    /// Demo floor plan: a vertical wall in column 7 (rows 3..11) and a
    /// horizontal wall in row 9 (cols 6..16) with a doorway at column 10.
    /// Parts that fall outside smaller grids are dropped.
    pub fn demo(rows: usize, cols: usize) -> Result<Self, ConfigError> {
        let vertical = (3..11).map(|r| Cell::new(r, 7));
        let horizontal = (6..16).filter(|&c| c != 10).map(|c| Cell::new(9, c));
        let grid = Self::new(rows, cols)?;
        let walls: Vec<Cell> = vertical
            .chain(horizontal)
            .filter(|&cell| grid.contains(cell))
            .collect();
        Ok(grid.with_walls(walls))
    }

    /// Return a copy with additional walls. Out-of-bounds cells are ignored.
    pub fn with_walls<I: IntoIterator<Item = Cell>>(mut self, walls: I) -> Self {
        for cell in walls {
            if let Some(idx) = self.index(cell) {
                self.walls[idx] = true;
            }
        }
        self
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells
    #[inline]
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Always false; grids have at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Whether `cell` lies inside the grid
    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.col >= 0
            && (cell.row as usize) < self.rows
            && (cell.col as usize) < self.cols
    }

    #[inline]
    fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell)
            .then(|| cell.row as usize * self.cols + cell.col as usize)
    }

    /// Whether `cell` is a static wall. Out-of-bounds cells are not walls.
    #[inline]
    pub fn is_wall(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|idx| self.walls[idx])
    }

    /// In-bounds 4-connected neighbours of `cell`, walls included.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        cell.neighbors_4()
            .into_iter()
            .filter(move |&n| self.contains(n))
    }

    /// All non-wall cells in row-major order.
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32)
            .flat_map(move |r| (0..self.cols as i32).map(move |c| Cell::new(r, c)))
            .filter(move |&cell| !self.is_wall(cell))
    }

    /// All wall cells in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32)
            .flat_map(move |r| (0..self.cols as i32).map(move |c| Cell::new(r, c)))
            .filter(move |&cell| self.is_wall(cell))
    }
}
