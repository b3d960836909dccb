//! Error types for marga-nav.
//!
//! Two families:
//! - [`NavError`] / [`ConfigError`]: hard failures, surfaced only while
//!   loading or validating configuration.
//! - [`NavFault`]: non-fatal navigation outcomes. The controller recovers
//!   from these locally (phase change + event) and reports them as values.

use thiserror::Error;

use crate::core::Cell;

/// Crate-level error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Rejected simulation geometry or parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("grid must have at least one row and one column (got {rows}x{cols})")]
    EmptyGrid { rows: usize, cols: usize },

    #[error("{which} cell {cell} is outside the {rows}x{cols} grid")]
    OutOfBounds {
        which: &'static str,
        cell: Cell,
        rows: usize,
        cols: usize,
    },

    #[error("{which} cell {cell} is on a wall")]
    OnWall { which: &'static str, cell: Cell },

    #[error("layout row {row} has {found} columns, expected {expected}")]
    RaggedLayout {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("layout contains unknown character {ch:?} at row {row}, col {col}")]
    BadLayoutChar { ch: char, row: usize, col: usize },

    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} is too large (got {value})")]
    TooLarge { field: &'static str, value: f64 },

    #[error("{field} must be within [0, 1] (got {value})")]
    NotProbability { field: &'static str, value: f64 },

    #[error("sensor angle step must be within 1..=360 degrees (got {0})")]
    BadAngleStep(u32),

    #[error("sensor range must be at least one cell")]
    ZeroRange,
}

/// Non-fatal navigation outcome.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavFault {
    /// Planner found nothing for the current start/goal pair.
    #[error("no path from {from} to {to}")]
    NoPathFound { from: Cell, to: Cell },

    /// Replanning during motion failed; the run is aborted.
    #[error("no alternative path from {from} to {to}")]
    NoAlternativePath { from: Cell, to: Cell },

    /// Command not valid in the current phase; ignored.
    #[error("invalid command: {0}")]
    InvalidCommand(&'static str),
}

pub type Result<T> = std::result::Result<T, NavError>;
