//! Core types shared by every subsystem.
//!
//! - [`Cell`]: integer `(row, col)` grid index, identity by value
//! - [`WorldPoint`]: continuous position in grid-pixel units
//!
//! Cell `(r, c)` is centred at `x = c·cell_size + cell_size/2`,
//! `y = r·cell_size + cell_size/2`; rows grow downward.

mod point;

pub use point::{Cell, WorldPoint};
