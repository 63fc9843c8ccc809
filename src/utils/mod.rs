//! # Utilities Module
//!
//! Distance and dice helpers plus reachability queries over the grid.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use pathfinding::*;
