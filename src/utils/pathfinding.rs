//! # Reachability
//!
//! Flood fills over walkable tiles, used to validate generated mazes.

use crate::{Grid, Position};
use ::pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Every walkable tile reachable from `start` by 4-directional steps.
///
/// Returns an empty set when `start` itself is not walkable.
pub fn reachable_from(grid: &Grid, start: Position) -> HashSet<Position> {
    if !grid.is_walkable(start) {
        return HashSet::new();
    }

    bfs_reach(start, |pos: &Position| {
        pos.cardinal_adjacent_positions()
            .into_iter()
            .filter(|next| grid.is_walkable(*next))
            .collect::<Vec<_>>()
    })
    .collect()
}

/// Whether every walkable tile is reachable from the grid's center.
pub fn is_fully_connected(grid: &Grid) -> bool {
    reachable_from(grid, grid.center()).len() == grid.walkable_count()
}
