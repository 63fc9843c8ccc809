//! # Game Module
//!
//! Core game state, world representation, entities and the encounter/combat rules.
//!
//! This module contains the fundamental building blocks of the crawler:
//! - The tile grid and its read-only projections for the UI
//! - Player, monster and item values
//! - One-shot encounter resolution and the battle loop it hands off to
//! - The session state that applies outcomes to the player

pub mod combat;
pub mod encounter;
pub mod entities;
pub mod state;
pub mod world;

pub use combat::*;
pub use encounter::*;
pub use entities::*;
pub use state::*;
pub use world::*;

use serde::{Deserialize, Serialize};

/// Represents a 2D coordinate on the grid.
///
/// # Examples
///
/// ```
/// use crawler::Position;
///
/// let pos = Position::new(10, 5);
/// assert_eq!(pos.x, 10);
/// assert_eq!(pos.y, 5);
///
/// let adjacent = pos.cardinal_adjacent_positions();
/// assert_eq!(adjacent.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Creates a new position with the given coordinates.
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Calculates the Euclidean distance to another position.
    pub fn euclidean_distance(self, other: Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the 4 cardinal adjacent positions in N, W, E, S order.
    pub fn cardinal_adjacent_positions(self) -> Vec<Position> {
        vec![
            Position::new(self.x, self.y - 1), // N
            Position::new(self.x - 1, self.y), // W
            Position::new(self.x + 1, self.y), // E
            Position::new(self.x, self.y + 1), // S
        ]
    }

    /// Returns the position `steps` tiles away in the given direction.
    pub fn step(self, direction: Direction, steps: i32) -> Position {
        let delta = direction.to_delta();
        Position::new(self.x + delta.x * steps, self.y + delta.y * steps)
    }
}

impl std::ops::Add for Position {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal directions for movement and maze carving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Converts a direction to a position delta.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::{Direction, Position};
    ///
    /// let delta = Direction::North.to_delta();
    /// assert_eq!(delta, Position::new(0, -1));
    /// ```
    pub fn to_delta(self) -> Position {
        match self {
            Direction::North => Position::new(0, -1),
            Direction::South => Position::new(0, 1),
            Direction::East => Position::new(1, 0),
            Direction::West => Position::new(-1, 0),
        }
    }

    /// Returns all 4 directions.
    pub fn all() -> [Direction; 4] {
        [
            Direction::North,
            Direction::South,
            Direction::East,
            Direction::West,
        ]
    }

    /// Lower-case name used in messages.
    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}
