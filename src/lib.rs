//! # Crawler
//!
//! A single-player, turn-based terminal dungeon crawler.
//!
//! ## Architecture Overview
//!
//! The world is a square maze carved once at startup and then explored tile by tile:
//!
//! - **Generation System**: maze carving ([`MazeGenerator`]) and one-shot content
//!   seeding ([`ContentPlacer`]) driven by a single seeded random source
//! - **World Model**: a dense grid of tiles with topology, content and the
//!   `consumed`/`visited` flags ([`Grid`])
//! - **Encounter System**: one-shot resolution of whatever a tile holds
//!   ([`EncounterResolver`]), handing battles to the combat component
//! - **Game State**: the session tying grid, player, battle and RNG together
//! - **Rendering System**: fixed-layout terminal screen drawn with crossterm
//!
//! ## Determinism
//!
//! Every random draw comes from one `StdRng` threaded through the call chain, so a seed
//! plus a command sequence reproduces the same map and the same encounter sequence.

pub mod game;
pub mod generation;
pub mod input;
pub mod rendering;
pub mod utils;

// Core module re-exports
pub use game::*;
pub use generation::*;
pub use input::*;
pub use rendering::*;
pub use utils::*;

/// Core error type for the crawler engine.
#[derive(thiserror::Error, Debug)]
pub enum CrawlerError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Grid size is odd or too small to hold the landmark layout
    #[error("Invalid grid size {0}: must be even and at least 4")]
    InvalidGridSize(u32),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Action cannot be performed
    #[error("Invalid action: {0}")]
    InvalidAction(String),

    /// Player typed something we could not parse
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the crawler codebase.
pub type CrawlerResult<T> = Result<T, CrawlerError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default side length of the square map
    pub const DEFAULT_MAP_SIZE: u32 = 50;

    /// Side length of the experimental large map
    pub const LARGE_MAP_SIZE: u32 = 500;

    /// Smallest map that still has distinct corners and edge midpoints
    pub const MIN_MAP_SIZE: u32 = 4;

    /// Radius of the map panel around the player
    pub const VIEW_RADIUS: i32 = 7;

    /// Maximum number of inventory entries
    pub const MAX_INVENTORY: usize = 24;

    /// Number of messages kept in the log
    pub const MESSAGE_LOG_CAPACITY: usize = 50;

    /// Experience needed to reach level 2
    pub const STARTING_EXP_THRESHOLD: u32 = 100;

    /// Number of bosses guarding the corners
    pub const BOSS_COUNT: u32 = 4;
}
