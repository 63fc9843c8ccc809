//! # Generation Module
//!
//! Procedural content generation: the maze, its content and the things found in it.
//!
//! Generation runs exactly once per session. [`MazeGenerator`] carves the topology,
//! [`ContentPlacer`] seeds every walkable tile with a one-shot encounter, and the item
//! and monster tables are consulted later when encounters fire. All of it draws from a
//! single `StdRng` created by [`utils::create_rng`].

pub mod dungeon;
pub mod encounters;
pub mod items;
pub mod monsters;

pub use dungeon::*;
pub use encounters::*;
pub use items::*;
pub use monsters::{boss, spawn_monster, MonsterTemplate, BOSS_NAME};

use crate::{config, CrawlerResult};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural generation.
///
/// Controls the map size, how many loops are punched into the maze and where the
/// difficulty bands start.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Side length of the square map; must be even
    pub size: u32,
    /// Chance that a wall between two maze cells is opened into a corridor
    pub extra_corridor_chance: f64,
    /// Rounded distance at which the Mid band starts
    pub near_radius: u32,
    /// Rounded distance at which the Far band starts
    pub far_radius: u32,
    /// Percent chance that a treasure pile also holds an item
    pub treasure_bonus_item_chance: u32,
    /// Whether to flood-fill check the finished maze
    pub validate_connectivity: bool,
}

impl GenerationConfig {
    /// Creates the standard 50x50 configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.size, 50);
    /// assert!(config.near_radius < config.far_radius);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            size: config::DEFAULT_MAP_SIZE,
            extra_corridor_chance: 0.2,
            near_radius: 10,
            far_radius: 20,
            treasure_bonus_item_chance: 30,
            validate_connectivity: true,
        }
    }

    /// Creates a configuration for testing with a smaller map.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            size: 20,
            ..Self::new(seed)
        }
    }

    /// The experimental 500x500 map. Connectivity validation is skipped to keep start-up
    /// fast.
    pub fn for_large_map(seed: u64) -> Self {
        Self {
            size: config::LARGE_MAP_SIZE,
            validate_connectivity: false,
            ..Self::new(seed)
        }
    }

    /// Returns a copy with a different size.
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
///
/// Generators build content from scratch using the provided configuration and the
/// session's random number generator.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlerResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> CrawlerResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Utility functions for generation algorithms.
pub mod utils {
    use super::*;
    use crate::{CrawlerError, Grid};
    use rand::SeedableRng;

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(config: &GenerationConfig) -> StdRng {
        StdRng::seed_from_u64(config.seed)
    }

    /// Checks that a grid has floor and that every walkable tile is reachable from the
    /// spawn point.
    pub fn validate_grid(grid: &Grid) -> CrawlerResult<()> {
        let walkable = grid.walkable_count();
        if walkable == 0 {
            return Err(CrawlerError::GenerationFailed(
                "Grid has no walkable tiles".to_string(),
            ));
        }

        let reachable = crate::utils::reachable_from(grid, grid.center()).len();
        if reachable != walkable {
            return Err(CrawlerError::GenerationFailed(format!(
                "Only {} of {} walkable tiles are reachable from the spawn point",
                reachable, walkable
            )));
        }

        Ok(())
    }
}
