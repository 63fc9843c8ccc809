//! # Content Placement
//!
//! One-shot seeding of every walkable tile with an encounter.
//!
//! Landmarks are assigned first: bosses in the corners, shrines on the edge midpoints.
//! Every other walkable tile except the spawn point then rolls against a probability
//! table picked by its distance from the center, so danger and reward grow the
//! further the player wanders. Nothing respawns; the placement is final.

use crate::utils::{percentile, roll, rounded_distance};
use crate::{
    CrawlerError, CrawlerResult, GenerationConfig, Grid, Landmark, MonsterDifficulty,
    TileContent,
};
use log::{info, trace};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

/// Distance band around the spawn point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DifficultyBand {
    Near,
    Mid,
    Far,
}

impl DifficultyBand {
    /// Picks the band for a rounded distance from the center.
    pub fn classify(distance: u32, config: &GenerationConfig) -> Self {
        if distance < config.near_radius {
            DifficultyBand::Near
        } else if distance < config.far_radius {
            DifficultyBand::Mid
        } else {
            DifficultyBand::Far
        }
    }

    /// Cumulative percentile thresholds; a roll at or above the last one is empty.
    pub fn content_table(self) -> [(TileContent, u32); 4] {
        use TileContent::*;
        match self {
            DifficultyBand::Near => [(Monster, 15), (Treasure, 30), (HealingFountain, 40), (Trap, 45)],
            DifficultyBand::Mid => [(Monster, 30), (Treasure, 45), (HealingFountain, 53), (Trap, 63)],
            DifficultyBand::Far => [(Monster, 40), (Treasure, 55), (HealingFountain, 60), (Trap, 75)],
        }
    }

    /// Treasure as `(base, spread)`; the value is `base + uniform(0, spread)`.
    pub fn treasure_range(self) -> (u32, u32) {
        match self {
            DifficultyBand::Near => (20, 40),
            DifficultyBand::Mid => (40, 60),
            DifficultyBand::Far => (60, 100),
        }
    }

    pub fn roll_content(self, rng: &mut StdRng) -> TileContent {
        let value = percentile(rng);
        self.content_table()
            .iter()
            .find(|(_, threshold)| value < *threshold)
            .map(|(content, _)| *content)
            .unwrap_or(TileContent::Empty)
    }

    /// Near monsters are always easy and draw nothing from the generator.
    pub fn roll_difficulty(self, rng: &mut StdRng) -> MonsterDifficulty {
        match self {
            DifficultyBand::Near => MonsterDifficulty::Easy,
            DifficultyBand::Mid => {
                if percentile(rng) < 50 {
                    MonsterDifficulty::Easy
                } else {
                    MonsterDifficulty::Medium
                }
            }
            DifficultyBand::Far => match percentile(rng) {
                0..=39 => MonsterDifficulty::Medium,
                40..=79 => MonsterDifficulty::Hard,
                _ => MonsterDifficulty::Easy,
            },
        }
    }

    pub fn roll_treasure(self, rng: &mut StdRng) -> u32 {
        let (base, spread) = self.treasure_range();
        roll(rng, base, spread)
    }
}

/// How many tiles received each kind of content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlacementSummary {
    pub monsters: u32,
    pub treasures: u32,
    pub fountains: u32,
    pub traps: u32,
    pub bosses: u32,
    pub shrines: u32,
    pub empty: u32,
}

impl PlacementSummary {
    fn record(&mut self, content: TileContent) {
        match content {
            TileContent::Empty => self.empty += 1,
            TileContent::Monster => self.monsters += 1,
            TileContent::Treasure => self.treasures += 1,
            TileContent::Trap => self.traps += 1,
            TileContent::HealingFountain => self.fountains += 1,
            TileContent::Boss => self.bosses += 1,
            TileContent::Shrine => self.shrines += 1,
        }
    }
}

/// Seeds a freshly generated grid with encounters.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentPlacer;

impl ContentPlacer {
    pub fn new() -> Self {
        Self
    }

    /// Assigns content, monster difficulty and treasure value to every walkable tile.
    ///
    /// Must run exactly once, after the maze is carved and before the player moves. A
    /// grid that already holds content or consumed tiles is rejected with
    /// [`CrawlerError::InvalidState`].
    /// Draws happen in row-major order: content roll, then difficulty or treasure roll
    /// for the tiles that need one.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::{generation::utils::create_rng, ContentPlacer, GenerationConfig, Generator,
    ///     MazeGenerator, Position, TileContent};
    ///
    /// let config = GenerationConfig::new(3);
    /// let mut rng = create_rng(&config);
    /// let mut grid = MazeGenerator::new().generate(&config, &mut rng).unwrap();
    /// ContentPlacer::new().populate(&mut grid, &config, &mut rng).unwrap();
    ///
    /// assert_eq!(grid.get_tile(Position::new(0, 0)).unwrap().content, TileContent::Boss);
    /// assert_eq!(grid.get_tile(grid.center()).unwrap().content, TileContent::Empty);
    /// ```
    pub fn populate(
        &self,
        grid: &mut Grid,
        config: &GenerationConfig,
        rng: &mut StdRng,
    ) -> CrawlerResult<PlacementSummary> {
        let seeded = grid
            .tiles
            .iter()
            .flatten()
            .any(|tile| tile.content != TileContent::Empty || tile.consumed);
        if seeded {
            return Err(CrawlerError::InvalidState(
                "Grid content has already been placed".to_string(),
            ));
        }

        let mut summary = PlacementSummary::default();

        for (pos, landmark) in grid.landmark_positions() {
            let tile = grid.get_tile_mut(pos).ok_or_else(|| {
                CrawlerError::GenerationFailed(format!("Landmark {} outside the grid", pos))
            })?;
            let (content, difficulty) = match landmark {
                Landmark::Boss => (TileContent::Boss, Some(MonsterDifficulty::BossTier)),
                Landmark::Shrine => (TileContent::Shrine, None),
            };
            tile.content = content;
            tile.difficulty = difficulty;
            tile.treasure_value = 0;
            summary.record(content);
        }

        let center = grid.center();
        let candidates: Vec<_> = grid
            .positions()
            .filter(|&pos| pos != center && grid.is_walkable(pos) && grid.landmark_at(pos).is_none())
            .collect();

        for pos in candidates {
            let band = DifficultyBand::classify(rounded_distance(pos, center), config);
            let content = band.roll_content(rng);
            let difficulty = match content {
                TileContent::Monster => Some(band.roll_difficulty(rng)),
                _ => None,
            };
            let treasure_value = match content {
                TileContent::Treasure => band.roll_treasure(rng),
                _ => 0,
            };

            if let Some(tile) = grid.get_tile_mut(pos) {
                tile.content = content;
                tile.difficulty = difficulty;
                tile.treasure_value = treasure_value;
            }
            summary.record(content);

            if content != TileContent::Empty {
                trace!("Placed {} at {} ({:?} band)", content.label(), pos, band);
            }
        }

        grid.reset_visited();

        info!(
            "Placed content: {} monsters, {} treasures, {} fountains, {} traps, {} bosses, {} shrines, {} empty",
            summary.monsters,
            summary.treasures,
            summary.fountains,
            summary.traps,
            summary.bosses,
            summary.shrines,
            summary.empty
        );

        Ok(summary)
    }
}
