//! # Encounter Resolution
//!
//! Turns the content of a freshly entered tile into a one-shot outcome.
//!
//! The resolver reads the tile, rolls whatever the content calls for and latches the
//! tile as consumed. It never touches the player: the caller applies the outcome to
//! its own state, which keeps the grid free of any reference to the player.

use crate::generation::{spawn_monster, ItemGenerator};
use crate::utils::{percentile, roll};
use crate::{
    CrawlerError, CrawlerResult, GenerationConfig, Grid, Item, Monster, MonsterDifficulty,
    PlayerStats, Position, TileContent,
};
use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

const FLAVOR_TEXTS: [&str; 4] = [
    "You encounter a stranger. They nod silently and pass by.",
    "Distant footsteps echo through the corridors, then fade.",
    "Faded scratch marks on the wall count days long forgotten.",
    "A cold draft carries the smell of old smoke.",
];

/// Gifts a shrine can bestow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Blessing {
    Heal,
    Gold,
    Experience,
}

impl Blessing {
    const ALL: [Blessing; 3] = [Blessing::Heal, Blessing::Gold, Blessing::Experience];

    /// `(base, spread)` of the blessing amount.
    fn range(self) -> (u32, u32) {
        match self {
            Blessing::Heal => (50, 50),
            Blessing::Gold => (75, 75),
            Blessing::Experience => (50, 100),
        }
    }
}

/// What happened when the player entered a tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterOutcome {
    /// The tile was consumed earlier; nothing happens
    AlreadyExplored,
    /// A fight begins against this monster
    BattleStarted(Monster),
    ShrineBlessing { blessing: Blessing, amount: u32 },
    /// Raw damage; the player floors its health at zero
    TrapDamage(u32),
    TreasureFound { gold: u32, item: Option<Item> },
    /// Healing already capped at the player's missing health
    HealingFountain(u32),
    NothingOfInterest,
    /// Minor event on an empty tile, sometimes with a few coins
    FlavorEvent { text: String, gold: u32 },
}

impl EncounterOutcome {
    /// Narrative line for the message log.
    pub fn message(&self) -> String {
        match self {
            EncounterOutcome::AlreadyExplored => "You have already explored this area.".to_string(),
            EncounterOutcome::BattleStarted(monster) if monster.difficulty == MonsterDifficulty::BossTier => {
                format!("The {} awakens! Prepare for a legendary battle!", monster.name)
            }
            EncounterOutcome::BattleStarted(monster) => {
                format!("A level {} {} appears! Prepare for battle.", monster.level, monster.name)
            }
            EncounterOutcome::ShrineBlessing { blessing, amount } => match blessing {
                Blessing::Heal => format!("The shrine's light mends your wounds for {} HP.", amount),
                Blessing::Gold => format!("Offerings at the shrine reveal {} gold.", amount),
                Blessing::Experience => format!("Ancient wisdom grants you {} experience.", amount),
            },
            EncounterOutcome::TrapDamage(amount) => {
                format!("A trap is triggered! You take {} damage.", amount)
            }
            EncounterOutcome::TreasureFound { gold, item: Some(item) } => {
                format!("You found a hidden chest with {} gold and a {}!", gold, item.name)
            }
            EncounterOutcome::TreasureFound { gold, item: None } => {
                format!("You found a hidden chest with {} gold!", gold)
            }
            EncounterOutcome::HealingFountain(amount) => {
                format!("You drink from a healing fountain and recover {} HP.", amount)
            }
            EncounterOutcome::NothingOfInterest => "You find nothing of interest.".to_string(),
            EncounterOutcome::FlavorEvent { text, .. } => text.clone(),
        }
    }
}

/// Resolves tile encounters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterResolver {
    /// Percent chance that treasure carries a bonus item
    pub treasure_bonus_item_chance: u32,
}

impl EncounterResolver {
    pub fn new(config: &GenerationConfig) -> Self {
        Self {
            treasure_bonus_item_chance: config.treasure_bonus_item_chance,
        }
    }

    /// Resolves the encounter on `pos` and marks the tile consumed.
    ///
    /// A tile that was already consumed yields [`EncounterOutcome::AlreadyExplored`]
    /// without drawing from the generator or mutating anything.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::InvalidAction`] when `pos` is outside the grid or is a
    /// wall.
    pub fn resolve(
        &self,
        grid: &mut Grid,
        pos: Position,
        stats: &PlayerStats,
        rng: &mut StdRng,
    ) -> CrawlerResult<EncounterOutcome> {
        let center = grid.center();
        let tile = grid
            .get_tile_mut(pos)
            .filter(|tile| tile.is_walkable())
            .ok_or_else(|| CrawlerError::InvalidAction(format!("No walkable tile at {}", pos)))?;

        if tile.consumed {
            return Ok(EncounterOutcome::AlreadyExplored);
        }
        tile.consume();

        let missing_health = (stats.max_health - stats.health).max(0) as u32;

        let outcome = match tile.content {
            TileContent::Boss => {
                EncounterOutcome::BattleStarted(spawn_monster(MonsterDifficulty::BossTier, stats.level, rng))
            }
            TileContent::Monster => {
                let difficulty = tile.difficulty.unwrap_or(MonsterDifficulty::Easy);
                EncounterOutcome::BattleStarted(spawn_monster(difficulty, stats.level, rng))
            }
            TileContent::Shrine => {
                let blessing = *Blessing::ALL.choose(rng).unwrap_or(&Blessing::Gold);
                let (base, spread) = blessing.range();
                let mut amount = roll(rng, base, spread);
                if blessing == Blessing::Heal {
                    amount = amount.min(missing_health);
                }
                EncounterOutcome::ShrineBlessing { blessing, amount }
            }
            TileContent::Treasure => {
                let gold = tile.treasure_value;
                let item = if percentile(rng) < self.treasure_bonus_item_chance {
                    Some(ItemGenerator::bonus_item(gold, rng))
                } else {
                    None
                };
                EncounterOutcome::TreasureFound { gold, item }
            }
            TileContent::Trap => {
                let distance_bonus = (pos.euclidean_distance(center) / 3.0).floor() as u32;
                EncounterOutcome::TrapDamage(roll(rng, 10, 20) + distance_bonus)
            }
            TileContent::HealingFountain => {
                EncounterOutcome::HealingFountain(roll(rng, 20, 30).min(missing_health))
            }
            // The spawn holds nothing, not even loose coins
            TileContent::Empty if pos == center => EncounterOutcome::NothingOfInterest,
            TileContent::Empty => Self::resolve_empty(rng),
        };

        debug!("Encounter at {}: {:?}", pos, outcome);
        Ok(outcome)
    }

    /// Empty tiles: 5% a few coins, 5% flavor text, otherwise nothing.
    fn resolve_empty(rng: &mut StdRng) -> EncounterOutcome {
        match percentile(rng) {
            0..=4 => {
                let gold = roll(rng, 5, 11);
                EncounterOutcome::FlavorEvent {
                    text: format!("Something glints in the dust: {} gold coins.", gold),
                    gold,
                }
            }
            5..=9 => EncounterOutcome::FlavorEvent {
                text: FLAVOR_TEXTS
                    .choose(rng)
                    .copied()
                    .unwrap_or(FLAVOR_TEXTS[0])
                    .to_string(),
                gold: 0,
            },
            _ => EncounterOutcome::NothingOfInterest,
        }
    }
}
