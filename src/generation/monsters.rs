//! # Monster Templates
//!
//! Per-tier monster pools and the fixed boss descriptor.
//!
//! Templates scale with the player's level: the spawned monster's level is the
//! player's level plus a per-tier offset, and every stat grows linearly with it.

use crate::{Monster, MonsterDifficulty};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

/// Blueprint for a monster of one tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonsterTemplate {
    pub name: &'static str,
    pub base_hp: i32,
    pub hp_per_level: i32,
    pub base_attack: i32,
    pub attack_per_level: i32,
    pub base_defense: i32,
    pub defense_per_level: i32,
    pub min_loot: u32,
    pub max_loot: u32,
    pub exp_reward: u32,
    /// Inclusive level offset relative to the player
    pub level_offset: (i32, i32),
}

const EASY_POOL: [MonsterTemplate; 3] = [
    MonsterTemplate {
        name: "Goblin",
        base_hp: 25,
        hp_per_level: 8,
        base_attack: 5,
        attack_per_level: 2,
        base_defense: 2,
        defense_per_level: 1,
        min_loot: 5,
        max_loot: 15,
        exp_reward: 25,
        level_offset: (-2, 0),
    },
    MonsterTemplate {
        name: "Giant Rat",
        base_hp: 18,
        hp_per_level: 6,
        base_attack: 4,
        attack_per_level: 2,
        base_defense: 1,
        defense_per_level: 1,
        min_loot: 2,
        max_loot: 8,
        exp_reward: 15,
        level_offset: (-2, 0),
    },
    MonsterTemplate {
        name: "Skeleton",
        base_hp: 30,
        hp_per_level: 8,
        base_attack: 6,
        attack_per_level: 2,
        base_defense: 3,
        defense_per_level: 1,
        min_loot: 8,
        max_loot: 18,
        exp_reward: 30,
        level_offset: (-2, 0),
    },
];

const MEDIUM_POOL: [MonsterTemplate; 3] = [
    MonsterTemplate {
        name: "Orc",
        base_hp: 45,
        hp_per_level: 12,
        base_attack: 9,
        attack_per_level: 3,
        base_defense: 5,
        defense_per_level: 1,
        min_loot: 15,
        max_loot: 35,
        exp_reward: 50,
        level_offset: (-1, 1),
    },
    MonsterTemplate {
        name: "Giant Spider",
        base_hp: 40,
        hp_per_level: 10,
        base_attack: 11,
        attack_per_level: 3,
        base_defense: 3,
        defense_per_level: 1,
        min_loot: 12,
        max_loot: 30,
        exp_reward: 45,
        level_offset: (-1, 1),
    },
    MonsterTemplate {
        name: "Dark Cultist",
        base_hp: 38,
        hp_per_level: 10,
        base_attack: 12,
        attack_per_level: 3,
        base_defense: 4,
        defense_per_level: 1,
        min_loot: 20,
        max_loot: 40,
        exp_reward: 55,
        level_offset: (-1, 1),
    },
];

const HARD_POOL: [MonsterTemplate; 3] = [
    MonsterTemplate {
        name: "Troll",
        base_hp: 80,
        hp_per_level: 18,
        base_attack: 14,
        attack_per_level: 4,
        base_defense: 8,
        defense_per_level: 2,
        min_loot: 40,
        max_loot: 80,
        exp_reward: 100,
        level_offset: (0, 2),
    },
    MonsterTemplate {
        name: "Ogre",
        base_hp: 90,
        hp_per_level: 20,
        base_attack: 16,
        attack_per_level: 4,
        base_defense: 7,
        defense_per_level: 2,
        min_loot: 45,
        max_loot: 90,
        exp_reward: 110,
        level_offset: (0, 2),
    },
    MonsterTemplate {
        name: "Wraith",
        base_hp: 70,
        hp_per_level: 15,
        base_attack: 18,
        attack_per_level: 5,
        base_defense: 6,
        defense_per_level: 2,
        min_loot: 50,
        max_loot: 100,
        exp_reward: 120,
        level_offset: (0, 2),
    },
];

/// Name of the corner boss.
pub const BOSS_NAME: &str = "Ancient Dragon";

impl MonsterTemplate {
    /// Instantiates this template against the player's level.
    pub fn spawn(&self, difficulty: MonsterDifficulty, player_level: u32, rng: &mut StdRng) -> Monster {
        let (lo, hi) = self.level_offset;
        let level = (player_level as i32 + rng.gen_range(lo..=hi)).max(1);
        let growth = level - 1;

        Monster {
            name: self.name.to_string(),
            level: level as u32,
            difficulty,
            hp: self.base_hp + growth * self.hp_per_level,
            attack: self.base_attack + growth * self.attack_per_level,
            defense: self.base_defense + growth * self.defense_per_level,
            min_loot: self.min_loot,
            max_loot: self.max_loot,
            exp_reward: self.exp_reward,
        }
    }
}

/// Template pool for a tier. The boss tier has no pool.
pub fn pool(difficulty: MonsterDifficulty) -> &'static [MonsterTemplate] {
    match difficulty {
        MonsterDifficulty::Easy => &EASY_POOL,
        MonsterDifficulty::Medium => &MEDIUM_POOL,
        MonsterDifficulty::Hard => &HARD_POOL,
        MonsterDifficulty::BossTier => &[],
    }
}

/// The fixed corner boss.
pub fn boss() -> Monster {
    Monster {
        name: BOSS_NAME.to_string(),
        level: 10,
        difficulty: MonsterDifficulty::BossTier,
        hp: 250,
        attack: 30,
        defense: 12,
        min_loot: 150,
        max_loot: 300,
        exp_reward: 500,
    }
}

/// Picks a template uniformly from the tier's pool and spawns it.
pub fn spawn_monster(difficulty: MonsterDifficulty, player_level: u32, rng: &mut StdRng) -> Monster {
    match pool(difficulty).choose(rng) {
        Some(template) => template.spawn(difficulty, player_level, rng),
        None => boss(),
    }
}
