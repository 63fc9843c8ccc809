//! # Item Generation
//!
//! The starter kit and the bonus items hidden in treasure piles.

use crate::{Item, ItemStats, ItemType};
use rand::rngs::StdRng;
use rand::Rng;

/// Id shared by every Small Potion so they stack.
pub const SMALL_POTION_ID: u32 = 2;

/// Builds items. Stateless; all randomness comes from the caller's RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItemGenerator;

impl ItemGenerator {
    /// Rusty Sword, three Small Potions and a Cloth Tunic.
    pub fn starter_kit() -> Vec<Item> {
        vec![
            Item {
                id: 1,
                item_type: ItemType::Weapon,
                name: "Rusty Sword".to_string(),
                quantity: 1,
                stats: ItemStats {
                    damage: 6,
                    defense: 0,
                },
                value: 5,
            },
            Self::potion(0, 3),
            Item {
                id: 3,
                item_type: ItemType::Armor,
                name: "Cloth Tunic".to_string(),
                quantity: 1,
                stats: ItemStats {
                    damage: 0,
                    defense: 2,
                },
                value: 4,
            },
        ]
    }

    /// Rolls the type of a treasure bonus item and derives its stats from the pile's
    /// gold value: 40% consumable, 30% weapon, 30% armor.
    pub fn bonus_item(treasure_value: u32, rng: &mut StdRng) -> Item {
        let roll = rng.gen_range(0..100);
        if roll < 40 {
            Self::potion(treasure_value, 1)
        } else if roll < 70 {
            Self::weapon(treasure_value)
        } else {
            Self::armor(treasure_value)
        }
    }

    fn tier(treasure_value: u32) -> usize {
        match treasure_value {
            0..=59 => 0,
            60..=99 => 1,
            _ => 2,
        }
    }

    fn potion(treasure_value: u32, quantity: u32) -> Item {
        let (id, name, value) = [
            (SMALL_POTION_ID, "Small Potion", 3),
            (20, "Healing Potion", 8),
            (21, "Greater Potion", 15),
        ][Self::tier(treasure_value)];

        Item {
            id,
            item_type: ItemType::Consumable,
            name: name.to_string(),
            quantity,
            stats: ItemStats::default(),
            value,
        }
    }

    fn weapon(treasure_value: u32) -> Item {
        let (id, name) = [(100, "Iron Dagger"), (101, "Steel Sword"), (102, "Runed Blade")]
            [Self::tier(treasure_value)];

        Item {
            id,
            item_type: ItemType::Weapon,
            name: name.to_string(),
            quantity: 1,
            stats: ItemStats {
                damage: 2 + (treasure_value / 15) as i32,
                defense: 0,
            },
            value: treasure_value / 2,
        }
    }

    fn armor(treasure_value: u32) -> Item {
        let (id, name) = [(200, "Leather Vest"), (201, "Chain Mail"), (202, "Plate Armor")]
            [Self::tier(treasure_value)];

        Item {
            id,
            item_type: ItemType::Armor,
            name: name.to_string(),
            quantity: 1,
            stats: ItemStats {
                damage: 0,
                defense: 1 + (treasure_value / 25) as i32,
            },
            value: treasure_value / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_starter_kit() {
        let kit = ItemGenerator::starter_kit();
        assert_eq!(kit.len(), 3);
        assert_eq!(kit[0].name, "Rusty Sword");
        assert_eq!(kit[1].quantity, 3);
        assert_eq!(kit[1].id, SMALL_POTION_ID);
        assert_eq!(kit[2].stats.defense, 2);
    }

    #[test]
    fn test_bonus_stats_scale_with_value() {
        assert!(ItemGenerator::weapon(150).stats.damage > ItemGenerator::weapon(20).stats.damage);
        assert!(ItemGenerator::armor(150).stats.defense > ItemGenerator::armor(20).stats.defense);
        assert_eq!(ItemGenerator::potion(120, 1).name, "Greater Potion");
    }

    #[test]
    fn test_bonus_type_mix() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut counts = [0u32; 3];
        for _ in 0..3000 {
            match ItemGenerator::bonus_item(80, &mut rng).item_type {
                ItemType::Consumable => counts[0] += 1,
                ItemType::Weapon => counts[1] += 1,
                ItemType::Armor => counts[2] += 1,
                ItemType::Misc => unreachable!(),
            }
        }
        // 40/30/30 within a generous margin
        assert!((1050..1350).contains(&counts[0]));
        assert!((750..1050).contains(&counts[1]));
        assert!((750..1050).contains(&counts[2]));
    }
}
