//! # Entities
//!
//! Player, monster and item values.
//!
//! None of these live on the grid. The grid only stores what kind of encounter a tile
//! holds; monsters are instantiated fresh when a battle starts and the player owns
//! their inventory outright.

use crate::{config, CrawlerError, CrawlerResult, MonsterDifficulty};
use serde::{Deserialize, Serialize};

/// A monster ready for battle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub level: u32,
    pub difficulty: MonsterDifficulty,
    pub hp: i32,
    pub attack: i32,
    pub defense: i32,
    pub min_loot: u32,
    pub max_loot: u32,
    pub exp_reward: u32,
}

/// Categories of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Consumable,
    Weapon,
    Armor,
    Misc,
}

impl ItemType {
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Consumable => "Consumable",
            ItemType::Weapon => "Weapon",
            ItemType::Armor => "Armor",
            ItemType::Misc => "Misc",
        }
    }
}

/// Bonuses an item provides while equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemStats {
    pub damage: i32,
    pub defense: i32,
}

/// A single inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Items with the same id stack when they are consumables
    pub id: u32,
    pub item_type: ItemType,
    pub name: String,
    pub quantity: u32,
    pub stats: ItemStats,
    /// Gold value; also scales potion healing
    pub value: u32,
}

/// Inventory slots currently equipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Equipment {
    pub weapon: Option<usize>,
    pub armor: Option<usize>,
}

/// Playable classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum PlayerClass {
    Warrior,
    Mage,
}

/// Starting numbers for a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDefinition {
    pub class: PlayerClass,
    pub name: &'static str,
    pub max_health: i32,
    pub base_damage: i32,
    pub base_defense: i32,
}

const CLASS_DEFINITIONS: [ClassDefinition; 2] = [
    ClassDefinition {
        class: PlayerClass::Warrior,
        name: "Warrior",
        max_health: 100,
        base_damage: 15,
        base_defense: 8,
    },
    ClassDefinition {
        class: PlayerClass::Mage,
        name: "Mage",
        max_health: 120,
        base_damage: 8,
        base_defense: 4,
    },
];

impl PlayerClass {
    /// Looks up the class table entry.
    pub fn definition(self) -> Option<&'static ClassDefinition> {
        CLASS_DEFINITIONS.iter().find(|def| def.class == self)
    }

    pub fn name(self) -> &'static str {
        self.definition().map(|def| def.name).unwrap_or("Unknown")
    }
}

/// Snapshot of the numbers the encounter resolver is allowed to see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub health: i32,
    pub max_health: i32,
    pub total_damage: i32,
    pub total_defense: i32,
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerCharacter {
    pub name: String,
    pub class: PlayerClass,

    pub max_health: i32,
    pub health: i32,
    pub gold: u32,

    pub level: u32,
    pub experience: u32,
    pub exp_to_next_level: u32,

    pub base_damage: i32,
    pub base_defense: i32,
    pub total_damage: i32,
    pub total_defense: i32,

    pub inventory: Vec<Item>,
    pub equipped: Equipment,
}

impl PlayerCharacter {
    /// Creates a level 1 character of the given class wearing the starter kit.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::{PlayerCharacter, PlayerClass};
    ///
    /// let hero = PlayerCharacter::new("Hero".to_string(), PlayerClass::Warrior);
    /// assert_eq!(hero.health, 100);
    /// assert_eq!(hero.total_damage, 21); // 15 base + Rusty Sword
    /// ```
    pub fn new(name: String, class: PlayerClass) -> Self {
        let (max_health, base_damage, base_defense) = match class.definition() {
            Some(def) => (def.max_health, def.base_damage, def.base_defense),
            None => (100, 10, 5),
        };

        let mut player = Self {
            name,
            class,
            max_health,
            health: max_health,
            gold: 0,
            level: 1,
            experience: 0,
            exp_to_next_level: config::STARTING_EXP_THRESHOLD,
            base_damage,
            base_defense,
            total_damage: base_damage,
            total_defense: base_defense,
            inventory: crate::generation::ItemGenerator::starter_kit(),
            equipped: Equipment::default(),
        };

        player.equipped.weapon = player
            .inventory
            .iter()
            .position(|item| item.item_type == ItemType::Weapon);
        player.equipped.armor = player
            .inventory
            .iter()
            .position(|item| item.item_type == ItemType::Armor);
        player.apply_equipment();
        player
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            level: self.level,
            health: self.health,
            max_health: self.max_health,
            total_damage: self.total_damage,
            total_defense: self.total_defense,
        }
    }

    /// Recomputes totals from base stats and equipped items.
    pub fn apply_equipment(&mut self) {
        self.total_damage = self.base_damage;
        self.total_defense = self.base_defense;

        for slot in [self.equipped.weapon, self.equipped.armor].into_iter().flatten() {
            if let Some(item) = self.inventory.get(slot) {
                self.total_damage += item.stats.damage;
                self.total_defense += item.stats.defense;
            }
        }
    }

    /// Subtracts damage, flooring health at zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let taken = (amount as i32).min(self.health.max(0));
        self.health -= taken;
        taken as u32
    }

    /// Restores health, capped at max. Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let missing = (self.max_health - self.health).max(0);
        let restored = (amount as i32).min(missing);
        self.health += restored;
        restored as u32
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Awards experience and applies every level up it pays for.
    ///
    /// Returns the levels gained, in order.
    pub fn gain_exp(&mut self, exp: u32) -> Vec<u32> {
        self.experience += exp;
        let mut gained = Vec::new();
        while self.experience >= self.exp_to_next_level {
            self.experience -= self.exp_to_next_level;
            self.level_up();
            gained.push(self.level);
        }
        gained
    }

    /// One level: +20 max HP, full heal, +3 damage, +2 defense.
    pub fn level_up(&mut self) {
        self.level += 1;
        self.max_health += 20;
        self.health = self.max_health;
        self.base_damage += 3;
        self.base_defense += 2;
        self.exp_to_next_level = config::STARTING_EXP_THRESHOLD + (self.level - 1) * 50;
        self.apply_equipment();
    }

    /// Adds an item, stacking consumables that share an id.
    pub fn add_item(&mut self, item: Item) -> CrawlerResult<()> {
        if item.item_type == ItemType::Consumable {
            if let Some(existing) = self.inventory.iter_mut().find(|i| i.id == item.id) {
                existing.quantity += item.quantity;
                return Ok(());
            }
        }

        if self.inventory.len() >= config::MAX_INVENTORY {
            return Err(CrawlerError::InvalidAction(format!(
                "Your inventory is full! Cannot pick up {}.",
                item.name
            )));
        }

        self.inventory.push(item);
        Ok(())
    }

    /// Slot of the first usable consumable.
    pub fn first_consumable(&self) -> Option<usize> {
        self.inventory
            .iter()
            .position(|i| i.item_type == ItemType::Consumable && i.quantity > 0)
    }

    /// Drinks a consumable. Heals `30 + value*2`; returns `(name, restored)`.
    pub fn use_item(&mut self, slot: usize) -> CrawlerResult<(String, u32)> {
        let item = self
            .inventory
            .get_mut(slot)
            .ok_or_else(|| CrawlerError::InvalidAction(format!("No item in slot {}", slot)))?;

        if item.item_type != ItemType::Consumable || item.quantity == 0 {
            return Err(CrawlerError::InvalidAction(format!(
                "{} cannot be used",
                item.name
            )));
        }

        let heal_amount = 30 + item.value * 2;
        item.quantity -= 1;
        let name = item.name.clone();
        let depleted = item.quantity == 0;

        let restored = self.heal(heal_amount);
        if depleted {
            self.remove_slot(slot);
        }
        Ok((name, restored))
    }

    /// Equips a weapon or armor from the inventory.
    pub fn equip(&mut self, slot: usize) -> CrawlerResult<String> {
        let item = self
            .inventory
            .get(slot)
            .ok_or_else(|| CrawlerError::InvalidAction(format!("No item in slot {}", slot)))?;

        match item.item_type {
            ItemType::Weapon => self.equipped.weapon = Some(slot),
            ItemType::Armor => self.equipped.armor = Some(slot),
            _ => {
                return Err(CrawlerError::InvalidAction(format!(
                    "Cannot equip {} (not a weapon or armor)",
                    item.name
                )))
            }
        }

        let name = item.name.clone();
        self.apply_equipment();
        Ok(name)
    }

    pub fn equipped_weapon(&self) -> Option<&Item> {
        self.equipped.weapon.and_then(|slot| self.inventory.get(slot))
    }

    pub fn equipped_armor(&self) -> Option<&Item> {
        self.equipped.armor.and_then(|slot| self.inventory.get(slot))
    }

    /// Removes an inventory entry and shifts equipment slots down.
    fn remove_slot(&mut self, slot: usize) {
        self.inventory.remove(slot);
        let fix = |equipped: Option<usize>| match equipped {
            Some(s) if s == slot => None,
            Some(s) if s > slot => Some(s - 1),
            other => other,
        };
        self.equipped.weapon = fix(self.equipped.weapon);
        self.equipped.armor = fix(self.equipped.armor);
        self.apply_equipment();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potion(id: u32, quantity: u32) -> Item {
        Item {
            id,
            item_type: ItemType::Consumable,
            name: "Potion".to_string(),
            quantity,
            stats: ItemStats::default(),
            value: 5,
        }
    }

    #[test]
    fn test_class_starting_stats() {
        let warrior = PlayerCharacter::new("W".to_string(), PlayerClass::Warrior);
        assert_eq!(warrior.max_health, 100);
        assert_eq!(warrior.total_damage, 15 + 6);
        assert_eq!(warrior.total_defense, 8 + 2);

        let mage = PlayerCharacter::new("M".to_string(), PlayerClass::Mage);
        assert_eq!(mage.max_health, 120);
        assert_eq!(mage.total_damage, 8 + 6);
        assert_eq!(mage.total_defense, 4 + 2);
        assert_eq!(mage.level, 1);
        assert_eq!(mage.exp_to_next_level, 100);
    }

    #[test]
    fn test_damage_floors_and_heal_caps() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        assert_eq!(player.take_damage(30), 30);
        assert_eq!(player.heal(100), 30);
        assert_eq!(player.health, player.max_health);

        assert_eq!(player.take_damage(500), 100);
        assert_eq!(player.health, 0);
        assert!(!player.is_alive());
    }

    #[test]
    fn test_gain_exp_multiple_levels() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        player.take_damage(50);

        // 100 to reach level 2, then 150 to reach level 3
        let levels = player.gain_exp(260);
        assert_eq!(levels, vec![2, 3]);
        assert_eq!(player.level, 3);
        assert_eq!(player.experience, 10);
        assert_eq!(player.exp_to_next_level, 200);
        assert_eq!(player.max_health, 140);
        assert_eq!(player.health, 140);
        assert_eq!(player.base_damage, 21);
        assert_eq!(player.total_damage, 27);
    }

    #[test]
    fn test_consumables_stack() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        let before = player.inventory.len();
        player.add_item(potion(99, 1)).unwrap();
        player.add_item(potion(99, 2)).unwrap();
        assert_eq!(player.inventory.len(), before + 1);
        assert_eq!(player.inventory.last().unwrap().quantity, 3);
    }

    #[test]
    fn test_inventory_full() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        for id in 0..(config::MAX_INVENTORY - player.inventory.len()) as u32 {
            player.add_item(potion(1000 + id, 1)).unwrap();
        }
        assert!(player.add_item(potion(5000, 1)).is_err());
    }

    #[test]
    fn test_use_item_depletes_and_fixes_slots() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        let potion_slot = player.first_consumable().unwrap();
        let armor_slot = player.equipped.armor.unwrap();
        assert!(armor_slot > potion_slot);

        player.take_damage(80);
        for _ in 0..3 {
            player.use_item(potion_slot).unwrap();
        }
        assert!(player.first_consumable().is_none());
        assert_eq!(player.equipped.armor, Some(armor_slot - 1));
        assert_eq!(player.equipped_armor().unwrap().name, "Cloth Tunic");
        assert_eq!(player.total_defense, 8 + 2);
    }

    #[test]
    fn test_use_and_equip_reject_wrong_types() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        let weapon_slot = player.equipped.weapon.unwrap();
        let potion_slot = player.first_consumable().unwrap();
        assert!(player.use_item(weapon_slot).is_err());
        assert!(player.equip(potion_slot).is_err());
        assert!(player.equip(99).is_err());
    }

    #[test]
    fn test_equip_replaces_weapon() {
        let mut player = PlayerCharacter::new("P".to_string(), PlayerClass::Warrior);
        player
            .add_item(Item {
                id: 50,
                item_type: ItemType::Weapon,
                name: "Long Sword".to_string(),
                quantity: 1,
                stats: ItemStats {
                    damage: 10,
                    defense: 0,
                },
                value: 40,
            })
            .unwrap();
        let slot = player.inventory.len() - 1;
        assert_eq!(player.equip(slot).unwrap(), "Long Sword");
        assert_eq!(player.total_damage, 15 + 10);
    }
}
