//! # Command Definitions
//!
//! The commands a player can issue and the help text shown for them.

use crate::{BattleCommand, CrawlerError, CrawlerResult, Direction};
use serde::{Deserialize, Serialize};

/// One parsed line of player input.
///
/// Inventory slots are zero-based here; players type them one-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerInput {
    /// Step one tile
    Move(Direction),
    /// Show the whole explored map
    ShowMap,
    ShowInventory,
    /// Drink a consumable; `None` picks the first one
    UseItem(Option<usize>),
    /// Ready a weapon or armor
    Equip(usize),
    /// A combat choice, only valid during a battle
    Battle(BattleCommand),
    Quit,
}

impl PlayerInput {
    /// Whether this input is accepted while a battle is active.
    pub fn allowed_in_battle(self) -> bool {
        matches!(
            self,
            PlayerInput::Battle(_) | PlayerInput::UseItem(_) | PlayerInput::Quit
        )
    }
}

/// Controls shown while exploring.
pub const EXPLORE_CONTROLS: [(&str, &str); 7] = [
    ("N/S/E/W", "Move"),
    ("M", "Map"),
    ("I", "Inventory"),
    ("U [slot]", "Use item"),
    ("R <slot>", "Ready item"),
    ("Q", "Quit"),
    ("h/j/k/l", "Move (vi)"),
];

/// Controls shown during a battle.
pub const BATTLE_CONTROLS: [(&str, &str); 5] = [
    ("A", "Attack"),
    ("D", "Defend"),
    ("F", "Flee"),
    ("U [slot]", "Use item"),
    ("Q", "Quit"),
];

/// Parses a one-based inventory slot argument.
pub fn parse_slot(argument: &str) -> CrawlerResult<usize> {
    let slot: usize = argument
        .parse()
        .map_err(|_| CrawlerError::InvalidInput(format!("'{}' is not a slot number", argument)))?;

    slot.checked_sub(1)
        .ok_or_else(|| CrawlerError::InvalidInput("Slots start at 1".to_string()))
}
