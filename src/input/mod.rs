//! # Input Module
//!
//! Line-based command parsing for player interactions.

pub mod commands;

pub use commands::*;

use crate::{BattleCommand, CrawlerError, CrawlerResult, Direction};
use log::warn;

/// Input handler for processing player commands.
///
/// Reads the first character of a line, case-insensitively. The accepted set depends
/// on whether a battle is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputHandler {
    /// Whether to accept Vi-style movement keys (hjkl) while exploring
    pub vi_keys_enabled: bool,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl InputHandler {
    /// Creates a new input handler.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::{Direction, InputHandler, PlayerInput};
    ///
    /// let input = InputHandler::new();
    /// assert_eq!(input.parse_line("n", false).unwrap(), PlayerInput::Move(Direction::North));
    /// ```
    pub fn new() -> Self {
        Self {
            vi_keys_enabled: true,
        }
    }

    /// Parses one line of input.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::InvalidInput`] for blank lines, unknown commands,
    /// malformed slot numbers and commands that do not apply in the current mode.
    pub fn parse_line(&self, line: &str, in_battle: bool) -> CrawlerResult<PlayerInput> {
        let result = self.parse(line.trim(), in_battle);
        if let Err(err) = &result {
            warn!("Rejected input {:?}: {}", line.trim(), err);
        }
        result
    }

    fn parse(&self, line: &str, in_battle: bool) -> CrawlerResult<PlayerInput> {
        let mut chars = line.chars();
        let key = chars
            .next()
            .ok_or_else(|| CrawlerError::InvalidInput("Please enter a command".to_string()))?;
        let argument = chars.as_str().trim();

        let input = match key.to_ascii_uppercase() {
            'Q' => PlayerInput::Quit,
            'U' if argument.is_empty() => PlayerInput::UseItem(None),
            'U' => PlayerInput::UseItem(Some(parse_slot(argument)?)),
            _ if in_battle => Self::parse_battle(key)?,
            _ => self.parse_explore(key, argument)?,
        };

        Ok(input)
    }

    fn parse_battle(key: char) -> CrawlerResult<PlayerInput> {
        let command = match key.to_ascii_uppercase() {
            'A' => BattleCommand::Attack,
            'D' => BattleCommand::Defend,
            'F' => BattleCommand::Flee,
            _ => {
                return Err(CrawlerError::InvalidInput(
                    "In battle: A to attack, D to defend, F to flee, U to use an item".to_string(),
                ))
            }
        };
        Ok(PlayerInput::Battle(command))
    }

    fn parse_explore(&self, key: char, argument: &str) -> CrawlerResult<PlayerInput> {
        if self.vi_keys_enabled {
            let vi = match key {
                'h' => Some(Direction::West),
                'j' => Some(Direction::South),
                'k' => Some(Direction::North),
                'l' => Some(Direction::East),
                _ => None,
            };
            if let Some(direction) = vi {
                return Ok(PlayerInput::Move(direction));
            }
        }

        let input = match key.to_ascii_uppercase() {
            'N' => PlayerInput::Move(Direction::North),
            'S' => PlayerInput::Move(Direction::South),
            'E' => PlayerInput::Move(Direction::East),
            'W' => PlayerInput::Move(Direction::West),
            'M' => PlayerInput::ShowMap,
            'I' => PlayerInput::ShowInventory,
            'R' if argument.is_empty() => {
                return Err(CrawlerError::InvalidInput(
                    "Which slot? Use R <slot>".to_string(),
                ))
            }
            'R' => PlayerInput::Equip(parse_slot(argument)?),
            other => {
                return Err(CrawlerError::InvalidInput(format!(
                    "Unknown command '{}'",
                    other
                )))
            }
        };
        Ok(input)
    }
}
