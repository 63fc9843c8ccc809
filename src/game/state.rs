//! # Game State Module
//!
//! Central game state management and coordination between all game systems.
//!
//! [`GameState`] owns the grid, the player, the active battle and the session's random
//! number generator. Every player command goes through [`GameState::execute`], which
//! returns the events it produced; the same seed and the same commands always produce
//! the same events.

use crate::generation::utils::create_rng;
use crate::{
    config, Battle, BattleCommand, BattleResult, ContentPlacer, CrawlerError, CrawlerResult,
    Direction, EncounterOutcome, EncounterResolver, GenerationConfig, Generator, Grid, Item,
    MazeGenerator, PlayerCharacter, PlayerClass, PlayerInput, Position,
};
use log::{debug, info};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// How loudly a message should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageImportance {
    Normal,
    Important,
    Critical,
}

/// One line of the message log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub importance: MessageImportance,
}

/// Something that happened during a turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Moved { from: Position, to: Position },
    /// The move was refused; the position did not change
    Blocked { direction: Direction, position: Position },
    Encounter { position: Position, outcome: EncounterOutcome },
    GoldGained { amount: u32 },
    Healed { amount: u32 },
    DamageTaken { amount: u32 },
    ExperienceGained { amount: u32 },
    LevelUp { level: u32 },
    ItemFound { item: Item },
    /// A found item did not fit in the inventory
    ItemLost { name: String },
    ItemUsed { name: String, restored: u32 },
    ItemEquipped { name: String },
    BattleRound { damage_dealt: u32, damage_taken: u32 },
    BattleEnded { monster: String, boss: bool, result: BattleResult },
    MapShown,
    InventoryShown,
    Message { text: String, importance: MessageImportance },
    PlayerDied,
    Conquered,
    Quit,
}

/// Game statistics tracking player progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Successful moves
    pub steps_taken: u64,
    /// Encounters that fired (re-entries excluded)
    pub encounters_resolved: u32,
    pub monsters_defeated: u32,
    pub bosses_defeated: u32,
    pub gold_collected: u64,
    pub damage_taken: u64,
    pub items_found: u32,
}

impl GameStatistics {
    /// Creates new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::Moved { .. } => self.steps_taken += 1,
            GameEvent::Encounter { outcome, .. } => {
                if *outcome != EncounterOutcome::AlreadyExplored {
                    self.encounters_resolved += 1;
                }
            }
            GameEvent::GoldGained { amount } => self.gold_collected += *amount as u64,
            GameEvent::DamageTaken { amount } => self.damage_taken += *amount as u64,
            GameEvent::ItemFound { .. } => self.items_found += 1,
            GameEvent::BattleEnded {
                boss,
                result: BattleResult::Victory { .. },
                ..
            } => {
                self.monsters_defeated += 1;
                if *boss {
                    self.bosses_defeated += 1;
                }
            }
            _ => {}
        }
    }
}

/// Game completion state for handling endings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletionState {
    /// Game is still in progress
    Playing,
    /// Player quit
    Quit,
    /// Player died
    PlayerDied,
    /// All four bosses defeated
    Conquered,
}

/// Which screen the renderer should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenMode {
    Explore,
    FullMap,
    Inventory,
}

/// Central game state for one session.
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GenerationConfig,
    pub grid: Grid,
    pub player: PlayerCharacter,
    pub player_position: Position,
    /// `Some` while a fight is in progress
    pub battle: Option<Battle>,
    pub turn_number: u64,
    pub statistics: GameStatistics,
    pub completion_state: GameCompletionState,
    pub screen: ScreenMode,
    messages: VecDeque<LogEntry>,
    resolver: EncounterResolver,
    rng: StdRng,
}

impl GameState {
    /// Generates the map, seeds its content and places a new character on the spawn.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::{GameState, GenerationConfig, PlayerClass};
    ///
    /// let state = GameState::new(GenerationConfig::new(12345), PlayerClass::Warrior).unwrap();
    /// assert_eq!(state.turn_number, 0);
    /// assert_eq!(state.player_position, state.grid.center());
    /// ```
    pub fn new(config: GenerationConfig, class: PlayerClass) -> CrawlerResult<Self> {
        let mut rng = create_rng(&config);

        let mut grid = MazeGenerator::new().generate(&config, &mut rng)?;
        ContentPlacer::new().populate(&mut grid, &config, &mut rng)?;

        let spawn = grid.center();
        grid.reset_visited();
        grid.mark_visited(spawn);

        let player = PlayerCharacter::new("Adventurer".to_string(), class);
        info!(
            "New {} game on a {}x{} map (seed {})",
            class.name(),
            config.size,
            config.size,
            config.seed
        );

        let mut state = Self {
            resolver: EncounterResolver::new(&config),
            config,
            grid,
            player,
            player_position: spawn,
            battle: None,
            turn_number: 0,
            statistics: GameStatistics::new(),
            completion_state: GameCompletionState::Playing,
            screen: ScreenMode::Explore,
            messages: VecDeque::with_capacity(config::MESSAGE_LOG_CAPACITY),
            rng,
        };
        state.log("Welcome to the dungeon! Four ancient dragons guard its corners.");
        Ok(state)
    }

    /// Runs one player command.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlerError::InvalidState`] once the game has ended and
    /// [`CrawlerError::InvalidAction`] for commands that cannot be carried out (wrong
    /// mode, empty slot, unusable item). Rejected commands change nothing.
    pub fn execute(&mut self, input: PlayerInput) -> CrawlerResult<Vec<GameEvent>> {
        if self.is_game_ended() {
            return Err(CrawlerError::InvalidState("The game is over".to_string()));
        }

        if self.battle.is_some() && !input.allowed_in_battle() {
            return Err(CrawlerError::InvalidAction(
                "You are in battle! Attack, defend, flee or use an item.".to_string(),
            ));
        }

        let mut events = match input {
            PlayerInput::Move(direction) => self.move_player(direction)?,
            PlayerInput::Battle(command) => self.battle_round(command)?,
            PlayerInput::UseItem(slot) => self.use_item(slot)?,
            PlayerInput::Equip(slot) => {
                let name = self.player.equip(slot)?;
                vec![GameEvent::ItemEquipped { name }]
            }
            PlayerInput::ShowMap => vec![GameEvent::MapShown],
            PlayerInput::ShowInventory => vec![GameEvent::InventoryShown],
            PlayerInput::Quit => {
                self.completion_state = GameCompletionState::Quit;
                vec![GameEvent::Quit]
            }
        };

        if !self.player.is_alive() && self.completion_state == GameCompletionState::Playing {
            self.completion_state = GameCompletionState::PlayerDied;
            events.push(GameEvent::PlayerDied);
        }

        self.screen = match input {
            PlayerInput::ShowMap => ScreenMode::FullMap,
            PlayerInput::ShowInventory => ScreenMode::Inventory,
            _ => ScreenMode::Explore,
        };

        for event in &events {
            self.statistics.update_from_event(event);
            if let Some((text, importance)) = Self::describe(event) {
                self.log_with(text, importance);
            }
        }

        self.turn_number += 1;
        Ok(events)
    }

    fn move_player(&mut self, direction: Direction) -> CrawlerResult<Vec<GameEvent>> {
        let from = self.player_position;
        let to = from.step(direction, 1);

        if !self.grid.is_walkable(to) {
            debug!("Blocked moving {} from {}", direction.name(), from);
            return Ok(vec![GameEvent::Blocked {
                direction,
                position: from,
            }]);
        }

        self.player_position = to;
        self.grid.mark_visited(to);

        let stats = self.player.stats();
        let outcome = self.resolver.resolve(&mut self.grid, to, &stats, &mut self.rng)?;

        let mut events = vec![
            GameEvent::Moved { from, to },
            GameEvent::Encounter {
                position: to,
                outcome: outcome.clone(),
            },
        ];
        self.apply_outcome(outcome, to, &mut events);
        Ok(events)
    }

    /// Hands an encounter's effects to the player or the combat component.
    fn apply_outcome(&mut self, outcome: EncounterOutcome, position: Position, events: &mut Vec<GameEvent>) {
        match outcome {
            EncounterOutcome::AlreadyExplored | EncounterOutcome::NothingOfInterest => {}
            EncounterOutcome::BattleStarted(monster) => {
                self.battle = Some(Battle::new(monster, position));
            }
            EncounterOutcome::ShrineBlessing { blessing, amount } => match blessing {
                crate::Blessing::Heal => self.heal(amount, events),
                crate::Blessing::Gold => self.gain_gold(amount, events),
                crate::Blessing::Experience => self.gain_exp(amount, events),
            },
            EncounterOutcome::TrapDamage(amount) => {
                let taken = self.player.take_damage(amount);
                events.push(GameEvent::DamageTaken { amount: taken });
            }
            EncounterOutcome::TreasureFound { gold, item } => {
                self.gain_gold(gold, events);
                if let Some(item) = item {
                    self.pick_up(item, events);
                }
            }
            EncounterOutcome::HealingFountain(amount) => self.heal(amount, events),
            EncounterOutcome::FlavorEvent { gold, .. } => {
                if gold > 0 {
                    self.gain_gold(gold, events);
                }
            }
        }
    }

    fn battle_round(&mut self, command: BattleCommand) -> CrawlerResult<Vec<GameEvent>> {
        let mut battle = self
            .battle
            .take()
            .ok_or_else(|| CrawlerError::InvalidAction("There is nothing to fight here.".to_string()))?;

        let report = battle.round(command, &mut self.player, &mut self.rng);
        let mut events = vec![GameEvent::BattleRound {
            damage_dealt: report.damage_dealt,
            damage_taken: report.damage_taken,
        }];
        if report.damage_taken > 0 {
            events.push(GameEvent::DamageTaken {
                amount: report.damage_taken,
            });
        }
        events.extend(report.messages.into_iter().map(|text| GameEvent::Message {
            text,
            importance: MessageImportance::Normal,
        }));

        self.finish_round(battle, report.result, &mut events);
        Ok(events)
    }

    /// Puts an unfinished battle back or pays out a finished one.
    fn finish_round(&mut self, battle: Battle, result: BattleResult, events: &mut Vec<GameEvent>) {
        if result == BattleResult::Ongoing {
            self.battle = Some(battle);
            return;
        }

        let boss = battle.is_boss();
        events.push(GameEvent::BattleEnded {
            monster: battle.monster.name.clone(),
            boss,
            result,
        });

        if let BattleResult::Victory { gold, exp } = result {
            self.gain_gold(gold, events);
            self.gain_exp(exp, events);

            let bosses = self.statistics.bosses_defeated + u32::from(boss);
            if boss && bosses >= config::BOSS_COUNT {
                self.completion_state = GameCompletionState::Conquered;
                events.push(GameEvent::Conquered);
            }
        }
    }

    fn use_item(&mut self, slot: Option<usize>) -> CrawlerResult<Vec<GameEvent>> {
        let slot = match slot {
            Some(slot) => slot,
            None => self
                .player
                .first_consumable()
                .ok_or_else(|| CrawlerError::InvalidAction("You have no potions to use.".to_string()))?,
        };

        let (name, restored) = self.player.use_item(slot)?;
        let mut events = vec![GameEvent::ItemUsed { name, restored }];

        // Drinking costs the turn in a fight
        if let Some(mut battle) = self.battle.take() {
            let report = battle.free_attack(&mut self.player, &mut self.rng);
            if report.damage_taken > 0 {
                events.push(GameEvent::DamageTaken {
                    amount: report.damage_taken,
                });
            }
            events.extend(report.messages.into_iter().map(|text| GameEvent::Message {
                text,
                importance: MessageImportance::Normal,
            }));
            self.finish_round(battle, report.result, &mut events);
        }

        Ok(events)
    }

    fn gain_gold(&mut self, amount: u32, events: &mut Vec<GameEvent>) {
        self.player.add_gold(amount);
        events.push(GameEvent::GoldGained { amount });
    }

    fn heal(&mut self, amount: u32, events: &mut Vec<GameEvent>) {
        let restored = self.player.heal(amount);
        events.push(GameEvent::Healed { amount: restored });
    }

    fn gain_exp(&mut self, amount: u32, events: &mut Vec<GameEvent>) {
        events.push(GameEvent::ExperienceGained { amount });
        for level in self.player.gain_exp(amount) {
            events.push(GameEvent::LevelUp { level });
        }
    }

    fn pick_up(&mut self, item: Item, events: &mut Vec<GameEvent>) {
        let name = item.name.clone();
        match self.player.add_item(item.clone()) {
            Ok(()) => events.push(GameEvent::ItemFound { item }),
            Err(err) => {
                debug!("Could not pick up {}: {}", name, err);
                events.push(GameEvent::ItemLost { name });
            }
        }
    }

    /// Message-log line for an event, if it deserves one.
    fn describe(event: &GameEvent) -> Option<(String, MessageImportance)> {
        use MessageImportance::{Critical, Important, Normal};

        let line = match event {
            GameEvent::Moved { to, .. } => (format!("You move to {}.", to), Normal),
            GameEvent::Blocked { direction, .. } => (
                format!("You cannot move {}. A wall blocks your path.", direction.name()),
                Normal,
            ),
            GameEvent::Encounter { outcome, .. } => (outcome.message(), Normal),
            GameEvent::LevelUp { level } => (
                format!("*** LEVEL UP! You are now level {}! ***", level),
                Important,
            ),
            GameEvent::ItemFound { item } => (format!("{} added to your inventory.", item.name), Normal),
            GameEvent::ItemLost { name } => (
                format!("Your inventory is full! The {} is left behind.", name),
                Important,
            ),
            GameEvent::ItemUsed { name, restored } => (
                format!("You use the {} and recover {} HP.", name, restored),
                Normal,
            ),
            GameEvent::ItemEquipped { name } => (format!("You equip the {}.", name), Normal),
            GameEvent::BattleEnded {
                monster,
                result: BattleResult::Fled,
                ..
            } => (format!("You escaped from the {}.", monster), Normal),
            GameEvent::BattleEnded {
                monster,
                boss: true,
                result: BattleResult::Victory { .. },
            } => (format!("The {} is slain!", monster), Critical),
            GameEvent::Message { text, importance } => (text.clone(), *importance),
            GameEvent::PlayerDied => ("You have perished in the dungeon. Game Over!".to_string(), Critical),
            GameEvent::Conquered => (
                "All four dragons are slain. The dungeon is yours!".to_string(),
                Critical,
            ),
            GameEvent::Quit => ("Quitting the game. Thanks for playing!".to_string(), Normal),
            _ => return None,
        };
        Some(line)
    }

    /// Appends a normal message to the log.
    pub fn log(&mut self, text: impl Into<String>) {
        self.log_with(text, MessageImportance::Normal);
    }

    /// Appends to the message log, dropping the oldest entry when full.
    pub fn log_with(&mut self, text: impl Into<String>, importance: MessageImportance) {
        if self.messages.len() == config::MESSAGE_LOG_CAPACITY {
            self.messages.pop_front();
        }
        self.messages.push_back(LogEntry {
            text: text.into(),
            importance,
        });
    }

    /// The message log text, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.messages.iter().map(|entry| entry.text.as_str())
    }

    /// The message log with importance, oldest first.
    pub fn log_entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.messages.iter()
    }

    pub fn in_battle(&self) -> bool {
        self.battle.is_some()
    }

    /// Checks if the game has ended.
    pub fn is_game_ended(&self) -> bool {
        self.completion_state != GameCompletionState::Playing
    }
}
