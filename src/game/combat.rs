//! # Combat
//!
//! Turn-based fights started by monster and boss encounters.
//!
//! A [`Battle`] owns the live copy of the monster for as long as the fight lasts. Each
//! round the player picks a [`BattleCommand`] and the monster answers unless it died or
//! the player got away.

use crate::utils::roll;
use crate::{Monster, MonsterDifficulty, PlayerCharacter, Position};
use log::debug;
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Player choices during a fight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleCommand {
    Attack,
    /// Doubles defense against the next counterattack
    Defend,
    /// 50% chance to escape; bosses cannot be fled
    Flee,
}

/// Where the fight stands after a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleResult {
    Ongoing,
    Victory { gold: u32, exp: u32 },
    Fled,
    PlayerDefeated,
}

impl BattleResult {
    pub fn is_over(self) -> bool {
        !matches!(self, BattleResult::Ongoing)
    }
}

/// Everything that happened in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub messages: Vec<String>,
    pub result: BattleResult,
}

impl RoundReport {
    fn new() -> Self {
        Self {
            damage_dealt: 0,
            damage_taken: 0,
            messages: Vec::new(),
            result: BattleResult::Ongoing,
        }
    }
}

/// An active fight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battle {
    pub monster: Monster,
    /// Tile the fight started on
    pub position: Position,
    pub rounds: u32,
}

impl Battle {
    pub fn new(monster: Monster, position: Position) -> Self {
        Self {
            monster,
            position,
            rounds: 0,
        }
    }

    pub fn is_boss(&self) -> bool {
        self.monster.difficulty == MonsterDifficulty::BossTier
    }

    /// Plays one round. Applies damage to the player directly; rewards are reported in
    /// the result for the caller to hand out.
    pub fn round(
        &mut self,
        command: BattleCommand,
        player: &mut PlayerCharacter,
        rng: &mut StdRng,
    ) -> RoundReport {
        self.rounds += 1;
        let mut report = RoundReport::new();

        match command {
            BattleCommand::Attack => {
                let damage = (player.total_damage + roll(rng, 0, 5) as i32 - self.monster.defense).max(1);
                self.monster.hp = (self.monster.hp - damage).max(0);
                report.damage_dealt = damage as u32;
                report.messages.push(format!(
                    "You hit the {} for {} damage! ({} HP left)",
                    self.monster.name, damage, self.monster.hp
                ));

                if self.monster.hp == 0 {
                    let gold = rng.gen_range(self.monster.min_loot..=self.monster.max_loot);
                    let exp = self.monster.exp_reward;
                    report.messages.push(format!(
                        "You have defeated the {}! You loot {} gold and gain {} XP.",
                        self.monster.name, gold, exp
                    ));
                    report.result = BattleResult::Victory { gold, exp };
                } else {
                    self.counterattack(player, false, rng, &mut report);
                }
            }
            BattleCommand::Defend => {
                report.messages.push("You raise your guard.".to_string());
                self.counterattack(player, true, rng, &mut report);
            }
            BattleCommand::Flee => {
                if self.is_boss() {
                    report
                        .messages
                        .push(format!("The {} blocks your escape!", self.monster.name));
                    self.counterattack(player, false, rng, &mut report);
                } else if rng.gen_bool(0.5) {
                    report.messages.push("You successfully fled from battle!".to_string());
                    report.result = BattleResult::Fled;
                } else {
                    report.messages.push("You failed to escape!".to_string());
                    self.counterattack(player, false, rng, &mut report);
                }
            }
        }

        debug!(
            "Round {} vs {}: {:?}, dealt {}, taken {}, {:?}",
            self.rounds, self.monster.name, command, report.damage_dealt, report.damage_taken, report.result
        );
        report
    }

    /// The monster's free attack after the player used an item.
    pub fn free_attack(&mut self, player: &mut PlayerCharacter, rng: &mut StdRng) -> RoundReport {
        self.rounds += 1;
        let mut report = RoundReport::new();
        self.counterattack(player, false, rng, &mut report);
        report
    }

    fn counterattack(
        &self,
        player: &mut PlayerCharacter,
        defending: bool,
        rng: &mut StdRng,
        report: &mut RoundReport,
    ) {
        let raw = self.monster.attack + roll(rng, 0, 5) as i32;
        let damage = if defending {
            (raw - player.total_defense * 2).max(0)
        } else {
            (raw - player.total_defense).max(1)
        };

        let taken = player.take_damage(damage as u32);
        report.damage_taken += taken;
        report.messages.push(format!(
            "The {} hits you for {} damage! ({} HP left)",
            self.monster.name, taken, player.health
        ));

        if !player.is_alive() {
            report.messages.push(format!("You were slain by the {}.", self.monster.name));
            report.result = BattleResult::PlayerDefeated;
        }
    }
}
