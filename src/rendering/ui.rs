//! # User Interface Elements
//!
//! Text layout for the status panels, the map views and the inventory.
//!
//! Everything here is a pure function from game state to lines of text. The terminal
//! display only decides where the lines go, so the layout can be tested without a
//! terminal.

use crate::input::{BATTLE_CONTROLS, EXPLORE_CONTROLS};
use crate::{
    config, Battle, GameCompletionState, GameState, Grid, ItemType, Landmark, LogEntry,
    MessageImportance, PlayerCharacter, Position, ScreenMode, TileContent, TileType, VERSION,
};

/// Number of log lines shown under the map.
pub const VISIBLE_MESSAGES: usize = 5;

/// Glyph for one map cell as seen from `player`.
///
/// Landmarks are always drawn. Everything else stays blank until the player has stood
/// on it or next to it.
pub fn tile_glyph(grid: &Grid, pos: Position, player: Position) -> char {
    if pos == player {
        return '@';
    }

    let tile = match grid.get_tile(pos) {
        Some(tile) => tile,
        None => return ' ',
    };

    if let Some(landmark) = grid.landmark_at(pos) {
        let glyph = match landmark {
            Landmark::Boss => 'B',
            Landmark::Shrine => 'S',
        };
        return if tile.consumed {
            glyph.to_ascii_lowercase()
        } else {
            glyph
        };
    }

    if pos == grid.center() {
        return '+';
    }

    if !grid.is_revealed(pos) {
        return ' ';
    }

    if tile.consumed {
        let spent = match tile.content {
            TileContent::Monster => Some('m'),
            TileContent::Treasure => Some('$'),
            TileContent::Trap => Some('^'),
            TileContent::HealingFountain => Some('~'),
            _ => None,
        };
        if let Some(glyph) = spent {
            return glyph;
        }
    }

    match tile.tile_type {
        TileType::Wall => '#',
        TileType::Floor if tile.visited => '.',
        TileType::Corridor if tile.visited => ',',
        _ => ' ',
    }
}

/// Square window of `radius` tiles around the player, one string per row.
pub fn viewport(grid: &Grid, player: Position, radius: i32) -> Vec<String> {
    (player.y - radius..=player.y + radius)
        .map(|y| {
            (player.x - radius..=player.x + radius)
                .map(|x| tile_glyph(grid, Position::new(x, y), player))
                .collect()
        })
        .collect()
}

/// The whole grid, one string per row.
pub fn full_map(grid: &Grid, player: Position) -> Vec<String> {
    let size = grid.size as i32;
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| tile_glyph(grid, Position::new(x, y), player))
                .collect()
        })
        .collect()
}

/// The whole grid with every tile revealed and nothing consumed shown, for debugging
/// generated maps.
pub fn topology_map(grid: &Grid) -> Vec<String> {
    let size = grid.size as i32;
    (0..size)
        .map(|y| {
            (0..size)
                .map(|x| {
                    let pos = Position::new(x, y);
                    match (grid.landmark_at(pos), grid.get_tile(pos).map(|t| t.tile_type)) {
                        (Some(Landmark::Boss), _) => 'B',
                        (Some(Landmark::Shrine), _) => 'S',
                        _ if pos == grid.center() => '+',
                        (None, Some(TileType::Floor)) => '.',
                        (None, Some(TileType::Corridor)) => ',',
                        _ => '#',
                    }
                })
                .collect()
        })
        .collect()
}

pub fn title_bar() -> String {
    format!("=== Dungeon Crawler v{} ===", VERSION)
}

/// Level, health, experience, gold, combat numbers and exploration progress.
pub fn status_panel(state: &GameState) -> Vec<String> {
    let player = &state.player;
    let exploration = state.grid.exploration_stats();
    vec![
        format!("{} the {}  Level {}", player.name, player.class.name(), player.level),
        format!(
            "HP: {}/{}  XP: {}/{}  Gold: {}",
            player.health, player.max_health, player.experience, player.exp_to_next_level, player.gold
        ),
        format!(
            "Attack: {} (base {})  Defense: {} (base {})",
            player.total_damage, player.base_damage, player.total_defense, player.base_defense
        ),
        format!(
            "Explored: {}%  Bosses slain: {}/{}  Turn: {}",
            exploration.completion_percent(),
            state.statistics.bosses_defeated,
            config::BOSS_COUNT,
            state.turn_number
        ),
    ]
}

pub fn equipment_panel(player: &PlayerCharacter) -> Vec<String> {
    let weapon = player
        .equipped_weapon()
        .map(|item| format!("{} (+{} dmg)", item.name, item.stats.damage))
        .unwrap_or_else(|| "(none)".to_string());
    let armor = player
        .equipped_armor()
        .map(|item| format!("{} (+{} def)", item.name, item.stats.defense))
        .unwrap_or_else(|| "(none)".to_string());

    vec![format!("Weapon: {}", weapon), format!("Armor:  {}", armor)]
}

pub fn battle_panel(battle: &Battle) -> Vec<String> {
    let monster = &battle.monster;
    vec![
        format!("--- BATTLE: {} (level {}) ---", monster.name, monster.level),
        format!(
            "Monster HP: {}  Attack: {}  Defense: {}",
            monster.hp, monster.attack, monster.defense
        ),
    ]
}

/// Numbered inventory listing; slot numbers are the ones `U` and `R` accept.
pub fn inventory_panel(player: &PlayerCharacter) -> Vec<String> {
    let mut lines = vec![format!(
        "Inventory ({}/{})",
        player.inventory.len(),
        config::MAX_INVENTORY
    )];

    if player.inventory.is_empty() {
        lines.push("  (empty)".to_string());
        return lines;
    }

    for (slot, item) in player.inventory.iter().enumerate() {
        let mut line = format!("  {}. {}", slot + 1, item.name);
        if item.quantity > 1 {
            line.push_str(&format!(" x{}", item.quantity));
        }
        line.push_str(&format!(" [{}]", item.item_type.name()));
        match item.item_type {
            ItemType::Weapon => line.push_str(&format!(" +{} dmg", item.stats.damage)),
            ItemType::Armor => line.push_str(&format!(" +{} def", item.stats.defense)),
            _ => {}
        }
        if player.equipped.weapon == Some(slot) || player.equipped.armor == Some(slot) {
            line.push_str(" (equipped)");
        }
        lines.push(line);
    }
    lines
}

pub fn legend() -> String {
    "@ you  + spawn  B boss  S shrine  # wall  . floor  , corridor  m $ ^ ~ spent".to_string()
}

pub fn controls(in_battle: bool) -> String {
    let table: &[(&str, &str)] = if in_battle {
        &BATTLE_CONTROLS
    } else {
        &EXPLORE_CONTROLS
    };
    table
        .iter()
        .map(|(key, action)| format!("{}: {}", key, action))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// The newest `count` messages, oldest first. Important lines are starred and critical
/// ones flagged.
pub fn recent_messages(state: &GameState, count: usize) -> Vec<String> {
    let all: Vec<&LogEntry> = state.log_entries().collect();
    let start = all.len().saturating_sub(count);
    all[start..]
        .iter()
        .map(|entry| match entry.importance {
            MessageImportance::Normal => entry.text.clone(),
            MessageImportance::Important => format!("* {}", entry.text),
            MessageImportance::Critical => format!("!! {}", entry.text),
        })
        .collect()
}

/// Closing line for a finished game.
pub fn ending_banner(state: &GameState) -> Option<String> {
    let text = match state.completion_state {
        GameCompletionState::Playing => return None,
        GameCompletionState::Quit => "You leave the dungeon.",
        GameCompletionState::PlayerDied => "You have perished in the dungeon. Game Over!",
        GameCompletionState::Conquered => "Victory! Every dragon lies slain.",
    };
    Some(format!(
        "{} Final level {}, {} gold, {} steps.",
        text, state.player.level, state.player.gold, state.statistics.steps_taken
    ))
}

/// Every line of the screen, top to bottom.
pub fn compose_screen(state: &GameState) -> Vec<String> {
    let mut lines = vec![title_bar(), String::new()];
    lines.extend(status_panel(state));
    lines.extend(equipment_panel(&state.player));
    lines.push(String::new());

    if let Some(battle) = &state.battle {
        lines.extend(battle_panel(battle));
        lines.push(String::new());
    }

    match state.screen {
        ScreenMode::Explore => {
            lines.push(format!("Map - Position: {}", state.player_position));
            lines.extend(viewport(&state.grid, state.player_position, config::VIEW_RADIUS));
        }
        ScreenMode::FullMap => {
            lines.push(format!("Full map ({}x{})", state.grid.size, state.grid.size));
            lines.extend(full_map(&state.grid, state.player_position));
        }
        ScreenMode::Inventory => lines.extend(inventory_panel(&state.player)),
    }

    lines.push(legend());
    lines.push(String::new());
    lines.extend(recent_messages(state, VISIBLE_MESSAGES));
    lines.push(String::new());

    match ending_banner(state) {
        Some(banner) => lines.push(banner),
        None => lines.push(controls(state.in_battle())),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GenerationConfig, PlayerClass};

    fn state() -> GameState {
        GameState::new(GenerationConfig::new(12345), PlayerClass::Warrior).unwrap()
    }

    #[test]
    fn test_viewport_centers_player() {
        let state = state();
        let rows = viewport(&state.grid, state.player_position, 7);
        assert_eq!(rows.len(), 15);
        assert!(rows.iter().all(|row| row.chars().count() == 15));
        assert_eq!(rows[7].chars().nth(7), Some('@'));
    }

    #[test]
    fn test_unrevealed_tiles_are_blank() {
        let state = state();
        // Far from the spawn and not a landmark
        assert_eq!(tile_glyph(&state.grid, Position::new(10, 3), state.player_position), ' ');
        assert_eq!(tile_glyph(&state.grid, Position::new(-3, 3), state.player_position), ' ');
    }

    #[test]
    fn test_landmarks_always_drawn() {
        let mut state = state();
        let player = state.player_position;
        assert_eq!(tile_glyph(&state.grid, Position::new(0, 0), player), 'B');
        assert_eq!(tile_glyph(&state.grid, Position::new(25, 0), player), 'S');

        state.grid.get_tile_mut(Position::new(0, 0)).unwrap().consume();
        assert_eq!(tile_glyph(&state.grid, Position::new(0, 0), player), 'b');
    }

    #[test]
    fn test_revealed_glyphs() {
        let mut grid = Grid::new(10).unwrap();
        let visited = Position::new(3, 3);
        let corridor = Position::new(3, 4);
        grid.set_tile_type(visited, TileType::Floor).unwrap();
        grid.set_tile_type(corridor, TileType::Corridor).unwrap();
        grid.mark_visited(visited);
        let player = Position::new(8, 8);

        assert_eq!(tile_glyph(&grid, visited, player), '.');
        assert_eq!(tile_glyph(&grid, Position::new(2, 3), player), '#');
        // Revealed but never stood on
        assert_eq!(tile_glyph(&grid, corridor, player), ' ');

        grid.mark_visited(corridor);
        assert_eq!(tile_glyph(&grid, corridor, player), ',');

        let tile = grid.get_tile_mut(corridor).unwrap();
        tile.content = TileContent::Treasure;
        tile.consume();
        assert_eq!(tile_glyph(&grid, corridor, player), '$');
        assert_eq!(tile_glyph(&grid, grid.center(), player), '+');
    }

    #[test]
    fn test_full_map_dimensions() {
        let state = state();
        let rows = full_map(&state.grid, state.player_position);
        assert_eq!(rows.len(), 50);
        assert!(rows[0].starts_with('B'));
        assert!(rows[0].ends_with('B'));
    }

    #[test]
    fn test_topology_map() {
        let state = state();
        let rows = topology_map(&state.grid);
        assert_eq!(rows[25].chars().nth(25), Some('+'));
        assert_eq!(rows[0].chars().nth(25), Some('S'));
        let open = rows.iter().flat_map(|r| r.chars()).filter(|c| *c != '#').count();
        assert_eq!(open, state.grid.walkable_count());
    }

    #[test]
    fn test_status_and_inventory_panels() {
        let state = state();
        let status = status_panel(&state);
        assert!(status[1].starts_with("HP: 100/100"));
        assert!(status[2].contains("Attack: 21 (base 15)"));
        assert!(status[3].starts_with("Explored: 0%"));

        let inventory = inventory_panel(&state.player);
        assert_eq!(inventory[0], "Inventory (3/24)");
        assert_eq!(inventory[1], "  1. Rusty Sword [Weapon] +6 dmg (equipped)");
        assert_eq!(inventory[2], "  2. Small Potion x3 [Consumable]");

        let equipment = equipment_panel(&state.player);
        assert_eq!(equipment[0], "Weapon: Rusty Sword (+6 dmg)");
    }

    #[test]
    fn test_recent_messages_flag_importance() {
        let mut state = state();
        state.log_with("You feel stronger.", MessageImportance::Important);
        state.log_with("The Ancient Dragon is slain!", MessageImportance::Critical);
        state.log("You move to (25, 24).");

        let lines = recent_messages(&state, 3);
        assert_eq!(
            lines,
            vec![
                "* You feel stronger.".to_string(),
                "!! The Ancient Dragon is slain!".to_string(),
                "You move to (25, 24).".to_string(),
            ]
        );
        assert_eq!(recent_messages(&state, 10).len(), 4);
    }

    #[test]
    fn test_controls_follow_mode() {
        assert!(controls(false).starts_with("N/S/E/W: Move"));
        assert!(controls(true).starts_with("A: Attack"));
    }

    #[test]
    fn test_compose_screen_modes() {
        let mut state = state();
        let screen = compose_screen(&state);
        assert_eq!(screen[0], title_bar());
        assert!(screen.iter().any(|line| line.starts_with("Map - Position: (25, 25)")));

        state.screen = ScreenMode::Inventory;
        let screen = compose_screen(&state);
        assert!(screen.iter().any(|line| line.starts_with("Inventory (")));
    }
}
