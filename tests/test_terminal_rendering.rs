//! Screen rendering through the crossterm display into an in-memory buffer.

use crawler::{
    compose_screen, full_map, CrawlerResult, GameState, GenerationConfig, PlayerClass,
    PlayerInput, ScreenMode, TerminalDisplay,
};

fn render(state: &GameState) -> CrawlerResult<String> {
    let mut display = TerminalDisplay::new(Vec::new());
    display.render(state, None, "Enter command: ")?;
    Ok(String::from_utf8_lossy(&display.into_inner()).to_string())
}

#[test]
fn test_explore_screen() -> CrawlerResult<()> {
    let state = GameState::new(GenerationConfig::new(8), PlayerClass::Warrior)?;
    let output = render(&state)?;

    assert!(output.contains("Dungeon Crawler"));
    assert!(output.contains("Map - Position: (25, 25)"));
    assert!(output.contains("Welcome to the dungeon!"));
    assert!(output.contains("Enter command: "));
    Ok(())
}

#[test]
fn test_full_map_screen_shows_every_landmark() -> CrawlerResult<()> {
    let mut state = GameState::new(GenerationConfig::for_testing(8), PlayerClass::Mage)?;
    state.execute(PlayerInput::ShowMap)?;
    assert_eq!(state.screen, ScreenMode::FullMap);

    let rows = full_map(&state.grid, state.player_position);
    assert_eq!(rows.len(), 20);
    let bosses: usize = rows.iter().map(|row| row.matches('B').count()).sum();
    let shrines: usize = rows.iter().map(|row| row.matches('S').count()).sum();
    assert_eq!(bosses, 4);
    assert_eq!(shrines, 4);

    let screen = compose_screen(&state);
    assert!(screen.iter().any(|line| line.starts_with("Full map (20x20)")));
    Ok(())
}

#[test]
fn test_screen_returns_to_explore_after_a_move() -> CrawlerResult<()> {
    let mut state = GameState::new(GenerationConfig::new(8), PlayerClass::Warrior)?;
    state.execute(PlayerInput::ShowInventory)?;
    assert_eq!(state.screen, ScreenMode::Inventory);
    state.execute(PlayerInput::Move(crawler::Direction::East))?;
    assert_eq!(state.screen, ScreenMode::Explore);
    Ok(())
}

#[test]
fn test_lines_fit_a_standard_terminal() -> CrawlerResult<()> {
    let state = GameState::new(GenerationConfig::new(31), PlayerClass::Warrior)?;
    for line in compose_screen(&state) {
        assert!(line.chars().count() <= 120, "line too wide: {}", line);
    }
    Ok(())
}
