//! Generation timing and connectivity on the standard and large maps.

use crawler::generation::utils::create_rng;
use crawler::utils::is_fully_connected;
use crawler::{
    ContentPlacer, CrawlerResult, GameState, GenerationConfig, Generator, MazeGenerator,
    PlayerClass, PlayerInput, TileContent,
};
use std::time::{Duration, Instant};

#[test]
fn test_standard_map_generation_time() -> CrawlerResult<()> {
    let start = Instant::now();
    for seed in 0..10 {
        GameState::new(GenerationConfig::new(seed), PlayerClass::Warrior)?;
    }
    let elapsed = start.elapsed();
    println!("10 standard maps in {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10));
    Ok(())
}

#[test]
fn test_large_map_is_connected() -> CrawlerResult<()> {
    let config = GenerationConfig::for_large_map(77);
    let mut rng = create_rng(&config);

    let start = Instant::now();
    let mut grid = MazeGenerator::new().generate(&config, &mut rng)?;
    let summary = ContentPlacer::new().populate(&mut grid, &config, &mut rng)?;
    println!("500x500 map in {:?}", start.elapsed());

    assert_eq!(grid.size, 500);
    assert!(is_fully_connected(&grid));
    for (pos, _) in grid.landmark_positions() {
        assert!(grid.is_walkable(pos));
    }
    assert_eq!(
        grid.get_tile(grid.center()).map(|t| t.content),
        Some(TileContent::Empty)
    );
    assert!(summary.monsters > 0);
    Ok(())
}

#[test]
fn test_large_map_session_moves() -> CrawlerResult<()> {
    let mut state = GameState::new(GenerationConfig::for_large_map(3), PlayerClass::Mage)?;
    assert_eq!(state.player_position, state.grid.center());
    let events = state.execute(PlayerInput::ShowMap)?;
    assert!(!events.is_empty());
    Ok(())
}
