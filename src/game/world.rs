//! # World Representation
//!
//! The square tile grid the whole game happens on.
//!
//! The grid is a dense row-major `tiles[y][x]` array created once at startup. After
//! generation only the `consumed` and `visited` flags ever change.

use crate::{config, CrawlerError, CrawlerResult, Position};
use serde::{Deserialize, Serialize};

/// Static topology of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileType {
    /// Solid rock
    Wall,
    /// Carved maze cell or landmark
    Floor,
    /// Passage between two maze cells
    Corridor,
}

impl TileType {
    /// Whether the player can stand on this tile.
    pub fn is_passable(self) -> bool {
        !matches!(self, TileType::Wall)
    }
}

/// The one-shot encounter assigned to a tile at generation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileContent {
    Empty,
    Monster,
    Treasure,
    Trap,
    HealingFountain,
    Boss,
    Shrine,
}

impl TileContent {
    /// Human readable name.
    pub fn label(self) -> &'static str {
        match self {
            TileContent::Empty => "empty",
            TileContent::Monster => "monster",
            TileContent::Treasure => "treasure",
            TileContent::Trap => "trap",
            TileContent::HealingFountain => "healing fountain",
            TileContent::Boss => "boss",
            TileContent::Shrine => "shrine",
        }
    }
}

/// Monster strength tier stored on monster and boss tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MonsterDifficulty {
    Easy,
    Medium,
    Hard,
    BossTier,
}

/// Fixed landmarks at the corners and the edge midpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Landmark {
    /// Corner lair
    Boss,
    /// Edge midpoint shrine
    Shrine,
}

impl Landmark {
    /// Classifies a position on a grid of the given size.
    ///
    /// This is the only place the corner/edge arithmetic lives; everything else asks
    /// the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::{Landmark, Position};
    ///
    /// assert_eq!(Landmark::locate(50, Position::new(0, 49)), Some(Landmark::Boss));
    /// assert_eq!(Landmark::locate(50, Position::new(25, 0)), Some(Landmark::Shrine));
    /// assert_eq!(Landmark::locate(50, Position::new(25, 25)), None);
    /// ```
    pub fn locate(size: u32, pos: Position) -> Option<Landmark> {
        let last = size as i32 - 1;
        let center = (size / 2) as i32;
        let on_edge_x = pos.x == 0 || pos.x == last;
        let on_edge_y = pos.y == 0 || pos.y == last;

        if on_edge_x && on_edge_y {
            Some(Landmark::Boss)
        } else if (pos.x == center && on_edge_y) || (pos.y == center && on_edge_x) {
            Some(Landmark::Shrine)
        } else {
            None
        }
    }

    /// All eight landmark positions for a grid size, corners first.
    pub fn positions(size: u32) -> [(Position, Landmark); 8] {
        let last = size as i32 - 1;
        let center = (size / 2) as i32;
        [
            (Position::new(0, 0), Landmark::Boss),
            (Position::new(last, 0), Landmark::Boss),
            (Position::new(0, last), Landmark::Boss),
            (Position::new(last, last), Landmark::Boss),
            (Position::new(center, 0), Landmark::Shrine),
            (Position::new(center, last), Landmark::Shrine),
            (Position::new(0, center), Landmark::Shrine),
            (Position::new(last, center), Landmark::Shrine),
        ]
    }
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    /// Topology, fixed after generation
    pub tile_type: TileType,
    /// Encounter kind, fixed after generation
    pub content: TileContent,
    /// Monster tier, only set for monster and boss tiles
    pub difficulty: Option<MonsterDifficulty>,
    /// Gold on treasure tiles, zero elsewhere
    pub treasure_value: u32,
    /// Latches once the encounter has fired
    pub consumed: bool,
    /// Latches once the player has stood here
    pub visited: bool,
}

impl Tile {
    /// Creates an empty tile of the given topology.
    pub fn new(tile_type: TileType) -> Self {
        Self {
            tile_type,
            content: TileContent::Empty,
            difficulty: None,
            treasure_value: 0,
            consumed: false,
            visited: false,
        }
    }

    pub fn wall() -> Self {
        Self::new(TileType::Wall)
    }

    pub fn floor() -> Self {
        Self::new(TileType::Floor)
    }

    pub fn corridor() -> Self {
        Self::new(TileType::Corridor)
    }

    pub fn is_walkable(&self) -> bool {
        self.tile_type.is_passable()
    }

    /// Marks the encounter as spent. Returns `false` if it already was.
    pub fn consume(&mut self) -> bool {
        let fresh = !self.consumed;
        self.consumed = true;
        fresh
    }
}

/// Read-only projection of a tile for the UI.
///
/// Content is only revealed once the tile has been consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub tile_type: TileType,
    pub content: Option<TileContent>,
    pub visited: bool,
    pub consumed: bool,
    pub landmark: Option<Landmark>,
}

/// Exploration counters reported in the status panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExplorationStats {
    /// Walkable tiles carrying non-empty content
    pub content_tiles: u32,
    /// Of those, how many have fired
    pub consumed_tiles: u32,
    /// All walkable tiles
    pub walkable_tiles: u32,
    /// Walkable tiles the player has stood on
    pub visited_tiles: u32,
}

impl ExplorationStats {
    /// Percentage of content tiles already consumed.
    pub fn completion_percent(&self) -> u32 {
        if self.content_tiles == 0 {
            return 100;
        }
        self.consumed_tiles * 100 / self.content_tiles
    }
}

/// The square dungeon map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    /// Side length
    pub size: u32,
    /// Tiles indexed `[y][x]`
    pub tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// Creates a grid of solid walls.
    ///
    /// The landmark layout is symmetric only for even sizes, so odd sizes and sizes
    /// below [`config::MIN_MAP_SIZE`] are rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::Grid;
    ///
    /// let grid = Grid::new(50).unwrap();
    /// assert_eq!(grid.center().x, 25);
    /// assert!(Grid::new(51).is_err());
    /// ```
    pub fn new(size: u32) -> CrawlerResult<Self> {
        if size < config::MIN_MAP_SIZE || size % 2 != 0 {
            return Err(CrawlerError::InvalidGridSize(size));
        }

        let tiles = (0..size)
            .map(|_| (0..size).map(|_| Tile::wall()).collect())
            .collect();

        Ok(Self { size, tiles })
    }

    /// The spawn point, `(size/2, size/2)`.
    pub fn center(&self) -> Position {
        let c = (self.size / 2) as i32;
        Position::new(c, c)
    }

    pub fn is_valid_position(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size as i32 && pos.y < self.size as i32
    }

    pub fn get_tile(&self, pos: Position) -> Option<&Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get(pos.y as usize)
            .and_then(|row| row.get(pos.x as usize))
    }

    pub fn get_tile_mut(&mut self, pos: Position) -> Option<&mut Tile> {
        if !self.is_valid_position(pos) {
            return None;
        }
        self.tiles
            .get_mut(pos.y as usize)
            .and_then(|row| row.get_mut(pos.x as usize))
    }

    /// Changes the topology of a tile.
    pub fn set_tile_type(&mut self, pos: Position, tile_type: TileType) -> CrawlerResult<()> {
        let tile = self.get_tile_mut(pos).ok_or_else(|| {
            CrawlerError::InvalidAction(format!("Position {} is outside the grid", pos))
        })?;
        tile.tile_type = tile_type;
        Ok(())
    }

    /// Bounds-checked walkability; out-of-bounds and walls are both `false`.
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get_tile(pos).map(Tile::is_walkable).unwrap_or(false)
    }

    /// Read-only projection of a tile, `None` when out of bounds.
    pub fn tile_view(&self, pos: Position) -> Option<TileView> {
        self.get_tile(pos).map(|tile| TileView {
            tile_type: tile.tile_type,
            content: tile.consumed.then_some(tile.content),
            visited: tile.visited,
            consumed: tile.consumed,
            landmark: self.landmark_at(pos),
        })
    }

    /// Landmark at a position, if any.
    pub fn landmark_at(&self, pos: Position) -> Option<Landmark> {
        Landmark::locate(self.size, pos)
    }

    /// All eight landmark positions of this grid.
    pub fn landmark_positions(&self) -> [(Position, Landmark); 8] {
        Landmark::positions(self.size)
    }

    /// Iterates every position in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let size = self.size as i32;
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }

    /// Marks a tile as visited. Returns `true` the first time.
    pub fn mark_visited(&mut self, pos: Position) -> bool {
        match self.get_tile_mut(pos) {
            Some(tile) if !tile.visited => {
                tile.visited = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_visited(&self, pos: Position) -> bool {
        self.get_tile(pos).map(|t| t.visited).unwrap_or(false)
    }

    /// A tile is revealed when it or one of its cardinal neighbours was visited.
    pub fn is_revealed(&self, pos: Position) -> bool {
        self.is_visited(pos)
            || pos
                .cardinal_adjacent_positions()
                .into_iter()
                .any(|p| self.is_visited(p))
    }

    /// Clears exploration state on every tile.
    pub fn reset_visited(&mut self) {
        for tile in self.tiles.iter_mut().flatten() {
            tile.visited = false;
        }
    }

    /// Number of walkable tiles.
    pub fn walkable_count(&self) -> usize {
        self.tiles.iter().flatten().filter(|t| t.is_walkable()).count()
    }

    /// Counts content, consumption and visits over walkable tiles.
    pub fn exploration_stats(&self) -> ExplorationStats {
        let mut stats = ExplorationStats::default();
        for tile in self.tiles.iter().flatten().filter(|t| t.is_walkable()) {
            stats.walkable_tiles += 1;
            if tile.visited {
                stats.visited_tiles += 1;
            }
            if tile.content != TileContent::Empty {
                stats.content_tiles += 1;
                if tile.consumed {
                    stats.consumed_tiles += 1;
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_bad_sizes() {
        assert!(matches!(Grid::new(3), Err(CrawlerError::InvalidGridSize(3))));
        assert!(matches!(Grid::new(51), Err(CrawlerError::InvalidGridSize(51))));
        assert!(Grid::new(4).is_ok());
        assert!(Grid::new(50).is_ok());
    }

    #[test]
    fn test_new_grid_is_solid() {
        let grid = Grid::new(10).unwrap();
        assert_eq!(grid.walkable_count(), 0);
        assert!(!grid.is_walkable(grid.center()));
    }

    #[test]
    fn test_is_walkable_bounds() {
        let mut grid = Grid::new(10).unwrap();
        grid.set_tile_type(Position::new(0, 0), TileType::Floor).unwrap();
        assert!(grid.is_walkable(Position::new(0, 0)));
        assert!(!grid.is_walkable(Position::new(-1, 0)));
        assert!(!grid.is_walkable(Position::new(10, 0)));
        assert!(!grid.is_walkable(Position::new(0, 10)));
        assert!(grid.set_tile_type(Position::new(10, 10), TileType::Floor).is_err());
    }

    #[test]
    fn test_landmark_classification() {
        let size = 50;
        let corners = [(0, 0), (49, 0), (0, 49), (49, 49)];
        for (x, y) in corners {
            assert_eq!(Landmark::locate(size, Position::new(x, y)), Some(Landmark::Boss));
        }
        let edges = [(25, 0), (25, 49), (0, 25), (49, 25)];
        for (x, y) in edges {
            assert_eq!(Landmark::locate(size, Position::new(x, y)), Some(Landmark::Shrine));
        }
        assert_eq!(Landmark::locate(size, Position::new(24, 0)), None);
        assert_eq!(Landmark::locate(size, Position::new(25, 25)), None);
    }

    #[test]
    fn test_landmark_positions_agree_with_locate() {
        for size in [4, 10, 50] {
            for (pos, landmark) in Landmark::positions(size) {
                assert_eq!(Landmark::locate(size, pos), Some(landmark));
            }
        }
    }

    #[test]
    fn test_tile_view_hides_unconsumed_content() {
        let mut grid = Grid::new(10).unwrap();
        let pos = Position::new(3, 3);
        {
            let tile = grid.get_tile_mut(pos).unwrap();
            tile.tile_type = TileType::Floor;
            tile.content = TileContent::Trap;
        }
        assert_eq!(grid.tile_view(pos).unwrap().content, None);

        grid.get_tile_mut(pos).unwrap().consume();
        assert_eq!(grid.tile_view(pos).unwrap().content, Some(TileContent::Trap));
        assert!(grid.tile_view(Position::new(-1, 3)).is_none());
    }

    #[test]
    fn test_consume_latches() {
        let mut tile = Tile::floor();
        assert!(tile.consume());
        assert!(!tile.consume());
        assert!(tile.consumed);
    }

    #[test]
    fn test_visited_and_revealed() {
        let mut grid = Grid::new(10).unwrap();
        let pos = Position::new(4, 4);
        assert!(grid.mark_visited(pos));
        assert!(!grid.mark_visited(pos));
        assert!(grid.is_revealed(Position::new(4, 3)));
        assert!(!grid.is_revealed(Position::new(3, 3)));

        grid.reset_visited();
        assert!(!grid.is_visited(pos));
    }

    #[test]
    fn test_exploration_stats() {
        let mut grid = Grid::new(10).unwrap();
        for x in 1..5 {
            grid.set_tile_type(Position::new(x, 1), TileType::Floor).unwrap();
        }
        grid.get_tile_mut(Position::new(1, 1)).unwrap().content = TileContent::Monster;
        grid.get_tile_mut(Position::new(2, 1)).unwrap().content = TileContent::Treasure;
        grid.get_tile_mut(Position::new(2, 1)).unwrap().consume();
        grid.mark_visited(Position::new(2, 1));

        let stats = grid.exploration_stats();
        assert_eq!(stats.walkable_tiles, 4);
        assert_eq!(stats.content_tiles, 2);
        assert_eq!(stats.consumed_tiles, 1);
        assert_eq!(stats.visited_tiles, 1);
        assert_eq!(stats.completion_percent(), 50);
    }
}
