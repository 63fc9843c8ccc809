//! # Dungeon Generation
//!
//! Maze carving with a randomized depth-first backtracker.
//!
//! The maze lives on a coarse lattice: cells an even number of steps away from the
//! center on both axes. Carving a lattice cell and then a neighbour two steps away opens
//! the single wall cell between them, which leaves a one-tile wall lattice separating
//! the passages. The result is a perfect maze (a spanning tree) rooted at the spawn
//! point. Two passes follow:
//!
//! 1. The eight landmark tiles (corners and edge midpoints) are forced to floor and
//!    tunnelled to their nearest lattice cell, since the lattice may not reach them.
//! 2. A fraction of the remaining walls between adjacent lattice cells are opened,
//!    adding loops so exploration is less backtrack-heavy.

use crate::generation::utils::validate_grid;
use crate::{
    CrawlerError, CrawlerResult, Direction, GenerationConfig, Generator, Grid, Position, TileType,
};
use log::{debug, info, trace};
use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng};

/// Maze generator producing the static topology of the map.
///
/// Carving uses an explicit stack rather than recursion, so the 500x500 map does not
/// depend on call-stack depth.
#[derive(Debug, Clone)]
pub struct MazeGenerator {
    /// Whether to open extra corridors after carving the perfect maze
    pub punch_loops: bool,
    /// Whether to flood-fill check the result
    pub ensure_connectivity: bool,
}

/// One suspended step of the depth-first carve.
#[derive(Debug, Clone)]
struct CarveFrame {
    cell: Position,
    directions: [Direction; 4],
    next: usize,
}

impl CarveFrame {
    fn new(cell: Position, rng: &mut StdRng) -> Self {
        let mut directions = Direction::all();
        directions.shuffle(rng);
        Self {
            cell,
            directions,
            next: 0,
        }
    }
}

impl MazeGenerator {
    /// Creates a maze generator with default settings.
    ///
    /// # Examples
    ///
    /// ```
    /// use crawler::MazeGenerator;
    ///
    /// let generator = MazeGenerator::new();
    /// assert!(generator.punch_loops);
    /// ```
    pub fn new() -> Self {
        Self {
            punch_loops: true,
            ensure_connectivity: true,
        }
    }

    /// Creates a generator that stops after the perfect maze and landmark repair.
    pub fn perfect() -> Self {
        Self {
            punch_loops: false,
            ensure_connectivity: true,
        }
    }

    /// Whether a position is a lattice cell: interior, and an even number of steps from
    /// the center on both axes.
    pub fn is_lattice_cell(grid: &Grid, pos: Position) -> bool {
        let last = grid.size as i32 - 1;
        let center = grid.center();
        (1..last).contains(&pos.x)
            && (1..last).contains(&pos.y)
            && (pos.x - center.x).rem_euclid(2) == 0
            && (pos.y - center.y).rem_euclid(2) == 0
    }

    /// Whether a position is the wall slot between two orthogonally adjacent lattice
    /// cells.
    pub fn is_connector(grid: &Grid, pos: Position) -> bool {
        [Direction::East, Direction::South].iter().any(|&direction| {
            let before = pos.step(direction, -1);
            let after = pos.step(direction, 1);
            Self::is_lattice_cell(grid, before) && Self::is_lattice_cell(grid, after)
        })
    }

    /// Carves the perfect maze from the center. Returns the number of lattice cells
    /// carved.
    fn carve_maze(&self, grid: &mut Grid, rng: &mut StdRng) -> CrawlerResult<usize> {
        let size = grid.size as usize;
        let index = |pos: Position| pos.y as usize * size + pos.x as usize;
        let mut carved = vec![false; size * size];

        let start = grid.center();
        grid.set_tile_type(start, TileType::Floor)?;
        carved[index(start)] = true;
        let mut cell_count = 1;

        let mut stack = vec![CarveFrame::new(start, rng)];
        while let Some(frame) = stack.last_mut() {
            if frame.next == frame.directions.len() {
                stack.pop();
                continue;
            }

            let direction = frame.directions[frame.next];
            frame.next += 1;
            let cell = frame.cell;

            let target = cell.step(direction, 2);
            if !Self::is_lattice_cell(grid, target) || carved[index(target)] {
                continue;
            }

            grid.set_tile_type(cell.step(direction, 1), TileType::Corridor)?;
            grid.set_tile_type(target, TileType::Floor)?;
            carved[index(target)] = true;
            cell_count += 1;
            trace!("Carved {} -> {}", cell, target);

            stack.push(CarveFrame::new(target, rng));
        }

        Ok(cell_count)
    }

    /// Nearest lattice coordinate along one axis.
    fn nearest_lattice_coord(value: i32, center: i32, last: i32) -> i32 {
        let low = if (1 - center).rem_euclid(2) == 0 { 1 } else { 2 };
        let high = if (last - 1 - center).rem_euclid(2) == 0 {
            last - 1
        } else {
            last - 2
        };

        let clamped = value.clamp(low, high);
        if (clamped - center).rem_euclid(2) == 0 {
            clamped
        } else if clamped < center {
            clamped + 1
        } else {
            clamped - 1
        }
    }

    /// Forces every landmark to floor and tunnels it to the nearest lattice cell.
    ///
    /// Works on any grid, including one the maze never touched: the lattice cell at
    /// the end of each tunnel is opened too if it is still rock.
    pub fn secure_landmarks(grid: &mut Grid) -> CrawlerResult<()> {
        let last = grid.size as i32 - 1;
        let center = grid.center();

        for (landmark_pos, landmark) in grid.landmark_positions() {
            grid.set_tile_type(landmark_pos, TileType::Floor)?;

            let anchor = Position::new(
                Self::nearest_lattice_coord(landmark_pos.x, center.x, last),
                Self::nearest_lattice_coord(landmark_pos.y, center.y, last),
            );

            let mut cursor = landmark_pos;
            let mut tunnelled = 0;
            while cursor != anchor {
                let delta = if cursor.x != anchor.x {
                    Position::new((anchor.x - cursor.x).signum(), 0)
                } else {
                    Position::new(0, (anchor.y - cursor.y).signum())
                };
                cursor = cursor + delta;

                if !grid.is_walkable(cursor) {
                    let tile_type = if cursor == anchor {
                        TileType::Floor
                    } else {
                        TileType::Corridor
                    };
                    grid.set_tile_type(cursor, tile_type)?;
                    tunnelled += 1;
                }
            }

            debug!(
                "Secured {:?} landmark at {} via {} ({} tiles tunnelled)",
                landmark, landmark_pos, anchor, tunnelled
            );
        }

        Ok(())
    }

    /// Opens walls between adjacent lattice cells with the given probability. Returns
    /// how many were opened.
    ///
    /// Only connectors are candidates, so every opened wall joins two floor cells and
    /// the one-cell wall lattice stays intact. The lattice ends one tile inside the
    /// border, so the walls in row and column `size - 2` are never connectors and only
    /// open where a landmark tunnel runs through them.
    fn punch_extra_corridors(&self, grid: &mut Grid, chance: f64, rng: &mut StdRng) -> CrawlerResult<usize> {
        let mut opened = 0;
        let candidates: Vec<Position> = grid
            .positions()
            .filter(|&pos| !grid.is_walkable(pos) && Self::is_connector(grid, pos))
            .collect();

        for pos in candidates {
            if rng.gen_bool(chance) {
                grid.set_tile_type(pos, TileType::Corridor)?;
                opened += 1;
            }
        }

        Ok(opened)
    }

    /// Checks that every landmark is walkable.
    fn validate_landmarks(grid: &Grid) -> CrawlerResult<()> {
        for (pos, landmark) in grid.landmark_positions() {
            if !grid.is_walkable(pos) {
                return Err(CrawlerError::GenerationFailed(format!(
                    "{:?} landmark at {} is not walkable",
                    landmark, pos
                )));
            }
        }
        Ok(())
    }
}

impl Generator<Grid> for MazeGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> CrawlerResult<Grid> {
        let mut grid = Grid::new(config.size)?;

        let cells = self.carve_maze(&mut grid, rng)?;
        Self::secure_landmarks(&mut grid)?;

        // The perfect maze is checked before loops are added
        let check = self.ensure_connectivity && config.validate_connectivity;
        if check {
            self.validate(&grid, config)?;
        }

        let opened = if self.punch_loops {
            self.punch_extra_corridors(&mut grid, config.extra_corridor_chance, rng)?
        } else {
            0
        };

        grid.reset_visited();

        info!(
            "Generated {}x{} maze (seed {}): {} cells, {} extra corridors, {} walkable tiles",
            config.size,
            config.size,
            config.seed,
            cells,
            opened,
            grid.walkable_count()
        );

        Ok(grid)
    }

    fn validate(&self, grid: &Grid, _config: &GenerationConfig) -> CrawlerResult<()> {
        Self::validate_landmarks(grid)?;
        validate_grid(grid)
    }

    fn generator_type(&self) -> &'static str {
        "MazeGenerator"
    }
}

impl Default for MazeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::utils::create_rng;
    use crate::utils;

    fn lattice_cells(grid: &Grid) -> usize {
        grid.positions()
            .filter(|&p| MazeGenerator::is_lattice_cell(grid, p))
            .count()
    }

    #[test]
    fn test_maze_generator_creation() {
        let generator = MazeGenerator::new();
        assert!(generator.punch_loops);
        assert!(generator.ensure_connectivity);
        assert!(!MazeGenerator::perfect().punch_loops);
        assert_eq!(generator.generator_type(), "MazeGenerator");
    }

    #[test]
    fn test_lattice_geometry() {
        let grid = Grid::new(50).unwrap();
        assert!(MazeGenerator::is_lattice_cell(&grid, Position::new(25, 25)));
        assert!(MazeGenerator::is_lattice_cell(&grid, Position::new(1, 47)));
        assert!(!MazeGenerator::is_lattice_cell(&grid, Position::new(24, 25)));
        assert!(!MazeGenerator::is_lattice_cell(&grid, Position::new(49, 25)));
        assert!(MazeGenerator::is_connector(&grid, Position::new(24, 25)));
        assert!(!MazeGenerator::is_connector(&grid, Position::new(24, 24)));
        assert_eq!(lattice_cells(&grid), 24 * 24);
    }

    #[test]
    fn test_loop_punching_only_opens_connectors() {
        let config = GenerationConfig::new(21);
        let mut rng = create_rng(&config);
        let mut grid = MazeGenerator::perfect().generate(&config, &mut rng).unwrap();
        let before = grid.clone();

        let opened = MazeGenerator::new()
            .punch_extra_corridors(&mut grid, 1.0, &mut rng)
            .unwrap();
        assert!(opened > 0);

        let edge = config.size as i32 - 2;
        for pos in grid.positions() {
            if before.is_walkable(pos) || !grid.is_walkable(pos) {
                continue;
            }
            assert!(MazeGenerator::is_connector(&grid, pos), "{} is not a connector", pos);
            assert!(pos.x != edge && pos.y != edge, "{} lies outside the lattice", pos);
        }
    }

    #[test]
    fn test_nearest_lattice_coord() {
        assert_eq!(MazeGenerator::nearest_lattice_coord(0, 25, 49), 1);
        assert_eq!(MazeGenerator::nearest_lattice_coord(49, 25, 49), 47);
        assert_eq!(MazeGenerator::nearest_lattice_coord(25, 25, 49), 25);
        assert_eq!(MazeGenerator::nearest_lattice_coord(0, 2, 3), 2);
        assert_eq!(MazeGenerator::nearest_lattice_coord(3, 2, 3), 2);
    }

    #[test]
    fn test_perfect_maze_is_spanning_tree() {
        let config = GenerationConfig::for_testing(12345);
        let mut rng = create_rng(&config);
        let mut grid = Grid::new(config.size).unwrap();

        let cells = MazeGenerator::new().carve_maze(&mut grid, &mut rng).unwrap();
        assert_eq!(cells, lattice_cells(&grid));

        // A tree over n cells has n - 1 edges
        let corridors = grid
            .tiles
            .iter()
            .flatten()
            .filter(|t| t.tile_type == TileType::Corridor)
            .count();
        assert_eq!(corridors, cells - 1);
        assert!(utils::is_fully_connected(&grid));
    }

    #[test]
    fn test_landmarks_secured_without_any_carving() {
        for size in [4, 6, 20, 50] {
            let mut grid = Grid::new(size).unwrap();
            MazeGenerator::secure_landmarks(&mut grid).unwrap();
            for (pos, _) in grid.landmark_positions() {
                assert!(grid.is_walkable(pos), "landmark {} on size {}", pos, size);
            }
        }
    }

    #[test]
    fn test_generation_is_connected() {
        let config = GenerationConfig::for_testing(777);
        let mut rng = create_rng(&config);
        let grid = MazeGenerator::new().generate(&config, &mut rng).unwrap();

        assert!(utils::is_fully_connected(&grid));
        for (pos, _) in grid.landmark_positions() {
            assert_ne!(grid.get_tile(pos).unwrap().tile_type, TileType::Wall);
        }
    }

    #[test]
    fn test_extra_corridors_only_add() {
        let config = GenerationConfig::new(31);
        let perfect = MazeGenerator::perfect()
            .generate(&config, &mut create_rng(&config))
            .unwrap();
        let looped = MazeGenerator::new()
            .generate(&config, &mut create_rng(&config))
            .unwrap();

        // Same carve sequence, so every perfect-maze tile is still open
        for pos in perfect.positions() {
            if perfect.is_walkable(pos) {
                assert!(looped.is_walkable(pos));
            }
        }
        assert!(looped.walkable_count() > perfect.walkable_count());
    }

    #[test]
    fn test_smallest_grid() {
        let config = GenerationConfig::new(5).with_size(4);
        let mut rng = create_rng(&config);
        let grid = MazeGenerator::new().generate(&config, &mut rng).unwrap();
        assert!(utils::is_fully_connected(&grid));
    }

    #[test]
    fn test_odd_size_rejected() {
        let config = GenerationConfig::new(5).with_size(21);
        let mut rng = create_rng(&config);
        assert!(matches!(
            MazeGenerator::new().generate(&config, &mut rng),
            Err(CrawlerError::InvalidGridSize(21))
        ));
    }
}
