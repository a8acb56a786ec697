// Halite board types
// Coordinates, directions and the per-cell values the game engine sends each frame

use serde::{Deserialize, Serialize};

/// Owner id of a cell nobody has claimed
pub const UNCLAIMED: u8 = 0;

/// 2D coordinate on the board, (0, 0) is the top-left cell
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Coord {
    pub x: u16,
    pub y: u16,
}

impl Coord {
    pub fn new(x: u16, y: u16) -> Self {
        Coord { x, y }
    }
}

/// Represents the five possible moves for a cell
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Still,
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Neighbour enumeration order used for adjacency lookups
    pub fn adjacency_order() -> [Direction; 4] {
        [Direction::North, Direction::South, Direction::East, Direction::West]
    }

    /// Cardinal enumeration order used when scanning outward for enemies
    pub fn cardinals() -> [Direction; 4] {
        [Direction::North, Direction::East, Direction::South, Direction::West]
    }

    /// Integer code the game engine expects on the wire
    pub fn wire_code(&self) -> u8 {
        match self {
            Direction::Still => 0,
            Direction::North => 1,
            Direction::East => 2,
            Direction::South => 3,
            Direction::West => 4,
        }
    }

    /// Lower-case name used in logs and by the replay tool
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Still => "still",
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        }
    }
}

/// One board cell as reported by the engine
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Site {
    pub owner: u8,
    pub strength: u8,
    pub production: u8,
}

/// A cell's values copied out of the snapshot, plus the direction it was reached by
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellDetail {
    pub coord: Coord,
    pub owner: u8,
    pub strength: u8,
    pub production: u8,
    pub direction: Option<Direction>,
}

impl CellDetail {
    pub fn new(coord: Coord, site: Site, direction: Option<Direction>) -> Self {
        CellDetail {
            coord,
            owner: site.owner,
            strength: site.strength,
            production: site.production,
            direction,
        }
    }

    pub fn is_unclaimed(&self) -> bool {
        self.owner == UNCLAIMED
    }
}

/// A single order for one cell, the unit of output for a turn
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub coord: Coord,
    pub direction: Direction,
}

impl Move {
    pub fn new(coord: Coord, direction: Direction) -> Self {
        Move { coord, direction }
    }
}
