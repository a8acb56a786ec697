// Board snapshot and topology queries
//
// The engine replaces the snapshot wholesale every frame. Neighbour and angle
// queries depend on the edge policy the board was created with.

use serde::{Deserialize, Serialize};

use crate::types::{Coord, Direction, Site};

/// How a step off the side of the board resolves
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EdgePolicy {
    /// Toroidal board, stepping off one side enters the opposite side
    Wrap,
    /// Bounded board, a step off the side stays on the edge cell
    Clamp,
}

impl Default for EdgePolicy {
    fn default() -> Self {
        EdgePolicy::Wrap
    }
}

/// Full board state for one frame, sites stored row-major
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GameMap {
    pub width: u16,
    pub height: u16,
    pub sites: Vec<Site>,
    #[serde(default)]
    pub edge_policy: EdgePolicy,
}

impl GameMap {
    /// Creates a board with every cell unclaimed and empty
    pub fn new(width: u16, height: u16, edge_policy: EdgePolicy) -> Self {
        GameMap {
            width,
            height,
            sites: vec![Site::default(); width as usize * height as usize],
            edge_policy,
        }
    }

    /// Number of cells on the board
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    fn index(&self, coord: Coord) -> usize {
        coord.y as usize * self.width as usize + coord.x as usize
    }

    pub fn site(&self, coord: Coord) -> Site {
        self.sites[self.index(coord)]
    }

    pub fn set_site(&mut self, coord: Coord, site: Site) {
        let idx = self.index(coord);
        self.sites[idx] = site;
    }

    /// All coordinates in row-major order (y outer, x inner)
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Coord::new(x, y)))
    }

    /// The coordinate one step from `coord` in `dir`
    pub fn neighbor(&self, coord: Coord, dir: Direction) -> Coord {
        let (w, h) = (self.width, self.height);
        match self.edge_policy {
            EdgePolicy::Wrap => match dir {
                Direction::Still => coord,
                Direction::North => Coord::new(coord.x, if coord.y == 0 { h - 1 } else { coord.y - 1 }),
                Direction::South => Coord::new(coord.x, if coord.y + 1 == h { 0 } else { coord.y + 1 }),
                Direction::East => Coord::new(if coord.x + 1 == w { 0 } else { coord.x + 1 }, coord.y),
                Direction::West => Coord::new(if coord.x == 0 { w - 1 } else { coord.x - 1 }, coord.y),
            },
            EdgePolicy::Clamp => match dir {
                Direction::Still => coord,
                Direction::North => Coord::new(coord.x, coord.y.saturating_sub(1)),
                Direction::South => Coord::new(coord.x, (coord.y + 1).min(h - 1)),
                Direction::East => Coord::new((coord.x + 1).min(w - 1), coord.y),
                Direction::West => Coord::new(coord.x.saturating_sub(1), coord.y),
            },
        }
    }

    /// Signed per-axis offsets from `from` to `to`, shortest way round on a wrapped board
    fn deltas(&self, from: Coord, to: Coord) -> (i32, i32) {
        let mut dx = to.x as i32 - from.x as i32;
        let mut dy = to.y as i32 - from.y as i32;

        if self.edge_policy == EdgePolicy::Wrap {
            let (w, h) = (self.width as i32, self.height as i32);
            if dx > w - dx {
                dx -= w;
            } else if -dx > w + dx {
                dx += w;
            }
            if dy > h - dy {
                dy -= h;
            } else if -dy > h + dy {
                dy += h;
            }
        }

        (dx, dy)
    }

    /// Angle in radians from `from` to `to`, north (decreasing y) is +π/2
    pub fn angle(&self, from: Coord, to: Coord) -> f64 {
        let (dx, dy) = self.deltas(from, to);
        // negate in integers so a zero dy never becomes -0.0 (atan2 would give -π)
        ((-dy) as f64).atan2(dx as f64)
    }

    /// Number of cells owned by `owner`
    pub fn count_owned(&self, owner: u8) -> usize {
        self.sites.iter().filter(|s| s.owner == owner).count()
    }
}
