// Neighbour cache
//
// Board topology never changes during a game, so each coordinate's four
// neighbours are computed once and reused for every later frame.

use std::collections::HashMap;

use crate::game_map::GameMap;
use crate::types::{Coord, Direction};

/// Neighbours of one cell in adjacency order (north, south, east, west)
pub type AdjacencyEntry = [(Direction, Coord); 4];

#[derive(Debug, Default)]
pub struct AdjacencyCache {
    entries: HashMap<Coord, AdjacencyEntry>,
}

impl AdjacencyCache {
    pub fn new() -> Self {
        AdjacencyCache::default()
    }

    /// Returns the cached neighbours of `coord`, asking the board on first use
    pub fn neighbors(&mut self, map: &GameMap, coord: Coord) -> AdjacencyEntry {
        *self.entries.entry(coord).or_insert_with(|| {
            Direction::adjacency_order().map(|dir| (dir, map.neighbor(coord, dir)))
        })
    }

    /// Number of coordinates cached so far
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
