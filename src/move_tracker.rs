// Per-turn move bookkeeping
//
// Recruitment can hand a cell its order before the row-major sweep reaches it,
// so every order goes through here and the sweep checks `has_moved` right
// before deciding.

use std::collections::HashSet;

use crate::types::{Coord, Direction, Move};

#[derive(Debug, Default)]
pub struct MoveTracker {
    moved: HashSet<Coord>,
    moves: Vec<Move>,
}

impl MoveTracker {
    pub fn new() -> Self {
        MoveTracker::default()
    }

    /// Forgets everything from the previous turn
    pub fn reset(&mut self) {
        self.moved.clear();
        self.moves.clear();
    }

    pub fn has_moved(&self, coord: Coord) -> bool {
        self.moved.contains(&coord)
    }

    pub fn mark_moved(&mut self, coord: Coord) {
        self.moved.insert(coord);
    }

    /// Queues a move and marks its cell as done for this turn
    pub fn record(&mut self, mv: Move) {
        self.moves.push(mv);
        self.mark_moved(mv.coord);
    }

    /// Orders a cell the sweep has not reached yet (used by recruitment)
    pub fn force(&mut self, coord: Coord, direction: Direction) {
        self.record(Move::new(coord, direction));
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Hands over this turn's moves, leaving the tracker empty
    pub fn take_moves(&mut self) -> Vec<Move> {
        self.moved.clear();
        std::mem::take(&mut self.moves)
    }
}
