// Per-turn decision engine
//
// Every owned cell gets exactly one order per frame. Border cells attack the
// best neighbour when they can win outright or can talk their friends into
// helping; interior cells that are ripe march toward the closest enemy line.

use log::{debug, info};

use crate::adjacency::AdjacencyCache;
use crate::config::Config;
use crate::game_map::GameMap;
use crate::move_tracker::MoveTracker;
use crate::targeting::TargetOrdering;
use crate::types::{CellDetail, Coord, Direction, Move, UNCLAIMED};

// Two-decimal atan2 references, in hundredths of a radian
const ANGLE_NORTH: i64 = 157;
const ANGLE_EAST: i64 = 0;
const ANGLE_SOUTH: i64 = -157;
const ANGLE_WEST: i64 = 314;

/// Halite bot holding the state that lives across frames
pub struct Bot {
    config: Config,
    my_id: u8,
    width: u16,
    height: u16,
    estimated_turns: u32,
    turn: u32,
    adjacency: AdjacencyCache,
    tracker: MoveTracker,
}

impl Bot {
    /// Creates a new Bot for one game
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the game
    /// * `my_id` - Owner id the engine assigned to us
    /// * `width` - Board width
    /// * `height` - Board height
    pub fn new(config: Config, my_id: u8, width: u16, height: u16) -> Self {
        let estimated_turns = config.strategy.estimated_turns(width, height);
        info!(
            "Bot {} on a {}x{} board, expecting about {} turns",
            my_id, width, height, estimated_turns
        );

        Bot {
            config,
            my_id,
            width,
            height,
            estimated_turns,
            turn: 0,
            adjacency: AdjacencyCache::new(),
            tracker: MoveTracker::new(),
        }
    }

    pub fn my_id(&self) -> u8 {
        self.my_id
    }

    /// Frames seen so far, the first frame is turn 1
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Overrides the frame counter, used when replaying a logged turn in isolation
    pub fn set_turn(&mut self, turn: u32) {
        self.turn = turn;
    }

    pub fn estimated_turns(&self) -> u32 {
        self.estimated_turns
    }

    /// Computes the orders for every owned cell of this frame
    ///
    /// Cells are visited row by row. A cell already ordered by a neighbour's
    /// recruitment is skipped, so the result holds one move per owned cell.
    pub fn compute_moves(&mut self, map: &GameMap) -> Vec<Move> {
        self.turn += 1;
        self.tracker.reset();

        let owned = map.count_owned(self.my_id);
        let mut border = 0usize;

        for coord in map.coords() {
            if map.site(coord).owner != self.my_id {
                continue;
            }
            if self.is_border(map, coord) {
                border += 1;
            }

            // Recruitment may have ordered this cell already
            if self.tracker.has_moved(coord) {
                continue;
            }
            self.make_next_move(map, coord);
        }

        let moves = self.tracker.take_moves();
        info!(
            "Turn {}: {} cells ({} on the border), {} moves",
            self.turn,
            owned,
            border,
            moves.len()
        );
        debug!("Adjacency cache holds {} cells", self.adjacency.len());
        moves
    }

    /// Decides and records the move of one owned cell
    pub fn make_next_move(&mut self, map: &GameMap, coord: Coord) {
        let own = Self::cell_detail(map, coord, None);
        let neighbors = self.neighbor_details(map, coord);

        let (hostile, friendly): (Vec<CellDetail>, Vec<CellDetail>) = neighbors
            .iter()
            .copied()
            .partition(|n| n.owner != self.my_id);

        if !hostile.is_empty() {
            let ordering = TargetOrdering::for_turn(
                self.turn,
                self.estimated_turns,
                self.config.strategy.pressure_phase_fraction,
            );

            let my_id = self.my_id;
            let adjacency = &mut self.adjacency;
            let target = ordering.pick(hostile, |candidate| {
                Self::reinforcement(adjacency, map, my_id, candidate.coord)
            });

            if let Some(target) = target {
                let attack = target.direction.unwrap_or(Direction::Still);

                if target.strength < own.strength {
                    debug!(
                        "{:?} attacks {:?} ({} < {}, {:?})",
                        coord, target.coord, target.strength, own.strength, ordering
                    );
                    self.tracker.record(Move::new(coord, attack));
                    return;
                }

                if self.recruit(map, &target, &own) {
                    debug!("{:?} attacks {:?} with recruited friends", coord, target.coord);
                    self.tracker.record(Move::new(coord, attack));
                    return;
                }
            }
        }

        // Too weak to be worth moving yet
        let ripe_at = own.production as u32 * self.config.strategy.ripeness_multiplier as u32;
        if (own.strength as u32) < ripe_at {
            self.tracker.record(Move::new(coord, Direction::Still));
            return;
        }

        if friendly.len() == neighbors.len() {
            let direction = self.nearest_enemy_direction(map, coord);
            debug!("{:?} is enclosed, heading {}", coord, direction.as_str());
            self.tracker.record(Move::new(coord, direction));
            return;
        }

        self.tracker.record(Move::new(coord, Direction::Still));
    }

    /// Pools strength from the target's other friendly neighbours
    ///
    /// Friends are taken in adjacency order until adding the next one would
    /// reach the strength cap. Each friend counts once even when it touches
    /// the target from two sides. The attack is committed only if three quarters
    /// of the pooled strength beats the target; committed friends are forced
    /// to move onto the target.
    ///
    /// # Returns
    /// `true` when the friends were ordered to attack
    pub fn recruit(&mut self, map: &GameMap, target: &CellDetail, origin: &CellDetail) -> bool {
        let cap = self.config.strategy.max_strength;
        let mut combined = origin.strength as u16;
        let mut friends: Vec<CellDetail> = Vec::new();

        for (_, neighbor) in self.adjacency.neighbors(map, target.coord).iter() {
            // The origin cannot help itself
            if *neighbor == origin.coord {
                continue;
            }
            if !self.is_friendly(map, *neighbor) {
                continue;
            }
            if self.tracker.has_moved(*neighbor) {
                continue;
            }
            // On a two-cell-wide wrapped board opposite neighbours coincide
            if friends.iter().any(|f| f.coord == *neighbor) {
                continue;
            }

            let detail = Self::cell_detail(map, *neighbor, None);
            if combined + detail.strength as u16 >= cap {
                break;
            }

            combined += detail.strength as u16;
            friends.push(detail);
        }

        if friends.is_empty() {
            return false;
        }

        if combined as f64 * self.config.strategy.recruit_commit_ratio <= target.strength as f64 {
            debug!(
                "Not enough help for {:?}: {} pooled against {}",
                target.coord, combined, target.strength
            );
            return false;
        }

        for friend in &friends {
            let direction = Self::direction_to(map, friend.coord, target.coord);
            self.tracker.force(friend.coord, direction);
        }
        true
    }

    /// Direction of the closest cell we do not own, scanning straight lines
    ///
    /// Each cardinal is walked outward up to half the shorter board side; a
    /// later direction only wins when strictly closer. Falls back to north.
    pub fn nearest_enemy_direction(&self, map: &GameMap, coord: Coord) -> Direction {
        let mut direction = Direction::North;
        let mut max_distance = self.width.min(self.height) as f64 / 2.0;

        for dir in Direction::cardinals().iter() {
            let mut distance = 0u32;
            let mut current = coord;

            while map.site(current).owner == self.my_id && (distance as f64) < max_distance {
                distance += 1;
                current = map.neighbor(current, *dir);
            }

            if (distance as f64) < max_distance {
                direction = *dir;
                max_distance = distance as f64;
            }
        }

        direction
    }

    /// Cardinal direction from one cell toward another
    pub fn direction_to(map: &GameMap, from: Coord, to: Coord) -> Direction {
        Self::classify_angle(map.angle(from, to))
    }

    /// Buckets an angle, rounded to two decimals, into a cardinal direction
    ///
    /// Only south, east and west have arms; everything else, including the
    /// north reference itself, lands on north.
    pub fn classify_angle(angle: f64) -> Direction {
        match (angle * 100.0).round() as i64 {
            ANGLE_SOUTH => Direction::South,
            ANGLE_EAST => Direction::East,
            ANGLE_WEST => Direction::West,
            ANGLE_NORTH => Direction::North,
            _ => Direction::North,
        }
    }

    /// Snapshot values of one cell, tagged with the direction used to reach it
    pub fn cell_detail(map: &GameMap, coord: Coord, direction: Option<Direction>) -> CellDetail {
        CellDetail::new(coord, map.site(coord), direction)
    }

    /// Details of the four neighbours in adjacency order
    pub fn neighbor_details(&mut self, map: &GameMap, coord: Coord) -> [CellDetail; 4] {
        self.adjacency
            .neighbors(map, coord)
            .map(|(dir, n)| Self::cell_detail(map, n, Some(dir)))
    }

    /// Summed strength of the neighbours of `coord` held by other players
    fn reinforcement(adjacency: &mut AdjacencyCache, map: &GameMap, my_id: u8, coord: Coord) -> u32 {
        adjacency
            .neighbors(map, coord)
            .iter()
            .map(|(_, n)| map.site(*n))
            .filter(|site| site.owner != UNCLAIMED && site.owner != my_id)
            .map(|site| site.strength as u32)
            .sum()
    }

    pub fn is_friendly(&self, map: &GameMap, coord: Coord) -> bool {
        map.site(coord).owner == self.my_id
    }

    /// True when every neighbour of `coord` belongs to `owner`
    pub fn is_surrounded_by_owner(&mut self, map: &GameMap, coord: Coord, owner: u8) -> bool {
        self.adjacency
            .neighbors(map, coord)
            .iter()
            .all(|(_, n)| map.site(*n).owner == owner)
    }

    /// True when an owned cell touches at least one cell we do not own
    pub fn is_border(&mut self, map: &GameMap, coord: Coord) -> bool {
        let my_id = self.my_id;
        !self.is_surrounded_by_owner(map, coord, my_id)
    }
}
