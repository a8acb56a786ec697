// Replay module for analyzing logged games and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the bot on logged frames
// 3. Compare logged vs replayed moves
// 4. Generate a summary report

use log::{info, warn};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DebugLogEntry;
use crate::types::{Coord, Direction, Move};

/// One cell whose replayed order differs from the logged one
#[derive(Debug, Clone, PartialEq)]
pub struct MoveDifference {
    pub coord: Coord,
    pub original: Option<Direction>,
    pub replayed: Option<Direction>,
}

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original_moves: usize,
    pub replayed_moves: usize,
    pub differences: Vec<MoveDifference>,
    pub computation_time_us: u128,
}

impl ReplayResult {
    pub fn matches(&self) -> bool {
        self.differences.is_empty()
    }
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    config: Config,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine { config, verbose }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DebugLogEntry>, String> {
        let file =
            File::open(log_path.as_ref()).map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DebugLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Re-runs the bot on a logged frame, as if it were that turn of the game
    pub fn replay_frame(&self, entry: &DebugLogEntry) -> Vec<Move> {
        let map = &entry.map;
        let mut bot = Bot::new(self.config.clone(), entry.my_id, map.width, map.height);
        bot.set_turn(entry.turn.saturating_sub(1));
        bot.compute_moves(map)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &DebugLogEntry) -> Result<ReplayResult, String> {
        if entry.map.sites.len() != entry.map.area() {
            return Err(format!(
                "Turn {}: board has {} sites, expected {}",
                entry.turn,
                entry.map.sites.len(),
                entry.map.area()
            ));
        }

        let start_time = Instant::now();
        let replayed = self.replay_frame(entry);
        let computation_time_us = start_time.elapsed().as_micros();

        let differences = Self::diff_moves(&entry.moves, &replayed);
        let result = ReplayResult {
            turn: entry.turn,
            original_moves: entry.moves.len(),
            replayed_moves: replayed.len(),
            differences,
            computation_time_us,
        };

        if self.verbose {
            if result.matches() {
                info!(
                    "Turn {}: ✓ MATCH - {} moves ({}µs)",
                    entry.turn, result.replayed_moves, computation_time_us
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - {} of {} cells differ ({}µs)",
                    entry.turn,
                    result.differences.len(),
                    result.replayed_moves,
                    computation_time_us
                );
            }
        }

        Ok(result)
    }

    /// Replays all entries in a log file, in parallel
    pub fn replay_all(&self, entries: &[DebugLogEntry]) -> Vec<ReplayResult> {
        let outcomes: Vec<Result<ReplayResult, String>> =
            entries.par_iter().map(|entry| self.replay_entry(entry)).collect();

        outcomes
            .into_iter()
            .filter_map(|outcome| match outcome {
                Ok(result) => Some(result),
                Err(e) => {
                    warn!("Failed to replay: {}", e);
                    None
                }
            })
            .collect()
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[DebugLogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Per-cell differences between two move lists, in the replayed order
    pub fn diff_moves(original: &[Move], replayed: &[Move]) -> Vec<MoveDifference> {
        let original_by_cell: HashMap<Coord, Direction> =
            original.iter().map(|m| (m.coord, m.direction)).collect();
        let replayed_by_cell: HashMap<Coord, Direction> =
            replayed.iter().map(|m| (m.coord, m.direction)).collect();

        let mut differences: Vec<MoveDifference> = replayed
            .iter()
            .filter(|m| original_by_cell.get(&m.coord) != Some(&m.direction))
            .map(|m| MoveDifference {
                coord: m.coord,
                original: original_by_cell.get(&m.coord).copied(),
                replayed: Some(m.direction),
            })
            .collect();

        differences.extend(
            original
                .iter()
                .filter(|m| !replayed_by_cell.contains_key(&m.coord))
                .map(|m| MoveDifference {
                    coord: m.coord,
                    original: Some(m.direction),
                    replayed: None,
                }),
        );

        differences
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches()).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_us as f64)
                .sum::<f64>()
                / results.len() as f64;
            let avg_moves: f64 =
                results.iter().map(|r| r.replayed_moves as f64).sum::<f64>() / results.len() as f64;

            println!("Average Moves per Turn:     {:.1}", avg_moves);
            println!("Average Computation Time:   {:.1}µs\n", avg_time);
        }

        let mut mismatches: Vec<_> = results.iter().filter(|r| !r.matches()).collect();
        mismatches.sort_by_key(|r| r.turn);
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} logged / {} replayed moves",
                    result.turn, result.original_moves, result.replayed_moves
                );
                for diff in &result.differences {
                    println!(
                        "  ({}, {}): {} → {}",
                        diff.coord.x,
                        diff.coord.y,
                        diff.original.map_or("-", |d| d.as_str()),
                        diff.replayed.map_or("-", |d| d.as_str())
                    );
                }
            }
            println!();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_map::{EdgePolicy, GameMap};
    use crate::types::Site;

    fn entry_for(turn: u32, map: GameMap, moves: Vec<Move>) -> DebugLogEntry {
        DebugLogEntry {
            turn,
            my_id: 1,
            map,
            moves,
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
        }
    }

    fn single_cell_map() -> GameMap {
        let mut map = GameMap::new(5, 5, EdgePolicy::Wrap);
        map.set_site(Coord::new(2, 2), Site { owner: 1, strength: 50, production: 5 });
        map
    }

    #[test]
    fn test_replay_entry_matches_logged_moves() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let logged = vec![Move::new(Coord::new(2, 2), Direction::North)];

        let result = engine.replay_entry(&entry_for(3, single_cell_map(), logged)).unwrap();

        assert!(result.matches());
        assert_eq!(result.replayed_moves, 1);
    }

    #[test]
    fn test_replay_entry_reports_differences() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let logged = vec![Move::new(Coord::new(2, 2), Direction::Still)];

        let result = engine.replay_entry(&entry_for(3, single_cell_map(), logged)).unwrap();

        assert!(!result.matches());
        assert_eq!(
            result.differences,
            vec![MoveDifference {
                coord: Coord::new(2, 2),
                original: Some(Direction::Still),
                replayed: Some(Direction::North),
            }]
        );
    }

    #[test]
    fn test_replay_entry_rejects_inconsistent_board() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let mut map = single_cell_map();
        map.sites.pop();

        assert!(engine.replay_entry(&entry_for(1, map, vec![])).is_err());
    }

    #[test]
    fn test_diff_moves_reports_missing_cells() {
        let original = vec![Move::new(Coord::new(0, 0), Direction::East)];
        let diff = ReplayEngine::diff_moves(&original, &[]);

        assert_eq!(diff.len(), 1);
        assert_eq!(diff[0].replayed, None);
    }

    #[test]
    fn test_stats() {
        let engine = ReplayEngine::new(Config::default_hardcoded(), false);
        let entries = vec![
            entry_for(1, single_cell_map(), vec![Move::new(Coord::new(2, 2), Direction::North)]),
            entry_for(2, single_cell_map(), vec![]),
        ];

        let results = engine.replay_all(&entries);
        let stats = engine.generate_stats(&results);

        assert_eq!(stats.total_turns, 2);
        assert_eq!(stats.matches, 1);
        assert_eq!(stats.mismatches, 1);
        assert_eq!(stats.match_rate, 50.0);
    }
}
