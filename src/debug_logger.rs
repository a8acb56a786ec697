// Debug logging module for per-turn game state
//
// Each turn's snapshot and the moves we sent are appended to a JSONL file so
// a game can be replayed offline with the `replay` tool.

use log::error;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};

use crate::game_map::GameMap;
use crate::types::Move;

/// Represents a single debug log entry
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DebugLogEntry {
    pub turn: u32,
    pub my_id: u8,
    pub map: GameMap,
    pub moves: Vec<Move>,
    pub timestamp: String,
}

/// Writer for the JSONL debug log, a no-op when disabled
pub struct DebugLogger {
    file: Option<BufWriter<File>>,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
        {
            Ok(file) => {
                log::info!("Debug logging enabled: {}", log_file_path);
                DebugLogger {
                    file: Some(BufWriter::new(file)),
                }
            }
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                DebugLogger::disabled()
            }
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger { file: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Appends one turn to the log
    ///
    /// Write failures are reported and then ignored; the game must go on.
    pub fn log_turn(&mut self, turn: u32, my_id: u8, map: &GameMap, moves: &[Move]) {
        let file = match self.file.as_mut() {
            Some(file) => file,
            None => return,
        };

        let entry = DebugLogEntry {
            turn,
            my_id,
            map: map.clone(),
            moves: moves.to_vec(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        match serde_json::to_string(&entry) {
            Ok(json_line) => {
                if let Err(e) = writeln!(file, "{}", json_line) {
                    error!("Failed to write debug log entry: {}", e);
                } else if let Err(e) = file.flush() {
                    error!("Failed to flush debug log: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize debug log entry: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_map::EdgePolicy;
    use crate::types::{Coord, Direction};

    #[test]
    fn test_disabled_logger_is_noop() {
        let mut logger = DebugLogger::disabled();
        assert!(!logger.is_enabled());
        logger.log_turn(1, 1, &GameMap::new(2, 2, EdgePolicy::Wrap), &[]);
    }

    #[test]
    fn test_log_turn_writes_one_json_line_per_turn() {
        let path = std::env::temp_dir().join(format!("halite_debug_test_{}.jsonl", std::process::id()));
        let path_str = path.to_string_lossy().to_string();
        let map = GameMap::new(2, 2, EdgePolicy::Clamp);
        let moves = vec![Move::new(Coord::new(1, 0), Direction::South)];

        {
            let mut logger = DebugLogger::new(true, &path_str);
            assert!(logger.is_enabled());
            logger.log_turn(1, 3, &map, &moves);
            logger.log_turn(2, 3, &map, &[]);
        }

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: DebugLogEntry = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.turn, 1);
        assert_eq!(first.my_id, 3);
        assert_eq!(first.map, map);
        assert_eq!(first.moves, moves);

        std::fs::remove_file(&path).ok();
    }
}
