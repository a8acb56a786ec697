// Line protocol bindings for the Halite engine
//
// This module is the thin wrapper between the engine's stdin/stdout pipes and
// the Bot. It is responsible for:
// - Reading the init block (id, dimensions, productions, first frame)
// - Decoding the run-length encoded frame each turn
// - Encoding the move list the Bot produced
//
// Anything written to stdout that is not protocol breaks the game, so logging
// never happens here beyond the `log` macros (which go to stderr).

use std::io::{self, BufRead, Write};
use std::str::{FromStr, SplitWhitespace};

use log::debug;
use thiserror::Error;

use crate::game_map::{EdgePolicy, GameMap};
use crate::types::{Move, Site};

/// Result type alias using [`ProtocolError`].
pub type Result<T> = std::result::Result<T, ProtocolError>;

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The engine closed the pipe, normally because the game is over
    #[error("engine closed the connection")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A token could not be parsed as the expected number
    #[error("malformed {what}: '{token}'")]
    Malformed { what: &'static str, token: String },

    /// A line ended before all expected values were read
    #[error("expected {expected} {what}, line ended after {found}")]
    Truncated {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

/// Values sent once before the first turn
#[derive(Debug, Clone)]
pub struct InitData {
    pub my_id: u8,
    pub width: u16,
    pub height: u16,
    pub map: GameMap,
}

/// One bot's end of the engine pipes
pub struct Connection<R, W> {
    reader: R,
    writer: W,
    width: u16,
    height: u16,
    edge_policy: EdgePolicy,
    productions: Vec<u8>,
}

impl<R: BufRead, W: Write> Connection<R, W> {
    pub fn new(reader: R, writer: W, edge_policy: EdgePolicy) -> Self {
        Connection {
            reader,
            writer,
            width: 0,
            height: 0,
            edge_policy,
            productions: Vec::new(),
        }
    }

    /// Reads the init block: id, dimensions, productions and the first frame
    pub fn read_init(&mut self) -> Result<InitData> {
        let id_line = self.read_line()?;
        let my_id = parse_next(&mut id_line.split_whitespace(), "player id", 1, 0)?;

        let dims_line = self.read_line()?;
        let mut dims = dims_line.split_whitespace();
        let width: u16 = parse_next(&mut dims, "board dimension", 2, 0)?;
        let height: u16 = parse_next(&mut dims, "board dimension", 2, 1)?;
        self.width = width;
        self.height = height;

        let area = width as usize * height as usize;
        let production_line = self.read_line()?;
        let mut tokens = production_line.split_whitespace();
        let mut productions = Vec::with_capacity(area);
        for i in 0..area {
            productions.push(parse_next(&mut tokens, "production", area, i)?);
        }
        self.productions = productions;

        let map = self.read_frame()?;
        debug!("Init: player {} on {}x{}", my_id, width, height);

        Ok(InitData {
            my_id,
            width,
            height,
            map,
        })
    }

    /// Answers the handshake with our name
    pub fn send_init(&mut self, name: &str) -> Result<()> {
        writeln!(self.writer, "{}", name)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Reads one frame and merges it with the productions from init
    pub fn read_frame(&mut self) -> Result<GameMap> {
        let line = self.read_line()?;
        decode_frame(
            &line,
            self.width,
            self.height,
            &self.productions,
            self.edge_policy,
        )
    }

    /// Writes the move list of one turn
    pub fn send_frame(&mut self, moves: &[Move]) -> Result<()> {
        writeln!(self.writer, "{}", encode_moves(moves))?;
        self.writer.flush()?;
        Ok(())
    }

    fn read_line(&mut self) -> Result<String> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ProtocolError::Closed);
        }
        Ok(line)
    }
}

fn parse_next<T: FromStr>(
    tokens: &mut SplitWhitespace<'_>,
    what: &'static str,
    expected: usize,
    found: usize,
) -> Result<T> {
    let token = tokens.next().ok_or(ProtocolError::Truncated {
        what,
        expected,
        found,
    })?;
    token.parse().map_err(|_| ProtocolError::Malformed {
        what,
        token: token.to_string(),
    })
}

/// Decodes a frame line: `count owner` runs covering the board, then one strength per cell
pub fn decode_frame(
    line: &str,
    width: u16,
    height: u16,
    productions: &[u8],
    edge_policy: EdgePolicy,
) -> Result<GameMap> {
    let area = width as usize * height as usize;
    let mut tokens = line.split_whitespace();
    let mut owners: Vec<u8> = Vec::with_capacity(area);

    while owners.len() < area {
        let count: usize = parse_next(&mut tokens, "owner run", area, owners.len())?;
        let owner: u8 = parse_next(&mut tokens, "owner run", area, owners.len())?;
        if count == 0 || owners.len() + count > area {
            return Err(ProtocolError::Malformed {
                what: "owner run length",
                token: count.to_string(),
            });
        }
        owners.extend(std::iter::repeat(owner).take(count));
    }

    let mut map = GameMap::new(width, height, edge_policy);
    for (i, owner) in owners.into_iter().enumerate() {
        let strength: u8 = parse_next(&mut tokens, "strength", area, i)?;
        map.sites[i] = Site {
            owner,
            strength,
            production: productions.get(i).copied().unwrap_or(0),
        };
    }

    Ok(map)
}

/// Encodes a move list as `x y direction` triples
pub fn encode_moves(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| format!("{} {} {}", m.coord.x, m.coord.y, m.direction.wire_code()))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Direction};
    use std::io::Cursor;

    #[test]
    fn test_decode_frame_expands_runs() {
        // 3x2 board: owners 0 0 1 / 1 1 2
        let line = "2 0 3 1 1 2 0 0 10 20 30 40";
        let productions = [1, 2, 3, 4, 5, 6];

        let map = decode_frame(line, 3, 2, &productions, EdgePolicy::Wrap).unwrap();

        assert_eq!(map.site(Coord::new(0, 0)), Site { owner: 0, strength: 0, production: 1 });
        assert_eq!(map.site(Coord::new(2, 0)), Site { owner: 1, strength: 10, production: 3 });
        assert_eq!(map.site(Coord::new(2, 1)), Site { owner: 2, strength: 40, production: 6 });
    }

    #[test]
    fn test_decode_frame_rejects_short_strengths() {
        let err = decode_frame("4 0 1 2 3", 2, 2, &[0; 4], EdgePolicy::Wrap).unwrap_err();
        assert!(matches!(err, ProtocolError::Truncated { what: "strength", .. }));
    }

    #[test]
    fn test_decode_frame_rejects_overlong_run() {
        let err = decode_frame("5 0 1 2 3 4", 2, 2, &[0; 4], EdgePolicy::Wrap).unwrap_err();
        assert!(matches!(err, ProtocolError::Malformed { .. }));
    }

    #[test]
    fn test_encode_moves() {
        let moves = [
            Move::new(Coord::new(1, 2), Direction::North),
            Move::new(Coord::new(0, 0), Direction::Still),
        ];
        assert_eq!(encode_moves(&moves), "1 2 1 0 0 0");
        assert_eq!(encode_moves(&[]), "");
    }

    #[test]
    fn test_handshake_and_turn() {
        let input = "2\n2 2\n1 2 3 4\n3 0 1 2 0 0 0 9\n4 2 0 0 0 12\n";
        let mut output = Vec::new();
        {
            let mut conn = Connection::new(Cursor::new(input), &mut output, EdgePolicy::Wrap);

            let init = conn.read_init().unwrap();
            assert_eq!(init.my_id, 2);
            assert_eq!((init.width, init.height), (2, 2));
            assert_eq!(init.map.site(Coord::new(1, 1)).owner, 2);
            assert_eq!(init.map.site(Coord::new(1, 1)).strength, 9);
            conn.send_init("Tester").unwrap();

            let frame = conn.read_frame().unwrap();
            assert_eq!(frame.count_owned(2), 4);
            assert_eq!(frame.site(Coord::new(1, 1)).production, 4);
            conn.send_frame(&[Move::new(Coord::new(1, 1), Direction::West)]).unwrap();

            assert!(matches!(conn.read_frame(), Err(ProtocolError::Closed)));
        }

        assert_eq!(String::from_utf8(output).unwrap(), "Tester\n1 1 4\n");
    }
}
