//! Drives the bot through the engine's line protocol
//!
//! Feeds a scripted engine transcript into a `Connection`, runs the same
//! read/compute/send loop the binary uses, and checks what went back out.

use std::io::Cursor;

use halite_overkill_bot::bot::Bot;
use halite_overkill_bot::config::Config;
use halite_overkill_bot::game_map::EdgePolicy;
use halite_overkill_bot::networking::{Connection, ProtocolError};

fn play(transcript: &str) -> String {
    let config = Config::default_hardcoded();
    let mut output = Vec::new();
    {
        let mut conn = Connection::new(Cursor::new(transcript), &mut output, EdgePolicy::Wrap);
        let init = conn.read_init().expect("init block should parse");
        conn.send_init(&config.bot.name).expect("name should be written");

        let mut bot = Bot::new(config, init.my_id, init.width, init.height);
        loop {
            let map = match conn.read_frame() {
                Ok(map) => map,
                Err(ProtocolError::Closed) => break,
                Err(e) => panic!("unexpected protocol error: {}", e),
            };
            let moves = bot.compute_moves(&map);
            conn.send_frame(&moves).expect("moves should be written");
        }
    }
    String::from_utf8(output).expect("protocol output is ASCII")
}

#[test]
fn test_two_turn_game() {
    // 3x3 board, we are player 1 in the centre with strength 50.
    // Turn 1: every neighbour is empty, the north one is taken first.
    // Turn 2: we own the centre column; every owned cell is enclosed
    // north/south but still touches empty cells east and west.
    let transcript = "1\n\
                      3 3\n\
                      1 1 1 1 5 1 1 1 1\n\
                      4 0 1 1 4 0 0 0 0 0 50 0 0 0 0 0\n\
                      4 0 1 1 4 0 0 0 0 0 50 0 0 0 0 0\n\
                      1 0 1 1 2 0 1 1 2 0 1 1 1 0 0 30 0 0 40 0 0 30 0\n";

    let output = play(transcript);
    let lines: Vec<&str> = output.lines().collect();

    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "OverkillRust");
    // (1, 1) moves north (code 1)
    assert_eq!(lines[1], "1 1 1");
    // Each column cell sees empty cells east and west; east comes first in
    // adjacency order (code 2)
    assert_eq!(lines[2], "1 0 2 1 1 2 1 2 2");
}

#[test]
fn test_closed_pipe_before_init_is_an_error() {
    let mut output = Vec::new();
    let mut conn = Connection::new(Cursor::new(""), &mut output, EdgePolicy::Wrap);
    assert!(matches!(conn.read_init(), Err(ProtocolError::Closed)));
}
