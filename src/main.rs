use log::{error, info};
use std::env;
use std::io::{self, BufWriter};
use std::process;

use halite_overkill_bot::bot::Bot;
use halite_overkill_bot::config::Config;
use halite_overkill_bot::debug_logger::DebugLogger;
use halite_overkill_bot::networking::{Connection, ProtocolError};

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead. env_logger writes to stderr, stdout belongs to the engine.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Halite bot...");

    // Load configuration once at startup
    let config = Config::load_or_default();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut conn = Connection::new(
        stdin.lock(),
        BufWriter::new(stdout.lock()),
        config.board.edge_policy,
    );

    let init = match conn.read_init() {
        Ok(init) => init,
        Err(e) => {
            error!("Handshake failed: {}", e);
            process::exit(1);
        }
    };
    if let Err(e) = conn.send_init(&config.bot.name) {
        error!("Could not send our name: {}", e);
        process::exit(1);
    }

    let log_path = config.debug.log_file_path.clone();
    let mut logger = DebugLogger::new(config.debug.enabled, &log_path);
    let mut bot = Bot::new(config, init.my_id, init.width, init.height);

    loop {
        let map = match conn.read_frame() {
            Ok(map) => map,
            Err(ProtocolError::Closed) => {
                info!("GAME OVER after {} turns", bot.turn());
                if logger.is_enabled() {
                    info!("Replay with: replay {}", log_path);
                }
                break;
            }
            Err(e) => {
                error!("Could not read frame: {}", e);
                process::exit(1);
            }
        };

        let moves = bot.compute_moves(&map);
        logger.log_turn(bot.turn(), bot.my_id(), &map, &moves);

        if let Err(e) = conn.send_frame(&moves) {
            error!("Could not send moves for turn {}: {}", bot.turn(), e);
            process::exit(1);
        }
    }
}
