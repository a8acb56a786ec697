// Library exports for the Halite bot
// This allows the replay tool and the integration tests to use the core bot logic

pub mod adjacency;
pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod game_map;
pub mod move_tracker;
pub mod networking;
pub mod replay;
pub mod targeting;
pub mod types;
