// Configuration module for reading Halite.toml
// Every tunable constant of the bot lives here so it can be adjusted without a rebuild

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::game_map::EdgePolicy;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub bot: BotConfig,
    pub strategy: StrategyConfig,
    pub board: BoardConfig,
    pub debug: DebugConfig,
}

/// Identity sent to the engine during the handshake
#[derive(Debug, Deserialize, Clone)]
pub struct BotConfig {
    pub name: String,
}

/// Heuristic constants used by the move selector and the recruiter
#[derive(Debug, Deserialize, Clone)]
pub struct StrategyConfig {
    // Game rule: a cell's strength never exceeds this
    pub max_strength: u16,

    // Game phase: pressure scoring kicks in past this share of the estimated game length
    pub pressure_phase_fraction: f64,
    pub estimated_turns_factor: f64,

    // A cell stays put while strength < production * ripeness_multiplier
    pub ripeness_multiplier: u16,

    // Recruited strength is discounted by this ratio before comparing against the target
    pub recruit_commit_ratio: f64,
}

impl StrategyConfig {
    /// Expected game length for a board of the given size
    ///
    /// # Arguments
    /// * `width` - Board width in cells
    /// * `height` - Board height in cells
    ///
    /// # Returns
    /// `floor(estimated_turns_factor * sqrt(width * height))`
    pub fn estimated_turns(&self, width: u16, height: u16) -> u32 {
        let area = width as f64 * height as f64;
        (self.estimated_turns_factor * area.sqrt()).floor() as u32
    }
}

/// Board topology
#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    pub edge_policy: EdgePolicy,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Halite.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        toml::from_str(&contents).map_err(|e| format!("Failed to parse config file: {}", e))
    }

    /// Loads default configuration from Halite.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Halite.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Halite.toml
    pub fn default_hardcoded() -> Self {
        Config {
            bot: BotConfig {
                name: "OverkillRust".to_string(),
            },
            strategy: StrategyConfig {
                max_strength: 255,
                pressure_phase_fraction: 0.18,
                estimated_turns_factor: 10.0,
                ripeness_multiplier: 4, // 5 sat still too long
                recruit_commit_ratio: 0.75,
            },
            board: BoardConfig {
                edge_policy: EdgePolicy::Wrap,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "halite_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            log::warn!("Could not load Halite.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimated_turns_for_square_board() {
        let config = Config::default_hardcoded();
        // floor(10 * sqrt(900)) = 300
        assert_eq!(config.strategy.estimated_turns(30, 30), 300);
        // floor(10 * sqrt(20 * 25)) = floor(223.6...) = 223
        assert_eq!(config.strategy.estimated_turns(20, 25), 223);
    }

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.strategy.max_strength, 255);
        assert_eq!(config.board.edge_policy, EdgePolicy::Wrap);
    }

    #[test]
    fn test_halite_toml_can_be_parsed() {
        let result = Config::from_file("Halite.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Halite.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Halite.toml").expect("Halite.toml should be parseable");
        let hardcoded_config = Config::default_hardcoded();

        assert_eq!(file_config.bot.name, hardcoded_config.bot.name);
        assert_eq!(
            file_config.strategy.max_strength,
            hardcoded_config.strategy.max_strength
        );
        assert_eq!(
            file_config.strategy.pressure_phase_fraction,
            hardcoded_config.strategy.pressure_phase_fraction
        );
        assert_eq!(
            file_config.strategy.estimated_turns_factor,
            hardcoded_config.strategy.estimated_turns_factor
        );
        assert_eq!(
            file_config.strategy.ripeness_multiplier,
            hardcoded_config.strategy.ripeness_multiplier
        );
        assert_eq!(
            file_config.strategy.recruit_commit_ratio,
            hardcoded_config.strategy.recruit_commit_ratio
        );
        assert_eq!(
            file_config.board.edge_policy,
            hardcoded_config.board.edge_policy
        );
        assert_eq!(file_config.debug.enabled, hardcoded_config.debug.enabled);
        assert_eq!(
            file_config.debug.log_file_path,
            hardcoded_config.debug.log_file_path
        );
    }

    #[test]
    fn test_clamp_edge_policy_parses() {
        let toml_src = r#"
            [bot]
            name = "x"
            [strategy]
            max_strength = 255
            pressure_phase_fraction = 0.18
            estimated_turns_factor = 10.0
            ripeness_multiplier = 4
            recruit_commit_ratio = 0.75
            [board]
            edge_policy = "clamp"
            [debug]
            enabled = false
            log_file_path = "x.jsonl"
        "#;
        let config: Config = toml::from_str(toml_src).unwrap();
        assert_eq!(config.board.edge_policy, EdgePolicy::Clamp);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
