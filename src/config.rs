// Configuration module for reading Snake.toml
// This module provides OOP-style configuration management for the Battlesnake bot

use log::warn;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub timing: TimingConfig,
    pub search: SearchConfig,
    pub scores: ScoresConfig,
    pub game_rules: GameRulesConfig,
    pub debug: DebugConfig,
}

/// Wall-clock budget for building the game tree
#[derive(Debug, Deserialize, Clone)]
pub struct TimingConfig {
    pub search_deadline_ms: u64,
    /// Dequeues between two reads of the clock
    pub deadline_check_interval: usize,
}

impl TimingConfig {
    /// Deadline for the tree builder as a `Duration`
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.search_deadline_ms)
    }
}

/// Multi-agent value rule used during backward induction
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ValueRule {
    /// Every player maximizes its own reward component
    MaxN,
    /// We maximize, every opponent is folded into one minimizer
    Paranoid,
}

/// Tree shape limits independent of the deadline
#[derive(Debug, Deserialize, Clone)]
pub struct SearchConfig {
    pub value_rule: ValueRule,
    pub max_nodes: usize,
    /// Rounds beyond the root turn
    pub max_depth: i32,
}

/// Reward constants
#[derive(Debug, Deserialize, Clone)]
pub struct ScoresConfig {
    pub score_eliminated: i32,
    pub survival_weight: i32,
    pub growth_weight: i32,
}

/// Game rules constants
#[derive(Debug, Deserialize, Clone)]
pub struct GameRulesConfig {
    pub health_on_food: i32,
    pub health_loss_per_turn: i32,
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
    /// * `path` - Path to the Snake.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed and validated configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Snake.toml in the project root
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Snake.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Snake.toml
    pub fn default_hardcoded() -> Self {
        Config {
            timing: TimingConfig {
                search_deadline_ms: 200,
                deadline_check_interval: 16,
            },
            search: SearchConfig {
                value_rule: ValueRule::MaxN,
                max_nodes: 250_000,
                max_depth: 64,
            },
            scores: ScoresConfig {
                score_eliminated: -1,
                survival_weight: 10,
                growth_weight: 1,
            },
            game_rules: GameRulesConfig {
                health_on_food: 100,
                health_loss_per_turn: 1,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "battlesnake_debug.jsonl".to_string(),
            },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            warn!("Could not load Snake.toml ({}), using hardcoded defaults", e);
            Self::default_hardcoded()
        })
    }

    /// Rejects settings under which backward induction stops being meaningful:
    /// an elimination must rank strictly below every surviving state.
    pub fn validate(&self) -> Result<(), String> {
        if self.timing.deadline_check_interval == 0 {
            return Err("timing.deadline_check_interval must be at least 1".to_string());
        }
        if self.search.max_nodes == 0 {
            return Err("search.max_nodes must be at least 1".to_string());
        }
        if self.search.max_depth < 0 {
            return Err("search.max_depth must not be negative".to_string());
        }
        if self.scores.score_eliminated >= 0 {
            return Err(format!(
                "scores.score_eliminated must be negative, got {}",
                self.scores.score_eliminated
            ));
        }
        if self.scores.survival_weight < 0 || self.scores.growth_weight < 0 {
            return Err("scores weights must not be negative".to_string());
        }
        if self.game_rules.health_on_food < 1 {
            return Err(format!(
                "game_rules.health_on_food must be at least 1, got {}",
                self.game_rules.health_on_food
            ));
        }
        if self.game_rules.health_loss_per_turn < 1 {
            return Err("game_rules.health_loss_per_turn must be at least 1".to_string());
        }
        Ok(())
    }
}
