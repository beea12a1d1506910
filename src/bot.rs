// Battlesnake bot: binds the API lifecycle to the tree-search engine
//
// The engine itself is synchronous and owns nothing across turns. `get_move`
// hands a copy of the snapshot to a blocking task and awaits the decision.

use log::{error, info};
use serde_json::{json, Value};

use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::search::{self, Decision, FALLBACK_MOVE};
use crate::types::{Battlesnake, Board, Game};

/// Battlesnake Bot with OOP-style API
/// Takes static configuration dependencies and exposes methods corresponding to API endpoints
pub struct Bot {
    config: Config,
    debug_logger: DebugLogger,
}

impl Bot {
    /// Creates a new Bot instance with decision logging disabled
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        Bot {
            config,
            debug_logger: DebugLogger::disabled(),
        }
    }

    /// Creates a Bot that records every decision through `debug_logger`
    pub fn with_debug_logger(config: Config, debug_logger: DebugLogger) -> Self {
        Bot {
            config,
            debug_logger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns bot metadata and appearance
    /// Corresponds to GET / endpoint
    pub fn info(&self) -> Value {
        info!("INFO");

        json!({
            "apiversion": "1",
            "author": "EP",
            "color": "#006600",
            "head": "missile",
            "tail": "default",
        })
    }

    /// Called when a game starts
    /// Corresponds to POST /start endpoint
    pub fn start(&self, game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("{} START", game.id);
    }

    /// Called when a game ends
    /// Corresponds to POST /end endpoint
    pub fn end(&self, game: &Game, _turn: &i32, _board: &Board, _you: &Battlesnake) {
        info!("{} END", game.id);
    }

    /// Computes and returns the next move
    /// Corresponds to POST /move endpoint
    ///
    /// # Returns
    /// * `Value` - JSON with the chosen `move` token and the decision annotation as `shout`
    pub async fn get_move(
        &self,
        _game: &Game,
        turn: &i32,
        board: &Board,
        you: &Battlesnake,
    ) -> Value {
        let turn = *turn;
        let board_snapshot = board.clone();
        let you_snapshot = you.clone();
        let config = self.config.clone();

        let decision = tokio::task::spawn_blocking(move || {
            search::decide(&board_snapshot, &you_snapshot, turn, &config).decision
        })
        .await
        .unwrap_or_else(|e| {
            error!("Turn {}: search task failed: {}", turn, e);
            Decision {
                direction: FALLBACK_MOVE,
                annotation: "search failed".to_string(),
            }
        });

        self.debug_logger
            .log_move(turn, you.id.clone(), board.clone(), decision.direction);

        json!({
            "move": decision.direction.as_str(),
            "shout": decision.annotation,
        })
    }
}
