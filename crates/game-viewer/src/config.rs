//! Viewer configuration from environment variables (`.env` honored)

use std::env;

use chess_core::pgn::DEFAULT_TRACKED_PLAYER;
use tracing::debug;

use crate::error::ViewerError;

#[derive(Clone, Debug)]
pub struct ViewerConfig {
    /// Account whose side is reported in the `pieces` column
    pub tracked_player: String,

    /// Path to Stockfish binary
    pub stockfish_path: String,

    /// Nodes per position for Stockfish analysis
    pub nodes_per_position: u32,

    /// Boards per grid row
    pub grid_cols: usize,

    /// Board diagram size in pixels
    pub board_size: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tracked_player: DEFAULT_TRACKED_PLAYER.to_string(),
            stockfish_path: "stockfish".to_string(),
            nodes_per_position: 100_000,
            grid_cols: 3,
            board_size: 256,
        }
    }
}

impl ViewerConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ViewerError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unparsable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ViewerError> {
        let defaults = Self::default();

        let tracked_player = lookup("TRACKED_PLAYER").unwrap_or(defaults.tracked_player);

        let stockfish_path = lookup("STOCKFISH_PATH").unwrap_or(defaults.stockfish_path);

        let nodes_per_position = lookup("NODES_PER_POSITION")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.nodes_per_position);

        let grid_cols = lookup("GRID_COLS")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.grid_cols);
        if grid_cols == 0 {
            return Err(ViewerError::Config("GRID_COLS must be at least 1"));
        }

        let board_size = lookup("BOARD_SIZE")
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.board_size);

        let config = Self {
            tracked_player,
            stockfish_path,
            nodes_per_position,
            grid_cols,
            board_size,
        };
        debug!(?config, "Viewer config loaded");
        Ok(config)
    }
}
