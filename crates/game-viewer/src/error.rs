//! Viewer error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Configuration error: {0}")]
    Config(&'static str),

    #[error("Stockfish error: {0}")]
    Engine(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Pgn(#[from] chess_core::PgnError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
