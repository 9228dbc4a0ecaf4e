//! Parser error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PgnError {
    #[error("Failed to read archive: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid date header {value:?} (expected YYYY.MM.DD)")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
