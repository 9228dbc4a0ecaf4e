//! Core of the archive toolkit: parsing chess.com archive exports into
//! records, the move-count heuristic, and SAN replay into board states.

pub mod error;
pub mod game_data;
pub mod lexer;
pub mod move_count;
pub mod pgn;
pub mod replay;

pub use error::PgnError;
pub use game_data::{GameRecord, GameResult, Pieces};
pub use move_count::{count_moves, count_moves_or_default, DEFAULT_MOVE_COUNT};
pub use pgn::{parse_archive, read_archive, ParseOptions};
pub use replay::{replay, replay_movetext, tokenize_moves, BoardState, Replay};
