//! Engine evaluation scores and the evaluator seam.
//!
//! Scores are always from white's point of view. Evaluation failures never
//! reach the renderer: `evaluate_or_unavailable` turns them into
//! `Score::Unavailable`.

use std::fmt;

use chess_core::BoardState;
use chess_core::Replay;
use shakmaty::{Chess, Color, Position};
use tracing::warn;

use crate::error::ViewerError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Score {
    /// Centipawns / 100
    Pawns(f64),
    /// Mate in N; positive = white mates
    Mate(i32),
    /// Checkmate already on the board
    MateGiven { winner: Color },
    Unavailable,
}

impl Score {
    /// Convert a side-to-move engine score to white's point of view.
    pub fn from_engine(cp: Option<i32>, mate: Option<i32>, turn: Color) -> Score {
        let sign = if turn == Color::White { 1 } else { -1 };
        match (mate, cp) {
            (Some(m), _) => Score::Mate(m * sign),
            (None, Some(cp)) => Score::Pawns(f64::from(cp * sign) / 100.0),
            (None, None) => Score::Unavailable,
        }
    }

    /// Numeric value for plotting; mates are clamped to `±mate_cap`.
    pub fn as_pawns(&self, mate_cap: f64) -> Option<f64> {
        match *self {
            Score::Pawns(p) => Some(p.clamp(-mate_cap, mate_cap)),
            Score::Mate(m) if m >= 0 => Some(mate_cap),
            Score::Mate(_) => Some(-mate_cap),
            Score::MateGiven { winner: Color::White } => Some(mate_cap),
            Score::MateGiven { winner: Color::Black } => Some(-mate_cap),
            Score::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Score::Unavailable)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Score::Pawns(p) => write!(f, "{p:+.2}"),
            Score::Mate(m) => write!(f, "#{m}"),
            Score::MateGiven { winner: Color::White } => f.write_str("1-0#"),
            Score::MateGiven { winner: Color::Black } => f.write_str("0-1#"),
            Score::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Anything that can score a position. Stockfish in production, a fixed
/// table in tests.
pub trait Evaluator {
    fn evaluate(&mut self, position: &Chess) -> Result<Score, ViewerError>;
}

/// Score a position, substituting `Unavailable` for any failure.
pub fn evaluate_or_unavailable(evaluator: &mut dyn Evaluator, position: &Chess) -> Score {
    if position.is_checkmate() {
        return Score::MateGiven {
            winner: !position.turn(),
        };
    }
    if position.is_stalemate() {
        return Score::Pawns(0.0);
    }

    match evaluator.evaluate(position) {
        Ok(score) => score,
        Err(e) => {
            warn!(error = %e, "Evaluation failed, score not available");
            Score::Unavailable
        }
    }
}

pub fn evaluate_state(evaluator: &mut dyn Evaluator, state: &BoardState) -> Score {
    evaluate_or_unavailable(evaluator, state.position())
}

/// One score per replayed state, start position included.
pub fn evaluate_game(evaluator: &mut dyn Evaluator, replay: &Replay) -> Vec<Score> {
    replay
        .states()
        .iter()
        .map(|state| evaluate_state(evaluator, state))
        .collect()
}
