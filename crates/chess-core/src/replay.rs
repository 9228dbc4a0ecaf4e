//! SAN replay into a sequence of board states.
//!
//! Replay is best-effort: it stops at the first token that does not parse
//! or is illegal in the current position and hands back everything played
//! up to that point, flagged as truncated.

use shakmaty::fen::Fen;
use shakmaty::san::SanPlus;
use shakmaty::{Board, Chess, Color, EnPassantMode, Move, Position};
use tracing::debug;

use crate::lexer::{self, TokenKind};

/// Immutable position after `ply` half-moves.
#[derive(Debug, Clone)]
pub struct BoardState {
    position: Chess,
    ply: usize,
    last_move: Option<Move>,
    san: Option<String>,
    fen: String,
}

impl BoardState {
    /// The standard starting position.
    pub fn start() -> Self {
        Self::new(Chess::default(), 0, None, None)
    }

    fn new(position: Chess, ply: usize, last_move: Option<Move>, san: Option<String>) -> Self {
        let fen = Fen::from_position(&position.clone(), EnPassantMode::Legal).to_string();
        Self {
            position,
            ply,
            last_move,
            san,
            fen,
        }
    }

    pub fn position(&self) -> &Chess {
        &self.position
    }

    pub fn board(&self) -> &Board {
        self.position.board()
    }

    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Move that produced this state; `None` for the start position.
    pub fn last_move(&self) -> Option<&Move> {
        self.last_move.as_ref()
    }

    /// The SAN token as written in the archive.
    pub fn san(&self) -> Option<&str> {
        self.san.as_deref()
    }

    pub fn fen(&self) -> &str {
        &self.fen
    }

    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    pub fn is_stalemate(&self) -> bool {
        self.position.is_stalemate()
    }
}

impl PartialEq for BoardState {
    fn eq(&self, other: &Self) -> bool {
        self.ply == other.ply && self.fen == other.fen && self.last_move == other.last_move
    }
}

impl Eq for BoardState {}

/// Outcome of replaying one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    // Never empty: the start position is always first.
    states: Vec<BoardState>,
    truncated: bool,
    failed_at: Option<usize>,
    failed_token: Option<String>,
}

impl Replay {
    /// Start position followed by one state per applied ply.
    pub fn states(&self) -> &[BoardState] {
        &self.states
    }

    /// True when a token failed to apply before the end of the list.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Index (into the token list) of the token that stopped the replay.
    pub fn failed_at(&self) -> Option<usize> {
        self.failed_at
    }

    pub fn failed_token(&self) -> Option<&str> {
        self.failed_token.as_deref()
    }

    /// Position after the last successfully applied move.
    pub fn last(&self) -> &BoardState {
        // states always holds the start position
        &self.states[self.states.len() - 1]
    }

    /// Number of plies applied.
    pub fn plies(&self) -> usize {
        self.states.len() - 1
    }

    /// State at `ply`, frozen on the final position once the game is over.
    pub fn state_clamped(&self, ply: usize) -> &BoardState {
        &self.states[ply.min(self.states.len() - 1)]
    }

    pub fn is_complete(&self) -> bool {
        !self.truncated
    }
}

/// Ply tokens of a movetext: move numbers and result tokens removed.
pub fn tokenize_moves(movetext: &str) -> Vec<String> {
    lexer::tokenize(movetext)
        .into_iter()
        .filter_map(|token| match token.kind {
            TokenKind::San(san) => Some(san.to_string()),
            _ => None,
        })
        .collect()
}

/// Replay SAN tokens from the standard starting position.
pub fn replay<S: AsRef<str>>(tokens: &[S]) -> Replay {
    let mut pos = Chess::default();
    let mut states = Vec::with_capacity(tokens.len() + 1);
    states.push(BoardState::start());

    for (i, token) in tokens.iter().enumerate() {
        let token = token.as_ref();
        let mv = match parse_move(&pos, token) {
            Ok(mv) => mv,
            Err(reason) => {
                debug!(token, index = i, reason = %reason, "Replay stopped");
                return Replay {
                    states,
                    truncated: true,
                    failed_at: Some(i),
                    failed_token: Some(token.to_string()),
                };
            }
        };

        pos.play_unchecked(mv);
        states.push(BoardState::new(pos.clone(), i + 1, Some(mv), Some(token.to_string())));
    }

    Replay {
        states,
        truncated: false,
        failed_at: None,
        failed_token: None,
    }
}

/// Tokenize and replay a raw movetext string.
pub fn replay_movetext(movetext: &str) -> Replay {
    replay(&tokenize_moves(movetext))
}

fn parse_move(pos: &Chess, token: &str) -> Result<Move, String> {
    let san: SanPlus = token.parse().map_err(|e| format!("unparsable: {e}"))?;
    san.san.to_move(pos).map_err(|e| format!("illegal: {e}"))
}
