use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which side the tracked player held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pieces {
    White,
    Black,
    Unknown,
}

impl Pieces {
    pub fn as_str(self) -> &'static str {
        match self {
            Pieces::White => "white",
            Pieces::Black => "black",
            Pieces::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Pieces {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The three terminal result tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameResult {
    #[serde(rename = "1-0")]
    WhiteWins,
    #[serde(rename = "0-1")]
    BlackWins,
    #[serde(rename = "1/2-1/2")]
    Draw,
}

impl GameResult {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "1-0" => Some(GameResult::WhiteWins),
            "0-1" => Some(GameResult::BlackWins),
            "1/2-1/2" => Some(GameResult::Draw),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GameResult::WhiteWins => "1-0",
            GameResult::BlackWins => "0-1",
            GameResult::Draw => "1/2-1/2",
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One game of the archive, as a table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub pieces: Pieces,
    pub result: String, // verbatim Result header, "" if missing
    #[serde(rename = "against")]
    pub opponent: String,
    pub date: Option<NaiveDate>,
    #[serde(rename = "opening")]
    pub opening_text: String, // moves 1-7
    #[serde(rename = "midgame + endgame")]
    pub mid_end_text: String, // move 8 onward
}

impl GameRecord {
    /// Interpret the result header. `None` for "", "*" or anything unrecognized.
    pub fn outcome(&self) -> Option<GameResult> {
        GameResult::from_token(&self.result)
    }

    /// Full movetext, opening and midgame joined back together.
    pub fn movetext(&self) -> String {
        match (self.opening_text.is_empty(), self.mid_end_text.is_empty()) {
            (_, true) => self.opening_text.clone(),
            (true, false) => self.mid_end_text.clone(),
            (false, false) => format!("{} {}", self.opening_text, self.mid_end_text),
        }
    }

    /// Did the tracked player win this game?
    pub fn tracked_player_won(&self) -> Option<bool> {
        match (self.pieces, self.outcome()?) {
            (Pieces::Unknown, _) | (_, GameResult::Draw) => None,
            (Pieces::White, r) => Some(r == GameResult::WhiteWins),
            (Pieces::Black, r) => Some(r == GameResult::BlackWins),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(opening: &str, mid_end: &str) -> GameRecord {
        GameRecord {
            pieces: Pieces::White,
            result: "1-0".to_string(),
            opponent: "someone".to_string(),
            date: None,
            opening_text: opening.to_string(),
            mid_end_text: mid_end.to_string(),
        }
    }

    #[test]
    fn test_movetext_joins_segments() {
        let r = record("1. e4 e5", "8. Qd2 Nf6 1-0");
        assert_eq!(r.movetext(), "1. e4 e5 8. Qd2 Nf6 1-0");
        assert_eq!(record("1. e4 1-0", "").movetext(), "1. e4 1-0");
        assert_eq!(record("", "").movetext(), "");
    }

    #[test]
    fn test_outcome() {
        let mut r = record("", "");
        assert_eq!(r.outcome(), Some(GameResult::WhiteWins));
        r.result = "*".to_string();
        assert_eq!(r.outcome(), None);
        r.result = String::new();
        assert_eq!(r.outcome(), None);
    }

    #[test]
    fn test_tracked_player_won() {
        let mut r = record("", "");
        assert_eq!(r.tracked_player_won(), Some(true));
        r.pieces = Pieces::Black;
        assert_eq!(r.tracked_player_won(), Some(false));
        r.result = "1/2-1/2".to_string();
        assert_eq!(r.tracked_player_won(), None);
    }

    #[test]
    fn test_serializes_with_table_column_names() {
        let json = serde_json::to_value(record("1. e4", "")).unwrap();
        assert_eq!(json["pieces"], "white");
        assert_eq!(json["against"], "someone");
        assert_eq!(json["opening"], "1. e4");
        assert_eq!(json["midgame + endgame"], "");
    }
}
