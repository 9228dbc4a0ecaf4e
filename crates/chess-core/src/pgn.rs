//! Archive parsing: a light regex and lexer parser for chess.com exports.
//!
//! Only understands the archive's own export format: every game starts with
//! the `[Event "Live Chess"]` header line, headers are `[Key "Value"]` and
//! the movetext follows.

use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::{debug, info};

use crate::error::PgnError;
use crate::game_data::{GameRecord, Pieces};
use crate::lexer;

/// Header line that opens every game block.
pub const GAME_BOUNDARY: &str = r#"[Event "Live Chess"]"#;

pub const DEFAULT_TRACKED_PLAYER: &str = "PonchoCeniceros";

const DATE_FORMAT: &str = "%Y.%m.%d";

/// First move number of the midgame segment.
const MIDGAME_MOVE: u32 = 8;

// Values containing a double quote are not supported.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]+)"\]"#).unwrap());

#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Account name whose side is reported in `pieces`.
    pub tracked_player: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            tracked_player: DEFAULT_TRACKED_PLAYER.to_string(),
        }
    }
}

impl ParseOptions {
    pub fn new(tracked_player: impl Into<String>) -> Self {
        Self {
            tracked_player: tracked_player.into(),
        }
    }
}

/// Read an archive file and parse it.
pub fn read_archive(path: impl AsRef<Path>, options: &ParseOptions) -> Result<Vec<GameRecord>, PgnError> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)?;
    info!(path = %path.display(), bytes = raw.len(), "Read archive");
    parse_archive(&raw, options)
}

/// Parse a whole archive into records, in archive order.
///
/// Fails only on a `Date` header that is not `YYYY.MM.DD`.
pub fn parse_archive(archive: &str, options: &ParseOptions) -> Result<Vec<GameRecord>, PgnError> {
    let records = split_games(archive)
        .iter()
        .map(|block| parse_game(block, options))
        .collect::<Result<Vec<_>, _>>()?;

    info!(games = records.len(), player = %options.tracked_player, "Parsed archive");
    Ok(records)
}

/// Split on the boundary header, drop blank blocks and re-attach the header.
pub fn split_games(archive: &str) -> Vec<String> {
    archive
        .split(GAME_BOUNDARY)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(|block| format!("{GAME_BOUNDARY}\n{block}"))
        .collect()
}

/// Parse a single game block (boundary header included).
pub fn parse_game(block: &str, options: &ParseOptions) -> Result<GameRecord, PgnError> {
    let headers = extract_headers(block);
    let movetext = extract_movetext(block);
    let (opening_text, mid_end_text) = split_opening(&movetext);

    let (pieces, opponent) = side_of(&headers, &options.tracked_player);

    let date = headers.get("Date").map(|v| parse_date(v)).transpose()?;

    debug!(
        pieces = %pieces,
        opponent = %opponent,
        headers = headers.len(),
        "Parsed game"
    );

    Ok(GameRecord {
        pieces,
        result: headers.get("Result").cloned().unwrap_or_default(),
        opponent,
        date,
        opening_text,
        mid_end_text,
    })
}

/// All `[Key "Value"]` pairs; a repeated key keeps its last value.
pub fn extract_headers(block: &str) -> HashMap<String, String> {
    HEADER_RE
        .captures_iter(block)
        .map(|cap| (cap[1].to_string(), cap[2].to_string()))
        .collect()
}

/// Non-header, non-blank lines with every whitespace run collapsed.
pub fn extract_movetext(block: &str) -> String {
    block
        .lines()
        .filter(|line| !line.starts_with('[') && !line.trim().is_empty())
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split movetext into (moves 1-7, move 8 onward).
///
/// The opening starts at the first `1.` token; the midgame starts at the
/// first `8.` token. No `8.` means the midgame is empty, no `1.` means the
/// opening is.
pub fn split_opening(movetext: &str) -> (String, String) {
    let tokens = lexer::tokenize(movetext);
    let open_start = tokens.iter().find(|t| t.is_move_number(1)).map(|t| t.start);
    let mid_start = tokens
        .iter()
        .find(|t| t.is_move_number(MIDGAME_MOVE))
        .map(|t| t.start);

    let opening = match open_start {
        Some(start) => {
            let end = mid_start.filter(|&m| m >= start).unwrap_or(movetext.len());
            movetext[start..end].trim().to_string()
        }
        None => String::new(),
    };
    let mid_end = mid_start
        .map(|start| movetext[start..].trim().to_string())
        .unwrap_or_default();

    (opening, mid_end)
}

fn side_of(headers: &HashMap<String, String>, player: &str) -> (Pieces, String) {
    let white = headers.get("White").map(String::as_str);
    let black = headers.get("Black").map(String::as_str);

    if white == Some(player) {
        (Pieces::White, black.unwrap_or_default().to_string())
    } else if black == Some(player) {
        (Pieces::Black, white.unwrap_or_default().to_string())
    } else {
        (Pieces::Unknown, "unknown".to_string())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, PgnError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| PgnError::InvalidDate {
        value: value.to_string(),
        source,
    })
}
