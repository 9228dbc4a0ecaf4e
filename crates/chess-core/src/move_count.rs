//! Move-count heuristic for the grid captions.
//!
//! Looks only at the tail of the movetext: the last `N. ply [ply] result`
//! run. Approximate by nature; a check suffix glued to the next token or a
//! missing result token changes the answer.

use std::sync::LazyLock;

use regex::Regex;

/// Returned when the movetext has no terminal result.
pub const DEFAULT_MOVE_COUNT: f64 = 7.0;

static FINAL_MOVE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+)\.\s*\S+(?:\s+\S+)?\s+(1-0|0-1|1/2-1/2)").unwrap()
});

/// Number of moves played, as a possibly half-integer count.
///
/// `N. a b result` (4+ tokens) → `N`; `N. a result` → `N - 0.5`.
pub fn count_moves(movetext: &str, fallback: f64) -> f64 {
    let Some(cap) = FINAL_MOVE_RE.captures_iter(movetext.trim()).last() else {
        return fallback;
    };

    let number: f64 = match cap[1].parse::<u32>() {
        Ok(n) => n.into(),
        Err(_) => return fallback,
    };

    if cap[0].split_whitespace().count() >= 4 {
        number
    } else {
        number - 1.0 + 0.5
    }
}

pub fn count_moves_or_default(movetext: &str) -> f64 {
    count_moves(movetext, DEFAULT_MOVE_COUNT)
}
