//! Movetext tokenizer.
//!
//! Splits flattened movetext into move numbers, SAN plies and terminal
//! result tokens, keeping the byte span of each token so callers can slice
//! the source text (the opening/midgame split does exactly that).

use crate::game_data::GameResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind<'a> {
    /// `12.` or `12...`
    MoveNumber { number: u32, dots: usize },
    /// Anything that is not a move number or a result: a ply, possibly
    /// malformed. Legality is the replay engine's business.
    San(&'a str),
    Result(GameResult),
    /// `*`
    Unfinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind<'a>,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn is_move_number(&self, n: u32) -> bool {
        matches!(self.kind, TokenKind::MoveNumber { number, .. } if number == n)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, TokenKind::Result(_) | TokenKind::Unfinished)
    }
}

/// Tokenize movetext. Never fails; unknown words come back as `San`.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut word_start: Option<usize> = None;

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                lex_word(text, start, i, &mut tokens);
            }
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        lex_word(text, start, text.len(), &mut tokens);
    }

    tokens
}

fn lex_word<'a>(text: &'a str, start: usize, end: usize, out: &mut Vec<Token<'a>>) {
    let word = &text[start..end];
    let bytes = word.as_bytes();

    let digits = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    let dots = bytes[digits..].iter().take_while(|&&b| b == b'.').count();

    if digits > 0 && dots > 0 {
        if let Ok(number) = word[..digits].parse::<u32>() {
            let num_end = start + digits + dots;
            out.push(Token {
                kind: TokenKind::MoveNumber { number, dots },
                start,
                end: num_end,
            });
            // "8.Qd2": ply glued onto the number
            if num_end < end {
                out.push(classify(text, num_end, end));
            }
            return;
        }
    }

    out.push(classify(text, start, end));
}

fn classify(text: &str, start: usize, end: usize) -> Token<'_> {
    let word = &text[start..end];
    let kind = match GameResult::from_token(word) {
        Some(result) => TokenKind::Result(result),
        None if word == "*" => TokenKind::Unfinished,
        None => TokenKind::San(word),
    };
    Token { kind, start, end }
}
