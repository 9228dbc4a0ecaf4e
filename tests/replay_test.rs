//! Replaying parsed games and the move-count heuristic on real records.

mod common;

use chess_core::{
    count_moves, count_moves_or_default, parse_archive, replay, replay_movetext, tokenize_moves,
    ParseOptions,
};
use shakmaty::{Color, Position};

use common::ARCHIVE;

#[test]
fn test_replay_archive_games() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();
    let replays: Vec<_> = records.iter().map(|r| replay_movetext(&r.movetext())).collect();

    assert!(replays[0].is_complete());
    assert_eq!(replays[0].plies(), 14);
    assert!(replays[0].last().is_checkmate());
    assert_eq!(replays[0].last().turn(), Color::White);

    assert!(replays[1].is_complete());
    assert_eq!(replays[1].plies(), 24);

    // 5. Qxf7+ runs into the knight on f6
    assert!(replays[2].truncated());
    assert_eq!(replays[2].failed_at(), Some(8));
    assert_eq!(replays[2].failed_token(), Some("Qxf7+"));
    assert_eq!(replays[2].states().len(), 9);
}

#[test]
fn test_state_count_bounds() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();
    for record in &records {
        let tokens = tokenize_moves(&record.movetext());
        let r = replay(&tokens);
        assert!(!r.states().is_empty());
        assert!(r.states().len() <= tokens.len() + 1);
        assert_eq!(r.states().len() == tokens.len() + 1, r.is_complete());
        assert_eq!(r.states()[0].position().board(), shakmaty::Chess::default().board());
    }
}

#[test]
fn test_replay_twice_is_identical() {
    let tokens = tokenize_moves(ARCHIVE.lines().last().unwrap_or_default());
    assert_eq!(replay(&tokens), replay(&tokens));
}

#[test]
fn test_move_counts_for_archive() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();
    let counts: Vec<f64> = records
        .iter()
        .map(|r| count_moves_or_default(&r.movetext()))
        .collect();
    assert_eq!(counts, vec![7.0, 12.0, 4.5]);
}

#[test]
fn test_move_count_tie_break() {
    // three tokens: white's move went unanswered
    assert_eq!(count_moves("1. e4 e5 19. Rxd8+ 1-0", 7.0), 18.5);
    // four tokens: both sides moved
    assert_eq!(count_moves("1. e4 e5 18. Qh3 d6 0-1", 7.0), 18.0);
    assert_eq!(count_moves("no result here", 7.0), 7.0);
}
