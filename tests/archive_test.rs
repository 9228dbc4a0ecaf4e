//! Parsing a whole archive: one record per game, in order, with the
//! opening/midgame split and side detection.

mod common;

use chess_core::pgn::{extract_movetext, split_games};
use chess_core::{parse_archive, read_archive, GameResult, ParseOptions, PgnError, Pieces};
use chrono::NaiveDate;

use common::{temp_path, ARCHIVE};

#[test]
fn test_one_record_per_game_in_order() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();
    assert_eq!(records.len(), 3);

    let opponents: Vec<&str> = records.iter().map(|r| r.opponent.as_str()).collect();
    assert_eq!(opponents, vec!["kaspa_rov", "lucky_knight", "unknown"]);

    let dates: Vec<Option<NaiveDate>> = records.iter().map(|r| r.date).collect();
    assert_eq!(
        dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 2, 3),
            NaiveDate::from_ymd_opt(2025, 2, 4),
            NaiveDate::from_ymd_opt(2025, 2, 5),
        ]
    );
}

#[test]
fn test_side_classification() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();
    assert_eq!(records[0].pieces, Pieces::Black);
    assert_eq!(records[1].pieces, Pieces::Black);
    assert_eq!(records[2].pieces, Pieces::Unknown);

    assert_eq!(records[0].tracked_player_won(), Some(true));
    assert_eq!(records[1].tracked_player_won(), Some(false));
    assert_eq!(records[2].outcome(), Some(GameResult::Draw));
}

#[test]
fn test_segments_rebuild_movetext() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();
    for (record, block) in records.iter().zip(split_games(ARCHIVE)) {
        assert_eq!(record.movetext(), extract_movetext(&block));
    }
}

#[test]
fn test_opening_and_midgame_split() {
    let records = parse_archive(ARCHIVE, &ParseOptions::default()).unwrap();

    // never reached move 8
    assert!(records[0].mid_end_text.is_empty());
    assert!(records[0].opening_text.ends_with("Nf3# 0-1"));

    assert_eq!(
        records[1].opening_text,
        "1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 5. e3 O-O 6. Nf3 h6 7. Bh4 b6"
    );
    assert!(records[1].mid_end_text.starts_with("8. cxd5 Nxd5"));
    assert!(records[1].mid_end_text.ends_with("12. Qa4 c5 1-0"));
}

#[test]
fn test_blank_and_headerless_blocks() {
    let archive = format!("   \n{}\n[Event \"Live Chess\"]   \n\n", "[Event \"Live Chess\"]\n1. e4 e5 *");
    let records = parse_archive(&archive, &ParseOptions::default()).unwrap();
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record.pieces, Pieces::Unknown);
    assert_eq!(record.result, "");
    assert_eq!(record.date, None);
    assert_eq!(record.opening_text, "1. e4 e5 *");
}

#[test]
fn test_empty_archive() {
    assert!(parse_archive("", &ParseOptions::default()).unwrap().is_empty());
    assert!(parse_archive(" \n\n ", &ParseOptions::default()).unwrap().is_empty());
}

#[test]
fn test_malformed_date_fails_whole_parse() {
    let archive = ARCHIVE.replace("2025.02.04", "04/02/2025");
    let err = parse_archive(&archive, &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, PgnError::InvalidDate { .. }));
    assert!(err.to_string().contains("04/02/2025"));
}

#[test]
fn test_read_archive_from_disk() {
    let path = temp_path("archive.pgn");
    std::fs::write(&path, ARCHIVE).unwrap();
    let records = read_archive(&path, &ParseOptions::new("lucky_knight")).unwrap();
    let _ = std::fs::remove_file(&path);

    assert_eq!(records[1].pieces, Pieces::White);
    assert_eq!(records[1].opponent, "PonchoCeniceros");
    assert_eq!(records[0].pieces, Pieces::Unknown);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = read_archive(temp_path("does_not_exist.pgn"), &ParseOptions::default()).unwrap_err();
    assert!(matches!(err, PgnError::Io(_)));
}
