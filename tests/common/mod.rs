#![allow(dead_code)]

use std::path::PathBuf;

/// Three games in the archive's export format: a mating win as black, a
/// loss as black that reaches move 12, and a game between two other players
/// whose last move is illegal (the f-file is blocked by the knight on f6).
pub const ARCHIVE: &str = r#"[Event "Live Chess"]
[Site "Chess.com"]
[Date "2025.02.03"]
[Round "-"]
[White "kaspa_rov"]
[Black "PonchoCeniceros"]
[Result "0-1"]
[ECO "C50"]
[TimeControl "600"]
[Termination "PonchoCeniceros won by checkmate"]

1. e4 e5 2. Nf3 Nc6 3. Bc4 Nd4 4. Nxe5 Qg5 5. Nxf7 Qxg2 6. Rf1 Qxe4+ 7. Be2
Nf3# 0-1

[Event "Live Chess"]
[Site "Chess.com"]
[Date "2025.02.04"]
[White "lucky_knight"]
[Black "PonchoCeniceros"]
[Result "1-0"]

1. d4 d5 2. c4 e6 3. Nc3 Nf6 4. Bg5 Be7 5. e3 O-O 6. Nf3 h6 7. Bh4 b6 8. cxd5
Nxd5 9. Bxe7 Qxe7 10. Nxd5 exd5 11. Rc1 Be6 12. Qa4 c5 1-0

[Event "Live Chess"]
[Site "Chess.com"]
[Date "2025.02.05"]
[White "someone"]
[Black "somebody"]
[Result "1/2-1/2"]

1. e4 e5 2. Qh5 Nc6 3. Bc4 g6 4. Qf3 Nf6 5. Qxf7+ 1/2-1/2
"#;

/// Scratch file path unique to this test run.
pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("repertoire_{}_{name}", std::process::id()))
}
