//! Stockfish engine wrapper using UCI protocol (blocking I/O)

use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use shakmaty::fen::Fen;
use shakmaty::{Chess, EnPassantMode, Position};
use tracing::debug;

use crate::error::ViewerError;
use crate::evaluation::{Evaluator, Score};

/// Raw engine output for one position, side-to-move perspective
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalResult {
    pub cp: Option<i32>,
    pub mate: Option<i32>,
    /// Best move in UCI notation
    pub best_move: String,
}

/// Stockfish engine instance
pub struct StockfishEngine {
    process: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    nodes: u32,
}

impl StockfishEngine {
    /// Spawn a new Stockfish process and initialize UCI
    pub fn new(path: &str, nodes: u32) -> Result<Self, ViewerError> {
        let mut process = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ViewerError::Engine(format!("Failed to spawn Stockfish: {e}")))?;

        let stdin = process
            .stdin
            .take()
            .ok_or_else(|| ViewerError::Engine("Stockfish stdin not captured".into()))?;
        let stdout = process
            .stdout
            .take()
            .ok_or_else(|| ViewerError::Engine("Stockfish stdout not captured".into()))?;

        let mut engine = Self {
            process,
            stdin,
            stdout: BufReader::new(stdout),
            nodes,
        };

        engine.send("uci")?;
        engine.wait_for("uciok")?;

        engine.send("setoption name Threads value 1")?;
        engine.send("setoption name Hash value 64")?;
        engine.send("isready")?;
        engine.wait_for("readyok")?;

        Ok(engine)
    }

    fn send(&mut self, cmd: &str) -> Result<(), ViewerError> {
        debug!(cmd, "SF <");
        writeln!(self.stdin, "{cmd}")
            .and_then(|_| self.stdin.flush())
            .map_err(|e| ViewerError::Engine(format!("Failed to write to Stockfish: {e}")))
    }

    /// Read one line; EOF means the process is gone.
    fn read_line(&mut self, line: &mut String) -> Result<(), ViewerError> {
        line.clear();
        let bytes = self
            .stdout
            .read_line(line)
            .map_err(|e| ViewerError::Engine(format!("Failed to read from Stockfish: {e}")))?;
        if bytes == 0 {
            return Err(ViewerError::Engine("Stockfish process died".into()));
        }
        Ok(())
    }

    fn wait_for(&mut self, expected: &str) -> Result<(), ViewerError> {
        let mut line = String::new();
        loop {
            self.read_line(&mut line)?;
            let trimmed = line.trim();
            debug!(line = trimmed, "SF >");
            if trimmed == expected {
                return Ok(());
            }
        }
    }

    /// Evaluate a FEN and get the best move with score
    pub fn evaluate_fen(&mut self, fen: &str) -> Result<EvalResult, ViewerError> {
        self.send(&format!("position fen {fen}"))?;
        self.send(&format!("go nodes {}", self.nodes))?;

        let mut result = EvalResult::default();
        let mut line = String::new();
        loop {
            self.read_line(&mut line)?;
            let trimmed = line.trim();

            if trimmed.starts_with("info") && trimmed.contains(" pv ") {
                if let Some(cp) = parse_cp(trimmed) {
                    result.cp = Some(cp);
                    result.mate = None;
                }
                if let Some(mate) = parse_mate(trimmed) {
                    result.mate = Some(mate);
                    result.cp = None;
                }
            } else if trimmed.starts_with("bestmove") {
                if let Some(mv) = trimmed.split_whitespace().nth(1) {
                    result.best_move = mv.to_string();
                }
                break;
            }
        }

        Ok(result)
    }

    pub fn quit(&mut self) {
        let _ = self.send("quit");
        let _ = self.process.wait();
    }
}

impl Evaluator for StockfishEngine {
    fn evaluate(&mut self, position: &Chess) -> Result<Score, ViewerError> {
        let fen = Fen::from_position(&position.clone(), EnPassantMode::Legal).to_string();
        let raw = self.evaluate_fen(&fen)?;
        match Score::from_engine(raw.cp, raw.mate, position.turn()) {
            Score::Unavailable => Err(ViewerError::Engine(format!("No score for {fen}"))),
            score => Ok(score),
        }
    }
}

impl Drop for StockfishEngine {
    fn drop(&mut self) {
        let _ = writeln!(self.stdin, "quit");
        let _ = self.process.kill();
        let _ = self.process.wait();
    }
}

/// Value following `key` in a whitespace-separated info line
fn parse_field(line: &str, key: &str) -> Option<i32> {
    let mut parts = line.split_whitespace();
    while let Some(part) = parts.next() {
        if part == key {
            return parts.next()?.parse().ok();
        }
    }
    None
}

fn parse_cp(line: &str) -> Option<i32> {
    parse_field(line, "cp")
}

fn parse_mate(line: &str) -> Option<i32> {
    parse_field(line, "mate")
}
