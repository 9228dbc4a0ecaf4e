//! Navigable grid of games, all stepped one ply at a time together.
//!
//! Every game is replayed once up front. The global ply is shared; a game
//! whose replay is shorter stays frozen on its last position while longer
//! games keep advancing.

use std::collections::HashMap;

use chess_core::{count_moves_or_default, replay_movetext, BoardState, GameRecord, Replay};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::evaluation::{evaluate_state, Evaluator, Score};
use crate::render::{grid_html, BoardDiagram, GridCell, DEFAULT_BOARD_SIZE};

/// Per-game input for the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridGame {
    pub moves: String,
    pub result: String,
    pub opponent: String,
    pub date: Option<NaiveDate>,
    pub move_count: f64,
}

impl GridGame {
    /// A bare game: moves only.
    pub fn new(moves: impl Into<String>) -> Self {
        let moves = moves.into();
        Self {
            move_count: count_moves_or_default(&moves),
            moves,
            result: String::new(),
            opponent: String::new(),
            date: None,
        }
    }

    pub fn from_record(record: &GameRecord) -> Self {
        let moves = record.movetext();
        Self {
            move_count: count_moves_or_default(&moves),
            moves,
            result: record.result.clone(),
            opponent: record.opponent.clone(),
            date: record.date,
        }
    }
}

/// Which caption lines to render under each board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridColumns {
    pub opponent: bool,
    pub result: bool,
    pub date: bool,
    pub move_count: bool,
    pub score: bool,
}

impl GridColumns {
    pub fn all() -> Self {
        Self {
            opponent: true,
            result: true,
            date: true,
            move_count: true,
            score: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub cols: usize,
    pub flipped: bool,
    pub board_size: u32,
    pub gap: String,
    pub columns: GridColumns,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cols: 3,
            flipped: false,
            board_size: DEFAULT_BOARD_SIZE,
            gap: "10px".to_string(),
            columns: GridColumns::default(),
        }
    }
}

/// One line of the interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridCommand {
    Next,
    Prev,
    GoTo(usize),
    Quit,
}

impl GridCommand {
    /// An empty line means next. None for anything unrecognized.
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "q" | "quit" => Some(Self::Quit),
            "" | "n" | "next" => Some(Self::Next),
            "p" | "prev" => Some(Self::Prev),
            other => other.parse().ok().map(Self::GoTo),
        }
    }
}

pub struct GridViewer {
    games: Vec<GridGame>,
    replays: Vec<Replay>,
    config: GridConfig,
    current: usize,
    // (game, ply) -> score, filled as states get displayed
    scores: HashMap<(usize, usize), Score>,
}

impl GridViewer {
    pub fn new(games: Vec<GridGame>, config: GridConfig) -> Self {
        let replays: Vec<Replay> = games.iter().map(|g| replay_movetext(&g.moves)).collect();
        let truncated = replays.iter().filter(|r| r.truncated()).count();
        info!(games = games.len(), truncated, "Grid built");

        Self {
            games,
            replays,
            config,
            current: 0,
            scores: HashMap::new(),
        }
    }

    pub fn from_records(records: &[GameRecord], config: GridConfig) -> Self {
        Self::new(records.iter().map(GridGame::from_record).collect(), config)
    }

    pub fn games(&self) -> &[GridGame] {
        &self.games
    }

    pub fn replays(&self) -> &[Replay] {
        &self.replays
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Global ply currently shown.
    pub fn current_ply(&self) -> usize {
        self.current
    }

    /// Last ply of the longest replay; 0 for an empty grid.
    pub fn max_ply(&self) -> usize {
        self.replays.iter().map(Replay::plies).max().unwrap_or(0)
    }

    /// Advance one ply. False when every game is already exhausted.
    pub fn next(&mut self) -> bool {
        if self.current < self.max_ply() {
            self.current += 1;
            debug!(ply = self.current, "Grid advanced");
            true
        } else {
            false
        }
    }

    /// Go back one ply. False at the start position.
    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            debug!(ply = self.current, "Grid retreated");
            true
        } else {
            false
        }
    }

    /// Jump to `ply`, clamped to `max_ply()`.
    pub fn go_to(&mut self, ply: usize) {
        self.current = ply.min(self.max_ply());
    }

    /// Apply a navigation command. True when the global ply changed.
    pub fn apply(&mut self, command: GridCommand) -> bool {
        match command {
            GridCommand::Next => self.next(),
            GridCommand::Prev => self.prev(),
            GridCommand::GoTo(ply) => {
                let before = self.current;
                self.go_to(ply);
                self.current != before
            }
            GridCommand::Quit => false,
        }
    }

    /// State shown for `game`: the current ply, or its final state.
    pub fn displayed_state(&self, game: usize) -> Option<&BoardState> {
        self.replays.get(game).map(|r| r.state_clamped(self.current))
    }

    pub fn status(&self) -> String {
        format!("Global move: {}", self.current)
    }

    /// Score the displayed state of every game, caching by (game, ply).
    pub fn displayed_scores(&mut self, evaluator: &mut dyn Evaluator) -> Vec<Score> {
        let mut scores = Vec::with_capacity(self.replays.len());
        for (i, replay) in self.replays.iter().enumerate() {
            let state = replay.state_clamped(self.current);
            let score = *self
                .scores
                .entry((i, state.ply()))
                .or_insert_with(|| evaluate_state(evaluator, state));
            scores.push(score);
        }
        scores
    }

    fn caption(&self, game: usize, state: &BoardState, score: Option<Score>) -> Vec<String> {
        let columns = self.config.columns;
        let info = &self.games[game];
        let mut lines = Vec::new();

        if columns.opponent && !info.opponent.is_empty() {
            lines.push(format!("vs {}", info.opponent));
        }
        if columns.result && !info.result.is_empty() {
            lines.push(info.result.clone());
        }
        if columns.date {
            if let Some(date) = info.date {
                lines.push(date.format("%Y-%m-%d").to_string());
            }
        }
        if columns.move_count {
            lines.push(format!("{} moves", format_move_count(info.move_count)));
        }
        if columns.score {
            let score = score.unwrap_or(Score::Unavailable);
            lines.push(format!("Eval: {score}"));
        }
        if state.ply() < self.current {
            lines.push("(final position)".to_string());
        }
        lines
    }

    /// Render the grid at the current ply. Scores are only computed when
    /// the score column is on and an evaluator is supplied.
    pub fn render_html(&mut self, evaluator: Option<&mut dyn Evaluator>) -> String {
        let scores = match evaluator {
            Some(ev) if self.config.columns.score => Some(self.displayed_scores(ev)),
            _ => None,
        };

        let cells: Vec<GridCell> = self
            .replays
            .iter()
            .enumerate()
            .map(|(i, replay)| {
                let state = replay.state_clamped(self.current);
                let svg = BoardDiagram::from_state(state)
                    .size(self.config.board_size)
                    .flipped(self.config.flipped)
                    .to_svg();
                let score = scores.as_ref().map(|s| s[i]);
                GridCell {
                    svg,
                    caption: self.caption(i, state, score),
                }
            })
            .collect();

        let mut html = format!("<p><b>{}</b></p>", self.status());
        html.push_str(&grid_html(&cells, self.config.cols, &self.config.gap));
        html
    }
}

/// "18" or "18.5"
pub fn format_move_count(count: f64) -> String {
    if count.fract() == 0.0 {
        format!("{count:.0}")
    } else {
        format!("{count:.1}")
    }
}
