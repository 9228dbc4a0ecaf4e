//! Archive viewer CLI
//!
//! Parses a chess.com archive export and prints it as a table, steps a grid
//! of games in a browser-viewable HTML file, or renders single diagrams and
//! evaluation curves.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use chess_core::{read_archive, replay_movetext, GameRecord, ParseOptions};
use game_viewer::config::ViewerConfig;
use game_viewer::evaluation::{evaluate_game, Evaluator};
use game_viewer::grid::{GridColumns, GridCommand, GridConfig, GridViewer};
use game_viewer::plot::{evaluation_curve_svg, PlotConfig};
use game_viewer::render::{html_page, BoardDiagram};
use game_viewer::stockfish::StockfishEngine;
use game_viewer::table::{to_json_rows, to_text_table, TableOptions};

#[derive(Parser)]
#[command(name = "game-viewer")]
#[command(about = "Tabulate, replay and render games from a chess.com archive")]
struct Args {
    /// Tracked player (overrides TRACKED_PLAYER)
    #[arg(long, global = true)]
    player: Option<String>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print one row per game
    Table {
        /// Archive files or glob patterns
        #[arg(required = true)]
        archives: Vec<String>,

        /// Emit JSON rows instead of a text table
        #[arg(long)]
        json: bool,

        /// Leave out the date column
        #[arg(long)]
        no_date: bool,
    },

    /// Step through all games together, rewriting an HTML grid
    Grid {
        archive: String,

        /// Boards per row (overrides GRID_COLS)
        #[arg(long)]
        cols: Option<usize>,

        /// Draw boards from black's side
        #[arg(long)]
        flip: bool,

        /// Overlay Stockfish evaluations
        #[arg(long)]
        eval: bool,

        /// Only the first N games
        #[arg(long)]
        limit: Option<usize>,

        #[arg(short, long, default_value = "grid.html")]
        out: PathBuf,
    },

    /// Write one position as SVG
    Diagram {
        archive: String,

        /// Game index (0-based, archive order)
        #[arg(long)]
        game: usize,

        /// Ply to show; past the end shows the final position
        #[arg(long, default_value = "0")]
        ply: usize,

        #[arg(long)]
        flip: bool,

        #[arg(short, long, default_value = "board.svg")]
        out: PathBuf,
    },

    /// Evaluate every ply of a game and plot the curve as SVG
    Plot {
        archive: String,

        #[arg(long)]
        game: usize,

        #[arg(short, long, default_value = "evaluation.svg")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    // Reads .env too
    let mut config = ViewerConfig::from_env()?;
    if let Some(player) = args.player {
        config.tracked_player = player;
    }
    let options = ParseOptions::new(config.tracked_player.clone());

    match args.command {
        Cmd::Table {
            archives,
            json,
            no_date,
        } => {
            let records = load_all(&archives, &options)?;
            let table = TableOptions { with_date: !no_date };
            if json {
                println!("{}", serde_json::to_string_pretty(&to_json_rows(&records, table)?)?);
            } else {
                print!("{}", to_text_table(&records, table));
            }
        }

        Cmd::Grid {
            archive,
            cols,
            flip,
            eval,
            limit,
            out,
        } => {
            let mut records = load_all(&[archive], &options)?;
            if let Some(limit) = limit {
                records.truncate(limit);
            }
            let grid_config = GridConfig {
                cols: cols.unwrap_or(config.grid_cols).max(1),
                flipped: flip,
                board_size: config.board_size,
                columns: GridColumns {
                    score: eval,
                    ..GridColumns::all()
                },
                ..GridConfig::default()
            };
            let mut engine = if eval { spawn_engine(&config) } else { None };
            let mut grid = GridViewer::from_records(&records, grid_config);
            run_grid(
                &mut grid,
                engine.as_mut().map(|e| e as &mut dyn Evaluator),
                io::stdin().lock(),
                &out,
            )?;
        }

        Cmd::Diagram {
            archive,
            game,
            ply,
            flip,
            out,
        } => {
            let record = pick_game(&archive, game, &options)?;
            let replay = replay_movetext(&record.movetext());
            let state = replay.state_clamped(ply);
            BoardDiagram::from_state(state)
                .size(config.board_size)
                .flipped(flip)
                .write_svg(&out)?;
            info!(game, ply = state.ply(), fen = state.fen(), out = %out.display(), "Diagram written");
        }

        Cmd::Plot { archive, game, out } => {
            let record = pick_game(&archive, game, &options)?;
            let replay = replay_movetext(&record.movetext());
            let mut engine = StockfishEngine::new(&config.stockfish_path, config.nodes_per_position)
                .context("Stockfish is required for plotting")?;
            let scores = evaluate_game(&mut engine, &replay);
            engine.quit();

            let plot = PlotConfig {
                title: format!("vs {} ({})", record.opponent, record.result),
                ..PlotConfig::default()
            };
            std::fs::write(&out, evaluation_curve_svg(&scores, &plot))?;
            info!(game, plies = replay.plies(), out = %out.display(), "Evaluation curve written");
        }
    }

    Ok(())
}

/// Expand glob patterns (a pattern matching nothing is taken as a path)
/// and parse every archive, keeping file order.
fn load_all(patterns: &[String], options: &ParseOptions) -> anyhow::Result<Vec<GameRecord>> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let matched: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("Bad archive pattern {pattern}"))?
            .filter_map(Result::ok)
            .collect();
        if matched.is_empty() {
            paths.push(PathBuf::from(pattern));
        } else {
            paths.extend(matched);
        }
    }

    let mut records = Vec::new();
    for path in &paths {
        let parsed = read_archive(path, options)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        records.extend(parsed);
    }
    Ok(records)
}

fn pick_game(archive: &str, index: usize, options: &ParseOptions) -> anyhow::Result<GameRecord> {
    let mut records = load_all(&[archive.to_string()], options)?;
    if index >= records.len() {
        bail!("Game {index} out of range ({} games in archive)", records.len());
    }
    Ok(records.swap_remove(index))
}

/// Engine for the score overlay; a missing engine just means no scores.
fn spawn_engine(config: &ViewerConfig) -> Option<StockfishEngine> {
    match StockfishEngine::new(&config.stockfish_path, config.nodes_per_position) {
        Ok(engine) => {
            info!(stockfish_path = %config.stockfish_path, "Stockfish ready");
            Some(engine)
        }
        Err(e) => {
            warn!(error = %e, "Stockfish unavailable, scores will show N/A");
            None
        }
    }
}

/// Prompt loop: reads commands from `input` and rewrites `out` whenever
/// the global ply changes.
fn run_grid<R: BufRead>(
    grid: &mut GridViewer,
    mut engine: Option<&mut dyn Evaluator>,
    input: R,
    out: &Path,
) -> anyhow::Result<()> {
    write_grid(grid, engine.as_mut().map(|e| &mut **e as &mut dyn Evaluator), out)?;
    println!("n = next, p = previous, <ply> = jump, q = quit");

    for line in input.lines() {
        let line = line?;
        let changed = match GridCommand::parse(&line) {
            Some(GridCommand::Quit) => break,
            Some(command) => grid.apply(command),
            None => {
                println!("Unknown command {:?}", line.trim());
                false
            }
        };
        if changed {
            write_grid(grid, engine.as_mut().map(|e| &mut **e as &mut dyn Evaluator), out)?;
        }
        print!("{} / {} > ", grid.current_ply(), grid.max_ply());
        io::stdout().flush()?;
    }
    Ok(())
}

fn write_grid(grid: &mut GridViewer, engine: Option<&mut dyn Evaluator>, out: &Path) -> anyhow::Result<()> {
    let body = grid.render_html(engine);
    std::fs::write(out, html_page(&grid.status(), &body))
        .with_context(|| format!("Failed to write {}", out.display()))?;
    println!("{} → {}", grid.status(), out.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_viewer::error::ViewerError;
    use game_viewer::evaluation::Score;
    use game_viewer::grid::GridGame;
    use shakmaty::{Chess, Position};

    struct PawnCount;

    impl Evaluator for PawnCount {
        fn evaluate(&mut self, position: &Chess) -> Result<Score, ViewerError> {
            let board = position.board();
            let white = (board.pawns() & board.white()).count() as f64;
            let black = (board.pawns() & board.black()).count() as f64;
            Ok(Score::Pawns(white - black))
        }
    }

    fn grid() -> GridViewer {
        let config = GridConfig {
            columns: GridColumns::all(),
            ..GridConfig::default()
        };
        GridViewer::new(
            vec![
                GridGame::new("1. e4 d5 2. exd5 Qxd5 1-0"),
                GridGame::new("1. d4 0-1"),
            ],
            config,
        )
    }

    #[test]
    fn test_run_grid_follows_commands() {
        let out = std::env::temp_dir().join(format!("grid_loop_{}.html", std::process::id()));
        let mut grid = grid();
        let mut engine = PawnCount;
        let input = io::Cursor::new("n\nn\nn\nbogus\np\n\nq\nn\n");

        run_grid(&mut grid, Some(&mut engine), input, &out).unwrap();

        // n n n p n, then quit before the trailing n
        assert_eq!(grid.current_ply(), 3);
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("Global move: 3"));
        assert!(html.contains("Eval: +1.00"));
        assert!(html.contains("(final position)"));
        let _ = std::fs::remove_file(&out);
    }

    #[test]
    fn test_run_grid_without_engine() {
        let out = std::env::temp_dir().join(format!("grid_plain_{}.html", std::process::id()));
        let mut grid = grid();

        run_grid(&mut grid, None, io::Cursor::new("99\n"), &out).unwrap();

        assert_eq!(grid.current_ply(), 4);
        let html = std::fs::read_to_string(&out).unwrap();
        assert!(html.contains("Global move: 4"));
        assert!(html.contains("Eval: N/A"));
        let _ = std::fs::remove_file(&out);
    }
}
