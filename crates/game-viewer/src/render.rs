//! SVG board diagrams and HTML grids of diagrams.

use std::fmt::Write as _;
use std::path::Path;

use chess_core::BoardState;
use shakmaty::{Board, Color, File, Rank, Role, Square};
use tracing::debug;

use crate::error::ViewerError;

pub const DEFAULT_BOARD_SIZE: u32 = 256;

/// Square colors. Defaults to the pale/pastel green theme.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardTheme {
    pub light: String,
    pub dark: String,
    pub coordinates: String,
    pub last_move: String,
}

impl Default for BoardTheme {
    fn default() -> Self {
        Self {
            light: "#F1F8E9".to_string(),
            dark: "#C8E6C9".to_string(),
            coordinates: "#4E6E50".to_string(),
            last_move: "#FFF59D".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub from: Square,
    pub to: Square,
    pub color: String,
}

impl Arrow {
    pub fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            color: "#15781B".to_string(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// One board diagram. Build, then `to_svg()` or `write_svg()`.
#[derive(Debug, Clone)]
pub struct BoardDiagram {
    board: Board,
    size: u32,
    flipped: bool,
    coordinates: bool,
    theme: BoardTheme,
    fills: Vec<(Square, String)>,
    arrows: Vec<Arrow>,
    last_move: Option<(Option<Square>, Square)>,
}

impl BoardDiagram {
    pub fn new(board: &Board) -> Self {
        Self {
            board: board.clone(),
            size: DEFAULT_BOARD_SIZE,
            flipped: false,
            coordinates: true,
            theme: BoardTheme::default(),
            fills: Vec::new(),
            arrows: Vec::new(),
            last_move: None,
        }
    }

    /// Diagram of a replayed state, with its move highlighted.
    pub fn from_state(state: &BoardState) -> Self {
        let mut diagram = Self::new(state.board());
        diagram.last_move = state.last_move().map(|mv| (mv.from(), mv.to()));
        diagram
    }

    pub fn size(mut self, size: u32) -> Self {
        self.size = size.max(64);
        self
    }

    /// Black at the bottom.
    pub fn flipped(mut self, flipped: bool) -> Self {
        self.flipped = flipped;
        self
    }

    pub fn coordinates(mut self, show: bool) -> Self {
        self.coordinates = show;
        self
    }

    pub fn theme(mut self, theme: BoardTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn fill(mut self, square: Square, color: impl Into<String>) -> Self {
        self.fills.push((square, color.into()));
        self
    }

    pub fn arrows(mut self, arrows: impl IntoIterator<Item = Arrow>) -> Self {
        self.arrows.extend(arrows);
        self
    }

    fn margin(&self) -> f64 {
        if self.coordinates {
            f64::from(self.size) / 20.0
        } else {
            0.0
        }
    }

    fn square_size(&self) -> f64 {
        (f64::from(self.size) - 2.0 * self.margin()) / 8.0
    }

    /// Top-left corner of a square in SVG coordinates.
    fn corner(&self, square: Square) -> (f64, f64) {
        let file = square.file() as u32;
        let rank = square.rank() as u32;
        let (col, row) = if self.flipped {
            (7 - file, rank)
        } else {
            (file, 7 - rank)
        };
        let sq = self.square_size();
        let m = self.margin();
        (m + f64::from(col) * sq, m + f64::from(row) * sq)
    }

    fn center(&self, square: Square) -> (f64, f64) {
        let (x, y) = self.corner(square);
        let half = self.square_size() / 2.0;
        (x + half, y + half)
    }

    pub fn to_svg(&self) -> String {
        let size = self.size;
        let sq = self.square_size();
        let mut svg = String::new();

        let _ = write!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        );
        let _ = write!(
            svg,
            r#"<rect x="0" y="0" width="{size}" height="{size}" fill="{}"/>"#,
            self.theme.light
        );

        for rank in 0..8u32 {
            for file in 0..8u32 {
                let square = Square::from_coords(File::new(file), Rank::new(rank));
                let (x, y) = self.corner(square);
                let fill = self.square_fill(square, (file + rank) % 2 == 0);
                let _ = write!(
                    svg,
                    r#"<rect x="{x:.2}" y="{y:.2}" width="{sq:.2}" height="{sq:.2}" fill="{fill}"/>"#
                );

                if let Some(piece) = self.board.piece_at(square) {
                    let _ = write!(
                        svg,
                        r#"<text x="{:.2}" y="{:.2}" font-size="{:.2}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                        x + sq / 2.0,
                        y + sq / 2.0,
                        sq * 0.8,
                        glyph(piece.color, piece.role)
                    );
                }
            }
        }

        if self.coordinates {
            self.write_coordinates(&mut svg);
        }

        for arrow in &self.arrows {
            self.write_arrow(&mut svg, arrow);
        }

        svg.push_str("</svg>");
        svg
    }

    fn square_fill(&self, square: Square, dark: bool) -> &str {
        if let Some((_, color)) = self.fills.iter().rev().find(|(s, _)| *s == square) {
            return color;
        }
        if let Some((from, to)) = self.last_move {
            if square == to || Some(square) == from {
                return &self.theme.last_move;
            }
        }
        if dark {
            &self.theme.dark
        } else {
            &self.theme.light
        }
    }

    fn write_coordinates(&self, svg: &mut String) {
        let m = self.margin();
        let font = m * 0.8;
        let color = &self.theme.coordinates;
        for i in 0..8u32 {
            let file = Square::from_coords(File::new(i), Rank::new(0));
            let (x, _) = self.center(file);
            let label = (b'a' + i as u8) as char;
            let bottom = f64::from(self.size) - m / 2.0;
            let _ = write!(
                svg,
                r#"<text x="{x:.2}" y="{bottom:.2}" font-size="{font:.2}" fill="{color}" text-anchor="middle" dominant-baseline="central">{label}</text>"#
            );

            let rank = Square::from_coords(File::new(0), Rank::new(i));
            let (_, y) = self.center(rank);
            let _ = write!(
                svg,
                r#"<text x="{:.2}" y="{y:.2}" font-size="{font:.2}" fill="{color}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                m / 2.0,
                i + 1
            );
        }
    }

    fn write_arrow(&self, svg: &mut String, arrow: &Arrow) {
        let (x1, y1) = self.center(arrow.from);
        let (x2, y2) = self.center(arrow.to);
        let sq = self.square_size();
        let width = sq * 0.15;

        if arrow.from == arrow.to {
            let _ = write!(
                svg,
                r#"<circle cx="{x1:.2}" cy="{y1:.2}" r="{:.2}" fill="none" stroke="{}" stroke-width="{width:.2}" opacity="0.8"/>"#,
                sq * 0.45,
                arrow.color
            );
            return;
        }

        // stop the shaft where the head starts
        let (dx, dy) = (x2 - x1, y2 - y1);
        let len = (dx * dx + dy * dy).sqrt();
        let (ux, uy) = (dx / len, dy / len);
        let head = sq * 0.4;
        let (bx, by) = (x2 - ux * head, y2 - uy * head);
        let (px, py) = (-uy * head / 2.0, ux * head / 2.0);

        let _ = write!(
            svg,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{bx:.2}" y2="{by:.2}" stroke="{}" stroke-width="{width:.2}" stroke-linecap="butt" opacity="0.8"/>"#,
            arrow.color
        );
        let _ = write!(
            svg,
            r#"<polygon points="{x2:.2},{y2:.2} {:.2},{:.2} {:.2},{:.2}" fill="{}" opacity="0.8"/>"#,
            bx + px,
            by + py,
            bx - px,
            by - py,
            arrow.color
        );
    }

    /// Save as `path` (conventionally `{name}.svg`). Returns the SVG.
    pub fn write_svg(&self, path: impl AsRef<Path>) -> Result<String, ViewerError> {
        let svg = self.to_svg();
        std::fs::write(path.as_ref(), &svg)?;
        debug!(path = %path.as_ref().display(), "Wrote board diagram");
        Ok(svg)
    }
}

fn glyph(color: Color, role: Role) -> char {
    match (color, role) {
        (Color::White, Role::King) => '♔',
        (Color::White, Role::Queen) => '♕',
        (Color::White, Role::Rook) => '♖',
        (Color::White, Role::Bishop) => '♗',
        (Color::White, Role::Knight) => '♘',
        (Color::White, Role::Pawn) => '♙',
        (Color::Black, Role::King) => '♚',
        (Color::Black, Role::Queen) => '♛',
        (Color::Black, Role::Rook) => '♜',
        (Color::Black, Role::Bishop) => '♝',
        (Color::Black, Role::Knight) => '♞',
        (Color::Black, Role::Pawn) => '♟',
    }
}

/// One grid cell: a rendered diagram plus optional caption lines.
#[derive(Debug, Clone, Default)]
pub struct GridCell {
    pub svg: String,
    pub caption: Vec<String>,
}

/// CSS grid of diagrams, `cols` per row.
pub fn grid_html(cells: &[GridCell], cols: usize, gap: &str) -> String {
    let mut html = format!(
        r#"<div style="display: grid; grid-template-columns: repeat({}, 1fr); gap: {};">"#,
        cols.max(1),
        escape_html(gap)
    );
    for cell in cells {
        html.push_str("<div>");
        html.push_str(&cell.svg);
        for line in &cell.caption {
            let _ = write!(html, r#"<p style="text-align:center; margin:2px;">{}</p>"#, escape_html(line));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");
    html
}

/// Static grid of arbitrary positions: (board, arrows, flipped) per cell.
pub fn positions_grid_html(
    positions: &[(Board, Vec<Arrow>, bool)],
    cols: usize,
    size: u32,
) -> String {
    let cells: Vec<GridCell> = positions
        .iter()
        .map(|(board, arrows, flipped)| GridCell {
            svg: BoardDiagram::new(board)
                .size(size)
                .flipped(*flipped)
                .arrows(arrows.iter().cloned())
                .to_svg(),
            caption: Vec::new(),
        })
        .collect();
    grid_html(&cells, cols, "10px")
}

/// Wrap a fragment into a standalone HTML page.
pub fn html_page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title></head>\n<body>\n{body}\n</body></html>\n",
        escape_html(title)
    )
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::replay_movetext;

    fn count(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn test_start_position_svg() {
        let svg = BoardDiagram::new(&Board::default()).to_svg();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(count(&svg, "♙"), 8);
        assert_eq!(count(&svg, "♟"), 8);
        assert_eq!(count(&svg, "♔"), 1);
        assert_eq!(count(&svg, "#C8E6C9"), 32);
    }

    #[test]
    fn test_corner_respects_flip() {
        let normal = BoardDiagram::new(&Board::default()).coordinates(false);
        assert_eq!(normal.corner(Square::A1), (0.0, 224.0));
        assert_eq!(normal.corner(Square::H8), (224.0, 0.0));

        let flipped = normal.flipped(true);
        assert_eq!(flipped.corner(Square::A1), (224.0, 0.0));
        assert_eq!(flipped.corner(Square::H8), (0.0, 224.0));
    }

    #[test]
    fn test_last_move_and_fill_highlight() {
        let replay = replay_movetext("1. e4");
        let svg = BoardDiagram::from_state(replay.last()).to_svg();
        assert_eq!(count(&svg, "#FFF59D"), 2);

        let svg = BoardDiagram::new(&Board::default())
            .fill(Square::D5, "#DE7F6D")
            .to_svg();
        assert_eq!(count(&svg, "#DE7F6D"), 1);
    }

    #[test]
    fn test_arrows() {
        let svg = BoardDiagram::new(&Board::default())
            .arrows([
                Arrow::new(Square::E2, Square::E4),
                Arrow::new(Square::D4, Square::D4).with_color("red"),
            ])
            .to_svg();
        assert_eq!(count(&svg, "<polygon"), 1);
        assert_eq!(count(&svg, "<circle"), 1);
    }

    #[test]
    fn test_grid_html_escapes_captions() {
        let cells = vec![
            GridCell {
                svg: "<svg></svg>".to_string(),
                caption: vec!["vs <b>".to_string()],
            };
            4
        ];
        let html = grid_html(&cells, 3, "10px");
        assert!(html.contains("repeat(3, 1fr)"));
        assert_eq!(count(&html, "<svg></svg>"), 4);
        assert!(html.contains("vs &lt;b&gt;"));
    }

    #[test]
    fn test_positions_grid() {
        let html = positions_grid_html(
            &[
                (Board::default(), vec![], false),
                (Board::default(), vec![Arrow::new(Square::G1, Square::F3)], true),
            ],
            2,
            128,
        );
        assert_eq!(count(&html, "<svg"), 2);
        assert!(html.contains(r#"width="128""#));
    }

    #[test]
    fn test_write_svg() {
        let path = std::env::temp_dir().join("game_viewer_render_test.svg");
        let svg = BoardDiagram::new(&Board::default()).write_svg(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), svg);
        let _ = std::fs::remove_file(path);
    }
}
