//! Tabular output of parsed records (text or JSON rows).

use chess_core::{count_moves_or_default, GameRecord};
use serde_json::Value as JsonValue;

use crate::error::ViewerError;
use crate::grid::format_move_count;

/// Longest cell printed in the text table before eliding.
const MAX_CELL: usize = 48;

/// Minimal variant drops the date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableOptions {
    pub with_date: bool,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self { with_date: true }
    }
}

/// One JSON object per record, plus the `moves` count column.
pub fn to_json_rows(records: &[GameRecord], options: TableOptions) -> Result<JsonValue, ViewerError> {
    let rows = records
        .iter()
        .map(|record| {
            let mut row = serde_json::to_value(record)?;
            if let Some(obj) = row.as_object_mut() {
                obj.insert(
                    "moves".to_string(),
                    serde_json::json!(count_moves_or_default(&record.movetext())),
                );
                if !options.with_date {
                    obj.remove("date");
                }
            }
            Ok(row)
        })
        .collect::<Result<Vec<_>, serde_json::Error>>()?;
    Ok(JsonValue::Array(rows))
}

fn header(options: TableOptions) -> Vec<&'static str> {
    let mut cols = vec!["pieces", "result", "against"];
    if options.with_date {
        cols.push("date");
    }
    cols.extend(["moves", "opening", "midgame + endgame"]);
    cols
}

fn row(record: &GameRecord, options: TableOptions) -> Vec<String> {
    let mut cells = vec![
        record.pieces.to_string(),
        record.result.clone(),
        record.opponent.clone(),
    ];
    if options.with_date {
        cells.push(record.date.map(|d| d.to_string()).unwrap_or_default());
    }
    cells.push(format_move_count(count_moves_or_default(&record.movetext())));
    cells.push(elide(&record.opening_text));
    cells.push(elide(&record.mid_end_text));
    cells
}

fn elide(text: &str) -> String {
    if text.chars().count() <= MAX_CELL {
        text.to_string()
    } else {
        let head: String = text.chars().take(MAX_CELL - 3).collect();
        format!("{head}...")
    }
}

/// Aligned plain-text table, one line per record.
pub fn to_text_table(records: &[GameRecord], options: TableOptions) -> String {
    let header: Vec<String> = header(options).into_iter().map(String::from).collect();
    let rows: Vec<Vec<String>> = records.iter().map(|r| row(r, options)).collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for cells in &rows {
        for (w, cell) in widths.iter_mut().zip(cells) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = render(&header);
    out.push('\n');
    for cells in &rows {
        out.push_str(&render(cells));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Pieces;
    use chrono::NaiveDate;

    fn record() -> GameRecord {
        GameRecord {
            pieces: Pieces::Black,
            result: "0-1".to_string(),
            opponent: "rival".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 12, 1),
            opening_text: "1. e4 c5 2. Nf3 d6".to_string(),
            mid_end_text: "8. Qd2 Qb6 9. Kh1 Qxb2 0-1".to_string(),
        }
    }

    #[test]
    fn test_json_rows() {
        let rows = to_json_rows(&[record()], TableOptions::default()).unwrap();
        let row = &rows[0];
        assert_eq!(row["pieces"], "black");
        assert_eq!(row["against"], "rival");
        assert_eq!(row["date"], "2024-12-01");
        assert_eq!(row["moves"], 9.0);
    }

    #[test]
    fn test_minimal_variant_has_no_date() {
        let rows = to_json_rows(&[record()], TableOptions { with_date: false }).unwrap();
        assert!(rows[0].get("date").is_none());

        let text = to_text_table(&[record()], TableOptions { with_date: false });
        assert!(!text.lines().next().unwrap().contains("date"));
    }

    #[test]
    fn test_text_table_aligns() {
        let text = to_text_table(&[record(), record()], TableOptions::default());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("pieces  result  against"));
        assert!(lines[1].starts_with("black   0-1     rival"));
        assert!(lines[1].contains("2024-12-01"));
    }

    #[test]
    fn test_elide_long_cells() {
        let long = "1. e4 ".repeat(20);
        let cell = elide(&long);
        assert_eq!(cell.chars().count(), MAX_CELL);
        assert!(cell.ends_with("..."));
    }
}
