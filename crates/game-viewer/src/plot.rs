//! Static evaluation curve for one game.

use std::fmt::Write as _;

use crate::evaluation::Score;
use crate::render::escape_html;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotConfig {
    pub width: u32,
    pub height: u32,
    /// Mates and huge scores are drawn at ±mate_cap pawns
    pub mate_cap: f64,
    pub title: String,
    pub line_color: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 320,
            mate_cap: 10.0,
            title: "Evaluation".to_string(),
            line_color: "#2E7D32".to_string(),
        }
    }
}

const PAD: f64 = 32.0;

/// Plot coordinates of each score. Unavailable scores sit on the zero line.
pub fn curve_points(scores: &[Score], config: &PlotConfig) -> Vec<(f64, f64)> {
    let width = f64::from(config.width) - 2.0 * PAD;
    let height = f64::from(config.height) - 2.0 * PAD;
    let cap = config.mate_cap.max(f64::EPSILON);
    let step = if scores.len() > 1 {
        width / (scores.len() - 1) as f64
    } else {
        0.0
    };

    scores
        .iter()
        .enumerate()
        .map(|(i, score)| {
            let value = score.as_pawns(cap).unwrap_or(0.0);
            let x = PAD + i as f64 * step;
            // +cap at the top, -cap at the bottom
            let y = PAD + (cap - value) / (2.0 * cap) * height;
            (x, y)
        })
        .collect()
}

pub fn evaluation_curve_svg(scores: &[Score], config: &PlotConfig) -> String {
    let (w, h) = (config.width, config.height);
    let zero_y = f64::from(h) / 2.0;
    let mut svg = String::new();

    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(svg, r##"<rect width="{w}" height="{h}" fill="#FFFFFF"/>"##);
    let _ = write!(
        svg,
        r##"<text x="{:.2}" y="{:.2}" font-size="14" text-anchor="middle">{}</text>"##,
        f64::from(w) / 2.0,
        PAD / 2.0,
        escape_html(&config.title)
    );
    let _ = write!(
        svg,
        r##"<line x1="{PAD}" y1="{zero_y:.2}" x2="{:.2}" y2="{zero_y:.2}" stroke="#9E9E9E" stroke-dasharray="4 3"/>"##,
        f64::from(w) - PAD
    );

    for (label, y) in [
        (config.mate_cap, PAD),
        (0.0, zero_y),
        (-config.mate_cap, f64::from(h) - PAD),
    ] {
        let _ = write!(
            svg,
            r#"<text x="{:.2}" y="{y:.2}" font-size="10" text-anchor="end" dominant-baseline="central">{label:+.0}</text>"#,
            PAD - 4.0
        );
    }

    let points = curve_points(scores, config);
    if !points.is_empty() {
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
        let _ = write!(
            svg,
            r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="2"/>"#,
            coords.join(" "),
            config.line_color
        );
    }

    svg.push_str("</svg>");
    svg
}
