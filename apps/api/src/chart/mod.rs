//! Match chart: horizontal bar chart of the top ranked jobs.
//!
//! `build_match_chart` produces the data; `render_svg` draws it. Geometry is plain
//! arithmetic on an estimated glyph width, which is close enough for a sans-serif label column.

use std::fmt::Write;

use serde::Serialize;

use crate::models::job::JobPosting;

pub const MAX_BARS: usize = 10;

const CHART_TITLE: &str = "Top Job Matches";
const X_AXIS_LABEL: &str = "Match Score (%)";

const FONT_SIZE_PX: f32 = 12.0;
/// Average sans-serif advance width in em.
const AVG_CHAR_WIDTH_EM: f32 = 0.55;
const MAX_LABEL_CHARS: usize = 48;
const BAR_HEIGHT: f32 = 24.0;
const BAR_GAP: f32 = 10.0;
const PLOT_WIDTH: f32 = 480.0;
const MARGIN: f32 = 16.0;
const TITLE_BAND: f32 = 36.0;
const AXIS_BAND: f32 = 44.0;
const VALUE_LABEL_ROOM: f32 = 64.0;
const BAR_COLOR: &str = "#87ceeb";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartBar {
    pub label: String,
    pub score: f64,
    pub value_label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchChart {
    pub title: String,
    pub x_label: String,
    pub bars: Vec<ChartBar>,
}

/// Takes the first `MAX_BARS` of an already-ranked list. `None` when there is nothing to draw.
pub fn build_match_chart(ranked: &[JobPosting]) -> Option<MatchChart> {
    if ranked.is_empty() {
        return None;
    }

    let bars = ranked
        .iter()
        .take(MAX_BARS)
        .map(|job| ChartBar {
            label: format!("{} - {}", job.company, job.title),
            score: job.score(),
            value_label: percent_label(job.score()),
        })
        .collect();

    Some(MatchChart {
        title: CHART_TITLE.to_string(),
        x_label: X_AXIS_LABEL.to_string(),
        bars,
    })
}

/// Whole scores keep one decimal: `100.0%`, `0.0%`, `66.67%`.
fn percent_label(score: f64) -> String {
    format!("{score:?}%")
}

/// Renders the chart as a standalone SVG document, highest score at the top.
pub fn render_svg(chart: &MatchChart) -> String {
    let labels: Vec<String> = chart.bars.iter().map(|b| truncate(&b.label)).collect();
    let label_width = labels
        .iter()
        .map(|l| text_width(l))
        .fold(0.0_f32, f32::max)
        .ceil()
        + MARGIN;

    let plot_left = MARGIN + label_width;
    let plot_top = TITLE_BAND;
    let plot_height = chart.bars.len() as f32 * (BAR_HEIGHT + BAR_GAP) + BAR_GAP;
    let width = plot_left + PLOT_WIDTH + VALUE_LABEL_ROOM + MARGIN;
    let height = plot_top + plot_height + AXIS_BAND;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif" font-size="{FONT_SIZE_PX}">"#
    );
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle" font-size="16" font-weight="bold">{}</text>"#,
        width / 2.0,
        TITLE_BAND - 12.0,
        escape_xml(&chart.title)
    );

    for tick in (0..=100).step_by(20) {
        let x = plot_left + PLOT_WIDTH * tick as f32 / 100.0;
        let _ = writeln!(
            svg,
            r##"  <line x1="{x}" y1="{plot_top}" x2="{x}" y2="{}" stroke="#dddddd"/>"##,
            plot_top + plot_height
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{x}" y="{}" text-anchor="middle">{tick}</text>"#,
            plot_top + plot_height + 16.0
        );
    }

    for (i, (bar, label)) in chart.bars.iter().zip(&labels).enumerate() {
        let y = plot_top + BAR_GAP + i as f32 * (BAR_HEIGHT + BAR_GAP);
        let bar_width = PLOT_WIDTH * (bar.score.clamp(0.0, 100.0) as f32) / 100.0;
        let text_y = y + BAR_HEIGHT / 2.0 + FONT_SIZE_PX / 3.0;

        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{text_y}" text-anchor="end">{}</text>"#,
            plot_left - 6.0,
            escape_xml(label)
        );
        let _ = writeln!(
            svg,
            r#"  <rect x="{plot_left}" y="{y}" width="{bar_width}" height="{BAR_HEIGHT}" fill="{BAR_COLOR}"/>"#
        );
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{text_y}">{}</text>"#,
            plot_left + bar_width + 4.0,
            escape_xml(&bar.value_label)
        );
    }

    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle">{}</text>"#,
        plot_left + PLOT_WIDTH / 2.0,
        height - 10.0,
        escape_xml(&chart.x_label)
    );
    svg.push_str("</svg>\n");
    svg
}

fn text_width(text: &str) -> f32 {
    text.chars().count() as f32 * AVG_CHAR_WIDTH_EM * FONT_SIZE_PX
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return label.to_string();
    }
    let mut cut: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
    cut.push('…');
    cut
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
