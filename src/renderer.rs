//! # ASCII Tide Chart
//!
//! Terminal rendering of a [`TideCurve`] for the CLI's `--chart` mode.
//! One column per sample, the query time at the left edge, high and low
//! water marked `H` and `L`.

use crate::{TideCurve, TideKind};

const ROWS: usize = 16;
const Y_AXIS_WIDTH: usize = 6; // Space for Y-axis labels

/// Format a height label with sign, e.g. `+1.5`, ` 0.0`.
fn format_height(height: f64) -> String {
    if height.abs() < 0.05 {
        " 0.0".to_string()
    } else {
        format!("{:+.1}", height)
    }
}

/// Render `curve` to a multi-line string.
pub fn render_ascii(curve: &TideCurve) -> String {
    let Some((min, max)) = curve.bounds() else {
        return "(no tide data)\n".to_string();
    };
    let span = (max - min).max(f64::EPSILON);
    let sample_count = curve.samples.len();

    let height_to_row = |h: f64| {
        let normalized = (h - min) / span;
        (((1.0 - normalized) * (ROWS as f64 - 1.0)).round() as usize).min(ROWS - 1)
    };

    let mut grid = vec![vec![' '; sample_count + Y_AXIS_WIDTH]; ROWS];

    // Y-axis labels every half unit (every unit for large ranges)
    let label_step = if span > 4.0 { 1.0 } else { 0.5 };
    let mut label = (min / label_step).ceil() * label_step;
    while label <= max {
        let row = height_to_row(label);
        let text = format!("{:<width$}", format_height(label), width = Y_AXIS_WIDTH - 1);
        for (i, ch) in text.chars().take(Y_AXIS_WIDTH - 1).enumerate() {
            grid[row][i] = ch;
        }
        grid[row][Y_AXIS_WIDTH - 1] = '│';
        label += label_step;
    }

    for (column, sample) in curve.samples.iter().enumerate() {
        let marker = if column == 0 { 'X' } else { '•' };
        grid[height_to_row(sample.height)][column + Y_AXIS_WIDTH] = marker;
    }

    let step_ms = curve.step_minutes.max(1) * 60_000;
    for event in &curve.events {
        let offset_ms = (event.time - curve.start).num_milliseconds();
        let column = ((offset_ms as f64 / step_ms as f64).round() as usize).min(sample_count - 1);
        let marker = match event.kind {
            TideKind::High => 'H',
            TideKind::Low => 'L',
        };
        grid[height_to_row(event.height)][column + Y_AXIS_WIDTH] = marker;
    }

    let mut out = String::new();
    for row in grid {
        out.push_str(row.into_iter().collect::<String>().trim_end());
        out.push('\n');
    }

    // Hour ticks below the chart
    let per_hour = (60 / curve.step_minutes.max(1)).max(1) as usize;
    let padding = " ".repeat(Y_AXIS_WIDTH);
    let ticks: String = (0..sample_count)
        .map(|i| if i % per_hour == 0 { '|' } else { ' ' })
        .collect();
    out.push_str(&format!("{}{}\n", padding, ticks.trim_end()));

    let last_mins = curve.samples.last().map(|s| s.mins_rel).unwrap_or(0);
    let end_label = format!("+{}h", last_mins / 60);
    let gap = sample_count.saturating_sub(3 + end_label.len());
    out.push_str(&format!("{}Now{}{}\n", padding, " ".repeat(gap), end_label));
    out
}

/// Print `curve` to stdout.
pub fn draw_ascii(curve: &TideCurve) {
    print!("{}", render_ascii(curve));
}
