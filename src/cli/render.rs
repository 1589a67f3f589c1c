//! Terminal renderings of the view models, shared by the one-shot commands
//! and `watch`.

use std::fmt::Write as _;

use colored::Colorize;

use crate::normalize::charts::color_for;
use crate::normalize::{BadFileRow, LineChart, PieChart, StatusBar};
use crate::views::StatsModel;

const SPARK: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];
const BAR_WIDTH: usize = 30;
const PATH_WIDTH: usize = 60;

// ---------------------------------------------------------------------------
// Status bar
// ---------------------------------------------------------------------------

pub fn status(bar: Option<&StatusBar>) -> String {
    let Some(bar) = bar else {
        return format!("{}  {}\n", "checkrr".bold(), "loading…".dimmed());
    };

    let state = if bar.running {
        bar.state.as_str().green().bold()
    } else {
        bar.state.as_str().yellow()
    };
    format!(
        "{}  {}  {} {}  {} {}\n",
        "checkrr".bold(),
        state,
        "Next Run:".dimmed(),
        bar.next_run,
        "Last Run:".dimmed(),
        bar.last_run,
    )
}

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

pub fn stats(model: Option<&StatsModel>) -> String {
    let Some(model) = model else {
        return format!("{}\n  {}\n", "Stats".bold().cyan(), "loading…".dimmed());
    };
    let mut out = String::new();
    out.push_str(&pie(&model.pie));
    out.push('\n');
    out.push_str(&line(&model.line));
    out
}

fn pie(pie: &PieChart) -> String {
    let mut out = format!(
        "{} {}\n",
        PieChart::TITLE.bold().cyan(),
        format!("({})", PieChart::DATASET_LABEL).dimmed()
    );
    if pie.is_empty() {
        out.push_str(&format!("  {}\n", "no counters yet".dimmed()));
        return out;
    }

    // Negative slices take no share of the bar.
    let total: f64 = pie.values.iter().map(|v| v.max(0.0)).sum();
    let label_width = pie.labels.iter().map(|l| l.len()).max().unwrap_or(0);
    for (i, (label, value)) in pie.labels.iter().zip(&pie.values).enumerate() {
        let share = if total > 0.0 {
            value.max(0.0) / total
        } else {
            0.0
        };
        let filled = (share * BAR_WIDTH as f64).round() as usize;
        let (r, g, b) = color_for(i);
        let _ = writeln!(
            out,
            "  {:<label_width$}  {:>9}  {:>5.1}%  {}",
            label,
            format_count(*value),
            share * 100.0,
            "█".repeat(filled).truecolor(r, g, b),
        );
    }
    out
}

fn line(chart: &LineChart) -> String {
    let mut out = format!("{}\n", LineChart::TITLE.bold().cyan());
    let (Some(first), Some(last)) = (chart.labels.first(), chart.labels.last()) else {
        out.push_str(&format!("  {}\n", "no completed runs yet".dimmed()));
        return out;
    };
    let _ = writeln!(
        out,
        "  {} {} → {} ({} runs)",
        "range:".dimmed(),
        first,
        last,
        chart.labels.len()
    );

    let label_width = chart.series.iter().map(|s| s.label.len()).max().unwrap_or(0);
    for (i, series) in chart.series.iter().enumerate() {
        if series.values.iter().all(Option::is_none) {
            continue;
        }
        let latest = series
            .values
            .iter()
            .rev()
            .find_map(|v| *v)
            .map_or_else(|| "-".to_string(), format_number);
        let (r, g, b) = color_for(i);
        let _ = writeln!(
            out,
            "  {:<label_width$}  {}  {:>9}",
            series.label,
            sparkline(&series.values).truecolor(r, g, b),
            latest,
        );
    }
    out
}

/// One block character per value scaled to the series maximum; gaps are
/// spaces.
pub fn sparkline(values: &[Option<u64>]) -> String {
    let max = values.iter().flatten().copied().max().unwrap_or(0);
    values
        .iter()
        .map(|v| match v {
            None => ' ',
            Some(_) if max == 0 => SPARK[0],
            Some(v) => {
                let idx = (*v as f64 / max as f64 * (SPARK.len() - 1) as f64).round() as usize;
                SPARK[idx.min(SPARK.len() - 1)]
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Bad files
// ---------------------------------------------------------------------------

pub fn files(rows: Option<&[BadFileRow]>) -> String {
    let mut out = format!("{}\n", "Bad Files".bold().cyan());
    let Some(rows) = rows else {
        out.push_str(&format!("  {}\n", "loading…".dimmed()));
        return out;
    };
    if rows.is_empty() {
        out.push_str(&format!("  {}\n", "no bad files".green()));
        return out;
    }

    let width = PATH_WIDTH;
    let _ = writeln!(
        out,
        "  {:>4}  {:<width$}  {:<8}  {:<10}  Service",
        "ID", "Path", "Ext", "Reacquired"
    );
    let _ = writeln!(out, "  {}", "-".repeat(width + 40));
    for (i, row) in rows.iter().enumerate() {
        let line = format!(
            "  {:>4}  {:<width$}  {:<8}  {:<10}  {}",
            row.id,
            truncate_left(&row.path, width),
            row.ext,
            if row.reacquire { "yes" } else { "no" },
            row.service,
        );
        if i % 2 == 0 {
            let _ = writeln!(out, "{line}");
        } else {
            let _ = writeln!(out, "{}", line.dimmed());
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Format a number with thousands separators.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Whole non-negative counts get separators; anything else prints as sent.
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && (0.0..=u64::MAX as f64).contains(&value) {
        format_number(value as u64)
    } else {
        format!("{value}")
    }
}

/// Keep the last `max_len` characters of a path, prefixing "…" if cut.
pub fn truncate_left(s: &str, max_len: usize) -> String {
    let count = s.chars().count();
    if count <= max_len {
        return s.to_string();
    }
    let tail: String = s.chars().skip(count - max_len.saturating_sub(1)).collect();
    format!("…{tail}")
}
