//! CLI command implementations.
//!
//! Provides subcommand handlers for:
//! - `checkrr-dash status`: running state, next run, last run duration
//! - `checkrr-dash stats`: latest counters and historical series
//! - `checkrr-dash files`: bad-files grid
//! - `checkrr-dash run`: trigger a run now
//! - `checkrr-dash delete <ids>`: forget bad-file records
//! - `checkrr-dash watch`: live terminal dashboard
//! - `checkrr-dash config show|init|set|reset`: configuration management

pub mod render;

use std::io::{BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use colored::Colorize;

use crate::api::CheckrrClient;
use crate::config;
use crate::normalize::{BadFileRow, StatusBar};
use crate::views::{Dashboard, StatsModel};

/// Redraw cadence of `watch`, independent of the polling interval.
const REDRAW: Duration = Duration::from_secs(1);

/// Output format for the one-shot commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// checkrr-dash status
// ---------------------------------------------------------------------------

pub fn run_status(client: CheckrrClient, format: OutputFormat) -> Result<()> {
    let dash = Dashboard::new(client);
    dash.reload_status().context("failed to fetch run status")?;
    let bar = dash.status().context("no run status available")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bar)?),
        OutputFormat::Csv => print!("{}", status_csv(&bar)),
        OutputFormat::Table => print!("{}", render::status(Some(&bar))),
    }
    Ok(())
}

fn status_csv(bar: &StatusBar) -> String {
    format!(
        "running,state,next_run,last_run\n{},{},{},{}\n",
        bar.running,
        csv_field(&bar.state),
        csv_field(&bar.next_run),
        csv_field(&bar.last_run),
    )
}

// ---------------------------------------------------------------------------
// checkrr-dash stats
// ---------------------------------------------------------------------------

pub fn run_stats(client: CheckrrClient, format: OutputFormat) -> Result<()> {
    let dash = Dashboard::new(client);
    dash.reload_stats().context("failed to fetch stats")?;
    let stats = dash.stats().context("no stats available")?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Csv => print!("{}", stats_csv(&stats)),
        OutputFormat::Table => print!("{}", render::stats(Some(&stats))),
    }
    Ok(())
}

/// Historical series as a wide table: one row per run, one column per
/// counter. Gaps are empty cells.
fn stats_csv(stats: &StatsModel) -> String {
    let mut out = String::from("timestamp");
    for series in &stats.line.series {
        out.push(',');
        out.push_str(&series.label);
    }
    out.push('\n');

    for (i, label) in stats.line.labels.iter().enumerate() {
        out.push_str(&csv_field(label));
        for series in &stats.line.series {
            out.push(',');
            if let Some(Some(value)) = series.values.get(i) {
                out.push_str(&value.to_string());
            }
        }
        out.push('\n');
    }
    out
}

// ---------------------------------------------------------------------------
// checkrr-dash files
// ---------------------------------------------------------------------------

pub fn run_files(client: CheckrrClient, format: OutputFormat) -> Result<()> {
    let dash = Dashboard::new(client);
    dash.reload_files().context("failed to fetch bad files")?;
    let rows = dash.files().unwrap_or_default();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
        OutputFormat::Csv => print!("{}", files_csv(&rows)),
        OutputFormat::Table => print!("{}", render::files(Some(rows.as_slice()))),
    }
    Ok(())
}

fn files_csv(rows: &[BadFileRow]) -> String {
    let mut out = String::from("id,path,ext,reacquire,service\n");
    for row in rows {
        out.push_str(&format!(
            "{},{},{},{},{}\n",
            row.id,
            csv_field(&row.path),
            csv_field(&row.ext),
            row.reacquire,
            csv_field(&row.service),
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// checkrr-dash run
// ---------------------------------------------------------------------------

pub fn run_trigger(client: CheckrrClient) -> Result<()> {
    let dash = Dashboard::new(client);
    // Best effort: lets run_now refuse when a run is already shown.
    if let Err(e) = dash.reload_status() {
        tracing::debug!(error = %e, "could not read status before triggering run");
    }
    dash.run_now()?;
    println!("{} Run requested", "✓".green().bold());
    Ok(())
}

// ---------------------------------------------------------------------------
// checkrr-dash delete
// ---------------------------------------------------------------------------

pub fn run_delete(client: CheckrrClient, ids: &[usize], yes: bool) -> Result<()> {
    let dash = Dashboard::new(client);
    dash.reload_files().context("failed to fetch bad files")?;
    let rows = dash.files().unwrap_or_default();

    let selected: Vec<BadFileRow> = rows
        .iter()
        .filter(|row| ids.contains(&row.id))
        .cloned()
        .collect();
    if !selected.is_empty() {
        print!("{}", render::files(Some(selected.as_slice())));
    }
    println!(
        "{}",
        "checkrr doesn't delete files from the dashboard. This only removes the records from the list."
            .yellow()
    );

    if !yes && !confirm("Are you sure you want to delete these entries?")? {
        println!("{}", "Cancelled.".dimmed());
        return Ok(());
    }

    let count = dash.delete_selected(ids)?;
    println!("{} Deleted {} record(s)", "✓".green().bold(), count);

    let remaining = dash.files().map_or(0, |rows| rows.len());
    println!("  {}", format!("{remaining} bad file(s) remain").dimmed());
    Ok(())
}

fn confirm(question: &str) -> Result<bool> {
    print!("{question} [y/N] ");
    std::io::stdout().flush().context("failed to flush stdout")?;
    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("failed to read confirmation")?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

// ---------------------------------------------------------------------------
// checkrr-dash watch
// ---------------------------------------------------------------------------

/// Live terminal dashboard. Each view polls on its own; the screen is
/// redrawn from the latest snapshots every second.
///
/// With `once`, waits (at most one polling interval) for all three views to
/// load, draws a single frame and exits.
pub fn run_watch(client: CheckrrClient, interval: Duration, once: bool) -> Result<()> {
    let mut dash = Dashboard::mount(client, interval).context("failed to start pollers")?;

    if once {
        let deadline = Instant::now() + interval;
        while Instant::now() < deadline && !all_loaded(&dash) {
            thread::sleep(Duration::from_millis(50));
        }
        print!("{}", frame(&dash));
        dash.unmount();
        return Ok(());
    }

    loop {
        print!("\x1b[2J\x1b[H{}", frame(&dash));
        println!(
            "\n{}",
            format!(
                "{} · refresh every {}s · Ctrl+C to quit",
                dash.client().base_url(),
                interval.as_secs()
            )
            .dimmed()
        );
        std::io::stdout().flush().context("failed to flush stdout")?;
        thread::sleep(REDRAW);
    }
}

fn all_loaded(dash: &Dashboard) -> bool {
    dash.status().is_some() && dash.stats().is_some() && dash.files().is_some()
}

fn frame(dash: &Dashboard) -> String {
    let status = dash.status();
    let stats = dash.stats();
    let files = dash.files();
    format!(
        "{}\n{}\n{}",
        render::status(status.as_ref()),
        render::stats(stats.as_ref()),
        render::files(files.as_deref()),
    )
}

// ---------------------------------------------------------------------------
// checkrr-dash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective checkrr-dash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.checkrr-dash/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.checkrr-dash/config.toml (not found)".dimmed()
        );
    }
    println!("  {} {}", "·".dimmed(), ".checkrr-dash.toml".dimmed());
    println!(
        "  {} {}",
        "·".dimmed(),
        "CHECKRR_DASH_* environment variables".dimmed()
    );
    println!("  {} {}", "·".dimmed(), "--url flag".dimmed());

    Ok(())
}

pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    let path = config::set_config_value(key, value)?;
    println!(
        "{} Set {} = {} in {}",
        "✓".green().bold(),
        key.bold(),
        value,
        path.display()
    );
    Ok(())
}

pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Quote a CSV field when it contains a separator, quote or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
