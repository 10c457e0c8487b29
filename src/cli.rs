//! Shared CLI output helpers for the genemodels binaries.

use std::time::{Duration, Instant};

use colored::Colorize;

use crate::context::DiagnosticCounts;

/// Initialise logging from `RUST_LOG`, defaulting to warnings only.
pub fn init_logger() {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => builder.parse_filters(&filters),
        Err(_) => builder.filter_level(log::LevelFilter::Warn),
    };
    builder.init();
}

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "Gene Models".bold().cyan(), subtitle.dimmed());
    eprintln!();
}

pub fn section(title: &str) {
    let bar = "─".repeat(50);
    eprintln!("{} {}", title.bold().blue(), bar.dimmed());
}

pub fn kv(key: &str, value: &str) {
    eprintln!("  {:<20} {}", key.dimmed(), value);
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "✓".green().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg.yellow());
}

/// Print the dropped-row counters, as a warning when any are non-zero.
pub fn diagnostics(counts: &DiagnosticCounts) {
    if counts.total() == 0 {
        success("no rows dropped");
        return;
    }
    warning(&format!(
        "dropped rows: {} missing gene references, {} malformed registry rows, {} duplicates",
        counts.missing_gene_references, counts.malformed_registry_rows, counts.duplicate_records
    ));
}

pub fn print_summary(start: Instant) {
    eprintln!();
    eprintln!("{}  {}", "Time".dimmed(), format_elapsed(start.elapsed()).bold());
    eprintln!();
}

/// Formats a duration as HH:MM:SS.d (tenths of a second).
#[must_use]
pub fn format_elapsed(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let tenths = d.subsec_millis() / 100;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{tenths}")
}
