//! Output formatting and styling module.
//!
//! Console rendering of a [`ScanResult`]: colored per-group listings, a
//! summary table, a JSON report, and the spinner shown while a scan runs.

use crate::scan_result::{EntryRecord, Outcome, ScanResult};
use chrono::{DateTime, Utc};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Machine-readable report of one organization run.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub generated_at: DateTime<Utc>,
    pub root: &'a Path,
    pub total_entries: usize,
    pub failed_entries: usize,
    pub groups: &'a ScanResult,
}

impl<'a> Report<'a> {
    pub fn new(root: &'a Path, result: &'a ScanResult) -> Self {
        Self {
            generated_at: Utc::now(),
            root,
            total_entries: result.len(),
            failed_entries: result.failure_count(),
            groups: result,
        }
    }
}

/// Manages all CLI output with consistent styling and formatting.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Spinner ticking on its own thread until finished.
    pub fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .expect("Invalid spinner template"),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    /// One line per record: `path -> new path`, `path -> ERROR_CODE`, or just
    /// the path for entries that were only inspected.
    pub fn format_record(record: &EntryRecord) -> String {
        let path = record.original_path.display();
        match &record.outcome {
            None => format!("  {}", path),
            Some(Outcome::Moved(new_path)) => {
                format!("  {} -> {}", path, new_path.display().to_string().green())
            }
            Some(Outcome::Failed(code)) => format!("  {} -> {}", path, code.as_str().red()),
        }
    }

    /// Prints every group with its records, in report order.
    pub fn print_report(result: &ScanResult) {
        if result.is_empty() {
            Self::info("Nothing to organize.");
            return;
        }

        for (group, records) in result.iter() {
            Self::header(&format!("{}:", group));
            for record in records {
                println!("{}", Self::format_record(record));
            }
        }
    }

    /// Prints a table of record counts per group.
    pub fn summary_table(result: &ScanResult) {
        Self::header("SUMMARY");

        let rows: Vec<(&str, usize)> = result
            .iter()
            .map(|(group, records)| (group.label(), records.len()))
            .collect();

        let width = rows
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Entries".bold(),
            width = width
        );
        println!("{}", "-".repeat(width + 10));
        for (label, count) in &rows {
            println!(
                "{:<width$} | {}",
                label,
                count.to_string().green(),
                width = width
            );
        }
        println!("{}", "-".repeat(width + 10));
        println!(
            "{:<width$} | {}",
            "Total".bold(),
            result.len().to_string().green().bold(),
            width = width
        );

        let failed = result.failure_count();
        if failed > 0 {
            Self::warning(&format!(
                "{} {} could not be processed",
                failed,
                if failed == 1 { "entry" } else { "entries" }
            ));
        } else {
            Self::success("Done.");
        }
    }

    /// Prints the JSON report to stdout.
    pub fn print_json(root: &Path, result: &ScanResult) -> Result<(), serde_json::Error> {
        let report = Report::new(root, result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
