use colored::*;
use std::path::Path;

use crate::cleaner::DeletionOutcome;
use crate::common::format::{self, format_path, format_size, format_size_colored, padded_line};
use crate::scanner::report::{Deletable, ScanReport};
use crate::scanner::targets::TargetConfig;

const LINE_WIDTH: usize = 60;
const SIZE_WIDTH: usize = 15;

/// Print the scan report in human-readable format
pub fn print_scan_report(report: &ScanReport) {
    println!();
    println!("{}", "=== Dev Storage Inspector ===".bold());

    for summary in &report.categories {
        let listed: Vec<_> = summary
            .results
            .iter()
            .filter(|r| r.is_reclaimable())
            .collect();
        if listed.is_empty() || summary.total == 0 {
            continue;
        }

        println!();
        println!("{}", format!("[{}]", summary.category).cyan().bold());
        for result in listed {
            println!(
                "{}",
                padded_line(
                    &format!("- {}", result.name),
                    &format_size(result.size),
                    LINE_WIDTH,
                    SIZE_WIDTH
                )
            );
        }
        println!(
            "{}",
            padded_line("Subtotal:", &format_size(summary.total), LINE_WIDTH, SIZE_WIDTH).dimmed()
        );
    }

    println!();
    println!("{}", "-".repeat(40).dimmed());
    let label = "Total Developer-related Storage:";
    let gap = LINE_WIDTH
        .saturating_sub(label.len())
        .saturating_sub(SIZE_WIDTH)
        .max(1);
    let total = format_size(report.grand_total);
    println!(
        "{}{}{}{}",
        label.bold(),
        " ".repeat(gap),
        " ".repeat(SIZE_WIDTH.saturating_sub(total.len())),
        format_size_colored(report.grand_total)
    );

    if !report.top.is_empty() {
        println!();
        println!("Top {} Largest Directories:", report.top.len());
        for (index, result) in report.top.iter().enumerate() {
            println!(
                "{}",
                padded_line(
                    &format!("{}. {}", index + 1, result.name),
                    &format_size(result.size),
                    LINE_WIDTH,
                    SIZE_WIDTH
                )
            );
        }
    }

    if !report.warnings.is_empty() {
        println!();
        println!(
            "  {} {}",
            "⚠".yellow(),
            format!("{} warnings:", report.warnings.len()).yellow()
        );
        for warning in &report.warnings {
            println!("    {} {}", "→".dimmed(), warning.dimmed());
        }
    }

    println!();
    println!(
        "  Scanned in {}  •  run {} to free space",
        format::format_duration(report.duration_secs).cyan(),
        "dev-space-audit clean".cyan()
    );
    println!();
}

/// Print the scan report as JSON
pub fn print_scan_json(report: &ScanReport) {
    match serde_json::to_string_pretty(report) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

/// Print a minimal summary: total, present targets, scanned targets
pub fn print_scan_quiet(report: &ScanReport) {
    let present = report.results.iter().filter(|r| r.exists).count();
    println!(
        "{}  {}  {}",
        format_size(report.grand_total),
        present,
        report.results.len()
    );
}

/// Print the catalog grouped by category
pub fn print_targets(targets: &[TargetConfig], home: &Path) {
    println!();
    let mut current: Option<&str> = None;
    for target in targets {
        if current != Some(target.category.as_str()) {
            if current.is_some() {
                println!();
            }
            println!("{}", format!("[{}]", target.category).cyan().bold());
            current = Some(target.category.as_str());
        }
        let marker = if target.is_glob { " (glob)".dimmed() } else { "".normal() };
        println!(
            "  {:<32} {}{}",
            target.name,
            format_path(&target.path, home).dimmed(),
            marker
        );
    }
    println!();
}

/// Print what a clean pass is about to delete
pub fn print_clean_plan(selected: &[Deletable], home: &Path) {
    println!();
    println!("{}", "Selected for deletion:".bold());
    for d in selected {
        println!(
            "  {} {:<32} {:>12}  {}",
            "•".dimmed(),
            d.target.name,
            format_size(d.result.size),
            format_path(&d.target.path, home).dimmed()
        );
    }
    let total: u64 = selected.iter().map(|d| d.result.size).sum();
    println!();
    println!("  Total: {}", format_size_colored(total));
}

/// Print the outcome of a delete pass
pub fn print_deletion_outcome(outcome: &DeletionOutcome, dry_run: bool, home: &Path) {
    println!();
    if dry_run {
        println!(
            "  {} Dry run: would delete {} path(s). No files modified.",
            "ℹ️",
            outcome.deleted.len()
        );
        for path in &outcome.deleted {
            println!("    {} {}", "→".dimmed(), format_path(path, home));
        }
    } else if !outcome.deleted.is_empty() {
        println!(
            "  {} Deleted {} path(s).",
            "✓".green(),
            outcome.deleted.len()
        );
    } else {
        println!("  Nothing was deleted.");
    }

    if outcome.cancelled {
        println!("  {} Cancelled before all targets were processed", "⚠".yellow());
    }

    if !outcome.errors.is_empty() {
        eprintln!();
        eprintln!("  {} Error(s) while deleting:", "✗".red());
        for e in &outcome.errors {
            let label = if e.refused {
                "refused".yellow()
            } else {
                "failed".red()
            };
            eprintln!("    [{}] {} : {}", label, format_path(&e.path, home), e.message);
        }
    }
    println!();
}

/// Print the outcome of a delete pass as JSON
pub fn print_deletion_json(outcome: &DeletionOutcome, dry_run: bool) {
    let json = serde_json::json!({
        "dry_run": dry_run,
        "deleted": outcome.deleted,
        "errors": outcome.errors,
        "cancelled": outcome.cancelled,
    });
    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing outcome: {}", e),
    }
}
