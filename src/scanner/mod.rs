pub mod pattern;
pub mod report;
pub mod size;
pub mod targets;

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use crate::common::errors::{AuditError, Result};
use report::ScanReport;
use targets::{ScanResult, TargetConfig};

/// Size a single target.
///
/// Plain targets are checked for existence first and only sized when present.
/// Glob targets are expanded; a match that disappears before it is sized
/// contributes nothing. Sizing failures end up in `error`, never as a panic or
/// an aborted pass.
pub fn scan(target: &TargetConfig) -> ScanResult {
    if target.is_glob {
        return scan_glob(target);
    }

    if std::fs::symlink_metadata(&target.path).is_err() {
        return ScanResult::absent(target);
    }

    match size::compute_size(&target.path) {
        Ok(bytes) => ScanResult::sized(target, bytes),
        Err(e) => {
            tracing::warn!("{}: {}", target.name, e);
            ScanResult {
                error: Some(e.to_string()),
                ..ScanResult::sized(target, 0)
            }
        }
    }
}

fn scan_glob(target: &TargetConfig) -> ScanResult {
    let matches = match pattern::expand(&target.path) {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!("{}: {}", target.name, e);
            return ScanResult {
                error: Some(e.to_string()),
                ..ScanResult::absent(target)
            };
        }
    };

    if matches.is_empty() {
        return ScanResult::absent(target);
    }

    // Keep the best-effort total and remember the first failure
    let mut total = 0u64;
    let mut first_error = None;
    for path in &matches {
        match size::compute_size(path) {
            Ok(bytes) => total += bytes,
            Err(e) => {
                tracing::warn!("{}: {}", target.name, e);
                first_error.get_or_insert_with(|| e.to_string());
            }
        }
    }
    ScanResult {
        error: first_error,
        ..ScanResult::sized(target, total)
    }
}

/// How a scan pass runs
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Size targets on the rayon pool
    pub parallel: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            parallel: true,
            show_progress: false,
        }
    }
}

/// Scan every target. Output order always matches input order.
pub fn scan_all(targets: &[TargetConfig], options: &ScanOptions) -> Vec<ScanResult> {
    let never = AtomicBool::new(false);
    // Without a cancellation source the pass cannot be interrupted
    scan_all_cancellable(targets, options, &never).unwrap_or_default()
}

/// Scan every target, stopping before new work once `cancel` is set.
/// A cancelled pass yields `AuditError::Cancelled` and no partial results.
pub fn scan_all_cancellable(
    targets: &[TargetConfig],
    options: &ScanOptions,
    cancel: &AtomicBool,
) -> Result<Vec<ScanResult>> {
    let total = targets.len();
    let pb = if options.show_progress {
        let pb = ProgressBar::new(total as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("━━░"),
        );
        Some(pb)
    } else {
        None
    };

    let scan_one = |index: usize, target: &TargetConfig| -> Option<ScanResult> {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        tracing::debug!("[{}/{}] scanning {}", index + 1, total, target.name);
        if let Some(ref pb) = pb {
            pb.set_message(format!("[{}/{}] {}", index + 1, total, target.name));
        }
        let result = scan(target);
        if let Some(ref pb) = pb {
            pb.inc(1);
        }
        Some(result)
    };

    let collected: Vec<Option<ScanResult>> = if options.parallel {
        targets
            .par_iter()
            .enumerate()
            .map(|(i, t)| scan_one(i, t))
            .collect()
    } else {
        let mut out = Vec::with_capacity(total);
        for (i, t) in targets.iter().enumerate() {
            let result = scan_one(i, t);
            let stop = result.is_none();
            out.push(result);
            if stop {
                break;
            }
        }
        out
    };

    if let Some(ref pb) = pb {
        pb.finish_and_clear();
    }

    let results: Option<Vec<ScanResult>> = collected.into_iter().collect();
    match results {
        Some(results) if results.len() == total => Ok(results),
        _ => {
            tracing::info!("scan cancelled");
            Err(AuditError::Cancelled)
        }
    }
}

/// Main scan orchestrator: scan, aggregate and time the pass
pub fn run_scan(
    targets: &[TargetConfig],
    options: &ScanOptions,
    top_n: usize,
    cancel: &AtomicBool,
) -> Result<ScanReport> {
    let start = Instant::now();
    let results = scan_all_cancellable(targets, options, cancel)?;
    let report = ScanReport::build(results, top_n, start.elapsed().as_secs_f64());
    tracing::info!(
        "scanned {} targets, {} bytes in {:.2}s",
        targets.len(),
        report.grand_total,
        report.duration_secs
    );
    Ok(report)
}
