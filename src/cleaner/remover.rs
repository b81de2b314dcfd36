use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::common::errors::{AuditError, Result};
use crate::common::format;
use crate::common::paths;
use crate::common::safety::HomeBoundary;
use crate::scanner::pattern;
use crate::scanner::targets::TargetConfig;

/// What happened to one resolved path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Removed from disk
    Deleted,
    /// Would have been removed; nothing was touched
    DryRun,
    /// Already gone; nothing to do
    Missing,
}

/// A per-path deletion failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionError {
    pub path: PathBuf,
    pub message: String,
    /// Refused by the home boundary or protected-path guard, not an I/O failure
    pub refused: bool,
}

/// Result of one delete pass
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeletionOutcome {
    /// Removed paths, or paths that would be removed in a dry run
    pub deleted: Vec<PathBuf>,
    pub errors: Vec<DeletionError>,
    /// The pass stopped early; entries above are what completed
    pub cancelled: bool,
}

impl DeletionOutcome {
    fn record(&mut self, path: &Path, result: Result<Removal>) {
        match result {
            Ok(Removal::Deleted) | Ok(Removal::DryRun) => self.deleted.push(path.to_path_buf()),
            Ok(Removal::Missing) => {}
            Err(e) => {
                tracing::warn!("{}", e);
                self.errors.push(DeletionError {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                    refused: e.is_security_violation(),
                });
            }
        }
    }
}

/// Deletes catalog targets, never outside the home directory
#[derive(Debug, Clone)]
pub struct Remover {
    home: HomeBoundary,
    show_progress: bool,
}

impl Remover {
    pub fn new(home: HomeBoundary) -> Self {
        Self {
            home,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Concrete paths a target would delete. Paths outside home are left out
    /// silently; a plain target yields at most one path.
    pub fn resolve_deletion_targets(&self, target: &TargetConfig) -> Result<Vec<PathBuf>> {
        let (inside, _) = self.partition(target)?;
        Ok(inside)
    }

    /// Split a target's expansion into paths inside and outside home
    fn partition(&self, target: &TargetConfig) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
        let candidates = if target.is_glob {
            pattern::expand(&target.path)?
        } else {
            vec![paths::absolutize(&target.path)]
        };
        Ok(candidates.into_iter().partition(|p| self.home.contains(p)))
    }

    /// Delete one path, re-checking the home boundary first.
    ///
    /// Symlinks are unlinked, never followed. A path that does not exist is a
    /// successful no-op.
    pub fn delete_one(&self, path: &Path, dry_run: bool) -> Result<Removal> {
        let path = self.home.assert_contains(path)?;

        if self.home.is_protected(&path) {
            return Err(AuditError::Protected { path });
        }

        let metadata = match std::fs::symlink_metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("already gone: {}", path.display());
                return Ok(Removal::Missing);
            }
            Err(e) => return Err(AuditError::io(&path, e)),
        };

        self.home.assert_real_parent_contained(&path)?;

        if dry_run {
            tracing::debug!("dry run: would delete {}", path.display());
            return Ok(Removal::DryRun);
        }

        let removed = if metadata.is_dir() {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        removed.map_err(|e| AuditError::io(&path, e))?;

        tracing::debug!("deleted {}", path.display());
        Ok(Removal::Deleted)
    }

    /// Delete every target's expansion, one target at a time. Failures are
    /// collected per path and never stop the remaining targets. Once `cancel`
    /// is set no further target is started.
    pub fn delete_many(
        &self,
        targets: &[TargetConfig],
        dry_run: bool,
        cancel: &AtomicBool,
    ) -> DeletionOutcome {
        let mut outcome = DeletionOutcome::default();

        let pb = if self.show_progress && !dry_run {
            let pb = ProgressBar::new(targets.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("{spinner:.red} [{bar:40.red/blue}] {pos}/{len} Deleting... {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("━━░"),
            );
            Some(pb)
        } else {
            None
        };

        for target in targets {
            if cancel.load(Ordering::Relaxed) {
                tracing::info!("delete pass cancelled");
                outcome.cancelled = true;
                break;
            }
            if let Some(ref pb) = pb {
                pb.set_message(format::truncate(&target.name, 40));
            }

            match self.partition(target) {
                Ok((inside, outside)) => {
                    for path in outside {
                        outcome.record(&path, Err(AuditError::OutsideHome { path: path.clone() }));
                    }
                    for path in inside {
                        let result = self.delete_one(&path, dry_run);
                        outcome.record(&path, result);
                    }
                }
                Err(e) => outcome.record(&target.path, Err(e)),
            }

            if let Some(ref pb) = pb {
                pb.inc(1);
            }
        }

        if let Some(ref pb) = pb {
            pb.finish_and_clear();
        }

        tracing::info!(
            "delete pass: {} deleted, {} errors{}",
            outcome.deleted.len(),
            outcome.errors.len(),
            if dry_run { " (dry run)" } else { "" }
        );
        outcome
    }
}
