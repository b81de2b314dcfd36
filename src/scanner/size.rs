use std::io::ErrorKind;
use std::path::Path;

use walkdir::WalkDir;

use crate::common::errors::{AuditError, Result};

/// Errors at the root of a sizing operation that are reported as zero size
/// instead of a failure.
fn is_benign(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::NotFound | ErrorKind::PermissionDenied)
}

/// Total logical size in bytes of the regular files under `path`.
///
/// - a missing or unreadable root counts as 0
/// - a symlink counts as 0 and is never followed, at the root or below it
/// - a regular file counts as its length
/// - a directory counts as the sum of everything beneath it; unreadable or
///   vanished descendants contribute 0
///
/// Only unexpected errors at the root itself are returned.
pub fn compute_size(path: &Path) -> Result<u64> {
    let metadata = match std::fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) if is_benign(e.kind()) => return Ok(0),
        Err(e) => {
            return Err(AuditError::Size {
                path: path.to_path_buf(),
                source: e,
            })
        }
    };

    let file_type = metadata.file_type();
    if file_type.is_symlink() {
        return Ok(0);
    }
    if file_type.is_file() {
        return Ok(metadata.len());
    }
    if !file_type.is_dir() {
        return Ok(0);
    }

    dir_size(path)
}

/// Depth-first walk of a directory that is known not to be a symlink
fn dir_size(path: &Path) -> Result<u64> {
    let mut total = 0u64;

    for entry in WalkDir::new(path).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                // Failing to open the root directory itself is the only
                // walk error that can surface.
                if e.depth() == 0 {
                    if let Some(io) = e.io_error() {
                        if !is_benign(io.kind()) {
                            let kind = io.kind();
                            return Err(AuditError::Size {
                                path: path.to_path_buf(),
                                source: e
                                    .into_io_error()
                                    .unwrap_or_else(|| std::io::Error::from(kind)),
                            });
                        }
                    }
                }
                tracing::trace!("skipping unreadable entry under {}", path.display());
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        // Entry metadata is not followed through links because follow_links is off
        total += entry.metadata().map(|m| m.len()).unwrap_or(0);
    }

    Ok(total)
}
