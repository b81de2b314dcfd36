use std::path::{Path, PathBuf};

use glob::MatchOptions;

use crate::common::errors::{AuditError, Result};
use crate::common::paths;

/// Shell glob options: case-sensitive, `*` does not cross `/`, dotfiles must be
/// matched explicitly.
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// True if the string contains glob metacharacters
pub fn is_pattern(path: &str) -> bool {
    path.contains(['*', '?', '['])
}

/// Expand a glob pattern into the absolute, normalized paths of entries that
/// exist right now. A pattern that matches nothing yields an empty list;
/// directories that cannot be read while matching are skipped.
pub fn expand(pattern: &Path) -> Result<Vec<PathBuf>> {
    let anchored = paths::absolutize(pattern);
    let pattern_str = anchored.to_string_lossy();

    let entries = glob::glob_with(&pattern_str, MATCH_OPTIONS).map_err(|e| AuditError::Pattern {
        pattern: pattern_str.to_string(),
        message: e.msg.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                // A dangling symlink still exists as an entry
                if std::fs::symlink_metadata(&path).is_ok() {
                    matches.push(paths::normalize(&path));
                }
            }
            Err(e) => {
                tracing::debug!("glob skipped {}: {}", e.path().display(), e.error());
            }
        }
    }

    Ok(matches)
}
