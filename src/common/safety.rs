use std::path::{Path, PathBuf};

use super::errors::{AuditError, Result};
use super::paths;

/// Directories under home that must never be deleted as a whole.
/// The empty entry is the home directory itself.
const PROTECTED_HOME_DIRS: &[&str] = &[
    "",
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Movies",
    "Library",
    "Applications",
    ".ssh",
    ".gnupg",
];

/// The home directory, resolved once at startup and passed to everything that
/// needs to expand `~` or enforce the deletion boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeBoundary {
    root: PathBuf,
}

impl HomeBoundary {
    /// Build a boundary rooted at an explicit directory
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: paths::absolutize(root.as_ref()),
        }
    }

    /// Resolve the current user's home directory
    pub fn from_env() -> Result<Self> {
        dirs::home_dir()
            .map(Self::new)
            .ok_or(AuditError::HomeNotFound)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Expand `~` in a configured path against this home
    pub fn expand(&self, path: &str) -> PathBuf {
        paths::expand_tilde(path, &self.root)
    }

    /// True if the path, once made absolute and normalized, is home itself or
    /// lies under it. Comparison is component-wise, so `/home/dev2` is not
    /// under `/home/dev`.
    pub fn contains(&self, path: &Path) -> bool {
        paths::absolutize(path).starts_with(&self.root)
    }

    /// Resolve a path and fail with `OutsideHome` if it escapes the boundary
    pub fn assert_contains(&self, path: &Path) -> Result<PathBuf> {
        let resolved = paths::absolutize(path);
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            Err(AuditError::OutsideHome { path: resolved })
        }
    }

    /// True for home itself and critical home subdirectories
    pub fn is_protected(&self, path: &Path) -> bool {
        let resolved = paths::absolutize(path);
        PROTECTED_HOME_DIRS.iter().any(|dir| {
            if dir.is_empty() {
                resolved == self.root
            } else {
                resolved == self.root.join(dir)
            }
        })
    }

    /// Check that an existing entry's parent directory, with symlinks resolved,
    /// still lies under the (resolved) home. Guards against `~/link/...` where
    /// `~/link` points outside home.
    pub fn assert_real_parent_contained(&self, path: &Path) -> Result<()> {
        let Some(parent) = path.parent() else {
            return Err(AuditError::OutsideHome {
                path: path.to_path_buf(),
            });
        };
        let real_home = std::fs::canonicalize(&self.root).unwrap_or_else(|_| self.root.clone());
        let real_parent =
            std::fs::canonicalize(parent).map_err(|e| AuditError::io(parent, e))?;
        if real_parent.starts_with(&real_home) {
            Ok(())
        } else {
            Err(AuditError::OutsideHome {
                path: real_parent.join(path.file_name().unwrap_or_default()),
            })
        }
    }
}
