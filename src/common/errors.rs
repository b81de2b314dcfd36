use std::path::PathBuf;

/// Typed errors for audit operations.
/// We use `anyhow` at the top level for CLI error handling,
/// but callers in the core must branch on the kind of failure.
#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    /// The home directory could not be determined
    #[error("Could not determine the home directory")]
    HomeNotFound,

    /// A resolved deletion path lies outside the home directory
    #[error("Cannot delete: path is outside home directory ({})", path.display())]
    OutsideHome { path: PathBuf },

    /// A path that must never be removed as a whole
    #[error("Refusing to delete protected path: {}", path.display())]
    Protected { path: PathBuf },

    /// Sizing failed at the root of a target
    #[error("Cannot size '{}': {source}", path.display())]
    Size {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Glob pattern could not be parsed
    #[error("Invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },

    /// File system operation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("Config error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// The user interrupted the pass
    #[error("Operation cancelled")]
    Cancelled,
}

impl AuditError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AuditError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error is a boundary violation rather than an I/O failure
    pub fn is_security_violation(&self) -> bool {
        matches!(
            self,
            AuditError::OutsideHome { .. } | AuditError::Protected { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;
