use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::common::config::Config;
use crate::common::safety::HomeBoundary;

// ─── Core types ───────────────────────────────────────────────────────────────

/// One catalog entry: where to look and how to label it.
/// `path` is absolute (already `~`-expanded) and is the entry's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    pub path: PathBuf,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub is_glob: bool,
}

impl TargetConfig {
    pub fn new(path: impl Into<PathBuf>, name: &str, category: &str) -> Self {
        Self {
            path: path.into(),
            name: name.to_string(),
            category: category.to_string(),
            is_glob: false,
        }
    }

    pub fn glob(pattern: impl Into<PathBuf>, name: &str, category: &str) -> Self {
        Self {
            is_glob: true,
            ..Self::new(pattern, name, category)
        }
    }
}

/// Outcome of sizing one target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub name: String,
    pub category: String,
    pub path: PathBuf,
    pub size: u64,
    pub exists: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScanResult {
    pub fn absent(target: &TargetConfig) -> Self {
        Self {
            name: target.name.clone(),
            category: target.category.clone(),
            path: target.path.clone(),
            size: 0,
            exists: false,
            error: None,
        }
    }

    pub fn sized(target: &TargetConfig, size: u64) -> Self {
        Self {
            size,
            exists: true,
            ..Self::absent(target)
        }
    }

    /// Worth listing: present and non-empty
    pub fn is_reclaimable(&self) -> bool {
        self.exists && self.size > 0
    }
}

// ─── Built-in catalog ─────────────────────────────────────────────────────────

pub const NODE: &str = "Node.js / Frontend";
pub const XCODE: &str = "Xcode";
pub const ANDROID: &str = "Android Studio";
pub const RUST: &str = "Rust";
pub const PYTHON: &str = "Python";
pub const APPLE_TOOLING: &str = "Homebrew / CocoaPods";
pub const MACOS: &str = "macOS Common";

/// (path, name, category, glob)
const BUILTIN: &[(&str, &str, &str, bool)] = &[
    ("~/.npm", "npm Cache (~/.npm)", NODE, false),
    ("~/Library/Caches/npm", "npm Cache (Library/Caches)", NODE, false),
    ("~/Library/Caches/Yarn", "Yarn Cache", NODE, false),
    ("~/.yarn", "Yarn Global", NODE, false),
    ("~/Library/pnpm", "pnpm Cache", NODE, false),
    ("~/Library/Developer/Xcode/DerivedData", "DerivedData", XCODE, false),
    ("~/Library/Developer/CoreSimulator/Devices", "iOS Simulators", XCODE, false),
    ("~/Library/Developer/Xcode/Archives", "Archives", XCODE, false),
    ("~/.gradle", "Gradle Cache", ANDROID, false),
    ("~/Library/Android/sdk", "Android SDK", ANDROID, false),
    ("~/.android", "Android Config", ANDROID, false),
    ("~/Library/Caches/Google/AndroidStudio*", "Android Studio Cache", ANDROID, true),
    ("~/.cargo/registry", "Cargo Registry", RUST, false),
    ("~/Library/Caches/pip", "pip Cache (Library/Caches)", PYTHON, false),
    ("~/.cache/pip", "pip Cache (~/.cache)", PYTHON, false),
    ("~/Library/Caches/Homebrew", "Homebrew Cache", APPLE_TOOLING, false),
    ("~/Library/Caches/CocoaPods", "CocoaPods Cache", APPLE_TOOLING, false),
    // Contains several entries above; their bytes are counted again here
    ("~/Library/Caches", "Library Caches", MACOS, false),
    ("~/Library/Developer", "Developer Directory", MACOS, false),
];

/// The built-in catalog, expanded against the given home
pub fn builtin_targets(home: &HomeBoundary) -> Vec<TargetConfig> {
    BUILTIN
        .iter()
        .map(|(path, name, category, glob)| TargetConfig {
            path: home.expand(path),
            name: name.to_string(),
            category: category.to_string(),
            is_glob: *glob,
        })
        .collect()
}

/// Built-in targets (if enabled) followed by config targets, minus excluded
/// categories. Later duplicates of an already listed path are dropped.
pub fn catalog(home: &HomeBoundary, config: &Config) -> Vec<TargetConfig> {
    let mut targets = Vec::new();
    if config.include_builtin_targets {
        targets.extend(builtin_targets(home));
    }
    targets.extend(config.custom_targets(home));

    let mut seen = std::collections::HashSet::new();
    targets.retain(|t| !config.is_excluded(&t.category) && seen.insert(t.path.clone()));
    targets
}
