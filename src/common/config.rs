use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::AuditError;
use super::safety::HomeBoundary;
use crate::scanner::targets::TargetConfig;

/// Global dev-space-audit configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Number of entries in the largest-directories ranking
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Size targets on the rayon pool instead of one after another
    #[serde(default = "default_true")]
    pub parallel_scan: bool,

    /// Start from the built-in catalog
    #[serde(default = "default_true")]
    pub include_builtin_targets: bool,

    /// Categories dropped from the catalog
    #[serde(default)]
    pub exclude_categories: Vec<String>,

    /// Also write logs to ~/.dev-space-audit/logs
    #[serde(default)]
    pub log_to_file: bool,

    /// Extra scan targets
    #[serde(default)]
    pub targets: Vec<CustomTarget>,
}

/// A user-defined catalog entry; `path` may start with `~`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomTarget {
    pub path: String,
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub glob: bool,
}

fn default_top_n() -> usize {
    5
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            parallel_scan: true,
            include_builtin_targets: true,
            exclude_categories: Vec::new(),
            log_to_file: false,
            targets: Vec::new(),
        }
    }
}

impl Config {
    /// Get the data directory (~/.dev-space-audit)
    pub fn data_dir(home: &HomeBoundary) -> PathBuf {
        home.root().join(".dev-space-audit")
    }

    /// Get the config file path
    pub fn config_path(home: &HomeBoundary) -> PathBuf {
        Self::data_dir(home).join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir(home: &HomeBoundary) -> PathBuf {
        Self::data_dir(home).join("logs")
    }

    /// Load config from the home's config file, or defaults if it does not exist
    pub fn load(home: &HomeBoundary) -> Result<Self> {
        Self::load_from(&Self::config_path(home))
    }

    /// Load config from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents).map_err(|e| AuditError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save config to the home's config file
    pub fn save(&self, home: &HomeBoundary) -> Result<()> {
        Self::init_dirs(home)?;
        let path = Self::config_path(home);
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Create the data and logs directories
    pub fn init_dirs(home: &HomeBoundary) -> Result<()> {
        for dir in [Self::data_dir(home), Self::logs_dir(home)] {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Set a scalar key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "top_n" => self.top_n = value.parse().context("top_n must be a number")?,
            "parallel_scan" => {
                self.parallel_scan = value.parse().context("parallel_scan must be true or false")?
            }
            "include_builtin_targets" => {
                self.include_builtin_targets = value
                    .parse()
                    .context("include_builtin_targets must be true or false")?
            }
            "log_to_file" => {
                self.log_to_file = value.parse().context("log_to_file must be true or false")?
            }
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }

    /// Expand the user-defined targets against the home directory
    pub fn custom_targets(&self, home: &HomeBoundary) -> Vec<TargetConfig> {
        self.targets
            .iter()
            .map(|t| TargetConfig {
                path: home.expand(&t.path),
                name: t.name.clone(),
                category: t.category.clone(),
                is_glob: t.glob,
            })
            .collect()
    }

    /// Check if a category is excluded
    pub fn is_excluded(&self, category: &str) -> bool {
        self.exclude_categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.top_n, 5);
        assert!(config.parallel_scan);
        assert!(config.include_builtin_targets);
        assert!(!config.log_to_file);
        assert!(config.targets.is_empty());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("top_n = 10\n").unwrap();
        assert_eq!(config.top_n, 10);
        assert!(config.parallel_scan);
    }

    #[test]
    fn test_custom_targets_expand_tilde() {
        let config: Config = toml::from_str(
            r#"
            [[targets]]
            path = "~/.m2/repository"
            name = "Maven Repository"
            category = "Java"

            [[targets]]
            path = "~/Library/Caches/JetBrains/*"
            name = "JetBrains Caches"
            category = "Java"
            glob = true
            "#,
        )
        .unwrap();
        let home = HomeBoundary::new("/home/dev");
        let targets = config.custom_targets(&home);
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].path, PathBuf::from("/home/dev/.m2/repository"));
        assert!(!targets[0].is_glob);
        assert!(targets[1].is_glob);
    }

    #[test]
    fn test_set_known_and_unknown_keys() {
        let mut config = Config::default();
        config.set("top_n", "3").unwrap();
        config.set("parallel_scan", "false").unwrap();
        assert_eq!(config.top_n, 3);
        assert!(!config.parallel_scan);
        assert!(config.set("top_n", "many").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn test_is_excluded_ignores_case() {
        let config = Config {
            exclude_categories: vec!["xcode".into()],
            ..Config::default()
        };
        assert!(config.is_excluded("Xcode"));
        assert!(!config.is_excluded("Android Studio"));
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let home = HomeBoundary::new(dir.path());
        assert_eq!(Config::load(&home).unwrap(), Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::TempDir::new().unwrap();
        let home = HomeBoundary::new(dir.path());
        let mut config = Config::default();
        config.top_n = 8;
        config.save(&home).unwrap();
        assert_eq!(Config::load(&home).unwrap().top_n, 8);
    }

    #[test]
    fn test_invalid_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "top_n = \"five\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("config.toml"));
    }
}
