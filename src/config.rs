//! Runtime configuration: truncation threshold and skip rules.
//!
//! Configuration is stored in TOML format and is looked up in this order:
//! 1. An explicitly provided path (`--config`)
//! 2. `.mediatidyrc.toml` in the current directory
//! 3. `~/.config/mediatidy/config.toml`
//! 4. Built-in defaults
//!
//! # Configuration File Format
//!
//! ```toml
//! max_length = 140
//!
//! [skip]
//! filenames = ["cover.jpg", "metadata.opf", ".DS_Store"]
//! patterns = ["*.part", "*sample*"]
//! ```

use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default truncation threshold for normalized filenames, in characters.
pub const DEFAULT_MAX_LENGTH: usize = 140;

/// Errors that can occur while building the tool's configuration,
/// including the rule and literal tables compiled at startup.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the skip rules.
    InvalidGlobPattern(String),
    /// A rule pattern failed to compile.
    InvalidRulePattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// Two distinct canonical literals collapse to the same lowercase key.
    DuplicateLiteral {
        /// The shared lowercase key.
        key: String,
        /// The canonical form registered first.
        first: String,
        /// The conflicting canonical form.
        second: String,
    },
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRulePattern { pattern, reason } => {
                write!(f, "Invalid rule pattern '{}': {}", pattern, reason)
            }
            ConfigError::DuplicateLiteral { key, first, second } => {
                write!(
                    f,
                    "Literals '{}' and '{}' collapse to the same key '{}'",
                    first, second, key
                )
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration deserialized from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TidyConfig {
    /// Maximum normalized filename length before truncation kicks in.
    #[serde(default = "default_max_length")]
    pub max_length: usize,

    /// Entries the rename walk must leave untouched.
    #[serde(default)]
    pub skip: SkipRules,
}

/// Helper function for default value of `max_length`.
fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

/// Rules for skipping files during the rename walk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkipRules {
    /// Exact filenames to skip (e.g., "cover.jpg", "metadata.opf").
    #[serde(default = "default_skip_filenames")]
    pub filenames: Vec<String>,

    /// Glob patterns to skip (e.g., "*.part", "*sample*").
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Helper function for default value of `filenames`.
fn default_skip_filenames() -> Vec<String> {
    ["cover.jpg", "metadata.opf", ".DS_Store"]
        .iter()
        .map(|name| name.to_string())
        .collect()
}

impl Default for SkipRules {
    fn default() -> Self {
        Self {
            filenames: default_skip_filenames(),
            patterns: Vec::new(),
        }
    }
}

impl Default for TidyConfig {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_MAX_LENGTH,
            skip: SkipRules::default(),
        }
    }
}

impl TidyConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.mediatidyrc.toml` in the current directory
    /// 3. Look for `~/.config/mediatidy/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // If explicitly specified, load from that path
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try current directory
        let local_config = PathBuf::from(".mediatidyrc.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try home directory
        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("mediatidy")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        // Fall back to defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile the skip rules into matchers for the walk.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    pub fn compile(self) -> Result<CompiledSkipList, ConfigError> {
        CompiledSkipList::new(self.skip)
    }
}

/// Pre-compiled skip rules for efficient matching during the walk.
pub struct CompiledSkipList {
    filenames: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl CompiledSkipList {
    /// Create a compiled skip list from skip rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob pattern is invalid.
    fn new(rules: SkipRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            filenames: rules.filenames.into_iter().collect(),
            patterns,
        })
    }

    /// Check whether an entry must be left untouched by the walk.
    pub fn should_skip(&self, file_name: &str) -> bool {
        if self.filenames.contains(file_name) {
            return true;
        }

        self.patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TidyConfig::default();
        assert_eq!(config.max_length, 140);
        assert!(config.skip.filenames.contains(&"cover.jpg".to_string()));
        assert!(config.skip.patterns.is_empty());
    }

    #[test]
    fn test_default_skip_list() {
        let skip = TidyConfig::default().compile().unwrap();

        assert!(skip.should_skip("cover.jpg"));
        assert!(skip.should_skip("metadata.opf"));
        assert!(skip.should_skip(".DS_Store"));
        assert!(!skip.should_skip("Foo.mkv"));
    }

    #[test]
    fn test_skip_glob_patterns() {
        let config = TidyConfig {
            skip: SkipRules {
                patterns: vec!["*.part".to_string(), "*sample*".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let skip = config.compile().unwrap();

        assert!(skip.should_skip("movie.mkv.part"));
        assert!(skip.should_skip("foo-sample.mkv"));
        assert!(!skip.should_skip("movie.mkv"));
    }

    #[test]
    fn test_invalid_glob_pattern_returns_error() {
        let config = TidyConfig {
            skip: SkipRules {
                patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(config.compile().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let config: TidyConfig = toml::from_str(
            r#"
            max_length = 80

            [skip]
            filenames = ["keep.me"]
            patterns = ["*.tmp"]
            "#,
        )
        .unwrap();

        assert_eq!(config.max_length, 80);
        assert_eq!(config.skip.filenames, vec!["keep.me".to_string()]);

        let skip = config.compile().unwrap();
        assert!(skip.should_skip("keep.me"));
        assert!(skip.should_skip("a.tmp"));
        assert!(!skip.should_skip("cover.jpg"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: TidyConfig = toml::from_str("max_length = 99").unwrap();
        assert_eq!(config.max_length, 99);
        assert!(config.skip.filenames.contains(&".DS_Store".to_string()));
    }
}
