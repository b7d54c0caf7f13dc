//! Configuration loading and entry exclusion rules.
//!
//! Configuration is optional and never touches the extension table; it
//! controls log verbosity and which directory entries a scan leaves alone.
//!
//! # Configuration File Format
//!
//! ```toml
//! [logging]
//! level = "warn"
//!
//! [scan]
//! skip_hidden = false
//!
//! [scan.exclude]
//! names = ["Thumbs.db", ".DS_Store"]
//! patterns = ["*.part", "~*"]
//! regex = ['^\.#']
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const LOCAL_CONFIG: &str = ".cleanfolder.toml";

/// Errors that can occur while loading or compiling configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("failed to read configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid configuration: {0}")]
    Invalid(#[from] toml::de::Error),
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidGlob { pattern: String, reason: String },
    #[error("invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter, overridden by `RUST_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Leave entries whose name starts with `.` alone.
    pub skip_hidden: bool,
    pub exclude: ExcludeRules,
}

/// Entries to leave alone. All rules match the entry name only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcludeRules {
    /// Exact names.
    pub names: Vec<String>,
    /// Glob patterns.
    pub patterns: Vec<String>,
    /// Regular expressions.
    pub regex: Vec<String>,
}

impl Config {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (must exist)
    /// 2. `.cleanfolder.toml` in the current directory
    /// 3. `~/.config/clean-folder/config.toml`
    /// 4. built-in defaults
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("clean-folder")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Compiles the exclusion rules of the `[scan]` section.
    pub fn exclusions(&self) -> Result<ExclusionRules, ConfigError> {
        ExclusionRules::compile(&self.scan)
    }
}

/// Compiled form of [`ScanConfig`], checked once per entry during a scan.
#[derive(Debug, Clone, Default)]
pub struct ExclusionRules {
    skip_hidden: bool,
    names: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
}

impl ExclusionRules {
    fn compile(scan: &ScanConfig) -> Result<Self, ConfigError> {
        let patterns = scan
            .exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlob {
                    pattern: pattern.clone(),
                    reason: e.msg.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = scan
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegex {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            skip_hidden: scan.skip_hidden,
            names: scan.exclude.names.iter().cloned().collect(),
            patterns,
            regexes,
        })
    }

    /// True if the entry called `name` must be left alone.
    pub fn is_excluded(&self, name: &str) -> bool {
        (self.skip_hidden && name.starts_with('.'))
            || self.names.contains(name)
            || self.patterns.iter().any(|pattern| pattern.matches(name))
            || self.regexes.iter().any(|regex| regex.is_match(name))
    }
}
