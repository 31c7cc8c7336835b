//! Configuration handling for docparse.
//!
//! Loaded from `config.toml` in the XDG config directory, or from the path
//! given with `--config`. Every field has a default, so a missing file or a
//! partial one is fine.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use docparse_pipeline::{AcquireConfig, DEFAULT_USER_AGENT};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Remote fetch configuration
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Temporary storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote fetch configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Transfer timeout (seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Characters of content shown in results
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

fn default_preview_chars() -> usize {
    5000
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            preview_chars: default_preview_chars(),
        }
    }
}

/// Temporary storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// Directory for transient document copies (system temp dir if unset)
    pub temp_dir: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl LoggingConfig {
    /// Parsed log level, `INFO` when unrecognized.
    pub fn level(&self) -> Level {
        self.level.parse().unwrap_or(Level::INFO)
    }
}

const SAMPLE_TOML: &str = r#"# docparse configuration

[fetch]
# Seconds before a remote download is abandoned
timeout_secs = 30
# User-Agent header sent with remote requests
# user_agent = "Mozilla/5.0 ..."

[output]
# Characters of extracted text printed per document
preview_chars = 5000

[storage]
# Directory for transient document copies (defaults to the system temp dir)
# temp_dir = "/var/tmp/docparse"

[logging]
# trace, debug, info, warn or error
level = "info"
"#;

impl Config {
    /// Load from the default config path.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load from `path`, or the default config path when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: Option<PathBuf>) -> Result<Self> {
        let Some(path) = path.or_else(Self::config_path) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Path of `config.toml` in the config directory.
    pub fn config_path() -> Option<PathBuf> {
        config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Commented sample configuration.
    pub fn sample_toml() -> &'static str {
        SAMPLE_TOML
    }

    /// Acquisition settings for the pipeline.
    pub fn acquire_config(&self) -> AcquireConfig {
        AcquireConfig {
            timeout: Duration::from_secs(self.fetch.timeout_secs),
            user_agent: self.fetch.user_agent.clone(),
            temp_dir: self.storage.temp_dir.clone(),
        }
    }
}

/// Get the XDG config directory for docparse.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("DOCPARSE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "docparse").map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.output.preview_chars, 5000);
        assert!(config.storage.temp_dir.is_none());
        assert_eq!(config.logging.level(), Level::INFO);
    }

    #[test]
    fn test_sample_parses_to_defaults() {
        let config: Config = toml::from_str(Config::sample_toml()).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.output.preview_chars, 5000);
    }

    #[test]
    fn test_partial_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[fetch]\ntimeout_secs = 5\n\n[logging]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load_from(Some(path)).unwrap();
        assert_eq!(config.fetch.timeout_secs, 5);
        assert_eq!(config.fetch.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.output.preview_chars, 5000);
        assert_eq!(config.logging.level(), Level::DEBUG);
    }

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load_from(Some(temp_dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_file_errors() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[fetch\n").unwrap();
        assert!(Config::load_from(Some(path)).is_err());
    }

    #[test]
    fn test_acquire_config() {
        let mut config = Config::default();
        config.fetch.timeout_secs = 2;
        config.storage.temp_dir = Some(PathBuf::from("/tmp/docparse-test"));

        let acquire = config.acquire_config();
        assert_eq!(acquire.timeout, Duration::from_secs(2));
        assert_eq!(acquire.temp_dir, Some(PathBuf::from("/tmp/docparse-test")));
    }

    #[test]
    fn test_unknown_level_falls_back() {
        let logging = LoggingConfig {
            level: "loud".to_string(),
        };
        assert_eq!(logging.level(), Level::INFO);
    }
}
