//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/moodscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/moodscope/` (~/.config/moodscope/)
//! - Data: `$XDG_DATA_HOME/moodscope/` (~/.local/share/moodscope/)
//! - State/Logs: `$XDG_STATE_HOME/moodscope/` (~/.local/state/moodscope/)
//!
//! The civil-time offset used for bucketing is fixed (see [`crate::time`])
//! and intentionally has no configuration key.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Analytics configuration
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Observation source configuration
    #[serde(default)]
    pub source: SourceConfig,
}

/// Analytics defaults used by report callers
#[derive(Debug, Deserialize)]
pub struct AnalyticsConfig {
    /// Window used by windowed reports when the caller gives none
    #[serde(default = "default_window_days")]
    pub default_window_days: i64,

    /// Maximum number of generated insights
    #[serde(default = "default_insight_limit")]
    pub insight_limit: usize,

    /// Number of triggers reported by the trigger ranking
    #[serde(default = "default_top_triggers_limit")]
    pub top_triggers_limit: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_window_days: default_window_days(),
            insight_limit: default_insight_limit(),
            top_triggers_limit: default_top_triggers_limit(),
        }
    }
}

fn default_window_days() -> i64 {
    30
}

fn default_insight_limit() -> usize {
    10
}

fn default_top_triggers_limit() -> usize {
    10
}

impl AnalyticsConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.default_window_days <= 0 {
            return Err(Error::Config(
                "analytics.default_window_days must be positive".to_string(),
            ));
        }
        if self.insight_limit == 0 {
            return Err(Error::Config(
                "analytics.insight_limit must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Where observations are read from
#[derive(Debug, Deserialize, Default)]
pub struct SourceConfig {
    /// Override path for the journal database
    pub database_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.analytics.validate()?;
        Ok(config)
    }

    /// Returns the journal database to read, honoring the override.
    pub fn resolved_database_path(&self) -> PathBuf {
        self.source
            .database_path
            .clone()
            .unwrap_or_else(Self::database_path)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/moodscope/config.toml` (~/.config/moodscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("moodscope").join("config.toml")
    }

    /// Returns the data directory path (for the journal database)
    ///
    /// `$XDG_DATA_HOME/moodscope/` (~/.local/share/moodscope/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("moodscope")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/moodscope/` (~/.local/state/moodscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("moodscope")
    }

    /// Returns the default journal database path
    ///
    /// `$XDG_DATA_HOME/moodscope/journal.db` (~/.local/share/moodscope/journal.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("journal.db")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/moodscope/moodscope.log` (~/.local/state/moodscope/moodscope.log)
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("moodscope.log")
    }
}
