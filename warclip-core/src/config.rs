//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/warclip/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/warclip/` (~/.config/warclip/)
//! - Data: `$XDG_DATA_HOME/warclip/` (~/.local/share/warclip/)
//! - State/Logs: `$XDG_STATE_HOME/warclip/` (~/.local/state/warclip/)

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
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Recording library location
    #[serde(default)]
    pub library: LibraryConfig,

    /// Companion process notifications (optional)
    #[serde(default)]
    pub companion: CompanionConfig,
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

/// Where recordings and their metadata sidecars live
#[derive(Debug, Deserialize, Clone)]
pub struct LibraryConfig {
    /// Directory holding videos and `.json` sidecars
    pub video_dir: Option<PathBuf>,

    /// Extension of the video file that sits next to each sidecar
    #[serde(default = "default_video_extension")]
    pub video_extension: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        Self {
            video_dir: None,
            video_extension: default_video_extension(),
        }
    }
}

impl LibraryConfig {
    /// Resolve the library directory, preferring an explicit override
    pub fn resolve_dir(&self, override_dir: Option<&Path>) -> Result<PathBuf> {
        override_dir
            .map(Path::to_path_buf)
            .or_else(|| self.video_dir.clone())
            .ok_or_else(|| {
                Error::Config("library.video_dir is not set and no directory was given".to_string())
            })
    }
}

fn default_video_extension() -> String {
    "mp4".to_string()
}

/// Companion process configuration
///
/// When enabled, tag edits are forwarded to a companion process listening
/// on a local HTTP endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct CompanionConfig {
    /// Enable/disable companion notifications
    #[serde(default)]
    pub enabled: bool,

    /// Companion endpoint (e.g., `http://127.0.0.1:4567/ipc`)
    pub endpoint: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_companion_timeout")]
    pub timeout_secs: u64,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: None,
            timeout_secs: default_companion_timeout(),
        }
    }
}

impl CompanionConfig {
    /// Check if companion is properly configured and enabled
    pub fn is_ready(&self) -> bool {
        self.enabled && self.endpoint.is_some()
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        match self.endpoint.as_deref() {
            None => Err(Error::Config(
                "companion.endpoint is required when companion is enabled".to_string(),
            )),
            Some(url) if !(url.starts_with("http://") || url.starts_with("https://")) => {
                Err(Error::Config(format!(
                    "companion.endpoint must be an http(s) URL, got {}",
                    url
                )))
            }
            Some(_) if self.timeout_secs == 0 => Err(Error::Config(
                "companion.timeout_secs must be greater than zero".to_string(),
            )),
            Some(_) => Ok(()),
        }
    }
}

fn default_companion_timeout() -> u64 {
    5
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

        config.companion.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/warclip/config.toml` (~/.config/warclip/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("warclip").join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("warclip")
    }

    /// Returns the state directory path (for logs)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("warclip")
    }

    /// Returns the tag database file path
    ///
    /// `$XDG_DATA_HOME/warclip/tags.db` (~/.local/share/warclip/tags.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("tags.db")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_DATA_HOME").is_err() {
            std::env::set_var("XDG_DATA_HOME", home.join(".local/share"));
        }

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
