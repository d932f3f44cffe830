// ABOUTME: Configuration management for codex-headless
// Optional TOML files supply defaults that command-line flags override

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::process::watcher::DEFAULT_WATCH_INTERVAL;
use crate::tmux::session::{DEFAULT_SEND_DELAY, DEFAULT_SESSION_NAME, DEFAULT_SETTLE_DELAY};

/// File name looked up in each configuration directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WrapperConfig {
    /// Path to the codex binary
    #[serde(default)]
    pub codex_bin: Option<PathBuf>,

    /// Directory for background log files
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// Tmux session name for interactive mode
    #[serde(default)]
    pub tmux_session: Option<String>,

    /// Delay between prompt lines in interactive mode
    #[serde(default)]
    pub interactive_send_delay_ms: Option<u64>,

    /// Time given to the agent TUI to start before the prompt is typed
    #[serde(default)]
    pub interactive_settle_ms: Option<u64>,

    /// Liveness poll interval of the background completion watcher
    #[serde(default)]
    pub watch_interval_secs: Option<u64>,
}

impl WrapperConfig {
    /// Load and merge the user and project configuration files
    ///
    /// Missing files are skipped; unreadable or invalid files are logged and skipped.
    pub fn load() -> Self {
        Self::load_from(&Self::get_config_paths())
    }

    /// Load configuration files in order, later files overriding earlier ones
    pub fn load_from(paths: &[PathBuf]) -> Self {
        let mut config = Self::default();

        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::read_file(path) {
                Ok(file_config) => {
                    debug!("Loaded config from {}", path.display());
                    config.merge(file_config);
                }
                Err(e) => warn!("Ignoring config file {}: {:#}", path.display(), e),
            }
        }

        config
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Configuration file locations, lowest precedence first
    fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. User config (~/.codex-headless/config.toml)
        if let Some(state_dir) = state_dir() {
            paths.push(state_dir.join(CONFIG_FILE_NAME));
        }

        // 2. Project config (./.codex-headless/config.toml)
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".codex-headless").join(CONFIG_FILE_NAME));
        }

        paths
    }

    /// Overlay every value set in `other`
    fn merge(&mut self, other: Self) {
        if other.codex_bin.is_some() {
            self.codex_bin = other.codex_bin;
        }
        if other.log_dir.is_some() {
            self.log_dir = other.log_dir;
        }
        if other.tmux_session.is_some() {
            self.tmux_session = other.tmux_session;
        }
        if other.interactive_send_delay_ms.is_some() {
            self.interactive_send_delay_ms = other.interactive_send_delay_ms;
        }
        if other.interactive_settle_ms.is_some() {
            self.interactive_settle_ms = other.interactive_settle_ms;
        }
        if other.watch_interval_secs.is_some() {
            self.watch_interval_secs = other.watch_interval_secs;
        }
    }

    /// Background log directory, defaulting to ~/.claude/logs/headless
    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(default_log_dir)
    }

    pub fn tmux_session(&self) -> String {
        self.tmux_session
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_NAME.to_string())
    }

    pub fn send_delay(&self) -> Duration {
        self.interactive_send_delay_ms
            .map_or(DEFAULT_SEND_DELAY, Duration::from_millis)
    }

    pub fn settle_delay(&self) -> Duration {
        self.interactive_settle_ms
            .map_or(DEFAULT_SETTLE_DELAY, Duration::from_millis)
    }

    pub fn watch_interval(&self) -> Duration {
        self.watch_interval_secs
            .map_or(DEFAULT_WATCH_INTERVAL, Duration::from_secs)
    }
}

/// Per-user state directory (~/.codex-headless)
pub fn state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".codex-headless"))
}

/// Default directory for background log files
pub fn default_log_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".claude")
        .join("logs")
        .join("headless")
}
