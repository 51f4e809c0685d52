//! Configuration system for fleche
//!
//! Reads config from ~/.config/fleche/config.toml

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

const DEFAULT_CONFIG: &str = r#"# fleche Configuration

[server]
base_url = "http://127.0.0.1:8080/api"
request_timeout_secs = 30

[reconnect]
initial_delay_ms = 1000
max_delay_ms = 30000

[display]
leave_delay_ms = 300
"#;

/// Backend location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/api".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ServerConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Event stream reconnection policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconnectConfig {
    pub initial_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl ReconnectConfig {
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Display timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// How long a departing player's badge lingers before removal
    pub leave_delay_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { leave_delay_ms: 300 }
    }
}

impl DisplayConfig {
    pub const fn leave_delay(&self) -> Duration {
        Duration::from_millis(self.leave_delay_ms)
    }
}

/// Full client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server: ServerConfig,
    pub reconnect: ReconnectConfig,
    pub display: DisplayConfig,
}

impl ClientConfig {
    /// Load configuration from default path, falling back to defaults
    pub fn load() -> Self {
        let config_path = Self::default_config_path();
        match Self::load_from_path(&config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "Ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Get default config path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fleche")
            .join("config.toml")
    }

    /// Load from specific path; a missing file yields the defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        Ok(toml::from_str(&content)?)
    }

    /// Create default config file if it doesn't exist
    pub fn create_default_if_missing() {
        let path = Self::default_config_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = std::fs::write(&path, DEFAULT_CONFIG);
        }
    }
}
