//! Configuration management for KVGate
//!
//! Selects the deployment (API base URL), the route preset and the durable
//! storage backend. Persisted as JSON in the platform config directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::auth::{FileStore, KeyringStore, MemoryStore, TokenStorage};
use crate::router::RouteTable;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "KVGATE_API_URL";

/// Errors that can occur while loading or saving configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined
    #[error("Could not determine config path")]
    NoConfigDir,

    /// Reading or writing the config file failed
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config could not be (de)serialized
    #[error("Invalid config: {0}")]
    Format(#[from] serde_json::Error),
}

/// Known deployments of the Key-Value System API
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Deployment {
    /// API on the developer machine
    #[default]
    Local,
    /// Hosted API
    Hosted,
}

impl Deployment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Local => "http://localhost:8000/",
            Self::Hosted => "http://stock.api.bookagent.com.cn/",
        }
    }
}

/// Which set of destinations the host declares
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutePreset {
    /// Authenticated layout with home, key-value, prompt, strategy and other views
    #[default]
    Layout,
    /// Login plus a single key-value view
    KeyValueOnly,
}

impl RoutePreset {
    pub fn table(&self) -> RouteTable {
        match self {
            Self::Layout => RouteTable::layout(),
            Self::KeyValueOnly => RouteTable::key_value_only(),
        }
    }
}

/// Where the session token is persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// OS credential manager
    Keyring,
    /// `session.json` next to the config file
    #[default]
    File,
    /// Nothing survives a restart
    Memory,
}

fn default_request_timeout() -> u64 {
    30
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GateConfig {
    #[serde(default)]
    pub deployment: Deployment,
    /// Overrides the deployment's base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub route_preset: RoutePreset,
    #[serde(default)]
    pub storage: StorageBackend,
    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            deployment: Deployment::default(),
            api_base_url: None,
            route_preset: RoutePreset::default(),
            storage: StorageBackend::default(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl GateConfig {
    /// Gets the config directory path (cross-platform)
    pub fn config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        {
            std::env::var("APPDATA")
                .ok()
                .map(|p| PathBuf::from(p).join("KVGate"))
        }

        #[cfg(target_os = "macos")]
        {
            std::env::var("HOME")
                .ok()
                .map(|p| PathBuf::from(p).join("Library/Application Support/KVGate"))
        }

        #[cfg(target_os = "linux")]
        {
            std::env::var("XDG_CONFIG_HOME")
                .ok()
                .map(PathBuf::from)
                .or_else(|| std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config")))
                .map(|p| p.join("kvgate"))
        }

        #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
        {
            None
        }
    }

    /// Gets the config file path
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    /// Loads configuration from disk, falling back to defaults
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path).unwrap_or_else(|e| {
                if path.exists() {
                    tracing::warn!("Ignoring unreadable config {:?}: {}", path, e);
                }
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Loads configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves configuration to the platform config file
    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path().ok_or(ConfigError::NoConfigDir)?;
        self.save_to(&path)
    }

    /// Saves configuration to a specific file, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// API base URL: environment override, then config override, then deployment
    pub fn base_url(&self) -> String {
        self.base_url_with_env(std::env::var(API_URL_ENV).ok())
    }

    fn base_url_with_env(&self, env_override: Option<String>) -> String {
        env_override
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.api_base_url.clone())
            .unwrap_or_else(|| self.deployment.base_url().to_string())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn route_table(&self) -> RouteTable {
        self.route_preset.table()
    }

    /// Path of the session file used by the file backend
    pub fn session_file_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("session.json"))
    }

    /// Opens the configured storage backend
    ///
    /// The file backend falls back to memory when no config directory exists.
    pub fn open_storage(&self) -> Arc<dyn TokenStorage> {
        match self.storage {
            StorageBackend::Keyring => Arc::new(KeyringStore::new()),
            StorageBackend::File => match Self::session_file_path() {
                Some(path) => Arc::new(FileStore::new(path)),
                None => {
                    tracing::warn!("No config directory, session will not persist");
                    Arc::new(MemoryStore::new())
                }
            },
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GateConfig::default();
        assert_eq!(config.deployment, Deployment::Local);
        assert_eq!(config.route_preset, RoutePreset::Layout);
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: GateConfig =
            serde_json::from_str(r#"{"deployment":"hosted","route_preset":"key_value_only"}"#)
                .unwrap();
        assert_eq!(config.deployment, Deployment::Hosted);
        assert_eq!(config.route_preset, RoutePreset::KeyValueOnly);
        assert_eq!(config.storage, StorageBackend::File);
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_base_url_precedence() {
        let mut config = GateConfig::default();
        assert_eq!(config.base_url_with_env(None), "http://localhost:8000/");

        config.deployment = Deployment::Hosted;
        assert_eq!(
            config.base_url_with_env(None),
            "http://stock.api.bookagent.com.cn/"
        );

        config.api_base_url = Some("http://staging:8000".into());
        assert_eq!(config.base_url_with_env(None), "http://staging:8000");
        assert_eq!(
            config.base_url_with_env(Some("http://override:1".into())),
            "http://override:1"
        );
        assert_eq!(
            config.base_url_with_env(Some("  ".into())),
            "http://staging:8000"
        );
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.json");

        let mut config = GateConfig::default();
        config.storage = StorageBackend::Memory;
        config.request_timeout_secs = 5;
        config.save_to(&path).unwrap();

        let loaded = GateConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            GateConfig::load_from(&path),
            Err(ConfigError::Format(_))
        ));
    }

    #[test]
    fn test_route_presets() {
        let mut config = GateConfig::default();
        assert!(config.route_table().contains("Strategy"));
        config.route_preset = RoutePreset::KeyValueOnly;
        assert!(!config.route_table().contains("Strategy"));
    }
}
