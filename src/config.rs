//! # Client Configuration
//!
//! Configuration management for the organizer client library and CLI.
//! Supports environment variables, config files, and defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::sync::CreatePolicy;

/// Client configuration for the API connection, session persistence,
/// synchronizer policy, and logging.
///
/// # Examples
///
/// ```rust
/// use organizer_client::config::ClientConfig;
///
/// let config = ClientConfig::default();
/// assert_eq!(config.api.base_url, "http://localhost:8080/api/v1");
/// assert_eq!(config.api.timeout_ms, 30000);
/// assert!(!config.sync.discard_stale_responses);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Organizer API connection settings
    pub api: ApiEndpointConfig,
    /// Token persistence
    pub session: SessionConfig,
    /// Resource synchronizer behavior
    pub sync: SyncConfig,
    /// Log output
    pub logging: LoggingConfig,
}

/// API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiEndpointConfig {
    /// Base address every request path is appended to (e.g., "<http://localhost:8080/api/v1>")
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for ApiEndpointConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api/v1".to_string(),
            timeout_ms: 30000,
            user_agent: format!("organizer-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Where the bearer token is persisted between runs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Token file override; defaults to `<config_dir>/organizer/auth_token`
    pub token_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Drop fetch responses superseded by a newer fetch on the same collection
    pub discard_stale_responses: bool,
    /// Whether `create` appends the new record or waits for a refetch
    pub create_policy: CreatePolicy,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive; `RUST_LOG` wins when set
    pub level: Option<String>,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl ClientConfig {
    /// Load configuration from environment variables and config file
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file (first found of the standard locations)
    /// 3. Default values
    pub fn load() -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(config_path) = Self::find_config_file() {
            debug!("Loading config from: {}", config_path.display());
            match Self::load_from_file(&config_path) {
                Ok(file_config) => config = file_config,
                Err(e) => {
                    debug!("Failed to load config file: {}", e);
                }
            }
        }

        config.apply_env_overrides();

        debug!(base_url = %config.api.base_url, "Loaded client configuration");
        Ok(config)
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> ClientResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ClientError::config_error(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ClientError::config_error(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    fn find_config_file() -> Option<PathBuf> {
        let mut possible_paths = vec![
            PathBuf::from("./organizer-client.toml"),
            PathBuf::from("./config/organizer-client.toml"),
        ];
        if let Some(home) = dirs::home_dir() {
            possible_paths.push(home.join(".organizer").join("config.toml"));
        }
        if let Some(config_dir) = dirs::config_dir() {
            possible_paths.push(config_dir.join("organizer").join("client.toml"));
        }

        possible_paths
            .into_iter()
            .find(|path| path.exists() && path.is_file())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("ORGANIZER_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("ORGANIZER_API_TIMEOUT_MS") {
            if let Ok(timeout_ms) = timeout.parse() {
                self.api.timeout_ms = timeout_ms;
            }
        }
        if let Ok(path) = std::env::var("ORGANIZER_TOKEN_FILE") {
            self.session.token_file = Some(PathBuf::from(path));
        }
        if let Ok(level) = std::env::var("ORGANIZER_LOG_LEVEL") {
            self.logging.level = Some(level);
        }
        if let Ok(json) = std::env::var("ORGANIZER_LOG_JSON") {
            self.logging.json = json.parse().unwrap_or(false);
        }
        if let Ok(discard) = std::env::var("ORGANIZER_DISCARD_STALE") {
            self.sync.discard_stale_responses = discard.parse().unwrap_or(false);
        }
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: &Path) -> ClientResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ClientError::config_error(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ClientError::config_error(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            ClientError::config_error(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Get default config file path
    pub fn default_config_path() -> ClientResult<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| ClientError::config_error("Could not determine home directory"))?;

        Ok(home_dir.join(".organizer").join("config.toml"))
    }

    /// Resolved token file location
    pub fn token_file(&self) -> ClientResult<PathBuf> {
        if let Some(path) = &self.session.token_file {
            return Ok(path.clone());
        }

        let config_dir = dirs::config_dir()
            .ok_or_else(|| ClientError::config_error("Could not determine config directory"))?;

        Ok(config_dir
            .join("organizer")
            .join(crate::session::AUTH_TOKEN_KEY))
    }
}
