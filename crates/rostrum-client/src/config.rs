//! Client configuration
//!
//! Values come from the environment, with defaults suitable for a backend
//! running locally.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Default backend address
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Turn generation can take minutes
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("No config directory available; set ROSTRUM_SESSION_FILE")]
    NoConfigDir,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Backend base URL (env: ROSTRUM_API_URL)
    pub api_url: String,
    /// Session cache file (env: ROSTRUM_SESSION_FILE)
    pub session_file: Option<PathBuf>,
    /// Per-request timeout in seconds (env: ROSTRUM_TIMEOUT_SECS)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            session_file: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Values are not validated here; call [`ClientConfig::validate`] once any
    /// command-line overrides have been applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout_secs = match var("ROSTRUM_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("ROSTRUM_TIMEOUT_SECS: {raw}")))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        Ok(Self {
            api_url: var("ROSTRUM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            session_file: var("ROSTRUM_SESSION_FILE").map(PathBuf::from),
            timeout_secs,
        })
    }

    /// Check the values make sense
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "API URL must start with http:// or https://, got {}",
                self.api_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeout must be positive".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Where the session is cached
    pub fn session_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.session_file {
            Some(path) => Ok(path.clone()),
            None => dirs::config_dir()
                .map(|dir| dir.join("rostrum").join("session.json"))
                .ok_or(ConfigError::NoConfigDir),
        }
    }
}
