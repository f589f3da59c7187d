//! Client configuration.
//!
//! Values are layered: built-in defaults, then the optional settings file at
//! `~/.config/hostwatch/config.json`, then environment variables read once
//! at startup.

use std::path::PathBuf;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application name used for config/cache directory paths
pub const APP_NAME: &str = "hostwatch";

/// Config file name
const CONFIG_FILE: &str = "config.json";

pub const DEFAULT_BASE_URL: &str = "/api";

/// Where a relative base URL is resolved against. Matches the backend's
/// default bind.
pub const DEFAULT_ORIGIN: &str = "http://localhost:5000";

/// HTTP request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_BASE_URL: &str = "HOSTWATCH_API_BASE_URL";
pub const ENV_ORIGIN: &str = "HOSTWATCH_API_ORIGIN";
pub const ENV_TIMEOUT_SECS: &str = "HOSTWATCH_TIMEOUT_SECS";
pub const ENV_NOTIFICATIONS: &str = "HOSTWATCH_NOTIFICATIONS";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Could not find {0} directory")]
    MissingDirectory(&'static str),

    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Absolute URL, or a path resolved against `origin`.
    pub base_url: String,
    pub origin: String,
    /// `None` means no cap at all (minimal variant).
    pub timeout: Option<Duration>,
    pub default_headers: HeaderMap,
    pub notifications_enabled: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            default_headers,
            notifications_enabled: true,
        }
    }
}

impl ClientConfig {
    /// No notifications and no timeout cap. Session expiry still clears the
    /// store and redirects.
    pub fn minimal() -> Self {
        Self {
            timeout: None,
            notifications_enabled: false,
            ..Self::default()
        }
    }

    /// Defaults, then the settings file values, then the process environment.
    pub fn load(settings: &Settings) -> Result<Self, ConfigError> {
        Self::default()
            .with_settings(settings)
            .with_env_from(|name| std::env::var(name).ok())
    }

    pub fn with_settings(mut self, settings: &Settings) -> Self {
        if let Some(ref base_url) = settings.base_url {
            self.base_url = base_url.clone();
        }
        if let Some(ref origin) = settings.origin {
            self.origin = origin.clone();
        }
        if let Some(secs) = settings.timeout_secs {
            self.timeout = timeout_from_secs(secs);
        }
        if let Some(enabled) = settings.notifications_enabled {
            self.notifications_enabled = enabled;
        }
        self
    }

    /// Apply overrides from an environment lookup.
    pub fn with_env_from<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(base_url) = lookup(ENV_BASE_URL).filter(|v| !v.trim().is_empty()) {
            self.base_url = base_url.trim().to_string();
        }
        if let Some(origin) = lookup(ENV_ORIGIN).filter(|v| !v.trim().is_empty()) {
            self.origin = origin.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                name: ENV_TIMEOUT_SECS,
                value: raw.clone(),
            })?;
            self.timeout = timeout_from_secs(secs);
        }
        if let Some(raw) = lookup(ENV_NOTIFICATIONS) {
            self.notifications_enabled =
                parse_bool(&raw).ok_or_else(|| ConfigError::InvalidEnv {
                    name: ENV_NOTIFICATIONS,
                    value: raw.clone(),
                })?;
        }
        Ok(self)
    }

    /// Absolute endpoint every request path is appended to, without a
    /// trailing slash.
    pub fn resolved_base_url(&self) -> Result<String, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let url = if self.base_url.contains("://") {
            Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?
        } else {
            let origin = Url::parse(&self.origin)
                .map_err(|e| invalid(format!("origin {:?}: {}", self.origin, e)))?;
            origin
                .join(&self.base_url)
                .map_err(|e| invalid(e.to_string()))?
        };

        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }

        Ok(url.as_str().trim_end_matches('/').to_string())
    }
}

fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Where the CLI keeps the session credential.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialBackend {
    #[default]
    File,
    Keyring,
}

/// Persisted user settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    pub base_url: Option<String>,
    pub origin: Option<String>,
    pub timeout_secs: Option<u64>,
    pub notifications_enabled: Option<bool>,
    pub last_username: Option<String>,
    #[serde(default)]
    pub credential_backend: CredentialBackend,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::MissingDirectory("config"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    pub fn cache_dir() -> Result<PathBuf, ConfigError> {
        let cache_dir = dirs::cache_dir().ok_or(ConfigError::MissingDirectory("cache"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}
