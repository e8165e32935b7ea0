//! Configuration types for the chatdock engine.
//!
//! This module defines the configuration schema: where the assistant
//! endpoint lives, how long to wait for it, and widget tuning knobs.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::input::{KeyPolicy, DEFAULT_SUBMIT_MIN_WIDTH_PX};

/// Directory holding the config file and logs, relative to the working dir.
pub const CONFIG_DIR: &str = ".chatdock";

/// Default config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";

/// Main configuration for chatdock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Origin of the assistant backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Path of the assistant endpoint on that origin.
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,

    /// Query parameter carrying the user input.
    #[serde(default = "default_query_param")]
    pub query_param: String,

    /// Optional request timeout in seconds. `None` waits indefinitely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,

    /// Viewport width (pixels) above which Enter submits.
    #[serde(default = "default_submit_min_width_px")]
    pub submit_min_width_px: u32,

    /// Directory where image responses are exported as PNG files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_dir: Option<PathBuf>,

    /// UI tick rate in milliseconds.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_endpoint_path() -> String {
    "/assistant".into()
}

fn default_query_param() -> String {
    "input".into()
}

fn default_submit_min_width_px() -> u32 {
    DEFAULT_SUBMIT_MIN_WIDTH_PX
}

fn default_tick_rate_ms() -> u64 {
    100
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            endpoint_path: default_endpoint_path(),
            query_param: default_query_param(),
            request_timeout_secs: None,
            submit_min_width_px: default_submit_min_width_px(),
            image_dir: None,
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl Config {
    /// Default config path relative to `root`.
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Load configuration if the file exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigError::Io)?;
        }
        std::fs::write(path, content).map_err(ConfigError::Io)
    }

    /// Full endpoint URL for the given input, with the input URL-encoded.
    ///
    /// The query is form-encoded (`application/x-www-form-urlencoded`), so
    /// spaces become `+` rather than `%20`; form decoders on the server side
    /// read both the same way.
    pub fn endpoint_url(&self, input: &str) -> Result<Url, ConfigError> {
        let base = Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        let mut url = base
            .join(&self.endpoint_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {e}", self.endpoint_path)))?;
        url.query_pairs_mut().append_pair(&self.query_param, input);
        Ok(url)
    }

    /// Request timeout, if configured.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Keyboard policy derived from this configuration.
    pub fn key_policy(&self) -> KeyPolicy {
        KeyPolicy::new(self.submit_min_width_px)
    }
}

/// Errors that can occur when working with configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading or writing config.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing config JSON.
    #[error("Parse error: {0}")]
    Parse(#[source] serde_json::Error),

    /// Error serializing config to JSON.
    #[error("Serialize error: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Base URL or endpoint path does not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.endpoint_path, "/assistant");
        assert_eq!(config.query_param, "input");
        assert_eq!(config.submit_min_width_px, 800);
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_config_roundtrip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = Config::default_path(dir.path());

        let config = Config {
            base_url: "http://localhost:8080".into(),
            request_timeout_secs: Some(30),
            ..Config::default()
        };
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: Config = serde_json::from_str(r#"{"base_url":"http://example.com"}"#).unwrap();
        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.endpoint_path, "/assistant");
        assert_eq!(config.tick_rate_ms, 100);
        assert!(config.image_dir.is_none());
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_endpoint_url_encodes_input() {
        let config = Config::default();
        let url = config.endpoint_url("how many & why?").unwrap();
        assert_eq!(url.path(), "/assistant");

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(pairs, vec![("input".into(), "how many & why?".into())]);
        assert!(!url.as_str().contains("& why"));
        assert_eq!(url.query(), Some("input=how+many+%26+why%3F"));
    }

    #[test]
    fn test_endpoint_url_rejects_bad_base() {
        let config = Config {
            base_url: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            config.endpoint_url("hi"),
            Err(ConfigError::InvalidUrl(_))
        ));
    }
}
