//! Application configuration management.
//!
//! Configuration is stored at `~/.config/admingate/config.json` and
//! covers the backend endpoint, the tenant scope, login-form conveniences
//! and the resolver tunables. A `.env` file and `ADMINGATE_*` variables
//! override the endpoint settings in development.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "admingate";

/// Config file name
const CONFIG_FILE: &str = "config.json";

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_stagger_ms() -> u64 {
    100
}

fn default_max_in_flight() -> usize {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub tenant_code: Option<String>,
    #[serde(default)]
    pub last_username: Option<String>,
    #[serde(default)]
    pub remember_me: bool,
    /// Total attempts per child query during tree resolution.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Delay step between child-query dispatches, in milliseconds.
    #[serde(default = "default_stagger_ms")]
    pub stagger_ms: u64,
    /// In-flight child query cap during tree resolution.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tenant_code: None,
            last_username: None,
            remember_me: false,
            retry_attempts: default_retry_attempts(),
            stagger_ms: default_stagger_ms(),
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        // Pick up a .env file if present (silently ignore if not found)
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            serde_json::from_str(&contents).context("Failed to parse config file")?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("ADMINGATE_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(tenant) = std::env::var("ADMINGATE_TENANT") {
            config.tenant_code = Some(tenant);
        }

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Default location for file-backed token storage.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir =
            dirs::cache_dir().ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    /// The stagger tunable as a [`Duration`].
    pub fn stagger(&self) -> Duration {
        Duration::from_millis(self.stagger_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.stagger_ms, 100);
        assert_eq!(config.max_in_flight, 8);
        assert!(!config.remember_me);
        assert!(config.tenant_code.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let json = r#"{"base_url":"https://console.example.com/api","tenant_code":"t1"}"#;
        let config: Config = serde_json::from_str(json).expect("partial config should parse");
        assert_eq!(config.base_url, "https://console.example.com/api");
        assert_eq!(config.tenant_code.as_deref(), Some("t1"));
        assert_eq!(config.retry_attempts, 3);
        assert_eq!(config.stagger_ms, 100);
    }

    #[test]
    fn test_round_trip() {
        let mut config = Config::default();
        config.last_username = Some("admin".to_string());
        config.remember_me = true;
        let json = serde_json::to_string(&config).expect("config should serialize");
        let parsed: Config = serde_json::from_str(&json).expect("config should parse");
        assert_eq!(parsed.last_username.as_deref(), Some("admin"));
        assert!(parsed.remember_me);
    }
}
