//! Client configuration at `~/.mymind/config.yaml`.
//!
//! A missing file means defaults. `MYMIND_BASE_URL` overrides `base_url`
//! after the file is read.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::storage;

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Environment variable overriding [`Config::base_url`].
pub const BASE_URL_ENV: &str = "MYMIND_BASE_URL";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl Config {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Apply an explicit base URL override; blank values are ignored.
    pub fn with_base_url_override(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            self.base_url = url.trim().to_string();
        }
        self
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Load `<home>/.mymind/config.yaml`, falling back to defaults when absent.
///
/// Does not consult the environment; see [`load`].
pub fn load_at(home: &Path) -> Result<Config, CoreError> {
    let path = storage::config_path_at(home);
    match storage::read_optional(&path)? {
        None => Ok(Config::default()),
        Some(contents) if contents.trim().is_empty() => Ok(Config::default()),
        Some(contents) => serde_yaml::from_str(&contents)
            .map_err(|source| CoreError::ConfigParse { path, source }),
    }
}

/// Load the config from the user's home and apply `MYMIND_BASE_URL`.
pub fn load() -> Result<Config, CoreError> {
    let config = load_at(&storage::home()?)?;
    Ok(config.with_base_url_override(std::env::var(BASE_URL_ENV).ok()))
}

/// Atomically save `config` to `<home>/.mymind/config.yaml`.
pub fn save_at(home: &Path, config: &Config) -> Result<(), CoreError> {
    let yaml = serde_yaml::to_string(config)?;
    storage::write_atomic(&storage::config_path_at(home), &yaml)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let home = TempDir::new().expect("tempdir");
        let config = load_at(home.path()).expect("load");
        assert_eq!(config, Config::default());
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn partial_file_fills_defaults() {
        let home = TempDir::new().expect("tempdir");
        let path = storage::config_path_at(home.path());
        storage::write_atomic(&path, "base_url: http://10.0.2.2:8080\n").expect("write");

        let config = load_at(home.path()).expect("load");
        assert_eq!(config.base_url, "http://10.0.2.2:8080");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn save_then_load() {
        let home = TempDir::new().expect("tempdir");
        let config = Config {
            base_url: "https://api.example.test".into(),
            timeout_secs: 3,
        };
        save_at(home.path(), &config).expect("save");
        assert_eq!(load_at(home.path()).expect("load"), config);
    }

    #[test]
    fn override_ignores_blank_values() {
        let config = Config::default().with_base_url_override(Some("  ".into()));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        let config = Config::default().with_base_url_override(Some("http://x:1".into()));
        assert_eq!(config.base_url, "http://x:1");
    }
}
