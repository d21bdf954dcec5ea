#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{
    sync::{Arc, Mutex, OnceLock},
    time::Duration,
};

use anyhow::{Context, Result};
use reqwest::Client;
use state::InitCell;
use tracing::Level;

use crate::constants::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Backend and logging settings for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL the endpoint paths are appended to, without a trailing `/`.
    base_url:  String,
    /// Timeout applied to every request.
    timeout:   Duration,
    /// Maximum level emitted by the CLI's subscriber.
    log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }
}

impl Config {
    /// Creates a config pointing at `base_url`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            base_url,
            timeout,
            log_level: Level::INFO,
        }
    }

    /// Reads `ADDMARKS_BASE_URL`, `ADDMARKS_TIMEOUT_SECS` and `ADDMARKS_LOG`,
    /// falling back to the defaults for anything unset or unparsable.
    pub fn from_env() -> Self {
        let base_url = std::env::var("ADDMARKS_BASE_URL")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(
            base_url,
            read_timeout_secs("ADDMARKS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS),
        );
        config.log_level = parse_log_level(std::env::var("ADDMARKS_LOG").ok());
        config
    }

    /// Returns the backend base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins an endpoint path onto the base URL.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the configured log level.
    pub fn log_level(&self) -> Level {
        self.log_level
    }

    /// Builds an HTTP client honouring this config.
    pub fn build_client(&self) -> Result<Client> {
        Client::builder()
            // Avoid macOS dynamic store lookups that fail in sandboxed environments.
            .no_proxy()
            .timeout(self.timeout)
            .build()
            .context("Failed to construct HTTP client")
    }
}

/// Parses the optional `ADDMARKS_LOG` value, defaulting to `INFO` when unset or
/// unrecognised.
fn parse_log_level(val: Option<String>) -> Level {
    match val
        .map(|s| s.trim().to_ascii_lowercase())
        .as_deref()
        .unwrap_or("info")
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Parses an environment variable into a `Duration`, falling back to
/// `default_secs` when parsing fails or the variable is missing.
fn read_timeout_secs(env: &str, default_secs: u64) -> Duration {
    std::env::var(env)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or_else(|| Duration::from_secs(default_secs))
}

/// Process-wide configuration with its lazily built HTTP client.
pub struct ConfigState {
    /// Settings read from the environment.
    config:      Config,
    /// Shared reqwest client, built on first use.
    http_client: InitCell<Client>,
}

impl ConfigState {
    /// Wraps `config` without building the client yet.
    fn new(config: Config) -> Self {
        Self {
            config,
            http_client: InitCell::new(),
        }
    }

    /// Returns the settings.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a clone of the shared HTTP client, building it on first call.
    pub fn http_client(&self) -> Result<Client> {
        if let Some(client) = self.http_client.try_get() {
            return Ok(client.clone());
        }

        let client = self.config.build_client()?;
        // A concurrent caller may have won the race; either client is equivalent.
        let _ = self.http_client.set(client.clone());
        Ok(client)
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Returns the process-wide configuration, reading the environment on first
/// call.
pub fn get() -> ConfigHandle {
    let mut guard = slot().lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    if let Some(cfg) = guard.as_ref() {
        return ConfigHandle(Arc::clone(cfg));
    }

    let cfg = Arc::new(ConfigState::new(Config::from_env()));
    *guard = Some(Arc::clone(&cfg));
    ConfigHandle(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = Config::new("http://localhost:8080/", Duration::from_secs(5));
        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(config.endpoint("/fetch/students"), "http://localhost:8080/fetch/students");
        assert_eq!(config.endpoint("addData/marks"), "http://localhost:8080/addData/marks");
    }

    #[test]
    fn default_points_at_hosted_backend() {
        let config = Config::default();
        assert_eq!(config.base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn log_level_parsing_is_lenient() {
        assert_eq!(parse_log_level(Some("DEBUG".into())), Level::DEBUG);
        assert_eq!(parse_log_level(Some("nonsense".into())), Level::INFO);
        assert_eq!(parse_log_level(None), Level::INFO);
    }
}
