//! Configuration schema definitions.
//!
//! The remote configuration service returns a single JSON document keyed by
//! application id. All fields except `servers` are optional and fall back to
//! the documented defaults.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use url::Url;

/// Error type for configuration fetch and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Request to the configuration service failed.
    #[error("configuration request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration service answered with a non-success status.
    #[error("configuration request returned status {0}")]
    Status(u16),

    /// Response body was not a valid configuration document.
    #[error("malformed configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// Document deserialized but failed semantic validation.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application configuration, fetched once at startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Ordered list of salt-service host addresses, most preferred first.
    /// Scheme defaults to https when absent.
    pub servers: Vec<String>,

    /// Per-attempt deadline in milliseconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Maximum number of retries after the initial attempt.
    #[serde(default = "default_retries")]
    pub retries: u32,

    /// Whether per-host statistics and adaptive re-ranking are enabled.
    /// The service sends this as a boolean or as 0/1.
    #[serde(default, deserialize_with = "de_flag")]
    pub stats: bool,
}

fn default_timeout() -> u64 {
    500
}

fn default_retries() -> u32 {
    3
}

/// Accept both `true`/`false` and integer flags (`0` disabled, anything else
/// enabled), matching what the service actually emits.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(i) => Ok(i != 0),
    }
}

impl AppConfig {
    /// Build a config from an explicit host list, keeping the defaults for
    /// every tunable.
    pub fn with_servers(servers: Vec<String>) -> Self {
        Self {
            servers,
            timeout: default_timeout(),
            retries: default_retries(),
            stats: false,
        }
    }

    /// Semantic validation. Runs after deserialization, before the config is
    /// accepted into a session.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.servers.is_empty() {
            return Err(ConfigError::Invalid("server list is empty".into()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Invalid("timeout must be > 0".into()));
        }
        for server in &self.servers {
            normalize_server(server)
                .map_err(|e| ConfigError::Invalid(format!("bad server address '{server}': {e}")))?;
        }
        Ok(())
    }

    /// Resolve the configured addresses into base URLs, preserving order.
    pub fn server_urls(&self) -> Result<Vec<Url>, ConfigError> {
        self.servers
            .iter()
            .map(|s| {
                normalize_server(s)
                    .map_err(|e| ConfigError::Invalid(format!("bad server address '{s}': {e}")))
            })
            .collect()
    }
}

/// Parse a host address into a base URL, defaulting the scheme to https when
/// the address is bare (e.g. "api.example.co").
fn normalize_server(addr: &str) -> Result<Url, url::ParseError> {
    if addr.contains("://") {
        Url::parse(addr)
    } else {
        Url::parse(&format!("https://{addr}"))
    }
}
