//! Client configuration loading and validation.
//!
//! Configuration is loaded from a TOML file. The engine endpoint can be
//! overridden with the `TN_ENDPOINT` environment variable (a `.env` file is
//! honoured).
//!
//! # Example
//!
//! ```no_run
//! use tn_sdk::infrastructure::config::settings::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("tn.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use super::logging::LoggingConfig;
use crate::error::{ConfigError, Result};

/// Environment variable overriding [`NetworkConfig::endpoint`].
pub const ENDPOINT_ENV: &str = "TN_ENDPOINT";

/// Engine connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NetworkConfig {
    /// Base URL of the engine node, e.g. `http://localhost:8484`.
    #[serde(default)]
    pub endpoint: String,
    /// Namespace procedures are resolved in.
    #[serde(default = "default_namespace")]
    pub namespace: String,
    /// Per-request HTTP timeout (milliseconds).
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_namespace() -> String {
    "main".into()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

impl NetworkConfig {
    pub fn endpoint_url(&self) -> Result<Url> {
        if self.endpoint.is_empty() {
            return Err(ConfigError::MissingField { field: "endpoint" }.into());
        }
        Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::InvalidValue {
                field: "endpoint",
                reason: e.to_string(),
            }
            .into()
        })
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            namespace: default_namespace(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Transaction confirmation settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionConfig {
    /// Delay between status polls (milliseconds).
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Give up waiting after this long (milliseconds). `None` waits until
    /// cancelled.
    #[serde(default = "default_confirm_timeout_ms")]
    pub confirm_timeout_ms: Option<u64>,
}

fn default_poll_interval_ms() -> u64 {
    1000
}

#[allow(clippy::unnecessary_wraps)]
fn default_confirm_timeout_ms() -> Option<u64> {
    Some(120_000) // 2 minutes
}

impl TransactionConfig {
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    #[must_use]
    pub fn confirm_timeout(&self) -> Option<Duration> {
        self.confirm_timeout_ms.map(Duration::from_millis)
    }
}

impl Default for TransactionConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            confirm_timeout_ms: default_confirm_timeout_ms(),
        }
    }
}

/// Read-cache settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CacheConfig {
    /// Default cache flag for stream reads built by the client.
    #[serde(default)]
    pub use_cache: bool,
    /// Cached data older than this many blocks counts as stale.
    #[serde(default = "default_stale_after_blocks")]
    pub stale_after_blocks: i64,
}

fn default_stale_after_blocks() -> i64 {
    3600
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            use_cache: false,
            stale_after_blocks: default_stale_after_blocks(),
        }
    }
}

/// Client configuration.
///
/// Load from a TOML file using [`Config::load`] or parse directly with
/// [`Config::parse_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub transaction: TransactionConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parse configuration from TOML content.
    ///
    /// `TN_ENDPOINT`, when set, replaces `network.endpoint`.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            config.network.endpoint = endpoint;
        }
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, reading `.env` first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let _ = dotenvy::dotenv();
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check that required fields are present and values are in range.
    pub fn validate(&self) -> Result<()> {
        self.network.endpoint_url()?;
        if self.network.namespace.is_empty() {
            return Err(ConfigError::MissingField { field: "namespace" }.into());
        }
        if self.network.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.transaction.poll_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "poll_interval_ms",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.transaction.confirm_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "confirm_timeout_ms",
                reason: "must be greater than 0 when set".to_string(),
            }
            .into());
        }
        if self.cache.stale_after_blocks < 0 {
            return Err(ConfigError::InvalidValue {
                field: "stale_after_blocks",
                reason: "must be 0 or greater".to_string(),
            }
            .into());
        }
        if !self.logging.is_known_format() {
            return Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected 'json' or 'pretty', got '{}'", self.logging.format),
            }
            .into());
        }
        Ok(())
    }

    /// Install the tracing subscriber described by `[logging]`.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
