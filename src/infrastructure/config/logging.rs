//! Logging configuration and initialization.

use serde::Deserialize;
use tracing_subscriber::{fmt, EnvFilter};

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
    /// `"json"` or `"pretty"`.
    #[serde(default = "default_format")]
    pub format: String,
}

fn default_level() -> String {
    "info".into()
}

fn default_format() -> String {
    "pretty".into()
}

impl LoggingConfig {
    /// Install a global tracing subscriber. `RUST_LOG` takes precedence over
    /// `level`. Does nothing if a subscriber is already installed.
    pub fn init(&self) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level));

        let _ = match self.format.as_str() {
            "json" => fmt().json().with_env_filter(filter).try_init(),
            _ => fmt().with_env_filter(filter).try_init(),
        };
    }

    pub(crate) fn is_known_format(&self) -> bool {
        matches!(self.format.as_str(), "json" | "pretty")
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = LoggingConfig::default();
        config.init();
        config.init();
    }

    #[test]
    fn known_formats() {
        assert!(LoggingConfig::default().is_known_format());
        let bad = LoggingConfig {
            format: "xml".into(),
            ..LoggingConfig::default()
        };
        assert!(!bad.is_known_format());
    }
}
