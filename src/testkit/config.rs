//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.

use crate::infrastructure::config::settings::{Config, NetworkConfig, TransactionConfig};

/// Local endpoint with short poll interval and timeout.
pub fn client_config() -> Config {
    Config {
        network: NetworkConfig {
            endpoint: "http://localhost:8484".into(),
            ..NetworkConfig::default()
        },
        transaction: TransactionConfig {
            poll_interval_ms: 100,
            confirm_timeout_ms: Some(5_000),
        },
        ..Config::default()
    }
}

/// Client config pointed at `endpoint`.
pub fn client_config_for(endpoint: &str) -> Config {
    let mut config = client_config();
    config.network.endpoint = endpoint.to_string();
    config
}
