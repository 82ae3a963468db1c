//! Smoke tests against a live node, enabled by the integration-tests feature.

#![cfg(feature = "integration-tests")]

use std::env;
use std::time::Duration;

use tn_sdk::domain::order_book::ListMarketsInput;
use tn_sdk::domain::stream::ListStreamsInput;
use tn_sdk::infrastructure::config::settings::{Config, NetworkConfig, ENDPOINT_ENV};
use tn_sdk::Client;
use tokio::time::timeout;

fn live_client() -> Option<Client> {
    let Ok(endpoint) = env::var(ENDPOINT_ENV) else {
        eprintln!("Skipping smoke test (set {ENDPOINT_ENV} to enable)");
        return None;
    };
    let config = Config {
        network: NetworkConfig {
            endpoint,
            ..NetworkConfig::default()
        },
        ..Config::default()
    };
    Some(Client::connect(&config).expect("client connects"))
}

#[tokio::test]
#[ignore = "requires TN_ENDPOINT and network access"]
async fn smoke_list_streams_readonly() {
    let Some(client) = live_client() else {
        return;
    };

    let input = ListStreamsInput {
        limit: 5,
        ..ListStreamsInput::default()
    };
    let streams = timeout(Duration::from_secs(20), client.streams().list_streams(&input))
        .await
        .expect("Timed out listing streams")
        .expect("Failed to list streams");

    assert!(streams.len() <= 5);
}

#[tokio::test]
#[ignore = "requires TN_ENDPOINT and network access"]
async fn smoke_list_markets_readonly() {
    let Some(client) = live_client() else {
        return;
    };

    let input = ListMarketsInput {
        limit: 5,
        ..ListMarketsInput::default()
    };
    let markets = timeout(Duration::from_secs(20), client.order_book().list_markets(&input))
        .await
        .expect("Timed out listing markets")
        .expect("Failed to list markets");

    for market in markets {
        assert!(market.max_spread >= 1 && market.max_spread <= 50);
    }
}
