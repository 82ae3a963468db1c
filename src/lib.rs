//! tn-sdk - Client core for a ledger-backed stream and prediction-market
//! engine.
//!
//! Turns typed inputs into positional procedure invocations, submits writes
//! and tracks them to a terminal outcome, and recovers cache metadata from
//! read logs.
//!
//! # Architecture
//!
//! - **`domain`** - I/O-free types and offline validation
//!   - argument marshaling (`marshal_args!`, `ArgsBuilder`)
//!   - streams, taxonomies, roles, attestations
//!   - order book inputs with explicit `LimitPrice { side, cents }`
//!   - cache metadata extraction and aggregation
//! - **`port`** - `RpcTransport` and `Signer` traits
//! - **`application`** - `ActionInvoker`, `TransactionTracker`, per-domain
//!   action facades
//! - **`adapter`** - JSON-RPC transport over HTTP
//! - **`infrastructure`** - configuration, logging, `Client` wiring
//!
//! # Features
//!
//! - `testkit` - Expose [`testkit`] (scripted transport and builders)
//! - `integration-tests` - Enable tests against a live engine
//!
//! # Example
//!
//! ```no_run
//! use tn_sdk::domain::order_book::{LimitPrice, PlaceBuyOrderInput};
//! use tn_sdk::infrastructure::{config::Config, Client};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run(signer: std::sync::Arc<dyn tn_sdk::port::Signer>) -> tn_sdk::error::Result<()> {
//! let config = Config::load("tn.toml")?;
//! config.init_logging();
//! let client = Client::connect(&config)?.with_signer(signer);
//!
//! let bid = PlaceBuyOrderInput::new(1, true, LimitPrice::bid(45)?, 100)?;
//! let handle = client.order_book().place_buy_order(&bid).await?;
//! client.wait_for_tx(&handle, &CancellationToken::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod port;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;

pub use error::{Error, Result};
pub use infrastructure::{Client, ClientBuilder};
