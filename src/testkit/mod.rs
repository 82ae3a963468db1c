//! Shared test utilities available to both unit and integration tests.
//!
//! Enabled via `#[cfg(test)]` (unit tests) or the `testkit` feature
//! (integration tests).
//!
//! # Modules
//!
//! - [`transport`] - `ScriptedTransport`, an in-memory
//!   [`RpcTransport`](crate::port::outbound::transport::RpcTransport) with
//!   queued results and recorded invocations.
//! - [`domain`] - Builders for addresses, locators, signers and query results.
//! - [`config`] - Canonical test configuration.

pub mod config;
pub mod domain;
pub mod transport;
