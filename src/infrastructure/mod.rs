//! Infrastructure layer.
//!
//! Technical concerns that support the client without containing domain
//! logic: configuration, logging and wiring.
//!
//! # Submodules
//!
//! - [`client`] - Composition root building a [`Client`]
//! - [`config`] - Configuration loading and validation

pub mod client;
pub mod config;

pub use client::{Client, ClientBuilder};
