//! JSON-RPC transport adapter.

pub mod client;
pub mod dto;

pub use client::JsonRpcTransport;
