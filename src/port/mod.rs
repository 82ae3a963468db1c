//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! The core talks to the remote engine exclusively through these traits, so
//! the application layer can be exercised against scripted transports.
//!
//! - [`RpcTransport`](outbound::transport::RpcTransport) - procedure calls,
//!   submissions and transaction status
//! - [`Signer`](outbound::signer::Signer) - per-client write identity

pub mod outbound;

pub use outbound::signer::Signer;
pub use outbound::transport::{CallOptions, CallResponse, Invocation, InvocationKind, RpcTransport};
