//! Outbound ports (driven side): interfaces implemented by outbound adapters.

pub mod signer;
pub mod transport;
