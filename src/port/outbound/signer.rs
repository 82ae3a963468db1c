//! Signer port.
//!
//! The signer is opaque to the core: it names the account writes are sent
//! from and signs whatever payload the transport hands it.

use crate::domain::id::EthAddress;
use crate::error::TransportError;

pub trait Signer: Send + Sync {
    /// Account that authors submitted transactions.
    fn address(&self) -> &EthAddress;

    /// Sign a transport-defined payload.
    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TransportError>;
}
