//! Builders for domain primitives used across tests.

use std::sync::Arc;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::domain::id::{EthAddress, StreamId, StreamLocator};
use crate::domain::result::QueryResult;
use crate::error::TransportError;
use crate::port::outbound::signer::Signer;

/// Address made of one repeated hex digit, e.g. `address('a')`.
///
/// # Panics
///
/// Panics if `c` is not a hex digit.
pub fn address(c: char) -> EthAddress {
    EthAddress::parse(format!("0x{}", c.to_string().repeat(40)))
        .unwrap_or_else(|e| panic!("bad test address {c}: {e}"))
}

/// Stream `name` owned by `address('1')`.
pub fn locator(name: &str) -> StreamLocator {
    StreamLocator::new(StreamId::generate(name), address('1'))
}

/// Query result from column names and JSON rows.
pub fn query_result(columns: &[&str], rows: Vec<Vec<Value>>) -> QueryResult {
    QueryResult {
        columns: columns.iter().map(|c| (*c).to_string()).collect(),
        rows,
    }
}

/// Signer whose "signature" is the SHA-256 of the payload.
#[derive(Debug, Clone)]
pub struct DigestSigner {
    address: EthAddress,
}

impl DigestSigner {
    pub fn new(address: EthAddress) -> Self {
        Self { address }
    }
}

impl Signer for DigestSigner {
    fn address(&self) -> &EthAddress {
        &self.address
    }

    fn sign(&self, payload: &[u8]) -> Result<Vec<u8>, TransportError> {
        Ok(Sha256::digest(payload).to_vec())
    }
}

/// [`DigestSigner`] for `address(c)`.
pub fn signer(c: char) -> Arc<dyn Signer> {
    Arc::new(DigestSigner::new(address(c)))
}
