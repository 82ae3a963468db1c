//! Remote procedure transport port.
//!
//! A transport moves [`Invocation`]s to the engine and reports back either a
//! query result (reads) or a transaction hash (writes). It also answers
//! inclusion-status queries for submitted transactions. Encoding, signing
//! envelopes and connection management belong to the adapter.

use std::fmt;

use async_trait::async_trait;

use super::signer::Signer;
use crate::domain::id::TxHash;
use crate::domain::result::QueryResult;
use crate::domain::tx::TxStatus;
use crate::domain::value::ArgValue;
use crate::error::TransportError;

/// Whether a procedure reads or mutates engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationKind {
    /// Read-only "call"; never yields a transaction.
    Read,
    /// State-changing "execute"; always yields a transaction.
    Write,
}

impl fmt::Display for InvocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "call"),
            Self::Write => write!(f, "execute"),
        }
    }
}

/// One named procedure invocation with its positional arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub namespace: String,
    pub name: String,
    pub args: Vec<ArgValue>,
    pub kind: InvocationKind,
}

impl Invocation {
    pub fn read(namespace: impl Into<String>, name: impl Into<String>, args: Vec<ArgValue>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args,
            kind: InvocationKind::Read,
        }
    }

    pub fn write(namespace: impl Into<String>, name: impl Into<String>, args: Vec<ArgValue>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            args,
            kind: InvocationKind::Write,
        }
    }
}

/// Per-call side channel. Affects latency and freshness only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallOptions {
    /// Let the engine answer from its cache tier.
    pub use_cache: bool,
}

impl CallOptions {
    #[must_use]
    pub const fn cached(use_cache: bool) -> Self {
        Self { use_cache }
    }
}

/// Result of a read procedure plus the engine's execution log.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CallResponse {
    pub result: QueryResult,
    pub logs: Vec<String>,
}

/// Transport to the remote engine.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Run a read procedure.
    async fn call(
        &self,
        invocation: &Invocation,
        options: CallOptions,
    ) -> Result<CallResponse, TransportError>;

    /// Sign and broadcast a write procedure, returning its transaction hash.
    async fn submit(
        &self,
        invocation: &Invocation,
        signer: &dyn Signer,
    ) -> Result<TxHash, TransportError>;

    /// Current inclusion status of a submitted transaction.
    async fn query_tx_status(&self, hash: &TxHash) -> Result<TxStatus, TransportError>;

    /// Adapter name for logging.
    fn name(&self) -> &'static str;
}
