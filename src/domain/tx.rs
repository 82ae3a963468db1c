//! Submitted write operations and their confirmed outcome.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::TxHash;

/// Result code the engine reports for a successful transaction.
pub const CODE_OK: i64 = 0;

/// Reference to a submitted write, consumed by the transaction tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxHandle {
    pub hash: TxHash,
    pub submitted_at: DateTime<Utc>,
}

impl TxHandle {
    #[must_use]
    pub fn new(hash: TxHash) -> Self {
        Self {
            hash,
            submitted_at: Utc::now(),
        }
    }
}

/// Inclusion status of a transaction as reported by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TxStatus {
    pub included: bool,
    pub code: i64,
    /// Engine log for the transaction, verbatim.
    pub log: String,
    pub height: Option<i64>,
}

impl TxStatus {
    /// Not yet included in a block.
    #[must_use]
    pub fn pending() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn included(code: i64, log: impl Into<String>, height: i64) -> Self {
        Self {
            included: true,
            code,
            log: log.into(),
            height: Some(height),
        }
    }

    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.included && self.code == CODE_OK
    }
}

/// A transaction confirmed with [`CODE_OK`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxReceipt {
    pub hash: TxHash,
    pub height: Option<i64>,
    pub log: String,
}
