use std::fmt;

use thiserror::Error;

use crate::domain::args::MarshalError;
use crate::domain::error::ValidationError;
use crate::domain::id::TxHash;
use crate::domain::result::DecodeError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Failures talking to the remote engine.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed response: {0}")]
    Decode(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("submission accepted without a transaction hash")]
    MissingHandle,
}

/// Why a confirmation wait ended without a known outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndeterminateReason {
    Cancelled,
    TimedOut,
}

impl fmt::Display for IndeterminateReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "wait cancelled"),
            Self::TimedOut => write!(f, "wait timed out"),
        }
    }
}

/// Terminal and non-terminal confirmation failures.
///
/// `Rejected` means the engine included the transaction and it failed.
/// `Indeterminate` means the caller stopped waiting; the transaction may still
/// be included later.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxError {
    #[error("transaction {hash} failed with code {code}: {log}")]
    Rejected { hash: TxHash, code: i64, log: String },

    #[error("transaction {hash} outcome unknown ({reason}); it may still be included")]
    Indeterminate {
        hash: TxHash,
        reason: IndeterminateReason,
    },
}

impl TxError {
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    #[must_use]
    pub const fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Indeterminate { .. })
    }

    #[must_use]
    pub const fn hash(&self) -> &TxHash {
        match self {
            Self::Rejected { hash, .. } | Self::Indeterminate { hash, .. } => hash,
        }
    }
}

/// Broad class of an [`Error`], for callers deciding whether to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Bad input; fix and resubmit.
    Validation,
    /// Network or engine unavailable.
    Transport,
    /// Included and failed; do not retry blindly.
    Rejected,
    /// Outcome unknown; check again later before resubmitting.
    Indeterminate,
    Config,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("procedure {procedure} failed: {source}")]
    Invocation {
        procedure: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Tx(#[from] TxError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl Error {
    /// Attach the procedure name to a transport failure.
    pub fn invocation(procedure: impl Into<String>, source: TransportError) -> Self {
        Self::Invocation {
            procedure: procedure.into(),
            source,
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Validation(_) | Self::Marshal(_) => ErrorClass::Validation,
            Self::Config(_) | Self::Url(_) => ErrorClass::Config,
            Self::Tx(TxError::Rejected { .. }) => ErrorClass::Rejected,
            Self::Tx(TxError::Indeterminate { .. }) => ErrorClass::Indeterminate,
            Self::Invocation { .. } | Self::Transport(_) | Self::Decode(_) | Self::Json(_) => {
                ErrorClass::Transport
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
