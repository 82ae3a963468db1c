//! Identifier types with validated construction.
//!
//! All identifiers are newtypes whose inner value is private, so every
//! instance has passed through a parsing constructor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::error::{ValidationError, ValidationResult};

const STREAM_ID_PREFIX: &str = "st";
const STREAM_ID_LEN: usize = 32;

/// Stream identifier: `st` followed by 30 lowercase alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StreamId(String);

impl StreamId {
    /// Parse and validate a stream identifier.
    pub fn parse(id: impl Into<String>) -> ValidationResult<Self> {
        let id = id.into();
        if id.len() != STREAM_ID_LEN {
            return Err(ValidationError::new(
                "stream_id",
                format!("must be {STREAM_ID_LEN} characters, got {}", id.len()),
            ));
        }
        if !id.starts_with(STREAM_ID_PREFIX) {
            return Err(ValidationError::new(
                "stream_id",
                format!("must start with '{STREAM_ID_PREFIX}'"),
            ));
        }
        if !id
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
        {
            return Err(ValidationError::new(
                "stream_id",
                "must contain only lowercase letters and digits",
            ));
        }
        Ok(Self(id))
    }

    /// Derive a deterministic stream identifier from a human-readable name.
    ///
    /// The id is `st` followed by the first 30 hex characters of the
    /// SHA-256 digest of `name`.
    #[must_use]
    pub fn generate(name: &str) -> Self {
        let digest = hex::encode(Sha256::digest(name.as_bytes()));
        let body = &digest[..STREAM_ID_LEN - STREAM_ID_PREFIX.len()];
        Self(format!("{STREAM_ID_PREFIX}{body}"))
    }

    /// Get the stream ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StreamId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for StreamId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<StreamId> for String {
    fn from(id: StreamId) -> Self {
        id.0
    }
}

/// An Ethereum-style account address, used for data providers and wallets.
///
/// Stored lowercase with the `0x` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EthAddress(String);

impl EthAddress {
    /// Parse an address. The `0x` prefix is required; case is normalised.
    pub fn parse(addr: impl AsRef<str>) -> ValidationResult<Self> {
        Self::parse_field("address", addr.as_ref())
    }

    /// Parse an address, attributing failures to `field`.
    pub(crate) fn parse_field(field: &'static str, addr: &str) -> ValidationResult<Self> {
        let Some(body) = addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")) else {
            return Err(ValidationError::new(field, "must start with 0x"));
        };
        if body.len() != 40 || !body.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ValidationError::new(
                field,
                "must be 0x followed by 40 hex characters",
            ));
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Get the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EthAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EthAddress {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

impl From<EthAddress> for String {
    fn from(addr: EthAddress) -> Self {
        addr.0
    }
}

/// Identity of a deployed stream: its id plus the provider that owns it.
///
/// Immutable once constructed; scopes every read and write on the stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamLocator {
    stream_id: StreamId,
    data_provider: EthAddress,
}

impl StreamLocator {
    /// Create a locator.
    #[must_use]
    pub const fn new(stream_id: StreamId, data_provider: EthAddress) -> Self {
        Self {
            stream_id,
            data_provider,
        }
    }

    #[must_use]
    pub const fn stream_id(&self) -> &StreamId {
        &self.stream_id
    }

    #[must_use]
    pub const fn data_provider(&self) -> &EthAddress {
        &self.data_provider
    }
}

impl fmt::Display for StreamLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.data_provider, self.stream_id)
    }
}

/// Hex-encoded transaction hash returned by the engine on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(String);

impl TxHash {
    /// Wrap a hash string as returned by the engine. Any `0x` prefix is
    /// dropped and hex digits are lowercased.
    pub fn new(hash: impl AsRef<str>) -> Self {
        let hash = hash.as_ref();
        let body = hash.strip_prefix("0x").unwrap_or(hash);
        Self(body.to_ascii_lowercase())
    }

    /// Build from raw hash bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(hex::encode(bytes))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A 32-byte hash identifying a market by its query components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryHash([u8; 32]);

impl QueryHash {
    pub const LEN: usize = 32;

    /// Build from a byte slice that must be exactly 32 bytes long.
    pub fn from_slice(bytes: &[u8]) -> ValidationResult<Self> {
        let arr: [u8; 32] = bytes.try_into().map_err(|_| {
            ValidationError::new(
                "query_hash",
                format!("must be exactly {} bytes, got {}", Self::LEN, bytes.len()),
            )
        })?;
        Ok(Self(arr))
    }

    /// Parse from hex, with or without `0x`.
    pub fn from_hex(s: &str) -> ValidationResult<Self> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(body)
            .map_err(|e| ValidationError::new("query_hash", format!("invalid hex: {e}")))?;
        Self::from_slice(&bytes)
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for QueryHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_stream_id_is_valid_and_deterministic() {
        let a = StreamId::generate("cpi_us");
        let b = StreamId::generate("cpi_us");
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 32);
        assert!(StreamId::parse(a.as_str()).is_ok());
        assert_ne!(a, StreamId::generate("cpi_eu"));
    }

    #[test]
    fn stream_id_rejects_bad_shapes() {
        assert!(StreamId::parse("st123").is_err());
        assert!(StreamId::parse(format!("xx{}", "a".repeat(30))).is_err());
        assert!(StreamId::parse(format!("st{}", "A".repeat(30))).is_err());
        assert!(StreamId::parse(format!("st{}", "a".repeat(30))).is_ok());
    }

    #[test]
    fn address_is_normalised_to_lowercase() {
        let addr = EthAddress::parse("0xABCDEFabcdef0123456789012345678901234567").unwrap();
        assert_eq!(addr.as_str(), "0xabcdefabcdef0123456789012345678901234567");
    }

    #[test]
    fn address_requires_prefix_and_length() {
        assert!(EthAddress::parse("abcdefabcdef0123456789012345678901234567").is_err());
        assert!(EthAddress::parse("0x1234").is_err());
        assert!(EthAddress::parse("0xzzcdefabcdef0123456789012345678901234567").is_err());
    }

    #[test]
    fn query_hash_must_be_32_bytes() {
        assert!(QueryHash::from_slice(&[0u8; 32]).is_ok());
        let err = QueryHash::from_slice(&[0u8; 31]).unwrap_err();
        assert_eq!(err.field(), "query_hash");
        assert!(QueryHash::from_slice(&[0u8; 33]).is_err());
    }

    #[test]
    fn tx_hash_strips_prefix() {
        assert_eq!(TxHash::new("0xABCD").as_str(), "abcd");
        assert_eq!(TxHash::from_bytes(&[0xde, 0xad]).as_str(), "dead");
    }

    #[test]
    fn stream_id_deserializes_through_validation() {
        let ok: Result<StreamId, _> =
            serde_json::from_str(&format!("\"st{}\"", "0".repeat(30)));
        assert!(ok.is_ok());
        let bad: Result<StreamId, _> = serde_json::from_str("\"nope\"");
        assert!(bad.is_err());
    }
}
