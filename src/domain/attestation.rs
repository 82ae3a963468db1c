//! Signed attestations of query results.
//!
//! A requester asks the engine to run one of a fixed set of read actions and
//! sign the result. The signed payload is fetched later by request id.

use rust_decimal::Decimal;

use super::args::ArgsBuilder;
use super::error::{ensure_range, ValidationError, ValidationResult};
use super::id::{EthAddress, StreamLocator, TxHash};
use super::result::{DecodeError, Row};
use super::value::ArgValue;
use crate::marshal_args;

/// Read actions the engine is willing to attest.
pub const ATTESTABLE_ACTIONS: &[&str] = &[
    "get_record",
    "get_index",
    "get_change_over_time",
    "get_last_record",
    "get_first_record",
];

/// Whether `action` may be attested.
#[must_use]
pub fn is_attestable(action: &str) -> bool {
    ATTESTABLE_ACTIONS.contains(&action)
}

/// Request an attestation of `action_name(args)` on a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestAttestationInput {
    pub locator: StreamLocator,
    pub action_name: String,
    /// Arguments of the attested action, after the stream locator.
    pub args: Vec<ArgValue>,
    /// Encrypted signatures are not supported; must be `false`.
    pub encrypt_sig: bool,
    /// Maximum fee the requester is willing to pay.
    pub max_fee: Decimal,
}

impl RequestAttestationInput {
    pub fn validate(&self) -> ValidationResult {
        if !is_attestable(&self.action_name) {
            return Err(ValidationError::new(
                "action_name",
                format!(
                    "'{}' is not attestable; expected one of {}",
                    self.action_name,
                    ATTESTABLE_ACTIONS.join(", ")
                ),
            ));
        }
        if self.encrypt_sig {
            return Err(ValidationError::new(
                "encrypt_sig",
                "encrypted signatures are not supported",
            ));
        }
        if self.max_fee < Decimal::ZERO {
            return Err(ValidationError::new(
                "max_fee",
                format!("must not be negative, got {}", self.max_fee),
            ));
        }
        Ok(())
    }

    /// Positional arguments. The attested action's own arguments travel as
    /// one serialized JSON blob so their positions survive intact.
    pub fn to_args(&self) -> ValidationResult<Vec<ArgValue>> {
        self.validate()?;
        let encoded = serde_json::to_vec(&self.args)
            .map_err(|e| ValidationError::new("args", format!("cannot encode: {e}")))?;
        Ok(ArgsBuilder::new()
            .arg(ArgValue::text(self.locator.data_provider().as_str()))
            .arg(ArgValue::text(self.locator.stream_id().as_str()))
            .arg(ArgValue::text(self.action_name.as_str()))
            .arg(ArgValue::bytes(encoded))
            .arg(ArgValue::bool(self.encrypt_sig))
            .arg(ArgValue::numeric(self.max_fee))
            .finish())
    }
}

/// Paged listing of attestation requests.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListAttestationsInput {
    /// Restrict to one requester; `None` lists all.
    pub requester: Option<EthAddress>,
    pub limit: i64,
    pub offset: i64,
}

marshal_args!(ListAttestationsInput {
    optional requester,
    optional limit,
    literal offset,
});

impl ListAttestationsInput {
    pub const MAX_LIMIT: i64 = 5000;

    pub fn validate(&self) -> ValidationResult {
        ensure_range("limit", self.limit, 0, Self::MAX_LIMIT)?;
        ensure_range("offset", self.offset, 0, i64::MAX)
    }
}

/// Listing entry for an attestation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationSummary {
    pub request_tx_id: TxHash,
    pub requester: EthAddress,
    pub attestation_hash: Vec<u8>,
    pub created_height: i64,
    pub signed_height: Option<i64>,
}

impl AttestationSummary {
    #[must_use]
    pub const fn is_signed(&self) -> bool {
        self.signed_height.is_some()
    }

    pub fn from_row(row: &Row<'_>) -> Result<Self, DecodeError> {
        let requester = EthAddress::parse(row.str("requester")?)
            .map_err(|e| row.error("requester", e.constraint()))?;
        Ok(Self {
            request_tx_id: TxHash::new(row.str("request_tx_id")?),
            requester,
            attestation_hash: row.bytes("attestation_hash")?,
            created_height: row.i64("created_height")?,
            signed_height: row.opt_i64("signed_height")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::StreamId;
    use rust_decimal_macros::dec;

    fn input() -> RequestAttestationInput {
        RequestAttestationInput {
            locator: StreamLocator::new(
                StreamId::generate("cpi"),
                EthAddress::parse(format!("0x{}", "3".repeat(40))).unwrap(),
            ),
            action_name: "get_record".into(),
            args: vec![ArgValue::int(1), ArgValue::Null],
            encrypt_sig: false,
            max_fee: dec!(10),
        }
    }

    #[test]
    fn only_allowlisted_actions() {
        assert!(input().validate().is_ok());
        let bad = RequestAttestationInput {
            action_name: "insert_records".into(),
            ..input()
        };
        assert_eq!(bad.validate().unwrap_err().field(), "action_name");
    }

    #[test]
    fn encryption_unsupported() {
        let bad = RequestAttestationInput {
            encrypt_sig: true,
            ..input()
        };
        assert_eq!(bad.validate().unwrap_err().field(), "encrypt_sig");
    }

    #[test]
    fn args_embed_encoded_action_args() {
        let args = input().to_args().unwrap();
        assert_eq!(args.len(), 6);
        assert_eq!(args[3], ArgValue::bytes(b"[1,null]".to_vec()));
        assert_eq!(args[5], ArgValue::numeric(dec!(10)));
    }
}
