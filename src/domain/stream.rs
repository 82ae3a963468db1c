//! Streams, records and their inputs.
//!
//! A primitive stream holds raw records inserted by its data provider. A
//! composed stream derives its values from weighted child streams (see
//! [`taxonomy`](super::taxonomy)).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::args::ArgsBuilder;
use super::cache::CacheMetadata;
use super::error::{ensure_range, ValidationError, ValidationResult};
use super::id::{EthAddress, StreamId, StreamLocator};
use super::result::{DecodeError, Row};
use super::value::{ArgValue, Scalar};
use crate::marshal_args;

/// Kind of stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreamType {
    Primitive,
    Composed,
}

impl StreamType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primitive => "primitive",
            Self::Composed => "composed",
        }
    }
}

impl fmt::Display for StreamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primitive" => Ok(Self::Primitive),
            "composed" => Ok(Self::Composed),
            other => Err(ValidationError::new(
                "stream_type",
                format!("must be 'primitive' or 'composed', got '{other}'"),
            )),
        }
    }
}

/// A stream to deploy under the caller's address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamDefinition {
    pub stream_id: StreamId,
    pub stream_type: StreamType,
}

impl StreamDefinition {
    #[must_use]
    pub const fn new(stream_id: StreamId, stream_type: StreamType) -> Self {
        Self {
            stream_id,
            stream_type,
        }
    }

    #[must_use]
    pub fn args(&self) -> Vec<ArgValue> {
        vec![
            ArgValue::text(self.stream_id.as_str()),
            ArgValue::text(self.stream_type.as_str()),
        ]
    }
}

/// Arguments for deploying several streams in one transaction.
///
/// The engine applies the whole batch atomically.
pub fn batch_deploy_args(definitions: &[StreamDefinition]) -> ValidationResult<Vec<ArgValue>> {
    if definitions.is_empty() {
        return Err(ValidationError::new("definitions", "must not be empty"));
    }
    let mut seen = HashSet::new();
    for def in definitions {
        if !seen.insert(&def.stream_id) {
            return Err(ValidationError::new(
                "stream_id",
                format!("duplicate stream id {} in batch", def.stream_id),
            ));
        }
    }
    Ok(vec![
        ArgValue::Array(
            definitions
                .iter()
                .map(|d| Scalar::Text(d.stream_id.as_str().to_string()))
                .collect(),
        ),
        ArgValue::Array(
            definitions
                .iter()
                .map(|d| Scalar::Text(d.stream_type.as_str().to_string()))
                .collect(),
        ),
    ])
}

/// One record to insert into a primitive stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertRecordInput {
    pub locator: StreamLocator,
    /// Unix timestamp (seconds) the value applies to.
    pub event_time: i64,
    pub value: Decimal,
}

impl InsertRecordInput {
    pub fn validate(&self) -> ValidationResult {
        if self.event_time < 0 {
            return Err(ValidationError::new(
                "event_time",
                format!("must not be negative, got {}", self.event_time),
            ));
        }
        Ok(())
    }
}

/// Arguments for inserting records, transposed into four parallel arrays
/// (`data_provider`, `stream_id`, `event_time`, `value`).
///
/// The engine applies the whole batch atomically.
pub fn insert_records_args(records: &[InsertRecordInput]) -> ValidationResult<Vec<ArgValue>> {
    if records.is_empty() {
        return Err(ValidationError::new("records", "must not be empty"));
    }
    for record in records {
        record.validate()?;
    }

    let providers = records
        .iter()
        .map(|r| Scalar::Text(r.locator.data_provider().as_str().to_string()))
        .collect();
    let streams = records
        .iter()
        .map(|r| Scalar::Text(r.locator.stream_id().as_str().to_string()))
        .collect();
    let times = records.iter().map(|r| Scalar::Int(r.event_time)).collect();
    let values = records.iter().map(|r| Scalar::Numeric(r.value)).collect();

    Ok(ArgsBuilder::new()
        .arg(ArgValue::Array(providers))
        .arg(ArgValue::Array(streams))
        .arg(ArgValue::Array(times))
        .arg(ArgValue::Array(values))
        .finish())
}

/// Range query over a stream.
///
/// `from`, `to` and `frozen_at` are optional; a value of `0` is sent as NULL
/// and so cannot be used to mean the epoch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetRecordInput {
    pub data_provider: EthAddress,
    pub stream_id: StreamId,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub frozen_at: Option<i64>,
    /// Ask the engine to serve from its cache tier when possible.
    pub use_cache: bool,
}

marshal_args!(GetRecordInput {
    required data_provider,
    required stream_id,
    optional from,
    optional to,
    optional frozen_at,
});

impl GetRecordInput {
    #[must_use]
    pub fn new(locator: &StreamLocator) -> Self {
        Self {
            data_provider: locator.data_provider().clone(),
            stream_id: locator.stream_id().clone(),
            from: None,
            to: None,
            frozen_at: None,
            use_cache: false,
        }
    }

    #[must_use]
    pub fn range(mut self, from: Option<i64>, to: Option<i64>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    #[must_use]
    pub fn frozen_at(mut self, frozen_at: i64) -> Self {
        self.frozen_at = Some(frozen_at);
        self
    }

    #[must_use]
    pub fn with_cache(mut self, use_cache: bool) -> Self {
        self.use_cache = use_cache;
        self
    }

    #[must_use]
    pub fn locator(&self) -> StreamLocator {
        StreamLocator::new(self.stream_id.clone(), self.data_provider.clone())
    }

    pub fn validate(&self) -> ValidationResult {
        validate_range(self.from, self.to)
    }
}

fn validate_range(from: Option<i64>, to: Option<i64>) -> ValidationResult {
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(ValidationError::new(
                "from",
                format!("must not be after to ({from} > {to})"),
            ));
        }
    }
    Ok(())
}

/// Index query: values relative to the value at `base_time`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetIndexInput {
    pub data_provider: EthAddress,
    pub stream_id: StreamId,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub frozen_at: Option<i64>,
    pub base_time: Option<i64>,
    pub use_cache: bool,
}

marshal_args!(GetIndexInput {
    required data_provider,
    required stream_id,
    optional from,
    optional to,
    optional frozen_at,
    optional base_time,
});

impl GetIndexInput {
    #[must_use]
    pub fn new(record: GetRecordInput, base_time: Option<i64>) -> Self {
        Self {
            data_provider: record.data_provider,
            stream_id: record.stream_id,
            from: record.from,
            to: record.to,
            frozen_at: record.frozen_at,
            base_time,
            use_cache: record.use_cache,
        }
    }

    #[must_use]
    pub fn locator(&self) -> StreamLocator {
        StreamLocator::new(self.stream_id.clone(), self.data_provider.clone())
    }

    pub fn validate(&self) -> ValidationResult {
        validate_range(self.from, self.to)
    }
}

/// Paged listing of deployed streams.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ListStreamsInput {
    /// Restrict to one provider; `None` lists all.
    pub data_provider: Option<EthAddress>,
    pub limit: i64,
    pub offset: i64,
}

marshal_args!(ListStreamsInput {
    optional data_provider,
    optional limit,
    literal offset,
});

impl ListStreamsInput {
    pub const MAX_LIMIT: i64 = 5000;

    pub fn validate(&self) -> ValidationResult {
        ensure_range("limit", self.limit, 0, Self::MAX_LIMIT)?;
        ensure_range("offset", self.offset, 0, i64::MAX)
    }
}

/// One `(event_time, value)` observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub event_time: i64,
    pub value: Decimal,
}

impl StreamRecord {
    pub fn from_row(row: &Row<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            event_time: row.i64("event_time")?,
            value: row.decimal("value")?,
        })
    }
}

/// Records returned by a stream read, with the cache metadata of the query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamResult {
    pub records: Vec<StreamRecord>,
    pub cache: CacheMetadata,
}

/// Listing entry for a deployed stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamSummary {
    pub locator: StreamLocator,
    pub stream_type: StreamType,
    pub created_at: i64,
}

impl StreamSummary {
    pub fn from_row(row: &Row<'_>) -> Result<Self, DecodeError> {
        let data_provider = EthAddress::parse(row.str("data_provider")?)
            .map_err(|e| row.error("data_provider", e.constraint()))?;
        let stream_id =
            StreamId::parse(row.str("stream_id")?).map_err(|e| row.error("stream_id", e.constraint()))?;
        let stream_type = row
            .str("stream_type")?
            .parse()
            .map_err(|e: ValidationError| row.error("stream_type", e.constraint()))?;
        Ok(Self {
            locator: StreamLocator::new(stream_id, data_provider),
            stream_type,
            created_at: row.i64("created_at")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::args::MarshalArgs;
    use rust_decimal_macros::dec;

    fn locator(name: &str) -> StreamLocator {
        StreamLocator::new(
            StreamId::generate(name),
            EthAddress::parse(format!("0x{}", "1".repeat(40))).unwrap(),
        )
    }

    #[test]
    fn insert_records_transposes_into_arrays() {
        let records = vec![
            InsertRecordInput {
                locator: locator("a"),
                event_time: 10,
                value: dec!(1.5),
            },
            InsertRecordInput {
                locator: locator("b"),
                event_time: 20,
                value: dec!(2),
            },
        ];
        let args = insert_records_args(&records).unwrap();
        assert_eq!(args.len(), 4);
        assert_eq!(args[2], ArgValue::Array(vec![Scalar::Int(10), Scalar::Int(20)]));
        assert_eq!(
            args[3],
            ArgValue::Array(vec![Scalar::Numeric(dec!(1.5)), Scalar::Numeric(dec!(2))])
        );
    }

    #[test]
    fn insert_records_rejects_empty_and_negative_time() {
        assert_eq!(insert_records_args(&[]).unwrap_err().field(), "records");
        let bad = InsertRecordInput {
            locator: locator("a"),
            event_time: -1,
            value: dec!(1),
        };
        assert_eq!(insert_records_args(&[bad]).unwrap_err().field(), "event_time");
    }

    #[test]
    fn batch_deploy_rejects_duplicates() {
        let def = StreamDefinition::new(StreamId::generate("x"), StreamType::Primitive);
        assert!(batch_deploy_args(&[def.clone()]).is_ok());
        assert_eq!(
            batch_deploy_args(&[def.clone(), def]).unwrap_err().field(),
            "stream_id"
        );
        assert!(batch_deploy_args(&[]).is_err());
    }

    #[test]
    fn get_record_unset_bounds_are_null() {
        let args = GetRecordInput::new(&locator("a"))
            .range(None, Some(100))
            .marshal_args()
            .unwrap();
        assert_eq!(args.len(), 5);
        assert!(args[2].is_null());
        assert_eq!(args[3], ArgValue::int(100));
        assert!(args[4].is_null());
    }

    #[test]
    fn get_record_range_must_be_ordered() {
        let input = GetRecordInput::new(&locator("a")).range(Some(10), Some(5));
        assert_eq!(input.validate().unwrap_err().field(), "from");
    }

    #[test]
    fn index_appends_base_time() {
        let input = GetIndexInput::new(GetRecordInput::new(&locator("a")), Some(50));
        let args = input.marshal_args().unwrap();
        assert_eq!(args.len(), 6);
        assert_eq!(args[5], ArgValue::int(50));
    }

    #[test]
    fn stream_type_parses() {
        assert_eq!("composed".parse::<StreamType>().unwrap(), StreamType::Composed);
        assert!("other".parse::<StreamType>().is_err());
    }
}
