//! Weighted composition of child streams into a composed stream.

use std::collections::HashSet;

use rust_decimal::Decimal;

use super::args::ArgsBuilder;
use super::error::{ValidationError, ValidationResult};
use super::id::{EthAddress, StreamId, StreamLocator};
use super::result::{DecodeError, Row};
use super::value::{ArgValue, Scalar};

/// A child stream and its weight in the parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyChild {
    pub locator: StreamLocator,
    pub weight: Decimal,
}

/// Replace the taxonomy of a composed stream from `start_date` onward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyInput {
    pub parent: StreamLocator,
    pub children: Vec<TaxonomyChild>,
    /// Unix timestamp the taxonomy takes effect; `None` or `0` means
    /// immediately.
    pub start_date: Option<i64>,
}

impl TaxonomyInput {
    pub fn validate(&self) -> ValidationResult {
        if self.children.is_empty() {
            return Err(ValidationError::new("children", "must not be empty"));
        }
        let mut seen = HashSet::new();
        for child in &self.children {
            if child.weight <= Decimal::ZERO {
                return Err(ValidationError::new(
                    "weight",
                    format!("must be positive for child {}, got {}", child.locator, child.weight),
                ));
            }
            if child.locator == self.parent {
                return Err(ValidationError::new(
                    "children",
                    format!("stream {} cannot be its own child", self.parent),
                ));
            }
            if !seen.insert(&child.locator) {
                return Err(ValidationError::new(
                    "children",
                    format!("duplicate child {}", child.locator),
                ));
            }
        }
        if let Some(start) = self.start_date {
            if start < 0 {
                return Err(ValidationError::new(
                    "start_date",
                    format!("must not be negative, got {start}"),
                ));
            }
        }
        Ok(())
    }

    /// Positional arguments: parent provider, parent id, then child
    /// providers, child ids and weights as parallel arrays, then start date.
    pub fn args(&self) -> ValidationResult<Vec<ArgValue>> {
        self.validate()?;
        let providers = self
            .children
            .iter()
            .map(|c| Scalar::Text(c.locator.data_provider().as_str().to_string()))
            .collect();
        let ids = self
            .children
            .iter()
            .map(|c| Scalar::Text(c.locator.stream_id().as_str().to_string()))
            .collect();
        let weights = self.children.iter().map(|c| Scalar::Numeric(c.weight)).collect();

        let builder = ArgsBuilder::new()
            .arg(ArgValue::text(self.parent.data_provider().as_str()))
            .arg(ArgValue::text(self.parent.stream_id().as_str()))
            .arg(ArgValue::Array(providers))
            .arg(ArgValue::Array(ids))
            .arg(ArgValue::Array(weights));
        // start_date is optional: zero and absent both become NULL
        let builder = builder
            .optional("start_date", &self.start_date)
            .map_err(|e| ValidationError::new("start_date", e.to_string()))?;
        Ok(builder.finish())
    }

    /// Sum of child weights.
    #[must_use]
    pub fn total_weight(&self) -> Decimal {
        self.children.iter().map(|c| c.weight).sum()
    }
}

/// One row of a described taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxonomyEntry {
    pub parent: StreamLocator,
    pub child: StreamLocator,
    pub weight: Decimal,
    pub start_date: Option<i64>,
    pub group_sequence: i64,
}

impl TaxonomyEntry {
    pub fn from_row(row: &Row<'_>) -> Result<Self, DecodeError> {
        let locator = |provider_col: &str, id_col: &str| -> Result<StreamLocator, DecodeError> {
            let provider = EthAddress::parse(row.str(provider_col)?)
                .map_err(|e| row.error(provider_col, e.constraint()))?;
            let id = StreamId::parse(row.str(id_col)?).map_err(|e| row.error(id_col, e.constraint()))?;
            Ok(StreamLocator::new(id, provider))
        };
        Ok(Self {
            parent: locator("data_provider", "stream_id")?,
            child: locator("child_data_provider", "child_stream_id")?,
            weight: row.decimal("weight")?,
            start_date: row.opt_i64("start_date")?,
            group_sequence: row.i64("group_sequence")?,
        })
    }
}
