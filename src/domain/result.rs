//! Tabular results returned by read procedures.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A result row could not be decoded into the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot decode column '{column}' (row {row}): {reason}")]
pub struct DecodeError {
    pub column: String,
    pub row: usize,
    pub reason: String,
}

/// Column names plus row values, as produced by a read procedure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    #[serde(default, alias = "column_names")]
    pub columns: Vec<String>,
    #[serde(default, alias = "values")]
    pub rows: Vec<Vec<Value>>,
}

impl QueryResult {
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows with column-name access.
    pub fn iter(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().enumerate().map(move |(index, values)| Row {
            columns: &self.columns,
            values,
            index,
        })
    }
}

/// A borrowed view of one result row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [Value],
    index: usize,
}

impl<'a> Row<'a> {
    /// Zero-based position of this row in its result.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Build a decode error for `column` of this row.
    pub fn error(&self, column: &str, reason: impl Into<String>) -> DecodeError {
        DecodeError {
            column: column.to_string(),
            row: self.index,
            reason: reason.into(),
        }
    }

    /// Raw value of `column`.
    pub fn value(&self, column: &str) -> Result<&'a Value, DecodeError> {
        let pos = self
            .columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| self.error(column, "column not present"))?;
        self.values
            .get(pos)
            .ok_or_else(|| self.error(column, "row is shorter than column list"))
    }

    /// Whether `column` is present and NULL.
    pub fn is_null(&self, column: &str) -> Result<bool, DecodeError> {
        Ok(self.value(column)?.is_null())
    }

    pub fn i64(&self, column: &str) -> Result<i64, DecodeError> {
        match self.value(column)? {
            Value::Number(n) => n
                .as_i64()
                .ok_or_else(|| self.error(column, format!("{n} is not an integer"))),
            Value::String(s) => s
                .parse()
                .map_err(|_| self.error(column, format!("'{s}' is not an integer"))),
            other => Err(self.error(column, format!("expected integer, got {other}"))),
        }
    }

    pub fn opt_i64(&self, column: &str) -> Result<Option<i64>, DecodeError> {
        if self.is_null(column)? {
            return Ok(None);
        }
        self.i64(column).map(Some)
    }

    pub fn bool(&self, column: &str) -> Result<bool, DecodeError> {
        match self.value(column)? {
            Value::Bool(b) => Ok(*b),
            Value::String(s) => match s.as_str() {
                "true" | "t" => Ok(true),
                "false" | "f" => Ok(false),
                _ => Err(self.error(column, format!("'{s}' is not a boolean"))),
            },
            other => Err(self.error(column, format!("expected boolean, got {other}"))),
        }
    }

    pub fn str(&self, column: &str) -> Result<&'a str, DecodeError> {
        match self.value(column)? {
            Value::String(s) => Ok(s),
            other => Err(self.error(column, format!("expected text, got {other}"))),
        }
    }

    pub fn opt_str(&self, column: &str) -> Result<Option<&'a str>, DecodeError> {
        if self.is_null(column)? {
            return Ok(None);
        }
        self.str(column).map(Some)
    }

    /// Numeric values arrive as strings to preserve precision; plain JSON
    /// numbers are accepted too.
    pub fn decimal(&self, column: &str) -> Result<Decimal, DecodeError> {
        match self.value(column)? {
            Value::String(s) => Decimal::from_str(s)
                .map_err(|e| self.error(column, format!("'{s}' is not numeric: {e}"))),
            Value::Number(n) => Decimal::from_str(&n.to_string())
                .or_else(|_| Decimal::from_scientific(&n.to_string()))
                .map_err(|e| self.error(column, format!("{n} is not numeric: {e}"))),
            other => Err(self.error(column, format!("expected numeric, got {other}"))),
        }
    }

    /// Bytes arrive as `0x`-prefixed hex.
    pub fn bytes(&self, column: &str) -> Result<Vec<u8>, DecodeError> {
        let s = self.str(column)?;
        let body = s.strip_prefix("0x").unwrap_or(s);
        hex::decode(body).map_err(|e| self.error(column, format!("invalid hex: {e}")))
    }
}
