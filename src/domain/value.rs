//! Positional argument values passed to remote procedures.
//!
//! Procedures accept scalars or arrays of scalars. `Null` stands in for an
//! absent optional argument so that positions are preserved.

use std::fmt;

use rust_decimal::Decimal;
use serde::ser::{Serialize, SerializeSeq, Serializer};

/// A single scalar argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Int(i64),
    Text(String),
    Bool(bool),
    Numeric(Decimal),
    Bytes(Vec<u8>),
}

impl Scalar {
    /// Engine type name, used in diagnostics.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Int(_) => "int8",
            Self::Text(_) => "text",
            Self::Bool(_) => "bool",
            Self::Numeric(_) => "numeric",
            Self::Bytes(_) => "bytea",
        }
    }
}

/// One positional argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// SQL-NULL marker for an absent optional argument.
    Null,
    Scalar(Scalar),
    Array(Vec<Scalar>),
}

impl ArgValue {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn int(v: i64) -> Self {
        Self::Scalar(Scalar::Int(v))
    }

    pub fn text(v: impl Into<String>) -> Self {
        Self::Scalar(Scalar::Text(v.into()))
    }

    pub fn bool(v: bool) -> Self {
        Self::Scalar(Scalar::Bool(v))
    }

    pub fn numeric(v: Decimal) -> Self {
        Self::Scalar(Scalar::Numeric(v))
    }

    pub fn bytes(v: impl Into<Vec<u8>>) -> Self {
        Self::Scalar(Scalar::Bytes(v.into()))
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "'{v}'"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Numeric(v) => write!(f, "{v}"),
            Self::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
        }
    }
}

// JSON form: numerics travel as strings to keep full precision, bytes as
// 0x-prefixed hex.
impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Int(v) => serializer.serialize_i64(*v),
            Self::Text(v) => serializer.serialize_str(v),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Numeric(v) => serializer.serialize_str(&v.to_string()),
            Self::Bytes(v) => serializer.serialize_str(&format!("0x{}", hex::encode(v))),
        }
    }
}

impl Serialize for ArgValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Scalar(s) => s.serialize(serializer),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn serializes_to_json_wire_form() {
        let args = vec![
            ArgValue::Null,
            ArgValue::int(7),
            ArgValue::numeric(dec!(1.50)),
            ArgValue::bytes(vec![0xab, 0x01]),
            ArgValue::Array(vec![Scalar::Text("a".into()), Scalar::Text("b".into())]),
        ];
        let json = serde_json::to_string(&args).unwrap();
        assert_eq!(json, r#"[null,7,"1.50","0xab01",["a","b"]]"#);
    }

    #[test]
    fn display_is_readable() {
        assert_eq!(ArgValue::Null.to_string(), "NULL");
        assert_eq!(
            ArgValue::Array(vec![Scalar::Int(1), Scalar::Int(2)]).to_string(),
            "[1, 2]"
        );
    }
}
