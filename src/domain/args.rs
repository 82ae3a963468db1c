//! Struct-to-positional-argument marshaling.
//!
//! Procedures take their arguments by position. Input types describe their
//! fields in declaration order with [`marshal_args!`](crate::marshal_args),
//! which generates a [`MarshalArgs`] impl backed by statically typed
//! [`ArgField`] encoders; there is no runtime type inspection.
//!
//! Each field has a [`FieldMode`]:
//!
//! - `required`: a zero value fails with [`MarshalError::MissingRequiredField`].
//! - `optional`: a zero value is sent as [`ArgValue::Null`] in its position.
//! - `literal`: always sent as-is, zero included.
//!
//! An optional field can never carry its legitimate zero value, since zero is
//! indistinguishable from "absent". Likewise a required numeric field can never
//! be zero. Use `literal` for fields where zero is meaningful (an outcome of
//! `false`, an offset of `0`).
//!
//! # Example
//!
//! ```
//! use tn_sdk::domain::args::{MarshalArgs, MarshalError};
//! use tn_sdk::domain::value::ArgValue;
//! use tn_sdk::marshal_args;
//!
//! struct Query {
//!     name: String,
//!     limit: i64,
//! }
//!
//! marshal_args!(Query {
//!     required name,
//!     optional limit,
//! });
//!
//! let args = Query { name: "cpi".into(), limit: 0 }.marshal_args().unwrap();
//! assert_eq!(args, vec![ArgValue::text("cpi"), ArgValue::Null]);
//!
//! let err = Query { name: String::new(), limit: 5 }.marshal_args().unwrap_err();
//! assert!(matches!(err, MarshalError::MissingRequiredField { field: "name" }));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use super::id::{EthAddress, StreamId};
use super::value::{ArgValue, Scalar};

/// Failures while turning a struct into positional arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MarshalError {
    #[error("missing required field: {field}")]
    MissingRequiredField { field: &'static str },

    #[error("unsupported type for field {field}: {type_name}")]
    UnsupportedFieldType {
        field: &'static str,
        type_name: String,
    },
}

/// How a field's zero value is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    Required,
    Optional,
    Literal,
}

/// Declaration-order description of one marshaled field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub mode: FieldMode,
}

/// The type name of a value that cannot be sent as an argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unsupported(pub String);

/// A value that can occupy one argument position.
pub trait ArgField {
    /// Whether this is the type's zero value.
    fn is_zero(&self) -> bool;

    /// Encode as an argument.
    fn encode(&self) -> Result<ArgValue, Unsupported>;
}

/// Types that marshal into an ordered argument list.
pub trait MarshalArgs {
    /// Fields in declaration order.
    const FIELDS: &'static [FieldSpec];

    fn marshal_args(&self) -> Result<Vec<ArgValue>, MarshalError>;

    /// Names of the fields that must be non-zero.
    fn required_fields() -> Vec<&'static str> {
        Self::FIELDS
            .iter()
            .filter(|f| f.mode == FieldMode::Required)
            .map(|f| f.name)
            .collect()
    }
}

/// Accumulates positional arguments, applying each field's zero-value rule.
#[derive(Debug, Default)]
pub struct ArgsBuilder {
    args: Vec<ArgValue>,
}

impl ArgsBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field according to `mode`.
    pub fn push<T: ArgField + ?Sized>(
        self,
        mode: FieldMode,
        field: &'static str,
        value: &T,
    ) -> Result<Self, MarshalError> {
        match mode {
            FieldMode::Required => self.required(field, value),
            FieldMode::Optional => self.optional(field, value),
            FieldMode::Literal => self.literal(field, value),
        }
    }

    /// Append a field that must not hold its zero value.
    pub fn required<T: ArgField + ?Sized>(
        self,
        field: &'static str,
        value: &T,
    ) -> Result<Self, MarshalError> {
        if value.is_zero() {
            return Err(MarshalError::MissingRequiredField { field });
        }
        self.literal(field, value)
    }

    /// Append a field, sending NULL in its place when it holds its zero value.
    pub fn optional<T: ArgField + ?Sized>(
        mut self,
        field: &'static str,
        value: &T,
    ) -> Result<Self, MarshalError> {
        if value.is_zero() {
            self.args.push(ArgValue::Null);
            return Ok(self);
        }
        self.literal(field, value)
    }

    /// Append a field as-is.
    pub fn literal<T: ArgField + ?Sized>(
        mut self,
        field: &'static str,
        value: &T,
    ) -> Result<Self, MarshalError> {
        let arg = value
            .encode()
            .map_err(|Unsupported(type_name)| MarshalError::UnsupportedFieldType { field, type_name })?;
        self.args.push(arg);
        Ok(self)
    }

    /// Append a pre-encoded argument.
    #[must_use]
    pub fn arg(mut self, arg: ArgValue) -> Self {
        self.args.push(arg);
        self
    }

    #[must_use]
    pub fn finish(self) -> Vec<ArgValue> {
        self.args
    }
}

/// Implement [`MarshalArgs`] for a struct by listing its fields in order.
///
/// Each entry is `required`, `optional` or `literal` followed by the field
/// name. Unknown field names are compile errors.
#[macro_export]
macro_rules! marshal_args {
    ($ty:ty { $($mode:ident $field:ident),* $(,)? }) => {
        impl $crate::domain::args::MarshalArgs for $ty {
            const FIELDS: &'static [$crate::domain::args::FieldSpec] = &[
                $($crate::domain::args::FieldSpec {
                    name: stringify!($field),
                    mode: $crate::__field_mode!($mode),
                },)*
            ];

            fn marshal_args(
                &self,
            ) -> ::std::result::Result<
                ::std::vec::Vec<$crate::domain::value::ArgValue>,
                $crate::domain::args::MarshalError,
            > {
                let builder = $crate::domain::args::ArgsBuilder::new();
                $(let builder = builder.$mode(stringify!($field), &self.$field)?;)*
                Ok(builder.finish())
            }
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_mode {
    (required) => {
        $crate::domain::args::FieldMode::Required
    };
    (optional) => {
        $crate::domain::args::FieldMode::Optional
    };
    (literal) => {
        $crate::domain::args::FieldMode::Literal
    };
}

macro_rules! int_field {
    ($($t:ty),*) => {$(
        impl ArgField for $t {
            fn is_zero(&self) -> bool {
                *self == 0
            }

            fn encode(&self) -> Result<ArgValue, Unsupported> {
                Ok(ArgValue::int(i64::from(*self)))
            }
        }

        impl ArgField for Vec<$t> {
            fn is_zero(&self) -> bool {
                self.is_empty()
            }

            fn encode(&self) -> Result<ArgValue, Unsupported> {
                Ok(ArgValue::Array(self.iter().map(|v| Scalar::Int(i64::from(*v))).collect()))
            }
        }
    )*};
}

int_field!(i16, i32, i64, u16, u32);

impl ArgField for bool {
    fn is_zero(&self) -> bool {
        !*self
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::bool(*self))
    }
}

impl ArgField for Vec<bool> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::Array(self.iter().copied().map(Scalar::Bool).collect()))
    }
}

impl ArgField for str {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::text(self))
    }
}

impl ArgField for String {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::text(self.as_str()))
    }
}

impl ArgField for Vec<String> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::Array(self.iter().cloned().map(Scalar::Text).collect()))
    }
}

impl ArgField for Decimal {
    fn is_zero(&self) -> bool {
        Decimal::is_zero(self)
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::numeric(*self))
    }
}

impl ArgField for Vec<Decimal> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::Array(self.iter().copied().map(Scalar::Numeric).collect()))
    }
}

impl ArgField for Vec<u8> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::bytes(self.clone()))
    }
}

impl ArgField for StreamId {
    fn is_zero(&self) -> bool {
        self.as_str().is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::text(self.as_str()))
    }
}

impl ArgField for EthAddress {
    fn is_zero(&self) -> bool {
        self.as_str().is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::text(self.as_str()))
    }
}

impl ArgField for Vec<EthAddress> {
    fn is_zero(&self) -> bool {
        self.is_empty()
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        Ok(ArgValue::Array(
            self.iter().map(|a| Scalar::Text(a.as_str().to_string())).collect(),
        ))
    }
}

// `None` and `Some(zero)` are both zero: the scheme cannot tell them apart.
impl<T: ArgField> ArgField for Option<T> {
    fn is_zero(&self) -> bool {
        self.as_ref().map_or(true, ArgField::is_zero)
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        match self {
            Some(v) => v.encode(),
            None => Ok(ArgValue::Null),
        }
    }
}

/// Dynamically typed arguments, e.g. forwarded from a JSON request body.
///
/// Objects and nested arrays have no positional encoding and are rejected.
impl ArgField for serde_json::Value {
    fn is_zero(&self) -> bool {
        use serde_json::Value;
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => map.is_empty(),
        }
    }

    fn encode(&self) -> Result<ArgValue, Unsupported> {
        use serde_json::Value;
        match self {
            Value::Null => Ok(ArgValue::Null),
            Value::Array(items) => items
                .iter()
                .map(json_scalar)
                .collect::<Result<Vec<_>, _>>()
                .map(ArgValue::Array),
            Value::Object(_) => Err(Unsupported("object".into())),
            other => json_scalar(other).map(ArgValue::Scalar),
        }
    }
}

fn json_scalar(value: &serde_json::Value) -> Result<Scalar, Unsupported> {
    use serde_json::Value;
    match value {
        Value::Bool(b) => Ok(Scalar::Bool(*b)),
        Value::String(s) => Ok(Scalar::Text(s.clone())),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Scalar::Int(i));
            }
            n.to_string()
                .parse::<Decimal>()
                .map(Scalar::Numeric)
                .map_err(|_| Unsupported(format!("number {n}")))
        }
        Value::Null => Err(Unsupported("null array element".into())),
        Value::Array(_) => Err(Unsupported("nested array".into())),
        Value::Object(_) => Err(Unsupported("object".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    struct Sample {
        name: String,
        count: i64,
        note: String,
        flag: bool,
        weights: Vec<Decimal>,
    }

    crate::marshal_args!(Sample {
        required name,
        optional count,
        optional note,
        literal flag,
        optional weights,
    });

    fn sample() -> Sample {
        Sample {
            name: "alpha".into(),
            count: 3,
            note: "n".into(),
            flag: false,
            weights: vec![dec!(0.5)],
        }
    }

    #[test]
    fn preserves_declaration_order() {
        let args = sample().marshal_args().unwrap();
        assert_eq!(
            args,
            vec![
                ArgValue::text("alpha"),
                ArgValue::int(3),
                ArgValue::text("n"),
                ArgValue::bool(false),
                ArgValue::Array(vec![Scalar::Numeric(dec!(0.5))]),
            ]
        );
    }

    #[test]
    fn required_zero_is_missing() {
        let s = Sample {
            name: String::new(),
            ..sample()
        };
        assert_eq!(
            s.marshal_args().unwrap_err(),
            MarshalError::MissingRequiredField { field: "name" }
        );
    }

    #[test]
    fn optional_zero_becomes_null_in_place() {
        let s = Sample {
            count: 0,
            note: String::new(),
            weights: vec![],
            ..sample()
        };
        let args = s.marshal_args().unwrap();
        assert_eq!(args.len(), 5);
        assert!(args[1].is_null());
        assert!(args[2].is_null());
        assert!(args[4].is_null());
        assert_eq!(args[3], ArgValue::bool(false));
    }

    #[test]
    fn field_map_lists_required_fields() {
        assert_eq!(Sample::required_fields(), vec!["name"]);
        assert_eq!(Sample::FIELDS.len(), 5);
        assert_eq!(Sample::FIELDS[3].mode, FieldMode::Literal);
    }

    #[test]
    fn option_some_zero_is_still_zero() {
        let args = ArgsBuilder::new()
            .optional("from", &Some(0_i64))
            .unwrap()
            .optional("to", &Some(10_i64))
            .unwrap()
            .finish();
        assert_eq!(args, vec![ArgValue::Null, ArgValue::int(10)]);
    }

    #[test]
    fn json_objects_are_unsupported() {
        let err = ArgsBuilder::new()
            .required("payload", &json!({"a": 1}))
            .unwrap_err();
        assert_eq!(
            err,
            MarshalError::UnsupportedFieldType {
                field: "payload",
                type_name: "object".into()
            }
        );

        let err = ArgsBuilder::new()
            .optional("rows", &json!([[1, 2]]))
            .unwrap_err();
        assert!(matches!(
            err,
            MarshalError::UnsupportedFieldType { field: "rows", .. }
        ));
    }

    #[test]
    fn json_scalars_and_arrays_encode() {
        let args = ArgsBuilder::new()
            .required("a", &json!(5))
            .unwrap()
            .required("b", &json!("x"))
            .unwrap()
            .required("c", &json!([1, 2]))
            .unwrap()
            .optional("d", &json!(0))
            .unwrap()
            .finish();
        assert_eq!(
            args,
            vec![
                ArgValue::int(5),
                ArgValue::text("x"),
                ArgValue::Array(vec![Scalar::Int(1), Scalar::Int(2)]),
                ArgValue::Null,
            ]
        );
    }
}
