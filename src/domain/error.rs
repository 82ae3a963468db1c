//! Field-level validation errors for domain inputs.
//!
//! Every input type exposed to callers offers a `validate()` method that runs
//! entirely offline. Failures name the offending field and the constraint it
//! violated, so callers can correct the input before any network call.
//!
//! # Examples
//!
//! ```
//! use tn_sdk::domain::error::ValidationError;
//!
//! let err = ValidationError::new("max_spread", "must be between 1 and 50, got 0");
//! assert_eq!(err.field(), "max_spread");
//! assert_eq!(err.to_string(), "invalid max_spread: must be between 1 and 50, got 0");
//! ```

use thiserror::Error;

/// A domain input violated one of its invariants.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {field}: {constraint}")]
pub struct ValidationError {
    field: &'static str,
    constraint: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    pub fn new(field: &'static str, constraint: impl Into<String>) -> Self {
        Self {
            field,
            constraint: constraint.into(),
        }
    }

    /// Name of the offending field, in wire (snake_case) form.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Human-readable description of the violated constraint.
    #[must_use]
    pub fn constraint(&self) -> &str {
        &self.constraint
    }
}

/// Shorthand for validation results.
pub type ValidationResult<T = ()> = std::result::Result<T, ValidationError>;

/// Check that an integer lies within `[min, max]`.
pub(crate) fn ensure_range<T>(field: &'static str, value: T, min: T, max: T) -> ValidationResult
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("must be between {min} and {max}, got {value}"),
        ));
    }
    Ok(())
}

/// Check that a value is strictly positive.
pub(crate) fn ensure_positive<T>(field: &'static str, value: T) -> ValidationResult
where
    T: PartialOrd + Default + std::fmt::Display + Copy,
{
    if value <= T::default() {
        return Err(ValidationError::new(
            field,
            format!("must be positive, got {value}"),
        ));
    }
    Ok(())
}
