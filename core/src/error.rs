//! Error types for binding parsed values into a record.
//!
//! Two families are kept apart:
//!
//! - [`CoercionError`] wrapped in [`BindError::Coercion`]: the user supplied
//!   input that cannot be coerced into the declared field type. Callers
//!   usually print usage and exit.
//! - [`ContractViolation`] wrapped in [`BindError::Contract`]: the record's
//!   declared shape disagrees with the documented interface. Nothing at
//!   runtime can fix this; callers terminate.

use thiserror::Error;

use crate::Value;

/// Error type returned by [`MergeValue`](crate::MergeValue) implementations.
pub type MergeError = Box<dyn std::error::Error + Send + Sync>;

/// Recoverable failure to coerce one value.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// More than one value supplied for a single-valued field.
    #[error("too many values")]
    TooManyValues,

    /// The text is not a valid JSON number or array literal for the field.
    #[error(transparent)]
    Number(#[from] serde_json::Error),

    /// The value's shape does not fit the field (e.g. a flag bound to a
    /// string field).
    #[error("expected {expected}, got {value}")]
    Mismatch {
        /// Shape the field accepts.
        expected: &'static str,
        /// Value that was supplied.
        value: Value,
    },

    /// A self-merging field rejected the value.
    #[error("{0}")]
    Merge(MergeError),
}

/// Mismatch between a record's declared shape and the documented interface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    /// A field resolved to a binding key the parse result does not contain.
    #[error("value {0:?} not defined in documentation")]
    MissingKey(String),

    /// A boolean field was handed something other than a flag.
    #[error("expected bool for {key}, got {value}")]
    ExpectedBool {
        /// Binding key of the field.
        key: String,
        /// Value that was supplied.
        value: Value,
    },

    /// A field declares a type the binder cannot coerce into.
    #[error("field {field:?} of type {type_name} not supported")]
    UnsupportedField {
        /// Declared field name.
        field: String,
        /// Declared type, as written in the schema.
        type_name: String,
    },
}

/// Errors that abort a bind.
#[derive(Debug, Error)]
pub enum BindError {
    /// User input could not be coerced; reported with its binding key.
    #[error("{key}: {source}")]
    Coercion {
        /// Binding key of the failing field.
        key: String,
        /// Underlying cause.
        source: CoercionError,
    },

    /// The record does not match its documented interface.
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),
}

impl BindError {
    /// Returns `true` for contract violations, which callers should treat
    /// as fatal.
    ///
    /// # Examples
    ///
    /// ```
    /// use docopt_merge_core::{BindError, ContractViolation};
    ///
    /// let err = BindError::from(ContractViolation::MissingKey("-x".into()));
    /// assert!(err.is_fatal());
    /// ```
    pub fn is_fatal(&self) -> bool {
        matches!(self, BindError::Contract(_))
    }

    /// Binding key involved in the failure, when one is known.
    pub fn key(&self) -> Option<&str> {
        match self {
            BindError::Coercion { key, .. } => Some(key),
            BindError::Contract(ContractViolation::MissingKey(key))
            | BindError::Contract(ContractViolation::ExpectedBool { key, .. }) => Some(key),
            BindError::Contract(ContractViolation::UnsupportedField { .. }) => None,
        }
    }

    pub(crate) fn coercion(key: &str, source: CoercionError) -> Self {
        BindError::Coercion {
            key: key.to_string(),
            source,
        }
    }
}

/// Convenience alias for results with [`BindError`].
pub type Result<T> = std::result::Result<T, BindError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coercion_message_names_key() {
        let err = BindError::coercion("FILE", CoercionError::TooManyValues);
        assert_eq!(err.to_string(), "FILE: too many values");
        assert!(!err.is_fatal());
        assert_eq!(err.key(), Some("FILE"));
    }

    #[test]
    fn test_expected_bool_message() {
        let err = BindError::from(ContractViolation::ExpectedBool {
            key: "-v".to_string(),
            value: Value::from("yes"),
        });
        assert_eq!(
            err.to_string(),
            "contract violation: expected bool for -v, got \"yes\""
        );
        assert!(err.is_fatal());
    }

    #[test]
    fn test_merge_error_displays_verbatim() {
        let err = BindError::coercion("OCT", CoercionError::Merge("not octal".into()));
        assert_eq!(err.to_string(), "OCT: not octal");
    }
}
