//! Value coercion: writes one parsed [`Value`] into one field.
//!
//! Dispatch is on the field's slot, then on the value's shape:
//!
//! | Field          | `Bool`        | `Text`                 | `List`                               |
//! |----------------|---------------|------------------------|--------------------------------------|
//! | `String`       | mismatch      | assign                 | 0: keep, 1: assign, n: too many      |
//! | `Vec<String>`  | mismatch      | one-element list       | assign                               |
//! | `bool`         | assign        | contract violation     | contract violation                   |
//! | numeric        | mismatch      | decode number          | 0: keep, 1: decode, n: too many      |
//! | numeric list   | mismatch      | decode array literal   | join as `[a,b,..]`, decode           |
//! | [`MergeValue`] | delegate      | delegate               | delegate                             |
//!
//! An empty `Text` leaves numeric and numeric-list fields untouched.

use tracing::debug;

use crate::error::{BindError, CoercionError, ContractViolation, Result};
use crate::schema::Slot;
use crate::Value;

/// Coerces `value` into `slot`.
///
/// `field` and `key` only feed error messages. On error the slot is left
/// as it was.
pub(crate) fn coerce(field: &str, key: &str, slot: Slot<'_>, value: &Value) -> Result<()> {
    let fail = |source: CoercionError| BindError::coercion(key, source);

    match slot {
        Slot::Text(target) => match value {
            Value::Text(text) => *target = text.clone(),
            Value::List(items) => {
                if let Some(item) = single(items).map_err(fail)? {
                    *target = item.clone();
                }
            }
            Value::Bool(_) => return Err(fail(mismatch("string", value))),
        },

        Slot::TextList(target) => match value {
            Value::Text(text) => *target = vec![text.clone()],
            Value::List(items) => *target = items.clone(),
            Value::Bool(_) => return Err(fail(mismatch("list of strings", value))),
        },

        Slot::Bool(target) => match value {
            Value::Bool(flag) => *target = *flag,
            _ => {
                return Err(ContractViolation::ExpectedBool {
                    key: key.to_string(),
                    value: value.clone(),
                }
                .into());
            }
        },

        Slot::Number(target) => {
            let literal = match value {
                Value::Text(text) => Some(text.as_str()),
                Value::List(items) => single(items).map_err(fail)?.map(String::as_str),
                Value::Bool(_) => return Err(fail(mismatch("number", value))),
            };
            if let Some(literal) = literal.filter(|literal| !literal.is_empty()) {
                target
                    .decode_json(literal)
                    .map_err(|err| fail(CoercionError::Number(err)))?;
            }
        }

        Slot::NumberList(target) => {
            let literal = match value {
                Value::Text(text) => text.clone(),
                Value::List(items) => format!("[{}]", items.join(",")),
                Value::Bool(_) => return Err(fail(mismatch("list of numbers", value))),
            };
            if !literal.is_empty() {
                target
                    .decode_json(&literal)
                    .map_err(|err| fail(CoercionError::Number(err)))?;
            }
        }

        Slot::Merge(target) => target
            .merge_value(value)
            .map_err(|err| fail(CoercionError::Merge(err)))?,

        Slot::Unsupported(type_name) => {
            return Err(ContractViolation::UnsupportedField {
                field: field.to_string(),
                type_name: type_name.to_string(),
            }
            .into());
        }
    }

    debug!(field, key, value = %value, "Bound field");
    Ok(())
}

/// Picks the only item of a list meant for a single-valued field.
fn single(items: &[String]) -> std::result::Result<Option<&String>, CoercionError> {
    match items {
        [] => Ok(None),
        [item] => Ok(Some(item)),
        _ => Err(CoercionError::TooManyValues),
    }
}

fn mismatch(expected: &'static str, value: &Value) -> CoercionError {
    CoercionError::Mismatch {
        expected,
        value: value.clone(),
    }
}
