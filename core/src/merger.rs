//! Self-merging field types.
//!
//! Types the binder does not natively understand implement [`MergeValue`]
//! and decide for themselves how to absorb a parsed [`Value`]. Two common
//! cases ship with the crate: [`Octal`] and [`Base16`].

use std::fmt;
use std::ops::Deref;

use crate::{MergeError, Value};

/// A field type that coerces a parsed value into itself.
///
/// The binder calls [`merge_value`](MergeValue::merge_value) exactly once
/// per bind with the raw value from the parse result. Returning an error
/// aborts the bind; the error's message is reported after the binding key.
///
/// # Examples
///
/// ```
/// use docopt_merge_core::{MergeError, MergeValue, Value};
///
/// #[derive(Default)]
/// struct Upper(String);
///
/// impl MergeValue for Upper {
///     fn merge_value(&mut self, value: &Value) -> Result<(), MergeError> {
///         let text = value.as_text().ok_or("expected a single word")?;
///         self.0 = text.to_uppercase();
///         Ok(())
///     }
/// }
///
/// let mut word = Upper::default();
/// word.merge_value(&Value::from("abc")).unwrap();
/// assert_eq!(word.0, "ABC");
/// assert!(word.merge_value(&Value::Bool(true)).is_err());
/// ```
pub trait MergeValue {
    /// Updates `self` from `value`, or explains why it cannot.
    fn merge_value(&mut self, value: &Value) -> Result<(), MergeError>;
}

/// An unsigned integer written in base 8 (`0755`, `644`).
///
/// # Examples
///
/// ```
/// use docopt_merge_core::{MergeValue, Octal, Value};
///
/// let mut mode = Octal::default();
/// mode.merge_value(&Value::from("0755")).unwrap();
/// assert_eq!(*mode, 0o755);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Octal(pub u64);

impl MergeValue for Octal {
    fn merge_value(&mut self, value: &Value) -> Result<(), MergeError> {
        let Value::Text(text) = value else {
            return Err(format!("expected octal, got {value}").into());
        };
        // from_str_radix tolerates a leading '+'; plain digits only.
        if text.starts_with('+') {
            return Err(format!("invalid octal number: {text:?}").into());
        }
        self.0 = u64::from_str_radix(text, 8)?;
        Ok(())
    }
}

impl Deref for Octal {
    type Target = u64;

    fn deref(&self) -> &u64 {
        &self.0
    }
}

impl fmt::Display for Octal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            0 => f.write_str("0"),
            n => write!(f, "0{n:o}"),
        }
    }
}

/// Bytes written as a hexadecimal string (`deadbeef`).
///
/// # Examples
///
/// ```
/// use docopt_merge_core::{Base16, MergeValue, Value};
///
/// let mut key = Base16::default();
/// key.merge_value(&Value::from("C0ffee")).unwrap();
/// assert_eq!(key.as_slice(), &[0xc0, 0xff, 0xee]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Base16(pub Vec<u8>);

impl Base16 {
    /// Decoded bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl MergeValue for Base16 {
    fn merge_value(&mut self, value: &Value) -> Result<(), MergeError> {
        let Value::Text(text) = value else {
            return Err(format!("expected base16 string, got {value}").into());
        };
        if text.len() % 2 != 0 {
            return Err(format!("odd length base16 string: {text:?}").into());
        }
        if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid_hex(text));
        }
        let bytes = text
            .as_bytes()
            .chunks(2)
            .map(|pair| {
                let digits = std::str::from_utf8(pair).map_err(|_| invalid_hex(text))?;
                u8::from_str_radix(digits, 16).map_err(|_| invalid_hex(text))
            })
            .collect::<Result<Vec<u8>, MergeError>>()?;
        self.0 = bytes;
        Ok(())
    }
}

fn invalid_hex(text: &str) -> MergeError {
    format!("invalid base16 string: {text:?}").into()
}

impl fmt::Display for Base16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}
