//! Loosely-typed values produced by a usage-pattern parser.
//!
//! A usage-pattern parser hands back one [`Value`] per documented flag,
//! option or positional argument. Flags become [`Value::Bool`], options and
//! arguments that occur once become [`Value::Text`], and repeatable
//! elements become [`Value::List`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Parse result mapping: binding key to parsed value.
///
/// Keys are the literal names used in the usage pattern (`"-v"`,
/// `"--output"`, `"FILE"`, `"<name>"`).
pub type ArgMap = HashMap<String, Value>;

/// A single parsed value.
///
/// Serializes untagged, so the JSON an upstream parser emits (`true`,
/// `"text"`, `["a", "b"]`) deserializes directly into an [`ArgMap`].
///
/// # Examples
///
/// ```
/// use docopt_merge_core::{ArgMap, Value};
///
/// let args: ArgMap = serde_json::from_str(r#"{"-v": true, "FILE": ["a", "b"]}"#).unwrap();
/// assert_eq!(args["-v"], Value::Bool(true));
/// assert_eq!(args["FILE"], Value::from(vec!["a", "b"]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Presence or absence of a flag.
    Bool(bool),
    /// A single option or argument value.
    Text(String),
    /// Every value of a repeatable option or argument, in order.
    List(Vec<String>),
}

impl Value {
    /// Returns the text if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the flag state if this is a [`Value::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the items if this is a [`Value::List`].
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Short name of the variant, used in mismatch messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Text(_) => "string",
            Value::List(_) => "list",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(flag) => write!(f, "{flag}"),
            Value::Text(text) => write!(f, "{text:?}"),
            Value::List(items) => write!(f, "{items:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(flag: bool) -> Self {
        Value::Bool(flag)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Value::List(items.into_iter().map(String::from).collect())
    }
}
