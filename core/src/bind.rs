//! Binding a parse result into a record.
//!
//! # Example
//!
//! ```
//! use docopt_merge_core::*;
//!
//! #[derive(Default)]
//! struct Opts {
//!     verbose: bool,
//!     output: String,
//!     jobs: u32,
//!     files: Vec<String>,
//! }
//!
//! let schema = Schema::new()
//!     .field(Field::boolean("verbose", |o: &mut Opts| &mut o.verbose).key("-v"))
//!     .field(Field::text("output", |o: &mut Opts| &mut o.output).key("--output"))
//!     .field(Field::number("jobs", |o: &mut Opts| &mut o.jobs).key("--jobs"))
//!     .field(Field::text_list("FILE", |o: &mut Opts| &mut o.files));
//!
//! let mut args = ArgMap::new();
//! args.insert("-v".into(), Value::Bool(true));
//! args.insert("--output".into(), Value::from("out.txt"));
//! args.insert("--jobs".into(), Value::from("4"));
//! args.insert("FILE".into(), Value::from(vec!["a.rs", "b.rs"]));
//!
//! let mut opts = Opts::default();
//! bind(&schema, &mut opts, &args).unwrap();
//! assert!(opts.verbose);
//! assert_eq!(opts.output, "out.txt");
//! assert_eq!(opts.jobs, 4);
//! assert_eq!(opts.files, vec!["a.rs", "b.rs"]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::coerce::coerce;
use crate::error::{ContractViolation, Result};
use crate::schema::Schema;
use crate::select::select_bindings;
use crate::ArgMap;

/// What to do when a bound field's key is absent from the parse result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingKeyPolicy {
    /// Report a [`ContractViolation::MissingKey`] (the default).
    #[default]
    Fatal,
    /// Log a warning and leave the field untouched.
    LeaveUnchanged,
}

/// Tunables for [`bind_with`].
///
/// # Examples
///
/// ```
/// use docopt_merge_core::{BindOptions, MissingKeyPolicy};
///
/// let options: BindOptions = serde_json::from_str(r#"{"missing_key": "leave_unchanged"}"#).unwrap();
/// assert_eq!(options.missing_key, MissingKeyPolicy::LeaveUnchanged);
/// assert_eq!(BindOptions::default().missing_key, MissingKeyPolicy::Fatal);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindOptions {
    /// Handling of keys the parse result does not define.
    pub missing_key: MissingKeyPolicy,
}

/// Binds `args` into `record` with default options.
///
/// Fields are visited in declaration order. The first failure stops the
/// pass: fields bound before it keep their new values, the failing field
/// and everything after it are untouched.
///
/// # Errors
///
/// Returns [`BindError::Coercion`](crate::BindError::Coercion) for input
/// that cannot be coerced, and [`BindError::Contract`](crate::BindError::Contract)
/// when the schema disagrees with the parse result. Callers should treat
/// the latter as fatal.
pub fn bind<T>(schema: &Schema<T>, record: &mut T, args: &ArgMap) -> Result<()> {
    bind_with(schema, record, args, &BindOptions::default())
}

/// Binds `args` into `record`.
///
/// # Errors
///
/// See [`bind`].
pub fn bind_with<T>(
    schema: &Schema<T>,
    record: &mut T,
    args: &ArgMap,
    options: &BindOptions,
) -> Result<()> {
    for binding in select_bindings(schema) {
        let Some(value) = args.get(binding.key) else {
            match options.missing_key {
                MissingKeyPolicy::Fatal => {
                    return Err(ContractViolation::MissingKey(binding.key.to_string()).into());
                }
                MissingKeyPolicy::LeaveUnchanged => {
                    warn!(
                        field = binding.field,
                        key = binding.key,
                        "Key not defined in parse result; field left unchanged"
                    );
                    continue;
                }
            }
        };

        let field = &schema.fields()[binding.index];
        coerce(binding.field, binding.key, field.slot(record), value)?;
    }

    debug!(fields = schema.len(), keys = args.len(), "Bind complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BindError, Field, Value};

    #[derive(Debug, Default, PartialEq)]
    struct Opts {
        name: String,
        count: i32,
        tail: String,
    }

    fn schema() -> Schema<Opts> {
        Schema::new()
            .field(Field::text("NAME", |o: &mut Opts| &mut o.name))
            .field(Field::number("COUNT", |o: &mut Opts| &mut o.count))
            .field(Field::text("TAIL", |o: &mut Opts| &mut o.tail))
    }

    fn args(pairs: &[(&str, Value)]) -> ArgMap {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn test_missing_key_is_fatal_by_default() {
        let mut opts = Opts::default();
        let err = bind(
            &schema(),
            &mut opts,
            &args(&[("NAME", Value::from("a")), ("TAIL", Value::from("z"))]),
        )
        .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "contract violation: value \"COUNT\" not defined in documentation"
        );
        assert_eq!(opts.name, "a");
        assert_eq!(opts.tail, "");
    }

    #[test]
    fn test_missing_key_left_unchanged_when_relaxed() {
        let mut opts = Opts {
            count: 3,
            ..Opts::default()
        };
        let options = BindOptions {
            missing_key: MissingKeyPolicy::LeaveUnchanged,
        };
        bind_with(
            &schema(),
            &mut opts,
            &args(&[("NAME", Value::from("a")), ("TAIL", Value::from("z"))]),
            &options,
        )
        .unwrap();
        assert_eq!(opts.count, 3);
        assert_eq!(opts.tail, "z");
    }

    #[test]
    fn test_first_error_stops_the_pass() {
        let mut opts = Opts::default();
        let err = bind(
            &schema(),
            &mut opts,
            &args(&[
                ("NAME", Value::from("a")),
                ("COUNT", Value::from(vec!["1", "2"])),
                ("TAIL", Value::from("z")),
            ]),
        )
        .unwrap_err();
        assert!(matches!(err, BindError::Coercion { ref key, .. } if key == "COUNT"));
        assert_eq!(opts.name, "a");
        assert_eq!(opts.count, 0);
        assert_eq!(opts.tail, "");
    }

    #[test]
    fn test_extra_keys_are_ignored() {
        let mut opts = Opts::default();
        bind(
            &schema(),
            &mut opts,
            &args(&[
                ("NAME", Value::from("a")),
                ("COUNT", Value::from("2")),
                ("TAIL", Value::from("z")),
                ("--help", Value::Bool(false)),
            ]),
        )
        .unwrap();
        assert_eq!(opts.count, 2);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: BindOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, BindOptions::default());
    }
}
