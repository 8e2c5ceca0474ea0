//! Binding of usage-pattern parse results into typed option records.
//!
//! A usage-pattern parser (docopt and friends) turns a program's usage
//! text plus its argv into a loosely-typed [`ArgMap`]: flags map to
//! booleans, options and arguments map to strings or lists of strings.
//! This crate copies such a map into a plain Rust struct, coercing each
//! value into the field's declared type.
//!
//! - [`Schema`] / [`Field`] — the explicit field list of a record, with
//!   accessors, key tags and visibility.
//! - [`select_bindings`] / [`binding_key`] — which fields bind, and to
//!   which key. Tagged fields bind to their tag; untagged fields bind to
//!   their own name when it is all caps.
//! - [`bind`] / [`bind_with`] — the coercing copy.
//! - [`MergeValue`] — extension point for field types that coerce
//!   themselves ([`Octal`] and [`Base16`] ship with the crate).
//! - [`audit`] — every contract violation at once, without binding.
//!
//! Errors come in two kinds: [`BindError::Coercion`] for bad user input,
//! and [`BindError::Contract`] when the record disagrees with the usage
//! text. See [`BindError::is_fatal`].
//!
//! # Example
//!
//! ```
//! use docopt_merge_core::*;
//!
//! #[derive(Default)]
//! struct Opts {
//!     int: i32,
//!     oct: Octal,
//!     o: Octal,
//!     v: bool,
//!     q: bool,
//!     f: f64,
//!     ai: Vec<i32>,
//! }
//!
//! let schema = Schema::new()
//!     .field(Field::number("INT", |o: &mut Opts| &mut o.int))
//!     .field(Field::merge("OCT", |o: &mut Opts| &mut o.oct))
//!     .field(Field::merge("O", |o: &mut Opts| &mut o.o).key("-o"))
//!     .field(Field::boolean("V", |o: &mut Opts| &mut o.v).key("-v"))
//!     .field(Field::boolean("Q", |o: &mut Opts| &mut o.q).exclude())
//!     .field(Field::number("F", |o: &mut Opts| &mut o.f))
//!     .field(Field::number_list("AI", |o: &mut Opts| &mut o.ai));
//!
//! let args: ArgMap = serde_json::from_str(r#"{
//!     "INT": "-3", "OCT": "0755", "-o": "0755", "-v": true,
//!     "F": "2e2", "AI": ["1", "2", "3"]
//! }"#).unwrap();
//!
//! let mut opts = Opts::default();
//! bind(&schema, &mut opts, &args).unwrap();
//! assert_eq!(opts.int, -3);
//! assert_eq!(*opts.oct, 0o755);
//! assert_eq!(*opts.o, 0o755);
//! assert!(opts.v && !opts.q);
//! assert_eq!(opts.f, 200.0);
//! assert_eq!(opts.ai, vec![1, 2, 3]);
//! ```

mod audit;
mod bind;
mod coerce;
mod error;
mod merger;
mod schema;
mod select;
mod value;

pub use audit::audit;
pub use bind::{BindOptions, MissingKeyPolicy, bind, bind_with};
pub use error::{BindError, CoercionError, ContractViolation, MergeError, Result};
pub use merger::{Base16, MergeValue, Octal};
pub use schema::{Field, FieldKind, KeyTag, Numeric, NumericList, Schema, Visibility};
pub use select::{Binding, binding_key, select_bindings};
pub use value::{ArgMap, Value};
