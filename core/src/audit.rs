//! Contract audit.
//!
//! [`audit`] checks a schema against a parse result without touching a
//! record, collecting every [`ContractViolation`] a bind would hit. Useful
//! in tests that pin a record type to its usage text, where a bind would
//! stop at the first problem.
//!
//! # Examples
//!
//! ```
//! use docopt_merge_core::*;
//!
//! #[derive(Default)]
//! struct Opts { verbose: bool, file: String }
//!
//! let schema = Schema::new()
//!     .field(Field::boolean("verbose", |o: &mut Opts| &mut o.verbose).key("-v"))
//!     .field(Field::text("FILE", |o: &mut Opts| &mut o.file));
//!
//! let mut args = ArgMap::new();
//! args.insert("-v".into(), Value::from("yes"));
//!
//! let violations = audit(&schema, &args);
//! assert_eq!(violations.len(), 2);
//! assert!(violations.contains(&ContractViolation::MissingKey("FILE".into())));
//! ```

use crate::error::ContractViolation;
use crate::schema::{FieldKind, Schema};
use crate::select::select_bindings;
use crate::{ArgMap, Value};

/// Lists every contract violation between `schema` and `args`, in field
/// declaration order.
///
/// An empty result means a [`bind`](crate::bind()) can only fail on user
/// input, never on the record's shape.
pub fn audit<T>(schema: &Schema<T>, args: &ArgMap) -> Vec<ContractViolation> {
    let mut violations = Vec::new();

    for binding in select_bindings(schema) {
        let kind = schema.fields()[binding.index].kind();

        let Some(value) = args.get(binding.key) else {
            violations.push(ContractViolation::MissingKey(binding.key.to_string()));
            continue;
        };

        match (kind, value) {
            (FieldKind::Bool, Value::Bool(_)) => {}
            (FieldKind::Bool, _) => violations.push(ContractViolation::ExpectedBool {
                key: binding.key.to_string(),
                value: value.clone(),
            }),
            (FieldKind::Unsupported(type_name), _) => {
                violations.push(ContractViolation::UnsupportedField {
                    field: binding.field.to_string(),
                    type_name: type_name.to_string(),
                });
            }
            _ => {}
        }
    }

    violations
}
