//! YAML field manifests and the dynamic records built from them.
//!
//! A manifest declares a record without writing Rust: each entry names a
//! field, its kind, and optionally a key tag, an exclusion or private
//! marker, and an initial value.
//!
//! # Example YAML
//!
//! ```yaml
//! fields:
//!   - name: INT
//!     kind: int
//!   - name: O
//!     kind: octal
//!     key: "-o"
//!   - name: Q
//!     kind: bool
//!     exclude: true
//!   - name: PORT
//!     kind: int
//!     default: 8080
//! ```

use std::collections::HashSet;
use std::path::Path;

use docopt_merge_core::{Base16, Field, MergeValue, Octal, Schema, Value};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};

use crate::error::{CliError, Result};

/// Field kinds a manifest can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Kind {
    String,
    Strings,
    Bool,
    Int,
    Float,
    Ints,
    Floats,
    Octal,
    Base16,
    /// A field the binder cannot fill; binding it is a contract violation.
    Opaque,
}

/// One manifest entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub kind: Kind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default)]
    pub exclude: bool,
    #[serde(default)]
    pub private: bool,
    /// Initial value, kept when binding leaves the field unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
}

/// A record declaration loaded from YAML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub fields: Vec<FieldSpec>,
}

impl Manifest {
    /// Loads a manifest from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CliError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| CliError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds the schema and an initialized record for this manifest.
    pub fn build(&self) -> Result<(Schema<DynamicRecord>, DynamicRecord)> {
        let mut seen = HashSet::new();
        let mut schema = Schema::new();
        let mut record = DynamicRecord::default();

        for spec in &self.fields {
            if spec.name.trim().is_empty() {
                return Err(CliError::Manifest("field name cannot be empty".to_string()));
            }
            if !seen.insert(spec.name.as_str()) {
                return Err(CliError::Manifest(format!(
                    "duplicate field: {}",
                    spec.name
                )));
            }

            let slot = record.allocate(spec)?;
            let mut field = slot_field(spec.name.clone(), spec.kind, slot);
            if let Some(key) = &spec.key {
                field = field.key(key.clone());
            }
            if spec.exclude {
                field = field.exclude();
            }
            if spec.private {
                field = field.private();
            }
            schema.push(field);
        }

        Ok((schema, record))
    }
}

/// Field storage for a manifest-declared record, one vector per kind.
///
/// Each declared field owns one slot in the vector of its kind; the
/// schema's accessors index straight into those vectors.
#[derive(Debug, Default)]
pub struct DynamicRecord {
    layout: Vec<(String, Kind, usize)>,
    strings: Vec<String>,
    string_lists: Vec<Vec<String>>,
    bools: Vec<bool>,
    ints: Vec<i64>,
    floats: Vec<f64>,
    int_lists: Vec<Vec<i64>>,
    float_lists: Vec<Vec<f64>>,
    octals: Vec<Octal>,
    hexes: Vec<Base16>,
}

impl DynamicRecord {
    /// Reserves storage for `spec` and returns its slot index.
    fn allocate(&mut self, spec: &FieldSpec) -> Result<usize> {
        let invalid = || {
            CliError::Manifest(format!(
                "default for {} is not a valid {:?} value",
                spec.name, spec.kind
            ))
        };
        let default = spec.default.as_ref();

        let slot = match spec.kind {
            Kind::String => {
                let value = parse_default(default, string).ok_or_else(invalid)?;
                push(&mut self.strings, value)
            }
            Kind::Strings => {
                let value = parse_default(default, strings).ok_or_else(invalid)?;
                push(&mut self.string_lists, value)
            }
            Kind::Bool => {
                let value = parse_default(default, Json::as_bool).ok_or_else(invalid)?;
                push(&mut self.bools, value)
            }
            Kind::Int => {
                let value = parse_default(default, Json::as_i64).ok_or_else(invalid)?;
                push(&mut self.ints, value)
            }
            Kind::Float => {
                let value = parse_default(default, Json::as_f64).ok_or_else(invalid)?;
                push(&mut self.floats, value)
            }
            Kind::Ints => {
                let value = parse_default(default, ints).ok_or_else(invalid)?;
                push(&mut self.int_lists, value)
            }
            Kind::Floats => {
                let value = parse_default(default, floats).ok_or_else(invalid)?;
                push(&mut self.float_lists, value)
            }
            Kind::Octal => {
                let value =
                    parse_default(default, |v| v.as_u64().map(Octal)).ok_or_else(invalid)?;
                push(&mut self.octals, value)
            }
            Kind::Base16 => {
                let value = parse_default(default, base16).ok_or_else(invalid)?;
                push(&mut self.hexes, value)
            }
            Kind::Opaque => 0,
        };

        self.layout.push((spec.name.clone(), spec.kind, slot));
        Ok(slot)
    }

    /// Renders the record as a JSON object keyed by field name.
    pub fn to_json(&self) -> Json {
        let mut object = Map::new();
        for (name, kind, slot) in &self.layout {
            let slot = *slot;
            let value = match kind {
                Kind::String => Json::from(self.strings[slot].clone()),
                Kind::Strings => Json::from(self.string_lists[slot].clone()),
                Kind::Bool => Json::from(self.bools[slot]),
                Kind::Int => Json::from(self.ints[slot]),
                Kind::Float => Json::from(self.floats[slot]),
                Kind::Ints => Json::from(self.int_lists[slot].clone()),
                Kind::Floats => Json::from(self.float_lists[slot].clone()),
                Kind::Octal => Json::from(self.octals[slot].0),
                Kind::Base16 => Json::from(self.hexes[slot].to_string()),
                Kind::Opaque => Json::Null,
            };
            object.insert(name.clone(), value);
        }
        Json::Object(object)
    }
}

fn push<V>(values: &mut Vec<V>, value: V) -> usize {
    values.push(value);
    values.len() - 1
}

/// Applies `parse` to an explicit default, or falls back to `V::default()`.
fn parse_default<V: Default>(
    default: Option<&Json>,
    parse: impl Fn(&Json) -> Option<V>,
) -> Option<V> {
    match default {
        None => Some(V::default()),
        Some(value) => parse(value),
    }
}

fn string(value: &Json) -> Option<String> {
    value.as_str().map(String::from)
}

fn strings(value: &Json) -> Option<Vec<String>> {
    value.as_array()?.iter().map(string).collect()
}

fn ints(value: &Json) -> Option<Vec<i64>> {
    value.as_array()?.iter().map(Json::as_i64).collect()
}

fn floats(value: &Json) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Json::as_f64).collect()
}

fn base16(value: &Json) -> Option<Base16> {
    let mut bytes = Base16::default();
    bytes.merge_value(&Value::from(value.as_str()?)).ok()?;
    Some(bytes)
}

/// Builds a schema field whose accessor indexes `slot` in the vector for
/// `kind`.
fn slot_field(name: String, kind: Kind, slot: usize) -> Field<DynamicRecord> {
    match kind {
        Kind::String => Field::text(name, move |r: &mut DynamicRecord| &mut r.strings[slot]),
        Kind::Strings => {
            Field::text_list(name, move |r: &mut DynamicRecord| &mut r.string_lists[slot])
        }
        Kind::Bool => Field::boolean(name, move |r: &mut DynamicRecord| &mut r.bools[slot]),
        Kind::Int => Field::number(name, move |r: &mut DynamicRecord| &mut r.ints[slot]),
        Kind::Float => Field::number(name, move |r: &mut DynamicRecord| &mut r.floats[slot]),
        Kind::Ints => {
            Field::number_list(name, move |r: &mut DynamicRecord| &mut r.int_lists[slot])
        }
        Kind::Floats => {
            Field::number_list(name, move |r: &mut DynamicRecord| &mut r.float_lists[slot])
        }
        Kind::Octal => Field::merge(name, move |r: &mut DynamicRecord| &mut r.octals[slot]),
        Kind::Base16 => Field::merge(name, move |r: &mut DynamicRecord| &mut r.hexes[slot]),
        Kind::Opaque => Field::unsupported(name, "opaque"),
    }
}

#[cfg(test)]
mod tests {
    use docopt_merge_core::{ArgMap, bind, select_bindings};

    use super::*;

    fn manifest(yaml: &str) -> Manifest {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_build_applies_tags_and_defaults() {
        let manifest = manifest(
            r#"
fields:
  - name: PORT
    kind: int
    default: 8080
  - name: verbose
    kind: bool
    key: "-v"
  - name: Q
    kind: bool
    exclude: true
    default: true
  - name: HIDDEN
    kind: string
    private: true
"#,
        );
        let (schema, record) = manifest.build().unwrap();

        let keys: Vec<_> = select_bindings(&schema).iter().map(|b| b.key).collect();
        assert_eq!(keys, vec!["PORT", "-v"]);
        assert_eq!(
            record.to_json(),
            serde_json::json!({"PORT": 8080, "verbose": false, "Q": true, "HIDDEN": ""})
        );
    }

    #[test]
    fn test_build_rejects_duplicate_names() {
        let manifest = manifest("fields:\n  - {name: A, kind: int}\n  - {name: A, kind: bool}\n");
        let err = manifest.build().unwrap_err();
        assert_eq!(err.to_string(), "invalid manifest: duplicate field: A");
    }

    #[test]
    fn test_build_rejects_mistyped_default() {
        let manifest = manifest("fields:\n  - {name: N, kind: int, default: many}\n");
        assert!(matches!(manifest.build(), Err(CliError::Manifest(_))));
    }

    #[test]
    fn test_dynamic_record_binds_every_kind() {
        let manifest = manifest(
            r#"
fields:
  - {name: S, kind: string}
  - {name: SS, kind: strings}
  - {name: B, kind: bool}
  - {name: I, kind: int}
  - {name: F, kind: float}
  - {name: II, kind: ints}
  - {name: FF, kind: floats}
  - {name: O, kind: octal}
  - {name: H, kind: base16}
"#,
        );
        let (schema, mut record) = manifest.build().unwrap();
        let args: ArgMap = serde_json::from_value(serde_json::json!({
            "S": "text",
            "SS": ["a", "b"],
            "B": true,
            "I": "-3",
            "F": "2e2",
            "II": ["1", "2"],
            "FF": "[0.5]",
            "O": "0755",
            "H": "beef",
        }))
        .unwrap();

        bind(&schema, &mut record, &args).unwrap();
        assert_eq!(
            record.to_json(),
            serde_json::json!({
                "S": "text",
                "SS": ["a", "b"],
                "B": true,
                "I": -3,
                "F": 200.0,
                "II": [1, 2],
                "FF": [0.5],
                "O": 493,
                "H": "beef",
            })
        );
    }

    #[test]
    fn test_opaque_field_is_contract_violation() {
        let manifest = manifest("fields:\n  - {name: ENV, kind: opaque}\n");
        let (schema, mut record) = manifest.build().unwrap();
        let args = ArgMap::from([("ENV".to_string(), Value::from("x"))]);
        let err = bind(&schema, &mut record, &args).unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_base16_default() {
        assert_eq!(base16(&Json::from("0aff")), Some(Base16(vec![0x0a, 0xff])));
        assert_eq!(base16(&Json::from("0g")), None);
        assert_eq!(base16(&Json::from("+f")), None);
        assert_eq!(base16(&Json::from(12)), None);

        let manifest = manifest("fields:\n  - {name: H, kind: base16, default: C0ffee}\n");
        let (_, record) = manifest.build().unwrap();
        assert_eq!(record.to_json(), serde_json::json!({"H": "c0ffee"}));
    }
}
