//! Field selection: which fields bind, and to which key.

use crate::schema::{Field, KeyTag, Schema, Visibility};

/// A field selected for binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding<'s> {
    /// Position of the field in its schema.
    pub index: usize,
    /// Declared field name.
    pub field: &'s str,
    /// Key looked up in the parse result.
    pub key: &'s str,
}

/// Resolves the binding key of a single field.
///
/// Private and excluded fields never bind. A tagged field binds to its tag.
/// An untagged field binds to its own name when that name is all caps
/// (`FILE`, `AI`), and is otherwise left alone.
///
/// # Examples
///
/// ```
/// use docopt_merge_core::{Field, binding_key};
///
/// struct Opts { file: String, verbose: bool }
///
/// let file = Field::text("FILE", |o: &mut Opts| &mut o.file);
/// assert_eq!(binding_key(&file), Some("FILE"));
///
/// let verbose = Field::boolean("verbose", |o: &mut Opts| &mut o.verbose);
/// assert_eq!(binding_key(&verbose), None);
/// assert_eq!(binding_key(&verbose.key("-v")), Some("-v"));
/// ```
pub fn binding_key<T>(field: &Field<T>) -> Option<&str> {
    if field.visibility() == Visibility::Private {
        return None;
    }
    match field.tag() {
        KeyTag::Excluded => None,
        KeyTag::Key(key) => Some(key),
        KeyTag::Untagged if is_all_caps(field.name()) => Some(field.name()),
        KeyTag::Untagged => None,
    }
}

fn is_all_caps(name: &str) -> bool {
    name.to_uppercase() == name
}

/// Lists the fields of `schema` that bind, in declaration order.
///
/// Two fields may resolve to the same key; both are returned and both
/// receive the same value.
pub fn select_bindings<T>(schema: &Schema<T>) -> Vec<Binding<'_>> {
    schema
        .fields()
        .iter()
        .enumerate()
        .filter_map(|(index, field)| {
            binding_key(field).map(|key| Binding {
                index,
                field: field.name(),
                key,
            })
        })
        .collect()
}
