//! Explicit record schemas.
//!
//! A [`Schema`] lists the fields of a target record in declaration order.
//! Each [`Field`] carries its name, its declared [`FieldKind`], its
//! visibility and key tag, and an accessor that borrows the field out of a
//! record so the binder can write it in place.
//!
//! # Example
//!
//! ```
//! use docopt_merge_core::{Field, Schema};
//!
//! #[derive(Default)]
//! struct Opts {
//!     json_input: bool,
//!     write_file: String,
//!     n: i32,
//!     url: Vec<String>,
//!     home: String,
//! }
//!
//! let schema = Schema::new()
//!     .field(Field::boolean("json_input", |o: &mut Opts| &mut o.json_input).key("-j"))
//!     .field(Field::text("write_file", |o: &mut Opts| &mut o.write_file).key("-w"))
//!     .field(Field::number("n", |o: &mut Opts| &mut o.n).key("-n"))
//!     .field(Field::text_list("URL", |o: &mut Opts| &mut o.url))
//!     .field(Field::text("HOME", |o: &mut Opts| &mut o.home).exclude());
//!
//! assert_eq!(schema.len(), 5);
//! ```

use std::any::type_name;
use std::borrow::Cow;
use std::fmt;

use serde::de::{DeserializeOwned, Error as _};

use crate::MergeValue;

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `String`.
    Text,
    /// `Vec<String>`.
    TextList,
    /// `bool`.
    Bool,
    /// A numeric scalar; carries the Rust type name.
    Number(&'static str),
    /// A `Vec` of numerics; carries the Rust type name.
    NumberList(&'static str),
    /// A [`MergeValue`] implementation; carries the Rust type name.
    Merge(&'static str),
    /// A type the binder does not support; carries the declared type name.
    Unsupported(&'static str),
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => f.write_str("string"),
            FieldKind::TextList => f.write_str("[string]"),
            FieldKind::Bool => f.write_str("bool"),
            FieldKind::Number(name) | FieldKind::Merge(name) => {
                f.write_str(short_type_name(name))
            }
            FieldKind::NumberList(name) => {
                let element = name
                    .split_once('<')
                    .map_or(*name, |(_, rest)| rest.trim_end_matches('>'));
                write!(f, "[{}]", short_type_name(element))
            }
            FieldKind::Unsupported(name) => f.write_str(name),
        }
    }
}

/// Strips module paths from a non-generic type name (`my::Octal` becomes
/// `Octal`); generic names are returned unchanged.
fn short_type_name(name: &str) -> &str {
    if name.contains('<') {
        return name;
    }
    name.rsplit("::").next().unwrap_or(name)
}

/// Whether a field is part of the record's public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Bound by the selector (the default).
    #[default]
    Public,
    /// Never bound, regardless of name or tag.
    Private,
}

/// Explicit key tag attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyTag {
    /// No tag; the field binds by its own name if that name is all caps.
    #[default]
    Untagged,
    /// Bind to this key.
    Key(String),
    /// Never bind.
    Excluded,
}

/// Numeric scalars decoded from a JSON number literal.
pub trait Numeric {
    /// Replaces `self` with the value decoded from `literal`.
    fn decode_json(&mut self, literal: &str) -> serde_json::Result<()>;
}

/// Numeric sequences decoded from a JSON array literal.
pub trait NumericList {
    /// Replaces `self` with the array decoded from `literal`.
    fn decode_json(&mut self, literal: &str) -> serde_json::Result<()>;
}

/// Decodes `literal`, rejecting values `in_range` refuses.
fn decode<V: DeserializeOwned>(
    literal: &str,
    in_range: impl Fn(&V) -> bool,
) -> serde_json::Result<V> {
    let value = serde_json::from_str(literal)?;
    if !in_range(&value) {
        return Err(serde_json::Error::custom(format!(
            "number out of range: {literal}"
        )));
    }
    Ok(value)
}

fn unbounded<N>(_: N) -> bool {
    true
}

macro_rules! impl_numeric {
    ($in_range:path; $($ty:ty),* $(,)?) => {$(
        impl Numeric for $ty {
            fn decode_json(&mut self, literal: &str) -> serde_json::Result<()> {
                *self = decode(literal, |value: &$ty| $in_range(*value))?;
                Ok(())
            }
        }

        impl NumericList for Vec<$ty> {
            fn decode_json(&mut self, literal: &str) -> serde_json::Result<()> {
                *self = decode(literal, |values: &Vec<$ty>| {
                    values.iter().all(|value| $in_range(*value))
                })?;
                Ok(())
            }
        }
    )*};
}

// Integer overflow is already a decode error. Floats are narrowed to
// infinity instead, so they are checked after decoding.
impl_numeric!(unbounded; i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
impl_numeric!(f32::is_finite; f32);
impl_numeric!(f64::is_finite; f64);

/// Mutable view of one field, handed to the coercer.
pub(crate) enum Slot<'a> {
    Text(&'a mut String),
    TextList(&'a mut Vec<String>),
    Bool(&'a mut bool),
    Number(&'a mut dyn Numeric),
    NumberList(&'a mut dyn NumericList),
    Merge(&'a mut dyn MergeValue),
    Unsupported(&'static str),
}

type Accessor<T> = Box<dyn for<'a> Fn(&'a mut T) -> Slot<'a> + Send + Sync>;

/// One field of a target record.
///
/// Built with one of the typed constructors, then refined with
/// [`key`](Field::key), [`exclude`](Field::exclude) or
/// [`private`](Field::private).
pub struct Field<T> {
    name: Cow<'static, str>,
    kind: FieldKind,
    visibility: Visibility,
    tag: KeyTag,
    access: Accessor<T>,
}

impl<T: 'static> Field<T> {
    fn new<F>(name: impl Into<Cow<'static, str>>, kind: FieldKind, access: F) -> Self
    where
        F: for<'a> Fn(&'a mut T) -> Slot<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            kind,
            visibility: Visibility::Public,
            tag: KeyTag::Untagged,
            access: Box::new(access),
        }
    }

    /// A `String` field.
    pub fn text<F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        F: Fn(&mut T) -> &mut String + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Text, move |record| Slot::Text(get(record)))
    }

    /// A `Vec<String>` field.
    pub fn text_list<F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        F: Fn(&mut T) -> &mut Vec<String> + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::TextList, move |record| {
            Slot::TextList(get(record))
        })
    }

    /// A `bool` field, bound from a flag.
    pub fn boolean<F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        F: Fn(&mut T) -> &mut bool + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Bool, move |record| Slot::Bool(get(record)))
    }

    /// A numeric scalar field (any primitive integer or float).
    pub fn number<N, F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        N: Numeric + 'static,
        F: Fn(&mut T) -> &mut N + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Number(type_name::<N>()), move |record| {
            Slot::Number(get(record))
        })
    }

    /// A `Vec` of numerics.
    pub fn number_list<L, F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        L: NumericList + 'static,
        F: Fn(&mut T) -> &mut L + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::NumberList(type_name::<L>()), move |record| {
            Slot::NumberList(get(record))
        })
    }

    /// A field whose type coerces itself through [`MergeValue`].
    pub fn merge<M, F>(name: impl Into<Cow<'static, str>>, get: F) -> Self
    where
        M: MergeValue + 'static,
        F: Fn(&mut T) -> &mut M + Send + Sync + 'static,
    {
        Self::new(name, FieldKind::Merge(type_name::<M>()), move |record| {
            Slot::Merge(get(record))
        })
    }

    /// A field of a type the binder cannot coerce into.
    ///
    /// Binding it is a contract violation unless it is
    /// [excluded](Field::exclude) or [private](Field::private).
    pub fn unsupported(name: impl Into<Cow<'static, str>>, type_name: &'static str) -> Self {
        Self::new(name, FieldKind::Unsupported(type_name), move |_| {
            Slot::Unsupported(type_name)
        })
    }
}

impl<T> Field<T> {
    /// Binds this field to `key` instead of its name.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.tag = KeyTag::Key(key.into());
        self
    }

    /// Marks this field as never bound.
    pub fn exclude(mut self) -> Self {
        self.tag = KeyTag::Excluded;
        self
    }

    /// Marks this field as outside the public contract.
    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    /// Declared name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Declared visibility.
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Key tag.
    pub fn tag(&self) -> &KeyTag {
        &self.tag
    }

    pub(crate) fn slot<'a>(&self, record: &'a mut T) -> Slot<'a> {
        (self.access)(record)
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("visibility", &self.visibility)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

/// Ordered field list of a target record.
///
/// Built once, typically next to the record type, and reused for every
/// bind.
pub struct Schema<T> {
    fields: Vec<Field<T>>,
}

impl<T> Schema<T> {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Appends a field, builder style.
    pub fn field(mut self, field: Field<T>) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a field.
    pub fn push(&mut self, field: Field<T>) {
        self.fields.push(field);
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[Field<T>] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<T> Default for Schema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}
