//! Declared-type descriptions and their classification.

use core::fmt;
use std::borrow::Cow;

use crate::enums::EnumDef;
use crate::json::Json;
use crate::record::{Record, RecordInfo};

/// Plain JSON scalars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scalar {
    /// `true` / `false`
    Bool,
    /// Integral numbers
    Int,
    /// Any number
    Float,
    /// Strings
    Str,
}

/// Scalars with a dedicated encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extended {
    /// A point in time: POSIX seconds or an RFC 3339 string
    Timestamp,
    /// An exact decimal, encoded as a string
    Decimal,
    /// A UUID, encoded as a hyphenated string
    Uuid,
}

/// Homogeneous sequence containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    /// Ordered list
    List,
    /// Unordered set of distinct items
    Set,
    /// Double-ended queue
    Deque,
}

/// Lazy reference to a record's descriptor.
///
/// Hints of self-referential records stay finite because the descriptor is
/// only looked up on demand.
#[derive(Clone, Copy)]
pub struct RecordRef {
    info: fn() -> &'static RecordInfo,
}

impl RecordRef {
    /// Reference the descriptor of `R`.
    pub fn of<R: Record>() -> Self {
        RecordRef {
            info: R::record_info,
        }
    }

    /// The referenced descriptor.
    pub fn info(&self) -> &'static RecordInfo {
        (self.info)()
    }

    /// Name of the referenced record.
    pub fn name(&self) -> &'static str {
        self.info().name
    }
}

impl fmt::Debug for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordRef").field(&self.name()).finish()
    }
}

impl PartialEq for RecordRef {
    fn eq(&self, other: &Self) -> bool {
        self.info().type_id == other.info().type_id
    }
}

/// A concrete record selected by a discriminator value.
#[derive(Debug, Clone)]
pub struct SubtypeVariant {
    /// Value stored under the discriminator key
    pub discriminator: &'static str,
    /// The record this variant wraps
    pub record: RecordRef,
}

impl SubtypeVariant {
    /// A variant for `record`, identified by `rename` or else the record's name.
    pub fn new(rename: Option<&'static str>, record: RecordRef) -> Self {
        SubtypeVariant {
            discriminator: rename.unwrap_or_else(|| record.name()),
            record,
        }
    }
}

/// A family of records told apart by a discriminator key.
#[derive(Debug, Clone)]
pub struct SubtypeDef {
    /// The dispatching type
    pub name: &'static str,
    /// The discriminator key, `@type` unless configured
    pub tag: &'static str,
    /// Index into `variants` of the variant used when the key is absent
    pub base: Option<usize>,
    /// Every variant in declaration order
    pub variants: Vec<SubtypeVariant>,
}

impl SubtypeDef {
    /// The discriminator key used when none is configured.
    pub const DEFAULT_TAG: &'static str = "@type";

    /// Index of the variant selected by `value`. The base never matches by value.
    pub fn position(&self, value: &str) -> Option<usize> {
        self.variants
            .iter()
            .enumerate()
            .find(|(i, v)| Some(*i) != self.base && v.discriminator == value)
            .map(|(i, _)| i)
    }

    /// Discriminator values that select a variant.
    pub fn discriminators(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.variants
            .iter()
            .enumerate()
            .filter(move |(i, _)| Some(*i) != self.base)
            .map(|(_, v)| v.discriminator)
    }
}

/// Description of a declared field type.
#[derive(Debug, Clone)]
pub enum TypeHint {
    /// Any JSON value
    Any,
    /// Only `null`
    Null,
    /// A plain scalar
    Scalar(Scalar),
    /// A scalar with a dedicated encoding
    Extended(Extended),
    /// `null` or the inner type
    Optional(Box<TypeHint>),
    /// One of several types, without a static guarantee which
    Union {
        /// The union type
        name: &'static str,
        /// Arms in declaration order
        arms: Vec<TypeHint>,
    },
    /// A homogeneous sequence
    Collection {
        /// Which container
        kind: CollectionKind,
        /// The element type
        item: Box<TypeHint>,
    },
    /// A fixed-arity heterogeneous sequence
    Tuple(Vec<TypeHint>),
    /// A key/value mapping
    Mapping {
        /// The key type
        key: Box<TypeHint>,
        /// The value type
        value: Box<TypeHint>,
    },
    /// An enumeration of fixed values
    Enum(&'static EnumDef),
    /// A nested record
    Record(RecordRef),
    /// A family of records selected by a discriminator
    Subtypes(&'static SubtypeDef),
    /// A named wrapper around another type
    Alias {
        /// The wrapper type
        name: &'static str,
        /// The wrapped type
        inner: Box<TypeHint>,
    },
}

/// Classification of a [`TypeHint`], with aliases unwrapped.
#[derive(Debug, Clone)]
pub enum Class<'a> {
    /// Any JSON value
    Any,
    /// Only `null`
    Null,
    /// A plain scalar
    Scalar(Scalar),
    /// A scalar with a dedicated encoding
    Extended(Extended),
    /// `null` or the inner type
    Optional(Cow<'a, TypeHint>),
    /// One of several types
    Union(&'a [TypeHint]),
    /// A homogeneous sequence
    Collection(CollectionKind, &'a TypeHint),
    /// A fixed-arity sequence
    Tuple(&'a [TypeHint]),
    /// A key/value mapping
    Mapping(&'a TypeHint, &'a TypeHint),
    /// An enumeration
    Enum(&'static EnumDef),
    /// A nested record
    Record(RecordRef),
    /// A family of records
    Subtypes(&'static SubtypeDef),
}

impl TypeHint {
    /// Shorthand for `TypeHint::Optional`.
    pub fn optional(inner: TypeHint) -> Self {
        TypeHint::Optional(Box::new(inner))
    }

    /// Shorthand for a list of `item`.
    pub fn list(item: TypeHint) -> Self {
        TypeHint::Collection {
            kind: CollectionKind::List,
            item: Box::new(item),
        }
    }

    /// Shorthand for a mapping.
    pub fn mapping(key: TypeHint, value: TypeHint) -> Self {
        TypeHint::Mapping {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    /// Strip any number of alias layers.
    pub fn unaliased(&self) -> &TypeHint {
        let mut hint = self;
        while let TypeHint::Alias { inner, .. } = hint {
            hint = inner;
        }
        hint
    }

    /// Classify this hint.
    ///
    /// A union with a `null` arm classifies as optional: of its single other
    /// arm, or of a union over the remaining arms.
    pub fn classify(&self) -> Class<'_> {
        match self.unaliased() {
            TypeHint::Any => Class::Any,
            TypeHint::Null => Class::Null,
            TypeHint::Scalar(s) => Class::Scalar(*s),
            TypeHint::Extended(e) => Class::Extended(*e),
            TypeHint::Optional(inner) => Class::Optional(Cow::Borrowed(inner)),
            TypeHint::Union { name, arms } => {
                let non_null: Vec<&TypeHint> = arms
                    .iter()
                    .filter(|arm| !matches!(arm.unaliased(), TypeHint::Null))
                    .collect();
                if non_null.len() == arms.len() {
                    Class::Union(arms)
                } else if let [single] = non_null.as_slice() {
                    Class::Optional(Cow::Borrowed(*single))
                } else {
                    Class::Optional(Cow::Owned(TypeHint::Union {
                        name: *name,
                        arms: non_null.into_iter().cloned().collect(),
                    }))
                }
            }
            TypeHint::Collection { kind, item } => Class::Collection(*kind, item),
            TypeHint::Tuple(items) => Class::Tuple(items),
            TypeHint::Mapping { key, value } => Class::Mapping(key, value),
            TypeHint::Enum(def) => Class::Enum(def),
            TypeHint::Record(r) => Class::Record(*r),
            TypeHint::Subtypes(def) => Class::Subtypes(def),
            TypeHint::Alias { .. } => Class::Any,
        }
    }

    /// Whether a JSON `null` is a legitimate value of this type.
    pub fn accepts_null(&self) -> bool {
        matches!(self.classify(), Class::Any | Class::Null | Class::Optional(_))
    }

    /// Structural check: could `value` plausibly decode as this type?
    pub fn matches_shape(&self, value: &Json) -> bool {
        match self.classify() {
            Class::Any => true,
            Class::Null => value.is_null(),
            Class::Scalar(Scalar::Bool) => value.is_boolean(),
            Class::Scalar(Scalar::Int) => value.is_i64() || value.is_u64(),
            Class::Scalar(Scalar::Float) => value.is_number(),
            Class::Scalar(Scalar::Str) => value.is_string(),
            Class::Extended(Extended::Timestamp) => value.is_number() || value.is_string(),
            Class::Extended(Extended::Decimal) => value.is_string() || value.is_number(),
            Class::Extended(Extended::Uuid) => value.is_string(),
            Class::Optional(inner) => value.is_null() || inner.matches_shape(value),
            Class::Union(arms) => arms.iter().any(|arm| arm.matches_shape(value)),
            Class::Collection(..) => value.is_array(),
            Class::Tuple(items) => value.as_array().is_some_and(|a| a.len() == items.len()),
            Class::Mapping(..) => value.is_object(),
            Class::Enum(def) => def.contains(value),
            Class::Record(_) | Class::Subtypes(_) => value.is_object(),
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Any => f.write_str("any"),
            TypeHint::Null => f.write_str("null"),
            TypeHint::Scalar(Scalar::Bool) => f.write_str("bool"),
            TypeHint::Scalar(Scalar::Int) => f.write_str("int"),
            TypeHint::Scalar(Scalar::Float) => f.write_str("float"),
            TypeHint::Scalar(Scalar::Str) => f.write_str("str"),
            TypeHint::Extended(Extended::Timestamp) => f.write_str("datetime"),
            TypeHint::Extended(Extended::Decimal) => f.write_str("decimal"),
            TypeHint::Extended(Extended::Uuid) => f.write_str("uuid"),
            TypeHint::Optional(inner) => write!(f, "optional[{inner}]"),
            TypeHint::Union { name, .. } => f.write_str(name),
            TypeHint::Collection { kind, item } => {
                let kind = match kind {
                    CollectionKind::List => "list",
                    CollectionKind::Set => "set",
                    CollectionKind::Deque => "deque",
                };
                write!(f, "{kind}[{item}]")
            }
            TypeHint::Tuple(items) => {
                f.write_str("tuple[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            TypeHint::Mapping { key, value } => write!(f, "dict[{key}, {value}]"),
            TypeHint::Enum(def) => f.write_str(def.name),
            TypeHint::Record(r) => f.write_str(r.name()),
            TypeHint::Subtypes(def) => f.write_str(def.name),
            TypeHint::Alias { name, .. } => f.write_str(name),
        }
    }
}
