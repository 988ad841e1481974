//! Typed schema fields, generated from a record's resolved overrides.

use core::fmt;
use std::sync::Arc;

use jsonrecord_core::{
    Class, CollectionKind, Config, Encoder, EnumDef, Extended, Json, RecordRef, ResolvedRecord,
    Scalar, SubtypeDef, TimestampFormat, TypeHint, Undefined,
};

/// Extra check run on a field's raw value after its type checks pass.
pub type Validator = Arc<dyn Fn(&Json) -> Result<(), String> + Send + Sync>;

/// Rewrites a field's JSON value on load or dump.
pub type Transform = Arc<dyn Fn(Json) -> Result<Json, String> + Send + Sync>;

/// The expected JSON shape of a field's value.
#[derive(Debug, Clone)]
pub enum FieldKind {
    /// Anything
    Any,
    /// Only `null`
    Null,
    /// `true` / `false`
    Bool,
    /// An integral number
    Int,
    /// Any number
    Float,
    /// A string
    Str,
    /// POSIX seconds, or an RFC 3339 string
    Timestamp,
    /// An RFC 3339 string
    IsoTimestamp,
    /// A decimal, as a string or a number
    Decimal,
    /// A UUID string
    Uuid,
    /// `null` or the inner kind
    Optional(Box<FieldKind>),
    /// An array of one kind
    Collection(CollectionKind, Box<FieldKind>),
    /// An array of fixed arity
    Tuple(Vec<FieldKind>),
    /// An object with uniformly typed keys and values
    Mapping {
        /// Kind of the decoded keys
        key: Box<FieldKind>,
        /// Kind of the values
        value: Box<FieldKind>,
    },
    /// One of a fixed set of values
    Enum(&'static EnumDef),
    /// A nested record, resolved when first needed
    Nested(RecordRef),
    /// A record selected by a discriminator key
    Subtypes(&'static SubtypeDef),
    /// Any of several kinds
    Union(Vec<FieldKind>),
}

impl FieldKind {
    /// The kind matching a declared type.
    pub fn from_hint(hint: &TypeHint) -> Self {
        match hint.classify() {
            Class::Any => FieldKind::Any,
            Class::Null => FieldKind::Null,
            Class::Scalar(Scalar::Bool) => FieldKind::Bool,
            Class::Scalar(Scalar::Int) => FieldKind::Int,
            Class::Scalar(Scalar::Float) => FieldKind::Float,
            Class::Scalar(Scalar::Str) => FieldKind::Str,
            Class::Extended(Extended::Timestamp) => FieldKind::Timestamp,
            Class::Extended(Extended::Decimal) => FieldKind::Decimal,
            Class::Extended(Extended::Uuid) => FieldKind::Uuid,
            Class::Optional(inner) => FieldKind::Optional(Box::new(Self::from_hint(&inner))),
            Class::Union(arms) => FieldKind::Union(arms.iter().map(Self::from_hint).collect()),
            Class::Collection(kind, item) => {
                FieldKind::Collection(kind, Box::new(Self::from_hint(item)))
            }
            Class::Tuple(items) => FieldKind::Tuple(items.iter().map(Self::from_hint).collect()),
            Class::Mapping(key, value) => FieldKind::Mapping {
                key: Box::new(Self::from_hint(key)),
                value: Box::new(Self::from_hint(value)),
            },
            Class::Enum(def) => FieldKind::Enum(def),
            Class::Record(record) => FieldKind::Nested(record),
            Class::Subtypes(def) => FieldKind::Subtypes(def),
        }
    }

    /// Whether `null` is a valid value of this kind.
    pub fn accepts_null(&self) -> bool {
        match self {
            FieldKind::Any | FieldKind::Null | FieldKind::Optional(_) => true,
            FieldKind::Union(arms) => arms.iter().any(FieldKind::accepts_null),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Any => f.write_str("Raw"),
            FieldKind::Null => f.write_str("Null"),
            FieldKind::Bool => f.write_str("Boolean"),
            FieldKind::Int => f.write_str("Integer"),
            FieldKind::Float => f.write_str("Float"),
            FieldKind::Str => f.write_str("String"),
            FieldKind::Timestamp => f.write_str("Timestamp"),
            FieldKind::IsoTimestamp => f.write_str("IsoDateTime"),
            FieldKind::Decimal => f.write_str("Decimal"),
            FieldKind::Uuid => f.write_str("UUID"),
            FieldKind::Optional(inner) => write!(f, "Optional({inner})"),
            FieldKind::Collection(_, item) => write!(f, "List({item})"),
            FieldKind::Tuple(items) => {
                f.write_str("Tuple(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            FieldKind::Mapping { key, value } => write!(f, "Dict({key}, {value})"),
            FieldKind::Enum(def) => write!(f, "Enum({})", def.name),
            FieldKind::Nested(record) => write!(f, "Nested({})", record.name()),
            FieldKind::Subtypes(def) => write!(f, "Nested({})", def.name),
            FieldKind::Union(_) => f.write_str("Union"),
        }
    }
}

/// One field of a schema.
#[derive(Clone)]
pub struct SchemaField {
    /// Field name as declared
    pub name: &'static str,
    /// Key of the field in JSON documents
    pub data_key: String,
    /// Expected shape of the value
    pub kind: FieldKind,
    /// Whether loading fails when the key is absent
    pub required: bool,
    /// Whether `null` is accepted
    pub allow_none: bool,
    /// The encoded default, if the field declares one
    pub default: Option<Json>,
    /// Only read on load, never written on dump
    pub load_only: bool,
    /// Only written on dump, never read on load
    pub dump_only: bool,
    /// Doc comment of the field
    pub doc: Option<&'static str>,
    /// Extra checks of the raw value
    pub validators: Vec<Validator>,
    /// Rewrites the encoded value on dump
    pub serialize: Option<Transform>,
    /// Rewrites the raw value on load, before validation
    pub deserialize: Option<Transform>,
}

impl fmt::Debug for SchemaField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaField")
            .field("name", &self.name)
            .field("data_key", &self.data_key)
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("allow_none", &self.allow_none)
            .field("default", &self.default)
            .field("load_only", &self.load_only)
            .field("dump_only", &self.dump_only)
            .field("validators", &self.validators.len())
            .finish_non_exhaustive()
    }
}

/// A hand-written schema field, replacing parts of the generated one.
///
/// Attach it to a single field with `#[record(schema_field = path)]`, where
/// `path` is a function returning a `CustomField`, or to every field of a
/// type with `Config::schema_field::<T>(CustomField::...)`. Unset parts keep
/// their generated values.
///
/// ```
/// # use jsonrecord_schema::{CustomField, FieldKind};
/// let even = CustomField::of(FieldKind::Int).validate(|value| match value.as_i64() {
///     Some(n) if n % 2 == 0 => Ok(()),
///     _ => Err("Must be even.".to_string()),
/// });
/// # let _ = even;
/// ```
#[derive(Clone, Default)]
pub struct CustomField {
    kind: Option<FieldKind>,
    required: Option<bool>,
    allow_none: Option<bool>,
    load_only: Option<bool>,
    dump_only: Option<bool>,
    validators: Vec<Validator>,
    serialize: Option<Transform>,
    deserialize: Option<Transform>,
}

impl CustomField {
    /// A custom field that changes nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A custom field of `kind`.
    pub fn of(kind: FieldKind) -> Self {
        Self::new().kind(kind)
    }

    /// Replace the expected shape.
    pub fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Replace whether the field is required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Replace whether `null` is accepted.
    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = Some(allow_none);
        self
    }

    /// Mark the field load-only.
    pub fn load_only(mut self, load_only: bool) -> Self {
        self.load_only = Some(load_only);
        self
    }

    /// Mark the field dump-only.
    pub fn dump_only(mut self, dump_only: bool) -> Self {
        self.dump_only = Some(dump_only);
        self
    }

    /// Add a check of the raw value.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&Json) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validators.push(Arc::new(f));
        self
    }

    /// Rewrite the encoded value on dump.
    pub fn serialize<F>(mut self, f: F) -> Self
    where
        F: Fn(Json) -> Result<Json, String> + Send + Sync + 'static,
    {
        self.serialize = Some(Arc::new(f));
        self
    }

    /// Rewrite the raw value on load.
    pub fn deserialize<F>(mut self, f: F) -> Self
    where
        F: Fn(Json) -> Result<Json, String> + Send + Sync + 'static,
    {
        self.deserialize = Some(Arc::new(f));
        self
    }

    fn apply(&self, field: &mut SchemaField) {
        if let Some(kind) = &self.kind {
            field.kind = kind.clone();
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(allow_none) = self.allow_none {
            field.allow_none = allow_none;
        }
        if let Some(load_only) = self.load_only {
            field.load_only = load_only;
        }
        if let Some(dump_only) = self.dump_only {
            field.dump_only = dump_only;
        }
        field.validators.extend(self.validators.iter().cloned());
        if self.serialize.is_some() {
            field.serialize = self.serialize.clone();
        }
        if self.deserialize.is_some() {
            field.deserialize = self.deserialize.clone();
        }
    }
}

impl fmt::Debug for CustomField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomField")
            .field("kind", &self.kind)
            .field("required", &self.required)
            .field("allow_none", &self.allow_none)
            .finish_non_exhaustive()
    }
}

/// Generate the schema fields of a resolved record.
///
/// The catch-all field of an `Include` record is left out: its contents
/// arrive as unknown keys.
pub(crate) fn build_fields(resolved: &ResolvedRecord, config: &Config) -> Vec<SchemaField> {
    let catch_all = match resolved.undefined() {
        Some(Undefined::Include) => resolved.catch_all().ok().flatten(),
        _ => None,
    };

    resolved
        .fields
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != catch_all)
        .map(|(_, field)| {
            let info = field.info;
            let hint = info.hint();

            let (mut kind, optional) = match FieldKind::from_hint(&hint) {
                FieldKind::Optional(inner) => (*inner, true),
                kind => (kind, false),
            };

            let iso = match &field.overrides.encoder {
                Some(Encoder::Iso8601) => true,
                Some(_) => false,
                None => config.timestamp_format == TimestampFormat::Iso8601,
            };
            if iso && matches!(kind, FieldKind::Timestamp) {
                kind = FieldKind::IsoTimestamp;
            }
            if field.overrides.decoder.is_some() {
                kind = FieldKind::Any;
            }

            let default = match info.encoded_default(config) {
                Some(Ok(value)) => Some(value),
                Some(Err(err)) => {
                    tracing::warn!(
                        record = resolved.info.name,
                        field = info.name,
                        error = %err,
                        "default value could not be encoded for the schema"
                    );
                    None
                }
                None if optional => Some(Json::Null),
                None => None,
            };
            let allow_none = optional || default.as_ref().is_some_and(Json::is_null);
            let required = default.is_none() && !config.infer_missing;

            let mut schema_field = SchemaField {
                name: info.name,
                data_key: field.wire_name.clone(),
                kind,
                required,
                allow_none,
                default,
                load_only: false,
                dump_only: false,
                doc: info.doc,
                validators: Vec::new(),
                serialize: None,
                deserialize: None,
            };

            if let Some(slot) = &field.overrides.schema_field {
                match slot.downcast_ref::<CustomField>() {
                    Some(custom) => custom.apply(&mut schema_field),
                    None => tracing::warn!(
                        record = resolved.info.name,
                        field = info.name,
                        "schema field override is not a CustomField, ignoring it"
                    ),
                }
            }
            schema_field
        })
        .collect()
}
