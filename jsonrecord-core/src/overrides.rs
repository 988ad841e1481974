//! Per-field overrides and their resolution.
//!
//! Three layers contribute to a field's effective behavior, lowest first:
//! global defaults registered on [`Config`] for the field's exact type, the
//! record-level letter case, and the field's own metadata. A later layer only
//! replaces the attributes it actually sets.

use core::any::{Any, type_name};
use core::fmt::{self, Display};
use std::sync::Arc;

use crate::codec::Codec;
use crate::config::{Config, TimestampFormat};
use crate::error::{Error, ErrorKind, UndefinedProblem};
use crate::json::Json;
use crate::letter_case::LetterCase;
use crate::record::{FieldInfo, RecordInfo};
use crate::undefined::Undefined;

type EncodeFn = dyn Fn(&dyn Any, &Config) -> Result<Json, Error> + Send + Sync;
type DecodeFn = dyn Fn(Json, &Config) -> Result<Box<dyn Any>, Error> + Send + Sync;
type PredicateFn = dyn Fn(&dyn Any) -> Option<bool> + Send + Sync;

/// How a field's value becomes JSON.
#[derive(Clone)]
pub enum Encoder {
    /// Timestamps as RFC 3339 strings
    Iso8601,
    /// Timestamps as POSIX seconds
    Posix,
    /// A user function of the field's type
    Custom {
        /// The type the function accepts
        type_name: &'static str,
        /// The type-erased function
        f: Arc<EncodeFn>,
    },
}

impl Encoder {
    /// Encode `T` values with `f`.
    pub fn custom<T, F>(f: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> Json + Send + Sync + 'static,
    {
        Self::try_custom::<T, core::convert::Infallible, _>(move |v| Ok(f(v)))
    }

    /// Encode `T` values with a fallible `f`.
    pub fn try_custom<T, E, F>(f: F) -> Self
    where
        T: 'static,
        E: Display,
        F: Fn(&T) -> Result<Json, E> + Send + Sync + 'static,
    {
        Encoder::Custom {
            type_name: type_name::<T>(),
            f: Arc::new(move |value: &dyn Any, _config: &Config| {
                let value = value.downcast_ref::<T>().ok_or_else(|| {
                    Error::new(ErrorKind::OverrideMismatch {
                        expected: type_name::<T>(),
                    })
                })?;
                f(value).map_err(Error::custom)
            }),
        }
    }

    /// A named strategy: `"iso8601"` or `"posix"`.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "iso8601" | "iso" => Some(Encoder::Iso8601),
            "posix" | "timestamp" => Some(Encoder::Posix),
            _ => None,
        }
    }

    /// Encode `value` with this strategy.
    pub fn encode<T: Codec>(&self, value: &T, config: &Config) -> Result<Json, Error> {
        match self {
            Encoder::Iso8601 => {
                value.encode(&config.clone().timestamp_format(TimestampFormat::Iso8601))
            }
            Encoder::Posix => {
                value.encode(&config.clone().timestamp_format(TimestampFormat::Posix))
            }
            Encoder::Custom { f, .. } => f(value as &dyn Any, config),
        }
    }
}

impl fmt::Debug for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoder::Iso8601 => f.write_str("Iso8601"),
            Encoder::Posix => f.write_str("Posix"),
            Encoder::Custom { type_name, .. } => write!(f, "Custom({type_name})"),
        }
    }
}

/// How a field's value is rebuilt from JSON.
#[derive(Clone)]
pub struct Decoder {
    type_name: &'static str,
    f: Arc<DecodeFn>,
}

impl Decoder {
    /// Decode `T` values with `f`.
    pub fn custom<T, F>(f: F) -> Self
    where
        T: 'static,
        F: Fn(Json) -> T + Send + Sync + 'static,
    {
        Self::try_custom::<T, core::convert::Infallible, _>(move |v| Ok(f(v)))
    }

    /// Decode `T` values with a fallible `f`.
    pub fn try_custom<T, E, F>(f: F) -> Self
    where
        T: 'static,
        E: Display,
        F: Fn(Json) -> Result<T, E> + Send + Sync + 'static,
    {
        Decoder {
            type_name: type_name::<T>(),
            f: Arc::new(move |value: Json, _config: &Config| {
                f(value)
                    .map(|v| Box::new(v) as Box<dyn Any>)
                    .map_err(Error::custom)
            }),
        }
    }

    /// Decode a `T` with this decoder.
    pub fn decode<T: 'static>(&self, value: Json, config: &Config) -> Result<T, Error> {
        let decoded = (self.f)(value, config)?;
        decoded.downcast::<T>().map(|b| *b).map_err(|_| {
            Error::new(ErrorKind::OverrideMismatch {
                expected: self.type_name,
            })
        })
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decoder({})", self.type_name)
    }
}

/// Whether a field is left out of the encoded output.
#[derive(Clone)]
pub enum Exclude {
    /// Never emitted
    Always,
    /// Always emitted
    Never,
    /// Left out when the predicate holds for the field's value
    When {
        /// The type the predicate accepts
        type_name: &'static str,
        /// The type-erased predicate
        f: Arc<PredicateFn>,
    },
}

impl Exclude {
    /// Leave the field out when `f` returns true.
    pub fn when<T, F>(f: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Exclude::When {
            type_name: type_name::<T>(),
            f: Arc::new(move |value: &dyn Any| value.downcast_ref::<T>().map(&f)),
        }
    }

    /// Parse `"always"` or `"never"`.
    pub fn named(name: &str) -> Option<Self> {
        match name {
            "always" => Some(Exclude::Always),
            "never" => Some(Exclude::Never),
            _ => None,
        }
    }

    /// Whether `value` is left out.
    pub fn excludes<T: 'static>(&self, value: &T) -> Result<bool, Error> {
        match self {
            Exclude::Always => Ok(true),
            Exclude::Never => Ok(false),
            Exclude::When { type_name, f } => f(value as &dyn Any).ok_or_else(|| {
                Error::new(ErrorKind::OverrideMismatch {
                    expected: *type_name,
                })
            }),
        }
    }
}

impl fmt::Debug for Exclude {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exclude::Always => f.write_str("Always"),
            Exclude::Never => f.write_str("Never"),
            Exclude::When { type_name, .. } => write!(f, "When({type_name})"),
        }
    }
}

/// An opaque schema-field override, interpreted by the schema layer.
#[derive(Clone)]
pub struct SchemaFieldSlot(Arc<dyn Any + Send + Sync>);

impl SchemaFieldSlot {
    /// Wrap a schema-field description.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        SchemaFieldSlot(Arc::new(value))
    }

    /// The wrapped description, if it is a `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }
}

impl fmt::Debug for SchemaFieldSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SchemaFieldSlot(..)")
    }
}

/// Optional per-field attributes. Unset attributes fall through to lower layers.
#[derive(Debug, Clone, Default)]
pub struct FieldOverride {
    /// Replaces the type's own encoding
    pub encoder: Option<Encoder>,
    /// Replaces the type's own decoding
    pub decoder: Option<Decoder>,
    /// Case conversion of the wire name
    pub letter_case: Option<LetterCase>,
    /// Replacement wire name
    pub field_name: Option<String>,
    /// Exclusion from encoded output
    pub exclude: Option<Exclude>,
    /// Replaces the generated schema field
    pub schema_field: Option<SchemaFieldSlot>,
}

impl FieldOverride {
    /// An override that sets nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the encoder.
    pub fn encoder(mut self, encoder: Encoder) -> Self {
        self.encoder = Some(encoder);
        self
    }

    /// Set the decoder.
    pub fn decoder(mut self, decoder: Decoder) -> Self {
        self.decoder = Some(decoder);
        self
    }

    /// Set the letter case.
    pub fn letter_case(mut self, letter_case: LetterCase) -> Self {
        self.letter_case = Some(letter_case);
        self
    }

    /// Set the wire name.
    pub fn field_name(mut self, name: impl Into<String>) -> Self {
        self.field_name = Some(name.into());
        self
    }

    /// Set the exclusion rule.
    pub fn exclude(mut self, exclude: Exclude) -> Self {
        self.exclude = Some(exclude);
        self
    }

    /// Set the schema field.
    pub fn schema_field(mut self, slot: SchemaFieldSlot) -> Self {
        self.schema_field = Some(slot);
        self
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.encoder.is_none()
            && self.decoder.is_none()
            && self.letter_case.is_none()
            && self.field_name.is_none()
            && self.exclude.is_none()
            && self.schema_field.is_none()
    }

    /// Layer `other` on top of `self`.
    pub fn merge(&mut self, other: &FieldOverride) {
        if other.encoder.is_some() {
            self.encoder.clone_from(&other.encoder);
        }
        if other.decoder.is_some() {
            self.decoder.clone_from(&other.decoder);
        }
        if other.letter_case.is_some() {
            self.letter_case = other.letter_case;
        }
        if other.field_name.is_some() {
            self.field_name.clone_from(&other.field_name);
        }
        if other.exclude.is_some() {
            self.exclude.clone_from(&other.exclude);
        }
        if other.schema_field.is_some() {
            self.schema_field.clone_from(&other.schema_field);
        }
    }
}

/// A field with its effective overrides.
#[derive(Debug)]
pub struct ResolvedField {
    /// The declared field
    pub info: &'static FieldInfo,
    /// Key used in JSON objects
    pub wire_name: String,
    /// Effective overrides after layering
    pub overrides: FieldOverride,
}

/// A record with every field's overrides resolved.
#[derive(Debug)]
pub struct ResolvedRecord {
    /// The declared record
    pub info: &'static RecordInfo,
    /// Fields in declaration order
    pub fields: Vec<ResolvedField>,
}

impl ResolvedRecord {
    /// Index of the field named `key`, matching wire names before field names.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|f| f.wire_name == key)
            .or_else(|| self.fields.iter().position(|f| f.info.name == key))
    }

    /// The undefined-parameter policy, if any.
    pub fn undefined(&self) -> Option<Undefined> {
        self.info.undefined
    }

    /// Index of the catch-all field when the policy is `Include`.
    ///
    /// Fails when the record has zero or several catch-all fields.
    pub fn catch_all(&self) -> Result<Option<usize>, Error> {
        if self.info.undefined != Some(Undefined::Include) {
            return Ok(None);
        }
        let marked: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.info.catch_all)
            .map(|(i, _)| i)
            .collect();
        match marked.as_slice() {
            [] => Err(Error::new(ErrorKind::UndefinedParameter(
                UndefinedProblem::NoCatchAll {
                    record: self.info.name,
                },
            ))),
            [single] => Ok(Some(*single)),
            _ => Err(Error::new(ErrorKind::UndefinedParameter(
                UndefinedProblem::MultipleCatchAll {
                    record: self.info.name,
                    fields: marked.iter().map(|&i| self.fields[i].info.name).collect(),
                },
            ))),
        }
    }
}

/// Merge the override layers of every field of `info`.
///
/// A field-level `field_name` is only passed through the field's own letter
/// case; otherwise the effective letter case applies to the field name.
pub fn resolve_overrides(info: &'static RecordInfo, config: &Config) -> ResolvedRecord {
    crate::trace!("resolving overrides for {}", info.name);
    let fields = info
        .fields
        .iter()
        .map(|field| {
            let mut overrides = FieldOverride::new();
            if let Some(encoder) = config.global_encoder(field.type_id) {
                overrides.encoder = Some(encoder.clone());
            }
            if let Some(decoder) = config.global_decoder(field.type_id) {
                overrides.decoder = Some(decoder.clone());
            }
            if let Some(slot) = config.global_schema_field(field.type_id) {
                overrides.schema_field = Some(slot.clone());
            }
            overrides.letter_case = info.letter_case;
            overrides.merge(&field.meta);

            let wire_name = match &field.meta.field_name {
                Some(name) => match field.meta.letter_case {
                    Some(case) => case.apply(name),
                    None => name.clone(),
                },
                None => match overrides.letter_case {
                    Some(case) => case.apply(field.name),
                    None => field.name.to_owned(),
                },
            };

            ResolvedField {
                info: field,
                wire_name,
                overrides,
            }
        })
        .collect();

    ResolvedRecord { info, fields }
}
