//! Record descriptors and the record encode/decode engine.

use core::any::{TypeId, type_name};
use core::fmt;
use std::sync::Arc;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::TypeHint;
use crate::json::{Json, JsonMap};
use crate::letter_case::LetterCase;
use crate::overrides::{FieldOverride, ResolvedRecord};
use crate::undefined::{RawFields, Undefined};

/// Produces a field's default value, already encoded.
pub type DefaultFn = Arc<dyn Fn(&Config) -> Result<Json, Error> + Send + Sync>;

/// A declared record field.
pub struct FieldInfo {
    /// Field name as declared
    pub name: &'static str,
    /// Rust type name of the field
    pub type_name: &'static str,
    /// Identity of the field type, used to look up global overrides
    pub type_id: TypeId,
    hint: fn() -> TypeHint,
    default: Option<DefaultFn>,
    /// Whether this field collects undefined parameters
    pub catch_all: bool,
    /// Field-level overrides
    pub meta: FieldOverride,
    /// Doc comment, if any
    pub doc: Option<&'static str>,
}

impl FieldInfo {
    /// A field of type `T`.
    pub fn new<T: Codec>(name: &'static str) -> Self {
        FieldInfo {
            name,
            type_name: type_name::<T>(),
            type_id: TypeId::of::<T>(),
            hint: T::type_hint,
            default: None,
            catch_all: false,
            meta: FieldOverride::new(),
            doc: None,
        }
    }

    /// Give the field a default.
    pub fn default_value<T, F>(mut self, f: F) -> Self
    where
        T: Codec,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default = Some(Arc::new(move |config: &Config| f().encode(config)));
        self
    }

    /// Mark the field as the catch-all for undefined parameters.
    pub fn catch_all(mut self) -> Self {
        self.catch_all = true;
        self
    }

    /// Attach field-level overrides.
    pub fn meta(mut self, meta: FieldOverride) -> Self {
        self.meta = meta;
        self
    }

    /// Attach a doc comment.
    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    /// The declared type's hint.
    pub fn hint(&self) -> TypeHint {
        (self.hint)()
    }

    /// Whether the field declares a default.
    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// The encoded default, if the field declares one.
    pub fn encoded_default(&self, config: &Config) -> Option<Result<Json, Error>> {
        self.default.as_ref().map(|f| f(config))
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .field("has_default", &self.has_default())
            .field("catch_all", &self.catch_all)
            .field("meta", &self.meta)
            .finish()
    }
}

/// Descriptor of a record type, built once per type.
#[derive(Debug)]
pub struct RecordInfo {
    /// Record type name
    pub name: &'static str,
    /// Identity of the record type
    pub type_id: TypeId,
    /// Fields in declaration order
    pub fields: Vec<FieldInfo>,
    /// Record-level letter case
    pub letter_case: Option<LetterCase>,
    /// Undefined-parameter policy
    pub undefined: Option<Undefined>,
    /// Doc comment, if any
    pub doc: Option<&'static str>,
}

impl RecordInfo {
    /// An empty descriptor for `R`.
    pub fn new<R: 'static>(name: &'static str) -> Self {
        RecordInfo {
            name,
            type_id: TypeId::of::<R>(),
            fields: Vec::new(),
            letter_case: None,
            undefined: None,
            doc: None,
        }
    }

    /// Append a field.
    pub fn field(mut self, field: FieldInfo) -> Self {
        self.fields.push(field);
        self
    }

    /// Set the record-level letter case.
    pub fn letter_case(mut self, letter_case: LetterCase) -> Self {
        self.letter_case = Some(letter_case);
        self
    }

    /// Set the undefined-parameter policy.
    pub fn undefined(mut self, undefined: Undefined) -> Self {
        self.undefined = Some(undefined);
        self
    }

    /// Attach a doc comment.
    pub fn doc(mut self, doc: &'static str) -> Self {
        self.doc = Some(doc);
        self
    }

    /// Index of the field declared as `name`.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// A structured record: a type with named, individually typed fields.
///
/// Usually implemented with `#[derive(Record)]`.
pub trait Record: Codec {
    /// The record's descriptor.
    fn record_info() -> &'static RecordInfo;

    /// Feed every field, in declaration order, to `sink`.
    fn encode_fields(&self, sink: &mut FieldSink<'_>) -> Result<(), Error>;

    /// Build the record from collected field values.
    fn decode_fields(fields: RawFields<'_>) -> Result<Self, Error>;
}

/// Receives a record's fields during encoding.
pub struct FieldSink<'a> {
    resolved: &'a ResolvedRecord,
    config: &'a Config,
    catch_all: Option<usize>,
    out: JsonMap,
    undefined: Option<JsonMap>,
}

impl<'a> FieldSink<'a> {
    fn new(resolved: &'a ResolvedRecord, config: &'a Config) -> Result<Self, Error> {
        Ok(FieldSink {
            resolved,
            config,
            catch_all: resolved.catch_all()?,
            out: JsonMap::with_capacity(resolved.fields.len()),
            undefined: None,
        })
    }

    /// The active configuration.
    pub fn config(&self) -> &Config {
        self.config
    }

    /// Encode field number `index`.
    pub fn field<T: Codec>(&mut self, index: usize, value: &T) -> Result<(), Error> {
        let Some(field) = self.resolved.fields.get(index) else {
            return Err(Error::invalid_value(format!(
                "{} has no field number {index}",
                self.resolved.info.name
            )));
        };

        if Some(index) == self.catch_all {
            match value.encode(self.config)? {
                Json::Object(extra) => self.undefined = Some(extra),
                Json::Null => {}
                other => {
                    return Err(Error::invalid_type("object", &other).at_field(field.info.name));
                }
            }
            return Ok(());
        }

        if let Some(exclude) = &field.overrides.exclude {
            if exclude.excludes(value).map_err(|e| e.at_field(&field.wire_name))? {
                crate::trace!("excluding {}.{}", self.resolved.info.name, field.info.name);
                return Ok(());
            }
        }

        let encoded = match &field.overrides.encoder {
            Some(encoder) => encoder.encode(value, self.config),
            None => value.encode(self.config),
        }
        .map_err(|e| e.at_field(&field.wire_name))?;
        self.out.insert(field.wire_name.clone(), encoded);
        Ok(())
    }

    fn finish(self) -> JsonMap {
        let mut out = self.out;
        if let Some(extra) = self.undefined {
            out.extend(extra);
        }
        out
    }
}

/// Encode a record as a JSON object keyed by wire name.
pub fn encode_record<R: Record>(record: &R, config: &Config) -> Result<Json, Error> {
    let resolved = config.resolved::<R>();
    let mut sink = FieldSink::new(&resolved, config)?;
    record.encode_fields(&mut sink)?;
    Ok(Json::Object(sink.finish()))
}

/// Decode a record from a JSON object.
pub fn decode_record<R: Record>(value: Json, config: &Config) -> Result<R, Error> {
    let resolved = config.resolved::<R>();
    crate::trace!("decoding {}", resolved.info.name);
    let fields = RawFields::collect(&resolved, value, config)?;
    R::decode_fields(fields)
}
