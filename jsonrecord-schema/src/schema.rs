use core::marker::PhantomData;
use std::collections::BTreeSet;
use std::sync::Arc;

use jsonrecord_core::{
    Config, Json, Path, PathSegment, Record, ResolvedRecord, Undefined, decode_record,
    encode_record,
};

use crate::error::{SchemaError, ValidationErrors};
use crate::field::{SchemaField, build_fields};
use crate::json_schema::{JsonSchema, SchemaContext};
use crate::validate::{Check, fill_defaults};

/// Nesting depth of records accepted by default.
pub const DEFAULT_RECURSION_LIMIT: usize = 32;

/// A validating schema for the record `R`.
///
/// Fields are generated from the same resolved overrides the engine uses, so
/// a schema accepts exactly the documents `R` decodes from, and reports every
/// problem at once instead of stopping at the first one.
///
/// ```
/// # use jsonrecord_core::Record;
/// # use jsonrecord_schema::{Schema, SchemaError};
/// # fn load<R: Record>(value: serde_json::Value) -> Result<R, SchemaError> {
/// Schema::<R>::new().partial(true).load(value)
/// # }
/// ```
pub struct Schema<R> {
    config: Config,
    resolved: Arc<ResolvedRecord>,
    fields: Vec<SchemaField>,
    only: Option<BTreeSet<String>>,
    exclude: BTreeSet<String>,
    load_only: BTreeSet<String>,
    dump_only: BTreeSet<String>,
    partial: bool,
    unknown: Option<Undefined>,
    recursion_limit: usize,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Default for Schema<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn names(names: impl IntoIterator<Item = impl Into<String>>) -> BTreeSet<String> {
    names.into_iter().map(Into::into).collect()
}

impl<R: Record> Schema<R> {
    /// The schema of `R` under the default configuration.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// The schema of `R` under `config`, including its global overrides.
    pub fn with_config(config: Config) -> Self {
        let resolved = config.resolved::<R>();
        let fields = build_fields(&resolved, &config);
        tracing::debug!(record = resolved.info.name, fields = fields.len(), "built schema");
        Schema {
            unknown: resolved.undefined(),
            config,
            resolved,
            fields,
            only: None,
            exclude: BTreeSet::new(),
            load_only: BTreeSet::new(),
            dump_only: BTreeSet::new(),
            partial: false,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
            _record: PhantomData,
        }
    }

    /// Restrict the schema to the named fields.
    pub fn only(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.only = Some(names(fields));
        self
    }

    /// Leave out the named fields.
    pub fn exclude(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude.extend(names(fields));
        self
    }

    /// Read the named fields on load but never write them on dump.
    pub fn load_only(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.load_only.extend(names(fields));
        self
    }

    /// Write the named fields on dump but never read them on load.
    pub fn dump_only(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dump_only.extend(names(fields));
        self
    }

    /// Accept documents with missing fields, inferring them as `null`.
    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    /// Treatment of keys that match no field.
    ///
    /// Defaults to the record's undefined-parameter policy.
    pub fn unknown(mut self, unknown: Undefined) -> Self {
        self.unknown = Some(unknown);
        self
    }

    /// Deepest accepted nesting of records.
    pub fn recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// The configuration the schema encodes and decodes with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the record.
    pub fn name(&self) -> &'static str {
        self.resolved.info.name
    }

    fn selected(&self, field: &SchemaField) -> bool {
        let named = |set: &BTreeSet<String>| {
            set.contains(field.name) || set.contains(&field.data_key)
        };
        self.only.as_ref().is_none_or(named) && !named(&self.exclude)
    }

    fn loads_field(&self, field: &SchemaField) -> bool {
        self.selected(field)
            && !field.dump_only
            && !self.dump_only.contains(field.name)
            && !self.dump_only.contains(&field.data_key)
    }

    fn dumps_field(&self, field: &SchemaField) -> bool {
        self.selected(field)
            && !field.load_only
            && !self.load_only.contains(field.name)
            && !self.load_only.contains(&field.data_key)
    }

    /// Fields selected by `only` and `exclude`, with the schema-level
    /// `load_only` / `dump_only` applied.
    pub fn fields(&self) -> Vec<SchemaField> {
        self.fields
            .iter()
            .filter(|f| self.selected(f))
            .map(|f| {
                let mut field = f.clone();
                field.load_only |= !self.dumps_field(f);
                field.dump_only |= !self.loads_field(f);
                field
            })
            .collect()
    }

    /// The selected field declared as `name`, or keyed `name` in documents.
    pub fn field(&self, name: &str) -> Option<SchemaField> {
        self.fields()
            .into_iter()
            .find(|f| f.name == name || f.data_key == name)
    }

    fn check(&self, check: &mut Check<'_>, value: &Json, path: &Path) {
        let fields: Vec<&SchemaField> = self.fields.iter().filter(|f| self.loads_field(f)).collect();
        check.object(&fields, self.unknown, value, path, 0);
    }

    /// Validate a document, reporting every problem by path.
    pub fn validate(&self, value: &Json) -> Result<(), ValidationErrors> {
        let mut check = Check::new(&self.config, self.recursion_limit, self.partial);
        self.check(&mut check, value, &Path::root());
        check.errors.into_result()
    }

    /// Validate every element of an array of documents.
    pub fn validate_many(&self, values: &Json) -> Result<(), ValidationErrors> {
        let mut check = Check::new(&self.config, self.recursion_limit, self.partial);
        self.check_many(&mut check, values);
        check.errors.into_result()
    }

    fn check_many(&self, check: &mut Check<'_>, values: &Json) {
        match values {
            Json::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.check(check, item, &Path::root().join(PathSegment::Index(index)));
                }
            }
            _ => check.errors.add(&Path::root(), "Not a valid list."),
        }
    }

    fn run_deserializers(&self, value: &mut Json, path: &Path, errors: &mut ValidationErrors) {
        let Json::Object(map) = value else { return };
        for field in self.fields.iter().filter(|f| self.loads_field(f)) {
            let Some(transform) = &field.deserialize else { continue };
            let Some(raw) = map.get_mut(&field.data_key) else { continue };
            match transform(core::mem::take(raw)) {
                Ok(next) => *raw = next,
                Err(message) => {
                    errors.add(&path.join(PathSegment::Field(field.data_key.clone())), message);
                }
            }
        }
    }

    /// Drop keys the engine must not see.
    fn strip(&self, value: &mut Json) {
        let Json::Object(map) = value else { return };
        for field in self.fields.iter().filter(|f| !self.loads_field(f)) {
            if map.shift_remove(&field.data_key).is_some() {
                tracing::debug!(record = self.name(), field = field.name, "ignoring field on load");
            }
        }
        if self.unknown == Some(Undefined::Exclude) && self.resolved.undefined() != Some(Undefined::Exclude) {
            let resolved = &self.resolved;
            map.retain(|key, _| resolved.position(key).is_some());
        }
    }

    fn decode(&self, mut value: Json) -> Result<R, jsonrecord_core::Error> {
        self.strip(&mut value);
        fill_defaults(&self.config, &self.fields, &mut value);
        if self.partial && !self.config.infer_missing {
            let config = self.config.clone().infer_missing(true);
            decode_record(value, &config)
        } else {
            decode_record(value, &self.config)
        }
    }

    /// Validate a document, then decode it into `R`.
    pub fn load(&self, mut value: Json) -> Result<R, SchemaError> {
        let mut errors = ValidationErrors::new();
        self.run_deserializers(&mut value, &Path::root(), &mut errors);
        errors.into_result()?;
        self.validate(&value)?;
        self.decode(value).map_err(SchemaError::Decode)
    }

    /// Validate and decode an array of documents. Nothing is decoded unless
    /// every element validates.
    pub fn load_many(&self, values: Json) -> Result<Vec<R>, SchemaError> {
        let mut items = match values {
            Json::Array(items) => items,
            other => {
                let mut errors = ValidationErrors::new();
                errors.add(&Path::root(), "Not a valid list.");
                tracing::debug!(got = jsonrecord_core::kind_name(&other), "load_many needs an array");
                return Err(errors.into());
            }
        };

        let mut errors = ValidationErrors::new();
        for (index, item) in items.iter_mut().enumerate() {
            let path = Path::root().join(PathSegment::Index(index));
            self.run_deserializers(item, &path, &mut errors);
        }
        errors.into_result()?;

        let mut check = Check::new(&self.config, self.recursion_limit, self.partial);
        for (index, item) in items.iter().enumerate() {
            self.check(&mut check, item, &Path::root().join(PathSegment::Index(index)));
        }
        check.errors.into_result()?;

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                self.decode(item)
                    .map_err(|e| SchemaError::Decode(e.at_index(index)))
            })
            .collect()
    }

    /// Parse JSON text, then [`load`](Self::load) it.
    pub fn loads(&self, text: &str) -> Result<R, SchemaError> {
        let value: Json = serde_json::from_str(text)
            .map_err(|e| SchemaError::Decode(e.into()))?;
        self.load(value)
    }

    /// Parse JSON text, then [`load_many`](Self::load_many) it.
    pub fn loads_many(&self, text: &str) -> Result<Vec<R>, SchemaError> {
        let value: Json = serde_json::from_str(text)
            .map_err(|e| SchemaError::Decode(e.into()))?;
        self.load_many(value)
    }

    /// Encode a record, applying field selection and serialize hooks.
    pub fn dump(&self, record: &R) -> Result<Json, SchemaError> {
        let mut errors = ValidationErrors::new();
        let value = self.dump_at(record, &Path::root(), &mut errors)?;
        errors.into_result()?;
        Ok(value)
    }

    fn dump_at(&self, record: &R, path: &Path, errors: &mut ValidationErrors) -> Result<Json, SchemaError> {
        let encoded = encode_record(record, &self.config).map_err(SchemaError::Encode)?;
        let Json::Object(mut map) = encoded else {
            return Ok(encoded);
        };

        let mut check = Check::new(&self.config, self.recursion_limit, false);
        for field in &self.fields {
            if !self.dumps_field(field) {
                map.shift_remove(&field.data_key);
                continue;
            }
            let Some(raw) = map.get_mut(&field.data_key) else { continue };
            let field_path = path.join(PathSegment::Field(field.data_key.clone()));
            check.depth(&field.kind, raw, &field_path, 0);
            if let Some(transform) = &field.serialize {
                match transform(core::mem::take(raw)) {
                    Ok(next) => *raw = next,
                    Err(message) => errors.add(&field_path, message),
                }
            }
        }
        errors.extend(check.errors);
        Ok(Json::Object(map))
    }

    /// Dump every record.
    pub fn dump_many<'r>(&self, records: impl IntoIterator<Item = &'r R>) -> Result<Json, SchemaError>
    where
        R: 'r,
    {
        let mut errors = ValidationErrors::new();
        let mut items = Vec::new();
        for (index, record) in records.into_iter().enumerate() {
            let path = Path::root().join(PathSegment::Index(index));
            let item = self.dump_at(record, &path, &mut errors).map_err(|e| match e {
                SchemaError::Encode(e) => SchemaError::Encode(e.at_index(index)),
                other => other,
            })?;
            items.push(item);
        }
        errors.into_result()?;
        Ok(Json::Array(items))
    }

    /// Dump a record to JSON text.
    pub fn dumps(&self, record: &R) -> Result<String, SchemaError> {
        let value = self.dump(record)?;
        serde_json::to_string(&value).map_err(|e| SchemaError::Encode(e.into()))
    }

    /// Dump several records to JSON text.
    pub fn dumps_many<'r>(&self, records: impl IntoIterator<Item = &'r R>) -> Result<String, SchemaError>
    where
        R: 'r,
    {
        let value = self.dump_many(records)?;
        serde_json::to_string(&value).map_err(|e| SchemaError::Encode(e.into()))
    }

    /// The JSON Schema (2020-12) of the documents this schema loads.
    pub fn json_schema(&self) -> JsonSchema {
        let context = SchemaContext::new(self.resolved.info, &self.config);
        let fields: Vec<&SchemaField> = self.fields.iter().filter(|f| self.loads_field(f)).collect();
        context.root(&self.resolved, &fields, self.unknown)
    }

    /// [`json_schema`](Self::json_schema) as a JSON value.
    pub fn to_json_schema(&self) -> Result<Json, jsonrecord_core::Error> {
        jsonrecord_core::Codec::encode(&self.json_schema(), &Config::default())
    }
}
