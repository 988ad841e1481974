//! JSON Schema (2020-12) export.

use std::any::TypeId;
use std::collections::{BTreeMap, BTreeSet};

use indexmap::IndexMap;
use jsonrecord_core::{
    CollectionKind, Config, Json, RecordInfo, ResolvedRecord, SubtypeDef, Undefined,
};
use jsonrecord_macros::Record;

use crate::field::{FieldKind, SchemaField, build_fields};

/// Dialect written to `$schema`.
pub const DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// A JSON Schema document, or a subschema of one.
#[derive(Record, Debug, Clone, Default, PartialEq)]
#[record(crate = ::jsonrecord_core, letter_case = "camelCase")]
pub struct JsonSchema {
    /// The JSON Schema dialect
    #[record(rename = "$schema", exclude_if = Option::is_none)]
    pub schema: Option<String>,

    /// Reference to another schema
    #[record(rename = "$ref", exclude_if = Option::is_none)]
    pub ref_: Option<String>,

    /// Definitions of nested records
    #[record(rename = "$defs", exclude_if = Option::is_none)]
    pub defs: Option<BTreeMap<String, JsonSchema>>,

    /// Name of the described type
    #[record(exclude_if = Option::is_none)]
    pub title: Option<String>,

    /// Doc comment of the described type or field
    #[record(exclude_if = Option::is_none)]
    pub description: Option<String>,

    /// The JSON type
    #[record(rename = "type", exclude_if = Option::is_none)]
    pub type_: Option<SchemaType>,

    /// Format of string values
    #[record(exclude_if = Option::is_none)]
    pub format: Option<String>,

    /// The only accepted value
    #[record(rename = "const", exclude_if = Option::is_none)]
    pub const_: Option<Json>,

    /// The accepted values
    #[record(rename = "enum", exclude_if = Option::is_none)]
    pub enum_: Option<Vec<Json>>,

    /// Object properties, in declaration order
    #[record(exclude_if = Option::is_none)]
    pub properties: Option<IndexMap<String, JsonSchema>>,

    /// Properties that must be present
    #[record(exclude_if = Option::is_none)]
    pub required: Option<Vec<String>>,

    /// Whether, or how, other properties are accepted
    #[record(exclude_if = Option::is_none)]
    pub additional_properties: Option<AdditionalProperties>,

    /// Schema of property names
    #[record(exclude_if = Option::is_none)]
    pub property_names: Option<Box<JsonSchema>>,

    /// Schema of array items
    #[record(exclude_if = Option::is_none)]
    pub items: Option<Box<JsonSchema>>,

    /// Schemas of the leading array items
    #[record(exclude_if = Option::is_none)]
    pub prefix_items: Option<Vec<JsonSchema>>,

    /// Shortest accepted array
    #[record(exclude_if = Option::is_none)]
    pub min_items: Option<usize>,

    /// Longest accepted array
    #[record(exclude_if = Option::is_none)]
    pub max_items: Option<usize>,

    /// Whether array items must be distinct
    #[record(exclude_if = Option::is_none)]
    pub unique_items: Option<bool>,

    /// Accepts values matching any subschema
    #[record(exclude_if = Option::is_none)]
    pub any_of: Option<Vec<JsonSchema>>,

    /// Accepts values matching exactly one subschema
    #[record(exclude_if = Option::is_none)]
    pub one_of: Option<Vec<JsonSchema>>,

    /// Accepts values matching every subschema
    #[record(exclude_if = Option::is_none)]
    pub all_of: Option<Vec<JsonSchema>>,

    /// Value used when the property is absent
    #[record(exclude_if = Option::is_none)]
    pub default: Option<Json>,
}

/// The `type` keyword.
#[derive(Record, Debug, Clone, Copy, PartialEq, Eq)]
#[record(crate = ::jsonrecord_core, letter_case = "snake_case")]
pub enum SchemaType {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

/// The `additionalProperties` keyword: a boolean or a schema.
#[derive(Record, Debug, Clone, PartialEq)]
#[record(crate = ::jsonrecord_core)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<JsonSchema>),
}

impl JsonSchema {
    /// A schema with only `type` set.
    pub fn typed(type_: SchemaType) -> Self {
        JsonSchema {
            type_: Some(type_),
            ..Default::default()
        }
    }

    /// A string schema with `format` set.
    pub fn string_format(format: &str) -> Self {
        JsonSchema {
            format: Some(format.to_owned()),
            ..Self::typed(SchemaType::String)
        }
    }

    /// A reference to `target`.
    pub fn reference(target: impl Into<String>) -> Self {
        JsonSchema {
            ref_: Some(target.into()),
            ..Default::default()
        }
    }

    /// This schema, or `null`.
    pub fn nullable(self) -> Self {
        JsonSchema {
            any_of: Some(vec![self, Self::typed(SchemaType::Null)]),
            ..Default::default()
        }
    }
}

fn trimmed(doc: Option<&'static str>) -> Option<String> {
    doc.map(str::trim)
        .filter(|doc| !doc.is_empty())
        .map(str::to_owned)
}

/// Collects the definitions of nested records while a document is built.
pub(crate) struct SchemaContext<'a> {
    config: &'a Config,
    root: TypeId,
    defs: BTreeMap<String, JsonSchema>,
    in_progress: BTreeSet<&'static str>,
}

impl<'a> SchemaContext<'a> {
    pub(crate) fn new(root: &'static RecordInfo, config: &'a Config) -> Self {
        SchemaContext {
            config,
            root: root.type_id,
            defs: BTreeMap::new(),
            in_progress: BTreeSet::new(),
        }
    }

    /// The whole document for the root record.
    pub(crate) fn root(
        mut self,
        resolved: &ResolvedRecord,
        fields: &[&SchemaField],
        unknown: Option<Undefined>,
    ) -> JsonSchema {
        self.in_progress.insert(resolved.info.name);
        let mut schema = self.object(resolved.info, fields, unknown);
        schema.schema = Some(DIALECT.to_owned());
        if !self.defs.is_empty() {
            schema.defs = Some(self.defs);
        }
        schema
    }

    fn object(
        &mut self,
        info: &'static RecordInfo,
        fields: &[&SchemaField],
        unknown: Option<Undefined>,
    ) -> JsonSchema {
        let mut properties = IndexMap::new();
        let mut required = Vec::new();
        for field in fields {
            let mut property = self.kind(&field.kind);
            if field.allow_none && !field.kind.accepts_null() {
                property = property.nullable();
            }
            property.default.clone_from(&field.default);
            property.description = trimmed(field.doc);
            if field.required {
                required.push(field.data_key.clone());
            }
            properties.insert(field.data_key.clone(), property);
        }

        JsonSchema {
            title: Some(info.name.to_owned()),
            description: trimmed(info.doc),
            properties: Some(properties),
            required: (!required.is_empty()).then_some(required),
            additional_properties: match unknown {
                Some(Undefined::Raise) => Some(AdditionalProperties::Bool(false)),
                _ => None,
            },
            ..JsonSchema::typed(SchemaType::Object)
        }
    }

    fn record(&mut self, info: &'static RecordInfo) -> JsonSchema {
        if info.type_id == self.root {
            return JsonSchema::reference("#");
        }
        let name = info.name;
        if !self.defs.contains_key(name) && !self.in_progress.contains(name) {
            self.in_progress.insert(name);
            let resolved = self.config.resolved_info(info);
            let fields = build_fields(&resolved, self.config);
            let loadable: Vec<&SchemaField> = fields.iter().filter(|f| !f.dump_only).collect();
            let schema = self.object(info, &loadable, resolved.undefined());
            self.in_progress.remove(name);
            self.defs.insert(name.to_owned(), schema);
        }
        JsonSchema::reference(format!("#/$defs/{name}"))
    }

    fn subtypes(&mut self, def: &SubtypeDef) -> JsonSchema {
        let variants = def
            .variants
            .iter()
            .enumerate()
            .map(|(index, variant)| {
                let target = self.record(variant.record.info());
                let discriminator = JsonSchema {
                    const_: Some(Json::from(variant.discriminator)),
                    ..Default::default()
                };
                let mut tag = IndexMap::new();
                tag.insert(def.tag.to_owned(), discriminator);
                let tagged = JsonSchema {
                    properties: Some(tag),
                    required: (def.base != Some(index)).then(|| vec![def.tag.to_owned()]),
                    ..Default::default()
                };
                JsonSchema {
                    all_of: Some(vec![target, tagged]),
                    ..Default::default()
                }
            })
            .collect();
        JsonSchema {
            title: Some(def.name.to_owned()),
            one_of: Some(variants),
            ..Default::default()
        }
    }

    fn kind(&mut self, kind: &FieldKind) -> JsonSchema {
        match kind {
            FieldKind::Any => JsonSchema::default(),
            FieldKind::Null => JsonSchema::typed(SchemaType::Null),
            FieldKind::Bool => JsonSchema::typed(SchemaType::Boolean),
            FieldKind::Int => JsonSchema::typed(SchemaType::Integer),
            FieldKind::Float => JsonSchema::typed(SchemaType::Number),
            FieldKind::Str => JsonSchema::typed(SchemaType::String),
            FieldKind::Timestamp => JsonSchema {
                any_of: Some(vec![
                    JsonSchema::typed(SchemaType::Number),
                    JsonSchema::string_format("date-time"),
                ]),
                ..Default::default()
            },
            FieldKind::IsoTimestamp => JsonSchema::string_format("date-time"),
            FieldKind::Decimal => JsonSchema::string_format("decimal"),
            FieldKind::Uuid => JsonSchema::string_format("uuid"),
            FieldKind::Optional(inner) => self.kind(inner).nullable(),
            FieldKind::Collection(collection, item) => JsonSchema {
                items: Some(Box::new(self.kind(item))),
                unique_items: matches!(collection, CollectionKind::Set).then_some(true),
                ..JsonSchema::typed(SchemaType::Array)
            },
            FieldKind::Tuple(items) => JsonSchema {
                prefix_items: Some(items.iter().map(|item| self.kind(item)).collect()),
                min_items: Some(items.len()),
                max_items: Some(items.len()),
                ..JsonSchema::typed(SchemaType::Array)
            },
            FieldKind::Mapping { key, value } => {
                let property_names = match key.as_ref() {
                    FieldKind::Enum(_) => Some(Box::new(self.kind(key))),
                    _ => None,
                };
                JsonSchema {
                    additional_properties: Some(AdditionalProperties::Schema(Box::new(
                        self.kind(value),
                    ))),
                    property_names,
                    ..JsonSchema::typed(SchemaType::Object)
                }
            }
            FieldKind::Enum(def) => JsonSchema {
                enum_: Some(def.json_values()),
                ..Default::default()
            },
            FieldKind::Nested(record) => self.record(record.info()),
            FieldKind::Subtypes(def) => self.subtypes(def),
            FieldKind::Union(arms) => JsonSchema {
                any_of: Some(arms.iter().map(|arm| self.kind(arm)).collect()),
                ..Default::default()
            },
        }
    }
}
