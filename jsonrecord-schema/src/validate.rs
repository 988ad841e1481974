//! Walks raw JSON against schema fields, collecting every problem by path.

use jsonrecord_core::{Config, Json, Path, PathSegment, RecordInfo, SubtypeDef, Undefined};

use crate::error::ValidationErrors;
use crate::field::{FieldKind, SchemaField, build_fields};

pub(crate) const MISSING: &str = "Missing data for required field.";
pub(crate) const NOT_NULL: &str = "Field may not be null.";
pub(crate) const UNKNOWN: &str = "Unknown field.";
pub(crate) const RECURSION_LIMIT: &str = "Schema recursion limit exceeded. \
     Generate the schema with a deeper limit or dump with a deeper limit.";

pub(crate) struct Check<'a> {
    pub(crate) config: &'a Config,
    pub(crate) errors: ValidationErrors,
    pub(crate) recursion_limit: usize,
    /// Missing fields are not reported
    pub(crate) partial: bool,
    failures: usize,
}

impl<'a> Check<'a> {
    pub(crate) fn new(config: &'a Config, recursion_limit: usize, partial: bool) -> Self {
        Check {
            config,
            errors: ValidationErrors::new(),
            recursion_limit,
            partial,
            failures: 0,
        }
    }

    fn fail(&mut self, path: &Path, message: impl Into<String>) {
        self.failures += 1;
        self.errors.add(path, message);
    }

    /// Check an object against `fields`. Keys matching no field are reported
    /// when `unknown` is `Raise`.
    pub(crate) fn object(
        &mut self,
        fields: &[&SchemaField],
        unknown: Option<Undefined>,
        value: &Json,
        path: &Path,
        depth: usize,
    ) {
        let Json::Object(map) = value else {
            self.fail(path, "Invalid input type.");
            return;
        };

        for field in fields {
            let field_path = path.join(PathSegment::Field(field.data_key.clone()));
            match map.get(&field.data_key).or_else(|| map.get(field.name)) {
                None => {
                    if field.required && !self.partial {
                        self.fail(&field_path, MISSING);
                    }
                }
                Some(Json::Null) if !field.allow_none && !field.kind.accepts_null() => {
                    self.fail(&field_path, NOT_NULL);
                }
                Some(Json::Null) if field.allow_none => {}
                Some(raw) => {
                    let before = self.failures;
                    self.kind(&field.kind, raw, &field_path, depth);
                    if self.failures == before {
                        for validator in &field.validators {
                            if let Err(message) = validator(raw) {
                                self.fail(&field_path, message);
                            }
                        }
                    }
                }
            }
        }

        if unknown == Some(Undefined::Raise) {
            for key in map.keys() {
                let known = fields
                    .iter()
                    .any(|f| f.data_key == *key || f.name == key.as_str());
                if !known {
                    self.fail(&path.join(PathSegment::Field(key.clone())), UNKNOWN);
                }
            }
        }
    }

    /// Check a nested record one level below `depth`.
    pub(crate) fn nested(&mut self, info: &'static RecordInfo, value: &Json, path: &Path, depth: usize) {
        let depth = depth + 1;
        if depth > self.recursion_limit {
            self.fail(path, RECURSION_LIMIT);
            return;
        }
        let resolved = self.config.resolved_info(info);
        let fields = build_fields(&resolved, self.config);
        let fields: Vec<&SchemaField> = fields.iter().filter(|f| !f.dump_only).collect();
        self.object(&fields, resolved.undefined(), value, path, depth);
    }

    pub(crate) fn kind(&mut self, kind: &FieldKind, value: &Json, path: &Path, depth: usize) {
        if value.is_null() && !kind.accepts_null() {
            self.fail(path, NOT_NULL);
            return;
        }

        match kind {
            FieldKind::Any => {}
            FieldKind::Null => {
                if !value.is_null() {
                    self.fail(path, "Must be null.");
                }
            }
            FieldKind::Bool => {
                if !value.is_boolean() {
                    self.fail(path, "Not a valid boolean.");
                }
            }
            FieldKind::Int => {
                if !(value.is_i64() || value.is_u64()) {
                    self.fail(path, "Not a valid integer.");
                }
            }
            FieldKind::Float => {
                if !value.is_number() {
                    self.fail(path, "Not a valid number.");
                }
            }
            FieldKind::Str => {
                if !value.is_string() {
                    self.fail(path, "Not a valid string.");
                }
            }
            FieldKind::Timestamp => {
                let valid = match value {
                    Json::Number(_) => true,
                    Json::String(s) => is_datetime(s),
                    _ => false,
                };
                if !valid {
                    self.fail(path, "Not a valid datetime.");
                }
            }
            FieldKind::IsoTimestamp => {
                if !value.as_str().is_some_and(is_datetime) {
                    self.fail(path, "Not a valid datetime.");
                }
            }
            FieldKind::Decimal => {
                let valid = match value {
                    Json::Number(_) => true,
                    Json::String(s) => is_decimal(s),
                    _ => false,
                };
                if !valid {
                    self.fail(path, "Not a valid decimal.");
                }
            }
            FieldKind::Uuid => {
                if !value.as_str().is_some_and(is_uuid) {
                    self.fail(path, "Not a valid UUID.");
                }
            }
            FieldKind::Optional(inner) => {
                if !value.is_null() {
                    self.kind(inner, value, path, depth);
                }
            }
            FieldKind::Collection(_, item) => match value {
                Json::Array(items) => {
                    for (index, element) in items.iter().enumerate() {
                        self.kind(item, element, &path.join(PathSegment::Index(index)), depth);
                    }
                }
                _ => self.fail(path, "Not a valid list."),
            },
            FieldKind::Tuple(kinds) => match value {
                Json::Array(items) if items.len() == kinds.len() => {
                    for (index, (kind, element)) in kinds.iter().zip(items).enumerate() {
                        self.kind(kind, element, &path.join(PathSegment::Index(index)), depth);
                    }
                }
                _ => self.fail(path, "Not a valid tuple."),
            },
            FieldKind::Mapping { key, value: item } => match value {
                Json::Object(map) => {
                    for (name, element) in map {
                        let entry = path.join(PathSegment::Key(name.clone()));
                        if !key_matches(key, name) {
                            self.fail(&entry, "Invalid key.");
                        }
                        self.kind(item, element, &entry, depth);
                    }
                }
                _ => self.fail(path, "Not a valid mapping type."),
            },
            FieldKind::Enum(def) => {
                if !def.contains(value) {
                    let allowed: Vec<String> =
                        def.json_values().iter().map(Json::to_string).collect();
                    self.fail(path, format!("Must be one of: {}.", allowed.join(", ")));
                }
            }
            FieldKind::Nested(record) => self.nested(record.info(), value, path, depth),
            FieldKind::Subtypes(def) => self.subtype(def, value, path, depth),
            FieldKind::Union(arms) => {
                let matched = arms.iter().any(|arm| {
                    let mut trial = Check::new(self.config, self.recursion_limit, self.partial);
                    trial.kind(arm, value, path, depth);
                    trial.failures == 0
                });
                if !matched {
                    self.fail(path, "No matching type in union.");
                }
            }
        }
    }

    fn subtype(&mut self, def: &SubtypeDef, value: &Json, path: &Path, depth: usize) {
        let Json::Object(map) = value else {
            self.fail(path, "Invalid input type.");
            return;
        };
        let tag_path = path.join(PathSegment::Field(def.tag.to_owned()));
        let index = match map.get(def.tag) {
            Some(Json::String(discriminator)) => match def.position(discriminator) {
                Some(index) => index,
                None => {
                    let allowed: Vec<&str> = def.discriminators().collect();
                    self.fail(&tag_path, format!("Must be one of: {}.", allowed.join(", ")));
                    return;
                }
            },
            Some(_) => {
                self.fail(&tag_path, "Not a valid string.");
                return;
            }
            None => match def.base {
                Some(base) => base,
                None => {
                    self.fail(&tag_path, MISSING);
                    return;
                }
            },
        };

        let mut inner = map.clone();
        inner.remove(def.tag);
        self.nested(def.variants[index].record.info(), &Json::Object(inner), path, depth);
    }

    /// Check only the nesting depth of an encoded value.
    pub(crate) fn depth(&mut self, kind: &FieldKind, value: &Json, path: &Path, depth: usize) {
        match (kind, value) {
            (FieldKind::Optional(inner), _) => self.depth(inner, value, path, depth),
            (FieldKind::Collection(_, item), Json::Array(items)) => {
                for (index, element) in items.iter().enumerate() {
                    self.depth(item, element, &path.join(PathSegment::Index(index)), depth);
                }
            }
            (FieldKind::Tuple(kinds), Json::Array(items)) => {
                for (index, (kind, element)) in kinds.iter().zip(items).enumerate() {
                    self.depth(kind, element, &path.join(PathSegment::Index(index)), depth);
                }
            }
            (FieldKind::Mapping { value: item, .. }, Json::Object(map)) => {
                for (name, element) in map {
                    self.depth(item, element, &path.join(PathSegment::Key(name.clone())), depth);
                }
            }
            (FieldKind::Union(arms), Json::Object(_)) => {
                let nested = arms
                    .iter()
                    .find(|arm| matches!(arm, FieldKind::Nested(_) | FieldKind::Subtypes(_)));
                if let Some(arm) = nested {
                    self.depth(arm, value, path, depth);
                }
            }
            (FieldKind::Nested(record), Json::Object(map)) => {
                self.record_depth(record.info(), map, path, depth);
            }
            (FieldKind::Subtypes(def), Json::Object(map)) => {
                let index = match map.get(def.tag).and_then(Json::as_str) {
                    Some(discriminator) => def.position(discriminator),
                    None => def.base,
                };
                if let Some(index) = index {
                    self.record_depth(def.variants[index].record.info(), map, path, depth);
                }
            }
            _ => {}
        }
    }

    fn record_depth(
        &mut self,
        info: &'static RecordInfo,
        map: &jsonrecord_core::JsonMap,
        path: &Path,
        depth: usize,
    ) {
        let depth = depth + 1;
        if depth > self.recursion_limit {
            self.fail(path, RECURSION_LIMIT);
            return;
        }
        let resolved = self.config.resolved_info(info);
        for field in build_fields(&resolved, self.config) {
            if let Some(element) = map.get(&field.data_key) {
                let field_path = path.join(PathSegment::Field(field.data_key.clone()));
                self.depth(&field.kind, element, &field_path, depth);
            }
        }
    }
}

/// Insert the default of every absent field that has one, at every nesting
/// level present in `value`.
pub(crate) fn fill_defaults(config: &Config, fields: &[SchemaField], value: &mut Json) {
    let Json::Object(map) = value else { return };
    for field in fields {
        let key = if map.contains_key(&field.data_key) {
            Some(field.data_key.as_str())
        } else if map.contains_key(field.name) {
            Some(field.name)
        } else {
            None
        };
        match key.and_then(|key| map.get_mut(key)) {
            Some(present) => fill_kind(config, &field.kind, present),
            None => {
                if let Some(default) = &field.default {
                    map.insert(field.data_key.clone(), default.clone());
                }
            }
        }
    }
}

fn fill_kind(config: &Config, kind: &FieldKind, value: &mut Json) {
    match (kind, value) {
        (FieldKind::Optional(inner), value) => fill_kind(config, inner, value),
        (FieldKind::Collection(_, item), Json::Array(items)) => {
            for element in items {
                fill_kind(config, item, element);
            }
        }
        (FieldKind::Tuple(kinds), Json::Array(items)) => {
            for (kind, element) in kinds.iter().zip(items) {
                fill_kind(config, kind, element);
            }
        }
        (FieldKind::Mapping { value: item, .. }, Json::Object(map)) => {
            for element in map.values_mut() {
                fill_kind(config, item, element);
            }
        }
        (FieldKind::Nested(record), value) => {
            let resolved = config.resolved_info(record.info());
            fill_defaults(config, &build_fields(&resolved, config), value);
        }
        (FieldKind::Subtypes(def), value) => {
            let index = match value.get(def.tag) {
                Some(tag) => tag.as_str().and_then(|d| def.position(d)),
                None => def.base,
            };
            if let Some(index) = index {
                let resolved = config.resolved_info(def.variants[index].record.info());
                fill_defaults(config, &build_fields(&resolved, config), value);
            }
        }
        _ => {}
    }
}

fn key_matches(kind: &FieldKind, key: &str) -> bool {
    match kind {
        FieldKind::Int => key.parse::<i64>().is_ok() || key.parse::<u64>().is_ok(),
        FieldKind::Float => key.parse::<f64>().is_ok(),
        FieldKind::Bool => matches!(key, "true" | "false"),
        FieldKind::Uuid => is_uuid(key),
        FieldKind::Decimal => is_decimal(key),
        FieldKind::Enum(def) => {
            def.contains(&Json::String(key.to_owned()))
                || key.parse::<i64>().is_ok_and(|n| def.contains(&Json::from(n)))
        }
        FieldKind::Optional(inner) => key_matches(inner, key),
        _ => true,
    }
}

#[cfg(feature = "chrono")]
fn is_datetime(s: &str) -> bool {
    chrono::DateTime::parse_from_rfc3339(s).is_ok()
}

#[cfg(not(feature = "chrono"))]
fn is_datetime(s: &str) -> bool {
    s.len() >= 19 && s.as_bytes()[4] == b'-' && s.as_bytes()[10].eq_ignore_ascii_case(&b't')
}

#[cfg(feature = "uuid")]
fn is_uuid(s: &str) -> bool {
    uuid::Uuid::parse_str(s).is_ok()
}

#[cfg(not(feature = "uuid"))]
fn is_uuid(s: &str) -> bool {
    let hex: String = s.chars().filter(|c| *c != '-').collect();
    hex.len() == 32 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(feature = "rust_decimal")]
fn is_decimal(s: &str) -> bool {
    use core::str::FromStr;
    rust_decimal::Decimal::from_str(s).is_ok() || rust_decimal::Decimal::from_scientific(s).is_ok()
}

#[cfg(not(feature = "rust_decimal"))]
fn is_decimal(s: &str) -> bool {
    s.parse::<f64>().is_ok_and(f64::is_finite)
}
