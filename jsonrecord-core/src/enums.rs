//! Fixed-value enumerations.

use crate::error::{Error, ErrorKind, suggest};
use crate::json::Json;

/// A single enumeration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumValue {
    /// A string value
    Str(&'static str),
    /// An integer value
    Int(i64),
}

impl EnumValue {
    /// This value as JSON.
    pub fn to_json(self) -> Json {
        match self {
            EnumValue::Str(s) => Json::from(s),
            EnumValue::Int(n) => Json::from(n),
        }
    }

    /// Exact match against a JSON value.
    pub fn matches(self, value: &Json) -> bool {
        match self {
            EnumValue::Str(s) => value.as_str() == Some(s),
            EnumValue::Int(n) => value.as_i64() == Some(n) && !value.is_f64(),
        }
    }
}

/// The values of an enumeration, in variant order.
#[derive(Debug)]
pub struct EnumDef {
    /// The enum type
    pub name: &'static str,
    /// One value per variant
    pub values: &'static [EnumValue],
}

impl EnumDef {
    /// Whether `value` is one of the enumeration's values.
    pub fn contains(&self, value: &Json) -> bool {
        self.values.iter().any(|v| v.matches(value))
    }

    /// Every value as JSON.
    pub fn json_values(&self) -> Vec<Json> {
        self.values.iter().map(|v| v.to_json()).collect()
    }
}

/// Index of the variant whose value is exactly `value`.
pub fn decode_enum_index(def: &EnumDef, value: &Json) -> Result<usize, Error> {
    if let Some(index) = def.values.iter().position(|v| v.matches(value)) {
        return Ok(index);
    }

    let expected: Vec<String> = def.values.iter().map(|v| v.to_json().to_string()).collect();
    let suggestion = value.as_str().and_then(|s| {
        let names = def.values.iter().filter_map(|v| match v {
            EnumValue::Str(name) => Some(*name),
            EnumValue::Int(_) => None,
        });
        suggest(s, names).map(|name| Json::from(name).to_string())
    });
    Err(Error::new(ErrorKind::InvalidEnumValue {
        name: def.name,
        value: value.to_string(),
        expected,
        suggestion,
    }))
}
