use jsonrecord_core::{Config, Error, Input, Json, Record, RecordBuilder, decode_input};
use jsonrecord_schema::Schema;

use crate::SerializeOptions;

/// Conversion methods available on every [`Record`].
///
/// ```
/// use jsonrecord::{Record, RecordExt};
///
/// #[derive(Record, Debug, PartialEq)]
/// struct Point {
///     x: i64,
///     y: i64,
/// }
///
/// let point = Point::from_json(r#"{"x": 1, "y": 2}"#).unwrap();
/// assert_eq!(point.to_json().unwrap(), r#"{"x":1,"y":2}"#);
/// ```
pub trait RecordExt: Record {
    /// Compact JSON text.
    fn to_json(&self) -> Result<String, Error> {
        crate::to_string(self)
    }

    /// Pretty-printed JSON text.
    fn to_json_pretty(&self) -> Result<String, Error> {
        crate::to_string_pretty(self)
    }

    /// JSON text under `config` and `options`.
    fn to_json_with(&self, config: &Config, options: &SerializeOptions) -> Result<String, Error> {
        crate::to_string_with_options(self, config, options)
    }

    /// A JSON value tree.
    fn to_value(&self) -> Result<Json, Error> {
        crate::to_value(self)
    }

    /// Decode from JSON text.
    fn from_json(text: &str) -> Result<Self, Error> {
        crate::from_str(text)
    }

    /// Decode from a JSON value tree.
    fn from_value(value: Json) -> Result<Self, Error> {
        crate::from_value(value)
    }

    /// Decode from a JSON value tree with `config`.
    fn from_value_with(value: Json, config: &Config) -> Result<Self, Error> {
        crate::from_value_with(value, config)
    }

    /// Decode raw JSON, or pass an already-built record through unchanged.
    fn coerce(input: impl Into<Input<Self>>, config: &Config) -> Result<Self, Error> {
        decode_input(input, config)
    }

    /// A validating schema under the default configuration.
    fn schema() -> Schema<Self> {
        Schema::new()
    }

    /// A builder taking constructor-style arguments.
    fn builder() -> RecordBuilder<Self> {
        RecordBuilder::new()
    }
}

impl<R: Record> RecordExt for R {}
