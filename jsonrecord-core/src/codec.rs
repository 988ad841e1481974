use crate::config::Config;
use crate::error::Error;
use crate::hint::TypeHint;
use crate::json::Json;
use crate::record::{Record, decode_record};

/// A type that can appear in a record field.
///
/// `encode` and `decode` implement the generic encoding of the type; field
/// overrides are applied around them by the record engine.
pub trait Codec: Sized + 'static {
    /// Description of this type, used for classification and schemas.
    fn type_hint() -> TypeHint;

    /// Encode a value.
    fn encode(&self, config: &Config) -> Result<Json, Error>;

    /// Decode a value.
    fn decode(value: Json, config: &Config) -> Result<Self, Error>;

    /// Encode a value used as a mapping key.
    ///
    /// Strings are used verbatim; every other value becomes its compact JSON
    /// text.
    fn encode_key(&self, config: &Config) -> Result<String, Error> {
        Ok(match self.encode(config)? {
            Json::String(s) => s,
            other => other.to_string(),
        })
    }

    /// Decode a mapping key produced by [`Codec::encode_key`].
    fn decode_key(key: &str, config: &Config) -> Result<Self, Error> {
        match Self::decode(Json::String(key.to_owned()), config) {
            Ok(value) => Ok(value),
            Err(err) => match serde_json::from_str::<Json>(key) {
                Ok(parsed) => Self::decode(parsed, config),
                Err(_) => Err(err),
            },
        }
    }
}

/// Input to [`decode_input`]: raw JSON, or a value that is already decoded.
#[derive(Debug, Clone)]
pub enum Input<R> {
    /// Raw JSON to decode
    Json(Json),
    /// An already-decoded record
    Record(R),
}

impl<R> From<Json> for Input<R> {
    fn from(value: Json) -> Self {
        Input::Json(value)
    }
}

/// Decode `input` as `R`, returning already-decoded records unchanged.
pub fn decode_input<R: Record>(input: impl Into<Input<R>>, config: &Config) -> Result<R, Error> {
    match input.into() {
        Input::Record(record) => Ok(record),
        Input::Json(value) => decode_record(value, config),
    }
}
