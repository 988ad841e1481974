#![cfg(feature = "uuid")]

use uuid::Uuid;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{Extended, TypeHint};
use crate::json::Json;

impl Codec for Uuid {
    fn type_hint() -> TypeHint {
        TypeHint::Extended(Extended::Uuid)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::String(self.hyphenated().to_string()))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        let s = value
            .as_str()
            .ok_or_else(|| Error::invalid_type("uuid string", &value))?;
        Uuid::parse_str(s).map_err(|e| Error::invalid_value(format!("{s:?} is not a UUID: {e}")))
    }
}
