use std::borrow::Cow;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{Scalar, TypeHint};
use crate::json::Json;

impl Codec for String {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Str)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::String(self.clone()))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        match value {
            Json::String(s) => Ok(s),
            other => Err(Error::invalid_type("string", &other)),
        }
    }

    fn encode_key(&self, _config: &Config) -> Result<String, Error> {
        Ok(self.clone())
    }

    fn decode_key(key: &str, _config: &Config) -> Result<Self, Error> {
        Ok(key.to_owned())
    }
}

impl Codec for Cow<'static, str> {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Str)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::String(self.to_string()))
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        String::decode(value, config).map(Cow::Owned)
    }

    fn encode_key(&self, _config: &Config) -> Result<String, Error> {
        Ok(self.to_string())
    }

    fn decode_key(key: &str, _config: &Config) -> Result<Self, Error> {
        Ok(Cow::Owned(key.to_owned()))
    }
}
