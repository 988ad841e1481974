use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{Scalar, TypeHint};
use crate::json::{Json, JsonMap};

impl Codec for Json {
    fn type_hint() -> TypeHint {
        TypeHint::Any
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(self.clone())
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        Ok(value)
    }
}

impl Codec for JsonMap {
    fn type_hint() -> TypeHint {
        TypeHint::mapping(TypeHint::Scalar(Scalar::Str), TypeHint::Any)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::Object(self.clone()))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        match value {
            Json::Object(object) => Ok(object),
            other => Err(Error::invalid_type("object", &other)),
        }
    }
}
