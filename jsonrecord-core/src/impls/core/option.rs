use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::TypeHint;
use crate::json::Json;

impl<T: Codec> Codec for Option<T> {
    fn type_hint() -> TypeHint {
        TypeHint::optional(T::type_hint())
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        match self {
            Some(inner) => inner.encode(config),
            None => Ok(Json::Null),
        }
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        match value {
            Json::Null => Ok(None),
            other => T::decode(other, config).map(Some),
        }
    }
}
