use std::rc::Rc;
use std::sync::Arc;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::TypeHint;
use crate::json::Json;

macro_rules! impl_pointer {
    ($($ptr:ident),*) => {$(
        impl<T: Codec> Codec for $ptr<T> {
            fn type_hint() -> TypeHint {
                T::type_hint()
            }

            fn encode(&self, config: &Config) -> Result<Json, Error> {
                (**self).encode(config)
            }

            fn decode(value: Json, config: &Config) -> Result<Self, Error> {
                T::decode(value, config).map($ptr::new)
            }

            fn encode_key(&self, config: &Config) -> Result<String, Error> {
                (**self).encode_key(config)
            }

            fn decode_key(key: &str, config: &Config) -> Result<Self, Error> {
                T::decode_key(key, config).map($ptr::new)
            }
        }
    )*};
}

impl_pointer!(Box, Rc, Arc);
