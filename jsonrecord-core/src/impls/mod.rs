//! [`Codec`](crate::Codec) implementations for standard and third-party types.

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::json::{Json, JsonMap};

// Definition for `core::` types
mod core;

// Definition for `alloc::` types
mod alloc;

// Definition for `std::` types (that aren't in `alloc` or `core`)
mod std;

// Definition for various crates
mod crates;

fn expect_array(value: Json) -> Result<Vec<Json>, Error> {
    match value {
        Json::Array(items) => Ok(items),
        other => Err(Error::invalid_type("array", &other)),
    }
}

fn expect_object(value: Json) -> Result<JsonMap, Error> {
    match value {
        Json::Object(object) => Ok(object),
        other => Err(Error::invalid_type("object", &other)),
    }
}

fn encode_seq<'a, T: Codec>(
    items: impl IntoIterator<Item = &'a T>,
    config: &Config,
) -> Result<Vec<Json>, Error> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| item.encode(config).map_err(|e| e.at_index(i)))
        .collect()
}

fn decode_seq<T: Codec, C: FromIterator<T>>(value: Json, config: &Config) -> Result<C, Error> {
    expect_array(value)?
        .into_iter()
        .enumerate()
        .map(|(i, item)| T::decode(item, config).map_err(|e| e.at_index(i)))
        .collect()
}

fn encode_map<'a, K: Codec, V: Codec>(
    entries: impl IntoIterator<Item = (&'a K, &'a V)>,
    config: &Config,
) -> Result<Json, Error> {
    let mut object = JsonMap::new();
    for (key, value) in entries {
        let key = key.encode_key(config)?;
        let value = value.encode(config).map_err(|e| e.at_key(key.as_str()))?;
        object.insert(key, value);
    }
    Ok(Json::Object(object))
}

fn decode_map<K: Codec, V: Codec, C: FromIterator<(K, V)>>(
    value: Json,
    config: &Config,
) -> Result<C, Error> {
    expect_object(value)?
        .into_iter()
        .map(|(key, value)| {
            let k = K::decode_key(&key, config).map_err(|e| e.at_key(key.as_str()))?;
            let v = V::decode(value, config).map_err(|e| e.at_key(key))?;
            Ok((k, v))
        })
        .collect()
}
