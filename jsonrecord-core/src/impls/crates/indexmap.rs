use core::hash::{BuildHasher, Hash};

use indexmap::{IndexMap, IndexSet};

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{CollectionKind, TypeHint};
use crate::json::Json;

use super::super::{decode_map, decode_seq, encode_map, encode_seq};

impl<K, V, S> Codec for IndexMap<K, V, S>
where
    K: Codec + Eq + Hash,
    V: Codec,
    S: BuildHasher + Default + 'static,
{
    fn type_hint() -> TypeHint {
        TypeHint::mapping(K::type_hint(), V::type_hint())
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        encode_map(self, config)
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        decode_map(value, config)
    }
}

impl<T, S> Codec for IndexSet<T, S>
where
    T: Codec + Eq + Hash,
    S: BuildHasher + Default + 'static,
{
    fn type_hint() -> TypeHint {
        TypeHint::Collection {
            kind: CollectionKind::Set,
            item: Box::new(T::type_hint()),
        }
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        encode_seq(self, config).map(Json::Array)
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        decode_seq(value, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn index_maps_keep_insertion_order() {
        let config = Config::new();
        let decoded: IndexMap<String, i32> = Codec::decode(json!({"z": 1, "a": 2}), &config).unwrap();
        assert_eq!(decoded.keys().collect::<Vec<_>>(), ["z", "a"]);
        let text = serde_json::to_string(&decoded.encode(&config).unwrap()).unwrap();
        assert_eq!(text, r#"{"z":1,"a":2}"#);
    }
}
