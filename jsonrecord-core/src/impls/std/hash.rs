use std::collections::{HashMap, HashSet};
use std::hash::{BuildHasher, Hash};

use crate::codec::Codec;
use crate::config::{Config, SetOrder};
use crate::error::Error;
use crate::hint::{CollectionKind, TypeHint};
use crate::json::{Json, canonical_cmp};

use super::super::{decode_map, decode_seq, encode_map, encode_seq};

impl<T, S> Codec for HashSet<T, S>
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
        let mut items = encode_seq(self, config)?;
        if config.set_order == SetOrder::Sorted {
            items.sort_by(canonical_cmp);
        }
        Ok(Json::Array(items))
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        decode_seq(value, config)
    }
}

impl<K, V, S> Codec for HashMap<K, V, S>
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorted_sets_encode_canonically() {
        let config = Config::new().set_order(SetOrder::Sorted);
        let set: HashSet<i32> = [5, 1, 3, 2, 4].into();
        assert_eq!(set.encode(&config).unwrap(), json!([1, 2, 3, 4, 5]));
    }

    #[test]
    fn sets_round_trip_in_any_order() {
        let config = Config::new();
        let set: HashSet<String> = ["a".to_owned(), "b".to_owned()].into();
        let encoded = set.encode(&config).unwrap();
        assert_eq!(HashSet::<String>::decode(encoded, &config).unwrap(), set);
    }

    #[test]
    fn maps_with_string_keys_round_trip() {
        let config = Config::new();
        let map: HashMap<String, Vec<i32>> = [("x".to_owned(), vec![1, 2])].into();
        let encoded = map.encode(&config).unwrap();
        assert_eq!(encoded, json!({"x": [1, 2]}));
        assert_eq!(HashMap::<String, Vec<i32>>::decode(encoded, &config).unwrap(), map);
    }
}
