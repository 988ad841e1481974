use std::collections::{BTreeMap, BTreeSet};

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{CollectionKind, TypeHint};
use crate::json::Json;

use super::super::{decode_map, decode_seq, encode_map, encode_seq};

impl<T: Codec + Ord> Codec for BTreeSet<T> {
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

impl<K: Codec + Ord, V: Codec> Codec for BTreeMap<K, V> {
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
    fn integer_keyed_maps_round_trip() {
        let config = Config::new();
        let map: BTreeMap<u32, String> = [(2, "b".to_owned()), (10, "j".to_owned())].into();
        let encoded = map.encode(&config).unwrap();
        assert_eq!(encoded, json!({"2": "b", "10": "j"}));
        assert_eq!(BTreeMap::<u32, String>::decode(encoded, &config).unwrap(), map);
    }

    #[test]
    fn value_errors_carry_their_key() {
        let err = BTreeMap::<String, i32>::decode(json!({"a": 1, "b": "x"}), &Config::new())
            .unwrap_err();
        assert_eq!(err.path.to_string(), r#"$["b"]"#);
    }
}
