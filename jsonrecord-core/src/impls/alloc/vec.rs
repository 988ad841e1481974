use std::collections::VecDeque;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{CollectionKind, TypeHint};
use crate::json::Json;

use super::super::{decode_seq, encode_seq};

impl<T: Codec> Codec for Vec<T> {
    fn type_hint() -> TypeHint {
        TypeHint::list(T::type_hint())
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        encode_seq(self, config).map(Json::Array)
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        decode_seq(value, config)
    }
}

impl<T: Codec> Codec for VecDeque<T> {
    fn type_hint() -> TypeHint {
        TypeHint::Collection {
            kind: CollectionKind::Deque,
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
    fn nested_lists_report_element_paths() {
        let err = Vec::<Vec<u8>>::decode(json!([[1], [2, "x"]]), &Config::new()).unwrap_err();
        assert_eq!(err.path.to_string(), "$[1][1]");
    }

    #[test]
    fn deques_keep_order() {
        let config = Config::new();
        let deque: VecDeque<i32> = Codec::decode(json!([3, 1, 2]), &config).unwrap();
        assert_eq!(deque.encode(&config).unwrap(), json!([3, 1, 2]));
    }
}
