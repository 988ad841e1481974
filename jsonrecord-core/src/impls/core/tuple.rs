use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::TypeHint;
use crate::json::Json;

use super::super::expect_array;

macro_rules! impl_tuple {
    ($len:literal => $($name:ident : $idx:tt),+) => {
        impl<$($name: Codec),+> Codec for ($($name,)+) {
            fn type_hint() -> TypeHint {
                TypeHint::Tuple(vec![$($name::type_hint()),+])
            }

            fn encode(&self, config: &Config) -> Result<Json, Error> {
                Ok(Json::Array(vec![
                    $(self.$idx.encode(config).map_err(|e| e.at_index($idx))?),+
                ]))
            }

            fn decode(value: Json, config: &Config) -> Result<Self, Error> {
                let items = expect_array(value)?;
                if items.len() != $len {
                    return Err(Error::invalid_value(format!(
                        "expected an array of {} elements, got {}",
                        $len,
                        items.len()
                    )));
                }
                let mut items = items.into_iter();
                Ok(($(
                    match items.next() {
                        Some(item) => $name::decode(item, config).map_err(|e| e.at_index($idx))?,
                        None => return Err(Error::invalid_value("tuple ended early")),
                    },
                )+))
            }
        }
    };
}

impl_tuple!(1 => A: 0);
impl_tuple!(2 => A: 0, B: 1);
impl_tuple!(3 => A: 0, B: 1, C: 2);
impl_tuple!(4 => A: 0, B: 1, C: 2, D: 3);
impl_tuple!(5 => A: 0, B: 1, C: 2, D: 3, E: 4);
impl_tuple!(6 => A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tuples_need_exact_arity() {
        let config = Config::new();
        let pair: (i32, String) = Codec::decode(json!([1, "a"]), &config).unwrap();
        assert_eq!(pair, (1, "a".to_owned()));
        assert!(<(i32, String)>::decode(json!([1]), &config).is_err());
        assert!(<(i32, String)>::decode(json!([1, "a", 2]), &config).is_err());
    }

    #[test]
    fn tuple_keys_encode_as_json_text() {
        let config = Config::new();
        let key = (1u8, 2u8).encode_key(&config).unwrap();
        assert_eq!(key, "[1,2]");
        assert_eq!(<(u8, u8)>::decode_key(&key, &config).unwrap(), (1, 2));
    }

    #[test]
    fn element_errors_carry_their_index() {
        let err = <(i32, i32)>::decode(json!([1, "x"]), &Config::new()).unwrap_err();
        assert_eq!(err.path.to_string(), "$[1]");
    }
}
