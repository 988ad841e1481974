//! Decoding of values whose declared type is a union.

use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::hint::TypeHint;
use crate::json::{Json, kind_name};

/// One arm of a union: its type and how to decode into the union.
pub struct Arm<T> {
    hint: TypeHint,
    decode: fn(Json, &Config) -> Result<T, Error>,
}

impl<T> Arm<T> {
    /// An arm of type `hint`, decoded by `decode`.
    pub fn new(hint: TypeHint, decode: fn(Json, &Config) -> Result<T, Error>) -> Self {
        Arm { hint, decode }
    }
}

/// Decode `value` into the first arm that accepts it.
///
/// Arms whose shape matches the value are tried first, in declaration order,
/// then the remaining arms. The first successful decode wins.
pub fn decode_union<T>(
    name: &'static str,
    value: Json,
    config: &Config,
    arms: &[Arm<T>],
) -> Result<T, Error> {
    let (matching, others): (Vec<&Arm<T>>, Vec<&Arm<T>>) =
        arms.iter().partition(|arm| arm.hint.matches_shape(&value));

    if matching.len() > 1 {
        crate::debug!(
            "{} value matches {} arms of {}, trying in declaration order",
            kind_name(&value),
            matching.len(),
            name
        );
    }

    for arm in matching.into_iter().chain(others) {
        match (arm.decode)(value.clone(), config) {
            Ok(decoded) => return Ok(decoded),
            Err(_err) => {
                crate::trace!("{} arm {} rejected value: {}", name, arm.hint, _err);
            }
        }
    }

    Err(Error::new(ErrorKind::NoMatchingArm {
        name,
        got: kind_name(&value),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Codec;
    use serde_json::json;

    #[derive(Debug, PartialEq)]
    enum IntOrText {
        Int(i64),
        Text(String),
        Flag(bool),
    }

    fn arms() -> Vec<Arm<IntOrText>> {
        vec![
            Arm::new(i64::type_hint(), |v, c| i64::decode(v, c).map(IntOrText::Int)),
            Arm::new(String::type_hint(), |v, c| {
                String::decode(v, c).map(IntOrText::Text)
            }),
            Arm::new(bool::type_hint(), |v, c| bool::decode(v, c).map(IntOrText::Flag)),
        ]
    }

    #[test]
    fn picks_the_arm_matching_the_shape() {
        let config = Config::new();
        assert_eq!(
            decode_union("IntOrText", json!("7"), &config, &arms()).unwrap(),
            IntOrText::Text("7".into())
        );
        assert_eq!(
            decode_union("IntOrText", json!(7), &config, &arms()).unwrap(),
            IntOrText::Int(7)
        );
        assert_eq!(
            decode_union("IntOrText", json!(false), &config, &arms()).unwrap(),
            IntOrText::Flag(false)
        );
    }

    #[test]
    fn reports_when_no_arm_accepts() {
        let err = decode_union("IntOrText", json!([1]), &Config::new(), &arms()).unwrap_err();
        assert!(matches!(
            err.kind,
            ErrorKind::NoMatchingArm {
                name: "IntOrText",
                got: "array"
            }
        ));
    }
}
