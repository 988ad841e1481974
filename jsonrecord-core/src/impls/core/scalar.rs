use crate::codec::Codec;
use crate::config::Config;
use crate::error::{Error, ErrorKind};
use crate::hint::{Scalar, TypeHint};
use crate::json::Json;

impl Codec for bool {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Bool)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::Bool(*self))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        value
            .as_bool()
            .ok_or_else(|| Error::invalid_type("boolean", &value))
    }
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl Codec for $ty {
            fn type_hint() -> TypeHint {
                TypeHint::Scalar(Scalar::Int)
            }

            fn encode(&self, _config: &Config) -> Result<Json, Error> {
                Ok(Json::from(i64::from(*self)))
            }

            fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
                if let Some(n) = value.as_u64().filter(|n| i64::try_from(*n).is_err()) {
                    return Err(Error::invalid_value(format!(
                        "{n} out of range for {}",
                        stringify!($ty)
                    )));
                }
                let n = value
                    .as_i64()
                    .filter(|_| !value.is_f64())
                    .ok_or_else(|| Error::invalid_type("integer", &value))?;
                <$ty>::try_from(n).map_err(|_| {
                    Error::invalid_value(format!("{n} out of range for {}", stringify!($ty)))
                })
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl Codec for $ty {
            fn type_hint() -> TypeHint {
                TypeHint::Scalar(Scalar::Int)
            }

            fn encode(&self, _config: &Config) -> Result<Json, Error> {
                Ok(Json::from(u64::from(*self)))
            }

            fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
                if let Some(n) = value.as_i64().filter(|n| *n < 0) {
                    return Err(Error::invalid_value(format!(
                        "{n} out of range for {}",
                        stringify!($ty)
                    )));
                }
                let n = value
                    .as_u64()
                    .ok_or_else(|| Error::invalid_type("integer", &value))?;
                <$ty>::try_from(n).map_err(|_| {
                    Error::invalid_value(format!("{n} out of range for {}", stringify!($ty)))
                })
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

impl Codec for isize {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Int)
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        i64::try_from(*self)
            .map_err(|_| Error::new(ErrorKind::Unencodable {
                message: format!("{self} does not fit in a JSON integer"),
            }))?
            .encode(config)
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        let n = i64::decode(value, config)?;
        isize::try_from(n).map_err(|_| Error::invalid_value(format!("{n} out of range for isize")))
    }
}

impl Codec for usize {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Int)
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        u64::try_from(*self)
            .map_err(|_| Error::new(ErrorKind::Unencodable {
                message: format!("{self} does not fit in a JSON integer"),
            }))?
            .encode(config)
    }

    fn decode(value: Json, config: &Config) -> Result<Self, Error> {
        let n = u64::decode(value, config)?;
        usize::try_from(n).map_err(|_| Error::invalid_value(format!("{n} out of range for usize")))
    }
}

fn encode_float(value: f64) -> Result<Json, Error> {
    serde_json::Number::from_f64(value)
        .map(Json::Number)
        .ok_or_else(|| {
            Error::new(ErrorKind::Unencodable {
                message: format!("{value} has no JSON representation"),
            })
        })
}

impl Codec for f64 {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Float)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        encode_float(*self)
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        value
            .as_f64()
            .ok_or_else(|| Error::invalid_type("number", &value))
    }
}

impl Codec for f32 {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Float)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        encode_float(f64::from(*self))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        value
            .as_f64()
            .map(|n| n as f32)
            .ok_or_else(|| Error::invalid_type("number", &value))
    }
}

impl Codec for char {
    fn type_hint() -> TypeHint {
        TypeHint::Scalar(Scalar::Str)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::String(self.to_string()))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        let s = value
            .as_str()
            .ok_or_else(|| Error::invalid_type("string", &value))?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::invalid_value(format!(
                "expected a single character, got {s:?}"
            ))),
        }
    }
}

impl Codec for () {
    fn type_hint() -> TypeHint {
        TypeHint::Null
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::Null)
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        match value {
            Json::Null => Ok(()),
            other => Err(Error::invalid_type("null", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integers_check_range() {
        let config = Config::new();
        assert_eq!(u8::decode(json!(255), &config).unwrap(), 255);
        assert!(u8::decode(json!(256), &config).is_err());
        assert!(u32::decode(json!(-1), &config).is_err());
        assert_eq!(i8::decode(json!(-128), &config).unwrap(), -128);
        assert!(i64::decode(json!(1.5), &config).is_err());
    }

    #[test]
    fn large_unsigned_literals_are_out_of_range_for_signed() {
        let config = Config::new();
        let err = i64::decode(json!(u64::MAX), &config).unwrap_err();
        assert_eq!(err.code(), "jsonrecord::invalid_value");
        let err = i32::decode(json!(1u64 << 63), &config).unwrap_err();
        assert_eq!(err.code(), "jsonrecord::invalid_value");
        assert_eq!(i64::decode(json!(i64::MAX as u64), &config).unwrap(), i64::MAX);
    }

    #[test]
    fn integer_keys_round_trip_through_text() {
        let config = Config::new();
        let key = 42u16.encode_key(&config).unwrap();
        assert_eq!(key, "42");
        assert_eq!(u16::decode_key(&key, &config).unwrap(), 42);
    }

    #[test]
    fn non_finite_floats_are_unencodable() {
        let err = f64::NAN.encode(&Config::new()).unwrap_err();
        assert_eq!(err.code(), "jsonrecord::unencodable");
    }

    #[test]
    fn floats_accept_integers() {
        assert_eq!(f64::decode(json!(3), &Config::new()).unwrap(), 3.0);
    }
}
