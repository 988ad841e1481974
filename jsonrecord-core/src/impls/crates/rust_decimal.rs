#![cfg(feature = "rust_decimal")]

use core::str::FromStr;

use rust_decimal::Decimal;

use crate::codec::Codec;
use crate::config::Config;
use crate::error::Error;
use crate::hint::{Extended, TypeHint};
use crate::json::Json;

impl Codec for Decimal {
    fn type_hint() -> TypeHint {
        TypeHint::Extended(Extended::Decimal)
    }

    fn encode(&self, _config: &Config) -> Result<Json, Error> {
        Ok(Json::String(self.to_string()))
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        let text = match &value {
            Json::String(s) => s.clone(),
            Json::Number(n) => n.to_string(),
            other => return Err(Error::invalid_type("decimal", other)),
        };
        Decimal::from_str(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .map_err(|e| Error::invalid_value(format!("{text:?} is not a decimal: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decimals_encode_as_strings() {
        let d = Decimal::new(12345, 2);
        assert_eq!(d.encode(&Config::new()).unwrap(), json!("123.45"));
    }

    #[test]
    fn decimals_decode_from_strings_and_numbers() {
        let config = Config::new();
        assert_eq!(Decimal::decode(json!("0.1"), &config).unwrap(), Decimal::new(1, 1));
        assert_eq!(Decimal::decode(json!(42), &config).unwrap(), Decimal::from(42));
        assert!(Decimal::decode(json!("abc"), &config).is_err());
    }
}
