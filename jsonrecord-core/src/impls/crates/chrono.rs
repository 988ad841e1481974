#![cfg(feature = "chrono")]

use chrono::{DateTime, FixedOffset, Utc};

use crate::codec::Codec;
use crate::config::{Config, TimestampFormat};
use crate::error::Error;
use crate::hint::{Extended, TypeHint};
use crate::json::Json;

fn encode_timestamp<Tz: chrono::TimeZone>(value: &DateTime<Tz>, config: &Config) -> Result<Json, Error>
where
    Tz::Offset: core::fmt::Display,
{
    match config.timestamp_format {
        TimestampFormat::Posix => {
            let seconds =
                value.timestamp() as f64 + f64::from(value.timestamp_subsec_nanos()) / 1e9;
            seconds.encode(config)
        }
        TimestampFormat::Iso8601 => Ok(Json::String(value.to_rfc3339())),
    }
}

/// Fractional POSIX seconds, rounded to the microsecond.
fn from_fractional_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    if !seconds.is_finite() {
        return None;
    }
    let mut whole = seconds.floor();
    let mut micros = ((seconds - whole) * 1e6).round() as u32;
    if micros >= 1_000_000 {
        whole += 1.0;
        micros -= 1_000_000;
    }
    DateTime::from_timestamp(whole as i64, micros * 1_000)
}

/// POSIX seconds (integral or fractional) or an RFC 3339 string.
fn decode_timestamp(value: Json) -> Result<DateTime<FixedOffset>, Error> {
    match &value {
        Json::Number(n) => {
            let parsed = match n.as_i64() {
                Some(seconds) => DateTime::from_timestamp(seconds, 0),
                None => n.as_f64().and_then(from_fractional_seconds),
            };
            parsed
                .map(|dt| dt.fixed_offset())
                .ok_or_else(|| Error::invalid_value(format!("timestamp {n} out of range")))
        }
        Json::String(s) => DateTime::parse_from_rfc3339(s)
            .map_err(|e| Error::invalid_value(format!("{s:?} is not an RFC 3339 timestamp: {e}"))),
        other => Err(Error::invalid_type("timestamp", other)),
    }
}

impl Codec for DateTime<Utc> {
    fn type_hint() -> TypeHint {
        TypeHint::Extended(Extended::Timestamp)
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        encode_timestamp(self, config)
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        decode_timestamp(value).map(|dt| dt.with_timezone(&Utc))
    }
}

impl Codec for DateTime<FixedOffset> {
    fn type_hint() -> TypeHint {
        TypeHint::Extended(Extended::Timestamp)
    }

    fn encode(&self, config: &Config) -> Result<Json, Error> {
        encode_timestamp(self, config)
    }

    fn decode(value: Json, _config: &Config) -> Result<Self, Error> {
        decode_timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn moment() -> DateTime<Utc> {
        DateTime::from_timestamp(1_600_000_000, 500_000_000).unwrap()
    }

    #[test]
    fn posix_is_the_default() {
        let encoded = moment().encode(&Config::new()).unwrap();
        assert_eq!(encoded, json!(1_600_000_000.5));
        assert_eq!(DateTime::<Utc>::decode(encoded, &Config::new()).unwrap(), moment());
    }

    #[test]
    fn iso_strings_round_trip() {
        let config = Config::new().timestamp_format(TimestampFormat::Iso8601);
        let encoded = moment().encode(&config).unwrap();
        assert_eq!(encoded, json!("2020-09-13T12:26:40.500+00:00"));
        assert_eq!(DateTime::<Utc>::decode(encoded, &config).unwrap(), moment());
    }

    #[test]
    fn microsecond_fractions_round_trip() {
        let config = Config::new();
        for nanos in [123_456_000, 1_000, 999_999_000] {
            let dt = DateTime::from_timestamp(1_600_000_000, nanos).unwrap();
            let encoded = dt.encode(&config).unwrap();
            assert_eq!(DateTime::<Utc>::decode(encoded, &config).unwrap(), dt);
        }
    }

    #[test]
    fn fractions_carry_into_the_next_second() {
        let dt = DateTime::<Utc>::decode(json!(1_599_999_999.999_999_9), &Config::new()).unwrap();
        assert_eq!(dt, DateTime::from_timestamp(1_600_000_000, 0).unwrap());
    }

    #[test]
    fn integral_seconds_decode() {
        let dt = DateTime::<Utc>::decode(json!(0), &Config::new()).unwrap();
        assert_eq!(dt, DateTime::UNIX_EPOCH);
    }

    #[test]
    fn offsets_survive_iso_decoding() {
        let dt = DateTime::<FixedOffset>::decode(json!("2021-01-01T10:00:00+02:00"), &Config::new())
            .unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 7200);
    }
}
