use jsonrecord_core::{Codec, Config, Error, Json};

/// Parses JSON text and decodes it as `T`.
///
/// # Example
///
/// ```
/// use jsonrecord::{Record, from_str};
///
/// #[derive(Record, Debug, PartialEq)]
/// #[record(letter_case = "camelCase")]
/// struct Person {
///     given_name: String,
///     #[record(default)]
///     nickname: Option<String>,
/// }
///
/// let person: Person = from_str(r#"{"givenName": "Alice"}"#).unwrap();
/// assert_eq!(person, Person { given_name: "Alice".to_string(), nickname: None });
/// ```
pub fn from_str<T: Codec>(text: &str) -> Result<T, Error> {
    from_str_with(text, &Config::default())
}

/// Parses JSON text and decodes it as `T` with `config`.
pub fn from_str_with<T: Codec>(text: &str, config: &Config) -> Result<T, Error> {
    let value: Json = serde_json::from_str(text)?;
    T::decode(value, config)
}

/// Parses JSON bytes and decodes them as `T`.
pub fn from_slice<T: Codec>(bytes: &[u8]) -> Result<T, Error> {
    from_slice_with(bytes, &Config::default())
}

/// Parses JSON bytes and decodes them as `T` with `config`.
pub fn from_slice_with<T: Codec>(bytes: &[u8], config: &Config) -> Result<T, Error> {
    let value: Json = serde_json::from_slice(bytes)?;
    T::decode(value, config)
}

/// Decodes a JSON value tree as `T`.
pub fn from_value<T: Codec>(value: Json) -> Result<T, Error> {
    T::decode(value, &Config::default())
}

/// Decodes a JSON value tree as `T` with `config`.
pub fn from_value_with<T: Codec>(value: Json, config: &Config) -> Result<T, Error> {
    T::decode(value, config)
}
