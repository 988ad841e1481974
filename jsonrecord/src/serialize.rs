use std::io;

use jsonrecord_core::{Codec, Config, Error, Json, sort_keys};
use serde::Serialize;
use serde_json::ser::{CompactFormatter, PrettyFormatter, Serializer};

/// Options for JSON text output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Whether to pretty-print with indentation (default: false)
    pub pretty: bool,

    /// Indentation string for pretty-printing (default: "  ")
    pub indent: &'static str,

    /// Whether object keys are written in sorted order (default: false)
    pub sort_keys: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: "  ",
            sort_keys: false,
        }
    }
}

impl SerializeOptions {
    /// Create new default options (compact output, declaration order).
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty-printing with default indentation.
    pub const fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Set a custom indentation string (implies pretty-printing).
    pub const fn indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self.pretty = true;
        self
    }

    /// Write object keys in sorted order.
    pub const fn sort_keys(mut self) -> Self {
        self.sort_keys = true;
        self
    }
}

fn write_json<W: io::Write>(writer: W, value: &Json, options: &SerializeOptions) -> Result<(), Error> {
    if options.pretty {
        let formatter = PrettyFormatter::with_indent(options.indent.as_bytes());
        value.serialize(&mut Serializer::with_formatter(writer, formatter))?;
    } else {
        value.serialize(&mut Serializer::with_formatter(writer, CompactFormatter))?;
    }
    Ok(())
}

/// Encodes a value with `config`, then writes it to `writer` as JSON text.
pub fn to_writer_with_options<T: Codec, W: io::Write>(
    writer: W,
    value: &T,
    config: &Config,
    options: &SerializeOptions,
) -> Result<(), Error> {
    let mut json = value.encode(config)?;
    if options.sort_keys {
        sort_keys(&mut json);
    }
    write_json(writer, &json, options)
}

/// Encodes a value with `config` to JSON text, using custom output options.
///
/// # Example
///
/// ```
/// use jsonrecord::{Config, Record, SerializeOptions, to_string_with_options};
///
/// #[derive(Record)]
/// struct Person {
///     name: String,
///     age: u32,
/// }
///
/// let person = Person { name: "Alice".to_string(), age: 30 };
/// let options = SerializeOptions::new().indent("    ").sort_keys();
/// let json = to_string_with_options(&person, &Config::default(), &options).unwrap();
/// assert_eq!(json, "{\n    \"age\": 30,\n    \"name\": \"Alice\"\n}");
/// ```
pub fn to_string_with_options<T: Codec>(
    value: &T,
    config: &Config,
    options: &SerializeOptions,
) -> Result<String, Error> {
    let bytes = to_vec_with_options(value, config, options)?;
    String::from_utf8(bytes).map_err(Error::custom)
}

/// Encodes a value with `config` to JSON bytes, using custom output options.
pub fn to_vec_with_options<T: Codec>(
    value: &T,
    config: &Config,
    options: &SerializeOptions,
) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    to_writer_with_options(&mut out, value, config, options)?;
    Ok(out)
}

/// Encodes a value to compact JSON text.
pub fn to_string<T: Codec>(value: &T) -> Result<String, Error> {
    to_string_with_options(value, &Config::default(), &SerializeOptions::default())
}

/// Encodes a value to pretty-printed JSON text.
pub fn to_string_pretty<T: Codec>(value: &T) -> Result<String, Error> {
    to_string_with_options(value, &Config::default(), &SerializeOptions::new().pretty())
}

/// Encodes a value to compact JSON bytes.
pub fn to_vec<T: Codec>(value: &T) -> Result<Vec<u8>, Error> {
    to_vec_with_options(value, &Config::default(), &SerializeOptions::default())
}

/// Encodes a value as compact JSON text into `writer`.
pub fn to_writer<T: Codec, W: io::Write>(writer: W, value: &T) -> Result<(), Error> {
    to_writer_with_options(writer, value, &Config::default(), &SerializeOptions::default())
}

/// Encodes a value to a JSON value tree.
pub fn to_value<T: Codec>(value: &T) -> Result<Json, Error> {
    value.encode(&Config::default())
}

/// Encodes a value to a JSON value tree with `config`.
pub fn to_value_with<T: Codec>(value: &T, config: &Config) -> Result<Json, Error> {
    value.encode(config)
}
