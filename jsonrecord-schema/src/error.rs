use core::fmt;
use std::collections::BTreeMap;

use jsonrecord_core::{Error, Path};

/// Every problem found while validating a document, keyed by the JSON path
/// of the offending value (`$.children[1].x`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    /// No errors.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` against `path`.
    pub fn add(&mut self, path: &Path, message: impl Into<String>) {
        self.errors
            .entry(path.to_string())
            .or_default()
            .push(message.into());
    }

    /// Whether no error was recorded.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of paths with at least one error.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded against `path`, e.g. `"$.name"`.
    pub fn get(&self, path: &str) -> Option<&[String]> {
        self.errors.get(path).map(Vec::as_slice)
    }

    /// Every path and its messages, sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The underlying map.
    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.errors
    }

    pub(crate) fn extend(&mut self, other: ValidationErrors) {
        for (path, messages) in other.errors {
            self.errors.entry(path).or_default().extend(messages);
        }
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, messages) in &self.errors {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                write!(f, "{path}: {message}")?;
            }
        }
        Ok(())
    }
}

impl core::error::Error for ValidationErrors {}

/// Failure of a schema operation.
#[derive(Debug)]
pub enum SchemaError {
    /// The document does not satisfy the schema
    Validation(ValidationErrors),
    /// The document validated but could not be decoded into the record
    Decode(Error),
    /// The record could not be encoded
    Encode(Error),
}

impl SchemaError {
    /// The validation errors, if validation failed.
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            SchemaError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::Validation(errors) => write!(f, "validation failed: {errors}"),
            SchemaError::Decode(e) => write!(f, "decoding failed: {e}"),
            SchemaError::Encode(e) => write!(f, "encoding failed: {e}"),
        }
    }
}

impl core::error::Error for SchemaError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            SchemaError::Validation(errors) => Some(errors),
            SchemaError::Decode(e) | SchemaError::Encode(e) => Some(e),
        }
    }
}

impl From<ValidationErrors> for SchemaError {
    fn from(errors: ValidationErrors) -> Self {
        SchemaError::Validation(errors)
    }
}
