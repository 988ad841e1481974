//! Error types for encoding and decoding.

use core::fmt::{self, Display};

use crate::json::{Json, kind_name};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A record field, by wire name
    Field(String),
    /// An array element
    Index(usize),
    /// A map entry, by encoded key
    Key(String),
}

/// Location of an error inside the JSON document, rendered like `$.items[2]["k"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The document root.
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Segments from the root down.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment at the leaf end.
    pub fn push(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }

    /// A copy of this path extended with `segment`.
    pub fn join(&self, segment: PathSegment) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    fn prepend(&mut self, segment: PathSegment) {
        self.segments.insert(0, segment);
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.segments {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::Key(key) => write!(f, "[{key:?}]")?,
            }
        }
        Ok(())
    }
}

/// Error raised while encoding or decoding a value.
#[derive(Debug)]
pub struct Error {
    /// The specific kind of error
    pub kind: ErrorKind,
    /// Where in the document the error occurred
    pub path: Path,
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "{} at {}", self.kind, self.path)
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::new(ErrorKind::Json(e))
    }
}

impl Error {
    /// Create an error located at the root.
    pub const fn new(kind: ErrorKind) -> Self {
        Error {
            kind,
            path: Path::root(),
        }
    }

    /// A JSON value of the wrong kind.
    pub fn invalid_type(expected: &'static str, got: &Json) -> Self {
        Error::new(ErrorKind::InvalidType {
            expected,
            got: kind_name(got),
        })
    }

    /// A JSON value of the right kind whose content is unusable.
    pub fn invalid_value(message: impl Into<String>) -> Self {
        Error::new(ErrorKind::InvalidValue {
            message: message.into(),
        })
    }

    /// An error reported by a user-supplied encoder or decoder.
    pub fn custom(message: impl Display) -> Self {
        Error::new(ErrorKind::Custom(message.to_string()))
    }

    /// Prefix the path with a record field.
    pub fn at_field(mut self, name: impl Into<String>) -> Self {
        self.path.prepend(PathSegment::Field(name.into()));
        self
    }

    /// Prefix the path with an array index.
    pub fn at_index(mut self, index: usize) -> Self {
        self.path.prepend(PathSegment::Index(index));
        self
    }

    /// Prefix the path with a map key.
    pub fn at_key(mut self, key: impl Into<String>) -> Self {
        self.path.prepend(PathSegment::Key(key.into()));
        self
    }

    /// Stable identifier for this kind of error.
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }
}

/// Ways an undefined-parameter policy can be violated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndefinedProblem {
    /// Unknown keys under the `Raise` policy
    UnknownKeys {
        /// The record being decoded
        record: &'static str,
        /// The offending keys, in input order
        keys: Vec<String>,
        /// A known field close to the first unknown key
        suggestion: Option<String>,
    },
    /// `Include` policy without a catch-all field
    NoCatchAll {
        /// The record being decoded
        record: &'static str,
    },
    /// `Include` policy with more than one catch-all field
    MultipleCatchAll {
        /// The record being decoded
        record: &'static str,
        /// Every field marked as catch-all
        fields: Vec<&'static str>,
    },
    /// The input carries the catch-all's own key with an unusable value
    CatchAllConflict {
        /// The record being decoded
        record: &'static str,
        /// The catch-all field
        field: &'static str,
    },
}

impl Display for UndefinedProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UndefinedProblem::UnknownKeys {
                record,
                keys,
                suggestion,
            } => {
                write!(f, "received undefined initialization arguments {keys:?} for {record}")?;
                if let Some(suggested) = suggestion {
                    write!(f, " (did you mean `{suggested}`?)")?;
                }
                Ok(())
            }
            UndefinedProblem::NoCatchAll { record } => write!(
                f,
                "{record} uses the include policy for undefined parameters but has no catch-all field"
            ),
            UndefinedProblem::MultipleCatchAll { record, fields } => write!(
                f,
                "{record} has multiple catch-all fields {fields:?}, only one is allowed"
            ),
            UndefinedProblem::CatchAllConflict { record, field } => write!(
                f,
                "received input field with same name as catch-all field `{field}` of {record}, \
                 and its value is neither the default nor an object"
            ),
        }
    }
}

/// Specific error kinds.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A field without value, default, or inference
    MissingField {
        /// The record being decoded
        record: &'static str,
        /// The missing field (wire name)
        field: String,
    },
    /// A JSON value of the wrong kind
    InvalidType {
        /// What the declared type needs
        expected: &'static str,
        /// What the input holds
        got: &'static str,
    },
    /// A JSON value of the right kind with unusable content
    InvalidValue {
        /// Why the value was rejected
        message: String,
    },
    /// A value that is not one of an enum's values
    InvalidEnumValue {
        /// The enum type
        name: &'static str,
        /// The rejected value, as JSON text
        value: String,
        /// The allowed values, as JSON text
        expected: Vec<String>,
        /// The closest allowed value, if any is close
        suggestion: Option<String>,
    },
    /// A violated undefined-parameter policy
    UndefinedParameter(UndefinedProblem),
    /// A constructor argument that binds to no field
    UnexpectedArgument {
        /// The record being constructed
        record: &'static str,
        /// The argument name, or its position
        argument: String,
    },
    /// A discriminator value that names no subtype
    UnknownSubtype {
        /// The dispatching type
        name: &'static str,
        /// The discriminator key
        tag: &'static str,
        /// The rejected value
        value: String,
        /// The known discriminator values
        expected: Vec<String>,
    },
    /// No discriminator and no base type to fall back to
    MissingDiscriminator {
        /// The dispatching type
        name: &'static str,
        /// The discriminator key
        tag: &'static str,
    },
    /// No arm of a union decoded the value
    NoMatchingArm {
        /// The union type
        name: &'static str,
        /// The JSON kind that was offered
        got: &'static str,
    },
    /// A value JSON cannot represent
    Unencodable {
        /// What could not be encoded
        message: String,
    },
    /// A user-supplied encoder or decoder failed
    Custom(String),
    /// Malformed JSON text
    Json(serde_json::Error),
    /// A type-erased override was applied to a value of another type
    OverrideMismatch {
        /// The type the override was written for
        expected: &'static str,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MissingField { record, field } => {
                write!(f, "missing required field `{field}` of {record}")
            }
            ErrorKind::InvalidType { expected, got } => {
                write!(f, "type mismatch: expected {expected}, got {got}")
            }
            ErrorKind::InvalidValue { message } => write!(f, "invalid value: {message}"),
            ErrorKind::InvalidEnumValue {
                name,
                value,
                expected,
                suggestion,
            } => {
                write!(
                    f,
                    "{value} is not a valid {name}, expected one of: {}",
                    expected.join(", ")
                )?;
                if let Some(suggested) = suggestion {
                    write!(f, " (did you mean {suggested}?)")?;
                }
                Ok(())
            }
            ErrorKind::UndefinedParameter(problem) => write!(f, "{problem}"),
            ErrorKind::UnexpectedArgument { record, argument } => {
                write!(f, "{record} got an unexpected argument `{argument}`")
            }
            ErrorKind::UnknownSubtype {
                name,
                tag,
                value,
                expected,
            } => write!(
                f,
                "unknown {name} subtype {value:?} in `{tag}`, expected one of: {}",
                expected.join(", ")
            ),
            ErrorKind::MissingDiscriminator { name, tag } => {
                write!(f, "missing discriminator `{tag}` for {name}")
            }
            ErrorKind::NoMatchingArm { name, got } => {
                write!(f, "no variant of {name} accepts a {got} value")
            }
            ErrorKind::Unencodable { message } => write!(f, "cannot encode: {message}"),
            ErrorKind::Custom(message) => f.write_str(message),
            ErrorKind::Json(e) => write!(f, "malformed JSON: {e}"),
            ErrorKind::OverrideMismatch { expected } => {
                write!(f, "override written for {expected} was applied to another type")
            }
        }
    }
}

impl ErrorKind {
    /// Get an error code for this kind of error.
    pub const fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingField { .. } => "jsonrecord::missing_field",
            ErrorKind::InvalidType { .. } => "jsonrecord::invalid_type",
            ErrorKind::InvalidValue { .. } => "jsonrecord::invalid_value",
            ErrorKind::InvalidEnumValue { .. } => "jsonrecord::invalid_enum_value",
            ErrorKind::UndefinedParameter(_) => "jsonrecord::undefined_parameter",
            ErrorKind::UnexpectedArgument { .. } => "jsonrecord::unexpected_argument",
            ErrorKind::UnknownSubtype { .. } => "jsonrecord::unknown_subtype",
            ErrorKind::MissingDiscriminator { .. } => "jsonrecord::missing_discriminator",
            ErrorKind::NoMatchingArm { .. } => "jsonrecord::no_matching_arm",
            ErrorKind::Unencodable { .. } => "jsonrecord::unencodable",
            ErrorKind::Custom(_) => "jsonrecord::custom",
            ErrorKind::Json(_) => "jsonrecord::json",
            ErrorKind::OverrideMismatch { .. } => "jsonrecord::override_mismatch",
        }
    }

    /// A short hint for fixing the input, when one is known.
    pub fn help(&self) -> Option<String> {
        match self {
            ErrorKind::InvalidEnumValue {
                suggestion: Some(s),
                ..
            } => Some(format!("did you mean {s}?")),
            ErrorKind::UndefinedParameter(UndefinedProblem::UnknownKeys {
                suggestion: Some(s),
                ..
            }) => Some(format!("did you mean `{s}`?")),
            ErrorKind::UndefinedParameter(UndefinedProblem::NoCatchAll { .. }) => {
                Some("mark one field with #[record(catch_all)]".into())
            }
            ErrorKind::MissingField { .. } => {
                Some("give the field a default, or decode with infer_missing".into())
            }
            _ => None,
        }
    }
}

/// Closest candidate to `input`, if any is similar enough.
pub(crate) fn suggest<'a>(
    input: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|c| (c, strsim::jaro_winkler(input, c)))
        .filter(|(_, score)| *score > 0.8)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

#[cfg(feature = "miette")]
impl miette::Diagnostic for Error {
    fn code<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        Some(Box::new(self.kind.code()))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind
            .help()
            .map(|h| Box::new(h) as Box<dyn Display + 'a>)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_render_from_root() {
        let err = Error::invalid_value("nope")
            .at_index(2)
            .at_key("k")
            .at_field("items");
        assert_eq!(err.path.to_string(), r#"$.items["k"][2]"#);
        assert_eq!(err.to_string(), r#"invalid value: nope at $.items["k"][2]"#);
    }

    #[test]
    fn root_errors_have_no_location_suffix() {
        let err = Error::invalid_type("string", &Json::Bool(true));
        assert_eq!(err.to_string(), "type mismatch: expected string, got boolean");
        assert_eq!(err.code(), "jsonrecord::invalid_type");
    }

    #[test]
    fn suggests_close_names_only() {
        assert_eq!(suggest("nmae", ["name", "age"]), Some("name"));
        assert_eq!(suggest("zzz", ["name", "age"]), None);
    }
}
