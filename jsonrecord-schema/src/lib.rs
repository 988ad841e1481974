//! Validating schemas for jsonrecord records.
//!
//! A [`Schema`] is generated from a record's declared fields and resolved
//! overrides. It validates raw JSON before decoding, reporting every problem
//! keyed by path, supports field selection (`only`, `exclude`, `load_only`,
//! `dump_only`), partial loading and a nesting limit, and exports the
//! documents it accepts as JSON Schema.
//!
//! Generated fields can be replaced per field with
//! `#[record(schema_field = path)]` or per type with
//! [`Config::schema_field`](jsonrecord_core::Config::schema_field), passing a
//! [`CustomField`].

mod error;
mod field;
mod json_schema;
mod schema;
mod validate;

pub use error::{SchemaError, ValidationErrors};
pub use field::{CustomField, FieldKind, SchemaField, Transform, Validator};
pub use json_schema::{AdditionalProperties, DIALECT, JsonSchema, SchemaType};
pub use schema::{DEFAULT_RECURSION_LIMIT, Schema};
