#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

extern crate self as jsonrecord;

pub use jsonrecord_core::*;

/// Derive [`Record`] (structs), or [`Codec`] (newtypes and enums).
///
/// Structs with named fields become records. Container attributes go in
/// `#[record(...)]` on the type: `letter_case`, `undefined`, `transparent`,
/// `crate`, and on enums `subtypes` and `tag`. Field attributes: `rename`,
/// `letter_case`, `encoder`, `decoder`, `exclude`, `exclude_if`, `default`,
/// `catch_all`, `schema_field`. Variant attributes: `rename`, `value`,
/// `base`.
///
/// Enums with only unit variants encode as their values. Enums of
/// single-value variants are unions, tried in declaration order, or with
/// `subtypes` a family of records told apart by a discriminator key.
pub use jsonrecord_macros::Record;

pub use jsonrecord_schema::{
    AdditionalProperties, CustomField, FieldKind, JsonSchema, Schema, SchemaError, SchemaField,
    SchemaType, ValidationErrors,
};

mod deserialize;
mod ext;
mod serialize;

pub use deserialize::{from_slice, from_slice_with, from_str, from_str_with, from_value, from_value_with};
pub use ext::RecordExt;
pub use serialize::{
    SerializeOptions, to_string, to_string_pretty, to_string_with_options, to_value, to_value_with,
    to_vec, to_vec_with_options, to_writer, to_writer_with_options,
};
