#![warn(missing_docs)]
//! Core of jsonrecord: the encode/decode engine that maps structured records
//! to and from JSON values.
//!
//! Records describe themselves through [`Record::record_info`], a descriptor
//! built once per type (usually by `#[derive(Record)]`). Every value that can
//! appear in a record field implements [`Codec`], which carries the field's
//! [`TypeHint`] plus its typed encoder and decoder. Field-level behavior
//! (custom encoders, renaming, exclusion) is described by [`FieldOverride`]
//! and merged with record-level and [`Config`]-level defaults by
//! [`resolve_overrides`].

/// Trace-level logging macro that forwards to `tracing::trace!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {
        ::tracing::trace!($($arg)*)
    };
}

/// Trace-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! trace {
    ($($arg:tt)*) => {};
}

/// Debug-level logging macro that forwards to `tracing::debug!` when the `tracing` feature is enabled.
#[cfg(feature = "tracing")]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {
        ::tracing::debug!($($arg)*)
    };
}

/// Debug-level logging macro (no-op when `tracing` feature is disabled).
#[cfg(not(feature = "tracing"))]
#[allow(unused_macros)]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[allow(unused_imports)]
pub(crate) use debug;
#[allow(unused_imports)]
pub(crate) use trace;

mod builder;
mod codec;
mod config;
mod enums;
mod error;
mod hint;
mod impls;
mod json;
mod letter_case;
mod overrides;
mod record;
mod subtype;
mod undefined;
mod union;

pub use builder::RecordBuilder;
pub use codec::{Codec, Input, decode_input};
pub use config::{Config, SetOrder, TimestampFormat};
pub use enums::{EnumDef, EnumValue, decode_enum_index};
pub use error::{Error, ErrorKind, Path, PathSegment, UndefinedProblem};
pub use hint::{
    Class, CollectionKind, Extended, RecordRef, Scalar, SubtypeDef, SubtypeVariant, TypeHint,
};
pub use json::{Json, JsonMap, canonical_cmp, kind_name, sort_keys};
pub use letter_case::LetterCase;
pub use overrides::{
    Decoder, Encoder, Exclude, FieldOverride, ResolvedField, ResolvedRecord, SchemaFieldSlot,
    resolve_overrides,
};
pub use record::{
    DefaultFn, FieldInfo, FieldSink, Record, RecordInfo, decode_record, encode_record,
};
pub use subtype::{decode_subtype, encode_subtype};
pub use undefined::{CatchAll, RawFields, Slot, Undefined};
pub use union::{Arm, decode_union};
