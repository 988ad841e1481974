//! `#[derive(Record)]`. Use it through the `jsonrecord` crate, which
//! re-exports it next to the runtime it expands to.

/// Derive `Record` and `Codec` for a struct, or `Codec` for an enum.
///
/// Attributes go in `#[record(...)]` on the container, its fields and its
/// variants; see the `jsonrecord` crate documentation for the full list.
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    jsonrecord_macros_impl::derive_record(input.into()).into()
}
