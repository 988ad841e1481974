use proc_macro2::{Delimiter, Group, TokenStream, TokenTree};
use quote::quote;

use crate::grammar::{DeriveInput, parse_tokens};
use crate::process_enum::process_enum;
use crate::process_struct::process_struct;

/// Unwrap `None`-delimited groups left behind by `macro_rules!` captures.
fn flatten_transparent_groups(input: TokenStream) -> TokenStream {
    input
        .into_iter()
        .flat_map(|tt| match tt {
            TokenTree::Group(group) if group.delimiter() == Delimiter::None => {
                flatten_transparent_groups(group.stream())
            }
            TokenTree::Group(group) => {
                let mut flattened =
                    Group::new(group.delimiter(), flatten_transparent_groups(group.stream()));
                flattened.set_span(group.span());
                core::iter::once(TokenTree::Group(flattened)).collect()
            }
            other => core::iter::once(other).collect(),
        })
        .collect()
}

/// Expand `#[derive(Record)]`.
///
/// Errors are reported as `compile_error!` invocations in place of the
/// expansion.
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = flatten_transparent_groups(input);
    let parsed: DeriveInput = match parse_tokens(input) {
        Ok(parsed) => parsed,
        Err(message) => return quote! { ::core::compile_error!(#message); },
    };

    let expanded = match &parsed {
        DeriveInput::Struct(def) => process_struct(def),
        DeriveInput::Enum(def) => process_enum(def),
    };
    expanded.unwrap_or_else(|err| err.to_compile_error())
}
