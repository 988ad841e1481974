//! Expansion of `#[derive(Record)]` on structs.
//!
//! Named structs become records: a lazily built `RecordInfo` plus field-wise
//! encode/decode glue. Single-field structs marked `transparent`, and every
//! single-field tuple struct, become aliases of their inner type.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::quote;

use crate::attrs::{CompileError, ContainerAttrs, FieldAttrs, doc_call};
use crate::grammar::{
    Body, NamedField, StructDef, TupleField, body, parse_tokens, split_top_level, starts_generics,
};

/// A parsed struct field.
struct PField {
    /// `self.<member>`: an identifier or a tuple index
    member: TokenStream,
    /// Declared name, `r#` stripped
    name: String,
    ty: TokenStream,
    attrs: FieldAttrs,
}

fn named_fields(stream: TokenStream) -> Result<Vec<PField>, CompileError> {
    split_top_level(stream)
        .into_iter()
        .map(|piece| {
            let field: NamedField = parse_tokens(piece)
                .map_err(|e| CompileError::new(proc_macro2::Span::call_site(), e))?;
            let ident = &field.name;
            let raw = ident.to_string();
            Ok(PField {
                member: quote! { #ident },
                name: raw.strip_prefix("r#").unwrap_or(&raw).to_owned(),
                ty: field.ty.iter().cloned().collect(),
                attrs: FieldAttrs::parse(&field.attrs)?,
            })
        })
        .collect()
}

fn tuple_fields(stream: TokenStream) -> Result<Vec<PField>, CompileError> {
    split_top_level(stream)
        .into_iter()
        .enumerate()
        .map(|(index, piece)| {
            let field: TupleField = parse_tokens(piece)
                .map_err(|e| CompileError::new(proc_macro2::Span::call_site(), e))?;
            let member = Literal::usize_unsuffixed(index);
            Ok(PField {
                member: quote! { #member },
                name: index.to_string(),
                ty: field.ty.iter().cloned().collect(),
                attrs: FieldAttrs::parse(&field.attrs)?,
            })
        })
        .collect()
}

/// Expand a struct.
pub(crate) fn process_struct(def: &StructDef) -> Result<TokenStream, CompileError> {
    let name = &def.name;
    if starts_generics(&def.rest) {
        return Err(CompileError::new(
            name.span(),
            "#[derive(Record)] does not support generic types",
        ));
    }
    let container = ContainerAttrs::parse(&def.attrs)?;
    if container.subtypes {
        return Err(CompileError::new(
            name.span(),
            "`subtypes` and `tag` only apply to enums",
        ));
    }

    match body(&def.rest) {
        Some(Body::Braced(stream)) => {
            let fields = named_fields(stream)?;
            if container.transparent {
                match fields.as_slice() {
                    [field] => Ok(gen_alias(name, &container, field, false)),
                    _ => Err(CompileError::new(
                        name.span(),
                        "`transparent` records need exactly one field",
                    )),
                }
            } else {
                Ok(gen_record(name, &container, &fields))
            }
        }
        Some(Body::Parenthesized(stream)) => match tuple_fields(stream)?.as_slice() {
            [field] => Ok(gen_alias(name, &container, field, true)),
            _ => Err(CompileError::new(
                name.span(),
                "tuple structs must have exactly one field to derive Record",
            )),
        },
        Some(Body::Unit) | None => Err(CompileError::new(
            name.span(),
            "unit structs cannot derive Record",
        )),
    }
}

fn gen_record(name: &Ident, container: &ContainerAttrs, fields: &[PField]) -> TokenStream {
    let krate = container.krate();
    let name_str = name.to_string();

    let mut record_calls = TokenStream::new();
    if let Some(rule) = container.letter_case {
        let case = rule.to_runtime(&krate);
        record_calls.extend(quote! { .letter_case(#case) });
    }
    if let Some(policy) = &container.undefined {
        record_calls.extend(quote! { .undefined(#krate::Undefined::#policy) });
    }
    record_calls.extend(doc_call(&container.doc));

    let field_infos = fields.iter().map(|field| {
        let PField { name, ty, attrs, .. } = field;
        let meta = attrs.meta(&krate, ty);
        let meta = if meta.is_empty() {
            TokenStream::new()
        } else {
            quote! { .meta(#krate::FieldOverride::new() #meta) }
        };
        let default = match &attrs.default {
            Some(expr) => quote! { .default_value(|| -> #ty { #expr }) },
            None => TokenStream::new(),
        };
        let catch_all = if attrs.catch_all {
            quote! { .catch_all() }
        } else {
            TokenStream::new()
        };
        let doc = doc_call(&attrs.doc);
        quote! {
            .field(#krate::FieldInfo::new::<#ty>(#name) #doc #meta #default #catch_all)
        }
    });

    let encode_calls = fields.iter().enumerate().map(|(index, field)| {
        let member = &field.member;
        quote! { sink.field(#index, &self.#member)?; }
    });

    let decode_inits = fields.iter().enumerate().map(|(index, field)| {
        let PField { member, ty, attrs, .. } = field;
        match &attrs.default {
            Some(expr) => quote! { #member: fields.take_or(#index, || -> #ty { #expr })? },
            None => quote! { #member: fields.take::<#ty>(#index)? },
        }
    });

    quote! {
        #[automatically_derived]
        #[allow(unused_mut, unused_variables)]
        impl #krate::Record for #name {
            fn record_info() -> &'static #krate::RecordInfo {
                static RECORD_INFO: ::std::sync::OnceLock<#krate::RecordInfo> =
                    ::std::sync::OnceLock::new();
                RECORD_INFO.get_or_init(|| {
                    #krate::RecordInfo::new::<Self>(#name_str)
                        #record_calls
                        #(#field_infos)*
                })
            }

            fn encode_fields(
                &self,
                sink: &mut #krate::FieldSink<'_>,
            ) -> ::core::result::Result<(), #krate::Error> {
                #(#encode_calls)*
                ::core::result::Result::Ok(())
            }

            fn decode_fields(
                mut fields: #krate::RawFields<'_>,
            ) -> ::core::result::Result<Self, #krate::Error> {
                ::core::result::Result::Ok(Self {
                    #(#decode_inits,)*
                })
            }
        }

        #[automatically_derived]
        impl #krate::Codec for #name {
            fn type_hint() -> #krate::TypeHint {
                #krate::TypeHint::Record(#krate::RecordRef::of::<Self>())
            }

            fn encode(
                &self,
                config: &#krate::Config,
            ) -> ::core::result::Result<#krate::Json, #krate::Error> {
                #krate::encode_record(self, config)
            }

            fn decode(
                value: #krate::Json,
                config: &#krate::Config,
            ) -> ::core::result::Result<Self, #krate::Error> {
                #krate::decode_record(value, config)
            }
        }
    }
}

fn gen_alias(name: &Ident, container: &ContainerAttrs, field: &PField, tuple: bool) -> TokenStream {
    let krate = container.krate();
    let name_str = name.to_string();
    let PField { member, ty, .. } = field;
    let construct = if tuple {
        quote! { Self(inner) }
    } else {
        quote! { Self { #member: inner } }
    };

    quote! {
        #[automatically_derived]
        impl #krate::Codec for #name {
            fn type_hint() -> #krate::TypeHint {
                #krate::TypeHint::Alias {
                    name: #name_str,
                    inner: ::std::boxed::Box::new(<#ty as #krate::Codec>::type_hint()),
                }
            }

            fn encode(
                &self,
                config: &#krate::Config,
            ) -> ::core::result::Result<#krate::Json, #krate::Error> {
                #krate::Codec::encode(&self.#member, config)
            }

            fn decode(
                value: #krate::Json,
                config: &#krate::Config,
            ) -> ::core::result::Result<Self, #krate::Error> {
                <#ty as #krate::Codec>::decode(value, config).map(|inner| #construct)
            }
        }
    }
}
