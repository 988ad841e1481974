//! Expansion of `#[derive(Record)]` on enums.
//!
//! Which codec an enum gets depends on its shape:
//! - only unit variants: a value enum, encoded as each variant's value
//! - `subtypes` / `tag` on the enum: nominal dispatch over wrapped records
//! - otherwise single-field variants form a union, unit variants being its `null` arm

use proc_macro2::{Ident, Literal, Span, TokenStream, TokenTree};
use quote::quote;

use crate::attrs::{CompileError, ContainerAttrs, VariantAttrs};
use crate::grammar::{
    Body, EnumDef, TupleField, Variant, body, parse_tokens, split_top_level, starts_generics,
};

enum PVariantKind {
    Unit,
    /// One unnamed field of the given type
    Newtype(TokenStream),
}

struct PVariant {
    name: Ident,
    kind: PVariantKind,
    attrs: VariantAttrs,
}

fn parse_variant(piece: TokenStream) -> Result<PVariant, CompileError> {
    let variant: Variant =
        parse_tokens(piece).map_err(|e| CompileError::new(Span::call_site(), e))?;
    let name = variant.name.clone();
    let attrs = VariantAttrs::parse(&variant.attrs)?;

    let kind = match body(&variant.rest) {
        None if variant.rest.is_empty() => PVariantKind::Unit,
        // `Name = discriminant`
        None if matches!(variant.rest.first(), Some(TokenTree::Punct(p)) if p.as_char() == '=') => {
            PVariantKind::Unit
        }
        Some(Body::Parenthesized(stream)) => {
            let mut fields = split_top_level(stream);
            if fields.len() != 1 {
                return Err(CompileError::new(
                    name.span(),
                    "enum variants may wrap exactly one value",
                ));
            }
            let field: TupleField = parse_tokens(fields.remove(0))
                .map_err(|e| CompileError::new(name.span(), e))?;
            PVariantKind::Newtype(field.ty.iter().cloned().collect())
        }
        _ => {
            return Err(CompileError::new(
                name.span(),
                "struct variants are not supported, wrap a record instead",
            ));
        }
    };

    Ok(PVariant { name, kind, attrs })
}

/// Expand an enum.
pub(crate) fn process_enum(def: &EnumDef) -> Result<TokenStream, CompileError> {
    let name = &def.name;
    if starts_generics(&def.rest) {
        return Err(CompileError::new(
            name.span(),
            "#[derive(Record)] does not support generic types",
        ));
    }
    let container = ContainerAttrs::parse(&def.attrs)?;
    if container.transparent || container.undefined.is_some() {
        return Err(CompileError::new(
            name.span(),
            "`transparent` and `undefined` only apply to structs",
        ));
    }

    let stream = match body(&def.rest) {
        Some(Body::Braced(stream)) => stream,
        _ => return Err(CompileError::new(name.span(), "expected an enum body")),
    };
    let variants = split_top_level(stream)
        .into_iter()
        .map(parse_variant)
        .collect::<Result<Vec<_>, _>>()?;
    if variants.is_empty() {
        return Err(CompileError::new(
            name.span(),
            "enums without variants cannot derive Record",
        ));
    }

    if container.subtypes {
        gen_subtypes(name, &container, &variants)
    } else if variants.iter().all(|v| matches!(v.kind, PVariantKind::Unit)) {
        Ok(gen_value_enum(name, &container, &variants))
    } else {
        gen_union(name, &container, &variants)
    }
}

fn gen_value_enum(name: &Ident, container: &ContainerAttrs, variants: &[PVariant]) -> TokenStream {
    let krate = container.krate();
    let name_str = name.to_string();

    let values: Vec<TokenStream> = variants
        .iter()
        .map(|v| match (&v.attrs.value, &v.attrs.rename) {
            (Some(value), _) => match value.clone().into_iter().next() {
                Some(TokenTree::Literal(lit)) if lit.to_string().starts_with(['"', 'r']) => {
                    quote! { #krate::EnumValue::Str(#value) }
                }
                _ => quote! { #krate::EnumValue::Int(#value) },
            },
            (None, Some(rename)) => quote! { #krate::EnumValue::Str(#rename) },
            (None, None) => {
                let raw = v.name.to_string();
                let value = match container.letter_case {
                    Some(rule) => rule.apply(&raw),
                    None => raw,
                };
                let lit = Literal::string(&value);
                quote! { #krate::EnumValue::Str(#lit) }
            }
        })
        .collect();

    let encode_arms = variants.iter().zip(&values).map(|(v, value)| {
        let variant = &v.name;
        quote! { Self::#variant => ::core::result::Result::Ok(#value.to_json()), }
    });
    let decode_arms = variants.iter().enumerate().map(|(index, v)| {
        let variant = &v.name;
        quote! { #index => ::core::result::Result::Ok(Self::#variant), }
    });

    quote! {
        const _: () = {
            static ENUM_DEF: #krate::EnumDef = #krate::EnumDef {
                name: #name_str,
                values: &[#(#values),*],
            };

            #[automatically_derived]
            impl #krate::Codec for #name {
                fn type_hint() -> #krate::TypeHint {
                    #krate::TypeHint::Enum(&ENUM_DEF)
                }

                fn encode(
                    &self,
                    _config: &#krate::Config,
                ) -> ::core::result::Result<#krate::Json, #krate::Error> {
                    match self {
                        #(#encode_arms)*
                    }
                }

                fn decode(
                    value: #krate::Json,
                    _config: &#krate::Config,
                ) -> ::core::result::Result<Self, #krate::Error> {
                    match #krate::decode_enum_index(&ENUM_DEF, &value)? {
                        #(#decode_arms)*
                        index => ::core::result::Result::Err(#krate::Error::invalid_value(
                            ::std::format!("{} has no variant number {}", #name_str, index),
                        )),
                    }
                }
            }
        };
    }
}

fn newtype<'a>(variant: &'a PVariant, what: &str) -> Result<&'a TokenStream, CompileError> {
    match &variant.kind {
        PVariantKind::Newtype(ty) => Ok(ty),
        PVariantKind::Unit => Err(CompileError::new(
            variant.name.span(),
            format!("{what} variants must wrap exactly one value"),
        )),
    }
}

fn gen_subtypes(
    name: &Ident,
    container: &ContainerAttrs,
    variants: &[PVariant],
) -> Result<TokenStream, CompileError> {
    let krate = container.krate();
    let name_str = name.to_string();
    let tag = match &container.tag {
        Some(tag) => quote! { #tag },
        None => quote! { #krate::SubtypeDef::DEFAULT_TAG },
    };

    let bases: Vec<usize> = variants
        .iter()
        .enumerate()
        .filter(|(_, v)| v.attrs.base)
        .map(|(i, _)| i)
        .collect();
    let base = match bases.as_slice() {
        [] => quote! { ::core::option::Option::None },
        [index] => quote! { ::core::option::Option::Some(#index) },
        [_, second, ..] => {
            return Err(CompileError::new(
                variants[*second].name.span(),
                "only one variant can be the base",
            ));
        }
    };

    let mut entries = Vec::new();
    let mut encode_arms = Vec::new();
    let mut decode_arms = Vec::new();
    for (index, variant) in variants.iter().enumerate() {
        let ty = newtype(variant, "subtype")?;
        let ident = &variant.name;
        let rename = match &variant.attrs.rename {
            Some(lit) => quote! { ::core::option::Option::Some(#lit) },
            None => quote! { ::core::option::Option::None },
        };
        entries.push(quote! {
            #krate::SubtypeVariant::new(#rename, #krate::RecordRef::of::<#ty>())
        });
        encode_arms.push(quote! {
            Self::#ident(inner) => #krate::encode_subtype(subtype_def(), #index, inner, config),
        });
        decode_arms.push(quote! {
            #index => <#ty as #krate::Codec>::decode(value, config).map(Self::#ident),
        });
    }

    Ok(quote! {
        const _: () = {
            fn subtype_def() -> &'static #krate::SubtypeDef {
                static SUBTYPE_DEF: ::std::sync::OnceLock<#krate::SubtypeDef> =
                    ::std::sync::OnceLock::new();
                SUBTYPE_DEF.get_or_init(|| #krate::SubtypeDef {
                    name: #name_str,
                    tag: #tag,
                    base: #base,
                    variants: ::std::vec![#(#entries),*],
                })
            }

            #[automatically_derived]
            impl #krate::Codec for #name {
                fn type_hint() -> #krate::TypeHint {
                    #krate::TypeHint::Subtypes(subtype_def())
                }

                fn encode(
                    &self,
                    config: &#krate::Config,
                ) -> ::core::result::Result<#krate::Json, #krate::Error> {
                    match self {
                        #(#encode_arms)*
                    }
                }

                fn decode(
                    value: #krate::Json,
                    config: &#krate::Config,
                ) -> ::core::result::Result<Self, #krate::Error> {
                    let (index, value) = #krate::decode_subtype(subtype_def(), value)?;
                    match index {
                        #(#decode_arms)*
                        index => ::core::result::Result::Err(#krate::Error::invalid_value(
                            ::std::format!("{} has no variant number {}", #name_str, index),
                        )),
                    }
                }
            }
        };
    })
}

fn gen_union(
    name: &Ident,
    container: &ContainerAttrs,
    variants: &[PVariant],
) -> Result<TokenStream, CompileError> {
    let krate = container.krate();
    let name_str = name.to_string();

    let units: Vec<&PVariant> = variants
        .iter()
        .filter(|v| matches!(v.kind, PVariantKind::Unit))
        .collect();
    if let [_, second, ..] = units.as_slice() {
        return Err(CompileError::new(
            second.name.span(),
            "a union can have at most one unit variant, its null arm",
        ));
    }

    let mut hints = Vec::new();
    let mut encode_arms = Vec::new();
    let mut arms = Vec::new();
    for variant in variants {
        let ident = &variant.name;
        match &variant.kind {
            PVariantKind::Newtype(ty) => {
                hints.push(quote! { <#ty as #krate::Codec>::type_hint() });
                encode_arms.push(quote! {
                    Self::#ident(inner) => #krate::Codec::encode(inner, config),
                });
                arms.push(quote! {
                    #krate::Arm::new(<#ty as #krate::Codec>::type_hint(), |value, config| {
                        <#ty as #krate::Codec>::decode(value, config).map(Self::#ident)
                    })
                });
            }
            PVariantKind::Unit => {
                hints.push(quote! { #krate::TypeHint::Null });
                encode_arms.push(quote! {
                    Self::#ident => ::core::result::Result::Ok(#krate::Json::Null),
                });
                arms.push(quote! {
                    #krate::Arm::new(#krate::TypeHint::Null, |value, _config| match value {
                        #krate::Json::Null => ::core::result::Result::Ok(Self::#ident),
                        other => ::core::result::Result::Err(#krate::Error::invalid_type("null", &other)),
                    })
                });
            }
        }
    }

    Ok(quote! {
        #[automatically_derived]
        impl #krate::Codec for #name {
            fn type_hint() -> #krate::TypeHint {
                #krate::TypeHint::Union {
                    name: #name_str,
                    arms: ::std::vec![#(#hints),*],
                }
            }

            fn encode(
                &self,
                config: &#krate::Config,
            ) -> ::core::result::Result<#krate::Json, #krate::Error> {
                match self {
                    #(#encode_arms)*
                }
            }

            fn decode(
                value: #krate::Json,
                config: &#krate::Config,
            ) -> ::core::result::Result<Self, #krate::Error> {
                #krate::decode_union(#name_str, value, config, &[#(#arms),*])
            }
        }
    })
}
