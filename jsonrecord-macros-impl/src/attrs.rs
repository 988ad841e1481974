//! `#[record(...)]` attributes on containers, fields and variants.

use proc_macro2::{Delimiter, Literal, Span, TokenStream, TokenTree};
use quote::{quote, quote_spanned};

use crate::grammar::{Attribute, split_top_level};
use crate::rename::RenameRule;

/// A compile error to be emitted instead of the expansion.
#[derive(Debug, Clone)]
pub struct CompileError {
    /// The error message
    pub message: String,
    /// The span where the error occurred
    pub span: Span,
}

impl CompileError {
    /// An error at `span`.
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        CompileError {
            message: message.into(),
            span,
        }
    }

    /// The `compile_error!` invocation reporting this error.
    pub fn to_compile_error(&self) -> TokenStream {
        let message = &self.message;
        quote_spanned! { self.span => ::core::compile_error!(#message); }
    }
}

type Result<T> = std::result::Result<T, CompileError>;

/// One `key` or `key = value` entry of a `#[record(...)]` list.
struct AttrArg {
    key: String,
    span: Span,
    value: Option<TokenStream>,
}

impl AttrArg {
    fn flag(&self) -> Result<()> {
        match &self.value {
            None => Ok(()),
            Some(_) => Err(CompileError::new(
                self.span,
                format!("`{}` does not take a value", self.key),
            )),
        }
    }

    fn value(&self) -> Result<&TokenStream> {
        self.value.as_ref().ok_or_else(|| {
            CompileError::new(self.span, format!("`{}` expects `{} = ...`", self.key, self.key))
        })
    }

    /// The value as a string literal token and its contents.
    fn string(&self) -> Result<(Literal, String)> {
        let value = self.value()?;
        let mut tokens = value.clone().into_iter();
        match (tokens.next(), tokens.next()) {
            (Some(TokenTree::Literal(lit)), None) => match unquote(&lit.to_string()) {
                Some(contents) => Ok((lit, contents)),
                None => Err(CompileError::new(
                    lit.span(),
                    format!("`{}` expects a string literal", self.key),
                )),
            },
            _ => Err(CompileError::new(
                self.span,
                format!("`{}` expects a string literal", self.key),
            )),
        }
    }

    fn rename_rule(&self) -> Result<RenameRule> {
        let (lit, name) = self.string()?;
        RenameRule::parse(&name).ok_or_else(|| {
            CompileError::new(
                lit.span(),
                format!(
                    "unknown letter case {name:?}, expected one of \"camelCase\", \"kebab-case\", \"snake_case\", \"PascalCase\""
                ),
            )
        })
    }

    fn unknown(&self, place: &str) -> CompileError {
        CompileError::new(
            self.span,
            format!("unknown {place} attribute `{}`", self.key),
        )
    }
}

/// Contents of a plain string literal; `None` for any other literal.
fn unquote(repr: &str) -> Option<String> {
    if let Some(raw) = repr.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = &raw[hashes..];
        let body = body.strip_prefix('"')?.strip_suffix(&"#".repeat(hashes))?;
        return body.strip_suffix('"').map(str::to_owned);
    }

    let body = repr.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            '0' => out.push('\0'),
            other => out.push(other),
        }
    }
    Some(out)
}

/// Every `key[ = value]` inside the `#[record(...)]` attributes of `attrs`.
fn record_args(attrs: &[Attribute]) -> Result<Vec<AttrArg>> {
    let mut args = Vec::new();
    for attr in attrs {
        let mut tokens = attr.content.0.stream().into_iter();
        match tokens.next() {
            Some(TokenTree::Ident(ident)) if ident == "record" => {}
            _ => continue,
        }
        let list = match tokens.next() {
            Some(TokenTree::Group(g)) if g.delimiter() == Delimiter::Parenthesis => g,
            other => {
                let span = other.map_or_else(Span::call_site, |t| t.span());
                return Err(CompileError::new(span, "expected `#[record(...)]`"));
            }
        };

        for piece in split_top_level(list.stream()) {
            let mut piece = piece.into_iter();
            let key = match piece.next() {
                Some(TokenTree::Ident(ident)) => ident,
                Some(other) => {
                    return Err(CompileError::new(other.span(), "expected an attribute name"));
                }
                None => continue,
            };
            let value = match piece.next() {
                None => None,
                Some(TokenTree::Punct(p)) if p.as_char() == '=' => {
                    Some(piece.collect::<TokenStream>())
                }
                Some(other) => {
                    return Err(CompileError::new(
                        other.span(),
                        format!("expected `=` after `{key}`"),
                    ));
                }
            };
            args.push(AttrArg {
                key: key.to_string(),
                span: key.span(),
                value,
            });
        }
    }
    Ok(args)
}

/// The `#[doc = "..."]` literals of `attrs`, in order.
pub fn doc_lines(attrs: &[Attribute]) -> Vec<Literal> {
    attrs
        .iter()
        .filter_map(|attr| {
            let mut tokens = attr.content.0.stream().into_iter();
            match (tokens.next(), tokens.next(), tokens.next()) {
                (
                    Some(TokenTree::Ident(ident)),
                    Some(TokenTree::Punct(eq)),
                    Some(TokenTree::Literal(lit)),
                ) if ident == "doc" && eq.as_char() == '=' => Some(lit),
                _ => None,
            }
        })
        .collect()
}

/// `.doc(...)` call for a descriptor builder, or nothing.
pub fn doc_call(lines: &[Literal]) -> TokenStream {
    if lines.is_empty() {
        return TokenStream::new();
    }
    let first = &lines[0];
    let rest: Vec<TokenStream> = lines[1..].iter().map(|l| quote! { "\n", #l }).collect();
    quote! { .doc(::core::concat!(#first #(, #rest)*)) }
}

/// Attributes of a struct or enum.
#[derive(Default)]
pub struct ContainerAttrs {
    pub letter_case: Option<RenameRule>,
    pub undefined: Option<TokenStream>,
    pub krate: Option<TokenStream>,
    pub transparent: bool,
    pub subtypes: bool,
    pub tag: Option<Literal>,
    pub doc: Vec<Literal>,
}

impl ContainerAttrs {
    pub fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = ContainerAttrs {
            doc: doc_lines(attrs),
            ..Default::default()
        };
        for arg in record_args(attrs)? {
            match arg.key.as_str() {
                "letter_case" | "rename_all" => out.letter_case = Some(arg.rename_rule()?),
                "undefined" => {
                    let (lit, policy) = arg.string()?;
                    let variant = match policy.to_ascii_lowercase().as_str() {
                        "exclude" | "ignore" => quote! { Exclude },
                        "raise" => quote! { Raise },
                        "include" => quote! { Include },
                        _ => {
                            return Err(CompileError::new(
                                lit.span(),
                                format!(
                                    "unknown undefined policy {policy:?}, expected \"exclude\", \"raise\" or \"include\""
                                ),
                            ));
                        }
                    };
                    out.undefined = Some(variant);
                }
                "crate" => out.krate = Some(arg.value()?.clone()),
                "transparent" => {
                    arg.flag()?;
                    out.transparent = true;
                }
                "subtypes" => {
                    arg.flag()?;
                    out.subtypes = true;
                }
                "tag" => {
                    out.tag = Some(arg.string()?.0);
                    out.subtypes = true;
                }
                _ => return Err(arg.unknown("container")),
            }
        }
        Ok(out)
    }

    /// Path of the runtime crate.
    pub fn krate(&self) -> TokenStream {
        self.krate.clone().unwrap_or_else(|| quote! { ::jsonrecord })
    }
}

/// How a field's value is encoded, as written in the attribute.
pub enum EncoderAttr {
    /// `encoder = "iso8601"`
    Iso8601,
    /// `encoder = "posix"`
    Posix,
    /// `encoder = path::to::function`
    Function(TokenStream),
}

/// Attributes of a struct field.
#[derive(Default)]
pub struct FieldAttrs {
    pub letter_case: Option<RenameRule>,
    pub rename: Option<Literal>,
    pub encoder: Option<EncoderAttr>,
    pub decoder: Option<TokenStream>,
    pub exclude: Option<TokenStream>,
    pub exclude_if: Option<TokenStream>,
    pub default: Option<TokenStream>,
    pub catch_all: bool,
    pub schema_field: Option<TokenStream>,
    pub doc: Vec<Literal>,
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = FieldAttrs {
            doc: doc_lines(attrs),
            ..Default::default()
        };
        for arg in record_args(attrs)? {
            match arg.key.as_str() {
                "letter_case" => out.letter_case = Some(arg.rename_rule()?),
                "rename" | "field_name" => out.rename = Some(arg.string()?.0),
                "encoder" => {
                    let value = arg.value()?;
                    out.encoder = Some(match arg.string() {
                        Ok((lit, name)) => match name.as_str() {
                            "iso8601" | "iso" => EncoderAttr::Iso8601,
                            "posix" | "timestamp" => EncoderAttr::Posix,
                            _ => {
                                return Err(CompileError::new(
                                    lit.span(),
                                    format!(
                                        "unknown encoder {name:?}, expected \"iso8601\", \"posix\" or a function path"
                                    ),
                                ));
                            }
                        },
                        Err(_) => EncoderAttr::Function(value.clone()),
                    });
                }
                "decoder" => out.decoder = Some(arg.value()?.clone()),
                "exclude" => {
                    let (lit, name) = arg.string()?;
                    out.exclude = Some(match name.as_str() {
                        "always" => quote! { Always },
                        "never" => quote! { Never },
                        _ => {
                            return Err(CompileError::new(
                                lit.span(),
                                format!("unknown exclusion {name:?}, expected \"always\" or \"never\""),
                            ));
                        }
                    });
                }
                "exclude_if" | "skip_if" => out.exclude_if = Some(arg.value()?.clone()),
                "default" => {
                    out.default = Some(match &arg.value {
                        None => quote! { ::core::default::Default::default() },
                        Some(expr) => expr.clone(),
                    });
                }
                "catch_all" => {
                    arg.flag()?;
                    out.catch_all = true;
                }
                "schema_field" => out.schema_field = Some(arg.value()?.clone()),
                _ => return Err(arg.unknown("field")),
            }
        }
        if out.exclude.is_some() && out.exclude_if.is_some() {
            return Err(CompileError::new(
                Span::call_site(),
                "`exclude` and `exclude_if` cannot be combined",
            ));
        }
        Ok(out)
    }

    /// `FieldOverride` builder calls for the field of type `ty`.
    pub fn meta(&self, krate: &TokenStream, ty: &TokenStream) -> TokenStream {
        let mut calls = TokenStream::new();
        if let Some(rule) = self.letter_case {
            let case = rule.to_runtime(krate);
            calls.extend(quote! { .letter_case(#case) });
        }
        if let Some(name) = &self.rename {
            calls.extend(quote! { .field_name(#name) });
        }
        match &self.encoder {
            Some(EncoderAttr::Iso8601) => calls.extend(quote! { .encoder(#krate::Encoder::Iso8601) }),
            Some(EncoderAttr::Posix) => calls.extend(quote! { .encoder(#krate::Encoder::Posix) }),
            Some(EncoderAttr::Function(path)) => calls.extend(quote! {
                .encoder(#krate::Encoder::custom::<#ty, _>(#path))
            }),
            None => {}
        }
        if let Some(path) = &self.decoder {
            calls.extend(quote! { .decoder(#krate::Decoder::try_custom::<#ty, _, _>(#path)) });
        }
        if let Some(variant) = &self.exclude {
            calls.extend(quote! { .exclude(#krate::Exclude::#variant) });
        }
        if let Some(path) = &self.exclude_if {
            calls.extend(quote! { .exclude(#krate::Exclude::when::<#ty, _>(#path)) });
        }
        if let Some(path) = &self.schema_field {
            calls.extend(quote! { .schema_field(#krate::SchemaFieldSlot::new(#path())) });
        }
        calls
    }
}

/// Attributes of an enum variant.
#[derive(Default)]
pub struct VariantAttrs {
    pub rename: Option<Literal>,
    pub value: Option<TokenStream>,
    pub base: bool,
}

impl VariantAttrs {
    pub fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = VariantAttrs::default();
        for arg in record_args(attrs)? {
            match arg.key.as_str() {
                "rename" => out.rename = Some(arg.string()?.0),
                "value" => out.value = Some(arg.value()?.clone()),
                "base" => {
                    arg.flag()?;
                    out.base = true;
                }
                _ => return Err(arg.unknown("variant")),
            }
        }
        Ok(out)
    }
}
