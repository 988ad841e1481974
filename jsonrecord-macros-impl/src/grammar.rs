//! Token grammar of derive input.

use proc_macro2::{Delimiter, TokenStream, TokenTree};
use unsynn::*;

keyword! {
    KStruct = "struct";
    KEnum = "enum";
    KPub = "pub";
}

unsynn! {
    /// Visibility: `pub`, `pub(crate)` and friends
    pub enum Vis {
        PubIn(Cons<KPub, ParenthesisGroup>),
        Pub(KPub),
    }

    /// An outer attribute: `#[...]`
    pub struct Attribute {
        _pound: Pound,
        pub content: BracketGroup,
    }

    /// The item a derive is attached to
    pub enum DeriveInput {
        Struct(StructDef),
        Enum(EnumDef),
    }

    /// `struct Name ...`; everything after the name is kept raw
    pub struct StructDef {
        pub attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        _kw_struct: KStruct,
        pub name: Ident,
        pub rest: Vec<TokenTree>,
    }

    /// `enum Name ...`; everything after the name is kept raw
    pub struct EnumDef {
        pub attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        _kw_enum: KEnum,
        pub name: Ident,
        pub rest: Vec<TokenTree>,
    }

    /// `attrs vis name: Type`
    pub struct NamedField {
        pub attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        pub name: Ident,
        _colon: Colon,
        pub ty: Vec<TokenTree>,
    }

    /// `attrs vis Type`
    pub struct TupleField {
        pub attrs: Vec<Attribute>,
        _vis: Option<Vis>,
        pub ty: Vec<TokenTree>,
    }

    /// `attrs Name`, followed by a payload or a discriminant
    pub struct Variant {
        pub attrs: Vec<Attribute>,
        pub name: Ident,
        pub rest: Vec<TokenTree>,
    }
}

/// Body of an item, as found after its name.
pub enum Body {
    /// `{ ... }`
    Braced(TokenStream),
    /// `( ... );`
    Parenthesized(TokenStream),
    /// `;`
    Unit,
}

/// Whether `tokens` opens a generic parameter list.
pub fn starts_generics(tokens: &[TokenTree]) -> bool {
    matches!(tokens.first(), Some(TokenTree::Punct(p)) if p.as_char() == '<')
}

/// Find the body among the tokens following an item's name.
pub fn body(tokens: &[TokenTree]) -> Option<Body> {
    match tokens.first()? {
        TokenTree::Group(g) if g.delimiter() == Delimiter::Brace => Some(Body::Braced(g.stream())),
        TokenTree::Group(g) if g.delimiter() == Delimiter::Parenthesis => {
            Some(Body::Parenthesized(g.stream()))
        }
        TokenTree::Punct(p) if p.as_char() == ';' => Some(Body::Unit),
        _ => None,
    }
}

/// Split `stream` on commas that are not nested in angle brackets.
///
/// Delimited groups are single token trees, so only `<...>` needs tracking.
/// Empty pieces (a trailing comma) are dropped.
pub fn split_top_level(stream: TokenStream) -> Vec<TokenStream> {
    let mut pieces = Vec::new();
    let mut current = TokenStream::new();
    let mut depth = 0usize;
    let mut prev_dash = false;

    for tt in stream {
        if let TokenTree::Punct(p) = &tt {
            match p.as_char() {
                '<' => depth += 1,
                // `->` in fn pointer types is not a closing bracket
                '>' if !prev_dash => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    if !current.is_empty() {
                        pieces.push(core::mem::take(&mut current));
                    }
                    prev_dash = false;
                    continue;
                }
                _ => {}
            }
            prev_dash = p.as_char() == '-';
        } else {
            prev_dash = false;
        }
        current.extend(core::iter::once(tt));
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Parse a whole token stream as `T`.
pub fn parse_tokens<T: Parse>(stream: TokenStream) -> std::result::Result<T, String> {
    let mut iter = stream.to_token_iter();
    iter.parse::<T>().map_err(|e| e.to_string())
}
