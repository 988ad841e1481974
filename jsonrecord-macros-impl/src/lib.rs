#![warn(missing_docs)]
//! Implementation of `#[derive(Record)]`, kept in a regular library so the
//! expansion can be unit tested.
//!
//! Structs with named fields become records. Single-field tuple structs (and
//! named structs marked `transparent`) become aliases of their field type.
//! Enums become value enums, unions, or subtype families depending on their
//! shape and attributes. Generic types are rejected.

mod attrs;
mod derive;
mod grammar;
mod process_enum;
mod process_struct;
mod rename;

pub use attrs::CompileError;
pub use derive::derive_record;
pub use rename::RenameRule;

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn expand(input: proc_macro2::TokenStream) -> String {
        derive_record(input).to_string()
    }

    #[test]
    fn records_register_their_fields() {
        let out = expand(quote! {
            /// A person.
            #[record(letter_case = "camelCase", undefined = "include")]
            pub struct Person {
                given_name: String,
                #[record(default)]
                age: Option<u32>,
                #[record(catch_all, default)]
                extra: CatchAll,
            }
        });
        assert!(out.contains("impl :: jsonrecord :: Record for Person"));
        assert!(out.contains("FieldInfo :: new :: < String > (\"given_name\")"));
        assert!(out.contains("LetterCase :: Camel"));
        assert!(out.contains("Undefined :: Include"));
        assert!(out.contains(". catch_all ()"));
        assert!(out.contains("take_or (1usize"));
        assert!(out.contains("\" A person.\""));
    }

    #[test]
    fn field_overrides_become_meta() {
        let out = expand(quote! {
            struct Event {
                #[record(rename = "when", encoder = "iso8601", exclude_if = Option::is_none)]
                at: Option<DateTime<Utc>>,
                #[record(decoder = parse_count, exclude = "never")]
                count: i64,
            }
        });
        assert!(out.contains(". field_name (\"when\")"));
        assert!(out.contains("Encoder :: Iso8601"));
        assert!(out.contains("Exclude :: when :: < Option < DateTime < Utc"));
        assert!(out.contains("(Option :: is_none)"));
        assert!(out.contains("Decoder :: try_custom :: < i64 , _ , _ > (parse_count)"));
        assert!(out.contains("Exclude :: Never"));
    }

    #[test]
    fn crate_path_is_configurable() {
        let out = expand(quote! {
            #[record(crate = ::jsonrecord_core)]
            struct Point { x: i32, y: i32 }
        });
        assert!(out.contains("impl :: jsonrecord_core :: Record for Point"));
        assert!(!out.contains(":: jsonrecord ::"));
    }

    #[test]
    fn tuple_structs_are_aliases() {
        let out = expand(quote! { pub struct UserId(pub u64); });
        assert!(out.contains("TypeHint :: Alias"));
        assert!(out.contains("< u64 as :: jsonrecord :: Codec > :: decode"));
    }

    #[test]
    fn unit_enums_are_value_enums() {
        let out = expand(quote! {
            #[record(letter_case = "snake_case")]
            enum Color {
                DarkRed,
                #[record(rename = "GRN")]
                Green,
                #[record(value = 3)]
                Blue,
            }
        });
        assert!(out.contains("EnumValue :: Str (\"dark_red\")"));
        assert!(out.contains("EnumValue :: Str (\"GRN\")"));
        assert!(out.contains("EnumValue :: Int (3)"));
    }

    #[test]
    fn newtype_enums_are_unions() {
        let out = expand(quote! {
            enum IntOrText { Int(i64), Text(String), Missing }
        });
        assert!(out.contains("TypeHint :: Union"));
        assert!(out.contains("decode_union (\"IntOrText\""));
        assert!(out.contains("TypeHint :: Null"));
    }

    #[test]
    fn subtypes_dispatch_on_a_tag() {
        let out = expand(quote! {
            #[record(tag = "kind")]
            enum Shape {
                #[record(base)]
                Plain(Base),
                #[record(rename = "circle")]
                Circle(Circle),
            }
        });
        assert!(out.contains("tag : \"kind\""));
        assert!(out.contains("base : :: core :: option :: Option :: Some (0usize)"));
        assert!(out.contains("RecordRef :: of :: < Circle > ()"));
    }

    #[test]
    fn generics_are_rejected() {
        let out = expand(quote! { struct Wrapper<T> { value: T } });
        assert!(out.contains("compile_error"));
        assert!(out.contains("does not support generic types"));
    }

    #[test]
    fn unknown_attributes_are_reported() {
        let out = expand(quote! {
            #[record(undefined = "explode")]
            struct Thing { x: u8 }
        });
        assert!(out.contains("unknown undefined policy"));
    }
}
