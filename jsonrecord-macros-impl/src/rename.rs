use proc_macro2::TokenStream;
use quote::quote;

/// Letter case named by a `letter_case = "..."` attribute.
///
/// Variant values are renamed at expansion time, so the conversion lives
/// here as well as in the runtime `LetterCase`; both split words the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameRule {
    /// camelCase
    Camel,
    /// kebab-case
    Kebab,
    /// snake_case
    Snake,
    /// PascalCase
    Pascal,
}

impl RenameRule {
    /// Parse an attribute spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "camelCase" | "camel" => Some(RenameRule::Camel),
            "kebab-case" | "kebab" => Some(RenameRule::Kebab),
            "snake_case" | "snake" => Some(RenameRule::Snake),
            "PascalCase" | "pascal" => Some(RenameRule::Pascal),
            _ => None,
        }
    }

    /// Apply this rule to an identifier.
    pub fn apply(self, name: &str) -> String {
        let words = split_into_words(name);
        let lower = || words.iter().map(|w| w.to_lowercase());
        match self {
            RenameRule::Snake => lower().collect::<Vec<_>>().join("_"),
            RenameRule::Kebab => lower().collect::<Vec<_>>().join("-"),
            RenameRule::Camel => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
                .collect(),
            RenameRule::Pascal => words.iter().map(|w| capitalize(w)).collect(),
        }
    }

    /// The matching runtime value.
    pub fn to_runtime(self, krate: &TokenStream) -> TokenStream {
        match self {
            RenameRule::Camel => quote! { #krate::LetterCase::Camel },
            RenameRule::Kebab => quote! { #krate::LetterCase::Kebab },
            RenameRule::Snake => quote! { #krate::LetterCase::Snake },
            RenameRule::Pascal => quote! { #krate::LetterCase::Pascal },
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect(),
        None => String::new(),
    }
}

fn split_into_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current_word = String::new();
    let mut prev_lower = false;

    for ch in name.chars() {
        if ch == '_' || ch == '-' || ch == '.' || ch.is_whitespace() {
            if !current_word.is_empty() {
                words.push(core::mem::take(&mut current_word));
            }
            prev_lower = false;
        } else if ch.is_uppercase() && prev_lower {
            words.push(core::mem::take(&mut current_word));
            current_word.push(ch);
            prev_lower = false;
        } else {
            current_word.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        }
    }

    if !current_word.is_empty() {
        words.push(current_word);
    }
    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renames_variant_names() {
        assert_eq!(RenameRule::Snake.apply("DarkRed"), "dark_red");
        assert_eq!(RenameRule::Kebab.apply("DarkRed"), "dark-red");
        assert_eq!(RenameRule::Camel.apply("DarkRed"), "darkRed");
        assert_eq!(RenameRule::Pascal.apply("dark_red"), "DarkRed");
    }
}
