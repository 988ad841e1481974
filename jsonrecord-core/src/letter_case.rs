use core::fmt;

/// Naming convention applied to a field's wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LetterCase {
    /// camelCase
    Camel,
    /// kebab-case
    Kebab,
    /// snake_case
    Snake,
    /// PascalCase
    Pascal,
}

impl LetterCase {
    /// Parse a letter case from its attribute spelling.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "camelCase" | "camel" => Some(LetterCase::Camel),
            "kebab-case" | "kebab" => Some(LetterCase::Kebab),
            "snake_case" | "snake" => Some(LetterCase::Snake),
            "PascalCase" | "pascal" => Some(LetterCase::Pascal),
            _ => None,
        }
    }

    /// Apply this case to a name.
    pub fn apply(self, name: &str) -> String {
        let words = split_into_words(name);
        match self {
            LetterCase::Camel => {
                let mut result = String::with_capacity(name.len());
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        result.push_str(&word.to_lowercase());
                    } else {
                        push_capitalized(&mut result, word);
                    }
                }
                result
            }
            LetterCase::Snake => words
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("_"),
            LetterCase::Kebab => words
                .iter()
                .map(|w| w.to_lowercase())
                .collect::<Vec<_>>()
                .join("-"),
            LetterCase::Pascal => {
                let mut result = String::with_capacity(name.len());
                for word in &words {
                    push_capitalized(&mut result, word);
                }
                result
            }
        }
    }
}

impl fmt::Display for LetterCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LetterCase::Camel => "camelCase",
            LetterCase::Kebab => "kebab-case",
            LetterCase::Snake => "snake_case",
            LetterCase::Pascal => "PascalCase",
        })
    }
}

fn push_capitalized(out: &mut String, word: &str) {
    let mut chars = word.chars();
    if let Some(first) = chars.next() {
        out.extend(first.to_uppercase());
        out.push_str(&chars.as_str().to_lowercase());
    }
}

/// Split on `_`, `-`, `.`, whitespace and lower-to-upper boundaries.
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
    fn converts_snake_names() {
        assert_eq!(LetterCase::Camel.apply("given_name"), "givenName");
        assert_eq!(LetterCase::Pascal.apply("given_name"), "GivenName");
        assert_eq!(LetterCase::Kebab.apply("given_name"), "given-name");
        assert_eq!(LetterCase::Snake.apply("given_name"), "given_name");
    }

    #[test]
    fn converts_camel_names_back() {
        assert_eq!(LetterCase::Snake.apply("givenName"), "given_name");
        assert_eq!(LetterCase::Kebab.apply("GivenName"), "given-name");
        assert_eq!(LetterCase::Camel.apply("GivenName"), "givenName");
    }

    #[test]
    fn keeps_acronyms_together() {
        assert_eq!(LetterCase::Snake.apply("HTTPServer"), "httpserver");
        assert_eq!(LetterCase::Camel.apply("user_id2"), "userId2");
    }

    #[test]
    fn parses_attribute_spellings() {
        assert_eq!(LetterCase::parse("camelCase"), Some(LetterCase::Camel));
        assert_eq!(LetterCase::parse("kebab-case"), Some(LetterCase::Kebab));
        assert_eq!(LetterCase::parse("SCREAMING"), None);
    }
}
