use heck::{ToKebabCase, ToLowerCamelCase, ToTitleCase, ToUpperCamelCase};

/// Irregular singular -> plural forms, matched on the lowercased last word.
const IRREGULAR_PLURALS: &[(&str, &str)] = &[
    ("city", "cities"),
    ("party", "parties"),
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
];

pub fn kebab(value: &str) -> String {
    value.to_kebab_case()
}

pub fn pascal(value: &str) -> String {
    value.to_upper_camel_case()
}

pub fn camel(value: &str) -> String {
    value.to_lower_camel_case()
}

/// `firstName` -> `First Name`
pub fn humanize(value: &str) -> String {
    value.to_title_case()
}

/// Pluralize an identifier, touching only its last word.
///
/// `callType` -> `callTypes`, `call-type` -> `call-types`, `city` -> `cities`.
pub fn pluralize(value: &str) -> String {
    let split = last_word_start(value);
    let (head, word) = value.split_at(split);

    format!("{head}{}", pluralize_word(word))
}

fn pluralize_word(word: &str) -> String {
    if word.is_empty() {
        return String::new();
    }

    let lower = word.to_lowercase();

    if let Some((_, plural)) = IRREGULAR_PLURALS.iter().find(|(single, _)| *single == lower) {
        return match_case(word, plural);
    }

    let bytes = lower.as_bytes();
    let last = bytes[bytes.len() - 1];

    if last == b'y' && bytes.len() > 1 && !is_vowel(bytes[bytes.len() - 2]) {
        return format!("{}ies", &word[..word.len() - 1]);
    }

    if ["s", "x", "z", "ch", "sh"]
        .iter()
        .any(|suffix| lower.ends_with(suffix))
    {
        return format!("{word}es");
    }

    format!("{word}s")
}

const fn is_vowel(byte: u8) -> bool {
    matches!(byte, b'a' | b'e' | b'i' | b'o' | b'u')
}

// Byte offset where the last word starts: after the last separator or at the
// last uppercase letter of a camelCase identifier.
fn last_word_start(value: &str) -> usize {
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (idx, ch) in value.char_indices() {
        if matches!(ch, '-' | '_' | ' ') {
            start = idx + ch.len_utf8();
        } else if ch.is_uppercase() && prev.is_some_and(char::is_lowercase) {
            start = idx;
        }
        prev = Some(ch);
    }

    start
}

// Carry the capitalization of the singular over to an irregular plural.
fn match_case(original: &str, plural: &str) -> String {
    if original.chars().all(char::is_uppercase) && original.len() > 1 {
        return plural.to_uppercase();
    }

    let mut chars = plural.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(p)) if first.is_uppercase() => {
            p.to_uppercase().chain(chars).collect()
        }
        _ => plural.to_string(),
    }
}
