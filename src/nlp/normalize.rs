// Text normalization ahead of segmentation.
// Arabic input is filtered to a fixed character set, whitespace-collapsed and
// stripped of repeated " . "-delimited sentences; English input only has its
// whitespace collapsed.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use super::language::Language;

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

const SENTENCE_SEPARATOR: &str = " . ";

const ALLOWED_PUNCTUATION: [char; 7] = ['.', ',', '!', '?', '؛', '،', '-'];

pub fn normalize(text: &str, language: Language) -> String {
    match language {
        Language::Arabic => {
            let filtered = filter_arabic_chars(text);
            let collapsed = collapse_whitespace(&filtered);
            remove_duplicate_sentences(&collapsed)
        }
        Language::English => collapse_whitespace(text),
    }
}

fn is_allowed_arabic_char(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
        || c.is_ascii_alphanumeric()
        || c.is_whitespace()
        || ALLOWED_PUNCTUATION.contains(&c)
}

/// Replace every character outside the Arabic block, ASCII letters and digits,
/// whitespace and the allowed punctuation with a space.
pub fn filter_arabic_chars(text: &str) -> String {
    text.chars()
        .map(|c| if is_allowed_arabic_char(c) { c } else { ' ' })
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").trim().to_string()
}

/// Drop repeated sentences, keeping first occurrences in order.
///
/// Sentences are delimited by the literal " . " sequence, so this misfires on
/// text that happens to contain that sequence inside abbreviations or numbers.
/// Text without any delimiter is returned untouched.
pub fn remove_duplicate_sentences(text: &str) -> String {
    let body = text.trim_end_matches(|c: char| c == '.' || c.is_whitespace());
    if !body.contains(SENTENCE_SEPARATOR) {
        return text.to_string();
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let unique: Vec<&str> = body
        .split(SENTENCE_SEPARATOR)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(*s))
        .collect();

    format!("{} .", unique.join(SENTENCE_SEPARATOR))
}
