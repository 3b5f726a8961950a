// Script-ratio language detection.
// Counts Arabic-block characters against all non-whitespace characters; this is a
// heuristic and can misread mixed-language text, transliterations or very short inputs.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SummarizeError;

pub const DEFAULT_ARABIC_THRESHOLD: f32 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Arabic,
    English,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::Arabic => write!(f, "Arabic"),
            Language::English => write!(f, "English"),
        }
    }
}

/// What the caller asked for: a fixed language, or detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageChoice {
    #[default]
    Automatic,
    Fixed(Language),
}

impl LanguageChoice {
    /// An explicit choice wins and skips detection entirely.
    pub fn resolve(self, text: &str, threshold: f32) -> Language {
        match self {
            LanguageChoice::Fixed(language) => language,
            LanguageChoice::Automatic => detect_with_threshold(text, threshold),
        }
    }
}

impl FromStr for LanguageChoice {
    type Err = SummarizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "automatic" | "auto" => Ok(LanguageChoice::Automatic),
            "english" | "en" => Ok(LanguageChoice::Fixed(Language::English)),
            "arabic" | "ar" => Ok(LanguageChoice::Fixed(Language::Arabic)),
            other => Err(SummarizeError::Config(format!("unknown language choice: {}", other))),
        }
    }
}

fn is_arabic_block(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Share of non-whitespace characters that fall in the Arabic block.
/// Returns `None` when the text has no non-whitespace characters.
pub fn arabic_ratio(text: &str) -> Option<f32> {
    let mut arabic = 0usize;
    let mut total = 0usize;
    for c in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if is_arabic_block(c) {
            arabic += 1;
        }
    }
    if total == 0 {
        None
    } else {
        Some(arabic as f32 / total as f32)
    }
}

pub fn detect(text: &str) -> Language {
    detect_with_threshold(text, DEFAULT_ARABIC_THRESHOLD)
}

pub fn detect_with_threshold(text: &str, threshold: f32) -> Language {
    match arabic_ratio(text) {
        // nothing to go on, English is the safe default
        None => Language::English,
        Some(ratio) if ratio > threshold => Language::Arabic,
        Some(_) => Language::English,
    }
}
