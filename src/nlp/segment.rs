// Splits normalized text into model-sized units.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::mem;

use super::language::Language;

// A sentence ends at one of . ! ؟ followed by whitespace.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!؟])\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStrategy {
    /// Greedy sentence packing, bounded in characters.
    Paragraph,
    /// Fixed windows of whitespace-separated words.
    WordWindow,
}

impl SegmentStrategy {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Arabic => SegmentStrategy::Paragraph,
            Language::English => SegmentStrategy::WordWindow,
        }
    }

    /// Size of `text` in this strategy's unit of measure.
    pub fn measure(self, text: &str) -> usize {
        match self {
            SegmentStrategy::Paragraph => text.chars().count(),
            SegmentStrategy::WordWindow => text.split_whitespace().count(),
        }
    }
}

/// A contiguous span of normalized text, submitted to the model in one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub index: usize,
    pub text: String,
}

pub fn segment(text: &str, language: Language, max_unit_size: usize) -> Vec<Unit> {
    segment_with(text, SegmentStrategy::for_language(language), max_unit_size)
}

pub fn segment_with(text: &str, strategy: SegmentStrategy, max_unit_size: usize) -> Vec<Unit> {
    let max_unit_size = max_unit_size.max(1);
    let pieces = match strategy {
        SegmentStrategy::Paragraph => paragraph_units(text, max_unit_size),
        SegmentStrategy::WordWindow => word_windows(text, max_unit_size),
    };
    pieces
        .into_iter()
        .enumerate()
        .map(|(index, text)| Unit { index, text })
        .collect()
}

pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for cap in SENTENCE_END.captures_iter(text) {
        let (Some(whole), Some(punct)) = (cap.get(0), cap.get(1)) else {
            continue;
        };
        sentences.push(text[start..punct.end()].trim());
        start = whole.end();
    }
    sentences.push(text[start..].trim());
    sentences.retain(|s| !s.is_empty());
    sentences
}

fn paragraph_units(text: &str, max_chars: usize) -> Vec<String> {
    let mut units = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for sentence in split_sentences(text) {
        let len = sentence.chars().count();
        if current.is_empty() {
            // an oversized sentence still goes out whole
            current.push_str(sentence);
            current_len = len;
        } else if current_len + 1 + len <= max_chars {
            current.push(' ');
            current.push_str(sentence);
            current_len += 1 + len;
        } else {
            units.push(mem::take(&mut current));
            current.push_str(sentence);
            current_len = len;
        }
    }

    if !current.is_empty() {
        units.push(current);
    }
    units
}

fn word_windows(text: &str, max_words: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();
    words.chunks(max_words).map(|window| window.join(" ")).collect()
}
