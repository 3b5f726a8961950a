// Merges per-unit summaries back into one document summary.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::language::Language;

static REPEATED_PERIODS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.{2,}").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// What came back for one unit. Position in the outcome list is the unit's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Success(String),
    /// The model failed on this unit; `excerpt` is a truncated slice of the unit itself.
    Degraded { excerpt: String, cause: String },
}

impl UnitOutcome {
    pub fn text(&self) -> &str {
        match self {
            UnitOutcome::Success(text) => text,
            UnitOutcome::Degraded { excerpt, .. } => excerpt,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, UnitOutcome::Degraded { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub original_words: usize,
    pub summary_words: usize,
    pub original_chars: usize,
    pub summary_chars: usize,
    pub reduction_percent: f64,
    pub units: usize,
    pub degraded_units: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub text: String,
    pub language: Language,
    pub stats: SummaryStats,
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Relative word-count decrease, 0 when the original has no words.
pub fn reduction_percent(original_words: usize, summary_words: usize) -> f64 {
    if original_words == 0 {
        return 0.0;
    }
    (original_words as f64 - summary_words as f64) / original_words as f64 * 100.0
}

pub fn merge_texts<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = parts.into_iter().collect::<Vec<_>>().join(" ");
    let collapsed = WHITESPACE_RUN.replace_all(&joined, " ");
    REPEATED_PERIODS.replace_all(collapsed.trim(), ".").into_owned()
}

/// Join unit outcomes in order and compute statistics against `original`.
pub fn assemble(original: &str, language: Language, outcomes: &[UnitOutcome]) -> Summary {
    let mut degraded_units = 0;
    let parts = outcomes.iter().map(|outcome| match outcome {
        UnitOutcome::Success(text) => text.as_str(),
        UnitOutcome::Degraded { excerpt, .. } => {
            degraded_units += 1;
            excerpt.as_str()
        }
    });
    let text = merge_texts(parts);

    let original_words = word_count(original);
    let summary_words = word_count(&text);
    let stats = SummaryStats {
        original_words,
        summary_words,
        original_chars: original.chars().count(),
        summary_chars: text.chars().count(),
        reduction_percent: reduction_percent(original_words, summary_words),
        units: outcomes.len(),
        degraded_units,
    };

    Summary {
        text,
        language,
        stats,
    }
}
