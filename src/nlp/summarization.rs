// Extractive summarization by sentence scoring.
// Sentences are scored by the normalized frequency of their content words and the
// best ones are picked until the word budget is met, then put back in document order.
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static SENTENCE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?؟]+[.!?؟]*").unwrap());

static WORD_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}']+").unwrap());

// Common stop words to filter out when scoring sentences
static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
        "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
        "to", "was", "will", "with", "this", "but", "they", "have",
        "had", "what", "when", "where", "who", "which", "why", "how",
        "في", "من", "على", "إلى", "عن", "مع", "هذا", "هذه", "ذلك", "تلك",
        "التي", "الذي", "الذين", "كان", "كانت", "قد", "لقد", "أن", "إن", "هو",
        "هي", "ثم", "أو", "بين", "كل", "بعد", "قبل", "حتى", "عند", "لم",
    ]
    .iter()
    .copied()
    .collect()
});

fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

fn content_words(sentence: &str) -> Vec<String> {
    WORD_PATTERN
        .find_iter(sentence)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

fn is_scoring_word(word: &str) -> bool {
    !STOP_WORDS.contains(word) && word.chars().count() > 2
}

fn score_sentences(sentences: &[&str]) -> Vec<(usize, usize)> {
    let mut word_freq: HashMap<String, usize> = HashMap::new();
    for sentence in sentences {
        for word in content_words(sentence) {
            if is_scoring_word(&word) {
                *word_freq.entry(word).or_insert(0) += 1;
            }
        }
    }

    let max_freq = word_freq.values().max().copied().unwrap_or(1);
    for freq in word_freq.values_mut() {
        *freq = (*freq * 100) / max_freq;
    }

    sentences
        .iter()
        .enumerate()
        .map(|(idx, sentence)| {
            let words = content_words(sentence);
            let mut score: usize = words.iter().filter_map(|w| word_freq.get(w)).sum();
            // Normalize by sentence length to avoid bias toward long sentences
            if !words.is_empty() {
                score /= words.len();
            }
            // Opening sentences tend to carry the topic
            if idx == 0 {
                score = score * 3 / 2;
            }
            (idx, score)
        })
        .collect()
}

fn first_words(text: &str, n: usize) -> String {
    text.split_whitespace().take(n).collect::<Vec<_>>().join(" ")
}

/// Pick the highest-scoring sentences until at least `min_words` words are chosen,
/// never going over `max_words`. Text already within `min_words` comes back as is.
pub fn summarize_extractive(text: &str, min_words: usize, max_words: usize) -> String {
    let max_words = max_words.max(1);
    let total_words = text.split_whitespace().count();
    if total_words <= min_words.min(max_words) {
        return first_words(text, total_words);
    }

    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }

    let mut ranked = score_sentences(&sentences);
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut selected: Vec<usize> = Vec::new();
    let mut chosen_words = 0;
    for &(idx, _) in &ranked {
        if chosen_words >= min_words {
            break;
        }
        let words = sentences[idx].split_whitespace().count();
        if chosen_words + words <= max_words {
            selected.push(idx);
            chosen_words += words;
        }
    }

    if selected.is_empty() {
        // every sentence is over budget: cut the best one down
        return first_words(sentences[ranked[0].0], max_words);
    }

    selected.sort_unstable();
    selected
        .iter()
        .map(|&idx| sentences[idx])
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const LONG_TEXT: &str = "Natural language processing is a field of artificial intelligence \
                    that focuses on the interaction between computers and humans through \
                    natural language. The ultimate objective of language processing is to read, decipher, \
                    understand, and make sense of the human languages in a manner that is valuable. \
                    It combines computational linguistics with statistical models and machine learning. \
                    Applications include translation, sentiment analysis, and chatbots.";

    #[test]
    fn test_summarize_within_budget() {
        let summary = summarize_extractive(LONG_TEXT, 10, 40);
        let words = summary.split_whitespace().count();
        assert!(!summary.is_empty());
        assert!(words <= 40);
        assert!(summary.len() < LONG_TEXT.len());
    }

    #[test]
    fn test_summary_keeps_document_order() {
        let summary = summarize_extractive(LONG_TEXT, 30, 60);
        let positions: Vec<usize> = split_sentences(&summary)
            .iter()
            .filter_map(|s| LONG_TEXT.find(s))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_short_text_returned_as_is() {
        let short_text = "This is a short text.";
        assert_eq!(summarize_extractive(short_text, 40, 120), short_text);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(summarize_extractive("", 40, 120), "");
    }

    #[test]
    fn test_oversized_sentence_is_cut() {
        let text = "one two three four five six seven eight nine ten eleven twelve.";
        let summary = summarize_extractive(text, 2, 5);
        assert_eq!(summary, "one two three four five");
    }

    #[test]
    fn test_arabic_sentences_scored() {
        let text = "الذكاء الاصطناعي يغير العالم بسرعة كبيرة. \
                    يستخدم الذكاء الاصطناعي في الطب والتعليم. \
                    الطقس اليوم مشمس وجميل. \
                    تطبيقات الذكاء الاصطناعي كثيرة ومتنوعة؟";
        let summary = summarize_extractive(text, 5, 14);
        assert!(!summary.is_empty());
        assert!(summary.split_whitespace().count() <= 14);
        assert!(summary.contains("الذكاء"));
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(
            summarize_extractive(LONG_TEXT, 20, 50),
            summarize_extractive(LONG_TEXT, 20, 50)
        );
    }
}
