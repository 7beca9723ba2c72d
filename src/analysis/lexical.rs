//! Tokenization and frequency-based keyword extraction.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

/// Default number of keywords kept per page
pub const MAX_KEYWORDS: usize = 8;

/// Text shorter than this (characters) yields no keywords
const MIN_KEYWORD_TEXT_LENGTH: usize = 50;

/// Tokens of this length or shorter are never keywords
const MIN_KEYWORD_TOKEN_LENGTH: usize = 3;

pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did",
    "will", "would", "could", "should", "may", "might", "must", "can", "this", "that", "these",
    "those", "i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them",
];

static SENTENCE_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("Failed to compile sentence regex"));

/// Number of whitespace separated tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Split on runs of `.`, `!` and `?`, dropping blank segments.
///
/// Segments are returned untrimmed; callers decide how to join them.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BOUNDARY
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Lowercase, drop punctuation, split on whitespace.
fn tokenize(text: &str) -> Vec<String> {
    let stripped: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();

    stripped.split_whitespace().map(str::to_string).collect()
}

/// Most frequent non-trivial words of `text`, most frequent first.
///
/// Ties keep the order in which the words first appeared.
pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
    if text.chars().count() < MIN_KEYWORD_TEXT_LENGTH {
        return vec![];
    }

    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut frequencies: Vec<(String, usize)> = Vec::new();

    for word in tokenize(text) {
        if word.chars().count() <= MIN_KEYWORD_TOKEN_LENGTH || is_stop_word(&word) {
            continue;
        }

        match positions.get(&word) {
            Some(&idx) => frequencies[idx].1 += 1,
            None => {
                positions.insert(word.clone(), frequencies.len());
                frequencies.push((word, 1));
            }
        }
    }

    // sort_by is stable, so first-seen order survives among equal counts
    frequencies.sort_by(|a, b| b.1.cmp(&a.1));

    frequencies
        .into_iter()
        .take(max_keywords)
        .map(|(word, _)| word)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUST_TEXT: &str = "Rust ownership makes memory safety practical. \
        Ownership rules are checked by the compiler, and the borrow checker enforces \
        ownership at compile time. Memory bugs become compile errors instead of crashes.";

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   "), 0);
        assert_eq!(count_words("one two\nthree\t four"), 4);
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second!! Third?  ...");
        assert_eq!(sentences, vec!["First one", " Second", " Third"]);
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("...!?").is_empty());
    }

    #[test]
    fn test_short_text_has_no_keywords() {
        assert!(extract_keywords("tiny text about rust", MAX_KEYWORDS).is_empty());
    }

    #[test]
    fn test_keywords_ranked_by_frequency() {
        let keywords = extract_keywords(RUST_TEXT, MAX_KEYWORDS);
        assert_eq!(keywords[0], "ownership");
        assert_eq!(keywords[1], "memory");
        assert_eq!(keywords[2], "compile");
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let text = "zebra apple mango zebra apple mango kiwi banana cherry grape lemon";
        let keywords = extract_keywords(text, MAX_KEYWORDS);
        assert_eq!(keywords[..3], ["zebra", "apple", "mango"]);
        assert_eq!(keywords[3..], ["kiwi", "banana", "cherry", "grape", "lemon"]);
    }

    #[test]
    fn test_keywords_filter_stop_words_and_short_tokens() {
        let text = "They would have said that these were those words, but they could \
            not say more than four words about the cat and the dog in the big house";
        let keywords = extract_keywords(text, MAX_KEYWORDS);

        assert!(keywords.len() <= MAX_KEYWORDS);
        for keyword in &keywords {
            assert!(keyword.chars().count() > 3, "{keyword} is too short");
            assert!(!STOP_WORDS.contains(&keyword.as_str()), "{keyword} is a stop word");
        }
        assert_eq!(keywords[0], "words");
    }

    #[test]
    fn test_keywords_strip_punctuation() {
        let text = "Tokio, tokio! TOKIO? async-runtime for networking; networking is fun.";
        let keywords = extract_keywords(text, MAX_KEYWORDS);
        assert_eq!(keywords[0], "tokio");
        assert_eq!(keywords[1], "networking");
        assert!(keywords.contains(&"asyncruntime".to_string()));
    }

    #[test]
    fn test_keywords_respect_limit() {
        let text = "alpha bravo charlie delta echos foxtrot golf hotel india juliet kilo lima mike";
        assert_eq!(extract_keywords(text, 3).len(), 3);
        assert!(extract_keywords(text, MAX_KEYWORDS).len() <= MAX_KEYWORDS);
    }

    #[test]
    fn test_keywords_deterministic() {
        assert_eq!(
            extract_keywords(RUST_TEXT, MAX_KEYWORDS),
            extract_keywords(RUST_TEXT, MAX_KEYWORDS)
        );
    }
}
