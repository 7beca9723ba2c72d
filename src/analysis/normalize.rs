//! Text cleanup applied to everything the extractor pulls out of a page.
//!
//! Structural noise (scripts, navigation, ads) is removed earlier on the parsed
//! document, see `scrape::extract_page`. This module only deals with the string:
//! 1. Collapse whitespace and newline runs into single spaces
//! 2. Trim
//! 3. Cap the length (in characters, not bytes)

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum length of the cleaned text (characters)
pub const MAX_TEXT_LENGTH: usize = 5000;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

/// Clean extracted text, capping it at `max_length` characters
/// (the configured default is [`MAX_TEXT_LENGTH`]).
pub fn clean_text_with(text: &str, max_length: usize) -> String {
    let collapsed = WHITESPACE_RUN.replace_all(text, " ");
    truncate_chars(collapsed.trim(), max_length)
}

/// Take at most `max_chars` characters without splitting a UTF-8 sequence.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}
