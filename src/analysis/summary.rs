use super::{lexical::split_sentences, normalize::truncate_chars};

/// Default summary length (characters)
pub const SUMMARY_MAX_LENGTH: usize = 150;

const TRUNCATION_SUFFIX: &str = "...";

/// Extractive summary made of the leading sentences of `text`.
///
/// Text already shorter than `max_length` is returned as is. Otherwise whole
/// sentences are appended while the summary stays under `max_length`; when not
/// even the first sentence fits, the text is cut at `max_length` and suffixed
/// with an ellipsis.
pub fn generate_summary(text: &str, max_length: usize) -> String {
    if text.chars().count() < max_length {
        return text.to_string();
    }

    let mut summary = String::new();
    let mut summary_len = 0;

    for sentence in split_sentences(text) {
        let sentence = sentence.trim();
        let sentence_len = sentence.chars().count();

        if summary_len + sentence_len >= max_length {
            break;
        }

        summary.push_str(sentence);
        summary.push_str(". ");
        summary_len += sentence_len + 2;
    }

    let summary = summary.trim_end();
    if summary.is_empty() {
        return format!("{}{TRUNCATION_SUFFIX}", truncate_chars(text, max_length));
    }

    summary.to_string()
}
