//! Heuristic classifiers: read time, complexity, content type and sentiment.

use super::{
    lexical::split_sentences,
    types::{ContentType, PageSignals, Sentiment, NEUTRAL_COMPLEXITY},
};

const WORDS_PER_MINUTE: usize = 200;
const MIN_READ_TIME: u32 = 1;
const MAX_READ_TIME: u32 = 30;

/// Average word length (chars) treated as maximally complex
const COMPLEX_WORD_LENGTH: f64 = 8.0;
/// Average sentence length (words) treated as maximally complex
const COMPLEX_SENTENCE_LENGTH: f64 = 25.0;

/// More images than this on a page marks it as an image page
const IMAGE_PAGE_THRESHOLD: usize = 5;

pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "amazing", "wonderful", "best", "love", "like", "happy",
    "success", "awesome", "fantastic",
];

pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "worst", "hate", "dislike", "sad", "fail", "error", "problem",
    "horrible", "disappointing",
];

/// Estimated minutes to read `word_count` words, always within 1..=30.
pub fn calculate_read_time(word_count: usize) -> u32 {
    let minutes = word_count.div_ceil(WORDS_PER_MINUTE);
    u32::try_from(minutes)
        .unwrap_or(MAX_READ_TIME)
        .clamp(MIN_READ_TIME, MAX_READ_TIME)
}

/// Readability proxy in `[0, 1]` from average word and sentence length.
pub fn calculate_complexity(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = split_sentences(text).len();

    if words.is_empty() || sentence_count == 0 {
        return NEUTRAL_COMPLEXITY;
    }

    let total_chars: usize = words.iter().map(|w| w.chars().count()).sum();
    let avg_word_length = total_chars as f64 / words.len() as f64;
    let avg_sentence_length = words.len() as f64 / sentence_count as f64;

    let word_complexity = (avg_word_length / COMPLEX_WORD_LENGTH).min(1.0);
    let sentence_complexity = (avg_sentence_length / COMPLEX_SENTENCE_LENGTH).min(1.0);

    ((word_complexity + sentence_complexity) / 2.0).min(1.0)
}

/// Matches when the lowercased text contains any of `keywords`, or when the
/// structural check (if any) passes.
struct ContentRule {
    label: ContentType,
    keywords: &'static [&'static str],
    structural: Option<fn(&PageSignals) -> bool>,
}

impl ContentRule {
    fn matches(&self, haystack: &str, signals: &PageSignals) -> bool {
        self.structural.is_some_and(|check| check(signals))
            || self.keywords.iter().any(|kw| haystack.contains(kw))
    }
}

fn has_video(signals: &PageSignals) -> bool {
    signals.video_count > 0
}

fn is_gallery(signals: &PageSignals) -> bool {
    signals.image_count > IMAGE_PAGE_THRESHOLD
}

/// Evaluated top to bottom, first match wins.
const CONTENT_RULES: &[ContentRule] = &[
    ContentRule {
        label: ContentType::News,
        keywords: &["news", "article"],
        structural: None,
    },
    ContentRule {
        label: ContentType::Tutorial,
        keywords: &["tutorial", "guide", "how to"],
        structural: None,
    },
    ContentRule {
        label: ContentType::Documentation,
        keywords: &["documentation", "api", "reference"],
        structural: None,
    },
    ContentRule {
        label: ContentType::Blog,
        keywords: &["blog", "post"],
        structural: None,
    },
    ContentRule {
        label: ContentType::Video,
        keywords: &["video"],
        structural: Some(has_video),
    },
    ContentRule {
        label: ContentType::Image,
        keywords: &["image"],
        structural: Some(is_gallery),
    },
    ContentRule {
        label: ContentType::Product,
        keywords: &["product", "buy", "price"],
        structural: None,
    },
    ContentRule {
        label: ContentType::Resume,
        keywords: &["resume", "cv"],
        structural: None,
    },
    ContentRule {
        label: ContentType::Job,
        keywords: &["job", "career", "employment"],
        structural: None,
    },
];

pub fn determine_content_type(text: &str, title: &str, signals: &PageSignals) -> ContentType {
    let haystack = format!("{text} {title}").to_lowercase();

    CONTENT_RULES
        .iter()
        .find(|rule| rule.matches(&haystack, signals))
        .map(|rule| rule.label)
        .unwrap_or(ContentType::General)
}

pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lowered = text.to_lowercase();
    let (positive, negative) =
        lowered
            .split_whitespace()
            .fold((0usize, 0usize), |(pos, neg), word| {
                (
                    pos + POSITIVE_WORDS.contains(&word) as usize,
                    neg + NEGATIVE_WORDS.contains(&word) as usize,
                )
            });

    match positive.cmp(&negative) {
        std::cmp::Ordering::Greater => Sentiment::Positive,
        std::cmp::Ordering::Less => Sentiment::Negative,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    }
}
