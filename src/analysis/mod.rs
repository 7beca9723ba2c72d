//! Content analysis for bookmarked pages.
//!
//! Everything here is a pure function over strings and simple records:
//!
//! - `normalize`: whitespace cleanup and length cap for extracted text
//! - `lexical`: word counts, sentence splitting, keyword extraction
//! - `classify`: read time, complexity, content type and sentiment heuristics
//! - `summary`: extractive summary from leading sentences
//! - `similarity`: edit-distance similarity and duplicate detection
//!
//! Fetching and HTML extraction live in `scrape`, orchestration in `app`.

pub mod classify;
pub mod lexical;
pub mod normalize;
pub mod similarity;
pub mod summary;
pub mod types;

pub use similarity::{check_duplicates, DUPLICATE_THRESHOLD};
pub use types::{
    AnalysisResult, AnalysisUpdate, DuplicateAssessment, ExtractedContent, Heading, PageAnalysis,
    PageSignals,
};

use types::ContentInsights;

use crate::config::AnalysisConfig;

/// Derive every insight from content the extractor already cleaned.
pub fn generate_insights(
    content: &ExtractedContent,
    signals: &PageSignals,
    config: &AnalysisConfig,
) -> ContentInsights {
    let text = content.main_text.as_str();
    let word_count = lexical::count_words(text);

    ContentInsights {
        keywords: lexical::extract_keywords(text, config.max_keywords),
        read_time_minutes: classify::calculate_read_time(word_count),
        content_type: classify::determine_content_type(text, &content.title, signals),
        complexity_score: classify::calculate_complexity(text),
        word_count,
        summary: summary::generate_summary(text, config.summary_max_length),
        sentiment: classify::analyze_sentiment(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{ContentType, Sentiment};

    #[test]
    fn test_generate_insights() {
        let main_text = "This tutorial walks through async programming in Rust. \
            Async programming lets one thread juggle many tasks. \
            The runtime polls futures until they complete. \
            Great tooling makes async programming pleasant."
            .to_string();
        let content = ExtractedContent {
            title: "Async Rust".to_string(),
            word_count: lexical::count_words(&main_text),
            main_text,
            ..Default::default()
        };

        let insights =
            generate_insights(&content, &PageSignals::default(), &AnalysisConfig::default());

        assert_eq!(insights.content_type, ContentType::Tutorial);
        assert_eq!(insights.sentiment, Sentiment::Positive);
        assert_eq!(insights.read_time_minutes, 1);
        assert_eq!(insights.word_count, content.word_count);
        assert_eq!(insights.keywords[0], "async");
        assert_eq!(insights.keywords[1], "programming");
        assert!(insights.summary.chars().count() <= 150);
        assert!(insights.summary.starts_with("This tutorial walks through async programming in Rust."));
        assert!((0.0..=1.0).contains(&insights.complexity_score));
    }

    #[test]
    fn test_generate_insights_empty_page() {
        let insights = generate_insights(
            &ExtractedContent::default(),
            &PageSignals::default(),
            &AnalysisConfig::default(),
        );

        assert!(insights.keywords.is_empty());
        assert_eq!(insights.read_time_minutes, 1);
        assert_eq!(insights.complexity_score, 0.5);
        assert_eq!(insights.content_type, ContentType::General);
        assert_eq!(insights.summary, "");
        assert_eq!(insights.sentiment, Sentiment::Neutral);
    }
}
