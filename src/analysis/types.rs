use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Summary used when the page could not be fetched or parsed.
pub const UNAVAILABLE_SUMMARY: &str = "Unable to analyze content";

/// Complexity assigned to text with no measurable structure.
pub const NEUTRAL_COMPLEXITY: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    News,
    Tutorial,
    Documentation,
    Blog,
    Video,
    Image,
    Product,
    Resume,
    Job,
    General,
    #[default]
    Unknown,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::News => "news",
            ContentType::Tutorial => "tutorial",
            ContentType::Documentation => "documentation",
            ContentType::Blog => "blog",
            ContentType::Video => "video",
            ContentType::Image => "image",
            ContentType::Product => "product",
            ContentType::Resume => "resume",
            ContentType::Job => "job",
            ContentType::General => "general",
            ContentType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`
    pub level: u8,
    pub text: String,
}

/// Raw page content isolated by the extractor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub title: String,
    pub description: String,
    pub hero_image_url: String,
    pub main_text: String,
    pub headings: Vec<Heading>,
    pub word_count: usize,
}

/// Structural hints the classifiers can't read from text alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageSignals {
    pub video_count: usize,
    pub image_count: usize,
}

/// Everything derived from the extracted text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentInsights {
    pub keywords: Vec<String>,
    pub read_time_minutes: u32,
    pub content_type: ContentType,
    pub complexity_score: f64,
    pub word_count: usize,
    pub summary: String,
    pub sentiment: Sentiment,
}

impl ContentInsights {
    /// Degraded insights for a page that never made it through the fetcher.
    pub fn unavailable() -> Self {
        Self {
            keywords: vec![],
            read_time_minutes: 1,
            content_type: ContentType::Unknown,
            complexity_score: NEUTRAL_COMPLEXITY,
            word_count: 0,
            summary: UNAVAILABLE_SUMMARY.to_string(),
            sentiment: Sentiment::Neutral,
        }
    }
}

/// Result of running the whole pipeline against one URL.
///
/// A fetch failure never surfaces as an error here: the content is left empty,
/// the insights are [`ContentInsights::unavailable`] and `fetch_error` carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub url: String,
    pub content: ExtractedContent,
    pub insights: ContentInsights,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_error: Option<String>,
}

impl PageAnalysis {
    pub fn degraded(url: &str, reason: String) -> Self {
        Self {
            url: url.to_string(),
            content: ExtractedContent::default(),
            insights: ContentInsights::unavailable(),
            fetch_error: Some(reason),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.fetch_error.is_some()
    }
}

/// Persisted enrichment state of a bookmark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub read_time_minutes: u32,
    #[serde(default)]
    pub complexity_score: f64,
    #[serde(default)]
    pub content_type: ContentType,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub word_count: usize,

    #[serde(default)]
    pub extracted_title: String,
    #[serde(default)]
    pub extracted_description: String,
    #[serde(default)]
    pub extracted_image: String,
    #[serde(default)]
    pub headings: Vec<Heading>,

    pub analysis_status: AnalysisStatus,
    pub last_analyzed_at: DateTime<Utc>,
}

impl AnalysisResult {
    pub fn pending(at: DateTime<Utc>) -> Self {
        Self {
            keywords: vec![],
            read_time_minutes: 1,
            complexity_score: NEUTRAL_COMPLEXITY,
            content_type: ContentType::Unknown,
            summary: String::new(),
            sentiment: Sentiment::Neutral,
            word_count: 0,
            extracted_title: String::new(),
            extracted_description: String::new(),
            extracted_image: String::new(),
            headings: vec![],
            analysis_status: AnalysisStatus::Pending,
            last_analyzed_at: at,
        }
    }

    pub fn completed(analysis: PageAnalysis, at: DateTime<Utc>) -> Self {
        let PageAnalysis {
            content, insights, ..
        } = analysis;

        Self {
            keywords: insights.keywords,
            read_time_minutes: insights.read_time_minutes,
            complexity_score: insights.complexity_score,
            content_type: insights.content_type,
            summary: insights.summary,
            sentiment: insights.sentiment,
            word_count: insights.word_count,
            extracted_title: content.title,
            extracted_description: content.description,
            extracted_image: content.hero_image_url,
            headings: content.headings,
            analysis_status: AnalysisStatus::Completed,
            last_analyzed_at: at,
        }
    }

    /// Apply a status transition in place.
    ///
    /// `Pending` and `Failed` only touch the status and timestamp, so a bookmark
    /// that was analyzed before keeps its previous keywords, summary, etc.
    pub fn apply(&mut self, update: AnalysisUpdate) {
        match update {
            AnalysisUpdate::Pending { at } => {
                self.analysis_status = AnalysisStatus::Pending;
                self.last_analyzed_at = at;
            }
            AnalysisUpdate::Failed { at } => {
                self.analysis_status = AnalysisStatus::Failed;
                self.last_analyzed_at = at;
            }
            AnalysisUpdate::Completed(result) => *self = *result,
        }
    }

    pub fn read_time_display(&self) -> String {
        match self.read_time_minutes {
            0 => "Less than 1 min".to_string(),
            1 => "1 min read".to_string(),
            n => format!("{n} min read"),
        }
    }

    pub fn complexity_display(&self) -> &'static str {
        if self.complexity_score < 0.3 {
            "Easy"
        } else if self.complexity_score < 0.7 {
            "Medium"
        } else {
            "Complex"
        }
    }
}

impl Default for AnalysisResult {
    fn default() -> Self {
        Self::pending(Utc::now())
    }
}

/// Status transition handed to the storage collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisUpdate {
    Pending { at: DateTime<Utc> },
    Completed(Box<AnalysisResult>),
    Failed { at: DateTime<Utc> },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateAssessment {
    pub is_duplicate: bool,
    pub similarity_score: f64,
    /// Lookup-only reference to the closest existing bookmark.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_bookmark_id: Option<u64>,
}
