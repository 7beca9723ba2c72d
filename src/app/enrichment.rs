use std::sync::Arc;

use crate::{
    analysis::{generate_insights, PageAnalysis},
    config::AnalysisConfig,
    scrape::{extract_page, PageFetcher},
};

/// Fetch, extract and analyze a single page.
#[derive(Clone)]
pub struct Enricher {
    fetcher: Arc<dyn PageFetcher>,
    config: AnalysisConfig,
}

impl Enricher {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: AnalysisConfig) -> Self {
        Self { fetcher, config }
    }

    /// Never returns an error. A page that can't be fetched yields a degraded
    /// analysis carrying the failure reason.
    pub async fn analyze(&self, url: &str) -> PageAnalysis {
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(err) => {
                log::warn!("analysis of {url} degraded: {err}");
                return PageAnalysis::degraded(url, err.to_string());
            }
        };

        // the parsed document is not Send, keep it out of any await
        let page = extract_page(&html, &self.config);
        let insights = generate_insights(&page.content, &page.signals, &self.config);

        PageAnalysis {
            url: url.to_string(),
            content: page.content,
            insights,
            fetch_error: None,
        }
    }
}
