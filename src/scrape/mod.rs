pub mod extract;

pub use extract::extract_page;

use async_trait::async_trait;
use std::{error::Error, time::Duration};

use crate::config::AnalysisConfig;

#[derive(thiserror::Error, Debug)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("unexpected status: {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),
}

/// Retrieves the HTML of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

fn get_error(error: &reqwest::Error) -> String {
    match error.source() {
        Some(e) => match e.source() {
            Some(e) => e.to_string(),
            None => e.to_string(),
        },
        None => error.to_string(),
    }
}

/// Single-attempt HTTP fetcher with a hard timeout and a browser user-agent.
pub struct ReqwestFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestFetcher {
    pub fn new(config: &AnalysisConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, Duration::from_secs(config.fetch_timeout_secs))
    }

    pub fn with_timeout(config: &AnalysisConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self { client, timeout })
    }

    fn classify_error(&self, iden: &str, err: reqwest::Error) -> FetchError {
        if err.is_timeout() {
            log::warn!("{iden}: timed out after {:?}", self.timeout);
            return FetchError::Timeout(self.timeout);
        }

        let reason = get_error(&err);
        log::warn!("{iden}: {err}: {reason}");
        FetchError::Network(reason)
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let url_parsed =
            reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;

        let host = url_parsed.host_str().unwrap_or_default();
        let iden = format!("{host}{}", url_parsed.path());

        log::debug!("{iden}: requesting");

        let resp = self
            .client
            .get(url_parsed.clone())
            .send()
            .await
            .map_err(|err| self.classify_error(&iden, err))?;

        let status = resp.status();
        if !status.is_success() {
            log::debug!("{iden}: {status}");
            return Err(FetchError::Status(status.as_u16()));
        }

        // the body can still time out after the headers arrived
        resp.text()
            .await
            .map_err(|err| self.classify_error(&iden, err))
    }
}
