use crate::{
    analysis::{lexical::MAX_KEYWORDS, normalize::MAX_TEXT_LENGTH, summary::SUMMARY_MAX_LENGTH},
    storage::{self, StorageManager},
};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "config.yaml";

/// Default fetch timeout in seconds
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 8;
/// Default maximum number of headings kept per page
const DEFAULT_MAX_HEADINGS: usize = 5;
/// Default duplicate threshold, scores must be strictly above it
const DEFAULT_DUPLICATE_THRESHOLD: f64 = crate::analysis::DUPLICATE_THRESHOLD;

pub const USER_AGENT_DEFAULT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Configuration for page fetching and content analysis
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Timeout for a single page fetch in seconds
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// User-Agent header sent with every fetch
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Cap on extracted text length (characters)
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,

    #[serde(default = "default_summary_max_length")]
    pub summary_max_length: usize,

    #[serde(default = "default_max_headings")]
    pub max_headings: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: USER_AGENT_DEFAULT.to_string(),
            max_text_length: MAX_TEXT_LENGTH,
            max_keywords: MAX_KEYWORDS,
            summary_max_length: SUMMARY_MAX_LENGTH,
            max_headings: DEFAULT_MAX_HEADINGS,
        }
    }
}

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    USER_AGENT_DEFAULT.to_string()
}

fn default_max_text_length() -> usize {
    MAX_TEXT_LENGTH
}

fn default_max_keywords() -> usize {
    MAX_KEYWORDS
}

fn default_summary_max_length() -> usize {
    SUMMARY_MAX_LENGTH
}

fn default_max_headings() -> usize {
    DEFAULT_MAX_HEADINGS
}

/// Configuration for the pre-create duplicate check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DuplicateConfig {
    /// Similarity threshold [0.0, 1.0]
    #[serde(default = "default_duplicate_threshold")]
    pub threshold: f64,

    /// Refuse to create bookmarks flagged as duplicates
    #[serde(default = "default_block_duplicates")]
    pub block_duplicates: bool,
}

impl Default for DuplicateConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
            block_duplicates: true,
        }
    }
}

fn default_duplicate_threshold() -> f64 {
    DEFAULT_DUPLICATE_THRESHOLD
}

fn default_block_duplicates() -> bool {
    true
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub duplicates: DuplicateConfig,

    #[serde(skip_serializing, skip_deserializing)]
    base_path: String,
}

impl Config {
    fn validate(&self) -> anyhow::Result<()> {
        let analysis = &self.analysis;
        if analysis.fetch_timeout_secs == 0 {
            bail!("analysis.fetch_timeout_secs must be greater than 0");
        }
        if analysis.max_text_length == 0 {
            bail!("analysis.max_text_length must be greater than 0");
        }
        if analysis.summary_max_length == 0 {
            bail!("analysis.summary_max_length must be greater than 0");
        }
        if analysis.max_keywords == 0 {
            bail!("analysis.max_keywords must be greater than 0");
        }

        let threshold = self.duplicates.threshold;
        if !(0.0..=1.0).contains(&threshold) {
            bail!("duplicates.threshold must be between 0.0 and 1.0, got {threshold}");
        }

        Ok(())
    }

    pub fn load_with(base_path: &str) -> anyhow::Result<Self> {
        let store = storage::BackendLocal::new(base_path)?;

        // create new if does not exist
        if !store.exists(CONFIG_FILE) {
            store.write(CONFIG_FILE, serde_yml::to_string(&Self::default())?.as_bytes())?;
        }

        let config_str =
            String::from_utf8(store.read(CONFIG_FILE)?).context("config file is not valid utf8")?;
        let mut config: Self = serde_yml::from_str(&config_str).context("config is malformed")?;

        config.base_path = base_path.to_string();

        config.validate()?;

        // resave in case config version needs an upgrade
        if config_str != serde_yml::to_string(&config)? {
            config.save()?;
        }

        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let store = storage::BackendLocal::new(&self.base_path)?;

        let config_str = serde_yml::to_string(&self)?;
        store.write(CONFIG_FILE, config_str.as_bytes())?;
        Ok(())
    }
}
