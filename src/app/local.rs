use std::sync::Arc;

use crate::{
    analysis::{check_duplicates, DuplicateAssessment, PageAnalysis},
    bookmarks::{self, BackendJson, Bookmark, BookmarkManager},
    config::Config,
    scrape::{PageFetcher, ReqwestFetcher},
    storage::BackendLocal,
};

use super::{
    enrichment::Enricher,
    errors::AppError,
    task_runner::{AnalysisJob, AnalysisRunner},
};

#[derive(Debug, Clone, Default)]
pub struct AddOpts {
    /// Store the bookmark even when it looks like a duplicate.
    pub force: bool,
}

pub struct AppLocal {
    pub bmark_mgr: Arc<dyn BookmarkManager>,
    enricher: Enricher,
    runner: AnalysisRunner,
    config: Config,
}

impl AppLocal {
    pub fn new(config: Config, base_path: &str) -> anyhow::Result<Self> {
        let storage_mgr = Arc::new(BackendLocal::new(base_path)?);
        let bmark_mgr = Arc::new(BackendJson::load(storage_mgr)?);
        let fetcher = Arc::new(ReqwestFetcher::new(&config.analysis)?);

        Ok(Self::new_with(config, bmark_mgr, fetcher))
    }

    pub fn new_with(
        config: Config,
        bmark_mgr: Arc<dyn BookmarkManager>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Self {
        let enricher = Enricher::new(fetcher, config.analysis.clone());
        let runner = AnalysisRunner::new(bmark_mgr.clone(), enricher.clone());

        Self {
            bmark_mgr,
            enricher,
            runner,
            config,
        }
    }

    /// Run the pipeline on a url without storing anything.
    pub async fn analyze_url(&self, url: &str) -> PageAnalysis {
        self.enricher.analyze(url).await
    }

    pub fn check_duplicate(
        &self,
        owner_id: &str,
        url: &str,
    ) -> anyhow::Result<DuplicateAssessment, AppError> {
        let existing = self.bmark_mgr.find_many(owner_id)?;
        Ok(check_duplicates(
            url,
            &existing,
            self.config.duplicates.threshold,
        ))
    }

    /// Store a new bookmark and schedule its analysis.
    ///
    /// Returns [`AppError::Duplicate`] instead when the url is too close to one
    /// the owner already has, unless blocking is disabled or `opts.force` is set.
    pub fn create(
        &self,
        bmark_create: bookmarks::BookmarkCreate,
        opts: AddOpts,
    ) -> anyhow::Result<(Bookmark, AnalysisJob), AppError> {
        let assessment = self.check_duplicate(&bmark_create.owner_id, bmark_create.url.trim())?;

        if assessment.is_duplicate && self.config.duplicates.block_duplicates && !opts.force {
            log::info!(
                "refusing {}: duplicate of {:?} ({:.3})",
                bmark_create.url,
                assessment.matched_bookmark_id,
                assessment.similarity_score
            );
            return Err(AppError::Duplicate {
                matched_id: assessment.matched_bookmark_id,
                similarity: assessment.similarity_score,
            });
        }

        let bmark = self.bmark_mgr.create(bmark_create, assessment)?;
        let job = self.runner.schedule(bmark.id, &bmark.url)?;

        Ok((bmark, job))
    }

    /// Apply `bmark_update`. A changed url triggers a fresh analysis.
    pub fn update(
        &self,
        id: u64,
        bmark_update: bookmarks::BookmarkUpdate,
    ) -> anyhow::Result<(Bookmark, Option<AnalysisJob>), AppError> {
        let existing = self.find_by_id(id)?;

        let url_changed = bmark_update
            .url
            .as_deref()
            .is_some_and(|url| url.trim() != existing.url);

        let bmark = self
            .bmark_mgr
            .update(id, bmark_update)?
            .ok_or(AppError::NotFound)?;

        if !url_changed {
            return Ok((bmark, None));
        }

        log::debug!("url of bookmark {id} changed, reanalyzing");
        let job = self.runner.schedule(id, &bmark.url)?;

        // reflect the pending status in what we hand back
        let bmark = self.find_by_id(id)?;
        Ok((bmark, Some(job)))
    }

    pub fn reanalyze(&self, id: u64) -> anyhow::Result<AnalysisJob, AppError> {
        let bmark = self.find_by_id(id)?;
        Ok(self.runner.schedule(id, &bmark.url)?)
    }

    pub fn toggle_favorite(&self, id: u64) -> anyhow::Result<Bookmark, AppError> {
        let bmark = self.find_by_id(id)?;

        self.bmark_mgr
            .update(
                id,
                bookmarks::BookmarkUpdate {
                    is_favorite: Some(!bmark.is_favorite),
                    ..Default::default()
                },
            )?
            .ok_or(AppError::NotFound)
    }

    pub fn find_by_id(&self, id: u64) -> anyhow::Result<Bookmark, AppError> {
        self.bmark_mgr.find_by_id(id)?.ok_or(AppError::NotFound)
    }

    pub fn list(&self, owner_id: &str) -> anyhow::Result<Vec<Bookmark>, AppError> {
        Ok(self.bmark_mgr.find_many(owner_id)?)
    }
}
