use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::app::AppLocal;
use crate::bookmarks::BackendJson;
use crate::config::Config;
use crate::scrape::{FetchError, PageFetcher};
use crate::storage::BackendLocal;


#[derive(Clone)]
pub enum Stub {
    Page(&'static str),
    Timeout,
    Panic,
    /// Served once a permit is added to the gate.
    Gated(&'static str),
}

pub struct StubFetcher {
    pages: Mutex<HashMap<String, Stub>>,
    pub gate: Semaphore,
}

impl StubFetcher {
    fn new() -> Self {
        Self {
            pages: Mutex::new(HashMap::new()),
            gate: Semaphore::new(0),
        }
    }

    pub fn set(&self, url: &str, stub: Stub) {
        self.pages.lock().unwrap().insert(url.to_string(), stub);
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let stub = self.pages.lock().unwrap().get(url).cloned();

        match stub {
            Some(Stub::Page(html)) => Ok(html.to_string()),
            Some(Stub::Timeout) => Err(FetchError::Timeout(Duration::from_secs(8))),
            Some(Stub::Panic) => panic!("extractor blew up on {url}"),
            Some(Stub::Gated(html)) => {
                let _permit = self.gate.acquire().await.unwrap();
                Ok(html.to_string())
            }
            None => Err(FetchError::Status(404)),
        }
    }
}

/// Creates an isolated AppLocal using a unique temp directory.
pub fn create_app() -> (AppLocal, Arc<StubFetcher>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let base_path = tmp.path().to_str().unwrap().to_string();

    let config = Config::load_with(&base_path).expect("failed to load config");
    let store = BackendLocal::new(&base_path).expect("failed to create storage");
    let bmark_mgr = Arc::new(BackendJson::load(Arc::new(store)).expect("failed to load bookmarks"));
    let fetcher = Arc::new(StubFetcher::new());

    let app = AppLocal::new_with(config, bmark_mgr, fetcher.clone());
    (app, fetcher, tmp)
}
