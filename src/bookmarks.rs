use crate::{
    analysis::{AnalysisResult, AnalysisUpdate, DuplicateAssessment},
    storage::{self, StorageManager},
};
use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    hash::Hash,
    sync::{Arc, RwLock},
};

const DATABASE_FILE: &str = "bookmarks.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Resume,
    Job,
    Favorite,
    Work,
    Personal,
    Study,
    #[default]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Red,
    Orange,
    Yellow,
    Green,
    #[default]
    Blue,
    Purple,
    Pink,
    Gray,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: u64,
    pub owner_id: String,

    pub name: String,
    pub url: String,
    pub description: String,
    pub category: Category,
    pub color_tag: ColorTag,
    pub tags: Vec<String>,
    pub is_favorite: bool,

    pub analysis: AnalysisResult,
    #[serde(default)]
    pub duplicate: DuplicateAssessment,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn view(&self) -> BookmarkView<'_> {
        BookmarkView {
            bookmark: self,
            read_time_display: self.analysis.read_time_display(),
            complexity_display: self.analysis.complexity_display(),
        }
    }
}

/// Output form of a bookmark, with display fields computed from its analysis.
#[derive(Debug, Serialize)]
pub struct BookmarkView<'a> {
    #[serde(flatten)]
    pub bookmark: &'a Bookmark,
    pub read_time_display: String,
    pub complexity_display: &'static str,
}

impl Hash for Bookmark {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state)
    }
}

impl PartialEq for Bookmark {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Bookmark {}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookmarkCreate {
    pub owner_id: String,
    pub name: String,
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_tag: Option<ColorTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct BookmarkUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_tag: Option<ColorTag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}

/// Storage collaborator used by the duplicate check and the analysis runner.
///
/// `update` and `update_analysis` return `Ok(None)` when the id is unknown.
pub trait BookmarkManager: Send + Sync {
    fn find_by_id(&self, id: u64) -> anyhow::Result<Option<Bookmark>>;
    fn find_many(&self, owner_id: &str) -> anyhow::Result<Vec<Bookmark>>;
    fn create(
        &self,
        bookmark: BookmarkCreate,
        duplicate: DuplicateAssessment,
    ) -> anyhow::Result<Bookmark>;
    fn update(&self, id: u64, update: BookmarkUpdate) -> anyhow::Result<Option<Bookmark>>;
    fn update_analysis(&self, id: u64, update: AnalysisUpdate)
        -> anyhow::Result<Option<Bookmark>>;
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim().to_lowercase();
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Database {
    next_id: u64,
    bookmarks: Vec<Bookmark>,
}

/// Bookmark database kept in memory and persisted as a single JSON document.
#[derive(Clone)]
pub struct BackendJson {
    db: Arc<RwLock<Database>>,
    store: Arc<dyn StorageManager>,
}

impl BackendJson {
    pub fn load(store: Arc<dyn StorageManager>) -> anyhow::Result<Self> {
        let db = match storage::read_json::<Database>(store.as_ref(), DATABASE_FILE)? {
            Some(db) => db,
            None => {
                log::info!("Creating new bookmark database");
                let db = Database::default();
                storage::write_json(store.as_ref(), DATABASE_FILE, &db)?;
                db
            }
        };

        Ok(Self {
            db: Arc::new(RwLock::new(db)),
            store,
        })
    }

    fn save(&self, db: &Database) -> anyhow::Result<()> {
        storage::write_json(self.store.as_ref(), DATABASE_FILE, db)
    }

    fn write_db(&self) -> anyhow::Result<std::sync::RwLockWriteGuard<'_, Database>> {
        self.db
            .write()
            .map_err(|_| anyhow::anyhow!("bookmark database lock poisoned"))
    }

    fn read_db(&self) -> anyhow::Result<std::sync::RwLockReadGuard<'_, Database>> {
        self.db
            .read()
            .map_err(|_| anyhow::anyhow!("bookmark database lock poisoned"))
    }

    /// Apply `f` to the bookmark with `id` and persist, `None` if it does not exist.
    fn modify<F>(&self, id: u64, f: F) -> anyhow::Result<Option<Bookmark>>
    where
        F: FnOnce(&mut Bookmark),
    {
        let mut db = self.write_db()?;
        let Some(bmark) = db.bookmarks.iter_mut().find(|b| b.id == id) else {
            return Ok(None);
        };

        f(bmark);
        let bmark = bmark.clone();

        self.save(&db)?;
        Ok(Some(bmark))
    }
}

impl BookmarkManager for BackendJson {
    fn find_by_id(&self, id: u64) -> anyhow::Result<Option<Bookmark>> {
        let db = self.read_db()?;
        Ok(db.bookmarks.iter().find(|b| b.id == id).cloned())
    }

    fn find_many(&self, owner_id: &str) -> anyhow::Result<Vec<Bookmark>> {
        let db = self.read_db()?;
        Ok(db
            .bookmarks
            .iter()
            .filter(|b| b.owner_id == owner_id)
            .cloned()
            .collect())
    }

    fn create(
        &self,
        bmark_create: BookmarkCreate,
        duplicate: DuplicateAssessment,
    ) -> anyhow::Result<Bookmark> {
        let name = bmark_create.name.trim().to_string();
        let url = bmark_create.url.trim().to_string();
        if name.is_empty() || url.is_empty() {
            bail!("name and url are required");
        }

        let now = Utc::now();
        let mut db = self.write_db()?;

        let id = db.next_id;
        db.next_id += 1;

        let bmark = Bookmark {
            id,
            owner_id: bmark_create.owner_id,
            name,
            url,
            description: bmark_create
                .description
                .map(|d| d.trim().to_string())
                .unwrap_or_default(),
            category: bmark_create.category.unwrap_or_default(),
            color_tag: bmark_create.color_tag.unwrap_or_default(),
            tags: clean_tags(bmark_create.tags.unwrap_or_default()),
            is_favorite: bmark_create.is_favorite.unwrap_or(false),
            analysis: AnalysisResult::pending(now),
            duplicate,
            created_at: now,
            updated_at: now,
        };

        db.bookmarks.push(bmark.clone());
        self.save(&db)?;

        Ok(bmark)
    }

    fn update(&self, id: u64, update: BookmarkUpdate) -> anyhow::Result<Option<Bookmark>> {
        if let Some(name) = &update.name {
            if name.trim().is_empty() {
                bail!("name can't be empty");
            }
        }
        if let Some(url) = &update.url {
            if url.trim().is_empty() {
                bail!("url can't be empty");
            }
        }

        self.modify(id, |bmark| {
            if let Some(name) = update.name {
                bmark.name = name.trim().to_string();
            }
            if let Some(url) = update.url {
                bmark.url = url.trim().to_string();
            }
            if let Some(description) = update.description {
                bmark.description = description.trim().to_string();
            }
            if let Some(category) = update.category {
                bmark.category = category;
            }
            if let Some(color_tag) = update.color_tag {
                bmark.color_tag = color_tag;
            }
            if let Some(tags) = update.tags {
                bmark.tags = clean_tags(tags);
            }
            if let Some(is_favorite) = update.is_favorite {
                bmark.is_favorite = is_favorite;
            }
            bmark.updated_at = Utc::now();
        })
    }

    fn update_analysis(
        &self,
        id: u64,
        update: AnalysisUpdate,
    ) -> anyhow::Result<Option<Bookmark>> {
        self.modify(id, |bmark| bmark.analysis.apply(update))
    }
}
