use std::path::PathBuf;

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};

use crate::eid::Eid;

/// Flat key -> bytes store backing the config file and the bookmark database.
pub trait StorageManager: Send + Sync {
    fn write(&self, ident: &str, data: &[u8]) -> std::io::Result<()>;
    fn read(&self, ident: &str) -> std::io::Result<Vec<u8>>;
    fn exists(&self, ident: &str) -> bool;
}

/// Read and deserialize a JSON document, `None` if it was never written.
pub fn read_json<T: DeserializeOwned>(
    store: &dyn StorageManager,
    ident: &str,
) -> anyhow::Result<Option<T>> {
    if !store.exists(ident) {
        return Ok(None);
    }

    let data = store.read(ident).with_context(|| format!("failed to read {ident}"))?;
    let value = serde_json::from_slice(&data).with_context(|| format!("{ident} is malformed"))?;
    Ok(Some(value))
}

pub fn write_json<T: Serialize>(
    store: &dyn StorageManager,
    ident: &str,
    value: &T,
) -> anyhow::Result<()> {
    let data = serde_json::to_vec_pretty(value)?;
    store
        .write(ident, &data)
        .with_context(|| format!("failed to write {ident}"))
}

#[derive(Clone, Debug)]
pub struct BackendLocal {
    pub base_dir: PathBuf,
}

impl BackendLocal {
    pub fn new(storage_dir: &str) -> std::io::Result<Self> {
        let path = PathBuf::from(storage_dir);
        std::fs::create_dir_all(&path)?;
        Ok(BackendLocal { base_dir: path })
    }

    fn path(&self, ident: &str) -> PathBuf {
        self.base_dir.join(ident)
    }
}

impl StorageManager for BackendLocal {
    fn exists(&self, ident: &str) -> bool {
        self.path(ident).is_file()
    }

    fn read(&self, ident: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path(ident))
    }

    /// Writes go to a temp file first and are renamed into place,
    /// so readers never observe a half-written file.
    fn write(&self, ident: &str, data: &[u8]) -> std::io::Result<()> {
        let temp_path = self.path(&format!("{}-{ident}", Eid::new()));

        std::fs::write(&temp_path, data)?;

        std::fs::rename(&temp_path, self.path(ident))
    }
}
