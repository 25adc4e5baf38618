use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::fs;

use crate::{
    error::Result,
    store::{KeyValueStore, StorageMap},
};

/// Key-value store kept as one JSON object on disk.
///
/// Every `set` rewrites the whole file after re-reading it; there is no file
/// lock, so concurrent writers behave like the browser's storage area.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<StorageMap> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StorageMap::new()),
            Err(e) => return Err(e.into()),
        };

        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(StorageMap::new());
        }

        Ok(serde_json::from_slice(&raw)?)
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: Option<&str>) -> Result<StorageMap> {
        let mut entries = self.read_all().await?;

        Ok(match key {
            None => entries,
            Some(key) => entries.remove_entry(key).into_iter().collect(),
        })
    }

    async fn set(&self, items: StorageMap) -> Result<()> {
        let mut entries = self.read_all().await?;
        entries.extend(items);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec_pretty(&entries)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }
}
