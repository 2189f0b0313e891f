//! Favorite cities persisted as one JSON array under a fixed key.

use std::{collections::HashMap, io::ErrorKind, path::PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::StorageError;

/// Storage key of the favorites list.
pub const FAVORITES_KEY: &str = "FAVORITE_CITIES";

/// Minimal string key-value persistence.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// `None` when nothing was ever stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }
}

/// In-process store; contents are lost when dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Ordered, duplicate-free list of favorite city names.
///
/// Every operation re-reads the stored list. Mutations are queued behind a
/// single writer lock so concurrent `add`/`remove` calls cannot overwrite
/// each other's result.
#[derive(Debug)]
pub struct FavoritesStore<S> {
    store: S,
    writer: Mutex<()>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    pub fn new(store: S) -> Self {
        Self { store, writer: Mutex::new(()) }
    }

    /// Stored list in insertion order; empty if nothing was stored yet.
    pub async fn list_favorites(&self) -> Result<Vec<String>, StorageError> {
        let Some(raw) = self.store.get(FAVORITES_KEY).await? else {
            return Ok(Vec::new());
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw)
            .map_err(|source| StorageError::Corrupt { key: FAVORITES_KEY.to_string(), source })
    }

    /// Append `city` unless already present.
    pub async fn add_favorite(&self, city: &str) -> Result<(), StorageError> {
        let _guard = self.writer.lock().await;

        let mut cities = self.list_favorites().await?;
        if cities.iter().any(|c| c == city) {
            debug!(city, "already a favorite");
            return Ok(());
        }

        cities.push(city.to_string());
        self.write(&cities).await?;
        info!(city, "added favorite");
        Ok(())
    }

    /// Drop every occurrence of `city`. The list is written back either way.
    pub async fn remove_favorite(&self, city: &str) -> Result<(), StorageError> {
        let _guard = self.writer.lock().await;

        let mut cities = self.list_favorites().await?;
        let before = cities.len();
        cities.retain(|c| c != city);

        self.write(&cities).await?;
        if cities.len() != before {
            info!(city, "removed favorite");
        }
        Ok(())
    }

    pub async fn is_favorite(&self, city: &str) -> Result<bool, StorageError> {
        Ok(self.list_favorites().await?.iter().any(|c| c == city))
    }

    async fn write(&self, cities: &[String]) -> Result<(), StorageError> {
        let json = serde_json::to_string(cities)
            .map_err(|source| StorageError::Encode { key: FAVORITES_KEY.to_string(), source })?;
        self.store.set(FAVORITES_KEY, &json).await
    }
}
