//! Directory-backed itinerary store
//!
//! One pretty-printed JSON file per record, named `{id}.json`. Ids are
//! UUIDv7, so listings sorted by file name come out roughly oldest first.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{ItineraryRecord, ItineraryStore, StoreError};

/// Itinerary store over a local directory
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Base path for storage
    base_path: PathBuf,
}

impl FileStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_path = path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        debug!(?base_path, "Opened itinerary file store");
        Ok(Self { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Path of the record file for `id`; ids that could escape the directory are unknown
    fn record_path(&self, id: &str) -> Result<PathBuf, StoreError> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            debug!(%id, "record_path: rejecting id");
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(self.base_path.join(format!("{}.json", id)))
    }

    async fn write(&self, path: &Path, record: &ItineraryRecord) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(record)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    async fn read(&self, id: &str, path: &Path) -> Result<ItineraryRecord, StoreError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(StoreError::NotFound(id.to_string())),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
}

#[async_trait]
impl ItineraryStore for FileStore {
    async fn create(&self, record: &ItineraryRecord) -> Result<ItineraryRecord, StoreError> {
        let id = Uuid::now_v7().to_string();
        debug!(%id, "FileStore::create: called");
        let mut stored = record.clone();
        stored.id = Some(id.clone());
        self.write(&self.record_path(&id)?, &stored).await?;
        info!(%id, destination = %stored.destination, "Created itinerary");
        Ok(stored)
    }

    async fn update(&self, id: &str, record: &ItineraryRecord) -> Result<ItineraryRecord, StoreError> {
        debug!(%id, "FileStore::update: called");
        let path = self.record_path(id)?;
        if !tokio::fs::try_exists(&path).await? {
            return Err(StoreError::NotFound(id.to_string()));
        }
        let mut stored = record.clone();
        stored.id = Some(id.to_string());
        self.write(&path, &stored).await?;
        info!(%id, "Updated itinerary");
        Ok(stored)
    }

    async fn fetch(&self, id: &str) -> Result<ItineraryRecord, StoreError> {
        debug!(%id, "FileStore::fetch: called");
        let path = self.record_path(id)?;
        self.read(id, &path).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!(%id, "FileStore::delete: called");
        let path = self.record_path(id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                info!(%id, "Deleted itinerary");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(StoreError::NotFound(id.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ItineraryRecord>, StoreError> {
        debug!(%user_id, "FileStore::list_for_user: called");
        let mut paths = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.base_path).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut records = Vec::new();
        for path in paths {
            let content = tokio::fs::read_to_string(&path).await?;
            match serde_json::from_str::<ItineraryRecord>(&content) {
                Ok(record) if record.user_id.as_deref() == Some(user_id) => records.push(record),
                Ok(_) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable itinerary file"),
            }
        }
        debug!(count = records.len(), "FileStore::list_for_user: done");
        Ok(records)
    }
}
