//! Itinerary persistence
//!
//! The engine itself never persists anything; saving is an explicit user
//! action that hands the current document to one of these backends.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

mod error;
mod file;
mod http;
mod record;

pub use error::StoreError;
pub use file::FileStore;
pub use http::HttpStore;
pub use record::ItineraryRecord;

use crate::config::{StoreBackend, StoreConfig};
use crate::domain::Itinerary;

/// Create/read/update/delete over stored itineraries
#[async_trait]
pub trait ItineraryStore: Send + Sync {
    /// Store a new record; the returned copy carries the assigned `_id`
    async fn create(&self, record: &ItineraryRecord) -> Result<ItineraryRecord, StoreError>;

    /// Replace the record stored under `id`
    async fn update(&self, id: &str, record: &ItineraryRecord) -> Result<ItineraryRecord, StoreError>;

    async fn fetch(&self, id: &str) -> Result<ItineraryRecord, StoreError>;

    async fn delete(&self, id: &str) -> Result<(), StoreError>;

    /// Every record owned by `user_id`
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ItineraryRecord>, StoreError>;
}

/// Create the store backend described by `config`
pub fn create_store(config: &StoreConfig) -> Result<Arc<dyn ItineraryStore>, StoreError> {
    debug!(backend = ?config.backend, "create_store: called");
    match config.backend {
        StoreBackend::Http => Ok(Arc::new(HttpStore::from_config(config)?)),
        StoreBackend::File => Ok(Arc::new(FileStore::open(&config.dir)?)),
    }
}

/// Create the record when it has no id yet, update it otherwise
///
/// The id the store assigned is written back into `itinerary`.
pub async fn save_itinerary(store: &dyn ItineraryStore, itinerary: &mut Itinerary) -> Result<String, StoreError> {
    debug!(id = ?itinerary.id, "save_itinerary: called");
    let record = ItineraryRecord::from_itinerary(itinerary)?;
    let saved = match itinerary.id.clone() {
        Some(id) => store.update(&id, &record).await?,
        None => store.create(&record).await?,
    };
    let id = saved
        .id
        .ok_or_else(|| StoreError::InvalidResponse("saved record has no _id".to_string()))?;
    itinerary.id = Some(id.clone());
    Ok(id)
}
