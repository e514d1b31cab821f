//! REST client for the itinerary storage service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use tracing::{debug, info};

use super::{ItineraryRecord, ItineraryStore, StoreError};
use crate::config::StoreConfig;

/// Itinerary store over the service's `/itineraries` resource
pub struct HttpStore {
    base_url: Url,
    token: Option<String>,
    http: Client,
}

impl HttpStore {
    /// Create a new store client from configuration
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        debug!(base_url = %config.base_url, "HttpStore::from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(config.base_url.clone()));
        }

        Ok(Self {
            base_url,
            token: config.token(),
            http,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment
    fn resource_url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("itineraries").extend(segments);
        }
        url
    }

    /// Ids that would not address a single child resource are unknown
    fn check_id(id: &str) -> Result<(), StoreError> {
        if id.is_empty() || id == "." || id == ".." {
            debug!(%id, "check_id: rejecting id");
            return Err(StoreError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn collection_url(&self) -> Url {
        self.resource_url(&[])
    }

    fn item_url(&self, id: &str) -> Result<Url, StoreError> {
        Self::check_id(id)?;
        Ok(self.resource_url(&[id]))
    }

    fn user_url(&self, user_id: &str) -> Result<Url, StoreError> {
        Self::check_id(user_id)?;
        Ok(self.resource_url(&["user", user_id]))
    }

    /// Attach auth, send, and turn non-success statuses into errors
    async fn send(&self, builder: RequestBuilder, id: &str) -> Result<Response, StoreError> {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };

        let response = builder.send().await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!(%id, "send: not found");
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            debug!(%status, "send: API error");
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn record_from(response: Response) -> Result<ItineraryRecord, StoreError> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ItineraryStore for HttpStore {
    async fn create(&self, record: &ItineraryRecord) -> Result<ItineraryRecord, StoreError> {
        debug!(destination = %record.destination, "HttpStore::create: called");
        let response = self.send(self.http.post(self.collection_url()).json(record), "").await?;
        let created = Self::record_from(response).await?;
        if created.id.is_none() {
            return Err(StoreError::InvalidResponse("created record has no _id".to_string()));
        }
        info!(id = ?created.id, "Created itinerary");
        Ok(created)
    }

    async fn update(&self, id: &str, record: &ItineraryRecord) -> Result<ItineraryRecord, StoreError> {
        debug!(%id, "HttpStore::update: called");
        let response = self.send(self.http.put(self.item_url(id)?).json(record), id).await?;
        let mut updated = Self::record_from(response).await?;
        updated.id.get_or_insert_with(|| id.to_string());
        info!(%id, "Updated itinerary");
        Ok(updated)
    }

    async fn fetch(&self, id: &str) -> Result<ItineraryRecord, StoreError> {
        debug!(%id, "HttpStore::fetch: called");
        let response = self.send(self.http.get(self.item_url(id)?), id).await?;
        Self::record_from(response).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        debug!(%id, "HttpStore::delete: called");
        self.send(self.http.delete(self.item_url(id)?), id).await?;
        info!(%id, "Deleted itinerary");
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ItineraryRecord>, StoreError> {
        debug!(%user_id, "HttpStore::list_for_user: called");
        let response = self.send(self.http.get(self.user_url(user_id)?), user_id).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let config = StoreConfig {
            base_url: "https://api.example.com/".to_string(),
            ..Default::default()
        };
        let store = HttpStore::from_config(&config).unwrap();
        assert_eq!(store.collection_url().as_str(), "https://api.example.com/itineraries");
        assert_eq!(store.item_url("abc").unwrap().as_str(), "https://api.example.com/itineraries/abc");
        assert_eq!(store.user_url("u1").unwrap().as_str(), "https://api.example.com/itineraries/user/u1");
    }

    #[test]
    fn test_urls_keep_base_path() {
        let config = StoreConfig {
            base_url: "https://api.example.com/v1".to_string(),
            ..Default::default()
        };
        let store = HttpStore::from_config(&config).unwrap();
        assert_eq!(store.item_url("abc").unwrap().as_str(), "https://api.example.com/v1/itineraries/abc");
    }

    #[test]
    fn test_ids_stay_in_one_path_segment() {
        let store = HttpStore::from_config(&StoreConfig::default()).unwrap();

        let url = store.item_url("a/b?c#d").unwrap();
        assert_eq!(url.path(), "/itineraries/a%2Fb%3Fc%23d");
        assert!(url.query().is_none());
        assert!(url.fragment().is_none());

        let url = store.user_url("../admin").unwrap();
        assert_eq!(url.path(), "/itineraries/user/..%2Fadmin");

        for id in ["", ".", ".."] {
            assert!(store.item_url(id).unwrap_err().is_not_found(), "id {:?}", id);
            assert!(store.user_url(id).unwrap_err().is_not_found(), "id {:?}", id);
        }
    }

    #[test]
    fn test_invalid_base_url() {
        let config = StoreConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(HttpStore::from_config(&config), Err(StoreError::InvalidUrl(_))));
    }
}
