//! HTTP client for the generation service
//!
//! Both the initial draft and per-day edit proposals go to
//! `POST {base-url}/itineraries/generate`. Transient failures are retried
//! here with exponential backoff; callers above this layer never retry.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use super::{EditProposalRequest, GenerateRequest, GeneratedDraft, GenerationClient, GenerationError};
use crate::config::GenerationConfig;

/// Initial backoff delay for retries
const INITIAL_BACKOFF_MS: u64 = 500;

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
}

/// Generation service client over HTTP
pub struct HttpGenerationClient {
    base_url: String,
    token: Option<String>,
    http: Client,
    max_retries: u32,
}

impl HttpGenerationClient {
    /// Create a new client from configuration
    pub fn from_config(config: &GenerationConfig) -> Result<Self, GenerationError> {
        debug!(?config, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(GenerationError::Network)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token(),
            http,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/itineraries/generate", self.base_url)
    }

    /// POST a JSON body, retrying transient failures
    async fn post_json<B: Serialize + Sync>(&self, body: &B) -> Result<Value, GenerationError> {
        let url = self.endpoint();
        debug!(%url, "post_json: called");

        let mut last_error = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = INITIAL_BACKOFF_MS * 2u64.pow(attempt - 1);
                warn!(attempt, backoff_ms = backoff, "post_json: retrying after transient error");
                tokio::time::sleep(Duration::from_millis(backoff)).await;
            }

            let mut builder = self.http.post(&url).json(body);
            if let Some(token) = &self.token {
                builder = builder.bearer_auth(token);
            }

            let response = match builder.send().await {
                Ok(r) => r,
                Err(e) => {
                    debug!(attempt, error = %e, "post_json: network error");
                    last_error = Some(GenerationError::Network(e));
                    continue;
                }
            };

            let status = response.status().as_u16();

            if is_retryable_status(status) && attempt < self.max_retries {
                let text = response.text().await.unwrap_or_default();
                debug!(attempt, status, "post_json: retryable error");
                last_error = Some(GenerationError::Api { status, message: text });
                continue;
            }

            if !response.status().is_success() {
                debug!(%status, "post_json: API error");
                let text = response.text().await.unwrap_or_default();
                return Err(GenerationError::Api { status, message: text });
            }

            debug!("post_json: success");
            return Ok(response.json().await?);
        }

        Err(last_error.unwrap_or_else(|| GenerationError::InvalidResponse("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn propose(&self, request: EditProposalRequest) -> Result<Value, GenerationError> {
        debug!(destination = %request.destination, "propose: called");
        self.post_json(&request).await
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedDraft, GenerationError> {
        debug!(destination = %request.destination, "generate: called");
        let value = self.post_json(&request).await?;
        if value.get("draft").and_then(Value::as_array).is_none() {
            return Err(GenerationError::InvalidResponse("No draft data received".to_string()));
        }
        Ok(serde_json::from_value(value)?)
    }
}
