//! Generation service request/response types
//!
//! Wire shapes use the service's camelCase keys.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::GenerationError;
use crate::domain::{Day, Itinerary, dates};

/// Ask the service for changes to one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditProposalRequest {
    pub destination: String,

    #[serde(with = "dates")]
    pub start_date: NaiveDate,

    #[serde(with = "dates")]
    pub end_date: NaiveDate,

    pub preferences: Vec<String>,

    /// Rendered edit prompt (day context, request, output format)
    pub prompt_text: String,

    pub is_draft: bool,
}

/// Ask the service for a brand new itinerary draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub destination: String,

    #[serde(with = "dates")]
    pub start_date: NaiveDate,

    #[serde(with = "dates")]
    pub end_date: NaiveDate,

    pub preferences: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    pub is_draft: bool,
}

impl GenerateRequest {
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            destination: destination.into(),
            start_date,
            end_date,
            preferences: Vec::new(),
            user_id: None,
            is_draft: true,
        }
    }
}

/// Metadata echoed back with a generated draft
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DraftMetadata {
    #[serde(rename = "_id")]
    pub id: Option<String>,

    pub user_id: Option<String>,

    pub destination: Option<String>,

    #[serde(with = "dates::option")]
    pub start_date: Option<NaiveDate>,

    #[serde(with = "dates::option")]
    pub end_date: Option<NaiveDate>,

    pub description: Option<String>,

    pub preferences: Option<Vec<String>>,
}

/// A freshly generated itinerary draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedDraft {
    pub draft: Vec<Day>,

    #[serde(default)]
    pub metadata: DraftMetadata,
}

impl GeneratedDraft {
    /// Build the editable document, preferring echoed metadata over the request
    pub fn into_itinerary(self, request: &GenerateRequest) -> Itinerary {
        debug!(day_count = self.draft.len(), "GeneratedDraft::into_itinerary: called");
        let meta = self.metadata;
        let mut itinerary = Itinerary::new(
            meta.destination.unwrap_or_else(|| request.destination.clone()),
            meta.start_date.unwrap_or(request.start_date),
            meta.end_date.unwrap_or(request.end_date),
            self.draft,
        )
        .with_preferences(meta.preferences.unwrap_or_else(|| request.preferences.clone()))
        .with_description(meta.description.unwrap_or_default());

        itinerary.id = meta.id;
        itinerary.user_id = meta.user_id.or_else(|| request.user_id.clone());
        itinerary
    }
}

/// First draft entry of an edit proposal response
#[derive(Debug, Clone, PartialEq)]
pub struct ProposalReply {
    /// Explanation text from the service
    pub message: String,

    /// The whole `{message, changes}` entry, shape unchecked beyond `message`
    pub entry: Value,
}

impl ProposalReply {
    /// Pull the first entry out of a `{draft: [{message, changes}]}` response
    ///
    /// Anything without a non-empty `draft` array whose first element carries
    /// a string `message` is an invalid response. The `changes` key is left
    /// for the patch extractor to judge.
    pub fn from_response(response: &Value) -> Result<Self, GenerationError> {
        debug!("ProposalReply::from_response: called");
        let first = response
            .get("draft")
            .and_then(Value::as_array)
            .and_then(|entries| entries.first())
            .ok_or_else(|| {
                warn!("ProposalReply::from_response: no draft entries");
                GenerationError::InvalidResponse("response has no draft entries".to_string())
            })?;

        let message = first.get("message").and_then(Value::as_str).ok_or_else(|| {
            warn!("ProposalReply::from_response: draft entry has no message");
            GenerationError::InvalidResponse("draft entry has no message".to_string())
        })?;

        Ok(Self {
            message: message.to_string(),
            entry: first.clone(),
        })
    }
}
