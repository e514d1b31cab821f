//! Persisted itinerary shape
//!
//! The stored record carries the days twice: as the `activities` array and
//! as `itineraryText`, the same array serialized to a JSON string. The text
//! copy is rewritten on every save and preferred on load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::{Day, Itinerary, dates};

/// An itinerary as the storage service sees it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItineraryRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default)]
    pub destination: String,

    #[serde(with = "dates")]
    pub start_date: NaiveDate,

    #[serde(with = "dates")]
    pub end_date: NaiveDate,

    #[serde(default)]
    pub preferences: Vec<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub activities: Vec<Day>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary_text: Option<String>,
}

impl ItineraryRecord {
    /// Snapshot an itinerary for saving, refreshing `itineraryText`
    pub fn from_itinerary(itinerary: &Itinerary) -> Result<Self, serde_json::Error> {
        debug!(id = ?itinerary.id, day_count = itinerary.day_count(), "ItineraryRecord::from_itinerary: called");
        let activities = itinerary.days().to_vec();
        let itinerary_text = serde_json::to_string(&activities)?;
        Ok(Self {
            id: itinerary.id.clone(),
            user_id: itinerary.user_id.clone(),
            destination: itinerary.destination.clone(),
            start_date: itinerary.start_date(),
            end_date: itinerary.end_date,
            preferences: itinerary.preferences.clone(),
            description: itinerary.description.clone(),
            activities,
            itinerary_text: Some(itinerary_text),
        })
    }

    /// Rebuild the editable document
    ///
    /// Days come from `itineraryText` when it parses, otherwise from
    /// `activities`. Ordinals and dates are re-derived either way.
    pub fn into_itinerary(self) -> Itinerary {
        debug!(id = ?self.id, "ItineraryRecord::into_itinerary: called");
        let days = match self.itinerary_text.as_deref().filter(|t| !t.trim().is_empty()) {
            Some(text) => match serde_json::from_str::<Vec<Day>>(text) {
                Ok(days) => days,
                Err(e) => {
                    warn!(id = ?self.id, error = %e, "Failed to parse itineraryText, using activities instead");
                    self.activities
                }
            },
            None => self.activities,
        };

        let mut itinerary = Itinerary::new(self.destination, self.start_date, self.end_date, days)
            .with_description(self.description)
            .with_preferences(self.preferences);
        itinerary.id = self.id;
        itinerary.user_id = self.user_id;
        itinerary
    }
}
