//! Itinerary document model
//!
//! An Itinerary owns an ordered list of Days. Day ordinals and dates are
//! derived from array position and the trip start date; they are only
//! recomputed on construction, when the start date changes, or when a caller
//! asks for it via [`Itinerary::recompute_dates`].

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::{debug, error, info};

use super::dates;
use super::field::{FieldPath, Slot};

/// Errors from document edits
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("Day index {index} out of range (itinerary has {len} days)")]
    OutOfRange { index: usize, len: usize },

    #[error("Unknown field path: '{0}'")]
    UnknownField(String),
}

/// Morning/afternoon/evening plan text for a Day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSlots {
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
}

impl TimeSlots {
    pub fn new(morning: impl Into<String>, afternoon: impl Into<String>, evening: impl Into<String>) -> Self {
        Self {
            morning: morning.into(),
            afternoon: afternoon.into(),
            evening: evening.into(),
        }
    }

    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Morning => &self.morning,
            Slot::Afternoon => &self.afternoon,
            Slot::Evening => &self.evening,
        }
    }

    fn get_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Morning => &mut self.morning,
            Slot::Afternoon => &mut self.afternoon,
            Slot::Evening => &mut self.evening,
        }
    }
}

/// `null` and missing both mean "three empty slots"
fn null_slots<'de, D>(deserializer: D) -> Result<TimeSlots, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TimeSlots>::deserialize(deserializer)?.unwrap_or_default())
}

/// One day of the trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    /// 1-based ordinal, matches array position after recomputation
    #[serde(default)]
    pub day: u32,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub location: String,

    /// Derived from the trip start date and the ordinal
    #[serde(default, with = "dates::option", skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "null_slots")]
    pub time_slots: TimeSlots,
}

impl Day {
    /// Create a day with empty slots; ordinal and date are filled in by the itinerary
    pub fn new(title: impl Into<String>, description: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            day: 0,
            title: title.into(),
            description: description.into(),
            location: location.into(),
            date: None,
            time_slots: TimeSlots::default(),
        }
    }

    pub fn with_time_slots(mut self, time_slots: TimeSlots) -> Self {
        self.time_slots = time_slots;
        self
    }

    /// Read one field by path
    pub fn field(&self, path: FieldPath) -> &str {
        match path {
            FieldPath::Title => &self.title,
            FieldPath::Description => &self.description,
            FieldPath::Location => &self.location,
            FieldPath::Slot(slot) => self.time_slots.get(slot),
        }
    }

    fn field_mut(&mut self, path: FieldPath) -> &mut String {
        match path {
            FieldPath::Title => &mut self.title,
            FieldPath::Description => &mut self.description,
            FieldPath::Location => &mut self.location,
            FieldPath::Slot(slot) => self.time_slots.get_mut(slot),
        }
    }
}

/// A multi-day trip document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    /// Storage identifier, present once the record has been saved
    pub id: Option<String>,

    /// Owner, when known
    pub user_id: Option<String>,

    pub destination: String,

    /// Trip overview text
    pub description: String,

    pub preferences: Vec<String>,

    pub end_date: NaiveDate,

    start_date: NaiveDate,

    days: Vec<Day>,
}

impl Itinerary {
    /// Create an itinerary and derive ordinals and dates for its days
    pub fn new(destination: impl Into<String>, start_date: NaiveDate, end_date: NaiveDate, days: Vec<Day>) -> Self {
        let destination = destination.into();
        debug!(%destination, %start_date, %end_date, day_count = days.len(), "Itinerary::new: called");
        let mut itinerary = Self {
            id: None,
            user_id: None,
            destination,
            description: String::new(),
            preferences: Vec::new(),
            end_date,
            start_date,
            days,
        };
        itinerary.recompute_dates();
        itinerary
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_preferences(mut self, preferences: Vec<String>) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Ordered days of the trip
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    pub fn day(&self, index: usize) -> Option<&Day> {
        self.days.get(index)
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    /// Fail with `OutOfRange` unless `index` addresses an existing day
    pub fn check_index(&self, index: usize) -> Result<(), EditError> {
        if index < self.days.len() {
            Ok(())
        } else {
            error!(index, len = self.days.len(), "check_index: day index out of range");
            Err(EditError::OutOfRange {
                index,
                len: self.days.len(),
            })
        }
    }

    /// Set one field of the day at `index`
    ///
    /// This is the only way Day content changes. No validation beyond the
    /// index bound; free text is accepted as-is, including empty strings.
    pub fn set_field(&mut self, index: usize, path: FieldPath, value: impl Into<String>) -> Result<(), EditError> {
        debug!(index, %path, "set_field: called");
        self.check_index(index)?;
        *self.days[index].field_mut(path) = value.into();
        Ok(())
    }

    /// Move the trip start and re-derive every day's date
    ///
    /// The end date shifts by the same amount so the trip length is kept.
    pub fn set_start_date(&mut self, start_date: NaiveDate) {
        let shift = start_date.signed_duration_since(self.start_date);
        let end_date = self.end_date.checked_add_signed(shift).unwrap_or(start_date).max(start_date);
        info!(from = %self.start_date, to = %start_date, %end_date, "set_start_date: start date changed");
        self.start_date = start_date;
        self.end_date = end_date;
        self.recompute_dates();
    }

    /// Renumber days 1..=N in array order and derive their dates
    pub fn recompute_dates(&mut self) {
        debug!(day_count = self.days.len(), "recompute_dates: called");
        let start = self.start_date;
        for (offset, day) in self.days.iter_mut().enumerate() {
            day.day = offset as u32 + 1;
            day.date = Some(dates::offset_date(start, offset));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Itinerary {
        Itinerary::new(
            "Lisbon",
            date(2025, 5, 1),
            date(2025, 5, 3),
            vec![
                Day::new("Arrival", "Settle in", "Baixa").with_time_slots(TimeSlots::new("Check in", "Walk", "Fado")),
                Day::new("Belem", "Monuments", "Belem"),
                Day::new("Sintra", "Day trip", "Sintra"),
            ],
        )
    }

    #[test]
    fn test_new_derives_ordinals_and_dates() {
        let it = sample();
        let ordinals: Vec<u32> = it.days().iter().map(|d| d.day).collect();
        assert_eq!(ordinals, vec![1, 2, 3]);
        assert_eq!(it.days()[2].date, Some(date(2025, 5, 3)));
    }

    #[test]
    fn test_set_field_scalar() {
        let mut it = sample();
        it.set_field(1, FieldPath::Title, "Belem & LX Factory").unwrap();
        assert_eq!(it.days()[1].title, "Belem & LX Factory");
        assert_eq!(it.days()[1].description, "Monuments");
    }

    #[test]
    fn test_set_field_slot_leaves_siblings() {
        let mut it = sample();
        it.set_field(0, FieldPath::Slot(Slot::Evening), "Rooftop dinner").unwrap();
        let slots = &it.days()[0].time_slots;
        assert_eq!(slots.morning, "Check in");
        assert_eq!(slots.afternoon, "Walk");
        assert_eq!(slots.evening, "Rooftop dinner");
    }

    #[test]
    fn test_set_field_out_of_range() {
        let mut it = sample();
        let before = it.clone();
        let err = it.set_field(3, FieldPath::Title, "Nope").unwrap_err();
        assert_eq!(err, EditError::OutOfRange { index: 3, len: 3 });
        assert_eq!(it, before);
    }

    #[test]
    fn test_set_field_empty_string_is_a_value() {
        let mut it = sample();
        it.set_field(0, FieldPath::Location, "").unwrap();
        assert_eq!(it.days()[0].location, "");
    }

    #[test]
    fn test_set_start_date_recomputes() {
        let mut it = sample();
        it.set_start_date(date(2025, 6, 30));
        assert_eq!(it.days()[0].date, Some(date(2025, 6, 30)));
        assert_eq!(it.days()[1].date, Some(date(2025, 7, 1)));
    }

    #[test]
    fn test_set_start_date_shifts_end_date() {
        let mut it = sample();
        let length = it.end_date.signed_duration_since(it.start_date);

        it.set_start_date(date(2025, 7, 1));
        assert_eq!(it.start_date, date(2025, 7, 1));
        assert_eq!(it.end_date, date(2025, 7, 3));
        assert_eq!(it.end_date.signed_duration_since(it.start_date), length);
        assert_eq!(it.days()[2].date, Some(it.end_date));

        it.set_start_date(date(2025, 4, 28));
        assert_eq!(it.end_date, date(2025, 4, 30));
        assert!(it.end_date >= it.start_date);
    }

    #[test]
    fn test_recompute_renumbers_loaded_ordinals() {
        let mut days = vec![Day::new("a", "", ""), Day::new("b", "", "")];
        days[0].day = 4;
        days[1].day = 9;
        let it = Itinerary::new("X", date(2025, 1, 1), date(2025, 1, 2), days);
        assert_eq!(it.days()[0].day, 1);
        assert_eq!(it.days()[1].day, 2);
    }

    #[test]
    fn test_day_deserialize_null_slots() {
        let day: Day = serde_json::from_str(r#"{"day":1,"title":"T","timeSlots":null}"#).unwrap();
        assert_eq!(day.time_slots, TimeSlots::default());
        assert_eq!(day.description, "");
    }

    #[test]
    fn test_day_serializes_camel_case() {
        let day = Day::new("T", "D", "L").with_time_slots(TimeSlots::new("m", "a", "e"));
        let json = serde_json::to_value(&day).unwrap();
        assert_eq!(json["timeSlots"]["evening"], "e");
        assert!(json.get("date").is_none());
    }
}
