//! Trip date helpers
//!
//! The storage service hands back dates either as plain `YYYY-MM-DD` strings
//! or as full timestamps (`2025-03-14T00:00:00.000Z`). Both are accepted on
//! the way in; dates always go out as `YYYY-MM-DD`.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Deserializer, Serializer};
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date, taking only the calendar part of a timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    debug!(%raw, "parse_date: called");
    let trimmed = raw.trim();
    let calendar = trimmed.get(..10).unwrap_or(trimmed);
    NaiveDate::parse_from_str(calendar, DATE_FORMAT).ok()
}

/// Date of the day at `offset` days after `start`
///
/// Saturates at `start` if the offset would overflow the calendar.
pub fn offset_date(start: NaiveDate, offset: usize) -> NaiveDate {
    start.checked_add_days(Days::new(offset as u64)).unwrap_or(start)
}

pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid date: '{}'", raw)))
}

/// Same as the parent module, for `Option<NaiveDate>` fields
pub mod option {
    use super::*;

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => super::serialize(d, serializer),
            None => serializer.serialize_none(),
        }
    }

    /// Unparseable dates are dropped rather than rejected; they are derived
    /// data and get recomputed from the trip start date anyway.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_date() {
        assert_eq!(parse_date("2025-03-14"), NaiveDate::from_ymd_opt(2025, 3, 14));
    }

    #[test]
    fn test_parse_timestamp_keeps_calendar_part() {
        assert_eq!(
            parse_date("2025-03-14T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 3, 14)
        );
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_date("next tuesday"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_offset_date_crosses_month() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 30).unwrap();
        assert_eq!(offset_date(start, 3), NaiveDate::from_ymd_opt(2025, 2, 2).unwrap());
    }
}
