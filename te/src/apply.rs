//! Patch application
//!
//! Merges a confirmed patch into one Day, field by field, through
//! [`Itinerary::set_field`]. Fields the patch does not carry are left alone,
//! including sibling time slots. Each present field is a plain assignment, so
//! applying the same patch twice leaves the Day as one application would.
//! Tracking which patches were already applied is the caller's job.

use tracing::debug;

use crate::domain::{EditError, Itinerary, PendingPatch};

/// Apply every present field of `patch` to the day at `index`
///
/// The index is checked before anything is written, so an out-of-range call
/// leaves the document untouched.
pub fn apply_patch(itinerary: &mut Itinerary, index: usize, patch: &PendingPatch) -> Result<(), EditError> {
    debug!(index, field_count = patch.len(), "apply_patch: called");
    itinerary.check_index(index)?;

    for (path, value) in patch.fields() {
        debug!(index, %path, "apply_patch: setting field");
        itinerary.set_field(index, path, value)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Day, FieldPath, Slot, TimeSlots};
    use chrono::NaiveDate;

    fn itinerary() -> Itinerary {
        let start = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
        Itinerary::new(
            "Cape Town",
            start,
            end,
            vec![
                Day::new("Table Mountain", "Hike up", "Gardens")
                    .with_time_slots(TimeSlots::new("Cable car", "Picnic", "Waterfront")),
                Day::new("Peninsula", "Drive", "Cape Point"),
            ],
        )
    }

    #[test]
    fn test_evening_only_leaves_other_slots() {
        let mut it = itinerary();
        let patch = PendingPatch::new().with(FieldPath::Slot(Slot::Evening), "Rooftop dinner");

        apply_patch(&mut it, 0, &patch).unwrap();

        let day = &it.days()[0];
        assert_eq!(day.time_slots.morning, "Cable car");
        assert_eq!(day.time_slots.afternoon, "Picnic");
        assert_eq!(day.time_slots.evening, "Rooftop dinner");
        assert_eq!(day.title, "Table Mountain");
    }

    #[test]
    fn test_other_days_untouched() {
        let mut it = itinerary();
        let before = it.days()[1].clone();
        let patch = PendingPatch::new().with(FieldPath::Title, "Lion's Head");

        apply_patch(&mut it, 0, &patch).unwrap();

        assert_eq!(it.days()[1], before);
        assert_eq!(it.days()[0].title, "Lion's Head");
    }

    #[test]
    fn test_reapply_is_last_write() {
        let mut once = itinerary();
        let mut twice = itinerary();
        let patch = PendingPatch::new()
            .with(FieldPath::Description, "Slow day")
            .with(FieldPath::Slot(Slot::Morning), "Sleep in");

        apply_patch(&mut once, 0, &patch).unwrap();
        apply_patch(&mut twice, 0, &patch).unwrap();
        apply_patch(&mut twice, 0, &patch).unwrap();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_out_of_range_writes_nothing() {
        let mut it = itinerary();
        let before = it.clone();
        let patch = PendingPatch::new().with(FieldPath::Title, "Nowhere");

        let err = apply_patch(&mut it, 5, &patch).unwrap_err();

        assert_eq!(err, EditError::OutOfRange { index: 5, len: 2 });
        assert_eq!(it, before);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut it = itinerary();
        let before = it.clone();
        apply_patch(&mut it, 1, &PendingPatch::new()).unwrap();
        assert_eq!(it, before);
    }
}
