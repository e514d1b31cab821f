//! Sparse proposed change to one Day
//!
//! Every field is optional. An absent field means "do not touch"; a present
//! empty string means "set to empty". A patch never carries an empty
//! `timeSlots` object: the sub-record exists only while at least one slot is
//! set.

use serde::{Deserialize, Serialize};

use super::field::{FieldPath, Slot};

/// Slot changes inside a patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlotsPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub morning: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub afternoon: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evening: Option<String>,
}

impl TimeSlotsPatch {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Morning => self.morning.as_deref(),
            Slot::Afternoon => self.afternoon.as_deref(),
            Slot::Evening => self.evening.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut Option<String> {
        match slot {
            Slot::Morning => &mut self.morning,
            Slot::Afternoon => &mut self.afternoon,
            Slot::Evening => &mut self.evening,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.morning.is_none() && self.afternoon.is_none() && self.evening.is_none()
    }
}

/// Wire form, normalised through [`PendingPatch::set`] on the way in
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PatchWire {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    time_slots: Option<TimeSlotsPatch>,
}

impl From<PatchWire> for PendingPatch {
    fn from(wire: PatchWire) -> Self {
        let mut patch = PendingPatch::new();
        let scalars = [
            (FieldPath::Title, wire.title),
            (FieldPath::Description, wire.description),
            (FieldPath::Location, wire.location),
        ];
        for (path, value) in scalars {
            if let Some(value) = value {
                patch.set(path, value);
            }
        }
        if let Some(slots) = wire.time_slots {
            for slot in Slot::ALL {
                if let Some(value) = slots.get(slot) {
                    patch.set(FieldPath::Slot(slot), value);
                }
            }
        }
        patch
    }
}

/// A sparse, unapplied change to exactly one Day
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PatchWire")]
pub struct PendingPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    time_slots: Option<TimeSlotsPatch>,
}

impl PendingPatch {
    /// An empty patch (touches nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`PendingPatch::set`]
    pub fn with(mut self, path: FieldPath, value: impl Into<String>) -> Self {
        self.set(path, value);
        self
    }

    /// Mark `path` as changed to `value`
    pub fn set(&mut self, path: FieldPath, value: impl Into<String>) {
        let value = Some(value.into());
        match path {
            FieldPath::Title => self.title = value,
            FieldPath::Description => self.description = value,
            FieldPath::Location => self.location = value,
            FieldPath::Slot(slot) => *self.time_slots.get_or_insert_with(TimeSlotsPatch::default).slot_mut(slot) = value,
        }
    }

    /// Proposed value for `path`, if the patch touches it
    pub fn get(&self, path: FieldPath) -> Option<&str> {
        match path {
            FieldPath::Title => self.title.as_deref(),
            FieldPath::Description => self.description.as_deref(),
            FieldPath::Location => self.location.as_deref(),
            FieldPath::Slot(slot) => self.time_slots.as_ref().and_then(|s| s.get(slot)),
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Slot changes; `None` when no slot is touched
    pub fn time_slots(&self) -> Option<&TimeSlotsPatch> {
        self.time_slots.as_ref()
    }

    /// Present fields in display order
    pub fn fields(&self) -> Vec<(FieldPath, &str)> {
        FieldPath::ALL
            .iter()
            .filter_map(|&path| self.get(path).map(|value| (path, value)))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields().len()
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.location.is_none() && self.time_slots.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_patch_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(PendingPatch::new()).unwrap(), json!({}));
    }

    #[test]
    fn test_absent_and_empty_are_distinct() {
        let patch = PendingPatch::new().with(FieldPath::Description, "");
        assert_eq!(patch.get(FieldPath::Description), Some(""));
        assert_eq!(patch.get(FieldPath::Title), None);
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"description": ""}));
    }

    #[test]
    fn test_slot_serializes_nested() {
        let patch = PendingPatch::new().with(FieldPath::Slot(Slot::Morning), "Leisurely breakfast");
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({"timeSlots": {"morning": "Leisurely breakfast"}})
        );
    }

    #[test]
    fn test_deserialize_drops_empty_time_slots() {
        let patch: PendingPatch = serde_json::from_value(json!({"title": "X", "timeSlots": {}})).unwrap();
        assert!(patch.time_slots().is_none());
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"title": "X"}));
    }

    #[test]
    fn test_fields_in_display_order() {
        let patch = PendingPatch::new()
            .with(FieldPath::Slot(Slot::Evening), "e")
            .with(FieldPath::Title, "t");
        let paths: Vec<FieldPath> = patch.fields().into_iter().map(|(p, _)| p).collect();
        assert_eq!(paths, vec![FieldPath::Title, FieldPath::Slot(Slot::Evening)]);
        assert_eq!(patch.len(), 2);
    }
}
