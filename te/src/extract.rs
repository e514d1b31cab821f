//! Patch extraction
//!
//! Turns the generation service's free-form `{message, changes}` entry into
//! a [`PendingPatch`] scoped to what the user asked for. A field survives
//! only when it is both intended (see [`crate::intent`]) and proposed. When
//! that filter leaves nothing but the proposal did contain changes, the
//! proposal passes through unfiltered: a keyword miss must not throw away a
//! legitimate edit.

use std::fmt;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::{FieldPath, PendingPatch, Slot};
use crate::intent::IntentSet;

/// How the extracted patch came about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchSource {
    /// Intent filter kept at least one proposed field
    Filtered,
    /// Intent filter kept nothing; the full proposal was passed through
    Fallback,
    /// The proposal contained no usable fields
    NoChanges,
    /// The entry did not have the expected shape
    Malformed(String),
}

impl fmt::Display for PatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filtered => write!(f, "filtered"),
            Self::Fallback => write!(f, "fallback"),
            Self::NoChanges => write!(f, "no-changes"),
            Self::Malformed(reason) => write!(f, "malformed: {}", reason),
        }
    }
}

/// Result of extracting a patch from one draft entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub patch: PendingPatch,
    pub source: PatchSource,
}

impl Extraction {
    fn empty(source: PatchSource) -> Self {
        Self {
            patch: PendingPatch::new(),
            source,
        }
    }

    pub fn into_patch(self) -> PendingPatch {
        self.patch
    }
}

/// Extract an intent-scoped patch from a `{message, changes}` entry
///
/// Malformed input degrades to an empty patch; it is never an error.
pub fn extract(entry: &Value, intent: &IntentSet) -> Extraction {
    debug!(%intent, "extract: called");
    let Some(object) = entry.as_object() else {
        warn!("extract: proposal entry is not an object");
        return Extraction::empty(PatchSource::Malformed("proposal is not an object".to_string()));
    };

    let changes = match object.get("changes") {
        Some(Value::Object(changes)) => changes,
        Some(_) => {
            warn!("extract: 'changes' is not an object");
            return Extraction::empty(PatchSource::Malformed("'changes' is not an object".to_string()));
        }
        None => {
            warn!("extract: 'changes' key missing");
            return Extraction::empty(PatchSource::Malformed("'changes' key missing".to_string()));
        }
    };

    let proposed = proposal_patch(changes);
    let filtered = filter_patch(&proposed, intent);

    if !filtered.is_empty() {
        debug!(kept = filtered.len(), proposed = proposed.len(), "extract: intent filter kept fields");
        Extraction {
            patch: filtered,
            source: PatchSource::Filtered,
        }
    } else if !proposed.is_empty() {
        debug!(proposed = proposed.len(), "extract: no intended field proposed, passing proposal through");
        Extraction {
            patch: proposed,
            source: PatchSource::Fallback,
        }
    } else {
        debug!("extract: proposal has no usable fields");
        Extraction::empty(PatchSource::NoChanges)
    }
}

/// Every defined field of a raw `changes` object, as a patch
///
/// "Defined" means present with a string value; an empty string counts.
/// A `timeSlots` object without any defined slot yields no slot changes.
pub fn proposal_patch(changes: &Map<String, Value>) -> PendingPatch {
    let mut patch = PendingPatch::new();

    for path in [FieldPath::Title, FieldPath::Description, FieldPath::Location] {
        if let Some(value) = defined_string(changes, path.as_str()) {
            patch.set(path, value);
        }
    }

    match changes.get("timeSlots") {
        Some(Value::Object(slots)) => {
            for slot in Slot::ALL {
                if let Some(value) = defined_string(slots, slot.key()) {
                    patch.set(FieldPath::Slot(slot), value);
                }
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => {
            warn!(kind = json_kind(other), "proposal_patch: ignoring non-object timeSlots");
        }
    }

    patch
}

/// The fields of `proposed` the user actually asked for
pub fn filter_patch(proposed: &PendingPatch, intent: &IntentSet) -> PendingPatch {
    let mut patch = PendingPatch::new();
    for (path, value) in proposed.fields() {
        if intent.wants(path) {
            patch.set(path, value);
        } else {
            debug!(%path, "filter_patch: dropping unrequested field");
        }
    }
    patch
}

fn defined_string<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    match object.get(key) {
        Some(Value::String(s)) => Some(s.as_str()),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!(%key, kind = json_kind(other), "defined_string: ignoring non-string value");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{IntentClassifier, IntentTag};
    use serde_json::json;

    fn intent(request: &str) -> IntentSet {
        IntentClassifier::default().classify(request)
    }

    fn entry(changes: Value) -> Value {
        json!({"message": "Here you go", "changes": changes})
    }

    #[test]
    fn test_unrequested_scalar_dropped() {
        let out = extract(
            &entry(json!({"title": "Sunset Safari", "description": "old desc"})),
            &intent("change the title to Sunset Safari"),
        );
        assert_eq!(out.source, PatchSource::Filtered);
        assert_eq!(serde_json::to_value(&out.patch).unwrap(), json!({"title": "Sunset Safari"}));
    }

    #[test]
    fn test_requested_slot_kept() {
        let out = extract(
            &entry(json!({"timeSlots": {"morning": "Leisurely breakfast"}})),
            &intent("make mornings more relaxed"),
        );
        assert_eq!(out.source, PatchSource::Filtered);
        assert_eq!(
            serde_json::to_value(&out.patch).unwrap(),
            json!({"timeSlots": {"morning": "Leisurely breakfast"}})
        );
    }

    #[test]
    fn test_fallback_passes_proposal_through() {
        let out = extract(&entry(json!({"location": "Old Town"})), &intent("improve this day"));
        assert_eq!(out.source, PatchSource::Fallback);
        assert_eq!(serde_json::to_value(&out.patch).unwrap(), json!({"location": "Old Town"}));
    }

    #[test]
    fn test_fallback_when_intent_misses_proposed_fields() {
        // Asked about evening, collaborator only changed the title
        let out = extract(&entry(json!({"title": "Night Market"})), &intent("something for the evening"));
        assert_eq!(out.source, PatchSource::Fallback);
        assert_eq!(out.patch.title(), Some("Night Market"));
    }

    #[test]
    fn test_unrequested_slots_dropped_without_empty_object() {
        let out = extract(
            &entry(json!({"title": "New", "timeSlots": {"afternoon": "Museum"}})),
            &intent("new title please"),
        );
        let json = serde_json::to_value(&out.patch).unwrap();
        assert_eq!(json, json!({"title": "New"}));
        assert!(json.get("timeSlots").is_none());
    }

    #[test]
    fn test_multi_slot_request() {
        let out = extract(
            &entry(json!({"timeSlots": {"morning": "Yoga", "afternoon": "Beach", "evening": "Tapas"}})),
            &intent("swap the morning and evening plans"),
        );
        let slots = out.patch.time_slots().unwrap();
        assert_eq!(slots.morning.as_deref(), Some("Yoga"));
        assert_eq!(slots.afternoon, None);
        assert_eq!(slots.evening.as_deref(), Some("Tapas"));
    }

    #[test]
    fn test_empty_string_is_defined() {
        let mut set = IntentSet::new();
        set.insert(IntentTag::Description);
        let out = extract(&entry(json!({"description": ""})), &set);
        assert_eq!(out.source, PatchSource::Filtered);
        assert_eq!(out.patch.description(), Some(""));
    }

    #[test]
    fn test_null_and_non_string_are_absent() {
        let out = extract(
            &entry(json!({"title": null, "location": 42, "timeSlots": {"evening": null}})),
            &intent("change the title"),
        );
        assert_eq!(out.source, PatchSource::NoChanges);
        assert!(out.patch.is_empty());
    }

    #[test]
    fn test_empty_time_slots_object_is_no_change() {
        let out = extract(&entry(json!({"timeSlots": {}})), &intent("improve this day"));
        assert_eq!(out.source, PatchSource::NoChanges);
        assert!(serde_json::to_value(&out.patch).unwrap().get("timeSlots").is_none());
    }

    #[test]
    fn test_missing_changes_is_malformed() {
        let out = extract(&json!({"message": "hi"}), &intent("change the title"));
        assert!(matches!(out.source, PatchSource::Malformed(_)));
        assert!(out.patch.is_empty());
    }

    #[test]
    fn test_non_object_entry_is_malformed() {
        let out = extract(&json!(["title"]), &intent("change the title"));
        assert!(matches!(out.source, PatchSource::Malformed(_)));

        let out = extract(&json!({"changes": "title: X"}), &intent("change the title"));
        assert!(matches!(out.source, PatchSource::Malformed(_)));
    }
}
