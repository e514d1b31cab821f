//! Editable field paths on a Day
//!
//! Paths use the same dotted spelling the storage service and the inline
//! editors use: `title`, `description`, `location`, `timeSlots.morning`,
//! `timeSlots.afternoon`, `timeSlots.evening`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::itinerary::EditError;

/// One of the three time-of-day slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Morning,
    Afternoon,
    Evening,
}

impl Slot {
    /// All slots in chronological order
    pub const ALL: [Slot; 3] = [Slot::Morning, Slot::Afternoon, Slot::Evening];

    /// Key used inside the `timeSlots` object
    pub fn key(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }

    /// Capitalised label for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A typed path to one editable field of a Day
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Title,
    Description,
    Location,
    Slot(Slot),
}

impl FieldPath {
    /// Every editable path, scalar fields first
    pub const ALL: [FieldPath; 6] = [
        FieldPath::Title,
        FieldPath::Description,
        FieldPath::Location,
        FieldPath::Slot(Slot::Morning),
        FieldPath::Slot(Slot::Afternoon),
        FieldPath::Slot(Slot::Evening),
    ];

    /// Dotted path string (`timeSlots.morning` etc.)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Location => "location",
            Self::Slot(Slot::Morning) => "timeSlots.morning",
            Self::Slot(Slot::Afternoon) => "timeSlots.afternoon",
            Self::Slot(Slot::Evening) => "timeSlots.evening",
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = EditError;

    /// Accepts the dotted form and, for convenience, bare slot names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "FieldPath::from_str: called");
        match s.trim() {
            "title" => Ok(Self::Title),
            "description" => Ok(Self::Description),
            "location" => Ok(Self::Location),
            "timeSlots.morning" | "morning" => Ok(Self::Slot(Slot::Morning)),
            "timeSlots.afternoon" | "afternoon" => Ok(Self::Slot(Slot::Afternoon)),
            "timeSlots.evening" | "evening" => Ok(Self::Slot(Slot::Evening)),
            other => {
                debug!(%other, "FieldPath::from_str: unknown path");
                Err(EditError::UnknownField(other.to_string()))
            }
        }
    }
}
