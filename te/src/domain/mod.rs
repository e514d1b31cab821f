//! Domain types for tripedit
//!
//! The itinerary document (days, time slots, typed field paths), the sparse
//! patches proposed against it, and the chat transcript that carries them.

mod field;
mod itinerary;
mod message;
mod patch;

pub mod dates;

pub use field::{FieldPath, Slot};
pub use itinerary::{Day, EditError, Itinerary, TimeSlots};
pub use message::{ChatMessage, MessageId, PatchProposal, PatchStatus, Sender};
pub use patch::{PendingPatch, TimeSlotsPatch};
