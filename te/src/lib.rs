//! tripedit - chat-driven itinerary editing
//!
//! tripedit holds a multi-day travel itinerary as a structured document and
//! lets the traveller change it by describing edits in plain language. A
//! remote generation service proposes changes; tripedit narrows each proposal
//! to the fields the traveller actually asked about and applies it only when
//! confirmed, exactly once.
//!
//! # Core Concepts
//!
//! - **Single mutation primitive**: every day edit goes through [`Itinerary::set_field`]
//! - **Intent-scoped patches**: unrequested fields are dropped unless nothing else survives
//! - **Absent is not empty**: a patch field that is missing means "leave alone"
//! - **Apply once**: a proposal moves from unconsumed to applied exactly once
//!
//! # Modules
//!
//! - [`domain`] - Itinerary, days, patches and chat messages
//! - [`intent`] - Keyword intent classifier
//! - [`extract`] - Patch extraction from raw proposals
//! - [`apply`] - Patch application
//! - [`session`] - Reconciliation session state machine
//! - [`generation`] - Generation service client
//! - [`store`] - Itinerary persistence
//! - [`prompts`] - Prompt templates
//! - [`repl`] - Interactive chat editor
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod apply;
pub mod cli;
pub mod config;
pub mod domain;
pub mod extract;
pub mod generation;
pub mod intent;
pub mod prompts;
pub mod repl;
pub mod session;
pub mod store;

// Re-export commonly used types
pub use apply::apply_patch;
pub use config::Config;
pub use domain::{
    ChatMessage, Day, EditError, FieldPath, Itinerary, MessageId, PatchProposal, PatchStatus, PendingPatch, Sender,
    Slot, TimeSlots, TimeSlotsPatch,
};
pub use extract::{Extraction, PatchSource, extract};
pub use generation::{GenerationClient, GenerationError, HttpGenerationClient, create_client};
pub use intent::{IntentClassifier, IntentSet, IntentTag};
pub use prompts::{PromptError, PromptLoader};
pub use session::{ApplyOutcome, ReconciliationSession, SessionError, SessionState};
pub use store::{FileStore, HttpStore, ItineraryRecord, ItineraryStore, StoreError, create_store, save_itinerary};
