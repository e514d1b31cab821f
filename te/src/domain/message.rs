//! Chat transcript entries
//!
//! Messages are created by the reconciliation session and never rewritten.
//! The one exception is the consumption state of an attached patch, which
//! moves from `Unconsumed` to `Applied` exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::patch::PendingPatch;

/// Transcript-unique, monotonically increasing message id
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(u64);

impl MessageId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// The id that follows this one
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// Consumption state of a proposed patch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchStatus {
    #[default]
    Unconsumed,
    Applied,
}

/// A patch together with the day it was proposed for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchProposal {
    day_index: usize,
    patch: PendingPatch,
    status: PatchStatus,
}

impl PatchProposal {
    pub fn new(day_index: usize, patch: PendingPatch) -> Self {
        Self {
            day_index,
            patch,
            status: PatchStatus::Unconsumed,
        }
    }

    /// Index of the day that was active when the request was made
    pub fn day_index(&self) -> usize {
        self.day_index
    }

    pub fn patch(&self) -> &PendingPatch {
        &self.patch
    }

    pub fn status(&self) -> PatchStatus {
        self.status
    }

    pub fn is_applied(&self) -> bool {
        self.status == PatchStatus::Applied
    }

    pub(crate) fn mark_applied(&mut self) {
        debug!(day_index = self.day_index, "PatchProposal::mark_applied: called");
        self.status = PatchStatus::Applied;
    }
}

/// One turn of the editing conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    id: MessageId,
    sender: Sender,
    text: String,
    proposal: Option<PatchProposal>,
}

impl ChatMessage {
    /// A user request
    pub fn user(id: MessageId, text: impl Into<String>) -> Self {
        Self {
            id,
            sender: Sender::User,
            text: text.into(),
            proposal: None,
        }
    }

    /// An assistant reply, optionally carrying a proposed patch
    pub fn assistant(id: MessageId, text: impl Into<String>, proposal: Option<PatchProposal>) -> Self {
        Self {
            id,
            sender: Sender::Assistant,
            text: text.into(),
            proposal,
        }
    }

    pub fn id(&self) -> MessageId {
        self.id
    }

    pub fn sender(&self) -> Sender {
        self.sender
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn proposal(&self) -> Option<&PatchProposal> {
        self.proposal.as_ref()
    }

    pub(crate) fn proposal_mut(&mut self) -> Option<&mut PatchProposal> {
        self.proposal.as_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FieldPath;

    #[test]
    fn test_message_ids_are_monotonic() {
        let first = MessageId::new(1);
        assert!(first.next() > first);
        assert_eq!(first.next().get(), 2);
    }

    #[test]
    fn test_user_message_has_no_proposal() {
        let msg = ChatMessage::user(MessageId::new(1), "make mornings more relaxed");
        assert_eq!(msg.sender(), Sender::User);
        assert!(msg.proposal().is_none());
    }

    #[test]
    fn test_proposal_starts_unconsumed() {
        let proposal = PatchProposal::new(2, PendingPatch::new().with(FieldPath::Title, "X"));
        let mut msg = ChatMessage::assistant(MessageId::new(2), "Renamed the day", Some(proposal));
        assert_eq!(msg.proposal().unwrap().status(), PatchStatus::Unconsumed);

        msg.proposal_mut().unwrap().mark_applied();
        assert!(msg.proposal().unwrap().is_applied());
        assert_eq!(msg.proposal().unwrap().day_index(), 2);
    }
}
