//! Reconciliation session errors

use thiserror::Error;

use crate::domain::{EditError, MessageId};
use crate::prompts::PromptError;

/// Errors from the reconciliation session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("A request is already outstanding")]
    ConcurrentRequestRejected,

    #[error("Cannot change the active day while a request is outstanding")]
    Busy,

    #[error("Edit request is empty")]
    EmptyRequest,

    #[error("No message with id {0}")]
    UnknownMessage(MessageId),

    #[error("Message {0} carries no patch")]
    NoPendingPatch(MessageId),

    #[error("No request is outstanding for turn {0}")]
    NoOutstandingRequest(u64),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl SessionError {
    /// Rejections the UI should drop without telling the user
    pub fn is_ignorable(&self) -> bool {
        matches!(self, Self::ConcurrentRequestRejected | Self::Busy | Self::EmptyRequest)
    }
}
