//! GenerationClient trait definition

use async_trait::async_trait;
use serde_json::Value;

use super::{EditProposalRequest, GenerateRequest, GeneratedDraft, GenerationError};

/// Client for the itinerary generation service
///
/// Each call is independent; the service keeps no conversation state. The
/// edit call returns the raw response body so the session can judge its
/// shape itself.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Propose changes to one day (`{draft: [{message, changes}]}` expected)
    async fn propose(&self, request: EditProposalRequest) -> Result<Value, GenerationError>;

    /// Generate a new itinerary draft
    async fn generate(&self, request: GenerateRequest) -> Result<GeneratedDraft, GenerationError>;
}
