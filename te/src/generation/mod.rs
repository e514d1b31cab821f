//! Generation service module for tripedit
//!
//! The generation service is a black box that drafts itineraries and proposes
//! per-day changes. This module holds its wire types, the client trait, and
//! the HTTP implementation.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod http;
mod types;

pub use client::GenerationClient;
pub use error::GenerationError;
pub use http::HttpGenerationClient;
pub use types::{DraftMetadata, EditProposalRequest, GenerateRequest, GeneratedDraft, ProposalReply};

use crate::config::GenerationConfig;

/// Create the generation client described by `config`
pub fn create_client(config: &GenerationConfig) -> Result<Arc<dyn GenerationClient>, GenerationError> {
    debug!(base_url = %config.base_url, "create_client: called");
    Ok(Arc::new(HttpGenerationClient::from_config(config)?))
}
