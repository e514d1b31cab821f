//! Interactive chat editor for tripedit
//!
//! A line-oriented front end over [`ReconciliationSession`]: free text is an
//! edit request for the current day, slash commands navigate, apply and save.

pub mod display;
mod session;

pub use session::EditorRepl;

use std::sync::Arc;

use eyre::{Context, Result};

use crate::config::Config;
use crate::domain::Itinerary;
use crate::generation::GenerationClient;
use crate::intent::IntentClassifier;
use crate::prompts::PromptLoader;
use crate::session::ReconciliationSession;
use crate::store::ItineraryStore;

/// Build a session from configuration
pub fn build_session(config: &Config, itinerary: Itinerary) -> Result<ReconciliationSession> {
    let classifier = IntentClassifier::new(&config.intent.synonyms).context("Invalid intent keywords in config")?;
    let prompts = PromptLoader::new(config.prompts.dir.as_deref()).context("Failed to load prompt templates")?;
    Ok(ReconciliationSession::new(itinerary, classifier, prompts))
}

/// Run the interactive editor
///
/// This is the main entry point for `te edit` and `te generate`.
pub async fn run_editor(
    config: &Config,
    itinerary: Itinerary,
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn ItineraryStore>,
    unsaved: bool,
) -> Result<()> {
    let session = build_session(config, itinerary)?;
    let mut repl = EditorRepl::new(session, client, store);
    if unsaved {
        repl = repl.with_unsaved_changes();
    }
    repl.run().await
}
