//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults, then renders them with Handlebars.

use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use super::embedded;
use crate::domain::{Day, Itinerary};

/// Name of the per-day edit template
pub const EDIT_TEMPLATE: &str = "edit";

/// Errors loading or rendering prompts
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Prompt template not found: {0}")]
    NotFound(String),

    #[error("Failed to read prompt {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to compile template {name}: {message}")]
    Template { name: String, message: String },

    #[error("Failed to render template {name}: {message}")]
    Render { name: String, message: String },
}

/// Context for rendering the edit prompt
#[derive(Debug, Clone, Serialize)]
pub struct EditPromptContext {
    pub destination: String,
    pub start_date: String,
    pub end_date: String,
    /// Comma-joined; empty when there are none
    pub preferences: String,
    pub day_number: u32,
    pub day_date: Option<String>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub morning: String,
    pub afternoon: String,
    pub evening: String,
    /// The traveller's request, verbatim
    pub request: String,
}

impl EditPromptContext {
    /// Context for editing `day` of `itinerary`
    pub fn new(itinerary: &Itinerary, day: &Day, request: &str) -> Self {
        debug!(day = day.day, request_len = request.len(), "EditPromptContext::new: called");
        Self {
            destination: itinerary.destination.clone(),
            start_date: itinerary.start_date().to_string(),
            end_date: itinerary.end_date.to_string(),
            preferences: itinerary
                .preferences
                .iter()
                .map(|p| p.trim())
                .filter(|p| !p.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            day_number: day.day,
            day_date: day.date.map(|d| d.to_string()),
            title: day.title.clone(),
            description: day.description.clone(),
            location: day.location.clone(),
            morning: day.time_slots.morning.clone(),
            afternoon: day.time_slots.afternoon.clone(),
            evening: day.time_slots.evening.clone(),
            request: request.to_string(),
        }
    }
}

/// Loads and renders prompt templates
#[derive(Debug)]
pub struct PromptLoader {
    /// Handlebars template engine with every template pre-registered
    hbs: Handlebars<'static>,
}

impl PromptLoader {
    /// Create a loader, preferring `{override_dir}/{name}.pmt` over embedded prompts
    pub fn new(override_dir: Option<&Path>) -> Result<Self, PromptError> {
        debug!(?override_dir, "PromptLoader::new: called");
        let mut hbs = Handlebars::new();
        // Prompts are plain text; HTML escaping would mangle quotes in user text
        hbs.register_escape_fn(handlebars::no_escape);

        let source = Self::load_template(override_dir, EDIT_TEMPLATE)?;
        hbs.register_template_string(EDIT_TEMPLATE, source)
            .map_err(|e| PromptError::Template {
                name: EDIT_TEMPLATE.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self { hbs })
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Result<Self, PromptError> {
        Self::new(None)
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `{override_dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(override_dir: Option<&Path>, name: &str) -> Result<String, PromptError> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(dir) = override_dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                info!("Using prompt override {}", path.display());
                return std::fs::read_to_string(&path).map_err(|source| PromptError::Read { path, source });
            }
            debug!(?path, "PromptLoader::load_template: no override");
        }

        embedded::get_embedded(name)
            .map(str::to_string)
            .ok_or_else(|| PromptError::NotFound(name.to_string()))
    }

    /// Render the per-day edit prompt
    pub fn render_edit(&self, context: &EditPromptContext) -> Result<String, PromptError> {
        debug!(day_number = context.day_number, "PromptLoader::render_edit: called");
        self.hbs.render(EDIT_TEMPLATE, context).map_err(|e| PromptError::Render {
            name: EDIT_TEMPLATE.to_string(),
            message: e.to_string(),
        })
    }
}
