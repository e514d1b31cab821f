//! tripedit configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::intent::SynonymTable;

/// Main tripedit configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation service configuration
    pub generation: GenerationConfig,

    /// Itinerary storage configuration
    pub store: StoreConfig,

    /// Intent keyword configuration
    pub intent: IntentConfig,

    /// Prompt template configuration
    pub prompts: PromptsConfig,

    /// Default owner for new and listed itineraries
    #[serde(rename = "user-id")]
    pub user_id: Option<String>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed: a broken config file is reported properly by
    /// [`Config::load`] once logging exists.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::default_paths(),
        };
        paths
            .iter()
            .find(|p| p.exists())
            .and_then(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    /// Project-local `.tripedit.yml`, then `~/.config/tripedit/tripedit.yml`
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".tripedit.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("tripedit").join("tripedit.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Read a bearer token from an environment variable, ignoring empty values
fn token_from_env(var: &str) -> Option<String> {
    debug!(%var, "token_from_env: called");
    std::env::var(var).ok().filter(|t| !t.trim().is_empty())
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Service base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable holding the bearer token
    #[serde(rename = "token-env")]
    pub token_env: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Transport-level retries for transient failures
    #[serde(rename = "max-retries")]
    pub max_retries: u32,
}

impl GenerationConfig {
    pub fn token(&self) -> Option<String> {
        token_from_env(&self.token_env)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
            token_env: "TRIPEDIT_TOKEN".to_string(),
            timeout_ms: 120_000,
            max_retries: 2,
        }
    }
}

/// Which storage backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Remote REST storage service
    #[default]
    Http,
    /// JSON files in a local directory
    File,
}

/// Itinerary storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,

    /// Storage service base URL (http backend)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Environment variable holding the bearer token (http backend)
    #[serde(rename = "token-env")]
    pub token_env: String,

    /// Request timeout in milliseconds (http backend)
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,

    /// Record directory (file backend)
    pub dir: PathBuf,
}

impl StoreConfig {
    pub fn token(&self) -> Option<String> {
        token_from_env(&self.token_env)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        // Use XDG data directory (~/.local/share/tripedit on Linux)
        let dir = dirs::data_dir()
            .map(|d| d.join("tripedit").join("itineraries"))
            .unwrap_or_else(|| PathBuf::from(".tripedit/itineraries"));

        Self {
            backend: StoreBackend::Http,
            base_url: "http://localhost:3001".to_string(),
            token_env: "TRIPEDIT_TOKEN".to_string(),
            timeout_ms: 30_000,
            dir,
        }
    }
}

/// Intent keyword configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentConfig {
    /// Extra keywords per field, added to the built-in table
    pub synonyms: SynonymTable,
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory with `.pmt` overrides
    pub dir: Option<PathBuf>,
}
