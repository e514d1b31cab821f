//! tripedit - chat-driven itinerary editor
//!
//! CLI entry point for generating, editing and managing itineraries.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use eyre::{Context, Result, eyre};
use tracing::{debug, info};

use tripedit::cli::{Cli, Command, Target, confirm, split_preferences};
use tripedit::config::Config;
use tripedit::domain::Itinerary;
use tripedit::generation::{GenerateRequest, create_client};
use tripedit::repl::{display, run_editor};
use tripedit::store::{ItineraryRecord, ItineraryStore, create_store};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripedit")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(log_dir.join("te.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    // Setup logging with priority: CLI > config > INFO default
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(generation = %config.generation.base_url, store = ?config.store.backend, "tripedit loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Edit { target } => {
            debug!("main: matched Edit command");
            cmd_edit(&config, &target).await
        }
        Command::Generate {
            destination,
            start,
            end,
            preferences,
            user,
        } => {
            debug!(%destination, %start, %end, "main: matched Generate command");
            let mut request = GenerateRequest::new(destination, start, end);
            request.preferences = split_preferences(preferences.as_deref());
            request.user_id = user.or_else(|| config.user_id.clone());
            cmd_generate(&config, request).await
        }
        Command::Show { target } => {
            debug!("main: matched Show command");
            cmd_show(&config, &target).await
        }
        Command::List { user } => {
            debug!(?user, "main: matched List command");
            cmd_list(&config, user.or_else(|| config.user_id.clone())).await
        }
        Command::Delete { id, yes } => {
            debug!(%id, yes, "main: matched Delete command");
            cmd_delete(&config, &id, yes).await
        }
    }
}

/// Read an itinerary record from a JSON file
fn load_record_file(path: &Path) -> Result<Itinerary> {
    debug!(?path, "load_record_file: called");
    let content = fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    let record: ItineraryRecord =
        serde_json::from_str(&content).context(format!("Failed to parse itinerary record {}", path.display()))?;
    Ok(record.into_itinerary())
}

async fn load_target(config: &Config, target: &Target) -> Result<Itinerary> {
    debug!(?target, "load_target: called");
    match (&target.id, &target.file) {
        (_, Some(path)) => load_record_file(path),
        (Some(id), None) => {
            let store = create_store(&config.store).context("Failed to open itinerary store")?;
            let record = store.fetch(id).await.context(format!("Failed to fetch itinerary {}", id))?;
            Ok(record.into_itinerary())
        }
        (None, None) => Err(eyre!("Either an itinerary id or --file is required")),
    }
}

async fn cmd_edit(config: &Config, target: &Target) -> Result<()> {
    let itinerary = load_target(config, target).await?;
    let client = create_client(&config.generation).context("Failed to create generation client")?;
    let store = create_store(&config.store).context("Failed to open itinerary store")?;
    run_editor(config, itinerary, client, store, false).await
}

async fn cmd_generate(config: &Config, request: GenerateRequest) -> Result<()> {
    if request.end_date < request.start_date {
        return Err(eyre!("End date {} is before start date {}", request.end_date, request.start_date));
    }

    let client = create_client(&config.generation).context("Failed to create generation client")?;
    let store = create_store(&config.store).context("Failed to open itinerary store")?;

    println!("Generating itinerary for {}...", request.destination);
    let draft = client
        .generate(request.clone())
        .await
        .context("Failed to generate itinerary")?;
    let itinerary = draft.into_itinerary(&request);
    info!(destination = %itinerary.destination, day_count = itinerary.day_count(), "Generated itinerary draft");

    run_editor(config, itinerary, client, store, true).await
}

async fn cmd_show(config: &Config, target: &Target) -> Result<()> {
    let itinerary = load_target(config, target).await?;
    print!("{}", display::format_itinerary(&itinerary));
    Ok(())
}

async fn cmd_list(config: &Config, user: Option<String>) -> Result<()> {
    let user = user.ok_or_else(|| eyre!("No user given; pass --user or set user-id in the config"))?;
    let store = create_store(&config.store).context("Failed to open itinerary store")?;
    let records = store
        .list_for_user(&user)
        .await
        .context(format!("Failed to list itineraries for {}", user))?;

    if records.is_empty() {
        println!("No itineraries found");
        return Ok(());
    }
    for record in records {
        println!(
            "{:<28} {:<24} {} to {}",
            record.id.as_deref().unwrap_or("-"),
            record.destination,
            record.start_date,
            record.end_date
        );
    }
    Ok(())
}

async fn cmd_delete(config: &Config, id: &str, yes: bool) -> Result<()> {
    if !yes {
        let question = format!("Delete itinerary {}?", id);
        let confirmed = confirm(&question, &mut io::stdin().lock(), &mut io::stdout())
            .context("Failed to read confirmation")?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }
    let store = create_store(&config.store).context("Failed to open itinerary store")?;
    store.delete(id).await.context(format!("Failed to delete itinerary {}", id))?;
    println!("Deleted itinerary {}", id);
    Ok(())
}
