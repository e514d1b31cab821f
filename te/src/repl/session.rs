//! Interactive chat editor over one itinerary

use std::sync::Arc;

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::display;
use crate::domain::{FieldPath, MessageId, dates};
use crate::generation::GenerationClient;
use crate::session::{ApplyOutcome, ReconciliationSession};
use crate::store::{ItineraryStore, save_itinerary};

/// Interactive editor session
pub struct EditorRepl {
    session: ReconciliationSession,
    client: Arc<dyn GenerationClient>,
    store: Arc<dyn ItineraryStore>,
    /// Changes since the last save
    dirty: bool,
}

impl EditorRepl {
    /// Create a new editor over `session`
    pub fn new(session: ReconciliationSession, client: Arc<dyn GenerationClient>, store: Arc<dyn ItineraryStore>) -> Self {
        Self {
            session,
            client,
            store,
            dirty: false,
        }
    }

    /// Mark the document as changed, e.g. when it was just generated
    pub fn with_unsaved_changes(mut self) -> Self {
        self.dirty = true;
        self
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();
        self.print_active_day();

        // Create readline editor for proper line editing
        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let prompt = format!("{} ", format!("day {} >", self.session.active_day() + 1).bright_green());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_request(input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        if self.dirty {
            println!("{}", "Unsaved changes discarded.".yellow());
        }
        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "tripedit chat editor".bright_cyan().bold());
        print!("{}", display::format_overview(self.session.itinerary()));
        println!(
            "Describe a change to the current day, or type {} for help, {} to quit",
            "/help".yellow(),
            "/quit".yellow()
        );
        println!();
    }

    fn print_active_day(&self) {
        match self.session.itinerary().day(self.session.active_day()) {
            Some(day) => print!("{}", display::format_day(day)),
            None => println!("{}", "This itinerary has no days.".dimmed()),
        }
        println!();
    }

    /// Send one edit request and show the reply with its proposed patch
    async fn process_request(&mut self, input: &str) {
        debug!(input_len = input.len(), "process_request: called");
        println!("{}", "Thinking...".dimmed());

        match self.session.submit(self.client.as_ref(), input).await {
            Ok(id) => self.print_reply(id),
            Err(e) if e.is_ignorable() => debug!(error = %e, "process_request: ignored"),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    fn print_reply(&self, id: MessageId) {
        let Some(message) = self.session.message(id) else {
            return;
        };
        println!();
        println!("{} {}", "Assistant:".bright_blue(), message.text());

        if let Some(proposal) = message.proposal() {
            let day = self.session.itinerary().day(proposal.day_index());
            print!("{}", display::format_patch(proposal.patch(), day));
            if !proposal.patch().is_empty() {
                println!("Type {} to apply these changes", format!("/apply {}", id).yellow());
            }
        }
        println!();
    }

    /// Handle slash commands
    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let (cmd, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        let rest = rest.trim();

        match cmd {
            "/help" | "/h" => self.print_help(),
            "/quit" | "/q" | "/exit" => return SlashResult::Quit,
            "/days" => self.print_days(),
            "/day" => self.select_day(rest),
            "/show" => self.print_active_day(),
            "/all" => print!("{}", display::format_itinerary(self.session.itinerary())),
            "/history" => self.print_history(),
            "/apply" => self.apply(rest),
            "/set" => self.set_field(rest),
            "/start" => self.set_start(rest),
            "/save" => self.save().await,
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        SlashResult::Continue
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:22} Show this help", "/help".yellow());
        println!("  {:22} Exit the editor", "/quit".yellow());
        println!("  {:22} List the days of the trip", "/days".yellow());
        println!("  {:22} Switch to day N", "/day N".yellow());
        println!("  {:22} Show the current day", "/show".yellow());
        println!("  {:22} Show the whole itinerary", "/all".yellow());
        println!("  {:22} Show the conversation", "/history".yellow());
        println!("  {:22} Apply proposed changes (latest if no id)", "/apply [ID]".yellow());
        println!("  {:22} Edit a field of the current day", "/set FIELD VALUE".yellow());
        println!("  {:22} Move the trip start date", "/start YYYY-MM-DD".yellow());
        println!("  {:22} Save the itinerary", "/save".yellow());
        println!();
        let fields: Vec<&str> = FieldPath::ALL.iter().map(|p| p.as_str()).collect();
        println!("Fields: {}", fields.join(", ").dimmed());
        println!();
    }

    fn print_days(&self) {
        println!();
        for (index, day) in self.session.days().iter().enumerate() {
            let marker = if index == self.session.active_day() { "*" } else { " " };
            let date = day.date.map(|d| d.to_string()).unwrap_or_default();
            println!("{} {:>3}. {}  {}", marker.bright_green(), day.day, day.title, date.dimmed());
        }
        println!();
    }

    fn print_history(&self) {
        if self.session.transcript().is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }
        println!();
        for message in self.session.transcript() {
            println!("{}", display::format_message_line(message));
        }
        println!();
    }

    fn select_day(&mut self, arg: &str) {
        let Some(number) = arg.parse::<usize>().ok().filter(|n| *n >= 1) else {
            println!("{} /day N (1-{})", "Usage:".yellow(), self.session.days().len());
            return;
        };
        match self.session.set_active_day(number - 1) {
            Ok(()) => self.print_active_day(),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    fn apply(&mut self, arg: &str) {
        let id = if arg.is_empty() {
            match self.session.latest_pending() {
                Some(id) => id,
                None => {
                    println!("{}", "Nothing pending to apply.".dimmed());
                    return;
                }
            }
        } else {
            match arg.trim_start_matches('#').parse::<u64>() {
                Ok(raw) => MessageId::new(raw),
                Err(_) => {
                    println!("{} /apply [ID]", "Usage:".yellow());
                    return;
                }
            }
        };

        match self.session.apply(id) {
            Ok(ApplyOutcome::Applied { day_index, fields }) => {
                self.dirty = true;
                let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
                println!("{} day {}: {}", "Applied to".green(), day_index + 1, names.join(", "));
            }
            Ok(ApplyOutcome::AlreadyApplied) => println!("{}", "Those changes were already applied.".dimmed()),
            Ok(ApplyOutcome::NothingToApply) => println!("{}", "That reply has no changes to apply.".dimmed()),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    fn set_field(&mut self, args: &str) {
        let (field, value) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
        if field.is_empty() {
            println!("{} /set FIELD VALUE", "Usage:".yellow());
            return;
        }
        let path: FieldPath = match field.parse() {
            Ok(path) => path,
            Err(e) => {
                println!("{} {}", "Error:".red(), e);
                return;
            }
        };
        match self.session.edit_field(self.session.active_day(), path, value.trim()) {
            Ok(()) => {
                self.dirty = true;
                println!("{} {}", "Updated".green(), path);
            }
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    fn set_start(&mut self, arg: &str) {
        match dates::parse_date(arg) {
            Some(date) => {
                self.session.set_start_date(date);
                self.dirty = true;
                let end = self.session.itinerary().end_date;
                println!("{} {} to {}", "Trip now runs".green(), date, end);
            }
            None => println!("{} /start YYYY-MM-DD", "Usage:".yellow()),
        }
    }

    async fn save(&mut self) {
        debug!("save: called");
        match save_itinerary(self.store.as_ref(), self.session.itinerary_mut()).await {
            Ok(id) => {
                self.dirty = false;
                println!("{} {}", "Saved itinerary".green(), id);
            }
            Err(e) => println!("{} {}", "Save failed:".red(), e),
        }
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
