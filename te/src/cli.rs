//! CLI command definitions and subcommands

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use crate::domain::dates;

/// tripedit - chat-driven itinerary editor
#[derive(Parser)]
#[command(
    name = "te",
    about = "Edit travel itineraries by chatting with a generation service",
    version = env!("CARGO_PKG_VERSION"),
    after_help = after_help()
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the chat editor on a stored itinerary
    Edit {
        #[command(flatten)]
        target: Target,
    },

    /// Generate a new itinerary draft and open it in the chat editor
    Generate {
        /// Where the trip goes
        #[arg(short, long)]
        destination: String,

        /// First day of the trip (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date_arg)]
        start: NaiveDate,

        /// Last day of the trip (YYYY-MM-DD)
        #[arg(short, long, value_parser = parse_date_arg)]
        end: NaiveDate,

        /// Comma-separated preferences, e.g. "food, hiking"
        #[arg(short, long)]
        preferences: Option<String>,

        /// Owner of the new itinerary (defaults to `user-id` from config)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Print an itinerary
    Show {
        #[command(flatten)]
        target: Target,
    },

    /// List stored itineraries for a user
    List {
        /// Owner to list for (defaults to `user-id` from config)
        #[arg(short, long)]
        user: Option<String>,
    },

    /// Delete a stored itinerary
    Delete {
        /// Itinerary id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Which itinerary a command works on
#[derive(Debug, Args)]
pub struct Target {
    /// Stored itinerary id
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub id: Option<String>,

    /// Itinerary record JSON file instead of a stored id
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Split a comma-separated preference list, dropping blanks
pub fn split_preferences(raw: Option<&str>) -> Vec<String> {
    debug!(?raw, "split_preferences: called");
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Ask a y/N question; anything but `y`/`yes` (or end of input) is a no
pub fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    debug!(%question, "confirm: called");
    write!(output, "{} [y/N] ", question)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn parse_date_arg(raw: &str) -> Result<NaiveDate, String> {
    dates::parse_date(raw).ok_or_else(|| format!("invalid date '{}', expected YYYY-MM-DD", raw))
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    debug!("get_log_path: called");
    let path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tripedit")
        .join("logs")
        .join("te.log");
    debug!(?path, "get_log_path: returning path");
    path
}

fn after_help() -> String {
    format!("Logs are written to: {}", get_log_path().display())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_edit_id() {
        let cli = Cli::try_parse_from(["te", "edit", "abc123"]).unwrap();
        match cli.command {
            Command::Edit { target } => {
                assert_eq!(target.id.as_deref(), Some("abc123"));
                assert!(target.file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parse_show_file() {
        let cli = Cli::try_parse_from(["te", "show", "--file", "trip.json"]).unwrap();
        match cli.command {
            Command::Show { target } => assert_eq!(target.file, Some(PathBuf::from("trip.json"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_target_requires_id_or_file() {
        assert!(Cli::try_parse_from(["te", "edit"]).is_err());
        assert!(Cli::try_parse_from(["te", "edit", "abc", "--file", "x.json"]).is_err());
    }

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from([
            "te",
            "generate",
            "--destination",
            "Kyoto",
            "--start",
            "2025-04-01",
            "--end",
            "2025-04-03",
            "--preferences",
            "temples, food",
            "-l",
            "debug",
        ])
        .unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Generate {
                destination,
                start,
                end,
                preferences,
                user,
            } => {
                assert_eq!(destination, "Kyoto");
                assert_eq!(start, NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
                assert_eq!(end, NaiveDate::from_ymd_opt(2025, 4, 3).unwrap());
                assert_eq!(split_preferences(preferences.as_deref()), vec!["temples", "food"]);
                assert!(user.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_bad_date() {
        assert!(
            Cli::try_parse_from(["te", "generate", "-d", "X", "-s", "April 1st", "-e", "2025-04-03"]).is_err()
        );
    }

    #[test]
    fn test_split_preferences() {
        assert_eq!(split_preferences(Some(" a, ,b ,")), vec!["a", "b"]);
        assert!(split_preferences(None).is_empty());
    }

    #[test]
    fn test_cli_parse_delete_yes() {
        let cli = Cli::try_parse_from(["te", "delete", "abc", "--yes"]).unwrap();
        match cli.command {
            Command::Delete { id, yes } => {
                assert_eq!(id, "abc");
                assert!(yes);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        let cli = Cli::try_parse_from(["te", "delete", "abc"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { yes: false, .. }));
    }

    #[test]
    fn test_confirm_answers() {
        for (answer, expected) in [("y\n", true), ("YES\n", true), ("n\n", false), ("\n", false), ("", false)] {
            let mut output = Vec::new();
            let got = confirm("Delete itinerary abc?", &mut answer.as_bytes(), &mut output).unwrap();
            assert_eq!(got, expected, "answer {:?}", answer);
            assert_eq!(String::from_utf8(output).unwrap(), "Delete itinerary abc? [y/N] ");
        }
    }
}
