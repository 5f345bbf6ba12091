//! rapport: keep track of the people you meet and the meetings you have with them.
//!
//! # Usage
//!
//! ```text
//! rapport contact add <name> [--notes <text>]
//! rapport contact list|show <id>...|find <text> [--json]
//! rapport contact notes <id> <text>
//! rapport meeting schedule --with <id>... --at <when>
//! rapport meeting record --with <id>... --at <when> [--notes <text>]
//! rapport meeting show <id> [--past|--future] [--json]
//! rapport meeting list --contact <id> --past|--future [--json]
//! rapport meeting on <YYYY-MM-DD> [--json]
//! rapport meeting notes <id> <text>
//! ```
//!
//! State lives in `~/.rapport/registry.yaml`. Set `RAPPORT_LOG=debug` for logs on stderr.

mod commands;

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use clap::{Parser, Subcommand};

use commands::{contact::ContactCommand, meeting::MeetingCommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "rapport",
    version,
    about = "Track contacts and the meetings you have with them",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Add, look up, and annotate contacts.
    Contact {
        #[command(subcommand)]
        command: ContactCommand,
    },

    /// Schedule, record, and query meetings.
    Meeting {
        #[command(subcommand)]
        command: MeetingCommand,
    },
}

// ---------------------------------------------------------------------------
// Shared instant argument: parsed from CLI strings, converts to a UTC instant
// ---------------------------------------------------------------------------

/// Thin wrapper so clap can parse an instant from either RFC 3339
/// (`2030-04-01T09:30:00+02:00`) or `YYYY-MM-DD HH:MM`, read as UTC.
#[derive(Debug, Clone, Copy)]
pub struct WhenArg(pub DateTime<Utc>);

impl FromStr for WhenArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self(dt.with_timezone(&Utc)));
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M")
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
            .map_err(|_| {
                format!("invalid time '{s}'; expected RFC 3339 or 'YYYY-MM-DD HH:MM' (UTC)")
            })
    }
}

impl fmt::Display for WhenArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.to_rfc3339().fmt(f)
    }
}

impl From<WhenArg> for DateTime<Utc> {
    fn from(w: WhenArg) -> Self {
        w.0
    }
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    tracing::debug!(command = ?cli.command, "dispatching");
    match cli.command {
        Commands::Contact { command } => commands::contact::run(command),
        Commands::Meeting { command } => commands::meeting::run(command),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_env("RAPPORT_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_accepts_rfc3339_with_offset() {
        let when: WhenArg = "2030-04-01T09:30:00+02:00".parse().expect("parse");
        assert_eq!(when.0, Utc.with_ymd_and_hms(2030, 4, 1, 7, 30, 0).unwrap());
    }

    #[test]
    fn when_accepts_short_form_as_utc() {
        let when: WhenArg = "2030-04-01 09:30".parse().expect("parse");
        assert_eq!(when.0, Utc.with_ymd_and_hms(2030, 4, 1, 9, 30, 0).unwrap());
    }

    #[test]
    fn when_rejects_garbage() {
        let err = "next tuesday".parse::<WhenArg>().unwrap_err();
        assert!(err.contains("next tuesday"));
    }
}
