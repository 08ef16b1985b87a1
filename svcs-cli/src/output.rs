//! Output formatting for the CLI.
//!
//! Handles human-readable and JSON output formats.

use std::io::IsTerminal;

use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::commands::CliError;
use crate::OutputFormat;

/// Output handler for CLI commands.
pub struct Output {
    format: OutputFormat,
    quiet: bool,
    color: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(format: OutputFormat, quiet: bool) -> Self {
        Self {
            format,
            quiet,
            color: std::io::stdout().is_terminal(),
        }
    }

    /// Check if JSON output was requested.
    pub fn is_json(&self) -> bool {
        self.format == OutputFormat::Json
    }

    /// Print a line to stdout (respects quiet mode).
    pub fn println(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a success message (green on a terminal).
    pub fn success(&self, msg: &str) {
        if self.quiet {
            return;
        }
        if self.color {
            println!("\x1b[32m{}\x1b[0m", msg);
        } else {
            println!("{}", msg);
        }
    }

    /// Print a value as a single JSON document.
    pub fn json<T: Serialize>(&self, value: &T) {
        if self.quiet {
            return;
        }
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => log::error!("Failed to serialize output: {}", e),
        }
    }

    /// Print rows as a table.
    pub fn table<T: Tabled>(&self, rows: &[T]) {
        if !self.quiet {
            println!("{}", Table::new(rows).with(Style::rounded()));
        }
    }

    /// Print an error to stderr (always shown).
    pub fn error(&self, err: &CliError) {
        match self.format {
            OutputFormat::Human => {
                if std::io::stderr().is_terminal() {
                    eprintln!("\x1b[31merror: {}\x1b[0m", err);
                } else {
                    eprintln!("error: {}", err);
                }
            }
            OutputFormat::Json => eprintln!("{}", error_json(err)),
        }
    }
}

/// JSON document describing a failed command.
fn error_json(err: &CliError) -> serde_json::Value {
    json!({
        "type": "error",
        "error_type": err.error_type(),
        "message": err.to_string(),
    })
}
