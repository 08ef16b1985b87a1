//! `svcs` command-line interface.
//!
//! Runs one subcommand against the store, or the interactive menu when no
//! subcommand is given.

mod commands;
mod menu;
mod output;
mod paths;

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use crate::commands::Result;
use crate::output::Output;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "svcs", version = svcs_core::VERSION, about = "Simple Version Control System")]
pub struct Cli {
    /// Store root directory [default: $SVCS_ROOT, the config file, then ~/.svcs]
    #[arg(long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new, empty repository
    Init {
        /// Repository name
        name: String,
    },
    /// Copy files into a repository's working set
    Add {
        /// Repository name
        name: String,
        /// Files to copy; each is stored under its base name
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Snapshot the working set as a new commit
    Commit {
        /// Repository name
        name: String,
        /// Commit message (may be empty)
        #[arg(short, long)]
        message: String,
    },
    /// List commits, oldest first
    Log {
        /// Repository name
        name: String,
        /// Only show the N most recent commits
        #[arg(short = 'n', long, value_name = "N")]
        limit: Option<usize>,
    },
    /// List the files in the working set
    Status {
        /// Repository name
        name: String,
    },
    /// Show one commit and the files it captured
    Show {
        /// Repository name
        name: String,
        /// Commit id or unique prefix (at least 4 characters)
        commit: String,
    },
    /// List all repositories under the store root
    Repos,
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
    /// Run the interactive menu
    Menu,
}

fn try_main(cli: Cli, output: &Output) -> Result<()> {
    let root = cli.root;
    let store = || commands::open_store(root.clone());

    match cli.command.unwrap_or(Command::Menu) {
        Command::Init { name } => commands::init::run(output, &store()?, &name),
        Command::Add { name, paths } => commands::add::run(output, &store()?, &name, &paths),
        Command::Commit { name, message } => {
            commands::commit::run(output, &store()?, &name, &message)
        }
        Command::Log { name, limit } => commands::log::run(output, &store()?, &name, limit),
        Command::Status { name } => commands::status::run(output, &store()?, &name),
        Command::Show { name, commit } => commands::show::run(output, &store()?, &name, &commit),
        Command::Repos => commands::repos::run(output, &store()?),
        Command::Completions { shell } => commands::completions::run(shell),
        Command::Menu => {
            let store = store()?;
            store.ensure_root()?;
            menu::Menu::new(&store, io::stdin().lock(), io::stdout().lock()).run()?;
            Ok(())
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };
    let output = Output::new(format, cli.quiet);

    if let Err(e) = try_main(cli, &output) {
        output.error(&e);
        std::process::exit(1);
    }
}
