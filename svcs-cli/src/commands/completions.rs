//! `svcs completions` command.

use std::io;

use clap::CommandFactory;
use clap_complete::Shell;

use super::Result;
use crate::Cli;

/// Write a completion script for `shell` to stdout.
pub fn run(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, bin_name, &mut io::stdout());
    Ok(())
}
