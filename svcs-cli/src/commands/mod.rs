//! SVCS command implementations.
//!
//! Each subcommand is implemented in its own module and delegates to
//! svcs-core for the actual repository logic. Human wording lives next to
//! each command so the interactive menu prints the same lines.

pub mod add;
pub mod commit;
pub mod completions;
pub mod init;
pub mod log;
pub mod repos;
pub mod show;
pub mod status;

use std::io;
use std::path::PathBuf;

use svcs_core::{Config, RepositoryStore, SvcsError};
use thiserror::Error;

use crate::paths;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// SVCS core error.
    #[error("{0}")]
    Svcs(#[from] SvcsError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Path error.
    #[error("Path error: {0}")]
    Path(String),
}

impl CliError {
    /// Stable error category for JSON output.
    pub fn error_type(&self) -> &'static str {
        match self {
            CliError::Svcs(e) => e.error_type(),
            CliError::Io(_) => "io_error",
            CliError::Path(_) => "path_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

/// Open the store, resolving the root from the flag, environment or config.
pub fn open_store(root: Option<PathBuf>) -> Result<RepositoryStore> {
    let root = root.map(|r| paths::resolve_path(&r)).transpose()?;
    let config = Config::resolve(root)?;
    ::log::debug!("Using store root {}", config.root.display());
    Ok(RepositoryStore::new(config))
}
