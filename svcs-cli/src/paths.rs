//! Path resolution utilities for the CLI.
//!
//! Handles tilde expansion and making user-supplied paths absolute.

use std::path::{Path, PathBuf};

use crate::commands::{CliError, Result};

/// Resolve a path, expanding `~` and making it absolute.
pub fn resolve_path(path: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path);

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        let cwd = std::env::current_dir()
            .map_err(|e| CliError::Path(format!("Failed to get current directory: {}", e)))?;
        Ok(cwd.join(expanded))
    }
}

/// Replace a leading `~` with the home directory, if one is known.
fn expand_tilde(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let home = dirs::home_dir();

    match (path_str.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        (None, Some(home)) if path_str == "~" => home,
        _ => path.to_path_buf(),
    }
}
