//! `svcs add` command.

use std::path::{Path, PathBuf};

use serde::Serialize;
use svcs_core::RepositoryStore;

use super::Result;
use crate::output::Output;
use crate::paths;

/// JSON output for add command.
#[derive(Serialize)]
struct AddOutput<'a> {
    repository: &'a str,
    files: Vec<AddFileEntry>,
}

#[derive(Serialize)]
struct AddFileEntry {
    source: String,
    stored: String,
}

/// Confirmation line for an added file, quoting the path as given.
pub fn added(path: &Path, name: &str) -> String {
    format!("File '{}' added to repository '{}'.", path.display(), name)
}

/// Copy a user-supplied path into the working set, expanding `~`.
pub fn add_one(store: &RepositoryStore, name: &str, path: &Path) -> Result<String> {
    let source = paths::resolve_path(path)?;
    Ok(store.add_file(name, &source)?)
}

/// Run the add command. Stops at the first file that cannot be added.
pub fn run(output: &Output, store: &RepositoryStore, name: &str, sources: &[PathBuf]) -> Result<()> {
    let mut files = Vec::with_capacity(sources.len());

    for path in sources {
        let stored = add_one(store, name, path)?;
        if !output.is_json() {
            output.success(&added(path, name));
        }
        files.push(AddFileEntry {
            source: path.display().to_string(),
            stored,
        });
    }

    if output.is_json() {
        output.json(&AddOutput {
            repository: name,
            files,
        });
    }
    Ok(())
}
