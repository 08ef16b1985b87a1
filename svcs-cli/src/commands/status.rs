//! `svcs status` command.

use serde::Serialize;
use svcs_core::{CommitEngine, RepositoryStore};

use super::Result;
use crate::output::Output;

/// JSON output for status command.
#[derive(Serialize)]
struct StatusOutput<'a> {
    repository: &'a str,
    files: &'a [String],
}

/// Human-readable lines for a working set.
pub fn render(name: &str, files: &[String]) -> Vec<String> {
    let mut lines = Vec::with_capacity(files.len() + 1);
    lines.push(format!("Files in repository '{}':", name));
    lines.extend(files.iter().map(|f| format!(" - {}", f)));
    lines
}

/// Run the status command.
pub fn run(output: &Output, store: &RepositoryStore, name: &str) -> Result<()> {
    let files = CommitEngine::new(store).status(name)?;

    if output.is_json() {
        output.json(&StatusOutput {
            repository: name,
            files: &files,
        });
    } else {
        for line in render(name, &files) {
            output.println(&line);
        }
    }
    Ok(())
}
