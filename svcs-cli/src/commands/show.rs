//! `svcs show` command.

use serde::Serialize;
use svcs_core::{CommitEngine, CommitInfo, RepositoryStore};

use super::Result;
use crate::output::Output;

/// JSON output for show command.
#[derive(Serialize)]
struct ShowOutput<'a> {
    #[serde(flatten)]
    commit: &'a CommitInfo,
    files: &'a [String],
}

/// Run the show command.
pub fn run(output: &Output, store: &RepositoryStore, name: &str, commit: &str) -> Result<()> {
    let engine = CommitEngine::new(store);
    let info = engine.show(name, commit)?;
    let files = engine.snapshot_files(name, info.id.as_str())?;

    if output.is_json() {
        output.json(&ShowOutput {
            commit: &info,
            files: &files,
        });
        return Ok(());
    }

    output.println(&format!("Commit ID: {}", info.id));
    output.println(&format!("Message: {}", info.message));
    output.println(&format!("Timestamp: {}", info.timestamp_string()));
    if files.is_empty() {
        output.println("No files in this commit.");
    } else {
        output.println("Files:");
        for file in &files {
            output.println(&format!(" - {}", file));
        }
    }
    Ok(())
}
