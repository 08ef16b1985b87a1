//! `svcs log` command.

use serde::Serialize;
use svcs_core::{CommitEngine, CommitInfo, RepositoryStore};

use super::Result;
use crate::output::Output;

const SEPARATOR_WIDTH: usize = 40;

/// JSON output for log command.
#[derive(Serialize)]
struct LogOutput<'a> {
    repository: &'a str,
    commits: &'a [CommitInfo],
}

/// Human-readable lines for a list of commits.
pub fn render(name: &str, commits: &[CommitInfo]) -> Vec<String> {
    if commits.is_empty() {
        return vec![format!("No commits in repository '{}'.", name)];
    }

    let mut lines = Vec::with_capacity(commits.len() * 4);
    for info in commits {
        lines.push(format!("Commit ID: {}", info.id));
        lines.push(format!("Message: {}", info.message));
        lines.push(format!("Timestamp: {}", info.timestamp_string()));
        lines.push("-".repeat(SEPARATOR_WIDTH));
    }
    lines
}

/// Run the log command.
///
/// `limit` keeps the most recent commits; they are still printed oldest first.
pub fn run(
    output: &Output,
    store: &RepositoryStore,
    name: &str,
    limit: Option<usize>,
) -> Result<()> {
    let mut commits = CommitEngine::new(store).log(name)?;
    if let Some(limit) = limit {
        let skip = commits.len().saturating_sub(limit);
        commits.drain(..skip);
    }

    if output.is_json() {
        output.json(&LogOutput {
            repository: name,
            commits: &commits,
        });
    } else {
        for line in render(name, &commits) {
            output.println(&line);
        }
    }
    Ok(())
}
