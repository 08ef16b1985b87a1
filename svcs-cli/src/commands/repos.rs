//! `svcs repos` command.

use serde::Serialize;
use svcs_core::{CommitEngine, RepositoryStore};
use tabled::Tabled;

use super::Result;
use crate::output::Output;

/// One repository, for both table and JSON output.
#[derive(Serialize, Tabled)]
struct RepoRow {
    #[tabled(rename = "Repository")]
    name: String,
    #[tabled(rename = "Files")]
    files: usize,
    #[tabled(rename = "Commits")]
    commits: usize,
}

/// JSON output for repos command.
#[derive(Serialize)]
struct ReposOutput<'a> {
    root: String,
    repositories: &'a [RepoRow],
}

/// Run the repos command.
pub fn run(output: &Output, store: &RepositoryStore) -> Result<()> {
    let engine = CommitEngine::new(store);

    let mut rows = Vec::new();
    for name in store.list_repositories()? {
        // Damaged repositories are skipped.
        let (files, commits) = match (engine.status(&name), engine.log(&name)) {
            (Ok(files), Ok(commits)) => (files.len(), commits.len()),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Skipping repository '{}': {}", name, e);
                continue;
            }
        };
        rows.push(RepoRow {
            name,
            files,
            commits,
        });
    }

    if output.is_json() {
        output.json(&ReposOutput {
            root: store.root().display().to_string(),
            repositories: &rows,
        });
    } else if rows.is_empty() {
        output.println(&format!("No repositories in {}", store.root().display()));
    } else {
        output.table(&rows);
    }
    Ok(())
}
