//! `svcs commit` command.

use svcs_core::{CommitEngine, CommitInfo, RepositoryStore};

use super::Result;
use crate::output::Output;

/// Confirmation line for a new commit.
pub fn created(info: &CommitInfo) -> String {
    format!(
        "Commit '{}' created with message: '{}'.",
        info.id, info.message
    )
}

/// Run the commit command.
pub fn run(output: &Output, store: &RepositoryStore, name: &str, message: &str) -> Result<()> {
    let info = CommitEngine::new(store).commit(name, message)?;

    if output.is_json() {
        output.json(&info);
    } else {
        output.success(&created(&info));
    }
    Ok(())
}
