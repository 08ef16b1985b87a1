//! `svcs init` command.

use serde_json::json;
use svcs_core::RepositoryStore;

use super::Result;
use crate::output::Output;

/// Confirmation line for a new repository.
pub fn initialized(name: &str) -> String {
    format!("Repository '{}' initialized.", name)
}

/// Run the init command.
pub fn run(output: &Output, store: &RepositoryStore, name: &str) -> Result<()> {
    let repo = store.initialize(name)?;

    if output.is_json() {
        output.json(&json!({
            "repository": repo.name(),
            "path": repo.root().display().to_string(),
        }));
    } else {
        output.success(&initialized(name));
    }
    Ok(())
}
