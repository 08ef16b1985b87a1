//! On-disk layout helpers.
//!
//! A store root contains one directory per repository plus two reserved
//! dot-directories:
//! - `.locks/<name>.lock` - per-repository lock files
//! - `.staging/` - repositories being initialized
//!
//! Each repository directory contains:
//! - `files/` - the working set
//! - `commits/<id>/files/` and `commits/<id>/info.json` - snapshots
//! - `history.jsonl` - append-only commit index
//! - `.staging/` - commits and added files being prepared

use std::path::{Path, PathBuf};

use fs_err as fs;

use crate::types::{CommitId, CommitInfo, Result};

/// Working-set directory name.
pub const FILES_DIR: &str = "files";
/// Commit-history directory name.
pub const COMMITS_DIR: &str = "commits";
/// History index file name.
pub const HISTORY_FILE: &str = "history.jsonl";
/// Lock directory under the store root.
pub const LOCKS_DIR: &str = ".locks";
/// Staging directory, both under the store root and inside repositories.
pub const STAGING_DIR: &str = ".staging";

/// Layout helper for the store root.
#[derive(Debug, Clone)]
pub struct StoreLayout {
    root: PathBuf,
}

impl StoreLayout {
    /// Create a layout for a store root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the store root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the locks directory (`<root>/.locks/`).
    pub fn locks_dir(&self) -> PathBuf {
        self.root.join(LOCKS_DIR)
    }

    /// Get the lock file for a repository.
    pub fn lock_path(&self, name: &str) -> PathBuf {
        self.locks_dir().join(format!("{}.lock", name))
    }

    /// Get the staging directory (`<root>/.staging/`).
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Get the layout of a named repository.
    pub fn repo(&self, name: &str) -> RepoLayout {
        RepoLayout::new(self.root.join(name))
    }

    /// Create the root and its reserved directories.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(&self.root)?;
        fs::create_dir_all(self.locks_dir())?;
        fs::create_dir_all(self.staging_dir())?;
        Ok(())
    }
}

/// Layout helper for a single repository directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoLayout {
    root: PathBuf,
}

impl RepoLayout {
    /// Create a layout for a repository directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Get the repository directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Get the working-set directory (`files/`).
    pub fn files_dir(&self) -> PathBuf {
        self.root.join(FILES_DIR)
    }

    /// Get the commit-history directory (`commits/`).
    pub fn commits_dir(&self) -> PathBuf {
        self.root.join(COMMITS_DIR)
    }

    /// Get a commit's directory.
    pub fn commit_dir(&self, id: &CommitId) -> PathBuf {
        self.commits_dir().join(id.as_str())
    }

    /// Get a commit's snapshot directory.
    pub fn commit_files_dir(&self, id: &CommitId) -> PathBuf {
        self.commit_dir(id).join(FILES_DIR)
    }

    /// Get a commit's metadata path.
    pub fn commit_info_path(&self, id: &CommitId) -> PathBuf {
        self.commit_dir(id).join(CommitInfo::info_filename())
    }

    /// Get the history index path.
    pub fn history_path(&self) -> PathBuf {
        self.root.join(HISTORY_FILE)
    }

    /// Get the repository staging directory.
    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    /// Create both required areas.
    pub fn init(&self) -> Result<()> {
        fs::create_dir_all(self.files_dir())?;
        fs::create_dir_all(self.commits_dir())?;
        Ok(())
    }

    /// Check if the repository directory exists.
    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }

    /// Name of the first required area that is missing, if any.
    pub fn missing_area(&self) -> Option<&'static str> {
        if !self.files_dir().is_dir() {
            Some(FILES_DIR)
        } else if !self.commits_dir().is_dir() {
            Some(COMMITS_DIR)
        } else {
            None
        }
    }
}
