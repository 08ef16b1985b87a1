//! Temporary store utilities.

use std::path::{Path, PathBuf};
use std::time::Duration;

use fs_err as fs;
use svcs_core::{CommitEngine, Config, RepositoryStore, SvcsError};
use tempfile::TempDir;
use thiserror::Error;

/// A temporary store root with a separate directory for source files.
///
/// Everything is removed when dropped.
pub struct TestRoot {
    /// Temporary directory holding both areas.
    temp: TempDir,
    /// Store under test.
    store: RepositoryStore,
}

impl TestRoot {
    /// Create a fresh, not yet existing store root.
    pub fn new() -> Result<Self, TestRootError> {
        let temp = TempDir::new()?;
        let store = RepositoryStore::new(Config::new(temp.path().join("store")));
        Ok(Self { temp, store })
    }

    /// Like [`TestRoot::new`], with a custom lock timeout.
    pub fn with_lock_timeout(timeout: Duration) -> Result<Self, TestRootError> {
        let temp = TempDir::new()?;
        let config = Config::new(temp.path().join("store")).with_lock_timeout(timeout);
        Ok(Self {
            temp,
            store: RepositoryStore::new(config),
        })
    }

    /// Get the store root path.
    pub fn root(&self) -> &Path {
        self.store.root()
    }

    /// Get the store under test.
    pub fn store(&self) -> &RepositoryStore {
        &self.store
    }

    /// Get a commit engine for the store.
    pub fn engine(&self) -> CommitEngine<'_> {
        CommitEngine::new(&self.store)
    }

    /// Get the directory holding source files.
    pub fn sources_dir(&self) -> PathBuf {
        self.temp.path().join("sources")
    }

    /// Write a source file outside the store and return its path.
    pub fn write_source(&self, rel_path: &str, contents: &[u8]) -> Result<PathBuf, TestRootError> {
        let path = self.sources_dir().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    /// Initialize `name` and add each `(file name, contents)` pair to it.
    pub fn repo_with_files(&self, name: &str, files: &[(&str, &[u8])]) -> Result<(), TestRootError> {
        self.store.initialize(name)?;
        for (file, contents) in files {
            let source = self.write_source(file, contents)?;
            self.store.add_file(name, &source)?;
        }
        Ok(())
    }

    /// Read a file of a repository's working set.
    pub fn read_working_file(&self, name: &str, file: &str) -> Result<Vec<u8>, TestRootError> {
        let repo = self.store.resolve(name)?;
        Ok(fs::read(repo.files_dir().join(file))?)
    }
}

/// Error type for TestRoot operations.
#[derive(Debug, Error)]
pub enum TestRootError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Store error.
    #[error("svcs error: {0}")]
    Svcs(#[from] SvcsError),
}
