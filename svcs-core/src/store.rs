//! Repository store.
//!
//! Maps repository names to directories under a single root and owns the
//! working-file area of each repository.

use std::io;
use std::path::{Path, PathBuf};

use fs_err as fs;

use crate::helpers::copy::{list_files, remove_dir_if_exists, remove_entries_where};
use crate::helpers::id::{staging_name, staging_owner};
use crate::helpers::layout::{RepoLayout, StoreLayout};
use crate::helpers::lock::FileLock;
use crate::types::{Config, Result, SvcsError};

/// Resolved repository: its name and directory layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoHandle {
    name: String,
    layout: RepoLayout,
}

impl RepoHandle {
    /// Repository name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Repository directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Working-file area.
    pub fn files_dir(&self) -> PathBuf {
        self.layout.files_dir()
    }

    /// Commit-history area.
    pub fn commits_dir(&self) -> PathBuf {
        self.layout.commits_dir()
    }

    /// Full layout of the repository.
    pub fn layout(&self) -> &RepoLayout {
        &self.layout
    }
}

/// Filesystem store holding every repository under one root directory.
#[derive(Debug, Clone)]
pub struct RepositoryStore {
    config: Config,
    layout: StoreLayout,
}

impl RepositoryStore {
    /// Create a store for the configured root. Nothing is written until a
    /// repository is initialized.
    pub fn new(config: Config) -> Self {
        let layout = StoreLayout::new(config.root.clone());
        Self { config, layout }
    }

    /// Store root directory.
    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    /// Store configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Create the store root if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        self.layout.init()
    }

    /// Initialize a new repository.
    ///
    /// Both areas are created in a staging directory and published with a
    /// single rename, so no reader ever sees a half-built repository.
    ///
    /// # Errors
    ///
    /// * `InvalidName` - name is not a usable directory segment
    /// * `AlreadyExists` - a repository with this name exists (left untouched)
    pub fn initialize(&self, name: &str) -> Result<RepoHandle> {
        validate_name(name)?;
        self.ensure_root()?;
        let _lock = self.lock(name)?;

        let layout = self.layout.repo(name);
        if layout.root().exists() {
            return Err(SvcsError::already_exists(name));
        }

        let staging = RepoLayout::new(
            self.layout
                .staging_dir()
                .join(staging_name(&format!("init-{}", name))),
        );
        log::debug!("Staging repository at {}", staging.root().display());

        let published = staging
            .init()
            .and_then(|_| fs::rename(staging.root(), layout.root()).map_err(SvcsError::from));
        if let Err(e) = published {
            let _ = remove_dir_if_exists(staging.root());
            return Err(e);
        }

        log::info!(
            "Initialized repository '{}' at {}",
            name,
            layout.root().display()
        );
        Ok(RepoHandle {
            name: name.to_string(),
            layout,
        })
    }

    /// Resolve a repository by name.
    ///
    /// # Errors
    ///
    /// * `NotFound` - repository was never initialized
    /// * `Corrupted` - repository directory lacks one of its areas
    pub fn resolve(&self, name: &str) -> Result<RepoHandle> {
        if validate_name(name).is_err() {
            return Err(SvcsError::not_found(name));
        }

        let layout = self.layout.repo(name);
        if !layout.exists() {
            return Err(SvcsError::not_found(name));
        }
        if let Some(area) = layout.missing_area() {
            return Err(SvcsError::corrupted(
                name,
                format!("missing '{}' directory", area),
            ));
        }

        Ok(RepoHandle {
            name: name.to_string(),
            layout,
        })
    }

    /// Copy a file into the repository's working set under its base name.
    ///
    /// An existing working file with the same name is replaced. Returns the
    /// stored file name.
    ///
    /// # Errors
    ///
    /// * `NotFound` - repository was never initialized
    /// * `SourceUnavailable` - source is missing, not a file, or unreadable
    pub fn add_file(&self, name: &str, source: impl AsRef<Path>) -> Result<String> {
        let source = source.as_ref();
        let repo = self.resolve(name)?;

        let file_name = source
            .file_name()
            .ok_or_else(|| {
                SvcsError::source_unavailable(
                    source,
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?
            .to_os_string();

        let metadata =
            fs::metadata(source).map_err(|e| SvcsError::source_unavailable(source, e))?;
        if !metadata.is_file() {
            return Err(SvcsError::source_unavailable(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let mut reader =
            fs::File::open(source).map_err(|e| SvcsError::source_unavailable(source, e))?;

        let _lock = self.lock(name)?;
        let staging_dir = repo.layout().staging_dir();
        fs::create_dir_all(&staging_dir)?;
        let staged = staging_dir.join(staging_name("add"));

        let copied = (|| -> Result<()> {
            let mut writer = fs::File::create(&staged)?;
            io::copy(&mut reader, &mut writer)?;
            writer.sync_all()?;
            fs::rename(&staged, repo.files_dir().join(&file_name))?;
            Ok(())
        })();
        if let Err(e) = copied {
            let _ = std::fs::remove_file(&staged);
            return Err(e);
        }

        let stored = file_name.to_string_lossy().into_owned();
        log::debug!("Added {} to '{}' as {}", source.display(), name, stored);
        Ok(stored)
    }

    /// Names of the files currently in the working set, sorted.
    ///
    /// # Errors
    ///
    /// * `NotFound` - repository was never initialized
    pub fn list_working_files(&self, name: &str) -> Result<Vec<String>> {
        let repo = self.resolve(name)?;
        Ok(list_files(&repo.files_dir())?
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect())
    }

    /// Names of all initialized repositories, sorted.
    pub fn list_repositories(&self) -> Result<Vec<String>> {
        let root = self.layout.root();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if validate_name(&name).is_ok() {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    /// Take the exclusive lock of a repository.
    ///
    /// Staging entries belonging to `name` can only exist while its lock is
    /// held, so any found now were left by a crashed process and are removed.
    pub(crate) fn lock(&self, name: &str) -> Result<FileLock> {
        let lock = FileLock::acquire(&self.layout.lock_path(name), self.config.lock_timeout())?;
        self.clear_stale_staging(name)?;
        Ok(lock)
    }

    fn clear_stale_staging(&self, name: &str) -> Result<()> {
        let repo_staging = self.layout.repo(name).staging_dir();
        let in_repo = remove_entries_where(&repo_staging, |_| true)?;
        let in_root = remove_entries_where(&self.layout.staging_dir(), |entry| {
            staging_owner(entry, "init") == Some(name)
        })?;
        if in_repo + in_root > 0 {
            log::warn!(
                "Removed {} stale staging entries of '{}'",
                in_repo + in_root,
                name
            );
        }
        Ok(())
    }
}

/// Check that a repository name can be used as a single directory segment.
pub fn validate_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "name is empty"
    } else if name == "." || name == ".." {
        "name is a relative path component"
    } else if name.starts_with('.') {
        "name must not start with '.'"
    } else if name.contains(['/', '\\', '\0']) {
        "name must not contain path separators"
    } else {
        return Ok(());
    };
    Err(SvcsError::invalid_name(name, reason))
}
