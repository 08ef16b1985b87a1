//! Commit engine.
//!
//! Turns a repository's working set into immutable snapshots and answers
//! history queries. A commit is prepared under the repository's `.staging/`
//! directory and becomes visible through a single rename into `commits/`,
//! after which its id is appended to `history.jsonl`.

use std::collections::HashSet;
use std::path::Path;

use chrono::Utc;
use fs_err as fs;

use crate::helpers::copy::{copy_tree, list_files, remove_dir_if_exists};
use crate::helpers::history::{History, HistoryRecord};
use crate::helpers::id::commit_id;
use crate::helpers::layout::{RepoLayout, FILES_DIR};
use crate::store::{RepoHandle, RepositoryStore};
use crate::types::{CommitId, CommitInfo, Result, SvcsError};

/// Shortest prefix accepted when looking a commit up.
pub const MIN_PREFIX_LEN: usize = 4;

/// Snapshot and history operations on top of a [`RepositoryStore`].
#[derive(Debug, Clone, Copy)]
pub struct CommitEngine<'a> {
    store: &'a RepositoryStore,
}

impl<'a> CommitEngine<'a> {
    /// Create an engine for a store.
    pub fn new(store: &'a RepositoryStore) -> Self {
        Self { store }
    }

    /// Snapshot the current working set.
    ///
    /// The working set is copied in full; it is left unchanged. Returns the
    /// metadata of the new commit, including its id.
    ///
    /// # Errors
    ///
    /// * `NotFound` - repository was never initialized
    /// * `LockTimeout` - another process holds the repository lock
    pub fn commit(&self, name: &str, message: &str) -> Result<CommitInfo> {
        let repo = self.store.resolve(name)?;
        let _lock = self.store.lock(name)?;
        let layout = repo.layout();

        let info = CommitInfo::new(self.unused_id(layout)?, message, Utc::now());
        let staging_root = layout.staging_dir().join(format!("commit-{}", info.id));

        if let Err(e) = self.stage(&repo, &staging_root, &info) {
            let _ = remove_dir_if_exists(&staging_root);
            return Err(e);
        }

        let published = layout.commit_dir(&info.id);
        if let Err(e) = fs::rename(&staging_root, &published) {
            let _ = remove_dir_if_exists(&staging_root);
            return Err(e.into());
        }

        let history = History::new(layout);
        if let Err(e) = history.append(&HistoryRecord::from(&info)) {
            let _ = history.remove(&info.id);
            let _ = remove_dir_if_exists(&published);
            return Err(e);
        }

        log::info!(
            "Created commit {} in '{}' with message: {:?}",
            info.id,
            name,
            info.message
        );
        Ok(info)
    }

    /// All commits of a repository, oldest first.
    ///
    /// Indexed commits are listed in index order. Commit directories that the
    /// index does not know about are sorted by timestamp and merged in ahead
    /// of the first indexed commit that is not older than them.
    ///
    /// # Errors
    ///
    /// * `NotFound` - repository was never initialized
    pub fn log(&self, name: &str) -> Result<Vec<CommitInfo>> {
        let repo = self.store.resolve(name)?;
        let layout = repo.layout();

        let records = History::new(layout).read_all()?;
        let indexed: HashSet<&CommitId> = records.iter().map(|r| &r.id).collect();

        let mut unindexed = Vec::new();
        for entry in fs::read_dir(layout.commits_dir())? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let id = CommitId::new(entry.file_name().to_string_lossy().into_owned());
            if indexed.contains(&id) {
                continue;
            }
            if let Some(info) = load_info(layout, &id) {
                unindexed.push(info);
            }
        }
        unindexed.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.id.cmp(&b.id)));

        let mut unindexed = unindexed.into_iter().peekable();
        let mut commits = Vec::with_capacity(records.len());
        let mut seen = HashSet::new();
        for record in &records {
            if !seen.insert(&record.id) {
                continue;
            }
            let Some(info) = load_info(layout, &record.id) else {
                continue;
            };
            while let Some(earlier) = unindexed.next_if(|o| o.timestamp < info.timestamp) {
                commits.push(earlier);
            }
            commits.push(info);
        }
        commits.extend(unindexed);

        Ok(commits)
    }

    /// Working-set file names; same as [`RepositoryStore::list_working_files`].
    pub fn status(&self, name: &str) -> Result<Vec<String>> {
        self.store.list_working_files(name)
    }

    /// Metadata of one commit, by full id or unique prefix.
    ///
    /// # Errors
    ///
    /// * `NotFound` - repository was never initialized
    /// * `CommitNotFound` - nothing matches
    /// * `AmbiguousCommit` - the prefix matches several commits
    pub fn show(&self, name: &str, commit: &str) -> Result<CommitInfo> {
        let repo = self.store.resolve(name)?;
        let id = self.resolve_commit(&repo, commit)?;
        CommitInfo::load(&repo.layout().commit_info_path(&id))
    }

    /// Names of the files captured by a commit, sorted.
    pub fn snapshot_files(&self, name: &str, commit: &str) -> Result<Vec<String>> {
        let repo = self.store.resolve(name)?;
        let id = self.resolve_commit(&repo, commit)?;
        Ok(list_files(&repo.layout().commit_files_dir(&id))?
            .into_iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect())
    }

    /// Contents of one file in a commit's snapshot.
    ///
    /// # Errors
    ///
    /// * `FileNotInSnapshot` - the commit does not contain `file`
    pub fn read_snapshot_file(&self, name: &str, commit: &str, file: &str) -> Result<Vec<u8>> {
        let repo = self.store.resolve(name)?;
        let id = self.resolve_commit(&repo, commit)?;

        let not_in_snapshot = || SvcsError::FileNotInSnapshot {
            commit: id.to_string(),
            file: file.to_string(),
        };
        let relative = Path::new(file);
        if relative.is_absolute() || relative.components().any(|c| c.as_os_str() == "..") {
            return Err(not_in_snapshot());
        }

        let path = repo.layout().commit_files_dir(&id).join(relative);
        if !path.is_file() {
            return Err(not_in_snapshot());
        }
        Ok(fs::read(path)?)
    }

    /// Resolve a full id or unique prefix to a commit id.
    fn resolve_commit(&self, repo: &RepoHandle, commit: &str) -> Result<CommitId> {
        let layout = repo.layout();
        let not_found = || SvcsError::commit_not_found(repo.name(), commit);

        if commit.is_empty() || commit.contains(['/', '\\']) || commit.starts_with('.') {
            return Err(not_found());
        }

        let exact = CommitId::new(commit);
        if layout.commit_info_path(&exact).is_file() {
            return Ok(exact);
        }
        if commit.len() < MIN_PREFIX_LEN {
            return Err(not_found());
        }

        let mut matches = Vec::new();
        for entry in fs::read_dir(layout.commits_dir())? {
            let entry = entry?;
            let id = CommitId::new(entry.file_name().to_string_lossy().into_owned());
            if id.matches_prefix(commit) && layout.commit_info_path(&id).is_file() {
                matches.push(id);
            }
        }

        match matches.len() {
            0 => Err(not_found()),
            1 => Ok(matches.remove(0)),
            n => Err(SvcsError::AmbiguousCommit {
                name: repo.name().to_string(),
                prefix: commit.to_string(),
                matches: n,
            }),
        }
    }

    /// Generate an id that no existing commit uses.
    fn unused_id(&self, layout: &RepoLayout) -> Result<CommitId> {
        loop {
            let id = commit_id(Utc::now());
            if !layout.commit_dir(&id).exists() {
                return Ok(id);
            }
            log::debug!("Commit id {} already in use, regenerating", id);
        }
    }

    /// Copy the working set and write metadata into a staging directory.
    fn stage(&self, repo: &RepoHandle, staging_root: &Path, info: &CommitInfo) -> Result<()> {
        remove_dir_if_exists(staging_root)?;
        let copied = copy_tree(&repo.files_dir(), &staging_root.join(FILES_DIR))?;
        info.save(&staging_root.join(CommitInfo::info_filename()))?;
        log::debug!(
            "Staged commit {} with {} files at {}",
            info.id,
            copied,
            staging_root.display()
        );
        Ok(())
    }
}

/// Load a commit's metadata, logging and skipping unreadable entries.
fn load_info(layout: &RepoLayout, id: &CommitId) -> Option<CommitInfo> {
    let path = layout.commit_info_path(id);
    match CommitInfo::load(&path) {
        Ok(info) => Some(info),
        Err(e) => {
            log::warn!("Skipping commit {}: cannot read {}: {}", id, path.display(), e);
            None
        }
    }
}
