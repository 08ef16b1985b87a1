//! On-disk tree snapshots.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use fs_err as fs;
use walkdir::WalkDir;

/// Every directory and file (with its bytes) below a root directory.
///
/// Paths are relative to the captured root. A missing root captures as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    /// Directories, including empty ones.
    pub dirs: BTreeSet<PathBuf>,

    /// Regular files and their contents.
    pub files: BTreeMap<PathBuf, Vec<u8>>,
}

impl TreeSnapshot {
    /// Capture the tree below `root`.
    pub fn capture(root: &Path) -> std::io::Result<Self> {
        let mut snapshot = Self::default();
        if !root.exists() {
            return Ok(snapshot);
        }

        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            let Ok(rel) = entry.path().strip_prefix(root) else {
                continue;
            };
            if entry.file_type().is_dir() {
                snapshot.dirs.insert(rel.to_path_buf());
            } else if entry.file_type().is_file() {
                snapshot
                    .files
                    .insert(rel.to_path_buf(), fs::read(entry.path())?);
            }
        }
        Ok(snapshot)
    }

    /// Keep only entries below `prefix`, re-rooted at it.
    pub fn subtree(&self, prefix: impl AsRef<Path>) -> Self {
        let prefix = prefix.as_ref();
        Self {
            dirs: self
                .dirs
                .iter()
                .filter_map(|d| d.strip_prefix(prefix).ok())
                .filter(|d| !d.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .collect(),
            files: self
                .files
                .iter()
                .filter_map(|(p, bytes)| {
                    let rel = p.strip_prefix(prefix).ok()?;
                    Some((rel.to_path_buf(), bytes.clone()))
                })
                .collect(),
        }
    }

    /// Contents of one captured file.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(Vec::as_slice)
    }

    /// Whether any file or directory was captured.
    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty() && self.files.is_empty()
    }

    /// Number of captured files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}
