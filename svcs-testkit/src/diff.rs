//! Tree snapshot diffing.

use std::path::PathBuf;

use crate::snapshot::TreeSnapshot;

/// Difference between two tree snapshots.
#[derive(Debug, Clone, Default)]
pub struct TreeDiff {
    /// List of mismatches found.
    pub mismatches: Vec<Mismatch>,
}

/// A mismatch between expected and actual trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// File present in expected but not actual.
    MissingFile { path: PathBuf },

    /// File present in actual but not expected.
    ExtraFile { path: PathBuf },

    /// File present in both with different bytes.
    ContentMismatch { path: PathBuf },

    /// Directory present in expected but not actual.
    MissingDir { path: PathBuf },

    /// Directory present in actual but not expected.
    ExtraDir { path: PathBuf },
}

impl std::fmt::Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mismatch::MissingFile { path } => write!(f, "Missing file: {}", path.display()),
            Mismatch::ExtraFile { path } => write!(f, "Extra file: {}", path.display()),
            Mismatch::ContentMismatch { path } => {
                write!(f, "Content differs: {}", path.display())
            }
            Mismatch::MissingDir { path } => write!(f, "Missing directory: {}", path.display()),
            Mismatch::ExtraDir { path } => write!(f, "Extra directory: {}", path.display()),
        }
    }
}

impl TreeDiff {
    /// Compare an expected snapshot with an actual one.
    pub fn compare(expected: &TreeSnapshot, actual: &TreeSnapshot) -> Self {
        let mut mismatches = Vec::new();

        for (path, bytes) in &expected.files {
            match actual.files.get(path) {
                None => mismatches.push(Mismatch::MissingFile { path: path.clone() }),
                Some(other) if other != bytes => {
                    mismatches.push(Mismatch::ContentMismatch { path: path.clone() })
                }
                Some(_) => {}
            }
        }
        for path in actual.files.keys() {
            if !expected.files.contains_key(path) {
                mismatches.push(Mismatch::ExtraFile { path: path.clone() });
            }
        }

        for path in expected.dirs.difference(&actual.dirs) {
            mismatches.push(Mismatch::MissingDir { path: path.clone() });
        }
        for path in actual.dirs.difference(&expected.dirs) {
            mismatches.push(Mismatch::ExtraDir { path: path.clone() });
        }

        Self { mismatches }
    }

    /// Check if the trees match.
    pub fn is_empty(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Panic with every mismatch listed unless the trees match.
    pub fn assert_empty(&self) {
        if !self.is_empty() {
            panic!("{}", self);
        }
    }
}

impl std::fmt::Display for TreeDiff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "No differences");
        }
        writeln!(f, "{} difference(s):", self.mismatches.len())?;
        for mismatch in &self.mismatches {
            writeln!(f, "  - {}", mismatch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(files: &[(&str, &[u8])], dirs: &[&str]) -> TreeSnapshot {
        TreeSnapshot {
            dirs: dirs.iter().map(PathBuf::from).collect(),
            files: files
                .iter()
                .map(|(p, b)| (PathBuf::from(p), b.to_vec()))
                .collect(),
        }
    }

    #[test]
    fn test_identical_trees() {
        let a = snapshot(&[("x", b"1")], &["d"]);
        let diff = TreeDiff::compare(&a, &a.clone());
        assert!(diff.is_empty());
        diff.assert_empty();
    }

    #[test]
    fn test_reports_each_kind() {
        let expected = snapshot(&[("same", b"1"), ("changed", b"a"), ("gone", b"g")], &["d1"]);
        let actual = snapshot(&[("same", b"1"), ("changed", b"b"), ("new", b"n")], &["d2"]);

        let diff = TreeDiff::compare(&expected, &actual);

        assert_eq!(diff.mismatches.len(), 5);
        assert!(diff.mismatches.contains(&Mismatch::ContentMismatch {
            path: PathBuf::from("changed")
        }));
        assert!(diff.mismatches.contains(&Mismatch::MissingFile {
            path: PathBuf::from("gone")
        }));
        assert!(diff.mismatches.contains(&Mismatch::ExtraFile {
            path: PathBuf::from("new")
        }));
        assert!(diff.mismatches.contains(&Mismatch::MissingDir {
            path: PathBuf::from("d1")
        }));
        assert!(diff.mismatches.contains(&Mismatch::ExtraDir {
            path: PathBuf::from("d2")
        }));
        assert!(diff.to_string().starts_with("5 difference(s):"));
    }
}
